//! Response body sink with an optional byte cap.

use std::io::{self, Write};

/// Wraps the destination writer. Once `max_bytes` have been written further data
/// is refused, which makes the transport stop the transfer. A refusal because of
/// the cap is not an error for the getter; a refusal because `inner` failed is.
pub(crate) struct BodySink<W> {
    inner: W,
    written: u64,
    max_bytes: Option<u64>,
    limit_hit: bool,
    error: Option<io::Error>,
}

impl<W: Write> BodySink<W> {
    pub(crate) fn new(inner: W, max_bytes: Option<u64>) -> Self {
        Self {
            inner,
            written: 0,
            max_bytes,
            limit_hit: false,
            error: None,
        }
    }

    pub(crate) fn limit_hit(&self) -> bool {
        self.limit_hit
    }

    /// The write error from `inner`, if the sink stopped because of one.
    pub(crate) fn take_error(&mut self) -> Option<io::Error> {
        self.error.take()
    }

    pub(crate) fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Write for BodySink<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.limit_hit || self.error.is_some() {
            return Err(io::Error::new(io::ErrorKind::Other, "body sink closed"));
        }
        let allowed = match self.max_bytes {
            Some(max) => (max.saturating_sub(self.written)).min(buf.len() as u64) as usize,
            None => buf.len(),
        };
        if allowed > 0 {
            if let Err(e) = self.inner.write_all(&buf[..allowed]) {
                let kind = e.kind();
                self.error = Some(e);
                return Err(io::Error::from(kind));
            }
            self.written += allowed as u64;
        }
        if allowed < buf.len() {
            self.limit_hit = true;
            return Err(io::Error::new(io::ErrorKind::Other, "byte limit reached"));
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unlimited_passes_everything() {
        let mut sink = BodySink::new(Vec::new(), None);
        sink.write_all(b"hello world").unwrap();
        assert!(!sink.limit_hit());
        assert_eq!(sink.into_inner(), b"hello world");
    }

    #[test]
    fn cap_keeps_prefix_and_refuses_rest() {
        let mut sink = BodySink::new(Vec::new(), Some(4));
        assert!(sink.write_all(b"hello").is_err());
        assert!(sink.limit_hit());
        assert!(sink.take_error().is_none());
        assert!(sink.write_all(b"more").is_err());
        assert_eq!(sink.into_inner(), b"hell");
    }

    #[test]
    fn exact_cap_is_not_a_hit() {
        let mut sink = BodySink::new(Vec::new(), Some(5));
        sink.write_all(b"hello").unwrap();
        assert!(!sink.limit_hit());
    }

    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "disk full"))
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn inner_failure_is_recorded() {
        let mut sink = BodySink::new(Broken, None);
        assert!(sink.write_all(b"x").is_err());
        assert!(!sink.limit_hit());
        assert!(sink.take_error().is_some());
    }
}
