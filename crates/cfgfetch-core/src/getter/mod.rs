//! Getter contract and the HTTP getter.
//!
//! A `Getter` fetches one URL scheme into a local path. The owning `Client`
//! binds itself via `set_client` before each fetch and then calls either `get`
//! (directory destination) or `get_file` (single file destination).

mod alt_source;
mod filename;
mod http;
mod sink;

pub use http::{HttpGetter, HttpGetterOptions};

use std::fs::{File, OpenOptions};
use std::path::Path;
use url::Url;

use crate::client::{ClientContext, ClientMode};
use crate::error::GetError;

/// Default permission bits for files a getter creates (before umask).
pub const DEFAULT_FILE_MODE: u32 = 0o666;

pub trait Getter: Send {
    /// Bind the owning client's context (cancellation, working dir, file mode).
    fn set_client(&mut self, ctx: ClientContext);

    /// Whether `url` names a single file or a directory-like source.
    fn client_mode(&self, url: &Url) -> Result<ClientMode, GetError>;

    /// Fetch into the directory `dst`.
    fn get(&self, dst: &Path, url: &Url) -> Result<(), GetError>;

    /// Fetch a single file to `dst`.
    fn get_file(&self, dst: &Path, url: &Url) -> Result<(), GetError>;
}

impl<G: Getter + ?Sized> Getter for Box<G> {
    fn set_client(&mut self, ctx: ClientContext) {
        (**self).set_client(ctx)
    }

    fn client_mode(&self, url: &Url) -> Result<ClientMode, GetError> {
        (**self).client_mode(url)
    }

    fn get(&self, dst: &Path, url: &Url) -> Result<(), GetError> {
        (**self).get(dst, url)
    }

    fn get_file(&self, dst: &Path, url: &Url) -> Result<(), GetError> {
        (**self).get_file(dst, url)
    }
}

/// Open `path` for writing with the given permission bits.
/// `truncate == false` opens read/write without discarding content.
pub(crate) fn open_with_mode(path: &Path, mode: u32, truncate: bool) -> Result<File, GetError> {
    let mut opts = OpenOptions::new();
    opts.read(!truncate).write(true).create(true).truncate(truncate);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        opts.mode(mode);
    }
    #[cfg(not(unix))]
    let _ = mode;
    opts.open(path).map_err(|e| GetError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};

    #[test]
    fn open_with_mode_truncates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("f.txt");
        std::fs::write(&path, b"old content").unwrap();
        let mut f = open_with_mode(&path, DEFAULT_FILE_MODE, true).unwrap();
        f.write_all(b"new").unwrap();
        drop(f);
        assert_eq!(std::fs::read(&path).unwrap(), b"new");
    }

    #[test]
    fn open_with_mode_keeps_content_and_creates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.txt");
        let mut f = open_with_mode(&path, DEFAULT_FILE_MODE, false).unwrap();
        let mut buf = Vec::new();
        f.read_to_end(&mut buf).unwrap();
        assert!(buf.is_empty());
        assert!(path.exists());
    }

    #[cfg(unix)]
    #[test]
    fn open_with_mode_applies_permission_bits() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("private.txt");
        drop(open_with_mode(&path, 0o600, true).unwrap());
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
