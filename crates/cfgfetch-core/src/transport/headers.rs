//! Parse raw response header lines collected by the transport.

/// Turns header lines (as delivered by libcurl's header callback) into
/// `(name, value)` pairs.
///
/// Each status line (`HTTP/1.1 301 ...`) starts a new header block; only the
/// last block is kept so that redirects do not leak headers from earlier hops.
pub(crate) fn parse_header_lines(lines: &[String]) -> Vec<(String, String)> {
    let mut headers = Vec::new();

    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with("HTTP/") {
            headers.clear();
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            headers.push((name.trim().to_string(), value.trim().to_string()));
        }
    }

    headers
}
