//! Alternate-source discovery for directory fetches.
//!
//! A server can point a directory fetch elsewhere with an `X-Terraform-Get`
//! response header, or with `<meta name="terraform-get" content="...">` in an
//! HTML body.

use url::Url;

use crate::transport::Response;

pub(crate) const HEADER: &str = "X-Terraform-Get";
const META_NAME: &str = "terraform-get";

/// Upper bound on header-driven hops before giving up (loop protection).
pub(crate) const MAX_HOPS: usize = 10;

/// Bytes of body scanned for a meta tag.
pub(crate) const SCAN_BYTES: u64 = 64 * 1024;

/// Source named by the response, resolved against `base`. `None` when the
/// response names no source or the value cannot be resolved.
pub(crate) fn find_source(base: &Url, resp: &Response, body: &[u8]) -> Option<Url> {
    let raw = resp
        .header(HEADER)
        .map(str::to_string)
        .or_else(|| meta_content(&String::from_utf8_lossy(body)))?;
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match base.join(raw) {
        Ok(u) => Some(u),
        Err(e) => {
            tracing::warn!("ignoring unparsable {} value {:?}: {}", HEADER, raw, e);
            None
        }
    }
}

/// `content` of the first `<meta name="terraform-get" ...>` tag.
fn meta_content(html: &str) -> Option<String> {
    let lower = html.to_ascii_lowercase();
    let mut from = 0;
    while let Some(start) = lower[from..].find("<meta") {
        let start = from + start;
        let end = start + lower[start..].find('>')?;
        let tag = &html[start..end];
        if attr(tag, "name").is_some_and(|n| n.eq_ignore_ascii_case(META_NAME)) {
            return attr(tag, "content");
        }
        from = end;
    }
    None
}

/// Value of `name="..."` (or single-quoted) inside a tag.
fn attr(tag: &str, name: &str) -> Option<String> {
    let lower = tag.to_ascii_lowercase();
    let mut from = 0;
    while let Some(pos) = lower[from..].find(name) {
        let pos = from + pos;
        from = pos + name.len();
        let preceded_by_space = lower[..pos].ends_with(char::is_whitespace);
        let rest = lower[from..].trim_start();
        if !preceded_by_space || !rest.starts_with('=') {
            continue;
        }
        let value_start = tag.len() - rest.len() + 1;
        let value = tag[value_start..].trim_start();
        let quote = value.chars().next()?;
        if quote == '"' || quote == '\'' {
            let inner = &value[1..];
            return inner.find(quote).map(|e| inner[..e].to_string());
        }
        let end = value
            .find(|c: char| c.is_whitespace() || c == '/')
            .unwrap_or(value.len());
        return Some(value[..end].to_string());
    }
    None
}
