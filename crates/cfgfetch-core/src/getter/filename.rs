//! File name for a directory fetch.
//!
//! A directory fetch stores the resource as `dst/<name>`, where the name comes
//! from `Content-Disposition` or the last URL path segment.

use url::Url;

/// Used when neither the header nor the URL yields a usable name.
const FALLBACK_NAME: &str = "download";

/// Longest file name accepted on Linux filesystems (NAME_MAX).
const NAME_MAX: usize = 255;

/// Picks the name for the downloaded file inside the destination directory.
///
/// `Content-Disposition` wins over the URL. Path separators, control
/// characters and leading dots are stripped so the result always stays inside
/// the destination directory.
pub(crate) fn file_name_for(url: &Url, content_disposition: Option<&str>) -> String {
    content_disposition
        .and_then(disposition_file_name)
        .map(|n| clean(&n))
        .filter(|n| !n.is_empty())
        .or_else(|| last_segment(url).map(|n| clean(&n)).filter(|n| !n.is_empty()))
        .unwrap_or_else(|| FALLBACK_NAME.to_string())
}

fn last_segment(url: &Url) -> Option<String> {
    let segment = url.path_segments()?.filter(|s| !s.is_empty()).last()?;
    Some(percent_decode(segment))
}

/// `filename*=UTF-8''...` takes precedence over `filename=`.
fn disposition_file_name(value: &str) -> Option<String> {
    let mut plain = None;
    for param in value.split(';') {
        let Some((name, v)) = param.trim().split_once('=') else {
            continue;
        };
        let v = v.trim();
        match name.trim().to_ascii_lowercase().as_str() {
            "filename*" => {
                let lower = v.to_ascii_lowercase();
                if lower.starts_with("utf-8''") {
                    return Some(percent_decode(&v[7..]));
                }
            }
            "filename" => {
                let unquoted = v
                    .strip_prefix('"')
                    .and_then(|s| s.strip_suffix('"'))
                    .unwrap_or(v);
                plain = Some(unquoted.replace("\\\"", "\""));
            }
            _ => {}
        }
    }
    plain
}

fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(h), Some(l)) = (hex_digit(bytes[i + 1]), hex_digit(bytes[i + 2])) {
                out.push(h << 4 | l);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_digit(b: u8) -> Option<u8> {
    (b as char).to_digit(16).map(|d| d as u8)
}

fn clean(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| {
            if c == '/' || c == '\\' || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect();
    let trimmed = replaced.trim_matches(|c: char| c == '.' || c == '_' || c.is_whitespace());
    let mut end = trimmed.len().min(NAME_MAX);
    while !trimmed.is_char_boundary(end) {
        end -= 1;
    }
    trimmed[..end].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn name_from_url_path() {
        assert_eq!(file_name_for(&url("http://h/a/b/app.yaml"), None), "app.yaml");
        assert_eq!(file_name_for(&url("http://h/cfg.yaml?xpath=a"), None), "cfg.yaml");
    }

    #[test]
    fn trailing_slash_uses_last_non_empty_segment() {
        assert_eq!(file_name_for(&url("http://h/configs/"), None), "configs");
    }

    #[test]
    fn root_falls_back() {
        assert_eq!(file_name_for(&url("http://h/"), None), "download");
        assert_eq!(file_name_for(&url("http://h/.."), None), "download");
    }

    #[test]
    fn disposition_wins() {
        assert_eq!(
            file_name_for(
                &url("http://h/x"),
                Some("attachment; filename=\"settings.yaml\"")
            ),
            "settings.yaml"
        );
        assert_eq!(
            file_name_for(&url("http://h/x"), Some("attachment; filename=plain.yml")),
            "plain.yml"
        );
    }

    #[test]
    fn disposition_star_is_decoded_and_preferred() {
        assert_eq!(
            file_name_for(
                &url("http://h/x"),
                Some("attachment; filename=\"a.bin\"; filename*=UTF-8''caf%C3%A9.yaml")
            ),
            "café.yaml"
        );
    }

    #[test]
    fn separators_cannot_escape_directory() {
        assert_eq!(
            file_name_for(&url("http://h/x"), Some("attachment; filename=\"../../etc/passwd\"")),
            "etc_passwd"
        );
    }

    #[test]
    fn encoded_path_segment_is_decoded() {
        assert_eq!(file_name_for(&url("http://h/my%20app.yaml"), None), "my app.yaml");
    }
}
