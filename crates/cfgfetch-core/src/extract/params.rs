//! Reserved query parameters of an extracting fetch.

use std::str::FromStr;
use url::form_urlencoded;
use url::Url;

use crate::error::GetError;

pub const XPATH: &str = "xpath";
pub const FORMAT: &str = "format";
pub const TYPE: &str = "type";
pub const NEWKEY: &str = "newkey";

/// `type` value that lets a query return more than one node.
pub const LIST_TYPE: &str = "list";

/// Structured formats the extraction stage understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Yaml,
}

impl FromStr for Format {
    type Err = GetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "yaml" => Ok(Format::Yaml),
            other => Err(GetError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Values of the reserved parameters; empty string when absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractParams {
    pub xpath: String,
    pub format: String,
    pub result_type: String,
    pub new_key: String,
}

impl ExtractParams {
    /// Reads the reserved parameters from `url` and returns them together with a
    /// copy of `url` that no longer carries them.
    ///
    /// Other parameters keep their raw encoding and order. The first occurrence
    /// of a reserved parameter wins; every occurrence is removed.
    pub fn split(url: &Url) -> (Self, Url) {
        let mut params = ExtractParams::default();
        let mut stripped = url.clone();
        let Some(query) = url.query() else {
            return (params, stripped);
        };

        let mut kept: Vec<&str> = Vec::new();
        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let Some((key, value)) = form_urlencoded::parse(pair.as_bytes()).next() else {
                kept.push(pair);
                continue;
            };
            let slot = match key.as_ref() {
                XPATH => &mut params.xpath,
                FORMAT => &mut params.format,
                TYPE => &mut params.result_type,
                NEWKEY => &mut params.new_key,
                _ => {
                    kept.push(pair);
                    continue;
                }
            };
            if slot.is_empty() {
                *slot = value.into_owned();
            }
        }

        if kept.is_empty() {
            stripped.set_query(None);
        } else {
            stripped.set_query(Some(&kept.join("&")));
        }
        (params, stripped)
    }

    /// Format to extract with, or `None` when the file is to be left alone.
    ///
    /// A path without an explicit format implies YAML.
    pub fn effective_format(&self) -> Result<Option<Format>, GetError> {
        if self.format.is_empty() {
            if self.xpath.is_empty() {
                return Ok(None);
            }
            return Ok(Some(Format::Yaml));
        }
        self.format.parse().map(Some)
    }

    pub fn allows_list(&self) -> bool {
        self.result_type == LIST_TYPE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(s: &str) -> (ExtractParams, String) {
        let (p, u) = ExtractParams::split(&Url::parse(s).unwrap());
        (p, u.to_string())
    }

    #[test]
    fn no_query_is_untouched() {
        let (p, u) = split("http://h/cfg.yaml");
        assert_eq!(p, ExtractParams::default());
        assert_eq!(u, "http://h/cfg.yaml");
    }

    #[test]
    fn reserved_params_are_removed() {
        let (p, u) = split("http://h/cfg.yaml?xpath=yaml.key3&format=yaml&type=list&newkey=prefix");
        assert_eq!(p.xpath, "yaml.key3");
        assert_eq!(p.format, "yaml");
        assert_eq!(p.result_type, "list");
        assert_eq!(p.new_key, "prefix");
        assert_eq!(u, "http://h/cfg.yaml");
    }

    #[test]
    fn other_params_keep_raw_encoding_and_order() {
        let (p, u) = split("http://h/cfg?token=a%2Fb&xpath=a.b&z=1&a=%20x+y");
        assert_eq!(p.xpath, "a.b");
        assert_eq!(u, "http://h/cfg?token=a%2Fb&z=1&a=%20x+y");
    }

    #[test]
    fn values_are_decoded() {
        let (p, _) = split("http://h/cfg?xpath=%24..name&newkey=my+key");
        assert_eq!(p.xpath, "$..name");
        assert_eq!(p.new_key, "my key");
    }

    #[test]
    fn first_occurrence_wins_and_all_are_removed() {
        let (p, u) = split("http://h/cfg?xpath=first&keep=1&xpath=second");
        assert_eq!(p.xpath, "first");
        assert_eq!(u, "http://h/cfg?keep=1");
    }

    #[test]
    fn original_url_not_mutated() {
        let url = Url::parse("http://h/cfg?xpath=a&k=v").unwrap();
        let (_, stripped) = ExtractParams::split(&url);
        assert_eq!(url.as_str(), "http://h/cfg?xpath=a&k=v");
        assert_eq!(stripped.as_str(), "http://h/cfg?k=v");
    }

    #[test]
    fn effective_format_rules() {
        let none = ExtractParams::default();
        assert_eq!(none.effective_format().unwrap(), None);

        let implied = ExtractParams {
            xpath: "a".into(),
            ..Default::default()
        };
        assert_eq!(implied.effective_format().unwrap(), Some(Format::Yaml));

        let explicit = ExtractParams {
            format: "yaml".into(),
            ..Default::default()
        };
        assert_eq!(explicit.effective_format().unwrap(), Some(Format::Yaml));

        let json = ExtractParams {
            xpath: "a".into(),
            format: "json".into(),
            ..Default::default()
        };
        match json.effective_format() {
            Err(GetError::UnsupportedFormat(f)) => assert_eq!(f, "json"),
            other => panic!("expected UnsupportedFormat, got {:?}", other),
        }
    }

    #[test]
    fn list_type_is_exact() {
        let mut p = ExtractParams::default();
        assert!(!p.allows_list());
        p.result_type = "list".into();
        assert!(p.allows_list());
        p.result_type = "List".into();
        assert!(!p.allows_list());
    }
}
