//! Error type shared by getters, the extraction stage and the client.

use std::path::PathBuf;
use thiserror::Error;

use crate::yamlpath::YamlPathError;

/// Everything a fetch can fail with.
///
/// Delegate errors (`Transport`, `Http`, `Cancelled`, ...) are passed through the
/// extraction stage untouched; the extraction stage only adds the variants from
/// `UnsupportedFormat` downwards.
#[derive(Debug, Error)]
pub enum GetError {
    /// libcurl (or an injected transport) failed before a response was complete.
    #[error("transport error: {0}")]
    Transport(String),

    /// Server answered with a non-2xx status.
    #[error("bad response code: {status} ({url})")]
    Http { url: String, status: u32 },

    /// The owning client's cancel token was set during the transfer.
    #[error("fetch cancelled")]
    Cancelled,

    /// Directory fetch found no alternate-source header or meta tag.
    #[error("no source URL was returned for {0}")]
    NoSourceUrl(String),

    #[error("no getter available for X-Terraform-Get source protocol: {0}")]
    UnsupportedSourceProtocol(String),

    #[error("too many X-Terraform-Get hops (limit {0})")]
    TooManySourceHops(usize),

    #[error("no getter registered for scheme {0:?}")]
    NoGetter(String),

    #[error("invalid source URL {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// Opening, reading or writing a local file failed.
    #[error("file error ({}): {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported format {0}")]
    UnsupportedFormat(String),

    #[error("cannot parse data from file ({}): {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("cannot create path: {0}")]
    Path(#[from] YamlPathError),

    #[error("unexpected result: more elements than 1: {0}")]
    TooManyResults(usize),

    #[error("cannot serialize node: {0}")]
    Serialize(#[source] serde_yaml::Error),
}

impl GetError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GetError::Io {
            path: path.into(),
            source,
        }
    }
}
