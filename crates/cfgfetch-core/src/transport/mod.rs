//! HTTP transport seam used by `HttpGetter`.
//!
//! The getter never talks to libcurl directly; it builds a `Request` and hands
//! it to a `Transport`. `CurlTransport` is the production implementation;
//! tests and proxies inject their own.

mod curl_transport;
mod headers;

pub use curl_transport::CurlTransport;

use std::io::Write;
use std::time::Duration;
use url::Url;

use crate::control::CancelToken;
use crate::error::GetError;

/// One GET exchange as the getter wants it performed.
#[derive(Debug, Clone)]
pub struct Request<'a> {
    pub url: &'a Url,
    /// Extra request headers (name, value).
    pub headers: Vec<(String, String)>,
    /// Look up credentials for the host in `~/.netrc`.
    pub netrc: bool,
    pub connect_timeout: Duration,
    pub timeout: Duration,
    pub max_redirections: u32,
    pub user_agent: &'a str,
    /// Polled during the transfer; a set token aborts with `GetError::Cancelled`.
    pub cancel: Option<&'a CancelToken>,
}

/// Status and headers of the final response (after redirects).
#[derive(Debug, Clone, Default)]
pub struct Response {
    pub status: u32,
    pub headers: Vec<(String, String)>,
    /// False when the body sink refused data and the transfer was stopped early.
    /// The sink knows why (byte limit or local write failure).
    pub body_complete: bool,
}

impl Response {
    /// Case-insensitive header lookup; the first match wins.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Performs a request, streaming the response body into `body`.
///
/// If `body` returns an error the transfer is stopped and the response is still
/// returned with `body_complete == false`. Network failures and cancellation are
/// returned as errors.
pub trait Transport: Send + Sync {
    fn execute(&self, req: &Request<'_>, body: &mut dyn Write) -> Result<Response, GetError>;
}
