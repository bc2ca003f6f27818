//! libcurl-backed transport (curl crate, `Easy` handle per request).

use ::curl::easy::{Easy, List, NetRc};
use std::io::{self, Write};
use std::str;

use super::headers::parse_header_lines;
use super::{Request, Response, Transport};
use crate::error::GetError;

/// Default transport: one blocking `curl::easy::Easy` per request.
///
/// Runs in the current thread. Redirects are followed by libcurl itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct CurlTransport;

impl CurlTransport {
    pub fn new() -> Self {
        CurlTransport
    }
}

fn curl_err(e: ::curl::Error) -> GetError {
    GetError::Transport(e.to_string())
}

impl Transport for CurlTransport {
    fn execute(&self, req: &Request<'_>, body: &mut dyn Write) -> Result<Response, GetError> {
        if req.cancel.is_some_and(|c| c.is_cancelled()) {
            return Err(GetError::Cancelled);
        }

        let mut easy = Easy::new();
        easy.url(req.url.as_str()).map_err(curl_err)?;
        easy.get(true).map_err(curl_err)?;
        easy.follow_location(true).map_err(curl_err)?;
        easy.max_redirections(req.max_redirections).map_err(curl_err)?;
        easy.connect_timeout(req.connect_timeout).map_err(curl_err)?;
        easy.timeout(req.timeout).map_err(curl_err)?;
        easy.useragent(req.user_agent).map_err(curl_err)?;
        if req.netrc {
            easy.netrc(NetRc::Optional).map_err(curl_err)?;
        }

        let mut list = List::new();
        for (k, v) in &req.headers {
            list.append(&format!("{}: {}", k.trim(), v.trim()))
                .map_err(curl_err)?;
        }
        if !req.headers.is_empty() {
            easy.http_headers(list).map_err(curl_err)?;
        }
        // Progress callbacks are only needed to poll the cancel token.
        easy.progress(req.cancel.is_some()).map_err(curl_err)?;

        let mut lines: Vec<String> = Vec::new();
        let mut sink_failed: Option<io::Error> = None;
        let result = {
            let mut transfer = easy.transfer();
            transfer
                .header_function(|data| {
                    if let Ok(s) = str::from_utf8(data) {
                        lines.push(s.trim_end().to_string());
                    }
                    true
                })
                .map_err(curl_err)?;
            transfer
                .write_function(|data| match body.write_all(data) {
                    Ok(()) => Ok(data.len()),
                    Err(e) => {
                        sink_failed = Some(e);
                        Ok(0) // abort transfer
                    }
                })
                .map_err(curl_err)?;
            if let Some(cancel) = req.cancel {
                transfer
                    .progress_function(move |_, _, _, _| !cancel.is_cancelled())
                    .map_err(curl_err)?;
            }
            transfer.perform()
        };

        let body_complete = match result {
            Ok(()) => true,
            Err(e) if e.is_aborted_by_callback() => return Err(GetError::Cancelled),
            Err(e) if e.is_write_error() && sink_failed.is_some() => {
                tracing::debug!(
                    "body sink stopped transfer of {}: {:?}",
                    req.url,
                    sink_failed
                );
                false
            }
            Err(e) => return Err(curl_err(e)),
        };

        let status = easy.response_code().map_err(curl_err)?;
        Ok(Response {
            status,
            headers: parse_header_lines(&lines),
            body_complete,
        })
    }
}
