//! HTTP(S) getter.
//!
//! Streams a GET response into a scratch file next to the destination and
//! renames it into place on success. Directory fetches store the
//! resource under a derived file name inside `dst`, optionally after following
//! `X-Terraform-Get` alternate-source hops.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use super::alt_source::{self, find_source};
use super::filename::file_name_for;
use super::sink::BodySink;
use super::{open_with_mode, Getter, DEFAULT_FILE_MODE};
use crate::client::{ClientContext, ClientMode};
use crate::config::CfgfetchConfig;
use crate::error::GetError;
use crate::transport::{CurlTransport, Request, Response, Transport};

/// Name of the scratch file a directory fetch downloads into before renaming.
const PARTIAL_NAME: &str = ".cfgfetch.part";

/// Sibling scratch file a single-file fetch downloads into; `dst` is only
/// replaced once the transfer succeeded.
fn partial_path(dst: &Path) -> PathBuf {
    let name = dst
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    dst.with_file_name(format!(".{}{}", name, PARTIAL_NAME))
}

/// Construction-time options. Immutable once the getter is built.
#[derive(Debug, Clone)]
pub struct HttpGetterOptions {
    /// Look up credentials in `~/.netrc`.
    pub netrc: bool,
    /// Do not look for `X-Terraform-Get` on directory fetches.
    pub alt_source_header_disabled: bool,
    /// Cut response bodies after this many bytes.
    pub max_bytes: Option<u64>,
    pub connect_timeout: Duration,
    pub timeout: Duration,
    pub max_redirections: u32,
    pub user_agent: String,
    /// Extra headers sent with every request.
    pub headers: Vec<(String, String)>,
}

impl Default for HttpGetterOptions {
    fn default() -> Self {
        Self {
            netrc: false,
            alt_source_header_disabled: false,
            max_bytes: None,
            connect_timeout: Duration::from_secs(30),
            timeout: Duration::from_secs(300),
            max_redirections: 10,
            user_agent: concat!("cfgfetch/", env!("CARGO_PKG_VERSION")).to_string(),
            headers: Vec::new(),
        }
    }
}

impl From<&CfgfetchConfig> for HttpGetterOptions {
    fn from(cfg: &CfgfetchConfig) -> Self {
        Self {
            netrc: cfg.netrc,
            alt_source_header_disabled: cfg.alt_source_header_disabled,
            max_bytes: cfg.max_bytes,
            connect_timeout: Duration::from_secs(cfg.connect_timeout_secs),
            timeout: Duration::from_secs(cfg.timeout_secs),
            max_redirections: cfg.max_redirections,
            ..Self::default()
        }
    }
}

pub struct HttpGetter {
    options: HttpGetterOptions,
    transport: Arc<dyn Transport>,
    ctx: ClientContext,
}

impl Default for HttpGetter {
    fn default() -> Self {
        Self::new(HttpGetterOptions::default())
    }
}

impl HttpGetter {
    pub fn new(options: HttpGetterOptions) -> Self {
        Self {
            options,
            transport: Arc::new(CurlTransport::new()),
            ctx: ClientContext::default(),
        }
    }

    /// Replace the transport (tests, proxies).
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = transport;
        self
    }

    pub fn options(&self) -> &HttpGetterOptions {
        &self.options
    }

    pub fn context(&self) -> &ClientContext {
        &self.ctx
    }

    fn request<'a>(&'a self, url: &'a Url) -> Request<'a> {
        Request {
            url,
            headers: self.options.headers.clone(),
            netrc: self.options.netrc,
            connect_timeout: self.options.connect_timeout,
            timeout: self.options.timeout,
            max_redirections: self.options.max_redirections,
            user_agent: &self.options.user_agent,
            cancel: Some(&self.ctx.cancel),
        }
    }

    /// GET `url` into `path` (created/truncated). Returns the final response.
    fn download(&self, path: &Path, url: &Url) -> Result<Response, GetError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| GetError::io(parent, e))?;
        }
        let file = open_with_mode(path, self.ctx.file_mode(DEFAULT_FILE_MODE), true)?;
        let mut sink = BodySink::new(file, self.options.max_bytes);

        let resp = self.transport.execute(&self.request(url), &mut sink)?;
        if !resp.body_complete {
            if let Some(e) = sink.take_error() {
                return Err(GetError::io(path, e));
            }
            if !sink.limit_hit() {
                return Err(GetError::Transport(format!("transfer of {} stopped early", url)));
            }
            tracing::debug!(
                "body of {} cut at {:?} bytes",
                url,
                self.options.max_bytes
            );
        }
        if !resp.is_success() {
            return Err(GetError::Http {
                url: url.to_string(),
                status: resp.status,
            });
        }
        sink.flush().map_err(|e| GetError::io(path, e))?;
        Ok(resp)
    }

    /// [`Self::download`] into `partial`, removing it again on failure.
    fn download_partial(&self, partial: &Path, url: &Url) -> Result<Response, GetError> {
        self.download(partial, url).map_err(|e| {
            let _ = fs::remove_file(partial);
            e
        })
    }

    /// Follows `X-Terraform-Get` hops starting at `url` and returns the URL of
    /// the resource to download.
    fn resolve_source(&self, url: &Url) -> Result<Url, GetError> {
        let mut current = url.clone();
        for hop in 0..=alt_source::MAX_HOPS {
            let (resp, body) = {
                let mut req = self.request(&current);
                req.headers.push((alt_source::HEADER.to_string(), "1".to_string()));
                let limit = self
                    .options
                    .max_bytes
                    .map_or(alt_source::SCAN_BYTES, |m| m.min(alt_source::SCAN_BYTES));
                let mut sink = BodySink::new(Vec::new(), Some(limit));
                let resp = self.transport.execute(&req, &mut sink)?;
                (resp, sink.into_inner())
            };
            if !resp.is_success() {
                return Err(GetError::Http {
                    url: current.to_string(),
                    status: resp.status,
                });
            }

            let next = match find_source(&current, &resp, &body) {
                Some(next) => next,
                None if hop == 0 => return Err(GetError::NoSourceUrl(current.to_string())),
                None => return Ok(current),
            };
            tracing::debug!("{} points at {}", current, next);

            let scheme = next.scheme();
            if !matches!(scheme, "http" | "https") || !self.ctx.has_scheme(scheme) {
                return Err(GetError::UnsupportedSourceProtocol(scheme.to_string()));
            }
            current = next;
        }
        Err(GetError::TooManySourceHops(alt_source::MAX_HOPS))
    }
}

impl Getter for HttpGetter {
    fn set_client(&mut self, ctx: ClientContext) {
        self.ctx = ctx;
    }

    fn client_mode(&self, url: &Url) -> Result<ClientMode, GetError> {
        if url.path().ends_with('/') {
            Ok(ClientMode::Dir)
        } else {
            Ok(ClientMode::File)
        }
    }

    fn get(&self, dst: &Path, url: &Url) -> Result<(), GetError> {
        let source = if self.options.alt_source_header_disabled {
            url.clone()
        } else {
            self.resolve_source(url)?
        };

        fs::create_dir_all(dst).map_err(|e| GetError::io(dst, e))?;
        let partial = dst.join(PARTIAL_NAME);
        let resp = self.download_partial(&partial, &source)?;

        let name = file_name_for(&source, resp.header("content-disposition"));
        let target = dst.join(&name);
        fs::rename(&partial, &target).map_err(|e| GetError::io(&target, e))?;
        tracing::info!("fetched {} into {}", source, target.display());
        Ok(())
    }

    fn get_file(&self, dst: &Path, url: &Url) -> Result<(), GetError> {
        let partial = partial_path(dst);
        self.download_partial(&partial, url)?;
        fs::rename(&partial, dst).map_err(|e| GetError::io(dst, e))?;
        tracing::debug!("fetched {} to {}", url, dst.display());
        Ok(())
    }
}
