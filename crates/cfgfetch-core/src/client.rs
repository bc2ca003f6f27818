//! Multi-scheme fetch client.
//!
//! Holds one getter per URL scheme, binds its own context into the selected
//! getter and dispatches to a file or directory fetch.

use std::collections::HashMap;
use std::path::PathBuf;
use url::Url;

use crate::config::CfgfetchConfig;
use crate::control::CancelToken;
use crate::error::GetError;
use crate::extract::ExtractGetter;
use crate::getter::{Getter, HttpGetter, HttpGetterOptions};

/// What kind of destination a fetch produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClientMode {
    /// Ask the getter (`Getter::client_mode`).
    #[default]
    Any,
    File,
    Dir,
}

/// Context a client hands to a getter via `Getter::set_client`.
#[derive(Debug, Clone, Default)]
pub struct ClientContext {
    pub cancel: CancelToken,
    /// Working directory of the owning client, if any.
    pub pwd: Option<PathBuf>,
    /// Permission bits for created files; `None` means the getter default.
    pub file_mode: Option<u32>,
    /// Schemes the owning client has getters for. Empty when unbound.
    pub schemes: Vec<String>,
}

impl ClientContext {
    pub fn file_mode(&self, default: u32) -> u32 {
        self.file_mode.unwrap_or(default)
    }

    /// Whether the owning client could fetch a URL with this scheme.
    /// An unbound context accepts anything.
    pub fn has_scheme(&self, scheme: &str) -> bool {
        self.schemes.is_empty() || self.schemes.iter().any(|s| s == scheme)
    }
}

/// Fetches `src` into `dst` using the getter registered for the source scheme.
pub struct Client {
    pub src: String,
    pub dst: PathBuf,
    pub mode: ClientMode,
    pub pwd: Option<PathBuf>,
    pub file_mode: Option<u32>,
    pub cancel: CancelToken,
    getters: HashMap<String, Box<dyn Getter>>,
}

impl Client {
    pub fn new(src: impl Into<String>, dst: impl Into<PathBuf>) -> Self {
        Self {
            src: src.into(),
            dst: dst.into(),
            mode: ClientMode::Any,
            pwd: None,
            file_mode: None,
            cancel: CancelToken::new(),
            getters: HashMap::new(),
        }
    }

    /// Client with an extracting HTTP getter registered for `http` and `https`,
    /// configured from `cfg`.
    pub fn with_default_getters(
        src: impl Into<String>,
        dst: impl Into<PathBuf>,
        cfg: &CfgfetchConfig,
    ) -> Self {
        let mut client = Self::new(src, dst);
        client.file_mode = cfg.file_mode;
        let options = HttpGetterOptions::from(cfg);
        for scheme in ["http", "https"] {
            let getter = ExtractGetter::with_delegate(HttpGetter::new(options.clone()));
            client.register(scheme, Box::new(getter));
        }
        client
    }

    /// Register (or replace) the getter for `scheme`.
    pub fn register(&mut self, scheme: &str, getter: Box<dyn Getter>) {
        self.getters.insert(scheme.to_ascii_lowercase(), getter);
    }

    pub fn context(&self) -> ClientContext {
        let mut schemes: Vec<String> = self.getters.keys().cloned().collect();
        schemes.sort();
        ClientContext {
            cancel: self.cancel.clone(),
            pwd: self.pwd.clone(),
            file_mode: self.file_mode,
            schemes,
        }
    }

    /// Run the fetch.
    pub fn get(&mut self) -> Result<(), GetError> {
        let url = Url::parse(&self.src).map_err(|source| GetError::InvalidUrl {
            url: self.src.clone(),
            source,
        })?;
        let dst = match (&self.pwd, self.dst.is_relative()) {
            (Some(pwd), true) => pwd.join(&self.dst),
            _ => self.dst.clone(),
        };

        let ctx = self.context();
        let getter = self
            .getters
            .get_mut(url.scheme())
            .ok_or_else(|| GetError::NoGetter(url.scheme().to_string()))?;
        getter.set_client(ctx);

        let mode = match self.mode {
            ClientMode::Any => getter.client_mode(&url)?,
            m => m,
        };
        tracing::debug!("fetching {} into {} ({:?})", url, dst.display(), mode);

        match mode {
            ClientMode::Dir => getter.get(&dst, &url),
            _ => getter.get_file(&dst, &url),
        }
    }
}
