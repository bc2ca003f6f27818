use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Global configuration loaded from `~/.config/cfgfetch/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CfgfetchConfig {
    /// Look up HTTP credentials in `~/.netrc`.
    pub netrc: bool,
    /// Ignore `X-Terraform-Get` headers / meta tags on directory fetches.
    pub alt_source_header_disabled: bool,
    /// Stop reading a response body after this many bytes (None = no cap).
    #[serde(default)]
    pub max_bytes: Option<u64>,
    /// Permission bits for created files, e.g. 0o644 (None = 0o666 before umask).
    #[serde(default)]
    pub file_mode: Option<u32>,
    pub connect_timeout_secs: u64,
    /// Whole-transfer timeout.
    pub timeout_secs: u64,
    pub max_redirections: u32,
}

impl Default for CfgfetchConfig {
    fn default() -> Self {
        Self {
            netrc: true,
            alt_source_header_disabled: true,
            max_bytes: None,
            file_mode: None,
            connect_timeout_secs: 30,
            timeout_secs: 300,
            max_redirections: 10,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("cfgfetch")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<CfgfetchConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = CfgfetchConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: CfgfetchConfig = toml::from_str(&data)?;
    Ok(cfg)
}
