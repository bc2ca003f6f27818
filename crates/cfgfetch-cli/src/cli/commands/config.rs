//! `cfgfetch config` – print config path and values.

use anyhow::Result;
use cfgfetch_core::config::{self, CfgfetchConfig};

pub fn run_config(cfg: &CfgfetchConfig) -> Result<()> {
    println!("# {}", config::config_path()?.display());
    print!("{}", toml_lines(cfg)?);
    Ok(())
}

fn toml_lines(cfg: &CfgfetchConfig) -> Result<String> {
    Ok(toml::to_string_pretty(cfg)?)
}
