//! `cfgfetch get <src> <dst>` – fetch one source.

use anyhow::{Context, Result};
use cfgfetch_core::client::{Client, ClientMode};
use cfgfetch_core::config::CfgfetchConfig;
use std::path::PathBuf;

pub fn run_get(cfg: &CfgfetchConfig, src: &str, dst: PathBuf, mode: ClientMode) -> Result<()> {
    let mut client = Client::with_default_getters(src, dst, cfg);
    client.mode = mode;
    client.pwd = Some(std::env::current_dir()?);
    client
        .get()
        .with_context(|| format!("fetching {}", src))?;
    println!("Fetched {} -> {}", src, client.dst.display());
    Ok(())
}
