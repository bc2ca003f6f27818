//! CLI for cfgfetch.

mod commands;

use anyhow::Result;
use cfgfetch_core::client::ClientMode;
use cfgfetch_core::config;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use commands::{run_config, run_get};

/// Top-level CLI for cfgfetch.
#[derive(Debug, Parser)]
#[command(name = "cfgfetch")]
#[command(about = "Fetch files over HTTP and extract YAML fragments", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

/// Destination kind for `get`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    Any,
    File,
    Dir,
}

impl From<ModeArg> for ClientMode {
    fn from(m: ModeArg) -> Self {
        match m {
            ModeArg::Any => ClientMode::Any,
            ModeArg::File => ClientMode::File,
            ModeArg::Dir => ClientMode::Dir,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Fetch SRC into DST. Query parameters `xpath`, `format`, `type` and
    /// `newkey` on SRC select a YAML fragment to keep.
    Get {
        /// Source URL (http or https).
        src: String,
        /// Destination file (or directory with --mode dir).
        dst: PathBuf,
        /// Treat DST as a file, a directory, or decide from the URL.
        #[arg(long, value_enum, default_value = "any")]
        mode: ModeArg,
    },

    /// Show the config file location and effective settings.
    Config,
}

impl Cli {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Get { src, dst, mode } => run_get(&cfg, &src, dst, mode.into())?,
            CliCommand::Config => run_config(&cfg)?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
