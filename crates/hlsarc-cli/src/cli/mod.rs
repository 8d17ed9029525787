//! CLI for the hlsarc HLS archiver.

mod commands;
mod prompt;

use anyhow::Result;
use clap::{Parser, Subcommand};
use hlsarc_core::config::{self, ArchiveConfig};
use std::path::{Path, PathBuf};

use commands::{run_completions, run_fetch, run_inspect, run_man, run_resume, run_status};

/// Top-level CLI for the hlsarc archiver.
#[derive(Debug, Parser)]
#[command(name = "hlsarc", version)]
#[command(about = "hlsarc: archive HLS streams for offline playback", long_about = None)]
pub struct Cli {
    /// Config file to use instead of ~/.config/hlsarc/config.toml.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Archive a stream: walk its manifests, render them and download every resource.
    Fetch {
        /// URL of the master or media playlist.
        url: String,
        /// Task directory name under the save root.
        task_name: String,
        /// Pick variant N (0-based) of a master playlist instead of prompting.
        #[arg(long, value_name = "N")]
        variant: Option<usize>,
        /// Download up to N resources concurrently (default from config).
        #[arg(long, value_name = "N")]
        jobs: Option<usize>,
        /// Only fetch and render manifests.
        #[arg(long)]
        no_download: bool,
    },

    /// Download whatever is still missing from an existing task.
    Resume {
        /// Task directory name under the save root.
        task_name: String,
        /// Download up to N resources concurrently (default from config).
        #[arg(long, value_name = "N")]
        jobs: Option<usize>,
    },

    /// Show registered and downloaded resource counts of a task.
    Status {
        /// Task directory name under the save root.
        task_name: String,
    },

    /// Parse a local manifest and print its class and resolved URIs.
    Inspect {
        /// Path to the manifest file.
        path: PathBuf,
        /// URL the manifest was retrieved from (default: its file:// URL).
        #[arg(long, value_name = "URL")]
        base_url: Option<String>,
    },

    /// Print a shell completion script.
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },

    /// Print the man page.
    Man,
}

fn load_config(path: Option<&Path>) -> Result<ArchiveConfig> {
    let cfg = match path {
        Some(p) => config::load_from_path(p)?,
        None => config::load_or_init()?,
    };
    tracing::debug!("loaded config: {:?}", cfg);
    Ok(cfg)
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let config_path = cli.config.as_deref();

        match cli.command {
            CliCommand::Fetch {
                url,
                task_name,
                variant,
                jobs,
                no_download,
            } => {
                let cfg = load_config(config_path)?;
                run_fetch(&cfg, &url, &task_name, variant, jobs, no_download).await?;
            }
            CliCommand::Resume { task_name, jobs } => {
                let cfg = load_config(config_path)?;
                run_resume(&cfg, &task_name, jobs).await?;
            }
            CliCommand::Status { task_name } => {
                let cfg = load_config(config_path)?;
                run_status(&cfg, &task_name)?;
            }
            CliCommand::Inspect { path, base_url } => run_inspect(&path, base_url.as_deref())?,
            CliCommand::Completions { shell } => run_completions(shell),
            CliCommand::Man => run_man()?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
