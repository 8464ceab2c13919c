//! CLI structure and argument parsing.
//!
//! The CLI follows a standard command-subcommand pattern: global options
//! (`--verbose`, `--debug`, `--quiet`, `--config`) apply to every command,
//! and each subcommand maps to one operation.
//!
//! ```bash
//! # Pull the workspace and write the snapshot
//! notemill sync
//! notemill sync --concurrency 8
//!
//! # Inspect the current snapshot
//! notemill list
//! notemill list --json
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Main CLI structure for the `notemill` command.
#[derive(Parser, Clone, Debug)]
#[command(name = "notemill")]
#[command(version)]
#[command(
    about = "notemill - Notion workspace ingestion into JSONL snapshots",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging output
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Suppress informational messages (only show errors)
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,

    /// Enable debug-level logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Path to configuration file (overrides autodiscovery). Also via `NOTEMILL_CONFIG`.
    #[arg(long, global = true, value_name = "FILE", env = "NOTEMILL_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Available subcommands for the `notemill` CLI.
#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Pull every page from the workspace and write the snapshot
    Sync {
        /// Number of pages fetched concurrently (overrides config)
        #[arg(long, value_name = "N")]
        concurrency: Option<usize>,
    },

    /// Show the entries in the current snapshot
    #[command(alias = "ls")]
    List {
        /// Emit the snapshot as JSON instead of formatted text
        #[arg(long)]
        json: bool,
    },
}
