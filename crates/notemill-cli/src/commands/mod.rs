//! Command implementations for the notemill CLI.

mod list;
mod sync;

pub use list::execute as list;
pub use sync::execute as sync;

use anyhow::{Context, Result};
use notemill_core::{Config, Storage};
use std::path::Path;

/// Load configuration from an explicit path or the default location.
fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("failed to load config from {}", path.display())),
        None => Config::load().context("failed to load config"),
    }
}

/// Open snapshot storage, honoring a configured override path.
fn open_storage(config: &Config) -> Result<Storage> {
    match &config.snapshot.path {
        Some(path) => Ok(Storage::with_path(path.clone())),
        None => Storage::new().context("failed to locate snapshot directory"),
    }
}
