//! Configuration for notemill syncs.
//!
//! TOML config loaded from the platform config directory (or an explicit
//! path), with defaults when no file exists. The integration token can be
//! supplied via the `NOTION_TOKEN` environment variable instead of being
//! written to disk.
//!
//! ```toml
//! [notion]
//! token = "secret_..."        # or set NOTION_TOKEN
//! page_size = 100
//!
//! [sync]
//! concurrency = 4
//!
//! [snapshot]
//! path = "/var/lib/notemill/snapshot.jsonl.gz"
//! ```

use crate::{Error, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Workspace API settings.
    pub notion: NotionConfig,
    /// Sync pipeline settings.
    pub sync: SyncConfig,
    /// Snapshot output settings.
    pub snapshot: SnapshotConfig,
}

/// Workspace API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotionConfig {
    /// Integration token. `NOTION_TOKEN` in the environment wins.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// API base URL; overridable for self-hosted proxies and tests.
    pub api_url: String,
    /// Search page size per request.
    pub page_size: u32,
}

impl Default for NotionConfig {
    fn default() -> Self {
        Self {
            token: None,
            api_url: "https://api.notion.com".to_string(),
            page_size: 100,
        }
    }
}

/// Sync pipeline settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// How many pages are fetched and flattened at a time. Output order is
    /// unaffected.
    pub concurrency: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self { concurrency: 4 }
    }
}

/// Snapshot output settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotConfig {
    /// Snapshot file path; a `.gz` suffix enables compression. Defaults to
    /// the platform data directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from the default location, or defaults when no
    /// file exists.
    pub fn load() -> Result<Self> {
        let path = Self::default_path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;
        Ok(toml::from_str(&content)?)
    }

    /// Save configuration to an explicit path.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Default config file location, honoring `NOTEMILL_CONFIG_DIR`.
    pub fn default_path() -> Result<PathBuf> {
        if let Ok(dir) = std::env::var("NOTEMILL_CONFIG_DIR") {
            let trimmed = dir.trim();
            if !trimmed.is_empty() {
                return Ok(PathBuf::from(trimmed).join("config.toml"));
            }
        }
        let dirs = ProjectDirs::from("", "", "notemill")
            .ok_or_else(|| Error::Config("failed to determine config directory".into()))?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Resolve the integration token: environment first, then config.
    pub fn token(&self) -> Result<String> {
        if let Ok(token) = std::env::var("NOTION_TOKEN") {
            if !token.trim().is_empty() {
                return Ok(token);
            }
        }
        self.notion
            .token
            .clone()
            .ok_or_else(|| Error::Config("no API token: set NOTION_TOKEN or [notion].token".into()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_are_sensible() {
        let config = Config::default();
        assert_eq!(config.notion.api_url, "https://api.notion.com");
        assert_eq!(config.notion.page_size, 100);
        assert_eq!(config.sync.concurrency, 4);
        assert!(config.snapshot.path.is_none());
    }

    #[test]
    fn round_trips_through_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.notion.token = Some("secret".into());
        config.sync.concurrency = 2;
        config.snapshot.path = Some(PathBuf::from("/tmp/snap.jsonl"));

        config.save(&path).unwrap();
        let loaded = Config::load_from(&path).unwrap();

        assert_eq!(loaded.notion.token.as_deref(), Some("secret"));
        assert_eq!(loaded.sync.concurrency, 2);
        assert_eq!(loaded.snapshot.path, Some(PathBuf::from("/tmp/snap.jsonl")));
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let config: Config = toml::from_str("[notion]\npage_size = 25\n").unwrap();
        assert_eq!(config.notion.page_size, 25);
        assert_eq!(config.sync.concurrency, 4);
    }

    #[test]
    fn missing_token_is_a_config_error() {
        // Only meaningful when the environment doesn't leak a token in.
        if std::env::var("NOTION_TOKEN").is_ok() {
            return;
        }
        let config = Config::default();
        assert!(matches!(config.token(), Err(Error::Config(_))));
    }

    #[test]
    fn config_token_is_used_when_env_is_absent() {
        if std::env::var("NOTION_TOKEN").is_ok() {
            return;
        }
        let mut config = Config::default();
        config.notion.token = Some("from-file".into());
        assert_eq!(config.token().unwrap(), "from-file");
    }
}
