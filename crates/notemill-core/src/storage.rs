//! Snapshot persistence: line-delimited JSON, optionally gzip-compressed.
//!
//! The snapshot is the system's only durable artifact: one JSON object per
//! line, one line per [`IndexedEntry`], in reconciled order. A path ending
//! in `.gz` is transparently compressed. A sidecar `<name>.meta.json`
//! records when the snapshot was taken, its checksum, and its counts.

use crate::{Error, IndexedEntry, Result, SnapshotMeta};
use base64::{Engine, engine::general_purpose::STANDARD};
use directories::ProjectDirs;
use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Default snapshot file name under the platform data directory.
const DEFAULT_SNAPSHOT_FILE: &str = "snapshot.jsonl.gz";

/// Local filesystem storage for the entry snapshot.
pub struct Storage {
    snapshot_path: PathBuf,
}

impl Storage {
    /// Creates storage rooted at the platform data directory.
    ///
    /// `NOTEMILL_DATA_DIR` overrides the root explicitly (used by tests
    /// and containerized runs).
    pub fn new() -> Result<Self> {
        let root = if let Ok(dir) = std::env::var("NOTEMILL_DATA_DIR") {
            PathBuf::from(dir)
        } else {
            ProjectDirs::from("", "", "notemill")
                .ok_or_else(|| Error::Storage("failed to determine data directory".into()))?
                .data_dir()
                .to_path_buf()
        };
        Ok(Self::with_path(root.join(DEFAULT_SNAPSHOT_FILE)))
    }

    /// Creates storage writing the snapshot at an explicit path.
    #[must_use]
    pub const fn with_path(snapshot_path: PathBuf) -> Self {
        Self { snapshot_path }
    }

    /// The snapshot file location.
    #[must_use]
    pub fn snapshot_path(&self) -> &Path {
        &self.snapshot_path
    }

    fn meta_path(&self) -> PathBuf {
        let mut name = self
            .snapshot_path
            .file_name()
            .map_or_else(|| "snapshot".to_string(), |n| n.to_string_lossy().into());
        name.push_str(".meta.json");
        self.snapshot_path.with_file_name(name)
    }

    fn is_gzip(&self) -> bool {
        self.snapshot_path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("gz"))
    }

    /// Persists the reconciled entry set, replacing any previous snapshot.
    ///
    /// The sidecar metadata is written after the snapshot so a readable
    /// snapshot always has at-least-as-fresh metadata next to it.
    pub fn save_snapshot(&self, entries: &[IndexedEntry]) -> Result<()> {
        let mut body = String::new();
        for entry in entries {
            body.push_str(&serde_json::to_string(entry)?);
            body.push('\n');
        }

        if let Some(parent) = self.snapshot_path.parent() {
            fs::create_dir_all(parent)?;
        }

        if self.is_gzip() {
            let file = fs::File::create(&self.snapshot_path)?;
            let mut encoder = GzEncoder::new(file, Compression::default());
            encoder.write_all(body.as_bytes())?;
            encoder.finish()?;
        } else {
            fs::write(&self.snapshot_path, &body)?;
        }

        let pages: HashSet<&str> = entries.iter().map(|e| e.entry.file.as_str()).collect();
        let meta = SnapshotMeta {
            fetched_at: chrono::Utc::now(),
            sha256: checksum(&body),
            entry_count: entries.len(),
            page_count: pages.len(),
        };
        fs::write(self.meta_path(), serde_json::to_string_pretty(&meta)?)?;

        info!(
            entries = entries.len(),
            pages = pages.len(),
            path = %self.snapshot_path.display(),
            "saved snapshot"
        );
        Ok(())
    }

    /// Loads the previous snapshot, or `None` on the first run.
    pub fn load_snapshot(&self) -> Result<Option<Vec<IndexedEntry>>> {
        if !self.snapshot_path.exists() {
            debug!(path = %self.snapshot_path.display(), "no previous snapshot");
            return Ok(None);
        }

        let body = if self.is_gzip() {
            let file = fs::File::open(&self.snapshot_path)?;
            let mut decoder = GzDecoder::new(file);
            let mut body = String::new();
            decoder.read_to_string(&mut body)?;
            body
        } else {
            fs::read_to_string(&self.snapshot_path)?
        };

        let mut entries = Vec::new();
        for (line_no, line) in body.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let entry: IndexedEntry = serde_json::from_str(line).map_err(|e| {
                Error::Serialization(format!("snapshot line {}: {e}", line_no + 1))
            })?;
            entries.push(entry);
        }

        debug!(entries = entries.len(), "loaded previous snapshot");
        Ok(Some(entries))
    }

    /// Loads the sidecar metadata, when present.
    pub fn load_meta(&self) -> Result<Option<SnapshotMeta>> {
        let path = self.meta_path();
        if !path.exists() {
            return Ok(None);
        }
        let meta = serde_json::from_str(&fs::read_to_string(path)?)?;
        Ok(Some(meta))
    }
}

fn checksum(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    STANDARD.encode(hasher.finalize())
}
