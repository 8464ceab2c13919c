//! # notemill-core
//!
//! Core functionality for notemill - flattening a Notion workspace into a
//! stable, indexable set of text entries.
//!
//! A sync walks every page the integration can see, folds each page's
//! block tree into flat text entries that carry their nearest heading as
//! inline context, and reconciles the result against the previous run's
//! snapshot so that unchanged content keeps a stable id. Downstream
//! consumers (embedding pipelines, search indexers) can use the id to
//! skip re-deriving artifacts for content that did not change.
//!
//! ## Architecture
//!
//! - **Fetching**: async client for the workspace API with cursor-driven
//!   pagination ([`NotionFetcher`])
//! - **Flattening**: heading-context fold over each page's block tree
//!   ([`flatten`])
//! - **Reconciliation**: content-keyed stable-id assignment
//!   ([`reconcile`])
//! - **Storage**: JSONL snapshots, optionally gzipped ([`Storage`])
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use notemill_core::{Config, NotionFetcher, Storage, sync_workspace};
//!
//! # async fn run() -> notemill_core::Result<()> {
//! let config = Config::load()?;
//! let fetcher = NotionFetcher::new(&config.token()?)?;
//! let storage = Storage::new()?;
//!
//! let outcome = sync_workspace(&fetcher, &storage, config.sync.concurrency).await?;
//! println!("{} entries ({} unchanged)", outcome.entries, outcome.carried);
//! # Ok(())
//! # }
//! ```

/// Configuration loading and defaults
pub mod config;
/// Error types and result aliases
pub mod error;
/// HTTP client for the workspace API
pub mod fetcher;
/// Block-tree flattening with heading context
pub mod flatten;
/// The end-to-end sync pipeline
pub mod ingest;
/// Stable-id reconciliation against the previous snapshot
pub mod reconcile;
/// Snapshot persistence
pub mod storage;
/// Core data types
pub mod types;

// Re-export commonly used types
pub use config::{Config, NotionConfig, SnapshotConfig, SyncConfig};
pub use error::{Error, Result};
pub use fetcher::NotionFetcher;
pub use flatten::{BlockSource, PageContext, flatten_page, heading_marker, serialize_run};
pub use ingest::{SnapshotStore, SyncOutcome, sync_workspace};
pub use reconcile::reconcile;
pub use storage::Storage;
pub use types::*;
