//! The sync pipeline shared by CLI and library consumers.
//!
//! One sync walks the whole workspace: search for pages, flatten each
//! page's block tree into entries, aggregate in page-arrival order,
//! reconcile against the previous snapshot, persist. Pages are
//! independent, so fetch+flatten runs with bounded concurrency, but the
//! `buffered` combinator yields results in input order, which keeps the
//! aggregated sequence (and therefore reconciliation) deterministic.
//!
//! A page whose metadata or children cannot be fetched is skipped with a
//! warning; only a failing workspace search aborts the run. Reconciliation
//! and persistence happen once, over the fully aggregated set.

use crate::flatten::{BlockSource, PageContext, flatten_page};
use crate::{Entry, IndexedEntry, NotionFetcher, ObjectKind, Page, Result, Storage, reconcile};
use futures::stream::{self, StreamExt};
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Abstraction over snapshot persistence used by the pipeline.
pub trait SnapshotStore {
    /// The previous run's snapshot, or `None` on first run.
    fn load_previous(&self) -> Result<Option<Vec<IndexedEntry>>>;
    /// Persist the reconciled entry set.
    fn save(&self, entries: &[IndexedEntry]) -> Result<()>;
}

impl SnapshotStore for Storage {
    fn load_previous(&self) -> Result<Option<Vec<IndexedEntry>>> {
        self.load_snapshot()
    }

    fn save(&self, entries: &[IndexedEntry]) -> Result<()> {
        self.save_snapshot(entries)
    }
}

/// Summary of one completed sync.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOutcome {
    /// Pages flattened successfully.
    pub pages: usize,
    /// Pages skipped because fetching or parsing them failed.
    pub pages_failed: usize,
    /// Database records skipped up front.
    pub databases: usize,
    /// Total entries in the new snapshot.
    pub entries: usize,
    /// Distinct ids carried over from the previous snapshot.
    pub carried: usize,
    /// Entries that received a fresh id.
    pub fresh: usize,
}

/// Run a full workspace sync.
pub async fn sync_workspace<S>(
    fetcher: &NotionFetcher,
    store: &S,
    concurrency: usize,
) -> Result<SyncOutcome>
where
    S: SnapshotStore + Sync,
{
    let records = fetcher.search_pages().await?;

    let mut pages = Vec::new();
    let mut databases = 0usize;
    for record in records {
        match record.object {
            ObjectKind::Page => pages.push(record),
            ObjectKind::Database => {
                debug!(id = %record.id, "skipping database record");
                databases += 1;
            },
            ObjectKind::Unknown => {
                debug!(id = %record.id, "skipping record of unknown kind");
            },
        }
    }

    let results: Vec<Option<Vec<Entry>>> = stream::iter(pages)
        .map(|page| async move {
            match process_page(fetcher, &page).await {
                Ok(entries) => Some(entries),
                Err(e) => {
                    warn!(page = %page.id, error = %e, "skipping page");
                    None
                },
            }
        })
        .buffered(concurrency.max(1))
        .collect()
        .await;

    let mut current = Vec::new();
    let mut processed = 0usize;
    let mut failed = 0usize;
    for page_entries in results {
        match page_entries {
            Some(entries) => {
                processed += 1;
                current.extend(entries);
            },
            None => failed += 1,
        }
    }

    let previous = store.load_previous()?.unwrap_or_default();
    let previous_ids: HashSet<u64> = previous.iter().map(|e| e.id).collect();

    let reconciled = reconcile(current, &previous);
    // Duplicate compiled text shares one previous id, so carried counts
    // distinct ids, not entries.
    let carried_ids: HashSet<u64> = reconciled
        .iter()
        .map(|e| e.id)
        .filter(|id| previous_ids.contains(id))
        .collect();
    let carried = carried_ids.len();
    let fresh = reconciled
        .iter()
        .filter(|e| !previous_ids.contains(&e.id))
        .count();

    store.save(&reconciled)?;

    let outcome = SyncOutcome {
        pages: processed,
        pages_failed: failed,
        databases,
        entries: reconciled.len(),
        carried,
        fresh,
    };
    info!(
        pages = outcome.pages,
        skipped = outcome.pages_failed,
        entries = outcome.entries,
        carried = outcome.carried,
        fresh = outcome.fresh,
        "sync complete"
    );
    Ok(outcome)
}

/// Fetch one page's title and top-level blocks, then flatten them.
async fn process_page(fetcher: &NotionFetcher, page: &Page) -> Result<Vec<Entry>> {
    let title = fetcher.page_title(&page.id).await?;
    let blocks = BlockSource::block_children(fetcher, &page.id).await?;

    let ctx = PageContext {
        title,
        url: page.url.clone(),
    };
    flatten_page(fetcher, &ctx, &blocks).await
}
