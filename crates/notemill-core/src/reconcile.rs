//! Identity-preserving reconciliation against the previous snapshot.
//!
//! Matching is by content identity: the `compiled` text is the key. An
//! entry whose compiled text existed in the previous snapshot keeps that
//! snapshot's id regardless of where it moved; everything else gets a
//! fresh id drawn from past the previous maximum, so ids are never
//! reused. Previous entries with no current match are dropped.

use crate::{Entry, IndexedEntry};
use std::collections::HashMap;
use tracing::debug;

/// Assigns stable ids to the freshly built entry set.
///
/// With an empty `previous` (first run) ids are `0..n` in current order.
/// Output order always equals `current` order, which is what makes the
/// downstream snapshot deterministic.
#[must_use]
pub fn reconcile(current: Vec<Entry>, previous: &[IndexedEntry]) -> Vec<IndexedEntry> {
    if previous.is_empty() {
        return current
            .into_iter()
            .zip(0u64..)
            .map(|(entry, id)| IndexedEntry { id, entry })
            .collect();
    }

    // First occurrence wins when the previous snapshot holds duplicates.
    let mut by_compiled: HashMap<&str, u64> = HashMap::with_capacity(previous.len());
    for prev in previous {
        by_compiled
            .entry(prev.entry.compiled.as_str())
            .or_insert(prev.id);
    }

    let mut next_id = previous.iter().map(|p| p.id).max().map_or(0, |max| max + 1);
    let mut carried = 0usize;

    let reconciled: Vec<IndexedEntry> = current
        .into_iter()
        .map(|entry| {
            let id = if let Some(&id) = by_compiled.get(entry.compiled.as_str()) {
                carried += 1;
                id
            } else {
                let fresh = next_id;
                next_id += 1;
                fresh
            };
            IndexedEntry { id, entry }
        })
        .collect();

    debug!(
        carried,
        fresh = reconciled.len() - carried,
        dropped = previous.len().saturating_sub(carried),
        "reconciled entry set"
    );

    reconciled
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn entry(compiled: &str) -> Entry {
        Entry {
            raw: compiled.to_string(),
            compiled: compiled.to_string(),
            heading: "Page".into(),
            file: "https://notion.so/page".into(),
        }
    }

    fn indexed(id: u64, compiled: &str) -> IndexedEntry {
        IndexedEntry {
            id,
            entry: entry(compiled),
        }
    }

    fn ids(entries: &[IndexedEntry]) -> Vec<u64> {
        entries.iter().map(|e| e.id).collect()
    }

    #[test]
    fn first_run_assigns_sequential_ids() {
        let current = vec![entry("x"), entry("y"), entry("z")];
        let out = reconcile(current, &[]);

        assert_eq!(ids(&out), vec![0, 1, 2]);
        assert_eq!(out[0].entry.compiled, "x");
        assert_eq!(out[2].entry.compiled, "z");
    }

    #[test]
    fn deletion_drops_id_without_reuse() {
        let previous = vec![indexed(0, "a"), indexed(1, "b")];
        let out = reconcile(vec![entry("a"), entry("c")], &previous);

        assert_eq!(out.len(), 2);
        assert_eq!(out[0].id, 0);
        assert_eq!(out[0].entry.compiled, "a");
        assert_eq!(out[1].id, 2, "fresh id must not reuse 0 or 1");
        assert_eq!(out[1].entry.compiled, "c");
    }

    #[test]
    fn matched_ids_are_position_independent() {
        let previous = vec![indexed(0, "a"), indexed(1, "b"), indexed(2, "c")];
        let out = reconcile(vec![entry("c"), entry("a"), entry("b")], &previous);

        assert_eq!(ids(&out), vec![2, 0, 1]);
    }

    #[test]
    fn identical_runs_keep_identical_ids() {
        let first = reconcile(vec![entry("a"), entry("b")], &[]);
        let second = reconcile(vec![entry("a"), entry("b")], &first);

        assert_eq!(first, second);
    }

    #[test]
    fn duplicate_compiled_text_shares_the_previous_id() {
        let previous = vec![indexed(4, "a")];
        let out = reconcile(vec![entry("a"), entry("a")], &previous);

        assert_eq!(ids(&out), vec![4, 4]);
    }

    #[test]
    fn fresh_ids_start_past_the_previous_maximum() {
        let previous = vec![indexed(9, "a"), indexed(3, "b")];
        let out = reconcile(vec![entry("b"), entry("new")], &previous);

        assert_eq!(ids(&out), vec![3, 10]);
    }

    #[test]
    fn output_preserves_current_order() {
        let previous = vec![indexed(0, "a")];
        let out = reconcile(vec![entry("n1"), entry("a"), entry("n2")], &previous);

        let compiled: Vec<&str> = out.iter().map(|e| e.entry.compiled.as_str()).collect();
        assert_eq!(compiled, vec!["n1", "a", "n2"]);
    }

    proptest! {
        #[test]
        fn content_equality_implies_id_equality(
            texts in proptest::collection::vec("[a-z]{1,8}", 1..20)
        ) {
            let current: Vec<Entry> = texts.iter().map(|t| entry(t)).collect();
            let first = reconcile(current.clone(), &[]);
            let second = reconcile(current, &first);

            for (a, b) in first.iter().zip(&second) {
                prop_assert_eq!(a.id, b.id);
                prop_assert_eq!(&a.entry.compiled, &b.entry.compiled);
            }
        }

        #[test]
        fn reordering_preserves_content_ids(
            texts in proptest::collection::hash_set("[a-z]{1,8}", 1..20)
        ) {
            let originals: Vec<Entry> = texts.iter().map(|t| entry(t)).collect();
            let snapshot = reconcile(originals.clone(), &[]);

            let mut reversed = originals;
            reversed.reverse();
            let out = reconcile(reversed, &snapshot);

            for item in &out {
                let prior = snapshot
                    .iter()
                    .find(|p| p.entry.compiled == item.entry.compiled)
                    .unwrap();
                prop_assert_eq!(prior.id, item.id);
            }
        }
    }
}
