//! Block-tree flattening with heading-context propagation.
//!
//! A page's ordered block list is folded into a sequence of [`Entry`]
//! candidates. A single heading context string is threaded through the
//! fold: every `heading_1..3` block replaces it, every following content
//! block carries it inline as a bolded marker line until the next heading.
//! Blocks that declare children have their entire descendant tree
//! serialized into the same entry, in document order.

use crate::{Block, BlockType, Entry, NotionFetcher, Result, TextRun};
use async_trait::async_trait;

/// Where the flattener obtains a block's children.
///
/// Abstracting the children lookup keeps the traversal testable without a
/// live API; [`NotionFetcher`] is the production implementation.
#[async_trait]
pub trait BlockSource {
    /// Ordered child blocks of a page or block.
    async fn block_children(&self, parent_id: &str) -> Result<Vec<Block>>;
}

#[async_trait]
impl BlockSource for NotionFetcher {
    async fn block_children(&self, parent_id: &str) -> Result<Vec<Block>> {
        Self::block_children(self, parent_id).await
    }
}

/// Identity of the page being flattened, carried onto each entry.
#[derive(Debug, Clone)]
pub struct PageContext {
    /// Page title; becomes the entry heading.
    pub title: String,
    /// Page URL; becomes the entry source locator.
    pub url: String,
}

/// Render the heading-context marker carried by entries below a heading.
#[must_use]
pub fn heading_marker(heading: &str) -> String {
    format!("\n<b>{heading}</b>\n")
}

/// Serialize one rich-text run, optionally under an enclosing block type.
///
/// Unsupported run tags vanish, links become inline anchors, display
/// types (the run's own or the enclosing block's) get surrounding
/// newlines, and everything else passes through verbatim.
#[must_use]
pub fn serialize_run(run: &TextRun, block_type: Option<BlockType>) -> String {
    if run.kind.is_unsupported() {
        return String::new();
    }
    if let Some(href) = &run.href {
        return format!("<a href='{href}'>{}</a>", run.plain_text);
    }
    if run.kind.is_display() || block_type.is_some_and(BlockType::is_display) {
        return format!("\n{}\n", run.plain_text);
    }
    run.plain_text.clone()
}

/// Flatten one page's top-level blocks into entry candidates.
///
/// Blocks are processed strictly in document order so the heading context
/// stays correct. Headings never merge into the current content unit: any
/// pending accumulated text is flushed as its own entry before the context
/// switches. The heading block itself produces no entry.
pub async fn flatten_page<S>(source: &S, page: &PageContext, blocks: &[Block]) -> Result<Vec<Entry>>
where
    S: BlockSource + ?Sized,
{
    let mut entries = Vec::new();
    let mut heading_context = String::new();
    let mut raw = String::new();

    for block in blocks {
        let runs = block.rich_text();
        if runs.is_empty() {
            // No text to index; the heading context is untouched.
            continue;
        }
        if block.kind.is_unsupported() {
            continue;
        }

        if block.kind.is_heading() {
            if !raw.is_empty() {
                entries.push(make_entry(&raw, page));
                raw.clear();
            }
            heading_context.clone_from(&runs[0].plain_text);
            continue;
        }

        if !heading_context.is_empty() {
            raw.push_str(&heading_marker(&heading_context));
        }
        for run in &runs {
            raw.push_str(&serialize_run(run, None));
        }

        if block.has_children {
            raw.push('\n');
            append_descendants(source, &block.id, block.kind, &mut raw).await?;
        }

        if !raw.is_empty() {
            entries.push(make_entry(&raw, page));
            raw.clear();
        }
    }

    Ok(entries)
}

/// Serialize a block's entire descendant tree in document order.
///
/// Explicit-stack traversal: each child batch is pushed in reverse so a
/// child's subtree lands immediately after its own runs and before its
/// next sibling. Every nested run inherits the top block's type as its
/// display-classification context.
async fn append_descendants<S>(
    source: &S,
    parent_id: &str,
    parent_kind: BlockType,
    raw: &mut String,
) -> Result<()>
where
    S: BlockSource + ?Sized,
{
    let mut stack: Vec<Block> = Vec::new();
    let children = source.block_children(parent_id).await?;
    stack.extend(children.into_iter().rev());

    while let Some(child) = stack.pop() {
        for run in child.rich_text() {
            raw.push_str(&serialize_run(&run, Some(parent_kind)));
        }
        if child.has_children {
            let grandchildren = source.block_children(&child.id).await?;
            stack.extend(grandchildren.into_iter().rev());
        }
    }

    Ok(())
}

fn make_entry(raw: &str, page: &PageContext) -> Entry {
    Entry {
        raw: raw.to_string(),
        compiled: raw.to_string(),
        heading: page.title.clone(),
        file: page.url.clone(),
    }
}
