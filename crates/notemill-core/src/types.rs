use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Object kind reported by the workspace search endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    /// A regular page. The only kind that produces entries.
    Page,
    /// A database. Skipped entirely.
    Database,
    /// Anything the API adds later.
    #[serde(other)]
    Unknown,
}

/// A page as returned by the workspace search endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    /// Opaque page id.
    pub id: String,
    /// Canonical page URL, used as the source locator on entries.
    #[serde(default)]
    pub url: String,
    /// Whether this record is a page or a database.
    pub object: ObjectKind,
}

/// The closed block/run type space.
///
/// Both blocks and rich-text runs carry a `type` tag drawn from this space.
/// Tags the API may add later fall into [`BlockType::Unknown`], which is
/// neither a display type nor an unsupported type, so unknown runs pass
/// through as inline text and unknown blocks are skipped for lack of a
/// recognizable payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockType {
    Paragraph,
    // snake_case would render these as heading1/2/3
    #[serde(rename = "heading_1")]
    Heading1,
    #[serde(rename = "heading_2")]
    Heading2,
    #[serde(rename = "heading_3")]
    Heading3,
    BulletedListItem,
    NumberedListItem,
    ToDo,
    Toggle,
    ChildPage,
    Bookmark,
    Divider,
    Pdf,
    Image,
    Embed,
    Video,
    File,
    SyncedBlock,
    TableOfContents,
    Column,
    Equation,
    LinkPreview,
    ColumnList,
    Quote,
    Breadcrumb,
    LinkToPage,
    ChildDatabase,
    Template,
    Callout,
    Unsupported,
    /// Fallback for tags outside the known space.
    #[default]
    #[serde(other)]
    Unknown,
}

impl BlockType {
    /// The wire tag for this type, used to look up the type-keyed payload
    /// on a block. `Unknown` has no tag.
    #[must_use]
    pub const fn tag(self) -> Option<&'static str> {
        Some(match self {
            Self::Paragraph => "paragraph",
            Self::Heading1 => "heading_1",
            Self::Heading2 => "heading_2",
            Self::Heading3 => "heading_3",
            Self::BulletedListItem => "bulleted_list_item",
            Self::NumberedListItem => "numbered_list_item",
            Self::ToDo => "to_do",
            Self::Toggle => "toggle",
            Self::ChildPage => "child_page",
            Self::Bookmark => "bookmark",
            Self::Divider => "divider",
            Self::Pdf => "pdf",
            Self::Image => "image",
            Self::Embed => "embed",
            Self::Video => "video",
            Self::File => "file",
            Self::SyncedBlock => "synced_block",
            Self::TableOfContents => "table_of_contents",
            Self::Column => "column",
            Self::Equation => "equation",
            Self::LinkPreview => "link_preview",
            Self::ColumnList => "column_list",
            Self::Quote => "quote",
            Self::Breadcrumb => "breadcrumb",
            Self::LinkToPage => "link_to_page",
            Self::ChildDatabase => "child_database",
            Self::Template => "template",
            Self::Callout => "callout",
            Self::Unsupported => "unsupported",
            Self::Unknown => return None,
        })
    }

    /// Heading blocks update the heading context instead of emitting text.
    #[must_use]
    pub const fn is_heading(self) -> bool {
        matches!(self, Self::Heading1 | Self::Heading2 | Self::Heading3)
    }

    /// Structural types whose runs are dropped from output entirely.
    #[must_use]
    pub const fn is_unsupported(self) -> bool {
        matches!(
            self,
            Self::Bookmark
                | Self::Divider
                | Self::ChildDatabase
                | Self::Template
                | Self::Callout
                | Self::Unsupported
        )
    }

    /// Types that render block-level: their runs get surrounding newlines.
    #[must_use]
    pub const fn is_display(self) -> bool {
        matches!(
            self,
            Self::Paragraph
                | Self::Heading1
                | Self::Heading2
                | Self::Heading3
                | Self::BulletedListItem
                | Self::NumberedListItem
                | Self::ToDo
                | Self::Toggle
                | Self::ChildPage
                | Self::Bookmark
                | Self::Divider
        )
    }
}

/// One contiguous styled text fragment inside a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRun {
    /// The fragment's text with all styling stripped.
    pub plain_text: String,
    /// Hyperlink target, when the run is a link.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    /// The run's tag within the shared block/run type space.
    #[serde(rename = "type", default)]
    pub kind: BlockType,
}

/// One structural content unit in a page's block tree.
///
/// The API keys the block's payload by its own type tag
/// (`{"type": "paragraph", "paragraph": {"rich_text": [...]}}`), so the
/// payloads are kept as raw JSON and resolved through [`Block::rich_text`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    /// Opaque block id, used to fetch children.
    pub id: String,
    /// The block's type tag.
    #[serde(rename = "type", default)]
    pub kind: BlockType,
    /// Whether the block declares nested children.
    #[serde(default)]
    pub has_children: bool,
    /// Type-keyed payloads and any other per-block fields.
    #[serde(flatten)]
    pub payload: BTreeMap<String, serde_json::Value>,
}

impl Block {
    /// The block's rich-text run list, resolved through its type tag.
    ///
    /// Returns an empty vec when the tag is unknown, the payload is
    /// missing, or the run list is absent or malformed. Blocks without
    /// runs contribute nothing and never disturb the heading context.
    #[must_use]
    pub fn rich_text(&self) -> Vec<TextRun> {
        let Some(tag) = self.kind.tag() else {
            return Vec::new();
        };
        self.payload
            .get(tag)
            .and_then(|data| data.get("rich_text"))
            .and_then(|runs| serde_json::from_value(runs.clone()).ok())
            .unwrap_or_default()
    }
}

/// The unit of flattened, indexable text derived from one block group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Flattened raw text. Never empty.
    pub raw: String,
    /// Compiled text; identical to `raw` and used as the identity key.
    pub compiled: String,
    /// The title of the page this entry came from.
    pub heading: String,
    /// Source locator: the page URL.
    pub file: String,
}

/// An entry tagged with its stable id, as persisted in the snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexedEntry {
    /// Stable identity. Equal compiled text across runs keeps an equal id.
    pub id: u64,
    /// The entry itself, flattened into the same JSON object.
    #[serde(flatten)]
    pub entry: Entry,
}

/// Sidecar metadata saved next to a snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotMeta {
    /// When the snapshot was produced.
    pub fetched_at: DateTime<Utc>,
    /// Checksum of the serialized snapshot body.
    pub sha256: String,
    /// Number of entries in the snapshot.
    pub entry_count: usize,
    /// Number of pages that contributed entries.
    pub page_count: usize,
}
