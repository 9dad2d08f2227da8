//! Content block model.
//!
//! # Invariants
//! - `html` holds inline markup only (`b`, `i`, `u`, `code`, `span`, `br`);
//!   nested blocks are never stored inside a block.
//! - Block ids are unique within their page.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque block identifier, unique within one page.
pub type BlockId = String;

/// Structural kind of a block. Serialized in lowercase (`heading1`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockType {
    Paragraph,
    Heading1,
    Heading2,
    Heading3,
    Code,
    Todo,
}

impl BlockType {
    /// Style class attached to the rendered block element.
    pub fn style_class(self) -> &'static str {
        match self {
            Self::Paragraph => "block block-paragraph",
            Self::Heading1 => "block block-heading1",
            Self::Heading2 => "block block-heading2",
            Self::Heading3 => "block block-heading3",
            Self::Code => "block block-code",
            Self::Todo => "block block-todo",
        }
    }

    /// Maps a markdown heading depth (1..=3) to its block type.
    pub fn heading(level: usize) -> Option<Self> {
        match level {
            1 => Some(Self::Heading1),
            2 => Some(Self::Heading2),
            3 => Some(Self::Heading3),
            _ => None,
        }
    }
}

/// One editable content unit of a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub id: BlockId,
    /// Serialized as `type` to match the stored page layout.
    #[serde(rename = "type")]
    pub kind: BlockType,
    /// Inline rich-text fragment.
    #[serde(default)]
    pub html: String,
    /// Completion flag; meaningful only for `BlockType::Todo`.
    #[serde(default, skip_serializing_if = "is_false")]
    pub checked: bool,
}

impl Block {
    /// Creates a block with a freshly generated id.
    pub fn new(kind: BlockType, html: impl Into<String>) -> Self {
        Self::with_id(new_block_id(), kind, html)
    }

    /// Creates a block with a caller-provided id.
    pub fn with_id(id: impl Into<BlockId>, kind: BlockType, html: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            html: html.into(),
            checked: false,
        }
    }

    pub fn paragraph(html: impl Into<String>) -> Self {
        Self::new(BlockType::Paragraph, html)
    }

    /// An empty paragraph, the placeholder that keeps a page non-empty.
    pub fn empty() -> Self {
        Self::paragraph("")
    }
}

/// Generates a new, never-reused block id.
pub fn new_block_id() -> BlockId {
    Uuid::new_v4().to_string()
}

fn is_false(value: &bool) -> bool {
    !*value
}

#[cfg(test)]
mod tests {
    use super::{Block, BlockType};

    #[test]
    fn block_type_wire_names_are_lowercase() {
        let json = serde_json::to_string(&BlockType::Heading2).unwrap();
        assert_eq!(json, "\"heading2\"");
    }

    #[test]
    fn unchecked_flag_is_omitted_from_wire_shape() {
        let block = Block::with_id("b1", BlockType::Todo, "buy milk");
        let value = serde_json::to_value(&block).unwrap();
        assert_eq!(value["type"], "todo");
        assert!(value.get("checked").is_none());
    }
}
