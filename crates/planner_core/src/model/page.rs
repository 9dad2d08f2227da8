//! Note page model.
//!
//! # Responsibility
//! - Own the ordered block sequence of one note page.
//! - Migrate legacy single-string pages into block form on load.
//!
//! # Invariants
//! - A page always holds at least one block.
//! - The legacy `content` field is never written back.

use crate::model::block::{Block, BlockId};
use crate::model::now_epoch_ms;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque page identifier.
pub type PageId = String;

const UNTITLED_PAGE: &str = "Untitled";

/// Optional per-page style overrides applied by the editor surface.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size_px: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_height_percent: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
}

/// Named note document composed of an ordered block sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "PageRecord", rename_all = "camelCase")]
pub struct Page {
    pub id: PageId,
    pub title: String,
    pub blocks: Vec<Block>,
    /// Last mutation time in epoch milliseconds.
    pub updated: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub editor_settings: Option<EditorSettings>,
}

impl Page {
    /// Creates a page holding one empty paragraph.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: normalize_title(title.into()),
            blocks: vec![Block::empty()],
            updated: now_epoch_ms(),
            editor_settings: None,
        }
    }

    pub fn block_index(&self, block_id: &str) -> Option<usize> {
        self.blocks.iter().position(|block| block.id == block_id)
    }

    pub fn block(&self, block_id: &str) -> Option<&Block> {
        self.blocks.iter().find(|block| block.id == block_id)
    }

    pub fn block_mut(&mut self, block_id: &str) -> Option<&mut Block> {
        self.blocks.iter_mut().find(|block| block.id == block_id)
    }

    pub fn block_ids(&self) -> Vec<BlockId> {
        self.blocks.iter().map(|block| block.id.clone()).collect()
    }

    /// Restores the non-empty invariant. Returns `true` when a placeholder
    /// paragraph had to be inserted.
    pub fn ensure_not_empty(&mut self) -> bool {
        if self.blocks.is_empty() {
            self.blocks.push(Block::empty());
            return true;
        }
        false
    }

    /// Renames the page; blank titles become "Untitled".
    pub fn rename(&mut self, title: impl Into<String>) {
        self.title = normalize_title(title.into());
        self.touch();
    }

    /// Stamps the page as modified now.
    pub fn touch(&mut self) {
        self.updated = now_epoch_ms();
    }
}

/// Wire shape accepted on load, including the legacy `content` layout.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageRecord {
    id: PageId,
    #[serde(default)]
    title: String,
    #[serde(default)]
    blocks: Option<Vec<Block>>,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    updated: i64,
    #[serde(default)]
    editor_settings: Option<EditorSettings>,
}

impl From<PageRecord> for Page {
    fn from(record: PageRecord) -> Self {
        let blocks = match (record.blocks, record.content) {
            (Some(blocks), _) => blocks,
            (None, Some(content)) => vec![Block::paragraph(content)],
            (None, None) => Vec::new(),
        };
        let mut page = Self {
            id: record.id,
            title: normalize_title(record.title),
            blocks,
            updated: record.updated,
            editor_settings: record.editor_settings,
        };
        page.ensure_not_empty();
        page
    }
}

fn normalize_title(title: String) -> String {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        UNTITLED_PAGE.to_string()
    } else {
        trimmed.to_string()
    }
}
