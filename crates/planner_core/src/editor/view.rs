//! Rendered-view contract for the block editor.
//!
//! # Invariants
//! - Outside an in-flight operation the view holds exactly one element per
//!   block, in model order.
//! - View updates happen synchronously with the model mutation causing them.

use crate::model::block::{Block, BlockId, BlockType};
use crate::model::page::Page;

/// One rendered, editable block region with its drag handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockElement {
    pub block_id: BlockId,
    pub class: String,
    pub html: String,
    /// Checkbox state for todo blocks.
    pub checked: Option<bool>,
    pub drag_handle: bool,
}

impl BlockElement {
    pub fn for_block(block: &Block) -> Self {
        Self {
            block_id: block.id.clone(),
            class: block.kind.style_class().to_string(),
            html: block.html.clone(),
            checked: (block.kind == BlockType::Todo).then_some(block.checked),
            drag_handle: true,
        }
    }
}

/// Host surface the editor renders into.
pub trait BlockView {
    fn clear(&mut self);
    fn append_block(&mut self, element: BlockElement);
    fn insert_block_after(&mut self, anchor_id: &str, element: BlockElement);
    fn remove_block(&mut self, block_id: &str);
    fn move_block_before(&mut self, block_id: &str, target_id: &str);
    fn update_block(&mut self, element: BlockElement);
    fn place_caret(&mut self, block_id: &str, offset: usize);
}

/// Clears the view and rebuilds it from `page.blocks`, in order.
pub fn render_page(view: &mut dyn BlockView, page: &Page) {
    view.clear();
    for block in &page.blocks {
        view.append_block(BlockElement::for_block(block));
    }
}

/// In-process view: an ordered element list plus the caret position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryView {
    elements: Vec<BlockElement>,
    caret: Option<(BlockId, usize)>,
}

impl MemoryView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn elements(&self) -> &[BlockElement] {
        &self.elements
    }

    pub fn element(&self, block_id: &str) -> Option<&BlockElement> {
        self.elements.iter().find(|element| element.block_id == block_id)
    }

    pub fn block_ids(&self) -> Vec<BlockId> {
        self.elements
            .iter()
            .map(|element| element.block_id.clone())
            .collect()
    }

    pub fn caret(&self) -> Option<(&str, usize)> {
        self.caret
            .as_ref()
            .map(|(block_id, offset)| (block_id.as_str(), *offset))
    }

    fn position(&self, block_id: &str) -> Option<usize> {
        self.elements
            .iter()
            .position(|element| element.block_id == block_id)
    }
}

impl BlockView for MemoryView {
    fn clear(&mut self) {
        self.elements.clear();
        self.caret = None;
    }

    fn append_block(&mut self, element: BlockElement) {
        self.elements.push(element);
    }

    fn insert_block_after(&mut self, anchor_id: &str, element: BlockElement) {
        let index = self.position(anchor_id).map_or(self.elements.len(), |i| i + 1);
        self.elements.insert(index, element);
    }

    fn remove_block(&mut self, block_id: &str) {
        self.elements.retain(|element| element.block_id != block_id);
        if self.caret.as_ref().is_some_and(|(id, _)| id == block_id) {
            self.caret = None;
        }
    }

    fn move_block_before(&mut self, block_id: &str, target_id: &str) {
        let Some(from) = self.position(block_id) else {
            return;
        };
        let element = self.elements.remove(from);
        let to = self.position(target_id).unwrap_or(self.elements.len());
        self.elements.insert(to, element);
    }

    fn update_block(&mut self, element: BlockElement) {
        if let Some(index) = self.position(&element.block_id) {
            self.elements[index] = element;
        }
    }

    fn place_caret(&mut self, block_id: &str, offset: usize) {
        self.caret = Some((block_id.to_string(), offset));
    }
}
