//! Block note editor controller.
//!
//! # Responsibility
//! - Own the document aggregate and keep the rendered view in step with it.
//! - Provide structural block edits (split, merge, reorder, retype, inline
//!   formatting, live markdown) with caret continuity.
//! - Schedule debounced full-document saves.
//!
//! # Invariants
//! - Structural commands never fail: unknown ids and empty selections are
//!   logged no-ops.
//! - Every view update happens inside the same call as the model mutation.
//! - A failed save never rolls back in-memory state.
//! - Interaction is single-focus, so operations are serialized by the
//!   caller and need no locking.

pub mod debounce;
pub mod fragment;
pub mod markdown;
pub mod surface;
pub mod view;

use crate::editor::debounce::SaveDebouncer;
use crate::editor::fragment::Fragment;
use crate::editor::markdown::{line_ordinal, MarkdownContext, MarkdownStyle};
use crate::editor::surface::{FragmentSurface, InlineFormat, Selection, TextSurface};
use crate::editor::view::{render_page, BlockElement, BlockView};
use crate::model::block::{Block, BlockId, BlockType};
use crate::model::document::Document;
use crate::model::page::{EditorSettings, Page, PageId};
use crate::repo::document_repo::DocumentRepository;
use log::{debug, error, info};
use std::mem;
use std::time::{Duration, Instant};

pub const DEFAULT_AUTOSAVE_DELAY: Duration = Duration::from_millis(400);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorConfig {
    /// Quiet period between the last edit and the autosave.
    pub autosave_delay: Duration,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            autosave_delay: DEFAULT_AUTOSAVE_DELAY,
        }
    }
}

/// Notifications for collaborating components (sidebar, widgets).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorEvent {
    PageListChanged,
    ActivePageChanged(Option<PageId>),
    SettingsChanged(PageId),
}

/// Per-block editing state. Split and merge are atomic transitions back
/// to `Idle`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EditState {
    #[default]
    Idle,
    Editing(BlockId),
}

pub struct BlockEditor<R: DocumentRepository, V: BlockView> {
    repo: R,
    view: V,
    document: Document,
    debouncer: SaveDebouncer,
    events: Vec<EditorEvent>,
    state: EditState,
}

impl<R: DocumentRepository, V: BlockView> BlockEditor<R, V> {
    /// Loads the document from `repo` and renders the active page.
    pub fn new(repo: R, view: V, config: EditorConfig) -> Self {
        let mut document = repo.load();
        if document.active_page_id().is_none() {
            if let Some(first) = document.pages().first().map(|page| page.id.clone()) {
                document.set_active(&first);
            }
        }

        let mut editor = Self {
            repo,
            view,
            document,
            debouncer: SaveDebouncer::new(config.autosave_delay),
            events: Vec::new(),
            state: EditState::Idle,
        };
        editor.render_active_page();
        editor
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn state(&self) -> &EditState {
        &self.state
    }

    pub fn pages(&self) -> &[Page] {
        self.document.pages()
    }

    pub fn active_page(&self) -> Option<&Page> {
        self.document.active_page()
    }

    /// Drains queued notifications, oldest first.
    pub fn take_events(&mut self) -> Vec<EditorEvent> {
        mem::take(&mut self.events)
    }

    /// Most recently updated pages first, for the recent-notes widget.
    pub fn recent_pages(&self, limit: usize) -> Vec<&Page> {
        let mut pages: Vec<&Page> = self.document.pages().iter().collect();
        pages.sort_by(|a, b| b.updated.cmp(&a.updated).then_with(|| a.id.cmp(&b.id)));
        pages.truncate(limit);
        pages
    }

    // ----- pages -----

    /// Creates a page, makes it active and renders it.
    pub fn create_page(&mut self, title: impl Into<String>) -> PageId {
        let page_id = self.document.push_page(Page::new(title));
        self.document.set_active(&page_id);
        self.state = EditState::Idle;
        self.render_active_page();
        self.events.push(EditorEvent::PageListChanged);
        self.events
            .push(EditorEvent::ActivePageChanged(Some(page_id.clone())));
        self.schedule_save();
        info!("event=page_create module=editor status=ok pages={}", self.document.pages().len());
        page_id
    }

    pub fn select_page(&mut self, page_id: &str) -> bool {
        if self.document.active_page_id() == Some(page_id) {
            return true;
        }
        if !self.document.set_active(page_id) {
            debug!("event=page_select module=editor status=skip reason=page_not_found");
            return false;
        }
        self.state = EditState::Idle;
        self.render_active_page();
        self.events
            .push(EditorEvent::ActivePageChanged(Some(page_id.to_string())));
        self.schedule_save();
        true
    }

    pub fn rename_page(&mut self, page_id: &str, title: impl Into<String>) -> bool {
        let Some(page) = self.document.page_mut(page_id) else {
            debug!("event=page_rename module=editor status=skip reason=page_not_found");
            return false;
        };
        page.rename(title);
        self.events.push(EditorEvent::PageListChanged);
        self.schedule_save();
        true
    }

    /// Deletes a page after the host has confirmed with the user.
    pub fn delete_page(&mut self, page_id: &str) -> bool {
        let was_active = self.document.active_page_id() == Some(page_id);
        if self.document.remove_page(page_id).is_none() {
            debug!("event=page_delete module=editor status=skip reason=page_not_found");
            return false;
        }
        self.events.push(EditorEvent::PageListChanged);
        if was_active {
            self.state = EditState::Idle;
            self.render_active_page();
            let active = self.document.active_page_id().map(str::to_string);
            self.events.push(EditorEvent::ActivePageChanged(active));
        }
        self.schedule_save();
        info!("event=page_delete module=editor status=ok pages={}", self.document.pages().len());
        true
    }

    /// Replaces (or clears) a page's style overrides.
    pub fn set_page_settings(&mut self, page_id: &str, settings: Option<EditorSettings>) -> bool {
        let Some(page) = self.document.page_mut(page_id) else {
            debug!("event=page_settings module=editor status=skip reason=page_not_found");
            return false;
        };
        page.editor_settings = settings;
        page.touch();
        self.events
            .push(EditorEvent::SettingsChanged(page_id.to_string()));
        self.schedule_save();
        true
    }

    /// Rebuilds the whole view from the active page.
    pub fn render_active_page(&mut self) {
        match self.document.active_page() {
            Some(page) => render_page(&mut self.view, page),
            None => self.view.clear(),
        }
    }

    // ----- blocks -----

    pub fn focus_block(&mut self, block_id: &str, caret: usize) -> bool {
        let exists = self
            .document
            .active_page()
            .is_some_and(|page| page.block(block_id).is_some());
        if !exists {
            debug!("event=block_focus module=editor status=skip reason=block_not_found");
            return false;
        }
        self.state = EditState::Editing(block_id.to_string());
        self.view.place_caret(block_id, caret);
        true
    }

    pub fn blur(&mut self) {
        self.state = EditState::Idle;
    }

    /// Syncs edited markup from the view into the model. The view already
    /// shows `new_html`, so only the model changes.
    pub fn on_block_edited(&mut self, block_id: &str, new_html: &str) -> bool {
        let edited = self.edit_active("block_edited", |page, _| {
            let block = page.block_mut(block_id)?;
            block.html = new_html.to_string();
            Some(())
        });
        if edited.is_some() {
            self.state = EditState::Editing(block_id.to_string());
        }
        edited.is_some()
    }

    /// Splits a block at `caret`; the tail becomes a new paragraph right
    /// after it and receives the caret. Returns the new block id.
    pub fn split_block(&mut self, block_id: &str, caret: usize) -> Option<BlockId> {
        let new_id = self.edit_active("split_block", |page, view| {
            let index = page.block_index(block_id)?;
            let source = &mut page.blocks[index];
            let mut surface = FragmentSurface::new(&source.html);
            let caret = caret.min(surface.text_len());
            let trailing = surface.extract_after(caret);
            source.html = surface.html();
            view.update_block(BlockElement::for_block(source));

            let block = Block::paragraph(trailing);
            let new_id = block.id.clone();
            view.insert_block_after(block_id, BlockElement::for_block(&block));
            view.place_caret(&new_id, 0);
            page.blocks.insert(index + 1, block);
            Some(new_id)
        })?;
        self.state = EditState::Idle;
        Some(new_id)
    }

    /// Appends a block's markup verbatim to the previous block and removes it.
    /// Returns the surviving block id; `None` for the first block.
    pub fn merge_with_previous(&mut self, block_id: &str) -> Option<BlockId> {
        let merged_into = self.edit_active("merge_block", |page, view| {
            let index = page.block_index(block_id)?;
            if index == 0 {
                return None;
            }
            let current = page.blocks.remove(index);
            let previous = &mut page.blocks[index - 1];
            let mut surface = FragmentSurface::new(&previous.html);
            let end = surface.text_len();
            surface.insert_at(end, &current.html);
            previous.html = surface.html();

            view.update_block(BlockElement::for_block(previous));
            view.remove_block(&current.id);
            view.place_caret(&previous.id, surface.text_len());
            Some(previous.id.clone())
        })?;
        self.state = EditState::Idle;
        Some(merged_into)
    }

    /// Moves `source_id` to sit immediately before `target_id`.
    pub fn reorder_block(&mut self, source_id: &str, target_id: &str) -> bool {
        if source_id == target_id {
            debug!("event=reorder_block module=editor status=skip reason=same_block");
            return false;
        }
        self.edit_active("reorder_block", |page, view| {
            let from = page.block_index(source_id)?;
            let target = page.block_index(target_id)?;
            let to = if from < target { target - 1 } else { target };
            let block = page.blocks.remove(from);
            page.blocks.insert(to, block);
            view.move_block_before(source_id, target_id);
            Some(())
        })
        .is_some()
    }

    /// Retypes a block; its content is left untouched.
    pub fn change_block_type(&mut self, block_id: &str, kind: BlockType) -> bool {
        self.edit_active("change_block_type", |page, view| {
            let block = page.block_mut(block_id)?;
            block.kind = kind;
            if kind != BlockType::Todo {
                block.checked = false;
            }
            view.update_block(BlockElement::for_block(block));
            Some(())
        })
        .is_some()
    }

    /// Wraps the selection (or the word before a collapsed caret) in
    /// inline markup. Returns the caret offset after the formatted span.
    pub fn apply_inline_format(
        &mut self,
        block_id: &str,
        format: InlineFormat,
        selection: Selection,
    ) -> Option<usize> {
        self.edit_active("inline_format", |page, view| {
            let block = page.block_mut(block_id)?;
            let mut surface = FragmentSurface::with_selection(&block.html, selection);
            let caret = surface::apply_inline_format(&mut surface, format)?;
            block.html = surface.html();
            view.update_block(BlockElement::for_block(block));
            view.place_caret(block_id, caret);
            Some(caret)
        })
    }

    /// Runs the live markdown rules after a space or newline was typed.
    /// Headings retype the block; other rules rewrite its markup.
    pub fn apply_live_markdown(&mut self, block_id: &str) -> Option<MarkdownStyle> {
        self.edit_active("live_markdown", |page, view| {
            let index = page.block_index(block_id)?;
            if page.blocks[index].kind == BlockType::Code {
                return None;
            }
            let previous_ordinal = index
                .checked_sub(1)
                .and_then(|previous| line_ordinal(&page.blocks[previous].html));
            let matched = markdown::apply_live_markdown(
                &page.blocks[index].html,
                MarkdownContext { previous_ordinal },
            )?;

            let block = &mut page.blocks[index];
            if let MarkdownStyle::Heading(level) = matched.style {
                if let Some(kind) = BlockType::heading(level) {
                    block.kind = kind;
                    block.checked = false;
                }
            }
            block.html = matched.html;
            let caret = Fragment::parse(&block.html).unit_len();
            view.update_block(BlockElement::for_block(block));
            view.place_caret(block_id, caret);
            Some(matched.style)
        })
    }

    /// Inserts an empty block of `kind` after `block_id` (block palette).
    pub fn insert_block_after(&mut self, block_id: &str, kind: BlockType) -> Option<BlockId> {
        let new_id = self.edit_active("insert_block", |page, view| {
            let index = page.block_index(block_id)?;
            let block = Block::new(kind, "");
            let new_id = block.id.clone();
            view.insert_block_after(block_id, BlockElement::for_block(&block));
            view.place_caret(&new_id, 0);
            page.blocks.insert(index + 1, block);
            Some(new_id)
        })?;
        self.state = EditState::Editing(new_id.clone());
        Some(new_id)
    }

    /// Removes a block. The last block of a page is cleared instead.
    pub fn delete_block(&mut self, block_id: &str) -> bool {
        let deleted = self.edit_active("delete_block", |page, view| {
            let index = page.block_index(block_id)?;
            if page.blocks.len() == 1 {
                let block = &mut page.blocks[0];
                block.html.clear();
                block.kind = BlockType::Paragraph;
                block.checked = false;
                view.update_block(BlockElement::for_block(block));
                view.place_caret(block_id, 0);
                return Some(());
            }
            page.blocks.remove(index);
            view.remove_block(block_id);
            // Caret goes to the end of the previous block, or the start of
            // the new first block.
            let (neighbour, caret) = match index.checked_sub(1) {
                Some(previous) => {
                    let block = &page.blocks[previous];
                    (block, Fragment::parse(&block.html).unit_len())
                }
                None => (&page.blocks[0], 0),
            };
            view.place_caret(&neighbour.id, caret);
            Some(())
        });
        if deleted.is_some() {
            self.state = EditState::Idle;
        }
        deleted.is_some()
    }

    /// Flips a todo block's checkbox. Returns the new state.
    pub fn toggle_todo(&mut self, block_id: &str) -> Option<bool> {
        self.edit_active("toggle_todo", |page, view| {
            let block = page.block_mut(block_id)?;
            if block.kind != BlockType::Todo {
                return None;
            }
            block.checked = !block.checked;
            view.update_block(BlockElement::for_block(block));
            Some(block.checked)
        })
    }

    // ----- persistence -----

    pub fn has_pending_save(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Event-loop hook: saves once the autosave quiet period has passed.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.debouncer.take_due(now) {
            return self.flush();
        }
        false
    }

    /// Saves immediately (save shortcut), dropping any pending autosave.
    pub fn save_now(&mut self) -> bool {
        self.debouncer.cancel();
        self.flush()
    }

    fn schedule_save(&mut self) {
        self.debouncer.schedule(Instant::now());
    }

    fn flush(&mut self) -> bool {
        let started_at = Instant::now();
        match self.repo.save(&self.document) {
            Ok(()) => {
                info!(
                    "event=document_save module=editor status=ok pages={} duration_ms={}",
                    self.document.pages().len(),
                    started_at.elapsed().as_millis()
                );
                true
            }
            Err(err) => {
                error!(
                    "event=document_save module=editor status=error error_code=save_failed error={err}"
                );
                false
            }
        }
    }

    /// Runs `edit` against the active page and the view. On success the page
    /// is stamped and an autosave is scheduled; `None` is a logged no-op.
    fn edit_active<T>(
        &mut self,
        op: &'static str,
        edit: impl FnOnce(&mut Page, &mut V) -> Option<T>,
    ) -> Option<T> {
        let Some(page) = self.document.active_page_mut() else {
            debug!("event={op} module=editor status=skip reason=no_active_page");
            return None;
        };
        let result = edit(page, &mut self.view);
        if result.is_some() {
            page.touch();
            self.debouncer.schedule(Instant::now());
        } else {
            debug!("event={op} module=editor status=skip reason=not_applicable");
        }
        result
    }
}
