//! Document aggregate: every note page plus the active page pointer.
//!
//! # Invariants
//! - `active_page_id` is `None` or refers to an existing page.
//! - Pages exclusively own their blocks; no block is shared across pages.

use crate::model::page::{Page, PageId};
use serde::{Deserialize, Serialize};

/// Title of the page seeded into a fresh document.
pub const WELCOME_PAGE_TITLE: &str = "Welcome";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "DocumentRecord", rename_all = "camelCase")]
pub struct Document {
    pages: Vec<Page>,
    active_page_id: Option<PageId>,
}

impl Document {
    /// Fresh document with one "Welcome" page, which is active.
    pub fn initial() -> Self {
        let page = Page::new(WELCOME_PAGE_TITLE);
        let active = Some(page.id.clone());
        Self {
            pages: vec![page],
            active_page_id: active,
        }
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn page(&self, page_id: &str) -> Option<&Page> {
        self.pages.iter().find(|page| page.id == page_id)
    }

    pub fn page_mut(&mut self, page_id: &str) -> Option<&mut Page> {
        self.pages.iter_mut().find(|page| page.id == page_id)
    }

    pub fn active_page_id(&self) -> Option<&str> {
        self.active_page_id.as_deref()
    }

    pub fn active_page(&self) -> Option<&Page> {
        let id = self.active_page_id.as_deref()?;
        self.page(id)
    }

    pub fn active_page_mut(&mut self) -> Option<&mut Page> {
        let id = self.active_page_id.clone()?;
        self.page_mut(&id)
    }

    /// Points the active pointer at `page_id`. Returns `false` and leaves
    /// the pointer untouched when the page does not exist.
    pub fn set_active(&mut self, page_id: &str) -> bool {
        if self.page(page_id).is_none() {
            return false;
        }
        self.active_page_id = Some(page_id.to_string());
        true
    }

    /// Appends a page and returns its id.
    pub fn push_page(&mut self, page: Page) -> PageId {
        let id = page.id.clone();
        self.pages.push(page);
        id
    }

    /// Removes a page. When it was active, the first remaining page (if
    /// any) becomes active.
    pub fn remove_page(&mut self, page_id: &str) -> Option<Page> {
        let index = self.pages.iter().position(|page| page.id == page_id)?;
        let removed = self.pages.remove(index);
        if self.active_page_id.as_deref() == Some(page_id) {
            self.active_page_id = self.pages.first().map(|page| page.id.clone());
        }
        Some(removed)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DocumentRecord {
    #[serde(default)]
    pages: Vec<Page>,
    #[serde(default)]
    active_page_id: Option<PageId>,
}

impl From<DocumentRecord> for Document {
    fn from(record: DocumentRecord) -> Self {
        let active_page_id = record
            .active_page_id
            .filter(|id| record.pages.iter().any(|page| &page.id == id));
        Self {
            pages: record.pages,
            active_page_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Document, WELCOME_PAGE_TITLE};
    use crate::model::page::Page;
    use serde_json::json;

    #[test]
    fn initial_document_has_active_welcome_page() {
        let document = Document::initial();
        assert_eq!(document.pages().len(), 1);
        let active = document.active_page().unwrap();
        assert_eq!(active.title, WELCOME_PAGE_TITLE);
    }

    #[test]
    fn dangling_active_pointer_is_cleared_on_load() {
        let document: Document = serde_json::from_value(json!({
            "pages": [{ "id": "p1", "title": "One", "blocks": [], "updated": 1 }],
            "activePageId": "missing"
        }))
        .unwrap();
        assert_eq!(document.active_page_id(), None);
    }

    #[test]
    fn removing_active_page_moves_pointer_to_first_remaining() {
        let mut document = Document::initial();
        let second = document.push_page(Page::new("Second"));
        let first = document.active_page_id().unwrap().to_string();

        assert!(document.remove_page(&first).is_some());
        assert_eq!(document.active_page_id(), Some(second.as_str()));

        assert!(document.remove_page(&second).is_some());
        assert_eq!(document.active_page_id(), None);
    }

    #[test]
    fn set_active_rejects_unknown_page() {
        let mut document = Document::initial();
        let before = document.active_page_id().map(str::to_string);
        assert!(!document.set_active("nope"));
        assert_eq!(document.active_page_id().map(str::to_string), before);
    }
}
