//! Whole-document persistence for the note editor.
//!
//! # Responsibility
//! - Load the document aggregate, falling back to a fresh document on any
//!   missing, unreadable or malformed record.
//! - Save the document as one full JSON rewrite.
//!
//! # Invariants
//! - `load` never fails and always returns at least one page.
//! - Page content never appears in log lines.

use crate::model::document::Document;
use crate::repo::kv_store::{KeyValueStore, RepoResult, DOCUMENT_KEY};
use log::{info, warn};

/// Persistence boundary for the document aggregate.
pub trait DocumentRepository {
    fn load(&self) -> Document;
    fn save(&self, document: &Document) -> RepoResult<()>;
}

/// Stores the document as JSON under a single key.
pub struct KvDocumentRepository<S: KeyValueStore> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> KvDocumentRepository<S> {
    pub fn new(store: S) -> Self {
        Self::with_key(store, DOCUMENT_KEY)
    }

    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S: KeyValueStore> DocumentRepository for KvDocumentRepository<S> {
    fn load(&self) -> Document {
        let raw = match self.store.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                info!("event=document_load module=repo status=empty key={}", self.key);
                return Document::initial();
            }
            Err(err) => {
                warn!(
                    "event=document_load module=repo status=error error_code=store_read_failed key={} error={err}",
                    self.key
                );
                return Document::initial();
            }
        };

        match serde_json::from_str::<Document>(&raw) {
            Ok(document) if document.is_empty() => {
                info!("event=document_load module=repo status=empty key={}", self.key);
                Document::initial()
            }
            Ok(document) => {
                info!(
                    "event=document_load module=repo status=ok key={} pages={}",
                    self.key,
                    document.pages().len()
                );
                document
            }
            Err(err) => {
                // serde_json errors carry position only, never record content.
                warn!(
                    "event=document_load module=repo status=error error_code=malformed_document key={} error={err}",
                    self.key
                );
                Document::initial()
            }
        }
    }

    fn save(&self, document: &Document) -> RepoResult<()> {
        let raw = serde_json::to_string(document)?;
        self.store.set(&self.key, &raw)
    }
}
