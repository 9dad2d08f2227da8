//! Repository layer over the planner key-value store.
//!
//! # Responsibility
//! - Define the key-value contract mirroring browser local storage.
//! - Map whole aggregates (document, tasks, grid) onto single keys.
//!
//! # Invariants
//! - Every save rewrites the full serialized aggregate; there are no
//!   partial or append writes.
//! - Loads never surface malformed data as an error to the editor.

pub mod document_repo;
pub mod grid_repo;
pub mod kv_store;
pub mod task_repo;
