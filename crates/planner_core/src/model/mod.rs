//! Planner domain model.
//!
//! # Responsibility
//! - Define the persisted shapes for note pages, calendar tasks and the
//!   table grid.
//! - Own aggregate invariants (non-empty pages, valid active pointer) and
//!   legacy-record migration on deserialize.
//!
//! # Invariants
//! - Ids are opaque strings generated from uuid v4 and never reused.
//! - Timestamps are Unix epoch milliseconds.

pub mod block;
pub mod document;
pub mod grid;
pub mod page;
pub mod task;

use std::time::{SystemTime, UNIX_EPOCH};

/// Current wall-clock time in Unix epoch milliseconds.
///
/// Falls back to `0` when the system clock is before the epoch.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}
