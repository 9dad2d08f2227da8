//! Planner use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls for the calendar task list and the
//!   table grid.
//! - Validate user input before anything is persisted.
//!
//! # Invariants
//! - Every successful mutation is persisted before the call returns.
//! - Unknown ids are reported as `false`/`None`, never as errors.

pub mod grid_service;
pub mod task_service;
