//! The column/session state model.
//!
//! `column` holds the per-session state, `columns` the ordered set,
//! `sync_input` the shared draft, and `submit` the orchestration that ties
//! them to the completion collaborator.

pub mod column;
pub mod columns;
pub mod submit;
pub mod sync_input;
