//! Core gridchat library (capability registry, column state, submission flow).
//!
//! Gridchat runs several independent chat sessions ("columns") side by side,
//! each bound to its own model configuration, optionally sharing one typed
//! draft across the columns flagged for input sync. This crate is the state
//! model only: rendering and the actual provider exchange live behind the
//! [`completion::CompletionClient`] seam.

pub mod capabilities;
pub mod completion;
pub mod config;
pub mod core;
