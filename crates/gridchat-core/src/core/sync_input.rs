//! Shared input draft broadcast across synced columns.
//!
//! Synchronization is "broadcast the same draft", not "broadcast the same
//! submission": every column whose sync flag is set reads and clears the one
//! shared string, while unsynced columns keep fully isolated local drafts.
//! Local drafts are owned by the UI-facing caller; this type never stores
//! them. The value is threaded explicitly through callers; it is not an
//! ambient global.

use crate::core::column::Column;

/// The single shared input draft for the active session.
#[derive(Debug, Clone, Default)]
pub struct SyncInput {
    shared: String,
}

impl SyncInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the shared draft. Pure replacement, no merge.
    pub fn set_shared(&mut self, value: impl Into<String>) {
        self.shared = value.into();
    }

    pub fn shared(&self) -> &str {
        &self.shared
    }

    /// Resolves the effective input for a column: the shared draft when the
    /// column syncs inputs, the caller-owned local draft otherwise.
    pub fn resolve_for<'a>(&'a self, column: &Column, local_draft: &'a str) -> &'a str {
        if column.sync_inputs() {
            &self.shared
        } else {
            local_draft
        }
    }

    /// Clears the shared draft after a synced column submits, so every
    /// synced column observes the cleared value at once.
    pub fn consume_shared(&mut self) {
        self.shared.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::column::{Column, ColumnPatch};

    fn unsynced_column() -> Column {
        let mut column = Column::new("gpt-3.5-turbo");
        column.apply_patch(ColumnPatch {
            sync_inputs: Some(false),
            ..ColumnPatch::default()
        });
        column
    }

    #[test]
    fn test_resolve_for_synced_column_reads_shared() {
        let mut inputs = SyncInput::new();
        inputs.set_shared("shared draft");
        let column = Column::new("gpt-3.5-turbo");
        assert_eq!(inputs.resolve_for(&column, "local draft"), "shared draft");
    }

    #[test]
    fn test_resolve_for_unsynced_column_reads_local() {
        let mut inputs = SyncInput::new();
        inputs.set_shared("shared draft");
        let column = unsynced_column();
        assert_eq!(inputs.resolve_for(&column, "local draft"), "local draft");
    }

    #[test]
    fn test_set_shared_replaces_wholesale() {
        let mut inputs = SyncInput::new();
        inputs.set_shared("first");
        inputs.set_shared("second");
        assert_eq!(inputs.shared(), "second");
    }

    #[test]
    fn test_consume_shared_clears_for_all_synced_readers() {
        let mut inputs = SyncInput::new();
        inputs.set_shared("draft");
        inputs.consume_shared();

        let synced = Column::new("gpt-3.5-turbo");
        let unsynced = unsynced_column();
        assert_eq!(inputs.resolve_for(&synced, "ignored"), "");
        // Unsynced columns are unaffected by the reset.
        assert_eq!(inputs.resolve_for(&unsynced, "kept"), "kept");
    }
}
