//! Ordered collection of columns.
//!
//! Insertion order is display/iteration order. Columns are addressed only by
//! id; removal shifts positions, so nothing here exposes index-based access.
//! Operations on an absent id are silent no-ops, since a concurrent removal
//! may already have taken the column away.

use crate::config::Config;
use crate::core::column::{Column, ColumnId, ColumnPatch};

/// The ordered set of chat columns.
#[derive(Debug, Clone, Default)]
pub struct ColumnSet {
    columns: Vec<Column>,
}

impl ColumnSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a new column bound to `model` and returns its id.
    pub fn add_column(&mut self, model: impl Into<String>) -> ColumnId {
        let column = Column::new(model);
        let id = column.id();
        debug_assert!(self.find(id).is_none(), "column ids must be unique");
        self.columns.push(column);
        id
    }

    /// Appends a new column bound to the configured default model.
    pub fn add_default_column(&mut self, config: &Config) -> ColumnId {
        self.add_column(config.default_model.clone())
    }

    /// Removes the column with the given id. Silent no-op when absent.
    pub fn remove_column(&mut self, id: ColumnId) {
        self.columns.retain(|column| column.id() != id);
    }

    /// Applies a patch to the column with the given id. Silent no-op when
    /// absent.
    pub fn update_column(&mut self, id: ColumnId, patch: ColumnPatch) {
        match self.find_mut(id) {
            Some(column) => column.apply_patch(patch),
            None => tracing::debug!(%id, "update for unknown column ignored"),
        }
    }

    pub fn find(&self, id: ColumnId) -> Option<&Column> {
        self.columns.iter().find(|column| column.id() == id)
    }

    pub fn find_mut(&mut self, id: ColumnId) -> Option<&mut Column> {
        self.columns.iter_mut().find(|column| column.id() == id)
    }

    /// Iterates over columns in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}
