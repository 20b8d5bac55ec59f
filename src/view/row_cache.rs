//! Keyed row storage for incrementally updated tables.
//!
//! [`RowCache`] owns every row of a table keyed by the [`EntityKey`] the
//! row displays. A key's row is created once and then only mutated, so a
//! table refreshed every poll keeps its row identities and its order.
//!
//! # Invariants
//!
//! - At most one row per key.
//! - Iteration follows first-insertion order.
//! - Rows are dropped only by [`RowCache::clear`].

use std::collections::HashMap;

use super::document::Row;
use crate::domain::EntityKey;

/// Insertion-ordered map from entity key to owned row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowCache {
    width: usize,
    order: Vec<EntityKey>,
    rows: HashMap<EntityKey, Row>,
}

impl RowCache {
    /// Creates an empty cache whose rows have `width` cells.
    #[must_use]
    pub fn new(width: usize) -> Self {
        Self {
            width,
            order: Vec::new(),
            rows: HashMap::new(),
        }
    }

    /// Returns the row owned by `key`, creating and registering it first if
    /// the key has not been seen since the last [`clear`](Self::clear).
    /// The row id is [`EntityKey::row_id`].
    pub fn get_or_create(&mut self, key: &EntityKey) -> &mut Row {
        let Self { width, order, rows } = self;
        rows.entry(key.clone()).or_insert_with(|| {
            order.push(key.clone());
            let id = key.row_id();
            tracing::trace!(row_id = %id, "row created");
            Row::new(id, *width)
        })
    }

    /// Returns the row owned by `key`, if any.
    #[must_use]
    pub fn get(&self, key: &EntityKey) -> Option<&Row> {
        self.rows.get(key)
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` if the cache holds no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Iterates rows in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Row> {
        self.order.iter().filter_map(|key| self.rows.get(key))
    }

    /// Drops every row. Only an event-file reload calls this.
    pub fn clear(&mut self) {
        tracing::debug!(rows = self.order.len(), "row cache cleared");
        self.order.clear();
        self.rows.clear();
    }
}
