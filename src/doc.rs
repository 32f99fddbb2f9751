//! Document model: sheet items, sparse updates, and the in-memory store.
//!
//! This module defines the core data types that describe what is on the sheet
//! (`SheetItem`), a sparse-update type for incremental edits
//! (`PartialSheetItem`), and the runtime store that owns all live items
//! (`SheetDoc`).
//!
//! The store is backed by a `Vec` because item order is meaningful: grid
//! auto-arrange fills cells in insertion order, not z-order. Draw order is a
//! separate, derived view via [`SheetDoc::sorted_items`].

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a sheet item. Reused from the source image's id, so
/// the history store and the sheet agree on identity.
pub type ItemId = Uuid;

/// One placed image on the sheet.
///
/// `x`, `y` and `width` are percentages of sheet width/height in `[0, 100]`
/// semantics. Nothing re-clamps them after a manual drag; off-canvas staging
/// is allowed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetItem {
    /// Unique identifier for this item.
    pub id: ItemId,
    /// Reference to the underlying image bytes. The history store owns the
    /// bytes; the sheet only ever reads through this reference.
    pub src: String,
    /// Display name, cosmetic only.
    pub name: String,
    /// Left edge, percent of sheet width.
    pub x: f64,
    /// Top edge, percent of sheet height.
    pub y: f64,
    /// Width, percent of sheet width. Height is never stored; see
    /// [`SheetItem::height_pct`].
    pub width: f64,
    /// Stacking order; higher draws on top. Not required to be contiguous.
    pub z_index: i64,
    /// Intrinsic width/height ratio of the source image, captured once at
    /// insertion and immutable for the item's lifetime. Always `> 0`.
    pub aspect_ratio: f64,
}

impl SheetItem {
    /// Rendered height in percent of sheet height.
    ///
    /// Derived on demand from the stored width so width and height can never
    /// desynchronize: resizing width alone always preserves the image's true
    /// aspect ratio. `container_aspect` is the sheet's own width/height ratio,
    /// needed because percent-of-width and percent-of-height are different
    /// units.
    #[must_use]
    pub fn height_pct(&self, container_aspect: f64) -> f64 {
        (self.width / self.aspect_ratio) * container_aspect
    }
}

/// Sparse update for a sheet item. Only present fields are applied.
///
/// `id`, `src`, `name` and `aspect_ratio` are deliberately absent: identity
/// and intrinsic geometry are fixed at insertion time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PartialSheetItem {
    /// New x position, if being updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    /// New y position, if being updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    /// New width, if being updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    /// New z-index, if being updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z_index: Option<i64>,
}

/// In-memory store of sheet items, in insertion order.
pub struct SheetDoc {
    items: Vec<SheetItem>,
}

impl SheetDoc {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Append one item.
    pub fn push(&mut self, item: SheetItem) {
        self.items.push(item);
    }

    /// Append a whole batch in one call, so a renderer observing the store
    /// between operations never sees a partially applied batch.
    pub fn append_batch(&mut self, batch: Vec<SheetItem>) {
        self.items.extend(batch);
    }

    /// Remove an item by id, returning it if it was present.
    pub fn remove(&mut self, id: &ItemId) -> Option<SheetItem> {
        let index = self.items.iter().position(|item| &item.id == id)?;
        Some(self.items.remove(index))
    }

    /// Return a reference to an item by id.
    #[must_use]
    pub fn get(&self, id: &ItemId) -> Option<&SheetItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Apply a partial update to an existing item. Returns false if the item
    /// doesn't exist.
    pub fn apply_partial(&mut self, id: &ItemId, partial: &PartialSheetItem) -> bool {
        let Some(item) = self.items.iter_mut().find(|item| &item.id == id) else {
            return false;
        };
        if let Some(x) = partial.x {
            item.x = x;
        }
        if let Some(y) = partial.y {
            item.y = y;
        }
        if let Some(w) = partial.width {
            item.width = w;
        }
        if let Some(z) = partial.z_index {
            item.z_index = z;
        }
        true
    }

    /// Remove all items.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Whether any current item references `src`. Used to keep the same image
    /// from being added twice.
    #[must_use]
    pub fn contains_src(&self, src: &str) -> bool {
        self.items.iter().any(|item| item.src == src)
    }

    /// Highest z-index across all items, or 0 for an empty store. The empty
    /// case is guarded explicitly rather than left to a "max of nothing"
    /// convention.
    #[must_use]
    pub fn max_z_index(&self) -> i64 {
        self.items.iter().map(|item| item.z_index).max().unwrap_or(0)
    }

    /// All items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[SheetItem] {
        &self.items
    }

    /// Iterate items in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &SheetItem> {
        self.items.iter()
    }

    /// Return all items sorted by `(z_index, id)` for draw order.
    #[must_use]
    pub fn sorted_items(&self) -> Vec<&SheetItem> {
        let mut items: Vec<&SheetItem> = self.items.iter().collect();
        items.sort_by(|a, b| a.z_index.cmp(&b.z_index).then_with(|| a.id.cmp(&b.id)));
        items
    }

    /// Number of items currently in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the store contains no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Default for SheetDoc {
    fn default() -> Self {
        Self::new()
    }
}
