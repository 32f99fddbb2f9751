//! Input model: pointer points, persistent UI state, and the gesture state
//! machine.
//!
//! `InputState` is the active gesture being tracked between pointer-down and
//! pointer-up, carrying the context needed to compute incremental deltas and
//! emit one final document mutation on release. Pointer coordinates arrive
//! already converted to sheet-percent space; the core never sees pixels.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::doc::ItemId;

/// A pointer position in sheet space: percent of sheet width (`x`) and
/// percent of sheet height (`y`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Persistent UI state visible to the renderer.
#[derive(Debug, Clone, Copy, Default)]
pub struct UiState {
    /// The currently selected item, if any. Selection decides which item
    /// shows a live resize handle.
    pub selected_id: Option<ItemId>,
}

/// Internal state for the gesture state machine.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InputState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// The user is moving an item across the sheet.
    DraggingItem {
        /// Id of the item being dragged.
        id: ItemId,
        /// Pointer position at the previous event, used to compute the
        /// incremental move delta.
        last: Point,
        /// Whether any pointer-move arrived since pointer-down. A plain click
        /// selects without emitting a mutation.
        moved: bool,
    },
    /// The user is resizing an item from its corner handle.
    ResizingItem {
        /// Id of the item being resized.
        id: ItemId,
        /// Pointer position at the start of the resize.
        start: Point,
        /// Item width at the start of the resize; each move recomputes from
        /// here so the gesture accumulates no rounding drift.
        orig_width: f64,
        /// Whether any pointer-move arrived since pointer-down.
        moved: bool,
    },
}

impl InputState {
    /// Whether this gesture is acting on `id`. Used to cancel a live gesture
    /// when its target is removed out from under it.
    #[must_use]
    pub fn targets(&self, id: &ItemId) -> bool {
        match self {
            Self::Idle => false,
            Self::DraggingItem { id: target, .. } | Self::ResizingItem { id: target, .. } => {
                target == id
            }
        }
    }
}
