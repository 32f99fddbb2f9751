//! Hit-testing pointer positions against sheet items.
//!
//! Works entirely in sheet-percent space using derived heights, so the same
//! test is correct at any render size. The selected item's resize handle is
//! checked before any body so the handle stays grabbable even when another
//! item overlaps that corner; bodies are then checked topmost-first in draw
//! order.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::consts::HANDLE_SIZE_PCT;
use crate::doc::{ItemId, SheetDoc, SheetItem};
use crate::input::Point;

/// Which part of an item was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    /// The item's image area.
    Body,
    /// The resize handle at the bottom-right corner.
    ResizeHandle,
}

/// Result of a hit test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub item_id: ItemId,
    pub part: HitPart,
}

/// Test which item (if any) is under `pt`.
#[must_use]
pub fn hit_test(
    pt: Point,
    doc: &SheetDoc,
    container_aspect: f64,
    selected_id: Option<ItemId>,
) -> Option<Hit> {
    if let Some(id) = selected_id
        && let Some(item) = doc.get(&id)
        && in_handle(pt, item, container_aspect)
    {
        return Some(Hit { item_id: id, part: HitPart::ResizeHandle });
    }

    let mut items = doc.sorted_items();
    items.reverse();
    items
        .into_iter()
        .find(|item| in_body(pt, item, container_aspect))
        .map(|item| Hit { item_id: item.id, part: HitPart::Body })
}

fn in_body(pt: Point, item: &SheetItem, container_aspect: f64) -> bool {
    let height = item.height_pct(container_aspect);
    pt.x >= item.x && pt.x <= item.x + item.width && pt.y >= item.y && pt.y <= item.y + height
}

/// The handle hit square is centered on the bottom-right corner, so it is
/// grabbable from slightly outside the item as well as inside.
fn in_handle(pt: Point, item: &SheetItem, container_aspect: f64) -> bool {
    let half = HANDLE_SIZE_PCT / 2.0;
    let corner_x = item.x + item.width;
    let corner_y = item.y + item.height_pct(container_aspect);
    (pt.x - corner_x).abs() <= half && (pt.y - corner_y).abs() <= half
}
