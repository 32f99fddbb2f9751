//! Resolution of the percent-space model into a pixel-space draw list.
//!
//! The export consumer rasterizes the sheet at an output size of its own
//! choosing; this module turns a [`SheetSnapshot`] into a background fill
//! plus back-to-front placed images at that size. No drawing happens here —
//! the host owns the actual raster surface.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use serde::{Deserialize, Serialize};

use crate::doc::{ItemId, SheetItem};
use crate::engine::SheetSnapshot;

/// One image placed in output-pixel space.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacedImage {
    pub id: ItemId,
    /// Source reference the consumer loads the actual bytes from.
    pub src: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Everything an export consumer needs to rasterize one sheet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderPlan {
    /// Fill painted before any image.
    pub background_color: String,
    /// Output width in pixels.
    pub width: f64,
    /// Output height in pixels.
    pub height: f64,
    /// Images in draw order, back to front.
    pub images: Vec<PlacedImage>,
}

impl RenderPlan {
    /// Resolve `snapshot` at the given output size.
    ///
    /// Items are ordered by `(z_index, id)`, the same tiebreak the store
    /// uses, and sized from the stored width plus the derived height, so a
    /// plan at 800×450 and a plan at 3840×2160 are the same layout scaled.
    #[must_use]
    pub fn resolve(snapshot: &SheetSnapshot, out_width: f64, out_height: f64) -> Self {
        let container_aspect = snapshot.format.aspect_ratio(snapshot.custom_format);

        let mut items: Vec<&SheetItem> = snapshot.items.iter().collect();
        items.sort_by(|a, b| a.z_index.cmp(&b.z_index).then_with(|| a.id.cmp(&b.id)));

        let images = items
            .into_iter()
            .map(|item| PlacedImage {
                id: item.id,
                src: item.src.clone(),
                x: item.x / 100.0 * out_width,
                y: item.y / 100.0 * out_height,
                width: item.width / 100.0 * out_width,
                height: item.height_pct(container_aspect) / 100.0 * out_height,
            })
            .collect();

        Self {
            background_color: snapshot.background_color.clone(),
            width: out_width,
            height: out_height,
            images,
        }
    }
}
