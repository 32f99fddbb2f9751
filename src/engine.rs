//! Sheet engine: the single owner of compositor state.
//!
//! DESIGN
//! ======
//! All mutations flow through the operations on [`SheetEngine`]; nothing else
//! writes the item store. Each operation is a synchronous transformation of
//! the previous state — the one exception is [`SheetEngine::add_images`],
//! which first awaits the dimension probes for its batch and then applies a
//! single combined update, so an observer never sees the batch half-applied.
//!
//! Operations return [`Action`]s for the host to process: final document
//! mutations (to broadcast, journal, or mirror into its own view layer),
//! advisory [`Action::Notice`]s, and [`Action::RenderNeeded`] redraw hints.
//!
//! Methods take `&mut self`, so in a single-threaded event loop no locking is
//! needed; a multi-threaded host wraps the engine in a mutex or drives it
//! from one task.
//!
//! ERROR HANDLING
//! ==============
//! No operation returns an error. Capacity problems become notices, decode
//! failures become a fallback aspect ratio plus a warning log, and mutations
//! aimed at ids that no longer exist are absorbed as no-ops — stale
//! references from a late-arriving UI event are normal, not exceptional.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::consts::{FALLBACK_ASPECT_RATIO, MAX_SHEET_ITEMS, MIN_WIDTH_PCT};
use crate::doc::{ItemId, PartialSheetItem, SheetDoc, SheetItem};
use crate::format::{CustomFormat, SheetFormat};
use crate::hit::{HitPart, hit_test};
use crate::input::{InputState, Point, UiState};
use crate::layout;
use crate::probe::DimensionProbe;

/// A candidate image handed to [`SheetEngine::add_images`]. `id` and `src`
/// come from the history store, which keeps ownership of the image bytes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceImage {
    pub id: ItemId,
    pub src: String,
    pub name: String,
}

/// Actions returned from engine operations for the host to process.
#[derive(Debug, Clone)]
pub enum Action {
    /// An item entered the sheet.
    ItemCreated(SheetItem),
    /// An item's placement fields changed.
    ItemUpdated { id: ItemId, fields: PartialSheetItem },
    /// An item left the sheet.
    ItemDeleted { id: ItemId },
    /// Every item left the sheet.
    SheetCleared,
    /// Advisory message for the user (capacity and partial-add notices).
    /// Fire-and-forget; never a blocking confirmation.
    Notice { message: String },
    /// The visible state changed; the host should redraw.
    RenderNeeded,
}

/// Read-only state snapshot for an export consumer.
///
/// Coordinates are percentages of sheet dimensions, so one snapshot
/// rasterizes at any output resolution (see [`crate::render`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetSnapshot {
    pub items: Vec<SheetItem>,
    pub format: SheetFormat,
    pub custom_format: CustomFormat,
    pub background_color: String,
}

/// The compositor engine: item store, sheet configuration, selection, and
/// the active gesture.
pub struct SheetEngine {
    doc: SheetDoc,
    format: SheetFormat,
    custom_format: CustomFormat,
    background_color: String,
    ui: UiState,
    input: InputState,
}

impl Default for SheetEngine {
    fn default() -> Self {
        Self {
            doc: SheetDoc::new(),
            format: SheetFormat::default(),
            custom_format: CustomFormat::default(),
            background_color: "#FFFFFF".to_string(),
            ui: UiState::default(),
            input: InputState::default(),
        }
    }
}

impl SheetEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Adding images ---

    /// Add a batch of images from the history store.
    ///
    /// Every candidate is measured concurrently up front; a candidate whose
    /// probe fails gets [`FALLBACK_ASPECT_RATIO`] and the batch carries on.
    /// Items are appended in input order regardless of which probe settled
    /// first. Candidates already on the sheet (same `src`) are dropped, the
    /// remainder is truncated to the free slots below [`MAX_SHEET_ITEMS`],
    /// and the whole accepted set is appended in one atomic update.
    pub async fn add_images<P>(&mut self, probe: &P, images: Vec<SourceImage>) -> Vec<Action>
    where
        P: DimensionProbe + ?Sized,
    {
        if images.is_empty() {
            return Vec::new();
        }

        let ratios = join_all(images.iter().map(|image| measure(probe, image))).await;

        let available = MAX_SHEET_ITEMS.saturating_sub(self.doc.len());
        if available == 0 {
            return vec![Action::Notice {
                message: format!("The sheet already holds the maximum of {MAX_SHEET_ITEMS} images."),
            }];
        }

        let requested = images.len();
        let accepted: Vec<(SourceImage, f64)> = images
            .into_iter()
            .zip(ratios)
            .filter(|(image, _)| !self.doc.contains_src(&image.src))
            .take(available)
            .collect();

        if accepted.is_empty() {
            debug!("add_images: every candidate is already on the sheet");
            return Vec::new();
        }

        let mut actions = Vec::with_capacity(accepted.len() + 2);
        if accepted.len() < requested {
            actions.push(Action::Notice {
                message: format!(
                    "Only {} of {requested} images were added; the sheet holds at most {MAX_SHEET_ITEMS}.",
                    accepted.len()
                ),
            });
        }

        let container_aspect = self.container_aspect();
        let base_z = self.doc.max_z_index().max(0);
        let batch: Vec<SheetItem> = accepted
            .into_iter()
            .enumerate()
            .map(|(index, (image, aspect_ratio))| {
                let (x, y) = layout::stagger_offset(index);
                SheetItem {
                    id: image.id,
                    src: image.src,
                    name: image.name,
                    x,
                    y,
                    width: layout::initial_width_pct(aspect_ratio, container_aspect),
                    z_index: base_z + index as i64 + 1,
                    aspect_ratio,
                }
            })
            .collect();

        actions.extend(batch.iter().cloned().map(Action::ItemCreated));
        self.doc.append_batch(batch);
        actions.push(Action::RenderNeeded);
        actions
    }

    // --- Item mutations ---

    /// Apply a sparse update to one item. No bounds clamping: free manual
    /// placement, including off-canvas, is allowed. Unknown ids are ignored.
    pub fn update_item(&mut self, id: &ItemId, fields: &PartialSheetItem) -> Vec<Action> {
        if !self.doc.apply_partial(id, fields) {
            debug!(%id, "update for unknown item ignored");
            return Vec::new();
        }
        vec![
            Action::ItemUpdated { id: *id, fields: fields.clone() },
            Action::RenderNeeded,
        ]
    }

    /// Raise an item above everything else. Idempotent: an item that is
    /// already frontmost is left untouched and no actions are emitted.
    pub fn bring_to_front(&mut self, id: &ItemId) -> Vec<Action> {
        let Some(item) = self.doc.get(id) else {
            debug!(%id, "bring_to_front for unknown item ignored");
            return Vec::new();
        };
        let max_z = self.doc.max_z_index();
        if item.z_index == max_z {
            return Vec::new();
        }
        let fields = PartialSheetItem { z_index: Some(max_z + 1), ..Default::default() };
        self.doc.apply_partial(id, &fields);
        vec![Action::ItemUpdated { id: *id, fields }, Action::RenderNeeded]
    }

    /// Repack every item into a near-square grid, in insertion order.
    /// Overwrites position and width; stacking order survives the re-layout.
    pub fn auto_arrange(&mut self) -> Vec<Action> {
        if self.doc.is_empty() {
            return Vec::new();
        }
        let placements = layout::arrange(self.doc.items(), self.container_aspect());
        let ids: Vec<ItemId> = self.doc.iter().map(|item| item.id).collect();

        let mut actions = Vec::with_capacity(ids.len() + 1);
        for (id, placement) in ids.into_iter().zip(placements) {
            let fields = PartialSheetItem {
                x: Some(placement.x),
                y: Some(placement.y),
                width: Some(placement.width),
                ..Default::default()
            };
            self.doc.apply_partial(&id, &fields);
            actions.push(Action::ItemUpdated { id, fields });
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Remove one item. Unknown ids are ignored. A gesture or selection
    /// pointing at the removed item is dropped with it.
    pub fn remove_item(&mut self, id: &ItemId) -> Vec<Action> {
        if self.doc.remove(id).is_none() {
            debug!(%id, "remove for unknown item ignored");
            return Vec::new();
        }
        if self.ui.selected_id.as_ref() == Some(id) {
            self.ui.selected_id = None;
        }
        if self.input.targets(id) {
            self.input = InputState::Idle;
        }
        vec![Action::ItemDeleted { id: *id }, Action::RenderNeeded]
    }

    /// Remove every item and reset selection and gesture state. Always wins:
    /// a clear landing after a concurrent batch add leaves an empty sheet.
    pub fn clear(&mut self) -> Vec<Action> {
        self.doc.clear();
        self.ui.selected_id = None;
        self.input = InputState::Idle;
        vec![Action::SheetCleared, Action::RenderNeeded]
    }

    // --- Sheet configuration ---

    /// Switch the output format. Item geometry is untouched: stored widths
    /// are percentages, and derived heights track the new aspect implicitly.
    pub fn set_format(&mut self, format: SheetFormat) -> Vec<Action> {
        if self.format == format {
            return Vec::new();
        }
        self.format = format;
        vec![Action::RenderNeeded]
    }

    /// Update the custom aspect ratio used when the format is
    /// [`SheetFormat::Custom`].
    pub fn set_custom_format(&mut self, custom: CustomFormat) -> Vec<Action> {
        if self.custom_format == custom {
            return Vec::new();
        }
        self.custom_format = custom;
        vec![Action::RenderNeeded]
    }

    /// Set the color painted behind all items at export time.
    pub fn set_background_color(&mut self, color: String) -> Vec<Action> {
        if self.background_color == color {
            return Vec::new();
        }
        self.background_color = color;
        vec![Action::RenderNeeded]
    }

    // --- Pointer gestures ---

    /// Pointer-down in sheet space. A body hit selects the item, raises it,
    /// and starts a drag; a handle hit selects and starts a resize; a miss
    /// clears the selection.
    pub fn on_pointer_down(&mut self, pt: Point) -> Vec<Action> {
        let hit = hit_test(pt, &self.doc, self.container_aspect(), self.ui.selected_id);
        let Some(hit) = hit else {
            if self.ui.selected_id.take().is_some() {
                return vec![Action::RenderNeeded];
            }
            return Vec::new();
        };

        let selection_changed = self.ui.selected_id != Some(hit.item_id);
        self.ui.selected_id = Some(hit.item_id);
        let mut actions = self.bring_to_front(&hit.item_id);

        let Some(item) = self.doc.get(&hit.item_id) else {
            return actions; // the hit came from the doc, so this cannot miss
        };
        self.input = match hit.part {
            HitPart::Body => InputState::DraggingItem { id: hit.item_id, last: pt, moved: false },
            HitPart::ResizeHandle => InputState::ResizingItem {
                id: hit.item_id,
                start: pt,
                orig_width: item.width,
                moved: false,
            },
        };

        if selection_changed && !actions.iter().any(|a| matches!(a, Action::RenderNeeded)) {
            actions.push(Action::RenderNeeded);
        }
        actions
    }

    /// Pointer-move in sheet space. Live gestures mutate the model directly
    /// and only ask for a redraw; the final mutation action is emitted once,
    /// on release.
    pub fn on_pointer_move(&mut self, pt: Point) -> Vec<Action> {
        match self.input {
            InputState::Idle => Vec::new(),
            InputState::DraggingItem { id, last, .. } => {
                let Some(item) = self.doc.get(&id) else {
                    self.input = InputState::Idle;
                    return Vec::new();
                };
                let fields = PartialSheetItem {
                    x: Some(item.x + pt.x - last.x),
                    y: Some(item.y + pt.y - last.y),
                    ..Default::default()
                };
                self.doc.apply_partial(&id, &fields);
                self.input = InputState::DraggingItem { id, last: pt, moved: true };
                vec![Action::RenderNeeded]
            }
            InputState::ResizingItem { id, start, orig_width, .. } => {
                let width = (orig_width + pt.x - start.x).max(MIN_WIDTH_PCT);
                let fields = PartialSheetItem { width: Some(width), ..Default::default() };
                if !self.doc.apply_partial(&id, &fields) {
                    self.input = InputState::Idle;
                    return Vec::new();
                }
                self.input = InputState::ResizingItem { id, start, orig_width, moved: true };
                vec![Action::RenderNeeded]
            }
        }
    }

    /// Pointer-up: finish the active gesture and emit its one final mutation.
    /// A down/up with no move in between was a plain click; selection was
    /// already handled on pointer-down, so nothing is emitted here.
    pub fn on_pointer_up(&mut self) -> Vec<Action> {
        match std::mem::take(&mut self.input) {
            InputState::Idle => Vec::new(),
            InputState::DraggingItem { id, moved, .. } => {
                let Some(item) = self.doc.get(&id) else {
                    return Vec::new();
                };
                if !moved {
                    return Vec::new();
                }
                let fields =
                    PartialSheetItem { x: Some(item.x), y: Some(item.y), ..Default::default() };
                vec![Action::ItemUpdated { id, fields }]
            }
            InputState::ResizingItem { id, moved, .. } => {
                let Some(item) = self.doc.get(&id) else {
                    return Vec::new();
                };
                if !moved {
                    return Vec::new();
                }
                let fields = PartialSheetItem { width: Some(item.width), ..Default::default() };
                vec![Action::ItemUpdated { id, fields }]
            }
        }
    }

    // --- Queries ---

    /// The currently selected item, if any.
    #[must_use]
    pub fn selection(&self) -> Option<ItemId> {
        self.ui.selected_id
    }

    /// The active gesture state.
    #[must_use]
    pub fn input(&self) -> InputState {
        self.input
    }

    /// Look up an item by id.
    #[must_use]
    pub fn item(&self, id: &ItemId) -> Option<&SheetItem> {
        self.doc.get(id)
    }

    /// All items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[SheetItem] {
        self.doc.items()
    }

    /// Number of items on the sheet.
    #[must_use]
    pub fn len(&self) -> usize {
        self.doc.len()
    }

    /// Returns `true` if the sheet holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.doc.is_empty()
    }

    /// The current output format.
    #[must_use]
    pub fn format(&self) -> SheetFormat {
        self.format
    }

    /// The custom format used when the format is [`SheetFormat::Custom`].
    #[must_use]
    pub fn custom_format(&self) -> CustomFormat {
        self.custom_format
    }

    /// The export background color.
    #[must_use]
    pub fn background_color(&self) -> &str {
        &self.background_color
    }

    /// The sheet's current width/height ratio.
    #[must_use]
    pub fn container_aspect(&self) -> f64 {
        self.format.aspect_ratio(self.custom_format)
    }

    /// Read-only snapshot for the export consumer.
    #[must_use]
    pub fn snapshot(&self) -> SheetSnapshot {
        SheetSnapshot {
            items: self.doc.items().to_vec(),
            format: self.format,
            custom_format: self.custom_format,
            background_color: self.background_color.clone(),
        }
    }
}

/// Resolve one candidate's aspect ratio, absorbing probe failures into the
/// square fallback so the batch never aborts.
async fn measure<P>(probe: &P, image: &SourceImage) -> f64
where
    P: DimensionProbe + ?Sized,
{
    match probe.dimensions(&image.src).await {
        Ok(dims) => match dims.aspect_ratio() {
            Some(ratio) => ratio,
            None => {
                warn!(name = %image.name, "image reported zero dimensions; using square fallback");
                FALLBACK_ASPECT_RATIO
            }
        },
        Err(error) => {
            warn!(name = %image.name, %error, "could not measure image; using square fallback");
            FALLBACK_ASPECT_RATIO
        }
    }
}
