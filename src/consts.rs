//! Shared numeric constants for the sheet compositor.

// ── Capacity ────────────────────────────────────────────────────

/// Maximum number of items the sheet holds at once. Adds beyond this are
/// rejected with a user notice, never an error.
pub const MAX_SHEET_ITEMS: usize = 10;

// ── Auto-placement ──────────────────────────────────────────────

/// Default width of a freshly added item, percent of sheet width.
pub const DEFAULT_WIDTH_PCT: f64 = 25.0;

/// Upper bound on either rendered dimension of a freshly added item, percent.
pub const MAX_DIMENSION_PCT: f64 = 90.0;

/// Floor on item width, percent. Shared by auto-placement and manual resize
/// so no path can produce an unusably small item.
pub const MIN_WIDTH_PCT: f64 = 10.0;

/// Top-left offset of the first item of a batch, percent.
pub const STAGGER_ORIGIN_PCT: f64 = 2.0;

/// Additional offset per item within a batch, percent. Keeps sequentially
/// added items from fully overlapping.
pub const STAGGER_STEP_PCT: f64 = 2.0;

/// Aspect ratio assumed for images whose dimensions cannot be measured.
pub const FALLBACK_ASPECT_RATIO: f64 = 1.0;

// ── Auto-arrange ────────────────────────────────────────────────

/// Fraction of a grid cell an arranged item may occupy; the remainder is the
/// inset that keeps adjacent cells from touching.
pub const ARRANGE_PADDING: f64 = 0.9;

// ── Hit-testing ─────────────────────────────────────────────────

/// Side length of the resize-handle hit square, percent of sheet width.
pub const HANDLE_SIZE_PCT: f64 = 3.0;
