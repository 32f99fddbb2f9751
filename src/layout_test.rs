#![allow(clippy::float_cmp)]

use uuid::Uuid;

use super::*;
use crate::doc::SheetItem;

fn make_item(aspect_ratio: f64) -> SheetItem {
    SheetItem {
        id: Uuid::new_v4(),
        src: format!("blob:{aspect_ratio}"),
        name: String::new(),
        x: 0.0,
        y: 0.0,
        width: 25.0,
        z_index: 0,
        aspect_ratio,
    }
}

const LANDSCAPE: f64 = 16.0 / 9.0;
const PORTRAIT: f64 = 9.0 / 16.0;

// =============================================================
// initial_width_pct
// =============================================================

#[test]
fn square_image_on_landscape_keeps_default_width() {
    // height = (25 * 16/9) / 1 = 44.4 < 90, so the default width stands.
    assert_eq!(initial_width_pct(1.0, LANDSCAPE), 25.0);
}

#[test]
fn wide_image_keeps_default_width() {
    // A wide image is short at default width; nothing to shrink.
    assert_eq!(initial_width_pct(4.0, 1.0), 25.0);
}

#[test]
fn tall_image_shrinks_to_fit_height() {
    // height = (25 * 16/9) / 0.4 = 111.1 > 90,
    // so width = (90 * 0.4) / (16/9) = 20.25.
    let width = initial_width_pct(0.4, LANDSCAPE);
    assert!((width - 20.25).abs() < 1e-9);
}

#[test]
fn extreme_tall_image_clamps_to_floor() {
    // height = (25 * 1) / 0.05 = 500 > 90 ⇒ width = (90 * 0.05) / 1 = 4.5,
    // which is below the floor and comes back as 10.
    assert_eq!(initial_width_pct(0.05, 1.0), 10.0);
}

#[test]
fn boundary_height_just_under_limit_keeps_default() {
    // height = (25 * 16/9) / 0.5 = 88.9 < 90.
    assert_eq!(initial_width_pct(0.5, LANDSCAPE), 25.0);
}

#[test]
fn derived_height_never_exceeds_max_dimension() {
    let containers = [LANDSCAPE, PORTRAIT, 1.0, 2.0];
    let aspects = [0.01, 0.05, 0.2, 0.5, 1.0, 2.0, 5.0, 50.0];
    for container in containers {
        for aspect in aspects {
            let width = initial_width_pct(aspect, container);
            let height = (width / aspect) * container;
            // The floor can push a pathologically narrow image past the
            // height cap; everything at or above the floor must fit.
            if width > crate::consts::MIN_WIDTH_PCT {
                assert!(
                    height <= crate::consts::MAX_DIMENSION_PCT + 1e-9,
                    "aspect {aspect} in container {container}: height {height}"
                );
            }
            assert!(width >= crate::consts::MIN_WIDTH_PCT);
            assert!(width <= crate::consts::MAX_DIMENSION_PCT);
        }
    }
}

// =============================================================
// stagger_offset
// =============================================================

#[test]
fn stagger_starts_at_two_percent() {
    assert_eq!(stagger_offset(0), (2.0, 2.0));
}

#[test]
fn stagger_steps_two_percent_per_item() {
    assert_eq!(stagger_offset(1), (4.0, 4.0));
    assert_eq!(stagger_offset(4), (10.0, 10.0));
}

// =============================================================
// GridSpec
// =============================================================

#[test]
fn grid_for_zero_items() {
    assert_eq!(GridSpec::for_count(0), GridSpec { cols: 0, rows: 0 });
}

#[test]
fn grid_for_small_counts() {
    assert_eq!(GridSpec::for_count(1), GridSpec { cols: 1, rows: 1 });
    assert_eq!(GridSpec::for_count(2), GridSpec { cols: 2, rows: 1 });
    assert_eq!(GridSpec::for_count(3), GridSpec { cols: 2, rows: 2 });
    assert_eq!(GridSpec::for_count(4), GridSpec { cols: 2, rows: 2 });
}

#[test]
fn grid_for_five_items_is_three_by_two() {
    assert_eq!(GridSpec::for_count(5), GridSpec { cols: 3, rows: 2 });
}

#[test]
fn grid_for_full_sheet() {
    assert_eq!(GridSpec::for_count(9), GridSpec { cols: 3, rows: 3 });
    assert_eq!(GridSpec::for_count(10), GridSpec { cols: 4, rows: 3 });
}

// =============================================================
// arrange
// =============================================================

#[test]
fn arrange_empty_returns_nothing() {
    assert!(arrange(&[], LANDSCAPE).is_empty());
}

#[test]
fn arrange_single_square_item_centers_on_square_sheet() {
    let items = vec![make_item(1.0)];
    let placements = arrange(&items, 1.0);
    assert_eq!(placements.len(), 1);
    // One 100×100 cell, item fits to 90 and is centered at 5.
    assert_eq!(placements[0].width, 90.0);
    assert_eq!(placements[0].x, 5.0);
    assert_eq!(placements[0].y, 5.0);
}

#[test]
fn arrange_assigns_cells_row_major_in_input_order() {
    let items: Vec<SheetItem> = (0..5).map(|_| make_item(1.0)).collect();
    let placements = arrange(&items, 1.0);

    // 3×2 grid on a square sheet: cells are 33.3 wide, 50 tall.
    let cell_w = 100.0 / 3.0;
    for (index, placement) in placements.iter().enumerate() {
        let col = index % 3;
        let row = index / 3;
        let cell_x = col as f64 * cell_w;
        let cell_y = row as f64 * 50.0;
        assert!(
            placement.x >= cell_x && placement.x < cell_x + cell_w,
            "item {index} escaped its column"
        );
        assert!(
            placement.y >= cell_y && placement.y < cell_y + 50.0,
            "item {index} escaped its row"
        );
    }
}

#[test]
fn arrange_wide_item_fits_cell_width() {
    // Square sheet, single cell (1 item): cell aspect is 1, item is wider.
    let items = vec![make_item(3.0)];
    let placements = arrange(&items, 1.0);
    assert_eq!(placements[0].width, 90.0);
}

#[test]
fn arrange_tall_item_fits_cell_height() {
    // Square sheet, single cell: item aspect 0.5 is taller than the cell,
    // so height = 90 and width = 90 * 0.5 = 45.
    let items = vec![make_item(0.5)];
    let placements = arrange(&items, 1.0);
    assert_eq!(placements[0].width, 45.0);
    assert_eq!(placements[0].x, 27.5); // centered: (100 - 45) / 2
}

#[test]
fn arrange_keeps_every_item_within_bounds() {
    let aspects = [0.05, 0.3, 1.0, 1.9, 8.0];
    let containers = [LANDSCAPE, PORTRAIT, 1.0];
    for container in containers {
        for n in 1..=10 {
            let items: Vec<SheetItem> =
                (0..n).map(|i| make_item(aspects[i % aspects.len()])).collect();
            let placements = arrange(&items, container);
            assert_eq!(placements.len(), n);
            for (item, placement) in items.iter().zip(&placements) {
                let height = (placement.width / item.aspect_ratio) * container;
                assert!(placement.x >= -1e-9, "x {} out of bounds", placement.x);
                assert!(placement.y >= -1e-9, "y {} out of bounds", placement.y);
                assert!(
                    placement.x + placement.width <= 100.0 + 1e-9,
                    "right edge {} out of bounds",
                    placement.x + placement.width
                );
                assert!(
                    placement.y + height <= 100.0 + 1e-9,
                    "bottom edge {} out of bounds",
                    placement.y + height
                );
            }
        }
    }
}

#[test]
fn arrange_is_independent_of_item_positions() {
    let mut near = make_item(1.0);
    near.x = 2.0;
    near.y = 2.0;
    let mut far = make_item(1.0);
    far.x = 180.0;
    far.y = -40.0;

    // Manual positions, even off-canvas ones, don't affect the grid.
    let placements_near = arrange(std::slice::from_ref(&near), 1.0);
    let placements_far = arrange(std::slice::from_ref(&far), 1.0);
    assert_eq!(placements_near, placements_far);
}
