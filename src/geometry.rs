//! Pure geometry helpers for connector lines.
//!
//! Bearings follow the compass convention used on the canvas: 0° points up the
//! screen and angles grow clockwise, even though canvas Y grows downwards.

use crate::constants::{LABEL_BELOW_EXTRA, LABEL_MIDPOINT_THRESHOLD, LABEL_OFFSET};
use egui::Pos2;

/// Returns the bearing of `to` as seen from `from`, in degrees within `[0, 360)`.
pub fn bearing(from: Pos2, to: Pos2) -> f32 {
    let delta = to - from;
    // atan2(dx, -dy) measures clockwise from screen-up
    let degrees = delta.x.atan2(-delta.y).to_degrees();
    let normalized = degrees.rem_euclid(360.0);
    if normalized >= 360.0 {
        0.0
    } else {
        normalized
    }
}

/// Euclidean distance between two points.
pub fn distance(a: Pos2, b: Pos2) -> f32 {
    (b - a).length()
}

/// Tests whether two top-left anchored rectangles share a non-zero area.
///
/// Rectangles that only touch along an edge or a corner do not overlap.
pub fn rect_overlap(
    a: Pos2,
    width_a: f32,
    height_a: f32,
    b: Pos2,
    width_b: f32,
    height_b: f32,
) -> bool {
    a.x < b.x + width_b && b.x < a.x + width_a && a.y < b.y + height_b && b.y < a.y + height_a
}

/// Projects a point `length` units away from `anchor` along the compass bearing `degrees`.
///
/// # Arguments
///
/// * `anchor` - Start of the line
/// * `degrees` - Compass bearing (0° = up, clockwise)
/// * `length` - Distance from the anchor
///
/// # Returns
///
/// The canvas-space position of the line's far end
pub fn endpoint(anchor: Pos2, degrees: f32, length: f32) -> Pos2 {
    // Reflect about 90°/270° so sin/cos map onto a Y-down canvas
    let pivot = if degrees <= 180.0 { 90.0 } else { 270.0 };
    let radians = (2.0 * pivot - degrees).to_radians();
    egui::pos2(
        anchor.x + radians.sin() * length,
        anchor.y + radians.cos() * length,
    )
}

/// Chooses where a connector's caption is drawn.
///
/// Long lines are labelled at their midpoint. Short lines are labelled beside the
/// handle, pushed away from the anchor so the text does not cover the tile.
pub fn label_position(start: Pos2, end: Pos2, length: f32) -> Pos2 {
    if length > LABEL_MIDPOINT_THRESHOLD {
        return start + (end - start) * 0.5;
    }
    let x_offset = if end.x > start.x {
        LABEL_OFFSET
    } else {
        -LABEL_OFFSET
    };
    let y_offset = if end.y > start.y {
        LABEL_OFFSET + LABEL_BELOW_EXTRA
    } else {
        -LABEL_OFFSET
    };
    egui::pos2(end.x + x_offset, end.y + y_offset)
}
