//! Drop zone model for pane drag-and-drop
//!
//! A pane being dragged over another pane is dropped on the side whose edge
//! is closest to the pointer. This module keeps that calculation free of any
//! UI toolkit so it can be tested directly.

use super::types::DropSide;

/// Axis-aligned rectangle in pane-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropRect {
    /// Left edge
    pub x: f64,
    /// Top edge
    pub y: f64,
    /// Width in pixels
    pub width: f64,
    /// Height in pixels
    pub height: f64,
}

/// Picks the drop side for a pointer at `(x, y)` inside a `width` x `height`
/// pane.
///
/// Distances to the four edges are normalized by the pane size so wide and
/// tall panes behave the same. Ties resolve in the order left, right, top,
/// bottom.
///
/// # Returns
/// The side to insert on, or `None` if the point lies outside the pane or
/// the pane has no area.
#[must_use]
pub fn side_for_point(x: f64, y: f64, width: f64, height: f64) -> Option<DropSide> {
    if !(width > 0.0 && height > 0.0) {
        return None;
    }
    if !(0.0..=width).contains(&x) || !(0.0..=height).contains(&y) {
        return None;
    }

    let candidates = [
        (DropSide::Left, x / width),
        (DropSide::Right, (width - x) / width),
        (DropSide::Top, y / height),
        (DropSide::Bottom, (height - y) / height),
    ];

    let mut best = candidates[0];
    for candidate in &candidates[1..] {
        if candidate.1 < best.1 {
            best = *candidate;
        }
    }
    Some(best.0)
}

/// Returns the half of the pane highlighted while hovering over `side`.
#[must_use]
pub fn preview_rect(side: DropSide, width: f64, height: f64) -> DropRect {
    let half_width = width / 2.0;
    let half_height = height / 2.0;
    match side {
        DropSide::Left => DropRect { x: 0.0, y: 0.0, width: half_width, height },
        DropSide::Right => DropRect { x: half_width, y: 0.0, width: half_width, height },
        DropSide::Top => DropRect { x: 0.0, y: 0.0, width, height: half_height },
        DropSide::Bottom => DropRect { x: 0.0, y: half_height, width, height: half_height },
    }
}
