//! Handle detection against a selection's bounding box.
//!
//! Given a pointer point and a shape's derived box, [`detect`] reports which
//! handle (if any) is under the pointer. Corner handles win over edge-mid
//! handles, which win over the rotate trigger, which wins over the interior.
//! [`detect_on_selection`] walks the selected shapes top-most first so the
//! most recently selected shape wins ties on overlap.

#[cfg(test)]
#[path = "handle_test.rs"]
mod handle_test;

use crate::geom::{is_in_circle, Point, Rect};
use crate::shape::{Shape, ShapeId};

/// A draggable point on a selection's bounding box, or the interior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handle {
    /// Interior of the box; dragging moves the selection.
    Inner,
    /// Rotate trigger above the top edge.
    Rotate,
    LeftTop,
    TopMid,
    RightTop,
    RightMid,
    RightBottom,
    BottomMid,
    LeftBottom,
    LeftMid,
}

/// Which handle (if any) of `shape`'s bounding box is under `pointer`.
///
/// Corner handles are circles of radius `point_radius` centered on the box
/// corners. Edge-mid handles are only offered when the box is large enough
/// that they do not overlap the corner circles. The rotate trigger sits
/// `rotate_distance` above the top edge's midpoint. Degenerate shapes have
/// no handles.
#[must_use]
pub fn detect(pointer: Point, shape: &Shape, point_radius: f64, rotate_distance: f64) -> Option<Handle> {
    let rect = shape.bounding_box()?;
    let center = rect.center();

    let corners = [
        (Handle::LeftTop, Point::new(rect.left, rect.top)),
        (Handle::RightTop, Point::new(rect.right, rect.top)),
        (Handle::RightBottom, Point::new(rect.right, rect.bottom)),
        (Handle::LeftBottom, Point::new(rect.left, rect.bottom)),
    ];
    for (handle, at) in corners {
        if is_in_circle(pointer, at, point_radius) {
            return Some(handle);
        }
    }

    // Side-mid handles collapse into the corner circles on small boxes;
    // suppress them rather than hit-test an overlapping target.
    if rect.height() > 2.0 * point_radius {
        let mids = [
            (Handle::LeftMid, Point::new(rect.left, center.y)),
            (Handle::RightMid, Point::new(rect.right, center.y)),
        ];
        for (handle, at) in mids {
            if is_in_circle(pointer, at, point_radius) {
                return Some(handle);
            }
        }
    }
    if rect.width() > 2.0 * point_radius {
        let mids = [
            (Handle::TopMid, Point::new(center.x, rect.top)),
            (Handle::BottomMid, Point::new(center.x, rect.bottom)),
        ];
        for (handle, at) in mids {
            if is_in_circle(pointer, at, point_radius) {
                return Some(handle);
            }
        }
    }

    let trigger = rotate_trigger_position(&rect, rotate_distance);
    if is_in_circle(pointer, trigger, point_radius) {
        return Some(Handle::Rotate);
    }

    if rect.contains_inner(pointer) {
        return Some(Handle::Inner);
    }

    None
}

/// Hit-test the selected shapes, top-most (most recently selected) first.
///
/// Returns the owning shape id together with the handle. `None` means the
/// gesture missed every selected shape and is a fresh marquee or a
/// deselect-all click, resolved by the engine.
#[must_use]
pub fn detect_on_selection(
    pointer: Point,
    shapes: &[&Shape],
    selection: &[ShapeId],
    point_radius: f64,
    rotate_distance: f64,
) -> Option<(ShapeId, Handle)> {
    for id in selection.iter().rev() {
        let Some(shape) = shapes.iter().find(|s| s.id == *id) else {
            continue;
        };
        if let Some(handle) = detect(pointer, shape, point_radius, rotate_distance) {
            return Some((*id, handle));
        }
    }
    None
}

/// Drawable handle centers for a box, honoring the same suppression rules as
/// [`detect`] so the visuals never disagree with hit-testing.
#[must_use]
pub fn handle_positions(rect: &Rect, point_radius: f64) -> Vec<(Handle, Point)> {
    let center = rect.center();
    let mut out = vec![
        (Handle::LeftTop, Point::new(rect.left, rect.top)),
        (Handle::RightTop, Point::new(rect.right, rect.top)),
        (Handle::RightBottom, Point::new(rect.right, rect.bottom)),
        (Handle::LeftBottom, Point::new(rect.left, rect.bottom)),
    ];
    if rect.height() > 2.0 * point_radius {
        out.push((Handle::LeftMid, Point::new(rect.left, center.y)));
        out.push((Handle::RightMid, Point::new(rect.right, center.y)));
    }
    if rect.width() > 2.0 * point_radius {
        out.push((Handle::TopMid, Point::new(center.x, rect.top)));
        out.push((Handle::BottomMid, Point::new(center.x, rect.bottom)));
    }
    out
}

/// Center of the rotate trigger circle: above the top edge's midpoint.
#[must_use]
pub fn rotate_trigger_position(rect: &Rect, rotate_distance: f64) -> Point {
    Point::new(rect.center().x, rect.top - rotate_distance)
}
