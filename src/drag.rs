//! Transform session: per-gesture state for move, resize, and rotate.
//!
//! A [`Drag`] lives from pointer-down-on-handle to pointer-up. Resize and
//! rotate compute every frame against an immutable origin snapshot captured
//! on the first frame of the gesture, so they are anchored and reversible
//! rather than accumulating drift. Move is deliberately frame-incremental:
//! it has no boundary condition to protect, so drift is harmless and the
//! incremental delta avoids re-deriving the box every frame.

#[cfg(test)]
#[path = "drag_test.rs"]
mod drag_test;

use std::collections::HashMap;

use crate::consts::MIN_RESIZE_SIZE;
use crate::geom::{Point, Rect, Transform};
use crate::handle::Handle;
use crate::shape::ShapeId;

/// Immutable snapshot of one shape at gesture start: the pointer position on
/// the first frame, the shape's box at that instant, a deep copy of its
/// positions, and its pre-gesture transform.
#[derive(Debug, Clone)]
pub struct Origin {
    pub pointer: Point,
    pub rect: Rect,
    pub positions: Vec<Point>,
    pub transform: Transform,
}

/// The active transform session.
///
/// Created empty (no handle); populated on pointer-down when a handle is
/// hit; cleared on pointer-up or when pointer-down misses every handle.
#[derive(Debug, Clone, Default)]
pub struct Drag {
    handle: Option<Handle>,
    target_id: Option<ShapeId>,
    previous: Option<Point>,
    origins: HashMap<ShapeId, Origin>,
}

impl Drag {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the session with the hit handle and the shape that anchors
    /// rotate/resize.
    pub fn begin(&mut self, handle: Handle, target_id: ShapeId) {
        self.handle = Some(handle);
        self.target_id = Some(target_id);
        self.previous = None;
        self.origins.clear();
    }

    /// Discard all gesture state. Safe to call when already idle.
    pub fn clear(&mut self) {
        self.handle = None;
        self.target_id = None;
        self.previous = None;
        self.origins.clear();
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.handle.is_some()
    }

    #[must_use]
    pub fn handle(&self) -> Option<Handle> {
        self.handle
    }

    #[must_use]
    pub fn target_id(&self) -> Option<ShapeId> {
        self.target_id
    }

    /// Frame-to-frame pointer delta for a move gesture.
    ///
    /// The first call snapshots the pointer and reports a zero delta; each
    /// later call reports the offset from the previous frame. The caller
    /// applies the delta to every point of every shape being moved.
    pub fn move_delta(&mut self, pointer: Point) -> (f64, f64) {
        let previous = self.previous.unwrap_or(pointer);
        self.previous = Some(pointer);
        (pointer.x - previous.x, pointer.y - previous.y)
    }

    /// Resize `positions` for the shape `id` against its origin snapshot.
    ///
    /// Returns the full replacement point list, or `None` when the shape is
    /// degenerate or the pointer would shrink the box below
    /// [`MIN_RESIZE_SIZE`] (the shape keeps its pre-drag geometry for this
    /// frame).
    pub fn resize(&mut self, id: ShapeId, pointer: Point, positions: &[Point]) -> Option<Vec<Point>> {
        let handle = self.handle?;
        let origin = self.origin_for(id, pointer, positions)?;

        if below_min_size(handle, pointer, &origin.rect) {
            return None;
        }

        let delta = Point::new(pointer.x - origin.pointer.x, pointer.y - origin.pointer.y);
        let rect = origin.rect;
        let scaled = origin
            .positions
            .iter()
            .map(|p| {
                let (sx, sy) = point_scale(handle, *p, &rect);
                Point::new(p.x + delta.x * sx, p.y + delta.y * sy)
            })
            .collect();
        Some(scaled)
    }

    /// Rotation matrix for the shape `id` at the current pointer position.
    ///
    /// The angle delta is measured about the centroid of the origin box, from
    /// the gesture-start pointer to the current pointer, and composed onto
    /// the shape's pre-gesture rotation. The stored point list is never
    /// rewritten; the compositor applies the returned matrix per frame.
    /// `None` for degenerate shapes.
    pub fn rotate(
        &mut self,
        id: ShapeId,
        pointer: Point,
        positions: &[Point],
        transform: Transform,
    ) -> Option<Transform> {
        let origin = self.origin_with_transform(id, pointer, positions, transform)?;
        let center = origin.rect.center();
        let init_angle = (origin.pointer.y - center.y).atan2(origin.pointer.x - center.x);
        let current_angle = (pointer.y - center.y).atan2(pointer.x - center.x);
        let delta = current_angle - init_angle;
        Some(Transform::rotate_about(center, origin.transform.angle() + delta))
    }

    /// Origin snapshot for `id` at the current pointer position, captured on
    /// the first frame that touches the shape.
    fn origin_for(&mut self, id: ShapeId, pointer: Point, positions: &[Point]) -> Option<Origin> {
        self.origin_with_transform(id, pointer, positions, Transform::identity())
    }

    fn origin_with_transform(
        &mut self,
        id: ShapeId,
        pointer: Point,
        positions: &[Point],
        transform: Transform,
    ) -> Option<Origin> {
        if let Some(origin) = self.origins.get(&id) {
            return Some(origin.clone());
        }
        let rect = Rect::from_points(positions)?;
        let origin = Origin {
            pointer,
            rect,
            positions: positions.to_vec(),
            transform,
        };
        self.origins.insert(id, origin.clone());
        Some(origin)
    }
}

/// Whether the pointer has crossed the minimum-size boundary for this handle:
/// the anchor-to-pointer span along every axis the handle controls must stay
/// at least [`MIN_RESIZE_SIZE`].
fn below_min_size(handle: Handle, pointer: Point, rect: &Rect) -> bool {
    let (x, y) = (pointer.x, pointer.y);
    match handle {
        Handle::LeftTop => rect.right - x < MIN_RESIZE_SIZE || rect.bottom - y < MIN_RESIZE_SIZE,
        Handle::LeftBottom => rect.right - x < MIN_RESIZE_SIZE || y - rect.top < MIN_RESIZE_SIZE,
        Handle::RightTop => x - rect.left < MIN_RESIZE_SIZE || rect.bottom - y < MIN_RESIZE_SIZE,
        Handle::RightBottom => x - rect.left < MIN_RESIZE_SIZE || y - rect.top < MIN_RESIZE_SIZE,
        Handle::TopMid => rect.bottom - y < MIN_RESIZE_SIZE,
        Handle::BottomMid => y - rect.top < MIN_RESIZE_SIZE,
        Handle::LeftMid => rect.right - x < MIN_RESIZE_SIZE,
        Handle::RightMid => x - rect.left < MIN_RESIZE_SIZE,
        Handle::Inner | Handle::Rotate => false,
    }
}

/// Normalized per-point scale factors for a resize.
///
/// A point on the anchor line yields 0 (does not move); a point on the
/// dragged edge yields 1 (moves 1:1 with the pointer); points in between move
/// proportionally. The divisor is the point's own coordinate, not the box
/// span; callers rely on this exact mapping. Edge-mid handles force the
/// unused axis to 0.
fn point_scale(handle: Handle, p: Point, rect: &Rect) -> (f64, f64) {
    let sx_left = axis_scale(rect.right - p.x, p.x, rect.left);
    let sx_right = axis_scale(p.x - rect.left, p.x, rect.right);
    let sy_top = axis_scale(rect.bottom - p.y, p.y, rect.top);
    let sy_bottom = axis_scale(p.y - rect.top, p.y, rect.bottom);

    match handle {
        Handle::LeftTop => (sx_left, sy_top),
        Handle::LeftBottom => (sx_left, sy_bottom),
        Handle::RightTop => (sx_right, sy_top),
        Handle::RightBottom => (sx_right, sy_bottom),
        Handle::TopMid => (0.0, sy_top),
        Handle::BottomMid => (0.0, sy_bottom),
        Handle::LeftMid => (sx_left, 0.0),
        Handle::RightMid => (sx_right, 0.0),
        Handle::Inner | Handle::Rotate => (0.0, 0.0),
    }
}

/// One axis of the per-point scale. `coord` is the point's own coordinate,
/// which is also the divisor of the raw ratio.
///
/// A point sitting exactly on the dragged edge tracks the pointer 1:1; the
/// raw ratio is unstable there. A zero divisor would otherwise blow up the
/// ratio, so it pins the point instead.
#[allow(clippy::float_cmp)]
fn axis_scale(numerator: f64, coord: f64, dragged_edge: f64) -> f64 {
    if coord == dragged_edge {
        1.0
    } else if coord == 0.0 {
        0.0
    } else {
        numerator / coord
    }
}
