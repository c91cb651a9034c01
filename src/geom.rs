//! Geometry primitives: points, derived bounding boxes, the circle hit test,
//! and the explicit 2×3 affine transform used for render-time rotation.
//!
//! Transforms are plain values returned by the transform session and handed
//! to the render step; no transform state is ever held implicitly on a shared
//! drawing context.

#[cfg(test)]
#[path = "geom_test.rs"]
mod geom_test;

use serde::{Deserialize, Serialize};

/// A point in surface-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
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

/// Axis-aligned bounding box derived from a shape's point list.
///
/// Always recomputed from the current positions, never cached.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Rect {
    /// Derive the bounding box of a point list.
    ///
    /// Returns `None` for fewer than 2 points: a degenerate shape has no
    /// visible geometry and no valid handle positions.
    #[must_use]
    pub fn from_points(points: &[Point]) -> Option<Self> {
        if points.len() < 2 {
            return None;
        }
        let mut rect = Self {
            left: f64::INFINITY,
            top: f64::INFINITY,
            right: f64::NEG_INFINITY,
            bottom: f64::NEG_INFINITY,
        };
        for p in points {
            rect.left = rect.left.min(p.x);
            rect.right = rect.right.max(p.x);
            rect.top = rect.top.min(p.y);
            rect.bottom = rect.bottom.max(p.y);
        }
        Some(rect)
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Geometric center of the box.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new((self.left + self.right) / 2.0, (self.top + self.bottom) / 2.0)
    }

    /// Strict interior test; points exactly on an edge are outside.
    #[must_use]
    pub fn contains_inner(&self, pt: Point) -> bool {
        pt.x > self.left && pt.x < self.right && pt.y > self.top && pt.y < self.bottom
    }
}

/// Whether `pt` lies within (or on) the circle at `center` with `radius`.
#[must_use]
pub fn is_in_circle(pt: Point, center: Point, radius: f64) -> bool {
    (pt.x - center.x).hypot(pt.y - center.y) <= radius
}

/// A 2×3 affine transform mapping `(x, y)` to
/// `(a·x + c·y + e, b·x + d·y + f)`.
///
/// Shape transforms produced by the rotate session are always of the form
/// `translate(anchor) · rotate(θ)`, so `(e, f)` is the rotation anchor. The
/// compositor compensates by drawing the shape's points relative to that
/// anchor while the matrix is active.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Transform {
    #[must_use]
    pub fn identity() -> Self {
        Self { a: 1.0, b: 0.0, c: 0.0, d: 1.0, e: 0.0, f: 0.0 }
    }

    #[must_use]
    pub fn translate(dx: f64, dy: f64) -> Self {
        Self { e: dx, f: dy, ..Self::identity() }
    }

    /// Translate to `center`, then rotate by `radians`: the matrix the rotate
    /// session hands to the compositor.
    #[must_use]
    pub fn rotate_about(center: Point, radians: f64) -> Self {
        let (sin, cos) = radians.sin_cos();
        Self { a: cos, b: sin, c: -sin, d: cos, e: center.x, f: center.y }
    }

    /// Compose: apply `self` first, then `after`.
    #[must_use]
    pub fn then(&self, after: &Self) -> Self {
        Self {
            a: after.a * self.a + after.c * self.b,
            b: after.b * self.a + after.d * self.b,
            c: after.a * self.c + after.c * self.d,
            d: after.b * self.c + after.d * self.d,
            e: after.a * self.e + after.c * self.f + after.e,
            f: after.b * self.e + after.d * self.f + after.f,
        }
    }

    /// Map a point through the transform.
    #[must_use]
    pub fn apply(&self, pt: Point) -> Point {
        Point::new(
            self.a * pt.x + self.c * pt.y + self.e,
            self.b * pt.x + self.d * pt.y + self.f,
        )
    }

    /// Rotation angle in radians encoded in the linear part.
    #[must_use]
    pub fn angle(&self) -> f64 {
        self.b.atan2(self.a)
    }

    #[must_use]
    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}
