//! Shape model: the unit of drawing and selection.
//!
//! A shape is a kind tag, an immutable-by-default style value, an ordered
//! point list, and a render-time transform. Per-kind behavior is dispatched
//! by pattern match on [`ShapeKind`]; there is no inheritance chain. The
//! bounding box is always derived from the current positions on demand.

#[cfg(test)]
#[path = "shape_test.rs"]
mod shape_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geom::{Point, Rect, Transform};

/// Unique identifier for a shape. Assigned at creation, never reused.
pub type ShapeId = Uuid;

/// The kind of a shape.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    /// Freehand pen stroke.
    #[default]
    Stroke,
    /// Eraser path; clears pixels underneath its circles.
    Eraser,
    /// Transient marquee pseudo-shape drawn while selecting. Never committed
    /// to history.
    Select,
}

impl ShapeKind {
    /// Whether shapes of this kind may be committed to the history log.
    #[must_use]
    pub fn is_persistable(self) -> bool {
        !matches!(self, Self::Select)
    }
}

/// Stroke style copied into each shape at creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Style {
    /// Stroke color as a CSS color string.
    pub stroke_color: String,
    /// Line width in surface pixels.
    pub line_width: f64,
}

impl Default for Style {
    fn default() -> Self {
        Self { stroke_color: "#000000".to_owned(), line_width: 1.0 }
    }
}

/// Sparse style update. Only present fields are applied.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PartialStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_width: Option<f64>,
}

impl Style {
    /// Apply a sparse update, returning the merged style.
    #[must_use]
    pub fn merged(&self, partial: &PartialStyle) -> Self {
        Self {
            stroke_color: partial.stroke_color.clone().unwrap_or_else(|| self.stroke_color.clone()),
            line_width: partial.line_width.unwrap_or(self.line_width),
        }
    }
}

/// A drawn shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    /// Unique identifier, immutable after creation.
    pub id: ShapeId,
    /// Shape kind tag.
    pub kind: ShapeKind,
    /// Style value copied in at creation; changed only via `set_style`.
    pub style: Style,
    /// Ordered point list. Append-only while being actively drawn; replaced
    /// wholesale by move/resize.
    pub positions: Vec<Point>,
    /// Render-time transform produced by rotation. Identity when the shape
    /// has never been rotated; the stored positions are never rewritten by
    /// rotation.
    pub transform: Transform,
}

impl Shape {
    /// Create an empty shape with a fresh id and a copy of `style`.
    #[must_use]
    pub fn new(kind: ShapeKind, style: Style) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            style,
            positions: Vec::new(),
            transform: Transform::identity(),
        }
    }

    /// Append a point while the shape is being actively drawn.
    pub fn push_point(&mut self, pt: Point) {
        self.positions.push(pt);
    }

    /// Derived bounding box over the current positions.
    ///
    /// `None` for a degenerate shape (fewer than 2 points).
    #[must_use]
    pub fn bounding_box(&self) -> Option<Rect> {
        Rect::from_points(&self.positions)
    }

    /// Whether the shape has no visible geometry and no valid handles.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.positions.len() < 2
    }

    /// Replace the point list wholesale (move/resize result).
    pub fn set_positions(&mut self, positions: Vec<Point>) {
        self.positions = positions;
    }

    /// Apply a sparse style update.
    pub fn set_style(&mut self, partial: &PartialStyle) {
        self.style = self.style.merged(partial);
    }
}
