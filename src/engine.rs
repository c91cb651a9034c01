//! Top-level engine: the gesture state machine and the browser surface.
//!
//! [`SketchpadCore`] owns all logic that does not depend on the canvas
//! element, so it can be tested without WASM or a browser. [`Sketchpad`]
//! wraps the core, owns the `HtmlCanvasElement` and its 2d context, and
//! redraws when the core asks for it.
//!
//! All work happens synchronously inside the pointer handlers; one gesture
//! exists at a time and pointer-up always terminates it.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::consts::{HANDLE_RADIUS, ROTATE_HANDLE_OFFSET};
use crate::drag::Drag;
use crate::geom::{Point, Rect, Transform};
use crate::handle::{self, Handle};
use crate::render;
use crate::scene::SceneState;
use crate::shape::{PartialStyle, Shape, ShapeId, ShapeKind, Style};

/// Notifications returned from engine entry points for the host to process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// A finished shape was appended to the history log.
    ShapeCommitted(ShapeId),
    /// The selection set changed.
    SelectionChanged,
    /// The history or redo stack changed.
    HistoryChanged,
    /// The scene must be redrawn.
    RenderNeeded,
}

/// Core engine state: everything except the canvas element itself.
#[derive(Debug, Default)]
pub struct SketchpadCore {
    /// Selection and the committed-shape log.
    pub scene: SceneState,
    /// Style copied into newly drawn shapes.
    pub style: Style,
    /// Kind of shape the next draw gesture produces.
    pub mode: ShapeKind,
    /// The active transform session, idle between gestures.
    pub drag: Drag,
    current: Option<Shape>,
    drawing: bool,
}

impl SketchpadCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Configuration ---

    /// Choose the kind of shape the next drawing gesture creates.
    pub fn set_mode(&mut self, mode: ShapeKind) {
        self.mode = mode;
    }

    /// Merge a sparse style update into the active style and re-commit every
    /// selected shape with the update applied. The re-commits append fresh
    /// log entries; folding keeps each shape single in the scene.
    pub fn set_style(&mut self, partial: &PartialStyle) -> Vec<Action> {
        self.style = self.style.merged(partial);
        let selected = self.scene.selection().to_vec();
        let mut restyled = false;
        for id in selected {
            if let Some(shape) = self.scene.shape(id) {
                let mut updated = shape.clone();
                updated.set_style(partial);
                self.scene.commit(updated);
                restyled = true;
            }
        }
        if restyled {
            vec![Action::HistoryChanged, Action::RenderNeeded]
        } else {
            vec![]
        }
    }

    // --- History ---

    pub fn undo(&mut self) -> Vec<Action> {
        let selection_before = self.scene.selection().to_vec();
        if !self.scene.undo() {
            return vec![];
        }
        self.history_actions(&selection_before)
    }

    pub fn redo(&mut self) -> Vec<Action> {
        let selection_before = self.scene.selection().to_vec();
        if !self.scene.redo() {
            return vec![];
        }
        self.history_actions(&selection_before)
    }

    fn history_actions(&self, selection_before: &[ShapeId]) -> Vec<Action> {
        let mut actions = vec![Action::HistoryChanged, Action::RenderNeeded];
        if self.scene.selection() != selection_before {
            actions.push(Action::SelectionChanged);
        }
        actions
    }

    // --- Pointer events ---

    /// Pointer-down: either grab a handle on the current selection and start
    /// a transform session, or begin a drawing gesture in the current mode.
    pub fn on_pointer_down(&mut self, pt: Point) -> Vec<Action> {
        if self.drag.is_active() {
            // A second pointer-down while a gesture is active is an invalid
            // precondition (no concurrent gestures exist). Policy: implicitly
            // reset the stale session and treat this as a fresh gesture.
            tracing::warn!("pointer-down during active gesture; resetting session");
            self.drag.clear();
        }
        self.drawing = true;

        if !self.scene.selection().is_empty() {
            let folded = self.scene.fold();
            let hit = handle::detect_on_selection(
                pt,
                &folded,
                self.scene.selection(),
                HANDLE_RADIUS,
                ROTATE_HANDLE_OFFSET,
            );
            if let Some((id, hit_handle)) = hit {
                tracing::debug!(handle = ?hit_handle, target = %id, "begin transform gesture");
                self.drag.begin(hit_handle, id);
                return vec![];
            }
        }
        vec![]
    }

    /// Pointer-move: feed the active transform session, or extend the shape
    /// being drawn (created lazily on the first move of the gesture).
    pub fn on_pointer_move(&mut self, pt: Point) -> Vec<Action> {
        if !self.drawing {
            return vec![];
        }
        if self.drag.is_active() {
            self.apply_transform_frame(pt);
            return vec![Action::RenderNeeded];
        }
        let shape = self
            .current
            .get_or_insert_with(|| Shape::new(self.mode, self.style.clone()));
        shape.push_point(pt);
        vec![Action::RenderNeeded]
    }

    /// Pointer-up: commit a finished stroke/eraser, resolve a marquee into
    /// the selection set, or end the transform session. The session is
    /// always cleared; this is the only cancellation path.
    pub fn on_pointer_up(&mut self, _pt: Point) -> Vec<Action> {
        self.drawing = false;

        if self.drag.is_active() {
            tracing::debug!("end transform gesture");
            self.drag.clear();
            return vec![Action::RenderNeeded];
        }

        let Some(shape) = self.current.take() else {
            return vec![];
        };
        match shape.kind {
            ShapeKind::Select => {
                let selection = self.resolve_marquee(&shape);
                self.scene.set_selection(selection);
                vec![Action::SelectionChanged, Action::RenderNeeded]
            }
            ShapeKind::Stroke | ShapeKind::Eraser => {
                if shape.positions.is_empty() {
                    return vec![];
                }
                let id = shape.id;
                self.scene.commit(shape);
                vec![Action::ShapeCommitted(id), Action::HistoryChanged, Action::RenderNeeded]
            }
        }
    }

    // --- Queries ---

    /// The shape currently being drawn, if any (including the marquee).
    #[must_use]
    pub fn current(&self) -> Option<&Shape> {
        self.current.as_ref()
    }

    /// Ids of the currently selected shapes, in selection order.
    #[must_use]
    pub fn selection(&self) -> &[ShapeId] {
        self.scene.selection()
    }

    // --- Gesture internals ---

    /// Apply one frame of the active transform session to the selection.
    fn apply_transform_frame(&mut self, pt: Point) {
        let Some(active) = self.drag.handle() else {
            return;
        };
        let selected = self.scene.selection().to_vec();
        match active {
            Handle::Inner => {
                let (dx, dy) = self.drag.move_delta(pt);
                for id in selected {
                    self.move_shape(id, dx, dy);
                }
            }
            Handle::Rotate => {
                for id in selected {
                    self.rotate_shape(id, pt);
                }
            }
            _ => {
                for id in selected {
                    self.resize_shape(id, pt);
                }
            }
        }
    }

    fn move_shape(&mut self, id: ShapeId, dx: f64, dy: f64) {
        let Some(shape) = self.scene.shape_mut(id) else {
            return;
        };
        let moved = shape
            .positions
            .iter()
            .map(|p| Point::new(p.x + dx, p.y + dy))
            .collect();
        shape.set_positions(moved);
        // A rotated shape's matrix anchors on its centroid; shift the anchor
        // along with the points so the render stays in place.
        if !shape.transform.is_identity() {
            shape.transform = shape.transform.then(&Transform::translate(dx, dy));
        }
    }

    fn rotate_shape(&mut self, id: ShapeId, pt: Point) {
        let Some(shape) = self.scene.shape(id) else {
            return;
        };
        let positions = shape.positions.clone();
        let transform = shape.transform;
        if let Some(rotated) = self.drag.rotate(id, pt, &positions, transform) {
            if let Some(shape) = self.scene.shape_mut(id) {
                shape.transform = rotated;
            }
        }
    }

    fn resize_shape(&mut self, id: ShapeId, pt: Point) {
        let Some(shape) = self.scene.shape(id) else {
            return;
        };
        let positions = shape.positions.clone();
        let old_center = shape.bounding_box().map(|r| r.center());
        if let Some(resized) = self.drag.resize(id, pt, &positions) {
            if let Some(shape) = self.scene.shape_mut(id) {
                shape.set_positions(resized);
                if !shape.transform.is_identity() {
                    if let (Some(before), Some(rect)) = (old_center, shape.bounding_box()) {
                        let after = rect.center();
                        shape.transform = shape
                            .transform
                            .then(&Transform::translate(after.x - before.x, after.y - before.y));
                    }
                }
            }
        }
    }

    /// Resolve a finished marquee into the ids it captured. The marquee box
    /// spans the gesture's start and end points; a plain click yields an
    /// empty box and deselects everything.
    fn resolve_marquee(&self, marquee: &Shape) -> Vec<ShapeId> {
        match (marquee.positions.first(), marquee.positions.last()) {
            (Some(start), Some(end)) => {
                let rect = Rect {
                    left: start.x.min(end.x),
                    top: start.y.min(end.y),
                    right: start.x.max(end.x),
                    bottom: start.y.max(end.y),
                };
                self.scene.shapes_in_rect(&rect)
            }
            _ => Vec::new(),
        }
    }
}

/// Construction failure for the drawing surface.
#[derive(Debug, thiserror::Error)]
pub enum SurfaceError {
    /// The canvas element refused to produce a 2d drawing context.
    #[error("2d canvas context unavailable")]
    ContextUnavailable,
}

/// The full drawing surface: core engine plus the browser canvas.
pub struct Sketchpad {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    scale: f64,
    pub core: SketchpadCore,
}

impl Sketchpad {
    /// Bind to a canvas element, sizing its backing store for `scale`
    /// (device pixel ratio; 1.0 for an unscaled surface).
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError::ContextUnavailable`] if the element cannot
    /// provide a 2d context.
    pub fn new(canvas: HtmlCanvasElement, scale: f64) -> Result<Self, SurfaceError> {
        let Ok(Some(object)) = canvas.get_context("2d") else {
            tracing::error!("2d canvas context unavailable");
            return Err(SurfaceError::ContextUnavailable);
        };
        let Ok(ctx) = object.dyn_into::<CanvasRenderingContext2d>() else {
            tracing::error!("canvas returned a non-2d context");
            return Err(SurfaceError::ContextUnavailable);
        };
        let width = f64::from(canvas.client_width()) * scale;
        let height = f64::from(canvas.client_height()) * scale;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        {
            canvas.set_width(width.max(0.0) as u32);
            canvas.set_height(height.max(0.0) as u32);
        }
        Ok(Self { canvas, ctx, scale, core: SketchpadCore::new() })
    }

    // --- Input events (coordinates in CSS pixels) ---

    /// # Errors
    ///
    /// Propagates Canvas2D failures from the redraw.
    pub fn on_pointer_down(&mut self, x: f64, y: f64) -> Result<Vec<Action>, JsValue> {
        let actions = self.core.on_pointer_down(self.to_surface(x, y));
        self.render_if_needed(&actions)?;
        Ok(actions)
    }

    /// # Errors
    ///
    /// Propagates Canvas2D failures from the redraw.
    pub fn on_pointer_move(&mut self, x: f64, y: f64) -> Result<Vec<Action>, JsValue> {
        let actions = self.core.on_pointer_move(self.to_surface(x, y));
        self.render_if_needed(&actions)?;
        Ok(actions)
    }

    /// # Errors
    ///
    /// Propagates Canvas2D failures from the redraw.
    pub fn on_pointer_up(&mut self, x: f64, y: f64) -> Result<Vec<Action>, JsValue> {
        let actions = self.core.on_pointer_up(self.to_surface(x, y));
        self.render_if_needed(&actions)?;
        Ok(actions)
    }

    // --- Host commands ---

    pub fn set_mode(&mut self, mode: ShapeKind) {
        self.core.set_mode(mode);
    }

    /// # Errors
    ///
    /// Propagates Canvas2D failures from the redraw.
    pub fn set_style(&mut self, partial: &PartialStyle) -> Result<Vec<Action>, JsValue> {
        let actions = self.core.set_style(partial);
        self.render_if_needed(&actions)?;
        Ok(actions)
    }

    /// # Errors
    ///
    /// Propagates Canvas2D failures from the redraw.
    pub fn undo(&mut self) -> Result<Vec<Action>, JsValue> {
        let actions = self.core.undo();
        self.render_if_needed(&actions)?;
        Ok(actions)
    }

    /// # Errors
    ///
    /// Propagates Canvas2D failures from the redraw.
    pub fn redo(&mut self) -> Result<Vec<Action>, JsValue> {
        let actions = self.core.redo();
        self.render_if_needed(&actions)?;
        Ok(actions)
    }

    /// Redraw the whole scene.
    ///
    /// # Errors
    ///
    /// Returns `Err` if any Canvas2D call fails.
    pub fn render(&self) -> Result<(), JsValue> {
        render::draw(
            &self.ctx,
            &self.core,
            f64::from(self.canvas.width()),
            f64::from(self.canvas.height()),
        )
    }

    fn render_if_needed(&self, actions: &[Action]) -> Result<(), JsValue> {
        if actions.iter().any(|a| matches!(a, Action::RenderNeeded)) {
            self.render()?;
        }
        Ok(())
    }

    fn to_surface(&self, x: f64, y: f64) -> Point {
        Point::new(x * self.scale, y * self.scale)
    }
}
