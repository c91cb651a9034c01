//! Rendering: draws the folded scene to a 2D context.
//!
//! This module is the only place that touches [`web_sys::CanvasRenderingContext2d`].
//! It receives a read-only view of the engine core and produces pixels — it
//! does not mutate any application state.
//!
//! All fallible `Canvas2D` calls propagate errors via `Result<(), JsValue>`.
//! The top-level caller ([`crate::engine::Sketchpad::render`]) handles the
//! result.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use crate::consts::{
    ERASER_WIDTH, FILL_COLOR, HANDLE_RADIUS, ROTATE_HANDLE_OFFSET, SELECTION_DASH, STROKE_COLOR,
};
use crate::engine::SketchpadCore;
use crate::geom::{Point, Rect, Transform};
use crate::handle;
use crate::shape::{Shape, ShapeKind};

/// Draw the full scene: committed shapes, selection UI, and the in-progress
/// shape.
///
/// `surface_w` and `surface_h` are in backing-store pixels.
///
/// # Errors
///
/// Returns `Err` if any `Canvas2D` call fails (e.g. invalid context state).
pub fn draw(
    ctx: &CanvasRenderingContext2d,
    core: &SketchpadCore,
    surface_w: f64,
    surface_h: f64,
) -> Result<(), JsValue> {
    ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)?;
    ctx.clear_rect(0.0, 0.0, surface_w, surface_h);

    // Layer 1: the folded scene in draw order (bottom first).
    let scene = core.scene.fold();
    for shape in &scene {
        draw_shape(ctx, shape)?;
    }

    // Layer 2: selection UI.
    for id in core.selection() {
        if let Some(shape) = scene.iter().find(|s| s.id == *id) {
            draw_selection(ctx, shape)?;
        }
    }

    // Layer 3: the shape under the pointer right now.
    if let Some(current) = core.current() {
        match current.kind {
            ShapeKind::Select => draw_marquee(ctx, current)?,
            ShapeKind::Stroke | ShapeKind::Eraser => draw_shape(ctx, current)?,
        }
    }

    Ok(())
}

// =============================================================
// Shape dispatch
// =============================================================

fn draw_shape(ctx: &CanvasRenderingContext2d, shape: &Shape) -> Result<(), JsValue> {
    if shape.positions.is_empty() {
        return Ok(());
    }
    ctx.save();
    apply_transform(ctx, &shape.transform)?;
    let result = match shape.kind {
        ShapeKind::Stroke => draw_stroke(ctx, shape),
        ShapeKind::Eraser => draw_eraser(ctx, shape),
        ShapeKind::Select => Ok(()),
    };
    ctx.restore();
    result
}

/// Strokes render as quadratic curves running midpoint to midpoint, with the
/// shared sample as control, which smooths raw pointer samples without
/// resampling them.
fn draw_stroke(ctx: &CanvasRenderingContext2d, shape: &Shape) -> Result<(), JsValue> {
    let pts = &shape.positions;

    ctx.set_stroke_style_str(&shape.style.stroke_color);
    ctx.set_line_width(shape.style.line_width);
    ctx.set_line_cap("round");
    ctx.set_line_join("round");

    ctx.begin_path();
    if pts.len() < 3 {
        ctx.move_to(pts[0].x, pts[0].y);
        for p in &pts[1..] {
            ctx.line_to(p.x, p.y);
        }
    } else {
        let (start, spans) = stroke_spans(pts);
        ctx.move_to(start.x, start.y);
        for (control, end) in spans {
            ctx.quadratic_curve_to(control.x, control.y, end.x, end.y);
        }
    }
    ctx.stroke();
    Ok(())
}

/// Quadratic spans for a smoothed stroke: the path opens at the midpoint of
/// the first sample pair, and each span ends at the midpoint of the next
/// pair with the shared sample as control. The raw endpoints are never path
/// anchors. Callers guarantee at least 3 points.
fn stroke_spans(pts: &[Point]) -> (Point, Vec<(Point, Point)>) {
    let start = midpoint(pts[0], pts[1]);
    let spans = pts
        .windows(2)
        .skip(1)
        .map(|w| (w[0], midpoint(w[0], w[1])))
        .collect();
    (start, spans)
}

fn midpoint(a: Point, b: Point) -> Point {
    Point::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)
}

/// Erasers clip to a path of circles along the pointer trail and clear the
/// clipped region, so they remove pixels rather than paint over them.
fn draw_eraser(ctx: &CanvasRenderingContext2d, shape: &Shape) -> Result<(), JsValue> {
    let radius = ERASER_WIDTH / 2.0;
    let Some(bounds) = point_bounds(&shape.positions) else {
        return Ok(());
    };

    ctx.save();
    ctx.begin_path();
    for p in &shape.positions {
        ctx.move_to(p.x + radius, p.y);
        ctx.arc(p.x, p.y, radius, 0.0, 2.0 * PI)?;
    }
    ctx.clip();
    ctx.clear_rect(
        bounds.left - radius,
        bounds.top - radius,
        bounds.width() + ERASER_WIDTH,
        bounds.height() + ERASER_WIDTH,
    );
    ctx.restore();
    Ok(())
}

// =============================================================
// Selection UI
// =============================================================

fn draw_selection(ctx: &CanvasRenderingContext2d, shape: &Shape) -> Result<(), JsValue> {
    let Some(rect) = shape.bounding_box() else {
        return Ok(());
    };

    ctx.save();
    apply_transform(ctx, &shape.transform)?;

    // Dashed bounding box.
    ctx.set_stroke_style_str(STROKE_COLOR);
    ctx.set_line_width(1.0);
    set_dash(ctx, SELECTION_DASH)?;
    ctx.stroke_rect(rect.left, rect.top, rect.width(), rect.height());
    clear_dash(ctx)?;

    // Square resize handles.
    ctx.set_fill_style_str(FILL_COLOR);
    for (_, pos) in handle::handle_positions(&rect, HANDLE_RADIUS) {
        ctx.fill_rect(
            pos.x - HANDLE_RADIUS,
            pos.y - HANDLE_RADIUS,
            HANDLE_RADIUS * 2.0,
            HANDLE_RADIUS * 2.0,
        );
        ctx.stroke_rect(
            pos.x - HANDLE_RADIUS,
            pos.y - HANDLE_RADIUS,
            HANDLE_RADIUS * 2.0,
            HANDLE_RADIUS * 2.0,
        );
    }

    // Rotate trigger: stem from the top edge, then the circle.
    let trigger = handle::rotate_trigger_position(&rect, ROTATE_HANDLE_OFFSET);
    ctx.begin_path();
    ctx.move_to(trigger.x, rect.top);
    ctx.line_to(trigger.x, trigger.y);
    ctx.stroke();

    ctx.begin_path();
    ctx.arc(trigger.x, trigger.y, HANDLE_RADIUS, 0.0, 2.0 * PI)?;
    ctx.fill();
    ctx.stroke();

    ctx.restore();
    Ok(())
}

fn draw_marquee(ctx: &CanvasRenderingContext2d, marquee: &Shape) -> Result<(), JsValue> {
    let (Some(start), Some(end)) = (marquee.positions.first(), marquee.positions.last()) else {
        return Ok(());
    };
    let x = start.x.min(end.x);
    let y = start.y.min(end.y);
    let w = (end.x - start.x).abs();
    let h = (end.y - start.y).abs();

    ctx.save();
    ctx.set_fill_style_str(FILL_COLOR);
    ctx.set_stroke_style_str(STROKE_COLOR);
    ctx.set_line_width(1.0);
    set_dash(ctx, SELECTION_DASH)?;
    ctx.fill_rect(x, y, w, h);
    ctx.stroke_rect(x, y, w, h);
    clear_dash(ctx)?;
    ctx.restore();
    Ok(())
}

// =============================================================
// Helpers
// =============================================================

/// Apply a shape's committed matrix to the context.
///
/// The matrix pivots on the shape centroid, so its translation column holds
/// the pivot. Re-translating by the negated pivot afterwards keeps the
/// shape's own coordinates valid while the rotation stays centered. The
/// caller pairs this with `save`/`restore` around every draw.
fn apply_transform(ctx: &CanvasRenderingContext2d, t: &Transform) -> Result<(), JsValue> {
    if t.is_identity() {
        return Ok(());
    }
    ctx.transform(t.a, t.b, t.c, t.d, t.e, t.f)?;
    ctx.translate(-t.e, -t.f)?;
    Ok(())
}

fn set_dash(ctx: &CanvasRenderingContext2d, dash: f64) -> Result<(), JsValue> {
    let pattern = js_sys::Array::new();
    pattern.push(&dash.into());
    pattern.push(&dash.into());
    ctx.set_line_dash(&pattern)
}

fn clear_dash(ctx: &CanvasRenderingContext2d) -> Result<(), JsValue> {
    ctx.set_line_dash(&js_sys::Array::new())
}

/// Min/max bounds over raw positions; unlike [`Rect::from_points`] this
/// accepts a single point (an eraser tap still clears a dot).
fn point_bounds(positions: &[Point]) -> Option<Rect> {
    let first = positions.first()?;
    let mut bounds = Rect { left: first.x, top: first.y, right: first.x, bottom: first.y };
    for p in &positions[1..] {
        bounds.left = bounds.left.min(p.x);
        bounds.top = bounds.top.min(p.y);
        bounds.right = bounds.right.max(p.x);
        bounds.bottom = bounds.bottom.max(p.y);
    }
    Some(bounds)
}
