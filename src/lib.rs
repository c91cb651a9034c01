//! Selection and transform engine for a freehand drawing surface.
//!
//! This crate is compiled to WebAssembly and runs in the browser. It owns the
//! full lifecycle of the drawing canvas: translating pointer events into
//! strokes and eraser paths, hit-testing selection handles, running
//! move/resize/rotate gestures, folding the undo/redo history into a
//! renderable scene, and drawing it all to a 2D context. The host JavaScript
//! layer is responsible only for wiring DOM events to the engine and reacting
//! to the resulting [`engine::Action`]s.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level engine and testable [`engine::SketchpadCore`] |
//! | [`scene`] | Selection set and the committed-shape history log |
//! | [`shape`] | Shape model: kind, style, points, transform |
//! | [`drag`] | Per-gesture transform session (move/resize/rotate) |
//! | [`handle`] | Handle detection against selection bounding boxes |
//! | [`geom`] | Points, rects, and affine transforms |
//! | [`render`] | Scene rendering to a `Canvas2D` context |
//! | [`consts`] | Shared constants (handle sizes, colors, minimums) |

pub mod consts;
pub mod drag;
pub mod engine;
pub mod geom;
pub mod handle;
pub mod render;
pub mod scene;
pub mod shape;
