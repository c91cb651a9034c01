//! Shared numeric constants for the sketchpad crate.

// ── Interaction ─────────────────────────────────────────────────

/// Minimum bounding-box span accepted by a resize; smaller requests are
/// rejected for that frame to prevent inversion or collapse.
pub const MIN_RESIZE_SIZE: f64 = 5.0;

/// Resize-handle radius in surface pixels: circular hit region, half-size
/// of the drawn square.
pub const HANDLE_RADIUS: f64 = 8.0;

/// Distance from the top edge of the bounding box to the rotate trigger,
/// in surface pixels.
pub const ROTATE_HANDLE_OFFSET: f64 = 24.0;

// ── Rendering ───────────────────────────────────────────────────

/// Selection UI stroke color.
pub const STROKE_COLOR: &str = "#1281f8";

/// Selection marquee fill color.
pub const FILL_COLOR: &str = "#e8f4fc";

/// Default eraser diameter in surface pixels.
pub const ERASER_WIDTH: f64 = 20.0;

/// Dash segment length for the selection outline.
pub const SELECTION_DASH: f64 = 10.0;
