//! Shared numeric constants for the canvas crate.

// ── Zoom ────────────────────────────────────────────────────────

/// Default lower zoom bound for the planning board.
pub const MIN_ZOOM: f64 = 0.1;

/// Lower zoom bound for the lightweight drawing surface.
pub const DRAWING_MIN_ZOOM: f64 = 0.2;

/// Upper zoom bound shared by both surfaces.
pub const MAX_ZOOM: f64 = 3.0;

/// Fit-to-view never zooms in past 100%.
pub const FIT_MAX_ZOOM: f64 = 1.0;

/// Multiplier applied by one zoom-in / zoom-out step.
pub const ZOOM_STEP: f64 = 1.2;

/// Ctrl-wheel zoom factor is `exp(-dy * sensitivity)`.
pub const WHEEL_ZOOM_SENSITIVITY: f64 = 0.0015;

// ── Element geometry ────────────────────────────────────────────

/// Resize never produces a narrower element.
pub const MIN_ELEMENT_WIDTH: f64 = 50.0;

/// Resize never produces a shorter element.
pub const MIN_ELEMENT_HEIGHT: f64 = 30.0;

/// Degrees added by one rotate action.
pub const ROTATE_STEP_DEG: f64 = 15.0;

/// Canvas-space offset of a duplicated element from its source.
pub const DUPLICATE_OFFSET: f64 = 20.0;

// ── Fit-to-view ─────────────────────────────────────────────────

/// Padding added around each element footprint when fitting, in canvas units.
pub const FIT_ELEMENT_PADDING: f64 = 12.0;

/// Screen-space margin kept between the fitted box and the viewport edge.
pub const FIT_OUTER_PADDING: f64 = 40.0;

// ── Hit-testing ─────────────────────────────────────────────────

/// Screen-space hit slop in pixels for resize handles.
pub const HANDLE_RADIUS_PX: f64 = 8.0;

/// Drawn size of a resize handle square, in screen pixels.
pub const HANDLE_SIZE_PX: f64 = 8.0;

/// Pointer travel (screen px) below which a press on an item is a plain click.
pub const DRAG_THRESHOLD_PX: f64 = 2.0;

// ── Text ────────────────────────────────────────────────────────

/// Default text font size in canvas units.
pub const TEXT_FONT_PX: f64 = 16.0;

/// Line height as a multiple of the font size.
pub const TEXT_LINE_HEIGHT: f64 = 1.4;

/// Inner padding of a text box on every side.
pub const TEXT_PADDING: f64 = 8.0;

/// Average glyph advance as a fraction of the font size, used for wrap estimates.
pub const TEXT_AVG_CHAR_RATIO: f64 = 0.6;
