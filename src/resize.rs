//! Resize handle overlay: handle geometry and the resize computation.
//!
//! The press is remembered in canvas space, so a zoom mid-gesture keeps the
//! dragged edge under the cursor. Deltas are projected into the element's
//! rotated frame. The edge (or corner) opposite
//! the dragged handle stays put.

#[cfg(test)]
#[path = "resize_test.rs"]
mod resize_test;

use crate::camera::{Camera, Point};
use crate::consts::{MIN_ELEMENT_HEIGHT, MIN_ELEMENT_WIDTH};
use crate::doc::{Element, ElementPatch};
use crate::hit::ResizeAnchor;

/// Screen positions of the eight handles of `element`.
#[must_use]
pub fn handle_screen_positions(element: &Element, camera: &Camera) -> [(ResizeAnchor, Point); 8] {
    let center = element.center();
    ResizeAnchor::ALL.map(|anchor| {
        let (fx, fy) = anchor.fraction();
        let local = Point::new(element.x + element.width * fx, element.y + element.height * fy);
        (anchor, camera.canvas_to_screen(local.rotate_around(center, element.rotation)))
    })
}

/// New geometry produced by a resize step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeResult {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ResizeResult {
    #[must_use]
    pub fn to_patch(self) -> ElementPatch {
        ElementPatch::geometry(self.x, self.y, self.width, self.height)
    }
}

/// Context captured when a handle is pressed.
#[derive(Debug, Clone, Copy)]
pub struct ResizeGesture {
    pub anchor: ResizeAnchor,
    /// Canvas point under the cursor at press time.
    pub start_canvas: Point,
    pub start_x: f64,
    pub start_y: f64,
    pub start_w: f64,
    pub start_h: f64,
    pub rotation: f64,
    /// Width / height to preserve, if locked.
    pub aspect: Option<f64>,
}

impl ResizeGesture {
    #[must_use]
    pub fn begin(element: &Element, anchor: ResizeAnchor, start_screen: Point, camera: &Camera) -> Self {
        Self {
            anchor,
            start_canvas: camera.screen_to_canvas(start_screen),
            start_x: element.x,
            start_y: element.y,
            start_w: element.width,
            start_h: element.height,
            rotation: element.rotation,
            aspect: element.aspect_ratio.filter(|r| r.is_finite() && *r > 0.0),
        }
    }

    /// Geometry for the pointer at `screen` under `camera`.
    #[must_use]
    pub fn apply(&self, screen: Point, camera: &Camera) -> ResizeResult {
        let delta = camera.screen_to_canvas(screen) - self.start_canvas;
        let local = delta.rotate_around(Point::default(), -self.rotation);

        let a = self.anchor;
        let mut w = self.start_w;
        let mut h = self.start_h;
        if a.is_east() {
            w += local.x;
        } else if a.is_west() {
            w -= local.x;
        }
        if a.is_south() {
            h += local.y;
        } else if a.is_north() {
            h -= local.y;
        }

        if let Some(ratio) = self.aspect {
            if a.is_east() || a.is_west() {
                h = w / ratio;
            } else {
                w = h * ratio;
            }
        }

        w = w.max(MIN_ELEMENT_WIDTH);
        h = h.max(MIN_ELEMENT_HEIGHT);

        let (x, y) = self.anchored_origin(w, h);
        ResizeResult { x, y, width: w, height: h }
    }

    /// Top-left that keeps the point opposite the handle fixed in canvas space.
    fn anchored_origin(&self, w: f64, h: f64) -> (f64, f64) {
        let a = self.anchor;
        let fx = if a.is_west() {
            1.0
        } else if a.is_east() {
            0.0
        } else {
            0.5
        };
        let fy = if a.is_north() {
            1.0
        } else if a.is_south() {
            0.0
        } else {
            0.5
        };

        let start_center = Point::new(self.start_x + self.start_w * 0.5, self.start_y + self.start_h * 0.5);
        let fixed_local = Point::new(self.start_x + self.start_w * fx, self.start_y + self.start_h * fy);
        let fixed = fixed_local.rotate_around(start_center, self.rotation);

        let offset = Point::new(w * (fx - 0.5), h * (fy - 0.5)).rotate_around(Point::default(), self.rotation);
        let center = fixed - offset;
        (center.x - w * 0.5, center.y - h * 0.5)
    }
}
