//! Geometry: points, bounds, and the pan/zoom camera.
//!
//! Canvas (world) space is where element positions live. Screen space is
//! CSS pixels relative to the viewport container. The camera is the only
//! mapping between them: `screen = canvas * zoom + pan`.

#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use serde::{Deserialize, Serialize};

/// A point in either screen or canvas space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Rotate this point by `deg` degrees clockwise (screen y points down) around `pivot`.
    #[must_use]
    pub fn rotate_around(self, pivot: Point, deg: f64) -> Point {
        if deg == 0.0 {
            return self;
        }
        let (sin, cos) = deg.to_radians().sin_cos();
        let d = self - pivot;
        Point::new(pivot.x + d.x * cos - d.y * sin, pivot.y + d.x * sin + d.y * cos)
    }
}

impl std::ops::Add for Point {
    type Output = Point;

    fn add(self, other: Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }
}

impl std::ops::Sub for Point {
    type Output = Point;

    fn sub(self, other: Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }
}

/// Axis-aligned bounding box in canvas space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    #[must_use]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new((self.min_x + self.max_x) * 0.5, (self.min_y + self.max_y) * 0.5)
    }

    /// Smallest box containing both `self` and `other`.
    #[must_use]
    pub fn union(self, other: Bounds) -> Bounds {
        Bounds {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Grow every side by `padding`.
    #[must_use]
    pub fn expand(self, padding: f64) -> Bounds {
        Bounds {
            min_x: self.min_x - padding,
            min_y: self.min_y - padding,
            max_x: self.max_x + padding,
            max_y: self.max_y + padding,
        }
    }

    /// Bounding box of a list of points; `None` when empty.
    #[must_use]
    pub fn from_points(points: &[Point]) -> Option<Bounds> {
        let first = points.first()?;
        let init = Bounds { min_x: first.x, min_y: first.y, max_x: first.x, max_y: first.y };
        Some(points.iter().skip(1).fold(init, |b, p| Bounds {
            min_x: b.min_x.min(p.x),
            min_y: b.min_y.min(p.y),
            max_x: b.max_x.max(p.x),
            max_y: b.max_y.max(p.y),
        }))
    }
}

/// Camera state for pan/zoom on the infinite canvas.
///
/// `pan_x` / `pan_y` are in CSS pixels.
/// `zoom` is a scale factor (1.0 = no zoom).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub pan_x: f64,
    pub pan_y: f64,
    pub zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self { pan_x: 0.0, pan_y: 0.0, zoom: 1.0 }
    }
}

impl Camera {
    /// Convert a screen-space point (CSS pixels) to canvas coordinates.
    #[must_use]
    pub fn screen_to_canvas(&self, screen: Point) -> Point {
        Point {
            x: (screen.x - self.pan_x) / self.zoom,
            y: (screen.y - self.pan_y) / self.zoom,
        }
    }

    /// Convert a canvas-space point to screen coordinates (CSS pixels).
    #[must_use]
    pub fn canvas_to_screen(&self, canvas: Point) -> Point {
        Point {
            x: canvas.x * self.zoom + self.pan_x,
            y: canvas.y * self.zoom + self.pan_y,
        }
    }

    /// Return a camera at `new_zoom` whose pan keeps the canvas point under
    /// `screen` fixed on screen.
    #[must_use]
    pub fn zoom_about_point(&self, screen: Point, new_zoom: f64) -> Camera {
        let ratio = new_zoom / self.zoom;
        Camera {
            pan_x: screen.x - (screen.x - self.pan_x) * ratio,
            pan_y: screen.y - (screen.y - self.pan_y) * ratio,
            zoom: new_zoom,
        }
    }

    /// Camera that centers `box_` in a `viewport_w` × `viewport_h` viewport.
    ///
    /// Zoom is the largest scale that fits the box inside the viewport minus
    /// `outer_padding` on each side, clamped to `[min_zoom, max_zoom]`.
    #[must_use]
    pub fn fitting(box_: Bounds, viewport_w: f64, viewport_h: f64, outer_padding: f64, min_zoom: f64, max_zoom: f64) -> Camera {
        let avail_w = (viewport_w - 2.0 * outer_padding).max(1.0);
        let avail_h = (viewport_h - 2.0 * outer_padding).max(1.0);
        let zoom_x = avail_w / box_.width().max(f64::EPSILON);
        let zoom_y = avail_h / box_.height().max(f64::EPSILON);
        let zoom = zoom_x.min(zoom_y).clamp(min_zoom, max_zoom);
        let center = box_.center();
        Camera {
            pan_x: viewport_w * 0.5 - center.x * zoom,
            pan_y: viewport_h * 0.5 - center.y * zoom,
            zoom,
        }
    }
}

/// `sx = cx * zoom + pan_x`, `sy = cy * zoom + pan_y`.
#[must_use]
pub fn canvas_to_screen(cx: f64, cy: f64, camera: &Camera) -> (f64, f64) {
    let p = camera.canvas_to_screen(Point::new(cx, cy));
    (p.x, p.y)
}

/// Inverse of [`canvas_to_screen`].
#[must_use]
pub fn screen_to_canvas(sx: f64, sy: f64, camera: &Camera) -> (f64, f64) {
    let p = camera.screen_to_canvas(Point::new(sx, sy));
    (p.x, p.y)
}

/// Free-function form of [`Camera::zoom_about_point`].
#[must_use]
pub fn zoom_about_point(camera: &Camera, screen: Point, new_zoom: f64) -> Camera {
    camera.zoom_about_point(screen, new_zoom)
}
