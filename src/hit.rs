#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::camera::{Camera, Point};
use crate::consts::HANDLE_RADIUS_PX;
use crate::doc::{ElementId, ElementStore};
use crate::resize::handle_screen_positions;

/// Which part of an element was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    Body,
    ResizeHandle(ResizeAnchor),
}

/// Anchor position for resize handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeAnchor {
    N,
    Ne,
    E,
    Se,
    S,
    Sw,
    W,
    Nw,
}

impl ResizeAnchor {
    pub const ALL: [ResizeAnchor; 8] = [
        ResizeAnchor::N,
        ResizeAnchor::Ne,
        ResizeAnchor::E,
        ResizeAnchor::Se,
        ResizeAnchor::S,
        ResizeAnchor::Sw,
        ResizeAnchor::W,
        ResizeAnchor::Nw,
    ];

    /// Handle location as fractions of the element's width and height.
    #[must_use]
    pub fn fraction(self) -> (f64, f64) {
        match self {
            Self::N => (0.5, 0.0),
            Self::Ne => (1.0, 0.0),
            Self::E => (1.0, 0.5),
            Self::Se => (1.0, 1.0),
            Self::S => (0.5, 1.0),
            Self::Sw => (0.0, 1.0),
            Self::W => (0.0, 0.5),
            Self::Nw => (0.0, 0.0),
        }
    }

    #[must_use]
    pub fn is_east(self) -> bool {
        matches!(self, Self::Ne | Self::E | Self::Se)
    }

    #[must_use]
    pub fn is_west(self) -> bool {
        matches!(self, Self::Nw | Self::W | Self::Sw)
    }

    #[must_use]
    pub fn is_north(self) -> bool {
        matches!(self, Self::Nw | Self::N | Self::Ne)
    }

    #[must_use]
    pub fn is_south(self) -> bool {
        matches!(self, Self::Sw | Self::S | Self::Se)
    }

    /// CSS cursor shown while hovering or dragging this handle.
    #[must_use]
    pub fn cursor(self) -> &'static str {
        match self {
            Self::N | Self::S => "ns-resize",
            Self::E | Self::W => "ew-resize",
            Self::Ne | Self::Sw => "nesw-resize",
            Self::Nw | Self::Se => "nwse-resize",
        }
    }
}

/// Result of a hit test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub element_id: ElementId,
    pub part: HitPart,
}

/// Test which element (if any) is under `screen_pt`.
///
/// The selected element's handles win over any body so a handle overlapping
/// a neighbour stays grabbable. Bodies are tested from the top of the
/// z-order down.
#[must_use]
pub fn hit_test(screen_pt: Point, store: &ElementStore, camera: &Camera, selected_id: Option<ElementId>) -> Option<Hit> {
    if let Some(sel) = selected_id.and_then(|id| store.get(&id)) {
        for (anchor, pos) in handle_screen_positions(sel, camera) {
            let d = screen_pt - pos;
            if d.x.abs() <= HANDLE_RADIUS_PX && d.y.abs() <= HANDLE_RADIUS_PX {
                return Some(Hit { element_id: sel.id, part: HitPart::ResizeHandle(anchor) });
            }
        }
    }

    let canvas_pt = camera.screen_to_canvas(screen_pt);
    store
        .all()
        .into_iter()
        .rev()
        .find(|el| el.contains(canvas_pt))
        .map(|el| Hit { element_id: el.id, part: HitPart::Body })
}
