//! Document model: board elements, their typed content, and the in-memory store.
//!
//! This module defines what is placed on the planning board (`Element`,
//! `ElementContent`), a sparse-update type for incremental edits
//! (`ElementPatch`), the creation payload sent to the persistence
//! collaborator (`ElementDraft`), and the runtime store that owns all live
//! elements (`ElementStore`).
//!
//! Data flows into this layer from the persistence collaborator (initial
//! load, confirmed creates) and from the engine (gesture mutations). The
//! renderer reads from `ElementStore` via `all` to determine draw order.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::camera::{Bounds, Point};

/// Unique identifier for a board element.
pub type ElementId = Uuid;

/// Identifier of the plan/board an element belongs to.
pub type BoardId = Uuid;

/// The kind of a board element, without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Text,
    Image,
    Link,
    Yarn,
    Swatch,
}

impl ElementKind {
    /// Default `(width, height)` for a freshly placed element of this kind.
    #[must_use]
    pub fn default_size(self) -> (f64, f64) {
        match self {
            Self::Text => (200.0, 100.0),
            Self::Image => (240.0, 180.0),
            Self::Link => (260.0, 80.0),
            Self::Yarn => (200.0, 120.0),
            Self::Swatch => (160.0, 160.0),
        }
    }
}

/// Reference to a yarn from the user's stash.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct YarnRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yarn_id: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<String>,
}

/// Reference to a gauge swatch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SwatchRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swatch_id: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stitch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hook_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Type-specific payload of an element, keyed by `type` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "properties", rename_all = "lowercase")]
pub enum ElementContent {
    Text {
        #[serde(default)]
        content: String,
    },
    Image {
        url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        alt: Option<String>,
    },
    Link {
        url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
    },
    Yarn(YarnRef),
    Swatch(SwatchRef),
}

impl ElementContent {
    /// An empty text payload, as created by the text tool.
    #[must_use]
    pub fn empty_text() -> Self {
        Self::Text { content: String::new() }
    }

    #[must_use]
    pub fn kind(&self) -> ElementKind {
        match self {
            Self::Text { .. } => ElementKind::Text,
            Self::Image { .. } => ElementKind::Image,
            Self::Link { .. } => ElementKind::Link,
            Self::Yarn(_) => ElementKind::Yarn,
            Self::Swatch(_) => ElementKind::Swatch,
        }
    }

    /// Text content for text elements, `None` for everything else.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text { content } => Some(content),
            _ => None,
        }
    }
}

/// A placed element as stored in the document and sent to persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub id: ElementId,
    pub board_id: BoardId,
    /// Left edge in canvas coordinates.
    pub x: f64,
    /// Top edge in canvas coordinates.
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Clockwise rotation in degrees around the element center.
    #[serde(default)]
    pub rotation: f64,
    /// Stacking order; lower values are drawn beneath higher values.
    pub z_index: i64,
    /// Width / height ratio to preserve while resizing, if locked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<f64>,
    #[serde(flatten)]
    pub content: ElementContent,
    /// True only while bound to the inline text editor.
    #[serde(skip)]
    pub is_editing: bool,
}

impl Element {
    /// Build a new element from a draft with the given id.
    #[must_use]
    pub fn from_draft(id: ElementId, draft: ElementDraft) -> Self {
        Self {
            id,
            board_id: draft.board_id,
            x: draft.x,
            y: draft.y,
            width: draft.width,
            height: draft.height,
            rotation: draft.rotation,
            z_index: draft.z_index,
            aspect_ratio: draft.aspect_ratio,
            content: draft.content,
            is_editing: false,
        }
    }

    #[must_use]
    pub fn kind(&self) -> ElementKind {
        self.content.kind()
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// Corner points in canvas space after rotation, clockwise from top-left.
    #[must_use]
    pub fn corners(&self) -> [Point; 4] {
        let c = self.center();
        [
            Point::new(self.x, self.y),
            Point::new(self.x + self.width, self.y),
            Point::new(self.x + self.width, self.y + self.height),
            Point::new(self.x, self.y + self.height),
        ]
        .map(|p| p.rotate_around(c, self.rotation))
    }

    /// Axis-aligned footprint of the (possibly rotated) element.
    #[must_use]
    pub fn footprint(&self) -> Bounds {
        let corners = self.corners();
        Bounds::from_points(&corners).unwrap_or(Bounds {
            min_x: self.x,
            min_y: self.y,
            max_x: self.x + self.width,
            max_y: self.y + self.height,
        })
    }

    /// Whether `canvas_pt` lies inside the element, honoring rotation.
    #[must_use]
    pub fn contains(&self, canvas_pt: Point) -> bool {
        let local = canvas_pt.rotate_around(self.center(), -self.rotation);
        local.x >= self.x && local.x <= self.x + self.width && local.y >= self.y && local.y <= self.y + self.height
    }

    /// Draft carrying this element's persisted fields.
    #[must_use]
    pub fn to_draft(&self) -> ElementDraft {
        ElementDraft {
            board_id: self.board_id,
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
            rotation: self.rotation,
            z_index: self.z_index,
            aspect_ratio: self.aspect_ratio,
            content: self.content.clone(),
        }
    }

    /// Patch that would restore every persisted field to its current value.
    #[must_use]
    pub fn snapshot_patch(&self) -> ElementPatch {
        ElementPatch {
            x: Some(self.x),
            y: Some(self.y),
            width: Some(self.width),
            height: Some(self.height),
            rotation: Some(self.rotation),
            z_index: Some(self.z_index),
            content: Some(self.content.clone()),
        }
    }
}

/// Element fields sent to the persistence collaborator on create.
///
/// The collaborator assigns the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementDraft {
    pub board_id: BoardId,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub rotation: f64,
    pub z_index: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<f64>,
    #[serde(flatten)]
    pub content: ElementContent,
}

/// Sparse update for an element. Only present fields are applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z_index: Option<i64>,
    /// Replacement payload. Must keep the element's kind.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<ElementContent>,
}

impl ElementPatch {
    #[must_use]
    pub fn position(x: f64, y: f64) -> Self {
        Self { x: Some(x), y: Some(y), ..Self::default() }
    }

    #[must_use]
    pub fn geometry(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x: Some(x), y: Some(y), width: Some(width), height: Some(height), ..Self::default() }
    }

    #[must_use]
    pub fn rotation(rotation: f64) -> Self {
        Self { rotation: Some(rotation), ..Self::default() }
    }

    #[must_use]
    pub fn z_index(z_index: i64) -> Self {
        Self { z_index: Some(z_index), ..Self::default() }
    }

    #[must_use]
    pub fn content(content: ElementContent) -> Self {
        Self { content: Some(content), ..Self::default() }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Values of `element` for exactly the fields this patch touches.
    #[must_use]
    pub fn inverse_for(&self, element: &Element) -> ElementPatch {
        ElementPatch {
            x: self.x.map(|_| element.x),
            y: self.y.map(|_| element.y),
            width: self.width.map(|_| element.width),
            height: self.height.map(|_| element.height),
            rotation: self.rotation.map(|_| element.rotation),
            z_index: self.z_index.map(|_| element.z_index),
            content: self.content.as_ref().map(|_| element.content.clone()),
        }
    }
}

/// In-memory store of the elements on one board.
pub struct ElementStore {
    elements: HashMap<ElementId, Element>,
}

impl ElementStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self { elements: HashMap::new() }
    }

    /// Insert or replace an element. If an element with the same `id` already
    /// exists it is overwritten.
    pub fn add(&mut self, element: Element) {
        self.elements.insert(element.id, element);
    }

    /// Remove an element by id, returning it if it was present.
    pub fn remove(&mut self, id: &ElementId) -> Option<Element> {
        self.elements.remove(id)
    }

    #[must_use]
    pub fn get(&self, id: &ElementId) -> Option<&Element> {
        self.elements.get(id)
    }

    pub fn get_mut(&mut self, id: &ElementId) -> Option<&mut Element> {
        self.elements.get_mut(id)
    }

    #[must_use]
    pub fn contains(&self, id: &ElementId) -> bool {
        self.elements.contains_key(id)
    }

    /// Apply a partial update. Returns false if the element doesn't exist or
    /// the patch tries to change the element's kind.
    pub fn update(&mut self, id: &ElementId, patch: &ElementPatch) -> bool {
        let Some(el) = self.elements.get_mut(id) else {
            return false;
        };
        if let Some(ref content) = patch.content {
            if content.kind() != el.kind() {
                return false;
            }
        }
        if let Some(x) = patch.x {
            el.x = x;
        }
        if let Some(y) = patch.y {
            el.y = y;
        }
        if let Some(w) = patch.width {
            el.width = w;
        }
        if let Some(h) = patch.height {
            el.height = h;
        }
        if let Some(r) = patch.rotation {
            el.rotation = r;
        }
        if let Some(z) = patch.z_index {
            el.z_index = z;
        }
        if let Some(ref content) = patch.content {
            el.content = content.clone();
        }
        true
    }

    /// Move `id` above every other element. Returns the new z-index.
    pub fn reorder_to_top(&mut self, id: &ElementId) -> Option<i64> {
        let top = self
            .elements
            .values()
            .filter(|e| e.id != *id)
            .map(|e| e.z_index)
            .max();
        let el = self.elements.get_mut(id)?;
        if let Some(top) = top {
            if el.z_index <= top {
                el.z_index = top + 1;
            }
        }
        Some(el.z_index)
    }

    /// The z-index a newly created element should receive.
    #[must_use]
    pub fn next_z_index(&self) -> i64 {
        self.elements.values().map(|e| e.z_index).max().map_or(0, |z| z + 1)
    }

    /// Replace all elements with a full snapshot.
    pub fn load_snapshot(&mut self, elements: Vec<Element>) {
        self.elements.clear();
        for el in elements {
            self.elements.insert(el.id, el);
        }
    }

    /// Move an element to a new id, keeping every other field.
    pub fn rekey(&mut self, from: &ElementId, to: ElementId) -> bool {
        let Some(mut el) = self.elements.remove(from) else {
            return false;
        };
        el.id = to;
        self.elements.insert(to, el);
        true
    }

    /// Return all elements sorted by `(z_index, id)` for draw order.
    #[must_use]
    pub fn all(&self) -> Vec<&Element> {
        let mut els: Vec<&Element> = self.elements.values().collect();
        els.sort_by(|a, b| a.z_index.cmp(&b.z_index).then_with(|| a.id.cmp(&b.id)));
        els
    }

    /// Union of every element's footprint grown by `padding`; `None` when empty.
    #[must_use]
    pub fn bounding_box(&self, padding: f64) -> Option<Bounds> {
        self.elements
            .values()
            .map(|e| e.footprint().expand(padding))
            .reduce(Bounds::union)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl Default for ElementStore {
    fn default() -> Self {
        Self::new()
    }
}
