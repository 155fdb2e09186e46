use tracing::{debug, info};
use uuid::Uuid;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, DragEvent, HtmlCanvasElement, HtmlElement, KeyboardEvent, MouseEvent, WheelEvent};

use crate::camera::{Camera, Point};
use crate::capture::{Disposer, capture_window_pointer};
use crate::config::CanvasConfig;
use crate::consts::{DRAG_THRESHOLD_PX, FIT_MAX_ZOOM, MIN_ELEMENT_HEIGHT};
use crate::doc::{BoardId, Element, ElementContent, ElementId, ElementKind, ElementPatch, ElementStore};
use crate::error::{CanvasError, ErrorCode, PersistError};
use crate::hit::{Hit, HitPart, ResizeAnchor, hit_test};
use crate::input::{Button, InputState, Key, Modifiers, Tool, UiState, WheelDelta};
use crate::payload::{self, DRAG_DATA_FORMAT};
use crate::render;
use crate::resize::ResizeGesture;
use crate::sync::{Deferred, OpId, PendingOp, PersistOutcome, Resolved, Rollback, SyncLedger, SyncStatus};
use crate::text_edit::{EditOutcome, KeyOutcome, TextEditor, TextLayout};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// A user-facing, non-blocking message (toast-equivalent).
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub element_id: Option<ElementId>,
    /// Grepable code from [`ErrorCode`].
    pub code: &'static str,
    pub message: String,
    pub retryable: bool,
}

impl Notice {
    fn persist_failed(id: ElementId, error: &PersistError) -> Self {
        Self {
            element_id: Some(id),
            code: error.error_code(),
            message: format!("Couldn't save your change: {error}"),
            retryable: error.retryable(),
        }
    }
}

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    RenderNeeded,
    SetCursor(String),
    /// A pan, drag, or resize began; track the pointer on the window.
    CapturePointer,
    /// The active gesture ended; drop the window listeners.
    ReleasePointer,
    /// Send this write to the persistence collaborator and report back via
    /// [`EngineCore::resolve_persist`].
    Persist(PendingOp),
    Notify(Notice),
    /// Show the inline editor over `id`, seeded with `text`.
    BeginTextEdit { id: ElementId, text: String },
    /// The engine changed the editor text (e.g. Shift+Enter); mirror it in the overlay.
    EditorTextChanged { id: ElementId, text: String },
    EndTextEdit { id: ElementId },
    /// A locally created element now has its server-assigned id.
    ElementRekeyed { from: ElementId, to: ElementId },
}

/// Board state and interaction logic with no DOM handles.
///
/// `Engine` wraps this; tests drive it directly on the native target.
pub struct EngineCore {
    pub doc: ElementStore,
    pub camera: Camera,
    pub ui: UiState,
    pub input: InputState,
    pub config: CanvasConfig,
    pub ledger: SyncLedger,
    pub board_id: BoardId,
    pub viewport_width: f64,
    pub viewport_height: f64,
    pub dpr: f64,
    cursor: &'static str,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self::build(Uuid::nil(), CanvasConfig::default())
    }
}

impl EngineCore {
    #[must_use]
    pub fn new(board_id: BoardId) -> Self {
        Self::build(board_id, CanvasConfig::default())
    }

    /// Engine for `board_id` with a host-supplied configuration.
    ///
    /// # Errors
    ///
    /// Returns `CanvasError::InvalidConfig` when `config` fails validation.
    pub fn with_config(board_id: BoardId, config: CanvasConfig) -> Result<Self, CanvasError> {
        config.validate()?;
        Ok(Self::build(board_id, config))
    }

    fn build(board_id: BoardId, config: CanvasConfig) -> Self {
        Self {
            doc: ElementStore::new(),
            camera: Camera::default(),
            ui: UiState::default(),
            input: InputState::default(),
            config,
            ledger: SyncLedger::new(),
            board_id,
            viewport_width: 0.0,
            viewport_height: 0.0,
            dpr: 1.0,
            cursor: "default",
        }
    }

    /// Replace the board with a freshly loaded snapshot. Any gesture or
    /// edit in progress is dropped without persisting.
    pub fn load_snapshot(&mut self, elements: Vec<Element>) -> Vec<Action> {
        let mut actions = self.abandon_input();
        self.ledger.reset_confirmed(elements.iter().map(|e| e.id));
        self.doc.load_snapshot(elements);
        if self.ui.selected_id.is_some_and(|id| !self.doc.contains(&id)) {
            self.ui.selected_id = None;
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Switch tools. Leaving the tool commits any open edit.
    pub fn set_tool(&mut self, tool: Tool) -> Vec<Action> {
        if tool == self.ui.tool {
            return Vec::new();
        }
        let mut actions = self.commit_edit();
        self.ui.tool = tool;
        if matches!(self.input, InputState::Idle) {
            actions.extend(self.set_cursor(self.idle_cursor()));
        }
        actions
    }

    pub fn set_viewport(&mut self, width_css: f64, height_css: f64, dpr: f64) {
        self.viewport_width = width_css;
        self.viewport_height = height_css;
        self.dpr = dpr;
    }

    // --- Queries ---

    #[must_use]
    pub fn selection(&self) -> Option<ElementId> {
        self.ui.selected_id
    }

    #[must_use]
    pub fn camera(&self) -> Camera {
        self.camera
    }

    #[must_use]
    pub fn element(&self, id: &ElementId) -> Option<&Element> {
        self.doc.get(id)
    }

    #[must_use]
    pub fn editing_id(&self) -> Option<ElementId> {
        self.input.editing_id()
    }

    #[must_use]
    pub fn sync_status(&self, id: &ElementId) -> Option<SyncStatus> {
        self.ledger.status(id)
    }

    // =============================================================
    // Pointer input
    // =============================================================

    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button, _modifiers: Modifiers) -> Vec<Action> {
        if self.input.is_pointer_gesture() {
            debug!("pointer down ignored during active gesture");
            return Vec::new();
        }
        let hit = hit_test(screen_pt, &self.doc, &self.camera, self.ui.selected_id);
        let mut actions = Vec::new();

        if let Some(editing) = self.input.editing_id() {
            if hit.is_some_and(|h| h.element_id == editing) {
                return actions;
            }
            actions.extend(self.commit_edit());
            if hit.is_none() {
                return actions;
            }
        }

        if button == Button::Middle {
            actions.extend(self.begin_pan(screen_pt));
            return actions;
        }
        if button != Button::Primary {
            return actions;
        }

        match hit {
            Some(_) if self.ui.tool == Tool::Hand => actions.extend(self.begin_pan(screen_pt)),
            Some(Hit { element_id, part: HitPart::ResizeHandle(anchor) }) => {
                actions.extend(self.begin_resize(element_id, anchor, screen_pt));
            }
            Some(Hit { element_id, part: HitPart::Body }) => actions.extend(self.begin_drag(element_id, screen_pt)),
            None if !self.ui.tool.pans_background() => actions.extend(self.create_text_at(screen_pt)),
            None => {
                if self.ui.selected_id.take().is_some() {
                    actions.push(Action::RenderNeeded);
                }
                actions.extend(self.begin_pan(screen_pt));
            }
        }
        actions
    }

    pub fn on_pointer_move(&mut self, screen_pt: Point, _modifiers: Modifiers) -> Vec<Action> {
        match &mut self.input {
            InputState::Idle => self.hover(screen_pt).into_iter().collect(),
            InputState::Editing(_) => Vec::new(),
            InputState::Panning { grab } => {
                self.camera.pan_x = screen_pt.x - grab.x * self.camera.zoom;
                self.camera.pan_y = screen_pt.y - grab.y * self.camera.zoom;
                vec![Action::RenderNeeded]
            }
            InputState::DraggingItem { id, grab_offset, start_screen, moved, .. } => {
                if !*moved {
                    let d = screen_pt - *start_screen;
                    if d.x.hypot(d.y) < DRAG_THRESHOLD_PX {
                        return Vec::new();
                    }
                    *moved = true;
                }
                let pos = self.camera.screen_to_canvas(screen_pt) - *grab_offset;
                self.doc.update(id, &ElementPatch::position(pos.x, pos.y));
                vec![Action::RenderNeeded]
            }
            InputState::ResizingItem { id, gesture } => {
                let result = gesture.apply(screen_pt, &self.camera);
                self.doc.update(id, &result.to_patch());
                vec![Action::RenderNeeded]
            }
        }
    }

    pub fn on_pointer_up(&mut self, screen_pt: Point, _button: Button, _modifiers: Modifiers) -> Vec<Action> {
        self.end_gesture(Some(screen_pt))
    }

    /// Pointer lost (e.g. the browser took over the gesture). Ends the
    /// gesture exactly like a release.
    pub fn on_pointer_cancel(&mut self) -> Vec<Action> {
        self.end_gesture(None)
    }

    /// Double-click on a text element starts inline editing.
    pub fn on_double_click(&mut self, screen_pt: Point) -> Vec<Action> {
        if self.input.is_pointer_gesture() {
            return Vec::new();
        }
        let Some(Hit { element_id, part: HitPart::Body }) =
            hit_test(screen_pt, &self.doc, &self.camera, self.ui.selected_id)
        else {
            return Vec::new();
        };
        if self.input.editing_id() == Some(element_id) {
            return Vec::new();
        }
        if self.doc.get(&element_id).is_none_or(|el| el.kind() != ElementKind::Text) {
            return Vec::new();
        }
        let mut actions = self.commit_edit();
        actions.extend(self.begin_edit(element_id));
        actions
    }

    pub fn on_wheel(&mut self, screen_pt: Point, delta: WheelDelta, modifiers: Modifiers) -> Vec<Action> {
        if !modifiers.command() {
            return Vec::new();
        }
        let factor = (-delta.dy * self.config.wheel_zoom_sensitivity).exp();
        self.zoom_at(screen_pt, self.camera.zoom * factor)
    }

    // =============================================================
    // Keyboard and text
    // =============================================================

    pub fn on_key_down(&mut self, key: Key, modifiers: Modifiers) -> Vec<Action> {
        if let InputState::Editing(editor) = &mut self.input {
            return match editor.on_key(&key, modifiers, self.config.escape_behavior) {
                KeyOutcome::Commit => self.commit_edit(),
                KeyOutcome::Continue => Vec::new(),
            };
        }
        if self.input.is_pointer_gesture() {
            return Vec::new();
        }

        let command = modifiers.command();
        match key.0.as_str() {
            "Delete" | "Backspace" => self.delete_selected(),
            "Escape" => {
                if self.ui.selected_id.take().is_some() {
                    vec![Action::RenderNeeded]
                } else {
                    Vec::new()
                }
            }
            "d" | "D" if command => self.duplicate_selected(),
            "0" if command => self.reset_view(),
            "=" | "+" if command => self.zoom_in(),
            "-" | "_" if command => self.zoom_out(),
            "!" => self.fit_to_view(),
            "1" if modifiers.shift => self.fit_to_view(),
            "r" | "R" if !command => self.rotate_selected(),
            _ => Vec::new(),
        }
    }

    /// The overlay input's full current value.
    pub fn on_text_input(&mut self, value: &str) -> Vec<Action> {
        let InputState::Editing(editor) = &mut self.input else {
            return Vec::new();
        };
        editor.set_buffer(value);
        let id = editor.id();
        let height = editor.auto_height();
        self.mirror_editor_text(id, value, height);
        vec![Action::RenderNeeded]
    }

    /// The overlay editor lost focus.
    pub fn on_blur(&mut self) -> Vec<Action> {
        self.commit_edit()
    }

    /// A tray item was dropped at `screen_pt` carrying `raw` drag data.
    /// Malformed payloads are ignored.
    pub fn on_drop(&mut self, screen_pt: Point, raw: &str) -> Vec<Action> {
        let Some(drop) = payload::decode(raw, self.config.tier) else {
            return Vec::new();
        };
        let mut actions = self.commit_edit();

        let at = self.camera.screen_to_canvas(screen_pt);
        let kind = drop.content.kind();
        let (width, default_h) = kind.default_size();
        let height = drop.aspect_ratio.map_or(default_h, |r| (width / r).max(MIN_ELEMENT_HEIGHT));
        let element = Element {
            id: Uuid::new_v4(),
            board_id: self.board_id,
            x: at.x,
            y: at.y,
            width,
            height,
            rotation: 0.0,
            z_index: self.doc.next_z_index(),
            aspect_ratio: drop.aspect_ratio,
            content: drop.content,
            is_editing: false,
        };
        info!(element_id = %element.id, ?kind, "element dropped");

        let op = self.ledger.create(&element);
        self.ui.selected_id = Some(element.id);
        self.doc.add(element);
        actions.push(Action::Persist(op));
        actions.push(Action::RenderNeeded);
        actions
    }

    // =============================================================
    // Element operations
    // =============================================================

    /// Bind the inline editor to text element `id`.
    pub fn begin_edit(&mut self, id: ElementId) -> Vec<Action> {
        if self.input.is_pointer_gesture() || self.input.editing_id().is_some() {
            return Vec::new();
        }
        let layout = TextLayout::from(&self.config);
        let Some(el) = self.doc.get_mut(&id) else {
            return Vec::new();
        };
        let Some(text) = el.content.text().map(str::to_owned) else {
            return Vec::new();
        };
        el.is_editing = true;
        let editor = TextEditor::new(id, &text, el.height, el.width, layout);
        self.input = InputState::Editing(editor);
        self.ui.selected_id = Some(id);
        debug!(element_id = %id, "text edit started");
        vec![Action::BeginTextEdit { id, text }, Action::RenderNeeded]
    }

    /// Rotate the selected element by the configured step.
    pub fn rotate_selected(&mut self) -> Vec<Action> {
        let Some(id) = self.ui.selected_id else {
            return Vec::new();
        };
        let Some(el) = self.doc.get_mut(&id) else {
            return Vec::new();
        };
        el.rotation = (el.rotation + self.config.rotate_step_deg).rem_euclid(360.0);
        let patch = ElementPatch::rotation(el.rotation);
        debug!(element_id = %id, rotation = el.rotation, "element rotated");
        let mut actions = vec![Action::RenderNeeded];
        actions.extend(self.persist_update(id, patch, None));
        actions
    }

    pub fn delete_selected(&mut self) -> Vec<Action> {
        match self.ui.selected_id {
            Some(id) => self.delete_element(id),
            None => Vec::new(),
        }
    }

    /// Remove `id` locally and queue its delete.
    pub fn delete_element(&mut self, id: ElementId) -> Vec<Action> {
        if !self.doc.contains(&id) {
            return Vec::new();
        }
        let mut actions = Vec::new();
        let targets_id = match &self.input {
            InputState::Editing(editor) => editor.id() == id,
            InputState::DraggingItem { id: target, .. } | InputState::ResizingItem { id: target, .. } => *target == id,
            InputState::Idle | InputState::Panning { .. } => false,
        };
        if targets_id {
            actions.extend(self.abandon_input());
        }
        actions.extend(self.remove_element(id));
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Copy the selected element, offset, on top, and select the copy.
    pub fn duplicate_selected(&mut self) -> Vec<Action> {
        let Some(id) = self.ui.selected_id else {
            return Vec::new();
        };
        let mut actions = Vec::new();
        if self.input.editing_id() == Some(id) {
            actions.extend(self.commit_edit());
        }
        let Some(source) = self.doc.get(&id) else {
            return actions;
        };

        let mut copy = source.clone();
        copy.id = Uuid::new_v4();
        copy.x += self.config.duplicate_offset;
        copy.y += self.config.duplicate_offset;
        copy.z_index = self.doc.next_z_index();
        copy.is_editing = false;
        debug!(source_id = %id, element_id = %copy.id, "element duplicated");

        let op = self.ledger.create(&copy);
        self.ui.selected_id = Some(copy.id);
        self.doc.add(copy);
        actions.push(Action::Persist(op));
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Raise `id` above every other element.
    pub fn bring_to_front(&mut self, id: ElementId) -> Vec<Action> {
        let Some(before) = self.doc.get(&id).map(|el| el.z_index) else {
            return Vec::new();
        };
        let Some(z) = self.doc.reorder_to_top(&id) else {
            return Vec::new();
        };
        if z == before {
            return Vec::new();
        }
        let mut actions = vec![Action::RenderNeeded];
        actions.extend(self.persist_update(id, ElementPatch::z_index(z), None));
        actions
    }

    /// Host-driven property edit (e.g. from a side panel).
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::ElementNotFound`] for an unknown id and
    /// [`CanvasError::KindMismatch`] when the patch would change the element's kind.
    pub fn update_element(&mut self, id: ElementId, patch: ElementPatch, rollback: Rollback) -> Result<Vec<Action>, CanvasError> {
        let el = self.doc.get(&id).ok_or(CanvasError::ElementNotFound(id))?;
        if patch.content.as_ref().is_some_and(|c| c.kind() != el.kind()) {
            return Err(CanvasError::KindMismatch(id));
        }
        if patch.is_empty() {
            return Ok(Vec::new());
        }
        let revert = match rollback {
            Rollback::Revert => Some(patch.inverse_for(el)),
            Rollback::BestEffort => None,
        };
        self.doc.update(&id, &patch);

        let mut actions = Vec::new();
        if let (InputState::Editing(editor), Some(ElementContent::Text { content })) = (&mut self.input, &patch.content) {
            if editor.id() == id {
                editor.set_buffer(content);
                actions.push(Action::EditorTextChanged { id, text: content.clone() });
            }
        }
        actions.push(Action::RenderNeeded);
        actions.extend(self.persist_update(id, patch, revert));
        Ok(actions)
    }

    /// Resend an element whose last write failed.
    pub fn retry_sync(&mut self, id: ElementId) -> Vec<Action> {
        if self.ledger.status(&id) != Some(SyncStatus::Failed) {
            return Vec::new();
        }
        let Some(el) = self.doc.get(&id) else {
            return Vec::new();
        };
        self.ledger.clear_failure(&id);
        if self.ledger.needs_create(&id) {
            return vec![Action::Persist(self.ledger.create(el))];
        }
        self.ledger.update(id, el.snapshot_patch(), None).map(Action::Persist).into_iter().collect()
    }

    // =============================================================
    // View
    // =============================================================

    /// Zoom to `new_zoom` (clamped) keeping the canvas point under `screen_pt` fixed.
    #[allow(clippy::float_cmp)]
    pub fn zoom_at(&mut self, screen_pt: Point, new_zoom: f64) -> Vec<Action> {
        let zoom = self.config.clamp_zoom(new_zoom);
        if zoom == self.camera.zoom {
            return Vec::new();
        }
        let next = self.camera.zoom_about_point(screen_pt, zoom);
        self.camera = next;
        debug!(zoom = next.zoom, "zoom changed");
        vec![Action::RenderNeeded]
    }

    pub fn zoom_in(&mut self) -> Vec<Action> {
        self.zoom_at(self.viewport_center(), self.camera.zoom * self.config.zoom_step)
    }

    pub fn zoom_out(&mut self) -> Vec<Action> {
        self.zoom_at(self.viewport_center(), self.camera.zoom / self.config.zoom_step)
    }

    pub fn reset_view(&mut self) -> Vec<Action> {
        self.camera = Camera::default();
        info!("view reset");
        vec![Action::RenderNeeded]
    }

    /// Pan and zoom so every element is visible. Never zooms in past 100%.
    pub fn fit_to_view(&mut self) -> Vec<Action> {
        let Some(bounds) = self.doc.bounding_box(self.config.fit_element_padding) else {
            return self.reset_view();
        };
        let max_zoom = FIT_MAX_ZOOM.min(self.config.max_zoom).max(self.config.min_zoom);
        self.camera = Camera::fitting(
            bounds,
            self.viewport_width,
            self.viewport_height,
            self.config.fit_outer_padding,
            self.config.min_zoom,
            max_zoom,
        );
        info!(zoom = self.camera.zoom, "fit to view");
        vec![Action::RenderNeeded]
    }

    /// Pan so `canvas_pt` sits at the viewport center, keeping the zoom.
    pub fn center_on(&mut self, canvas_pt: Point) -> Vec<Action> {
        let c = self.viewport_center();
        self.camera.pan_x = c.x - canvas_pt.x * self.camera.zoom;
        self.camera.pan_y = c.y - canvas_pt.y * self.camera.zoom;
        vec![Action::RenderNeeded]
    }

    // =============================================================
    // Persistence results
    // =============================================================

    /// Feed back the collaborator's answer for a dispatched write.
    pub fn resolve_persist(&mut self, op_id: OpId, result: Result<PersistOutcome, PersistError>) -> Vec<Action> {
        match self.ledger.resolve(op_id, result) {
            Resolved::Unknown => Vec::new(),
            Resolved::Confirmed { .. } => vec![Action::RenderNeeded],
            Resolved::Created { local_id, element, then } => self.adopt_server_id(local_id, element.id, then),
            Resolved::Failed { id, error, revert } => {
                if let Some(patch) = revert {
                    self.doc.update(&id, &patch);
                }
                vec![Action::Notify(Notice::persist_failed(id, &error)), Action::RenderNeeded]
            }
        }
    }

    fn adopt_server_id(&mut self, local_id: ElementId, server_id: ElementId, then: Option<Deferred>) -> Vec<Action> {
        let mut actions = Vec::new();
        if local_id != server_id && self.doc.rekey(&local_id, server_id) {
            if self.ui.selected_id == Some(local_id) {
                self.ui.selected_id = Some(server_id);
            }
            if let InputState::Editing(editor) = &mut self.input {
                if editor.id() == local_id {
                    editor.rebind(server_id);
                }
            }
            actions.push(Action::ElementRekeyed { from: local_id, to: server_id });
        }
        match then {
            Some(Deferred::Update) => {
                if let Some(el) = self.doc.get(&server_id) {
                    actions.extend(self.ledger.update(server_id, el.snapshot_patch(), None).map(Action::Persist));
                }
            }
            Some(Deferred::Delete) => actions.extend(self.ledger.delete(server_id).map(Action::Persist)),
            None => {}
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    // =============================================================
    // Gesture helpers
    // =============================================================

    fn begin_pan(&mut self, screen_pt: Point) -> Vec<Action> {
        let grab = self.camera.screen_to_canvas(screen_pt);
        self.input = InputState::Panning { grab };
        debug!("pan started");
        let mut actions = vec![Action::CapturePointer];
        actions.extend(self.set_cursor("grabbing"));
        actions
    }

    fn begin_drag(&mut self, id: ElementId, screen_pt: Point) -> Vec<Action> {
        let Some(el) = self.doc.get(&id) else {
            return Vec::new();
        };
        let grab_offset = self.camera.screen_to_canvas(screen_pt) - Point::new(el.x, el.y);
        self.input = InputState::DraggingItem {
            id,
            grab_offset,
            start_screen: screen_pt,
            orig_x: el.x,
            orig_y: el.y,
            moved: false,
        };
        self.ui.selected_id = Some(id);
        debug!(element_id = %id, "drag started");
        let mut actions = vec![Action::CapturePointer, Action::RenderNeeded];
        actions.extend(self.set_cursor("move"));
        actions
    }

    fn begin_resize(&mut self, id: ElementId, anchor: ResizeAnchor, screen_pt: Point) -> Vec<Action> {
        let Some(el) = self.doc.get(&id) else {
            return Vec::new();
        };
        let gesture = ResizeGesture::begin(el, anchor, screen_pt, &self.camera);
        self.input = InputState::ResizingItem { id, gesture };
        debug!(element_id = %id, ?anchor, "resize started");
        let mut actions = vec![Action::CapturePointer];
        actions.extend(self.set_cursor(anchor.cursor()));
        actions
    }

    fn create_text_at(&mut self, screen_pt: Point) -> Vec<Action> {
        let at = self.camera.screen_to_canvas(screen_pt);
        let (width, height) = ElementKind::Text.default_size();
        let id = Uuid::new_v4();
        self.doc.add(Element {
            id,
            board_id: self.board_id,
            x: at.x,
            y: at.y,
            width,
            height,
            rotation: 0.0,
            z_index: self.doc.next_z_index(),
            aspect_ratio: None,
            content: ElementContent::empty_text(),
            is_editing: true,
        });
        self.ledger.track_local(id);
        self.ui.selected_id = Some(id);
        let editor = TextEditor::new(id, "", height, width, TextLayout::from(&self.config));
        self.input = InputState::Editing(editor);
        debug!(element_id = %id, "text element created");
        vec![Action::BeginTextEdit { id, text: String::new() }, Action::RenderNeeded]
    }

    fn end_gesture(&mut self, screen_pt: Option<Point>) -> Vec<Action> {
        if !self.input.is_pointer_gesture() {
            return Vec::new();
        }
        let mut actions = vec![Action::ReleasePointer];
        match std::mem::take(&mut self.input) {
            InputState::DraggingItem { id, orig_x, orig_y, moved: true, .. } => {
                let moved_to = self.doc.get(&id).map(|el| ElementPatch::position(el.x, el.y));
                if let Some(patch) = moved_to.filter(|p| *p != ElementPatch::position(orig_x, orig_y)) {
                    debug!(element_id = %id, "drag finished");
                    actions.extend(self.persist_update(id, patch, None));
                }
            }
            InputState::ResizingItem { id, gesture } => {
                let start = ElementPatch::geometry(gesture.start_x, gesture.start_y, gesture.start_w, gesture.start_h);
                let resized = self.doc.get(&id).map(|el| ElementPatch::geometry(el.x, el.y, el.width, el.height));
                if let Some(patch) = resized.filter(|p| *p != start) {
                    debug!(element_id = %id, "resize finished");
                    actions.extend(self.persist_update(id, patch, None));
                }
            }
            _ => {}
        }
        let cursor = match screen_pt {
            Some(p) => self.hover_cursor(p),
            None => self.idle_cursor(),
        };
        actions.extend(self.set_cursor(cursor));
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Drop whatever gesture or edit is active without persisting it.
    fn abandon_input(&mut self) -> Vec<Action> {
        match std::mem::take(&mut self.input) {
            InputState::Idle => Vec::new(),
            InputState::Editing(editor) => {
                let id = editor.id();
                if let Some(el) = self.doc.get_mut(&id) {
                    el.is_editing = false;
                }
                vec![Action::EndTextEdit { id }]
            }
            InputState::Panning { .. } | InputState::DraggingItem { .. } | InputState::ResizingItem { .. } => {
                vec![Action::ReleasePointer]
            }
        }
    }

    /// Leave the editor, keeping trimmed text or discarding an empty element.
    #[allow(clippy::float_cmp)]
    fn commit_edit(&mut self) -> Vec<Action> {
        let editor = match std::mem::take(&mut self.input) {
            InputState::Editing(editor) => editor,
            other => {
                self.input = other;
                return Vec::new();
            }
        };
        let id = editor.id();
        let original = editor.original().to_owned();
        let start_height = editor.start_height();
        let height = editor.height_for(editor.buffer().trim());
        let mut actions = vec![Action::EndTextEdit { id }];
        self.ui.selected_id = None;

        match editor.finish() {
            EditOutcome::Discard => {
                debug!(element_id = %id, "empty text element discarded");
                actions.extend(self.remove_element(id));
            }
            EditOutcome::Keep(text) => {
                let Some(el) = self.doc.get_mut(&id) else {
                    actions.push(Action::RenderNeeded);
                    return actions;
                };
                el.is_editing = false;
                el.height = height;
                el.content = ElementContent::Text { content: text.clone() };
                if self.ledger.needs_create(&id) {
                    actions.push(Action::Persist(self.ledger.create(el)));
                } else {
                    let patch = ElementPatch {
                        height: (height != start_height).then_some(height),
                        content: (text != original).then(|| ElementContent::Text { content: text }),
                        ..ElementPatch::default()
                    };
                    if !patch.is_empty() {
                        actions.extend(self.persist_update(id, patch, None));
                    }
                }
                debug!(element_id = %id, "text edit committed");
            }
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    fn remove_element(&mut self, id: ElementId) -> Option<Action> {
        self.doc.remove(&id)?;
        if self.ui.selected_id == Some(id) {
            self.ui.selected_id = None;
        }
        self.ledger.delete(id).map(Action::Persist)
    }

    fn mirror_editor_text(&mut self, id: ElementId, text: &str, height: f64) {
        if let Some(el) = self.doc.get_mut(&id) {
            el.content = ElementContent::Text { content: text.to_owned() };
            el.height = height;
        }
    }

    fn persist_update(&mut self, id: ElementId, patch: ElementPatch, revert: Option<ElementPatch>) -> Option<Action> {
        self.ledger.update(id, patch, revert).map(Action::Persist)
    }

    fn viewport_center(&self) -> Point {
        Point::new(self.viewport_width * 0.5, self.viewport_height * 0.5)
    }

    // --- Cursor ---

    fn hover(&mut self, screen_pt: Point) -> Option<Action> {
        let cursor = self.hover_cursor(screen_pt);
        self.set_cursor(cursor)
    }

    fn hover_cursor(&self, screen_pt: Point) -> &'static str {
        match hit_test(screen_pt, &self.doc, &self.camera, self.ui.selected_id) {
            Some(Hit { part: HitPart::ResizeHandle(anchor), .. }) if self.ui.tool != Tool::Hand => anchor.cursor(),
            Some(_) if self.ui.tool != Tool::Hand => "move",
            _ => self.idle_cursor(),
        }
    }

    fn idle_cursor(&self) -> &'static str {
        match self.ui.tool {
            Tool::Select => "default",
            Tool::Hand => "grab",
            Tool::Text => "text",
        }
    }

    fn set_cursor(&mut self, cursor: &'static str) -> Option<Action> {
        if self.cursor == cursor {
            return None;
        }
        self.cursor = cursor;
        Some(Action::SetCursor(cursor.to_owned()))
    }
}

// =============================================================
// Browser wrapper
// =============================================================

/// The full canvas engine. Wraps `EngineCore` and owns the browser canvas,
/// the sized container it lives in, and the window pointer capture.
pub struct Engine {
    canvas: HtmlCanvasElement,
    container: HtmlElement,
    capture: Option<Disposer>,
    pub core: EngineCore,
}

impl Engine {
    /// Create a new engine bound to the given canvas element.
    ///
    /// # Errors
    ///
    /// Returns `CanvasError::InvalidConfig` when `config` fails validation.
    pub fn new(
        canvas: HtmlCanvasElement,
        container: HtmlElement,
        board_id: BoardId,
        config: CanvasConfig,
    ) -> Result<Self, CanvasError> {
        let core = EngineCore::with_config(board_id, config)?;
        Ok(Self { canvas, container, capture: None, core })
    }

    // --- Viewport ---

    /// Update viewport dimensions and device pixel ratio.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn set_viewport(&mut self, width_css: f64, height_css: f64, dpr: f64) {
        self.core.set_viewport(width_css, height_css, dpr);
        self.canvas.set_width((width_css * dpr).round().max(0.0) as u32);
        self.canvas.set_height((height_css * dpr).round().max(0.0) as u32);
    }

    /// Convert client coordinates into surface-local screen coordinates.
    #[must_use]
    pub fn client_to_surface(&self, client_x: f64, client_y: f64) -> Point {
        let rect = self.container.get_bounding_client_rect();
        Point::new(client_x - rect.left(), client_y - rect.top())
    }

    fn event_point(&self, event: &MouseEvent) -> Point {
        self.client_to_surface(f64::from(event.client_x()), f64::from(event.client_y()))
    }

    fn modifiers(event: &MouseEvent) -> Modifiers {
        Modifiers { shift: event.shift_key(), ctrl: event.ctrl_key(), alt: event.alt_key(), meta: event.meta_key() }
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, event: &MouseEvent) -> Vec<Action> {
        let pt = self.event_point(event);
        self.core.on_pointer_down(pt, Button::from_dom(event.button()), Self::modifiers(event))
    }

    pub fn on_pointer_move(&mut self, event: &MouseEvent) -> Vec<Action> {
        let pt = self.event_point(event);
        self.core.on_pointer_move(pt, Self::modifiers(event))
    }

    pub fn on_pointer_up(&mut self, event: &MouseEvent) -> Vec<Action> {
        let pt = self.event_point(event);
        self.core.on_pointer_up(pt, Button::from_dom(event.button()), Self::modifiers(event))
    }

    pub fn on_pointer_cancel(&mut self) -> Vec<Action> {
        self.core.on_pointer_cancel()
    }

    pub fn on_double_click(&mut self, event: &MouseEvent) -> Vec<Action> {
        let pt = self.event_point(event);
        self.core.on_double_click(pt)
    }

    /// Plain wheel events are left to the page; only modified ones are consumed.
    pub fn on_wheel(&mut self, event: &WheelEvent) -> Vec<Action> {
        let pt = self.event_point(event);
        let delta = WheelDelta { dx: event.delta_x(), dy: event.delta_y() };
        let actions = self.core.on_wheel(pt, delta, Self::modifiers(event));
        if !actions.is_empty() {
            event.prevent_default();
        }
        actions
    }

    pub fn on_key_down(&mut self, event: &KeyboardEvent) -> Vec<Action> {
        let modifiers = Modifiers {
            shift: event.shift_key(),
            ctrl: event.ctrl_key(),
            alt: event.alt_key(),
            meta: event.meta_key(),
        };
        let key = event.key();
        let editing = self.core.editing_id().is_some();
        if editing && ((key == "Enter" && !modifiers.shift) || key == "Escape") {
            event.prevent_default();
        }
        let actions = self.core.on_key_down(Key(key), modifiers);
        if !editing && !actions.is_empty() {
            event.prevent_default();
        }
        actions
    }

    pub fn on_text_input(&mut self, value: &str) -> Vec<Action> {
        self.core.on_text_input(value)
    }

    pub fn on_blur(&mut self) -> Vec<Action> {
        self.core.on_blur()
    }

    pub fn on_drop(&mut self, event: &DragEvent) -> Vec<Action> {
        event.prevent_default();
        let Some(transfer) = event.data_transfer() else {
            return Vec::new();
        };
        let raw = match transfer.get_data(DRAG_DATA_FORMAT) {
            Ok(raw) => raw,
            Err(err) => {
                debug!(error = ?err, "drop without readable drag data");
                return Vec::new();
            }
        };
        let pt = self.event_point(event);
        self.core.on_drop(pt, &raw)
    }

    // --- Pointer capture ---

    /// Start forwarding window pointer events for the active gesture.
    /// Call on [`Action::CapturePointer`].
    ///
    /// # Errors
    ///
    /// Returns `Err` if the window listeners cannot be attached.
    pub fn capture_pointer(
        &mut self,
        on_move: impl FnMut(MouseEvent) + 'static,
        on_end: impl FnMut(MouseEvent) + 'static,
    ) -> Result<(), JsValue> {
        self.release_pointer();
        self.capture = Some(capture_window_pointer(on_move, on_end)?);
        Ok(())
    }

    /// Detach the window listeners. Call on [`Action::ReleasePointer`].
    pub fn release_pointer(&mut self) {
        if let Some(capture) = self.capture.as_mut() {
            capture.dispose();
        }
    }

    // --- Render ---

    /// Draw the current state to the canvas.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the 2D context is unavailable or a draw call fails.
    pub fn render(&self) -> Result<(), JsValue> {
        let ctx = self
            .canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        let core = &self.core;
        let views = render::layout(&core.doc, &core.ledger, &core.camera, &core.ui, core.config.text_font_px);
        let handles = render::handles(&core.doc, &core.camera, &core.ui);
        render::draw(&ctx, &views, handles.as_ref(), core.viewport_width, core.viewport_height, core.dpr)
    }

    // --- Delegated queries ---

    #[must_use]
    pub fn selection(&self) -> Option<ElementId> {
        self.core.selection()
    }

    #[must_use]
    pub fn camera(&self) -> Camera {
        self.core.camera()
    }

    #[must_use]
    pub fn element(&self, id: &ElementId) -> Option<&Element> {
        self.core.element(id)
    }
}
