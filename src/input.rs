//! Pointer and keyboard vocabulary for the board, plus the gesture machine.
//!
//! `InputState` holds whichever gesture is live: a pan, a drag, a resize, or
//! the inline text editor. Each variant keeps what the engine needs to apply
//! moves incrementally and to build the single write sent on release.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::camera::Point;
use crate::doc::ElementId;
use crate::resize::ResizeGesture;
use crate::text_edit::TextEditor;

/// Active board tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    /// Select and move elements. Default.
    #[default]
    Select,
    /// Hand tool: background drags always pan.
    Hand,
    /// Clicking the background creates a text box.
    Text,
}

impl Tool {
    /// Whether a background press with this tool starts a pan.
    #[must_use]
    pub fn pans_background(self) -> bool {
        matches!(self, Self::Select | Self::Hand)
    }
}

/// Modifier keys down when the event fired.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Modifiers {
    /// Shift key is held.
    pub shift: bool,
    /// Ctrl key is held.
    pub ctrl: bool,
    /// Alt, or Option on macOS.
    pub alt: bool,
    /// Meta, or Command on macOS.
    pub meta: bool,
}

impl Modifiers {
    /// Ctrl on most platforms, Cmd on macOS.
    #[must_use]
    pub fn command(self) -> bool {
        self.ctrl || self.meta
    }
}

/// Which pointer button went down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left button, pen contact, or touch.
    Primary,
    /// Wheel click. Always pans.
    Middle,
    /// Right button. Ignored by the board.
    Secondary,
}

impl Button {
    /// Map a DOM `MouseEvent.button` code.
    #[must_use]
    pub fn from_dom(code: i16) -> Self {
        match code {
            1 => Self::Middle,
            2 => Self::Secondary,
            _ => Self::Primary,
        }
    }
}

/// A `KeyboardEvent.key` value such as `"Backspace"` or `"]"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

/// Scroll delta from a wheel or trackpad.
#[derive(Debug, Clone, Copy)]
pub struct WheelDelta {
    /// Pixels, positive to the right.
    pub dx: f64,
    /// Pixels, positive downward.
    pub dy: f64,
}

/// Tool and selection, shared with the renderer.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    /// Currently active tool.
    pub tool: Tool,
    /// The id of the currently selected element, if any.
    pub selected_id: Option<ElementId>,
}

/// Internal state for the gesture state machine.
///
/// Each active variant carries gesture context needed to compute updates and
/// emit final actions on pointer-up. Only one variant is live at a time, so
/// only one gesture can be in progress.
#[derive(Debug, Clone, Default)]
pub enum InputState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// The user is panning the canvas by dragging the background.
    Panning {
        /// Canvas point grabbed at press time; each move puts it back under the cursor.
        grab: Point,
    },
    /// The user is moving an element across the canvas.
    DraggingItem {
        /// Id of the element being dragged.
        id: ElementId,
        /// Canvas-space offset from the element anchor to the grab point.
        grab_offset: Point,
        /// Screen position of the press, used for the click-vs-drag threshold.
        start_screen: Point,
        /// Element x at the start of the drag.
        orig_x: f64,
        /// Element y at the start of the drag.
        orig_y: f64,
        /// Whether the pointer has travelled past the drag threshold.
        moved: bool,
    },
    /// The user is resizing the selected element by one of its eight handles.
    ResizingItem {
        /// Id of the element being resized.
        id: ElementId,
        /// Handle, starting geometry, and pointer origin.
        gesture: ResizeGesture,
    },
    /// A text element is bound to the inline editor.
    Editing(TextEditor),
}

impl InputState {
    /// Whether a pointer gesture (pan, drag, resize) currently holds the pointer.
    #[must_use]
    pub fn is_pointer_gesture(&self) -> bool {
        matches!(self, Self::Panning { .. } | Self::DraggingItem { .. } | Self::ResizingItem { .. })
    }

    /// Id of the element being edited, if any.
    #[must_use]
    pub fn editing_id(&self) -> Option<ElementId> {
        match self {
            Self::Editing(editor) => Some(editor.id()),
            _ => None,
        }
    }
}
