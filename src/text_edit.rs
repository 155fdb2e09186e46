//! Inline text editor bound to a single text element.
//!
//! The editor keeps its own buffer so keystrokes never go through
//! persistence. The engine mirrors the buffer into the in-memory element on
//! every change (so the renderer stays live) and only persists on commit.

#[cfg(test)]
#[path = "text_edit_test.rs"]
mod text_edit_test;

use crate::config::{CanvasConfig, EscapeBehavior};
use crate::consts::{TEXT_AVG_CHAR_RATIO, TEXT_FONT_PX, TEXT_LINE_HEIGHT, TEXT_PADDING};
use crate::doc::ElementId;
use crate::input::{Key, Modifiers};

/// Font metrics used for the auto-grow estimate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextLayout {
    pub font_px: f64,
    /// Multiple of `font_px`.
    pub line_height: f64,
    pub padding: f64,
}

impl Default for TextLayout {
    fn default() -> Self {
        Self { font_px: TEXT_FONT_PX, line_height: TEXT_LINE_HEIGHT, padding: TEXT_PADDING }
    }
}

impl From<&CanvasConfig> for TextLayout {
    fn from(config: &CanvasConfig) -> Self {
        Self { font_px: config.text_font_px, line_height: config.text_line_height, padding: config.text_padding }
    }
}

impl TextLayout {
    /// Characters that fit on one row of a box `width` wide.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn chars_per_line(&self, width: f64) -> usize {
        let inner = (width - 2.0 * self.padding).max(0.0);
        let per = (inner / (self.font_px * TEXT_AVG_CHAR_RATIO)).floor();
        (per as usize).max(1)
    }

    /// Estimated wrapped row count for `text` in a box `width` wide.
    #[must_use]
    pub fn rows(&self, text: &str, width: f64) -> usize {
        let per = self.chars_per_line(width);
        text.split('\n')
            .map(|line| line.chars().count().div_ceil(per).max(1))
            .sum()
    }

    /// Height needed to show `text` without scrolling.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn content_height(&self, text: &str, width: f64) -> f64 {
        self.rows(text, width) as f64 * self.font_px * self.line_height + 2.0 * self.padding
    }
}

/// What a key press inside the editor means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Key was handled (or ignored); keep editing.
    Continue,
    /// Leave the editor and commit.
    Commit,
}

/// Result of leaving the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// Keep the element with this trimmed text.
    Keep(String),
    /// Trimmed text is empty; the element is removed.
    Discard,
}

#[derive(Debug, Clone)]
pub struct TextEditor {
    id: ElementId,
    buffer: String,
    original: String,
    width: f64,
    start_height: f64,
    layout: TextLayout,
}

impl TextEditor {
    /// Bind an editor to element `id` showing `text`.
    #[must_use]
    pub fn new(id: ElementId, text: &str, start_height: f64, width: f64, layout: TextLayout) -> Self {
        Self {
            id,
            buffer: text.to_owned(),
            original: text.to_owned(),
            width,
            start_height,
            layout,
        }
    }

    #[must_use]
    pub fn id(&self) -> ElementId {
        self.id
    }

    /// Follow the element to a new id after its create is confirmed.
    pub fn rebind(&mut self, id: ElementId) {
        self.id = id;
    }

    #[must_use]
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    #[must_use]
    pub fn original(&self) -> &str {
        &self.original
    }

    /// Element height when editing began.
    #[must_use]
    pub fn start_height(&self) -> f64 {
        self.start_height
    }

    /// Replace the buffer with the overlay input's current value.
    pub fn set_buffer(&mut self, text: &str) {
        text.clone_into(&mut self.buffer);
    }

    /// Height the element should have for the current buffer. Never shrinks
    /// below the height the element had when editing began.
    #[must_use]
    pub fn auto_height(&self) -> f64 {
        self.height_for(&self.buffer)
    }

    /// Auto-grow height for `text`, floored at the starting height.
    #[must_use]
    pub fn height_for(&self, text: &str) -> f64 {
        self.layout.content_height(text, self.width).max(self.start_height)
    }

    /// Interpret a key press.
    ///
    /// Enter commits and Escape commits (or reverts then commits, per
    /// `escape`). Shift+Enter is left to the overlay, whose new value arrives
    /// through [`TextEditor::set_buffer`] with the newline at the caret.
    pub fn on_key(&mut self, key: &Key, modifiers: Modifiers, escape: EscapeBehavior) -> KeyOutcome {
        match key.0.as_str() {
            "Enter" if !modifiers.shift => KeyOutcome::Commit,
            "Escape" => {
                if escape == EscapeBehavior::Revert {
                    self.buffer.clone_from(&self.original);
                }
                KeyOutcome::Commit
            }
            _ => KeyOutcome::Continue,
        }
    }

    /// Consume the editor and decide what happens to the element.
    #[must_use]
    pub fn finish(self) -> EditOutcome {
        let trimmed = self.buffer.trim();
        if trimmed.is_empty() {
            EditOutcome::Discard
        } else {
            EditOutcome::Keep(trimmed.to_owned())
        }
    }
}
