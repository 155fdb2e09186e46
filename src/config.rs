//! Engine configuration supplied by the host page.
//!
//! The browser host has no environment, so configuration arrives as a JSON
//! object. Every field is optional; missing fields take the defaults from
//! [`crate::consts`].

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

use crate::consts::{
    DRAWING_MIN_ZOOM, DUPLICATE_OFFSET, FIT_ELEMENT_PADDING, FIT_OUTER_PADDING, MAX_ZOOM, MIN_ZOOM, ROTATE_STEP_DEG,
    TEXT_FONT_PX, TEXT_LINE_HEIGHT, TEXT_PADDING, WHEEL_ZOOM_SENSITIVITY, ZOOM_STEP,
};
use crate::error::CanvasError;

/// Which element model a surface accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementTier {
    /// Text, image, link, yarn and swatch elements.
    #[default]
    Rich,
    /// Text elements only.
    Drawing,
}

/// What the Escape key does inside the inline text editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EscapeBehavior {
    /// Commit the current buffer, same as blur.
    #[default]
    Commit,
    /// Restore the text from when editing began, then commit that.
    Revert,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub wheel_zoom_sensitivity: f64,
    pub zoom_step: f64,
    pub fit_element_padding: f64,
    pub fit_outer_padding: f64,
    pub rotate_step_deg: f64,
    pub duplicate_offset: f64,
    pub tier: ElementTier,
    pub escape_behavior: EscapeBehavior,
    pub text_font_px: f64,
    pub text_line_height: f64,
    pub text_padding: f64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            wheel_zoom_sensitivity: WHEEL_ZOOM_SENSITIVITY,
            zoom_step: ZOOM_STEP,
            fit_element_padding: FIT_ELEMENT_PADDING,
            fit_outer_padding: FIT_OUTER_PADDING,
            rotate_step_deg: ROTATE_STEP_DEG,
            duplicate_offset: DUPLICATE_OFFSET,
            tier: ElementTier::Rich,
            escape_behavior: EscapeBehavior::Commit,
            text_font_px: TEXT_FONT_PX,
            text_line_height: TEXT_LINE_HEIGHT,
            text_padding: TEXT_PADDING,
        }
    }
}

impl CanvasConfig {
    /// Preset for the lightweight text-only drawing surface.
    #[must_use]
    pub fn drawing() -> Self {
        Self { min_zoom: DRAWING_MIN_ZOOM, tier: ElementTier::Drawing, ..Self::default() }
    }

    /// Parse and validate a host-supplied JSON config.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::ConfigParse`] for malformed JSON and
    /// [`CanvasError::InvalidConfig`] when the values fail [`Self::validate`].
    pub fn from_json(raw: &str) -> Result<Self, CanvasError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::InvalidConfig`] naming the first violated constraint.
    pub fn validate(&self) -> Result<(), CanvasError> {
        if !positive(self.min_zoom) {
            return Err(CanvasError::InvalidConfig(format!("min_zoom must be positive, got {}", self.min_zoom)));
        }
        if self.min_zoom > self.max_zoom {
            return Err(CanvasError::InvalidConfig(format!(
                "min_zoom {} exceeds max_zoom {}",
                self.min_zoom, self.max_zoom
            )));
        }
        if !positive(self.zoom_step - 1.0) {
            return Err(CanvasError::InvalidConfig(format!("zoom_step must be > 1, got {}", self.zoom_step)));
        }
        if self.wheel_zoom_sensitivity < 0.0 {
            return Err(CanvasError::InvalidConfig("wheel_zoom_sensitivity must not be negative".into()));
        }
        if self.fit_element_padding < 0.0 || self.fit_outer_padding < 0.0 {
            return Err(CanvasError::InvalidConfig("fit paddings must not be negative".into()));
        }
        if !positive(self.text_font_px) || !positive(self.text_line_height) {
            return Err(CanvasError::InvalidConfig("text metrics must be positive".into()));
        }
        Ok(())
    }

    /// Clamp a zoom value into the configured range. An inverted range
    /// resolves to `max_zoom`.
    #[must_use]
    pub fn clamp_zoom(&self, zoom: f64) -> f64 {
        zoom.max(self.min_zoom).min(self.max_zoom)
    }
}

fn positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}
