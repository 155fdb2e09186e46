//! Drop payloads from external drag sources (the sidebar tray).
//!
//! A tray item serializes `{ "type": "<kind>", "data": { ... } }` into the
//! drag-data transfer. Anything that does not decode into a known kind with a
//! well-formed `data` object is ignored: malformed drops are not errors.

#[cfg(test)]
#[path = "payload_test.rs"]
mod payload_test;

use serde::Deserialize;
use tracing::debug;

use crate::config::ElementTier;
use crate::doc::{ElementContent, ElementKind};

/// MIME-ish key the tray uses on the drag-data transfer.
pub const DRAG_DATA_FORMAT: &str = "application/json";

#[derive(Debug, Deserialize)]
struct RawPayload {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    data: serde_json::Value,
}

/// A decoded drop: the element content plus an optional intrinsic aspect ratio.
#[derive(Debug, Clone, PartialEq)]
pub struct DropPayload {
    pub content: ElementContent,
    /// Width / height of the dropped media, when the tray knows it.
    pub aspect_ratio: Option<f64>,
}

/// Decode a raw drag-data string. Returns `None` for anything malformed or
/// not accepted by `tier`.
#[must_use]
pub fn decode(raw: &str, tier: ElementTier) -> Option<DropPayload> {
    let parsed: RawPayload = match serde_json::from_str(raw) {
        Ok(p) => p,
        Err(e) => {
            debug!(error = %e, "ignoring unparseable drop payload");
            return None;
        }
    };
    decode_value(&parsed.kind, parsed.data, tier)
}

fn decode_value(kind: &str, data: serde_json::Value, tier: ElementTier) -> Option<DropPayload> {
    if !data.is_object() {
        debug!(kind, "ignoring drop payload without a data object");
        return None;
    }
    let aspect_ratio = intrinsic_aspect(&data);
    let tagged = serde_json::json!({ "type": kind, "properties": data });
    let content: ElementContent = match serde_json::from_value(tagged) {
        Ok(c) => c,
        Err(e) => {
            debug!(kind, error = %e, "ignoring drop payload with unexpected shape");
            return None;
        }
    };
    if tier == ElementTier::Drawing && content.kind() != ElementKind::Text {
        debug!(kind, "drawing surface accepts text only");
        return None;
    }
    let aspect_ratio = match content.kind() {
        ElementKind::Image | ElementKind::Swatch => aspect_ratio,
        _ => None,
    };
    Some(DropPayload { content, aspect_ratio })
}

fn intrinsic_aspect(data: &serde_json::Value) -> Option<f64> {
    let w = data.get("width").and_then(serde_json::Value::as_f64)?;
    let h = data.get("height").and_then(serde_json::Value::as_f64)?;
    (w > 0.0 && h > 0.0).then(|| w / h)
}
