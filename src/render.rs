//! Rendering: turns document state into a screen-space display list and
//! draws it to a 2D context.
//!
//! `layout` and `handles` are pure and run anywhere; the browser host may use
//! the display list to position DOM overlays instead of painting. `draw` is
//! the only place that touches [`web_sys::CanvasRenderingContext2d`].
//!
//! Context failures surface as `Err(JsValue)` and stop the frame;
//! [`crate::engine::Engine::render`] passes them to the host.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use crate::camera::{Camera, Point};
use crate::consts::HANDLE_SIZE_PX;
use crate::doc::{Element, ElementContent, ElementId, ElementStore};
use crate::hit::ResizeAnchor;
use crate::input::UiState;
use crate::resize::handle_screen_positions;
use crate::sync::{SyncLedger, SyncStatus};

const FRAME_FILL: &str = "#FFFFFF";
const FRAME_STROKE: &str = "#D6D3CE";
const TEXT_COLOR: &str = "#2B2B2B";
const MUTED_TEXT: &str = "#7A756E";
const SELECTION_COLOR: &str = "#1E90FF";
const FAILED_COLOR: &str = "#D64545";
const PLACEHOLDER_FILL: &str = "#F1EEE9";

/// Pending items get a dashed outline, in screen pixels.
const PENDING_DASH_PX: f64 = 4.0;

/// Type-specific content of one item, already reduced to what gets shown.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemBody {
    Text { lines: Vec<String>, font_px: f64 },
    Image { url: String, alt: Option<String> },
    Link { title: String, host: String, url: String },
    Yarn { lines: Vec<String> },
    Swatch { label: String, details: Vec<String>, image_url: Option<String> },
}

/// One element placed in screen space.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemView {
    pub id: ElementId,
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    /// Degrees, clockwise, around the item center.
    pub rotation: f64,
    pub z_index: i64,
    pub selected: bool,
    pub editing: bool,
    pub sync: Option<SyncStatus>,
    pub body: ItemBody,
}

/// Display list for the whole board, bottom-most item first.
///
/// `font_px` is the text size in canvas units; it is scaled by the zoom.
#[must_use]
pub fn layout(store: &ElementStore, ledger: &SyncLedger, camera: &Camera, ui: &UiState, font_px: f64) -> Vec<ItemView> {
    store
        .all()
        .into_iter()
        .map(|el| {
            let top_left = camera.canvas_to_screen(Point::new(el.x, el.y));
            ItemView {
                id: el.id,
                left: top_left.x,
                top: top_left.y,
                width: el.width * camera.zoom,
                height: el.height * camera.zoom,
                rotation: el.rotation,
                z_index: el.z_index,
                selected: ui.selected_id == Some(el.id),
                editing: el.is_editing,
                sync: ledger.status(&el.id),
                body: body_for(el, font_px * camera.zoom),
            }
        })
        .collect()
}

/// Resize handles of the selected element, unless it is being edited.
#[must_use]
pub fn handles(store: &ElementStore, camera: &Camera, ui: &UiState) -> Option<[(ResizeAnchor, Point); 8]> {
    let el = ui.selected_id.and_then(|id| store.get(&id))?;
    if el.is_editing {
        return None;
    }
    Some(handle_screen_positions(el, camera))
}

fn body_for(el: &Element, font_px: f64) -> ItemBody {
    match &el.content {
        ElementContent::Text { content } => ItemBody::Text { lines: content.split('\n').map(str::to_owned).collect(), font_px },
        ElementContent::Image { url, alt } => ItemBody::Image { url: url.clone(), alt: alt.clone() },
        ElementContent::Link { url, title } => ItemBody::Link {
            title: title.clone().filter(|t| !t.trim().is_empty()).unwrap_or_else(|| url.clone()),
            host: link_host(url).to_owned(),
            url: url.clone(),
        },
        ElementContent::Yarn(yarn) => {
            let mut lines = vec![yarn.name.clone()];
            lines.extend(yarn.brand.clone());
            let detail: Vec<&str> = [yarn.color.as_deref(), yarn.weight.as_deref()].into_iter().flatten().collect();
            if !detail.is_empty() {
                lines.push(detail.join(" · "));
            }
            ItemBody::Yarn { lines }
        }
        ElementContent::Swatch(swatch) => ItemBody::Swatch {
            label: swatch.name.clone(),
            details: [swatch.stitch.clone(), swatch.hook_size.clone()].into_iter().flatten().collect(),
            image_url: swatch.image_url.clone(),
        },
    }
}

/// Host part of a URL, or the URL itself when it has no scheme.
fn link_host(url: &str) -> &str {
    let rest = url.split_once("://").map_or(url, |(_, rest)| rest);
    let end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    &rest[..end]
}

// =============================================================
// Drawing
// =============================================================

/// Draw the display list and the selection handles.
///
/// Viewport size is in CSS pixels; `dpr` scales the backing store.
///
/// # Errors
///
/// Returns `Err` when the context rejects a call.
pub fn draw(
    ctx: &CanvasRenderingContext2d,
    views: &[ItemView],
    handles: Option<&[(ResizeAnchor, Point); 8]>,
    viewport_w: f64,
    viewport_h: f64,
    dpr: f64,
) -> Result<(), JsValue> {
    ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0)?;
    ctx.clear_rect(0.0, 0.0, viewport_w, viewport_h);

    for view in views {
        draw_item(ctx, view)?;
    }

    if let Some(handles) = handles {
        draw_handles(ctx, handles);
    }
    Ok(())
}

fn draw_item(ctx: &CanvasRenderingContext2d, view: &ItemView) -> Result<(), JsValue> {
    ctx.save();
    ctx.translate(view.left + view.width * 0.5, view.top + view.height * 0.5)?;
    ctx.rotate(view.rotation.to_radians())?;
    let hw = view.width * 0.5;
    let hh = view.height * 0.5;

    ctx.set_fill_style_str(FRAME_FILL);
    ctx.fill_rect(-hw, -hh, view.width, view.height);

    // The overlay editor draws the text while editing.
    if !view.editing {
        draw_body(ctx, view, -hw, -hh)?;
    }

    draw_outline(ctx, view, hw, hh)?;
    ctx.restore();
    Ok(())
}

fn draw_outline(ctx: &CanvasRenderingContext2d, view: &ItemView, hw: f64, hh: f64) -> Result<(), JsValue> {
    let color = if view.selected {
        SELECTION_COLOR
    } else if view.sync == Some(SyncStatus::Failed) {
        FAILED_COLOR
    } else {
        FRAME_STROKE
    };
    ctx.set_stroke_style_str(color);
    ctx.set_line_width(if view.selected { 2.0 } else { 1.0 });
    if matches!(view.sync, Some(SyncStatus::Pending | SyncStatus::Local)) {
        let dash = js_sys::Array::of2(&JsValue::from_f64(PENDING_DASH_PX), &JsValue::from_f64(PENDING_DASH_PX));
        ctx.set_line_dash(&dash)?;
    }
    ctx.stroke_rect(-hw, -hh, view.width, view.height);
    ctx.set_line_dash(&js_sys::Array::new())?;
    Ok(())
}

#[allow(clippy::cast_precision_loss)]
fn draw_body(ctx: &CanvasRenderingContext2d, view: &ItemView, x: f64, y: f64) -> Result<(), JsValue> {
    let pad = 8.0;
    match &view.body {
        ItemBody::Text { lines, font_px } => {
            ctx.set_fill_style_str(TEXT_COLOR);
            ctx.set_font(&format!("{font_px:.0}px sans-serif"));
            ctx.set_text_baseline("top");
            let step = font_px * 1.4;
            for (i, line) in lines.iter().enumerate() {
                let ly = y + pad + step * i as f64;
                if ly + step > y + view.height {
                    break;
                }
                ctx.fill_text(&fit_text(ctx, line, view.width - 2.0 * pad), x + pad, ly)?;
            }
        }
        ItemBody::Image { alt, .. } => {
            ctx.set_fill_style_str(PLACEHOLDER_FILL);
            ctx.fill_rect(x + pad, y + pad, view.width - 2.0 * pad, view.height - 2.0 * pad);
            if let Some(alt) = alt {
                draw_label(ctx, alt, x + pad * 2.0, y + pad * 2.0, view.width - 4.0 * pad, MUTED_TEXT)?;
            }
        }
        ItemBody::Link { title, host, .. } => {
            draw_label(ctx, title, x + pad, y + pad, view.width - 2.0 * pad, TEXT_COLOR)?;
            draw_label(ctx, host, x + pad, y + pad + 20.0, view.width - 2.0 * pad, MUTED_TEXT)?;
        }
        ItemBody::Yarn { lines } => {
            for (i, line) in lines.iter().enumerate() {
                let color = if i == 0 { TEXT_COLOR } else { MUTED_TEXT };
                draw_label(ctx, line, x + pad, y + pad + 18.0 * i as f64, view.width - 2.0 * pad, color)?;
            }
        }
        ItemBody::Swatch { label, details, .. } => {
            let swatch_h = (view.height * 0.6).max(0.0);
            ctx.set_fill_style_str(PLACEHOLDER_FILL);
            ctx.fill_rect(x + pad, y + pad, view.width - 2.0 * pad, swatch_h - pad);
            draw_label(ctx, label, x + pad, y + swatch_h + 4.0, view.width - 2.0 * pad, TEXT_COLOR)?;
            if !details.is_empty() {
                draw_label(ctx, &details.join(" · "), x + pad, y + swatch_h + 22.0, view.width - 2.0 * pad, MUTED_TEXT)?;
            }
        }
    }
    Ok(())
}

fn draw_label(ctx: &CanvasRenderingContext2d, text: &str, x: f64, y: f64, max_w: f64, color: &str) -> Result<(), JsValue> {
    ctx.set_fill_style_str(color);
    ctx.set_font("14px sans-serif");
    ctx.set_text_baseline("top");
    ctx.fill_text(&fit_text(ctx, text, max_w), x, y)
}

/// Truncate `text` with an ellipsis so it fits in `max_w` pixels.
fn fit_text(ctx: &CanvasRenderingContext2d, text: &str, max_w: f64) -> String {
    if max_w <= 0.0 {
        return String::new();
    }
    if text_width(ctx, text) <= max_w {
        return text.to_owned();
    }
    let mut chars: Vec<char> = text.chars().collect();
    while !chars.is_empty() {
        chars.pop();
        let candidate: String = chars.iter().collect::<String>() + "…";
        if text_width(ctx, &candidate) <= max_w {
            return candidate;
        }
    }
    String::new()
}

fn text_width(ctx: &CanvasRenderingContext2d, text: &str) -> f64 {
    match ctx.measure_text(text) {
        Ok(metrics) => metrics.width(),
        Err(_) => f64::INFINITY,
    }
}

fn draw_handles(ctx: &CanvasRenderingContext2d, handles: &[(ResizeAnchor, Point); 8]) {
    let half = HANDLE_SIZE_PX * 0.5;
    ctx.set_fill_style_str(FRAME_FILL);
    ctx.set_stroke_style_str(SELECTION_COLOR);
    ctx.set_line_width(1.0);
    for (_, p) in handles {
        ctx.fill_rect(p.x - half, p.y - half, HANDLE_SIZE_PX, HANDLE_SIZE_PX);
        ctx.stroke_rect(p.x - half, p.y - half, HANDLE_SIZE_PX, HANDLE_SIZE_PX);
    }
}
