#![allow(clippy::float_cmp)]

use super::*;
use crate::error::ErrorCode;

#[test]
fn default_matches_board_surface() {
    let cfg = CanvasConfig::default();
    assert_eq!(cfg.min_zoom, 0.1);
    assert_eq!(cfg.max_zoom, 3.0);
    assert_eq!(cfg.tier, ElementTier::Rich);
    assert_eq!(cfg.escape_behavior, EscapeBehavior::Commit);
    assert_eq!(cfg.rotate_step_deg, 15.0);
    assert!(cfg.validate().is_ok());
}

#[test]
fn drawing_preset_is_text_only_with_higher_floor() {
    let cfg = CanvasConfig::drawing();
    assert_eq!(cfg.min_zoom, 0.2);
    assert_eq!(cfg.tier, ElementTier::Drawing);
    assert!(cfg.validate().is_ok());
}

#[test]
fn from_json_empty_object_uses_defaults() {
    let cfg = CanvasConfig::from_json("{}").unwrap();
    assert_eq!(cfg, CanvasConfig::default());
}

#[test]
fn from_json_overrides_fields() {
    let cfg = CanvasConfig::from_json(r#"{"min_zoom":0.25,"tier":"drawing","escape_behavior":"revert"}"#).unwrap();
    assert_eq!(cfg.min_zoom, 0.25);
    assert_eq!(cfg.max_zoom, 3.0);
    assert_eq!(cfg.tier, ElementTier::Drawing);
    assert_eq!(cfg.escape_behavior, EscapeBehavior::Revert);
}

#[test]
fn from_json_rejects_malformed() {
    let err = CanvasConfig::from_json("{not json").unwrap_err();
    assert_eq!(err.error_code(), "E_CONFIG_PARSE");
}

#[test]
fn from_json_rejects_inverted_zoom_range() {
    let err = CanvasConfig::from_json(r#"{"min_zoom":2.0,"max_zoom":1.0}"#).unwrap_err();
    assert_eq!(err.error_code(), "E_INVALID_CONFIG");
    assert!(err.to_string().contains("exceeds"));
}

#[test]
fn validate_rejects_non_positive_min_zoom() {
    let cfg = CanvasConfig { min_zoom: 0.0, ..CanvasConfig::default() };
    assert!(cfg.validate().is_err());
}

#[test]
fn validate_rejects_zoom_step_at_or_below_one() {
    let cfg = CanvasConfig { zoom_step: 1.0, ..CanvasConfig::default() };
    assert!(cfg.validate().is_err());
}

#[test]
fn clamp_zoom_inverted_range_does_not_panic() {
    let cfg = CanvasConfig { min_zoom: 4.0, max_zoom: 2.0, ..CanvasConfig::default() };
    assert_eq!(cfg.clamp_zoom(1.0), 2.0);
    assert_eq!(cfg.clamp_zoom(3.0), 2.0);
}

#[test]
fn clamp_zoom_respects_range() {
    let cfg = CanvasConfig::default();
    assert_eq!(cfg.clamp_zoom(0.01), 0.1);
    assert_eq!(cfg.clamp_zoom(10.0), 3.0);
    assert_eq!(cfg.clamp_zoom(1.5), 1.5);
}
