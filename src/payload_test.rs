#![allow(clippy::float_cmp)]

use serde_json::json;

use super::*;
use crate::doc::{SwatchRef, YarnRef};

fn rich(raw: &serde_json::Value) -> Option<DropPayload> {
    decode(&raw.to_string(), ElementTier::Rich)
}

#[test]
fn decodes_image_with_intrinsic_aspect() {
    let p = rich(&json!({ "type": "image", "data": { "url": "https://img.test/a.png", "width": 400, "height": 200 } })).unwrap();
    assert_eq!(p.content, ElementContent::Image { url: "https://img.test/a.png".into(), alt: None });
    assert_eq!(p.aspect_ratio, Some(2.0));
}

#[test]
fn decodes_link() {
    let p = rich(&json!({ "type": "link", "data": { "url": "https://patterns.test/1", "title": "Granny square" } })).unwrap();
    assert_eq!(
        p.content,
        ElementContent::Link { url: "https://patterns.test/1".into(), title: Some("Granny square".into()) }
    );
    assert_eq!(p.aspect_ratio, None);
}

#[test]
fn decodes_yarn_reference() {
    let p = rich(&json!({ "type": "yarn", "data": { "yarn_id": "y-9", "name": "Cotton 8/4", "color": "sage" } })).unwrap();
    assert_eq!(
        p.content,
        ElementContent::Yarn(YarnRef {
            yarn_id: Some("y-9".into()),
            name: "Cotton 8/4".into(),
            color: Some("sage".into()),
            ..YarnRef::default()
        })
    );
}

#[test]
fn decodes_swatch_reference() {
    let p = rich(&json!({ "type": "swatch", "data": { "name": "Moss stitch", "hook_size": "4mm" } })).unwrap();
    assert_eq!(
        p.content,
        ElementContent::Swatch(SwatchRef { name: "Moss stitch".into(), hook_size: Some("4mm".into()), ..SwatchRef::default() })
    );
}

#[test]
fn decodes_text_with_missing_content() {
    let p = rich(&json!({ "type": "text", "data": {} })).unwrap();
    assert_eq!(p.content, ElementContent::empty_text());
}

#[test]
fn ignores_unparseable_json() {
    assert!(decode("{not json", ElementTier::Rich).is_none());
    assert!(decode("", ElementTier::Rich).is_none());
}

#[test]
fn ignores_unknown_type() {
    assert!(rich(&json!({ "type": "pattern", "data": { "name": "x" } })).is_none());
}

#[test]
fn ignores_missing_or_non_object_data() {
    assert!(rich(&json!({ "type": "image" })).is_none());
    assert!(rich(&json!({ "type": "image", "data": "https://img.test/a.png" })).is_none());
}

#[test]
fn ignores_wrong_shape() {
    // Image without a url.
    assert!(rich(&json!({ "type": "image", "data": { "alt": "no url" } })).is_none());
    // Yarn without a name.
    assert!(rich(&json!({ "type": "yarn", "data": { "color": "red" } })).is_none());
}

#[test]
fn drawing_tier_accepts_text_only() {
    let text = json!({ "type": "text", "data": { "content": "row 4: dc" } }).to_string();
    let image = json!({ "type": "image", "data": { "url": "u" } }).to_string();
    assert!(decode(&text, ElementTier::Drawing).is_some());
    assert!(decode(&image, ElementTier::Drawing).is_none());
}

#[test]
fn zero_dimension_has_no_aspect() {
    let p = rich(&json!({ "type": "image", "data": { "url": "u", "width": 0, "height": 100 } })).unwrap();
    assert_eq!(p.aspect_ratio, None);
}
