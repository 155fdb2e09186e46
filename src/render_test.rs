#![allow(clippy::float_cmp)]

use uuid::Uuid;

use super::*;
use crate::doc::{SwatchRef, YarnRef};

fn element(x: f64, y: f64, z_index: i64, content: ElementContent) -> Element {
    Element {
        id: Uuid::new_v4(),
        board_id: Uuid::nil(),
        x,
        y,
        width: 200.0,
        height: 100.0,
        rotation: 0.0,
        z_index,
        aspect_ratio: None,
        content,
        is_editing: false,
    }
}

fn text(x: f64, y: f64, z_index: i64, body: &str) -> Element {
    element(x, y, z_index, ElementContent::Text { content: body.into() })
}

fn store_of(elements: Vec<Element>) -> ElementStore {
    let mut store = ElementStore::new();
    store.load_snapshot(elements);
    store
}

// =============================================================
// layout
// =============================================================

#[test]
fn layout_places_items_in_screen_space() {
    let el = text(10.0, 20.0, 0, "a");
    let store = store_of(vec![el.clone()]);
    let camera = Camera { pan_x: 100.0, pan_y: 50.0, zoom: 2.0 };
    let views = layout(&store, &SyncLedger::new(), &camera, &UiState::default(), 16.0);

    assert_eq!(views.len(), 1);
    let v = &views[0];
    assert_eq!(v.id, el.id);
    assert_eq!((v.left, v.top), (120.0, 90.0));
    assert_eq!((v.width, v.height), (400.0, 200.0));
    assert_eq!(v.body, ItemBody::Text { lines: vec!["a".into()], font_px: 32.0 });
}

#[test]
fn layout_is_bottom_to_top() {
    let top = text(0.0, 0.0, 9, "top");
    let bottom = text(0.0, 0.0, -3, "bottom");
    let middle = text(0.0, 0.0, 2, "middle");
    let store = store_of(vec![top.clone(), bottom.clone(), middle.clone()]);
    let views = layout(&store, &SyncLedger::new(), &Camera::default(), &UiState::default(), 16.0);
    let order: Vec<ElementId> = views.iter().map(|v| v.id).collect();
    assert_eq!(order, vec![bottom.id, middle.id, top.id]);
}

#[test]
fn layout_flags_selection_editing_and_sync() {
    let mut editing = text(0.0, 0.0, 0, "e");
    editing.is_editing = true;
    let other = text(300.0, 0.0, 1, "o");
    let store = store_of(vec![editing.clone(), other.clone()]);

    let mut ledger = SyncLedger::new();
    ledger.reset_confirmed([other.id]);
    ledger.track_local(editing.id);
    let ui = UiState { selected_id: Some(other.id), ..UiState::default() };

    let views = layout(&store, &ledger, &Camera::default(), &ui, 16.0);
    let find = |id: ElementId| views.iter().find(|v| v.id == id).unwrap();
    assert!(find(editing.id).editing);
    assert!(!find(editing.id).selected);
    assert_eq!(find(editing.id).sync, Some(SyncStatus::Local));
    assert!(find(other.id).selected);
    assert_eq!(find(other.id).sync, Some(SyncStatus::Confirmed));
}

#[test]
fn text_body_splits_lines() {
    let el = text(0.0, 0.0, 0, "one\ntwo\n");
    assert_eq!(body_for(&el, 16.0), ItemBody::Text { lines: vec!["one".into(), "two".into(), String::new()], font_px: 16.0 });
}

#[test]
fn link_body_falls_back_to_url() {
    let untitled = element(0.0, 0.0, 0, ElementContent::Link { url: "https://patterns.example.org/a/b?x=1".into(), title: None });
    assert_eq!(
        body_for(&untitled, 16.0),
        ItemBody::Link {
            title: "https://patterns.example.org/a/b?x=1".into(),
            host: "patterns.example.org".into(),
            url: "https://patterns.example.org/a/b?x=1".into(),
        }
    );

    let blank = element(0.0, 0.0, 0, ElementContent::Link { url: "x.org".into(), title: Some("   ".into()) });
    assert!(matches!(body_for(&blank, 16.0), ItemBody::Link { title, host, .. } if title == "x.org" && host == "x.org"));
}

#[test]
fn link_host_strips_scheme_and_path() {
    assert_eq!(link_host("https://a.com/path"), "a.com");
    assert_eq!(link_host("http://a.com#frag"), "a.com");
    assert_eq!(link_host("a.com?q"), "a.com");
    assert_eq!(link_host(""), "");
}

#[test]
fn yarn_body_lists_known_details() {
    let yarn = YarnRef {
        name: "Merino".into(),
        brand: Some("Acme".into()),
        color: Some("Teal".into()),
        weight: Some("DK".into()),
        ..YarnRef::default()
    };
    let el = element(0.0, 0.0, 0, ElementContent::Yarn(yarn));
    assert_eq!(body_for(&el, 16.0), ItemBody::Yarn { lines: vec!["Merino".into(), "Acme".into(), "Teal · DK".into()] });

    let bare = element(0.0, 0.0, 0, ElementContent::Yarn(YarnRef { name: "Cotton".into(), ..YarnRef::default() }));
    assert_eq!(body_for(&bare, 16.0), ItemBody::Yarn { lines: vec!["Cotton".into()] });
}

#[test]
fn swatch_body_collects_details() {
    let swatch = SwatchRef {
        name: "Moss".into(),
        stitch: Some("moss stitch".into()),
        hook_size: None,
        image_url: Some("m.png".into()),
        ..SwatchRef::default()
    };
    let el = element(0.0, 0.0, 0, ElementContent::Swatch(swatch));
    assert_eq!(
        body_for(&el, 16.0),
        ItemBody::Swatch { label: "Moss".into(), details: vec!["moss stitch".into()], image_url: Some("m.png".into()) }
    );
}

// =============================================================
// handles
// =============================================================

#[test]
fn no_handles_without_selection() {
    let store = store_of(vec![text(0.0, 0.0, 0, "a")]);
    assert!(handles(&store, &Camera::default(), &UiState::default()).is_none());
}

#[test]
fn handles_follow_selected_element() {
    let el = text(10.0, 10.0, 0, "a");
    let store = store_of(vec![el.clone()]);
    let ui = UiState { selected_id: Some(el.id), ..UiState::default() };
    let hs = handles(&store, &Camera::default(), &ui).unwrap();
    let se = hs.iter().find(|(a, _)| *a == ResizeAnchor::Se).unwrap().1;
    assert_eq!((se.x, se.y), (210.0, 110.0));
}

#[test]
fn no_handles_while_editing() {
    let mut el = text(0.0, 0.0, 0, "a");
    el.is_editing = true;
    let store = store_of(vec![el.clone()]);
    let ui = UiState { selected_id: Some(el.id), ..UiState::default() };
    assert!(handles(&store, &Camera::default(), &ui).is_none());
}

#[test]
fn stale_selection_has_no_handles() {
    let store = store_of(Vec::new());
    let ui = UiState { selected_id: Some(Uuid::new_v4()), ..UiState::default() };
    assert!(handles(&store, &Camera::default(), &ui).is_none());
}
