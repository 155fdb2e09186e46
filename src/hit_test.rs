#![allow(clippy::float_cmp)]

use uuid::Uuid;

use super::*;
use crate::doc::{Element, ElementContent};

fn element(x: f64, y: f64, w: f64, h: f64, z: i64) -> Element {
    Element {
        id: Uuid::new_v4(),
        board_id: Uuid::nil(),
        x,
        y,
        width: w,
        height: h,
        rotation: 0.0,
        z_index: z,
        aspect_ratio: None,
        content: ElementContent::empty_text(),
        is_editing: false,
    }
}

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

// =============================================================
// ResizeAnchor
// =============================================================

#[test]
fn anchor_sides_are_consistent_with_fractions() {
    for a in ResizeAnchor::ALL {
        let (fx, fy) = a.fraction();
        assert_eq!(a.is_east(), fx == 1.0, "{a:?}");
        assert_eq!(a.is_west(), fx == 0.0, "{a:?}");
        assert_eq!(a.is_south(), fy == 1.0, "{a:?}");
        assert_eq!(a.is_north(), fy == 0.0, "{a:?}");
    }
}

#[test]
fn anchor_cursors() {
    assert_eq!(ResizeAnchor::N.cursor(), "ns-resize");
    assert_eq!(ResizeAnchor::W.cursor(), "ew-resize");
    assert_eq!(ResizeAnchor::Se.cursor(), "nwse-resize");
    assert_eq!(ResizeAnchor::Ne.cursor(), "nesw-resize");
}

// =============================================================
// hit_test
// =============================================================

#[test]
fn empty_store_hits_nothing() {
    let store = ElementStore::new();
    assert!(hit_test(pt(10.0, 10.0), &store, &Camera::default(), None).is_none());
}

#[test]
fn body_hit_inside_element() {
    let mut store = ElementStore::new();
    let el = element(100.0, 100.0, 50.0, 50.0, 0);
    let id = el.id;
    store.add(el);
    let hit = hit_test(pt(120.0, 120.0), &store, &Camera::default(), None).unwrap();
    assert_eq!(hit, Hit { element_id: id, part: HitPart::Body });
    assert!(hit_test(pt(10.0, 10.0), &store, &Camera::default(), None).is_none());
}

#[test]
fn topmost_element_wins() {
    let mut store = ElementStore::new();
    let low = element(0.0, 0.0, 100.0, 100.0, 1);
    let high = element(50.0, 50.0, 100.0, 100.0, 2);
    let high_id = high.id;
    store.add(low);
    store.add(high);
    let hit = hit_test(pt(75.0, 75.0), &store, &Camera::default(), None).unwrap();
    assert_eq!(hit.element_id, high_id);
}

#[test]
fn hit_respects_camera() {
    let mut store = ElementStore::new();
    let el = element(0.0, 0.0, 10.0, 10.0, 0);
    let id = el.id;
    store.add(el);
    let cam = Camera { pan_x: 100.0, pan_y: 100.0, zoom: 2.0 };
    // Canvas (5, 5) -> screen (110, 110).
    assert_eq!(hit_test(pt(110.0, 110.0), &store, &cam, None).unwrap().element_id, id);
    assert!(hit_test(pt(5.0, 5.0), &store, &cam, None).is_none());
}

#[test]
fn selected_handle_beats_body() {
    let mut store = ElementStore::new();
    let el = element(100.0, 100.0, 200.0, 100.0, 0);
    let id = el.id;
    store.add(el);
    let hit = hit_test(pt(302.0, 199.0), &store, &Camera::default(), Some(id)).unwrap();
    assert_eq!(hit.part, HitPart::ResizeHandle(ResizeAnchor::Se));
    // Without selection the same point misses (outside the body).
    assert!(hit_test(pt(302.0, 199.0), &store, &Camera::default(), None).is_none());
}

#[test]
fn handles_are_screen_sized_at_any_zoom() {
    let mut store = ElementStore::new();
    let el = element(0.0, 0.0, 100.0, 100.0, 0);
    let id = el.id;
    store.add(el);
    let cam = Camera { pan_x: 0.0, pan_y: 0.0, zoom: 0.25 };
    // NE corner at screen (25, 0); 6px away still hits.
    let hit = hit_test(pt(31.0, -6.0), &store, &cam, Some(id)).unwrap();
    assert_eq!(hit.part, HitPart::ResizeHandle(ResizeAnchor::Ne));
}

#[test]
fn rotated_element_body_hit() {
    let mut store = ElementStore::new();
    let mut el = element(0.0, 0.0, 100.0, 20.0, 0);
    el.rotation = 90.0;
    let id = el.id;
    store.add(el);
    assert_eq!(hit_test(pt(50.0, -30.0), &store, &Camera::default(), None).unwrap().element_id, id);
    assert!(hit_test(pt(95.0, 10.0), &store, &Camera::default(), None).is_none());
}
