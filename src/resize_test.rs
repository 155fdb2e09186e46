#![allow(clippy::float_cmp)]

use uuid::Uuid;

use super::*;
use crate::doc::ElementContent;

const EPS: f64 = 1e-9;

fn element(x: f64, y: f64, w: f64, h: f64) -> Element {
    Element {
        id: Uuid::new_v4(),
        board_id: Uuid::nil(),
        x,
        y,
        width: w,
        height: h,
        rotation: 0.0,
        z_index: 0,
        aspect_ratio: None,
        content: ElementContent::empty_text(),
        is_editing: false,
    }
}

fn drag(el: &Element, anchor: ResizeAnchor, dx: f64, dy: f64, zoom: f64) -> ResizeResult {
    let start = Point::new(500.0, 500.0);
    let camera = Camera { pan_x: 0.0, pan_y: 0.0, zoom };
    ResizeGesture::begin(el, anchor, start, &camera).apply(Point::new(start.x + dx, start.y + dy), &camera)
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < EPS
}

// =============================================================
// Handle geometry
// =============================================================

#[test]
fn handles_sit_on_corners_and_midpoints() {
    let el = element(100.0, 100.0, 200.0, 100.0);
    let cam = Camera::default();
    let handles = handle_screen_positions(&el, &cam);
    let find = |a: ResizeAnchor| handles.iter().find(|(x, _)| *x == a).unwrap().1;
    assert_eq!(find(ResizeAnchor::Nw), Point::new(100.0, 100.0));
    assert_eq!(find(ResizeAnchor::Se), Point::new(300.0, 200.0));
    assert_eq!(find(ResizeAnchor::E), Point::new(300.0, 150.0));
    assert_eq!(find(ResizeAnchor::N), Point::new(200.0, 100.0));
}

#[test]
fn handles_follow_camera() {
    let el = element(0.0, 0.0, 100.0, 50.0);
    let cam = Camera { pan_x: 10.0, pan_y: 20.0, zoom: 2.0 };
    let handles = handle_screen_positions(&el, &cam);
    let se = handles.iter().find(|(a, _)| *a == ResizeAnchor::Se).unwrap().1;
    assert_eq!(se, Point::new(210.0, 120.0));
}

// =============================================================
// Resize computation
// =============================================================

#[test]
fn bottom_right_grows_both_dimensions() {
    let el = element(100.0, 100.0, 200.0, 100.0);
    let r = drag(&el, ResizeAnchor::Se, 40.0, 20.0, 1.0);
    assert!(approx(r.width, 240.0));
    assert!(approx(r.height, 120.0));
    assert!(approx(r.x, 100.0));
    assert!(approx(r.y, 100.0));
}

#[test]
fn edge_handles_touch_one_dimension() {
    let el = element(0.0, 0.0, 200.0, 100.0);
    let r = drag(&el, ResizeAnchor::E, 30.0, 999.0, 1.0);
    assert!(approx(r.width, 230.0));
    assert!(approx(r.height, 100.0));
    let r = drag(&el, ResizeAnchor::S, 999.0, 30.0, 1.0);
    assert!(approx(r.width, 200.0));
    assert!(approx(r.height, 130.0));
}

#[test]
fn west_handle_keeps_right_edge_fixed() {
    let el = element(100.0, 50.0, 200.0, 100.0);
    let r = drag(&el, ResizeAnchor::W, -50.0, 0.0, 1.0);
    assert!(approx(r.width, 250.0));
    assert!(approx(r.x, 50.0));
    assert!(approx(r.x + r.width, 300.0));
}

#[test]
fn north_west_keeps_bottom_right_fixed() {
    let el = element(100.0, 100.0, 200.0, 100.0);
    let r = drag(&el, ResizeAnchor::Nw, 20.0, 10.0, 1.0);
    assert!(approx(r.width, 180.0));
    assert!(approx(r.height, 90.0));
    assert!(approx(r.x + r.width, 300.0));
    assert!(approx(r.y + r.height, 200.0));
}

#[test]
fn delta_is_scaled_by_zoom() {
    let el = element(0.0, 0.0, 200.0, 100.0);
    let r = drag(&el, ResizeAnchor::Se, 40.0, 20.0, 2.0);
    assert!(approx(r.width, 220.0));
    assert!(approx(r.height, 110.0));
}

#[test]
fn minimums_hold_for_extreme_drags() {
    let el = element(0.0, 0.0, 200.0, 100.0);
    for anchor in ResizeAnchor::ALL {
        for (dx, dy) in [(-1e6, -1e6), (1e6, 1e6), (-1e6, 1e6), (1e6, -1e6)] {
            let r = drag(&el, anchor, dx, dy, 1.0);
            assert!(r.width >= 50.0, "{anchor:?} width {}", r.width);
            assert!(r.height >= 30.0, "{anchor:?} height {}", r.height);
        }
    }
}

#[test]
fn minimum_clamp_keeps_opposite_edge() {
    let el = element(100.0, 100.0, 200.0, 100.0);
    let r = drag(&el, ResizeAnchor::W, 1000.0, 0.0, 1.0);
    assert!(approx(r.width, 50.0));
    assert!(approx(r.x + r.width, 300.0));
}

#[test]
fn aspect_lock_derives_height_from_width() {
    let mut el = element(0.0, 0.0, 200.0, 100.0);
    el.aspect_ratio = Some(2.0);
    let r = drag(&el, ResizeAnchor::Se, 100.0, 0.0, 1.0);
    assert!(approx(r.width, 300.0));
    assert!(approx(r.height, 150.0));
}

#[test]
fn aspect_lock_on_vertical_edge_derives_width() {
    let mut el = element(0.0, 0.0, 200.0, 100.0);
    el.aspect_ratio = Some(2.0);
    let r = drag(&el, ResizeAnchor::S, 0.0, 50.0, 1.0);
    assert!(approx(r.height, 150.0));
    assert!(approx(r.width, 300.0));
    // Horizontal center stays put.
    assert!(approx(r.x + r.width * 0.5, 100.0));
}

#[test]
fn rotated_element_projects_delta_into_local_frame() {
    let mut el = element(0.0, 0.0, 200.0, 100.0);
    el.rotation = 90.0;
    // Local +x points down the screen after a quarter turn.
    let r = drag(&el, ResizeAnchor::E, 0.0, 40.0, 1.0);
    assert!(approx(r.width, 240.0));
    assert!(approx(r.height, 100.0));
}

#[test]
fn rotated_resize_keeps_opposite_edge_in_place() {
    let mut el = element(0.0, 0.0, 200.0, 100.0);
    el.rotation = 90.0;
    let before = el.clone();
    let r = drag(&el, ResizeAnchor::E, 0.0, 40.0, 1.0);
    let mut after = el;
    after.x = r.x;
    after.y = r.y;
    after.width = r.width;
    after.height = r.height;
    // West-edge midpoint is the fixed point.
    let fixed_before = Point::new(before.x, before.y + before.height * 0.5).rotate_around(before.center(), 90.0);
    let fixed_after = Point::new(after.x, after.y + after.height * 0.5).rotate_around(after.center(), 90.0);
    assert!(approx(fixed_before.x, fixed_after.x));
    assert!(approx(fixed_before.y, fixed_after.y));
}

#[test]
fn result_to_patch() {
    let p = ResizeResult { x: 1.0, y: 2.0, width: 3.0, height: 4.0 }.to_patch();
    assert_eq!(p, ElementPatch::geometry(1.0, 2.0, 3.0, 4.0));
}
