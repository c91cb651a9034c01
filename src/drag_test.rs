#![allow(clippy::clone_on_copy, clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-10;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn id() -> ShapeId {
    uuid::Uuid::new_v4()
}

/// Positions whose bounding box is exactly 0..10 on both axes.
fn unit_box_positions() -> Vec<Point> {
    vec![pt(0.0, 0.0), pt(10.0, 10.0)]
}

// =============================================================
// Lifecycle
// =============================================================

#[test]
fn new_session_is_inactive() {
    let drag = Drag::new();
    assert!(!drag.is_active());
    assert!(drag.handle().is_none());
    assert!(drag.target_id().is_none());
}

#[test]
fn begin_arms_the_session() {
    let mut drag = Drag::new();
    let target = id();
    drag.begin(Handle::RightBottom, target);
    assert!(drag.is_active());
    assert_eq!(drag.handle(), Some(Handle::RightBottom));
    assert_eq!(drag.target_id(), Some(target));
}

#[test]
fn clear_discards_all_state() {
    let mut drag = Drag::new();
    let target = id();
    drag.begin(Handle::Inner, target);
    drag.move_delta(pt(5.0, 5.0));
    drag.clear();
    assert!(!drag.is_active());
    assert!(drag.target_id().is_none());
    // A fresh move after clear starts from scratch: zero delta.
    assert_eq!(drag.move_delta(pt(100.0, 100.0)), (0.0, 0.0));
}

#[test]
fn begin_resets_previous_gesture_state() {
    let mut drag = Drag::new();
    drag.begin(Handle::Inner, id());
    drag.move_delta(pt(0.0, 0.0));
    drag.move_delta(pt(50.0, 50.0));
    drag.begin(Handle::Inner, id());
    assert_eq!(drag.move_delta(pt(7.0, 7.0)), (0.0, 0.0));
}

// =============================================================
// Move
// =============================================================

#[test]
fn move_first_frame_is_zero_delta() {
    let mut drag = Drag::new();
    drag.begin(Handle::Inner, id());
    assert_eq!(drag.move_delta(pt(3.0, 4.0)), (0.0, 0.0));
}

#[test]
fn move_reports_frame_to_frame_delta() {
    let mut drag = Drag::new();
    drag.begin(Handle::Inner, id());
    drag.move_delta(pt(0.0, 0.0));
    assert_eq!(drag.move_delta(pt(3.0, -2.0)), (3.0, -2.0));
    assert_eq!(drag.move_delta(pt(4.0, -2.0)), (1.0, 0.0));
}

#[test]
fn move_is_a_pure_translation_of_positions() {
    let mut drag = Drag::new();
    drag.begin(Handle::Inner, id());
    let positions = vec![pt(0.0, 0.0), pt(5.0, 7.0), pt(-3.0, 2.0)];
    drag.move_delta(pt(10.0, 10.0));
    let (dx, dy) = drag.move_delta(pt(16.0, 12.0));
    let moved: Vec<Point> = positions.iter().map(|p| pt(p.x + dx, p.y + dy)).collect();
    for (before, after) in positions.iter().zip(&moved) {
        assert_eq!(after.x, before.x + 6.0);
        assert_eq!(after.y, before.y + 2.0);
    }
}

// =============================================================
// Resize: boundary clamp
// =============================================================

#[test]
fn resize_below_min_size_returns_no_update() {
    let mut drag = Drag::new();
    let target = id();
    drag.begin(Handle::RightBottom, target);
    let positions = unit_box_positions();

    // First frame establishes the origin snapshot at pointer (10, 10).
    let first = drag.resize(target, pt(10.0, 10.0), &positions);
    assert_eq!(first, Some(positions.clone()));

    // (3, 3) is 3 from the (0, 0) anchor on both axes, under MIN_RESIZE_SIZE.
    assert_eq!(drag.resize(target, pt(3.0, 3.0), &positions), None);
}

#[test]
fn resize_clamp_checks_only_the_controlled_axis() {
    let mut drag = Drag::new();
    let target = id();
    drag.begin(Handle::RightMid, target);
    let positions = unit_box_positions();
    drag.resize(target, pt(10.0, 5.0), &positions);

    // RightMid only controls x; a tiny y is irrelevant.
    assert!(drag.resize(target, pt(8.0, 0.1), &positions).is_some());
    assert_eq!(drag.resize(target, pt(4.9, 5.0), &positions), None);
}

#[test]
fn resize_clamp_for_left_top_measures_from_opposite_corner() {
    let mut drag = Drag::new();
    let target = id();
    drag.begin(Handle::LeftTop, target);
    let positions = unit_box_positions();
    drag.resize(target, pt(0.0, 0.0), &positions);

    // Anchor is (right, bottom) = (10, 10); pointer at (6, 6) leaves 4 < 5.
    assert_eq!(drag.resize(target, pt(6.0, 6.0), &positions), None);
    assert!(drag.resize(target, pt(4.0, 4.0), &positions).is_some());
}

// =============================================================
// Resize: scaling
// =============================================================

#[test]
fn resize_scales_dragged_corner_one_to_one() {
    let mut drag = Drag::new();
    let target = id();
    drag.begin(Handle::RightBottom, target);
    let positions = unit_box_positions();

    drag.resize(target, pt(10.0, 10.0), &positions);
    let resized = drag.resize(target, pt(20.0, 20.0), &positions).unwrap();

    // The dragged corner maps 1:1 with the pointer; the anchor stays put.
    assert_eq!(resized[1], pt(20.0, 20.0));
    assert_eq!(resized[0], pt(0.0, 0.0));
}

#[test]
fn resize_interior_points_move_proportionally() {
    let mut drag = Drag::new();
    let target = id();
    drag.begin(Handle::RightBottom, target);
    // Box 10..20 so the anchor line is away from zero.
    let positions = vec![pt(10.0, 10.0), pt(15.0, 15.0), pt(20.0, 20.0)];

    drag.resize(target, pt(20.0, 20.0), &positions);
    let resized = drag.resize(target, pt(26.0, 26.0), &positions).unwrap();

    assert_eq!(resized[0], pt(10.0, 10.0)); // anchor corner
    assert_eq!(resized[2], pt(26.0, 26.0)); // dragged corner
    // Midpoint scale is (15-10)/15 = 1/3 of the pointer delta of 6.
    assert!(approx_eq(resized[1].x, 17.0));
    assert!(approx_eq(resized[1].y, 17.0));
}

#[test]
fn resize_edge_mid_moves_single_axis() {
    let mut drag = Drag::new();
    let target = id();
    drag.begin(Handle::BottomMid, target);
    let positions = unit_box_positions();

    drag.resize(target, pt(5.0, 10.0), &positions);
    let resized = drag.resize(target, pt(5.0, 18.0), &positions).unwrap();

    // x never changes under a vertical edge-mid handle.
    assert_eq!(resized[0], pt(0.0, 0.0));
    assert_eq!(resized[1].x, 10.0);
    assert_eq!(resized[1].y, 18.0);
}

#[test]
fn resize_is_anchored_to_origin_not_cumulative() {
    let mut drag = Drag::new();
    let target = id();
    drag.begin(Handle::RightBottom, target);
    let positions = unit_box_positions();

    drag.resize(target, pt(10.0, 10.0), &positions);
    let a = drag.resize(target, pt(20.0, 20.0), &positions);
    // Feeding a mutated point list does not shift the anchor: the origin
    // snapshot drives the result.
    let grown: Vec<Point> = vec![pt(0.0, 0.0), pt(20.0, 20.0)];
    let b = drag.resize(target, pt(20.0, 20.0), &grown);
    assert_eq!(a, b);
}

#[test]
fn resize_reverting_pointer_restores_origin_positions() {
    let mut drag = Drag::new();
    let target = id();
    drag.begin(Handle::RightBottom, target);
    let positions = unit_box_positions();

    drag.resize(target, pt(10.0, 10.0), &positions);
    drag.resize(target, pt(25.0, 25.0), &positions);
    let back = drag.resize(target, pt(10.0, 10.0), &positions).unwrap();
    assert_eq!(back, positions);
}

#[test]
fn resize_degenerate_shape_is_noop() {
    let mut drag = Drag::new();
    let target = id();
    drag.begin(Handle::RightBottom, target);
    assert_eq!(drag.resize(target, pt(10.0, 10.0), &[pt(1.0, 1.0)]), None);
    assert_eq!(drag.resize(target, pt(10.0, 10.0), &[]), None);
}

// =============================================================
// Rotate
// =============================================================

#[test]
fn rotate_quarter_turn_delta() {
    let mut drag = Drag::new();
    let target = id();
    drag.begin(Handle::Rotate, target);
    let positions = unit_box_positions(); // centroid (5, 5)

    // Gesture starts with the pointer due east of the centroid.
    drag.rotate(target, pt(10.0, 5.0), &positions, Transform::identity());
    let t = drag
        .rotate(target, pt(5.0, 10.0), &positions, Transform::identity())
        .unwrap();

    assert!(approx_eq(t.angle(), std::f64::consts::FRAC_PI_2));
    // The matrix anchors at the centroid.
    assert_eq!(t.e, 5.0);
    assert_eq!(t.f, 5.0);
}

#[test]
fn rotate_maps_centroid_relative_points() {
    let mut drag = Drag::new();
    let target = id();
    drag.begin(Handle::Rotate, target);
    let positions = unit_box_positions();

    drag.rotate(target, pt(10.0, 5.0), &positions, Transform::identity());
    let t = drag
        .rotate(target, pt(5.0, 10.0), &positions, Transform::identity())
        .unwrap();

    // A point at (10, 5), expressed relative to the (5, 5) anchor, lands at
    // (5, 10) after a quarter turn.
    let mapped = t.apply(pt(5.0, 0.0));
    assert!(approx_eq(mapped.x, 5.0));
    assert!(approx_eq(mapped.y, 10.0));
}

#[test]
fn rotate_composes_with_pre_gesture_rotation() {
    let mut drag = Drag::new();
    let target = id();
    drag.begin(Handle::Rotate, target);
    let positions = unit_box_positions();
    let prior = Transform::rotate_about(pt(5.0, 5.0), 0.5);

    drag.rotate(target, pt(10.0, 5.0), &positions, prior);
    let t = drag
        .rotate(target, pt(5.0, 10.0), &positions, prior)
        .unwrap();

    assert!(approx_eq(t.angle(), 0.5 + std::f64::consts::FRAC_PI_2));
}

#[test]
fn rotate_is_anchored_to_gesture_start_not_cumulative() {
    let mut drag = Drag::new();
    let target = id();
    drag.begin(Handle::Rotate, target);
    let positions = unit_box_positions();

    drag.rotate(target, pt(10.0, 5.0), &positions, Transform::identity());
    let a = drag.rotate(target, pt(5.0, 10.0), &positions, Transform::identity());
    // Same pointer again: same matrix, no accumulation.
    let b = drag.rotate(target, pt(5.0, 10.0), &positions, Transform::identity());
    assert_eq!(a, b);
}

#[test]
fn rotate_degenerate_shape_is_noop() {
    let mut drag = Drag::new();
    let target = id();
    drag.begin(Handle::Rotate, target);
    assert!(drag
        .rotate(target, pt(10.0, 5.0), &[pt(1.0, 1.0)], Transform::identity())
        .is_none());
}

// =============================================================
// Per-shape origins
// =============================================================

#[test]
fn each_shape_gets_its_own_origin_snapshot() {
    let mut drag = Drag::new();
    let (a, b) = (id(), id());
    drag.begin(Handle::Rotate, a);

    let box_a = unit_box_positions(); // centroid (5, 5)
    let box_b = vec![pt(100.0, 100.0), pt(110.0, 110.0)]; // centroid (105, 105)

    drag.rotate(a, pt(10.0, 5.0), &box_a, Transform::identity());
    drag.rotate(b, pt(10.0, 5.0), &box_b, Transform::identity());

    let ta = drag
        .rotate(a, pt(5.0, 10.0), &box_a, Transform::identity())
        .unwrap();
    let tb = drag
        .rotate(b, pt(5.0, 10.0), &box_b, Transform::identity())
        .unwrap();

    // Each shape rotates about its own centroid.
    assert_eq!((ta.e, ta.f), (5.0, 5.0));
    assert_eq!((tb.e, tb.f), (105.0, 105.0));
    assert!(approx_eq(ta.angle(), std::f64::consts::FRAC_PI_2));
    assert!(!approx_eq(tb.angle(), ta.angle()));
}

#[test]
fn resize_far_from_a_shapes_own_box_is_rejected() {
    // With multiple shapes in one gesture, the clamp measures the pointer
    // against each shape's own origin box; a distant box sees every frame as
    // below the minimum span and keeps its geometry.
    let mut drag = Drag::new();
    let (a, b) = (id(), id());
    drag.begin(Handle::RightBottom, a);

    let box_b = vec![pt(100.0, 100.0), pt(110.0, 110.0)];
    drag.resize(a, pt(10.0, 10.0), &unit_box_positions());
    assert_eq!(drag.resize(b, pt(10.0, 10.0), &box_b), None);
}
