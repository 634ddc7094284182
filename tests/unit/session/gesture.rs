use super::*;
use crate::{
    catalog::model::{CatalogItem, CatalogItemId, Category},
    enhance::normalize::NormalizedImage,
    foundation::core::CanvasSize,
    session::placement::{DEFAULT_PLACEMENT_SIDE, DesignSession, MIN_PLACEMENT_SIDE},
};

fn charm() -> CatalogItem {
    CatalogItem {
        id: CatalogItemId("c1".to_string()),
        name: "Charm".to_string(),
        category: Category::Charm,
        price: 10.0,
        image_ref: "/img/a.png".to_string(),
        owner_id: None,
    }
}

fn session_with_one() -> (DesignSession, crate::session::placement::PlacementId) {
    let canvas = CanvasSize::new(800.0, 800.0).unwrap();
    let mut s = DesignSession::new(canvas, "/img/template.png");
    let id = s.place(&charm(), Point::new(400.0, 400.0)).unwrap();
    (s, id)
}

#[test]
fn drag_moves_relative_to_snapshot() {
    let (mut s, id) = session_with_one();
    let start = s.placement(id).unwrap().pos;

    let mut g = GestureTracker::new();
    assert!(g.begin_drag(&mut s, id, Point::new(500.0, 500.0)));
    assert_eq!(s.selected(), Some(id));

    g.update(&mut s, Point::new(530.0, 480.0));
    let p = s.placement(id).unwrap();
    assert_eq!(p.pos, Point::new(start.x + 30.0, start.y - 20.0));

    // Updates are absolute against the snapshot, not accumulated.
    g.update(&mut s, Point::new(510.0, 510.0));
    let p = s.placement(id).unwrap();
    assert_eq!(p.pos, Point::new(start.x + 10.0, start.y + 10.0));

    g.finish();
    assert_eq!(g.state(), Gesture::Idle);
}

#[test]
fn drag_clamps_when_pointer_leaves_canvas() {
    let (mut s, id) = session_with_one();
    let mut g = GestureTracker::new();
    assert!(g.begin_drag(&mut s, id, Point::new(400.0, 400.0)));

    g.update(&mut s, Point::new(-5000.0, 9000.0));
    let p = s.placement(id).unwrap();
    assert!(p.pos.x >= 0.0 && p.pos.x + p.side <= 800.0);
    assert!(p.pos.y >= 0.0 && p.pos.y + p.side <= 800.0);
}

#[test]
fn resize_uses_dominant_axis_from_snapshot() {
    let (mut s, id) = session_with_one();
    let mut g = GestureTracker::new();
    assert!(g.begin_resize(&mut s, id, Point::new(400.0, 400.0)));

    g.update(&mut s, Point::new(420.0, 410.0));
    assert_eq!(s.placement(id).unwrap().side, DEFAULT_PLACEMENT_SIDE + 20.0);

    g.update(&mut s, Point::new(390.0, 350.0));
    assert_eq!(s.placement(id).unwrap().side, DEFAULT_PLACEMENT_SIDE - 50.0);

    g.update(&mut s, Point::new(-2000.0, 0.0));
    assert_eq!(s.placement(id).unwrap().side, MIN_PLACEMENT_SIDE);
}

#[test]
fn second_gesture_refused_while_one_is_active() {
    let (mut s, id) = session_with_one();
    let other = s.place(&charm(), Point::new(200.0, 200.0)).unwrap();

    let mut g = GestureTracker::new();
    assert!(g.begin_drag(&mut s, id, Point::new(400.0, 400.0)));
    assert!(!g.begin_drag(&mut s, other, Point::new(200.0, 200.0)));
    assert!(!g.begin_resize(&mut s, other, Point::new(200.0, 200.0)));

    g.finish();
    assert!(g.begin_resize(&mut s, other, Point::new(200.0, 200.0)));
}

#[test]
fn gestures_refused_on_locked_session_or_unknown_id() {
    let (mut s, id) = session_with_one();
    let mut g = GestureTracker::new();

    assert!(!g.begin_drag(&mut s, crate::session::placement::PlacementId(999), Point::ZERO));

    s.set_enhanced(NormalizedImage::Url("https://cdn.example/e.jpg".to_string()));
    assert!(!g.begin_drag(&mut s, id, Point::new(400.0, 400.0)));
    assert!(!g.begin_resize(&mut s, id, Point::new(400.0, 400.0)));
}
