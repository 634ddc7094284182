use super::*;

#[test]
fn canvas_size_rejects_degenerate_dimensions() {
    assert!(CanvasSize::new(800.0, 800.0).is_ok());
    assert!(CanvasSize::new(0.0, 800.0).is_err());
    assert!(CanvasSize::new(800.0, -1.0).is_err());
    assert!(CanvasSize::new(f64::NAN, 800.0).is_err());
    assert!(CanvasSize::new(f64::INFINITY, 800.0).is_err());
}

#[test]
fn clamp_origin_keeps_square_inside() {
    let canvas = CanvasSize::new(100.0, 100.0).unwrap();
    assert_eq!(
        canvas.clamp_origin(Point::new(-20.0, -20.0), 30.0),
        Point::new(0.0, 0.0)
    );
    assert_eq!(
        canvas.clamp_origin(Point::new(95.0, 95.0), 30.0),
        Point::new(70.0, 70.0)
    );
    assert_eq!(
        canvas.clamp_origin(Point::new(10.0, 10.0), 30.0),
        Point::new(10.0, 10.0)
    );
}

#[test]
fn clamp_origin_with_oversized_square_pins_to_origin() {
    let canvas = CanvasSize::new(100.0, 100.0).unwrap();
    assert_eq!(
        canvas.clamp_origin(Point::new(40.0, 40.0), 200.0),
        Point::new(0.0, 0.0)
    );
}

#[test]
fn max_side_at_is_limited_by_both_axes() {
    let canvas = CanvasSize::new(200.0, 100.0).unwrap();
    assert_eq!(canvas.max_side_at(Point::new(0.0, 0.0)), 100.0);
    assert_eq!(canvas.max_side_at(Point::new(150.0, 0.0)), 50.0);
    assert_eq!(canvas.max_side_at(Point::new(300.0, 0.0)), 0.0);
}
