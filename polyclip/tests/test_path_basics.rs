mod test_utils;

use polyclip::{
    area, bounds, orientation, path::scaled_path_from_points, path::points_from_scaled_path,
    path::translate_path, path_64, point64, point_in_polygon, PointInPolygonResult,
};
use test_utils::rect;

#[test]
fn area_sign_tracks_winding() {
    let square = rect(0, 0, 10, 10);
    assert_eq!(area(&square), 100.0);
    assert!(orientation(&square));

    let mut reversed = square.clone();
    reversed.reverse();
    assert_eq!(area(&reversed), -100.0);
    assert!(!orientation(&reversed));
}

#[test]
fn area_invariant_under_rotation_of_point_order() {
    let mut path = path_64![(0, 0), (10, 0), (14, 6), (10, 10), (0, 10)];
    let expected = area(&path);
    for _ in 0..path.len() {
        path.rotate_left(1);
        assert_eq!(area(&path), expected);
    }
}

#[test]
fn degenerate_paths_have_zero_area() {
    assert_eq!(area(&[]), 0.0);
    assert_eq!(area(&[point64(3, 4)]), 0.0);
    assert_eq!(area(&[point64(0, 0), point64(10, 10)]), 0.0);
}

#[test]
fn point_in_polygon_classification() {
    let square = rect(0, 0, 10, 10);

    assert_eq!(
        point_in_polygon(point64(5, 5), &square),
        PointInPolygonResult::Inside
    );
    assert_eq!(
        point_in_polygon(point64(15, 5), &square),
        PointInPolygonResult::Outside
    );
    // vertex and edge midpoint both count as boundary
    assert_eq!(
        point_in_polygon(point64(0, 0), &square),
        PointInPolygonResult::OnBoundary
    );
    assert_eq!(
        point_in_polygon(point64(10, 5), &square),
        PointInPolygonResult::OnBoundary
    );
}

#[test]
fn point_in_concave_polygon() {
    // U shape opening upward (toward smaller y)
    let u_shape = path_64![
        (0, 0),
        (10, 0),
        (10, 30),
        (20, 30),
        (20, 0),
        (30, 0),
        (30, 40),
        (0, 40)
    ];

    assert_eq!(
        point_in_polygon(point64(15, 10), &u_shape),
        PointInPolygonResult::Outside,
        "inside the notch is outside the polygon"
    );
    assert_eq!(
        point_in_polygon(point64(15, 35), &u_shape),
        PointInPolygonResult::Inside
    );
    assert_eq!(
        point_in_polygon(point64(5, 20), &u_shape),
        PointInPolygonResult::Inside
    );
}

#[test]
fn bounds_cover_all_paths() {
    let r = bounds(&[rect(0, 0, 10, 10), rect(-5, 3, 2, 20)]);
    assert_eq!((r.left, r.top, r.right, r.bottom), (-5, 0, 10, 20));
    assert_eq!(r.width(), 15);
    assert_eq!(r.height(), 20);
}

#[test]
fn translate_shifts_every_vertex() {
    let moved = translate_path(&rect(0, 0, 10, 10), point64(100, -20));
    assert_eq!(moved[0], point64(100, -20));
    assert_eq!(area(&moved), 100.0);
}

#[test]
fn float_scaling_round_trips() {
    let points = vec![(1.25_f64, -2.5), (3.75, 4.0), (0.0, 7.125)];
    let path = scaled_path_from_points(&points, 1000.0);
    assert_eq!(path[0], point64(1250, -2500));

    let back = points_from_scaled_path::<f64>(&path, 1000.0);
    assert_eq!(back, points);
}
