mod test_utils;

use polyclip::{area, bounds, inflate_paths, PolygonOffset, DEFAULT_MITER_LIMIT};
use test_utils::{rect, total_area};

#[test]
fn inflate_square_miters_the_corners() {
    let solution = inflate_paths(&[rect(0, 0, 100, 100)], 10.0, DEFAULT_MITER_LIMIT).unwrap();

    // right angle corners stay single mitered vertices, so the result is the exact square
    // grown by the delta on every side
    assert_eq!(solution.len(), 1);
    assert_eq!(solution[0].len(), 4);
    assert_eq!(total_area(&solution), 14400.0);
    let r = bounds(&solution);
    assert_eq!((r.left, r.top, r.right, r.bottom), (-10, -10, 110, 110));
}

#[test]
fn deflate_square() {
    let solution = inflate_paths(&[rect(0, 0, 100, 100)], -10.0, DEFAULT_MITER_LIMIT).unwrap();

    assert_eq!(solution.len(), 1);
    assert_eq!(total_area(&solution), 6400.0);
    let r = bounds(&solution);
    assert_eq!((r.left, r.top, r.right, r.bottom), (10, 10, 90, 90));
}

#[test]
fn deflate_beyond_collapse_gives_nothing() {
    let solution = inflate_paths(&[rect(0, 0, 10, 10)], -6.0, DEFAULT_MITER_LIMIT).unwrap();
    assert!(solution.is_empty());
}

#[test]
fn inflate_then_deflate_round_trips() {
    let grown = inflate_paths(&[rect(0, 0, 100, 100)], 10.0, DEFAULT_MITER_LIMIT).unwrap();
    let back = inflate_paths(&grown, -10.0, DEFAULT_MITER_LIMIT).unwrap();

    assert_eq!(back.len(), 1);
    assert_eq!(total_area(&back), 10000.0);
    let r = bounds(&back);
    assert_eq!((r.left, r.top, r.right, r.bottom), (0, 0, 100, 100));
}

#[test]
fn inflate_polygon_with_hole() {
    let outer = rect(0, 0, 100, 100);
    let mut hole = rect(30, 30, 70, 70);
    hole.reverse();
    assert!(area(&hole) < 0.0);

    let solution = inflate_paths(&[outer, hole], 5.0, DEFAULT_MITER_LIMIT).unwrap();

    // outer grows outward while the hole shrinks, both by the delta
    assert_eq!(solution.len(), 2);
    assert_eq!(total_area(&solution), 110.0 * 110.0 - 30.0 * 30.0);
}

#[test]
fn zero_delta_still_merges_the_input_set() {
    let solution = inflate_paths(
        &[rect(0, 0, 10, 10), rect(5, 5, 15, 15)],
        0.0,
        DEFAULT_MITER_LIMIT,
    )
    .unwrap();

    assert_eq!(solution.len(), 1);
    assert_eq!(total_area(&solution), 175.0);
}

#[test]
fn sharp_vertex_respects_miter_limit() {
    // long thin wedge, roughly 11 degrees at the tip
    let wedge = vec![
        polyclip::point64(0, 0),
        polyclip::point64(100, -10),
        polyclip::point64(100, 10),
    ];

    let mitered = inflate_paths(&[wedge.clone()], 10.0, 25.0).unwrap();
    let squared = inflate_paths(&[wedge], 10.0, DEFAULT_MITER_LIMIT).unwrap();

    assert_eq!(mitered.len(), 1);
    assert_eq!(squared.len(), 1);
    // the unrestricted miter extends the tip far past the squared-off version
    let mitered_left = bounds(&mitered).left;
    let squared_left = bounds(&squared).left;
    assert!(
        mitered_left < squared_left - 50,
        "expected a long miter spike, got left bounds {} vs {}",
        mitered_left,
        squared_left
    );
}

#[test]
fn offset_instance_is_reusable_across_deltas() {
    let mut offset = PolygonOffset::new();
    assert!(offset.add_path(&rect(0, 0, 100, 100)));

    let grown = offset.execute(10.0).unwrap();
    let shrunk = offset.execute(-10.0).unwrap();

    assert_eq!(total_area(&grown), 14400.0);
    assert_eq!(total_area(&shrunk), 6400.0);
}
