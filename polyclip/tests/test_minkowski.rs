mod test_utils;

use polyclip::{minkowski_diff, minkowski_sum, path_64};
use test_utils::{rect, sorted_areas, total_area};

#[test]
fn sum_along_closed_path_traces_a_band() {
    // sweeping a 2x2 square around the boundary of a 10x10 square leaves a 2 unit wide band
    let pattern = path_64![(-1, -1), (1, -1), (1, 1), (-1, 1)];
    let path = rect(0, 0, 10, 10);

    let solution = minkowski_sum(&pattern, &path, true).unwrap();

    assert_eq!(solution.len(), 2);
    let areas = sorted_areas(&solution);
    assert_eq!(areas, vec![-64.0, 144.0], "outer 12x12 ring with an 8x8 hole");
    assert_eq!(total_area(&solution), 80.0);
}

#[test]
fn sum_along_open_path_is_a_filled_stroke() {
    let pattern = path_64![(-1, -1), (1, -1), (1, 1), (-1, 1)];
    let path = path_64![(0, 0), (10, 0)];

    let solution = minkowski_sum(&pattern, &path, false).unwrap();

    // a 2x2 square swept along a 10 unit horizontal segment
    assert_eq!(solution.len(), 1);
    assert_eq!(total_area(&solution), 24.0);
}

#[test]
fn sum_with_empty_input_is_empty() {
    let pattern = path_64![(-1, -1), (1, -1), (1, 1), (-1, 1)];

    assert!(minkowski_sum(&pattern, &[], false).unwrap().is_empty());
    assert!(minkowski_sum(&pattern, &[], true).unwrap().is_empty());
    assert!(minkowski_sum(&[], &pattern, true).unwrap().is_empty());
}

#[test]
fn diff_of_square_with_itself_is_centered() {
    let square = rect(0, 0, 10, 10);
    let solution = minkowski_diff(&square, &square).unwrap();

    assert_eq!(solution.len(), 1);
    assert_eq!(total_area(&solution), 400.0);
    let r = polyclip::bounds(&solution);
    assert_eq!((r.left, r.top, r.right, r.bottom), (-10, -10, 10, 10));
}
