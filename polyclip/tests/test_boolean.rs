mod test_utils;

use polyclip::{
    area, bounds, orientation, path_64, point64, ClipError, ClipType, Clipper, ClipperOptions,
    FillRule, PathType,
};
use test_utils::{boolean_op, rect, sorted_areas, total_area};

#[test]
fn union_of_overlapping_squares() {
    let solution = boolean_op(
        ClipType::Union,
        &[rect(0, 0, 10, 10)],
        &[rect(5, 5, 15, 15)],
        FillRule::EvenOdd,
    );

    assert_eq!(solution.len(), 1, "overlapping squares union into one path");
    assert_eq!(solution[0].len(), 8, "union outline is an 8 vertex L shape");
    assert_eq!(total_area(&solution), 175.0);
    assert!(orientation(&solution[0]), "outer boundary winds positive");
}

#[test]
fn intersection_of_overlapping_squares() {
    let solution = boolean_op(
        ClipType::Intersection,
        &[rect(0, 0, 10, 10)],
        &[rect(5, 5, 15, 15)],
        FillRule::EvenOdd,
    );

    assert_eq!(solution.len(), 1);
    assert_eq!(solution[0].len(), 4);
    assert_eq!(total_area(&solution), 25.0);
    let r = bounds(&solution);
    assert_eq!((r.left, r.top, r.right, r.bottom), (5, 5, 10, 10));
}

#[test]
fn difference_of_overlapping_squares() {
    let solution = boolean_op(
        ClipType::Difference,
        &[rect(0, 0, 10, 10)],
        &[rect(5, 5, 15, 15)],
        FillRule::EvenOdd,
    );

    assert_eq!(solution.len(), 1);
    assert_eq!(total_area(&solution), 75.0);
}

#[test]
fn xor_of_overlapping_squares() {
    let solution = boolean_op(
        ClipType::Xor,
        &[rect(0, 0, 10, 10)],
        &[rect(5, 5, 15, 15)],
        FillRule::EvenOdd,
    );

    // union area minus the shared square
    assert_eq!(total_area(&solution), 150.0);
}

#[test]
fn strictly_simple_xor_splits_at_pinch_points() {
    // the xor result touches itself at (5, 10) and (10, 5); strictly simple output must
    // separate the two L shaped lobes
    let mut clipper = Clipper::with_options(ClipperOptions {
        strictly_simple: true,
        ..Default::default()
    });
    clipper
        .add_path(&rect(0, 0, 10, 10), PathType::Subject, true)
        .unwrap();
    clipper
        .add_path(&rect(5, 5, 15, 15), PathType::Clip, true)
        .unwrap();
    let solution = clipper
        .execute(ClipType::Xor, FillRule::EvenOdd, FillRule::EvenOdd)
        .unwrap();

    assert_eq!(solution.len(), 2);
    assert_eq!(sorted_areas(&solution), vec![75.0, 75.0]);
}

#[test]
fn union_of_disjoint_squares() {
    let solution = boolean_op(
        ClipType::Union,
        &[rect(0, 0, 10, 10), rect(20, 20, 30, 30)],
        &[],
        FillRule::EvenOdd,
    );

    assert_eq!(solution.len(), 2);
    assert_eq!(total_area(&solution), 200.0);
}

#[test]
fn intersection_of_disjoint_squares_is_empty() {
    let solution = boolean_op(
        ClipType::Intersection,
        &[rect(0, 0, 10, 10)],
        &[rect(20, 20, 30, 30)],
        FillRule::EvenOdd,
    );
    assert!(solution.is_empty());
}

#[test]
fn difference_of_fully_covered_subject_is_empty() {
    let solution = boolean_op(
        ClipType::Difference,
        &[rect(2, 2, 8, 8)],
        &[rect(0, 0, 10, 10)],
        FillRule::EvenOdd,
    );
    assert!(solution.is_empty());
}

#[test]
fn fill_rule_changes_self_overlap_result() {
    // two overlapping squares in the same (subject) set: under even-odd the doubly covered
    // region empties out, splitting the result at the edge crossings into two L shapes; under
    // non-zero it stays filled
    let subject = [rect(0, 0, 10, 10), rect(5, 5, 15, 15)];

    let even_odd = boolean_op(ClipType::Union, &subject, &[], FillRule::EvenOdd);
    assert_eq!(even_odd.len(), 2);
    assert_eq!(sorted_areas(&even_odd), vec![75.0, 75.0]);
    assert_eq!(total_area(&even_odd), 150.0);

    let non_zero = boolean_op(ClipType::Union, &subject, &[], FillRule::NonZero);
    assert_eq!(non_zero.len(), 1);
    assert_eq!(total_area(&non_zero), 175.0);
}

#[test]
fn reverse_solution_flips_output_winding() {
    let mut clipper = Clipper::with_options(ClipperOptions {
        reverse_solution: true,
        ..Default::default()
    });
    clipper
        .add_path(&rect(0, 0, 10, 10), PathType::Subject, true)
        .unwrap();
    let solution = clipper
        .execute(ClipType::Union, FillRule::EvenOdd, FillRule::EvenOdd)
        .unwrap();

    assert_eq!(solution.len(), 1);
    assert_eq!(area(&solution[0]), -100.0);
}

#[test]
fn preserve_collinear_keeps_input_vertices() {
    let subject = path_64![(0, 0), (5, 0), (10, 0), (10, 10), (0, 10)];

    let mut clipper = Clipper::new();
    clipper.add_path(&subject, PathType::Subject, true).unwrap();
    let plain = clipper
        .execute(ClipType::Union, FillRule::EvenOdd, FillRule::EvenOdd)
        .unwrap();
    assert_eq!(plain[0].len(), 4, "collinear vertex dropped by default");

    let mut clipper = Clipper::with_options(ClipperOptions {
        preserve_collinear: true,
        ..Default::default()
    });
    clipper.add_path(&subject, PathType::Subject, true).unwrap();
    let preserved = clipper
        .execute(ClipType::Union, FillRule::EvenOdd, FillRule::EvenOdd)
        .unwrap();
    assert_eq!(preserved[0].len(), 5);
}

#[test]
fn open_paths_rejected_by_flat_execute() {
    let mut clipper = Clipper::new();
    clipper
        .add_path(&path_64![(-5, 5), (20, 5)], PathType::Subject, false)
        .unwrap();
    clipper
        .add_path(&rect(0, 0, 10, 10), PathType::Clip, true)
        .unwrap();

    let result = clipper.execute(ClipType::Intersection, FillRule::EvenOdd, FillRule::EvenOdd);
    assert!(matches!(result, Err(ClipError::OpenPathsNeedTree)));
}

#[test]
fn open_clip_paths_rejected() {
    let mut clipper = Clipper::new();
    let result = clipper.add_path(&path_64![(0, 0), (10, 0)], PathType::Clip, false);
    assert!(matches!(result, Err(ClipError::OpenPathsMustBeSubject)));
}

#[test]
fn coordinates_out_of_range_rejected() {
    let mut clipper = Clipper::new();
    let huge = 1_i64 << 62;
    let result = clipper.add_path(
        &[point64(0, 0), point64(huge, 0), point64(huge, huge)],
        PathType::Subject,
        true,
    );
    assert!(matches!(result, Err(ClipError::CoordinateOutOfRange)));
}

#[test]
fn degenerate_paths_are_ignored() {
    let mut clipper = Clipper::new();
    assert!(!clipper
        .add_path(&path_64![(0, 0), (10, 0)], PathType::Subject, true)
        .unwrap());
    assert!(!clipper
        .add_path(
            &path_64![(0, 0), (5, 0), (10, 0)], // collinear
            PathType::Subject,
            true
        )
        .unwrap());

    let solution = clipper
        .execute(ClipType::Union, FillRule::EvenOdd, FillRule::EvenOdd)
        .unwrap();
    assert!(solution.is_empty());
}

#[test]
fn reversed_input_winding_gives_same_result() {
    let mut reversed = rect(0, 0, 10, 10);
    reversed.reverse();
    let solution = boolean_op(
        ClipType::Intersection,
        &[reversed],
        &[rect(5, 5, 15, 15)],
        FillRule::NonZero,
    );

    assert_eq!(solution.len(), 1);
    assert_eq!(total_area(&solution), 25.0);
}

#[test]
fn clipper_is_reusable_after_clear() {
    let mut clipper = Clipper::new();
    clipper
        .add_path(&rect(0, 0, 10, 10), PathType::Subject, true)
        .unwrap();
    let first = clipper
        .execute(ClipType::Union, FillRule::EvenOdd, FillRule::EvenOdd)
        .unwrap();
    assert_eq!(total_area(&first), 100.0);

    clipper.clear();
    clipper
        .add_path(&rect(0, 0, 20, 20), PathType::Subject, true)
        .unwrap();
    let second = clipper
        .execute(ClipType::Union, FillRule::EvenOdd, FillRule::EvenOdd)
        .unwrap();
    assert_eq!(total_area(&second), 400.0);
}
