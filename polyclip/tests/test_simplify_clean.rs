mod test_utils;

use polyclip::{
    area, clean_polygon, orientation, path_64, point64, simplify_polygon, simplify_polygons,
    FillRule, DEFAULT_CLEAN_DISTANCE,
};
use test_utils::{rect, sorted_areas, total_area};

#[test]
fn bowtie_splits_into_two_triangles() {
    // edges cross at (5, 5)
    let bowtie = path_64![(0, 0), (10, 10), (10, 0), (0, 10)];

    let solution = simplify_polygon(&bowtie, FillRule::NonZero).unwrap();
    assert_eq!(solution.len(), 2);
    assert_eq!(sorted_areas(&solution), vec![25.0, 25.0]);
    assert!(solution.iter().all(|p| orientation(p)));
}

#[test]
fn star_fill_rules_differ() {
    // five pointed star drawn as a single self intersecting outline
    let star = path_64![(0, 100), (59, -81), (-95, 31), (95, 31), (-59, -81)];

    let even_odd = simplify_polygon(&star, FillRule::EvenOdd).unwrap();
    let non_zero = simplify_polygon(&star, FillRule::NonZero).unwrap();

    // even-odd empties the pentagon at the center, leaving the five points as separate
    // triangles; non-zero fills the whole star as one outline
    assert_eq!(even_odd.len(), 5);
    assert!(sorted_areas(&even_odd)[0] > 0.0);
    assert_eq!(non_zero.len(), 1);
    let eo_area = total_area(&even_odd);
    let nz_area = total_area(&non_zero);
    assert!(eo_area > 0.0);
    assert!(nz_area > eo_area, "the filled pentagon adds area under non-zero");
}

#[test]
fn simple_polygon_passes_through() {
    let solution = simplify_polygon(&rect(0, 0, 10, 10), FillRule::EvenOdd).unwrap();
    assert_eq!(solution.len(), 1);
    assert_eq!(total_area(&solution), 100.0);
}

#[test]
fn simplify_polygons_merges_the_set() {
    let solution = simplify_polygons(
        &[rect(0, 0, 10, 10), rect(5, 5, 15, 15)],
        FillRule::NonZero,
    )
    .unwrap();
    assert_eq!(solution.len(), 1);
    assert_eq!(total_area(&solution), 175.0);
}

#[test]
fn clean_removes_collinear_vertices() {
    let noisy = path_64![(0, 0), (5, 0), (10, 0), (10, 10), (0, 10)];

    let cleaned = clean_polygon(&noisy, DEFAULT_CLEAN_DISTANCE);
    assert_eq!(cleaned, rect(0, 0, 10, 10));
}

#[test]
fn clean_merges_near_duplicate_vertices() {
    // one corner split into two vertices a single unit apart
    let noisy = path_64![(0, 0), (10, 0), (10, 1), (10, 10), (0, 10)];

    let cleaned = clean_polygon(&noisy, DEFAULT_CLEAN_DISTANCE);
    assert_eq!(cleaned.len(), 4);
    assert!((area(&cleaned) - area(&noisy)).abs() < 10.0);
}

#[test]
fn clean_drops_spike_with_near_coincident_base() {
    // the spike at (5, -20) rises between two base vertices one unit apart; the spike and the
    // redundant base vertex both go
    let spiked = path_64![(0, 0), (5, -20), (1, 0), (10, 0), (10, 10), (0, 10)];

    let cleaned = clean_polygon(&spiked, DEFAULT_CLEAN_DISTANCE);
    assert_eq!(cleaned, rect(0, 0, 10, 10));
}

#[test]
fn clean_is_idempotent() {
    let noisy = path_64![(0, 0), (5, 0), (10, 0), (10, 1), (10, 10), (0, 10)];

    let once = clean_polygon(&noisy, DEFAULT_CLEAN_DISTANCE);
    let twice = clean_polygon(&once, DEFAULT_CLEAN_DISTANCE);
    assert_eq!(once, twice);
}

#[test]
fn clean_collapses_degenerate_input() {
    // everything within the clean distance of a single spot
    let speck = path_64![(0, 0), (1, 0), (1, 1), (0, 1)];
    let cleaned = clean_polygon(&speck, DEFAULT_CLEAN_DISTANCE);
    assert!(cleaned.is_empty());
}

#[test]
fn clean_with_zero_distance_only_drops_exact_duplicates() {
    let path = vec![
        point64(0, 0),
        point64(0, 0),
        point64(10, 0),
        point64(10, 10),
        point64(0, 10),
    ];
    let cleaned = clean_polygon(&path, 0.0);
    assert_eq!(cleaned.len(), 4);
}
