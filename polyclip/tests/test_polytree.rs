mod test_utils;

use polyclip::{
    area, closed_paths_from_polytree, open_paths_from_polytree, path_64, point64,
    polytree_to_paths, ClipType, Clipper, FillRule, PathType,
};
use test_utils::{rect, total_area};

#[test]
fn tree_preserves_hole_nesting() {
    let mut clipper = Clipper::new();
    clipper
        .add_path(&rect(0, 0, 100, 100), PathType::Subject, true)
        .unwrap();
    clipper
        .add_path(&rect(20, 20, 80, 80), PathType::Subject, true)
        .unwrap();

    let tree = clipper
        .execute_tree(ClipType::Union, FillRule::EvenOdd, FillRule::EvenOdd)
        .unwrap();

    assert_eq!(tree.total(), 2);
    assert_eq!(tree.top_level().len(), 1);

    let outer_idx = tree.top_level()[0];
    let outer = tree.node(outer_idx);
    assert_eq!(outer.children.len(), 1);
    assert!(!tree.is_hole(outer_idx));
    assert!(area(&outer.polygon) > 0.0);

    let hole_idx = outer.children[0];
    assert!(tree.is_hole(hole_idx));
    assert!(area(&tree.node(hole_idx).polygon) < 0.0);

    let flat = polytree_to_paths(&tree);
    assert_eq!(flat.len(), 2);
    assert_eq!(total_area(&flat), 10000.0 - 3600.0);
}

#[test]
fn tree_nests_island_within_hole() {
    let mut clipper = Clipper::new();
    clipper
        .add_path(&rect(0, 0, 100, 100), PathType::Subject, true)
        .unwrap();
    clipper
        .add_path(&rect(20, 20, 80, 80), PathType::Subject, true)
        .unwrap();
    clipper
        .add_path(&rect(40, 40, 60, 60), PathType::Subject, true)
        .unwrap();

    let tree = clipper
        .execute_tree(ClipType::Union, FillRule::EvenOdd, FillRule::EvenOdd)
        .unwrap();

    assert_eq!(tree.total(), 3);
    let outer = tree.top_level()[0];
    let hole = tree.node(outer).children[0];
    let island = tree.node(hole).children[0];
    assert!(!tree.is_hole(outer));
    assert!(tree.is_hole(hole));
    assert!(!tree.is_hole(island));
    assert_eq!(area(&tree.node(island).polygon), 400.0);
}

#[test]
fn open_path_clipped_against_square() {
    let mut clipper = Clipper::new();
    clipper
        .add_path(&path_64![(-50, 50), (150, 50)], PathType::Subject, false)
        .unwrap();
    clipper
        .add_path(&rect(0, 0, 100, 100), PathType::Clip, true)
        .unwrap();

    let tree = clipper
        .execute_tree(ClipType::Intersection, FillRule::EvenOdd, FillRule::EvenOdd)
        .unwrap();

    let open = open_paths_from_polytree(&tree);
    assert_eq!(open.len(), 1);
    assert_eq!(open[0].len(), 2);
    let mut endpoints = open[0].clone();
    endpoints.sort_by_key(|p| p.x);
    assert_eq!(endpoints, vec![point64(0, 50), point64(100, 50)]);

    // the closed clip path itself does not appear in an intersection solution
    assert!(closed_paths_from_polytree(&tree).is_empty());
}

#[test]
fn open_path_outside_clip_vanishes() {
    let mut clipper = Clipper::new();
    clipper
        .add_path(&path_64![(-50, 200), (150, 200)], PathType::Subject, false)
        .unwrap();
    clipper
        .add_path(&rect(0, 0, 100, 100), PathType::Clip, true)
        .unwrap();

    let tree = clipper
        .execute_tree(ClipType::Intersection, FillRule::EvenOdd, FillRule::EvenOdd)
        .unwrap();
    assert_eq!(tree.total(), 0);
}

#[test]
fn mixed_open_and_closed_subjects() {
    let mut clipper = Clipper::new();
    clipper
        .add_path(&rect(0, 0, 40, 40), PathType::Subject, true)
        .unwrap();
    clipper
        .add_path(&path_64![(10, 60), (90, 60)], PathType::Subject, false)
        .unwrap();
    clipper
        .add_path(&rect(20, 20, 100, 100), PathType::Clip, true)
        .unwrap();

    let tree = clipper
        .execute_tree(ClipType::Intersection, FillRule::EvenOdd, FillRule::EvenOdd)
        .unwrap();

    let closed = closed_paths_from_polytree(&tree);
    assert_eq!(closed.len(), 1);
    assert_eq!(total_area(&closed), 400.0);

    let open = open_paths_from_polytree(&tree);
    assert_eq!(open.len(), 1);
    let mut endpoints = open[0].clone();
    endpoints.sort_by_key(|p| p.x);
    assert_eq!(endpoints, vec![point64(20, 60), point64(90, 60)]);
}

#[test]
fn tree_of_disjoint_results_has_flat_top_level() {
    let mut clipper = Clipper::new();
    clipper
        .add_path(&rect(0, 0, 10, 10), PathType::Subject, true)
        .unwrap();
    clipper
        .add_path(&rect(20, 0, 30, 10), PathType::Subject, true)
        .unwrap();

    let tree = clipper
        .execute_tree(ClipType::Union, FillRule::EvenOdd, FillRule::EvenOdd)
        .unwrap();

    assert_eq!(tree.total(), 2);
    assert_eq!(tree.top_level().len(), 2);
    assert!(tree
        .top_level()
        .iter()
        .all(|&idx| tree.node(idx).children.is_empty()));
}
