#![allow(dead_code)]

use polyclip::{area, point64, ClipType, Clipper, FillRule, Path64, PathType, Paths64};

/// Rectangle path in positive orientation (y increases downward).
pub fn rect(left: i64, top: i64, right: i64, bottom: i64) -> Path64 {
    vec![
        point64(left, top),
        point64(right, top),
        point64(right, bottom),
        point64(left, bottom),
    ]
}

/// Sum of signed areas over all paths (holes subtract).
pub fn total_area(paths: &[Path64]) -> f64 {
    paths.iter().map(|p| area(p)).sum()
}

/// Signed path areas sorted ascending, for order independent comparisons.
pub fn sorted_areas(paths: &[Path64]) -> Vec<f64> {
    let mut areas: Vec<f64> = paths.iter().map(|p| area(p)).collect();
    areas.sort_by(|a, b| a.partial_cmp(b).unwrap());
    areas
}

/// Run a boolean operation on closed subject and clip sets with the same fill rule for both.
pub fn boolean_op(
    clip_type: ClipType,
    subject: &[Path64],
    clip: &[Path64],
    fill_rule: FillRule,
) -> Paths64 {
    let mut clipper = Clipper::new();
    clipper
        .add_paths(subject, PathType::Subject, true)
        .unwrap();
    clipper.add_paths(clip, PathType::Clip, true).unwrap();
    clipper.execute(clip_type, fill_rule, fill_rule).unwrap()
}
