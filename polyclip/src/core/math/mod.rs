//! Exact integer geometry predicates and small float helpers shared across the crate.
//!
//! All collinearity/slope tests are performed with `i128` products so they are exact for the
//! whole permitted coordinate range, there is no epsilon in any of these predicates.

mod point;

pub use point::{point64, Point64};

/// Largest permitted coordinate magnitude (products of two deltas stay well inside `i128`, and
/// the f64 slope math used by the sweep stays in range).
pub const HI_RANGE: i64 = 0x3FFF_FFFF_FFFF_FFFF;

/// Round to nearest, halves away from zero (matches the rounding used when projecting edges to a
/// scan-beam so results are reproducible against other ports).
#[inline]
pub fn round_to_i64(value: f64) -> i64 {
    value.round() as i64
}

#[inline]
fn i128_cross(dx1: i64, dy1: i64, dx2: i64, dy2: i64) -> bool {
    (dy1 as i128) * (dx2 as i128) == (dx1 as i128) * (dy2 as i128)
}

/// Exact test for the segments `pt1->pt2` and `pt2->pt3` having equal slope.
#[inline]
pub fn slopes_equal(pt1: Point64, pt2: Point64, pt3: Point64) -> bool {
    i128_cross(pt1.x - pt2.x, pt1.y - pt2.y, pt2.x - pt3.x, pt2.y - pt3.y)
}

/// Exact test for the segments `pt1->pt2` and `pt3->pt4` having equal slope.
#[inline]
pub fn slopes_equal4(pt1: Point64, pt2: Point64, pt3: Point64, pt4: Point64) -> bool {
    i128_cross(pt1.x - pt2.x, pt1.y - pt2.y, pt3.x - pt4.x, pt3.y - pt4.y)
}

/// Returns true when `pt2` lies strictly between `pt1` and `pt3` (the three points are assumed
/// collinear, only the ordering along the dominant axis is tested).
pub fn pt2_is_between_pt1_and_pt3(pt1: Point64, pt2: Point64, pt3: Point64) -> bool {
    if pt1 == pt3 || pt1 == pt2 || pt3 == pt2 {
        false
    } else if pt1.x != pt3.x {
        (pt2.x > pt1.x) == (pt2.x < pt3.x)
    } else {
        (pt2.y > pt1.y) == (pt2.y < pt3.y)
    }
}

/// Squared distance between two points.
#[inline]
pub fn distance_squared(pt1: Point64, pt2: Point64) -> f64 {
    let dx = (pt1.x - pt2.x) as f64;
    let dy = (pt1.y - pt2.y) as f64;
    dx * dx + dy * dy
}

/// Squared perpendicular distance of `pt` from the infinite line through `ln1` and `ln2`.
pub fn distance_from_line_squared(pt: Point64, ln1: Point64, ln2: Point64) -> f64 {
    // general form line equation (Ax + By + C = 0) derived from the two line points
    let a = (ln1.y - ln2.y) as f64;
    let b = (ln2.x - ln1.x) as f64;
    let mut c = a * ln1.x as f64 + b * ln1.y as f64;
    c = a * pt.x as f64 + b * pt.y as f64 - c;
    (c * c) / (a * a + b * b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slopes_equal_exact() {
        assert!(slopes_equal(
            point64(0, 0),
            point64(5, 5),
            point64(10, 10)
        ));
        assert!(!slopes_equal(point64(0, 0), point64(5, 5), point64(10, 11)));
        // magnitudes that would overflow i64 products
        let big = 1 << 61;
        assert!(slopes_equal(
            point64(-big, -big),
            point64(0, 0),
            point64(big, big)
        ));
    }

    #[test]
    fn between_test() {
        assert!(pt2_is_between_pt1_and_pt3(
            point64(0, 0),
            point64(3, 0),
            point64(9, 0)
        ));
        assert!(!pt2_is_between_pt1_and_pt3(
            point64(0, 0),
            point64(9, 0),
            point64(3, 0)
        ));
        assert!(!pt2_is_between_pt1_and_pt3(
            point64(0, 0),
            point64(0, 0),
            point64(3, 0)
        ));
    }

    #[test]
    fn line_distance() {
        let d = distance_from_line_squared(point64(0, 5), point64(-10, 0), point64(10, 0));
        assert_eq!(d, 25.0);
    }
}
