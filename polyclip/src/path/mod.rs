//! Flat path types and the free functions operating on them: signed area, orientation, bounds,
//! point containment, vertex cleaning and coordinate scaling.

use crate::core::math::{
    distance_from_line_squared, distance_squared, point64, Point64, HI_RANGE,
};
use num_traits::Float;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Ordered sequence of integer points. Whether it is treated as a closed polygon ring or an open
/// polyline is decided by the operation consuming it (e.g. [crate::clip::Clipper::add_path]).
pub type Path64 = Vec<Point64>;

/// Collection of paths.
pub type Paths64 = Vec<Path64>;

/// Axis aligned bounding rectangle (`top` holds the minimum y, `bottom` the maximum y).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Rect64 {
    pub left: i64,
    pub top: i64,
    pub right: i64,
    pub bottom: i64,
}

impl Rect64 {
    #[inline]
    pub fn width(&self) -> i64 {
        self.right - self.left
    }

    #[inline]
    pub fn height(&self) -> i64 {
        self.bottom - self.top
    }
}

/// Signed area of a closed path, positive when the winding is counter clockwise.
///
/// Invariant under rotation of the point order, negated by reversal. Paths with fewer than 3
/// points have zero area.
pub fn area(path: &[Point64]) -> f64 {
    let cnt = path.len();
    if cnt < 3 {
        return 0.0;
    }
    let mut a = 0.0;
    let mut j = cnt - 1;
    for i in 0..cnt {
        a += (path[j].x as f64 + path[i].x as f64) * (path[j].y as f64 - path[i].y as f64);
        j = i;
    }
    -a * 0.5
}

/// Returns true when the closed path has counter clockwise (positive area) winding.
#[inline]
pub fn orientation(path: &[Point64]) -> bool {
    area(path) >= 0.0
}

/// Reverse the point order of every path in place.
pub fn reverse_paths(paths: &mut Paths64) {
    for path in paths.iter_mut() {
        path.reverse();
    }
}

/// Bounding rectangle over all points of all paths (all zero when there are no points).
pub fn bounds(paths: &[Path64]) -> Rect64 {
    let mut iter = paths.iter().flatten();
    let first = match iter.next() {
        Some(pt) => *pt,
        None => return Rect64::default(),
    };
    let mut result = Rect64 {
        left: first.x,
        top: first.y,
        right: first.x,
        bottom: first.y,
    };
    for pt in iter {
        result.left = result.left.min(pt.x);
        result.right = result.right.max(pt.x);
        result.top = result.top.min(pt.y);
        result.bottom = result.bottom.max(pt.y);
    }
    result
}

/// Return a copy of `path` translated by `delta`.
pub fn translate_path(path: &[Point64], delta: Point64) -> Path64 {
    path.iter().map(|&pt| pt + delta).collect()
}

/// Result of a point-in-polygon containment query.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PointInPolygonResult {
    Outside,
    OnBoundary,
    Inside,
}

/// Winding based containment query, exact on boundary vertices and edges.
///
/// Uses the crossing rules from "The Point in Polygon Problem for Arbitrary Polygons"
/// (Hormann & Agathos).
pub fn point_in_polygon(pt: Point64, path: &[Point64]) -> PointInPolygonResult {
    let cnt = path.len();
    if cnt < 3 {
        return PointInPolygonResult::Outside;
    }
    let mut result = 0;
    let mut ip = path[0];
    for i in 1..=cnt {
        let ip_next = if i == cnt { path[0] } else { path[i] };
        if ip_next.y == pt.y
            && (ip_next.x == pt.x || (ip.y == pt.y && ((ip_next.x > pt.x) == (ip.x < pt.x))))
        {
            return PointInPolygonResult::OnBoundary;
        }
        if (ip.y < pt.y) != (ip_next.y < pt.y) {
            if ip.x >= pt.x {
                if ip_next.x > pt.x {
                    result = 1 - result;
                } else {
                    let d = (ip.x - pt.x) as f64 * (ip_next.y - pt.y) as f64
                        - (ip_next.x - pt.x) as f64 * (ip.y - pt.y) as f64;
                    if d == 0.0 {
                        return PointInPolygonResult::OnBoundary;
                    }
                    if (d > 0.0) == (ip_next.y > ip.y) {
                        result = 1 - result;
                    }
                }
            } else if ip_next.x > pt.x {
                let d = (ip.x - pt.x) as f64 * (ip_next.y - pt.y) as f64
                    - (ip_next.x - pt.x) as f64 * (ip.y - pt.y) as f64;
                if d == 0.0 {
                    return PointInPolygonResult::OnBoundary;
                }
                if (d > 0.0) == (ip_next.y > ip.y) {
                    result = 1 - result;
                }
            }
        }
        ip = ip_next;
    }

    if result == 0 {
        PointInPolygonResult::Outside
    } else {
        PointInPolygonResult::Inside
    }
}

#[inline]
fn points_are_close(pt1: Point64, pt2: Point64, dist_sqrd: f64) -> bool {
    distance_squared(pt1, pt2) <= dist_sqrd
}

fn slopes_near_collinear(pt1: Point64, pt2: Point64, pt3: Point64, dist_sqrd: f64) -> bool {
    // more accurate when testing the point that is geometrically between the other two, with
    // spikes either pt1 or pt3 is the between point
    if (pt1.x - pt2.x).abs() > (pt1.y - pt2.y).abs() {
        if (pt1.x > pt2.x) == (pt1.x < pt3.x) {
            distance_from_line_squared(pt1, pt2, pt3) < dist_sqrd
        } else if (pt2.x > pt1.x) == (pt2.x < pt3.x) {
            distance_from_line_squared(pt2, pt1, pt3) < dist_sqrd
        } else {
            distance_from_line_squared(pt3, pt1, pt2) < dist_sqrd
        }
    } else if (pt1.y > pt2.y) == (pt1.y < pt3.y) {
        distance_from_line_squared(pt1, pt2, pt3) < dist_sqrd
    } else if (pt2.y > pt1.y) == (pt2.y < pt3.y) {
        distance_from_line_squared(pt2, pt1, pt3) < dist_sqrd
    } else {
        distance_from_line_squared(pt3, pt1, pt2) < dist_sqrd
    }
}

/// Default [clean_polygon] distance (~√2, strips vertices whose x and y are both within one unit
/// of a neighbor).
pub const DEFAULT_CLEAN_DISTANCE: f64 = 1.415;

/// Remove near-duplicate and near-collinear vertices that lie within `distance` of their
/// neighbors. Idempotent: cleaning a cleaned path changes nothing.
pub fn clean_polygon(path: &[Point64], distance: f64) -> Path64 {
    let cnt = path.len();
    if cnt == 0 {
        return Path64::new();
    }

    // circular doubly linked ring over parallel index arrays
    let mut next: Vec<usize> = (0..cnt).map(|i| (i + 1) % cnt).collect();
    let mut prev: Vec<usize> = (0..cnt).map(|i| (i + cnt - 1) % cnt).collect();
    let mut done: Vec<bool> = vec![false; cnt];

    fn exclude(next: &mut [usize], prev: &mut [usize], done: &mut [bool], op: usize) -> usize {
        let result = prev[op];
        let op_next = next[op];
        next[result] = op_next;
        prev[op_next] = result;
        done[result] = false;
        result
    }

    let dist_sqrd = distance * distance;
    let mut op = 0;
    let mut remaining = cnt;
    while !done[op] && next[op] != prev[op] {
        if points_are_close(path[op], path[prev[op]], dist_sqrd) {
            op = exclude(&mut next, &mut prev, &mut done, op);
            remaining -= 1;
        } else if points_are_close(path[prev[op]], path[next[op]], dist_sqrd) {
            let op_next = next[op];
            exclude(&mut next, &mut prev, &mut done, op_next);
            op = exclude(&mut next, &mut prev, &mut done, op);
            remaining -= 2;
        } else if slopes_near_collinear(path[prev[op]], path[op], path[next[op]], dist_sqrd) {
            op = exclude(&mut next, &mut prev, &mut done, op);
            remaining -= 1;
        } else {
            done[op] = true;
            op = next[op];
        }
    }

    if remaining < 3 {
        return Path64::new();
    }
    let mut result = Path64::with_capacity(remaining);
    for _ in 0..remaining {
        result.push(path[op]);
        op = next[op];
    }
    result
}

/// [clean_polygon] applied to every path.
pub fn clean_polygons(paths: &[Path64], distance: f64) -> Paths64 {
    paths
        .iter()
        .map(|path| clean_polygon(path, distance))
        .collect()
}

#[inline]
fn saturating_coord<T>(value: T) -> i64
where
    T: Float,
{
    // saturate to the representable coordinate range rather than panic on extreme inputs
    value.to_i64().unwrap_or(if value > T::zero() {
        HI_RANGE
    } else {
        -HI_RANGE
    })
}

/// Convert float coordinate pairs into the integer coordinate space, multiplying by `scale` and
/// rounding (callers typically scale real world units up, e.g. metres by 1000).
pub fn scaled_path_from_points<T>(points: &[(T, T)], scale: T) -> Path64
where
    T: Float,
{
    points
        .iter()
        .map(|&(x, y)| {
            point64(
                saturating_coord((x * scale).round()),
                saturating_coord((y * scale).round()),
            )
        })
        .collect()
}

/// Inverse of [scaled_path_from_points]: divide integer coordinates back down by `scale`.
pub fn points_from_scaled_path<T>(path: &[Point64], scale: T) -> Vec<(T, T)>
where
    T: Float,
{
    path.iter()
        .map(|pt| {
            (
                T::from(pt.x).unwrap() / scale,
                T::from(pt.y).unwrap() / scale,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::math::point64;

    fn square(size: i64) -> Path64 {
        vec![
            point64(0, 0),
            point64(size, 0),
            point64(size, size),
            point64(0, size),
        ]
    }

    #[test]
    fn area_of_square() {
        assert_eq!(area(&square(10)), 100.0);
        let mut reversed = square(10);
        reversed.reverse();
        assert_eq!(area(&reversed), -100.0);
    }

    #[test]
    fn degenerate_area() {
        assert_eq!(area(&[point64(0, 0), point64(5, 5)]), 0.0);
    }

    #[test]
    fn bounds_of_paths() {
        let paths = vec![square(10), translate_path(&square(10), point64(5, -3))];
        let r = bounds(&paths);
        assert_eq!((r.left, r.top, r.right, r.bottom), (0, -3, 15, 10));
        assert_eq!(r.width(), 15);
        assert_eq!(r.height(), 13);
    }

    #[test]
    fn pip_classifications() {
        let sq = square(10);
        assert_eq!(
            point_in_polygon(point64(5, 5), &sq),
            PointInPolygonResult::Inside
        );
        assert_eq!(
            point_in_polygon(point64(15, 5), &sq),
            PointInPolygonResult::Outside
        );
        assert_eq!(
            point_in_polygon(point64(10, 5), &sq),
            PointInPolygonResult::OnBoundary
        );
    }

    #[test]
    fn scaling_round_trip() {
        let pts = [(1.25f64, -2.5), (0.333, 10.0)];
        let path = scaled_path_from_points(&pts, 1000.0);
        assert_eq!(path, vec![point64(1250, -2500), point64(333, 10000)]);
        let back = points_from_scaled_path(&path, 1000.0);
        assert!((back[0].0 - 1.25).abs() < 1e-9);
        assert!((back[1].1 - 10.0).abs() < 1e-9);
    }
}
