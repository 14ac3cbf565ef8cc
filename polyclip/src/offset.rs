//! Polygon offsetting (inflation and deflation) with mitered joins.
//!
//! Each vertex of every input polygon is displaced along its edge normals by the offset delta,
//! then a union pass over the raw offset polygons removes the self overlaps this produces at
//! concave vertices. Negative deltas shrink the polygons and may make them vanish entirely.

use crate::clip::{ClipError, ClipType, Clipper, ClipperOptions, FillRule, PathType};
use crate::core::math::{point64, round_to_i64, Point64};
use crate::path::{bounds, orientation, reverse_paths, Path64, Paths64};

/// Deltas smaller than this are treated as zero.
const TOLERANCE: f64 = 1.0e-20;

/// Default limit on miter spike length, in multiples of the offset delta.
pub const DEFAULT_MITER_LIMIT: f64 = 2.0;

#[derive(Debug, Copy, Clone)]
struct Normal {
    x: f64,
    y: f64,
}

fn unit_normal(pt1: Point64, pt2: Point64) -> Normal {
    let dx = (pt2.x - pt1.x) as f64;
    let dy = (pt2.y - pt1.y) as f64;
    if dx == 0.0 && dy == 0.0 {
        return Normal { x: 0.0, y: 0.0 };
    }
    let f = 1.0 / (dx * dx + dy * dy).sqrt();
    Normal {
        x: dy * f,
        y: -dx * f,
    }
}

/// Emit the offset vertex (or vertices) for `src[j]`, where `k` is the preceding vertex index.
fn offset_point(
    dest: &mut Path64,
    src: &[Point64],
    normals: &[Normal],
    j: usize,
    k: &mut usize,
    delta: f64,
    miter_lim: f64,
) {
    let nk = normals[*k];
    let nj = normals[j];
    let mut sin_a = nk.x * nj.y - nj.x * nk.y;
    if (sin_a * delta).abs() < 1.0 {
        let cos_a = nk.x * nj.x + nj.y * nk.y;
        if cos_a > 0.0 {
            // near-zero turn, a single offset vertex suffices
            dest.push(point64(
                round_to_i64(src[j].x as f64 + nk.x * delta),
                round_to_i64(src[j].y as f64 + nk.y * delta),
            ));
            return;
        }
        // near-180 degree turn falls through to the join handling
    } else if sin_a > 1.0 {
        sin_a = 1.0;
    } else if sin_a < -1.0 {
        sin_a = -1.0;
    }

    if sin_a * delta < 0.0 {
        // concave vertex: emit both edge offsets plus the source vertex, the union pass
        // removes the resulting overlap
        dest.push(point64(
            round_to_i64(src[j].x as f64 + nk.x * delta),
            round_to_i64(src[j].y as f64 + nk.y * delta),
        ));
        dest.push(src[j]);
        dest.push(point64(
            round_to_i64(src[j].x as f64 + nj.x * delta),
            round_to_i64(src[j].y as f64 + nj.y * delta),
        ));
    } else {
        let r = 1.0 + (nj.x * nk.x + nj.y * nk.y);
        if r >= miter_lim {
            // miter join
            let q = delta / r;
            dest.push(point64(
                round_to_i64(src[j].x as f64 + (nk.x + nj.x) * q),
                round_to_i64(src[j].y as f64 + (nk.y + nj.y) * q),
            ));
        } else {
            // the miter would spike past the limit, square the corner off instead
            let dx = (sin_a.atan2(nk.x * nj.x + nk.y * nj.y) / 4.0).tan();
            dest.push(point64(
                round_to_i64(src[j].x as f64 + delta * (nk.x - nk.y * dx)),
                round_to_i64(src[j].y as f64 + delta * (nk.y + nk.x * dx)),
            ));
            dest.push(point64(
                round_to_i64(src[j].x as f64 + delta * (nj.x + nj.y * dx)),
                round_to_i64(src[j].y as f64 + delta * (nj.y - nj.x * dx)),
            ));
        }
    }
    *k = j;
}

/// Offsets a set of closed polygons by a signed delta.
///
/// Add polygons with [add_path](PolygonOffset::add_path) / [add_paths](PolygonOffset::add_paths)
/// then call [execute](PolygonOffset::execute); the input set is retained so the same polygons
/// can be offset repeatedly by different deltas.
#[derive(Debug, Clone)]
pub struct PolygonOffset {
    miter_limit: f64,
    paths: Paths64,
    /// Path and vertex index of the lowest (largest y, then smallest x) vertex seen, used to
    /// normalize input orientation.
    lowest: Option<(usize, usize)>,
}

impl Default for PolygonOffset {
    fn default() -> Self {
        Self::new()
    }
}

impl PolygonOffset {
    pub fn new() -> Self {
        Self::with_miter_limit(DEFAULT_MITER_LIMIT)
    }

    /// `miter_limit` caps how far a miter join may extend at a sharp vertex, in multiples of
    /// the delta; corners exceeding it are squared off. Values below 2 are treated as 2.
    pub fn with_miter_limit(miter_limit: f64) -> Self {
        PolygonOffset {
            miter_limit,
            paths: Paths64::new(),
            lowest: None,
        }
    }

    /// Add one closed polygon. Returns false when the path collapses to fewer than 3 distinct
    /// vertices and was ignored.
    pub fn add_path(&mut self, path: &[Point64]) -> bool {
        if path.is_empty() {
            return false;
        }
        let mut high_i = path.len() - 1;
        while high_i > 0 && path[0] == path[high_i] {
            high_i -= 1;
        }

        // strip consecutive duplicates, tracking the lowest vertex as we go
        let mut pg = Path64::with_capacity(high_i + 1);
        pg.push(path[0]);
        let mut j = 0;
        let mut k = 0;
        for i in 1..=high_i {
            if pg[j] != path[i] {
                j += 1;
                pg.push(path[i]);
                if path[i].y > pg[k].y || (path[i].y == pg[k].y && path[i].x < pg[k].x) {
                    k = j;
                }
            }
        }
        if j < 2 {
            return false;
        }
        let path_idx = self.paths.len();
        self.paths.push(pg);

        match self.lowest {
            None => self.lowest = Some((path_idx, k)),
            Some((lp, lk)) => {
                let lowest_pt = self.paths[lp][lk];
                let new_pt = self.paths[path_idx][k];
                if new_pt.y > lowest_pt.y || (new_pt.y == lowest_pt.y && new_pt.x < lowest_pt.x) {
                    self.lowest = Some((path_idx, k));
                }
            }
        }
        true
    }

    /// [add_path](PolygonOffset::add_path) over a batch, returns true when at least one polygon
    /// was accepted.
    pub fn add_paths(&mut self, paths: &[Path64]) -> bool {
        let mut result = false;
        for path in paths {
            if self.add_path(path) {
                result = true;
            }
        }
        result
    }

    /// Remove all added polygons.
    pub fn clear(&mut self) {
        self.paths.clear();
        self.lowest = None;
    }

    /// Offset the added polygons by `delta` (positive inflates, negative deflates).
    pub fn execute(&mut self, delta: f64) -> Result<Paths64, ClipError> {
        self.fix_orientations();
        let offset_polys = self.do_offset(delta);

        // union the raw offsets to clean up the overlaps produced at concave corners
        if delta > 0.0 {
            let mut clipper = Clipper::new();
            clipper.add_paths(&offset_polys, PathType::Subject, true)?;
            clipper.execute(ClipType::Union, FillRule::Positive, FillRule::Positive)
        } else {
            // a negative offset turns polygons inside out; clip against an enclosing rectangle
            // and discard it from the solution to turn them right side out again
            let r = bounds(&offset_polys);
            let outer = vec![
                point64(r.left - 10, r.bottom + 10),
                point64(r.right + 10, r.bottom + 10),
                point64(r.right + 10, r.top - 10),
                point64(r.left - 10, r.top - 10),
            ];
            let mut clipper = Clipper::with_options(ClipperOptions {
                reverse_solution: true,
                ..Default::default()
            });
            clipper.add_paths(&offset_polys, PathType::Subject, true)?;
            clipper.add_path(&outer, PathType::Subject, true)?;
            let mut solution =
                clipper.execute(ClipType::Union, FillRule::Negative, FillRule::Negative)?;
            if !solution.is_empty() {
                solution.remove(0);
            }
            Ok(solution)
        }
    }

    /// Offsetting assumes counter clockwise outer polygons; reverse everything if the polygon
    /// holding the overall lowest vertex (always an outer boundary) winds the other way.
    fn fix_orientations(&mut self) {
        if let Some((lp, _)) = self.lowest {
            if !orientation(&self.paths[lp]) {
                reverse_paths(&mut self.paths);
            }
        }
    }

    fn do_offset(&self, delta: f64) -> Paths64 {
        let mut dest = Paths64::with_capacity(self.paths.len());
        if delta.abs() < TOLERANCE {
            // zero offset: the union pass still merges the input set
            dest.extend(self.paths.iter().cloned());
            return dest;
        }
        let miter_lim = if self.miter_limit > 2.0 {
            2.0 / (self.miter_limit * self.miter_limit)
        } else {
            0.5
        };

        for src in &self.paths {
            let len = src.len();
            if delta <= 0.0 && len < 3 {
                continue;
            }

            let mut normals = Vec::with_capacity(len);
            for j in 0..len - 1 {
                normals.push(unit_normal(src[j], src[j + 1]));
            }
            normals.push(unit_normal(src[len - 1], src[0]));

            let mut poly = Path64::with_capacity(len);
            let mut k = len - 1;
            for j in 0..len {
                offset_point(&mut poly, src, &normals, j, &mut k, delta, miter_lim);
            }
            dest.push(poly);
        }
        dest
    }
}

/// One-shot offset of `paths` by `delta` with the given miter limit.
pub fn inflate_paths(
    paths: &[Path64],
    delta: f64,
    miter_limit: f64,
) -> Result<Paths64, ClipError> {
    let mut offset = PolygonOffset::with_miter_limit(miter_limit);
    offset.add_paths(paths);
    offset.execute(delta)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_path_strips_duplicates() {
        let mut offset = PolygonOffset::new();
        let path = vec![
            point64(0, 0),
            point64(0, 0),
            point64(10, 0),
            point64(10, 10),
            point64(0, 0),
        ];
        assert!(offset.add_path(&path));
        assert_eq!(offset.paths[0].len(), 3);
    }

    #[test]
    fn degenerate_path_rejected() {
        let mut offset = PolygonOffset::new();
        assert!(!offset.add_path(&[point64(0, 0), point64(5, 5)]));
        assert!(offset.paths.is_empty());
    }

    #[test]
    fn unit_normal_is_perpendicular() {
        let n = unit_normal(point64(0, 0), point64(10, 0));
        assert_eq!((n.x, n.y), (0.0, -1.0));
        let n = unit_normal(point64(0, 0), point64(0, 10));
        assert_eq!((n.x, n.y), (1.0, 0.0));
    }
}
