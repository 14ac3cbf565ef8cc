//! Boolean clipping engine.
//!
//! [Clipper] sweeps a scan-line across the combined subject and clip edge sets, maintaining
//! winding counts on every active edge, and stitches the contributing edge fragments into result
//! polygons. All four boolean operations and all four fill rules share the single sweep, only
//! the edge contribution test differs.
//!
//! The sweep advances from the bottom of the coordinate space upward, where *larger* y values
//! are lower (screen orientation). Every edge is stored with `bot.y >= top.y`.

mod edge;
mod output;
mod sweep;

use std::collections::BTreeSet;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::core::math::Point64;
use crate::path::{Path64, Paths64};
use crate::polytree::PolyTree;

use edge::{Edge, LocalMinimum};
use output::{GhostJoin, Join, OutPt, OutRec};
use sweep::IntersectNode;

/// Boolean operation applied between the subject and clip path sets.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ClipType {
    Intersection,
    Union,
    Difference,
    Xor,
}

/// Rule deciding which regions of a self intersecting or overlapping path set are filled.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FillRule {
    EvenOdd,
    NonZero,
    /// Filled where the winding count is greater than zero.
    Positive,
    /// Filled where the winding count is less than zero.
    Negative,
}

/// Role of a path in the boolean operation.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PathType {
    Subject,
    Clip,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum EdgeSide {
    Left,
    Right,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum Direction {
    LeftToRight,
    RightToLeft,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum ExecuteState {
    Idle,
    Sweeping,
}

/// Failure modes of [Clipper] operations.
///
/// All variants except [ClipError::InvariantViolated] are recoverable: the input was rejected or
/// the operation gave up cleanly, and the clipper remains usable. `InvariantViolated` indicates
/// an internal sweep inconsistency, output from that execution must be discarded.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ClipError {
    /// An execution is already in progress on this clipper.
    Busy,
    /// The subject set contains open paths, which can only be returned through
    /// [Clipper::execute_tree].
    OpenPathsNeedTree,
    /// Open paths may only be added as [PathType::Subject].
    OpenPathsMustBeSubject,
    /// A coordinate magnitude exceeds [crate::core::math::HI_RANGE].
    CoordinateOutOfRange,
    /// The intersection ordering pass could not restore edge adjacency (caused by extreme
    /// near-degenerate input).
    IntersectionOrder,
    /// Internal sweep state became inconsistent.
    InvariantViolated(&'static str),
}

impl ClipError {
    /// True when the clipper is still usable after this error.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, ClipError::InvariantViolated(_))
    }
}

impl fmt::Display for ClipError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClipError::Busy => write!(f, "clipper is already executing"),
            ClipError::OpenPathsNeedTree => {
                write!(f, "open paths require tree output, use execute_tree")
            }
            ClipError::OpenPathsMustBeSubject => {
                write!(f, "open paths may only be added as subject paths")
            }
            ClipError::CoordinateOutOfRange => {
                write!(f, "coordinate outside the permitted range")
            }
            ClipError::IntersectionOrder => {
                write!(f, "failed to order scan-beam intersections")
            }
            ClipError::InvariantViolated(what) => write!(f, "internal state error: {}", what),
        }
    }
}

impl std::error::Error for ClipError {}

/// Behavior toggles for [Clipper], fixed at construction.
#[derive(Debug, Copy, Clone, Default)]
pub struct ClipperOptions {
    /// Emit outer contours clockwise and holes counter clockwise (the reverse of the default).
    pub reverse_solution: bool,
    /// Post-process the solution so no returned polygon self intersects or touches itself at a
    /// vertex (costs an extra pass).
    pub strictly_simple: bool,
    /// Keep collinear input vertices instead of merging the segments they sit on.
    pub preserve_collinear: bool,
}

/// Polygon boolean clipping engine.
///
/// Add subject and clip paths with [add_path](Clipper::add_path) /
/// [add_paths](Clipper::add_paths), then run [execute](Clipper::execute) (or
/// [execute_tree](Clipper::execute_tree) for nested/open results). The added paths are retained
/// so the same input can be executed repeatedly with different operations or fill rules.
pub struct Clipper {
    options: ClipperOptions,

    // input edge graph, rebuilt only by add_path/clear
    edges: Vec<Edge>,
    minima: Vec<LocalMinimum>,
    has_open_paths: bool,

    // per-execution sweep state
    state: ExecuteState,
    clip_type: ClipType,
    subj_fill: FillRule,
    clip_fill: FillRule,
    using_polytree: bool,
    current_lm: usize,
    scanbeam: BTreeSet<i64>,
    maxima: Vec<i64>,
    active_edges: Option<usize>,
    sorted_edges: Option<usize>,
    intersect_list: Vec<IntersectNode>,
    joins: Vec<Join>,
    ghost_joins: Vec<GhostJoin>,
    out_recs: Vec<OutRec>,
    out_pts: Vec<OutPt>,
}

impl Default for Clipper {
    fn default() -> Self {
        Self::new()
    }
}

impl Clipper {
    pub fn new() -> Self {
        Self::with_options(ClipperOptions::default())
    }

    pub fn with_options(options: ClipperOptions) -> Self {
        Clipper {
            options,
            edges: Vec::new(),
            minima: Vec::new(),
            has_open_paths: false,
            state: ExecuteState::Idle,
            clip_type: ClipType::Intersection,
            subj_fill: FillRule::EvenOdd,
            clip_fill: FillRule::EvenOdd,
            using_polytree: false,
            current_lm: 0,
            scanbeam: BTreeSet::new(),
            maxima: Vec::new(),
            active_edges: None,
            sorted_edges: None,
            intersect_list: Vec::new(),
            joins: Vec::new(),
            ghost_joins: Vec::new(),
            out_recs: Vec::new(),
            out_pts: Vec::new(),
        }
    }

    /// Add one path. Closed paths become polygon boundaries, open paths (subject only) are
    /// clipped as polylines and never contribute filling.
    ///
    /// Returns `Ok(false)` when the path is degenerate after duplicate/collinear removal (fewer
    /// than 3 distinct vertices closed, 2 open) and was ignored.
    pub fn add_path(
        &mut self,
        path: &[Point64],
        poly_type: PathType,
        closed: bool,
    ) -> Result<bool, ClipError> {
        if !closed && poly_type == PathType::Clip {
            return Err(ClipError::OpenPathsMustBeSubject);
        }
        self.add_path_internal(path, poly_type, closed)
    }

    /// [add_path](Clipper::add_path) over a batch, returns `Ok(true)` when at least one path was
    /// accepted.
    pub fn add_paths(
        &mut self,
        paths: &[Path64],
        poly_type: PathType,
        closed: bool,
    ) -> Result<bool, ClipError> {
        let mut result = false;
        for path in paths {
            if self.add_path(path, poly_type, closed)? {
                result = true;
            }
        }
        Ok(result)
    }

    /// Remove all added paths.
    pub fn clear(&mut self) {
        self.edges.clear();
        self.minima.clear();
        self.current_lm = 0;
        self.has_open_paths = false;
    }

    /// Run the boolean operation and return the flat solution paths.
    ///
    /// Fails with [ClipError::OpenPathsNeedTree] when open subject paths were added, those can
    /// only be returned through [execute_tree](Clipper::execute_tree).
    pub fn execute(
        &mut self,
        clip_type: ClipType,
        subj_fill: FillRule,
        clip_fill: FillRule,
    ) -> Result<Paths64, ClipError> {
        if self.state != ExecuteState::Idle {
            return Err(ClipError::Busy);
        }
        if self.has_open_paths {
            return Err(ClipError::OpenPathsNeedTree);
        }
        self.begin_execute(clip_type, subj_fill, clip_fill, false);
        let result = self.execute_internal();
        let solution = match result {
            Ok(()) => Ok(self.build_result()),
            Err(e) => Err(e),
        };
        self.end_execute();
        solution
    }

    /// Run the boolean operation and return the solution as a nested [PolyTree], preserving
    /// hole relationships and any clipped open paths.
    pub fn execute_tree(
        &mut self,
        clip_type: ClipType,
        subj_fill: FillRule,
        clip_fill: FillRule,
    ) -> Result<PolyTree, ClipError> {
        if self.state != ExecuteState::Idle {
            return Err(ClipError::Busy);
        }
        self.begin_execute(clip_type, subj_fill, clip_fill, true);
        let result = self.execute_internal();
        let solution = match result {
            Ok(()) => Ok(self.build_result_tree()),
            Err(e) => Err(e),
        };
        self.end_execute();
        solution
    }

    fn begin_execute(
        &mut self,
        clip_type: ClipType,
        subj_fill: FillRule,
        clip_fill: FillRule,
        using_polytree: bool,
    ) {
        self.state = ExecuteState::Sweeping;
        self.clip_type = clip_type;
        self.subj_fill = subj_fill;
        self.clip_fill = clip_fill;
        self.using_polytree = using_polytree;
    }

    fn end_execute(&mut self) {
        self.joins.clear();
        self.ghost_joins.clear();
        self.intersect_list.clear();
        self.out_recs.clear();
        self.out_pts.clear();
        self.state = ExecuteState::Idle;
    }
}

/// Remove self intersections from a single closed path by unioning it with itself under
/// `fill_rule`. May return multiple paths (e.g. a bow-tie splits into two triangles).
pub fn simplify_polygon(path: &[Point64], fill_rule: FillRule) -> Result<Paths64, ClipError> {
    let mut clipper = Clipper::with_options(ClipperOptions {
        strictly_simple: true,
        ..Default::default()
    });
    clipper.add_path(path, PathType::Subject, true)?;
    clipper.execute(ClipType::Union, fill_rule, fill_rule)
}

/// [simplify_polygon] over a batch of paths unioned together.
pub fn simplify_polygons(paths: &[Path64], fill_rule: FillRule) -> Result<Paths64, ClipError> {
    let mut clipper = Clipper::with_options(ClipperOptions {
        strictly_simple: true,
        ..Default::default()
    });
    clipper.add_paths(paths, PathType::Subject, true)?;
    clipper.execute(ClipType::Union, fill_rule, fill_rule)
}

fn minkowski(pattern: &[Point64], path: &[Point64], is_sum: bool, is_closed: bool) -> Paths64 {
    let delta = usize::from(is_closed);
    let poly_cnt = pattern.len();
    let path_cnt = path.len();
    if path_cnt == 0 || poly_cnt == 0 {
        return Paths64::new();
    }
    let mut translated: Paths64 = Vec::with_capacity(path_cnt);
    for &path_pt in path {
        let p: Path64 = pattern
            .iter()
            .map(|&ip| {
                if is_sum {
                    path_pt + ip
                } else {
                    path_pt - ip
                }
            })
            .collect();
        translated.push(p);
    }

    let mut quads: Paths64 = Vec::with_capacity((path_cnt + delta) * (poly_cnt + 1));
    for i in 0..path_cnt - 1 + delta {
        for j in 0..poly_cnt {
            let mut quad = vec![
                translated[i % path_cnt][j % poly_cnt],
                translated[(i + 1) % path_cnt][j % poly_cnt],
                translated[(i + 1) % path_cnt][(j + 1) % poly_cnt],
                translated[i % path_cnt][(j + 1) % poly_cnt],
            ];
            if !crate::path::orientation(&quad) {
                quad.reverse();
            }
            quads.push(quad);
        }
    }
    quads
}

/// Minkowski sum of `pattern` swept along `path`, returned as a merged polygon set.
pub fn minkowski_sum(
    pattern: &[Point64],
    path: &[Point64],
    path_is_closed: bool,
) -> Result<Paths64, ClipError> {
    let quads = minkowski(pattern, path, true, path_is_closed);
    let mut clipper = Clipper::new();
    clipper.add_paths(&quads, PathType::Subject, true)?;
    clipper.execute(ClipType::Union, FillRule::NonZero, FillRule::NonZero)
}

/// Minkowski difference of the two polygons.
pub fn minkowski_diff(poly1: &[Point64], poly2: &[Point64]) -> Result<Paths64, ClipError> {
    let quads = minkowski(poly1, poly2, false, true);
    let mut clipper = Clipper::new();
    clipper.add_paths(&quads, PathType::Subject, true)?;
    clipper.execute(ClipType::Union, FillRule::NonZero, FillRule::NonZero)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_classes() {
        assert!(ClipError::Busy.is_recoverable());
        assert!(ClipError::OpenPathsNeedTree.is_recoverable());
        assert!(ClipError::CoordinateOutOfRange.is_recoverable());
        assert!(ClipError::IntersectionOrder.is_recoverable());
        assert!(!ClipError::InvariantViolated("test").is_recoverable());
    }

    #[test]
    fn open_clip_path_rejected() {
        let mut clipper = Clipper::new();
        let line = vec![
            crate::core::math::point64(0, 0),
            crate::core::math::point64(10, 0),
        ];
        assert_eq!(
            clipper.add_path(&line, PathType::Clip, false),
            Err(ClipError::OpenPathsMustBeSubject)
        );
    }
}
