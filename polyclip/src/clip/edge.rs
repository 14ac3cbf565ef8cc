//! Edge arena construction.
//!
//! Input paths are decomposed into *bounds*: maximal chains of edges that ascend from a local
//! minimum to a local maximum. Each local minimum owns a left and a right bound, and the sweep
//! activates both bounds when the scan-line reaches the minimum's y. Edges are stored in one
//! arena (`Clipper::edges`) and linked by index.

use crate::core::math::{point64, pt2_is_between_pt1_and_pt3, round_to_i64, slopes_equal, Point64, HI_RANGE};

use super::{ClipError, Clipper, EdgeSide, PathType};

/// `out_idx` value for an edge not currently contributing to any output polygon.
pub(super) const UNASSIGNED: isize = -1;
/// `out_idx` value marking the artificial break at the ends of an open path.
pub(super) const SKIP: isize = -2;

/// Sentinel `dx` for horizontal edges, outside any slope the coordinate range can produce.
pub(super) const HORIZONTAL: f64 = -3.4e38;

#[derive(Debug, Clone)]
pub(super) struct Edge {
    pub bot: Point64,
    /// Position on the current scan-beam.
    pub curr: Point64,
    pub top: Point64,
    pub delta: Point64,
    /// Inverse slope (dx per unit dy), or [HORIZONTAL].
    pub dx: f64,
    pub poly_typ: PathType,
    /// Which side of the output polygon this edge is building.
    pub side: EdgeSide,
    /// 1 or -1 for closed path edges depending on direction, 0 for open paths.
    pub wind_delta: i32,
    pub wind_cnt: i32,
    /// Winding count of the opposite path type.
    pub wind_cnt2: i32,
    pub out_idx: isize,
    pub next: usize,
    pub prev: usize,
    pub next_in_lml: Option<usize>,
    pub next_in_ael: Option<usize>,
    pub prev_in_ael: Option<usize>,
    pub next_in_sel: Option<usize>,
    pub prev_in_sel: Option<usize>,
}

impl Edge {
    fn new() -> Edge {
        Edge {
            bot: Point64::default(),
            curr: Point64::default(),
            top: Point64::default(),
            delta: Point64::default(),
            dx: 0.0,
            poly_typ: PathType::Subject,
            side: EdgeSide::Left,
            wind_delta: 0,
            wind_cnt: 0,
            wind_cnt2: 0,
            out_idx: UNASSIGNED,
            next: 0,
            prev: 0,
            next_in_lml: None,
            next_in_ael: None,
            prev_in_ael: None,
            next_in_sel: None,
            prev_in_sel: None,
        }
    }

    #[inline]
    pub fn is_horizontal(&self) -> bool {
        self.delta.y == 0
    }

    /// X position of this edge at scan-line `current_y`.
    #[inline]
    pub fn top_x(&self, current_y: i64) -> i64 {
        if current_y == self.top.y {
            self.top.x
        } else {
            self.bot.x + round_to_i64(self.dx * (current_y - self.bot.y) as f64)
        }
    }
}

/// A vertex where two bounds start ascending. `left_bound`/`right_bound` may be `None` for open
/// path fragments that only contribute one bound.
#[derive(Debug, Copy, Clone)]
pub(super) struct LocalMinimum {
    pub y: i64,
    pub left_bound: Option<usize>,
    pub right_bound: Option<usize>,
}

impl Clipper {
    pub(super) fn add_path_internal(
        &mut self,
        pg: &[Point64],
        poly_type: PathType,
        closed: bool,
    ) -> Result<bool, ClipError> {
        if pg.is_empty() {
            return Ok(false);
        }
        let mut high_i = pg.len() - 1;
        if closed {
            while high_i > 0 && pg[high_i] == pg[0] {
                high_i -= 1;
            }
        }
        while high_i > 0 && pg[high_i] == pg[high_i - 1] {
            high_i -= 1;
        }
        if (closed && high_i < 2) || (!closed && high_i < 1) {
            return Ok(false);
        }
        for pt in &pg[..=high_i] {
            if pt.x.abs() > HI_RANGE || pt.y.abs() > HI_RANGE {
                return Err(ClipError::CoordinateOutOfRange);
            }
        }

        // allocate this path's edges as one circularly linked arena block
        let base = self.edges.len();
        let cnt = high_i + 1;
        for (i, &pt) in pg[..=high_i].iter().enumerate() {
            let mut e = Edge::new();
            e.curr = pt;
            e.next = base + (i + 1) % cnt;
            e.prev = base + (i + cnt - 1) % cnt;
            self.edges.push(e);
        }

        // strip duplicate vertices, and collinear ones when permitted
        let mut e_start = base;
        let mut e = e_start;
        let mut loop_stop = e_start;
        loop {
            let next = self.edges[e].next;
            if self.edges[e].curr == self.edges[next].curr && (closed || next != e_start) {
                if e == next {
                    break;
                }
                if e == e_start {
                    e_start = next;
                }
                e = self.remove_edge(e);
                loop_stop = e;
                continue;
            }
            let prev = self.edges[e].prev;
            if prev == next {
                break; // only two vertices remain
            }
            if closed
                && slopes_equal(
                    self.edges[prev].curr,
                    self.edges[e].curr,
                    self.edges[next].curr,
                )
                && (!self.options.preserve_collinear
                    || !pt2_is_between_pt1_and_pt3(
                        self.edges[prev].curr,
                        self.edges[e].curr,
                        self.edges[next].curr,
                    ))
            {
                if e == e_start {
                    e_start = next;
                }
                let n = self.remove_edge(e);
                e = self.edges[n].prev;
                loop_stop = e;
                continue;
            }
            e = self.edges[e].next;
            if e == loop_stop || (!closed && self.edges[e].next == e_start) {
                break;
            }
        }

        {
            let e_next = self.edges[e].next;
            let e_prev = self.edges[e].prev;
            if (!closed && e == e_next) || (closed && e_prev == e_next) {
                return Ok(false);
            }
        }

        if !closed {
            self.has_open_paths = true;
            let sp = self.edges[e_start].prev;
            self.edges[sp].out_idx = SKIP;
        }

        // assign bot/top/dx and detect completely flat paths
        let mut is_flat = true;
        let mut e = e_start;
        loop {
            self.init_edge2(e, poly_type);
            e = self.edges[e].next;
            if is_flat && self.edges[e].curr.y != self.edges[e_start].curr.y {
                is_flat = false;
            }
            if e == e_start {
                break;
            }
        }

        if is_flat {
            // a flat closed path encloses nothing; a flat open path is a single right bound
            if closed {
                return Ok(false);
            }
            let ep = self.edges[e].prev;
            self.edges[ep].out_idx = SKIP;
            let lm = LocalMinimum {
                y: self.edges[e].bot.y,
                left_bound: None,
                right_bound: Some(e),
            };
            self.edges[e].side = EdgeSide::Right;
            self.edges[e].wind_delta = 0;
            let mut e2 = e;
            loop {
                let prev = self.edges[e2].prev;
                if self.edges[e2].bot.x != self.edges[prev].top.x {
                    self.reverse_horizontal(e2);
                }
                let next = self.edges[e2].next;
                if self.edges[next].out_idx == SKIP {
                    break;
                }
                self.edges[e2].next_in_lml = Some(next);
                e2 = next;
            }
            self.insert_local_minimum(lm);
            return Ok(true);
        }

        let mut e_min: Option<usize> = None;
        {
            // avoid starting the minima search on a zero length edge
            let ep = self.edges[e].prev;
            if self.edges[ep].bot == self.edges[ep].top {
                e = self.edges[e].next;
            }
        }
        loop {
            e = self.find_next_loc_min(e);
            if Some(e) == e_min {
                break;
            }
            if e_min.is_none() {
                e_min = Some(e);
            }

            // the edge with the smaller dx is the left bound (dx increases rightward below a
            // local minimum)
            let prev = self.edges[e].prev;
            let (left, right, left_forward) = if self.edges[e].dx < self.edges[prev].dx {
                (prev, e, false)
            } else {
                (e, prev, true)
            };
            self.edges[left].side = EdgeSide::Left;
            self.edges[right].side = EdgeSide::Right;
            let wd = if !closed {
                0
            } else if self.edges[left].next == right {
                -1
            } else {
                1
            };
            self.edges[left].wind_delta = wd;
            self.edges[right].wind_delta = -wd;
            let mut lm = LocalMinimum {
                y: self.edges[e].bot.y,
                left_bound: Some(left),
                right_bound: Some(right),
            };

            e = self.process_bound(left, left_forward);
            if self.edges[e].out_idx == SKIP {
                e = self.process_bound(e, left_forward);
            }
            let mut e2 = self.process_bound(right, !left_forward);
            if self.edges[e2].out_idx == SKIP {
                e2 = self.process_bound(e2, !left_forward);
            }

            if self.edges[left].out_idx == SKIP {
                lm.left_bound = None;
            } else if self.edges[right].out_idx == SKIP {
                lm.right_bound = None;
            }
            self.insert_local_minimum(lm);
            if !left_forward {
                e = e2;
            }
        }
        Ok(true)
    }

    fn init_edge2(&mut self, e: usize, poly_type: PathType) {
        let next = self.edges[e].next;
        let curr = self.edges[e].curr;
        let next_curr = self.edges[next].curr;
        if curr.y >= next_curr.y {
            self.edges[e].bot = curr;
            self.edges[e].top = next_curr;
        } else {
            self.edges[e].top = curr;
            self.edges[e].bot = next_curr;
        }
        self.set_dx(e);
        self.edges[e].poly_typ = poly_type;
    }

    fn set_dx(&mut self, e: usize) {
        let edge = &mut self.edges[e];
        edge.delta = point64(edge.top.x - edge.bot.x, edge.top.y - edge.bot.y);
        edge.dx = if edge.delta.y == 0 {
            HORIZONTAL
        } else {
            edge.delta.x as f64 / edge.delta.y as f64
        };
    }

    /// Unlink `e` from its path chain and return the following edge.
    fn remove_edge(&mut self, e: usize) -> usize {
        let prev = self.edges[e].prev;
        let next = self.edges[e].next;
        self.edges[prev].next = next;
        self.edges[next].prev = prev;
        next
    }

    /// Swap bot.x and top.x so a horizontal edge is traversed in bound order.
    fn reverse_horizontal(&mut self, e: usize) {
        let edge = &mut self.edges[e];
        std::mem::swap(&mut edge.bot.x, &mut edge.top.x);
    }

    fn find_next_loc_min(&self, mut e: usize) -> usize {
        loop {
            loop {
                let prev = self.edges[e].prev;
                if self.edges[e].bot != self.edges[prev].bot
                    || self.edges[e].curr == self.edges[e].top
                {
                    e = self.edges[e].next;
                } else {
                    break;
                }
            }
            let prev = self.edges[e].prev;
            if self.edges[e].dx != HORIZONTAL && self.edges[prev].dx != HORIZONTAL {
                break;
            }
            // horizontals at a minimum: back up to the start of the run, then decide which end
            // is the true minimum vertex
            while self.edges[self.edges[e].prev].dx == HORIZONTAL {
                e = self.edges[e].prev;
            }
            let e2 = e;
            while self.edges[e].dx == HORIZONTAL {
                e = self.edges[e].next;
            }
            if self.edges[e].top.y == self.edges[self.edges[e].prev].bot.y {
                continue; // just an intermediate horizontal
            }
            if self.edges[self.edges[e2].prev].bot.x < self.edges[e].bot.x {
                e = e2;
            }
            break;
        }
        e
    }

    /// Walk one bound from its minimum to its maximum, chaining `next_in_lml` links and fixing
    /// horizontal edge orientation. Returns the first edge beyond the bound.
    fn process_bound(&mut self, mut e: usize, left_forward: bool) -> usize {
        let mut result = e;

        if self.edges[result].out_idx == SKIP {
            // the bound starts with a skip edge (open path end); if edges beyond it still climb
            // they form a new pseudo-minimum
            e = result;
            if left_forward {
                while self.edges[e].top.y == self.edges[self.edges[e].next].bot.y {
                    e = self.edges[e].next;
                }
                while e != result && self.edges[e].dx == HORIZONTAL {
                    e = self.edges[e].prev;
                }
            } else {
                while self.edges[e].top.y == self.edges[self.edges[e].prev].bot.y {
                    e = self.edges[e].prev;
                }
                while e != result && self.edges[e].dx == HORIZONTAL {
                    e = self.edges[e].next;
                }
            }
            if e == result {
                result = if left_forward {
                    self.edges[e].next
                } else {
                    self.edges[e].prev
                };
            } else {
                e = if left_forward {
                    self.edges[result].next
                } else {
                    self.edges[result].prev
                };
                let lm = LocalMinimum {
                    y: self.edges[e].bot.y,
                    left_bound: None,
                    right_bound: Some(e),
                };
                self.edges[e].wind_delta = 0;
                result = self.process_bound(e, left_forward);
                self.insert_local_minimum(lm);
            }
            return result;
        }

        let mut e_start;
        if self.edges[e].dx == HORIZONTAL {
            // with open paths this may not be a true local minimum, so align the horizontal with
            // whichever neighbor actually precedes it
            e_start = if left_forward {
                self.edges[e].prev
            } else {
                self.edges[e].next
            };
            if self.edges[e_start].dx == HORIZONTAL {
                if self.edges[e_start].bot.x != self.edges[e].bot.x
                    && self.edges[e_start].top.x != self.edges[e].bot.x
                {
                    self.reverse_horizontal(e);
                }
            } else if self.edges[e_start].bot.x != self.edges[e].bot.x {
                self.reverse_horizontal(e);
            }
        }

        e_start = e;
        if left_forward {
            loop {
                let next = self.edges[result].next;
                if self.edges[result].top.y == self.edges[next].bot.y
                    && self.edges[next].out_idx != SKIP
                {
                    result = next;
                } else {
                    break;
                }
            }
            if self.edges[result].dx == HORIZONTAL
                && self.edges[self.edges[result].next].out_idx != SKIP
            {
                // horizontals at a bound top belong to the bound whose following edge starts
                // further along; back up over the run to test
                let mut horz = result;
                while self.edges[self.edges[horz].prev].dx == HORIZONTAL {
                    horz = self.edges[horz].prev;
                }
                let horz_prev = self.edges[horz].prev;
                if self.edges[horz_prev].top.x > self.edges[self.edges[result].next].top.x {
                    result = horz_prev;
                }
            }
            while e != result {
                self.edges[e].next_in_lml = Some(self.edges[e].next);
                if self.edges[e].dx == HORIZONTAL
                    && e != e_start
                    && self.edges[e].bot.x != self.edges[self.edges[e].prev].top.x
                {
                    self.reverse_horizontal(e);
                }
                e = self.edges[e].next;
            }
            if self.edges[e].dx == HORIZONTAL
                && e != e_start
                && self.edges[e].bot.x != self.edges[self.edges[e].prev].top.x
            {
                self.reverse_horizontal(e);
            }
            result = self.edges[result].next;
        } else {
            loop {
                let prev = self.edges[result].prev;
                if self.edges[result].top.y == self.edges[prev].bot.y
                    && self.edges[prev].out_idx != SKIP
                {
                    result = prev;
                } else {
                    break;
                }
            }
            if self.edges[result].dx == HORIZONTAL
                && self.edges[self.edges[result].prev].out_idx != SKIP
            {
                let mut horz = result;
                while self.edges[self.edges[horz].next].dx == HORIZONTAL {
                    horz = self.edges[horz].next;
                }
                let horz_next = self.edges[horz].next;
                let result_prev = self.edges[result].prev;
                if self.edges[horz_next].top.x >= self.edges[result_prev].top.x {
                    result = horz_next;
                }
            }
            while e != result {
                self.edges[e].next_in_lml = Some(self.edges[e].prev);
                if self.edges[e].dx == HORIZONTAL
                    && e != e_start
                    && self.edges[e].bot.x != self.edges[self.edges[e].next].top.x
                {
                    self.reverse_horizontal(e);
                }
                e = self.edges[e].prev;
            }
            if self.edges[e].dx == HORIZONTAL
                && e != e_start
                && self.edges[e].bot.x != self.edges[self.edges[e].next].top.x
            {
                self.reverse_horizontal(e);
            }
            result = self.edges[result].prev;
        }
        result
    }

    fn insert_local_minimum(&mut self, lm: LocalMinimum) {
        // list kept sorted by descending y; a new minimum at an existing y goes first
        let pos = self.minima.partition_point(|m| m.y > lm.y);
        self.minima.insert(pos, lm);
    }

    pub(super) fn pop_local_minimum(&mut self, y: i64) -> Option<LocalMinimum> {
        if self.current_lm < self.minima.len() && self.minima[self.current_lm].y == y {
            let lm = self.minima[self.current_lm];
            self.current_lm += 1;
            Some(lm)
        } else {
            None
        }
    }

    #[inline]
    pub(super) fn local_minima_pending(&self) -> bool {
        self.current_lm < self.minima.len()
    }

    /// Prepare the sweep state for a fresh execution over the retained edge graph.
    pub(super) fn reset_sweep(&mut self) {
        self.current_lm = 0;
        self.scanbeam.clear();
        self.active_edges = None;
        self.sorted_edges = None;
        self.maxima.clear();
        for i in 0..self.minima.len() {
            let lm = self.minima[i];
            self.scanbeam.insert(lm.y);
            if let Some(e) = lm.left_bound {
                self.edges[e].curr = self.edges[e].bot;
                self.edges[e].side = EdgeSide::Left;
                self.edges[e].out_idx = UNASSIGNED;
            }
            if let Some(e) = lm.right_bound {
                self.edges[e].curr = self.edges[e].bot;
                self.edges[e].side = EdgeSide::Right;
                self.edges[e].out_idx = UNASSIGNED;
            }
        }
    }

    #[inline]
    pub(super) fn insert_scanbeam(&mut self, y: i64) {
        self.scanbeam.insert(y);
    }

    /// Pop the bottom-most (largest y) pending scan-beam.
    #[inline]
    pub(super) fn pop_scanbeam(&mut self) -> Option<i64> {
        self.scanbeam.pop_last()
    }

    pub(super) fn delete_from_ael(&mut self, e: usize) {
        let prev = self.edges[e].prev_in_ael;
        let next = self.edges[e].next_in_ael;
        if prev.is_none() && next.is_none() && Some(e) != self.active_edges {
            return; // already deleted
        }
        match prev {
            Some(p) => self.edges[p].next_in_ael = next,
            None => self.active_edges = next,
        }
        if let Some(n) = next {
            self.edges[n].prev_in_ael = prev;
        }
        self.edges[e].next_in_ael = None;
        self.edges[e].prev_in_ael = None;
    }

    /// Replace an edge that has reached its top with its successor in the bound, keeping the
    /// AEL position and winding state. Returns the successor's index.
    pub(super) fn update_edge_into_ael(&mut self, e: usize) -> Result<usize, ClipError> {
        let next_lml = self.edges[e]
            .next_in_lml
            .ok_or(ClipError::InvariantViolated("edge has no successor in bound"))?;
        let ael_prev = self.edges[e].prev_in_ael;
        let ael_next = self.edges[e].next_in_ael;
        self.edges[next_lml].out_idx = self.edges[e].out_idx;
        match ael_prev {
            Some(p) => self.edges[p].next_in_ael = Some(next_lml),
            None => self.active_edges = Some(next_lml),
        }
        if let Some(n) = ael_next {
            self.edges[n].prev_in_ael = Some(next_lml);
        }
        let (side, wind_delta, wind_cnt, wind_cnt2) = {
            let old = &self.edges[e];
            (old.side, old.wind_delta, old.wind_cnt, old.wind_cnt2)
        };
        let new = &mut self.edges[next_lml];
        new.side = side;
        new.wind_delta = wind_delta;
        new.wind_cnt = wind_cnt;
        new.wind_cnt2 = wind_cnt2;
        new.curr = new.bot;
        new.prev_in_ael = ael_prev;
        new.next_in_ael = ael_next;
        if !new.is_horizontal() {
            let y = new.top.y;
            self.insert_scanbeam(y);
        }
        Ok(next_lml)
    }

    pub(super) fn get_maxima_pair(&self, e: usize) -> Option<usize> {
        let next = self.edges[e].next;
        if self.edges[next].top == self.edges[e].top && self.edges[next].next_in_lml.is_none() {
            return Some(next);
        }
        let prev = self.edges[e].prev;
        if self.edges[prev].top == self.edges[e].top && self.edges[prev].next_in_lml.is_none() {
            return Some(prev);
        }
        None
    }

    /// As [get_maxima_pair](Clipper::get_maxima_pair) but only when the pair is still usable in
    /// the AEL.
    pub(super) fn get_maxima_pair_ex(&self, e: usize) -> Option<usize> {
        let result = self.get_maxima_pair(e)?;
        let r = &self.edges[result];
        if r.out_idx == SKIP || (r.next_in_ael == r.prev_in_ael && !r.is_horizontal()) {
            return None;
        }
        Some(result)
    }

    /// Record a maxima x position (duplicates ignored, list kept sorted ascending).
    pub(super) fn insert_maxima(&mut self, x: i64) {
        if let Err(pos) = self.maxima.binary_search(&x) {
            self.maxima.insert(pos, x);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clip::Clipper;

    #[test]
    fn square_builds_one_minimum() {
        let mut c = Clipper::new();
        let square = vec![
            point64(0, 0),
            point64(10, 0),
            point64(10, 10),
            point64(0, 10),
        ];
        assert_eq!(c.add_path_internal(&square, PathType::Subject, true), Ok(true));
        assert_eq!(c.minima.len(), 1);
        // the bottom of the square (largest y) is the minimum
        assert_eq!(c.minima[0].y, 10);
        let lm = c.minima[0];
        let left = lm.left_bound.unwrap();
        let right = lm.right_bound.unwrap();
        assert_eq!(c.edges[left].wind_delta, -c.edges[right].wind_delta);
    }

    #[test]
    fn degenerate_paths_ignored() {
        let mut c = Clipper::new();
        let dup = vec![point64(3, 3), point64(3, 3), point64(3, 3), point64(3, 3)];
        assert_eq!(c.add_path_internal(&dup, PathType::Subject, true), Ok(false));
        let flat = vec![point64(0, 0), point64(5, 0), point64(9, 0)];
        assert_eq!(c.add_path_internal(&flat, PathType::Subject, true), Ok(false));
        assert!(c.minima.is_empty());
    }

    #[test]
    fn open_path_flags_clipper() {
        let mut c = Clipper::new();
        let line = vec![point64(0, 0), point64(10, 5), point64(20, 0)];
        assert_eq!(c.add_path_internal(&line, PathType::Subject, false), Ok(true));
        assert!(c.has_open_paths);
        // open path edges carry no winding
        for lm in &c.minima {
            if let Some(e) = lm.right_bound {
                assert_eq!(c.edges[e].wind_delta, 0);
            }
        }
    }

    #[test]
    fn out_of_range_rejected() {
        let mut c = Clipper::new();
        let bad = vec![
            point64(0, 0),
            point64(HI_RANGE + 1, 0),
            point64(0, 10),
        ];
        assert_eq!(
            c.add_path_internal(&bad, PathType::Subject, true),
            Err(ClipError::CoordinateOutOfRange)
        );
    }
}
