//! Output ring assembly.
//!
//! Contributing edges append vertices to [OutRec] rings, doubly linked circles of [OutPt] nodes
//! held in arenas on the clipper. Rings that turn out to share an edge are merged through the
//! deferred [Join] list, and `first_left` links record which ring a hole belongs to.

use crate::core::math::{pt2_is_between_pt1_and_pt3, slopes_equal, slopes_equal4, Point64};
use crate::path::{Path64, Paths64};
use crate::polytree::PolyTree;

use super::edge::{HORIZONTAL, UNASSIGNED};
use super::{ClipError, Clipper, Direction, EdgeSide};

/// One vertex on an output ring.
#[derive(Debug, Copy, Clone)]
pub(super) struct OutPt {
    /// Owning [OutRec] arena index.
    pub idx: usize,
    pub pt: Point64,
    pub next: usize,
    pub prev: usize,
}

/// One output ring under construction. `idx` redirects to the surviving ring after a merge, so
/// stale `out_idx` references on edges and points stay resolvable.
#[derive(Debug, Clone)]
pub(super) struct OutRec {
    pub idx: usize,
    pub is_hole: bool,
    pub is_open: bool,
    /// The ring immediately containing this one (its "first left" in sweep order).
    pub first_left: Option<usize>,
    pub pts: Option<usize>,
    pub bottom_pt: Option<usize>,
    pub poly_node: Option<usize>,
}

/// A deferred merge of two output rings known to share the edge toward `off_pt`.
#[derive(Debug, Copy, Clone)]
pub(super) struct Join {
    pub out_pt1: usize,
    pub out_pt2: usize,
    pub off_pt: Point64,
}

/// An output point left behind by a processed horizontal, kept so a later overlapping
/// horizontal can still join with it.
#[derive(Debug, Copy, Clone)]
pub(super) struct GhostJoin {
    pub out_pt: usize,
    pub off_pt: Point64,
}

fn get_dx(pt1: Point64, pt2: Point64) -> f64 {
    if pt1.y == pt2.y {
        HORIZONTAL
    } else {
        (pt2.x - pt1.x) as f64 / (pt2.y - pt1.y) as f64
    }
}

impl Clipper {
    fn create_out_rec(&mut self) -> usize {
        let idx = self.out_recs.len();
        self.out_recs.push(OutRec {
            idx,
            is_hole: false,
            is_open: false,
            first_left: None,
            pts: None,
            bottom_pt: None,
            poly_node: None,
        });
        idx
    }

    /// Resolve an out rec index through merge redirections to the surviving ring.
    fn get_out_rec(&self, idx: usize) -> usize {
        let mut i = idx;
        while self.out_recs[i].idx != i {
            i = self.out_recs[i].idx;
        }
        i
    }

    /// Append `pt` to the ring edge `e` is building, creating the ring if needed. Left-side
    /// edges push to the front of the ring, right-side edges to the back.
    pub(super) fn add_out_pt(&mut self, e: usize, pt: Point64) -> Result<usize, ClipError> {
        if self.edges[e].out_idx < 0 {
            let outrec = self.create_out_rec();
            self.out_recs[outrec].is_open = self.edges[e].wind_delta == 0;
            let op = self.out_pts.len();
            self.out_pts.push(OutPt {
                idx: outrec,
                pt,
                next: op,
                prev: op,
            });
            self.out_recs[outrec].pts = Some(op);
            if !self.out_recs[outrec].is_open {
                self.set_hole_state(e, outrec);
            }
            self.edges[e].out_idx = outrec as isize;
            Ok(op)
        } else {
            let outrec = self.edges[e].out_idx as usize;
            let op = self.out_recs[outrec]
                .pts
                .ok_or(ClipError::InvariantViolated("output ring missing points"))?;
            let to_front = self.edges[e].side == EdgeSide::Left;
            if to_front && pt == self.out_pts[op].pt {
                return Ok(op);
            }
            let prev = self.out_pts[op].prev;
            if !to_front && pt == self.out_pts[prev].pt {
                return Ok(prev);
            }
            let new_op = self.out_pts.len();
            self.out_pts.push(OutPt {
                idx: outrec,
                pt,
                next: op,
                prev,
            });
            self.out_pts[prev].next = new_op;
            self.out_pts[op].prev = new_op;
            if to_front {
                self.out_recs[outrec].pts = Some(new_op);
            }
            Ok(new_op)
        }
    }

    /// A new ring is a hole when an odd number of filled edges lie left of it in the AEL.
    fn set_hole_state(&mut self, e: usize, outrec: usize) {
        let mut e2 = self.edges[e].prev_in_ael;
        let mut e_tmp: Option<usize> = None;
        while let Some(p) = e2 {
            if self.edges[p].out_idx >= 0 && self.edges[p].wind_delta != 0 {
                match e_tmp {
                    None => e_tmp = Some(p),
                    Some(t) => {
                        if self.edges[t].out_idx == self.edges[p].out_idx {
                            e_tmp = None; // paired
                        }
                    }
                }
            }
            e2 = self.edges[p].prev_in_ael;
        }
        match e_tmp {
            None => {
                self.out_recs[outrec].first_left = None;
                self.out_recs[outrec].is_hole = false;
            }
            Some(t) => {
                let fl = self.edges[t].out_idx as usize;
                self.out_recs[outrec].first_left = Some(fl);
                self.out_recs[outrec].is_hole = !self.out_recs[fl].is_hole;
            }
        }
    }

    /// Start a new output ring where bounds `e1` and `e2` meet at a contributing local minimum.
    pub(super) fn add_local_min_poly(
        &mut self,
        e1: usize,
        e2: usize,
        pt: Point64,
    ) -> Result<usize, ClipError> {
        let (result, e, prev_e);
        if self.edges[e2].is_horizontal() || self.edges[e1].dx > self.edges[e2].dx {
            result = self.add_out_pt(e1, pt)?;
            self.edges[e2].out_idx = self.edges[e1].out_idx;
            self.edges[e1].side = EdgeSide::Left;
            self.edges[e2].side = EdgeSide::Right;
            e = e1;
            prev_e = if self.edges[e].prev_in_ael == Some(e2) {
                self.edges[e2].prev_in_ael
            } else {
                self.edges[e].prev_in_ael
            };
        } else {
            result = self.add_out_pt(e2, pt)?;
            self.edges[e1].out_idx = self.edges[e2].out_idx;
            self.edges[e1].side = EdgeSide::Right;
            self.edges[e2].side = EdgeSide::Left;
            e = e2;
            prev_e = if self.edges[e].prev_in_ael == Some(e1) {
                self.edges[e1].prev_in_ael
            } else {
                self.edges[e].prev_in_ael
            };
        }

        if let Some(p) = prev_e {
            if self.edges[p].out_idx >= 0
                && self.edges[p].top.y < pt.y
                && self.edges[e].top.y < pt.y
            {
                let x_prev = self.edges[p].top_x(pt.y);
                let x_e = self.edges[e].top_x(pt.y);
                if x_prev == x_e
                    && self.edges[e].wind_delta != 0
                    && self.edges[p].wind_delta != 0
                    && slopes_equal4(
                        Point64::new(x_prev, pt.y),
                        self.edges[p].top,
                        Point64::new(x_e, pt.y),
                        self.edges[e].top,
                    )
                {
                    let op2 = self.add_out_pt(p, pt)?;
                    let off = self.edges[e].top;
                    self.add_join(result, op2, off);
                }
            }
        }
        Ok(result)
    }

    /// Close (or merge) the rings of bounds `e1` and `e2` meeting at a local maximum.
    pub(super) fn add_local_max_poly(
        &mut self,
        e1: usize,
        e2: usize,
        pt: Point64,
    ) -> Result<(), ClipError> {
        self.add_out_pt(e1, pt)?;
        if self.edges[e2].wind_delta == 0 {
            self.add_out_pt(e2, pt)?;
        }
        if self.edges[e1].out_idx == self.edges[e2].out_idx {
            self.edges[e1].out_idx = UNASSIGNED;
            self.edges[e2].out_idx = UNASSIGNED;
        } else if self.edges[e1].out_idx < self.edges[e2].out_idx {
            self.append_polygon(e1, e2)?;
        } else {
            self.append_polygon(e2, e1)?;
        }
        Ok(())
    }

    /// Splice `e2`'s ring onto `e1`'s, redirecting the obsolete ring to the survivor.
    fn append_polygon(&mut self, e1: usize, e2: usize) -> Result<(), ClipError> {
        let outrec1 = self.edges[e1].out_idx as usize;
        let outrec2 = self.edges[e2].out_idx as usize;
        let hole_state_rec = if self.outrec1_right_of_outrec2(outrec1, outrec2) {
            outrec2
        } else if self.outrec1_right_of_outrec2(outrec2, outrec1) {
            outrec1
        } else {
            self.get_lowermost_rec(outrec1, outrec2)
        };

        let p1_lft = self.out_recs[outrec1]
            .pts
            .ok_or(ClipError::InvariantViolated("append to empty ring"))?;
        let p1_rt = self.out_pts[p1_lft].prev;
        let p2_lft = self.out_recs[outrec2]
            .pts
            .ok_or(ClipError::InvariantViolated("append from empty ring"))?;
        let p2_rt = self.out_pts[p2_lft].prev;

        // join e2's ring onto e1's, keeping the vertices in sweep order
        if self.edges[e1].side == EdgeSide::Left {
            if self.edges[e2].side == EdgeSide::Left {
                self.reverse_out_pt_links(Some(p2_lft));
                self.out_pts[p2_lft].next = p1_lft;
                self.out_pts[p1_lft].prev = p2_lft;
                self.out_pts[p1_rt].next = p2_rt;
                self.out_pts[p2_rt].prev = p1_rt;
                self.out_recs[outrec1].pts = Some(p2_rt);
            } else {
                self.out_pts[p2_rt].next = p1_lft;
                self.out_pts[p1_lft].prev = p2_rt;
                self.out_pts[p2_lft].prev = p1_rt;
                self.out_pts[p1_rt].next = p2_lft;
                self.out_recs[outrec1].pts = Some(p2_lft);
            }
        } else if self.edges[e2].side == EdgeSide::Right {
            self.reverse_out_pt_links(Some(p2_lft));
            self.out_pts[p1_rt].next = p2_rt;
            self.out_pts[p2_rt].prev = p1_rt;
            self.out_pts[p2_lft].next = p1_lft;
            self.out_pts[p1_lft].prev = p2_lft;
        } else {
            self.out_pts[p1_rt].next = p2_lft;
            self.out_pts[p2_lft].prev = p1_rt;
            self.out_pts[p1_lft].prev = p2_rt;
            self.out_pts[p2_rt].next = p1_lft;
        }

        self.out_recs[outrec1].bottom_pt = None;
        if hole_state_rec == outrec2 {
            if self.out_recs[outrec2].first_left != Some(outrec1) {
                self.out_recs[outrec1].first_left = self.out_recs[outrec2].first_left;
            }
            self.out_recs[outrec1].is_hole = self.out_recs[outrec2].is_hole;
        }
        self.out_recs[outrec2].pts = None;
        self.out_recs[outrec2].bottom_pt = None;
        self.out_recs[outrec2].first_left = Some(outrec1);

        let ok_idx = self.edges[e1].out_idx;
        let obsolete_idx = self.edges[e2].out_idx;
        let side = self.edges[e1].side;
        self.edges[e1].out_idx = UNASSIGNED;
        self.edges[e2].out_idx = UNASSIGNED;

        let mut e = self.active_edges;
        while let Some(ei) = e {
            if self.edges[ei].out_idx == obsolete_idx {
                self.edges[ei].out_idx = ok_idx;
                self.edges[ei].side = side;
                break;
            }
            e = self.edges[ei].next_in_ael;
        }
        self.out_recs[outrec2].idx = self.out_recs[outrec1].idx;
        Ok(())
    }

    fn outrec1_right_of_outrec2(&self, outrec1: usize, outrec2: usize) -> bool {
        let mut r = self.out_recs[outrec1].first_left;
        while let Some(i) = r {
            if i == outrec2 {
                return true;
            }
            r = self.out_recs[i].first_left;
        }
        false
    }

    /// Of two rings, the one whose bottom-most vertex is lower (or, on a tie, whose bottom
    /// geometry makes it the outer ring).
    fn get_lowermost_rec(&mut self, outrec1: usize, outrec2: usize) -> usize {
        if self.out_recs[outrec1].bottom_pt.is_none() {
            self.out_recs[outrec1].bottom_pt = self.out_recs[outrec1].pts.map(|p| self.get_bottom_pt(p));
        }
        if self.out_recs[outrec2].bottom_pt.is_none() {
            self.out_recs[outrec2].bottom_pt = self.out_recs[outrec2].pts.map(|p| self.get_bottom_pt(p));
        }
        let (Some(b1), Some(b2)) = (
            self.out_recs[outrec1].bottom_pt,
            self.out_recs[outrec2].bottom_pt,
        ) else {
            return outrec1;
        };
        let p1 = self.out_pts[b1].pt;
        let p2 = self.out_pts[b2].pt;
        if p1.y > p2.y {
            outrec1
        } else if p1.y < p2.y {
            outrec2
        } else if p1.x < p2.x {
            outrec1
        } else if p1.x > p2.x {
            outrec2
        } else if self.out_pts[b1].next == b1 {
            outrec2
        } else if self.out_pts[b2].next == b2 {
            outrec1
        } else if self.first_is_bottom_pt(b1, b2) {
            outrec1
        } else {
            outrec2
        }
    }

    fn get_bottom_pt(&self, start: usize) -> usize {
        let mut pp = start;
        let mut dups: Option<usize> = None;
        let mut p = self.out_pts[start].next;
        while p != pp {
            if self.out_pts[p].pt.y > self.out_pts[pp].pt.y {
                pp = p;
                dups = None;
            } else if self.out_pts[p].pt.y == self.out_pts[pp].pt.y
                && self.out_pts[p].pt.x <= self.out_pts[pp].pt.x
            {
                if self.out_pts[p].pt.x < self.out_pts[pp].pt.x {
                    dups = None;
                    pp = p;
                } else if self.out_pts[p].next != pp && self.out_pts[p].prev != pp {
                    dups = Some(p);
                }
            }
            p = self.out_pts[p].next;
        }
        if let Some(mut d) = dups {
            // several distinct vertices share the bottom position
            while d != p {
                if !self.first_is_bottom_pt(p, d) {
                    pp = d;
                }
                d = self.out_pts[d].next;
                while self.out_pts[d].pt != self.out_pts[pp].pt {
                    d = self.out_pts[d].next;
                }
            }
        }
        pp
    }

    fn first_is_bottom_pt(&self, btm_pt1: usize, btm_pt2: usize) -> bool {
        let mut p = self.out_pts[btm_pt1].prev;
        while self.out_pts[p].pt == self.out_pts[btm_pt1].pt && p != btm_pt1 {
            p = self.out_pts[p].prev;
        }
        let dx1p = get_dx(self.out_pts[btm_pt1].pt, self.out_pts[p].pt).abs();
        let mut p = self.out_pts[btm_pt1].next;
        while self.out_pts[p].pt == self.out_pts[btm_pt1].pt && p != btm_pt1 {
            p = self.out_pts[p].next;
        }
        let dx1n = get_dx(self.out_pts[btm_pt1].pt, self.out_pts[p].pt).abs();
        let mut p = self.out_pts[btm_pt2].prev;
        while self.out_pts[p].pt == self.out_pts[btm_pt2].pt && p != btm_pt2 {
            p = self.out_pts[p].prev;
        }
        let dx2p = get_dx(self.out_pts[btm_pt2].pt, self.out_pts[p].pt).abs();
        let mut p = self.out_pts[btm_pt2].next;
        while self.out_pts[p].pt == self.out_pts[btm_pt2].pt && p != btm_pt2 {
            p = self.out_pts[p].next;
        }
        let dx2n = get_dx(self.out_pts[btm_pt2].pt, self.out_pts[p].pt).abs();

        if dx1p.max(dx1n) == dx2p.max(dx2n) && dx1p.min(dx1n) == dx2p.min(dx2n) {
            self.area_ring(btm_pt1) > 0.0 // a direction tie, use orientation
        } else {
            (dx1p >= dx2p && dx1p >= dx2n) || (dx1n >= dx2p && dx1n >= dx2n)
        }
    }

    fn area_ring(&self, start: usize) -> f64 {
        let mut a = 0.0;
        let mut op = start;
        loop {
            let prev = self.out_pts[op].prev;
            a += (self.out_pts[prev].pt.x + self.out_pts[op].pt.x) as f64
                * (self.out_pts[prev].pt.y - self.out_pts[op].pt.y) as f64;
            op = self.out_pts[op].next;
            if op == start {
                break;
            }
        }
        a * 0.5
    }

    pub(super) fn out_rec_area(&self, outrec: usize) -> f64 {
        match self.out_recs[outrec].pts {
            Some(p) => self.area_ring(p),
            None => 0.0,
        }
    }

    pub(super) fn reverse_out_pt_links(&mut self, pp: Option<usize>) {
        let Some(start) = pp else {
            return;
        };
        let mut pp1 = start;
        loop {
            let pp2 = self.out_pts[pp1].next;
            self.out_pts[pp1].next = self.out_pts[pp1].prev;
            self.out_pts[pp1].prev = pp2;
            pp1 = pp2;
            if pp1 == start {
                break;
            }
        }
    }

    pub(super) fn add_join(&mut self, op1: usize, op2: usize, off_pt: Point64) {
        self.joins.push(Join {
            out_pt1: op1,
            out_pt2: op2,
            off_pt,
        });
    }

    pub(super) fn add_ghost_join(&mut self, op: usize, off_pt: Point64) {
        self.ghost_joins.push(GhostJoin {
            out_pt: op,
            off_pt,
        });
    }

    /// Duplicate a ring vertex, splicing the copy in before or after the original.
    fn dup_out_pt(&mut self, op: usize, insert_after: bool) -> usize {
        let result = self.out_pts.len();
        let pt = self.out_pts[op].pt;
        let idx = self.out_pts[op].idx;
        if insert_after {
            let next = self.out_pts[op].next;
            self.out_pts.push(OutPt {
                idx,
                pt,
                next,
                prev: op,
            });
            self.out_pts[next].prev = result;
            self.out_pts[op].next = result;
        } else {
            let prev = self.out_pts[op].prev;
            self.out_pts.push(OutPt {
                idx,
                pt,
                next: op,
                prev,
            });
            self.out_pts[prev].next = result;
            self.out_pts[op].prev = result;
        }
        result
    }

    fn get_overlap(a1: i64, a2: i64, b1: i64, b2: i64) -> Option<(i64, i64)> {
        let (left, right) = if a1 < a2 {
            if b1 < b2 {
                (a1.max(b1), a2.min(b2))
            } else {
                (a1.max(b2), a2.min(b1))
            }
        } else if b1 < b2 {
            (a2.max(b1), a1.min(b2))
        } else {
            (a2.max(b2), a1.min(b1))
        };
        (left < right).then_some((left, right))
    }

    fn join_horz(
        &mut self,
        mut op1: usize,
        mut op1b: usize,
        mut op2: usize,
        mut op2b: usize,
        pt: Point64,
        discard_left: bool,
    ) -> bool {
        let dir1 = if self.out_pts[op1].pt.x > self.out_pts[op1b].pt.x {
            Direction::RightToLeft
        } else {
            Direction::LeftToRight
        };
        let dir2 = if self.out_pts[op2].pt.x > self.out_pts[op2b].pt.x {
            Direction::RightToLeft
        } else {
            Direction::LeftToRight
        };
        if dir1 == dir2 {
            return false;
        }

        // when discarding the left side op1b must end up left of op1 (and op2b of op2), so
        // everything between them can be dropped
        if dir1 == Direction::LeftToRight {
            while {
                let n = self.out_pts[op1].next;
                self.out_pts[n].pt.x <= pt.x
                    && self.out_pts[n].pt.x >= self.out_pts[op1].pt.x
                    && self.out_pts[n].pt.y == pt.y
            } {
                op1 = self.out_pts[op1].next;
            }
            if discard_left && self.out_pts[op1].pt.x != pt.x {
                op1 = self.out_pts[op1].next;
            }
            op1b = self.dup_out_pt(op1, !discard_left);
            if self.out_pts[op1b].pt != pt {
                op1 = op1b;
                self.out_pts[op1].pt = pt;
                op1b = self.dup_out_pt(op1, !discard_left);
            }
        } else {
            while {
                let n = self.out_pts[op1].next;
                self.out_pts[n].pt.x >= pt.x
                    && self.out_pts[n].pt.x <= self.out_pts[op1].pt.x
                    && self.out_pts[n].pt.y == pt.y
            } {
                op1 = self.out_pts[op1].next;
            }
            if !discard_left && self.out_pts[op1].pt.x != pt.x {
                op1 = self.out_pts[op1].next;
            }
            op1b = self.dup_out_pt(op1, discard_left);
            if self.out_pts[op1b].pt != pt {
                op1 = op1b;
                self.out_pts[op1].pt = pt;
                op1b = self.dup_out_pt(op1, discard_left);
            }
        }

        if dir2 == Direction::LeftToRight {
            while {
                let n = self.out_pts[op2].next;
                self.out_pts[n].pt.x <= pt.x
                    && self.out_pts[n].pt.x >= self.out_pts[op2].pt.x
                    && self.out_pts[n].pt.y == pt.y
            } {
                op2 = self.out_pts[op2].next;
            }
            if discard_left && self.out_pts[op2].pt.x != pt.x {
                op2 = self.out_pts[op2].next;
            }
            op2b = self.dup_out_pt(op2, !discard_left);
            if self.out_pts[op2b].pt != pt {
                op2 = op2b;
                self.out_pts[op2].pt = pt;
                op2b = self.dup_out_pt(op2, !discard_left);
            }
        } else {
            while {
                let n = self.out_pts[op2].next;
                self.out_pts[n].pt.x >= pt.x
                    && self.out_pts[n].pt.x <= self.out_pts[op2].pt.x
                    && self.out_pts[n].pt.y == pt.y
            } {
                op2 = self.out_pts[op2].next;
            }
            if !discard_left && self.out_pts[op2].pt.x != pt.x {
                op2 = self.out_pts[op2].next;
            }
            op2b = self.dup_out_pt(op2, discard_left);
            if self.out_pts[op2b].pt != pt {
                op2 = op2b;
                self.out_pts[op2].pt = pt;
                op2b = self.dup_out_pt(op2, discard_left);
            }
        }

        if (dir1 == Direction::LeftToRight) == discard_left {
            self.out_pts[op1].prev = op2;
            self.out_pts[op2].next = op1;
            self.out_pts[op1b].next = op2b;
            self.out_pts[op2b].prev = op1b;
        } else {
            self.out_pts[op1].next = op2;
            self.out_pts[op2].prev = op1;
            self.out_pts[op1b].prev = op2b;
            self.out_pts[op2b].next = op1b;
        }
        true
    }

    /// Try to stitch the two rings (or ring halves) referenced by join `j` together. On success
    /// the join's out points are updated to the splice vertices.
    fn join_points(&mut self, j: usize, outrec1: usize, outrec2: usize) -> bool {
        let off = self.joins[j].off_pt;
        let mut op1 = self.joins[j].out_pt1;
        let mut op2 = self.joins[j].out_pt2;
        let is_horizontal = self.out_pts[op1].pt.y == off.y;

        if is_horizontal && off == self.out_pts[op1].pt && off == self.out_pts[op2].pt {
            // strictly-simple join: both rings touch at a single vertex
            if outrec1 != outrec2 {
                return false;
            }
            let mut op1b = self.out_pts[op1].next;
            while op1b != op1 && self.out_pts[op1b].pt == off {
                op1b = self.out_pts[op1b].next;
            }
            let reverse1 = self.out_pts[op1b].pt.y > off.y;
            let mut op2b = self.out_pts[op2].next;
            while op2b != op2 && self.out_pts[op2b].pt == off {
                op2b = self.out_pts[op2b].next;
            }
            let reverse2 = self.out_pts[op2b].pt.y > off.y;
            if reverse1 == reverse2 {
                return false;
            }
            if reverse1 {
                let op1b = self.dup_out_pt(op1, false);
                let op2b = self.dup_out_pt(op2, true);
                self.out_pts[op1].prev = op2;
                self.out_pts[op2].next = op1;
                self.out_pts[op1b].next = op2b;
                self.out_pts[op2b].prev = op1b;
                self.joins[j].out_pt1 = op1;
                self.joins[j].out_pt2 = op1b;
            } else {
                let op1b = self.dup_out_pt(op1, true);
                let op2b = self.dup_out_pt(op2, false);
                self.out_pts[op1].next = op2;
                self.out_pts[op2].prev = op1;
                self.out_pts[op1b].prev = op2b;
                self.out_pts[op2b].next = op1b;
                self.joins[j].out_pt1 = op1;
                self.joins[j].out_pt2 = op1b;
            }
            true
        } else if is_horizontal {
            // the rings overlap along a horizontal; find the extent of each flat run first
            let mut op1b = op1;
            while {
                let p = self.out_pts[op1].prev;
                self.out_pts[p].pt.y == self.out_pts[op1].pt.y && p != op1b && p != op2
            } {
                op1 = self.out_pts[op1].prev;
            }
            while {
                let n = self.out_pts[op1b].next;
                self.out_pts[n].pt.y == self.out_pts[op1b].pt.y && n != op1 && n != op2
            } {
                op1b = self.out_pts[op1b].next;
            }
            let n = self.out_pts[op1b].next;
            if n == op1 || n == op2 {
                return false; // a flat ring
            }
            let mut op2b = op2;
            while {
                let p = self.out_pts[op2].prev;
                self.out_pts[p].pt.y == self.out_pts[op2].pt.y && p != op2b && p != op1b
            } {
                op2 = self.out_pts[op2].prev;
            }
            while {
                let n = self.out_pts[op2b].next;
                self.out_pts[n].pt.y == self.out_pts[op2b].pt.y && n != op2 && n != op1
            } {
                op2b = self.out_pts[op2b].next;
            }
            let n = self.out_pts[op2b].next;
            if n == op2 || n == op1 {
                return false;
            }

            let Some((left, right)) = Self::get_overlap(
                self.out_pts[op1].pt.x,
                self.out_pts[op1b].pt.x,
                self.out_pts[op2].pt.x,
                self.out_pts[op2b].pt.x,
            ) else {
                return false;
            };

            // pick the splice point from whichever run endpoint lies inside the overlap
            let (pt, discard_left_side);
            let p1 = self.out_pts[op1].pt;
            let p1b = self.out_pts[op1b].pt;
            let p2 = self.out_pts[op2].pt;
            let p2b = self.out_pts[op2b].pt;
            if p1.x >= left && p1.x <= right {
                pt = p1;
                discard_left_side = p1.x > p1b.x;
            } else if p2.x >= left && p2.x <= right {
                pt = p2;
                discard_left_side = p2.x > p2b.x;
            } else if p1b.x >= left && p1b.x <= right {
                pt = p1b;
                discard_left_side = p1b.x > p1.x;
            } else {
                pt = p2b;
                discard_left_side = p2b.x > p2.x;
            }
            self.joins[j].out_pt1 = op1;
            self.joins[j].out_pt2 = op2;
            self.join_horz(op1, op1b, op2, op2b, pt, discard_left_side)
        } else {
            // non-horizontal join: both rings must leave off_pt along the shared slope and on
            // the same side of it (above, since the join was recorded at a bottom vertex)
            let mut op1b = self.out_pts[op1].next;
            while self.out_pts[op1b].pt == self.out_pts[op1].pt && op1b != op1 {
                op1b = self.out_pts[op1b].next;
            }
            let reverse1 = self.out_pts[op1b].pt.y > self.out_pts[op1].pt.y
                || !slopes_equal(self.out_pts[op1].pt, self.out_pts[op1b].pt, off);
            if reverse1 {
                op1b = self.out_pts[op1].prev;
                while self.out_pts[op1b].pt == self.out_pts[op1].pt && op1b != op1 {
                    op1b = self.out_pts[op1b].prev;
                }
                if self.out_pts[op1b].pt.y > self.out_pts[op1].pt.y
                    || !slopes_equal(self.out_pts[op1].pt, self.out_pts[op1b].pt, off)
                {
                    return false;
                }
            }
            let mut op2b = self.out_pts[op2].next;
            while self.out_pts[op2b].pt == self.out_pts[op2].pt && op2b != op2 {
                op2b = self.out_pts[op2b].next;
            }
            let reverse2 = self.out_pts[op2b].pt.y > self.out_pts[op2].pt.y
                || !slopes_equal(self.out_pts[op2].pt, self.out_pts[op2b].pt, off);
            if reverse2 {
                op2b = self.out_pts[op2].prev;
                while self.out_pts[op2b].pt == self.out_pts[op2].pt && op2b != op2 {
                    op2b = self.out_pts[op2b].prev;
                }
                if self.out_pts[op2b].pt.y > self.out_pts[op2].pt.y
                    || !slopes_equal(self.out_pts[op2].pt, self.out_pts[op2b].pt, off)
                {
                    return false;
                }
            }

            if op1b == op1
                || op2b == op2
                || op1b == op2b
                || (outrec1 == outrec2 && reverse1 == reverse2)
            {
                return false;
            }

            if reverse1 {
                let op1b = self.dup_out_pt(op1, false);
                let op2b = self.dup_out_pt(op2, true);
                self.out_pts[op1].prev = op2;
                self.out_pts[op2].next = op1;
                self.out_pts[op1b].next = op2b;
                self.out_pts[op2b].prev = op1b;
                self.joins[j].out_pt1 = op1;
                self.joins[j].out_pt2 = op1b;
            } else {
                let op1b = self.dup_out_pt(op1, true);
                let op2b = self.dup_out_pt(op2, false);
                self.out_pts[op1].next = op2;
                self.out_pts[op2].prev = op1;
                self.out_pts[op1b].prev = op2b;
                self.out_pts[op2b].next = op1b;
                self.joins[j].out_pt1 = op1;
                self.joins[j].out_pt2 = op1b;
            }
            true
        }
    }

    pub(super) fn join_common_edges(&mut self) {
        for j in 0..self.joins.len() {
            let outrec1 = self.get_out_rec(self.out_pts[self.joins[j].out_pt1].idx);
            let outrec2 = self.get_out_rec(self.out_pts[self.joins[j].out_pt2].idx);
            if self.out_recs[outrec1].pts.is_none() || self.out_recs[outrec2].pts.is_none() {
                continue;
            }
            if self.out_recs[outrec1].is_open || self.out_recs[outrec2].is_open {
                continue;
            }

            // the ring holding the correct hole state must be fixed before joining
            let hole_state_rec = if outrec1 == outrec2 {
                outrec1
            } else if self.outrec1_right_of_outrec2(outrec1, outrec2) {
                outrec2
            } else if self.outrec1_right_of_outrec2(outrec2, outrec1) {
                outrec1
            } else {
                self.get_lowermost_rec(outrec1, outrec2)
            };

            if !self.join_points(j, outrec1, outrec2) {
                continue;
            }

            if outrec1 == outrec2 {
                // the join split one ring into two
                self.out_recs[outrec1].pts = Some(self.joins[j].out_pt1);
                self.out_recs[outrec1].bottom_pt = None;
                let outrec2 = self.create_out_rec();
                self.out_recs[outrec2].pts = Some(self.joins[j].out_pt2);
                self.update_out_pt_idxs(outrec2);

                let pts1 = self.joins[j].out_pt1;
                let pts2 = self.joins[j].out_pt2;
                if self.poly2_contains_poly1(pts2, pts1) {
                    // the new ring is inside the old one
                    self.out_recs[outrec2].is_hole = !self.out_recs[outrec1].is_hole;
                    self.out_recs[outrec2].first_left = Some(outrec1);
                    if self.using_polytree {
                        self.fixup_first_lefts2(outrec2, outrec1);
                    }
                    if (self.out_recs[outrec2].is_hole ^ self.options.reverse_solution)
                        == (self.out_rec_area(outrec2) > 0.0)
                    {
                        let pts = self.out_recs[outrec2].pts;
                        self.reverse_out_pt_links(pts);
                    }
                } else if self.poly2_contains_poly1(pts1, pts2) {
                    // the old ring is inside the new one
                    self.out_recs[outrec2].is_hole = self.out_recs[outrec1].is_hole;
                    self.out_recs[outrec1].is_hole = !self.out_recs[outrec2].is_hole;
                    self.out_recs[outrec2].first_left = self.out_recs[outrec1].first_left;
                    self.out_recs[outrec1].first_left = Some(outrec2);
                    if self.using_polytree {
                        self.fixup_first_lefts2(outrec1, outrec2);
                    }
                    if (self.out_recs[outrec1].is_hole ^ self.options.reverse_solution)
                        == (self.out_rec_area(outrec1) > 0.0)
                    {
                        let pts = self.out_recs[outrec1].pts;
                        self.reverse_out_pt_links(pts);
                    }
                } else {
                    // the two rings are separate
                    self.out_recs[outrec2].is_hole = self.out_recs[outrec1].is_hole;
                    self.out_recs[outrec2].first_left = self.out_recs[outrec1].first_left;
                    if self.using_polytree {
                        self.fixup_first_lefts1(outrec1, outrec2);
                    }
                }
            } else {
                // the join merged two rings into one
                self.out_recs[outrec2].pts = None;
                self.out_recs[outrec2].bottom_pt = None;
                self.out_recs[outrec2].idx = self.out_recs[outrec1].idx;
                self.out_recs[outrec1].is_hole = self.out_recs[hole_state_rec].is_hole;
                if hole_state_rec == outrec2 {
                    self.out_recs[outrec1].first_left = self.out_recs[outrec2].first_left;
                }
                self.out_recs[outrec2].first_left = Some(outrec1);
                if self.using_polytree {
                    self.fixup_first_lefts3(outrec2, outrec1);
                }
            }
        }
    }

    fn update_out_pt_idxs(&mut self, outrec: usize) {
        let Some(start) = self.out_recs[outrec].pts else {
            return;
        };
        let mut op = start;
        loop {
            self.out_pts[op].idx = outrec;
            op = self.out_pts[op].prev;
            if op == start {
                break;
            }
        }
    }

    fn parse_first_left(&self, mut first_left: Option<usize>) -> Option<usize> {
        while let Some(fl) = first_left {
            if self.out_recs[fl].pts.is_some() {
                break;
            }
            first_left = self.out_recs[fl].first_left;
        }
        first_left
    }

    /// A ring split produced a separate new ring: re-point the rings it now contains.
    fn fixup_first_lefts1(&mut self, old_rec: usize, new_rec: usize) {
        for i in 0..self.out_recs.len() {
            let first_left = self.parse_first_left(self.out_recs[i].first_left);
            if self.out_recs[i].pts.is_some() && first_left == Some(old_rec) {
                let pts = self.out_recs[i].pts;
                let new_pts = self.out_recs[new_rec].pts;
                if let (Some(p), Some(np)) = (pts, new_pts) {
                    if self.poly2_contains_poly1(p, np) {
                        self.out_recs[i].first_left = Some(new_rec);
                    }
                }
            }
        }
    }

    /// A ring split left `inner` contained by `outer`: reassign the containment of everything
    /// that referenced either (or the outer's own container).
    fn fixup_first_lefts2(&mut self, inner: usize, outer: usize) {
        let orfl = self.out_recs[outer].first_left;
        for i in 0..self.out_recs.len() {
            if self.out_recs[i].pts.is_none() || i == outer || i == inner {
                continue;
            }
            let first_left = self.parse_first_left(self.out_recs[i].first_left);
            if first_left != orfl && first_left != Some(inner) && first_left != Some(outer) {
                continue;
            }
            let Some(pts) = self.out_recs[i].pts else {
                continue;
            };
            if let Some(ip) = self.out_recs[inner].pts {
                if self.poly2_contains_poly1(pts, ip) {
                    self.out_recs[i].first_left = Some(inner);
                    continue;
                }
            }
            if let Some(op) = self.out_recs[outer].pts {
                if self.poly2_contains_poly1(pts, op) {
                    self.out_recs[i].first_left = Some(outer);
                    continue;
                }
            }
            self.out_recs[i].first_left = orfl;
        }
    }

    /// Two rings merged: anything contained by the obsolete ring now belongs to the survivor.
    fn fixup_first_lefts3(&mut self, old_rec: usize, new_rec: usize) {
        for i in 0..self.out_recs.len() {
            let first_left = self.parse_first_left(self.out_recs[i].first_left);
            if self.out_recs[i].pts.is_some() && first_left == Some(old_rec) {
                self.out_recs[i].first_left = Some(new_rec);
            }
        }
    }

    /// 0 outside, 1 inside, -1 on the ring boundary.
    fn point_in_out_pt_ring(&self, pt: Point64, ring: usize) -> i32 {
        let mut result = 0;
        let start = ring;
        let mut op = ring;
        let (ptx, pty) = (pt.x, pt.y);
        let mut poly0x = self.out_pts[op].pt.x;
        let mut poly0y = self.out_pts[op].pt.y;
        loop {
            op = self.out_pts[op].next;
            let poly1x = self.out_pts[op].pt.x;
            let poly1y = self.out_pts[op].pt.y;
            if poly1y == pty
                && (poly1x == ptx || (poly0y == pty && ((poly1x > ptx) == (poly0x < ptx))))
            {
                return -1;
            }
            if (poly0y < pty) != (poly1y < pty) {
                if poly0x >= ptx {
                    if poly1x > ptx {
                        result = 1 - result;
                    } else {
                        let d = (poly0x - ptx) as f64 * (poly1y - pty) as f64
                            - (poly1x - ptx) as f64 * (poly0y - pty) as f64;
                        if d == 0.0 {
                            return -1;
                        }
                        if (d > 0.0) == (poly1y > poly0y) {
                            result = 1 - result;
                        }
                    }
                } else if poly1x > ptx {
                    let d = (poly0x - ptx) as f64 * (poly1y - pty) as f64
                        - (poly1x - ptx) as f64 * (poly0y - pty) as f64;
                    if d == 0.0 {
                        return -1;
                    }
                    if (d > 0.0) == (poly1y > poly0y) {
                        result = 1 - result;
                    }
                }
            }
            poly0x = poly1x;
            poly0y = poly1y;
            if op == start {
                break;
            }
        }
        result
    }

    /// True when ring 1 lies inside (or entirely on) ring 2.
    fn poly2_contains_poly1(&self, ring1: usize, ring2: usize) -> bool {
        let mut op = ring1;
        loop {
            let res = self.point_in_out_pt_ring(self.out_pts[op].pt, ring2);
            if res >= 0 {
                return res > 0;
            }
            op = self.out_pts[op].next;
            if op == ring1 {
                break;
            }
        }
        true
    }

    /// Remove duplicate vertices and merge collinear edges left behind by the sweep.
    pub(super) fn fixup_out_polygon(&mut self, outrec: usize) {
        let preserve_col = self.options.preserve_collinear || self.options.strictly_simple;
        self.out_recs[outrec].bottom_pt = None;
        let Some(mut pp) = self.out_recs[outrec].pts else {
            return;
        };
        let mut last_ok: Option<usize> = None;
        loop {
            let prev = self.out_pts[pp].prev;
            let next = self.out_pts[pp].next;
            if prev == pp || prev == next {
                self.out_recs[outrec].pts = None;
                return;
            }
            if self.out_pts[pp].pt == self.out_pts[next].pt
                || self.out_pts[pp].pt == self.out_pts[prev].pt
                || (slopes_equal(
                    self.out_pts[prev].pt,
                    self.out_pts[pp].pt,
                    self.out_pts[next].pt,
                ) && (!preserve_col
                    || !pt2_is_between_pt1_and_pt3(
                        self.out_pts[prev].pt,
                        self.out_pts[pp].pt,
                        self.out_pts[next].pt,
                    )))
            {
                last_ok = None;
                self.out_pts[prev].next = next;
                self.out_pts[next].prev = prev;
                pp = prev;
            } else if Some(pp) == last_ok {
                break;
            } else {
                if last_ok.is_none() {
                    last_ok = Some(pp);
                }
                pp = next;
            }
        }
        self.out_recs[outrec].pts = Some(pp);
    }

    /// Remove duplicate vertices from an open polyline result.
    pub(super) fn fixup_out_polyline(&mut self, outrec: usize) {
        let Some(mut pp) = self.out_recs[outrec].pts else {
            return;
        };
        let mut last_pp = self.out_pts[pp].prev;
        while pp != last_pp {
            pp = self.out_pts[pp].next;
            if self.out_pts[pp].pt == self.out_pts[self.out_pts[pp].prev].pt {
                if pp == last_pp {
                    last_pp = self.out_pts[pp].prev;
                }
                let tmp = self.out_pts[pp].prev;
                let next = self.out_pts[pp].next;
                self.out_pts[tmp].next = next;
                self.out_pts[next].prev = tmp;
                pp = tmp;
            }
        }
        if pp == self.out_pts[pp].prev {
            self.out_recs[outrec].pts = None;
        }
    }

    /// Split every ring that touches itself at a vertex into separate simple rings.
    pub(super) fn do_simple_polygons(&mut self) {
        let mut i = 0;
        while i < self.out_recs.len() {
            let outrec = i;
            i += 1;
            let Some(start) = self.out_recs[outrec].pts else {
                continue;
            };
            if self.out_recs[outrec].is_open {
                continue;
            }
            let mut op = start;
            loop {
                let mut op2 = self.out_pts[op].next;
                while Some(op2) != self.out_recs[outrec].pts {
                    if self.out_pts[op].pt == self.out_pts[op2].pt
                        && self.out_pts[op2].next != op
                        && self.out_pts[op2].prev != op
                    {
                        // split the ring in two at the touch point
                        let op3 = self.out_pts[op].prev;
                        let op4 = self.out_pts[op2].prev;
                        self.out_pts[op].prev = op4;
                        self.out_pts[op4].next = op;
                        self.out_pts[op2].prev = op3;
                        self.out_pts[op3].next = op2;
                        self.out_recs[outrec].pts = Some(op);
                        let outrec2 = self.create_out_rec();
                        self.out_recs[outrec2].pts = Some(op2);
                        self.update_out_pt_idxs(outrec2);
                        if self.poly2_contains_poly1(op2, op) {
                            self.out_recs[outrec2].is_hole = !self.out_recs[outrec].is_hole;
                            self.out_recs[outrec2].first_left = Some(outrec);
                            if self.using_polytree {
                                self.fixup_first_lefts2(outrec2, outrec);
                            }
                        } else if self.poly2_contains_poly1(op, op2) {
                            self.out_recs[outrec2].is_hole = self.out_recs[outrec].is_hole;
                            self.out_recs[outrec].is_hole = !self.out_recs[outrec2].is_hole;
                            self.out_recs[outrec2].first_left = self.out_recs[outrec].first_left;
                            self.out_recs[outrec].first_left = Some(outrec2);
                            if self.using_polytree {
                                self.fixup_first_lefts2(outrec, outrec2);
                            }
                        } else {
                            self.out_recs[outrec2].is_hole = self.out_recs[outrec].is_hole;
                            self.out_recs[outrec2].first_left = self.out_recs[outrec].first_left;
                            if self.using_polytree {
                                self.fixup_first_lefts1(outrec, outrec2);
                            }
                        }
                        op2 = op; // restart the inner scan from the split point
                    }
                    op2 = self.out_pts[op2].next;
                }
                op = self.out_pts[op].next;
                if Some(op) == self.out_recs[outrec].pts {
                    break;
                }
            }
        }
    }

    fn point_count(&self, start: usize) -> usize {
        let mut result = 0;
        let mut p = start;
        loop {
            result += 1;
            p = self.out_pts[p].next;
            if p == start {
                break;
            }
        }
        result
    }

    pub(super) fn build_result(&self) -> Paths64 {
        let mut result = Vec::with_capacity(self.out_recs.len());
        for rec in &self.out_recs {
            let Some(pts) = rec.pts else {
                continue;
            };
            let mut p = self.out_pts[pts].prev;
            let cnt = self.point_count(p);
            if cnt < 2 {
                continue;
            }
            let mut path = Path64::with_capacity(cnt);
            for _ in 0..cnt {
                path.push(self.out_pts[p].pt);
                p = self.out_pts[p].prev;
            }
            result.push(path);
        }
        result
    }

    pub(super) fn build_result_tree(&mut self) -> PolyTree {
        let mut tree = PolyTree::new();
        for i in 0..self.out_recs.len() {
            let Some(pts) = self.out_recs[i].pts else {
                continue;
            };
            let cnt = self.point_count(pts);
            if (self.out_recs[i].is_open && cnt < 2) || (!self.out_recs[i].is_open && cnt < 3) {
                continue;
            }
            self.fix_hole_linkage(i);
            let mut polygon = Path64::with_capacity(cnt);
            let mut op = self.out_pts[pts].prev;
            for _ in 0..cnt {
                polygon.push(self.out_pts[op].pt);
                op = self.out_pts[op].prev;
            }
            let node = tree.add_detached(polygon, self.out_recs[i].is_open);
            self.out_recs[i].poly_node = Some(node);
        }
        // link holes under their containing contours, open paths always at the top level
        for i in 0..self.out_recs.len() {
            let Some(node) = self.out_recs[i].poly_node else {
                continue;
            };
            if self.out_recs[i].is_open {
                tree.attach(node, 0);
            } else if let Some(parent) = self
                .out_recs[i]
                .first_left
                .and_then(|fl| self.out_recs[fl].poly_node)
            {
                tree.attach(node, parent);
            } else {
                tree.attach(node, 0);
            }
        }
        tree
    }

    /// Make `first_left` point at the nearest containing ring that still has points and the
    /// opposite hole state.
    fn fix_hole_linkage(&mut self, outrec: usize) {
        let Some(fl) = self.out_recs[outrec].first_left else {
            return;
        };
        if self.out_recs[outrec].is_hole != self.out_recs[fl].is_hole
            && self.out_recs[fl].pts.is_some()
        {
            return;
        }
        let mut orfl = Some(fl);
        while let Some(i) = orfl {
            if self.out_recs[i].is_hole != self.out_recs[outrec].is_hole
                && self.out_recs[i].pts.is_some()
            {
                break;
            }
            orfl = self.out_recs[i].first_left;
        }
        self.out_recs[outrec].first_left = orfl;
    }
}
