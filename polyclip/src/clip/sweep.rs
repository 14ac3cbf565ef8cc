//! The scan-beam sweep: activating bounds at local minima, maintaining winding counts across the
//! active edge list (AEL), resolving edge crossings inside each beam, and closing bounds at
//! maxima.

use crate::core::math::{point64, round_to_i64, slopes_equal4, Point64};

use super::edge::UNASSIGNED;
use super::{ClipError, ClipType, Clipper, Direction, EdgeSide, FillRule, PathType};

/// A crossing of two active edges inside the current scan-beam.
#[derive(Debug, Copy, Clone)]
pub(super) struct IntersectNode {
    pub edge1: usize,
    pub edge2: usize,
    pub pt: Point64,
}

impl Clipper {
    pub(super) fn execute_internal(&mut self) -> Result<(), ClipError> {
        self.reset_sweep();
        self.joins.clear();
        self.ghost_joins.clear();

        let Some(bot_y) = self.pop_scanbeam() else {
            return Ok(());
        };
        self.insert_local_minima_into_ael(bot_y)?;
        while let Some(top_y) = self.pop_scanbeam() {
            self.process_horizontals()?;
            self.ghost_joins.clear();
            self.process_intersections(top_y)?;
            self.process_edges_at_top(top_y)?;
            self.insert_local_minima_into_ael(top_y)?;
        }

        // orient rings: holes wind opposite to outers
        for i in 0..self.out_recs.len() {
            let rec = &self.out_recs[i];
            if rec.pts.is_none() || rec.is_open {
                continue;
            }
            if (rec.is_hole ^ self.options.reverse_solution) == (self.out_rec_area(i) > 0.0) {
                let pts = self.out_recs[i].pts;
                self.reverse_out_pt_links(pts);
            }
        }

        self.join_common_edges();

        for i in 0..self.out_recs.len() {
            if self.out_recs[i].pts.is_none() {
                continue;
            }
            if self.out_recs[i].is_open {
                self.fixup_out_polyline(i);
            } else {
                self.fixup_out_polygon(i);
            }
        }

        if self.options.strictly_simple {
            self.do_simple_polygons();
        }
        Ok(())
    }

    fn insert_local_minima_into_ael(&mut self, bot_y: i64) -> Result<(), ClipError> {
        while let Some(lm) = self.pop_local_minimum(bot_y) {
            let lb = lm.left_bound;
            let rb = lm.right_bound;

            let mut op1: Option<usize> = None;
            match (lb, rb) {
                (None, Some(rb)) => {
                    self.insert_edge_into_ael(rb, None);
                    self.set_winding_count(rb);
                    if self.is_contributing(rb) {
                        let pt = self.edges[rb].bot;
                        op1 = Some(self.add_out_pt(rb, pt)?);
                    }
                }
                (Some(lb), None) => {
                    self.insert_edge_into_ael(lb, None);
                    self.set_winding_count(lb);
                    if self.is_contributing(lb) {
                        let pt = self.edges[lb].bot;
                        op1 = Some(self.add_out_pt(lb, pt)?);
                    }
                    let y = self.edges[lb].top.y;
                    self.insert_scanbeam(y);
                }
                (Some(lb), Some(rb)) => {
                    self.insert_edge_into_ael(lb, None);
                    self.insert_edge_into_ael(rb, Some(lb));
                    self.set_winding_count(lb);
                    self.edges[rb].wind_cnt = self.edges[lb].wind_cnt;
                    self.edges[rb].wind_cnt2 = self.edges[lb].wind_cnt2;
                    if self.is_contributing(lb) {
                        let pt = self.edges[lb].bot;
                        op1 = Some(self.add_local_min_poly(lb, rb, pt)?);
                    }
                    let y = self.edges[lb].top.y;
                    self.insert_scanbeam(y);
                }
                (None, None) => continue,
            }

            if let Some(rb) = rb {
                if self.edges[rb].is_horizontal() {
                    if let Some(nl) = self.edges[rb].next_in_lml {
                        let y = self.edges[nl].top.y;
                        self.insert_scanbeam(y);
                    }
                    self.add_edge_to_sel(rb);
                } else {
                    let y = self.edges[rb].top.y;
                    self.insert_scanbeam(y);
                }
            }

            let (Some(lb), Some(rb)) = (lb, rb) else {
                continue;
            };

            // if this bound starts on a horizontal that overlaps an earlier one the output
            // polygons will share an edge and need joining later
            if let Some(op1_idx) = op1 {
                if self.edges[rb].is_horizontal()
                    && !self.ghost_joins.is_empty()
                    && self.edges[rb].wind_delta != 0
                {
                    for i in 0..self.ghost_joins.len() {
                        let gj = self.ghost_joins[i];
                        let gj_x = self.out_pts[gj.out_pt].pt.x;
                        if Self::horz_segments_overlap(
                            gj_x,
                            gj.off_pt.x,
                            self.edges[rb].bot.x,
                            self.edges[rb].top.x,
                        ) {
                            self.add_join(gj.out_pt, op1_idx, gj.off_pt);
                        }
                    }
                }
            }

            if self.edges[lb].out_idx >= 0 {
                if let Some(prev) = self.edges[lb].prev_in_ael {
                    if self.edges[prev].curr.x == self.edges[lb].bot.x
                        && self.edges[prev].out_idx >= 0
                        && slopes_equal4(
                            self.edges[prev].curr,
                            self.edges[prev].top,
                            self.edges[lb].curr,
                            self.edges[lb].top,
                        )
                        && self.edges[lb].wind_delta != 0
                        && self.edges[prev].wind_delta != 0
                    {
                        let pt = self.edges[lb].bot;
                        let op2 = self.add_out_pt(prev, pt)?;
                        if let Some(op1_idx) = op1 {
                            let off = self.edges[lb].top;
                            self.add_join(op1_idx, op2, off);
                        }
                    }
                }
            }

            if self.edges[lb].next_in_ael != Some(rb) {
                if self.edges[rb].out_idx >= 0 {
                    if let Some(rp) = self.edges[rb].prev_in_ael {
                        if self.edges[rp].out_idx >= 0
                            && slopes_equal4(
                                self.edges[rp].curr,
                                self.edges[rp].top,
                                self.edges[rb].curr,
                                self.edges[rb].top,
                            )
                            && self.edges[rb].wind_delta != 0
                            && self.edges[rp].wind_delta != 0
                        {
                            let pt = self.edges[rb].bot;
                            let op2 = self.add_out_pt(rp, pt)?;
                            if let Some(op1_idx) = op1 {
                                let off = self.edges[rb].top;
                                self.add_join(op1_idx, op2, off);
                            }
                        }
                    }
                }
                let mut e = self.edges[lb].next_in_ael;
                while let Some(ei) = e {
                    if ei == rb {
                        break;
                    }
                    // the intersection order matters for winding bookkeeping: rb is to the
                    // right of ei above the minimum's vertex
                    let pt = self.edges[lb].curr;
                    self.intersect_edges(rb, ei, pt)?;
                    e = self.edges[ei].next_in_ael;
                }
            }
        }
        Ok(())
    }

    fn e2_inserts_before_e1(&self, e1: usize, e2: usize) -> bool {
        let e1 = &self.edges[e1];
        let e2 = &self.edges[e2];
        if e2.curr.x == e1.curr.x {
            if e2.top.y > e1.top.y {
                e2.top.x < e1.top_x(e2.top.y)
            } else {
                e1.top.x > e2.top_x(e1.top.y)
            }
        } else {
            e2.curr.x < e1.curr.x
        }
    }

    fn insert_edge_into_ael(&mut self, edge: usize, start_edge: Option<usize>) {
        match self.active_edges {
            None => {
                self.edges[edge].prev_in_ael = None;
                self.edges[edge].next_in_ael = None;
                self.active_edges = Some(edge);
            }
            Some(head) => {
                if start_edge.is_none() && self.e2_inserts_before_e1(head, edge) {
                    self.edges[edge].prev_in_ael = None;
                    self.edges[edge].next_in_ael = Some(head);
                    self.edges[head].prev_in_ael = Some(edge);
                    self.active_edges = Some(edge);
                } else {
                    let mut start = start_edge.unwrap_or(head);
                    while let Some(next) = self.edges[start].next_in_ael {
                        if self.e2_inserts_before_e1(next, edge) {
                            break;
                        }
                        start = next;
                    }
                    let next = self.edges[start].next_in_ael;
                    self.edges[edge].next_in_ael = next;
                    if let Some(n) = next {
                        self.edges[n].prev_in_ael = Some(edge);
                    }
                    self.edges[edge].prev_in_ael = Some(start);
                    self.edges[start].next_in_ael = Some(edge);
                }
            }
        }
    }

    fn is_even_odd_fill_type(&self, edge: usize) -> bool {
        match self.edges[edge].poly_typ {
            PathType::Subject => self.subj_fill == FillRule::EvenOdd,
            PathType::Clip => self.clip_fill == FillRule::EvenOdd,
        }
    }

    fn is_even_odd_alt_fill_type(&self, edge: usize) -> bool {
        match self.edges[edge].poly_typ {
            PathType::Subject => self.clip_fill == FillRule::EvenOdd,
            PathType::Clip => self.subj_fill == FillRule::EvenOdd,
        }
    }

    fn set_winding_count(&mut self, edge: usize) {
        // find the nearest preceding AEL edge of the same path type that carries winding
        let mut prev = self.edges[edge].prev_in_ael;
        while let Some(p) = prev {
            if self.edges[p].poly_typ == self.edges[edge].poly_typ
                && self.edges[p].wind_delta != 0
            {
                break;
            }
            prev = self.edges[p].prev_in_ael;
        }

        let mut e = match prev {
            None => {
                let pft = match self.edges[edge].poly_typ {
                    PathType::Subject => self.subj_fill,
                    PathType::Clip => self.clip_fill,
                };
                self.edges[edge].wind_cnt = if self.edges[edge].wind_delta == 0 {
                    if pft == FillRule::Negative {
                        -1
                    } else {
                        1
                    }
                } else {
                    self.edges[edge].wind_delta
                };
                self.edges[edge].wind_cnt2 = 0;
                self.active_edges // ready to compute wind_cnt2 from the AEL start
            }
            Some(p) => {
                if self.edges[edge].wind_delta == 0 && self.clip_type != ClipType::Union {
                    self.edges[edge].wind_cnt = 1;
                    self.edges[edge].wind_cnt2 = self.edges[p].wind_cnt2;
                    self.edges[p].next_in_ael
                } else if self.is_even_odd_fill_type(edge) {
                    if self.edges[edge].wind_delta == 0 {
                        // is this open edge inside a same-type polygon?
                        let mut inside = true;
                        let mut e2 = self.edges[p].prev_in_ael;
                        while let Some(i2) = e2 {
                            if self.edges[i2].poly_typ == self.edges[p].poly_typ
                                && self.edges[i2].wind_delta != 0
                            {
                                inside = !inside;
                            }
                            e2 = self.edges[i2].prev_in_ael;
                        }
                        self.edges[edge].wind_cnt = i32::from(!inside);
                    } else {
                        self.edges[edge].wind_cnt = self.edges[edge].wind_delta;
                    }
                    self.edges[edge].wind_cnt2 = self.edges[p].wind_cnt2;
                    self.edges[p].next_in_ael
                } else {
                    let prev_cnt = self.edges[p].wind_cnt;
                    let prev_delta = self.edges[p].wind_delta;
                    let wd = self.edges[edge].wind_delta;
                    self.edges[edge].wind_cnt = if prev_cnt * prev_delta < 0 {
                        // previous edge winds the count back toward zero
                        if prev_cnt.abs() > 1 {
                            if prev_delta * wd < 0 {
                                prev_cnt
                            } else {
                                prev_cnt + wd
                            }
                        } else if wd == 0 {
                            1
                        } else {
                            wd
                        }
                    } else {
                        // previous edge winds the count away from zero
                        if wd == 0 {
                            if prev_cnt < 0 {
                                prev_cnt - 1
                            } else {
                                prev_cnt + 1
                            }
                        } else if prev_delta * wd < 0 {
                            prev_cnt
                        } else {
                            prev_cnt + wd
                        }
                    };
                    self.edges[edge].wind_cnt2 = self.edges[p].wind_cnt2;
                    self.edges[p].next_in_ael
                }
            }
        };

        // accumulate the opposite type's winding into wind_cnt2
        if self.is_even_odd_alt_fill_type(edge) {
            while let Some(ei) = e {
                if ei == edge {
                    break;
                }
                if self.edges[ei].wind_delta != 0 {
                    self.edges[edge].wind_cnt2 = i32::from(self.edges[edge].wind_cnt2 == 0);
                }
                e = self.edges[ei].next_in_ael;
            }
        } else {
            while let Some(ei) = e {
                if ei == edge {
                    break;
                }
                self.edges[edge].wind_cnt2 += self.edges[ei].wind_delta;
                e = self.edges[ei].next_in_ael;
            }
        }
    }

    fn is_contributing(&self, edge: usize) -> bool {
        let e = &self.edges[edge];
        let (pft, pft2) = match e.poly_typ {
            PathType::Subject => (self.subj_fill, self.clip_fill),
            PathType::Clip => (self.clip_fill, self.subj_fill),
        };
        match pft {
            FillRule::EvenOdd => {
                // open subject lines flagged as inside a subject polygon don't contribute
                if e.wind_delta == 0 && e.wind_cnt != 1 {
                    return false;
                }
            }
            FillRule::NonZero => {
                if e.wind_cnt.abs() != 1 {
                    return false;
                }
            }
            FillRule::Positive => {
                if e.wind_cnt != 1 {
                    return false;
                }
            }
            FillRule::Negative => {
                if e.wind_cnt != -1 {
                    return false;
                }
            }
        }
        match self.clip_type {
            ClipType::Intersection => match pft2 {
                FillRule::EvenOdd | FillRule::NonZero => e.wind_cnt2 != 0,
                FillRule::Positive => e.wind_cnt2 > 0,
                FillRule::Negative => e.wind_cnt2 < 0,
            },
            ClipType::Union => match pft2 {
                FillRule::EvenOdd | FillRule::NonZero => e.wind_cnt2 == 0,
                FillRule::Positive => e.wind_cnt2 <= 0,
                FillRule::Negative => e.wind_cnt2 >= 0,
            },
            ClipType::Difference => {
                if e.poly_typ == PathType::Subject {
                    match pft2 {
                        FillRule::EvenOdd | FillRule::NonZero => e.wind_cnt2 == 0,
                        FillRule::Positive => e.wind_cnt2 <= 0,
                        FillRule::Negative => e.wind_cnt2 >= 0,
                    }
                } else {
                    match pft2 {
                        FillRule::EvenOdd | FillRule::NonZero => e.wind_cnt2 != 0,
                        FillRule::Positive => e.wind_cnt2 > 0,
                        FillRule::Negative => e.wind_cnt2 < 0,
                    }
                }
            }
            ClipType::Xor => {
                if e.wind_delta == 0 {
                    match pft2 {
                        FillRule::EvenOdd | FillRule::NonZero => e.wind_cnt2 == 0,
                        FillRule::Positive => e.wind_cnt2 <= 0,
                        FillRule::Negative => e.wind_cnt2 >= 0,
                    }
                } else {
                    true
                }
            }
        }
    }

    fn swap_sides(&mut self, e1: usize, e2: usize) {
        let side = self.edges[e1].side;
        self.edges[e1].side = self.edges[e2].side;
        self.edges[e2].side = side;
    }

    fn swap_poly_indexes(&mut self, e1: usize, e2: usize) {
        let out_idx = self.edges[e1].out_idx;
        self.edges[e1].out_idx = self.edges[e2].out_idx;
        self.edges[e2].out_idx = out_idx;
    }

    /// Resolve a crossing of two active edges. `e1` must be left of `e2` below the intersection
    /// point.
    fn intersect_edges(&mut self, e1: usize, e2: usize, pt: Point64) -> Result<(), ClipError> {
        let e1_contributing = self.edges[e1].out_idx >= 0;
        let e2_contributing = self.edges[e2].out_idx >= 0;

        // open paths are never filled, they only toggle output at crossings
        if self.edges[e1].wind_delta == 0 || self.edges[e2].wind_delta == 0 {
            if self.edges[e1].wind_delta == 0 && self.edges[e2].wind_delta == 0 {
                return Ok(());
            }
            if self.edges[e1].poly_typ == self.edges[e2].poly_typ
                && self.edges[e1].wind_delta != self.edges[e2].wind_delta
                && self.clip_type == ClipType::Union
            {
                if self.edges[e1].wind_delta == 0 {
                    if e2_contributing {
                        self.add_out_pt(e1, pt)?;
                        if e1_contributing {
                            self.edges[e1].out_idx = UNASSIGNED;
                        }
                    }
                } else if e1_contributing {
                    self.add_out_pt(e2, pt)?;
                    if e2_contributing {
                        self.edges[e2].out_idx = UNASSIGNED;
                    }
                }
            } else if self.edges[e1].poly_typ != self.edges[e2].poly_typ {
                if self.edges[e1].wind_delta == 0
                    && self.edges[e2].wind_cnt.abs() == 1
                    && (self.clip_type != ClipType::Union || self.edges[e2].wind_cnt2 == 0)
                {
                    self.add_out_pt(e1, pt)?;
                    if e1_contributing {
                        self.edges[e1].out_idx = UNASSIGNED;
                    }
                } else if self.edges[e2].wind_delta == 0
                    && self.edges[e1].wind_cnt.abs() == 1
                    && (self.clip_type != ClipType::Union || self.edges[e1].wind_cnt2 == 0)
                {
                    self.add_out_pt(e2, pt)?;
                    if e2_contributing {
                        self.edges[e2].out_idx = UNASSIGNED;
                    }
                }
            }
            return Ok(());
        }

        // update winding counts across the crossing
        if self.edges[e1].poly_typ == self.edges[e2].poly_typ {
            if self.is_even_odd_fill_type(e1) {
                let old = self.edges[e1].wind_cnt;
                self.edges[e1].wind_cnt = self.edges[e2].wind_cnt;
                self.edges[e2].wind_cnt = old;
            } else {
                if self.edges[e1].wind_cnt + self.edges[e2].wind_delta == 0 {
                    self.edges[e1].wind_cnt = -self.edges[e1].wind_cnt;
                } else {
                    self.edges[e1].wind_cnt += self.edges[e2].wind_delta;
                }
                if self.edges[e2].wind_cnt - self.edges[e1].wind_delta == 0 {
                    self.edges[e2].wind_cnt = -self.edges[e2].wind_cnt;
                } else {
                    self.edges[e2].wind_cnt -= self.edges[e1].wind_delta;
                }
            }
        } else {
            if !self.is_even_odd_fill_type(e2) {
                self.edges[e1].wind_cnt2 += self.edges[e2].wind_delta;
            } else {
                self.edges[e1].wind_cnt2 = i32::from(self.edges[e1].wind_cnt2 == 0);
            }
            if !self.is_even_odd_fill_type(e1) {
                self.edges[e2].wind_cnt2 -= self.edges[e1].wind_delta;
            } else {
                self.edges[e2].wind_cnt2 = i32::from(self.edges[e2].wind_cnt2 == 0);
            }
        }

        let (e1_fill, e1_fill2) = match self.edges[e1].poly_typ {
            PathType::Subject => (self.subj_fill, self.clip_fill),
            PathType::Clip => (self.clip_fill, self.subj_fill),
        };
        let (e2_fill, e2_fill2) = match self.edges[e2].poly_typ {
            PathType::Subject => (self.subj_fill, self.clip_fill),
            PathType::Clip => (self.clip_fill, self.subj_fill),
        };

        let e1_wc = match e1_fill {
            FillRule::Positive => self.edges[e1].wind_cnt,
            FillRule::Negative => -self.edges[e1].wind_cnt,
            _ => self.edges[e1].wind_cnt.abs(),
        };
        let e2_wc = match e2_fill {
            FillRule::Positive => self.edges[e2].wind_cnt,
            FillRule::Negative => -self.edges[e2].wind_cnt,
            _ => self.edges[e2].wind_cnt.abs(),
        };

        if e1_contributing && e2_contributing {
            if (e1_wc != 0 && e1_wc != 1)
                || (e2_wc != 0 && e2_wc != 1)
                || (self.edges[e1].poly_typ != self.edges[e2].poly_typ
                    && self.clip_type != ClipType::Xor)
            {
                self.add_local_max_poly(e1, e2, pt)?;
            } else {
                self.add_out_pt(e1, pt)?;
                self.add_out_pt(e2, pt)?;
                self.swap_sides(e1, e2);
                self.swap_poly_indexes(e1, e2);
            }
        } else if e1_contributing {
            if e2_wc == 0 || e2_wc == 1 {
                self.add_out_pt(e1, pt)?;
                self.swap_sides(e1, e2);
                self.swap_poly_indexes(e1, e2);
            }
        } else if e2_contributing {
            if e1_wc == 0 || e1_wc == 1 {
                self.add_out_pt(e2, pt)?;
                self.swap_sides(e1, e2);
                self.swap_poly_indexes(e1, e2);
            }
        } else if (e1_wc == 0 || e1_wc == 1) && (e2_wc == 0 || e2_wc == 1) {
            // neither edge is currently contributing
            let e1_wc2 = match e1_fill2 {
                FillRule::Positive => self.edges[e1].wind_cnt2,
                FillRule::Negative => -self.edges[e1].wind_cnt2,
                _ => self.edges[e1].wind_cnt2.abs(),
            };
            let e2_wc2 = match e2_fill2 {
                FillRule::Positive => self.edges[e2].wind_cnt2,
                FillRule::Negative => -self.edges[e2].wind_cnt2,
                _ => self.edges[e2].wind_cnt2.abs(),
            };

            if self.edges[e1].poly_typ != self.edges[e2].poly_typ {
                self.add_local_min_poly(e1, e2, pt)?;
            } else if e1_wc == 1 && e2_wc == 1 {
                match self.clip_type {
                    ClipType::Intersection => {
                        if e1_wc2 > 0 && e2_wc2 > 0 {
                            self.add_local_min_poly(e1, e2, pt)?;
                        }
                    }
                    ClipType::Union => {
                        if e1_wc2 <= 0 && e2_wc2 <= 0 {
                            self.add_local_min_poly(e1, e2, pt)?;
                        }
                    }
                    ClipType::Difference => {
                        if (self.edges[e1].poly_typ == PathType::Clip
                            && e1_wc2 > 0
                            && e2_wc2 > 0)
                            || (self.edges[e1].poly_typ == PathType::Subject
                                && e1_wc2 <= 0
                                && e2_wc2 <= 0)
                        {
                            self.add_local_min_poly(e1, e2, pt)?;
                        }
                    }
                    ClipType::Xor => {
                        self.add_local_min_poly(e1, e2, pt)?;
                    }
                }
            } else {
                self.swap_sides(e1, e2);
            }
        }
        Ok(())
    }

    fn swap_positions_in_ael(&mut self, e1: usize, e2: usize) {
        // bail if either edge was already removed from the AEL
        if self.edges[e1].next_in_ael == self.edges[e1].prev_in_ael
            || self.edges[e2].next_in_ael == self.edges[e2].prev_in_ael
        {
            return;
        }
        if self.edges[e1].next_in_ael == Some(e2) {
            let next = self.edges[e2].next_in_ael;
            if let Some(n) = next {
                self.edges[n].prev_in_ael = Some(e1);
            }
            let prev = self.edges[e1].prev_in_ael;
            if let Some(p) = prev {
                self.edges[p].next_in_ael = Some(e2);
            }
            self.edges[e2].prev_in_ael = prev;
            self.edges[e2].next_in_ael = Some(e1);
            self.edges[e1].prev_in_ael = Some(e2);
            self.edges[e1].next_in_ael = next;
        } else if self.edges[e2].next_in_ael == Some(e1) {
            let next = self.edges[e1].next_in_ael;
            if let Some(n) = next {
                self.edges[n].prev_in_ael = Some(e2);
            }
            let prev = self.edges[e2].prev_in_ael;
            if let Some(p) = prev {
                self.edges[p].next_in_ael = Some(e1);
            }
            self.edges[e1].prev_in_ael = prev;
            self.edges[e1].next_in_ael = Some(e2);
            self.edges[e2].prev_in_ael = Some(e1);
            self.edges[e2].next_in_ael = next;
        } else {
            let next = self.edges[e1].next_in_ael;
            let prev = self.edges[e1].prev_in_ael;
            self.edges[e1].next_in_ael = self.edges[e2].next_in_ael;
            if let Some(n) = self.edges[e1].next_in_ael {
                self.edges[n].prev_in_ael = Some(e1);
            }
            self.edges[e1].prev_in_ael = self.edges[e2].prev_in_ael;
            if let Some(p) = self.edges[e1].prev_in_ael {
                self.edges[p].next_in_ael = Some(e1);
            }
            self.edges[e2].next_in_ael = next;
            if let Some(n) = next {
                self.edges[n].prev_in_ael = Some(e2);
            }
            self.edges[e2].prev_in_ael = prev;
            if let Some(p) = prev {
                self.edges[p].next_in_ael = Some(e2);
            }
        }
        if self.edges[e1].prev_in_ael.is_none() {
            self.active_edges = Some(e1);
        } else if self.edges[e2].prev_in_ael.is_none() {
            self.active_edges = Some(e2);
        }
    }

    fn swap_positions_in_sel(&mut self, e1: usize, e2: usize) {
        if self.edges[e1].next_in_sel.is_none() && self.edges[e1].prev_in_sel.is_none() {
            return;
        }
        if self.edges[e2].next_in_sel.is_none() && self.edges[e2].prev_in_sel.is_none() {
            return;
        }
        if self.edges[e1].next_in_sel == Some(e2) {
            let next = self.edges[e2].next_in_sel;
            if let Some(n) = next {
                self.edges[n].prev_in_sel = Some(e1);
            }
            let prev = self.edges[e1].prev_in_sel;
            if let Some(p) = prev {
                self.edges[p].next_in_sel = Some(e2);
            }
            self.edges[e2].prev_in_sel = prev;
            self.edges[e2].next_in_sel = Some(e1);
            self.edges[e1].prev_in_sel = Some(e2);
            self.edges[e1].next_in_sel = next;
        } else if self.edges[e2].next_in_sel == Some(e1) {
            let next = self.edges[e1].next_in_sel;
            if let Some(n) = next {
                self.edges[n].prev_in_sel = Some(e2);
            }
            let prev = self.edges[e2].prev_in_sel;
            if let Some(p) = prev {
                self.edges[p].next_in_sel = Some(e1);
            }
            self.edges[e1].prev_in_sel = prev;
            self.edges[e1].next_in_sel = Some(e2);
            self.edges[e2].prev_in_sel = Some(e1);
            self.edges[e2].next_in_sel = next;
        } else {
            let next = self.edges[e1].next_in_sel;
            let prev = self.edges[e1].prev_in_sel;
            self.edges[e1].next_in_sel = self.edges[e2].next_in_sel;
            if let Some(n) = self.edges[e1].next_in_sel {
                self.edges[n].prev_in_sel = Some(e1);
            }
            self.edges[e1].prev_in_sel = self.edges[e2].prev_in_sel;
            if let Some(p) = self.edges[e1].prev_in_sel {
                self.edges[p].next_in_sel = Some(e1);
            }
            self.edges[e2].next_in_sel = next;
            if let Some(n) = next {
                self.edges[n].prev_in_sel = Some(e2);
            }
            self.edges[e2].prev_in_sel = prev;
            if let Some(p) = prev {
                self.edges[p].next_in_sel = Some(e2);
            }
        }
        if self.edges[e1].prev_in_sel.is_none() {
            self.sorted_edges = Some(e1);
        } else if self.edges[e2].prev_in_sel.is_none() {
            self.sorted_edges = Some(e2);
        }
    }

    fn add_edge_to_sel(&mut self, e: usize) {
        // the SEL is used as a FILO stack of horizontals
        self.edges[e].prev_in_sel = None;
        self.edges[e].next_in_sel = self.sorted_edges;
        if let Some(s) = self.sorted_edges {
            self.edges[s].prev_in_sel = Some(e);
        }
        self.sorted_edges = Some(e);
    }

    fn pop_edge_from_sel(&mut self) -> Option<usize> {
        let e = self.sorted_edges?;
        let next = self.edges[e].next_in_sel;
        if let Some(n) = next {
            self.edges[n].prev_in_sel = None;
        }
        self.sorted_edges = next;
        self.edges[e].next_in_sel = None;
        self.edges[e].prev_in_sel = None;
        Some(e)
    }

    fn copy_ael_to_sel(&mut self) {
        self.sorted_edges = self.active_edges;
        let mut e = self.active_edges;
        while let Some(ei) = e {
            self.edges[ei].prev_in_sel = self.edges[ei].prev_in_ael;
            self.edges[ei].next_in_sel = self.edges[ei].next_in_ael;
            e = self.edges[ei].next_in_ael;
        }
    }

    fn get_next_in_ael(&self, e: usize, dir: Direction) -> Option<usize> {
        if dir == Direction::LeftToRight {
            self.edges[e].next_in_ael
        } else {
            self.edges[e].prev_in_ael
        }
    }

    fn get_horz_direction(&self, e: usize) -> (Direction, i64, i64) {
        let edge = &self.edges[e];
        if edge.bot.x < edge.top.x {
            (Direction::LeftToRight, edge.bot.x, edge.top.x)
        } else {
            (Direction::RightToLeft, edge.top.x, edge.bot.x)
        }
    }

    fn horz_segments_overlap(seg1a: i64, seg1b: i64, seg2a: i64, seg2b: i64) -> bool {
        let (a1, a2) = if seg1a > seg1b {
            (seg1b, seg1a)
        } else {
            (seg1a, seg1b)
        };
        let (b1, b2) = if seg2a > seg2b {
            (seg2b, seg2a)
        } else {
            (seg2a, seg2b)
        };
        a1 < b2 && b1 < a2
    }

    fn slopes_equal_edges(&self, e1: usize, e2: usize) -> bool {
        let d1 = self.edges[e1].delta;
        let d2 = self.edges[e2].delta;
        (d1.y as i128) * (d2.x as i128) == (d1.x as i128) * (d2.y as i128)
    }

    fn process_horizontals(&mut self) -> Result<(), ClipError> {
        while let Some(horz) = self.pop_edge_from_sel() {
            self.process_horizontal(horz)?;
        }
        Ok(())
    }

    /// Sweep one horizontal edge (and any consecutive horizontals in its bound) across the AEL.
    fn process_horizontal(&mut self, mut horz: usize) -> Result<(), ClipError> {
        let is_open = self.edges[horz].wind_delta == 0;
        let (mut dir, mut horz_left, mut horz_right) = self.get_horz_direction(horz);

        // find the end of the consecutive horizontal run, and its maxima pair if the bound ends
        let mut e_last_horz = horz;
        while let Some(n) = self.edges[e_last_horz].next_in_lml {
            if self.edges[n].is_horizontal() {
                e_last_horz = n;
            } else {
                break;
            }
        }
        let e_max_pair = if self.edges[e_last_horz].next_in_lml.is_none() {
            self.get_maxima_pair(e_last_horz)
        } else {
            None
        };

        // position the maxima cursor on the first recorded maxima x within the horizontal's span
        let mut curr_max: Option<usize> = None;
        if !self.maxima.is_empty() {
            if dir == Direction::LeftToRight {
                let mut i = 0;
                while i < self.maxima.len() && self.maxima[i] <= self.edges[horz].bot.x {
                    i += 1;
                }
                if i < self.maxima.len() && self.maxima[i] < self.edges[e_last_horz].top.x {
                    curr_max = Some(i);
                }
            } else {
                let mut i = 0;
                while i + 1 < self.maxima.len() && self.maxima[i + 1] < self.edges[horz].bot.x {
                    i += 1;
                }
                if self.maxima[i] > self.edges[e_last_horz].top.x {
                    curr_max = Some(i);
                }
            }
        }

        let mut op1: Option<usize> = None;
        loop {
            // loop through consecutive horizontal edges
            let is_last_horz = horz == e_last_horz;
            let mut e = self.get_next_in_ael(horz, dir);
            while let Some(ei) = e {
                // add output vertices where recorded maxima touch the horizontal; this keeps
                // strictly-simple output free of undetected self touches
                if dir == Direction::LeftToRight {
                    while let Some(mi) = curr_max {
                        if self.maxima[mi] >= self.edges[ei].curr.x {
                            break;
                        }
                        if self.edges[horz].out_idx >= 0 && !is_open {
                            let pt = point64(self.maxima[mi], self.edges[horz].bot.y);
                            self.add_out_pt(horz, pt)?;
                        }
                        curr_max = if mi + 1 < self.maxima.len() {
                            Some(mi + 1)
                        } else {
                            None
                        };
                    }
                } else {
                    while let Some(mi) = curr_max {
                        if self.maxima[mi] <= self.edges[ei].curr.x {
                            break;
                        }
                        if self.edges[horz].out_idx >= 0 && !is_open {
                            let pt = point64(self.maxima[mi], self.edges[horz].bot.y);
                            self.add_out_pt(horz, pt)?;
                        }
                        curr_max = if mi > 0 { Some(mi - 1) } else { None };
                    }
                }

                if (dir == Direction::LeftToRight && self.edges[ei].curr.x > horz_right)
                    || (dir == Direction::RightToLeft && self.edges[ei].curr.x < horz_left)
                {
                    break;
                }

                // at the end of an intermediate horizontal only consume edges that pass through
                // to the next bound edge (smaller dx is right of larger dx above a horizontal)
                if self.edges[ei].curr.x == self.edges[horz].top.x {
                    if let Some(nl) = self.edges[horz].next_in_lml {
                        if self.edges[ei].dx < self.edges[nl].dx {
                            break;
                        }
                    }
                }

                if self.edges[horz].out_idx >= 0 && !is_open {
                    let curr = self.edges[ei].curr;
                    let op = self.add_out_pt(horz, curr)?;
                    op1 = Some(op);
                    let mut e_next_horz = self.sorted_edges;
                    while let Some(nh) = e_next_horz {
                        if self.edges[nh].out_idx >= 0
                            && Self::horz_segments_overlap(
                                self.edges[horz].bot.x,
                                self.edges[horz].top.x,
                                self.edges[nh].bot.x,
                                self.edges[nh].top.x,
                            )
                        {
                            let op2 = self.get_last_out_pt(nh)?;
                            let off = self.edges[nh].top;
                            self.add_join(op2, op, off);
                        }
                        e_next_horz = self.edges[nh].next_in_sel;
                    }
                    let bot = self.edges[horz].bot;
                    self.add_ghost_join(op, bot);
                }

                // terminate at the maxima pair, but only from the last consecutive horizontal
                if Some(ei) == e_max_pair && is_last_horz {
                    if self.edges[horz].out_idx >= 0 {
                        let top = self.edges[horz].top;
                        self.add_local_max_poly(horz, ei, top)?;
                    }
                    self.delete_from_ael(horz);
                    self.delete_from_ael(ei);
                    return Ok(());
                }

                let pt = point64(self.edges[ei].curr.x, self.edges[horz].curr.y);
                if dir == Direction::LeftToRight {
                    self.intersect_edges(horz, ei, pt)?;
                } else {
                    self.intersect_edges(ei, horz, pt)?;
                }
                let e_next = self.get_next_in_ael(ei, dir);
                self.swap_positions_in_ael(horz, ei);
                e = e_next;
            }

            let continues_horizontal = matches!(
                self.edges[horz].next_in_lml,
                Some(nl) if self.edges[nl].is_horizontal()
            );
            if !continues_horizontal {
                break;
            }
            horz = self.update_edge_into_ael(horz)?;
            if self.edges[horz].out_idx >= 0 {
                let bot = self.edges[horz].bot;
                self.add_out_pt(horz, bot)?;
            }
            let (d, l, r) = self.get_horz_direction(horz);
            dir = d;
            horz_left = l;
            horz_right = r;
        }

        if self.edges[horz].out_idx >= 0 && op1.is_none() {
            let op = self.get_last_out_pt(horz)?;
            let mut e_next_horz = self.sorted_edges;
            while let Some(nh) = e_next_horz {
                if self.edges[nh].out_idx >= 0
                    && Self::horz_segments_overlap(
                        self.edges[horz].bot.x,
                        self.edges[horz].top.x,
                        self.edges[nh].bot.x,
                        self.edges[nh].top.x,
                    )
                {
                    let op2 = self.get_last_out_pt(nh)?;
                    let off = self.edges[nh].top;
                    self.add_join(op2, op, off);
                }
                e_next_horz = self.edges[nh].next_in_sel;
            }
            let top = self.edges[horz].top;
            self.add_ghost_join(op, top);
        }

        if self.edges[horz].next_in_lml.is_some() {
            if self.edges[horz].out_idx >= 0 {
                let top = self.edges[horz].top;
                let op1b = self.add_out_pt(horz, top)?;
                horz = self.update_edge_into_ael(horz)?;
                if self.edges[horz].wind_delta == 0 {
                    return Ok(());
                }
                // horz is no longer horizontal; join with a neighbor sharing its bottom vertex
                let hb = self.edges[horz].bot;
                let ht = self.edges[horz].top;
                let e_prev = self.edges[horz].prev_in_ael;
                let e_next = self.edges[horz].next_in_ael;
                let mut joined = false;
                if let Some(p) = e_prev {
                    if self.edges[p].curr == hb
                        && self.edges[p].wind_delta != 0
                        && self.edges[p].out_idx >= 0
                        && self.edges[p].curr.y > self.edges[p].top.y
                        && self.slopes_equal_edges(horz, p)
                    {
                        let op2 = self.add_out_pt(p, hb)?;
                        self.add_join(op1b, op2, ht);
                        joined = true;
                    }
                }
                if !joined {
                    if let Some(n) = e_next {
                        if self.edges[n].curr == hb
                            && self.edges[n].wind_delta != 0
                            && self.edges[n].out_idx >= 0
                            && self.edges[n].curr.y > self.edges[n].top.y
                            && self.slopes_equal_edges(horz, n)
                        {
                            let op2 = self.add_out_pt(n, hb)?;
                            self.add_join(op1b, op2, ht);
                        }
                    }
                }
            } else {
                self.update_edge_into_ael(horz)?;
            }
        } else {
            if self.edges[horz].out_idx >= 0 {
                let top = self.edges[horz].top;
                self.add_out_pt(horz, top)?;
            }
            self.delete_from_ael(horz);
        }
        Ok(())
    }

    fn process_intersections(&mut self, top_y: i64) -> Result<(), ClipError> {
        if self.active_edges.is_none() {
            return Ok(());
        }
        self.build_intersect_list(top_y);
        if self.intersect_list.is_empty() {
            return Ok(());
        }
        if self.intersect_list.len() == 1 || self.fixup_intersection_order() {
            self.process_intersect_list()?;
        } else {
            self.sorted_edges = None;
            self.intersect_list.clear();
            return Err(ClipError::IntersectionOrder);
        }
        self.sorted_edges = None;
        Ok(())
    }

    fn build_intersect_list(&mut self, top_y: i64) {
        // copy the AEL into the SEL, advancing every edge's curr.x to the top of the beam
        self.sorted_edges = self.active_edges;
        let mut e = self.active_edges;
        while let Some(ei) = e {
            self.edges[ei].prev_in_sel = self.edges[ei].prev_in_ael;
            self.edges[ei].next_in_sel = self.edges[ei].next_in_ael;
            self.edges[ei].curr.x = self.edges[ei].top_x(top_y);
            e = self.edges[ei].next_in_ael;
        }

        // bubble sort the SEL into top-of-beam order, recording every swap as an intersection
        loop {
            let Some(head) = self.sorted_edges else {
                break;
            };
            let mut is_modified = false;
            let mut ei = head;
            while let Some(ni) = self.edges[ei].next_in_sel {
                if self.edges[ei].curr.x > self.edges[ni].curr.x {
                    let mut pt = self.intersect_point(ei, ni);
                    if pt.y < top_y {
                        pt = point64(self.edges[ei].top_x(top_y), top_y);
                    }
                    self.intersect_list.push(IntersectNode {
                        edge1: ei,
                        edge2: ni,
                        pt,
                    });
                    self.swap_positions_in_sel(ei, ni);
                    is_modified = true;
                } else {
                    ei = ni;
                }
            }
            // shorten the sorted range by one each pass
            if let Some(p) = self.edges[ei].prev_in_sel {
                self.edges[p].next_in_sel = None;
            } else {
                break;
            }
            if !is_modified {
                break;
            }
        }
        self.sorted_edges = None;
    }

    /// Intersection of two active edges, clamped into the current beam.
    fn intersect_point(&self, edge1: usize, edge2: usize) -> Point64 {
        let e1 = &self.edges[edge1];
        let e2 = &self.edges[edge2];
        let mut ip = Point64::default();

        // with very large coordinates two distinct slopes can round to the same dx
        if e1.dx == e2.dx {
            ip.y = e1.curr.y;
            ip.x = e1.top_x(ip.y);
            return ip;
        }
        if e1.delta.x == 0 {
            ip.x = e1.bot.x;
            if e2.is_horizontal() {
                ip.y = e2.bot.y;
            } else {
                let b2 = e2.bot.y as f64 - e2.bot.x as f64 / e2.dx;
                ip.y = round_to_i64(ip.x as f64 / e2.dx + b2);
            }
        } else if e2.delta.x == 0 {
            ip.x = e2.bot.x;
            if e1.is_horizontal() {
                ip.y = e1.bot.y;
            } else {
                let b1 = e1.bot.y as f64 - e1.bot.x as f64 / e1.dx;
                ip.y = round_to_i64(ip.x as f64 / e1.dx + b1);
            }
        } else {
            let b1 = e1.bot.x as f64 - e1.bot.y as f64 * e1.dx;
            let b2 = e2.bot.x as f64 - e2.bot.y as f64 * e2.dx;
            let q = (b2 - b1) / (e1.dx - e2.dx);
            ip.y = round_to_i64(q);
            ip.x = if e1.dx.abs() < e2.dx.abs() {
                round_to_i64(e1.dx * q + b1)
            } else {
                round_to_i64(e2.dx * q + b2)
            };
        }

        if ip.y < e1.top.y || ip.y < e2.top.y {
            ip.y = e1.top.y.max(e2.top.y);
            // the more vertical edge gives the more accurate x
            ip.x = if e1.dx.abs() < e2.dx.abs() {
                e1.top_x(ip.y)
            } else {
                e2.top_x(ip.y)
            };
        }
        // never allow the intersection below the bottom of the beam
        if ip.y > e1.curr.y {
            ip.y = e1.curr.y;
            ip.x = if e1.dx.abs() > e2.dx.abs() {
                e2.top_x(ip.y)
            } else {
                e1.top_x(ip.y)
            };
        }
        ip
    }

    fn edges_adjacent(&self, node: IntersectNode) -> bool {
        self.edges[node.edge1].next_in_sel == Some(node.edge2)
            || self.edges[node.edge1].prev_in_sel == Some(node.edge2)
    }

    /// Reorder the intersection list so every crossing happens between edges that are adjacent
    /// at the time it is processed. Returns false when no such ordering exists.
    fn fixup_intersection_order(&mut self) -> bool {
        // process bottom-most (largest y) intersections first
        self.intersect_list.sort_by(|a, b| b.pt.y.cmp(&a.pt.y));
        self.copy_ael_to_sel();
        let cnt = self.intersect_list.len();
        for i in 0..cnt {
            if !self.edges_adjacent(self.intersect_list[i]) {
                let mut j = i + 1;
                while j < cnt && !self.edges_adjacent(self.intersect_list[j]) {
                    j += 1;
                }
                if j == cnt {
                    return false;
                }
                self.intersect_list.swap(i, j);
            }
            let node = self.intersect_list[i];
            self.swap_positions_in_sel(node.edge1, node.edge2);
        }
        true
    }

    fn process_intersect_list(&mut self) -> Result<(), ClipError> {
        for i in 0..self.intersect_list.len() {
            let node = self.intersect_list[i];
            self.intersect_edges(node.edge1, node.edge2, node.pt)?;
            self.swap_positions_in_ael(node.edge1, node.edge2);
        }
        self.intersect_list.clear();
        Ok(())
    }

    #[inline]
    fn is_maxima(&self, e: usize, y: i64) -> bool {
        self.edges[e].top.y == y && self.edges[e].next_in_lml.is_none()
    }

    #[inline]
    fn is_intermediate(&self, e: usize, y: i64) -> bool {
        self.edges[e].top.y == y && self.edges[e].next_in_lml.is_some()
    }

    fn process_edges_at_top(&mut self, top_y: i64) -> Result<(), ClipError> {
        let mut e = self.active_edges;
        while let Some(ei) = e {
            // 1. close bounds ending at non-horizontal maxima
            let mut is_maxima_edge = self.is_maxima(ei, top_y);
            if is_maxima_edge {
                is_maxima_edge = match self.get_maxima_pair_ex(ei) {
                    None => true,
                    Some(mp) => !self.edges[mp].is_horizontal(),
                };
            }
            if is_maxima_edge {
                if self.options.strictly_simple {
                    let x = self.edges[ei].top.x;
                    self.insert_maxima(x);
                }
                let e_prev = self.edges[ei].prev_in_ael;
                self.do_maxima(ei)?;
                e = match e_prev {
                    None => self.active_edges,
                    Some(p) => self.edges[p].next_in_ael,
                };
                continue;
            }

            // 2. promote edges ending in a horizontal, otherwise advance curr to the beam
            let mut cur = ei;
            let promotes_horizontal = self.is_intermediate(ei, top_y)
                && matches!(
                    self.edges[ei].next_in_lml,
                    Some(nl) if self.edges[nl].is_horizontal()
                );
            if promotes_horizontal {
                cur = self.update_edge_into_ael(ei)?;
                if self.edges[cur].out_idx >= 0 {
                    let bot = self.edges[cur].bot;
                    self.add_out_pt(cur, bot)?;
                }
                self.add_edge_to_sel(cur);
            } else {
                let x = self.edges[cur].top_x(top_y);
                self.edges[cur].curr = point64(x, top_y);
            }

            // when strictly simple, edges touching at the beam both get a vertex and a join
            if self.options.strictly_simple {
                if let Some(p) = self.edges[cur].prev_in_ael {
                    if self.edges[cur].out_idx >= 0
                        && self.edges[cur].wind_delta != 0
                        && self.edges[p].out_idx >= 0
                        && self.edges[p].curr.x == self.edges[cur].curr.x
                        && self.edges[p].wind_delta != 0
                    {
                        let ip = self.edges[cur].curr;
                        let op = self.add_out_pt(p, ip)?;
                        let op2 = self.add_out_pt(cur, ip)?;
                        self.add_join(op, op2, ip);
                    }
                }
            }
            e = self.edges[cur].next_in_ael;
        }

        // 3. process promoted horizontals
        self.process_horizontals()?;
        self.maxima.clear();

        // 4. promote intermediate vertices into their next bound edge
        let mut e = self.active_edges;
        while let Some(ei) = e {
            let mut cur = ei;
            if self.is_intermediate(ei, top_y) {
                let mut op: Option<usize> = None;
                if self.edges[ei].out_idx >= 0 {
                    let top = self.edges[ei].top;
                    op = Some(self.add_out_pt(ei, top)?);
                }
                cur = self.update_edge_into_ael(ei)?;

                // if output polygons share this edge they will need joining later
                let bot = self.edges[cur].bot;
                let curr = self.edges[cur].curr;
                let top = self.edges[cur].top;
                let e_prev = self.edges[cur].prev_in_ael;
                let e_next = self.edges[cur].next_in_ael;
                let mut joined = false;
                if let (Some(p), Some(op)) = (e_prev, op) {
                    if self.edges[p].curr == bot
                        && self.edges[p].out_idx >= 0
                        && self.edges[p].curr.y > self.edges[p].top.y
                        && slopes_equal4(curr, bot, self.edges[p].curr, self.edges[p].top)
                        && self.edges[cur].wind_delta != 0
                        && self.edges[p].wind_delta != 0
                    {
                        let op2 = self.add_out_pt(p, bot)?;
                        self.add_join(op, op2, top);
                        joined = true;
                    }
                }
                if !joined {
                    if let (Some(n), Some(op)) = (e_next, op) {
                        if self.edges[n].curr == bot
                            && self.edges[n].out_idx >= 0
                            && self.edges[n].curr.y > self.edges[n].top.y
                            && slopes_equal4(curr, bot, self.edges[n].curr, self.edges[n].top)
                            && self.edges[cur].wind_delta != 0
                            && self.edges[n].wind_delta != 0
                        {
                            let op2 = self.add_out_pt(n, bot)?;
                            self.add_join(op, op2, top);
                        }
                    }
                }
            }
            e = self.edges[cur].next_in_ael;
        }
        Ok(())
    }

    /// Close the bound pair ending at edge `e`'s top vertex.
    fn do_maxima(&mut self, e: usize) -> Result<(), ClipError> {
        let Some(max_pair) = self.get_maxima_pair_ex(e) else {
            if self.edges[e].out_idx >= 0 {
                let top = self.edges[e].top;
                self.add_out_pt(e, top)?;
            }
            self.delete_from_ael(e);
            return Ok(());
        };

        let mut next = self.edges[e].next_in_ael;
        while let Some(n) = next {
            if n == max_pair {
                break;
            }
            let top = self.edges[e].top;
            self.intersect_edges(e, n, top)?;
            self.swap_positions_in_ael(e, n);
            next = self.edges[e].next_in_ael;
        }

        let e_out = self.edges[e].out_idx;
        let m_out = self.edges[max_pair].out_idx;
        if e_out == UNASSIGNED && m_out == UNASSIGNED {
            self.delete_from_ael(e);
            self.delete_from_ael(max_pair);
        } else if e_out >= 0 && m_out >= 0 {
            let top = self.edges[e].top;
            self.add_local_max_poly(e, max_pair, top)?;
            self.delete_from_ael(e);
            self.delete_from_ael(max_pair);
        } else if self.edges[e].wind_delta == 0 {
            let top = self.edges[e].top;
            if e_out >= 0 {
                self.add_out_pt(e, top)?;
                self.edges[e].out_idx = UNASSIGNED;
            }
            self.delete_from_ael(e);
            if self.edges[max_pair].out_idx >= 0 {
                self.add_out_pt(max_pair, top)?;
                self.edges[max_pair].out_idx = UNASSIGNED;
            }
            self.delete_from_ael(max_pair);
        } else {
            return Err(ClipError::InvariantViolated("unbalanced maxima pairing"));
        }
        Ok(())
    }

    /// Last output point added for this edge's ring (front for left-side edges, back for right).
    fn get_last_out_pt(&self, e: usize) -> Result<usize, ClipError> {
        let outrec = &self.out_recs[self.edges[e].out_idx as usize];
        let pts = outrec
            .pts
            .ok_or(ClipError::InvariantViolated("output ring missing points"))?;
        Ok(if self.edges[e].side == EdgeSide::Left {
            pts
        } else {
            self.out_pts[pts].prev
        })
    }
}
