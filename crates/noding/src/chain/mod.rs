//! Monotone chain decomposition.
//!
//! Purpose
//! - Split a polyline into maximal runs whose steps all fall in one
//!   quadrant, so x and y are both monotone along each run.
//! - The envelope of a run is the envelope of its two end vertices, which
//!   makes overlap tests between runs (and their halves) cheap.
//!
//! Conventions
//! - A chain covers vertices `start..=end` of its parent string and never
//!   owns coordinates; every method takes the parent's point slice.
//! - Zero-length steps never start a new chain.
//! - The chains of one string partition its segments: the first starts at 0,
//!   each starts where the previous ended, the last ends at `len - 1`.

use std::cell::OnceCell;

use crate::geom::{Coord, Envelope};

/// Direction of a non-zero step. East includes `dx == 0`, north includes
/// `dy == 0`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Quadrant {
    NE = 0,
    NW = 1,
    SW = 2,
    SE = 3,
}

/// Quadrant of the step `p0 -> p1`; `None` for a zero-length step.
#[inline]
pub fn quadrant(p0: Coord, p1: Coord) -> Option<Quadrant> {
    let dx = p1.x - p0.x;
    let dy = p1.y - p0.y;
    if dx == 0.0 && dy == 0.0 {
        return None;
    }
    Some(match (dx >= 0.0, dy >= 0.0) {
        (true, true) => Quadrant::NE,
        (true, false) => Quadrant::SE,
        (false, true) => Quadrant::NW,
        (false, false) => Quadrant::SW,
    })
}

#[derive(Clone, Debug)]
pub struct MonotoneChain {
    /// Index of the parent string in the caller's collection.
    pub string: usize,
    pub start: usize,
    pub end: usize,
    /// Unique within one noding run; pairs are processed only in id order.
    pub id: usize,
    env: OnceCell<Envelope>,
}

impl MonotoneChain {
    pub fn new(string: usize, start: usize, end: usize, id: usize) -> Self {
        Self {
            string,
            start,
            end,
            id,
            env: OnceCell::new(),
        }
    }

    #[inline]
    pub fn segment_count(&self) -> usize {
        self.end - self.start
    }

    /// Envelope of the chain, computed on first use.
    pub fn envelope(&self, pts: &[Coord]) -> Envelope {
        *self
            .env
            .get_or_init(|| Envelope::from_coords(pts[self.start], pts[self.end]))
    }

    /// Envelope grown by `tol` on every side.
    pub fn envelope_expanded(&self, pts: &[Coord], tol: f64) -> Envelope {
        let mut env = self.envelope(pts);
        if tol > 0.0 {
            env.expand_by(tol);
        }
        env
    }

    /// Reports `(i, j)` for segment `i` of this chain and segment `j` of
    /// `other` whenever their envelopes (grown by `tol`) may overlap.
    pub fn compute_overlaps<F: FnMut(usize, usize)>(
        &self,
        pts: &[Coord],
        other: &MonotoneChain,
        other_pts: &[Coord],
        tol: f64,
        action: &mut F,
    ) {
        overlaps_rec(
            pts, self.start, self.end, other_pts, other.start, other.end, tol, action,
        );
    }

    /// Reports every segment whose section of the chain may meet `search`.
    /// Leaf segments are reported without a final envelope test.
    pub fn select<F: FnMut(usize)>(&self, pts: &[Coord], search: &Envelope, action: &mut F) {
        select_rec(pts, search, self.start, self.end, action);
    }
}

#[inline]
fn ranges_overlap(p1: Coord, p2: Coord, q1: Coord, q2: Coord, tol: f64) -> bool {
    if tol <= 0.0 {
        return Envelope::segments_intersect(p1, p2, q1, q2);
    }
    let (min_q, max_q) = (q1.x.min(q2.x), q1.x.max(q2.x));
    let (min_p, max_p) = (p1.x.min(p2.x), p1.x.max(p2.x));
    if min_p > max_q + tol || max_p < min_q - tol {
        return false;
    }
    let (min_q, max_q) = (q1.y.min(q2.y), q1.y.max(q2.y));
    let (min_p, max_p) = (p1.y.min(p2.y), p1.y.max(p2.y));
    !(min_p > max_q + tol || max_p < min_q - tol)
}

#[allow(clippy::too_many_arguments)]
fn overlaps_rec<F: FnMut(usize, usize)>(
    pts0: &[Coord],
    start0: usize,
    end0: usize,
    pts1: &[Coord],
    start1: usize,
    end1: usize,
    tol: f64,
    action: &mut F,
) {
    if !ranges_overlap(pts0[start0], pts0[end0], pts1[start1], pts1[end1], tol) {
        return;
    }
    if end0 - start0 == 1 && end1 - start1 == 1 {
        action(start0, start1);
        return;
    }
    let mid0 = (start0 + end0) / 2;
    let mid1 = (start1 + end1) / 2;
    if start0 < mid0 {
        if start1 < mid1 {
            overlaps_rec(pts0, start0, mid0, pts1, start1, mid1, tol, action);
        }
        if mid1 < end1 {
            overlaps_rec(pts0, start0, mid0, pts1, mid1, end1, tol, action);
        }
    }
    if mid0 < end0 {
        if start1 < mid1 {
            overlaps_rec(pts0, mid0, end0, pts1, start1, mid1, tol, action);
        }
        if mid1 < end1 {
            overlaps_rec(pts0, mid0, end0, pts1, mid1, end1, tol, action);
        }
    }
}

fn select_rec<F: FnMut(usize)>(
    pts: &[Coord],
    search: &Envelope,
    start: usize,
    end: usize,
    action: &mut F,
) {
    if end - start == 1 {
        action(start);
        return;
    }
    if !search.intersects(&Envelope::from_coords(pts[start], pts[end])) {
        return;
    }
    let mid = (start + end) / 2;
    if start < mid {
        select_rec(pts, search, start, mid, action);
    }
    if mid < end {
        select_rec(pts, search, mid, end, action);
    }
}

/// Vertex index ending the chain that starts at `start`.
fn find_chain_end(pts: &[Coord], start: usize) -> usize {
    let last_index = pts.len() - 1;
    let mut safe_start = start;
    while safe_start < last_index && pts[safe_start] == pts[safe_start + 1] {
        safe_start += 1;
    }
    // Only zero-length steps remain.
    if safe_start >= last_index {
        return last_index;
    }
    let chain_quad = quadrant(pts[safe_start], pts[safe_start + 1]);
    let mut last = start + 1;
    while last < pts.len() {
        if let Some(q) = quadrant(pts[last - 1], pts[last]) {
            if Some(q) != chain_quad {
                break;
            }
        }
        last += 1;
    }
    last - 1
}

/// Decomposes `pts` (the coordinates of string `string`) into monotone
/// chains, numbering them from `*next_id` upwards.
pub fn build_chains(pts: &[Coord], string: usize, next_id: &mut usize) -> Vec<MonotoneChain> {
    let mut chains = Vec::new();
    if pts.len() < 2 {
        return chains;
    }
    let mut start = 0;
    loop {
        let end = find_chain_end(pts, start);
        chains.push(MonotoneChain::new(string, start, end, *next_id));
        *next_id += 1;
        start = end;
        if start >= pts.len() - 1 {
            break;
        }
    }
    chains
}

#[cfg(test)]
mod tests;
