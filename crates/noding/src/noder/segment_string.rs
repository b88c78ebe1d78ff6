//! Noded segment strings and their split into substrings.

use std::cmp::Ordering;

use crate::geom::Coord;

/// A node position on a string: a point lying on segment `segment_index`.
///
/// A node equal to the segment's start vertex is a vertex node; any other
/// node is interior to the segment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SegmentNode {
    pub coord: Coord,
    pub segment_index: usize,
}

impl SegmentNode {
    #[inline]
    fn is_interior(&self, pts: &[Coord]) -> bool {
        self.coord != pts[self.segment_index]
    }
}

/// Octant of the direction `p0 -> p1`, numbered counter-clockwise from the
/// positive x axis. Zero-length directions map to octant 0.
fn octant(p0: Coord, p1: Coord) -> u8 {
    let dx = p1.x - p0.x;
    let dy = p1.y - p0.y;
    let (adx, ady) = (dx.abs(), dy.abs());
    if dx >= 0.0 {
        if dy >= 0.0 {
            if adx >= ady {
                0
            } else {
                1
            }
        } else if adx >= ady {
            7
        } else {
            6
        }
    } else if dy >= 0.0 {
        if adx >= ady {
            3
        } else {
            2
        }
    } else if adx >= ady {
        4
    } else {
        5
    }
}

#[inline]
fn relative_sign(x0: f64, x1: f64) -> i32 {
    if x0 < x1 {
        -1
    } else if x0 > x1 {
        1
    } else {
        0
    }
}

/// Orders two distinct points on one segment by their position along it,
/// given the segment's octant.
fn compare_along_segment(octant: u8, p0: Coord, p1: Coord) -> Ordering {
    let x = relative_sign(p0.x, p1.x);
    let y = relative_sign(p0.y, p1.y);
    let c = match octant {
        0 => compare_value(x, y),
        1 => compare_value(y, x),
        2 => compare_value(y, -x),
        3 => compare_value(-x, y),
        4 => compare_value(-x, -y),
        5 => compare_value(-y, -x),
        6 => compare_value(-y, x),
        _ => compare_value(x, -y),
    };
    c.cmp(&0)
}

#[inline]
fn compare_value(primary: i32, secondary: i32) -> i32 {
    if primary != 0 {
        primary
    } else {
        secondary
    }
}

/// Order of nodes along a string: by segment, vertex node first, then by
/// position along the segment. Equal coordinates on one segment compare equal.
fn compare_nodes(pts: &[Coord], a: &SegmentNode, b: &SegmentNode) -> Ordering {
    a.segment_index.cmp(&b.segment_index).then_with(|| {
        if a.coord == b.coord {
            return Ordering::Equal;
        }
        if !a.is_interior(pts) {
            return Ordering::Less;
        }
        if !b.is_interior(pts) {
            return Ordering::Greater;
        }
        let seg = a.segment_index;
        compare_along_segment(octant(pts[seg], pts[seg + 1]), a.coord, b.coord)
    })
}

/// Inserts `node` keeping `nodes` sorted and free of duplicates.
fn insert_node(pts: &[Coord], nodes: &mut Vec<SegmentNode>, node: SegmentNode) {
    if let Err(pos) = nodes.binary_search_by(|n| compare_nodes(pts, n, &node)) {
        nodes.insert(pos, node);
    }
}

/// An owned polyline with an opaque caller context and the nodes recorded
/// on it so far.
#[derive(Clone, Debug)]
pub struct SegmentString<C = ()> {
    pts: Vec<Coord>,
    context: C,
    nodes: Vec<SegmentNode>,
}

impl SegmentString<()> {
    pub fn new(pts: Vec<Coord>) -> Self {
        Self::with_context(pts, ())
    }
}

impl SegmentString<usize> {
    /// One string per line, each tagged with its position in `lines`.
    pub fn from_lines(lines: Vec<Vec<Coord>>) -> Vec<Self> {
        lines
            .into_iter()
            .enumerate()
            .map(|(i, pts)| Self::with_context(pts, i))
            .collect()
    }
}

impl<C> SegmentString<C> {
    pub fn with_context(pts: Vec<Coord>, context: C) -> Self {
        Self {
            pts,
            context,
            nodes: Vec::new(),
        }
    }

    #[inline]
    pub fn coords(&self) -> &[Coord] {
        &self.pts
    }

    pub fn into_coords(self) -> Vec<Coord> {
        self.pts
    }

    /// Coordinates and context; recorded nodes are dropped.
    pub fn into_parts(self) -> (Vec<Coord>, C) {
        (self.pts, self.context)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pts.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pts.is_empty()
    }

    #[inline]
    pub fn segment_count(&self) -> usize {
        self.pts.len().saturating_sub(1)
    }

    pub fn is_closed(&self) -> bool {
        self.pts.len() > 1 && self.pts.first() == self.pts.last()
    }

    #[inline]
    pub fn context(&self) -> &C {
        &self.context
    }

    /// Recorded nodes, sorted along the string.
    pub fn nodes(&self) -> &[SegmentNode] {
        &self.nodes
    }

    /// Records `pt` as a node on segment `segment_index`. A point equal to
    /// the segment's end vertex is recorded on the next segment instead.
    pub fn add_intersection(&mut self, pt: Coord, segment_index: usize) {
        let mut seg = segment_index;
        let next = seg + 1;
        if next < self.pts.len() && pt == self.pts[next] {
            seg = next;
        }
        insert_node(
            &self.pts,
            &mut self.nodes,
            SegmentNode {
                coord: pt,
                segment_index: seg,
            },
        );
    }

    /// Records every point of an intersection result on one segment.
    pub fn add_intersections(&mut self, pts: &[Coord], segment_index: usize) {
        for pt in pts {
            self.add_intersection(*pt, segment_index);
        }
    }

    /// Noded pieces of the string: consecutive nodes (including both
    /// endpoints) joined through the original vertices between them.
    pub fn split(&self) -> Vec<Self>
    where
        C: Clone,
    {
        if self.pts.len() < 2 {
            return Vec::new();
        }
        let last = self.pts.len() - 1;
        let mut nodes = self.nodes.clone();
        insert_node(
            &self.pts,
            &mut nodes,
            SegmentNode {
                coord: self.pts[0],
                segment_index: 0,
            },
        );
        insert_node(
            &self.pts,
            &mut nodes,
            SegmentNode {
                coord: self.pts[last],
                segment_index: last,
            },
        );
        self.add_collapsed_nodes(&mut nodes);

        nodes
            .windows(2)
            .map(|w| Self::with_context(self.split_edge(&w[0], &w[1]), self.context.clone()))
            .collect()
    }

    /// Nodes at the middle vertex of every `a, b, a` collapse, whether the
    /// collapse is in the input or created by two equal nodes one vertex
    /// apart.
    fn add_collapsed_nodes(&self, nodes: &mut Vec<SegmentNode>) {
        let pts = &self.pts;
        let mut collapsed: Vec<usize> = (0..pts.len().saturating_sub(2))
            .filter(|&i| pts[i] == pts[i + 2])
            .map(|i| i + 1)
            .collect();
        for w in nodes.windows(2) {
            if w[0].coord != w[1].coord {
                continue;
            }
            let mut between = w[1].segment_index as i64 - w[0].segment_index as i64;
            if !w[1].is_interior(pts) {
                between -= 1;
            }
            if between == 1 {
                collapsed.push(w[0].segment_index + 1);
            }
        }
        for i in collapsed {
            insert_node(
                pts,
                nodes,
                SegmentNode {
                    coord: pts[i],
                    segment_index: i,
                },
            );
        }
    }

    fn split_edge(&self, n0: &SegmentNode, n1: &SegmentNode) -> Vec<Coord> {
        let mut out = Vec::with_capacity(n1.segment_index - n0.segment_index + 2);
        out.push(n0.coord);
        out.extend_from_slice(&self.pts[n0.segment_index + 1..=n1.segment_index]);
        if n1.is_interior(&self.pts) {
            out.push(n1.coord);
        }
        out
    }

    /// The noded substrings of every string, in input order.
    pub fn noded_substrings(strings: &[Self]) -> Vec<Self>
    where
        C: Clone,
    {
        strings.iter().flat_map(|s| s.split()).collect()
    }
}
