//! Static 1D interval R-tree.
//!
//! Leaves are sorted by interval midpoint and paired bottom-up into a
//! balanced binary tree; an odd node at the end of a level is carried up
//! unchanged. Built once on the first query, like `StrTree`.

use std::sync::OnceLock;

use super::IntervalIndex;
use crate::error::IndexError;
use crate::geom::Interval;

enum IntervalNode {
    Leaf {
        min: f64,
        max: f64,
        item: usize,
    },
    Branch {
        min: f64,
        max: f64,
        children: Box<[IntervalNode; 2]>,
    },
}

impl IntervalNode {
    #[inline]
    fn bounds(&self) -> (f64, f64) {
        match *self {
            IntervalNode::Leaf { min, max, .. } | IntervalNode::Branch { min, max, .. } => {
                (min, max)
            }
        }
    }

    #[inline]
    fn intersects(&self, q: &Interval) -> bool {
        let (min, max) = self.bounds();
        !(min > q.max || max < q.min)
    }

    fn branch(a: IntervalNode, b: IntervalNode) -> IntervalNode {
        let (amin, amax) = a.bounds();
        let (bmin, bmax) = b.bounds();
        IntervalNode::Branch {
            min: amin.min(bmin),
            max: amax.max(bmax),
            children: Box::new([a, b]),
        }
    }
}

pub struct SortedPackedIntervalRTree<T> {
    items: Vec<Option<(Interval, T)>>,
    live: usize,
    root: OnceLock<Option<IntervalNode>>,
}

impl<T> Default for SortedPackedIntervalRTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SortedPackedIntervalRTree<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            live: 0,
            root: OnceLock::new(),
        }
    }

    pub fn is_built(&self) -> bool {
        self.root.get().is_some()
    }

    /// Visits items whose interval meets `[min, max]`.
    pub fn query_range(&self, min: f64, max: f64, visitor: &mut dyn FnMut(&T)) {
        self.visit(&Interval { min, max }, visitor);
    }

    fn root(&self) -> Option<&IntervalNode> {
        self.root
            .get_or_init(|| {
                let mut leaves: Vec<IntervalNode> = self
                    .items
                    .iter()
                    .enumerate()
                    .filter_map(|(i, slot)| {
                        slot.as_ref().map(|(iv, _)| IntervalNode::Leaf {
                            min: iv.min,
                            max: iv.max,
                            item: i,
                        })
                    })
                    .collect();
                leaves.sort_by(|a, b| {
                    let (amin, amax) = a.bounds();
                    let (bmin, bmax) = b.bounds();
                    let ma = (amin + amax) / 2.0;
                    let mb = (bmin + bmax) / 2.0;
                    ma.total_cmp(&mb)
                });
                tracing::trace!(leaves = leaves.len(), "interval rtree build");
                build_tree(leaves)
            })
            .as_ref()
    }

    fn visit_node(&self, node: &IntervalNode, q: &Interval, visitor: &mut dyn FnMut(&T)) {
        if !node.intersects(q) {
            return;
        }
        match node {
            IntervalNode::Leaf { item, .. } => {
                if let Some((_, it)) = &self.items[*item] {
                    visitor(it);
                }
            }
            IntervalNode::Branch { children, .. } => {
                for child in children.iter() {
                    self.visit_node(child, q, visitor);
                }
            }
        }
    }
}

fn build_tree(mut level: Vec<IntervalNode>) -> Option<IntervalNode> {
    while level.len() > 1 {
        let mut next = Vec::with_capacity(level.len().div_ceil(2));
        let mut iter = level.into_iter();
        while let Some(a) = iter.next() {
            match iter.next() {
                Some(b) => next.push(IntervalNode::branch(a, b)),
                None => next.push(a),
            }
        }
        level = next;
    }
    level.pop()
}

impl<T> IntervalIndex<T> for SortedPackedIntervalRTree<T> {
    fn insert(&mut self, interval: Interval, item: T) -> Result<(), IndexError> {
        if self.is_built() {
            return Err(IndexError::InsertAfterQuery);
        }
        self.items.push(Some((interval, item)));
        self.live += 1;
        Ok(())
    }

    fn visit(&self, interval: &Interval, visitor: &mut dyn FnMut(&T)) {
        if let Some(root) = self.root() {
            self.visit_node(root, interval, visitor);
        }
    }

    fn remove(&mut self, interval: &Interval, item: &T) -> bool
    where
        T: PartialEq,
    {
        let slot = self.items.iter_mut().find(|slot| {
            matches!(slot, Some((iv, it)) if it == item && iv.overlaps(interval))
        });
        match slot {
            Some(slot) => {
                *slot = None;
                self.live -= 1;
                true
            }
            None => false,
        }
    }

    fn len(&self) -> usize {
        self.live
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn odd_leaf_counts_keep_every_item() {
        for n in 1..12usize {
            let mut t = SortedPackedIntervalRTree::new();
            for i in 0..n {
                let x = i as f64;
                t.insert(Interval::new(x, x + 0.5), i).unwrap();
            }
            let mut all = t.query(&Interval::new(-1.0, 100.0));
            all.sort();
            assert_eq!(all, (0..n).collect::<Vec<_>>(), "n = {n}");
        }
    }

    #[test]
    fn range_query_and_usage_order() {
        let mut t = SortedPackedIntervalRTree::new();
        t.insert(Interval::new(0.0, 2.0), "a").unwrap();
        t.insert(Interval::new(5.0, 6.0), "b").unwrap();
        t.insert(Interval::point(2.0), "c").unwrap();
        let mut hits = Vec::new();
        t.query_range(2.0, 3.0, &mut |s| hits.push(*s));
        hits.sort();
        assert_eq!(hits, vec!["a", "c"]);
        assert_eq!(
            t.insert(Interval::new(0.0, 1.0), "d"),
            Err(IndexError::InsertAfterQuery)
        );
    }
}
