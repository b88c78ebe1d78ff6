//! Sort-tile-recursive packed R-tree.
//!
//! Items are collected unsorted until the first query, which packs them
//! bottom-up: each level is sorted by envelope centre x, cut into
//! `ceil(sqrt(n / capacity))` vertical slices, each slice sorted by centre y
//! and grouped into parents of `capacity` children. The build runs exactly
//! once inside a `OnceLock`, so concurrent first queries on a shared tree
//! are safe and later queries take no lock.

use std::cmp::Ordering;
use std::sync::OnceLock;

use super::SpatialIndex;
use crate::cfg::DEFAULT_NODE_CAPACITY;
use crate::error::IndexError;
use crate::geom::Envelope;

enum StrNode {
    Leaf { env: Envelope, item: usize },
    Branch { env: Envelope, children: Vec<StrNode> },
}

impl StrNode {
    #[inline]
    fn env(&self) -> &Envelope {
        match self {
            StrNode::Leaf { env, .. } | StrNode::Branch { env, .. } => env,
        }
    }

    #[inline]
    fn centre(&self) -> (f64, f64) {
        let e = self.env();
        ((e.min_x + e.max_x) / 2.0, (e.min_y + e.max_y) / 2.0)
    }
}

pub struct StrTree<T> {
    node_capacity: usize,
    /// Removed items become `None`; leaves keep pointing at their slot.
    items: Vec<Option<(Envelope, T)>>,
    live: usize,
    root: OnceLock<Option<StrNode>>,
}

impl<T> Default for StrTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> StrTree<T> {
    pub fn new() -> Self {
        Self::with_node_capacity(DEFAULT_NODE_CAPACITY)
    }

    /// Node capacity below 2 is raised to 2.
    pub fn with_node_capacity(node_capacity: usize) -> Self {
        Self {
            node_capacity: node_capacity.max(2),
            items: Vec::new(),
            live: 0,
            root: OnceLock::new(),
        }
    }

    pub fn node_capacity(&self) -> usize {
        self.node_capacity
    }

    /// True once the tree has been packed (after the first query).
    pub fn is_built(&self) -> bool {
        self.root.get().is_some()
    }

    /// Packs the tree now instead of on the first query.
    pub fn build(&self) {
        self.root();
    }

    /// Height of the packed tree (0 when empty). Builds the tree.
    pub fn depth(&self) -> usize {
        fn depth(node: &StrNode) -> usize {
            match node {
                StrNode::Leaf { .. } => 0,
                StrNode::Branch { children, .. } => {
                    1 + children.iter().map(depth).max().unwrap_or(0)
                }
            }
        }
        self.root().map_or(0, depth)
    }

    fn root(&self) -> Option<&StrNode> {
        self.root
            .get_or_init(|| {
                let leaves: Vec<StrNode> = self
                    .items
                    .iter()
                    .enumerate()
                    .filter_map(|(i, slot)| {
                        slot.as_ref().map(|(env, _)| StrNode::Leaf { env: *env, item: i })
                    })
                    .collect();
                tracing::trace!(leaves = leaves.len(), "strtree build");
                build_levels(leaves, self.node_capacity)
            })
            .as_ref()
    }

    fn visit_node(&self, node: &StrNode, env: &Envelope, visitor: &mut dyn FnMut(&T)) {
        match node {
            StrNode::Leaf { env: item_env, item } => {
                if item_env.intersects(env) {
                    if let Some((_, it)) = &self.items[*item] {
                        visitor(it);
                    }
                }
            }
            StrNode::Branch {
                env: node_env,
                children,
            } => {
                if !node_env.intersects(env) {
                    return;
                }
                for child in children {
                    self.visit_node(child, env, visitor);
                }
            }
        }
    }
}

fn cmp_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

fn build_levels(mut level: Vec<StrNode>, capacity: usize) -> Option<StrNode> {
    if level.is_empty() {
        return None;
    }
    loop {
        // A single leaf still gets a parent so the root is always a branch.
        if level.len() == 1 && matches!(level[0], StrNode::Branch { .. }) {
            return level.pop();
        }
        level = pack_parents(level, capacity);
    }
}

fn pack_parents(mut children: Vec<StrNode>, capacity: usize) -> Vec<StrNode> {
    let min_leaf_count = children.len().div_ceil(capacity);
    let slice_count = (min_leaf_count as f64).sqrt().ceil() as usize;
    let slice_capacity = children.len().div_ceil(slice_count.max(1));

    children.sort_by(|a, b| cmp_f64(a.centre().0, b.centre().0));

    let mut parents = Vec::with_capacity(min_leaf_count);
    let mut iter = children.into_iter().peekable();
    while iter.peek().is_some() {
        let mut slice: Vec<StrNode> = iter.by_ref().take(slice_capacity).collect();
        slice.sort_by(|a, b| cmp_f64(a.centre().1, b.centre().1));
        let mut slice_iter = slice.into_iter().peekable();
        while slice_iter.peek().is_some() {
            let group: Vec<StrNode> = slice_iter.by_ref().take(capacity).collect();
            let mut env = Envelope::null();
            for c in &group {
                env.expand_to_include_env(c.env());
            }
            parents.push(StrNode::Branch {
                env,
                children: group,
            });
        }
    }
    parents
}

impl<T> SpatialIndex<T> for StrTree<T> {
    fn insert(&mut self, env: Envelope, item: T) -> Result<(), IndexError> {
        if self.is_built() {
            return Err(IndexError::InsertAfterQuery);
        }
        if env.is_null() {
            return Ok(());
        }
        self.items.push(Some((env, item)));
        self.live += 1;
        Ok(())
    }

    fn visit(&self, env: &Envelope, visitor: &mut dyn FnMut(&T)) {
        if let Some(root) = self.root() {
            self.visit_node(root, env, visitor);
        }
    }

    fn remove(&mut self, env: &Envelope, item: &T) -> bool
    where
        T: PartialEq,
    {
        let slot = self.items.iter_mut().find(|slot| {
            matches!(slot, Some((item_env, it)) if it == item && item_env.intersects(env))
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

    fn grid_tree(n: usize) -> StrTree<usize> {
        let mut t = StrTree::new();
        for i in 0..n {
            let x = (i % 10) as f64;
            let y = (i / 10) as f64;
            t.insert(Envelope::new(x, x + 0.5, y, y + 0.5), i).unwrap();
        }
        t
    }

    #[test]
    fn insert_after_query_is_rejected() {
        let mut t = grid_tree(5);
        assert!(!t.is_built());
        let _ = t.query(&Envelope::new(0.0, 1.0, 0.0, 1.0));
        assert!(t.is_built());
        assert_eq!(
            t.insert(Envelope::new(0.0, 1.0, 0.0, 1.0), 99),
            Err(IndexError::InsertAfterQuery)
        );
    }

    #[test]
    fn empty_tree_queries_empty() {
        let t: StrTree<u8> = StrTree::new();
        assert!(t.query(&Envelope::new(0.0, 1.0, 0.0, 1.0)).is_empty());
        assert_eq!(t.depth(), 0);
    }

    #[test]
    fn packs_into_shallow_tree() {
        let t = grid_tree(100);
        // 100 leaves pack into 12 parents (4 slices of 25), then 2, then the root.
        assert_eq!(t.depth(), 3);
        let mut hits = t.query(&Envelope::new(2.0, 3.0, 4.0, 4.2));
        hits.sort();
        assert_eq!(hits, vec![42, 43]);
    }

    #[test]
    fn removal_tombstones_after_build() {
        let mut t = grid_tree(30);
        let q = Envelope::new(0.0, 0.6, 0.0, 0.6);
        assert_eq!(t.query(&q), vec![0]);
        assert!(t.remove(&q, &0));
        assert!(t.query(&q).is_empty());
        assert_eq!(t.len(), 29);
        assert!(!t.remove(&q, &0));
    }

    #[test]
    fn single_item_tree() {
        let t = grid_tree(1);
        assert_eq!(t.depth(), 1);
        assert_eq!(t.query(&Envelope::new(0.2, 0.3, 0.2, 0.3)), vec![0]);
    }
}
