//! Dynamic 1D binary partition tree.
//!
//! The 1D analogue of `Quadtree`: the root splits the line at 0, every other
//! node covers a power-of-two aligned interval and splits it at its centre.
//! Zero-width intervals are padded to `[x - e/2, x + e/2]`, where `e` is the
//! smallest non-zero width inserted so far.

use super::{exponent, is_zero_width, power_of_2, IntervalIndex};
use crate::cfg::DEFAULT_MIN_EXTENT;
use crate::error::IndexError;
use crate::geom::Interval;

type Entry<T> = (Interval, T);

pub struct Bintree<T> {
    items: Vec<Entry<T>>,
    subnodes: [Option<Box<Node<T>>>; 2],
    min_extent: f64,
    len: usize,
}

struct Node<T> {
    interval: Interval,
    centre: f64,
    level: i32,
    items: Vec<Entry<T>>,
    subnodes: [Option<Box<Node<T>>>; 2],
}

/// 0 = below `centre`, 1 = above; `None` if the interval straddles it.
fn subnode_index(iv: &Interval, centre: f64) -> Option<usize> {
    let mut index = None;
    if iv.min >= centre {
        index = Some(1);
    }
    if iv.max <= centre {
        index = Some(0);
    }
    index
}

fn key_interval(iv: &Interval) -> (Interval, i32) {
    let at = |level: i32| {
        let size = power_of_2(level);
        let min = (iv.min / size).floor() * size;
        Interval {
            min,
            max: min + size,
        }
    };
    let mut level = exponent(iv.width()) + 1;
    let mut key = at(level);
    while !key.contains(iv) {
        level += 1;
        key = at(level);
    }
    (key, level)
}

fn ensure_extent(iv: &Interval, min_extent: f64) -> Interval {
    if iv.min != iv.max {
        return *iv;
    }
    Interval {
        min: iv.min - min_extent / 2.0,
        max: iv.max + min_extent / 2.0,
    }
}

fn visit_entries<T>(entries: &[Entry<T>], q: &Interval, visitor: &mut dyn FnMut(&T)) {
    for (iv, item) in entries {
        if iv.overlaps(q) {
            visitor(item);
        }
    }
}

fn remove_entry<T: PartialEq>(entries: &mut Vec<Entry<T>>, item: &T) -> bool {
    match entries.iter().position(|(_, it)| it == item) {
        Some(i) => {
            entries.remove(i);
            true
        }
        None => false,
    }
}

fn remove_from_subnodes<T: PartialEq>(
    subnodes: &mut [Option<Box<Node<T>>>; 2],
    q: &Interval,
    item: &T,
) -> bool {
    for slot in subnodes.iter_mut() {
        if let Some(sub) = slot.as_deref_mut() {
            if sub.remove(q, item) {
                if sub.items.is_empty() && sub.subnodes.iter().all(Option::is_none) {
                    *slot = None;
                }
                return true;
            }
        }
    }
    false
}

impl<T> Node<T> {
    fn new(interval: Interval, level: i32) -> Self {
        Self {
            centre: interval.centre(),
            interval,
            level,
            items: Vec::new(),
            subnodes: [None, None],
        }
    }

    fn create_expanded(node: Option<Box<Node<T>>>, add: &Interval) -> Box<Node<T>> {
        let mut expand = *add;
        if let Some(n) = &node {
            expand.expand_to_include(&n.interval);
        }
        let (key, level) = key_interval(&expand);
        let mut larger = Node::new(key, level);
        if let Some(n) = node {
            larger.insert_node(n);
        }
        Box::new(larger)
    }

    fn create_subnode(&self, index: usize) -> Node<T> {
        let iv = if index == 0 {
            Interval {
                min: self.interval.min,
                max: self.centre,
            }
        } else {
            Interval {
                min: self.centre,
                max: self.interval.max,
            }
        };
        Node::new(iv, self.level - 1)
    }

    fn insert_node(&mut self, node: Box<Node<T>>) {
        let Some(index) = subnode_index(&node.interval, self.centre) else {
            node.drain_into(&mut self.items);
            return;
        };
        if node.level == self.level - 1 {
            self.subnodes[index] = Some(node);
        } else {
            let mut child = self.create_subnode(index);
            child.insert_node(node);
            self.subnodes[index] = Some(Box::new(child));
        }
    }

    fn drain_into(self: Box<Self>, out: &mut Vec<Entry<T>>) {
        let node = *self;
        out.extend(node.items);
        for sub in node.subnodes.into_iter().flatten() {
            sub.drain_into(out);
        }
    }

    fn add_creating(&mut self, iv: &Interval, entry: Entry<T>) {
        match subnode_index(iv, self.centre) {
            Some(i) => {
                let sub = match self.subnodes[i].take() {
                    Some(sub) => sub,
                    None => Box::new(self.create_subnode(i)),
                };
                self.subnodes[i].insert(sub).add_creating(iv, entry);
            }
            None => self.items.push(entry),
        }
    }

    fn add_existing(&mut self, iv: &Interval, entry: Entry<T>) {
        if let Some(i) = subnode_index(iv, self.centre) {
            if let Some(sub) = self.subnodes[i].as_deref_mut() {
                sub.add_existing(iv, entry);
                return;
            }
        }
        self.items.push(entry);
    }

    fn visit(&self, q: &Interval, visitor: &mut dyn FnMut(&T)) {
        if !self.interval.overlaps(q) {
            return;
        }
        visit_entries(&self.items, q, visitor);
        for sub in self.subnodes.iter().flatten() {
            sub.visit(q, visitor);
        }
    }

    fn remove(&mut self, q: &Interval, item: &T) -> bool
    where
        T: PartialEq,
    {
        if !self.interval.overlaps(q) {
            return false;
        }
        remove_from_subnodes(&mut self.subnodes, q, item) || remove_entry(&mut self.items, item)
    }

    fn depth(&self) -> usize {
        1 + self
            .subnodes
            .iter()
            .flatten()
            .map(|s| s.depth())
            .max()
            .unwrap_or(0)
    }
}

impl<T> Default for Bintree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Bintree<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            subnodes: [None, None],
            min_extent: DEFAULT_MIN_EXTENT,
            len: 0,
        }
    }

    pub fn depth(&self) -> usize {
        1 + self
            .subnodes
            .iter()
            .flatten()
            .map(|s| s.depth())
            .max()
            .unwrap_or(0)
    }

    pub fn min_extent(&self) -> f64 {
        self.min_extent
    }

    /// Items whose interval contains `x`.
    pub fn query_point(&self, x: f64) -> Vec<T>
    where
        T: Clone,
    {
        self.query(&Interval::point(x))
    }
}

impl<T> IntervalIndex<T> for Bintree<T> {
    fn insert(&mut self, interval: Interval, item: T) -> Result<(), IndexError> {
        let w = interval.width();
        if w < self.min_extent && w > 0.0 {
            self.min_extent = w;
        }
        let ins = ensure_extent(&interval, self.min_extent);
        self.len += 1;
        let entry = (interval, item);
        let Some(i) = subnode_index(&ins, 0.0) else {
            self.items.push(entry);
            return Ok(());
        };
        let node = match self.subnodes[i].take() {
            Some(n) if n.interval.contains(&ins) => n,
            other => Node::create_expanded(other, &ins),
        };
        let node = self.subnodes[i].insert(node);
        if is_zero_width(ins.min, ins.max) {
            node.add_existing(&ins, entry);
        } else {
            node.add_creating(&ins, entry);
        }
        Ok(())
    }

    fn visit(&self, interval: &Interval, visitor: &mut dyn FnMut(&T)) {
        visit_entries(&self.items, interval, visitor);
        for sub in self.subnodes.iter().flatten() {
            sub.visit(interval, visitor);
        }
    }

    fn remove(&mut self, interval: &Interval, item: &T) -> bool
    where
        T: PartialEq,
    {
        let q = ensure_extent(interval, self.min_extent);
        let found =
            remove_from_subnodes(&mut self.subnodes, &q, item) || remove_entry(&mut self.items, item);
        if found {
            self.len -= 1;
        }
        found
    }

    fn len(&self) -> usize {
        self.len
    }
}
