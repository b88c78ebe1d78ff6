//! Dynamic region quadtree.
//!
//! The root is centred at the origin and owns four unbounded quadrants; every
//! other node covers a power-of-two aligned square and splits it at its
//! centre. An item is stored at the deepest node whose square wholly contains
//! its extent, so items straddling a centre line stay at that node. Items with
//! zero width or height are padded by a running minimum extent so they still
//! select a finite node.

use super::{exponent, is_zero_width, power_of_2, SpatialIndex};
use crate::cfg::DEFAULT_MIN_EXTENT;
use crate::error::IndexError;
use crate::geom::Envelope;

type Entry<T> = (Envelope, T);

pub struct Quadtree<T> {
    items: Vec<Entry<T>>,
    subnodes: [Option<Box<Node<T>>>; 4],
    min_extent: f64,
    len: usize,
}

struct Node<T> {
    env: Envelope,
    centre_x: f64,
    centre_y: f64,
    level: i32,
    items: Vec<Entry<T>>,
    subnodes: [Option<Box<Node<T>>>; 4],
}

/// Quadrant of `(centre_x, centre_y)` wholly containing `env`:
/// 0 = SW, 1 = SE, 2 = NW, 3 = NE.
fn subnode_index(env: &Envelope, centre_x: f64, centre_y: f64) -> Option<usize> {
    let mut index = None;
    if env.min_x >= centre_x {
        if env.min_y >= centre_y {
            index = Some(3);
        }
        if env.max_y <= centre_y {
            index = Some(1);
        }
    }
    if env.max_x <= centre_x {
        if env.min_y >= centre_y {
            index = Some(2);
        }
        if env.max_y <= centre_y {
            index = Some(0);
        }
    }
    index
}

/// Smallest power-of-two aligned square containing `env`, with its level.
fn key_cell(env: &Envelope) -> (Envelope, i32) {
    let cell_at = |level: i32| {
        let size = power_of_2(level);
        let x = (env.min_x / size).floor() * size;
        let y = (env.min_y / size).floor() * size;
        Envelope::new(x, x + size, y, y + size)
    };
    let mut level = exponent(env.width().max(env.height())) + 1;
    let mut cell = cell_at(level);
    while !cell.contains(env) {
        level += 1;
        cell = cell_at(level);
    }
    (cell, level)
}

fn ensure_extent(env: &Envelope, min_extent: f64) -> Envelope {
    let mut e = *env;
    if e.min_x == e.max_x {
        e.min_x -= min_extent / 2.0;
        e.max_x += min_extent / 2.0;
    }
    if e.min_y == e.max_y {
        e.min_y -= min_extent / 2.0;
        e.max_y += min_extent / 2.0;
    }
    e
}

fn visit_entries<T>(entries: &[Entry<T>], env: &Envelope, visitor: &mut dyn FnMut(&T)) {
    for (item_env, item) in entries {
        if item_env.intersects(env) {
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

impl<T> Node<T> {
    fn new(env: Envelope, level: i32) -> Self {
        Self {
            centre_x: (env.min_x + env.max_x) / 2.0,
            centre_y: (env.min_y + env.max_y) / 2.0,
            env,
            level,
            items: Vec::new(),
            subnodes: [None, None, None, None],
        }
    }

    fn for_extent(env: &Envelope) -> Self {
        let (cell, level) = key_cell(env);
        Self::new(cell, level)
    }

    /// A node covering both `node` (if any) and `add_env`, adopting `node`.
    fn create_expanded(node: Option<Box<Node<T>>>, add_env: &Envelope) -> Box<Node<T>> {
        let mut expand_env = *add_env;
        if let Some(n) = &node {
            expand_env.expand_to_include_env(&n.env);
        }
        let mut larger = Node::for_extent(&expand_env);
        if let Some(n) = node {
            larger.insert_node(n);
        }
        Box::new(larger)
    }

    fn create_subnode(&self, index: usize) -> Node<T> {
        let e = &self.env;
        let (cx, cy) = (self.centre_x, self.centre_y);
        let env = match index {
            0 => Envelope::new(e.min_x, cx, e.min_y, cy),
            1 => Envelope::new(cx, e.max_x, e.min_y, cy),
            2 => Envelope::new(e.min_x, cx, cy, e.max_y),
            _ => Envelope::new(cx, e.max_x, cy, e.max_y),
        };
        Node::new(env, self.level - 1)
    }

    /// Hangs `node` (a smaller aligned cell inside this one) below this node,
    /// creating intermediate levels as needed.
    fn insert_node(&mut self, node: Box<Node<T>>) {
        let Some(index) = subnode_index(&node.env, self.centre_x, self.centre_y) else {
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

    /// Stores at the deepest node containing `env`, creating nodes on the way.
    fn add_creating(&mut self, env: &Envelope, entry: Entry<T>) {
        match subnode_index(env, self.centre_x, self.centre_y) {
            Some(i) => {
                let sub = match self.subnodes[i].take() {
                    Some(sub) => sub,
                    None => Box::new(self.create_subnode(i)),
                };
                self.subnodes[i].insert(sub).add_creating(env, entry);
            }
            None => self.items.push(entry),
        }
    }

    /// Stores at the deepest existing node containing `env`.
    fn add_existing(&mut self, env: &Envelope, entry: Entry<T>) {
        if let Some(i) = subnode_index(env, self.centre_x, self.centre_y) {
            if let Some(sub) = self.subnodes[i].as_deref_mut() {
                sub.add_existing(env, entry);
                return;
            }
        }
        self.items.push(entry);
    }

    fn visit(&self, env: &Envelope, visitor: &mut dyn FnMut(&T)) {
        if !self.env.intersects(env) {
            return;
        }
        visit_entries(&self.items, env, visitor);
        for sub in self.subnodes.iter().flatten() {
            sub.visit(env, visitor);
        }
    }

    fn remove(&mut self, env: &Envelope, item: &T) -> bool
    where
        T: PartialEq,
    {
        if !self.env.intersects(env) {
            return false;
        }
        if remove_from_subnodes(&mut self.subnodes, env, item) {
            return true;
        }
        remove_entry(&mut self.items, item)
    }

    fn is_prunable(&self) -> bool {
        self.items.is_empty() && self.subnodes.iter().all(Option::is_none)
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

fn remove_from_subnodes<T: PartialEq>(
    subnodes: &mut [Option<Box<Node<T>>>; 4],
    env: &Envelope,
    item: &T,
) -> bool {
    for slot in subnodes.iter_mut() {
        if let Some(sub) = slot.as_deref_mut() {
            if sub.remove(env, item) {
                if sub.is_prunable() {
                    *slot = None;
                }
                return true;
            }
        }
    }
    false
}

impl<T> Default for Quadtree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Quadtree<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            subnodes: [None, None, None, None],
            min_extent: DEFAULT_MIN_EXTENT,
            len: 0,
        }
    }

    /// Number of levels below (and including) the root.
    pub fn depth(&self) -> usize {
        1 + self
            .subnodes
            .iter()
            .flatten()
            .map(|s| s.depth())
            .max()
            .unwrap_or(0)
    }

    /// Smallest non-zero extent seen so far, used to pad degenerate items.
    pub fn min_extent(&self) -> f64 {
        self.min_extent
    }

    fn collect_stats(&mut self, env: &Envelope) {
        let dx = env.width();
        if dx < self.min_extent && dx > 0.0 {
            self.min_extent = dx;
        }
        let dy = env.height();
        if dy < self.min_extent && dy > 0.0 {
            self.min_extent = dy;
        }
    }
}

impl<T> SpatialIndex<T> for Quadtree<T> {
    fn insert(&mut self, env: Envelope, item: T) -> Result<(), IndexError> {
        if env.is_null() {
            return Ok(());
        }
        self.collect_stats(&env);
        let ins = ensure_extent(&env, self.min_extent);
        self.len += 1;
        let entry = (env, item);
        let Some(i) = subnode_index(&ins, 0.0, 0.0) else {
            self.items.push(entry);
            return Ok(());
        };
        let node = match self.subnodes[i].take() {
            Some(n) if n.env.contains(&ins) => n,
            other => Node::create_expanded(other, &ins),
        };
        let node = self.subnodes[i].insert(node);
        if is_zero_width(ins.min_x, ins.max_x) || is_zero_width(ins.min_y, ins.max_y) {
            node.add_existing(&ins, entry);
        } else {
            node.add_creating(&ins, entry);
        }
        Ok(())
    }

    fn visit(&self, env: &Envelope, visitor: &mut dyn FnMut(&T)) {
        if env.is_null() {
            return;
        }
        visit_entries(&self.items, env, visitor);
        for sub in self.subnodes.iter().flatten() {
            sub.visit(env, visitor);
        }
    }

    fn remove(&mut self, env: &Envelope, item: &T) -> bool
    where
        T: PartialEq,
    {
        let search = ensure_extent(env, self.min_extent);
        let found = remove_from_subnodes(&mut self.subnodes, &search, item)
            || remove_entry(&mut self.items, item);
        if found {
            self.len -= 1;
        }
        found
    }

    fn len(&self) -> usize {
        self.len
    }
}
