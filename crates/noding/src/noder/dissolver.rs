//! Merging of duplicate segment strings.
//!
//! Two strings are duplicates when they have the same coordinates, in the
//! same or in reverse order. The first string seen is kept; later duplicates
//! are folded into it by an optional merge function.

use rustc_hash::FxHashMap;

use super::SegmentString;
use crate::geom::Coord;

/// Canonical key of a coordinate sequence: the bits of its coordinates in
/// the direction whose first differing pair increases.
fn orientation_key(pts: &[Coord]) -> (Vec<u64>, bool) {
    let forward = is_increasing(pts);
    let bits = |p: &Coord| [(p.x + 0.0).to_bits(), (p.y + 0.0).to_bits()];
    let key = if forward {
        pts.iter().flat_map(bits).collect()
    } else {
        pts.iter().rev().flat_map(bits).collect()
    };
    (key, forward)
}

/// True if the sequence reads "upwards" compared with its reverse; a
/// palindrome counts as increasing.
fn is_increasing(pts: &[Coord]) -> bool {
    let n = pts.len();
    for i in 0..n / 2 {
        let (a, b) = (pts[i] + Coord::zeros(), pts[n - 1 - i] + Coord::zeros());
        match a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)) {
            std::cmp::Ordering::Less => return true,
            std::cmp::Ordering::Greater => return false,
            std::cmp::Ordering::Equal => {}
        }
    }
    true
}

type Merger<'m, C> = Box<dyn FnMut(&mut SegmentString<C>, &SegmentString<C>, bool) + 'm>;

pub struct SegmentStringDissolver<'m, C> {
    merger: Option<Merger<'m, C>>,
    keys: FxHashMap<Vec<u64>, (usize, bool)>,
    dissolved: Vec<SegmentString<C>>,
}

impl<'m, C> Default for SegmentStringDissolver<'m, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'m, C> SegmentStringDissolver<'m, C> {
    pub fn new() -> Self {
        Self {
            merger: None,
            keys: FxHashMap::default(),
            dissolved: Vec::new(),
        }
    }

    /// `merge(kept, duplicate, same_orientation)` runs for every duplicate.
    pub fn with_merger<F>(merge: F) -> Self
    where
        F: FnMut(&mut SegmentString<C>, &SegmentString<C>, bool) + 'm,
    {
        Self {
            merger: Some(Box::new(merge)),
            ..Self::new()
        }
    }

    pub fn dissolve(&mut self, string: SegmentString<C>) {
        let (key, forward) = orientation_key(string.coords());
        match self.keys.get(&key) {
            Some(&(i, kept_forward)) => {
                if let Some(merge) = self.merger.as_mut() {
                    merge(&mut self.dissolved[i], &string, kept_forward == forward);
                }
            }
            None => {
                self.keys.insert(key, (self.dissolved.len(), forward));
                self.dissolved.push(string);
            }
        }
    }

    pub fn dissolve_all<I: IntoIterator<Item = SegmentString<C>>>(&mut self, strings: I) {
        for s in strings {
            self.dissolve(s);
        }
    }

    /// Unique strings, in first-seen order.
    pub fn dissolved(&self) -> &[SegmentString<C>] {
        &self.dissolved
    }

    pub fn into_dissolved(self) -> Vec<SegmentString<C>> {
        self.dissolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::coord;

    fn ss(pts: &[(f64, f64)], tag: u32) -> SegmentString<u32> {
        SegmentString::with_context(pts.iter().map(|&(x, y)| coord(x, y)).collect(), tag)
    }

    #[test]
    fn reversed_duplicates_merge() {
        let mut merged = Vec::new();
        let mut d = SegmentStringDissolver::with_merger(
            |kept: &mut SegmentString<u32>, dup: &SegmentString<u32>, same: bool| {
                merged.push((*kept.context(), *dup.context(), same));
            },
        );
        d.dissolve_all([
            ss(&[(0.0, 0.0), (1.0, 1.0), (2.0, 0.0)], 1),
            ss(&[(2.0, 0.0), (1.0, 1.0), (0.0, 0.0)], 2),
            ss(&[(0.0, 0.0), (1.0, 1.0), (2.0, 0.0)], 3),
            ss(&[(0.0, 0.0), (1.0, 1.0)], 4),
        ]);
        let kept: Vec<u32> = d.dissolved().iter().map(|s| *s.context()).collect();
        assert_eq!(kept, vec![1, 4]);
        drop(d);
        assert_eq!(merged, vec![(1, 2, false), (1, 3, true)]);
    }

    #[test]
    fn negative_zero_matches_zero() {
        let mut d = SegmentStringDissolver::new();
        d.dissolve(ss(&[(0.0, 0.0), (1.0, 0.0)], 0));
        d.dissolve(ss(&[(-0.0, 0.0), (1.0, -0.0)], 1));
        assert_eq!(d.into_dissolved().len(), 1);
    }
}
