use super::*;
use crate::geom::coord;
use proptest::prelude::*;

fn zigzag() -> Vec<Coord> {
    vec![
        coord(0.0, 0.0),
        coord(1.0, 1.0),
        coord(2.0, 3.0),
        coord(3.0, 1.0),
        coord(3.0, 1.0),
        coord(4.0, 0.0),
        coord(5.0, 2.0),
    ]
}

#[test]
fn quadrant_conventions() {
    let o = coord(0.0, 0.0);
    assert_eq!(quadrant(o, coord(1.0, 1.0)), Some(Quadrant::NE));
    assert_eq!(quadrant(o, coord(-1.0, 1.0)), Some(Quadrant::NW));
    assert_eq!(quadrant(o, coord(-1.0, -1.0)), Some(Quadrant::SW));
    assert_eq!(quadrant(o, coord(1.0, -1.0)), Some(Quadrant::SE));
    // Axis-parallel steps fall on the east / north side.
    assert_eq!(quadrant(o, coord(0.0, 1.0)), Some(Quadrant::NE));
    assert_eq!(quadrant(o, coord(-1.0, 0.0)), Some(Quadrant::NW));
    assert_eq!(quadrant(o, o), None);
}

#[test]
fn zigzag_splits_at_turns_and_ignores_repeats() {
    let mut next_id = 10;
    let chains = build_chains(&zigzag(), 4, &mut next_id);
    let ranges: Vec<(usize, usize)> = chains.iter().map(|c| (c.start, c.end)).collect();
    assert_eq!(ranges, vec![(0, 2), (2, 5), (5, 6)]);
    assert_eq!(chains.iter().map(|c| c.id).collect::<Vec<_>>(), vec![10, 11, 12]);
    assert_eq!(next_id, 13);
    assert!(chains.iter().all(|c| c.string == 4));
}

#[test]
fn fully_degenerate_string_is_one_chain() {
    let pts = vec![coord(1.0, 1.0); 4];
    let mut next_id = 0;
    let chains = build_chains(&pts, 0, &mut next_id);
    assert_eq!(chains.len(), 1);
    assert_eq!((chains[0].start, chains[0].end), (0, 3));
    assert!(build_chains(&pts[..1], 0, &mut next_id).is_empty());
}

#[test]
fn envelope_is_cached_from_endpoints() {
    let pts = zigzag();
    let mut next_id = 0;
    let chains = build_chains(&pts, 0, &mut next_id);
    assert_eq!(chains[1].envelope(&pts), Envelope::new(2.0, 4.0, 0.0, 3.0));
    assert_eq!(
        chains[1].envelope_expanded(&pts, 0.5),
        Envelope::new(1.5, 4.5, -0.5, 3.5)
    );
}

#[test]
fn overlaps_find_every_segment_pair_with_touching_envelopes() {
    let a: Vec<Coord> = (0..20).map(|i| coord(i as f64, i as f64 * 0.5)).collect();
    let b: Vec<Coord> = (0..20).map(|i| coord(i as f64, 10.0 - i as f64 * 0.5)).collect();
    let mut next_id = 0;
    let ca = build_chains(&a, 0, &mut next_id);
    let cb = build_chains(&b, 1, &mut next_id);
    assert_eq!((ca.len(), cb.len()), (1, 1));
    let mut found = Vec::new();
    ca[0].compute_overlaps(&a, &cb[0], &b, 0.0, &mut |i, j| found.push((i, j)));
    for i in 0..a.len() - 1 {
        for j in 0..b.len() - 1 {
            if Envelope::segments_intersect(a[i], a[i + 1], b[j], b[j + 1]) {
                assert!(found.contains(&(i, j)), "missed ({i}, {j})");
            }
        }
    }
}

#[test]
fn select_reports_segments_near_a_window() {
    let pts: Vec<Coord> = (0..16).map(|i| coord(i as f64, i as f64)).collect();
    let mut next_id = 0;
    let chains = build_chains(&pts, 0, &mut next_id);
    let mut found = Vec::new();
    chains[0].select(&pts, &Envelope::new(6.5, 7.5, 6.5, 7.5), &mut |i| found.push(i));
    assert!(found.contains(&6));
    assert!(found.contains(&7));
    assert!(found.len() <= 4);
}

fn polyline() -> impl Strategy<Value = Vec<Coord>> {
    prop::collection::vec((-5i32..5, -5i32..5), 2..30)
        .prop_map(|v| v.into_iter().map(|(x, y)| coord(x as f64, y as f64)).collect())
}

proptest! {
    #[test]
    fn chains_are_monotone_and_partition_the_string(pts in polyline()) {
        let mut next_id = 0;
        let chains = build_chains(&pts, 0, &mut next_id);
        prop_assert!(!chains.is_empty());
        prop_assert_eq!(chains[0].start, 0);
        prop_assert_eq!(chains[chains.len() - 1].end, pts.len() - 1);
        for w in chains.windows(2) {
            prop_assert_eq!(w[0].end, w[1].start);
            prop_assert!(w[0].id < w[1].id);
        }
        for c in &chains {
            prop_assert!(c.end > c.start);
            let quads: Vec<Quadrant> = (c.start..c.end)
                .filter_map(|i| quadrant(pts[i], pts[i + 1]))
                .collect();
            prop_assert!(quads.windows(2).all(|q| q[0] == q[1]));
        }
    }
}
