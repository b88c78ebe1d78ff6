use std::collections::HashSet;

use proptest::prelude::*;

use super::*;
use crate::error::ValidationError;
use crate::geom::{coord, Geometry, PrecisionModel};
use crate::index::IndexKind;
use crate::math::LineIntersector;
use crate::shape::{random_lines, ReplayToken};

fn line(pts: &[(f64, f64)]) -> Vec<Coord> {
    pts.iter().map(|&(x, y)| coord(x, y)).collect()
}

fn coords_of<C>(strings: &[SegmentString<C>]) -> Vec<Vec<Coord>> {
    let mut out: Vec<Vec<Coord>> = strings.iter().map(|s| s.coords().to_vec()).collect();
    out.sort_by(|a, b| {
        let key = |l: &Vec<Coord>| l.iter().flat_map(|p| [p.x, p.y]).collect::<Vec<f64>>();
        key(a).partial_cmp(&key(b)).unwrap()
    });
    out
}

#[test]
fn two_crossing_segments_split_at_the_crossing() {
    let strings = vec![
        SegmentString::new(line(&[(0.0, 0.0), (10.0, 10.0)])),
        SegmentString::new(line(&[(0.0, 10.0), (10.0, 0.0)])),
    ];
    let mut noder = McIndexNoder::new(IntersectionAdder::default());
    let noded = noder.node(strings).unwrap();
    assert_eq!(
        coords_of(&noded),
        vec![
            line(&[(0.0, 0.0), (5.0, 5.0)]),
            line(&[(0.0, 10.0), (5.0, 5.0)]),
            line(&[(5.0, 5.0), (10.0, 0.0)]),
            line(&[(5.0, 5.0), (10.0, 10.0)]),
        ]
    );
    assert_eq!(NodingValidator::check_valid(&noded), Ok(()));
}

#[test]
fn collapsed_string_fails_validation() {
    let strings = vec![SegmentString::new(line(&[(0.0, 0.0), (5.0, 0.0), (0.0, 0.0)]))];
    let err = NodingValidator::check_valid(&strings).unwrap_err();
    assert!(matches!(err, ValidationError::Collapse { at, .. } if at == coord(0.0, 0.0)));
}

#[test]
fn contexts_follow_their_substrings() {
    let strings = SegmentString::from_lines(vec![
        line(&[(0.0, 0.0), (10.0, 0.0)]),
        line(&[(5.0, -5.0), (5.0, 5.0)]),
    ]);
    let mut noder = McIndexNoder::new(IntersectionAdder::default());
    let noded = noder.node(strings).unwrap();
    assert_eq!(noded.len(), 4);
    for s in &noded {
        let horizontal = s.coords()[0].y == s.coords()[1].y;
        assert_eq!(*s.context(), if horizontal { 0 } else { 1 });
    }
}

#[test]
fn each_segment_pair_is_processed_at_most_once() {
    let lines = random_lines(ReplayToken::new(3, 0), 40, 8, 100.0);
    let mut strings: Vec<SegmentString> = lines.into_iter().map(SegmentString::new).collect();
    for kind in [IndexKind::StrTree, IndexKind::Quadtree] {
        let mut seen = HashSet::new();
        let mut duplicates = 0;
        let mut noder = McIndexNoder::new(|a: SegmentView<'_>, b: SegmentView<'_>| {
            let (ka, kb) = ((a.string, a.index), (b.string, b.index));
            if !seen.insert((ka.min(kb), ka.max(kb))) {
                duplicates += 1;
            }
            Intersection::None
        })
        .with_index(kind);
        noder.compute_nodes(&mut strings).unwrap();
        drop(noder);
        assert_eq!(duplicates, 0, "{kind:?}");
    }
}

#[test]
fn indexed_noders_agree_with_all_pairs() {
    let lines = random_lines(ReplayToken::new(11, 0), 30, 6, 50.0);
    let make = || -> Vec<SegmentString> { lines.iter().cloned().map(SegmentString::new).collect() };

    let expected = coords_of(&SimpleNoder::new(IntersectionAdder::default()).node(make()).unwrap());
    for kind in [IndexKind::StrTree, IndexKind::Quadtree] {
        let got = McIndexNoder::new(IntersectionAdder::default())
            .with_index(kind)
            .node(make())
            .unwrap();
        assert_eq!(coords_of(&got), expected, "{kind:?}");
    }
    let got = McSweepLineNoder::new(IntersectionAdder::default()).node(make()).unwrap();
    assert_eq!(coords_of(&got), expected);
}

#[test]
fn all_pairs_noder_sees_both_orders() {
    let mut strings = vec![
        SegmentString::new(line(&[(0.0, 0.0), (10.0, 10.0)])),
        SegmentString::new(line(&[(0.0, 10.0), (10.0, 0.0)])),
    ];
    let mut calls = 0;
    let mut noder = SimpleNoder::new(|_: SegmentView<'_>, _: SegmentView<'_>| {
        calls += 1;
        Intersection::None
    });
    noder.compute_nodes(&mut strings).unwrap();
    drop(noder);
    // Four ordered string pairs, one segment each.
    assert_eq!(calls, 4);
}

#[test]
fn finder_terminates_early() {
    let lines = random_lines(ReplayToken::new(5, 1), 60, 10, 100.0);
    let mut strings: Vec<SegmentString> = lines.into_iter().map(SegmentString::new).collect();
    let mut all = McIndexNoder::new(InteriorIntersectionFinder::default().find_all());
    all.compute_nodes(&mut strings).unwrap();
    let total = all.intersector().num_tests();
    let mut first = McIndexNoder::new(InteriorIntersectionFinder::default());
    first.compute_nodes(&mut strings).unwrap();
    assert!(first.intersector().has_intersection());
    assert!(first.intersector().num_tests() <= total);
    assert!(first.overlap_count() <= all.overlap_count());
    // Neither records nodes.
    assert!(strings.iter().all(|s| s.nodes().is_empty()));
}

#[test]
fn red_blue_noding_ignores_pairs_within_a_set() {
    let mut red = vec![
        SegmentString::new(line(&[(0.0, 0.0), (10.0, 10.0)])),
        SegmentString::new(line(&[(0.0, 10.0), (10.0, 0.0)])),
    ];
    let mut blue = vec![SegmentString::new(line(&[(0.0, 2.0), (10.0, 2.0)]))];
    let mut noder = McIndexNoder::new(IntersectionAdder::default());
    noder.compute_nodes_between(&mut red, &mut blue).unwrap();
    let red_nodes: Vec<Coord> = red.iter().flat_map(|s| s.nodes().iter().map(|n| n.coord)).collect();
    assert_eq!(red_nodes, line(&[(2.0, 2.0), (8.0, 2.0)]));
    assert_eq!(blue[0].nodes().len(), 2);
    // The red crossing at (5, 5) is not a node.
    assert!(!red_nodes.contains(&coord(5.0, 5.0)));
}

#[test]
fn iterated_noder_converges_on_random_linework() {
    let lines = random_lines(ReplayToken::new(42, 0), 50, 12, 100.0);
    let strings: Vec<SegmentString> = lines.into_iter().map(SegmentString::new).collect();
    for noder_kind in [NoderKind::McIndex, NoderKind::McSweepLine, NoderKind::Simple] {
        let mut noder = IteratedNoder::new(IteratedCfg {
            noder: noder_kind,
            ..IteratedCfg::default()
        });
        match noder.node(strings.clone()) {
            Ok(noded) => {
                assert!(noder.iterations() >= 1);
                let mut check = McIndexNoder::new(InteriorIntersectionFinder::default());
                let mut noded = noded;
                check.compute_nodes(&mut noded).unwrap();
                assert!(!check.intersector().has_intersection(), "{noder_kind:?}");
            }
            Err(NodingError::NonConvergence { iterations, .. }) => {
                assert!(iterations > IteratedCfg::default().max_iterations)
            }
            Err(e) => panic!("unexpected error {e}"),
        }
    }
}

#[test]
fn iterated_noder_rounds_to_a_fixed_grid() {
    let strings = vec![
        SegmentString::new(line(&[(0.0, 0.0), (10.0, 3.2)])),
        SegmentString::new(line(&[(0.0, 3.2), (10.0, 0.0)])),
    ];
    let mut noder = IteratedNoder::new(IteratedCfg {
        precision: PrecisionModel::fixed_grid(1.0),
        ..IteratedCfg::default()
    });
    let noded = noder.node(strings).unwrap();
    // The crossing (5, 1.6) rounds to (5, 2).
    assert!(noded.iter().all(|s| s.coords().contains(&coord(5.0, 2.0))));
}

#[test]
fn closure_intersector_records_custom_nodes() {
    let mut strings = vec![
        SegmentString::new(line(&[(0.0, 0.0), (10.0, 0.0)])),
        SegmentString::new(line(&[(5.0, -1.0), (5.0, 1.0)])),
    ];
    let li = LineIntersector::new();
    let mut noder = McIndexNoder::new(move |a: SegmentView<'_>, b: SegmentView<'_>| {
        let r = li.compute(a.p0(), a.p1(), b.p0(), b.p1());
        match r.points().first() {
            Some(p) => Intersection::Proper(*p),
            None => Intersection::None,
        }
    });
    noder.compute_nodes(&mut strings).unwrap();
    assert_eq!(strings[0].nodes()[0].coord, coord(5.0, 0.0));
    assert_eq!(strings[1].nodes()[0].coord, coord(5.0, 0.0));
}

#[test]
fn dissolver_removes_shared_pieces_after_noding() {
    let strings = vec![
        SegmentString::new(line(&[(0.0, 0.0), (10.0, 0.0)])),
        SegmentString::new(line(&[(10.0, 0.0), (5.0, 0.0)])),
    ];
    let noded = IteratedNoder::default().node(strings).unwrap();
    assert_eq!(noded.len(), 3);
    let mut d = SegmentStringDissolver::new();
    d.dissolve_all(noded);
    assert_eq!(d.dissolved().len(), 2);
}

/// Same segment, consecutive segments, or the closing pair of a ring.
fn is_trivial_pair(s: &SegmentString, j0: usize, j1: usize) -> bool {
    let last = s.segment_count() - 1;
    j0 == j1 || j0.abs_diff(j1) == 1 || (s.is_closed() && j0.min(j1) == 0 && j0.max(j1) == last)
}

fn small_lines() -> impl Strategy<Value = Vec<Vec<Coord>>> {
    let pt = (-6i32..6, -6i32..6).prop_map(|(x, y)| coord(x as f64, y as f64));
    prop::collection::vec(prop::collection::vec(pt, 2..6), 1..8).prop_map(|lines| {
        lines
            .into_iter()
            .map(|l| crate::geom::remove_repeated_points(&l))
            .filter(|l| l.len() >= 2)
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn iterated_noding_is_valid_or_reports_non_convergence(lines in small_lines()) {
        let strings: Vec<SegmentString> = lines.into_iter().map(SegmentString::new).collect();
        match IteratedNoder::default().node(strings) {
            Ok(noded) => {
                let mut check = McIndexNoder::new(InteriorIntersectionFinder::default());
                let mut noded = noded;
                check.compute_nodes(&mut noded).unwrap();
                prop_assert!(!check.intersector().has_intersection());
            }
            Err(e) => {
                let stalled = matches!(e, NodingError::NonConvergence { .. });
                prop_assert!(stalled);
            }
        }
    }

    #[test]
    fn iterated_output_passes_the_validator(lines in small_lines()) {
        let strings: Vec<SegmentString> = lines.into_iter().map(SegmentString::new).collect();
        if let Ok(noded) = IteratedNoder::default().node(strings) {
            prop_assert_eq!(NodingValidator::check_valid(&noded), Ok(()));
        }
    }

    #[test]
    fn snap_rounded_output_passes_the_validator(lines in small_lines()) {
        let geoms: Vec<Geometry> = lines.into_iter().map(Geometry::LineString).collect();
        let noder = SnapRoundingNoder::new(SnapRoundCfg {
            validate: true,
            ..SnapRoundCfg::default()
        });
        let noded = noder.snap_round(&geoms);
        prop_assert!(noded.is_ok(), "{:?}", noded.as_ref().err());
        let strings: Vec<SegmentString> = noded
            .unwrap_or_default()
            .into_iter()
            .map(SegmentString::new)
            .collect();
        prop_assert_eq!(NodingValidator::check_valid(&strings), Ok(()));
    }

    #[test]
    fn indexed_noder_pairs_every_intersecting_segment(lines in small_lines()) {
        let mut strings: Vec<SegmentString> = lines.into_iter().map(SegmentString::new).collect();
        let li = LineIntersector::new();
        let mut found = HashSet::new();
        let mut noder = McIndexNoder::new(|a: SegmentView<'_>, b: SegmentView<'_>| {
            found.insert(((a.string, a.index), (b.string, b.index)));
            found.insert(((b.string, b.index), (a.string, a.index)));
            Intersection::None
        });
        noder.compute_nodes(&mut strings).unwrap();
        drop(noder);
        for (i0, s0) in strings.iter().enumerate() {
            for (i1, s1) in strings.iter().enumerate() {
                for j0 in 0..s0.segment_count() {
                    for j1 in 0..s1.segment_count() {
                        if i0 == i1 && is_trivial_pair(s0, j0, j1) {
                            continue;
                        }
                        let (p, q) = (s0.coords(), s1.coords());
                        if li.compute(p[j0], p[j0 + 1], q[j1], q[j1 + 1]).has_intersection() {
                            prop_assert!(found.contains(&((i0, j0), (i1, j1))));
                        }
                    }
                }
            }
        }
    }
}
