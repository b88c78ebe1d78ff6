use super::*;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_envs(n: usize, seed: u64) -> Vec<Envelope> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            let x = rng.gen_range(-100.0..100.0);
            let y = rng.gen_range(-100.0..100.0);
            // Some items are points or horizontal/vertical slivers.
            let w = if rng.gen_bool(0.2) { 0.0 } else { rng.gen_range(0.0..10.0) };
            let h = if rng.gen_bool(0.2) { 0.0 } else { rng.gen_range(0.0..10.0) };
            Envelope::new(x, x + w, y, y + h)
        })
        .collect()
}

fn brute_force(envs: &[Envelope], q: &Envelope) -> Vec<usize> {
    (0..envs.len()).filter(|&i| envs[i].intersects(q)).collect()
}

fn conformance<I: SpatialIndex<usize>>(mut index: I, envs: &[Envelope], queries: &[Envelope]) {
    for (i, env) in envs.iter().enumerate() {
        index.insert(*env, i).unwrap();
    }
    assert_eq!(index.len(), envs.len());
    for q in queries {
        let mut got = index.query(q);
        got.sort();
        assert_eq!(got, brute_force(envs, q), "query {q:?}");
    }
}

#[test]
fn every_2d_variant_matches_brute_force() {
    let envs = random_envs(500, 7);
    let queries = random_envs(50, 8);
    conformance(StrTree::new(), &envs, &queries);
    conformance(StrTree::with_node_capacity(3), &envs, &queries);
    conformance(Quadtree::new(), &envs, &queries);
    conformance(Index::new(IndexKind::StrTree), &envs, &queries);
    conformance(Index::new(IndexKind::Quadtree), &envs, &queries);
}

#[test]
fn every_1d_variant_matches_brute_force() {
    let envs = random_envs(300, 11);
    let ivs: Vec<Interval> = envs.iter().map(|e| Interval::new(e.min_x, e.max_x)).collect();
    let mut bt = Bintree::new();
    let mut rt = SortedPackedIntervalRTree::new();
    for (i, iv) in ivs.iter().enumerate() {
        bt.insert(*iv, i).unwrap();
        rt.insert(*iv, i).unwrap();
    }
    for q in random_envs(40, 12) {
        let q = Interval::new(q.min_x, q.max_x);
        let expected: Vec<usize> = (0..ivs.len()).filter(|&i| ivs[i].overlaps(&q)).collect();
        let mut a = bt.query(&q);
        a.sort();
        let mut b = rt.query(&q);
        b.sort();
        assert_eq!(a, expected);
        assert_eq!(b, expected);
    }
}

#[test]
fn empty_indexes_return_nothing() {
    let q = Envelope::new(-1.0, 1.0, -1.0, 1.0);
    assert!(Index::<u32>::new(IndexKind::StrTree).query(&q).is_empty());
    assert!(Index::<u32>::new(IndexKind::Quadtree).query(&q).is_empty());
    assert!(Bintree::<u32>::new().query(&Interval::new(0.0, 1.0)).is_empty());
    assert!(SortedPackedIntervalRTree::<u32>::new()
        .query(&Interval::new(0.0, 1.0))
        .is_empty());
    let mut sweep = SweepLineIndex::<u32>::new();
    sweep.compute_overlaps(|_, _| panic!("no intervals"));
    assert!(sweep.is_empty());
}

#[test]
fn remove_then_query_across_variants() {
    let envs = random_envs(100, 3);
    let mut qt = Quadtree::new();
    let mut st = StrTree::new();
    for (i, e) in envs.iter().enumerate() {
        qt.insert(*e, i).unwrap();
        st.insert(*e, i).unwrap();
    }
    for i in (0..100).step_by(3) {
        assert!(qt.remove(&envs[i], &i));
        assert!(st.remove(&envs[i], &i));
    }
    let all = Envelope::new(-200.0, 200.0, -200.0, 200.0);
    let mut a = qt.query(&all);
    let mut b = st.query(&all);
    a.sort();
    b.sort();
    let expected: Vec<usize> = (0..100).filter(|i| i % 3 != 0).collect();
    assert_eq!(a, expected);
    assert_eq!(b, expected);
    assert_eq!(qt.len(), expected.len());
}

#[test]
fn sweep_line_matches_pairwise_overlaps() {
    let envs = random_envs(200, 21);
    let mut sweep = SweepLineIndex::new();
    for (i, e) in envs.iter().enumerate() {
        sweep.add(Interval::new(e.min_x, e.max_x), i).unwrap();
    }
    let mut got = Vec::new();
    sweep.compute_overlaps(|a, b| got.push((*a.min(b), *a.max(b))));
    got.sort();
    let mut expected = Vec::new();
    for i in 0..envs.len() {
        for j in i + 1..envs.len() {
            if envs[i].min_x <= envs[j].max_x && envs[j].min_x <= envs[i].max_x {
                expected.push((i, j));
            }
        }
    }
    assert_eq!(got, expected);
}

#[test]
fn concurrent_first_queries_build_once() {
    let envs = random_envs(2000, 99);
    let mut tree = StrTree::new();
    for (i, e) in envs.iter().enumerate() {
        tree.insert(*e, i).unwrap();
    }
    let tree = &tree;
    let queries = random_envs(8, 100);
    std::thread::scope(|s| {
        for q in &queries {
            let envs = &envs;
            s.spawn(move || {
                let mut got = tree.query(q);
                got.sort();
                assert_eq!(got, brute_force(envs, q));
            });
        }
    });
    assert!(tree.is_built());
}

fn env_strategy() -> impl Strategy<Value = Envelope> {
    (-50.0..50.0f64, -50.0..50.0f64, 0.0..5.0f64, 0.0..5.0f64)
        .prop_map(|(x, y, w, h)| Envelope::new(x, x + w, y, y + h))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn query_never_misses_an_intersecting_item(
        envs in prop::collection::vec(env_strategy(), 1..60),
        q in env_strategy(),
    ) {
        let expected = brute_force(&envs, &q);
        for kind in [IndexKind::StrTree, IndexKind::Quadtree] {
            let mut idx = Index::new(kind);
            for (i, e) in envs.iter().enumerate() {
                idx.insert(*e, i).unwrap();
            }
            let mut got = idx.query(&q);
            got.sort();
            prop_assert_eq!(&got, &expected);
        }
        let mut bt = Bintree::new();
        for (i, e) in envs.iter().enumerate() {
            bt.insert(Interval::new(e.min_y, e.max_y), i).unwrap();
        }
        let qi = Interval::new(q.min_y, q.max_y);
        let hits = bt.query(&qi);
        for (i, e) in envs.iter().enumerate() {
            if Interval::new(e.min_y, e.max_y).overlaps(&qi) {
                prop_assert!(hits.contains(&i));
            }
        }
    }
}
