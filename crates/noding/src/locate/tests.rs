use super::*;
use crate::geom::{coord, Geometry};
use crate::shape::{sine_star, ReplayToken};
use rand::Rng;

fn square() -> Vec<Coord> {
    vec![
        coord(0.0, 0.0),
        coord(10.0, 0.0),
        coord(10.0, 10.0),
        coord(0.0, 10.0),
        coord(0.0, 0.0),
    ]
}

#[test]
fn square_interior_boundary_exterior() {
    let ring = square();
    assert_eq!(locate_point_in_ring(coord(5.0, 5.0), &ring), Location::Interior);
    assert_eq!(locate_point_in_ring(coord(0.0, 5.0), &ring), Location::Boundary);
    assert_eq!(locate_point_in_ring(coord(10.0, 10.0), &ring), Location::Boundary);
    assert_eq!(locate_point_in_ring(coord(5.0, 0.0), &ring), Location::Boundary);
    assert_eq!(locate_point_in_ring(coord(15.0, 5.0), &ring), Location::Exterior);
    assert_eq!(locate_point_in_ring(coord(-1.0, 0.0), &ring), Location::Exterior);
    assert_eq!(Location::Boundary.symbol(), 'b');
}

#[test]
fn ray_through_a_vertex_counts_once() {
    // Diamond: the ray from (0, 0) passes through the vertex (5, 0).
    let ring = vec![
        coord(0.0, -5.0),
        coord(5.0, 0.0),
        coord(0.0, 5.0),
        coord(-5.0, 0.0),
        coord(0.0, -5.0),
    ];
    assert_eq!(locate_point_in_ring(coord(0.0, 0.0), &ring), Location::Interior);
    assert_eq!(locate_point_in_ring(coord(-6.0, 0.0), &ring), Location::Exterior);
}

#[test]
fn holes_flip_the_parity() {
    let hole = vec![
        coord(4.0, 4.0),
        coord(6.0, 4.0),
        coord(6.0, 6.0),
        coord(4.0, 6.0),
        coord(4.0, 4.0),
    ];
    let g = Geometry::Polygon {
        shell: square(),
        holes: vec![hole],
    };
    let loc = IndexedPointInAreaLocator::from_geometry(&g).unwrap();
    assert_eq!(loc.locate(coord(5.0, 5.0)), Location::Exterior);
    assert_eq!(loc.locate(coord(2.0, 5.0)), Location::Interior);
    assert_eq!(loc.locate(coord(4.0, 5.0)), Location::Boundary);
}

#[test]
fn indexed_locators_agree_with_brute_force() {
    let token = ReplayToken::new(9, 0);
    let ring = sine_star(token, 120, 10.0, 3.0, 7);
    let by_tree = IndexedPointInAreaLocator::new(&[ring.clone()]).unwrap();
    let by_chains = McPointInRing::new(ring.clone()).unwrap();
    let mut rng = token.next().to_std_rng();
    for _ in 0..500 {
        let p = coord(rng.gen_range(-15.0..15.0), rng.gen_range(-15.0..15.0));
        let expected = locate_point_in_ring(p, &ring);
        assert_eq!(by_tree.locate(p), expected, "{p:?}");
        assert_eq!(by_chains.locate(p), expected, "{p:?}");
    }
    // Every vertex is on the boundary.
    for p in &ring {
        assert_eq!(by_tree.locate(*p), Location::Boundary);
        assert_eq!(by_chains.locate(*p), Location::Boundary);
    }
}
