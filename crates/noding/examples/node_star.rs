//! Node a sine star against a grid and print per-stage counts.
//!
//! Usage:
//!   cargo run -p noding --example node_star -- [grid_size]
//!
//! Without a grid size the linework is noded in floating precision by the
//! iterated noder; with one it is snap-rounded to that grid.

use noding::geom::{Geometry, PrecisionModel};
use noding::noder::{
    IteratedCfg, IteratedNoder, Noder, NodingValidator, SegmentString, SegmentStringDissolver,
    SnapRoundCfg, SnapRoundingNoder,
};
use noding::shape::{grid_lines, sine_star, ReplayToken};

fn main() {
    let grid: Option<f64> = std::env::args().nth(1).and_then(|s| s.parse().ok());
    let star = sine_star(ReplayToken::new(2025, 0), 200, 40.0, 12.0, 9);
    let mut lines = grid_lines(11, 10.0);
    for l in &mut lines {
        for p in l.iter_mut() {
            p.x -= 50.0;
            p.y -= 50.0;
        }
    }
    lines.push(star);
    println!("input: {} lines", lines.len());

    let noded: Vec<SegmentString> = match grid {
        None => {
            let strings = lines.into_iter().map(SegmentString::new).collect();
            let mut noder = IteratedNoder::new(IteratedCfg::default());
            match noder.node(strings) {
                Ok(noded) => {
                    println!("iterated: {} passes", noder.iterations());
                    noded
                }
                Err(e) => {
                    eprintln!("noding failed: {e}");
                    return;
                }
            }
        }
        Some(g) => {
            let noder = SnapRoundingNoder::new(SnapRoundCfg {
                precision: PrecisionModel::fixed_grid(g),
                ..SnapRoundCfg::default()
            });
            let geoms: Vec<Geometry> = lines.into_iter().map(Geometry::LineString).collect();
            match noder.snap_round(&geoms) {
                Ok(out) => out.into_iter().map(SegmentString::new).collect(),
                Err(e) => {
                    eprintln!("snap rounding failed: {e}");
                    return;
                }
            }
        }
    };
    println!("noded: {} substrings", noded.len());
    match NodingValidator::check_valid(&noded) {
        Ok(()) => println!("valid"),
        Err(e) => println!("invalid: {e}"),
    }
    let mut dissolver = SegmentStringDissolver::new();
    dissolver.dissolve_all(noded);
    println!("dissolved: {} unique", dissolver.dissolved().len());
}
