//! Synthetic linework for tests, benchmarks and the CLI.
//!
//! Purpose
//! - Deterministic generators with tunable density of intersections:
//!   random walks (many crossings, near-parallel pairs), sine stars (one
//!   simple ring with many vertices) and grids (regular crossings, collinear
//!   touches at the border).
//!
//! Model
//! - Determinism uses a replay token `(seed, index)` mixed into a single RNG;
//!   the same token always yields the same linework.

use std::f64::consts::PI;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::geom::{coord, Coord};

/// Replay token to make draws reproducible and indexable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ReplayToken {
    pub seed: u64,
    pub index: u64,
}

impl ReplayToken {
    pub fn new(seed: u64, index: u64) -> Self {
        Self { seed, index }
    }

    /// The token for the next draw of the same seed.
    pub fn next(self) -> Self {
        Self {
            seed: self.seed,
            index: self.index.wrapping_add(1),
        }
    }

    #[inline]
    pub fn to_std_rng(self) -> StdRng {
        // SplitMix64-style mixing.
        fn mix(mut x: u64) -> u64 {
            x ^= x >> 30;
            x = x.wrapping_mul(0xbf58476d1ce4e5b9);
            x ^= x >> 27;
            x = x.wrapping_mul(0x94d049bb133111eb);
            x ^ (x >> 31)
        }
        let k = mix(self.seed ^ mix(self.index.wrapping_add(0x9e3779b97f4a7c15)));
        StdRng::seed_from_u64(k)
    }
}

/// `count` random-walk polylines of 2 to `max_points` vertices inside
/// `[0, extent]²`. Steps are at most a quarter of the extent.
pub fn random_lines(tok: ReplayToken, count: usize, max_points: usize, extent: f64) -> Vec<Vec<Coord>> {
    let mut rng = tok.to_std_rng();
    let max_points = max_points.max(2);
    let step = extent / 4.0;
    (0..count)
        .map(|_| {
            let n = rng.gen_range(2..=max_points);
            let mut p = coord(rng.gen_range(0.0..extent), rng.gen_range(0.0..extent));
            let mut line = Vec::with_capacity(n);
            line.push(p);
            while line.len() < n {
                let q = coord(
                    (p.x + rng.gen_range(-step..step)).clamp(0.0, extent),
                    (p.y + rng.gen_range(-step..step)).clamp(0.0, extent),
                );
                if q != p {
                    line.push(q);
                    p = q;
                }
            }
            line
        })
        .collect()
}

/// Closed ring `r(θ) = radius + amplitude·sin(lobes·θ)` sampled at `n`
/// angles with a random phase and 1% radial jitter. Simple whenever
/// `amplitude < radius`.
pub fn sine_star(tok: ReplayToken, n: usize, radius: f64, amplitude: f64, lobes: u32) -> Vec<Coord> {
    let mut rng = tok.to_std_rng();
    let n = n.max(3);
    let phase = rng.gen::<f64>() * 2.0 * PI;
    let mut ring: Vec<Coord> = (0..n)
        .map(|k| {
            let t = phase + 2.0 * PI * k as f64 / n as f64;
            let jitter = 1.0 + (rng.gen::<f64>() * 2.0 - 1.0) * 0.01;
            let r = (radius + amplitude * (lobes as f64 * t).sin()) * jitter;
            coord(r * t.cos(), r * t.sin())
        })
        .collect();
    ring.push(ring[0]);
    ring
}

/// `n` horizontal and `n` vertical two-point lines spaced `spacing` apart,
/// each spanning the whole grid.
pub fn grid_lines(n: usize, spacing: f64) -> Vec<Vec<Coord>> {
    let len = n.saturating_sub(1) as f64 * spacing;
    let mut lines = Vec::with_capacity(2 * n);
    for i in 0..n {
        let v = i as f64 * spacing;
        lines.push(vec![coord(0.0, v), coord(len, v)]);
        lines.push(vec![coord(v, 0.0), coord(v, len)]);
    }
    lines
}
