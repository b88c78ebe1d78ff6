use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use noding::geom::{Geometry, PrecisionModel};
use noding::noder::{
    IteratedCfg, IteratedNoder, Noder, NoderKind, NodingValidator, SegmentString,
    SegmentStringDissolver, SnapRoundCfg, SnapRoundingNoder,
};
use noding::shape::{grid_lines, random_lines, sine_star, ReplayToken};
use noding::Coord;
use serde_json::json;
use std::path::PathBuf;
use tracing_subscriber::fmt::SubscriberBuilder;

mod provenance;
mod table;

use provenance::{write_sidecar, Payload};

#[derive(Parser)]
#[command(name = "cli")]
#[command(about = "Generate, node and validate planar linework")]
struct Cmd {
    #[command(subcommand)]
    action: Action,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ShapeKind {
    Random,
    Star,
    Grid,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum NoderArg {
    Mc,
    Sweep,
    Simple,
}

impl From<NoderArg> for NoderKind {
    fn from(arg: NoderArg) -> Self {
        match arg {
            NoderArg::Mc => NoderKind::McIndex,
            NoderArg::Sweep => NoderKind::McSweepLine,
            NoderArg::Simple => NoderKind::Simple,
        }
    }
}

#[derive(Subcommand)]
enum Action {
    /// Write synthetic linework as a `line,x,y` CSV
    Generate {
        #[arg(long, value_enum, default_value_t = ShapeKind::Random)]
        kind: ShapeKind,
        /// Lines for `random`, vertices for `star`, lines per axis for `grid`
        #[arg(long, default_value_t = 20)]
        count: usize,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long)]
        out: PathBuf,
    },
    /// Node a linework CSV; `--grid` switches to snap rounding
    Node {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        out: PathBuf,
        /// Grid cell size for snap rounding; must be positive
        #[arg(long, value_parser = parse_grid)]
        grid: Option<f64>,
        #[arg(long, default_value_t = 5)]
        max_iter: usize,
        #[arg(long, value_enum, default_value_t = NoderArg::Mc)]
        noder: NoderArg,
        #[arg(long)]
        validate: bool,
        /// Merge lines with identical coordinates after noding
        #[arg(long)]
        dissolve: bool,
    },
    /// Check that a linework CSV is fully noded
    Validate {
        #[arg(long)]
        input: PathBuf,
    },
    /// Print a small provenance JSON block
    Report,
}

fn parse_grid(s: &str) -> std::result::Result<f64, String> {
    let grid: f64 = s.parse().map_err(|e| format!("{e}"))?;
    if grid.is_finite() && grid > 0.0 {
        Ok(grid)
    } else {
        Err(format!("grid size must be a positive number, got {s}"))
    }
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Generate {
            kind,
            count,
            seed,
            out,
        } => generate(kind, count, seed, out),
        Action::Node {
            input,
            out,
            grid,
            max_iter,
            noder,
            validate,
            dissolve,
        } => {
            let opts = NodeOpts {
                grid,
                max_iter,
                noder: noder.into(),
                validate,
                dissolve,
            };
            node(input, out, &opts)
        }
        Action::Validate { input } => validate(input),
        Action::Report => report(),
    }
}

fn shape(kind: ShapeKind, count: usize, seed: u64) -> Vec<Vec<Coord>> {
    let tok = ReplayToken::new(seed, 0);
    match kind {
        ShapeKind::Random => random_lines(tok, count, 12, 100.0),
        ShapeKind::Star => vec![sine_star(tok, count.max(3), 50.0, 15.0, 7)],
        ShapeKind::Grid => grid_lines(count, 10.0),
    }
}

fn generate(kind: ShapeKind, count: usize, seed: u64, out: PathBuf) -> Result<()> {
    let lines = shape(kind, count, seed);
    let vertices: usize = lines.iter().map(Vec::len).sum();
    tracing::info!(kind = ?kind, lines = lines.len(), vertices, "generate");
    table::write_lines(&out, &lines)?;
    let payload = Payload::new(json!({
        "kind": format!("{kind:?}").to_lowercase(),
        "count": count,
        "seed": seed,
    }))
    .with_stats(json!({ "lines": lines.len(), "vertices": vertices }));
    write_sidecar(&out, payload)?;
    Ok(())
}

struct NodeOpts {
    grid: Option<f64>,
    max_iter: usize,
    noder: NoderKind,
    validate: bool,
    dissolve: bool,
}

/// Noded lines plus the number of passes run (1 for snap rounding).
fn node_lines(lines: Vec<Vec<Coord>>, opts: &NodeOpts) -> Result<(Vec<Vec<Coord>>, usize)> {
    let (strings, passes): (Vec<SegmentString>, usize) = match opts.grid {
        Some(grid) => {
            anyhow::ensure!(
                grid.is_finite() && grid > 0.0,
                "grid size must be positive, got {grid}"
            );
            let noder = SnapRoundingNoder::new(SnapRoundCfg {
                precision: PrecisionModel::fixed_grid(grid),
                validate: opts.validate,
                ..SnapRoundCfg::default()
            });
            let geoms: Vec<Geometry> = lines.into_iter().map(Geometry::LineString).collect();
            let noded = noder.snap_round(&geoms).context("snap rounding")?;
            (noded.into_iter().map(SegmentString::new).collect(), 1)
        }
        None => {
            let mut noder = IteratedNoder::new(IteratedCfg {
                max_iterations: opts.max_iter,
                noder: opts.noder,
                ..IteratedCfg::default()
            });
            let input = lines.into_iter().map(SegmentString::new).collect();
            let noded = noder.node(input).context("iterated noding")?;
            if opts.validate {
                NodingValidator::check_valid(&noded).context("validating noded output")?;
            }
            (noded, noder.iterations())
        }
    };
    let strings = if opts.dissolve {
        let mut dissolver = SegmentStringDissolver::new();
        dissolver.dissolve_all(strings);
        dissolver.into_dissolved()
    } else {
        strings
    };
    Ok((
        strings.into_iter().map(SegmentString::into_coords).collect(),
        passes,
    ))
}

fn node(input: PathBuf, out: PathBuf, opts: &NodeOpts) -> Result<()> {
    let lines = table::read_lines(&input)?;
    let input_lines = lines.len();
    let (noded, passes) = node_lines(lines, opts)?;
    tracing::info!(input_lines, output_lines = noded.len(), passes, "node");
    table::write_lines(&out, &noded)?;
    let payload = Payload::new(json!({
        "input": input.to_string_lossy(),
        "grid": opts.grid,
        "max_iter": opts.max_iter,
        "noder": format!("{:?}", opts.noder),
        "validate": opts.validate,
        "dissolve": opts.dissolve,
    }))
    .with_stats(json!({
        "input_lines": input_lines,
        "output_lines": noded.len(),
        "passes": passes,
    }));
    write_sidecar(&out, payload)?;
    Ok(())
}

fn validate(input: PathBuf) -> Result<()> {
    let strings: Vec<SegmentString> = table::read_lines(&input)?
        .into_iter()
        .map(SegmentString::new)
        .collect();
    let result = NodingValidator::check_valid(&strings);
    let obj = json!({
        "input": input.to_string_lossy(),
        "lines": strings.len(),
        "valid": result.is_ok(),
        "error": result.as_ref().err().map(|e| e.to_string()),
    });
    println!("{}", serde_json::to_string_pretty(&obj)?);
    result.with_context(|| format!("{} is not noded", input.display()))
}

fn report() -> Result<()> {
    let obj = json!({
        "code_rev": provenance::code_rev(),
        "noding_version": noding::VERSION,
        "params": {},
        "outputs": []
    });
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}
