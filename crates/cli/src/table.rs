//! Linework tables: CSV with columns `line, x, y`.
//!
//! Rows of one line are contiguous and in vertex order; a change of the
//! `line` value starts a new line.

use anyhow::{Context, Result};
use noding::Coord;
use polars::prelude::*;
use std::fs::File;
use std::path::Path;

pub fn read_lines<P: AsRef<Path>>(path: P) -> Result<Vec<Vec<Coord>>> {
    let path = path.as_ref();
    let df = LazyCsvReader::new(path)
        .with_has_header(true)
        .with_infer_schema_length(Some(100))
        .finish()
        .and_then(|lf| lf.collect())
        .with_context(|| format!("reading {}", path.display()))?;
    lines_from_frame(&df)
}

fn lines_from_frame(df: &DataFrame) -> Result<Vec<Vec<Coord>>> {
    let ids = df.column("line")?.cast(&DataType::Int64)?;
    let xs = df.column("x")?.cast(&DataType::Float64)?;
    let ys = df.column("y")?.cast(&DataType::Float64)?;
    let mut out: Vec<Vec<Coord>> = Vec::new();
    let mut current: Option<i64> = None;
    for ((id, x), y) in ids.i64()?.into_iter().zip(xs.f64()?).zip(ys.f64()?) {
        let (Some(id), Some(x), Some(y)) = (id, x, y) else {
            anyhow::bail!("null value in linework table");
        };
        if current != Some(id) {
            out.push(Vec::new());
            current = Some(id);
        }
        if let Some(line) = out.last_mut() {
            line.push(Coord::new(x, y));
        }
    }
    Ok(out)
}

fn frame_from_lines(lines: &[Vec<Coord>]) -> Result<DataFrame> {
    let n: usize = lines.iter().map(Vec::len).sum();
    let mut ids = Vec::with_capacity(n);
    let mut xs = Vec::with_capacity(n);
    let mut ys = Vec::with_capacity(n);
    for (i, line) in lines.iter().enumerate() {
        for p in line {
            ids.push(i as i64);
            xs.push(p.x);
            ys.push(p.y);
        }
    }
    Ok(df!("line" => ids, "x" => xs, "y" => ys)?)
}

pub fn write_lines<P: AsRef<Path>>(path: P, lines: &[Vec<Coord>]) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let mut df = frame_from_lines(lines)?;
    let mut file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut df)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use noding::coord;
    use tempfile::tempdir;

    #[test]
    fn line_ids_split_rows() {
        let df = df!(
            "line" => [0i64, 0, 1, 1, 1],
            "x" => [0.0, 1.0, 5.0, 6.0, 7.0],
            "y" => [0.0, 1.0, 0.0, 0.0, 1.0]
        )
        .unwrap();
        let lines = lines_from_frame(&df).unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], vec![coord(5.0, 0.0), coord(6.0, 0.0), coord(7.0, 1.0)]);
    }

    #[test]
    fn written_table_reads_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sub/lines.csv");
        let lines = vec![
            vec![coord(0.0, 0.0), coord(10.0, 10.0)],
            vec![coord(0.5, 10.0), coord(10.0, -0.25)],
        ];
        write_lines(&path, &lines).unwrap();
        assert_eq!(read_lines(&path).unwrap(), lines);
    }
}
