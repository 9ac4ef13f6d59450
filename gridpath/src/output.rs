use std::{collections::HashSet, io::Write};

use serde::Serialize;

use crate::find::PathResult;
use crate::grid::{Cell, Grid, Point};

/// What gets written when the JSON output is selected
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathReport {
    pub path: Vec<Point>,
    pub total_cost: usize,
    pub length: usize,
}

impl From<PathResult<Point>> for PathReport {
    fn from(result: PathResult<Point>) -> Self {
        Self {
            length: result.path.len(),
            path: result.path,
            total_cost: result.total_cost,
        }
    }
}

/// Write one `row col` line per cell and a closing `.`
pub fn write_path<W: Write>(out: &mut W, path: &[Point]) -> std::io::Result<()> {
    for p in path {
        writeln!(out, "{} {}", p.row, p.col)?;
    }
    writeln!(out, ".")
}

pub fn write_json<W: Write>(out: &mut W, report: &PathReport) -> anyhow::Result<()> {
    serde_json::to_writer(&mut *out, report)?;
    writeln!(out)?;
    Ok(())
}

/// Draw the grid with the path on top: `#` for walls, `*` for path cells and the cost digit
/// (or `+` above 9) everywhere else.
pub fn render_overlay(grid: &Grid, path: &[Point]) -> String {
    let on_path: HashSet<Point> = path.iter().copied().collect();
    let mut out = String::with_capacity((grid.columns() + 1) * grid.rows());

    for (row, cells) in grid.iter_rows().enumerate() {
        for (col, cell) in cells.iter().enumerate() {
            let c = match cell {
                _ if on_path.contains(&Point::new(row, col)) => '*',
                Cell::Wall => '#',
                Cell::Open { cost } => u32::try_from(*cost)
                    .ok()
                    .and_then(|digit| char::from_digit(digit, 10))
                    .unwrap_or('+'),
            };
            out.push(c);
        }
        out.push('\n');
    }

    out
}
