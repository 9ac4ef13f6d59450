//! Loading search problems from text, JSON and images.

use std::str::FromStr;

use anyhow::{anyhow, bail, Context};
use image::DynamicImage;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::grid::{Grid, Point};

/// Largest cell value accepted by the text and JSON formats unless told otherwise
pub const DEFAULT_MAX_COST: usize = 9;

/// Pixels darker than this become walls
const WALL_THRESHOLD: u8 = 128;

/// A grid together with the two endpoints to connect
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    pub grid: Grid,
    pub start: Point,
    pub end: Point,
}

impl FromStr for Problem {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_text(s, DEFAULT_MAX_COST)
    }
}

/// Parse the plain text format:
///
/// ```text
/// 3 3
/// 1 2 3
/// 4 5 6
/// 7 8 9
/// 0 0 2 2
/// ```
///
/// The first line holds the number of rows and columns, then come the rows of cell costs
/// (0 is a wall) and finally the start row and column followed by the end row and column.
pub fn parse_text(input: &str, max_cost: usize) -> anyhow::Result<Problem> {
    let mut lines = input
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty());

    let (line_no, dims) = lines
        .next()
        .ok_or_else(|| anyhow!("failed to read grid dimensions"))?;
    let dims = parse_numbers(dims)
        .with_context(|| format!("line {}: invalid grid dimensions", line_no))?;
    let (rows, columns) = match dims.as_slice() {
        [rows, columns] if *rows > 0 && *columns > 0 => (*rows, *columns),
        [_, _] => bail!("line {}: grid dimensions must be positive", line_no),
        _ => bail!("line {}: expected `<rows> <columns>`", line_no),
    };

    // the header is not trusted for allocation, rows are added as they are read
    let mut costs = Vec::new();
    for row in 0..rows {
        let (line_no, line) = lines
            .next()
            .ok_or_else(|| anyhow!("failed to read grid row {} of {}", row + 1, rows))?;
        let values =
            parse_numbers(line).with_context(|| format!("line {}: invalid cell value", line_no))?;

        if values.len() != columns {
            bail!(
                "line {}: expected {} cells, found {}",
                line_no,
                columns,
                values.len()
            );
        }
        costs.push(values);
    }

    let grid = Grid::new(costs)?;
    check_max_cost(&grid, max_cost)?;

    let (line_no, line) = lines
        .next()
        .ok_or_else(|| anyhow!("failed to read start and end points"))?;
    let coords = parse_numbers(line)
        .with_context(|| format!("line {}: invalid start or end point", line_no))?;
    let (start, end) = match coords.as_slice() {
        [sr, sc, er, ec] => (Point::new(*sr, *sc), Point::new(*er, *ec)),
        _ => bail!(
            "line {}: expected `<start row> <start col> <end row> <end col>`",
            line_no
        ),
    };

    if let Some((line_no, _)) = lines.next() {
        warn!("ignoring trailing input from line {}", line_no);
    }

    Ok(Problem { grid, start, end })
}

/// Parse a problem stored as JSON, e.g.
/// `{"grid": [[1, 2], [0, 1]], "start": {"row": 0, "col": 0}, "end": {"row": 1, "col": 1}}`
pub fn parse_json(input: &str, max_cost: usize) -> anyhow::Result<Problem> {
    let problem: Problem = serde_json::from_str(input).context("invalid JSON problem")?;
    check_max_cost(&problem.grid, max_cost)?;
    Ok(problem)
}

/// Turn an image into a grid, one cell per pixel. Dark pixels are walls, the remaining ones
/// cost between 1 (white) and 9 (mid gray).
pub fn grid_from_image(img: &DynamicImage) -> anyhow::Result<Grid> {
    let luma = img.to_luma8();
    let (width, height) = luma.dimensions();

    let costs = (0..height)
        .map(|row| {
            (0..width)
                .map(|col| pixel_cost(luma.get_pixel(col, row).0[0]))
                .collect()
        })
        .collect();

    Grid::new(costs).context("image has no pixels")
}

fn pixel_cost(luma: u8) -> usize {
    if luma < WALL_THRESHOLD {
        0
    } else {
        1 + (255 - luma as usize) * 8 / 127
    }
}

fn parse_numbers(line: &str) -> anyhow::Result<Vec<usize>> {
    line.split_whitespace()
        .map(|value| {
            value
                .parse::<usize>()
                .map_err(|_| anyhow!("`{}` is not a non-negative integer", value))
        })
        .collect()
}

fn check_max_cost(grid: &Grid, max_cost: usize) -> anyhow::Result<()> {
    for (row, cells) in grid.iter_rows().enumerate() {
        for (col, cell) in cells.iter().enumerate() {
            let cost = usize::from(*cell);
            if cost > max_cost {
                bail!(
                    "cell value {} at row {}, column {} is out of range 0..={}",
                    cost,
                    row,
                    col,
                    max_cost
                );
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use image::{GrayImage, Luma};

    fn parse_err(input: &str) -> String {
        format!("{:#}", input.parse::<Problem>().unwrap_err())
    }

    #[test]
    fn test_parse_text() {
        let problem: Problem = "3 3\n1 2 3\n4 5 6\n7 8 9\n0 0 2 2\n".parse().unwrap();

        assert_eq!(
            problem.grid,
            Grid::new(vec![vec![1, 2, 3], vec![4, 5, 6], vec![7, 8, 9]]).unwrap()
        );
        assert_eq!(problem.start, Point::new(0, 0));
        assert_eq!(problem.end, Point::new(2, 2));
    }

    #[test]
    fn test_parse_text_tolerates_whitespace() {
        let problem: Problem = "\n  1 1 \n\n 5\n0 0   0 0  \n\n".parse().unwrap();
        assert_eq!(problem.grid, Grid::filled(1, 1, 5).unwrap());
        assert_eq!(problem.start, problem.end);
    }

    #[test]
    fn test_out_of_grid_points_are_kept() {
        // the search decides whether the endpoints are usable
        let problem: Problem = "2 2\n1 1\n1 1\n0 0 3 3".parse().unwrap();
        assert_eq!(problem.end, Point::new(3, 3));
    }

    #[test]
    fn test_parse_text_errors() {
        assert!(parse_err("").contains("dimensions"));
        assert!(parse_err("0 3\n1 1 1\n0 0 0 0").contains("must be positive"));
        assert!(parse_err("3\n1 1 1").contains("expected `<rows> <columns>`"));
        assert!(parse_err("a 3\n1 1 1").contains("invalid grid dimensions"));
        assert!(parse_err("2 2\n1 1\n").contains("grid row 2 of 2"));
        assert!(parse_err("2 2\n1 1\n1 1 1\n0 0 1 1")
            .contains("line 3: expected 2 cells, found 3"));
        assert!(parse_err("1 2\n1 x\n0 0 0 1").contains("`x` is not a non-negative integer"));
        assert!(parse_err("1 2\n1 -1\n0 0 0 1").contains("invalid cell value"));
        assert!(parse_err("1 2\n1 10\n0 0 0 1").contains("out of range 0..=9"));
        assert!(parse_err("1 2\n1 1").contains("start and end points"));
        assert!(parse_err("1 2\n1 1\n0 0 1").contains("line 3: expected `<start row>"));
        assert!(parse_err("1 2\n1 1\n0 -1 0 1").contains("invalid start or end point"));
    }

    #[test]
    fn test_huge_dimensions_are_an_error() {
        assert!(parse_err("1000000000000000000 1\n1\n0 0 0 0")
            .contains("line 3: expected 1 cells, found 4"));
        assert!(parse_err("1000000000000000000 1\n1\n2\n")
            .contains("grid row 3 of 1000000000000000000"));
        assert!(parse_err(&format!("{} 1\n1\n0 0 0 0", usize::MAX)).contains("line 3"));
        assert!(parse_err("1 1000000000000000000\n1\n0 0 0 0")
            .contains("line 2: expected 1000000000000000000 cells, found 1"));
    }

    #[test]
    fn test_parse_text_ignores_trailing_input() {
        let problem = parse_text("1 2\n1 1\n0 0 0 1\n9 9 9\n", DEFAULT_MAX_COST).unwrap();
        assert_eq!(problem.end, Point::new(0, 1));
    }

    #[test]
    fn test_max_cost() {
        let input = "1 3\n1 12 30\n0 0 0 2";
        assert!(parse_text(input, DEFAULT_MAX_COST).is_err());

        let problem = parse_text(input, 30).unwrap();
        assert_eq!(problem.grid.max_cost(), 30);
    }

    #[test]
    fn test_parse_json() {
        let problem = parse_json(
            r#"{"grid": [[1, 2], [0, 1]], "start": {"row": 0, "col": 0}, "end": {"row": 1, "col": 1}}"#,
            DEFAULT_MAX_COST,
        )
        .unwrap();
        assert_eq!(problem.grid, Grid::new(vec![vec![1, 2], vec![0, 1]]).unwrap());
        assert_eq!(problem.end, Point::new(1, 1));

        let ragged = r#"{"grid": [[1, 2], [1]], "start": {"row": 0, "col": 0}, "end": {"row": 0, "col": 1}}"#;
        assert!(parse_json(ragged, DEFAULT_MAX_COST).is_err());

        let too_expensive = r#"{"grid": [[1, 20]], "start": {"row": 0, "col": 0}, "end": {"row": 0, "col": 1}}"#;
        assert!(parse_json(too_expensive, DEFAULT_MAX_COST).is_err());
        assert!(parse_json(too_expensive, 20).is_ok());
    }

    #[test]
    fn test_grid_from_image() {
        let pixels = [[255u8, 0, 128], [200, 127, 255]];
        let img = GrayImage::from_fn(3, 2, |x, y| Luma([pixels[y as usize][x as usize]]));
        let grid = grid_from_image(&DynamicImage::ImageLuma8(img)).unwrap();

        assert_eq!(grid.rows(), 2);
        assert_eq!(grid.columns(), 3);
        assert_eq!(
            Vec::<Vec<usize>>::from(grid),
            vec![vec![1, 0, 9], vec![4, 0, 1]]
        );
    }

    #[test]
    fn test_pixel_cost_range() {
        assert_eq!(pixel_cost(0), 0);
        assert_eq!(pixel_cost(127), 0);
        assert_eq!(pixel_cost(128), 9);
        assert_eq!(pixel_cost(255), 1);
        assert!((128..=255).all(|luma| (1..=9).contains(&pixel_cost(luma))));
    }
}
