use crate::find::{Map, MapStorage, NodeReference};
use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Wall,
    Open {
        cost: usize,
    },
}

impl Cell {
    /// The cost of stepping onto this cell, `None` for walls
    pub fn cost(&self) -> Option<usize> {
        match self {
            Cell::Wall => None,
            Cell::Open { cost } => Some(*cost),
        }
    }

    pub fn is_wall(&self) -> bool {
        matches!(self, Cell::Wall)
    }
}

impl From<usize> for Cell {
    fn from(value: usize) -> Self {
        match value {
            0 => Cell::Wall,
            cost => Cell::Open { cost },
        }
    }
}

impl From<Cell> for usize {
    fn from(cell: Cell) -> Self {
        cell.cost().unwrap_or(0)
    }
}

impl Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", usize::from(*self))
    }
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub row: usize,
    pub col: usize,
}

impl Point {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    pub fn manhattan(&self, other: &Point) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }
}

impl NodeReference for Point {}

impl Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl FromStr for Point {
    type Err = anyhow::Error;

    /// Accepts `row,col` or `row col`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|part| !part.is_empty())
            .collect();

        match parts.as_slice() {
            [row, col] => Ok(Point {
                row: row
                    .parse()
                    .map_err(|_| anyhow::anyhow!("Invalid row: {}", row))?,
                col: col
                    .parse()
                    .map_err(|_| anyhow::anyhow!("Invalid column: {}", col))?,
            }),
            _ => Err(anyhow::anyhow!("Invalid point: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("grid must have at least one row and one column")]
    Empty,
    #[error("row {row} has {found} cells, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// A rectangular grid of cells, each either a wall or the cost of entering it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<usize>>", into = "Vec<Vec<usize>>")]
pub struct Grid {
    rows: usize,
    columns: usize,
    cells: Vec<Vec<Cell>>,
}

impl Grid {
    /// Build a grid from raw costs, where 0 marks a wall.
    pub fn new(costs: Vec<Vec<usize>>) -> Result<Self, GridError> {
        let columns = costs.first().map(Vec::len).unwrap_or(0);
        if columns == 0 {
            return Err(GridError::Empty);
        }

        if let Some((row, found)) = costs
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|(_, len)| *len != columns)
        {
            return Err(GridError::Ragged {
                row,
                expected: columns,
                found,
            });
        }

        Ok(Self {
            rows: costs.len(),
            columns,
            cells: costs
                .into_iter()
                .map(|row| row.into_iter().map(Cell::from).collect())
                .collect(),
        })
    }

    /// A grid where every cell has the same cost
    pub fn filled(rows: usize, columns: usize, cost: usize) -> Result<Self, GridError> {
        Self::new(vec![vec![cost; columns]; rows])
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn contains(&self, point: Point) -> bool {
        point.row < self.rows && point.col < self.columns
    }

    /// The cell at `point`, or `None` outside the grid
    pub fn cell(&self, point: Point) -> Option<Cell> {
        self.cells.get(point.row)?.get(point.col).copied()
    }

    pub fn is_passable(&self, point: Point) -> bool {
        self.cell(point).is_some_and(|cell| !cell.is_wall())
    }

    /// Iterate over the rows of cells
    pub fn iter_rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.iter().map(Vec::as_slice)
    }

    /// The largest cost of any open cell, 0 if everything is a wall
    pub fn max_cost(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter_map(Cell::cost)
            .max()
            .unwrap_or(0)
    }

    /// Sum of the entry costs of every cell on `path`, including the first.
    /// Returns `None` if the path leaves the grid or crosses a wall.
    pub fn path_cost(&self, path: &[Point]) -> Option<usize> {
        path.iter()
            .map(|p| self.cell(*p).and_then(|cell| cell.cost()))
            .sum()
    }

    /// Scales the grid by the given factor, i.e. to make it twice as large, pass 2.
    /// Interpolates the cells by repeating the existing cells in the new grid.
    pub fn scale_up(&mut self, factor: usize) {
        let factor = factor.max(1);
        let mut new_cells = vec![vec![Cell::default(); self.columns * factor]; self.rows * factor];

        for row in 0..self.rows {
            for col in 0..self.columns {
                for r in 0..factor {
                    for c in 0..factor {
                        new_cells[row * factor + r][col * factor + c] = self.cells[row][col];
                    }
                }
            }
        }

        self.rows *= factor;
        self.columns *= factor;
        self.cells = new_cells;
    }
}

impl TryFrom<Vec<Vec<usize>>> for Grid {
    type Error = GridError;

    fn try_from(costs: Vec<Vec<usize>>) -> Result<Self, Self::Error> {
        Grid::new(costs)
    }
}

impl From<Grid> for Vec<Vec<usize>> {
    fn from(grid: Grid) -> Self {
        grid.cells
            .into_iter()
            .map(|row| row.into_iter().map(usize::from).collect())
            .collect()
    }
}

impl Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in &self.cells {
            let line: Vec<String> = row.iter().map(Cell::to_string).collect();
            writeln!(f, "{}", line.join(" "))?;
        }

        Ok(())
    }
}

/// A MapStorage that keeps one value per grid cell in a single row-major vec
#[derive(Debug, Clone)]
pub struct CellStorage<T> {
    columns: usize,
    values: Vec<T>,
}

impl<T: Copy + 'static> MapStorage<T> for CellStorage<T> {
    type Reference = Point;

    fn get(&self, node: Self::Reference) -> T {
        self.values[node.row * self.columns + node.col]
    }

    fn get_mut(&mut self, node: Self::Reference) -> &mut T {
        &mut self.values[node.row * self.columns + node.col]
    }
}

impl<T: Display> Display for CellStorage<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in self.values.chunks(self.columns) {
            for cell in row {
                write!(f, "{}", cell)?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

impl Map for Grid {
    type Reference = Point;
    type Storage<T: Copy + 'static> = CellStorage<T>;

    fn entry_cost(&self, node: Self::Reference) -> Option<usize> {
        self.cell(node)?.cost()
    }

    fn neighbors_of(
        &self,
        node: Self::Reference,
    ) -> impl Iterator<Item = (Self::Reference, usize)> {
        let mut points = Vec::with_capacity(4);

        if node.row > 0 {
            points.push(Point {
                row: node.row - 1,
                col: node.col,
            });
        }
        if node.col > 0 {
            points.push(Point {
                row: node.row,
                col: node.col - 1,
            });
        }
        if node.row + 1 < self.rows {
            points.push(Point {
                row: node.row + 1,
                col: node.col,
            });
        }
        if node.col + 1 < self.columns {
            points.push(Point {
                row: node.row,
                col: node.col + 1,
            });
        }

        // walls are dropped here, the remaining ones carry the cost of stepping onto them
        points
            .into_iter()
            .filter_map(|p| self.entry_cost(p).map(|cost| (p, cost)))
    }

    fn estimate(&self, from: Self::Reference, to: Self::Reference) -> usize {
        from.manhattan(&to)
    }

    fn create_storage<T: Copy + 'static>(&self, initial: T) -> Self::Storage<T> {
        CellStorage {
            columns: self.columns,
            values: vec![initial; self.rows * self.columns],
        }
    }
}
