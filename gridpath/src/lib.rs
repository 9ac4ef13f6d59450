//! Cheapest paths through weighted grids.
//!
//! Cells hold the cost of stepping onto them, with 0 marking a wall. Movement is in the four
//! cardinal directions and the cost of a path is the sum of all of its cells, the first one
//! included.

pub mod find;
pub mod grid;
pub mod input;
pub mod output;
pub mod queue;

pub use find::{
    find_path, find_shortest_path, Heuristic, Map, MapStorage, NodeReference, PathFinder,
    PathFinderState, PathResult, SearchError, SearchStats, Visited, UNREACHABLE,
};
pub use grid::{Cell, CellStorage, Grid, GridError, Point};
pub use input::{Problem, DEFAULT_MAX_COST};
pub use queue::{PriorityQueue, QueueEntry, QueueError};

#[cfg(test)]
mod test {
    use super::*;

    fn solve(input: &str) -> Result<String, anyhow::Error> {
        let problem: Problem = input.parse()?;
        let path = find_shortest_path(&problem.grid, problem.start, problem.end)?;

        let mut out = Vec::new();
        output::write_path(&mut out, &path)?;
        Ok(String::from_utf8(out)?)
    }

    #[test]
    fn test_text_in_text_out() {
        assert_eq!(
            solve("3 3\n1 2 3\n4 5 6\n7 8 9\n0 0 2 2").unwrap(),
            "0 0\n0 1\n0 2\n1 2\n2 2\n.\n"
        );
        assert_eq!(solve("1 1\n5\n0 0 0 0").unwrap(), "0 0\n.\n");
    }

    #[test]
    fn test_errors_reach_the_caller() {
        let err = solve("3 3\n1 1 1\n1 1 1\n1 1 1\n0 0 3 3").unwrap_err();
        assert_eq!(
            err.downcast_ref::<SearchError>(),
            Some(&SearchError::InvalidEnd(Point::new(3, 3)))
        );

        let err = solve("3 3\n1 0 1\n1 0 1\n1 0 1\n0 0 2 2").unwrap_err();
        assert_eq!(err.to_string(), "no path found from (0, 0) to (2, 2)");

        assert!(solve("0 3\n1 1 1\n0 0 2 2").is_err());
    }
}
