use std::fmt::{Debug, Display};

use log::{debug, trace};
use thiserror::Error;

use crate::grid::{Grid, Point};
use crate::queue::{PriorityQueue, QueueEntry};

/// Cost of a cell that has not been reached (yet)
pub const UNREACHABLE: usize = usize::MAX;

/// Supertrait that collects all the requirements on the NodeReference values
/// Must be copy, comparable and not references (hence 'static)
pub trait NodeReference: Copy + Eq + Debug + 'static {}

pub trait Map {
    /// The type that can be used to reference nodes in the map
    type Reference: NodeReference;

    /// The type that the map uses for per-node bookkeeping
    type Storage<T: Copy + 'static>: MapStorage<T, Reference = Self::Reference>;

    /// The cost of stepping onto `node`, `None` if it is outside the map or impassable
    fn entry_cost(&self, node: Self::Reference) -> Option<usize>;

    /// Return an iterator over the passable neighbors of the provided node and the cost of
    /// stepping onto each of them
    fn neighbors_of(
        &self,
        node: Self::Reference,
    ) -> impl Iterator<Item = (Self::Reference, usize)>;

    /// Lower bound of the cost of going from `from` to `to`
    fn estimate(&self, from: Self::Reference, to: Self::Reference) -> usize;

    /// Create a storage with one `initial` value per node
    fn create_storage<T: Copy + 'static>(&self, initial: T) -> Self::Storage<T>;
}

pub trait MapStorage<T> {
    type Reference: NodeReference;

    fn get(&self, node: Self::Reference) -> T;
    fn get_mut(&mut self, node: Self::Reference) -> &mut T;
}

/// How the remaining distance to the goal is estimated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Heuristic {
    /// Use [`Map::estimate`] (A*)
    #[default]
    Estimate,
    /// Always 0, which turns the search into plain Dijkstra
    Zero,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError<R = Point> {
    #[error("invalid start point {0}")]
    InvalidStart(R),
    #[error("invalid end point {0}")]
    InvalidEnd(R),
    #[error("no path found from {start} to {end}")]
    NoPath { start: R, end: R },
}

/// Per node bookkeeping: best known cost, where it came from and whether a live entry for it
/// is waiting in the queue
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Visited<R> {
    pub cost: usize,
    pub from: Option<R>,
    /// Reports frontier membership for callers stepping through a search. The search itself
    /// never reads it: every improvement pushes a fresh entry, whether or not one is queued.
    pub queued: bool,
}

impl<R> Default for Visited<R> {
    fn default() -> Self {
        Visited {
            cost: UNREACHABLE,
            from: None,
            queued: false,
        }
    }
}

impl<R> Visited<R> {
    pub fn is_reached(&self) -> bool {
        self.cost != UNREACHABLE
    }
}

impl<R> Display for Visited<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_reached() {
            write!(f, "{:03} ", self.cost)
        } else {
            write!(f, "{:>3} ", "-")
        }
    }
}

#[derive(Debug, PartialEq, Clone, Eq)]
pub struct PathResult<R> {
    pub path: Vec<R>,
    pub start: R,
    pub goal: R,
    pub total_cost: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathFinderState<R> {
    Computing,
    NoPathFound,
    PathFound(PathResult<R>),
}

impl<R> PathFinderState<R> {
    pub fn is_done(&self) -> bool {
        !matches!(self, PathFinderState::Computing)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// nodes taken from the queue and expanded
    pub expanded: usize,
    /// entries pushed onto the queue
    pub pushed: usize,
    /// outdated entries skipped when popped
    pub stale: usize,
    /// largest queue length seen
    pub max_frontier: usize,
}

/// Incremental A* search. Create with [`PathFinder::new`], then either drive it with
/// [`PathFinder::step`] or run it to the end with [`PathFinder::finish`].
pub struct PathFinder<M: Map> {
    start: M::Reference,
    goal: M::Reference,
    heuristic: Heuristic,
    visited: M::Storage<Visited<M::Reference>>,
    queue: PriorityQueue<M::Reference>,
    state: PathFinderState<M::Reference>,
    stats: SearchStats,
}

impl<M: Map> PathFinder<M> {
    pub fn new(
        map: &M,
        start: M::Reference,
        goal: M::Reference,
        heuristic: Heuristic,
    ) -> Result<Self, SearchError<M::Reference>> {
        let start_cost = map
            .entry_cost(start)
            .ok_or(SearchError::InvalidStart(start))?;
        map.entry_cost(goal).ok_or(SearchError::InvalidEnd(goal))?;

        let mut visited = map.create_storage(Visited::default());
        *visited.get_mut(start) = Visited {
            cost: start_cost,
            from: None,
            queued: true,
        };

        let mut finder = Self {
            start,
            goal,
            heuristic,
            visited,
            queue: PriorityQueue::new(),
            state: PathFinderState::Computing,
            stats: SearchStats::default(),
        };
        finder.push(map, start, start_cost);

        debug!("searching from {:?} to {:?} ({:?})", start, goal, heuristic);
        Ok(finder)
    }

    pub fn finish(mut self, map: &M) -> (PathFinderState<M::Reference>, Self) {
        loop {
            match self.step(map) {
                PathFinderState::Computing => {}
                s => return (s, self),
            }
        }
    }

    pub fn step(&mut self, map: &M) -> PathFinderState<M::Reference> {
        if self.state.is_done() {
            return self.state.clone();
        }

        let visit = match self.queue.pop_min() {
            Ok(visit) => visit,
            Err(_) => {
                // the frontier ran dry without reaching the goal
                debug!(
                    "no path from {:?} to {:?} after {:?}",
                    self.start, self.goal, self.stats
                );
                self.state = PathFinderState::NoPathFound;
                return self.state.clone();
            }
        };

        let current = self.visited.get(visit.point);
        if visit.cost > current.cost {
            trace!("skipping stale entry for {:?}", visit.point);
            self.stats.stale += 1;
            return self.state.clone();
        }
        self.visited.get_mut(visit.point).queued = false;

        if visit.point == self.goal {
            let path = self.backtrack();
            debug!(
                "found goal {:?}: cost={} length={} {:?}",
                self.goal,
                current.cost,
                path.len(),
                self.stats
            );

            self.state = PathFinderState::PathFound(PathResult {
                path,
                total_cost: current.cost,
                start: self.start,
                goal: self.goal,
            });
            return self.state.clone();
        }

        self.stats.expanded += 1;
        trace!("expanding {:?} at cost {}", visit.point, current.cost);

        for (point, move_cost) in map.neighbors_of(visit.point) {
            let tentative = current.cost.saturating_add(move_cost);
            let neighbor = self.visited.get_mut(point);

            if tentative < neighbor.cost {
                // any entry already queued for this neighbor is now stale
                *neighbor = Visited {
                    cost: tentative,
                    from: Some(visit.point),
                    queued: true,
                };
                self.push(map, point, tentative);
            }
        }

        self.state.clone()
    }

    fn push(&mut self, map: &M, point: M::Reference, cost: usize) {
        let estimate = match self.heuristic {
            Heuristic::Estimate => map.estimate(point, self.goal),
            Heuristic::Zero => 0,
        };

        self.queue.push(QueueEntry {
            point,
            priority: cost.saturating_add(estimate),
            cost,
        });
        self.stats.pushed += 1;
        self.stats.max_frontier = self.stats.max_frontier.max(self.queue.len());
    }

    /// Follow the `from` links back from the goal to the start
    fn backtrack(&self) -> Vec<M::Reference> {
        let mut path = vec![self.goal];
        let mut current = self.goal;

        while current != self.start {
            match self.visited.get(current).from {
                Some(from) => {
                    path.push(from);
                    current = from;
                }
                None => panic!("Backtracking lead to a node that was never reached"),
            }
        }

        path.reverse();
        path
    }

    pub fn state(&self) -> &PathFinderState<M::Reference> {
        &self.state
    }

    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Current number of entries in the queue, stale ones included
    pub fn frontier_len(&self) -> usize {
        self.queue.len()
    }

    pub fn visited(&self) -> &M::Storage<Visited<M::Reference>> {
        &self.visited
    }

    pub fn start(&self) -> M::Reference {
        self.start
    }

    pub fn goal(&self) -> M::Reference {
        self.goal
    }
}

/// Run a complete search on any [`Map`].
pub fn find_path<M: Map>(
    map: &M,
    start: M::Reference,
    end: M::Reference,
    heuristic: Heuristic,
) -> Result<PathResult<M::Reference>, SearchError<M::Reference>> {
    let (state, _) = PathFinder::new(map, start, end, heuristic)?.finish(map);

    match state {
        PathFinderState::PathFound(result) => Ok(result),
        _ => Err(SearchError::NoPath { start, end }),
    }
}

/// The cheapest 4-connected path from `start` to `end`, both included.
///
/// The cost of a path is the sum of the costs of all of its cells, the start cell included.
pub fn find_shortest_path(
    grid: &Grid,
    start: Point,
    end: Point,
) -> Result<Vec<Point>, SearchError> {
    find_path(grid, start, end, Heuristic::Estimate).map(|result| result.path)
}
