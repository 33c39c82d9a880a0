#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Grid search engine that turns a walkability snapshot into a path.
//!
//! Three of the strategies share a single frontier search parameterised by a
//! step cost and an optional heuristic:
//!
//! | Strategy | Step cost | Heuristic |
//! |---|---|---|
//! | [`SearchStrategy::Unweighted`] | always 1 | none |
//! | [`SearchStrategy::Weighted`] | cost model | none |
//! | [`SearchStrategy::Heuristic`] | cost model | Manhattan distance |
//!
//! [`SearchStrategy::FloodFill`] instead floods a distance field outward from
//! the goal and walks it downhill from the start, so its exploration radiates
//! from the opposite end of the grid.

mod distance_field;
pub mod frontier;

use pathguess_core::{CellCoord, Direction, GridView, Path, SearchError, SearchStrategy};
use tracing::debug;

use crate::{distance_field::DistanceField, frontier::Frontier};

/// Cost charged for moving between two orthogonally adjacent cells.
///
/// Implementations should return at least 1; smaller values are clamped so
/// the Manhattan heuristic stays admissible.
pub trait StepCost {
    /// Cost of stepping from `from` into `to`.
    fn step_cost(&self, from: CellCoord, to: CellCoord) -> u32;
}

/// Terrain where every move costs the same.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UniformCost;

impl StepCost for UniformCost {
    fn step_cost(&self, _from: CellCoord, _to: CellCoord) -> u32 {
        1
    }
}

/// Path produced by a search together with the cells it expanded.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchOutcome {
    /// Cells leading from the cell after the start to the goal.
    pub path: Path,
    /// Cells in the order the search finalised them.
    pub explored: Vec<CellCoord>,
}

/// Stateless-by-contract search engine with a reusable distance field workspace.
#[derive(Debug, Default)]
pub struct SearchEngine<C = UniformCost> {
    cost_model: C,
    field: DistanceField,
}

impl SearchEngine<UniformCost> {
    /// Creates an engine over uniform terrain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<C: StepCost> SearchEngine<C> {
    /// Creates an engine whose weighted strategies charge the provided cost model.
    #[must_use]
    pub fn with_cost_model(cost_model: C) -> Self {
        Self {
            cost_model,
            field: DistanceField::default(),
        }
    }

    /// Computes the path `strategy` takes from `start` to `goal`.
    pub fn find_path(
        &mut self,
        grid: &GridView<'_>,
        start: CellCoord,
        goal: CellCoord,
        strategy: SearchStrategy,
    ) -> Result<Path, SearchError> {
        self.search(grid, start, goal, strategy)
            .map(|outcome| outcome.path)
    }

    /// Computes the path and records the expansion order.
    pub fn search(
        &mut self,
        grid: &GridView<'_>,
        start: CellCoord,
        goal: CellCoord,
        strategy: SearchStrategy,
    ) -> Result<SearchOutcome, SearchError> {
        if !grid.contains(start) {
            return Err(SearchError::StartOutOfBounds(start));
        }
        if !grid.contains(goal) {
            return Err(SearchError::GoalOutOfBounds(goal));
        }

        let outcome = if start == goal {
            SearchOutcome {
                path: Path::empty(),
                explored: vec![start],
            }
        } else {
            match strategy {
                SearchStrategy::Unweighted => frontier_search(grid, start, goal, |_, _| 1, false),
                SearchStrategy::Weighted => frontier_search(
                    grid,
                    start,
                    goal,
                    |from, to| self.cost_model.step_cost(from, to),
                    false,
                ),
                SearchStrategy::Heuristic => frontier_search(
                    grid,
                    start,
                    goal,
                    |from, to| self.cost_model.step_cost(from, to),
                    true,
                ),
                SearchStrategy::FloodFill => self.flood_fill(grid, start, goal),
            }
        };

        debug!(
            strategy = %strategy,
            %start,
            %goal,
            explored = outcome.explored.len(),
            path_len = outcome.path.len(),
            "search_done"
        );
        Ok(outcome)
    }

    /// Sum of the cost model's step costs along `path`, starting at `start`.
    #[must_use]
    pub fn path_cost(&self, start: CellCoord, path: &Path) -> u32 {
        let mut previous = start;
        let mut total: u32 = 0;
        for &cell in path.cells() {
            total = total.saturating_add(self.cost_model.step_cost(previous, cell).max(1));
            previous = cell;
        }
        total
    }

    fn flood_fill(&mut self, grid: &GridView<'_>, start: CellCoord, goal: CellCoord) -> SearchOutcome {
        self.field
            .rebuild_with(grid.size(), goal, |cell| !grid.is_walkable(cell));
        SearchOutcome {
            path: Path::new(self.field.descend(start)),
            explored: self.field.flood_order().to_vec(),
        }
    }
}

fn frontier_search<F>(
    grid: &GridView<'_>,
    start: CellCoord,
    goal: CellCoord,
    step_cost: F,
    use_heuristic: bool,
) -> SearchOutcome
where
    F: Fn(CellCoord, CellCoord) -> u32,
{
    let size = grid.size();
    let cell_count = size.cell_count();
    let mut cost_so_far: Vec<Option<u32>> = vec![None; cell_count];
    let mut predecessor: Vec<Option<CellCoord>> = vec![None; cell_count];
    let mut closed = vec![false; cell_count];
    let mut explored = Vec::new();
    let mut frontier = Frontier::new();

    let Some(start_index) = size.index(start) else {
        return SearchOutcome::default();
    };
    cost_so_far[start_index] = Some(0);
    frontier.push(start, 0);

    let mut reached = false;
    while let Some((current, _)) = frontier.pop() {
        let Some(current_index) = size.index(current) else {
            continue;
        };
        // Superseded entries linger in the heap; each cell is expanded once.
        if closed[current_index] {
            continue;
        }
        closed[current_index] = true;
        explored.push(current);

        if current == goal {
            reached = true;
            break;
        }

        let Some(current_cost) = cost_so_far[current_index] else {
            continue;
        };

        for direction in Direction::EXPANSION_ORDER {
            let next = current.neighbor(direction);
            if !grid.is_walkable(next) {
                continue;
            }
            let Some(next_index) = size.index(next) else {
                continue;
            };

            let new_cost = current_cost.saturating_add(step_cost(current, next).max(1));
            if cost_so_far[next_index].map_or(false, |known| new_cost >= known) {
                continue;
            }

            cost_so_far[next_index] = Some(new_cost);
            predecessor[next_index] = Some(current);
            let priority = if use_heuristic {
                new_cost.saturating_add(next.manhattan_distance(goal))
            } else {
                new_cost
            };
            frontier.push(next, priority);
        }
    }

    let path = if reached {
        reconstruct(&predecessor, grid, start, goal)
    } else {
        Path::empty()
    };
    SearchOutcome { path, explored }
}

fn reconstruct(
    predecessor: &[Option<CellCoord>],
    grid: &GridView<'_>,
    start: CellCoord,
    goal: CellCoord,
) -> Path {
    let size = grid.size();
    let mut cells = Vec::new();
    let mut current = goal;
    while current != start {
        let Some(previous) = size.index(current).and_then(|index| predecessor[index]) else {
            return Path::empty();
        };
        cells.push(current);
        current = previous;
    }
    cells.reverse();
    Path::new(cells)
}
