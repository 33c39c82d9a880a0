#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the path-guessing engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative grid world, and pure systems. Adapters submit [`Command`]
//! values describing desired grid mutations, the world executes those commands
//! via its `apply` entry point, and then broadcasts [`Event`] values. Systems
//! and renderers observe the event stream and query immutable [`GridView`]
//! snapshots; they never mutate the grid directly.

use std::{fmt, time::Duration};

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Guess the search: which strategy walked the grid?";

const DEFAULT_GRID_COLUMNS: u32 = 20;
const DEFAULT_GRID_ROWS: u32 = 12;

/// Largest accepted column or row count.
pub const MAX_GRID_DIMENSION: u32 = 1024;

/// Commands that express all permissible grid mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Forces the walkability flag of a single cell.
    SetWalkable {
        /// Cell whose flag is assigned.
        cell: CellCoord,
        /// Desired walkability of the cell.
        walkable: bool,
    },
    /// Flips the walkability of a cell unless it hosts the start or the goal.
    ToggleObstacle {
        /// Cell whose walkability should flip.
        cell: CellCoord,
    },
    /// Relocates the start marker, clearing any obstacle beneath it.
    SetStart {
        /// Cell that becomes the new start.
        cell: CellCoord,
    },
    /// Relocates the goal marker, clearing any obstacle beneath it.
    SetGoal {
        /// Cell that becomes the new goal.
        cell: CellCoord,
    },
    /// Reopens every cell of the grid.
    ClearObstacles,
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
}

/// Events broadcast after processing commands or advancing systems.
///
/// Renderers treat the event stream as their only source of change
/// notifications.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Reports that a cell switched between walkable and blocked.
    WalkabilityChanged {
        /// Cell whose flag changed.
        cell: CellCoord,
        /// Walkability after the change.
        walkable: bool,
    },
    /// Reports that the start marker moved.
    StartRelocated {
        /// Previous start cell.
        from: CellCoord,
        /// Cell now hosting the start.
        to: CellCoord,
    },
    /// Reports that the goal marker moved.
    GoalRelocated {
        /// Previous goal cell.
        from: CellCoord,
        /// Cell now hosting the goal.
        to: CellCoord,
    },
    /// Reports that every obstacle was removed from the grid.
    ObstaclesCleared {
        /// Number of cells that were reopened.
        cells: u32,
    },
    /// Announces a freshly started round.
    RoundStarted {
        /// One-based index of the round within the match.
        round: u32,
    },
    /// Publishes the result of the round's search so the exploration can be drawn.
    PathRevealed {
        /// Cells the agent will traverse, excluding the start.
        path: Path,
        /// Cells in the order the search finalised them.
        explored: Vec<CellCoord>,
    },
    /// Confirms that the agent was placed on the start cell of a new playback.
    AgentPlaced {
        /// Cell the agent occupies.
        cell: CellCoord,
    },
    /// Reports the agent's interpolated position after a tick.
    AgentMoved {
        /// Position expressed in cell units.
        position: Vec2,
    },
    /// Reports that the agent arrived at a waypoint.
    WaypointReached {
        /// Waypoint cell that was reached.
        cell: CellCoord,
        /// Zero-based index of the waypoint within the path.
        index: usize,
    },
    /// Reports that playback finished, either at the goal or immediately for an empty path.
    PlaybackFinished {
        /// Cell the agent rests on.
        cell: CellCoord,
    },
    /// Reports that a guess was evaluated against the secret strategy.
    GuessEvaluated {
        /// Round the guess belonged to.
        round: u32,
        /// Strategy named by the player.
        guess: SearchStrategy,
        /// Strategy that actually produced the path.
        secret: SearchStrategy,
        /// Whether the guess matched.
        outcome: RoundOutcome,
        /// Match score after the evaluation.
        score: u32,
    },
    /// Reports that score and round counter were reset.
    MatchReset,
}

/// Location of a single grid cell expressed as column and row coordinates.
///
/// Coordinates are signed so that adapters can describe positions outside the
/// grid; every grid operation treats those as out of bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: i32,
    row: i32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: i32, row: i32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> i32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> i32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column.abs_diff(other.column) + self.row.abs_diff(other.row)
    }

    /// Returns the orthogonally adjacent cell in the provided direction.
    #[must_use]
    pub fn neighbor(self, direction: Direction) -> CellCoord {
        match direction {
            Direction::North => Self::new(self.column, self.row.saturating_sub(1)),
            Direction::East => Self::new(self.column.saturating_add(1), self.row),
            Direction::South => Self::new(self.column, self.row.saturating_add(1)),
            Direction::West => Self::new(self.column.saturating_sub(1), self.row),
        }
    }

    /// Position of the cell centre expressed in cell units.
    #[must_use]
    pub fn center(self) -> Vec2 {
        Vec2::new(self.column as f32, self.row as f32)
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.column, self.row)
    }
}

/// Cardinal directions connecting orthogonal neighbours.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
}

impl Direction {
    /// Order in which searches visit neighbours. Fixed so ties replay identically.
    pub const EXPANSION_ORDER: [Direction; 4] = [
        Direction::East,
        Direction::West,
        Direction::South,
        Direction::North,
    ];
}

/// Dimensions of the rectangular grid measured in whole cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridSize {
    columns: u32,
    rows: u32,
}

impl GridSize {
    /// Creates a grid size, rejecting empty dimensions and sides longer than
    /// [`MAX_GRID_DIMENSION`].
    pub fn new(columns: u32, rows: u32) -> Result<Self, ConfigError> {
        if columns == 0 || rows == 0 {
            return Err(ConfigError::EmptyGrid { columns, rows });
        }
        if columns > MAX_GRID_DIMENSION || rows > MAX_GRID_DIMENSION {
            return Err(ConfigError::GridTooLarge {
                columns,
                rows,
                max: MAX_GRID_DIMENSION,
            });
        }
        Ok(Self { columns, rows })
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Total number of cells.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        let count = u64::from(self.columns) * u64::from(self.rows);
        usize::try_from(count).unwrap_or(usize::MAX)
    }

    /// Reports whether the cell lies inside the grid.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        self.index(cell).is_some()
    }

    /// Row-major offset of the cell, or `None` when it lies outside the grid.
    #[must_use]
    pub fn index(&self, cell: CellCoord) -> Option<usize> {
        let column = u32::try_from(cell.column()).ok()?;
        let row = u32::try_from(cell.row()).ok()?;
        if column >= self.columns || row >= self.rows {
            return None;
        }
        let width = usize::try_from(self.columns).ok()?;
        let row = usize::try_from(row).ok()?;
        let column = usize::try_from(column).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }

    /// Cell stored at the provided row-major offset.
    #[must_use]
    pub fn cell_at(&self, index: usize) -> Option<CellCoord> {
        if index >= self.cell_count() {
            return None;
        }
        let width = usize::try_from(self.columns).ok()?;
        let column = i32::try_from(index % width).ok()?;
        let row = i32::try_from(index / width).ok()?;
        Some(CellCoord::new(column, row))
    }

    /// Lower-right cell of the grid.
    #[must_use]
    pub fn last_cell(&self) -> CellCoord {
        let column = i32::try_from(self.columns.saturating_sub(1)).unwrap_or(i32::MAX);
        let row = i32::try_from(self.rows.saturating_sub(1)).unwrap_or(i32::MAX);
        CellCoord::new(column, row)
    }
}

impl Default for GridSize {
    fn default() -> Self {
        Self {
            columns: DEFAULT_GRID_COLUMNS,
            rows: DEFAULT_GRID_ROWS,
        }
    }
}

/// Search strategies the player can guess between.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SearchStrategy {
    /// Breadth-first expansion with a uniform cost per move.
    Unweighted,
    /// Uniform-cost expansion over the terrain cost model.
    Weighted,
    /// Weighted expansion guided by the Manhattan distance to the goal.
    Heuristic,
    /// Distance field flooded outward from the goal, walked downhill from the start.
    FloodFill,
}

impl SearchStrategy {
    /// Every strategy in selector order.
    pub const ALL: [SearchStrategy; 4] = [
        SearchStrategy::Unweighted,
        SearchStrategy::Weighted,
        SearchStrategy::Heuristic,
        SearchStrategy::FloodFill,
    ];

    /// Name shown to players.
    #[must_use]
    pub const fn game_name(self) -> &'static str {
        match self {
            Self::Unweighted => "BFS",
            Self::Weighted => "Dijkstra",
            Self::Heuristic => "AStar",
            Self::FloodFill => "Grassfire",
        }
    }

    /// Numeric selector matching [`SearchStrategy::ALL`].
    #[must_use]
    pub const fn selector(self) -> u8 {
        match self {
            Self::Unweighted => 0,
            Self::Weighted => 1,
            Self::Heuristic => 2,
            Self::FloodFill => 3,
        }
    }

    /// Parses either the game-facing or the descriptive name, ignoring case.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL.into_iter().find(|strategy| {
            name.eq_ignore_ascii_case(strategy.game_name())
                || name.eq_ignore_ascii_case(strategy.descriptive_name())
        })
    }

    const fn descriptive_name(self) -> &'static str {
        match self {
            Self::Unweighted => "unweighted",
            Self::Weighted => "weighted",
            Self::Heuristic => "heuristic",
            Self::FloodFill => "floodfill",
        }
    }
}

impl TryFrom<u8> for SearchStrategy {
    type Error = SearchError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .get(usize::from(value))
            .copied()
            .ok_or(SearchError::UnknownStrategy(value))
    }
}

impl fmt::Display for SearchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.game_name())
    }
}

/// Ordered cells leading from the cell after the start up to the goal.
///
/// The start is implicit because the agent already occupies it. An empty path
/// means the goal is unreachable or coincides with the start.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Path {
    cells: Vec<CellCoord>,
}

impl Path {
    /// Wraps the provided cells.
    #[must_use]
    pub fn new(cells: Vec<CellCoord>) -> Self {
        Self { cells }
    }

    /// Path that performs no movement.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of moves in the path.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Reports whether the path contains no moves.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Waypoints in travel order.
    #[must_use]
    pub fn cells(&self) -> &[CellCoord] {
        &self.cells
    }

    /// Final waypoint, which equals the goal for a non-empty path.
    #[must_use]
    pub fn last(&self) -> Option<CellCoord> {
        self.cells.last().copied()
    }

    /// Consumes the path, yielding the underlying cells.
    #[must_use]
    pub fn into_vec(self) -> Vec<CellCoord> {
        self.cells
    }
}

/// Result of comparing a guess with the secret strategy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoundOutcome {
    /// The guess named the secret strategy.
    Correct,
    /// The guess named a different strategy.
    Incorrect,
}

/// Read-only view into the walkability grid and its markers.
#[derive(Clone, Copy, Debug)]
pub struct GridView<'a> {
    walkable: &'a [bool],
    size: GridSize,
    start: CellCoord,
    goal: CellCoord,
}

impl<'a> GridView<'a> {
    /// Captures a new grid view backed by the provided row-major flags.
    #[must_use]
    pub fn new(walkable: &'a [bool], size: GridSize, start: CellCoord, goal: CellCoord) -> Self {
        Self {
            walkable,
            size,
            start,
            goal,
        }
    }

    /// Dimensions of the grid.
    #[must_use]
    pub const fn size(&self) -> GridSize {
        self.size
    }

    /// Cell hosting the start marker.
    #[must_use]
    pub const fn start(&self) -> CellCoord {
        self.start
    }

    /// Cell hosting the goal marker.
    #[must_use]
    pub const fn goal(&self) -> CellCoord {
        self.goal
    }

    /// Reports whether the cell lies inside the grid.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        self.size.contains(cell)
    }

    /// Reports whether the cell can be traversed. Out-of-bounds cells never can.
    #[must_use]
    pub fn is_walkable(&self, cell: CellCoord) -> bool {
        self.size
            .index(cell)
            .and_then(|index| self.walkable.get(index).copied())
            .unwrap_or(false)
    }

    /// Iterator over every cell paired with its walkability, in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, bool)> + 'a {
        let size = self.size;
        self.walkable
            .iter()
            .enumerate()
            .filter_map(move |(index, walkable)| size.cell_at(index).map(|cell| (cell, *walkable)))
    }
}

/// Invalid-argument conditions raised by the search engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum SearchError {
    /// A numeric selector did not name one of the four strategies.
    #[error("unknown search strategy selector {0}")]
    UnknownStrategy(u8),
    /// The start cell lies outside the grid.
    #[error("start cell {0} lies outside the grid")]
    StartOutOfBounds(CellCoord),
    /// The goal cell lies outside the grid.
    #[error("goal cell {0} lies outside the grid")]
    GoalOutOfBounds(CellCoord),
}

/// Rejected configuration values.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// Grid dimensions must both be positive.
    #[error("grid dimensions must be positive, got {columns}x{rows}")]
    EmptyGrid {
        /// Requested column count.
        columns: u32,
        /// Requested row count.
        rows: u32,
    },
    /// A grid side exceeded the supported maximum.
    #[error("grid dimensions may not exceed {max} per side, got {columns}x{rows}")]
    GridTooLarge {
        /// Requested column count.
        columns: u32,
        /// Requested row count.
        rows: u32,
        /// Largest accepted side length.
        max: u32,
    },
    /// Agent speed must be a positive finite number of cells per second.
    #[error("agent speed must be positive and finite, got {0}")]
    InvalidSpeed(f32),
}
