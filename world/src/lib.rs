#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative grid state for the path-guessing game.
//!
//! The world owns the walkability map together with the start and goal
//! markers. Dimensions are fixed when the world is created; everything else
//! mutates in place through [`apply`].

use pathguess_core::{CellCoord, Command, Event, GridSize, WELCOME_BANNER};

/// Represents the authoritative grid state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    grid: WalkabilityGrid,
    start: CellCoord,
    goal: CellCoord,
    tick_index: u64,
}

impl World {
    /// Creates a fully walkable world with the start in the upper-left corner
    /// and the goal in the lower-right corner.
    #[must_use]
    pub fn new(size: GridSize) -> Self {
        Self {
            banner: WELCOME_BANNER,
            grid: WalkabilityGrid::new(size),
            start: CellCoord::new(0, 0),
            goal: size.last_cell(),
            tick_index: 0,
        }
    }

    fn set_walkable(&mut self, cell: CellCoord, walkable: bool, out_events: &mut Vec<Event>) {
        if self.grid.assign(cell, walkable) {
            out_events.push(Event::WalkabilityChanged { cell, walkable });
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new(GridSize::default())
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Commands that address cells outside the grid are ignored and emit nothing.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::SetWalkable { cell, walkable } => {
            if !walkable && (cell == world.start || cell == world.goal) {
                return;
            }
            world.set_walkable(cell, walkable, out_events);
        }
        Command::ToggleObstacle { cell } => {
            if cell == world.start || cell == world.goal {
                return;
            }
            if let Some(walkable) = world.grid.get(cell) {
                world.set_walkable(cell, !walkable, out_events);
            }
        }
        Command::SetStart { cell } => {
            if !world.grid.contains(cell) {
                return;
            }
            world.set_walkable(cell, true, out_events);
            let from = world.start;
            world.start = cell;
            out_events.push(Event::StartRelocated { from, to: cell });
        }
        Command::SetGoal { cell } => {
            if !world.grid.contains(cell) {
                return;
            }
            world.set_walkable(cell, true, out_events);
            let from = world.goal;
            world.goal = cell;
            out_events.push(Event::GoalRelocated { from, to: cell });
        }
        Command::ClearObstacles => {
            let cells = world.grid.open_all();
            out_events.push(Event::ObstaclesCleared { cells });
        }
        Command::Tick { dt } => {
            world.tick_index = world.tick_index.saturating_add(1);
            out_events.push(Event::TimeAdvanced { dt });
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use pathguess_core::{CellCoord, GridSize, GridView};

    use super::World;

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Captures a read-only view of the walkability grid and its markers.
    #[must_use]
    pub fn grid_view(world: &World) -> GridView<'_> {
        GridView::new(world.grid.cells(), world.grid.size(), world.start, world.goal)
    }

    /// Dimensions fixed when the world was created.
    #[must_use]
    pub fn grid_size(world: &World) -> GridSize {
        world.grid.size()
    }

    /// Cell hosting the start marker.
    #[must_use]
    pub fn start(world: &World) -> CellCoord {
        world.start
    }

    /// Cell hosting the goal marker.
    #[must_use]
    pub fn goal(world: &World) -> CellCoord {
        world.goal
    }

    /// Reports whether the cell is walkable. Out-of-bounds cells never are.
    #[must_use]
    pub fn is_walkable(world: &World, cell: CellCoord) -> bool {
        world.grid.get(cell).unwrap_or(false)
    }

    /// Number of ticks processed since the world was created.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }
}

#[derive(Clone, Debug)]
struct WalkabilityGrid {
    size: GridSize,
    cells: Vec<bool>,
}

impl WalkabilityGrid {
    fn new(size: GridSize) -> Self {
        Self {
            size,
            cells: vec![true; size.cell_count()],
        }
    }

    fn size(&self) -> GridSize {
        self.size
    }

    fn cells(&self) -> &[bool] {
        &self.cells
    }

    fn contains(&self, cell: CellCoord) -> bool {
        self.size.contains(cell)
    }

    fn get(&self, cell: CellCoord) -> Option<bool> {
        self.size
            .index(cell)
            .and_then(|index| self.cells.get(index).copied())
    }

    /// Stores the flag, reporting whether it changed.
    fn assign(&mut self, cell: CellCoord, walkable: bool) -> bool {
        let Some(slot) = self
            .size
            .index(cell)
            .and_then(|index| self.cells.get_mut(index))
        else {
            return false;
        };
        let changed = *slot != walkable;
        *slot = walkable;
        changed
    }

    fn open_all(&mut self) -> u32 {
        let mut reopened = 0;
        for slot in &mut self.cells {
            if !*slot {
                *slot = true;
                reopened += 1;
            }
        }
        reopened
    }
}
