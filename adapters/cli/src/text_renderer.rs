//! Plain-text renderer that observes the event stream.

use std::{collections::BTreeSet, time::Duration};

use pathguess_core::{CellCoord, Event, GridView, RoundOutcome};
use pathguess_system_round::MatchState;

/// Mirrors what a graphical renderer would show, drawn as characters.
#[derive(Debug, Default)]
pub(crate) struct TextRenderer {
    explored: BTreeSet<CellCoord>,
    path: BTreeSet<CellCoord>,
    agent: Option<CellCoord>,
    verdict: Option<String>,
}

impl TextRenderer {
    pub(crate) fn observe(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::RoundStarted { .. } => {
                    self.explored.clear();
                    self.path.clear();
                    self.verdict = None;
                }
                Event::PathRevealed { path, explored } => {
                    self.path = path.cells().iter().copied().collect();
                    self.explored = explored.iter().copied().collect();
                }
                Event::AgentPlaced { cell } => self.agent = Some(*cell),
                Event::AgentMoved { position } => {
                    let rounded = position.round();
                    self.agent = Some(CellCoord::new(rounded.x as i32, rounded.y as i32));
                }
                Event::GuessEvaluated {
                    secret, outcome, ..
                } => {
                    let verdict = match outcome {
                        RoundOutcome::Correct => "Correct!",
                        RoundOutcome::Incorrect => "Wrong!",
                    };
                    self.verdict = Some(format!("{verdict} It was {secret}"));
                }
                Event::MatchReset => *self = Self::default(),
                Event::ObstaclesCleared { .. }
                | Event::WalkabilityChanged { .. }
                | Event::StartRelocated { .. }
                | Event::GoalRelocated { .. } => {
                    self.explored.clear();
                    self.path.clear();
                }
                Event::TimeAdvanced { .. }
                | Event::WaypointReached { .. }
                | Event::PlaybackFinished { .. } => {}
            }
        }
    }

    pub(crate) fn draw(&self, grid: &GridView<'_>) -> String {
        let size = grid.size();
        let mut frame = String::new();
        for row in 0..size.rows() {
            for column in 0..size.columns() {
                let cell = CellCoord::new(column as i32, row as i32);
                frame.push(self.glyph(grid, cell));
            }
            frame.push('\n');
        }
        frame
    }

    pub(crate) fn verdict(&self) -> Option<&str> {
        self.verdict.as_deref()
    }

    fn glyph(&self, grid: &GridView<'_>, cell: CellCoord) -> char {
        if self.agent == Some(cell) {
            '@'
        } else if cell == grid.start() {
            'S'
        } else if cell == grid.goal() {
            'G'
        } else if !grid.is_walkable(cell) {
            '#'
        } else if self.path.contains(&cell) {
            'o'
        } else if self.explored.contains(&cell) {
            '*'
        } else {
            '.'
        }
    }
}

/// Formats the scoreboard line shown under the grid.
pub(crate) fn status_line(state: MatchState, elapsed: Duration) -> String {
    format!(
        "Round {} | Score: {} | Time: {:.1}s",
        state.round,
        state.score,
        elapsed.as_secs_f32()
    )
}
