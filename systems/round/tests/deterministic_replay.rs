use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
    time::Duration,
};

use pathguess_core::{CellCoord, Command, Event, GridSize, SearchStrategy};
use pathguess_system_playback::{PathPlayer, PlaybackConfig};
use pathguess_system_round::{RoundConfig, RoundController};
use pathguess_system_search::SearchEngine;
use pathguess_world::{self as world, query, World};

#[derive(Clone, Debug)]
enum Step {
    Apply(Command),
    StartRound,
    Guess(SearchStrategy),
    ResetMatch,
}

#[test]
fn deterministic_replay_produces_identical_logs() {
    let first = replay(scripted_steps());
    let second = replay(scripted_steps());

    assert_eq!(first, second, "replay diverged between runs");
    assert_eq!(first.fingerprint(), second.fingerprint());
    assert!(
        first
            .events
            .iter()
            .any(|record| matches!(record, EventRecord::PlaybackFinished { .. })),
        "scripted rounds should let the agent finish at least once"
    );
    assert_eq!(first.final_score, 0, "match was reset at the end");
}

fn scripted_steps() -> Vec<Step> {
    let tick = || {
        Step::Apply(Command::Tick {
            dt: Duration::from_millis(125),
        })
    };
    let mut steps = vec![
        Step::Apply(Command::ToggleObstacle {
            cell: CellCoord::new(2, 1),
        }),
        Step::Apply(Command::ToggleObstacle {
            cell: CellCoord::new(2, 2),
        }),
        Step::Apply(Command::SetGoal {
            cell: CellCoord::new(5, 2),
        }),
        Step::StartRound,
    ];
    steps.extend((0..40).map(|_| tick()));
    steps.push(Step::Guess(SearchStrategy::Heuristic));
    steps.push(Step::Apply(Command::ClearObstacles));
    steps.push(Step::Apply(Command::SetStart {
        cell: CellCoord::new(5, 3),
    }));
    steps.push(Step::StartRound);
    steps.extend((0..6).map(|_| tick()));
    steps.push(Step::StartRound);
    steps.extend((0..10).map(|_| tick()));
    steps.push(Step::Guess(SearchStrategy::FloodFill));
    steps.push(Step::ResetMatch);
    steps
}

fn replay(steps: Vec<Step>) -> ReplayOutcome {
    let mut world = World::new(GridSize::new(6, 4).expect("valid grid size"));
    let mut controller = RoundController::new(
        RoundConfig::new(0x0dd_ba11),
        SearchEngine::new(),
        PathPlayer::new(PlaybackConfig::new(4.0).expect("valid speed")),
    );
    let mut log = Vec::new();

    for step in steps {
        let mut events = Vec::new();
        match step {
            Step::Apply(command) => {
                world::apply(&mut world, command, &mut events);
                let mut generated = Vec::new();
                controller.handle(&events, &mut generated);
                events.extend(generated);
            }
            Step::StartRound => controller
                .start_round(&query::grid_view(&world), &mut events)
                .expect("grid endpoints are in bounds"),
            Step::Guess(strategy) => {
                let _ = controller.submit_guess(strategy, &mut events);
            }
            Step::ResetMatch => controller.reset_match(&mut events),
        }
        log.extend(events.iter().map(EventRecord::from));
    }

    ReplayOutcome {
        events: log,
        final_score: controller.score(),
    }
}

#[derive(Debug, PartialEq, Eq, Hash)]
struct ReplayOutcome {
    events: Vec<EventRecord>,
    final_score: u32,
}

impl ReplayOutcome {
    fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }
}

#[derive(Debug, PartialEq, Eq, Hash)]
enum EventRecord {
    Time { micros: u128 },
    Walkability { cell: (i32, i32), walkable: bool },
    Start { to: (i32, i32) },
    Goal { to: (i32, i32) },
    Cleared { cells: u32 },
    RoundStarted { round: u32 },
    Revealed { path: Vec<(i32, i32)>, explored: usize },
    AgentPlaced { cell: (i32, i32) },
    AgentMoved { x_bits: u32, y_bits: u32 },
    Waypoint { cell: (i32, i32), index: usize },
    PlaybackFinished { cell: (i32, i32) },
    Guess { round: u32, guess: SearchStrategy, secret: SearchStrategy, score: u32 },
    Reset,
}

fn pair(cell: CellCoord) -> (i32, i32) {
    (cell.column(), cell.row())
}

impl From<&Event> for EventRecord {
    fn from(event: &Event) -> Self {
        match event {
            Event::TimeAdvanced { dt } => Self::Time {
                micros: dt.as_micros(),
            },
            Event::WalkabilityChanged { cell, walkable } => Self::Walkability {
                cell: pair(*cell),
                walkable: *walkable,
            },
            Event::StartRelocated { to, .. } => Self::Start { to: pair(*to) },
            Event::GoalRelocated { to, .. } => Self::Goal { to: pair(*to) },
            Event::ObstaclesCleared { cells } => Self::Cleared { cells: *cells },
            Event::RoundStarted { round } => Self::RoundStarted { round: *round },
            Event::PathRevealed { path, explored } => Self::Revealed {
                path: path.cells().iter().copied().map(pair).collect(),
                explored: explored.len(),
            },
            Event::AgentPlaced { cell } => Self::AgentPlaced { cell: pair(*cell) },
            Event::AgentMoved { position } => Self::AgentMoved {
                x_bits: position.x.to_bits(),
                y_bits: position.y.to_bits(),
            },
            Event::WaypointReached { cell, index } => Self::Waypoint {
                cell: pair(*cell),
                index: *index,
            },
            Event::PlaybackFinished { cell } => Self::PlaybackFinished { cell: pair(*cell) },
            Event::GuessEvaluated {
                round,
                guess,
                secret,
                score,
                ..
            } => Self::Guess {
                round: *round,
                guess: *guess,
                secret: *secret,
                score: *score,
            },
            Event::MatchReset => Self::Reset,
        }
    }
}
