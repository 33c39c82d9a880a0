#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Tick-driven playback that walks the agent along a computed path.

use std::time::Duration;

use glam::Vec2;
use pathguess_core::{CellCoord, ConfigError, Event, Path};
use tracing::trace;

const DEFAULT_SPEED: f32 = 5.0;
const ARRIVAL_TOLERANCE: f32 = 0.1;

/// Configuration parameters required to construct the path player.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlaybackConfig {
    speed: f32,
}

impl PlaybackConfig {
    /// Creates a configuration moving the agent `speed` cells per second.
    pub fn new(speed: f32) -> Result<Self, ConfigError> {
        if !speed.is_finite() || speed <= 0.0 {
            return Err(ConfigError::InvalidSpeed(speed));
        }
        Ok(Self { speed })
    }

    /// Agent speed in cells per second.
    #[must_use]
    pub const fn speed(&self) -> f32 {
        self.speed
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            speed: DEFAULT_SPEED,
        }
    }
}

/// Lifecycle of a single playback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlaybackState {
    /// No path has been assigned.
    Idle,
    /// The agent is travelling toward a waypoint.
    Advancing,
    /// The agent reached the final waypoint or had nowhere to go.
    Done,
}

/// Moves the agent toward successive waypoints as time advances.
///
/// Progress between ticks lives in the agent position and the index of the
/// waypoint being approached, so a tick can stop anywhere mid-segment and the
/// next one resumes from there.
#[derive(Debug)]
pub struct PathPlayer {
    config: PlaybackConfig,
    state: PlaybackState,
    position: Vec2,
    resting_cell: CellCoord,
    waypoints: Vec<CellCoord>,
    next_waypoint: usize,
}

impl PathPlayer {
    /// Creates an idle player using the supplied configuration.
    #[must_use]
    pub fn new(config: PlaybackConfig) -> Self {
        Self {
            config,
            state: PlaybackState::Idle,
            position: Vec2::ZERO,
            resting_cell: CellCoord::new(0, 0),
            waypoints: Vec::new(),
            next_waypoint: 0,
        }
    }

    /// Places the agent on `start` and begins following `path`.
    ///
    /// Any playback in progress is abandoned. An empty path completes at once.
    pub fn play(&mut self, start: CellCoord, path: Path, out: &mut Vec<Event>) {
        self.position = start.center();
        self.resting_cell = start;
        self.waypoints = path.into_vec();
        self.next_waypoint = 0;
        out.push(Event::AgentPlaced { cell: start });

        if self.waypoints.is_empty() {
            self.finish(out);
        } else {
            self.state = PlaybackState::Advancing;
        }
    }

    /// Consumes world events, advancing by the total elapsed time they report.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Event>) {
        let mut elapsed = Duration::ZERO;
        for event in events {
            if let Event::TimeAdvanced { dt } = event {
                elapsed = elapsed.saturating_add(*dt);
            }
        }

        if !elapsed.is_zero() {
            self.advance(elapsed, out);
        }
    }

    /// Moves the agent by `speed * dt`, carrying leftover distance past reached waypoints.
    pub fn advance(&mut self, dt: Duration, out: &mut Vec<Event>) {
        if self.state != PlaybackState::Advancing {
            return;
        }

        let mut budget = self.config.speed * dt.as_secs_f32();
        let mut moved = false;
        let mut arrived = false;

        loop {
            let Some(&waypoint) = self.waypoints.get(self.next_waypoint) else {
                arrived = true;
                break;
            };

            let target = waypoint.center();
            let distance = self.position.distance(target);
            if distance <= ARRIVAL_TOLERANCE {
                self.position = target;
                self.resting_cell = waypoint;
                moved = true;
                trace!(cell = %waypoint, index = self.next_waypoint, "waypoint_reached");
                out.push(Event::WaypointReached {
                    cell: waypoint,
                    index: self.next_waypoint,
                });
                self.next_waypoint += 1;
                continue;
            }

            if budget <= 0.0 {
                break;
            }

            let step = budget.min(distance);
            self.position += (target - self.position) * (step / distance);
            budget -= step;
            moved = true;
        }

        if moved {
            out.push(Event::AgentMoved {
                position: self.position,
            });
        }
        // Completion follows the final position update.
        if arrived {
            self.finish(out);
        }
    }

    /// Abandons the current playback and returns to [`PlaybackState::Idle`].
    pub fn stop(&mut self) {
        self.state = PlaybackState::Idle;
        self.waypoints.clear();
        self.next_waypoint = 0;
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> PlaybackState {
        self.state
    }

    /// Interpolated agent position in cell units.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Last cell the agent stood on exactly.
    #[must_use]
    pub const fn resting_cell(&self) -> CellCoord {
        self.resting_cell
    }

    /// Number of waypoints not yet reached.
    #[must_use]
    pub fn remaining_waypoints(&self) -> usize {
        self.waypoints.len().saturating_sub(self.next_waypoint)
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> PlaybackConfig {
        self.config
    }

    fn finish(&mut self, out: &mut Vec<Event>) {
        self.state = PlaybackState::Done;
        out.push(Event::PlaybackFinished {
            cell: self.resting_cell,
        });
    }
}

impl Default for PathPlayer {
    fn default() -> Self {
        Self::new(PlaybackConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_rejects_non_positive_speed() {
        assert!(PlaybackConfig::new(0.0).is_err());
        assert!(PlaybackConfig::new(-1.0).is_err());
        assert!(PlaybackConfig::new(f32::NAN).is_err());
        assert!(PlaybackConfig::new(f32::INFINITY).is_err());
        assert_eq!(PlaybackConfig::new(2.5).map(|config| config.speed()), Ok(2.5));
    }

    #[test]
    fn idle_player_ignores_ticks() {
        let mut player = PathPlayer::default();
        let mut events = Vec::new();

        player.advance(Duration::from_secs(1), &mut events);

        assert_eq!(player.state(), PlaybackState::Idle);
        assert!(events.is_empty());
    }

    #[test]
    fn final_tick_reports_position_before_completion() {
        let mut player = PathPlayer::new(PlaybackConfig::new(2.0).expect("valid speed"));
        let mut events = Vec::new();
        let goal = CellCoord::new(1, 0);
        player.play(CellCoord::new(0, 0), Path::new(vec![goal]), &mut events);
        events.clear();

        player.advance(Duration::from_secs(1), &mut events);

        assert_eq!(
            events,
            vec![
                Event::WaypointReached {
                    cell: goal,
                    index: 0
                },
                Event::AgentMoved {
                    position: Vec2::new(1.0, 0.0)
                },
                Event::PlaybackFinished { cell: goal },
            ]
        );
        assert_eq!(player.state(), PlaybackState::Done);
    }

    #[test]
    fn snaps_onto_waypoint_within_tolerance() {
        let mut player = PathPlayer::new(PlaybackConfig::new(1.0).expect("valid speed"));
        let mut events = Vec::new();
        player.play(
            CellCoord::new(0, 0),
            Path::new(vec![CellCoord::new(1, 0), CellCoord::new(2, 0)]),
            &mut events,
        );

        player.advance(Duration::from_millis(950), &mut events);

        assert_eq!(player.position(), Vec2::new(1.0, 0.0));
        assert_eq!(player.resting_cell(), CellCoord::new(1, 0));
        assert_eq!(player.remaining_waypoints(), 1);
    }
}
