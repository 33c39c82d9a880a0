use std::time::Duration;

use glam::Vec2;
use pathguess_core::{CellCoord, Event, Path};
use pathguess_system_playback::{PathPlayer, PlaybackConfig, PlaybackState};

fn straight_path(length: i32) -> Path {
    Path::new((1..=length).map(|column| CellCoord::new(column, 0)).collect())
}

fn player_at(speed: f32) -> PathPlayer {
    PathPlayer::new(PlaybackConfig::new(speed).expect("valid speed"))
}

#[test]
fn empty_path_finishes_without_moving() {
    let mut player = player_at(5.0);
    let mut events = Vec::new();
    let start = CellCoord::new(2, 3);

    player.play(start, Path::empty(), &mut events);

    assert_eq!(player.state(), PlaybackState::Done);
    assert_eq!(player.position(), start.center());
    assert_eq!(
        events,
        vec![
            Event::AgentPlaced { cell: start },
            Event::PlaybackFinished { cell: start },
        ]
    );

    events.clear();
    player.advance(Duration::from_secs(1), &mut events);
    assert!(events.is_empty(), "finished playback must stay put");
}

#[test]
fn walks_every_waypoint_then_finishes() {
    let mut player = player_at(5.0);
    let mut events = Vec::new();
    player.play(CellCoord::new(0, 0), straight_path(4), &mut events);
    assert_eq!(player.state(), PlaybackState::Advancing);

    let mut ticks = 0;
    while player.state() == PlaybackState::Advancing {
        player.advance(Duration::from_millis(100), &mut events);
        ticks += 1;
        assert!(ticks <= 8, "playback should finish after eight half-cell ticks");
    }

    assert_eq!(ticks, 8);
    assert_eq!(player.state(), PlaybackState::Done);
    assert_eq!(player.resting_cell(), CellCoord::new(4, 0));
    assert_eq!(player.position(), Vec2::new(4.0, 0.0));

    let reached: Vec<_> = events
        .iter()
        .filter_map(|event| match event {
            Event::WaypointReached { index, .. } => Some(*index),
            _ => None,
        })
        .collect();
    assert_eq!(reached, vec![0, 1, 2, 3]);
    assert_eq!(
        events.last(),
        Some(&Event::PlaybackFinished {
            cell: CellCoord::new(4, 0)
        })
    );
}

#[test]
fn partial_tick_leaves_agent_between_cells() {
    let mut player = player_at(2.0);
    let mut events = Vec::new();
    player.play(CellCoord::new(0, 0), straight_path(2), &mut events);
    events.clear();

    player.advance(Duration::from_millis(250), &mut events);

    assert_eq!(player.state(), PlaybackState::Advancing);
    assert_eq!(player.position(), Vec2::new(0.5, 0.0));
    assert_eq!(player.resting_cell(), CellCoord::new(0, 0));
    assert_eq!(
        events,
        vec![Event::AgentMoved {
            position: Vec2::new(0.5, 0.0)
        }]
    );
}

#[test]
fn new_path_cancels_playback_in_progress() {
    let mut player = player_at(2.0);
    let mut events = Vec::new();
    player.play(CellCoord::new(0, 0), straight_path(5), &mut events);
    player.advance(Duration::from_millis(750), &mut events);
    assert_eq!(player.state(), PlaybackState::Advancing);

    let restart = CellCoord::new(0, 4);
    let detour = Path::new(vec![CellCoord::new(0, 3)]);
    player.play(restart, detour, &mut events);

    assert_eq!(player.state(), PlaybackState::Advancing);
    assert_eq!(player.position(), restart.center());
    assert_eq!(player.remaining_waypoints(), 1);

    player.advance(Duration::from_secs(1), &mut events);
    assert_eq!(player.state(), PlaybackState::Done);
    assert_eq!(player.resting_cell(), CellCoord::new(0, 3));
}

#[test]
fn handle_sums_time_advanced_events() {
    let mut player = player_at(1.0);
    let mut out = Vec::new();
    player.play(CellCoord::new(0, 0), straight_path(3), &mut out);

    player.handle(
        &[
            Event::TimeAdvanced {
                dt: Duration::from_millis(500),
            },
            Event::MatchReset,
            Event::TimeAdvanced {
                dt: Duration::from_millis(500),
            },
        ],
        &mut out,
    );
    assert_eq!(player.resting_cell(), CellCoord::new(1, 0));

    out.clear();
    player.handle(&[Event::MatchReset], &mut out);
    assert!(out.is_empty(), "no elapsed time means no movement");
}

#[test]
fn stop_returns_to_idle() {
    let mut player = player_at(1.0);
    let mut events = Vec::new();
    player.play(CellCoord::new(0, 0), straight_path(3), &mut events);

    player.stop();

    assert_eq!(player.state(), PlaybackState::Idle);
    assert_eq!(player.remaining_waypoints(), 0);
}
