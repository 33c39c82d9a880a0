//! Wires the world, the round controller and the renderer together.

use std::{io::Write, time::Duration};

use anyhow::{Context, Result};
use pathguess_core::{Command, Event, GridSize};
use pathguess_system_playback::{PathPlayer, PlaybackConfig, PlaybackState};
use pathguess_system_round::{RoundConfig, RoundController};
use pathguess_system_search::SearchEngine;
use pathguess_world::{self as world, query, World};
use tracing::warn;

use crate::{
    input::{Action, HELP},
    text_renderer::{status_line, TextRenderer},
};

/// Upper bound on ticks pumped by a single `run`, guarding against a zero tick length.
const MAX_TICKS_PER_RUN: u32 = 100_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Flow {
    Continue,
    Quit,
}

pub(crate) struct Session {
    world: World,
    controller: RoundController,
    renderer: TextRenderer,
    tick: Duration,
}

impl Session {
    pub(crate) fn new(
        size: GridSize,
        playback: PlaybackConfig,
        rounds: RoundConfig,
        tick: Duration,
    ) -> Self {
        Self {
            world: World::new(size),
            controller: RoundController::new(rounds, SearchEngine::new(), PathPlayer::new(playback)),
            renderer: TextRenderer::default(),
            tick,
        }
    }

    pub(crate) fn banner(&self) -> &'static str {
        query::welcome_banner(&self.world)
    }

    pub(crate) fn perform(&mut self, action: Action, out: &mut impl Write) -> Result<Flow> {
        match action {
            Action::ToggleObstacle(cell) => self.edit(Command::ToggleObstacle { cell }, out)?,
            Action::SetStart(cell) => self.edit(Command::SetStart { cell }, out)?,
            Action::SetGoal(cell) => self.edit(Command::SetGoal { cell }, out)?,
            Action::ClearObstacles => self.edit(Command::ClearObstacles, out)?,
            Action::RunRound => self.run_round(out)?,
            Action::Guess(strategy) => {
                let mut events = Vec::new();
                if self.controller.submit_guess(strategy, &mut events).is_none() {
                    writeln!(out, "No round is running; type `run` first.")?;
                    return Ok(Flow::Continue);
                }
                self.renderer.observe(&events);
                if let Some(verdict) = self.renderer.verdict() {
                    writeln!(out, "{verdict}")?;
                }
                self.write_status(out)?;
            }
            Action::ResetMatch => {
                let mut events = Vec::new();
                self.controller.reset_match(&mut events);
                self.renderer.observe(&events);
                self.write_frame(out)?;
            }
            Action::Show => self.write_frame(out)?,
            Action::Help => writeln!(out, "{HELP}")?,
            Action::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn edit(&mut self, command: Command, out: &mut impl Write) -> Result<()> {
        let mut events = Vec::new();
        world::apply(&mut self.world, command, &mut events);
        if events.is_empty() {
            writeln!(out, "Nothing changed.")?;
            return Ok(());
        }
        self.renderer.observe(&events);
        self.write_frame(out)
    }

    fn run_round(&mut self, out: &mut impl Write) -> Result<()> {
        let mut events = Vec::new();
        self.controller
            .start_round(&query::grid_view(&self.world), &mut events)
            .context("failed to start round")?;
        self.renderer.observe(&events);

        let mut ticks = 0;
        while self.controller.player().state() == PlaybackState::Advancing {
            if ticks == MAX_TICKS_PER_RUN {
                warn!(ticks, "playback did not finish; stopping the tick pump");
                break;
            }
            self.pump_tick();
            ticks += 1;
        }

        self.write_frame(out)?;
        writeln!(out, "Which search was it? bfs | dijkstra | astar | grassfire")?;
        Ok(())
    }

    fn pump_tick(&mut self) {
        let mut events = Vec::new();
        world::apply(&mut self.world, Command::Tick { dt: self.tick }, &mut events);
        let mut generated: Vec<Event> = Vec::new();
        self.controller.handle(&events, &mut generated);
        events.extend(generated);
        self.renderer.observe(&events);
    }

    fn write_frame(&self, out: &mut impl Write) -> Result<()> {
        write!(out, "{}", self.renderer.draw(&query::grid_view(&self.world)))?;
        self.write_status(out)
    }

    fn write_status(&self, out: &mut impl Write) -> Result<()> {
        let elapsed = self
            .controller
            .current_round()
            .map_or(Duration::ZERO, |round| round.elapsed());
        writeln!(out, "{}", status_line(self.controller.match_state(), elapsed))?;
        Ok(())
    }
}
