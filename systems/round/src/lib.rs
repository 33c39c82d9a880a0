#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Round lifecycle for the guessing game.
//!
//! Each round draws a secret strategy, searches the current grid with it,
//! hands the path to the [`PathPlayer`] and waits for the player to name the
//! strategy. The controller owns its collaborators; the grid is read through a
//! [`GridView`] at the moment a round starts.

use std::time::Duration;

use pathguess_core::{Event, GridView, RoundOutcome, SearchError, SearchStrategy};
use pathguess_system_playback::PathPlayer;
use pathguess_system_search::{SearchEngine, StepCost, UniformCost};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::info;

const DEFAULT_RNG_SEED: u64 = 0x5eed_9a7e_1b2c_3d4f;

/// Configuration parameters required to construct the round controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoundConfig {
    rng_seed: u64,
}

impl RoundConfig {
    /// Creates a configuration drawing secrets from the provided seed.
    #[must_use]
    pub const fn new(rng_seed: u64) -> Self {
        Self { rng_seed }
    }

    /// Seed used for secret selection.
    #[must_use]
    pub const fn rng_seed(&self) -> u64 {
        self.rng_seed
    }
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self::new(DEFAULT_RNG_SEED)
    }
}

/// Phase of the current round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RoundPhase {
    /// No round has started since the match began or was reset.
    Idle,
    /// The agent is on the move and the timer is running.
    Running,
    /// A guess arrived and is being evaluated.
    AwaitingGuess,
    /// The guess was evaluated; the secret is revealed.
    Scored,
}

/// State of a single round.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Round {
    number: u32,
    secret: SearchStrategy,
    elapsed: Duration,
    guess: Option<SearchStrategy>,
    outcome: Option<RoundOutcome>,
}

impl Round {
    /// One-based index of the round within the match.
    #[must_use]
    pub const fn number(&self) -> u32 {
        self.number
    }

    /// Strategy that produced this round's path.
    #[must_use]
    pub const fn secret(&self) -> SearchStrategy {
        self.secret
    }

    /// Time accumulated while the round was running.
    #[must_use]
    pub const fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Strategy the player named, once a guess was evaluated.
    #[must_use]
    pub const fn guess(&self) -> Option<SearchStrategy> {
        self.guess
    }

    /// Result of the guess, unset until one was evaluated.
    #[must_use]
    pub const fn outcome(&self) -> Option<RoundOutcome> {
        self.outcome
    }
}

/// Snapshot of the match-wide counters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MatchState {
    /// Number of correct guesses since the last reset.
    pub score: u32,
    /// Number of rounds started since the last reset.
    pub round: u32,
    /// Whether the current round is running.
    pub running: bool,
}

/// Orchestrates secret selection, search, playback and scoring.
#[derive(Debug)]
pub struct RoundController<C = UniformCost> {
    engine: SearchEngine<C>,
    player: PathPlayer,
    rng: ChaCha8Rng,
    score: u32,
    rounds_started: u32,
    phase: RoundPhase,
    current: Option<Round>,
}

impl<C: StepCost> RoundController<C> {
    /// Creates a controller that owns the provided engine and player.
    #[must_use]
    pub fn new(config: RoundConfig, engine: SearchEngine<C>, player: PathPlayer) -> Self {
        Self {
            engine,
            player,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed()),
            score: 0,
            rounds_started: 0,
            phase: RoundPhase::Idle,
            current: None,
        }
    }

    /// Starts a new round over the grid's current start and goal.
    ///
    /// Any playback still in flight is abandoned. Fails without touching the
    /// match state or the secret sequence when the grid presents an
    /// out-of-bounds start or goal.
    pub fn start_round(&mut self, grid: &GridView<'_>, out: &mut Vec<Event>) -> Result<(), SearchError> {
        let start = grid.start();
        let goal = grid.goal();
        if !grid.contains(start) {
            return Err(SearchError::StartOutOfBounds(start));
        }
        if !grid.contains(goal) {
            return Err(SearchError::GoalOutOfBounds(goal));
        }

        let secret = SearchStrategy::ALL[self.rng.gen_range(0..SearchStrategy::ALL.len())];
        let outcome = self.engine.search(grid, start, goal, secret)?;

        self.rounds_started = self.rounds_started.saturating_add(1);
        self.phase = RoundPhase::Running;
        self.current = Some(Round {
            number: self.rounds_started,
            secret,
            elapsed: Duration::ZERO,
            guess: None,
            outcome: None,
        });

        info!(
            round = self.rounds_started,
            path_len = outcome.path.len(),
            "round_started"
        );
        out.push(Event::RoundStarted {
            round: self.rounds_started,
        });
        out.push(Event::PathRevealed {
            path: outcome.path.clone(),
            explored: outcome.explored,
        });
        self.player.play(start, outcome.path, out);
        Ok(())
    }

    /// Consumes world events: runs the round timer and advances playback.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Event>) {
        if self.phase == RoundPhase::Running {
            if let Some(round) = self.current.as_mut() {
                for event in events {
                    if let Event::TimeAdvanced { dt } = event {
                        round.elapsed = round.elapsed.saturating_add(*dt);
                    }
                }
            }
        }

        self.player.handle(events, out);
    }

    /// Evaluates a guess against the secret strategy.
    ///
    /// Only rounds that are running accept guesses; otherwise the guess is
    /// ignored and `None` is returned.
    pub fn submit_guess(
        &mut self,
        guess: SearchStrategy,
        out: &mut Vec<Event>,
    ) -> Option<RoundOutcome> {
        if !matches!(self.phase, RoundPhase::Running | RoundPhase::AwaitingGuess) {
            return None;
        }
        let round = self.current.as_mut()?;
        self.phase = RoundPhase::AwaitingGuess;

        let outcome = if guess == round.secret {
            self.score = self.score.saturating_add(1);
            RoundOutcome::Correct
        } else {
            RoundOutcome::Incorrect
        };
        round.guess = Some(guess);
        round.outcome = Some(outcome);
        self.phase = RoundPhase::Scored;

        info!(
            round = round.number,
            guess = %guess,
            secret = %round.secret,
            ?outcome,
            score = self.score,
            "guess_evaluated"
        );
        out.push(Event::GuessEvaluated {
            round: round.number,
            guess,
            secret: round.secret,
            outcome,
            score: self.score,
        });
        Some(outcome)
    }

    /// Zeroes score and round counter and returns to [`RoundPhase::Idle`].
    pub fn reset_match(&mut self, out: &mut Vec<Event>) {
        self.score = 0;
        self.rounds_started = 0;
        self.phase = RoundPhase::Idle;
        self.current = None;
        self.player.stop();
        info!("match_reset");
        out.push(Event::MatchReset);
    }

    /// Current round phase.
    #[must_use]
    pub const fn phase(&self) -> RoundPhase {
        self.phase
    }

    /// Number of correct guesses since the last reset.
    #[must_use]
    pub const fn score(&self) -> u32 {
        self.score
    }

    /// Round in progress or most recently scored.
    #[must_use]
    pub const fn current_round(&self) -> Option<&Round> {
        self.current.as_ref()
    }

    /// Match-wide counters.
    #[must_use]
    pub fn match_state(&self) -> MatchState {
        MatchState {
            score: self.score,
            round: self.rounds_started,
            running: self.phase == RoundPhase::Running,
        }
    }

    /// Player driving the agent along the round's path.
    #[must_use]
    pub const fn player(&self) -> &PathPlayer {
        &self.player
    }
}

impl Default for RoundController<UniformCost> {
    fn default() -> Self {
        Self::new(
            RoundConfig::default(),
            SearchEngine::new(),
            PathPlayer::default(),
        )
    }
}
