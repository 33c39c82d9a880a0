//! Translates typed lines into player actions.

use pathguess_core::{CellCoord, SearchStrategy};
use thiserror::Error;

/// Action requested by a single line of input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Action {
    ToggleObstacle(CellCoord),
    SetStart(CellCoord),
    SetGoal(CellCoord),
    ClearObstacles,
    RunRound,
    Guess(SearchStrategy),
    ResetMatch,
    Show,
    Help,
    Quit,
}

/// Reasons a line could not be understood.
#[derive(Debug, PartialEq, Eq, Error)]
pub(crate) enum InputError {
    #[error("unknown command `{0}`; type `help` for a list")]
    UnknownCommand(String),
    #[error("`{0}` expects two integer coordinates, e.g. `{0} 3 4`")]
    MissingCoordinates(&'static str),
    #[error("`{0}` is not an integer coordinate")]
    InvalidCoordinate(String),
    #[error("unknown strategy `{0}`; choose bfs, dijkstra, astar or grassfire")]
    UnknownStrategy(String),
    #[error("`guess` expects a strategy name")]
    MissingStrategy,
}

pub(crate) const HELP: &str = "\
commands:
  toggle X Y   flip an obstacle (start and goal cannot be blocked)
  start X Y    move the start marker
  goal X Y     move the goal marker
  clear        remove every obstacle
  run          start a round and let the agent walk
  guess NAME   bfs | dijkstra | astar | grassfire
  reset        zero the score and round counter
  show         redraw the grid
  quit         leave";

/// Parses a line; blank lines yield `None`.
pub(crate) fn parse(line: &str) -> Result<Option<Action>, InputError> {
    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        return Ok(None);
    };

    let action = match command.to_ascii_lowercase().as_str() {
        "toggle" | "t" => Action::ToggleObstacle(coordinates("toggle", &mut words)?),
        "start" | "s" => Action::SetStart(coordinates("start", &mut words)?),
        "goal" | "g" => Action::SetGoal(coordinates("goal", &mut words)?),
        "clear" => Action::ClearObstacles,
        "run" | "r" => Action::RunRound,
        "guess" => {
            let name = words.next().ok_or(InputError::MissingStrategy)?;
            let strategy = SearchStrategy::parse(name)
                .ok_or_else(|| InputError::UnknownStrategy(name.to_owned()))?;
            Action::Guess(strategy)
        }
        "bfs" | "dijkstra" | "astar" | "grassfire" => match SearchStrategy::parse(command) {
            Some(strategy) => Action::Guess(strategy),
            None => return Err(InputError::UnknownStrategy(command.to_owned())),
        },
        "reset" => Action::ResetMatch,
        "show" | "draw" => Action::Show,
        "help" | "?" => Action::Help,
        "quit" | "exit" | "q" => Action::Quit,
        other => return Err(InputError::UnknownCommand(other.to_owned())),
    };
    Ok(Some(action))
}

fn coordinates<'a>(
    command: &'static str,
    words: &mut impl Iterator<Item = &'a str>,
) -> Result<CellCoord, InputError> {
    let (Some(column), Some(row)) = (words.next(), words.next()) else {
        return Err(InputError::MissingCoordinates(command));
    };
    Ok(CellCoord::new(integer(column)?, integer(row)?))
}

fn integer(word: &str) -> Result<i32, InputError> {
    word.parse()
        .map_err(|_| InputError::InvalidCoordinate(word.to_owned()))
}
