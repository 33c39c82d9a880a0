#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that hosts the path-guessing game on a terminal.

mod input;
mod session;
mod text_renderer;

use std::{
    io::{self, BufRead, Write},
    time::Duration,
};

use anyhow::{Context, Result};
use clap::Parser;
use pathguess_core::GridSize;
use pathguess_system_playback::PlaybackConfig;
use pathguess_system_round::RoundConfig;
use tracing_subscriber::{fmt, EnvFilter};

use crate::session::{Flow, Session};

/// Watch an agent cross the grid and guess which search strategy moved it.
#[derive(Debug, Parser)]
#[command(name = "pathguess", version, about)]
struct Args {
    /// Number of grid columns.
    #[arg(long, default_value_t = GridSize::default().columns())]
    columns: u32,
    /// Number of grid rows.
    #[arg(long, default_value_t = GridSize::default().rows())]
    rows: u32,
    /// Agent speed in cells per second.
    #[arg(long, default_value_t = PlaybackConfig::default().speed())]
    speed: f32,
    /// Seed for secret strategy selection; random when omitted.
    #[arg(long)]
    seed: Option<u64>,
    /// Simulated duration of one tick in milliseconds.
    #[arg(long, default_value_t = 16)]
    tick_ms: u64,
}

/// Entry point for the path-guessing command-line interface.
fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt().with_env_filter(filter).with_writer(io::stderr).init();

    let args = Args::parse();
    let size = GridSize::new(args.columns, args.rows).context("invalid grid dimensions")?;
    let playback = PlaybackConfig::new(args.speed).context("invalid agent speed")?;
    let seed = args.seed.unwrap_or_else(seed_from_clock);
    let tick = Duration::from_millis(args.tick_ms.max(1));
    tracing::info!(
        columns = size.columns(),
        rows = size.rows(),
        speed = playback.speed(),
        seed,
        "starting pathguess"
    );

    let mut session = Session::new(size, playback, RoundConfig::new(seed), tick);
    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", session.banner())?;
    writeln!(stdout, "{}", input::HELP)?;

    for line in stdin.lock().lines() {
        let line = line.context("failed to read from stdin")?;
        match input::parse(&line) {
            Ok(Some(action)) => {
                if session.perform(action, &mut stdout)? == Flow::Quit {
                    break;
                }
            }
            Ok(None) => {}
            Err(error) => writeln!(stdout, "{error}")?,
        }
        stdout.flush()?;
    }

    Ok(())
}

fn seed_from_clock() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_nanos() as u64)
}
