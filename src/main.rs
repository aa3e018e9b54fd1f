//! Ultragrid - unified CLI
//!
//! One binary covers both sides of the wire: an engine mode that
//! answers a single search request on stdout, and a terminal play
//! mode that runs whole games against the configured provider.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command, SeatControl};
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::AsyncBufReadExt;
use tracing::info;
use tracing_subscriber::EnvFilter;
use ultragrid::{
    ConfigError, GameConfig, GameSession, MoveProvider, MoveRequest, NativeSearch, Player,
    ProviderKind, SearchError, Slot, SubprocessSearch, decode_state, result_line,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Engine { depth, state } => run_engine(depth, state).await,
        Command::Play { config, x, o } => run_play(config, x, o).await,
    }
}

/// Answer one search request on stdout, wire-style
async fn run_engine(depth: u8, state: String) -> Result<()> {
    // Tracing to stderr (stdout carries the result line)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let state = decode_state(&state)?;
    info!(depth, "Answering search request");

    // The host owns the clock and kills us on overrun, so the in-process
    // deadline only has to be far enough out to never fire first.
    let provider = NativeSearch::new();
    let ceiling = Duration::from_secs(60 * 60 * 24);
    let proposed = match provider.propose(&state, depth, ceiling).await {
        Ok(mv) => Some(mv),
        Err(SearchError::NoMove) => None,
        Err(err) => return Err(err.into()),
    };

    println!("{}", result_line(proposed)?);
    Ok(())
}

/// Play a full game at the terminal
async fn run_play(config: Option<PathBuf>, x: SeatControl, o: SeatControl) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = match config {
        Some(path) => GameConfig::from_file(path)?,
        None => GameConfig::default(),
    };
    let provider = build_provider(&config)?;

    let mut session = GameSession::new("terminal".to_string(), config.budget());
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    println!("{}", session.current_state());
    while session.outcome().is_none() {
        let seat = match session.current_state().active_player() {
            Player::X => x,
            Player::O => o,
        };
        match seat {
            SeatControl::Search => {
                let player = session.current_state().active_player();
                println!("{player} is thinking...");
                let result = session.run_search(provider.as_ref()).await?;
                println!("{player} plays {} (depth {})", result.mv(), result.depth());
            }
            SeatControl::Human => {
                let Some(mv) = read_move(&mut lines, &session).await? else {
                    anyhow::bail!("input closed before the game ended");
                };
                if let Err(err) = session.propose_move(mv) {
                    println!("{err}");
                    continue;
                }
            }
        }
        println!("{}", session.current_state());
    }

    if let Some(outcome) = session.outcome() {
        println!("Game over: {outcome}");
    }
    Ok(())
}

/// Build the move provider the configuration asks for
fn build_provider(config: &GameConfig) -> Result<Box<dyn MoveProvider>, ConfigError> {
    match config.provider().kind() {
        ProviderKind::Native => Ok(Box::new(NativeSearch::new())),
        ProviderKind::Subprocess => SubprocessSearch::from_command(config.provider().command())
            .map(|provider| Box::new(provider) as Box<dyn MoveProvider>)
            .ok_or_else(|| {
                ConfigError::new("provider.command is required for the subprocess provider".into())
            }),
    }
}

/// Prompt until a well-formed move arrives or input ends
async fn read_move(
    lines: &mut tokio::io::Lines<tokio::io::BufReader<tokio::io::Stdin>>,
    session: &GameSession,
) -> Result<Option<MoveRequest>> {
    loop {
        match session.current_state().active_slot() {
            Some(slot) => print_prompt(&format!(
                "{} to move in board {slot}, enter cell 0-8 (or 'board cell'): ",
                session.current_state().active_player()
            ))?,
            None => print_prompt(&format!(
                "{} to move in any board, enter 'board cell' (each 0-8): ",
                session.current_state().active_player()
            ))?,
        }

        let Some(line) = lines.next_line().await? else {
            return Ok(None);
        };
        match parse_move(&line, session.current_state().active_slot()) {
            Some(mv) => return Ok(Some(mv)),
            None => println!("Could not read that as a move."),
        }
    }
}

fn print_prompt(prompt: &str) -> Result<()> {
    use std::io::Write;
    print!("{prompt}");
    std::io::stdout().flush()?;
    Ok(())
}

/// Parse `board cell`, or a bare `cell` when a board is forced
fn parse_move(line: &str, forced_board: Option<Slot>) -> Option<MoveRequest> {
    let mut parts = line.split_whitespace();
    let first: u8 = parts.next()?.parse().ok()?;
    match (parts.next(), forced_board) {
        (Some(second), _) => {
            if parts.next().is_some() {
                return None;
            }
            let cell: u8 = second.parse().ok()?;
            Some(MoveRequest::new(
                Slot::from_index(first)?,
                Slot::from_index(cell)?,
            ))
        }
        (None, Some(board)) => Some(MoveRequest::new(board, Slot::from_index(first)?)),
        (None, None) => None,
    }
}
