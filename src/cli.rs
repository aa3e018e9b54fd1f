//! Command-line interface for ultragrid.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Ultragrid - ultimate tic-tac-toe with delegated move search
#[derive(Parser, Debug)]
#[command(name = "ultragrid")]
#[command(about = "Ultimate tic-tac-toe engine and game runner", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Who controls a seat during play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SeatControl {
    /// Moves typed at the terminal.
    Human,
    /// Moves chosen by the configured search provider.
    Search,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Answer a single search request on stdout and exit (wire mode)
    Engine {
        /// Search depth to use
        depth: u8,

        /// Game state as wire JSON
        state: String,
    },

    /// Play a game at the terminal
    Play {
        /// Path to a TOML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Who controls X
        #[arg(long, value_enum, default_value_t = SeatControl::Human)]
        x: SeatControl,

        /// Who controls O
        #[arg(long, value_enum, default_value_t = SeatControl::Search)]
        o: SeatControl,
    },
}
