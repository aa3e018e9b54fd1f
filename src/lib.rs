//! Ultragrid library - ultimate tic-tac-toe engine and move search
//!
//! This library provides the full game model for ultimate tic-tac-toe
//! together with pluggable move search, either in-process or delegated
//! to an engine subprocess over a line-oriented wire format.
//!
//! # Architecture
//!
//! - **Game**: board types, rules, state transitions, and move validation
//! - **Search**: move providers behind one trait, plus the iterative
//!   deepening driver that turns a time budget into a chosen move
//! - **Session**: turn orchestration with background search and polling
//! - **Wire**: the JSON state document and `[RESULT]` stdout line spoken
//!   with engine subprocesses
//!
//! # Example
//!
//! ```no_run
//! use ultragrid::{GameSession, NativeSearch, SearchBudget};
//!
//! # async fn example() -> anyhow::Result<()> {
//! // Create a session with the default three second budget
//! let mut session = GameSession::new("demo".to_string(), SearchBudget::default());
//!
//! // Let the built-in search open for X
//! let provider = NativeSearch::new();
//! let result = session.run_search(&provider).await?;
//! println!("opened with {} from depth {}", result.mv(), result.depth());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod config;
mod game;
mod search;
mod session;
mod wire;

// Crate-level exports - Configuration
pub use config::{ConfigError, GameConfig, ProviderConfig, ProviderKind};

// Crate-level exports - Game model
pub use game::{
    Board, Cell, GameState, MoveError, MoveRequest, Outcome, Player, Slot, SuperBoard, validate,
};

// Crate-level exports - Move search
pub use search::{
    MoveProvider, NativeSearch, SearchBudget, SearchError, SearchResult, SubprocessSearch,
    choose_move,
};

// Crate-level exports - Session management
pub use session::{GameSession, TurnError};

// Crate-level exports - Engine wire format
pub use wire::{
    RESULT_PREFIX, WireError, decode_state, encode_state, extract_result, result_line,
};
