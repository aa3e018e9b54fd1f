//! Ultimate tic-tac-toe domain model.
//!
//! Types, rules, state and validation are kept in separate modules so
//! that the state transition, the move validator and the search all
//! evaluate positions through the same pure functions.

pub mod rules;
pub mod state;
pub mod types;
pub mod validate;

pub use state::{GameState, Outcome};
pub use types::{Board, Cell, MoveRequest, Player, Slot, SuperBoard};
pub use validate::{MoveError, validate};
