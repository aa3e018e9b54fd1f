//! Move legality checks.
//!
//! Validation never mutates state. [`GameState::make_move`] runs these
//! checks before applying; callers can also run them on their own to
//! probe a move without committing it.

use super::rules::is_playable;
use super::state::GameState;
use super::types::{MoveRequest, Slot};
use tracing::instrument;

/// Reason a proposed move was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum MoveError {
    /// The game has already ended.
    #[display("Game is already over")]
    GameOver,

    /// The move targets a different sub-board than the active slot requires.
    #[display("Must play in board {}, not board {}", _0, _1)]
    WrongBoard(Slot, Slot),

    /// The targeted sub-board is won or has no empty cells.
    #[display("Board {} is dead", _0)]
    DeadBoard(Slot),

    /// The targeted cell already holds a mark.
    #[display("Cell {} in board {} is already occupied", _1, _0)]
    OccupiedCell(Slot, Slot),
}

impl std::error::Error for MoveError {}

/// Checks a proposed move against the current state.
///
/// The checks run in a fixed order: terminal state, active-slot
/// constraint, target board playability, cell emptiness. The first
/// failing check decides the error.
#[instrument(skip(state))]
pub fn validate(state: &GameState, mv: MoveRequest) -> Result<(), MoveError> {
    if state.is_over() {
        return Err(MoveError::GameOver);
    }
    if let Some(required) = state.active_slot() {
        if mv.board() != required {
            return Err(MoveError::WrongBoard(required, mv.board()));
        }
    }
    let board = state.super_board().board(mv.board());
    if !is_playable(board) {
        return Err(MoveError::DeadBoard(mv.board()));
    }
    if !board.get(mv.cell()).is_empty() {
        return Err(MoveError::OccupiedCell(mv.board(), mv.cell()));
    }
    Ok(())
}
