//! Playability rules: which sub-boards can still accept a move.

use super::super::types::{Board, Cell, Slot, SuperBoard};
use super::win::board_winner;

/// Checks whether a sub-board can accept another move.
///
/// A sub-board is playable while it has no winner and at least one empty
/// cell. A full board with no winner is dead, not playable.
pub fn is_playable(board: &Board) -> bool {
    board_winner(board) == Cell::Empty && board.has_empty()
}

/// Returns the slots of all sub-boards that can still accept a move.
pub fn playable_boards(super_board: &SuperBoard) -> impl Iterator<Item = Slot> + '_ {
    Slot::ALL
        .into_iter()
        .filter(|slot| is_playable(super_board.board(*slot)))
}
