//! Win detection for sub-boards and the super-board.

use super::super::types::{Board, Cell, Slot, SuperBoard};

/// Returns the common mark if all three cells carry it, `Cell::Empty` otherwise.
pub fn line_winner(a: Cell, b: Cell, c: Cell) -> Cell {
    if a != Cell::Empty && a == b && a == c {
        a
    } else {
        Cell::Empty
    }
}

/// Checks if there is a winner on a single sub-board.
///
/// Scans all eight lines in the fixed order of [`Slot::LINES`] and returns
/// the first non-empty line winner, or `Cell::Empty` if no line is complete.
pub fn board_winner(board: &Board) -> Cell {
    scan_lines(|slot| board.get(slot))
}

/// Checks if there is a winner on the super-board.
///
/// Derives the 3x3 meta-board of sub-board winners, then applies the same
/// eight-line scan to it. Pure function of the current cell contents.
pub fn super_board_winner(super_board: &SuperBoard) -> Cell {
    scan_lines(|slot| board_winner(super_board.board(slot)))
}

fn scan_lines(get: impl Fn(Slot) -> Cell) -> Cell {
    for [a, b, c] in Slot::LINES {
        let winner = line_winner(get(a), get(b), get(c));
        if winner != Cell::Empty {
            return winner;
        }
    }
    Cell::Empty
}
