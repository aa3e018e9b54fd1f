//! Game state and the move transition.

use super::rules::{is_playable, playable_boards, super_board_winner};
use super::types::{MoveRequest, Player, Slot, SuperBoard};
use super::validate::{MoveError, validate};
use serde::Serialize;

/// Final result of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Outcome {
    /// The player completed a line of three sub-boards.
    Win(Player),
    /// No winner, and no playable sub-board remains.
    Draw,
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Win(player) => write!(f, "winner: {player}"),
            Outcome::Draw => write!(f, "draw"),
        }
    }
}

/// Complete state of an ultimate tic-tac-toe game.
///
/// Holds the super-board, whose turn it is, which sub-board the active
/// player is constrained to (or `None` for any playable one), and the
/// outcome once the game has ended. A terminal state is never mutated
/// further; every mutating entry point checks the outcome first.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GameState {
    /// The 3x3 arrangement of sub-boards.
    super_board: SuperBoard,
    /// Player whose turn it is.
    active_player: Player,
    /// Sub-board the active player must play in, or `None` for any.
    active_slot: Option<Slot>,
    /// Set once the game has ended.
    outcome: Option<Outcome>,
}

impl GameState {
    /// Creates the initial empty state: X to move, any sub-board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reconstructs a state from raw parts, recomputing the outcome from
    /// the cell contents.
    ///
    /// The active slot is normalized: if the game turns out to be over, or
    /// the given slot addresses a sub-board that cannot accept a move, it
    /// becomes `None`.
    pub fn from_parts(
        super_board: SuperBoard,
        active_player: Player,
        active_slot: Option<Slot>,
    ) -> Self {
        let outcome = compute_outcome(&super_board);
        let active_slot = match outcome {
            Some(_) => None,
            None => active_slot.filter(|slot| is_playable(super_board.board(*slot))),
        };
        Self {
            super_board,
            active_player,
            active_slot,
            outcome,
        }
    }

    /// Returns the super-board.
    pub fn super_board(&self) -> &SuperBoard {
        &self.super_board
    }

    /// Returns the player whose turn it is.
    pub fn active_player(&self) -> Player {
        self.active_player
    }

    /// Returns the sub-board the active player must play in, or `None`
    /// when any playable sub-board is allowed.
    pub fn active_slot(&self) -> Option<Slot> {
        self.active_slot
    }

    /// Returns the outcome, if the game has ended.
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// Checks whether the game has ended.
    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    /// Validates and applies a move in one step.
    ///
    /// On rejection the state is left untouched and the reason is returned.
    pub fn make_move(&mut self, mv: MoveRequest) -> Result<(), MoveError> {
        validate(self, mv)?;
        self.apply_move(mv);
        Ok(())
    }

    /// Enumerates every move the active player may legally make.
    pub fn legal_moves(&self) -> Vec<MoveRequest> {
        let mut moves = Vec::new();
        if self.outcome.is_some() {
            return moves;
        }
        match self.active_slot {
            Some(board) => self.push_board_moves(board, &mut moves),
            None => {
                for board in playable_boards(&self.super_board) {
                    self.push_board_moves(board, &mut moves);
                }
            }
        }
        moves
    }

    fn push_board_moves(&self, board: Slot, moves: &mut Vec<MoveRequest>) {
        for cell in Slot::ALL {
            if self.super_board.board(board).get(cell).is_empty() {
                moves.push(MoveRequest::new(board, cell));
            }
        }
    }

    /// Applies a move without validating it. The caller must have run the
    /// move through [`validate`] first.
    ///
    /// Writes the mark, rechecks the super-board for a winner or a draw,
    /// derives the opponent's slot from the cell just played (falling back
    /// to "any" when that sub-board is dead), and toggles the turn.
    pub(crate) fn apply_move(&mut self, mv: MoveRequest) {
        self.super_board
            .board_mut(mv.board())
            .set(mv.cell(), self.active_player.mark());

        let winner = super_board_winner(&self.super_board);
        if let Some(player) = winner.player() {
            self.outcome = Some(Outcome::Win(player));
            self.active_slot = None;
            return;
        }
        if playable_boards(&self.super_board).next().is_none() {
            self.outcome = Some(Outcome::Draw);
            self.active_slot = None;
            return;
        }

        let candidate = mv.cell();
        self.active_slot = if is_playable(self.super_board.board(candidate)) {
            Some(candidate)
        } else {
            None
        };
        self.active_player = self.active_player.other();
    }
}

fn compute_outcome(super_board: &SuperBoard) -> Option<Outcome> {
    if let Some(player) = super_board_winner(super_board).player() {
        return Some(Outcome::Win(player));
    }
    if playable_boards(super_board).next().is_none() {
        return Some(Outcome::Draw);
    }
    None
}

impl std::fmt::Display for GameState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.super_board)?;
        match self.outcome {
            Some(outcome) => write!(f, "{outcome}"),
            None => match self.active_slot {
                Some(slot) => write!(f, "{} to move in board {}", self.active_player, slot),
                None => write!(f, "{} to move in any board", self.active_player),
            },
        }
    }
}
