//! Game rules for ultimate tic-tac-toe.
//!
//! This module contains pure functions for evaluating board contents:
//! line, sub-board and super-board winners, and sub-board playability.
//! Rules are separated from state storage so that validation, transition
//! and search all evaluate positions the same way.

pub mod playable;
pub mod win;

pub use playable::{is_playable, playable_boards};
pub use win::{board_winner, line_winner, super_board_winner};
