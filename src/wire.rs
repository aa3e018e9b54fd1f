//! Wire format shared with external move-search engines.
//!
//! A state travels as one JSON document: `ultra_grid` nests two levels
//! of `grid` holding 3x3 arrays of `"X"` / `"O"` / `"Empty"`,
//! `crosses_turn` says whether X is to move, and `current_play_slot`
//! is a 0-8 board index or the sentinel 9 meaning "any playable
//! board". The chosen move comes back on a stdout line starting with
//! [`RESULT_PREFIX`], carrying a board index and a cell index (or
//! `null` when the engine found no move). Every other output line is
//! diagnostic and is ignored.

use crate::game::{Board, Cell, GameState, MoveRequest, Player, Slot, SuperBoard};
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};

/// Marker prefixing the one stdout line that carries the chosen move.
pub const RESULT_PREFIX: &str = "[RESULT] ";

/// Sentinel `current_play_slot` value meaning "any playable board".
const ANY_SLOT: u8 = 9;

#[derive(Debug, Serialize, Deserialize)]
struct WireGrid<T> {
    grid: [[T; 3]; 3],
}

#[derive(Debug, Serialize, Deserialize)]
struct WireState {
    ultra_grid: WireGrid<WireGrid<Cell>>,
    crosses_turn: bool,
    current_play_slot: u8,
}

/// Error turning wire text into domain values or back.
#[derive(Debug, Display, Error)]
pub enum WireError {
    /// The JSON itself did not parse or did not match the schema.
    #[display("Malformed wire JSON: {source}")]
    Json {
        /// Underlying serde failure.
        source: serde_json::Error,
    },

    /// A board or cell index was outside 0-8 (or 0-9 for the play slot).
    #[display("Slot index {slot} is out of range")]
    SlotOutOfRange {
        /// The offending index.
        slot: u8,
    },

    /// The play slot addresses a board that is won or full.
    #[display("Play slot {slot} addresses a dead board")]
    DeadSlot {
        /// The offending board slot.
        slot: Slot,
    },

    /// No output line carried the result marker.
    #[display("No result line in engine output")]
    MissingResult,
}

/// Serializes a state into the wire JSON document.
pub fn encode_state(state: &GameState) -> Result<String, WireError> {
    let grid = state
        .super_board()
        .boards()
        .map(|row| row.map(|board| WireGrid { grid: *board.cells() }));
    let wire = WireState {
        ultra_grid: WireGrid { grid },
        crosses_turn: state.active_player() == Player::X,
        current_play_slot: state.active_slot().map_or(ANY_SLOT, |slot| slot.index()),
    };
    serde_json::to_string(&wire).map_err(|source| WireError::Json { source })
}

/// Parses a wire JSON document into a state.
///
/// The play slot is checked strictly: an index outside 0-9, or a 0-8
/// index addressing a dead board while the game is still live, is a
/// wire error rather than something to silently repair.
pub fn decode_state(text: &str) -> Result<GameState, WireError> {
    let wire: WireState =
        serde_json::from_str(text).map_err(|source| WireError::Json { source })?;

    let requested = match wire.current_play_slot {
        ANY_SLOT => None,
        index => Some(Slot::from_index(index).ok_or(WireError::SlotOutOfRange { slot: index })?),
    };

    let mut super_board = SuperBoard::new();
    for board in Slot::ALL {
        let cells = wire.ultra_grid.grid[board.row() as usize][board.col() as usize].grid;
        *super_board.board_mut(board) = Board::from_cells(cells);
    }
    let player = if wire.crosses_turn { Player::X } else { Player::O };

    let state = GameState::from_parts(super_board, player, requested);
    if let Some(slot) = requested {
        if !state.is_over() && state.active_slot().is_none() {
            return Err(WireError::DeadSlot { slot });
        }
    }
    Ok(state)
}

/// Formats the stdout line that reports a chosen move.
pub fn result_line(mv: Option<MoveRequest>) -> Result<String, WireError> {
    let payload: Option<(u8, u8)> = mv.map(|m| (m.board().index(), m.cell().index()));
    let json = serde_json::to_string(&payload).map_err(|source| WireError::Json { source })?;
    Ok(format!("{RESULT_PREFIX}{json}"))
}

/// Pulls the chosen move out of an engine's captured stdout.
///
/// The last line starting with [`RESULT_PREFIX`] wins; anything else
/// is treated as diagnostics. `Ok(None)` means the engine explicitly
/// reported `null`, which callers decide how to treat.
pub fn extract_result(output: &str) -> Result<Option<MoveRequest>, WireError> {
    let payload = output
        .lines()
        .rev()
        .find_map(|line| line.strip_prefix(RESULT_PREFIX))
        .ok_or(WireError::MissingResult)?;
    let decoded: Option<(u8, u8)> =
        serde_json::from_str(payload.trim()).map_err(|source| WireError::Json { source })?;
    match decoded {
        None => Ok(None),
        Some((board, cell)) => {
            let board = Slot::from_index(board).ok_or(WireError::SlotOutOfRange { slot: board })?;
            let cell = Slot::from_index(cell).ok_or(WireError::SlotOutOfRange { slot: cell })?;
            Ok(Some(MoveRequest::new(board, cell)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(index: u8) -> Slot {
        Slot::from_index(index).unwrap()
    }

    fn empty_board_json() -> String {
        let row = r#"["Empty","Empty","Empty"]"#;
        format!(r#"{{"grid":[{row},{row},{row}]}}"#)
    }

    #[test]
    fn test_decode_initial_state() {
        let board = empty_board_json();
        let json = format!(
            r#"{{"ultra_grid":{{"grid":[[{b},{b},{b}],[{b},{b},{b}],[{b},{b},{b}]]}},"crosses_turn":true,"current_play_slot":9}}"#,
            b = board
        );
        let state = decode_state(&json).unwrap();
        assert_eq!(state, GameState::new());
    }

    #[test]
    fn test_round_trip_preserves_state() {
        let mut state = GameState::new();
        state
            .make_move(MoveRequest::new(slot(0), slot(4)))
            .unwrap();
        state
            .make_move(MoveRequest::new(slot(4), slot(7)))
            .unwrap();

        let json = encode_state(&state).unwrap();
        let decoded = decode_state(&json).unwrap();
        assert_eq!(decoded, state);
    }

    #[test]
    fn test_encode_reports_any_slot_as_sentinel() {
        let state = GameState::new();
        let json = encode_state(&state).unwrap();
        assert!(json.contains(r#""current_play_slot":9"#));
        assert!(json.contains(r#""crosses_turn":true"#));
    }

    #[test]
    fn test_decode_rejects_out_of_range_slot() {
        let state = GameState::new();
        let json = encode_state(&state)
            .unwrap()
            .replace(r#""current_play_slot":9"#, r#""current_play_slot":12"#);
        assert!(matches!(
            decode_state(&json),
            Err(WireError::SlotOutOfRange { slot: 12 })
        ));
    }

    #[test]
    fn test_decode_rejects_dead_play_slot() {
        // Board 4 won by X, yet the document routes play into it.
        let mut super_board = SuperBoard::new();
        let won = super_board.board_mut(slot(4));
        won.set(slot(0), Cell::X);
        won.set(slot(1), Cell::X);
        won.set(slot(2), Cell::X);
        let state = GameState::from_parts(super_board, Player::O, None);

        let json = encode_state(&state)
            .unwrap()
            .replace(r#""current_play_slot":9"#, r#""current_play_slot":4"#);
        assert!(matches!(
            decode_state(&json),
            Err(WireError::DeadSlot { .. })
        ));
    }

    #[test]
    fn test_decode_rejects_malformed_json() {
        assert!(matches!(
            decode_state("{\"ultra_grid\":"),
            Err(WireError::Json { .. })
        ));
    }

    #[test]
    fn test_result_line_format() {
        let mv = MoveRequest::new(slot(4), slot(2));
        assert_eq!(result_line(Some(mv)).unwrap(), "[RESULT] [4,2]");
        assert_eq!(result_line(None).unwrap(), "[RESULT] null");
    }

    #[test]
    fn test_extract_result_takes_last_marked_line() {
        let output = "searching depth 5\n[RESULT] [0,0]\ndeeper now\n[RESULT] [4,2]\n";
        let mv = extract_result(output).unwrap().unwrap();
        assert_eq!(mv.board(), slot(4));
        assert_eq!(mv.cell(), slot(2));
    }

    #[test]
    fn test_extract_result_null() {
        assert_eq!(extract_result("[RESULT] null\n").unwrap(), None);
    }

    #[test]
    fn test_extract_result_missing_marker() {
        assert!(matches!(
            extract_result("no move here\n"),
            Err(WireError::MissingResult)
        ));
    }

    #[test]
    fn test_extract_result_rejects_garbled_payload() {
        assert!(matches!(
            extract_result("[RESULT] [4,\n"),
            Err(WireError::Json { .. })
        ));
        assert!(matches!(
            extract_result("[RESULT] [4,9]\n"),
            Err(WireError::SlotOutOfRange { slot: 9 })
        ));
    }
}
