//! Integration tests for the engine wire format.

use ultragrid::{
    Cell, GameState, MoveRequest, Player, Slot, SuperBoard, WireError, decode_state, encode_state,
    extract_result, result_line,
};

fn slot(index: u8) -> Slot {
    Slot::from_index(index).unwrap()
}

fn mv(board: u8, cell: u8) -> MoveRequest {
    MoveRequest::new(slot(board), slot(cell))
}

#[test]
fn test_round_trip_preserves_state() {
    let mut state = GameState::new();
    state.make_move(mv(4, 7)).unwrap();
    state.make_move(mv(7, 2)).unwrap();

    let encoded = encode_state(&state).unwrap();
    let decoded = decode_state(&encoded).unwrap();

    assert_eq!(decoded, state);
    assert_eq!(decoded.active_slot(), Some(slot(2)));
    assert_eq!(decoded.active_player(), Player::X);
}

#[test]
fn test_empty_state_document_shape() {
    let encoded = encode_state(&GameState::new()).unwrap();

    let board = serde_json::json!({
        "grid": [
            ["Empty", "Empty", "Empty"],
            ["Empty", "Empty", "Empty"],
            ["Empty", "Empty", "Empty"],
        ]
    });
    let row = serde_json::json!([board.clone(), board.clone(), board]);
    let expected = serde_json::json!({
        "ultra_grid": {"grid": [row.clone(), row.clone(), row]},
        "crosses_turn": true,
        "current_play_slot": 9,
    });

    let document: serde_json::Value = serde_json::from_str(&encoded).unwrap();
    assert_eq!(document, expected);

    // Field order is part of the format engines were built against.
    let ultra = encoded.find("\"ultra_grid\"").unwrap();
    let crosses = encoded.find("\"crosses_turn\"").unwrap();
    let play_slot = encoded.find("\"current_play_slot\"").unwrap();
    assert!(ultra < crosses && crosses < play_slot);
}

#[test]
fn test_crosses_turn_follows_active_player() {
    let mut state = GameState::new();
    assert!(encode_state(&state).unwrap().contains("\"crosses_turn\":true"));

    state.make_move(mv(4, 4)).unwrap();
    let encoded = encode_state(&state).unwrap();
    assert!(encoded.contains("\"crosses_turn\":false"));
    assert!(encoded.contains("\"current_play_slot\":4"));
    assert!(encoded.contains("\"X\""));
}

#[test]
fn test_unconstrained_slot_encodes_as_nine() {
    let encoded = encode_state(&GameState::new()).unwrap();
    assert!(encoded.contains("\"current_play_slot\":9"));
}

#[test]
fn test_decode_maps_grid_coordinates() {
    let mut document: serde_json::Value =
        serde_json::from_str(&encode_state(&GameState::new()).unwrap()).unwrap();
    // Board (0,1), cell (2,0), with O to move.
    document["ultra_grid"]["grid"][0][1]["grid"][2][0] = "X".into();
    document["crosses_turn"] = false.into();

    let state = decode_state(&document.to_string()).unwrap();
    assert_eq!(state.super_board().board(slot(1)).get(slot(6)), Cell::X);
    assert_eq!(state.active_player(), Player::O);
}

#[test]
fn test_decode_rejects_out_of_range_slot() {
    let mut document: serde_json::Value =
        serde_json::from_str(&encode_state(&GameState::new()).unwrap()).unwrap();
    document["current_play_slot"] = 10.into();

    let err = decode_state(&document.to_string()).unwrap_err();
    assert!(matches!(err, WireError::SlotOutOfRange { slot: 10 }));
}

#[test]
fn test_decode_rejects_slot_pointing_at_dead_board() {
    let mut super_board = SuperBoard::new();
    let won = super_board.board_mut(slot(5));
    won.set(slot(0), Cell::O);
    won.set(slot(1), Cell::O);
    won.set(slot(2), Cell::O);
    let state = GameState::from_parts(super_board, Player::X, None);

    let mut document: serde_json::Value =
        serde_json::from_str(&encode_state(&state).unwrap()).unwrap();
    document["current_play_slot"] = 5.into();

    let err = decode_state(&document.to_string()).unwrap_err();
    assert!(matches!(err, WireError::DeadSlot { .. }));
}

#[test]
fn test_decode_tolerates_slot_on_finished_game() {
    let mut super_board = SuperBoard::new();
    for board in [0, 4, 8] {
        let target = super_board.board_mut(slot(board));
        target.set(slot(0), Cell::X);
        target.set(slot(1), Cell::X);
        target.set(slot(2), Cell::X);
    }
    let state = GameState::from_parts(super_board, Player::O, None);
    assert!(state.is_over());

    let mut document: serde_json::Value =
        serde_json::from_str(&encode_state(&state).unwrap()).unwrap();
    document["current_play_slot"] = 3.into();

    let decoded = decode_state(&document.to_string()).unwrap();
    assert!(decoded.is_over());
    assert_eq!(decoded.active_slot(), None);
}

#[test]
fn test_decode_rejects_malformed_json() {
    assert!(matches!(
        decode_state("not a state"),
        Err(WireError::Json { .. })
    ));
}

#[test]
fn test_result_line_formats_move_and_null() {
    assert_eq!(result_line(Some(mv(4, 7))).unwrap(), "[RESULT] [4,7]");
    assert_eq!(result_line(None).unwrap(), "[RESULT] null");
}

#[test]
fn test_extract_result_takes_last_marker() {
    let output = "searching depth 5\n[RESULT] [0,0]\nsearching depth 6\n[RESULT] [4,4]\ndone";
    assert_eq!(extract_result(output).unwrap(), Some(mv(4, 4)));
}

#[test]
fn test_extract_result_null_is_none() {
    let output = "no moves left\n[RESULT] null";
    assert_eq!(extract_result(output).unwrap(), None);
}

#[test]
fn test_extract_result_missing_marker_is_error() {
    assert!(matches!(
        extract_result("thinking...\ndone"),
        Err(WireError::MissingResult)
    ));
}

#[test]
fn test_extract_result_rejects_out_of_range_indices() {
    assert!(extract_result("[RESULT] [9,0]").is_err());
    assert!(extract_result("[RESULT] [0,12]").is_err());
}
