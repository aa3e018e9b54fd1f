//! In-process negamax search provider.
//!
//! Alpha-beta negamax over game states, with a positional heuristic
//! that scores 3x3 grids recursively: each line is worth the sum of
//! its members (+1 for an X share, -1 for an O share), a live grid
//! the mean of its lines, and a line or grid that can no longer be
//! won drops out entirely. The same scoring runs over cells for a
//! sub-board and over sub-board verdicts for the whole position.

use super::MoveProvider;
use super::invoker::SearchError;
use crate::game::{Board, Cell, GameState, MoveRequest, Outcome, Player, Slot};
use async_trait::async_trait;
use std::time::{Duration, Instant};
use tokio::task;
use tracing::instrument;

/// Score of a won position, discounted by ply so nearer wins rank higher.
const WIN_SCORE: i32 = 1_000_000;
/// Bound for alpha-beta windows. Negating it stays in range.
const INFINITY: i32 = i32::MAX;
/// Heuristic scores scale into `(-WIN_SCORE, WIN_SCORE)` with room to spare.
const HEURISTIC_SCALE: f64 = (i16::MAX - 1) as f64;

/// Cooperative wall-clock cutoff checked while searching.
#[derive(Debug, Clone, Copy)]
struct Deadline {
    at: Option<Instant>,
}

impl Deadline {
    fn after(ceiling: Duration) -> Self {
        Self {
            at: Instant::now().checked_add(ceiling),
        }
    }

    fn expired(&self) -> bool {
        self.at.is_some_and(|at| Instant::now() >= at)
    }
}

/// Signal that the deadline fired somewhere down the tree.
#[derive(Debug)]
struct OutOfTime;

struct Searcher {
    deadline: Deadline,
    nodes: u64,
}

impl Searcher {
    fn new(deadline: Deadline) -> Self {
        Self { deadline, nodes: 0 }
    }

    /// Samples the clock every 256 nodes.
    fn out_of_time(&mut self) -> bool {
        self.nodes = self.nodes.wrapping_add(1);
        self.nodes & 0xFF == 0 && self.deadline.expired()
    }

    /// Negamax over a live state. Terminal children are scored here
    /// rather than recursed into, since applying a finishing move does
    /// not hand the turn over.
    fn negamax(
        &mut self,
        state: &GameState,
        depth: u8,
        ply: u8,
        mut alpha: i32,
        beta: i32,
    ) -> Result<i32, OutOfTime> {
        if self.out_of_time() {
            return Err(OutOfTime);
        }
        if depth == 0 {
            return Ok(side_to_move_score(state));
        }

        let mut best = -INFINITY;
        for mv in state.legal_moves() {
            let mut child = *state;
            child.apply_move(mv);
            let score = match child.outcome() {
                Some(Outcome::Win(_)) => WIN_SCORE - i32::from(ply),
                Some(Outcome::Draw) => 0,
                None => -self.negamax(&child, depth - 1, ply + 1, -beta, -alpha)?,
            };
            if score > best {
                best = score;
            }
            if best > alpha {
                alpha = best;
            }
            if alpha >= beta {
                break;
            }
        }
        Ok(best)
    }
}

/// Full-width root search.
///
/// Returns `None` when the state has no legal moves; ties keep the
/// first move found, so move ordering decides between equals.
fn best_move(
    state: &GameState,
    depth: u8,
    deadline: Deadline,
) -> Result<Option<MoveRequest>, OutOfTime> {
    let depth = depth.max(1);
    let mut searcher = Searcher::new(deadline);
    let mut best: Option<(MoveRequest, i32)> = None;
    let mut alpha = -INFINITY;

    for mv in state.legal_moves() {
        let mut child = *state;
        child.apply_move(mv);
        let score = match child.outcome() {
            Some(Outcome::Win(_)) => WIN_SCORE,
            Some(Outcome::Draw) => 0,
            None => -searcher.negamax(&child, depth - 1, 1, -INFINITY, -alpha)?,
        };
        if best.is_none_or(|(_, s)| score > s) {
            best = Some((mv, score));
        }
        if score > alpha {
            alpha = score;
        }
    }
    Ok(best.map(|(mv, _)| mv))
}

/// Recursive verdict for a line, a sub-board or the whole position.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Verdict {
    WonX,
    WonO,
    /// Cannot be won by either player any more.
    Dead,
    /// Still contested, with a score in `[-1, 1]` from X's side.
    Open(f64),
}

fn cell_verdict(cell: Cell) -> Verdict {
    match cell {
        Cell::X => Verdict::WonX,
        Cell::O => Verdict::WonO,
        Cell::Empty => Verdict::Open(0.0),
    }
}

fn line_verdict(members: [Verdict; 3]) -> Verdict {
    let mut score = 0.0;
    let mut xs = 0;
    let mut os = 0;
    for member in members {
        match member {
            Verdict::WonX => {
                xs += 1;
                score += 1.0;
            }
            Verdict::WonO => {
                os += 1;
                score -= 1.0;
            }
            Verdict::Dead => return Verdict::Dead,
            Verdict::Open(value) => score += value,
        }
    }
    if xs == 3 {
        Verdict::WonX
    } else if os == 3 {
        Verdict::WonO
    } else if xs > 0 && os > 0 {
        Verdict::Dead
    } else {
        Verdict::Open(score / 3.0)
    }
}

fn grid_verdict(member: impl Fn(Slot) -> Verdict) -> Verdict {
    let mut score = 0.0;
    let mut winnable = false;
    for line in Slot::LINES {
        match line_verdict(line.map(&member)) {
            Verdict::WonX => return Verdict::WonX,
            Verdict::WonO => return Verdict::WonO,
            Verdict::Dead => {}
            Verdict::Open(value) => {
                winnable = true;
                score += value;
            }
        }
    }
    if winnable {
        Verdict::Open(score / 8.0)
    } else {
        Verdict::Dead
    }
}

fn board_verdict(board: &Board) -> Verdict {
    grid_verdict(|slot| cell_verdict(board.get(slot)))
}

/// Heuristic score of a position from the side to move's perspective.
fn side_to_move_score(state: &GameState) -> i32 {
    let verdict = grid_verdict(|slot| board_verdict(state.super_board().board(slot)));
    let value = match verdict {
        Verdict::WonX => 1.0,
        Verdict::WonO => -1.0,
        Verdict::Dead => 0.0,
        Verdict::Open(value) => value,
    };
    let score = (value * HEURISTIC_SCALE) as i32;
    match state.active_player() {
        Player::X => score,
        Player::O => -score,
    }
}

/// Alpha-beta provider running on the blocking thread pool.
///
/// The ceiling is honored cooperatively: the searcher samples a
/// deadline as it expands nodes and unwinds with a timeout once it
/// passes, rather than being cancelled from outside.
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeSearch;

impl NativeSearch {
    /// Creates the provider.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl MoveProvider for NativeSearch {
    #[instrument(skip(self, state))]
    async fn propose(
        &self,
        state: &GameState,
        depth: u8,
        ceiling: Duration,
    ) -> Result<MoveRequest, SearchError> {
        let state = *state;
        let deadline = Deadline::after(ceiling);
        let budget_ms = ceiling.as_millis() as u64;

        let searched = task::spawn_blocking(move || best_move(&state, depth, deadline))
            .await
            .map_err(|err| SearchError::Io {
                source: std::io::Error::other(err),
            })?;

        match searched {
            Ok(Some(mv)) => Ok(mv),
            Ok(None) => Err(SearchError::NoMove),
            Err(OutOfTime) => Err(SearchError::Timeout { budget_ms }),
        }
    }

    fn name(&self) -> &str {
        "native"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::SuperBoard;

    fn slot(index: u8) -> Slot {
        Slot::from_index(index).unwrap()
    }

    fn mv(board: u8, cell: u8) -> MoveRequest {
        MoveRequest::new(slot(board), slot(cell))
    }

    fn no_deadline() -> Deadline {
        Deadline { at: None }
    }

    /// X has boards 0 and 4, and two marks in board 8: one move wins.
    fn one_move_from_winning() -> GameState {
        let mut super_board = SuperBoard::new();
        for board in [slot(0), slot(4)] {
            let target = super_board.board_mut(board);
            target.set(slot(0), Cell::X);
            target.set(slot(1), Cell::X);
            target.set(slot(2), Cell::X);
        }
        let last = super_board.board_mut(slot(8));
        last.set(slot(0), Cell::X);
        last.set(slot(1), Cell::X);
        GameState::from_parts(super_board, Player::X, Some(slot(8)))
    }

    #[test]
    fn test_finds_immediate_win_at_depth_one() {
        let state = one_move_from_winning();
        let best = best_move(&state, 1, no_deadline()).unwrap().unwrap();
        assert_eq!(best, mv(8, 2));
    }

    #[test]
    fn test_finds_immediate_win_at_depth_five() {
        let state = one_move_from_winning();
        let best = best_move(&state, 5, no_deadline()).unwrap().unwrap();
        assert_eq!(best, mv(8, 2));
    }

    #[test]
    fn test_terminal_state_has_no_move() {
        let mut state = one_move_from_winning();
        state.make_move(mv(8, 2)).unwrap();
        assert!(best_move(&state, 3, no_deadline()).unwrap().is_none());
    }

    #[test]
    fn test_heuristic_sign_follows_side_to_move() {
        let mut super_board = SuperBoard::new();
        let won = super_board.board_mut(slot(0));
        won.set(slot(0), Cell::X);
        won.set(slot(4), Cell::X);
        won.set(slot(8), Cell::X);

        let x_view = side_to_move_score(&GameState::from_parts(super_board, Player::X, None));
        let o_view = side_to_move_score(&GameState::from_parts(super_board, Player::O, None));
        assert!(x_view > 0, "X advantage should score positive for X");
        assert_eq!(x_view, -o_view);
    }

    #[test]
    fn test_line_verdict_mixed_marks_is_dead() {
        let line = [Verdict::WonX, Verdict::WonO, Verdict::Open(0.0)];
        assert_eq!(line_verdict(line), Verdict::Dead);
    }

    #[test]
    fn test_line_verdict_dead_member_kills_line() {
        let line = [Verdict::Open(0.5), Verdict::Dead, Verdict::WonX];
        assert_eq!(line_verdict(line), Verdict::Dead);
    }

    #[test]
    fn test_line_verdict_three_wins_line() {
        let line = [Verdict::WonO, Verdict::WonO, Verdict::WonO];
        assert_eq!(line_verdict(line), Verdict::WonO);
    }

    #[tokio::test]
    async fn test_propose_times_out_on_exhausted_ceiling() {
        let provider = NativeSearch::new();
        let state = GameState::new();
        let err = provider
            .propose(&state, 12, Duration::ZERO)
            .await
            .unwrap_err();
        assert!(matches!(err, SearchError::Timeout { .. }));
    }

    #[tokio::test]
    async fn test_propose_reports_no_move_on_finished_game() {
        let provider = NativeSearch::new();
        let mut state = one_move_from_winning();
        state.make_move(mv(8, 2)).unwrap();
        let err = provider
            .propose(&state, 3, Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(matches!(err, SearchError::NoMove));
    }
}
