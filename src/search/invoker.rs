//! Iterative-deepening search scheduling.

use super::MoveProvider;
use crate::game::{GameState, MoveError, MoveRequest, validate};
use crate::wire::WireError;
use derive_more::{Display, Error};
use std::time::{Duration, Instant};
use tracing::{debug, instrument, warn};

/// Wall-clock budget and depth schedule for one delegated turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchBudget {
    total: Duration,
    initial_depth: u8,
    max_depth: u8,
}

impl SearchBudget {
    /// Creates a budget over the inclusive depth range
    /// `initial_depth..=max_depth`.
    pub fn new(total: Duration, initial_depth: u8, max_depth: u8) -> Self {
        Self {
            total,
            initial_depth: initial_depth.min(max_depth),
            max_depth,
        }
    }

    /// Total wall-clock time available for the turn.
    pub fn total(&self) -> Duration {
        self.total
    }

    /// Depths to attempt, shallowest first.
    pub fn depths(&self) -> std::ops::RangeInclusive<u8> {
        self.initial_depth..=self.max_depth
    }
}

impl Default for SearchBudget {
    fn default() -> Self {
        Self::new(Duration::from_secs(3), 5, 19)
    }
}

/// A completed search: the chosen move and the depth that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchResult {
    mv: MoveRequest,
    depth: u8,
}

impl SearchResult {
    /// Creates a search result.
    pub fn new(mv: MoveRequest, depth: u8) -> Self {
        Self { mv, depth }
    }

    /// The chosen move.
    pub fn mv(&self) -> MoveRequest {
        self.mv
    }

    /// The depth whose attempt produced the move.
    pub fn depth(&self) -> u8 {
        self.depth
    }
}

/// Failure of a delegated search.
///
/// Timeouts end the deepening loop; every other variant fails the
/// whole turn. The variants keep a bad exit, a garbled payload and an
/// illegal move apart so callers can report them distinctly.
#[derive(Debug, Display, Error)]
pub enum SearchError {
    /// No usable result arrived within the time ceiling.
    #[display("Search timed out after {budget_ms} ms")]
    Timeout {
        /// The ceiling that was exceeded, in milliseconds.
        budget_ms: u64,
    },

    /// The engine process exited with a non-zero status.
    #[display("Engine exited with {status}: {stderr_tail}")]
    EngineFailed {
        /// Exit status of the engine process.
        status: std::process::ExitStatus,
        /// Tail of the engine's stderr, for diagnostics.
        stderr_tail: String,
    },

    /// The engine's output carried no usable move payload.
    #[display("Engine payload unusable: {source}")]
    Payload {
        /// What was wrong with the payload.
        source: WireError,
    },

    /// The engine explicitly reported that it found no move.
    #[display("Engine reported no available move")]
    NoMove,

    /// Spawning or communicating with the search failed.
    #[display("Search transport failure: {source}")]
    Io {
        /// Underlying I/O failure.
        source: std::io::Error,
    },

    /// The provider proposed a move the validator refused.
    #[display("Provider proposed illegal move {mv}: {source}")]
    Illegal {
        /// The refused move.
        mv: MoveRequest,
        /// Why validation refused it.
        source: MoveError,
    },
}

/// Resolves one delegated turn with iterative deepening.
///
/// Each depth attempt is time-boxed to the budget's remaining
/// wall-clock time. A timeout on an attempt stops the loop and the
/// last completed depth's move wins; a timeout before any depth
/// completed is [`SearchError::Timeout`] for the turn. Any other
/// provider failure fails the turn immediately, as does a proposed
/// move that fails validation.
#[instrument(skip(provider, state), fields(provider = provider.name()))]
pub async fn choose_move(
    provider: &dyn MoveProvider,
    state: &GameState,
    budget: SearchBudget,
) -> Result<SearchResult, SearchError> {
    let started = Instant::now();
    let mut best: Option<SearchResult> = None;

    for depth in budget.depths() {
        let remaining = budget.total().saturating_sub(started.elapsed());
        if remaining.is_zero() {
            debug!(depth, "Budget exhausted before attempt");
            break;
        }

        // The providers honor the ceiling themselves; the outer timeout
        // cuts off one that does not, dropping its in-flight call.
        let attempt = tokio::time::timeout(remaining, provider.propose(state, depth, remaining))
            .await
            .unwrap_or(Err(SearchError::Timeout {
                budget_ms: remaining.as_millis() as u64,
            }));

        match attempt {
            Ok(mv) => {
                validate(state, mv).map_err(|source| {
                    warn!(depth, %mv, error = %source, "Provider proposed illegal move");
                    SearchError::Illegal { mv, source }
                })?;
                debug!(
                    depth,
                    %mv,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Depth completed"
                );
                best = Some(SearchResult::new(mv, depth));
            }
            Err(SearchError::Timeout { .. }) => {
                debug!(depth, "Depth attempt timed out");
                break;
            }
            Err(err) => {
                warn!(depth, error = %err, "Search attempt failed");
                return Err(err);
            }
        }
    }

    best.ok_or_else(|| SearchError::Timeout {
        budget_ms: budget.total().as_millis() as u64,
    })
}
