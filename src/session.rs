//! Turn ownership for a single game.
//!
//! The session is the single writer of its [`GameState`]. Human moves
//! go through [`GameSession::propose_move`]; a delegated turn runs as
//! a background search task that the session polls. While a search
//! task is outstanding, input is disabled, so the state can never be
//! mutated from two sides at once.

use crate::game::{GameState, MoveError, MoveRequest, Outcome};
use crate::search::{MoveProvider, SearchBudget, SearchError, SearchResult, choose_move};
use derive_more::{Display, Error};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{info, instrument, warn};

/// Error while driving a turn through the session.
#[derive(Debug, Display, Error)]
pub enum TurnError {
    /// The move was rejected by validation.
    #[display("Move refused: {source}")]
    Refused {
        /// Why validation refused it.
        source: MoveError,
    },

    /// A search task still owns the turn.
    #[display("A search is still running for this turn")]
    SearchOutstanding,

    /// The delegated search failed; the state is unchanged.
    #[display("Search failed: {source}")]
    Search {
        /// The underlying search failure.
        source: SearchError,
    },
}

enum SearchTask {
    Idle,
    Running {
        receiver: oneshot::Receiver<Result<SearchResult, SearchError>>,
        handle: JoinHandle<()>,
        started: Instant,
    },
}

/// A single game with one writer and a pollable search slot.
pub struct GameSession {
    id: String,
    state: GameState,
    budget: SearchBudget,
    search: SearchTask,
}

impl GameSession {
    /// Creates a session over a fresh game.
    #[instrument]
    pub fn new(id: String, budget: SearchBudget) -> Self {
        info!(session_id = %id, "Creating game session");
        Self {
            id,
            state: GameState::new(),
            budget,
            search: SearchTask::Idle,
        }
    }

    /// Session identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Current state snapshot.
    pub fn current_state(&self) -> &GameState {
        &self.state
    }

    /// Outcome of the game, once decided.
    pub fn outcome(&self) -> Option<Outcome> {
        self.state.outcome()
    }

    /// True when a proposed move would be considered at all: the game
    /// is live and no search task owns the turn.
    pub fn is_input_enabled(&self) -> bool {
        !self.state.is_over() && matches!(self.search, SearchTask::Idle)
    }

    /// Proposes a move for the active player.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn propose_move(&mut self, mv: MoveRequest) -> Result<(), TurnError> {
        if matches!(self.search, SearchTask::Running { .. }) {
            warn!(%mv, "Move proposed while a search owns the turn");
            return Err(TurnError::SearchOutstanding);
        }
        self.state.make_move(mv).map_err(|source| {
            warn!(%mv, error = %source, "Move refused");
            TurnError::Refused { source }
        })?;
        info!(%mv, outcome = ?self.state.outcome(), "Move applied");
        Ok(())
    }

    /// Hands the turn to a search task running in the background.
    ///
    /// The task searches a snapshot of the current state; the session
    /// learns the result through [`GameSession::poll_search`].
    #[instrument(skip(self, provider), fields(session_id = %self.id, provider = provider.name()))]
    pub fn begin_search(&mut self, provider: Arc<dyn MoveProvider>) -> Result<(), TurnError> {
        if self.state.is_over() {
            return Err(TurnError::Refused {
                source: MoveError::GameOver,
            });
        }
        if matches!(self.search, SearchTask::Running { .. }) {
            return Err(TurnError::SearchOutstanding);
        }

        let state = self.state;
        let budget = self.budget;
        let (sender, receiver) = oneshot::channel();
        let handle = tokio::spawn(async move {
            let result = choose_move(provider.as_ref(), &state, budget).await;
            let _ = sender.send(result);
        });
        info!("Search task started");
        self.search = SearchTask::Running {
            receiver,
            handle,
            started: Instant::now(),
        };
        Ok(())
    }

    /// Polls the outstanding search task.
    ///
    /// `Ok(None)` means it is still thinking (or no task is running).
    /// On completion the chosen move is applied through the same
    /// validation as a human move and the result is returned. A failed
    /// search releases the turn and surfaces exactly once.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn poll_search(&mut self) -> Result<Option<SearchResult>, TurnError> {
        let SearchTask::Running {
            receiver, started, ..
        } = &mut self.search
        else {
            return Ok(None);
        };

        let outcome = match receiver.try_recv() {
            Err(oneshot::error::TryRecvError::Empty) => return Ok(None),
            Err(oneshot::error::TryRecvError::Closed) => Err(SearchError::Io {
                source: std::io::Error::other("search task ended without a result"),
            }),
            Ok(result) => result,
        };
        let elapsed = started.elapsed();
        self.search = SearchTask::Idle;

        let result = outcome.map_err(|source| {
            warn!(error = %source, "Search failed");
            TurnError::Search { source }
        })?;
        self.state.make_move(result.mv()).map_err(|source| {
            warn!(mv = %result.mv(), error = %source, "Search result refused");
            TurnError::Refused { source }
        })?;
        info!(
            mv = %result.mv(),
            depth = result.depth(),
            elapsed_ms = elapsed.as_millis() as u64,
            "Search result applied"
        );
        Ok(Some(result))
    }

    /// Abandons the outstanding search task, if any. The state is left
    /// untouched and input is enabled again.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn abort_search(&mut self) {
        if let SearchTask::Running { handle, .. } = &self.search {
            handle.abort();
            info!("Search task aborted");
        }
        self.search = SearchTask::Idle;
    }

    /// How long the outstanding search has been thinking.
    pub fn thinking_time(&self) -> Option<Duration> {
        match &self.search {
            SearchTask::Running { started, .. } => Some(started.elapsed()),
            SearchTask::Idle => None,
        }
    }

    /// Resolves one delegated turn in place: search, then apply.
    ///
    /// For callers that are happy to await the provider directly
    /// instead of polling a background task.
    #[instrument(skip(self, provider), fields(session_id = %self.id, provider = provider.name()))]
    pub async fn run_search(
        &mut self,
        provider: &dyn MoveProvider,
    ) -> Result<SearchResult, TurnError> {
        if self.state.is_over() {
            return Err(TurnError::Refused {
                source: MoveError::GameOver,
            });
        }
        if matches!(self.search, SearchTask::Running { .. }) {
            return Err(TurnError::SearchOutstanding);
        }
        let result = choose_move(provider, &self.state, self.budget)
            .await
            .map_err(|source| TurnError::Search { source })?;
        self.state.make_move(result.mv()).map_err(|source| {
            warn!(mv = %result.mv(), error = %source, "Search result refused");
            TurnError::Refused { source }
        })?;
        info!(mv = %result.mv(), depth = result.depth(), "Search result applied");
        Ok(result)
    }
}
