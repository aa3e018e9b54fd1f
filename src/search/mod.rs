//! Move-search delegation.
//!
//! A turn owned by a search is resolved by [`choose_move`]: iterative
//! deepening over a provider under a wall-clock budget, keeping the
//! result of the last depth that completed in time. Providers are
//! black boxes behind [`MoveProvider`]; the in-process negamax and the
//! external engine subprocess both implement it.

pub mod invoker;
pub mod native;
pub mod subprocess;

pub use invoker::{SearchBudget, SearchError, SearchResult, choose_move};
pub use native::NativeSearch;
pub use subprocess::SubprocessSearch;

use crate::game::{GameState, MoveRequest};
use async_trait::async_trait;
use std::time::Duration;

/// A black-box move-search capability.
///
/// One call runs one depth-limited attempt under a time ceiling. A
/// provider that cannot answer within the ceiling reports
/// [`SearchError::Timeout`]; it never mutates the state it is shown,
/// and nothing it returns is trusted until validated.
#[async_trait]
pub trait MoveProvider: Send + Sync {
    /// Proposes a move for `state`, searching to `depth`.
    async fn propose(
        &self,
        state: &GameState,
        depth: u8,
        ceiling: Duration,
    ) -> Result<MoveRequest, SearchError>;

    /// Short name for logs.
    fn name(&self) -> &str;
}
