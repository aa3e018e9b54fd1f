//! External engine subprocess provider.

use super::MoveProvider;
use super::invoker::SearchError;
use crate::game::{GameState, MoveRequest};
use crate::wire;
use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, instrument, warn};

/// Runs an external engine once per depth attempt.
///
/// The engine is invoked as `<program> <args..> <depth> <state-json>`
/// and its stdout captured; the move comes from the last line marked
/// with [`wire::RESULT_PREFIX`]. An attempt that outlives its ceiling
/// is killed rather than waited on.
#[derive(Debug, Clone)]
pub struct SubprocessSearch {
    program: String,
    args: Vec<String>,
}

impl SubprocessSearch {
    /// Creates a provider for the given program and base arguments.
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Splits a full command line into program and base arguments.
    /// Returns `None` for an empty command.
    pub fn from_command(command: &[String]) -> Option<Self> {
        let (program, args) = command.split_first()?;
        Some(Self::new(program.clone(), args.to_vec()))
    }
}

#[async_trait]
impl MoveProvider for SubprocessSearch {
    #[instrument(skip(self, state), fields(engine = %self.program))]
    async fn propose(
        &self,
        state: &GameState,
        depth: u8,
        ceiling: Duration,
    ) -> Result<MoveRequest, SearchError> {
        let payload =
            wire::encode_state(state).map_err(|source| SearchError::Payload { source })?;
        let budget_ms = ceiling.as_millis() as u64;

        let child = Command::new(&self.program)
            .args(&self.args)
            .arg(depth.to_string())
            .arg(payload)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| SearchError::Io { source })?;

        debug!(depth, budget_ms, "Engine spawned");

        // Dropping the wait future on timeout kills the child.
        let output = match timeout(ceiling, child.wait_with_output()).await {
            Ok(waited) => waited.map_err(|source| SearchError::Io { source })?,
            Err(_) => {
                warn!(depth, budget_ms, "Engine attempt timed out");
                return Err(SearchError::Timeout { budget_ms });
            }
        };

        if !output.status.success() {
            let stderr_tail = tail(&String::from_utf8_lossy(&output.stderr));
            warn!(status = %output.status, %stderr_tail, "Engine exited abnormally");
            return Err(SearchError::EngineFailed {
                status: output.status,
                stderr_tail,
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        match wire::extract_result(&stdout).map_err(|source| SearchError::Payload { source })? {
            Some(mv) => Ok(mv),
            None => Err(SearchError::NoMove),
        }
    }

    fn name(&self) -> &str {
        "engine"
    }
}

/// Last lines of the engine's stderr.
fn tail(text: &str) -> String {
    const MAX_LINES: usize = 4;
    let mut lines: Vec<&str> = text.lines().rev().take(MAX_LINES).collect();
    lines.reverse();
    lines.join("\n")
}
