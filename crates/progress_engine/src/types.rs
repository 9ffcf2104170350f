use progress_core::Outcome;

/// Failures surfaced by a [`Transport`](crate::Transport).
///
/// The display text is what ends up after `Connection error: ` in the status.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),
    #[error("{0}")]
    Connect(String),
    #[error("{0}")]
    Timeout(String),
    #[error("{0}")]
    Body(String),
    #[error("{0}")]
    Network(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("a session is already running")]
    SessionActive,
    #[error("session task ended abnormally: {0}")]
    Aborted(String),
}

/// Summary of a finished session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionReport {
    pub session_id: u64,
    pub outcome: Outcome,
    /// Complete lines taken off the wire, framed or not.
    pub lines: usize,
    /// Structured events applied to the state machine.
    pub events: usize,
    pub raw_lines: usize,
    pub error_events: usize,
}

impl SessionReport {
    /// `true` when the session ended on the normal stream-end path.
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, Outcome::Completed | Outcome::Ended)
    }
}
