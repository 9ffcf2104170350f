use crate::{Outcome, SessionState, StatusKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusView {
    pub text: String,
    pub kind: StatusKind,
}

/// Read-only snapshot of a session, as the sink would currently display it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionView {
    pub session: SessionState,
    pub outcome: Option<Outcome>,
    pub current: f64,
    pub total: Option<f64>,
    pub percent: u8,
    pub progress_visible: bool,
    pub log_lines: usize,
    pub raw_lines: usize,
    pub error_events: usize,
    pub events: usize,
    pub status: Option<StatusView>,
}
