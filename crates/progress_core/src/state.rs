use crate::view_model::{SessionView, StatusView};
use crate::StatusKind;

/// Status text shown when a rejection carries no usable `error` field.
pub const REQUEST_FAILED: &str = "Request failed";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Running,
    Terminal,
}

/// How a session reached `Terminal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The stream ended after at least one `complete` event.
    Completed,
    /// The stream ended without a `complete` event.
    Ended,
    Rejected { status: u16 },
    Failed,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProgressState {
    session: SessionState,
    outcome: Option<Outcome>,
    total: Option<f64>,
    current: f64,
    percent: u8,
    progress_visible: bool,
    complete_seen: bool,
    log_lines: usize,
    raw_lines: usize,
    error_events: usize,
    events: usize,
    status: Option<StatusView>,
}

impl ProgressState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> SessionState {
        self.session
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            session: self.session,
            outcome: self.outcome,
            current: self.current,
            total: self.total,
            percent: self.percent,
            progress_visible: self.progress_visible,
            log_lines: self.log_lines,
            raw_lines: self.raw_lines,
            error_events: self.error_events,
            events: self.events,
            status: self.status.clone(),
        }
    }

    pub(crate) fn start(&mut self) {
        *self = Self {
            session: SessionState::Running,
            ..Self::default()
        };
    }

    pub(crate) fn finish(&mut self, outcome: Outcome) {
        self.session = SessionState::Terminal;
        self.outcome = Some(outcome);
    }

    pub(crate) fn complete_seen(&self) -> bool {
        self.complete_seen
    }

    pub(crate) fn record_log(&mut self) {
        self.log_lines += 1;
    }

    pub(crate) fn record_raw(&mut self) {
        self.raw_lines += 1;
    }

    pub(crate) fn record_event(&mut self) {
        self.events += 1;
    }

    pub(crate) fn record_error_event(&mut self) {
        self.error_events += 1;
    }

    pub(crate) fn record_complete(&mut self) {
        self.complete_seen = true;
    }

    pub(crate) fn show_progress(&mut self, current: f64, total: f64, percent: u8) {
        self.progress_visible = true;
        self.current = current;
        self.total = Some(total);
        self.percent = percent;
    }

    pub(crate) fn set_status(&mut self, text: &str, kind: StatusKind) {
        self.status = Some(StatusView {
            text: text.to_string(),
            kind,
        });
    }
}

/// Integer percentage of `current` over `total`, rounded half away from zero
/// and clamped to `0..=100`. A `total` that is not positive yields 0.
pub fn percent_of(current: f64, total: f64) -> u8 {
    if total <= 0.0 {
        return 0;
    }
    let pct = (current / total * 100.0).round();
    pct.clamp(0.0, 100.0) as u8
}
