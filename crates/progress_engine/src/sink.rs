use progress_core::{Effect, StatusKind};

/// The rendering surface a session drives.
///
/// Calls arrive in strict stream order from a single session task. Methods take
/// `&self` so one sink can be shared with the caller; implementations keep
/// their own interior mutability.
pub trait Sink: Send + Sync {
    fn clear_log(&self);
    fn append_log_line(&self, text: &str, is_error: bool);
    fn set_progress_visible(&self, visible: bool);
    /// `percent` is always within `0..=100`.
    fn set_progress_percent(&self, percent: u8);
    fn set_progress_label(&self, label: &str);
    fn clear_status(&self);
    fn set_status(&self, text: &str, kind: StatusKind);
    fn set_control_busy(&self, busy: bool);
}

/// Applies one state-machine effect to `sink`.
pub fn render(sink: &dyn Sink, effect: &Effect) {
    match effect {
        Effect::ClearLog => sink.clear_log(),
        Effect::ClearStatus => sink.clear_status(),
        Effect::AppendLog { text, is_error } => sink.append_log_line(text, *is_error),
        Effect::SetProgressVisible(visible) => sink.set_progress_visible(*visible),
        Effect::SetProgressPercent(percent) => sink.set_progress_percent(*percent),
        Effect::SetProgressLabel(label) => sink.set_progress_label(label),
        Effect::SetStatus { text, kind } => sink.set_status(text, *kind),
        Effect::SetControlBusy(busy) => sink.set_control_busy(*busy),
    }
}
