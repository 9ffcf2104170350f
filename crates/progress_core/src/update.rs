use crate::{
    percent_of, Effect, Event, Msg, Outcome, ProgressState, SessionState, StatusKind, StreamItem,
    REQUEST_FAILED,
};

/// Pure update function: applies a message to state and returns the sink effects.
///
/// Only `Started` is accepted while `Idle`; everything else is ignored unless the
/// session is `Running`, so the terminal transition and its cleanup happen once.
pub fn update(mut state: ProgressState, msg: Msg) -> (ProgressState, Vec<Effect>) {
    let effects = match msg {
        Msg::Started => {
            if state.session() != SessionState::Idle {
                return (state, Vec::new());
            }
            state.start();
            vec![
                Effect::ClearLog,
                Effect::ClearStatus,
                Effect::SetProgressVisible(false),
                Effect::SetProgressPercent(0),
                Effect::SetControlBusy(true),
            ]
        }
        _ if state.session() != SessionState::Running => Vec::new(),
        Msg::Item(item) => apply_item(&mut state, item),
        Msg::Rejected { status, message } => {
            let text = message
                .filter(|message| !message.is_empty())
                .unwrap_or_else(|| REQUEST_FAILED.to_string());
            terminate(&mut state, Outcome::Rejected { status }, Some(text))
        }
        Msg::TransportFailed { reason } => {
            let text = format!("Connection error: {reason}");
            terminate(&mut state, Outcome::Failed, Some(text))
        }
        Msg::StreamEnded => {
            let outcome = if state.complete_seen() {
                Outcome::Completed
            } else {
                Outcome::Ended
            };
            terminate(&mut state, outcome, None)
        }
    };

    (state, effects)
}

fn apply_item(state: &mut ProgressState, item: StreamItem) -> Vec<Effect> {
    let event = match item {
        StreamItem::Raw(line) => {
            state.record_raw();
            return vec![log_line(state, line, false)];
        }
        StreamItem::Event(event) => event,
    };

    state.record_event();
    match event {
        Event::Info { message, total } => {
            let mut effects = vec![log_line(state, message, false)];
            if let Some(total) = total.filter(|total| *total > 0.0) {
                state.show_progress(0.0, total, 0);
                effects.extend(progress_effects(0.0, total, 0));
            }
            effects
        }
        Event::Progress {
            message,
            current,
            total,
        } => {
            let mut effects = vec![log_line(state, message, false)];
            if total > 0.0 {
                let percent = percent_of(current, total);
                state.show_progress(current, total, percent);
                effects.extend(progress_effects(current, total, percent));
            }
            effects
        }
        Event::Error { message } => {
            state.record_error_event();
            vec![log_line(state, format!("ERROR: {message}"), true)]
        }
        Event::Complete { message, total } => {
            state.record_complete();
            state.set_status(&message, StatusKind::Success);
            let mut effects = vec![
                log_line(state, message.clone(), false),
                Effect::SetStatus {
                    text: message,
                    kind: StatusKind::Success,
                },
            ];
            // The last `progress` may lag behind; completion always shows a full bar.
            if let Some(total) = total.filter(|total| *total > 0.0) {
                state.show_progress(total, total, 100);
                effects.extend(progress_effects(total, total, 100));
            }
            effects
        }
    }
}

fn log_line(state: &mut ProgressState, text: String, is_error: bool) -> Effect {
    state.record_log();
    Effect::AppendLog { text, is_error }
}

fn progress_effects(current: f64, total: f64, percent: u8) -> [Effect; 3] {
    [
        Effect::SetProgressVisible(true),
        Effect::SetProgressPercent(percent),
        Effect::SetProgressLabel(format!("{current} / {total}")),
    ]
}

fn terminate(
    state: &mut ProgressState,
    outcome: Outcome,
    error_text: Option<String>,
) -> Vec<Effect> {
    state.finish(outcome);
    let mut effects = Vec::with_capacity(2);
    if let Some(text) = error_text {
        state.set_status(&text, StatusKind::Error);
        effects.push(Effect::SetStatus {
            text,
            kind: StatusKind::Error,
        });
    }
    effects.push(Effect::SetControlBusy(false));
    effects
}
