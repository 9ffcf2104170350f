use std::sync::{Mutex, MutexGuard, PoisonError};

use indicatif::{ProgressBar, ProgressStyle};
use progress_core::StatusKind;
use progress_engine::Sink;

const BAR_TEMPLATE: &str = "{bar:40.cyan/blue} {pos:>3}% {msg}";
const BUSY_LABEL: &str = "Downloading...";

/// Renders a session on the terminal: log lines on stdout (errors on stderr)
/// and an indicatif bar while progress is visible.
#[derive(Default)]
pub struct TerminalSink {
    bar: Mutex<Option<ProgressBar>>,
}

impl TerminalSink {
    pub fn new() -> Self {
        Self::default()
    }

    fn bar(&self) -> MutexGuard<'_, Option<ProgressBar>> {
        self.bar.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn print(&self, text: &str, to_stderr: bool) {
        match self.bar().as_ref() {
            // Printing through the bar keeps it pinned below the log.
            Some(bar) => bar.println(text),
            None if to_stderr => eprintln!("{text}"),
            None => println!("{text}"),
        }
    }
}

fn new_bar() -> ProgressBar {
    let style = ProgressStyle::with_template(BAR_TEMPLATE)
        .map(|style| style.progress_chars("=> "))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    let bar = ProgressBar::new(100);
    bar.set_style(style);
    bar
}

impl Sink for TerminalSink {
    fn clear_log(&self) {
        // Earlier output stays in the scrollback.
    }

    fn append_log_line(&self, text: &str, is_error: bool) {
        self.print(text, is_error);
    }

    fn set_progress_visible(&self, visible: bool) {
        let mut bar = self.bar();
        match (visible, bar.is_some()) {
            (true, false) => *bar = Some(new_bar()),
            (false, true) => {
                if let Some(bar) = bar.take() {
                    bar.finish_and_clear();
                }
            }
            _ => {}
        }
    }

    fn set_progress_percent(&self, percent: u8) {
        if let Some(bar) = self.bar().as_ref() {
            bar.set_position(u64::from(percent));
        }
    }

    fn set_progress_label(&self, label: &str) {
        if let Some(bar) = self.bar().as_ref() {
            bar.set_message(label.to_string());
        }
    }

    fn clear_status(&self) {}

    fn set_status(&self, text: &str, kind: StatusKind) {
        match kind {
            StatusKind::Success => self.print(&format!("✔ {text}"), false),
            StatusKind::Error => self.print(&format!("✖ {text}"), true),
        }
    }

    fn set_control_busy(&self, busy: bool) {
        if busy {
            eprintln!("{BUSY_LABEL}");
        } else if let Some(bar) = self.bar().take() {
            // Leave the final bar on screen.
            bar.abandon();
        }
    }
}
