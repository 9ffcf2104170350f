#![allow(dead_code)]

use std::sync::{Arc, Mutex, Once};

use bytes::Bytes;
use futures_util::StreamExt;
use progress_core::StatusKind;
use progress_engine::{Opened, Sink, Transport, TransportError};
use tokio::sync::mpsc;

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(stream_logging::initialize_for_tests);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkCall {
    ClearLog,
    Log { text: String, is_error: bool },
    ProgressVisible(bool),
    ProgressPercent(u8),
    ProgressLabel(String),
    ClearStatus,
    Status { text: String, kind: StatusKind },
    ControlBusy(bool),
}

#[derive(Default)]
pub struct RecordingSink {
    calls: Mutex<Vec<SinkCall>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<SinkCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn log_lines(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                SinkCall::Log { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn error_lines(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                SinkCall::Log {
                    text,
                    is_error: true,
                } => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn last_label(&self) -> Option<String> {
        self.calls().into_iter().rev().find_map(|call| match call {
            SinkCall::ProgressLabel(label) => Some(label),
            _ => None,
        })
    }

    pub fn last_percent(&self) -> Option<u8> {
        self.calls().into_iter().rev().find_map(|call| match call {
            SinkCall::ProgressPercent(pct) => Some(pct),
            _ => None,
        })
    }

    pub fn progress_visible(&self) -> bool {
        self.calls()
            .into_iter()
            .rev()
            .find_map(|call| match call {
                SinkCall::ProgressVisible(visible) => Some(visible),
                _ => None,
            })
            .unwrap_or(false)
    }

    pub fn status(&self) -> Option<(String, StatusKind)> {
        self.calls().into_iter().rev().find_map(|call| match call {
            SinkCall::Status { text, kind } => Some((text, kind)),
            _ => None,
        })
    }

    /// Number of times the control was handed back to the user.
    pub fn releases(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| **call == SinkCall::ControlBusy(false))
            .count()
    }

    pub fn is_busy(&self) -> bool {
        self.calls()
            .into_iter()
            .rev()
            .find_map(|call| match call {
                SinkCall::ControlBusy(busy) => Some(busy),
                _ => None,
            })
            .unwrap_or(false)
    }

    fn push(&self, call: SinkCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl Sink for RecordingSink {
    fn clear_log(&self) {
        self.push(SinkCall::ClearLog);
    }

    fn append_log_line(&self, text: &str, is_error: bool) {
        self.push(SinkCall::Log {
            text: text.to_string(),
            is_error,
        });
    }

    fn set_progress_visible(&self, visible: bool) {
        self.push(SinkCall::ProgressVisible(visible));
    }

    fn set_progress_percent(&self, percent: u8) {
        self.push(SinkCall::ProgressPercent(percent));
    }

    fn set_progress_label(&self, label: &str) {
        self.push(SinkCall::ProgressLabel(label.to_string()));
    }

    fn clear_status(&self) {
        self.push(SinkCall::ClearStatus);
    }

    fn set_status(&self, text: &str, kind: StatusKind) {
        self.push(SinkCall::Status {
            text: text.to_string(),
            kind,
        });
    }

    fn set_control_busy(&self, busy: bool) {
        self.push(SinkCall::ControlBusy(busy));
    }
}

/// What a [`ScriptedTransport`] does on `open`.
pub enum Script {
    Fail(TransportError),
    Reject { status: u16, message: Option<String> },
    Chunks(Vec<Result<Bytes, TransportError>>),
    /// Body chunks are pushed by the test through the returned sender.
    Channel(mpsc::UnboundedReceiver<Result<Bytes, TransportError>>),
    /// A body that never yields.
    Stalled,
}

/// Transport double that plays back one script per `open` call.
pub struct ScriptedTransport {
    scripts: Mutex<Vec<Script>>,
    requests: Mutex<Vec<String>>,
}

impl ScriptedTransport {
    pub fn new(scripts: Vec<Script>) -> Arc<Self> {
        let mut scripts = scripts;
        scripts.reverse();
        Arc::new(Self {
            scripts: Mutex::new(scripts),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn chunks<I, B>(chunks: I) -> Arc<Self>
    where
        I: IntoIterator<Item = B>,
        B: Into<Bytes>,
    {
        Self::new(vec![Script::Chunks(
            chunks.into_iter().map(|chunk| Ok(chunk.into())).collect(),
        )])
    }

    pub fn channel() -> (Arc<Self>, mpsc::UnboundedSender<Result<Bytes, TransportError>>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(vec![Script::Channel(rx)]), tx)
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Transport for ScriptedTransport {
    async fn open(&self, url: &str) -> Result<Opened, TransportError> {
        self.requests.lock().unwrap().push(url.to_string());
        let script = self
            .scripts
            .lock()
            .unwrap()
            .pop()
            .expect("no script left for open");
        match script {
            Script::Fail(err) => Err(err),
            Script::Reject { status, message } => Ok(Opened::Rejected { status, message }),
            Script::Chunks(chunks) => Ok(Opened::Streaming(
                futures_util::stream::iter(chunks).boxed(),
            )),
            Script::Channel(rx) => Ok(Opened::Streaming(
                futures_util::stream::unfold(rx, |mut rx| async move {
                    let chunk = rx.recv().await?;
                    Some((chunk, rx))
                })
                .boxed(),
            )),
            Script::Stalled => Ok(Opened::Streaming(
                futures_util::stream::pending::<Result<Bytes, TransportError>>().boxed(),
            )),
        }
    }
}

/// The sample stream used across the session tests.
pub const SCENARIO: &str = concat!(
    "data: {\"type\":\"info\",\"message\":\"start\",\"total\":2}\n",
    "data: {\"type\":\"progress\",\"message\":\"1/2\",\"current\":1,\"total\":2}\n",
    "data: {\"type\":\"complete\",\"message\":\"done\",\"total\":2}\n",
);
