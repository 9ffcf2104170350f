use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use futures_util::StreamExt;
use progress_core::{update, Msg, Outcome, ProgressState, SessionState, StreamItem};
use stream_logging::{stream_debug, stream_error, stream_info, stream_warn};
use tokio::task::JoinHandle;

use crate::reassemble::LineReassembler;
use crate::sink::{render, Sink};
use crate::transport::{ByteStream, Opened, Transport};
use crate::{FrameDecoder, SessionError, SessionReport};

/// Starts sessions against one transport, never more than one at a time.
pub struct SessionDriver {
    transport: Arc<dyn Transport>,
    frames: FrameDecoder,
    active: Arc<AtomicBool>,
}

/// A running session spawned by [`SessionDriver::start`].
pub struct SessionHandle {
    task: JoinHandle<SessionReport>,
}

impl SessionHandle {
    /// Waits for the session to reach its terminal state.
    pub async fn wait(self) -> Result<SessionReport, SessionError> {
        self.task
            .await
            .map_err(|err| SessionError::Aborted(err.to_string()))
    }
}

impl SessionDriver {
    pub fn new(transport: Arc<dyn Transport>, frames: FrameDecoder) -> Self {
        Self {
            transport,
            frames,
            active: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Spawns a session on the current tokio runtime.
    ///
    /// A blank `url` does nothing and returns `Ok(None)`. Starting while another
    /// session from this driver is still running fails with
    /// [`SessionError::SessionActive`].
    pub fn start(
        &self,
        url: &str,
        sink: Arc<dyn Sink>,
    ) -> Result<Option<SessionHandle>, SessionError> {
        let url = url.trim();
        if url.is_empty() {
            stream_debug!("Ignoring start with empty url");
            return Ok(None);
        }
        let slot = self.claim()?;
        let transport = Arc::clone(&self.transport);
        let frames = self.frames.clone();
        let url = url.to_string();
        let task = tokio::spawn(async move {
            let _slot = slot;
            run_session(transport.as_ref(), &frames, &url, sink.as_ref()).await
        });
        Ok(Some(SessionHandle { task }))
    }

    /// Runs a session to completion on the calling task.
    pub async fn run(
        &self,
        url: &str,
        sink: &dyn Sink,
    ) -> Result<Option<SessionReport>, SessionError> {
        let url = url.trim();
        if url.is_empty() {
            stream_debug!("Ignoring run with empty url");
            return Ok(None);
        }
        let _slot = self.claim()?;
        let report = run_session(self.transport.as_ref(), &self.frames, url, sink).await;
        Ok(Some(report))
    }

    fn claim(&self) -> Result<ActiveSlot, SessionError> {
        self.active
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| SessionError::SessionActive)?;
        Ok(ActiveSlot {
            active: Arc::clone(&self.active),
        })
    }
}

/// Marks the driver busy until dropped.
struct ActiveSlot {
    active: Arc<AtomicBool>,
}

impl Drop for ActiveSlot {
    fn drop(&mut self) {
        self.active.store(false, Ordering::Release);
    }
}

async fn run_session(
    transport: &dyn Transport,
    frames: &FrameDecoder,
    url: &str,
    sink: &dyn Sink,
) -> SessionReport {
    let mut run = SessionRun::new(sink);
    stream_info!("session={} start url_len={}", run.id, url.len());
    run.dispatch(Msg::Started);

    match transport.open(url).await {
        Err(err) => {
            stream_warn!("session={} request failed: {}", run.id, err);
            run.dispatch(Msg::TransportFailed {
                reason: err.to_string(),
            });
        }
        Ok(Opened::Rejected { status, message }) => {
            stream_warn!(
                "session={} rejected with status {} ({:?})",
                run.id,
                status,
                message
            );
            run.dispatch(Msg::Rejected { status, message });
        }
        Ok(Opened::Streaming(body)) => run.pump(body, frames).await,
    }

    run.report()
}

/// One session's state plus its sink.
///
/// Dropping it while still `Running` (the task was cancelled mid-read)
/// pushes the session through the failure path so the sink is reset. During
/// a panic unwind the sink is not called again.
struct SessionRun<'a> {
    id: u64,
    state: ProgressState,
    sink: &'a dyn Sink,
    lines: usize,
}

impl<'a> SessionRun<'a> {
    fn new(sink: &'a dyn Sink) -> Self {
        Self {
            id: stream_logging::begin_session(),
            state: ProgressState::new(),
            sink,
            lines: 0,
        }
    }

    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        for effect in &effects {
            render(self.sink, effect);
        }
    }

    async fn pump(&mut self, mut body: ByteStream, frames: &FrameDecoder) {
        let mut reassembler = LineReassembler::new();
        while let Some(chunk) = body.next().await {
            let chunk = match chunk {
                Ok(chunk) => chunk,
                Err(err) => {
                    stream_warn!("session={} stream failed: {}", self.id, err);
                    self.dispatch(Msg::TransportFailed {
                        reason: err.to_string(),
                    });
                    return;
                }
            };
            for line in reassembler.feed(&chunk) {
                self.lines += 1;
                let Some(item) = frames.decode(&line) else {
                    continue;
                };
                if let StreamItem::Raw(raw) = &item {
                    stream_debug!("session={} raw line len={}", self.id, raw.len());
                }
                self.dispatch(Msg::Item(item));
            }
        }

        if let Some(fragment) = reassembler.finish() {
            stream_debug!(
                "session={} discarding unterminated fragment len={}",
                self.id,
                fragment.len()
            );
        }
        self.dispatch(Msg::StreamEnded);
    }

    fn report(&self) -> SessionReport {
        let view = self.state.view();
        let report = SessionReport {
            session_id: self.id,
            // Every path through `run_session` ends in a terminal message.
            outcome: view.outcome.unwrap_or(Outcome::Failed),
            lines: self.lines,
            events: view.events,
            raw_lines: view.raw_lines,
            error_events: view.error_events,
        };
        stream_info!(
            "session={} finished outcome={:?} lines={} events={} raw={} errors={}",
            report.session_id,
            report.outcome,
            report.lines,
            report.events,
            report.raw_lines,
            report.error_events
        );
        report
    }
}

impl Drop for SessionRun<'_> {
    fn drop(&mut self) {
        if self.state.session() != SessionState::Running {
            return;
        }
        if std::thread::panicking() {
            // The sink may be what panicked; a second panic here would abort.
            stream_error!("session={} unwound while running, sink left as is", self.id);
            return;
        }
        stream_warn!("session={} dropped while running", self.id);
        self.dispatch(Msg::TransportFailed {
            reason: "session aborted".to_string(),
        });
    }
}
