//! Progress core: pure session state machine and wire event types.
mod effect;
mod event;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::{Effect, StatusKind};
pub use event::{Event, StreamItem};
pub use msg::Msg;
pub use state::{percent_of, Outcome, ProgressState, SessionState, REQUEST_FAILED};
pub use update::update;
pub use view_model::{SessionView, StatusView};
