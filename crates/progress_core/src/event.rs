use serde::Deserialize;

/// Structured payload of a framed line.
///
/// The discriminant lives in the `type` field; fields the client has no use
/// for (`video_id`, `extra`, a `current` on non-progress events) are ignored.
/// Counts are plain JSON numbers, so `2.0` and `-1` are accepted; whether they
/// drive the progress display is decided by `update`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Event {
    Info {
        message: String,
        #[serde(default)]
        total: Option<f64>,
    },
    Progress {
        message: String,
        current: f64,
        total: f64,
    },
    Error {
        message: String,
    },
    Complete {
        message: String,
        #[serde(default)]
        total: Option<f64>,
    },
}

impl Event {
    pub fn message(&self) -> &str {
        match self {
            Event::Info { message, .. }
            | Event::Progress { message, .. }
            | Event::Error { message }
            | Event::Complete { message, .. } => message,
        }
    }
}

/// What a framed line decodes to.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamItem {
    Event(Event),
    /// A framed line whose payload could not be recognised, kept verbatim.
    Raw(String),
}
