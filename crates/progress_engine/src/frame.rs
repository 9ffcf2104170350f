use progress_core::{Event, StreamItem};
use stream_logging::stream_debug;

/// How event lines are marked on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameFormat {
    /// Literal prefix a line must start with to carry an event.
    pub marker: String,
    /// The payload starts after the first occurrence of this character.
    pub separator: char,
}

impl Default for FrameFormat {
    fn default() -> Self {
        Self {
            marker: "data:".to_string(),
            separator: ':',
        }
    }
}

/// Classifies complete lines as events, raw text, or nothing at all.
#[derive(Debug, Clone, Default)]
pub struct FrameDecoder {
    format: FrameFormat,
}

impl FrameDecoder {
    pub fn new(format: FrameFormat) -> Self {
        Self { format }
    }

    /// Returns `None` for lines without the marker. A marked line whose payload
    /// is not a recognised event comes back as `StreamItem::Raw` with the whole
    /// original line.
    pub fn decode(&self, line: &str) -> Option<StreamItem> {
        if !line.starts_with(self.format.marker.as_str()) {
            return None;
        }

        let payload = match line.find(self.format.separator) {
            Some(idx) => &line[idx + self.format.separator.len_utf8()..],
            None => &line[self.format.marker.len()..],
        };

        match serde_json::from_str::<Event>(payload.trim()) {
            Ok(event) => Some(StreamItem::Event(event)),
            Err(err) => {
                stream_debug!("Unrecognised frame payload ({}), keeping raw line", err);
                Some(StreamItem::Raw(line.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(line: &str) -> Option<StreamItem> {
        FrameDecoder::default().decode(line)
    }

    #[test]
    fn framed_info_event_decodes() {
        let item = decode(r#"data: {"type":"info","message":"start","total":2}"#);
        assert_eq!(
            item,
            Some(StreamItem::Event(Event::Info {
                message: "start".to_string(),
                total: Some(2.0),
            }))
        );
    }

    #[test]
    fn payload_whitespace_is_trimmed() {
        let item = decode("data:   {\"type\":\"error\",\"message\":\"boom\"}   ");
        assert_eq!(
            item,
            Some(StreamItem::Event(Event::Error {
                message: "boom".to_string(),
            }))
        );
    }

    #[test]
    fn producer_extra_fields_are_ignored() {
        let item = decode(
            r#"data: {"type": "progress", "message": "[1/3] Downloading: clip", "current": 1, "total": 3, "video_id": "7301"}"#,
        );
        assert_eq!(
            item,
            Some(StreamItem::Event(Event::Progress {
                message: "[1/3] Downloading: clip".to_string(),
                current: 1.0,
                total: 3.0,
            }))
        );
    }

    #[test]
    fn non_integer_counts_still_decode() {
        assert_eq!(
            decode(r#"data: {"type":"progress","message":"half","current":1,"total":2.0}"#),
            Some(StreamItem::Event(Event::Progress {
                message: "half".to_string(),
                current: 1.0,
                total: 2.0,
            }))
        );
        assert_eq!(
            decode(r#"data: {"type":"info","message":"neg","total":-1}"#),
            Some(StreamItem::Event(Event::Info {
                message: "neg".to_string(),
                total: Some(-1.0),
            }))
        );
        assert_eq!(
            decode(r#"data: {"type":"info","message":"none","total":null}"#),
            Some(StreamItem::Event(Event::Info {
                message: "none".to_string(),
                total: None,
            }))
        );
    }

    #[test]
    fn missing_or_non_numeric_counts_keep_whole_line() {
        let missing = r#"data: {"type":"progress","message":"x","current":1}"#;
        assert_eq!(decode(missing), Some(StreamItem::Raw(missing.to_string())));
        let text = r#"data: {"type":"progress","message":"x","current":"1","total":2}"#;
        assert_eq!(decode(text), Some(StreamItem::Raw(text.to_string())));
    }

    #[test]
    fn invalid_json_keeps_whole_line() {
        let line = "data: {\"type\":\"info\",";
        assert_eq!(decode(line), Some(StreamItem::Raw(line.to_string())));
    }

    #[test]
    fn unknown_discriminant_keeps_whole_line() {
        let line = r#"data: {"type":"heartbeat","message":"tick"}"#;
        assert_eq!(decode(line), Some(StreamItem::Raw(line.to_string())));
    }

    #[test]
    fn empty_payload_keeps_whole_line() {
        assert_eq!(decode("data:"), Some(StreamItem::Raw("data:".to_string())));
    }

    #[test]
    fn unframed_lines_are_dropped() {
        assert_eq!(decode(""), None);
        assert_eq!(decode(": keep-alive"), None);
        assert_eq!(decode(r#"{"type":"info","message":"bare"}"#), None);
        assert_eq!(decode(" data: {}"), None);
    }

    #[test]
    fn custom_marker_is_honoured() {
        let decoder = FrameDecoder::new(FrameFormat {
            marker: "evt=".to_string(),
            separator: '=',
        });
        assert_eq!(
            decoder.decode(r#"evt= {"type":"complete","message":"ok"}"#),
            Some(StreamItem::Event(Event::Complete {
                message: "ok".to_string(),
                total: None,
            }))
        );
        assert_eq!(decoder.decode(r#"data: {"type":"info","message":"x"}"#), None);
    }
}
