use encoding_rs::{CoderResult, Decoder, UTF_8};

/// Turns arbitrarily split response bytes into complete lines.
///
/// UTF-8 decoding keeps its own state between chunks, so a multi-byte character
/// split across two chunks decodes the same as if it had arrived whole. Invalid
/// sequences become U+FFFD. The buffer only ever holds the text after the last
/// newline seen so far.
pub struct LineReassembler {
    decoder: Decoder,
    buffer: String,
}

impl Default for LineReassembler {
    fn default() -> Self {
        Self::new()
    }
}

impl LineReassembler {
    pub fn new() -> Self {
        Self {
            decoder: UTF_8.new_decoder_with_bom_removal(),
            buffer: String::new(),
        }
    }

    /// Decodes `chunk` and returns every line it completed, in order.
    ///
    /// Lines are split on `\n`; a `\r` right before it is dropped as well.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<String> {
        self.decode(chunk, false);
        self.drain_lines()
    }

    /// Text received after the last newline.
    pub fn pending(&self) -> &str {
        &self.buffer
    }

    /// Ends the stream. The unterminated tail is never a line; it is handed
    /// back (if non-empty) so the caller can report what was discarded.
    pub fn finish(mut self) -> Option<String> {
        self.decode(&[], true);
        if self.buffer.is_empty() {
            None
        } else {
            Some(self.buffer)
        }
    }

    fn decode(&mut self, bytes: &[u8], last: bool) {
        let mut remaining = bytes;
        loop {
            let needed = self
                .decoder
                .max_utf8_buffer_length(remaining.len())
                .unwrap_or(remaining.len().saturating_mul(3).saturating_add(4));
            self.buffer.reserve(needed);
            let (result, read, _had_replacements) =
                self.decoder
                    .decode_to_string(remaining, &mut self.buffer, last);
            remaining = &remaining[read..];
            match result {
                CoderResult::InputEmpty => break,
                CoderResult::OutputFull => continue,
            }
        }
    }

    fn drain_lines(&mut self) -> Vec<String> {
        let Some(end) = self.buffer.rfind('\n') else {
            return Vec::new();
        };
        let rest = self.buffer.split_off(end + 1);
        let complete = std::mem::replace(&mut self.buffer, rest);
        complete[..end]
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
            .collect()
    }
}
