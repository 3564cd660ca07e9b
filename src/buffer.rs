//! Response buffer - accumulates one streamed response for reparsing
//!
//! The parser is a pure function of the full buffer, so each reparse costs
//! O(buffer length). This wrapper accumulates chunks monotonically, carries
//! the transport-level end-of-stream flag (distinct from the parser's own
//! `is_complete`), and throttles reparses so a fast token stream doesn't
//! rescan the whole buffer every few bytes.

use crate::parser::{self, ParseResult};
use std::time::{Duration, Instant};

/// Accumulator for the text of one logical model response
pub struct ResponseBuffer {
    text: String,
    done: bool,
    dirty: bool,
    last_parse: Instant,
    min_interval: Duration,
}

impl Default for ResponseBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseBuffer {
    pub fn new() -> Self {
        Self {
            text: String::new(),
            done: false,
            dirty: false,
            last_parse: Instant::now(),
            min_interval: Duration::from_millis(80),
        }
    }

    /// Append a chunk of streamed text
    pub fn push(&mut self, chunk: &str) {
        if chunk.is_empty() {
            return;
        }
        self.text.push_str(chunk);
        self.dirty = true;
    }

    /// Mark the transport stream as ended
    pub fn finish(&mut self) {
        self.done = true;
        self.dirty = true;
    }

    /// Full accumulated text so far
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether the transport reported end-of-stream
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Whether a reparse would see new input.
    ///
    /// Throttled while streaming; once the stream has ended the final
    /// reparse is never delayed.
    pub fn should_reparse(&self) -> bool {
        if !self.dirty {
            return false;
        }
        self.done || self.last_parse.elapsed() >= self.min_interval
    }

    /// Reparse the accumulated buffer
    pub fn parse(&mut self) -> ParseResult {
        self.dirty = false;
        self.last_parse = Instant::now();
        parser::parse_response(&self.text)
    }

    /// Reset for a new response
    pub fn clear(&mut self) {
        self.text.clear();
        self.done = false;
        self.dirty = false;
        self.last_parse = Instant::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_accumulates() {
        let mut buf = ResponseBuffer::new();
        buf.push(r#"{"blocks":[{"type":"markdown","#);
        buf.push(r#""content":"hi"}]}"#);
        assert_eq!(
            buf.text(),
            r#"{"blocks":[{"type":"markdown","content":"hi"}]}"#
        );
    }

    #[test]
    fn test_finish_forces_reparse() {
        let mut buf = ResponseBuffer::new();
        buf.push(r#"{"blocks":[]}"#);
        buf.finish();
        // No throttle once the stream ended
        assert!(buf.should_reparse());
        let result = buf.parse();
        assert!(result.is_complete);
        assert!(!buf.should_reparse());
    }

    #[test]
    fn test_clean_buffer_needs_no_reparse() {
        let mut buf = ResponseBuffer::new();
        assert!(!buf.should_reparse());
        buf.push("x");
        buf.finish();
        buf.parse();
        assert!(!buf.should_reparse());
        buf.push("y");
        assert!(buf.is_done());
    }

    #[test]
    fn test_clear_resets_state() {
        let mut buf = ResponseBuffer::new();
        buf.push("abc");
        buf.finish();
        buf.clear();
        assert!(buf.text().is_empty());
        assert!(!buf.is_done());
        assert!(!buf.should_reparse());
    }
}
