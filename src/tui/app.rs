//! TUI application state and event loop
//!
//! Drives one streamed response at a time: chunks arrive from the transport
//! (here: the replay driver), accumulate in a `ResponseBuffer`, and every
//! tick the buffer is reparsed and redrawn if new text arrived. Completed
//! responses move into the transcript.

use crate::buffer::ResponseBuffer;
use crate::parser::ParseResult;
use crate::replay::ReplayEvent;
use anyhow::Result;
use crossterm::event::{Event, EventStream, KeyCode, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use ratatui::DefaultTerminal;
use std::time::Duration;
use tokio::time::interval;
use tokio_stream::wrappers::ReceiverStream;

/// One entry in the chat transcript
#[derive(Debug, Clone)]
pub enum Message {
    /// The user's prompt
    User(String),
    /// A completed response (final parse snapshot)
    Assistant(ParseResult),
}

pub struct App {
    transcript: Vec<Message>,
    buffer: ResponseBuffer,
    /// Latest parse of the in-flight response
    current: ParseResult,
    streaming: bool,
    scroll_offset: u16,
    tick: usize,
    should_quit: bool,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    pub fn new() -> Self {
        Self {
            transcript: Vec::new(),
            buffer: ResponseBuffer::new(),
            current: ParseResult::default(),
            streaming: false,
            scroll_offset: 0,
            tick: 0,
            should_quit: false,
        }
    }

    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    pub fn current(&self) -> &ParseResult {
        &self.current
    }

    pub fn is_streaming(&self) -> bool {
        self.streaming
    }

    pub fn buffer_is_empty(&self) -> bool {
        self.buffer.text().is_empty()
    }

    pub fn tick_count(&self) -> usize {
        self.tick
    }

    pub fn scroll_offset(&self) -> u16 {
        self.scroll_offset
    }

    /// Record the prompt and start a fresh response
    pub fn begin_response(&mut self, prompt: &str) {
        self.transcript.push(Message::User(prompt.to_string()));
        self.buffer.clear();
        self.current = ParseResult::default();
        self.streaming = true;
    }

    /// Feed one transport event into the in-flight response
    pub fn on_replay_event(&mut self, event: ReplayEvent) {
        match event {
            ReplayEvent::Chunk(text) => self.buffer.push(&text),
            ReplayEvent::Done => self.buffer.finish(),
        }
    }

    /// Periodic tick: advance the spinner and reparse if new text arrived.
    /// Returns true when the display needs a redraw.
    pub fn on_tick(&mut self) -> bool {
        self.tick += 1;

        if !self.streaming {
            return false;
        }
        if !self.buffer.should_reparse() {
            // Spinner still animates while streaming
            return true;
        }

        self.current = self.buffer.parse();

        if self.buffer.is_done() {
            // Transport ended; the final snapshot is authoritative
            self.streaming = false;
            self.transcript.push(Message::Assistant(self.current.clone()));
            crate::logging::info(&format!(
                "response complete: {} blocks, parse_complete={}",
                self.current.blocks.len(),
                self.current.is_complete
            ));
        }
        true
    }

    fn on_key(&mut self, code: KeyCode, modifiers: KeyModifiers) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Up => self.scroll_offset = self.scroll_offset.saturating_sub(1),
            KeyCode::Down => self.scroll_offset = self.scroll_offset.saturating_add(1),
            KeyCode::PageUp => self.scroll_offset = self.scroll_offset.saturating_sub(10),
            KeyCode::PageDown => self.scroll_offset = self.scroll_offset.saturating_add(10),
            _ => {}
        }
    }

    /// Run the event loop until quit, consuming one replayed response
    pub async fn run(
        &mut self,
        terminal: &mut DefaultTerminal,
        prompt: &str,
        mut chunks: ReceiverStream<ReplayEvent>,
    ) -> Result<()> {
        self.begin_response(prompt);

        let mut input = EventStream::new();
        let mut ticker = interval(Duration::from_millis(80));
        let mut transport_open = true;

        loop {
            terminal.draw(|frame| super::ui::draw(frame, self))?;

            tokio::select! {
                event = input.next() => {
                    if let Some(Ok(Event::Key(key))) = event {
                        if key.kind == KeyEventKind::Press {
                            self.on_key(key.code, key.modifiers);
                        }
                    }
                }
                event = chunks.next(), if transport_open => {
                    match event {
                        Some(event) => self.on_replay_event(event),
                        None => {
                            // Stream dropped without a Done marker
                            self.buffer.finish();
                            transport_open = false;
                        }
                    }
                }
                _ = ticker.tick() => {
                    self.on_tick();
                }
            }

            if self.should_quit {
                return Ok(());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_parses_and_commits_on_done() {
        let mut app = App::new();
        app.begin_response("show revenue");
        assert!(app.is_streaming());

        app.on_replay_event(ReplayEvent::Chunk(
            r#"{"blocks":[{"type":"markdown","content":"hi"},"#.to_string(),
        ));
        app.on_replay_event(ReplayEvent::Chunk(
            r#"{"type":"markdown","content":"there"}]}"#.to_string(),
        ));
        app.on_replay_event(ReplayEvent::Done);

        assert!(app.on_tick());
        assert!(!app.is_streaming());
        assert!(app.current().is_complete);
        assert_eq!(app.current().blocks.len(), 2);

        // Prompt plus completed response in the transcript
        assert_eq!(app.transcript().len(), 2);
        assert!(matches!(app.transcript()[1], Message::Assistant(_)));
    }

    #[test]
    fn test_begin_response_resets_previous_stream() {
        let mut app = App::new();
        app.begin_response("first");
        app.on_replay_event(ReplayEvent::Chunk("{\"blocks\":[".to_string()));
        app.on_replay_event(ReplayEvent::Done);
        app.on_tick();

        app.begin_response("second");
        assert!(app.buffer_is_empty());
        assert!(app.current().blocks.is_empty());
        assert!(app.is_streaming());
    }
}
