//! Replay captured model responses as a timed chunk stream
//!
//! Stands in for the live transport: a capture file is either a JSON timeline
//! of chunk events (with millisecond pacing, editable in post) or a raw
//! response document, which gets chopped into fixed-size chunks. The TUI and
//! the e2e tests both consume the resulting stream.

use crate::config::config;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

/// A single event in a replay timeline.
///
/// The `t` field is milliseconds from the start of the replay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineEvent {
    /// Milliseconds from replay start
    pub t: u64,
    #[serde(flatten)]
    pub kind: TimelineEventKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum TimelineEventKind {
    /// A chunk of streamed response text
    #[serde(rename = "chunk")]
    Chunk { text: String },

    /// Transport end-of-stream
    #[serde(rename = "done")]
    Done,
}

/// What the replay stream yields to its consumer
#[derive(Debug, Clone, PartialEq)]
pub enum ReplayEvent {
    Chunk(String),
    Done,
}

/// Load a capture file as a timeline.
///
/// A JSON array of timeline events is used as-is; anything else is treated as
/// a raw response document and chunked with the configured pacing.
pub async fn load(path: &Path) -> Result<Vec<TimelineEvent>> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading capture file {}", path.display()))?;

    if let Ok(events) = serde_json::from_str::<Vec<TimelineEvent>>(&content) {
        return Ok(events);
    }

    let replay = &config().replay;
    Ok(chunked_timeline(
        &content,
        replay.chunk_chars,
        replay.chunk_delay_ms,
    ))
}

/// Chop a raw document into a timeline of evenly paced chunks.
///
/// Chunks split at char boundaries, deliberately not at JSON token
/// boundaries: that is exactly the shape of input the parser has to handle.
pub fn chunked_timeline(text: &str, chunk_chars: usize, delay_ms: u64) -> Vec<TimelineEvent> {
    let chunk_chars = chunk_chars.max(1);
    let mut events = Vec::new();
    let mut t = 0u64;

    let mut chars = text.chars();
    loop {
        let chunk: String = chars.by_ref().take(chunk_chars).collect();
        if chunk.is_empty() {
            break;
        }
        events.push(TimelineEvent {
            t,
            kind: TimelineEventKind::Chunk { text: chunk },
        });
        t += delay_ms;
    }

    events.push(TimelineEvent {
        t,
        kind: TimelineEventKind::Done,
    });
    events
}

/// Play a timeline as an async stream, honoring each event's timestamp.
///
/// The stream always terminates with `ReplayEvent::Done`, whether or not the
/// timeline carried one.
pub fn stream_events(events: Vec<TimelineEvent>) -> ReceiverStream<ReplayEvent> {
    let (tx, rx) = mpsc::channel(32);

    tokio::spawn(async move {
        let start = tokio::time::Instant::now();
        let mut sent_done = false;

        for event in events {
            let at = start + std::time::Duration::from_millis(event.t);
            tokio::time::sleep_until(at).await;

            let out = match event.kind {
                TimelineEventKind::Chunk { text } => ReplayEvent::Chunk(text),
                TimelineEventKind::Done => {
                    sent_done = true;
                    ReplayEvent::Done
                }
            };
            if tx.send(out).await.is_err() {
                return; // Consumer went away
            }
            if sent_done {
                return;
            }
        }

        let _ = tx.send(ReplayEvent::Done).await;
    });

    ReceiverStream::new(rx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_stream::StreamExt;

    #[test]
    fn test_chunked_timeline_reassembles() {
        let text = "{\"blocks\":[{\"type\":\"markdown\",\"content\":\"héllo\"}]}";
        let events = chunked_timeline(text, 7, 10);

        let mut reassembled = String::new();
        let mut saw_done = false;
        for event in &events {
            match &event.kind {
                TimelineEventKind::Chunk { text } => reassembled.push_str(text),
                TimelineEventKind::Done => saw_done = true,
            }
        }
        assert_eq!(reassembled, text);
        assert!(saw_done);
        // Pacing is monotone
        assert!(events.windows(2).all(|w| w[0].t <= w[1].t));
    }

    #[test]
    fn test_chunked_timeline_empty_text() {
        let events = chunked_timeline("", 8, 10);
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0].kind, TimelineEventKind::Done));
    }

    #[tokio::test]
    async fn test_stream_yields_chunks_then_done() {
        let events = chunked_timeline("abcdef", 2, 0);
        let mut stream = stream_events(events);

        let mut chunks = Vec::new();
        while let Some(event) = stream.next().await {
            match event {
                ReplayEvent::Chunk(text) => chunks.push(text),
                ReplayEvent::Done => break,
            }
        }
        assert_eq!(chunks, vec!["ab", "cd", "ef"]);
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn test_stream_appends_done_when_missing() {
        let events = vec![TimelineEvent {
            t: 0,
            kind: TimelineEventKind::Chunk {
                text: "x".to_string(),
            },
        }];
        let mut stream = stream_events(events);
        assert_eq!(stream.next().await, Some(ReplayEvent::Chunk("x".into())));
        assert_eq!(stream.next().await, Some(ReplayEvent::Done));
    }

    #[tokio::test]
    async fn test_load_raw_document_chunks_it() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("capture.json");
        let doc = r#"{"blocks":[{"type":"markdown","content":"hi"}]}"#;
        tokio::fs::write(&path, doc).await.unwrap();

        let events = load(&path).await.unwrap();
        assert!(matches!(
            events.last().unwrap().kind,
            TimelineEventKind::Done
        ));
        let reassembled: String = events
            .iter()
            .filter_map(|e| match &e.kind {
                TimelineEventKind::Chunk { text } => Some(text.as_str()),
                TimelineEventKind::Done => None,
            })
            .collect();
        assert_eq!(reassembled, doc);
    }

    #[tokio::test]
    async fn test_load_timeline_file_as_is() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("timeline.json");
        let timeline = r#"[{"t":0,"event":"chunk","text":"{\"blocks\":[]}"},{"t":25,"event":"done"}]"#;
        tokio::fs::write(&path, timeline).await.unwrap();

        let events = load(&path).await.unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].t, 25);
    }

    #[test]
    fn test_timeline_json_shape() {
        let json = r#"[{"t":0,"event":"chunk","text":"{\"blocks\":["},{"t":40,"event":"done"}]"#;
        let events: Vec<TimelineEvent> = serde_json::from_str(json).unwrap();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[1].kind, TimelineEventKind::Done));
    }
}
