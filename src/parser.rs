//! Streaming response parser
//!
//! The model streams one JSON document (`{"blocks": [...]}`) token by token,
//! so at almost every instant the accumulated buffer is not valid JSON. This
//! module turns any snapshot of that buffer into the list of blocks that can
//! be confidently parsed so far:
//!
//! 1. try a strict parse of the whole buffer (succeeds once the stream ends),
//! 2. otherwise carve out the fully-closed leading block objects with a
//!    quote-aware brace matcher and parse each one on its own.
//!
//! Parsing is stateless: every call re-reads the full buffer, so identical
//! input always produces identical output, and a longer buffer can only ever
//! append blocks, never change or remove ones already returned.

use crate::block::{Block, BLOCKS_KEY};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// A complete response document as the producer is contracted to send it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseDocument {
    pub blocks: Vec<Block>,
}

/// Upstream contract violations surfaced to the caller.
///
/// In-progress parse failures are *not* errors; they mean the stream hasn't
/// finished. Only a structurally complete document of the wrong shape is
/// reported.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResponseError {
    #[error("invalid response format: missing blocks array")]
    MissingBlocks,
}

/// Result of parsing one buffer snapshot
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParseResult {
    /// Blocks in appearance order
    pub blocks: Vec<Block>,
    /// Whether the buffer parsed as one complete document
    pub is_complete: bool,
    /// Contract violation, if any (never set while streaming)
    pub error: Option<ResponseError>,
}

/// Parse the accumulated response buffer.
///
/// Pure function of the buffer: call it as often as new text arrives. A
/// strict parse failure silently falls back to partial extraction, so the
/// only reported error is a complete document without a `blocks` array.
pub fn parse_response(buffer: &str) -> ParseResult {
    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return ParseResult::default();
    }

    match serde_json::from_str::<Value>(trimmed) {
        Ok(doc) => match doc.get(BLOCKS_KEY).and_then(Value::as_array) {
            Some(items) => ParseResult {
                blocks: convert_blocks(items),
                is_complete: true,
                error: None,
            },
            None => ParseResult {
                blocks: Vec::new(),
                is_complete: true,
                error: Some(ResponseError::MissingBlocks),
            },
        },
        // Expected mid-stream: the buffer is an incomplete prefix
        Err(_) => ParseResult {
            blocks: extract_partial_blocks(buffer),
            is_complete: false,
            error: None,
        },
    }
}

/// Convert raw array elements to blocks, dropping malformed ones silently
fn convert_blocks(items: &[Value]) -> Vec<Block> {
    items
        .iter()
        .filter_map(|item| {
            let block = Block::from_value(item.clone());
            if block.is_none() {
                crate::logging::debug(&format!(
                    "dropping malformed block: {}",
                    crate::util::truncate_str(&item.to_string(), 200)
                ));
            }
            block
        })
        .collect()
}

/// Extract the fully-closed leading block objects from an incomplete buffer.
///
/// Finds the `"blocks"` array and walks it object by object with the brace
/// matcher. A carved object is only emitted once a following comma confirms
/// it isn't the trailing element of the array: the trailing object is left to
/// the strict parse, which is the only path allowed to produce the full list.
/// Malformed complete objects are skipped; the first incomplete object stops
/// the scan.
pub fn extract_partial_blocks(buffer: &str) -> Vec<Block> {
    let mut blocks = Vec::new();

    let Some(mut pos) = find_array_start(buffer) else {
        return blocks;
    };

    loop {
        // Skip whitespace and element separators
        pos += buffer[pos..]
            .find(|c: char| !c.is_whitespace() && c != ',')
            .unwrap_or(buffer.len() - pos);

        // Array ended, or trailing non-object content
        if !buffer[pos..].starts_with('{') {
            break;
        }

        let Some(end) = match_brace(&buffer[pos..]) else {
            // Trailing object still streaming; never emit a half-formed block
            break;
        };

        let slice = &buffer[pos..pos + end + 1];
        pos += end + 1;

        // Only a following comma proves this wasn't the array's last element
        let after = buffer[pos..].trim_start();
        if !after.starts_with(',') {
            break;
        }

        match serde_json::from_str::<Value>(slice) {
            Ok(value) => {
                if let Some(block) = Block::from_value(value) {
                    blocks.push(block);
                }
                // Blocks without a usable type tag are dropped silently
            }
            // Guard against stray malformed content; continue with the next
            Err(_) => {
                crate::logging::debug(&format!(
                    "skipping unparseable block slice: {}",
                    crate::util::truncate_str(slice, 200)
                ));
            }
        }
    }

    blocks
}

/// Locate the byte offset just past the `[` opening the blocks array
fn find_array_start(buffer: &str) -> Option<usize> {
    let marker = format!("\"{}\"", BLOCKS_KEY);
    let key = buffer.find(&marker)? + marker.len();

    // Expect `:` then `[`, tolerating whitespace
    let rest = &buffer[key..];
    let colon = rest.find(|c: char| !c.is_whitespace())?;
    if !rest[colon..].starts_with(':') {
        return None;
    }
    let rest = &rest[colon + 1..];
    let bracket = rest.find(|c: char| !c.is_whitespace())?;
    if !rest[bracket..].starts_with('[') {
        return None;
    }

    Some(key + colon + 1 + bracket + 1)
}

/// Find the matching `}` for a string starting with `{`.
///
/// Returns the byte index of the closing brace at nesting depth 0, or `None`
/// if the string ends first — the expected, non-exceptional signal that the
/// object is still being streamed. Braces inside quoted strings are ignored,
/// and escapes inside strings (`\"`, `\\`) don't toggle the quote state.
pub fn match_brace(s: &str) -> Option<usize> {
    debug_assert!(s.starts_with('{'));

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, b) in s.bytes().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }

        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }

    None
}
