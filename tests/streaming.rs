//! End-to-end streaming tests
//!
//! Drive the full pipeline the way the TUI does: a scripted chunk stream
//! feeds a ResponseBuffer, the buffer is reparsed after every chunk, and the
//! sequence of parse results must grow monotonically until the final
//! complete snapshot.

use sheetchat::block::Block;
use sheetchat::parser::{parse_response, ResponseDocument, ResponseError};
use sheetchat::replay::{chunked_timeline, stream_events, ReplayEvent};
use sheetchat::ResponseBuffer;
use serde_json::json;
use tokio_stream::StreamExt;

/// A representative analysis response covering every registered block type,
/// plus one unknown tag, with brace-hostile markdown content.
fn sample_document() -> ResponseDocument {
    let blocks = vec![
        json!({"type": "markdown", "content": "# Overview\n\nSay \"hi\" to {braces} and \\ backslashes."}),
        json!({"type": "kpiGroup", "data": {"items": [
            {"title": "Rows", "value": 1280},
            {"title": "Revenue", "value": "99.5k", "trend": "+5%", "trendDirection": "up"}
        ]}}),
        json!({"type": "barChart", "data": {
            "title": "Issues by type",
            "labels": ["Auth", "Integration", "UI"],
            "datasets": [{"name": "count", "values": [14.0, 9.0, 3.0], "color": "#EF4444"}]
        }}),
        json!({"type": "lineChart", "data": {
            "title": "Trend",
            "labels": ["Jan", "Feb", "Mar"],
            "datasets": [{"values": [100.0, 150.0, 200.0]}]
        }}),
        json!({"type": "pieChart", "data": {"segments": [
            {"label": "Open", "value": 30.0},
            {"label": "Closed", "value": 70.0}
        ]}}),
        json!({"type": "table", "data": {
            "columns": ["Item", "Count"],
            "rows": [["Bolts", 12.0], ["Nuts", 7.5]]
        }}),
        json!({"type": "list", "data": {"items": ["fix auth", "add tests"], "ordered": true}}),
        json!({"type": "gauge", "data": {"value": 42}}),
    ];
    let blocks = blocks.into_iter().map(|v| Block::from_value(v).unwrap()).collect();
    ResponseDocument { blocks }
}

fn serialize(document: &ResponseDocument) -> String {
    // Unknown blocks can't be serialized by the tagged enum; rebuild by hand
    let items: Vec<serde_json::Value> = document
        .blocks
        .iter()
        .map(|b| match b {
            Block::Unknown { raw, .. } => raw.clone(),
            other => serde_json::to_value(other).unwrap(),
        })
        .collect();
    json!({ "blocks": items }).to_string()
}

#[test]
fn round_trip_preserves_blocks_and_order() {
    let document = sample_document();
    let result = parse_response(&serialize(&document));

    assert!(result.is_complete);
    assert!(result.error.is_none());
    assert_eq!(result.blocks, document.blocks);
}

#[test]
fn every_byte_prefix_is_a_strict_prefix() {
    let document = sample_document();
    let serialized = serialize(&document);
    let full = parse_response(&serialized).blocks;
    assert_eq!(full.len(), document.blocks.len());

    let mut previous = 0usize;
    for cut in 0..serialized.len() {
        if !serialized.is_char_boundary(cut) {
            continue;
        }
        let result = parse_response(&serialized[..cut]);

        assert!(!result.is_complete, "cut {} cannot be complete", cut);
        assert!(result.error.is_none(), "cut {} must not error", cut);
        assert!(
            result.blocks.len() < full.len(),
            "cut {} must yield a strict prefix",
            cut
        );
        assert_eq!(result.blocks[..], full[..result.blocks.len()]);

        // Monotone growth across cuts of the same stream
        assert!(result.blocks.len() >= previous, "cut {} shrank", cut);
        previous = result.blocks.len();
    }
}

#[test]
fn parse_is_idempotent_at_every_prefix() {
    let serialized = serialize(&sample_document());
    for cut in [0, 1, serialized.len() / 3, serialized.len() / 2, serialized.len()] {
        let cut = (0..=cut).rev().find(|&c| serialized.is_char_boundary(c)).unwrap();
        let buf = &serialized[..cut];
        assert_eq!(parse_response(buf), parse_response(buf));
    }
}

#[tokio::test]
async fn chunked_stream_through_buffer_is_monotone() {
    let serialized = serialize(&sample_document());
    let full = parse_response(&serialized).blocks;

    // Tiny chunks, no pacing: maximally hostile split points
    let mut stream = stream_events(chunked_timeline(&serialized, 3, 0));
    let mut buffer = ResponseBuffer::new();
    let mut shown = 0usize;

    while let Some(event) = stream.next().await {
        match event {
            ReplayEvent::Chunk(text) => buffer.push(&text),
            ReplayEvent::Done => buffer.finish(),
        }
        let result = buffer.parse();

        // Previously rendered blocks never change or disappear
        assert!(result.blocks.len() >= shown);
        assert_eq!(result.blocks[..shown], full[..shown]);
        shown = result.blocks.len();

        if buffer.is_done() {
            assert!(result.is_complete);
            assert_eq!(result.blocks, full);
            return;
        }
    }
    panic!("stream ended without a Done event");
}

#[tokio::test]
async fn scripted_chunk_stream_with_mid_token_splits() {
    // Hand-scripted chunks that split inside keys, strings, and escapes
    let chunks = async_stream::stream! {
        yield r#"{"blo"#.to_string();
        yield r#"cks":[{"type":"mark"#.to_string();
        yield r#"down","content":"say \"#.to_string();
        yield r#""hi\" to {braces}"},{"type":"kpi","#.to_string();
        yield r#""data":{"title":"Revenue","value":100}}]}"#.to_string();
    };
    futures::pin_mut!(chunks);

    let mut buffer = ResponseBuffer::new();
    let mut seen: Vec<usize> = Vec::new();
    while let Some(chunk) = chunks.next().await {
        buffer.push(&chunk);
        seen.push(buffer.parse().blocks.len());
    }
    buffer.finish();
    let result = buffer.parse();

    assert!(result.is_complete);
    assert_eq!(result.blocks.len(), 2);
    assert_eq!(
        result.blocks[0],
        Block::markdown("say \"hi\" to {braces}")
    );
    assert!(seen.windows(2).all(|w| w[0] <= w[1]), "block count shrank: {:?}", seen);
}

#[test]
fn wrong_shape_document_reports_contract_violation() {
    let result = parse_response(r#"{"oops":[]}"#);
    assert!(result.is_complete);
    assert!(result.blocks.is_empty());
    assert_eq!(result.error, Some(ResponseError::MissingBlocks));
}

#[test]
fn unknown_tag_blocks_survive_alongside_known_ones() {
    let serialized = serialize(&sample_document());
    let result = parse_response(&serialized);
    let unknown: Vec<_> = result
        .blocks
        .iter()
        .filter(|b| matches!(b, Block::Unknown { .. }))
        .collect();
    assert_eq!(unknown.len(), 1);
    assert_eq!(unknown[0].tag(), "gauge");
}
