//! Property-based tests for wire decoding and stream routing

use panegrid_core::layout::{LayoutTree, PaneId};
use panegrid_core::registry::{ContentRequest, PaneRegistry};
use panegrid_core::settings::StreamSettings;
use panegrid_core::stream::{FrameDecoder, RecordingTransport, StreamRouter, parse_payload};
use proptest::prelude::*;

fn record(text: &str) -> String {
    format!(
        "data: {}\n\n",
        serde_json::json!({ "choices": [{ "delta": { "content": text } }] })
    )
}

/// One chat pane with a registry ready to receive streams
fn chat_pane() -> (PaneRegistry, PaneId) {
    let pane = PaneId::new();
    let mut registry = PaneRegistry::new();
    registry.sync(&LayoutTree::single(pane));
    registry.load(pane, ContentRequest::chat("c"), 50).unwrap();
    (registry, pane)
}

/// Splits `wire` into pieces at the given char offsets.
fn split_wire(wire: &str, cuts: &[usize]) -> Vec<String> {
    let chars: Vec<char> = wire.chars().collect();
    let mut points: Vec<usize> = cuts.iter().map(|cut| cut % (chars.len() + 1)).collect();
    points.sort_unstable();
    points.dedup();
    let mut pieces = Vec::new();
    let mut start = 0;
    for point in points {
        pieces.push(chars[start..point].iter().collect());
        start = point;
    }
    pieces.push(chars[start..].iter().collect());
    pieces
}

proptest! {
    /// Payloads do not depend on where the wire data is cut into chunks.
    #[test]
    fn decoding_is_independent_of_chunking(
        texts in proptest::collection::vec("[a-zA-Z0-9 ]{0,12}", 1..8),
        cuts in proptest::collection::vec(0usize..400, 0..12),
    ) {
        let wire: String = texts.iter().map(|text| record(text)).collect();

        let mut whole = FrameDecoder::new();
        let expected = whole.push(&wire);

        let mut pieces = FrameDecoder::new();
        let mut actual = Vec::new();
        for piece in split_wire(&wire, &cuts) {
            actual.extend(pieces.push(&piece));
        }
        prop_assert_eq!(actual, expected);
        prop_assert_eq!(pieces.pending_len(), 0);
    }

    /// Arbitrary input never panics the payload parser.
    #[test]
    fn parser_accepts_any_input(payload in ".{0,200}") {
        let _ = parse_payload(&payload);
    }

    /// Streamed content equals the concatenated deltas, however it is chunked.
    #[test]
    fn routed_content_is_concatenation(
        texts in proptest::collection::vec("[a-z ]{1,8}", 1..6),
        cuts in proptest::collection::vec(0usize..300, 0..8),
    ) {
        let (mut registry, pane) = chat_pane();
        let mut transport = RecordingTransport::new();
        let mut router = StreamRouter::new(StreamSettings::default());
        let stream = router.send(&mut registry, &mut transport, pane, "q").unwrap();

        let wire: String = texts.iter().map(|text| record(text)).collect();
        for piece in split_wire(&wire, &cuts) {
            prop_assert!(router.on_chunk(&mut registry, stream, &piece));
        }
        prop_assert!(router.on_complete(&mut registry, stream));

        let message = &registry.chat(pane).unwrap().all_messages()[1];
        prop_assert_eq!(&message.content, &texts.concat());
        prop_assert!(!message.is_streaming);
    }

    /// Events after a stream ended change nothing.
    #[test]
    fn late_events_are_noops(
        late in proptest::collection::vec("[a-z]{1,8}", 1..5),
        ending in 0u8..3,
    ) {
        let (mut registry, pane) = chat_pane();
        let mut transport = RecordingTransport::new();
        let mut router = StreamRouter::new(StreamSettings::default());
        let stream = router.send(&mut registry, &mut transport, pane, "q").unwrap();
        router.on_chunk(&mut registry, stream, &record("answer"));
        match ending {
            0 => { router.on_complete(&mut registry, stream); }
            1 => { router.on_error(&mut registry, stream, "boom"); }
            _ => { router.interrupt(&mut registry, &mut transport, stream); }
        }
        let settled = registry.chat(pane).unwrap().clone();

        for text in &late {
            prop_assert!(!router.on_chunk(&mut registry, stream, &record(text)));
        }
        prop_assert!(!router.on_complete(&mut registry, stream));
        prop_assert!(!router.on_error(&mut registry, stream, "again"));
        prop_assert!(!router.interrupt(&mut registry, &mut transport, stream));
        prop_assert_eq!(registry.chat(pane).unwrap(), &settled);
    }
}
