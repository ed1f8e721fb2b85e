//! Fuzz target: `LineDecoder::push`
//!
//! Streams arbitrary bytes through the orchestrator line decoder and checks
//! that every yielded line fits the fixed buffer and carries no terminator.
//!
//! cargo fuzz run fuzz_line_decoder

#![no_main]

use evacguard::protocol::codec::{LineDecoder, LineEvent, MAX_LINE};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut decoder = LineDecoder::new();

    for &b in data {
        if let Some(LineEvent::Line(line)) = decoder.push(b) {
            assert!(!line.is_empty(), "decoder must not yield empty lines");
            assert!(line.len() <= MAX_LINE, "line exceeds MAX_LINE");
            assert!(!line.iter().any(|&c| c == b'\n' || c == b'\r'));
        }
        assert!(decoder.pending() <= MAX_LINE);
    }

    // After a reset the decoder must accept bytes cleanly again.
    decoder.reset();
    assert_eq!(decoder.pending(), 0);
});
