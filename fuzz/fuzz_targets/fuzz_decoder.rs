#![no_main]
use std::io::BufReader;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use logfmt_scan::{Decoder, DecoderState, Keyval, LineSource, ReadOptions};

#[derive(Debug, Arbitrary)]
struct Input<'a> {
    /// Read through `ReadLines` instead of `SliceLines`.
    via_reader: bool,
    /// Reader buffer size, so lines straddle refills.
    capacity: u8,
    /// Leave every n-th record half scanned.
    skip_every: u8,
    data: &'a [u8],
}

/// Drains the decoder and checks the invariants that must hold for any
/// input: keys are non-empty runs of token bytes, the cursor stays within
/// the line, and failure is sticky.
fn drive<S: LineSource>(mut dec: Decoder<S>, skip_every: u8) -> Vec<(Vec<u8>, Option<Vec<u8>>)> {
    let mut pairs = Vec::new();
    while dec.next_record() {
        let line = dec.line_number();
        loop {
            match dec.next_keyval() {
                Keyval::Pair(pair) => {
                    assert!(!pair.key.is_empty());
                    assert!(pair.key.iter().all(|&b| b > b' ' && b != b'=' && b != b'"'));
                    pairs.push((pair.key.to_vec(), pair.value.map(|v| v.to_vec())));
                }
                Keyval::EndOfRecord | Keyval::Failed => break,
            }
            assert!(dec.position() <= dec.line().len());
            if skip_every != 0 && line % usize::from(skip_every) == 0 {
                break;
            }
        }
    }

    match dec.state() {
        DecoderState::Exhausted => assert!(dec.err().is_none()),
        DecoderState::Failed => {
            assert!(dec.err().is_some());
            assert_eq!(dec.next_keyval(), Keyval::Failed);
            assert!(!dec.next_record());
        }
        state => panic!("decoder stopped in {state:?}"),
    }
    pairs
}

fuzz_target!(|input: Input<'_>| {
    let from_slice = drive(Decoder::from_slice(input.data), input.skip_every);
    if input.via_reader {
        let reader = BufReader::with_capacity(usize::from(input.capacity).max(1), input.data);
        let options = ReadOptions {
            max_line_len: usize::MAX / 2,
            ..ReadOptions::default()
        };
        let from_reader = drive(
            Decoder::from_reader_with_options(reader, options),
            input.skip_every,
        );
        assert_eq!(from_slice, from_reader);
    }
});
