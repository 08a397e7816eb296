#![allow(missing_docs, dead_code)]

use core::fmt::Write;

use logfmt_scan::{Decoder, Keyval, LineSource};

/// A small access log: plain, quoted, escaped, empty and flag values, plus a
/// blank line.
pub const SAMPLE: &str = concat!(
    "ts=2024-05-01T12:00:00Z level=info msg=\"request done\" path=/api status=200 cached\n",
    "ts=2024-05-01T12:00:01Z level=warn msg=\"slow \\\"db\\\" query\" took= retry=\"\"\n",
    "\n",
    "ts=2024-05-01T12:00:02Z level=error err=\"caf\\u00e9\\nclosed\"\n",
);

/// Renders every record and pair the decoder produces, then how it stopped.
pub fn render<S: LineSource>(mut dec: Decoder<S>) -> String
where
    S::Error: core::fmt::Display,
{
    let mut out = String::new();
    while dec.next_record() {
        writeln!(out, "record {}", dec.line_number()).unwrap();
        while let Keyval::Pair(pair) = dec.next_keyval() {
            writeln!(out, "  {:?} => {:?}", pair.key, pair.value).unwrap();
        }
    }
    match dec.err() {
        Some(err) => writeln!(out, "error: {err}").unwrap(),
        None => writeln!(out, "done").unwrap(),
    }
    out
}
