use alloc::{string::String, vec::Vec};
use core::fmt::Write;

use quickcheck::{Arbitrary, Gen};

/// A value as it should come out of the decoder, plus how to spell it.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TestValue {
    /// `key`
    Flag,
    /// `key=`
    Empty,
    /// `key=value`
    Bare(String),
    /// `key="value"`, escaped as needed.
    Quoted(String),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TestPair {
    pub key: String,
    pub value: TestValue,
}

/// One line worth of pairs, with the separator runs used to render it.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TestRecord {
    pub pairs: Vec<TestPair>,
    separators: Vec<&'static str>,
}

const SEPARATORS: &[&str] = &[" ", "  ", "\t", " \t ", "\x0b", "\x00", "\x1f "];

/// Characters allowed in keys and bare values.
fn token_chars(g: &mut Gen, fallback: &str) -> String {
    let s: String = String::arbitrary(g)
        .chars()
        .filter(|&c| u32::from(c) > 0x20 && c != '=' && c != '"')
        .collect();
    if s.is_empty() { fallback.into() } else { s }
}

impl Arbitrary for TestValue {
    fn arbitrary(g: &mut Gen) -> Self {
        match usize::arbitrary(g) % 4 {
            0 => TestValue::Flag,
            1 => TestValue::Empty,
            2 => TestValue::Bare(token_chars(g, "v")),
            _ => TestValue::Quoted(String::arbitrary(g)),
        }
    }
}

impl Arbitrary for TestPair {
    fn arbitrary(g: &mut Gen) -> Self {
        TestPair {
            key: token_chars(g, "k"),
            value: TestValue::arbitrary(g),
        }
    }
}

impl Arbitrary for TestRecord {
    fn arbitrary(g: &mut Gen) -> Self {
        let pairs = Vec::<TestPair>::arbitrary(g);
        let separators = (0..=pairs.len())
            .map(|_| *g.choose(SEPARATORS).unwrap_or(&" "))
            .collect();
        TestRecord { pairs, separators }
    }
}

impl TestRecord {
    /// Renders the record as one logfmt line, without the terminator.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (i, pair) in self.pairs.iter().enumerate() {
            out.push_str(self.separators[i]);
            out.push_str(&pair.key);
            match &pair.value {
                TestValue::Flag => {}
                TestValue::Empty => out.push('='),
                TestValue::Bare(v) => {
                    out.push('=');
                    out.push_str(v);
                }
                TestValue::Quoted(v) => {
                    out.push_str("=\"");
                    write_escaped(v, &mut out);
                    out.push('"');
                }
            }
        }
        out.push_str(self.separators[self.pairs.len()]);
        out
    }

    /// The `(key, value)` sequence the decoder must produce for this record.
    pub fn expected(&self) -> Vec<(String, Option<String>)> {
        self.pairs
            .iter()
            .map(|pair| {
                let value = match &pair.value {
                    TestValue::Flag => None,
                    TestValue::Empty => Some(String::new()),
                    TestValue::Bare(v) | TestValue::Quoted(v) => Some(v.clone()),
                };
                (pair.key.clone(), value)
            })
            .collect()
    }
}

fn write_escaped(v: &str, out: &mut String) {
    for c in v.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            c if u32::from(c) < 0x20 => {
                let _ = write!(out, "\\u{:04x}", u32::from(c));
            }
            c => out.push(c),
        }
    }
}
