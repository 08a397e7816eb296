//! The record/keyval decoder.
//!
//! Overview
//! - [`Decoder::next_record`] pulls one line from the [`LineSource`] and makes
//!   it the current record.
//! - [`Decoder::next_keyval`] scans the next `key`, `key=`, `key=value` or
//!   `key="quoted value"` token of the current record.
//! - Keys and values are handed out as views into the current line. Only a
//!   quoted value containing escapes is copied, into a scratch buffer owned
//!   by the decoder.
//!
//! Borrowing
//! - Every view borrows the decoder. Both advance methods take `&mut self`,
//!   so a view cannot be held across the next advance; copy it first
//!   (`to_vec()`, `to_owned()`) if it needs to live longer.
//!
//! Failure
//! - The decoder is a small state machine (`Ready`, `InRecord`, `Exhausted`,
//!   `Failed`). The first syntax error or source error moves it to `Failed`,
//!   after which both advance methods report no data without touching the
//!   source. End of input moves it to `Exhausted` and is not an error.
//! - There is no resynchronization: a syntax error ends the session.

mod escape_buffer;
mod scanner;
mod unquote;

use alloc::vec::Vec;
use core::{fmt, ops::Range};

use bstr::{BStr, ByteSlice};
use scanner::{ScanError, Scanned, ValueToken};
use tracing::{debug, trace};

#[cfg(feature = "std")]
use crate::{ReadLines, ReadOptions};
use crate::{DecodeError, LineSource, SliceLines, SyntaxError, SyntaxErrorKind};

/// Where a [`Decoder`] is in its session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecoderState {
    /// No record has been read yet.
    Ready,
    /// A record is current and may have pairs left.
    InRecord,
    /// The line source reached the end of input.
    Exhausted,
    /// A syntax or source error ended the session.
    Failed,
}

/// Result of [`Decoder::next_keyval`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyval<'d> {
    /// A key, with its value if one was given.
    Pair(Pair<'d>),
    /// The current record has no pairs left (or there is no current record).
    EndOfRecord,
    /// Decoding failed; see [`Decoder::err`].
    Failed,
}

impl<'d> Keyval<'d> {
    /// Returns the pair, if one was scanned.
    #[must_use]
    pub fn pair(self) -> Option<Pair<'d>> {
        match self {
            Keyval::Pair(pair) => Some(pair),
            Keyval::EndOfRecord | Keyval::Failed => None,
        }
    }
}

/// A scanned key and its optional value.
///
/// `value` is `None` for a bare flag such as `debug`, and `Some("")` for
/// `debug=` and `debug=""`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pair<'d> {
    /// The key. Never empty.
    pub key: &'d BStr,
    /// The value, with quotes removed and escapes resolved.
    pub value: Option<&'d BStr>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ValueSpan {
    Line(Range<usize>),
    Unescaped,
}

/// Decodes logfmt records, one line at a time.
///
/// ```
/// use logfmt_scan::{Decoder, Keyval};
///
/// let mut dec = Decoder::from_slice(b"level=info msg=\"hello world\" debug\n");
/// let mut fields = Vec::new();
/// while dec.next_record() {
///     while let Keyval::Pair(pair) = dec.next_keyval() {
///         fields.push((pair.key.to_string(), pair.value.map(|v| v.to_string())));
///     }
/// }
/// assert!(dec.err().is_none());
/// assert_eq!(
///     fields,
///     [
///         ("level".to_string(), Some("info".to_string())),
///         ("msg".to_string(), Some("hello world".to_string())),
///         ("debug".to_string(), None),
///     ]
/// );
/// ```
///
/// A decoder must not be shared between callers: every advance takes
/// `&mut self`. Decode in parallel with one decoder per line source.
pub struct Decoder<S: LineSource> {
    source: S,
    state: DecoderState,
    pos: usize,
    line_number: usize,
    key: Option<Range<usize>>,
    value: Option<ValueSpan>,
    unescaped: Vec<u8>,
    err: Option<DecodeError<S::Error>>,
}

impl<'a> Decoder<SliceLines<'a>> {
    /// Decodes the lines of an in-memory buffer.
    #[must_use]
    pub fn from_slice(input: &'a [u8]) -> Self {
        Self::new(SliceLines::new(input))
    }
}

#[cfg(feature = "std")]
impl<R: std::io::BufRead> Decoder<ReadLines<R>> {
    /// Decodes lines read from `reader`, with the default [`ReadOptions`].
    ///
    /// The decoder buffers lines itself, and `reader`'s own buffering may
    /// consume input past the last record requested.
    pub fn from_reader(reader: R) -> Self {
        Self::new(ReadLines::new(reader))
    }

    /// Decodes lines read from `reader`.
    pub fn from_reader_with_options(reader: R, options: ReadOptions) -> Self {
        Self::new(ReadLines::with_options(reader, options))
    }
}

impl<S: LineSource> Decoder<S> {
    /// Creates a decoder over `source`.
    pub fn new(source: S) -> Self {
        Self {
            source,
            state: DecoderState::Ready,
            pos: 0,
            line_number: 0,
            key: None,
            value: None,
            unescaped: Vec::new(),
            err: None,
        }
    }

    /// Advances to the next record.
    ///
    /// Returns `false` when decoding stops, either at the end of input or on
    /// an error; [`err`](Decoder::err) tells the two apart. Once it has
    /// returned `false` it keeps doing so without reading from the source.
    pub fn next_record(&mut self) -> bool {
        if matches!(self.state, DecoderState::Exhausted | DecoderState::Failed) {
            return false;
        }
        self.clear_pair();

        match self.source.advance() {
            Ok(true) => {
                self.line_number += 1;
                self.pos = 0;
                self.state = DecoderState::InRecord;
                trace!(
                    line = self.line_number,
                    len = self.source.line().len(),
                    "logfmt record"
                );
                true
            }
            Ok(false) => {
                self.state = DecoderState::Exhausted;
                trace!(records = self.line_number, "logfmt end of input");
                false
            }
            Err(err) => {
                debug!(line = self.line_number + 1, "logfmt line source failed");
                self.fail(DecodeError::Source(err));
                false
            }
        }
    }

    /// Scans the next key/value pair of the current record.
    ///
    /// The pair borrows the decoder and is valid until the next advance.
    /// After [`Keyval::Failed`] the error is available from
    /// [`err`](Decoder::err) and every later call returns `Failed` again.
    pub fn next_keyval(&mut self) -> Keyval<'_> {
        self.clear_pair();
        match self.state {
            DecoderState::Failed => return Keyval::Failed,
            DecoderState::Ready | DecoderState::Exhausted => return Keyval::EndOfRecord,
            DecoderState::InRecord => {}
        }

        let line = self.source.line();
        let (key, value, end) = match scanner::scan_keyval(line, self.pos) {
            Ok(Scanned::Pair { key, value, end }) => (key, value, end),
            Ok(Scanned::EndOfRecord) => {
                self.pos = line.len();
                return Keyval::EndOfRecord;
            }
            Err(ScanError { kind, pos }) => {
                self.pos = pos;
                self.syntax_error(kind);
                return Keyval::Failed;
            }
        };

        let value = match value {
            None => None,
            Some(ValueToken::Bare(span) | ValueToken::Quoted { inner: span, escaped: false, .. }) => {
                Some(ValueSpan::Line(span))
            }
            Some(ValueToken::Quoted {
                inner,
                open,
                escaped: true,
            }) => {
                if let Err(err) = unquote::unquote_into(&line[inner], &mut self.unescaped) {
                    debug!(line = self.line_number, reason = %err, "logfmt quoted value");
                    self.pos = open;
                    self.syntax_error(SyntaxErrorKind::InvalidQuote);
                    return Keyval::Failed;
                }
                Some(ValueSpan::Unescaped)
            }
        };

        self.pos = end;
        self.key = Some(key);
        self.value = value;
        match self.key() {
            Some(key) => Keyval::Pair(Pair {
                key,
                value: self.value(),
            }),
            None => Keyval::EndOfRecord,
        }
    }

    /// The key scanned by the last successful [`next_keyval`](Decoder::next_keyval).
    #[must_use]
    pub fn key(&self) -> Option<&BStr> {
        let span = self.key.clone()?;
        Some(self.source.line()[span].as_bstr())
    }

    /// The value scanned by the last successful
    /// [`next_keyval`](Decoder::next_keyval), `None` for a bare flag.
    #[must_use]
    pub fn value(&self) -> Option<&BStr> {
        match self.value.as_ref()? {
            ValueSpan::Line(span) => Some(self.source.line()[span.clone()].as_bstr()),
            ValueSpan::Unescaped => Some(self.unescaped.as_bstr()),
        }
    }

    /// The error that ended decoding, if any. Reaching the end of input is
    /// not an error.
    #[must_use]
    pub fn err(&self) -> Option<&DecodeError<S::Error>> {
        self.err.as_ref()
    }

    /// Takes the error out of the decoder. The decoder stays failed.
    pub fn take_err(&mut self) -> Option<DecodeError<S::Error>> {
        self.err.take()
    }

    /// The current state of the session.
    #[must_use]
    pub fn state(&self) -> DecoderState {
        self.state
    }

    /// 1-based number of the current record; 0 before the first one.
    #[must_use]
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Byte offset in the current record where the next scan starts.
    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// The bytes of the current record.
    #[must_use]
    pub fn line(&self) -> &BStr {
        self.source.line().as_bstr()
    }

    /// Borrows the line source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Returns the line source.
    pub fn into_inner(self) -> S {
        self.source
    }

    fn clear_pair(&mut self) {
        self.key = None;
        self.value = None;
    }

    fn syntax_error(&mut self, kind: SyntaxErrorKind) {
        let err = SyntaxError {
            kind,
            line: self.line_number,
            pos: self.pos + 1,
        };
        debug!(line = err.line, pos = err.pos, error = %kind, "logfmt syntax error");
        self.fail(err.into());
    }

    fn fail(&mut self, err: DecodeError<S::Error>) {
        self.state = DecoderState::Failed;
        self.err = Some(err);
    }
}

impl<S> fmt::Debug for Decoder<S>
where
    S: LineSource + fmt::Debug,
    S::Error: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Decoder")
            .field("source", &self.source)
            .field("state", &self.state)
            .field("line_number", &self.line_number)
            .field("pos", &self.pos)
            .field("key", &self.key())
            .field("value", &self.value())
            .field("err", &self.err)
            .finish()
    }
}
