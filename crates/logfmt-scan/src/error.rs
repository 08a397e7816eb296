use core::fmt;

use thiserror::Error;

/// A syntax error found while scanning a record.
///
/// `line` is the 1-based record number and `pos` the 1-based byte column at
/// which scanning stopped.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[error("logfmt syntax error at pos {pos} on line {line}: {kind}")]
pub struct SyntaxError {
    pub(crate) kind: SyntaxErrorKind,
    /// 1-based line number of the offending record.
    pub line: usize,
    /// 1-based byte column within the record.
    pub pos: usize,
}

impl SyntaxError {
    /// What went wrong.
    #[must_use]
    pub fn kind(&self) -> SyntaxErrorKind {
        self.kind
    }
}

/// The reason a record failed to scan.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum SyntaxErrorKind {
    /// A reserved byte (`=` or `"`) appeared where a key or bare value was
    /// expected.
    #[error("unexpected {}", QuotedByte(*.0))]
    UnexpectedByte(u8),
    /// The record ended before the closing quote of a quoted value.
    #[error("unterminated quoted value")]
    UnterminatedQuote,
    /// A quoted value contained a malformed escape sequence.
    #[error("invalid quoted value")]
    InvalidQuote,
}

/// Error that ended a decoding session.
///
/// `E` is the error type of the underlying [`LineSource`](crate::LineSource).
#[derive(Error, Debug, PartialEq)]
pub enum DecodeError<E> {
    /// The line source failed to produce the next line.
    #[error(transparent)]
    Source(E),
    /// A record was not valid logfmt.
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
}

impl<E> DecodeError<E> {
    /// Returns the syntax error, if this is one.
    pub fn as_syntax(&self) -> Option<&SyntaxError> {
        match self {
            DecodeError::Syntax(err) => Some(err),
            DecodeError::Source(_) => None,
        }
    }
}

/// Failure of [`ReadLines`](crate::ReadLines) to produce a line.
#[cfg(feature = "std")]
#[derive(Error, Debug)]
pub enum ReadError {
    /// The reader itself failed.
    #[error("read error: {0}")]
    Io(#[from] std::io::Error),
    /// A line exceeded [`ReadOptions::max_line_len`](crate::ReadOptions).
    #[error("line too long: exceeds {limit} bytes")]
    LineTooLong {
        /// The configured limit in bytes.
        limit: usize,
    },
}

/// Renders a byte the way a character literal is written: `'='`, `'"'`,
/// `'\x01'`.
struct QuotedByte(u8);

impl fmt::Display for QuotedByte {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            b'\'' => f.write_str(r"'\''"),
            b'\\' => f.write_str(r"'\\'"),
            b'\t' => f.write_str(r"'\t'"),
            b'\n' => f.write_str(r"'\n'"),
            b'\r' => f.write_str(r"'\r'"),
            b @ 0x20..=0x7e => write!(f, "'{}'", char::from(b)),
            b => write!(f, "'\\x{b:02x}'"),
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn display_matches_wire_format() {
        let err = SyntaxError {
            kind: SyntaxErrorKind::UnexpectedByte(b'='),
            line: 3,
            pos: 7,
        };
        assert_eq!(
            err.to_string(),
            "logfmt syntax error at pos 7 on line 3: unexpected '='"
        );
    }

    #[test]
    fn quoted_bytes() {
        assert_eq!(
            SyntaxErrorKind::UnexpectedByte(b'"').to_string(),
            "unexpected '\"'"
        );
        assert_eq!(
            SyntaxErrorKind::UnexpectedByte(b'\'').to_string(),
            r"unexpected '\''"
        );
        assert_eq!(
            SyntaxErrorKind::UnexpectedByte(0x01).to_string(),
            r"unexpected '\x01'"
        );
        assert_eq!(
            SyntaxErrorKind::UnterminatedQuote.to_string(),
            "unterminated quoted value"
        );
        assert_eq!(
            SyntaxErrorKind::InvalidQuote.to_string(),
            "invalid quoted value"
        );
    }

    #[test]
    fn decode_error_is_transparent() {
        let err: DecodeError<core::convert::Infallible> = SyntaxError {
            kind: SyntaxErrorKind::UnterminatedQuote,
            line: 1,
            pos: 4,
        }
        .into();
        assert_eq!(
            err.to_string(),
            "logfmt syntax error at pos 4 on line 1: unterminated quoted value"
        );
        assert_eq!(err.as_syntax().map(|e| e.pos), Some(4));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serializes_kind_and_position() {
        let err = SyntaxError {
            kind: SyntaxErrorKind::InvalidQuote,
            line: 2,
            pos: 5,
        };
        assert_eq!(
            serde_json::to_string(&err).unwrap(),
            r#"{"kind":"InvalidQuote","line":2,"pos":5}"#
        );
    }
}
