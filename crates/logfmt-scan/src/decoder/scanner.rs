//! Tokenizer steps for a single record.
//!
//! Every step is a pure function over `(line, pos)`. A successful step
//! returns the token it recognized together with the cursor just past it; a
//! failed step returns the cursor at the offending byte and the reason.
//! [`scan_keyval`] chains them: skip separators, key, `=`, then a bare or
//! quoted value.
//!
//! Bytes `<= 0x20` separate tokens. `=` and `"` are reserved outside quoted
//! values.

use core::ops::Range;

use crate::SyntaxErrorKind;

/// A scanning failure at byte offset `pos` of the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ScanError {
    pub kind: SyntaxErrorKind,
    pub pos: usize,
}

type Step<T> = Result<(T, usize), ScanError>;

/// The value part of a pair, as byte ranges into the line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ValueToken {
    /// An unquoted run, or an empty range for `key=`.
    Bare(Range<usize>),
    /// A quoted value. `inner` excludes both quotes; `open` is the offset of
    /// the opening quote.
    Quoted {
        inner: Range<usize>,
        open: usize,
        escaped: bool,
    },
}

/// Outcome of scanning from a cursor position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Scanned {
    Pair {
        key: Range<usize>,
        value: Option<ValueToken>,
        end: usize,
    },
    EndOfRecord,
}

#[inline]
pub(crate) fn is_separator(b: u8) -> bool {
    b <= b' '
}

/// Scans the next key/value pair starting at `pos`.
pub(crate) fn scan_keyval(line: &[u8], pos: usize) -> Result<Scanned, ScanError> {
    let Some(start) = skip_separators(line, pos) else {
        return Ok(Scanned::EndOfRecord);
    };

    let (key, pos) = scan_key(line, start)?;
    if line.get(pos) != Some(&b'=') {
        return Ok(Scanned::Pair {
            key,
            value: None,
            end: pos,
        });
    }

    let (value, end) = scan_value(line, pos + 1)?;
    Ok(Scanned::Pair {
        key,
        value: Some(value),
        end,
    })
}

/// Returns the offset of the first non-separator byte at or after `pos`.
pub(crate) fn skip_separators(line: &[u8], pos: usize) -> Option<usize> {
    line.get(pos..)?
        .iter()
        .position(|&b| !is_separator(b))
        .map(|p| pos + p)
}

/// Scans a key starting at a non-separator byte. The returned cursor is on
/// the terminating `=`, separator, or the end of the line.
pub(crate) fn scan_key(line: &[u8], start: usize) -> Step<Range<usize>> {
    for (p, &b) in line[start..].iter().enumerate() {
        let pos = start + p;
        match b {
            b'=' if pos == start => return Err(unexpected(b, pos)),
            b'"' => return Err(unexpected(b, pos)),
            b'=' => return Ok((start..pos, pos)),
            b if is_separator(b) => return Ok((start..pos, pos)),
            _ => {}
        }
    }
    Ok((start..line.len(), line.len()))
}

/// Scans whatever follows `=`.
pub(crate) fn scan_value(line: &[u8], pos: usize) -> Step<ValueToken> {
    match line.get(pos) {
        None => Ok((ValueToken::Bare(pos..pos), pos)),
        Some(&b) if is_separator(b) => Ok((ValueToken::Bare(pos..pos), pos)),
        Some(&b'"') => scan_quoted_value(line, pos),
        Some(_) => scan_bare_value(line, pos),
    }
}

/// Scans an unquoted value starting at a non-separator byte.
pub(crate) fn scan_bare_value(line: &[u8], start: usize) -> Step<ValueToken> {
    for (p, &b) in line[start..].iter().enumerate() {
        let pos = start + p;
        match b {
            b'=' | b'"' => return Err(unexpected(b, pos)),
            b if is_separator(b) => return Ok((ValueToken::Bare(start..pos), pos)),
            _ => {}
        }
    }
    Ok((ValueToken::Bare(start..line.len()), line.len()))
}

/// Scans a quoted value whose opening quote is at `open`. The returned
/// cursor is just past the closing quote.
pub(crate) fn scan_quoted_value(line: &[u8], open: usize) -> Step<ValueToken> {
    let mut escaped = false;
    let mut has_escape = false;
    for (p, &b) in line[open + 1..].iter().enumerate() {
        let pos = open + 1 + p;
        if escaped {
            escaped = false;
        } else if b == b'\\' {
            escaped = true;
            has_escape = true;
        } else if b == b'"' {
            let value = ValueToken::Quoted {
                inner: open + 1..pos,
                open,
                escaped: has_escape,
            };
            return Ok((value, pos + 1));
        }
    }
    Err(ScanError {
        kind: SyntaxErrorKind::UnterminatedQuote,
        pos: line.len(),
    })
}

fn unexpected(b: u8, pos: usize) -> ScanError {
    ScanError {
        kind: SyntaxErrorKind::UnexpectedByte(b),
        pos,
    }
}
