//! Unescaping of quoted values that contain backslashes.
//!
//! Escapes follow JSON string rules: the short escapes `\" \\ \/ \' \b \f
//! \n \r \t` and `\uXXXX`, where a high/low surrogate pair spelled as two
//! consecutive escapes decodes to a single scalar and a lone surrogate
//! becomes U+FFFD. Raw control bytes are rejected. Invalid UTF-8 is coerced
//! to U+FFFD rather than rejected.

use alloc::vec::Vec;

use thiserror::Error;

use super::escape_buffer::UnicodeEscapeBuffer;

/// Why a quoted value could not be unescaped. Surfaced to callers only as
/// [`SyntaxErrorKind::InvalidQuote`](crate::SyntaxErrorKind::InvalidQuote).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum UnquoteError {
    #[error("invalid escape character {0:#04x}")]
    InvalidEscape(u8),
    #[error("invalid hex digit {0:#04x} in unicode escape")]
    InvalidHexDigit(u8),
    #[error("escape sequence cut short")]
    TruncatedEscape,
    #[error("raw control character {0:#04x}")]
    ControlCharacter(u8),
    #[error("unescaped quote")]
    UnexpectedQuote,
}

const HIGH_SURROGATES: core::ops::Range<u16> = 0xD800..0xDC00;
const LOW_SURROGATES: core::ops::Range<u16> = 0xDC00..0xE000;

/// Unescapes `inner` (the quoted span without its quotes) into `out`.
///
/// `out` is cleared first. On error its contents are unspecified.
pub(crate) fn unquote_into(inner: &[u8], out: &mut Vec<u8>) -> Result<(), UnquoteError> {
    out.clear();
    out.reserve(inner.len());

    let mut hex = UnicodeEscapeBuffer::new();
    let mut r = 0;
    while r < inner.len() {
        match inner[r] {
            b'\\' => {
                let Some(&e) = inner.get(r + 1) else {
                    return Err(UnquoteError::TruncatedEscape);
                };
                r += 2;
                let unescaped = match e {
                    b'"' | b'\\' | b'/' | b'\'' => e,
                    b'b' => 0x08,
                    b'f' => 0x0c,
                    b'n' => b'\n',
                    b'r' => b'\r',
                    b't' => b'\t',
                    b'u' => {
                        let (ch, used) = decode_unicode_escape(&mut hex, &inner[r..])?;
                        r += used;
                        push_char(out, ch);
                        continue;
                    }
                    other => return Err(UnquoteError::InvalidEscape(other)),
                };
                out.push(unescaped);
            }
            b'"' => return Err(UnquoteError::UnexpectedQuote),
            c if c < b' ' => return Err(UnquoteError::ControlCharacter(c)),
            c if c.is_ascii() => {
                out.push(c);
                r += 1;
            }
            _ => {
                let (ch, size) = bstr::decode_utf8(&inner[r..]);
                push_char(out, ch.unwrap_or(char::REPLACEMENT_CHARACTER));
                r += size.max(1);
            }
        }
    }
    Ok(())
}

/// Decodes the digits following `\u`, plus a trailing `\uXXXX` low
/// surrogate when the first unit is a high surrogate. Returns the scalar and
/// the number of bytes consumed from `rest`.
fn decode_unicode_escape(
    hex: &mut UnicodeEscapeBuffer,
    rest: &[u8],
) -> Result<(char, usize), UnquoteError> {
    let unit = hex.decode(rest)?;
    if let Some(ch) = char::from_u32(u32::from(unit)) {
        return Ok((ch, 4));
    }

    if HIGH_SURROGATES.contains(&unit) && rest[4..].starts_with(b"\\u") {
        if let Ok(low) = hex.decode(&rest[6..]) {
            if LOW_SURROGATES.contains(&low) {
                let scalar =
                    0x10000 + ((u32::from(unit) - 0xD800) << 10) + (u32::from(low) - 0xDC00);
                let ch = char::from_u32(scalar).unwrap_or(char::REPLACEMENT_CHARACTER);
                return Ok((ch, 10));
            }
        }
    }
    Ok((char::REPLACEMENT_CHARACTER, 4))
}

fn push_char(out: &mut Vec<u8>, ch: char) {
    let mut tmp = [0u8; 4];
    out.extend_from_slice(ch.encode_utf8(&mut tmp).as_bytes());
}
