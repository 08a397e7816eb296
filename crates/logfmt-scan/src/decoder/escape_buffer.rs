//! Accumulator for the four hex digits of a `\uXXXX` escape.
//!
//! [`UnicodeEscapeBuffer`] folds ASCII hexadecimal digits (`0-9`, `A-F`,
//! `a-f`) into a UTF-16 code unit as they are fed, and hands the unit back
//! once the fourth digit arrives. It resets itself after every completed
//! escape. Pairing surrogates is left to the caller.

use super::unquote::UnquoteError;

#[derive(Debug, Default)]
pub(crate) struct UnicodeEscapeBuffer {
    acc: u16,
    len: u8,
}

impl UnicodeEscapeBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.acc = 0;
        self.len = 0;
    }

    #[inline]
    fn hex_val(b: u8) -> Option<u16> {
        match b {
            b'0'..=b'9' => Some(u16::from(b - b'0')),
            b'a'..=b'f' => Some(u16::from(b - b'a') + 10),
            b'A'..=b'F' => Some(u16::from(b - b'A') + 10),
            _ => None,
        }
    }

    /// Feeds one hex digit.
    ///
    /// Returns `Ok(None)` until four digits have been seen, then
    /// `Ok(Some(unit))` and resets. A non-hex byte resets the buffer and
    /// returns an error.
    pub fn feed(&mut self, b: u8) -> Result<Option<u16>, UnquoteError> {
        let Some(d) = Self::hex_val(b) else {
            self.reset();
            return Err(UnquoteError::InvalidHexDigit(b));
        };

        self.acc = (self.acc << 4) | d;
        self.len += 1;

        if self.len < 4 {
            return Ok(None);
        }

        let unit = self.acc;
        self.reset();
        Ok(Some(unit))
    }

    /// Decodes the four hex digits at the start of `bytes`.
    pub fn decode(&mut self, bytes: &[u8]) -> Result<u16, UnquoteError> {
        self.reset();
        for &b in bytes.iter().take(4) {
            if let Some(unit) = self.feed(b)? {
                return Ok(unit);
            }
        }
        self.reset();
        Err(UnquoteError::TruncatedEscape)
    }
}
