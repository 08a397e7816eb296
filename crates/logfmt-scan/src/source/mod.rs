//! Line sources: where the decoder gets its records from.
//!
//! A [`LineSource`] yields one line of bytes at a time and distinguishes a
//! clean end of input (`Ok(false)`) from a read failure (`Err`). The decoder
//! never looks past the line it is given.
//!
//! Both bundled sources split lines the same way: a line ends at `\n`, one
//! trailing `\r` is dropped, and a final line without a terminator is still
//! produced when it is non-empty.

#[cfg(feature = "std")]
mod read;

use core::convert::Infallible;

use bstr::ByteSlice;
#[cfg(feature = "std")]
pub use read::ReadLines;

/// A producer of lines, one at a time.
pub trait LineSource {
    /// Error reported when the next line cannot be produced.
    type Error;

    /// Moves to the next line.
    ///
    /// Returns `Ok(true)` when [`line`](LineSource::line) holds a new line,
    /// `Ok(false)` at the end of input.
    ///
    /// # Errors
    ///
    /// Returns the source's error when reading fails.
    fn advance(&mut self) -> Result<bool, Self::Error>;

    /// The current line, without its terminator. Empty before the first
    /// successful [`advance`](LineSource::advance).
    fn line(&self) -> &[u8];
}

impl<S: LineSource + ?Sized> LineSource for &mut S {
    type Error = S::Error;

    fn advance(&mut self) -> Result<bool, Self::Error> {
        (**self).advance()
    }

    fn line(&self) -> &[u8] {
        (**self).line()
    }
}

/// Lines of an in-memory byte slice.
#[derive(Debug, Clone)]
pub struct SliceLines<'a> {
    rest: &'a [u8],
    line: &'a [u8],
}

impl<'a> SliceLines<'a> {
    /// Splits `input` into lines.
    #[must_use]
    pub fn new(input: &'a [u8]) -> Self {
        Self {
            rest: input,
            line: &[],
        }
    }

    /// The input not yet handed out as lines.
    #[must_use]
    pub fn remaining(&self) -> &'a [u8] {
        self.rest
    }
}

impl LineSource for SliceLines<'_> {
    type Error = Infallible;

    fn advance(&mut self) -> Result<bool, Infallible> {
        let input = self.rest;
        if input.is_empty() {
            self.line = &[];
            return Ok(false);
        }
        let (line, rest) = match input.find_byte(b'\n') {
            Some(i) => (&input[..i], &input[i + 1..]),
            None => (input, &input[input.len()..]),
        };
        self.line = drop_cr(line);
        self.rest = rest;
        Ok(true)
    }

    fn line(&self) -> &[u8] {
        self.line
    }
}

pub(crate) fn drop_cr(line: &[u8]) -> &[u8] {
    line.strip_suffix(b"\r").unwrap_or(line)
}
