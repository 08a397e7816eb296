use alloc::vec::Vec;
use std::io::{BufRead, Read};

use super::{LineSource, drop_cr};
use crate::{ReadError, ReadOptions};

/// Lines read from an [`io::BufRead`](std::io::BufRead).
///
/// Each line is read into one reusable buffer, so the slice returned by
/// [`line`](LineSource::line) is only valid until the next
/// [`advance`](LineSource::advance).
#[derive(Debug)]
pub struct ReadLines<R> {
    reader: R,
    buf: Vec<u8>,
    options: ReadOptions,
}

impl<R: BufRead> ReadLines<R> {
    /// Reads lines from `reader` with the default [`ReadOptions`].
    pub fn new(reader: R) -> Self {
        Self::with_options(reader, ReadOptions::default())
    }

    /// Reads lines from `reader`.
    pub fn with_options(reader: R, options: ReadOptions) -> Self {
        Self {
            reader,
            buf: Vec::with_capacity(options.initial_capacity.min(options.max_line_len)),
            options,
        }
    }

    /// The options this source was built with.
    pub fn options(&self) -> &ReadOptions {
        &self.options
    }

    /// Borrows the underlying reader.
    pub fn get_ref(&self) -> &R {
        &self.reader
    }

    /// Returns the underlying reader.
    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: BufRead> LineSource for ReadLines<R> {
    type Error = ReadError;

    fn advance(&mut self) -> Result<bool, ReadError> {
        self.buf.clear();

        let limit = self.options.max_line_len;
        // Room for the longest accepted line plus "\r\n".
        let budget = u64::try_from(limit.saturating_add(2)).unwrap_or(u64::MAX);
        let read = (&mut self.reader)
            .take(budget)
            .read_until(b'\n', &mut self.buf)?;
        if read == 0 {
            return Ok(false);
        }

        if self.buf.last() == Some(&b'\n') {
            self.buf.pop();
        }
        let len = drop_cr(&self.buf).len();
        self.buf.truncate(len);

        if self.buf.len() > limit {
            self.buf.clear();
            return Err(ReadError::LineTooLong { limit });
        }
        Ok(true)
    }

    fn line(&self) -> &[u8] {
        &self.buf
    }
}
