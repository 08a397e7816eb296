/// Default upper bound on the length of a single line, in bytes.
pub const DEFAULT_MAX_LINE_LEN: usize = 64 * 1024;

/// Configuration for reading lines out of an `io::BufRead`.
///
/// Used by [`ReadLines`](crate::ReadLines) and
/// [`Decoder::from_reader_with_options`](crate::Decoder::from_reader_with_options).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadOptions {
    /// Longest line accepted, not counting the line terminator.
    ///
    /// A longer line ends decoding with
    /// [`ReadError::LineTooLong`](crate::ReadError::LineTooLong).
    ///
    /// # Default
    ///
    /// `64 * 1024`
    pub max_line_len: usize,

    /// Capacity the line buffer is allocated with. The buffer grows on
    /// demand up to `max_line_len` and is reused across lines.
    ///
    /// # Default
    ///
    /// `4096`
    pub initial_capacity: usize,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            max_line_len: DEFAULT_MAX_LINE_LEN,
            initial_capacity: 4096,
        }
    }
}
