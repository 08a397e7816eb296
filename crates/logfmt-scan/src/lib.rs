//! A zero-copy decoder for logfmt, one record at a time.
//!
//! logfmt is a line-oriented `key=value` encoding:
//!
//! ```text
//! level=info msg="request done" path=/api status=200 cached
//! ```
//!
//! Each line is a record of whitespace-separated pairs. A value is either
//! bare or double-quoted with backslash escapes; a key with no `=` is a flag.
//! [`Decoder`] scans records pulled from a [`LineSource`] and hands out keys
//! and values as [`BStr`](bstr::BStr) views into the current line.
//!
//! ```
//! use logfmt_scan::{DecodeError, Decoder, Keyval};
//!
//! let mut dec = Decoder::from_slice(b"a=1 b=\"x y\"\nc=\"oops\n");
//! let mut keys = Vec::new();
//! while dec.next_record() {
//!     while let Keyval::Pair(pair) = dec.next_keyval() {
//!         keys.push(pair.key.to_string());
//!     }
//! }
//! assert_eq!(keys, ["a", "b"]);
//!
//! // `next_record` returning false is normal completion unless `err` is set.
//! let err = dec.err().and_then(DecodeError::as_syntax).unwrap();
//! assert_eq!(
//!     err.to_string(),
//!     "logfmt syntax error at pos 8 on line 2: unterminated quoted value"
//! );
//! ```

#![no_std]
extern crate alloc;

#[cfg(any(test, feature = "std"))]
extern crate std;

mod decoder;
mod error;
mod options;
mod source;

#[cfg(test)]
mod tests;

pub use decoder::{Decoder, DecoderState, Keyval, Pair};
#[cfg(feature = "std")]
pub use error::ReadError;
pub use error::{DecodeError, SyntaxError, SyntaxErrorKind};
pub use options::{DEFAULT_MAX_LINE_LEN, ReadOptions};
#[cfg(feature = "std")]
pub use source::ReadLines;
pub use source::{LineSource, SliceLines};
