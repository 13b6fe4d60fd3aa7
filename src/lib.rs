//! # propfile
//! no-std, format preserving model of java `.properties` files.
//!
//! A [`PropertyFile`] is the ordered list of [`Entry`]s of a document: comment and blank
//! lines are kept verbatim, key value lines keep their leading whitespace, separator, escaped
//! key and value and line ending as separate parts. Values can be read and changed by key,
//! and writing the document reproduces every part that was not changed byte for byte.
//!
//! ```rust
//! use propfile::{Encoding, PropertyFile};
//!
//! let input = b"# Database\r\ndb.host   : example.org\r\ndb.user = admin\r\n";
//! let mut file = PropertyFile::from_bytes(input, Encoding::Iso88591).unwrap();
//! file.set_value("db.host", "localhost");
//!
//! let mut output: Vec<u8> = Vec::new();
//! file.write_to(&mut output, Encoding::Iso88591).unwrap();
//! assert_eq!(output, b"# Database\r\ndb.host   : localhost\r\ndb.user = admin\r\n");
//! ```
#![no_std]
#![deny(
    clippy::correctness,
    clippy::perf,
    clippy::complexity,
    clippy::style,
    clippy::nursery,
    clippy::pedantic,
    clippy::clone_on_ref_ptr,
    clippy::decimal_literal_representation,
    clippy::float_cmp_const,
    clippy::missing_docs_in_private_items,
    clippy::multiple_inherent_impl,
    clippy::unwrap_used,
    clippy::cargo_common_metadata,
    clippy::used_underscore_binding
)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::missing_docs_in_private_items))]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

use core::fmt::{Display, Formatter};

mod entry;
mod error;
mod escape;
mod input;
mod options;
mod parser;
mod properties;
mod property_file;
mod writer;

pub use entry::{Entry, PropertyEntry, DEFAULT_LINE_ENDING, DEFAULT_SEPARATOR};
pub use error::{EscapeError, ParserError, UnsupportedOperation};
pub use escape::{escape_key, escape_value, unescape, unescape_checked};
pub use input::{ByteInput, CharacterInput};
pub use options::{Encoding, Options};
pub use parser::{parse, parse_bytes, parse_reader, parse_str, EntryHandler, ParserPosition};
pub use properties::Properties;
pub use property_file::PropertyFile;
pub use writer::{
    write, write_bytes, write_iso_8859_1, write_utf8, ByteOutput, CharacterOutput,
};

/// Marker struct for I/O which cannot fail.
/// Any Result or Enum variant that contains this type is unreachable.
///
/// It is, for example, used if the source or output is memory,
/// because reading/writing from/to memory cannot fail without panicking or crashing.
#[derive(Debug, Eq, PartialEq, Clone, Copy, PartialOrd, Ord, Hash, Default)]
pub struct InfallibleIO;

impl Display for InfallibleIO {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.write_str("InfallibleIO")
    }
}

impl core::error::Error for InfallibleIO {}
