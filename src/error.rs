//! Error types.
//!
//! Parsing only fails when the byte source fails. Everything the parser does not
//! understand is kept as a verbatim entry instead.

use crate::parser::ParserPosition;

/// Error returned by the parser.
#[derive(Debug, Eq, PartialEq, Clone, Copy, PartialOrd, Ord, Hash, thiserror::Error)]
pub enum ParserError<E> {
    /// Input io error E occurred.
    #[error("input error at {position}: {error}")]
    Input {
        /// Position of the last character that was read successfully.
        position: ParserPosition,
        /// Error of the byte source.
        error: E,
    },
}

impl<E> ParserError<E> {
    /// Position at which the parser stopped.
    pub const fn position(&self) -> ParserPosition {
        match self {
            Self::Input { position, .. } => *position,
        }
    }

    /// Unwraps the error of the byte source.
    pub fn into_source(self) -> E {
        match self {
            Self::Input { error, .. } => error,
        }
    }
}

#[cfg(feature = "std")]
impl From<ParserError<std::io::Error>> for std::io::Error {
    fn from(value: ParserError<std::io::Error>) -> Self {
        value.into_source()
    }
}

/// A raw key or value that cannot be unescaped exactly.
///
/// Offsets are byte offsets into the raw text.
#[derive(Debug, Eq, PartialEq, Clone, Copy, PartialOrd, Ord, Hash, thiserror::Error)]
pub enum EscapeError {
    /// The text ends with a single backslash.
    #[error("dangling backslash at offset {offset}")]
    DanglingBackslash {
        /// Offset of the backslash.
        offset: usize,
    },
    /// `\u` is not followed by four hexadecimal digits.
    #[error("malformed \\uXXXX escape at offset {offset}")]
    MalformedUnicode {
        /// Offset of the backslash.
        offset: usize,
    },
    /// A `\uXXXX` escape is a utf-16 surrogate without its other half.
    #[error("unpaired utf-16 surrogate {unit:#06X} at offset {offset}")]
    UnpairedSurrogate {
        /// Offset of the backslash.
        offset: usize,
        /// The surrogate code unit.
        unit: u16,
    },
}

/// Returned by map operations that would have to guess how the result is formatted.
#[derive(Debug, Eq, PartialEq, Clone, Copy, PartialOrd, Ord, Hash, thiserror::Error)]
#[error("operation `{operation}` is not supported on a format preserving property file")]
pub struct UnsupportedOperation {
    /// Name of the rejected operation.
    pub operation: &'static str,
}
