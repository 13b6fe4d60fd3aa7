//! Reading and writing options.

use core::fmt::{Display, Formatter};

/// Character encoding of a `.properties` file.
#[derive(Debug, Eq, PartialEq, Clone, Copy, PartialOrd, Ord, Hash, Default)]
pub enum Encoding {
    /// UTF-8, invalid input is replaced by U+FFFD.
    #[default]
    Utf8,
    /// ISO-8859-1 as used by `java.util.Properties#load(InputStream)`.
    /// Characters above U+00FF are written as `\uXXXX` escapes.
    Iso88591,
}

impl Display for Encoding {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Utf8 => f.write_str("UTF-8"),
            Self::Iso88591 => f.write_str("ISO-8859-1"),
        }
    }
}

/// Options for reading and writing a `PropertyFile`.
///
/// # Example
/// ```rust
/// use propfile::{Encoding, Options};
///
/// let options = Options::new().with(Encoding::Iso88591);
/// assert_eq!(options.encoding(), Encoding::Iso88591);
/// ```
#[derive(Debug, Eq, PartialEq, Clone, Copy, Hash, Default)]
pub struct Options {
    /// Encoding for reading and writing.
    encoding: Encoding,
}

impl Options {
    /// Options with UTF-8 encoding.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            encoding: Encoding::Utf8,
        }
    }

    /// Use the given encoding.
    #[must_use]
    pub const fn with(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// The configured encoding.
    #[must_use]
    pub const fn encoding(&self) -> Encoding {
        self.encoding
    }
}

impl From<Encoding> for Options {
    fn from(value: Encoding) -> Self {
        Self::new().with(value)
    }
}
