//! The structural units of a `.properties` document.

use alloc::string::String;
use core::fmt::{Display, Formatter};

use crate::escape::{ends_with_odd_backslashes, escape_key, escape_value, is_whitespace, unescape};

/// Line ending used for entries that are created programmatically.
pub const DEFAULT_LINE_ENDING: &str = "\n";

/// Separator used for entries that are created programmatically.
pub const DEFAULT_SEPARATOR: &str = "=";

/// Element in a .properties file.
#[derive(Debug, Eq, PartialEq, Clone, PartialOrd, Ord, Hash)]
pub enum Entry {
    /// Comment line, blank line or any other line that is reproduced exactly as read.
    /// Contains the line terminator.
    Verbatim(String),
    /// A key value pair.
    Property(PropertyEntry),
}

impl Entry {
    /// Creates a verbatim entry.
    #[must_use]
    pub fn verbatim(text: impl Into<String>) -> Self {
        Self::Verbatim(text.into())
    }

    /// Logical key of a property entry, None for verbatim entries.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::Verbatim(_) => None,
            Self::Property(property) => Some(property.key()),
        }
    }

    /// Returns the property entry, None for verbatim entries.
    #[must_use]
    pub const fn as_property(&self) -> Option<&PropertyEntry> {
        match self {
            Self::Verbatim(_) => None,
            Self::Property(property) => Some(property),
        }
    }

    /// The line terminator of this entry.
    #[must_use]
    pub fn line_ending(&self) -> &str {
        match self {
            Self::Verbatim(text) => {
                let content = text.trim_end_matches(['\r', '\n']);
                &text[content.len()..]
            }
            Self::Property(property) => property.line_ending(),
        }
    }

    /// Gives an entry without line terminator the default one.
    /// A verbatim key value line that ends in a backslash would swallow the next line,
    /// it is closed with an empty line instead.
    pub(crate) fn terminate_line(&mut self) {
        match self {
            Self::Property(property) => {
                if property.line_ending.is_empty() {
                    property.line_ending = String::from(DEFAULT_LINE_ENDING);
                }
            }
            Self::Verbatim(text) => {
                if text.is_empty() || text.ends_with(['\r', '\n']) {
                    return;
                }

                let is_comment = text.trim_start_matches(is_whitespace).starts_with(['#', '!']);
                let continues = !is_comment && ends_with_odd_backslashes(text);
                text.push_str(DEFAULT_LINE_ENDING);
                if continues {
                    text.push_str(DEFAULT_LINE_ENDING);
                }
            }
        }
    }
}

impl From<PropertyEntry> for Entry {
    fn from(value: PropertyEntry) -> Self {
        Self::Property(value)
    }
}

/// useful for iter over `Vec<(String, String)>` or its refs.
impl<K: AsRef<str>, V: AsRef<str>> From<(K, V)> for Entry {
    fn from(value: (K, V)) -> Self {
        Self::Property(PropertyEntry::new(value.0.as_ref(), value.1.as_ref()))
    }
}

impl<K: AsRef<str>, V: AsRef<str>> From<&(K, V)> for Entry {
    fn from(value: &(K, V)) -> Self {
        Self::Property(PropertyEntry::new(value.0.as_ref(), value.1.as_ref()))
    }
}

/// useful for iter over `&Vec<Entry>`
impl From<&Self> for Entry {
    fn from(value: &Self) -> Self {
        value.clone()
    }
}

/// Writes the entry exactly as it appears in the document.
impl Display for Entry {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Verbatim(text) => f.write_str(text),
            Self::Property(property) => Display::fmt(property, f),
        }
    }
}

/// A key value line.
///
/// Key and value are kept twice: as they are written in the document (raw, possibly spanning
/// multiple physical lines) and decoded. The document is always written from the raw text,
/// so a parsed entry that is not modified is reproduced exactly.
#[derive(Debug, Eq, PartialEq, Clone, PartialOrd, Ord, Hash)]
pub struct PropertyEntry {
    /// Whitespace before the key.
    leading_whitespace: String,
    /// Escaped key.
    raw_key: String,
    /// Decoded key.
    key: String,
    /// Everything between key and value.
    separator: String,
    /// Escaped value.
    raw_value: String,
    /// Decoded value.
    value: String,
    /// `\n`, `\r\n`, `\r` or nothing.
    line_ending: String,
}

impl PropertyEntry {
    /// Creates `key=value\n`, escaping key and value as needed.
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let value = value.into();
        Self {
            leading_whitespace: String::new(),
            raw_key: escape_key(&key),
            key,
            separator: String::from(DEFAULT_SEPARATOR),
            raw_value: escape_value(&value),
            value,
            line_ending: String::from(DEFAULT_LINE_ENDING),
        }
    }

    /// Creates an entry from the text of its parts as they appear in a document.
    /// Key and value are decoded leniently.
    #[must_use]
    pub fn from_raw(
        leading_whitespace: impl Into<String>,
        raw_key: impl Into<String>,
        separator: impl Into<String>,
        raw_value: impl Into<String>,
        line_ending: impl Into<String>,
    ) -> Self {
        let raw_key = raw_key.into();
        let raw_value = raw_value.into();
        Self {
            leading_whitespace: leading_whitespace.into(),
            key: unescape(&raw_key),
            raw_key,
            separator: separator.into(),
            value: unescape(&raw_value),
            raw_value,
            line_ending: line_ending.into(),
        }
    }

    /// Parts that are already decoded, used by the parser which has checked the escapes.
    pub(crate) fn from_parts(
        leading_whitespace: String,
        (raw_key, key): (String, String),
        separator: String,
        (raw_value, value): (String, String),
        line_ending: String,
    ) -> Self {
        Self {
            leading_whitespace,
            raw_key,
            key,
            separator,
            raw_value,
            value,
            line_ending,
        }
    }

    /// Decoded key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Decoded value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// The key as written in the document.
    #[must_use]
    pub fn raw_key(&self) -> &str {
        &self.raw_key
    }

    /// The value as written in the document, including line continuations.
    #[must_use]
    pub fn raw_value(&self) -> &str {
        &self.raw_value
    }

    /// Whitespace before the key.
    #[must_use]
    pub fn leading_whitespace(&self) -> &str {
        &self.leading_whitespace
    }

    /// Text between key and value, for example `=`, ` : ` or a single space.
    #[must_use]
    pub fn separator(&self) -> &str {
        &self.separator
    }

    /// The line terminator, empty for the last line of a document without a final line break.
    #[must_use]
    pub fn line_ending(&self) -> &str {
        &self.line_ending
    }

    /// Replaces the value, all other parts of the line stay as they are.
    /// A key-only line gets the default separator, the value would run into the key otherwise.
    /// The last line of a document that ends in a line continuation keeps that line break
    /// as its line ending.
    pub fn set_value(&mut self, value: impl Into<String>) {
        let value = value.into();
        if self.separator.is_empty() && !value.is_empty() {
            self.separator = String::from(DEFAULT_SEPARATOR);
        }

        if self.line_ending.is_empty() {
            let continued = if self.raw_value.is_empty() {
                &self.separator
            } else {
                &self.raw_value
            };

            if let Some(line_break) = trailing_line_break(continued) {
                self.line_ending = String::from(line_break);
            }
        }

        self.raw_value = escape_value(&value);
        self.value = value;
    }

    /// Replaces the whitespace before the key.
    pub fn set_leading_whitespace(&mut self, leading_whitespace: impl Into<String>) {
        self.leading_whitespace = leading_whitespace.into();
    }

    /// Replaces the separator text.
    pub fn set_separator(&mut self, separator: impl Into<String>) {
        self.separator = separator.into();
    }

    /// Replaces the line terminator.
    pub fn set_line_ending(&mut self, line_ending: impl Into<String>) {
        self.line_ending = line_ending.into();
    }

    /// Builder variant of `set_leading_whitespace`.
    #[must_use]
    pub fn with_leading_whitespace(mut self, leading_whitespace: impl Into<String>) -> Self {
        self.set_leading_whitespace(leading_whitespace);
        self
    }

    /// Builder variant of `set_separator`.
    #[must_use]
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.set_separator(separator);
        self
    }

    /// Builder variant of `set_line_ending`.
    #[must_use]
    pub fn with_line_ending(mut self, line_ending: impl Into<String>) -> Self {
        self.set_line_ending(line_ending);
        self
    }
}

/// The line break of a line continuation at the very end of `raw`, only whitespace may follow it.
fn trailing_line_break(raw: &str) -> Option<&'static str> {
    let content = raw.trim_end_matches(is_whitespace);
    ["\r\n", "\n", "\r"]
        .into_iter()
        .find(|&line_break| content.ends_with(line_break))
}

impl Display for PropertyEntry {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.leading_whitespace)?;
        f.write_str(&self.raw_key)?;
        f.write_str(&self.separator)?;
        f.write_str(&self.raw_value)?;
        f.write_str(&self.line_ending)
    }
}
