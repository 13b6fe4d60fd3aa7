//! Ordered entries with map-like access by key.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::{Display, Formatter};
use core::hash::{Hash, Hasher};
use core::str::FromStr;

use crate::entry::{Entry, PropertyEntry};
use crate::error::ParserError;
use crate::input::ByteInput;
use crate::options::{Encoding, Options};
use crate::parser::{parse_bytes, parse_reader, parse_str, EntryHandler, ParserPosition};
use crate::writer::{write_bytes, ByteOutput};
use crate::InfallibleIO;

/// Positions in `entries` of the property entries of each key, ascending.
#[cfg(feature = "std")]
type KeyIndex = std::collections::HashMap<String, Vec<usize>>;

/// Positions in `entries` of the property entries of each key, ascending.
/// Without `std` there is no default hasher.
#[cfg(not(feature = "std"))]
type KeyIndex = BTreeMap<String, Vec<usize>>;

/// A `.properties` document.
///
/// The document is a list of entries in file order. A key may occur more than once:
/// reading returns the value of its last occurrence, `set_value` changes the last occurrence
/// and `remove` removes all of them. Writing reproduces every entry that was not changed
/// exactly as it was read.
///
/// Two documents are equal if their entries are equal, comments and formatting included.
///
/// # Example
/// ```rust
/// use propfile::PropertyFile;
///
/// let mut file = PropertyFile::from_text("# comment\nkey   =   value\n");
/// file.set_value("key", "new value");
/// file.set_value("other", "x");
/// assert_eq!(file.to_string(), "# comment\nkey   =   new value\nother=x\n");
/// ```
#[derive(Debug, Clone, Default)]
pub struct PropertyFile {
    /// The document.
    entries: Vec<Entry>,
    /// Key index.
    index: KeyIndex,
}

impl PropertyFile {
    /// Creates an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: KeyIndex::new(),
        }
    }

    /// Reads a document from a byte source.
    ///
    /// # Errors
    /// if the byte source errors.
    pub fn from_reader<E>(
        source: &mut impl ByteInput<E>,
        encoding: Encoding,
    ) -> Result<Self, ParserError<E>> {
        let mut result = Self::new();
        parse_reader(source, encoding, &mut result)?;
        Ok(result)
    }

    /// Reads a document from a byte source using the encoding of the options.
    ///
    /// # Errors
    /// if the byte source errors.
    pub fn from_reader_with<E>(
        source: &mut impl ByteInput<E>,
        options: &Options,
    ) -> Result<Self, ParserError<E>> {
        Self::from_reader(source, options.encoding())
    }

    /// Reads a document from bytes.
    ///
    /// # Errors
    /// Never, the error type is `InfallibleIO`.
    pub fn from_bytes(
        bytes: impl AsRef<[u8]>,
        encoding: Encoding,
    ) -> Result<Self, ParserError<InfallibleIO>> {
        let mut result = Self::new();
        parse_bytes(bytes, encoding, &mut result)?;
        Ok(result)
    }

    /// Parses a document from text. Parsing text cannot fail.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        let mut result = Self::new();
        match parse_str(text, &mut result) {
            Ok(_) => result,
            Err(ParserError::Input { position, .. }) => {
                unreachable!("reading a str failed at {position}")
            }
        }
    }

    /// Value of the last occurrence of the key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        let &pos = self.index.get(key)?.last()?;
        self.entries[pos].as_property().map(PropertyEntry::value)
    }

    /// True if at least one property entry has this key.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Sets the value of the last occurrence of the key, keeping its formatting.
    /// Appends `key=value` if the key does not exist yet.
    pub fn set_value(&mut self, key: &str, value: impl Into<String>) {
        let Some(&pos) = self.index.get(key).and_then(|positions| positions.last()) else {
            log::trace!("appending new property {key:?}");
            self.append_entry(PropertyEntry::new(key, value));
            return;
        };

        match self.entries.get_mut(pos) {
            Some(Entry::Property(property)) => {
                log::trace!("updating property {key:?} at entry {pos}");
                property.set_value(value);
            }
            _ => unreachable!("key index does not point at a property entry"),
        }
    }

    /// Removes every occurrence of the key and returns the value of the last one.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        let positions = self.index.remove(key)?;
        log::trace!("removing {} occurrence(s) of {key:?}", positions.len());

        let previous = positions
            .last()
            .and_then(|&pos| self.entries[pos].as_property())
            .map(|property| String::from(property.value()));

        let mut removed = positions.iter().copied().peekable();
        let mut pos = 0;
        self.entries.retain(|_| {
            let keep = removed.next_if_eq(&pos).is_none();
            pos += 1;
            keep
        });

        self.reindex();
        previous
    }

    /// Appends an entry at the end of the document.
    ///
    /// If the current last line has no line break (the last line of a file without a final
    /// line break) it gets one, so the new entry starts on a line of its own.
    pub fn append_entry(&mut self, entry: impl Into<Entry>) {
        let entry = entry.into();
        if let Some(last) = self.entries.last_mut() {
            last.terminate_line();
        }

        if let Entry::Property(property) = &entry {
            self.index
                .entry(String::from(property.key()))
                .or_default()
                .push(self.entries.len());
        }

        self.entries.push(entry);
    }

    /// Removes all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
    }

    /// Keys in order of their first occurrence, each once.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().enumerate().filter_map(|(pos, entry)| {
            let key = entry.key()?;
            (self.index.get(key)?.first() == Some(&pos)).then_some(key)
        })
    }

    /// The value of every key, in the order of `keys`.
    pub fn values(&self) -> impl Iterator<Item = &str> + '_ {
        self.iter().map(|(_, value)| value)
    }

    /// Key and value of every key, in the order of `keys`.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.keys()
            .filter_map(|key| self.get(key).map(|value| (key, value)))
    }

    /// Key value pairs in the order of `keys`.
    #[must_use]
    pub fn to_vec(&self) -> Vec<(String, String)> {
        self.iter()
            .map(|(k, v)| (String::from(k), String::from(v)))
            .collect()
    }

    /// Key value pairs as a map.
    #[must_use]
    pub fn to_map(&self) -> BTreeMap<String, String> {
        self.iter()
            .map(|(k, v)| (String::from(k), String::from(v)))
            .collect()
    }

    /// Number of distinct keys.
    #[must_use]
    pub fn properties_size(&self) -> usize {
        self.index.len()
    }

    /// Number of entries, including comments and blank lines.
    #[must_use]
    pub fn entries_size(&self) -> usize {
        self.entries.len()
    }

    /// True if the document has no entries at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries in document order.
    #[must_use]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Consumes the document, returning its entries.
    #[must_use]
    pub fn into_entries(self) -> Vec<Entry> {
        self.entries
    }

    /// Writes the document in the given encoding.
    ///
    /// # Errors
    /// Propagated from the `ByteOutput`.
    pub fn write_to<E>(&self, target: &mut impl ByteOutput<E>, encoding: Encoding) -> Result<(), E> {
        write_bytes(&self.entries, target, encoding)
    }

    /// Writes the document in the encoding of the options.
    ///
    /// # Errors
    /// Propagated from the `ByteOutput`.
    pub fn write_to_with<E>(&self, target: &mut impl ByteOutput<E>, options: &Options) -> Result<(), E> {
        self.write_to(target, options.encoding())
    }

    /// Rebuilds the index from the entries.
    fn reindex(&mut self) {
        self.index.clear();
        for (pos, entry) in self.entries.iter().enumerate() {
            if let Some(key) = entry.key() {
                self.index.entry(String::from(key)).or_default().push(pos);
            }
        }
    }
}

impl PartialEq for PropertyFile {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Eq for PropertyFile {}

impl Hash for PropertyFile {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.entries.hash(state);
    }
}

/// The document text, exactly as it would be written.
impl Display for PropertyFile {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        for entry in &self.entries {
            Display::fmt(entry, f)?;
        }

        Ok(())
    }
}

impl FromStr for PropertyFile {
    type Err = ParserError<InfallibleIO>;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut result = Self::new();
        parse_str(s, &mut result)?;
        Ok(result)
    }
}

impl EntryHandler for PropertyFile {
    fn handle(&mut self, _: &ParserPosition, entry: Entry) -> bool {
        self.append_entry(entry);
        true
    }
}

impl<I: Into<Entry>> Extend<I> for PropertyFile {
    fn extend<T: IntoIterator<Item = I>>(&mut self, iter: T) {
        for entry in iter {
            self.append_entry(entry);
        }
    }
}

impl<I: Into<Entry>> FromIterator<I> for PropertyFile {
    fn from_iter<T: IntoIterator<Item = I>>(iter: T) -> Self {
        let mut result = Self::new();
        result.extend(iter);
        result
    }
}
