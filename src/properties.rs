//! Map interface in the style of `java.util.Properties` on top of a `PropertyFile`.

use alloc::boxed::Box;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt::{Display, Formatter};
use core::hash::{Hash, Hasher};

use crate::entry::{Entry, DEFAULT_LINE_ENDING};
use crate::error::{ParserError, UnsupportedOperation};
use crate::escape::unescape;
use crate::input::ByteInput;
use crate::options::Encoding;
use crate::property_file::PropertyFile;
use crate::writer::{write_bytes, ByteOutput};

/// Values longer than this are truncated by `list`.
const LIST_VALUE_LIMIT: usize = 40;

/// `java.util.Properties` look-alike that keeps the formatting of the file it was loaded from.
///
/// Lookups through `get_property` fall back to the defaults, if any.
/// Operations that compute new values through a callback are not supported,
/// the formatting of their result would be guesswork.
///
/// There is no internal locking, `&mut self` already makes mutation exclusive.
/// Wrap it in a `Mutex` to share it between threads.
///
/// # Example
/// ```rust
/// use propfile::Properties;
///
/// let mut defaults = Properties::new();
/// defaults.set_property("timeout", "30");
///
/// let mut props = Properties::with_defaults(defaults);
/// props.load_utf8(&mut "# server\nhost = example.org\n".as_bytes()).unwrap();
/// assert_eq!(props.get_property("timeout"), Some("30"));
/// assert_eq!(props.put("host", "localhost"), Some("example.org".to_string()));
///
/// let mut out: Vec<u8> = Vec::new();
/// props.store_utf8(&mut out, None).unwrap();
/// assert_eq!(out, b"# server\nhost = localhost\n");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Properties {
    /// The document.
    file: PropertyFile,
    /// Fallback for `get_property`.
    defaults: Option<Box<Properties>>,
}

impl Properties {
    /// Empty properties without defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            file: PropertyFile::new(),
            defaults: None,
        }
    }

    /// Empty properties with defaults.
    #[must_use]
    pub fn with_defaults(defaults: Self) -> Self {
        Self {
            file: PropertyFile::new(),
            defaults: Some(Box::new(defaults)),
        }
    }

    /// Wraps an existing document.
    #[must_use]
    pub const fn from_property_file(file: PropertyFile) -> Self {
        Self {
            file,
            defaults: None,
        }
    }

    /// The wrapped document.
    #[must_use]
    pub const fn property_file(&self) -> &PropertyFile {
        &self.file
    }

    /// Unwraps the document.
    #[must_use]
    pub fn into_property_file(self) -> PropertyFile {
        self.file
    }

    /// The defaults.
    #[must_use]
    pub fn defaults(&self) -> Option<&Self> {
        self.defaults.as_deref()
    }

    /// Replaces the content with a document read as ISO-8859-1, like `java.util.Properties#load(InputStream)`.
    ///
    /// # Errors
    /// if the byte source errors, the content is left unchanged.
    pub fn load<E>(&mut self, source: &mut impl ByteInput<E>) -> Result<(), ParserError<E>> {
        self.file = PropertyFile::from_reader(source, Encoding::Iso88591)?;
        Ok(())
    }

    /// Replaces the content with a document read as UTF-8.
    ///
    /// # Errors
    /// if the byte source errors, the content is left unchanged.
    pub fn load_utf8<E>(&mut self, source: &mut impl ByteInput<E>) -> Result<(), ParserError<E>> {
        self.file = PropertyFile::from_reader(source, Encoding::Utf8)?;
        Ok(())
    }

    /// Value of the key, without looking at the defaults.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.file.get(key)
    }

    /// Value of the key or `default`, without looking at the defaults.
    #[must_use]
    pub fn get_or_default<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.file.get(key).unwrap_or(default)
    }

    /// Value of the key, falling back to the defaults.
    #[must_use]
    pub fn get_property(&self, key: &str) -> Option<&str> {
        self.file
            .get(key)
            .or_else(|| self.defaults.as_ref()?.get_property(key))
    }

    /// Value of the key, falling back to the defaults and then to `default`.
    #[must_use]
    pub fn get_property_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get_property(key).unwrap_or(default)
    }

    /// Sets the value, returns the previous one.
    pub fn put(&mut self, key: &str, value: impl Into<String>) -> Option<String> {
        let previous = self.file.get(key).map(String::from);
        self.file.set_value(key, value);
        previous
    }

    /// Same as `put`.
    pub fn set_property(&mut self, key: &str, value: impl Into<String>) -> Option<String> {
        self.put(key, value)
    }

    /// Sets all pairs in order.
    pub fn put_all<K: AsRef<str>, V: Into<String>>(&mut self, pairs: impl IntoIterator<Item = (K, V)>) {
        for (key, value) in pairs {
            self.file.set_value(key.as_ref(), value);
        }
    }

    /// Sets the value only if the key has none. Returns the existing value.
    pub fn put_if_absent(&mut self, key: &str, value: impl Into<String>) -> Option<String> {
        if let Some(existing) = self.file.get(key) {
            return Some(String::from(existing));
        }

        self.file.set_value(key, value);
        None
    }

    /// Sets the value only if the key exists. Returns the previous value.
    pub fn replace(&mut self, key: &str, value: impl Into<String>) -> Option<String> {
        if !self.file.contains_key(key) {
            return None;
        }

        self.put(key, value)
    }

    /// Sets the value only if the current value is `old`.
    pub fn replace_if_equal(&mut self, key: &str, old: &str, new: impl Into<String>) -> bool {
        if self.file.get(key) != Some(old) {
            return false;
        }

        self.file.set_value(key, new);
        true
    }

    /// Removes all occurrences of the key, returns the previous value.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.file.remove(key)
    }

    /// Removes the key only if its value is `value`.
    pub fn remove_if_equal(&mut self, key: &str, value: &str) -> bool {
        if self.file.get(key) != Some(value) {
            return false;
        }

        self.file.remove(key);
        true
    }

    /// True if the key has a value, defaults not considered.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.file.contains_key(key)
    }

    /// True if any key has this value, defaults not considered.
    #[must_use]
    pub fn contains_value(&self, value: &str) -> bool {
        self.file.values().any(|v| v == value)
    }

    /// Number of distinct keys, defaults not considered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.file.properties_size()
    }

    /// True if there are no keys, comments and defaults not considered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.file.properties_size() == 0
    }

    /// Keys in order of first occurrence.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.file.keys()
    }

    /// Values in the order of `keys`.
    pub fn values(&self) -> impl Iterator<Item = &str> + '_ {
        self.file.values()
    }

    /// Key value pairs in the order of `keys`.
    pub fn entry_set(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.file.iter()
    }

    /// Calls `action` for every key value pair.
    pub fn for_each(&self, mut action: impl FnMut(&str, &str)) {
        for (key, value) in self.file.iter() {
            action(key, value);
        }
    }

    /// Keys of the defaults followed by the own keys, each once.
    #[must_use]
    pub fn string_property_names(&self) -> Vec<&str> {
        let mut names = self
            .defaults
            .as_deref()
            .map(Self::string_property_names)
            .unwrap_or_default();

        for key in self.file.keys() {
            if !names.contains(&key) {
                names.push(key);
            }
        }

        names
    }

    /// Removes everything, comments included. The defaults are kept.
    pub fn clear(&mut self) {
        self.file.clear();
    }

    /// Prints the defaults overlaid with the own properties, long values truncated.
    ///
    /// # Errors
    /// Propagated from the output.
    pub fn list(&self, out: &mut impl core::fmt::Write) -> core::fmt::Result {
        out.write_str("-- listing properties --\n")?;

        let mut listing: Vec<(&str, &str)> = self
            .defaults
            .as_ref()
            .map(|defaults| defaults.file.iter().collect())
            .unwrap_or_default();

        for (key, value) in self.file.iter() {
            match listing.iter_mut().find(|(k, _)| *k == key) {
                Some(existing) => existing.1 = value,
                None => listing.push((key, value)),
            }
        }

        for (key, value) in listing {
            if value.chars().count() > LIST_VALUE_LIMIT {
                let cut: String = value.chars().take(LIST_VALUE_LIMIT - 3).collect();
                writeln!(out, "{key}={cut}...")?;
            } else {
                writeln!(out, "{key}={value}")?;
            }
        }

        Ok(())
    }

    /// Writes the document as ISO-8859-1, preceded by `comments` as comment lines.
    ///
    /// # Errors
    /// Propagated from the `ByteOutput`.
    pub fn store<E>(&self, out: &mut impl ByteOutput<E>, comments: Option<&str>) -> Result<(), E> {
        self.store_with(out, comments, Encoding::Iso88591)
    }

    /// Writes the document as UTF-8, preceded by `comments` as comment lines.
    ///
    /// # Errors
    /// Propagated from the `ByteOutput`.
    pub fn store_utf8<E>(&self, out: &mut impl ByteOutput<E>, comments: Option<&str>) -> Result<(), E> {
        self.store_with(out, comments, Encoding::Utf8)
    }

    /// Writes the header comment and the document.
    fn store_with<E>(
        &self,
        out: &mut impl ByteOutput<E>,
        comments: Option<&str>,
        encoding: Encoding,
    ) -> Result<(), E> {
        let header = comments.map(comment_lines).unwrap_or_default();
        write_bytes(header.iter().chain(self.file.entries()), out, encoding)
    }

    /// Not supported, the formatting of the result would be guesswork.
    ///
    /// # Errors
    /// Always.
    #[allow(clippy::needless_pass_by_value, clippy::unused_self)]
    pub fn compute(
        &mut self,
        _: &str,
        _: impl FnOnce(&str, Option<&str>) -> Option<String>,
    ) -> Result<Option<String>, UnsupportedOperation> {
        Err(UnsupportedOperation {
            operation: "compute",
        })
    }

    /// Not supported, the formatting of the result would be guesswork.
    ///
    /// # Errors
    /// Always.
    #[allow(clippy::needless_pass_by_value, clippy::unused_self)]
    pub fn compute_if_present(
        &mut self,
        _: &str,
        _: impl FnOnce(&str, &str) -> Option<String>,
    ) -> Result<Option<String>, UnsupportedOperation> {
        Err(UnsupportedOperation {
            operation: "compute_if_present",
        })
    }

    /// Not supported, the formatting of the result would be guesswork.
    ///
    /// # Errors
    /// Always.
    #[allow(clippy::needless_pass_by_value, clippy::unused_self)]
    pub fn compute_if_absent(
        &mut self,
        _: &str,
        _: impl FnOnce(&str) -> Option<String>,
    ) -> Result<Option<String>, UnsupportedOperation> {
        Err(UnsupportedOperation {
            operation: "compute_if_absent",
        })
    }

    /// Not supported, the formatting of the result would be guesswork.
    ///
    /// # Errors
    /// Always.
    #[allow(clippy::needless_pass_by_value, clippy::unused_self)]
    pub fn merge(
        &mut self,
        _: &str,
        _: &str,
        _: impl FnOnce(&str, &str) -> Option<String>,
    ) -> Result<Option<String>, UnsupportedOperation> {
        Err(UnsupportedOperation {
            operation: "merge",
        })
    }

    /// Not supported, the formatting of the result would be guesswork.
    ///
    /// # Errors
    /// Always.
    #[allow(clippy::needless_pass_by_value, clippy::unused_self)]
    pub fn replace_all(
        &mut self,
        _: impl FnMut(&str, &str) -> String,
    ) -> Result<(), UnsupportedOperation> {
        Err(UnsupportedOperation {
            operation: "replace_all",
        })
    }
}

/// Turns free text into comment lines, each starting with `#` unless it already starts with `#` or `!`.
fn comment_lines(comments: &str) -> Vec<Entry> {
    comments
        .lines()
        .map(|line| {
            let mut text = String::with_capacity(line.len() + 2);
            if !line.starts_with('#') && !line.starts_with('!') {
                text.push('#');
            }
            text.push_str(line);
            text.push_str(DEFAULT_LINE_ENDING);
            Entry::Verbatim(text)
        })
        .collect()
}

impl From<PropertyFile> for Properties {
    fn from(value: PropertyFile) -> Self {
        Self::from_property_file(value)
    }
}

/// Equal if the documents are equal, defaults are not compared.
impl PartialEq for Properties {
    fn eq(&self, other: &Self) -> bool {
        self.file == other.file
    }
}

impl Eq for Properties {}

impl Hash for Properties {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.file.hash(state);
    }
}

/// Every entry decoded on its own line, enclosed in braces.
impl Display for Properties {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.write_str("{")?;
        if !self.file.is_empty() {
            f.write_str("\n")?;
        }

        for entry in self.file.entries() {
            let text = entry.to_string();
            let content = &text[..text.len() - entry.line_ending().len()];
            f.write_str(&unescape(content))?;
            f.write_str("\n")?;
        }

        f.write_str("}")
    }
}
