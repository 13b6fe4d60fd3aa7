//! Serialization of entries back into `.properties` text.
//!
//! The writer does not reformat anything. Each entry is written exactly as it is stored,
//! the only change being `\uXXXX` escapes for characters the output encoding cannot represent.

use core::borrow::Borrow;
use core::marker::PhantomData;

use alloc::string::String;
use alloc::vec::Vec;

use crate::entry::Entry;
use crate::options::Encoding;
use crate::InfallibleIO;

/// Character-based output trait, used by `write`.
pub trait CharacterOutput<E> {
    /// Write a single character to the character output
    ///
    /// # Errors
    /// IO Errors
    fn write(&mut self, data: char) -> Result<(), E>;

    /// Determines if a character can be written as is or needs to be Unicode escaped.
    /// Characters used by the `\uXXXX` escape itself (`\`, `u`, `0-9`, `A-F`) must always be writable.
    fn can_write(&mut self, data: char) -> bool;
}

impl CharacterOutput<InfallibleIO> for String {
    fn write(&mut self, data: char) -> Result<(), InfallibleIO> {
        self.push(data);
        Ok(())
    }

    fn can_write(&mut self, _: char) -> bool {
        true
    }
}

impl CharacterOutput<InfallibleIO> for &mut Vec<char> {
    fn write(&mut self, data: char) -> Result<(), InfallibleIO> {
        self.push(data);
        Ok(())
    }

    fn can_write(&mut self, _: char) -> bool {
        true
    }
}

/// Byte-based output trait (Poor man's `std::io::Write`)
pub trait ByteOutput<E> {
    /// Write a single byte to the output
    ///
    /// # Errors
    /// Some sort of IO Error
    fn write(&mut self, data: u8) -> Result<(), E>;
}

#[cfg(feature = "std")]
impl<T: std::io::Write> ByteOutput<std::io::Error> for T {
    fn write(&mut self, data: u8) -> Result<(), std::io::Error> {
        self.write_all(&[data])
    }
}

impl ByteOutput<InfallibleIO> for &mut Vec<u8> {
    fn write(&mut self, data: u8) -> Result<(), InfallibleIO> {
        self.push(data);
        Ok(())
    }
}

/// UTF-8 character output
struct Utf8Out<'a, T: ByteOutput<E>, E>(&'a mut T, PhantomData<E>);

impl<T: ByteOutput<E>, E> CharacterOutput<E> for Utf8Out<'_, T, E> {
    fn write(&mut self, data: char) -> Result<(), E> {
        let mut buf = [0u8; 4];
        let str = data.encode_utf8(&mut buf);
        for n in str.bytes() {
            self.0.write(n)?;
        }

        Ok(())
    }

    fn can_write(&mut self, _: char) -> bool {
        true
    }
}

/// ISO-8859-1 character output
struct Iso88591Out<'a, T: ByteOutput<E>, E>(&'a mut T, PhantomData<E>);

impl<T: ByteOutput<E>, E> CharacterOutput<E> for Iso88591Out<'_, T, E> {
    fn write(&mut self, data: char) -> Result<(), E> {
        match u8::try_from(data) {
            Ok(byte) => self.0.write(byte),
            Err(_) => self.0.write(b'?'),
        }
    }

    fn can_write(&mut self, data: char) -> bool {
        u8::try_from(data).is_ok()
    }
}

/// Emits the 6-character sequence (\uXXXX, XXXX being HEX) needed to escape a single char.
/// For characters that need 2 utf-16 escape sequences (surrogates), it emits 12 characters.
/// If the backslash was already written (`\€` in the text), the first one is left out.
fn escape_unicode<E>(
    target: &mut impl CharacterOutput<E>,
    c: char,
    mut after_backslash: bool,
) -> Result<(), E> {
    static LUT: [char; 16] = [
        '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'A', 'B', 'C', 'D', 'E', 'F',
    ];

    let mut buf = [0; 2];
    let bf = c.encode_utf16(&mut buf);
    for n in bf {
        let n = *n;
        if !after_backslash {
            target.write('\\')?;
        }
        after_backslash = false;
        target.write('u')?;
        target.write(LUT[((n >> 12) & 0xF) as usize])?;
        target.write(LUT[((n >> 8) & 0xF) as usize])?;
        target.write(LUT[((n >> 4) & 0xF) as usize])?;
        target.write(LUT[((n) & 0xF) as usize])?;
    }

    Ok(())
}

/// Writes text, escaping what the target cannot represent.
fn write_text<E>(target: &mut impl CharacterOutput<E>, text: &str) -> Result<(), E> {
    //Length of the run of backslashes written right before the current char.
    let mut backslashes = 0usize;
    for c in text.chars() {
        if target.can_write(c) {
            target.write(c)?;
            backslashes = if c == '\\' { backslashes + 1 } else { 0 };
            continue;
        }

        //For a comment line the parser will not unmangle this.
        //However, I prefer this over emitting a fallback char such as '?'.
        escape_unicode(target, c, backslashes % 2 == 1)?;
        backslashes = 0;
    }

    Ok(())
}

/// Serialize entries into some sort of character-based output.
///
/// Verbatim entries are written as stored. Property entries are written as
/// leading whitespace, key, separator, value and line ending, key and value in their
/// escaped form. Nothing is reordered or reformatted.
///
/// Provided implementations for `CharacterOutput`:
/// * String
/// * &mut Vec<char>
///
/// # Errors
/// Propagated from the `CharacterOutput`. The output then contains the entries written
/// before the error, and possibly a part of the entry that failed.
///
/// # Example
/// ```rust
/// use propfile::{Entry, PropertyEntry};
///
/// let entries = vec![
///     Entry::verbatim("# greeting\n"),
///     Entry::from(PropertyEntry::new("hello world", "hi")),
/// ];
///
/// let mut output = String::new();
/// propfile::write(&entries, &mut output).unwrap();
/// assert_eq!(output, "# greeting\nhello\\ world=hi\n");
/// ```
pub fn write<E, I: Borrow<Entry>>(
    source: impl IntoIterator<Item = I>,
    target: &mut impl CharacterOutput<E>,
) -> Result<(), E> {
    for entry in source {
        match entry.borrow() {
            Entry::Verbatim(text) => write_text(target, text)?,
            Entry::Property(property) => {
                write_text(target, property.leading_whitespace())?;
                write_text(target, property.raw_key())?;
                write_text(target, property.separator())?;
                write_text(target, property.raw_value())?;
                write_text(target, property.line_ending())?;
            }
        }
    }

    Ok(())
}

/// Serialize entries into a byte-based output as UTF-8.
///
/// Provided implementations for `ByteOutput`:
/// * `&mut Vec<u8>`
/// * `&mut T where T: std::io::Write` (for example &mut File)
///
/// # Errors
/// Propagated from `ByteOutput`
pub fn write_utf8<E, I: Borrow<Entry>>(
    source: impl IntoIterator<Item = I>,
    target: &mut impl ByteOutput<E>,
) -> Result<(), E> {
    write(source, &mut Utf8Out(target, PhantomData))
}

/// Serialize entries into a byte-based output as ISO-8859-1.
///
/// Characters above U+00FF are written as `\uXXXX` escapes.
///
/// # Errors
/// Propagated from `ByteOutput`
pub fn write_iso_8859_1<E, I: Borrow<Entry>>(
    source: impl IntoIterator<Item = I>,
    target: &mut impl ByteOutput<E>,
) -> Result<(), E> {
    write(source, &mut Iso88591Out(target, PhantomData))
}

/// Serialize entries into a byte-based output in the given encoding.
///
/// # Errors
/// Propagated from `ByteOutput`
pub fn write_bytes<E, I: Borrow<Entry>>(
    source: impl IntoIterator<Item = I>,
    target: &mut impl ByteOutput<E>,
    encoding: Encoding,
) -> Result<(), E> {
    match encoding {
        Encoding::Utf8 => write_utf8(source, target),
        Encoding::Iso88591 => write_iso_8859_1(source, target),
    }
}
