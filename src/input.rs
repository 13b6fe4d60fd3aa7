//! Byte and character sources for the parser.

use core::marker::PhantomData;

use crate::InfallibleIO;

/// Source of characters for the parser.
pub trait CharacterInput<E> {
    /// Read the next character from some input source
    ///
    /// # Return values
    /// 1. Ok(None) to signal EOF.
    /// 2. Ok(Some) to give the next to the parser.
    /// 3. Err is passed as is to the caller.
    /// # Errors
    /// Presumably IO Errors
    ///
    fn next_character(&mut self) -> Result<Option<char>, E>;
}

/// Source of bytes, decoded into characters by one of the `Encoding`s.
pub trait ByteInput<E> {
    /// Read the next byte from the stream or return None on eof.
    /// # Errors
    /// Presumably IO Errors.
    fn next_byte(&mut self) -> Result<Option<u8>, E>;
}

impl<T: Iterator<Item = char>> CharacterInput<InfallibleIO> for T {
    fn next_character(&mut self) -> Result<Option<char>, InfallibleIO> {
        Ok(self.next())
    }
}

#[cfg(feature = "std")]
impl<T: std::io::Read> ByteInput<std::io::Error> for T {
    fn next_byte(&mut self) -> Result<Option<u8>, std::io::Error> {
        let mut buf = [0u8; 1];
        loop {
            match self.read(&mut buf) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(buf[0])),
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        }
    }
}

/// Input for a slice, tracks read position.
/// basically low budget `std::io::Cursor`
pub(crate) struct SliceInput<'a>(pub(crate) &'a [u8], pub(crate) usize);

impl ByteInput<InfallibleIO> for SliceInput<'_> {
    fn next_byte(&mut self) -> Result<Option<u8>, InfallibleIO> {
        let Some(&r) = self.0.get(self.1) else {
            return Ok(None);
        };

        self.1 += 1;
        Ok(Some(r))
    }
}

/// UTF-8 character input.
///
/// Invalid sequences are replaced by U+FFFD, like `String::from_utf8_lossy` does.
/// The byte that ended an incomplete sequence is kept for the next call.
pub(crate) struct Utf8Input<'a, T: ByteInput<E>, E> {
    /// Byte source.
    source: &'a mut T,
    /// Byte that was read but not yet decoded.
    pending: Option<u8>,
    /// Marker for the error type.
    error: PhantomData<E>,
}

impl<'a, T: ByteInput<E>, E> Utf8Input<'a, T, E> {
    /// Decode the bytes of `source`.
    pub(crate) fn new(source: &'a mut T) -> Self {
        Self {
            source,
            pending: None,
            error: PhantomData,
        }
    }

    /// Next byte, either the pending one or a fresh one from the source.
    fn next_byte(&mut self) -> Result<Option<u8>, E> {
        if let Some(pending) = self.pending.take() {
            return Ok(Some(pending));
        }

        self.source.next_byte()
    }
}

impl<T: ByteInput<E>, E> CharacterInput<E> for Utf8Input<'_, T, E> {
    fn next_character(&mut self) -> Result<Option<char>, E> {
        let mut buf = [0u8; 4];

        buf[0] = match self.next_byte()? {
            None => return Ok(None), //EOF
            Some(d) => d,
        };

        let first = buf[0];
        if first & 0b1000_0000 == 0 {
            return Ok(Some(char::from(first)));
        }

        let cnt = if first & 0b1110_0000 == 0b1100_0000 {
            2
        } else if first & 0b1111_0000 == 0b1110_0000 {
            3
        } else if first & 0b1111_1000 == 0b1111_0000 {
            4
        } else {
            log::warn!("invalid utf-8 lead byte {first:#04X}, replaced by U+FFFD");
            return Ok(Some(char::REPLACEMENT_CHARACTER));
        };

        for n in 1..cnt {
            match self.next_byte()? {
                Some(b) if b & 0b1100_0000 == 0b1000_0000 => buf[n] = b,
                other => {
                    self.pending = other;
                    log::warn!("truncated utf-8 sequence, replaced by U+FFFD");
                    return Ok(Some(char::REPLACEMENT_CHARACTER));
                }
            }
        }

        let decoded = core::str::from_utf8(&buf[0..cnt])
            .ok()
            .and_then(|e| e.chars().next());

        if decoded.is_none() {
            log::warn!("invalid utf-8 sequence {:02X?}, replaced by U+FFFD", &buf[0..cnt]);
        }

        Ok(Some(decoded.unwrap_or(char::REPLACEMENT_CHARACTER)))
    }
}

/// ISO-8859-1 character input. Every byte is the code point of the same value.
pub(crate) struct Iso88591Input<'a, T: ByteInput<E>, E>(pub(crate) &'a mut T, pub(crate) PhantomData<E>);

impl<T: ByteInput<E>, E> CharacterInput<E> for Iso88591Input<'_, T, E> {
    fn next_character(&mut self) -> Result<Option<char>, E> {
        Ok(self.0.next_byte()?.map(char::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::String;

    fn decode_utf8(bytes: &[u8]) -> String {
        let mut slice = SliceInput(bytes, 0);
        let mut input = Utf8Input::new(&mut slice);
        let mut out = String::new();
        while let Ok(Some(c)) = input.next_character() {
            out.push(c);
        }
        out
    }

    #[test]
    fn utf8_valid() {
        assert_eq!(decode_utf8("aä€𝕊".as_bytes()), "aä€𝕊");
    }

    #[test]
    fn utf8_lossy() {
        assert_eq!(decode_utf8(b"a\xFFb"), "a\u{FFFD}b");
        assert_eq!(decode_utf8(b"a\xC3b"), "a\u{FFFD}b");
        assert_eq!(decode_utf8(b"a\xE2\x82"), "a\u{FFFD}");
        assert_eq!(decode_utf8(b"\xED\xA0\x80"), "\u{FFFD}");
    }

    #[test]
    fn iso_8859_1() {
        let bytes = [b'a', 0xE4, 0x00, 0xFF];
        let mut slice = SliceInput(&bytes, 0);
        let mut input = Iso88591Input(&mut slice, PhantomData);
        let mut out = String::new();
        while let Ok(Some(c)) = input.next_character() {
            out.push(c);
        }
        assert_eq!(out, "aä\0ÿ");
    }
}
