//! Conversion between the escaped text of a `.properties` file and the logical strings
//! an application sees.
//!
//! `unescape` is lenient: anything it cannot decode is passed through as written.
//! `escape_key` and `escape_value` only escape what would otherwise change the
//! structure of the line, so hand written files don't get rewritten needlessly.

use alloc::string::String;

use crate::error::EscapeError;

/// Whitespace as understood by the `.properties` format.
pub(crate) const fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\x0C')
}

/// Decode escaped text into its logical value.
///
/// * `\t`, `\n`, `\r`, `\f` become the respective control character.
/// * `\uXXXX` becomes the code point, two consecutive escapes forming a utf-16 surrogate pair are joined.
/// * a backslash followed by a line terminator is a line continuation, the terminator and the whitespace
///   at the beginning of the next line are dropped.
/// * a backslash followed by any other character becomes that character.
///
/// Malformed `\u` escapes and a dangling backslash at the end are kept literally.
///
/// # Example
/// ```rust
/// assert_eq!(propfile::unescape(r"a\=b\u00e4\\"), "a=bä\\");
/// assert_eq!(propfile::unescape("one \\\n    two"), "one two");
/// assert_eq!(propfile::unescape(r"bad\u12"), r"bad\u12");
/// ```
pub fn unescape(raw: &str) -> String {
    decode(raw).0
}

/// Like `unescape` but refuses text that `unescape` would have to pass through literally.
///
/// # Errors
/// * `EscapeError::DanglingBackslash` if the text ends with an unescaped backslash.
/// * `EscapeError::MalformedUnicode` if `\u` is not followed by four hex digits.
/// * `EscapeError::UnpairedSurrogate` if a `\uXXXX` escape is half of a surrogate pair.
pub fn unescape_checked(raw: &str) -> Result<String, EscapeError> {
    match decode(raw) {
        (decoded, None) => Ok(decoded),
        (_, Some(err)) => Err(err),
    }
}

/// Returns the leniently decoded text and the first problem found.
fn decode(raw: &str) -> (String, Option<EscapeError>) {
    let bytes = raw.as_bytes();
    let mut out = String::with_capacity(raw.len());
    let mut first_error = None;
    let mut i = 0;

    while let Some(c) = raw[i..].chars().next() {
        i += c.len_utf8();
        if c != '\\' {
            out.push(c);
            continue;
        }

        let offset = i - 1;
        let Some(escaped) = raw[i..].chars().next() else {
            first_error.get_or_insert(EscapeError::DanglingBackslash { offset });
            out.push('\\');
            break;
        };
        i += escaped.len_utf8();

        match escaped {
            't' => out.push('\t'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            'f' => out.push('\x0C'),
            'u' => match unicode_escape(raw, offset) {
                Ok((decoded, len)) => {
                    out.push(decoded);
                    i = offset + len;
                }
                Err(err) => {
                    //Keep the escape as written, the hex digits (if any) follow as plain characters.
                    first_error.get_or_insert(err);
                    out.push('\\');
                    out.push('u');
                }
            },
            '\r' | '\n' => {
                if escaped == '\r' && bytes.get(i) == Some(&b'\n') {
                    i += 1;
                }
                i = skip_whitespace(raw, i);
            }
            other => out.push(other),
        }
    }

    (out, first_error)
}

/// True if the text ends with an unescaped backslash, which continues a line on the next one.
pub(crate) fn ends_with_odd_backslashes(text: &str) -> bool {
    text.bytes().rev().take_while(|&b| b == b'\\').count() % 2 == 1
}

/// Returns the index of the first non whitespace character at or after `from`.
pub(crate) fn skip_whitespace(raw: &str, from: usize) -> usize {
    raw[from..]
        .find(|c| !is_whitespace(c))
        .map_or(raw.len(), |n| from + n)
}

/// Reads the 4 hex digits at `at`.
fn hex_unit(raw: &str, at: usize) -> Option<u16> {
    let digits = raw.get(at..at + 4)?;
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    u16::from_str_radix(digits, 16).ok()
}

/// Decodes the `\uXXXX` (or surrogate pair `\uXXXX\uYYYY`) escape starting at `offset`.
/// Returns the character and the length of the escape in bytes.
fn unicode_escape(raw: &str, offset: usize) -> Result<(char, usize), EscapeError> {
    let unit = hex_unit(raw, offset + 2).ok_or(EscapeError::MalformedUnicode { offset })?;

    let mut units = [unit, 0];
    let mut count = 1;
    if (0xD800..=0xDBFF).contains(&unit) && raw.get(offset + 6..offset + 8) == Some("\\u") {
        if let Some(low) = hex_unit(raw, offset + 8) {
            units[1] = low;
            count = 2;
        }
    }

    match char::decode_utf16(units[..count].iter().copied()).next() {
        Some(Ok(decoded)) => Ok((decoded, count * 6)),
        _ => Err(EscapeError::UnpairedSurrogate { offset, unit }),
    }
}

/// Escape a logical key.
///
/// Escapes the backslash, the separator characters `=` `:` and all whitespace, as well as
/// a `#` or `!` in the first position which would otherwise turn the line into a comment.
///
/// # Example
/// ```rust
/// assert_eq!(propfile::escape_key("#my key=1"), r"\#my\ key\=1");
/// ```
pub fn escape_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 2);
    for (n, c) in key.chars().enumerate() {
        match c {
            '\\' | '=' | ':' | ' ' => {
                out.push('\\');
                out.push(c);
            }
            '#' | '!' if n == 0 => {
                out.push('\\');
                out.push(c);
            }
            other => push_control(&mut out, other),
        }
    }

    out
}

/// Escape a logical value.
///
/// Escapes the backslash, line terminators and the whitespace at the beginning of the value,
/// which the parser would otherwise treat as part of the separator. For the same reason
/// a `=` or `:` in the first position is escaped.
///
/// # Example
/// ```rust
/// assert_eq!(propfile::escape_value("  a = b\n"), r"\ \ a = b\n");
/// assert_eq!(propfile::escape_value(":a=b"), r"\:a=b");
/// ```
pub fn escape_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    let mut had_non_whitespace = false;

    for (n, c) in value.chars().enumerate() {
        if !had_non_whitespace && is_whitespace(c) {
            if c == ' ' {
                out.push('\\');
                out.push(' ');
            } else {
                push_control(&mut out, c);
            }
            continue;
        }

        had_non_whitespace = true;
        match c {
            '=' | ':' if n == 0 => {
                out.push('\\');
                out.push(c);
            }
            '\\' => out.push_str("\\\\"),
            '\r' => out.push_str("\\r"),
            '\n' => out.push_str("\\n"),
            other => out.push(other),
        }
    }

    out
}

/// Pushes `c`, using the named escape for the control characters that have one.
fn push_control(out: &mut String, c: char) {
    match c {
        '\t' => out.push_str("\\t"),
        '\n' => out.push_str("\\n"),
        '\r' => out.push_str("\\r"),
        '\x0C' => out.push_str("\\f"),
        other => out.push(other),
    }
}
