//! Parser producing the `Entry` sequence of a `.properties` document.
//!
//! The parser never rejects a line. Lines it cannot decode exactly are kept as verbatim entries.

use alloc::string::String;
use core::fmt::{Display, Formatter};
use core::marker::PhantomData;
use core::mem;

use crate::entry::{Entry, PropertyEntry};
use crate::error::ParserError;
use crate::escape::{ends_with_odd_backslashes, is_whitespace, skip_whitespace, unescape_checked};
use crate::input::{ByteInput, CharacterInput, Iso88591Input, SliceInput, Utf8Input};
use crate::options::Encoding;
use crate::InfallibleIO;

/// Receives the entries of a document in order.
pub trait EntryHandler {
    /// Called for every entry. Return false to stop parsing.
    fn handle(&mut self, position: &ParserPosition, entry: Entry) -> bool;
}

impl<T: FnMut(&ParserPosition, Entry) -> bool> EntryHandler for T {
    fn handle(&mut self, position: &ParserPosition, entry: Entry) -> bool {
        self(position, entry)
    }
}

/// Where the parser is in its input. Lines and characters are counted from 0.
#[derive(Debug, Eq, PartialEq, Clone, Copy, PartialOrd, Ord, Hash, Default)]
pub struct ParserPosition {
    /// Characters read since the start of the input.
    pub character_total: u64,
    /// Characters read since the start of the current physical line.
    pub character_in_line: u64,
    /// Physical line, a continued line counts every line it spans.
    pub line: u64,
}

impl Display for ParserPosition {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.write_fmt(format_args!(
            "line: {} pos: {}",
            self.line, self.character_in_line
        ))
    }
}

//Doesnt need to be public.
impl ParserPosition {
    /// Called after a new-line has been processed.
    fn next_line(&mut self) {
        self.line += 1;
        self.character_in_line = 0;
    }

    /// Called after a char has been read.
    fn next_char(&mut self) {
        self.character_in_line += 1;
        self.character_total += 1;
    }
}

/// What a logical line turned out to be.
#[derive(Debug, Eq, PartialEq, Clone, Copy)]
enum LineKind {
    /// Nothing but whitespace.
    Blank,
    /// First non whitespace is # or !
    Comment,
    /// Anything else.
    Property,
}

/// Parser state machine states.
#[derive(Debug, Eq, PartialEq, Clone, Copy)]
enum State {
    /// Start of a line, no non-whitespace read yet.
    LineStart,
    /// We are in the process of parsing a comment line.
    Comment,
    /// We are in a key value line, possibly in a continuation line of it.
    Property,
    /// We have just read \r and are checking for the \n of a CRLF.
    CarriageReturn(LineKind),
}

/// Splits the character stream into logical lines and hands the entries to the handler.
struct LineSplitter<'h, H: EntryHandler> {
    /// Receiver of the entries.
    handler: &'h mut H,
    /// Current state.
    state: State,
    /// Text of the current logical line read so far, including the terminators of continued lines.
    line: String,
    /// Current position.
    position: ParserPosition,
}

impl<H: EntryHandler> LineSplitter<'_, H> {
    /// Processes a physical line terminator.
    /// Returns false if the handler does not want any more entries.
    fn end_of_line(&mut self, kind: LineKind, terminator: &str) -> bool {
        if kind == LineKind::Property && ends_with_odd_backslashes(&self.line) {
            self.line.push_str(terminator);
            self.position.next_line();
            self.state = State::Property;
            return true;
        }

        let mut line = mem::take(&mut self.line);
        let entry = match kind {
            LineKind::Blank | LineKind::Comment => {
                line.push_str(terminator);
                Entry::Verbatim(line)
            }
            LineKind::Property => classify(line, terminator, &self.position),
        };

        let proceed = self.handler.handle(&self.position, entry);
        self.position.next_line();
        self.state = State::LineStart;
        proceed
    }

    /// Emits whatever is left at the end of the input.
    fn end_of_input(&mut self) {
        if let State::CarriageReturn(kind) = self.state {
            if !self.end_of_line(kind, "\r") {
                return;
            }
        }

        if self.line.is_empty() && self.state == State::LineStart {
            return;
        }

        let line = mem::take(&mut self.line);
        let entry = match self.state {
            State::Property => classify(line, "", &self.position),
            _ => Entry::Verbatim(line),
        };

        self.handler.handle(&self.position, entry);
    }
}

/// Index after the escape sequence whose backslash is at `at`.
/// A line continuation includes the whitespace at the start of the next line.
fn skip_escape(line: &str, at: usize) -> usize {
    let i = at + 1;
    match line[i..].chars().next() {
        None => i,
        Some('\r') => {
            let i = if line.as_bytes().get(i + 1) == Some(&b'\n') {
                i + 2
            } else {
                i + 1
            };
            skip_whitespace(line, i)
        }
        Some('\n') => skip_whitespace(line, i + 1),
        Some(c) => i + c.len_utf8(),
    }
}

/// End of the raw key starting at `start`: the first unescaped separator or whitespace.
fn key_end(line: &str, start: usize) -> usize {
    let mut i = start;
    while let Some(c) = line[i..].chars().next() {
        match c {
            '=' | ':' => return i,
            '\\' => i = skip_escape(line, i),
            c if is_whitespace(c) => return i,
            c => i += c.len_utf8(),
        }
    }

    line.len()
}

/// Skips whitespace and line continuations.
fn skip_blank(line: &str, mut i: usize) -> usize {
    loop {
        i = skip_whitespace(line, i);
        let rest = &line[i..];
        if !(rest.starts_with("\\\n") || rest.starts_with("\\\r")) {
            return i;
        }
        i = skip_escape(line, i);
    }
}

/// End of the separator starting at `start`: blanks, at most one `=` or `:`, blanks.
fn separator_end(line: &str, start: usize) -> usize {
    let i = skip_blank(line, start);
    if matches!(line.as_bytes().get(i), Some(b'=' | b':')) {
        return skip_blank(line, i + 1);
    }

    i
}

/// Splits a logical key value line into its parts.
/// Lines whose key or value contain broken escape sequences become verbatim entries.
fn classify(line: String, line_ending: &str, position: &ParserPosition) -> Entry {
    let key_start = skip_whitespace(&line, 0);
    let key_end = key_end(&line, key_start);
    let value_start = separator_end(&line, key_end);

    let raw_key = &line[key_start..key_end];
    let raw_value = &line[value_start..];

    match (unescape_checked(raw_key), unescape_checked(raw_value)) {
        (Ok(key), Ok(value)) => Entry::Property(PropertyEntry::from_parts(
            String::from(&line[..key_start]),
            (String::from(raw_key), key),
            String::from(&line[key_end..value_start]),
            (String::from(raw_value), value),
            String::from(line_ending),
        )),
        (Err(err), _) | (_, Err(err)) => {
            log::debug!("{position}: keeping line verbatim, {err}");
            let mut line = line;
            line.push_str(line_ending);
            Entry::Verbatim(line)
        }
    }
}

/// Low-level parsing function.
/// Parses a .properties file from a character-based input and invokes a callback handler
/// for each Entry of the .properties file that is parsed.
///
/// Concatenating the text of all entries yields the input.
///
/// # Errors
/// if the character input errors.
///
/// # Example
/// ```rust
/// use propfile::{Entry, ParserPosition};
///
/// let mut keys = Vec::new();
/// let mut handler = |_: &ParserPosition, entry: Entry| {
///     if let Entry::Property(property) = entry {
///         keys.push(property.key().to_string());
///     }
///     true
/// };
///
/// propfile::parse(&mut "#beepbop\nkey=value\nanother_key=another_value".chars(), &mut handler).unwrap();
/// assert_eq!(keys, ["key", "another_key"]);
/// ```
pub fn parse<T: CharacterInput<E>, E>(
    input: &mut T,
    handler: &mut impl EntryHandler,
) -> Result<ParserPosition, ParserError<E>> {
    let mut lines = LineSplitter {
        handler,
        state: State::LineStart,
        line: String::new(),
        position: ParserPosition::default(),
    };

    'parse_next: loop {
        let next_char = match input.next_character() {
            Ok(Some(c)) => c,
            Ok(None) => {
                lines.end_of_input();
                return Ok(lines.position);
            }
            Err(error) => {
                return Err(ParserError::Input {
                    position: lines.position,
                    error,
                })
            }
        };

        lines.position.next_char();

        loop {
            let kind = match lines.state {
                State::CarriageReturn(kind) => {
                    if next_char == '\n' {
                        //Was CRLF (Windows)
                        if !lines.end_of_line(kind, "\r\n") {
                            return Ok(lines.position);
                        }
                        continue 'parse_next;
                    }

                    //Was CR (Mac)
                    if !lines.end_of_line(kind, "\r") {
                        return Ok(lines.position);
                    }
                    continue;
                }
                State::LineStart => match next_char {
                    '#' | '!' => {
                        lines.state = State::Comment;
                        LineKind::Comment
                    }
                    '\r' | '\n' => LineKind::Blank,
                    c if is_whitespace(c) => LineKind::Blank,
                    _ => {
                        lines.state = State::Property;
                        LineKind::Property
                    }
                },
                State::Comment => LineKind::Comment,
                State::Property => LineKind::Property,
            };

            match next_char {
                '\r' => lines.state = State::CarriageReturn(kind),
                '\n' => {
                    if !lines.end_of_line(kind, "\n") {
                        return Ok(lines.position);
                    }
                }
                c => lines.line.push(c),
            }

            continue 'parse_next;
        }
    }
}

/// Decode the bytes from a source and parse them as a properties file.
///
/// # Errors
/// if the input source errors.
pub fn parse_reader<E>(
    source: &mut impl ByteInput<E>,
    encoding: Encoding,
    handler: &mut impl EntryHandler,
) -> Result<ParserPosition, ParserError<E>> {
    match encoding {
        Encoding::Utf8 => parse(&mut Utf8Input::new(source), handler),
        Encoding::Iso88591 => parse(&mut Iso88591Input(source, PhantomData), handler),
    }
}

/// Decode the bytes and parse them as a properties file.
///
/// # Errors
/// Never, the error type is `InfallibleIO`.
pub fn parse_bytes(
    bytes: impl AsRef<[u8]>,
    encoding: Encoding,
    handler: &mut impl EntryHandler,
) -> Result<ParserPosition, ParserError<InfallibleIO>> {
    let mut sl = SliceInput(bytes.as_ref(), 0);
    parse_reader(&mut sl, encoding, handler)
}

/// Parse the str as a properties file.
///
/// # Errors
/// Never, the error type is `InfallibleIO`.
pub fn parse_str(
    str: impl AsRef<str>,
    handler: &mut impl EntryHandler,
) -> Result<ParserPosition, ParserError<InfallibleIO>> {
    parse(&mut str.as_ref().chars(), handler)
}
