use propfile::{Encoding, Entry, ParserPosition, PropertyFile};

const CRLF: &[u8] = include_bytes!("fixtures/crlf.properties");
const MIXED_ENDINGS: &[u8] = include_bytes!("fixtures/mixed_endings.properties");
const CONTINUATION: &[u8] = include_bytes!("fixtures/continuation.properties");
const MALFORMED: &[u8] = include_bytes!("fixtures/malformed.properties");
const ISO_8859_1: &[u8] = include_bytes!("fixtures/iso_8859_1.properties");
const KEYS: &[u8] = include_bytes!("fixtures/keys.properties");
const UTF8: &[u8] = include_bytes!("fixtures/utf8.properties");

fn read(data: &[u8], encoding: Encoding) -> PropertyFile {
    PropertyFile::from_bytes(data, encoding).unwrap()
}

fn write(file: &PropertyFile, encoding: Encoding) -> Vec<u8> {
    let mut out: Vec<u8> = Vec::new();
    file.write_to(&mut out, encoding).unwrap();
    out
}

#[test]
pub fn round_trip_all_fixtures() {
    for data in [CRLF, MIXED_ENDINGS, CONTINUATION, MALFORMED, ISO_8859_1, KEYS, UTF8] {
        let file = read(data, Encoding::Iso88591);
        assert_eq!(write(&file, Encoding::Iso88591), data);
    }

    for data in [CRLF, MIXED_ENDINGS, CONTINUATION, MALFORMED, KEYS, UTF8] {
        let file = read(data, Encoding::Utf8);
        assert_eq!(write(&file, Encoding::Utf8), data);
    }
}

#[test]
pub fn round_trip_through_reader() {
    let mut reader = CONTINUATION;
    let file = PropertyFile::from_reader(&mut reader, Encoding::Utf8).unwrap();
    assert_eq!(file.to_string().as_bytes(), CONTINUATION);
}

#[test]
pub fn crlf_document() {
    let file = read(CRLF, Encoding::Iso88591);
    assert_eq!(file.entries_size(), 6);
    assert_eq!(file.properties_size(), 3);
    assert_eq!(
        file.keys().collect::<Vec<_>>(),
        ["db.host", "db.port", "db.user"]
    );
    assert_eq!(file.get("db.host"), Some("example.org"));
    assert_eq!(file.get("db.user"), Some("admin"));

    let user = file.entries()[5].as_property().unwrap();
    assert_eq!(user.leading_whitespace(), "  ");
    assert_eq!(user.separator(), " = ");
    assert_eq!(user.line_ending(), "\r\n");

    let host = file.entries()[3].as_property().unwrap();
    assert_eq!(host.separator(), "   : ");
    assert_eq!(file.entries()[2], Entry::verbatim("\r\n"));
}

#[test]
pub fn line_endings_are_kept_per_line() {
    let file = read(MIXED_ENDINGS, Encoding::Utf8);
    let endings = file
        .entries()
        .iter()
        .map(Entry::line_ending)
        .collect::<Vec<_>>();
    assert_eq!(endings, ["\r", "\n", "\r\n", "\r", "\r\n", ""]);
    assert_eq!(file.get("last"), Some("no newline"));
    assert_eq!(file.get("a"), Some("1"));
}

#[test]
pub fn continuation_lines() {
    let file = read(CONTINUATION, Encoding::Utf8);
    assert_eq!(file.entries_size(), 6);
    assert_eq!(file.get("fruits"), Some("apple, banana, pear"));
    assert_eq!(file.get("message"), Some("first line\nsecond line continued"));
    assert_eq!(file.get("empty.continued"), Some(""));
    assert_eq!(file.get("dangling.at.eof"), Some("x"));

    let fruits = file.entries()[1].as_property().unwrap();
    assert_eq!(
        fruits.raw_value(),
        "apple, \\\n         banana, \\\r\n\t pear"
    );

    let last = file.entries()[5].as_property().unwrap();
    assert_eq!(last.line_ending(), "");
}

#[test]
pub fn malformed_lines_survive_verbatim() {
    let file = read(MALFORMED, Encoding::Utf8);
    assert_eq!(file.entries_size(), 6);
    assert_eq!(file.keys().collect::<Vec<_>>(), ["good", "after"]);
    assert_eq!(file.entries()[1], Entry::verbatim("bad.unicode = \\u12G4\n"));
    assert_eq!(
        file.entries()[2],
        Entry::verbatim("bad.surrogate = \\uD800 alone\n")
    );
    assert_eq!(
        file.entries()[3],
        Entry::verbatim("   # indented comment \\\n")
    );
    assert_eq!(
        file.entries()[5],
        Entry::verbatim("trailing.backslash = oops\\")
    );
    assert!(!file.contains_key("bad.unicode"));
    assert!(!file.contains_key("trailing.backslash"));
}

#[test]
pub fn key_forms() {
    let file = read(KEYS, Encoding::Utf8);
    assert_eq!(file.entries_size(), 10);
    assert_eq!(file.properties_size(), 9);
    assert_eq!(
        file.keys().collect::<Vec<_>>(),
        [
            "flag",
            "spaced",
            "key=with:separators",
            "#not.a.comment",
            " leading.space",
            "empty",
            "empty.colon",
            "dup",
            "other"
        ]
    );
    assert_eq!(file.get("flag"), Some(""));
    assert_eq!(file.get("spaced"), Some("key value"));
    assert_eq!(file.get("key=with:separators"), Some("v"));
    assert_eq!(file.get("#not.a.comment"), Some("1"));
    assert_eq!(file.get(" leading.space"), Some("2"));
    assert_eq!(file.get("empty"), Some(""));
    assert_eq!(file.get("empty.colon"), Some(""));
    assert_eq!(file.get("dup"), Some("second"));

    let flag = file.entries()[0].as_property().unwrap();
    assert_eq!(flag.separator(), "");
    let spaced = file.entries()[1].as_property().unwrap();
    assert_eq!(spaced.separator(), " ");
}

#[test]
pub fn iso_8859_1_document() {
    let file = read(ISO_8859_1, Encoding::Iso88591);
    assert_eq!(file.get("café"), Some("crème brûlée"));
    assert_eq!(file.get("escaped"), Some("ä€𝕊"));
    assert_eq!(file.entries()[0], Entry::verbatim("# Grüße\n"));

    let utf8 = write(&file, Encoding::Utf8);
    assert_eq!(
        String::from_utf8(utf8).unwrap(),
        "# Grüße\ncafé = crème brûlée\nescaped = \\u00e4\\u20AC\\uD835\\uDD4A\n"
    );
}

#[test]
pub fn utf8_document_written_as_iso_8859_1() {
    let file = read(UTF8, Encoding::Utf8);
    assert_eq!(file.get("名前"), Some("値"));
    assert_eq!(file.get("emoji"), Some("😀"));

    let iso = write(&file, Encoding::Iso88591);
    assert_eq!(
        iso,
        b"# Unicode\n\\u540D\\u524D = \\u5024\nemoji = \\uD83D\\uDE00\n"
    );

    let reread = read(&iso, Encoding::Iso88591);
    assert_eq!(reread.to_vec(), file.to_vec());
    assert_ne!(reread, file);
}

#[test]
pub fn invalid_utf8_is_replaced() {
    let file = read(b"key=a\xFFb\n", Encoding::Utf8);
    assert_eq!(file.get("key"), Some("a\u{FFFD}b"));
}

#[test]
pub fn independent_parses_are_equal() {
    let a = read(KEYS, Encoding::Utf8);
    let b: PropertyFile = std::str::from_utf8(KEYS).unwrap().parse().unwrap();
    assert_eq!(a, b);
}

#[test]
pub fn empty_input() {
    let file = read(b"", Encoding::Utf8);
    assert!(file.is_empty());
    assert_eq!(file.entries_size(), 0);
    assert_eq!(write(&file, Encoding::Utf8), b"");
}

#[test]
pub fn handler_can_stop() {
    let mut seen = Vec::new();
    let mut handler = |position: &ParserPosition, entry: Entry| {
        seen.push((position.line, entry));
        seen.len() < 2
    };

    propfile::parse_bytes(CRLF, Encoding::Iso88591, &mut handler).unwrap();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0], (0, Entry::verbatim("# Database settings\r\n")));
    assert_eq!(seen[1], (1, Entry::verbatim("! generated by hand\r\n")));
}

#[test]
pub fn io_errors_are_reported() {
    struct Failing(usize);

    impl std::io::Read for Failing {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.0 == 0 {
                return Err(std::io::Error::other("disk on fire"));
            }
            self.0 -= 1;
            buf[0] = b'a';
            Ok(1)
        }
    }

    let err = PropertyFile::from_reader(&mut Failing(3), Encoding::Utf8).unwrap_err();
    assert_eq!(err.position().character_total, 3);
    let io: std::io::Error = err.into();
    assert_eq!(io.to_string(), "disk on fire");
}
