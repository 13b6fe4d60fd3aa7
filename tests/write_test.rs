use std::hash::{DefaultHasher, Hash, Hasher};

use propfile::{Encoding, Entry, Options, PropertyEntry, PropertyFile};

const CRLF: &[u8] = include_bytes!("fixtures/crlf.properties");
const CONTINUATION: &[u8] = include_bytes!("fixtures/continuation.properties");
const KEYS: &[u8] = include_bytes!("fixtures/keys.properties");

fn hash_of(file: &PropertyFile) -> u64 {
    let mut hasher = DefaultHasher::new();
    file.hash(&mut hasher);
    hasher.finish()
}

#[test]
pub fn set_value_is_surgical() {
    let mut file = PropertyFile::from_bytes(CRLF, Encoding::Iso88591).unwrap();
    file.set_value("db.host", "localhost");

    let mut out: Vec<u8> = Vec::new();
    file.write_to(&mut out, Encoding::Iso88591).unwrap();
    assert_eq!(
        out,
        b"# Database settings\r\n! generated by hand\r\n\r\ndb.host   : localhost\r\ndb.port=5432\r\n  db.user = admin\r\n"
    );
}

#[test]
pub fn set_value_replaces_continued_value() {
    let mut file = PropertyFile::from_bytes(CONTINUATION, Encoding::Utf8).unwrap();
    file.set_value("fruits", "kiwi");
    assert_eq!(
        file.to_string(),
        "# fruits\nfruits = kiwi\n\nmessage = first line\\nsecond line \\\n   continued\nempty.continued = \\\n\ndangling.at.eof = x\\\n"
    );
}

#[test]
pub fn set_value_escapes() {
    let mut file = PropertyFile::from_text("path : old\n");
    file.set_value("path", "  C:\\dir\nnext");
    assert_eq!(file.to_string(), "path : \\ \\ C:\\\\dir\\nnext\n");
    assert_eq!(file.get("path"), Some("  C:\\dir\nnext"));

    let reread = PropertyFile::from_text(&file.to_string());
    assert_eq!(reread.get("path"), Some("  C:\\dir\nnext"));
}

#[test]
pub fn set_value_appends_new_key() {
    let mut file = PropertyFile::from_text("# only a comment\n");
    file.set_value("new key", "v");
    assert_eq!(file.to_string(), "# only a comment\nnew\\ key=v\n");

    let mut file = PropertyFile::new();
    file.set_value("x", "1");
    assert_eq!(file.get("x"), Some("1"));
    assert_eq!(file.entries_size(), 1);
    assert_eq!(file.properties_size(), 1);
}

#[test]
pub fn duplicate_keys() {
    let mut file = PropertyFile::from_text("a=1\nb=x\na=2\n");
    assert_eq!(file.get("a"), Some("2"));
    assert_eq!(file.keys().collect::<Vec<_>>(), ["a", "b"]);
    assert_eq!(file.values().collect::<Vec<_>>(), ["2", "x"]);

    file.set_value("a", "3");
    assert_eq!(file.to_string(), "a=1\nb=x\na=3\n");

    assert_eq!(file.remove("a"), Some(String::from("3")));
    assert!(!file.contains_key("a"));
    assert_eq!(file.keys().collect::<Vec<_>>(), ["b"]);
    assert_eq!(file.to_string(), "b=x\n");

    assert_eq!(file.remove("a"), None);
    assert_eq!(file.to_string(), "b=x\n");
}

#[test]
pub fn remove_keeps_other_entries() {
    let mut file = PropertyFile::from_bytes(KEYS, Encoding::Utf8).unwrap();
    file.remove("dup");
    file.remove("flag");
    assert_eq!(file.entries_size(), 7);
    assert_eq!(file.properties_size(), 7);
    assert_eq!(file.get("other"), Some("x"));
    assert!(file.to_string().starts_with("spaced key value\n"));
    assert!(file.to_string().ends_with("empty.colon:\nother = x\n"));
}

#[test]
pub fn append_entry() {
    let mut file = PropertyFile::new();
    file.append_entry(Entry::verbatim("# header\n"));
    file.append_entry(PropertyEntry::from_raw("   ", "k\\ 1", " : ", "v\\u0031", "\r\n"));
    file.append_entry(("k 2", "two"));

    assert_eq!(file.entries_size(), 3);
    assert_eq!(file.properties_size(), 2);
    assert_eq!(file.get("k 1"), Some("v1"));
    assert_eq!(file.get("k 2"), Some("two"));
    assert_eq!(file.to_string(), "# header\n   k\\ 1 : v\\u0031\r\nk\\ 2=two\n");
}

#[test]
pub fn clone_through_entries() {
    let file = PropertyFile::from_bytes(KEYS, Encoding::Utf8).unwrap();
    let mut copy = PropertyFile::new();
    for entry in file.entries() {
        copy.append_entry(entry);
    }

    assert_eq!(copy, file);
    assert_eq!(copy.to_map(), file.to_map());
    assert_eq!(hash_of(&copy), hash_of(&file));
}

#[test]
pub fn equality_is_structural() {
    let a = PropertyFile::from_text("# one\nk=v\n");
    let b = PropertyFile::from_text("# two\nk=v\n");
    let c = PropertyFile::from_text("k = v\n");
    assert_eq!(a.to_map(), b.to_map());
    assert_ne!(a, b);
    assert_ne!(b, c);
    assert_eq!(a, PropertyFile::from_text("# one\nk=v\n"));
    assert_eq!(hash_of(&a), hash_of(&PropertyFile::from_text("# one\nk=v\n")));
}

#[test]
pub fn clear() {
    let mut file = PropertyFile::from_bytes(KEYS, Encoding::Utf8).unwrap();
    file.clear();
    assert!(file.is_empty());
    assert_eq!(file.properties_size(), 0);
    assert_eq!(file.get("dup"), None);
    assert_eq!(file, PropertyFile::new());
}

#[test]
pub fn write_with_options() {
    let file: PropertyFile = [("grüße", "€")].iter().collect();
    let options = Options::new().with(Encoding::Iso88591);

    let mut out: Vec<u8> = Vec::new();
    file.write_to_with(&mut out, &options).unwrap();
    assert_eq!(out, b"gr\xfc\xdfe=\\u20AC\n");

    let reread = PropertyFile::from_reader_with(&mut out.as_slice(), &options).unwrap();
    assert_eq!(reread.get("grüße"), Some("€"));
}

#[test]
pub fn write_entries_directly() {
    let entries = vec![
        Entry::verbatim("! list\n"),
        Entry::from(PropertyEntry::new("a", "1").with_separator(": ")),
    ];

    let mut text = String::new();
    propfile::write(&entries, &mut text).unwrap();
    assert_eq!(text, "! list\na: 1\n");

    let mut bytes: Vec<u8> = Vec::new();
    propfile::write_utf8(&entries, &mut bytes).unwrap();
    assert_eq!(bytes, text.as_bytes());
}

#[test]
pub fn write_reports_io_errors() {
    struct Full(usize);

    impl std::io::Write for Full {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            if self.0 == 0 {
                return Err(std::io::Error::new(std::io::ErrorKind::WriteZero, "full"));
            }
            self.0 -= 1;
            Ok(buf.len().min(1))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    let file = PropertyFile::from_text("key=value\n");
    let err = file.write_to(&mut Full(4), Encoding::Utf8).unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::WriteZero);
}

#[test]
pub fn append_after_unterminated_last_line() {
    let mut file = PropertyFile::from_text("a=1");
    file.set_value("b", "2");
    assert_eq!(file.to_string(), "a=1\nb=2\n");

    let reread = PropertyFile::from_text(&file.to_string());
    assert_eq!(reread.get("a"), Some("1"));
    assert_eq!(reread.get("b"), Some("2"));
    assert_eq!(reread, file);

    let mut file = PropertyFile::from_text("# header");
    file.set_value("x", "1");
    assert_eq!(file.to_string(), "# header\nx=1\n");
    assert_eq!(
        PropertyFile::from_text(&file.to_string()).keys().collect::<Vec<_>>(),
        ["x"]
    );
}

#[test]
pub fn append_after_unterminated_malformed_line() {
    let mut file = PropertyFile::from_text("bad=\\u12\nend=oops\\");
    file.set_value("x", "1");
    assert_eq!(file.to_string(), "bad=\\u12\nend=oops\\\n\nx=1\n");

    let reread = PropertyFile::from_text(&file.to_string());
    assert_eq!(reread.get("x"), Some("1"));
    assert_eq!(reread.get("end"), Some("oops"));
}

#[test]
pub fn set_value_on_continuation_at_end_of_input() {
    let mut file = PropertyFile::from_text("a=b\\\n");
    file.set_value("a", "c");
    assert_eq!(file.to_string(), "a=c\n");

    file.set_value("z", "9");
    assert_eq!(file.to_string(), "a=c\nz=9\n");

    let reread = PropertyFile::from_text(&file.to_string());
    assert_eq!(reread.get("a"), Some("c"));
    assert_eq!(reread.get("z"), Some("9"));
}

#[test]
pub fn set_value_on_unterminated_last_line() {
    let mut file = PropertyFile::from_text("x=0\na = b");
    file.set_value("a", "c");
    assert_eq!(file.to_string(), "x=0\na = c");

    file.set_value("a", "d");
    file.set_value("new", "n");
    assert_eq!(file.to_string(), "x=0\na = d\nnew=n\n");
    assert_eq!(PropertyFile::from_text(&file.to_string()), file);
}

#[test]
pub fn iso_8859_1_keeps_escaped_wide_chars() {
    let file = PropertyFile::from_text("k=\\€\n");
    assert_eq!(file.get("k"), Some("€"));

    let mut out: Vec<u8> = Vec::new();
    file.write_to(&mut out, Encoding::Iso88591).unwrap();
    assert_eq!(out, b"k=\\u20AC\n");

    let reread = PropertyFile::from_bytes(&out, Encoding::Iso88591).unwrap();
    assert_eq!(reread.get("k"), Some("€"));
}
