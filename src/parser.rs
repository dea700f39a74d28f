use std::io::{self, BufRead};

use crate::{
    descriptor::{Descriptor, Glyph},
    error::LineKind,
    fields::field_values,
    BmfontError,
};

/// The values found on one descriptor line, with enough context to report errors.
struct Fields<'a> {
    line: usize,
    kind: LineKind,
    values: Vec<&'a str>,
}

impl<'a> Fields<'a> {
    fn get(&self, index: usize) -> Result<&'a str, BmfontError> {
        self.values
            .get(index)
            .copied()
            .ok_or(BmfontError::MissingField {
                line: self.line,
                kind: self.kind,
                index,
                found: self.values.len(),
            })
    }

    fn integer(&self, index: usize) -> Result<i64, BmfontError> {
        let value = self.get(index)?;
        self.parse(value)
    }

    fn integers(&self) -> Result<Vec<i64>, BmfontError> {
        self.values.iter().map(|value| self.parse(value)).collect()
    }

    fn parse(&self, value: &str) -> Result<i64, BmfontError> {
        value
            .parse()
            .map_err(|source| BmfontError::InvalidInteger {
                line: self.line,
                kind: self.kind,
                value: value.to_string(),
                source,
            })
    }
}

/// Reads a descriptor from a forward-only sequence of lines.
struct DescriptorParser<I> {
    lines: I,
    line_number: usize,
}

impl<I> DescriptorParser<I>
where
    I: Iterator<Item = io::Result<String>>,
{
    fn new(lines: I) -> Self {
        Self {
            lines,
            line_number: 0,
        }
    }

    fn next_line(&mut self, expected: LineKind) -> Result<String, BmfontError> {
        self.line_number += 1;
        match self.lines.next() {
            Some(line) => Ok(line?),
            None => Err(BmfontError::UnexpectedEof {
                line: self.line_number,
                expected,
            }),
        }
    }

    fn parse(mut self) -> Result<Descriptor, BmfontError> {
        let line = self.next_line(LineKind::Info)?;
        let info = self.fields(LineKind::Info, &line);
        let name = unquote(info.get(0)?.trim()).to_string();
        let size = info.integer(1)?;
        log::debug!("name: {name:?}, size: {size}");

        let line = self.next_line(LineKind::Common)?;
        let height = self.fields(LineKind::Common, &line).integer(0)?;
        log::debug!("height: {height}");

        let line = self.next_line(LineKind::Page)?;
        let file = strip_ends(self.fields(LineKind::Page, &line).get(1)?);
        log::debug!("file: {file:?}");

        let line = self.next_line(LineKind::Chars)?;
        let declared = self.fields(LineKind::Chars, &line).integer(0)?;
        // A negative count means no glyph lines follow
        let count = usize::try_from(declared).unwrap_or(0);
        if declared < 0 {
            log::warn!("Line {}: negative glyph count {declared}", self.line_number);
        }
        log::debug!("count: {count}");

        let mut chars = Vec::new();
        for _ in 0..count {
            let line = self.next_line(LineKind::Char)?;
            let glyph = Glyph(self.fields(LineKind::Char, &line).integers()?);
            log::trace!("glyph {}: {:?}", chars.len(), glyph.0);
            chars.push(glyph);
        }

        Ok(Descriptor {
            name,
            size,
            height,
            file,
            chars,
        })
    }

    fn fields<'a>(&self, kind: LineKind, line: &'a str) -> Fields<'a> {
        Fields {
            line: self.line_number,
            kind,
            values: field_values(line),
        }
    }
}

/// Removes one pair of enclosing double quotes, if present.
fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

/// Drops exactly one character from each end, whatever they are.
///
/// Values shorter than two characters become empty.
fn strip_ends(value: &str) -> String {
    let count = value.chars().count();
    value
        .chars()
        .skip(1)
        .take(count.saturating_sub(2))
        .collect()
}

/// Lines ended by `\n`, `\r\n` or a lone `\r`, without their terminators.
struct UniversalLines<R> {
    reader: R,
}

impl<R: BufRead> UniversalLines<R> {
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = Vec::new();
        let mut read_any = false;
        loop {
            let available = self.reader.fill_buf()?;
            if available.is_empty() {
                break;
            }
            read_any = true;
            match available.iter().position(|&b| b == b'\n' || b == b'\r') {
                Some(end) => {
                    let terminator = available[end];
                    line.extend_from_slice(&available[..end]);
                    self.reader.consume(end + 1);
                    if terminator == b'\r' && self.reader.fill_buf()?.first() == Some(&b'\n') {
                        self.reader.consume(1);
                    }
                    break;
                }
                None => {
                    let len = available.len();
                    line.extend_from_slice(available);
                    self.reader.consume(len);
                }
            }
        }
        if !read_any {
            return Ok(None);
        }
        String::from_utf8(line)
            .map(Some)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}

impl<R: BufRead> Iterator for UniversalLines<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_line().transpose()
    }
}

/// Parse a descriptor from a buffered reader.
///
/// Reading stops after the last glyph record; anything after it is never read.
pub fn from_reader<R: BufRead>(reader: R) -> Result<Descriptor, BmfontError> {
    DescriptorParser::new(UniversalLines { reader }).parse()
}

/// Parse a descriptor held in memory.
pub fn parse_str(text: &str) -> Result<Descriptor, BmfontError> {
    from_reader(text.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    const ARIAL: &str = "info face=\"Arial\" size=32\n\
                         common lineHeight=40\n\
                         page id=0 file=\"arial.png\"\n\
                         chars count=1\n\
                         char id=65 x=0 y=0 width=10 height=12\n";

    #[test]
    fn test_parse_example() {
        let descriptor = parse_str(ARIAL).unwrap();
        assert_eq!(
            descriptor,
            Descriptor {
                name: "Arial".to_string(),
                size: 32,
                height: 40,
                file: "arial.png".to_string(),
                chars: vec![Glyph(vec![65, 0, 0, 10, 12])],
            }
        );
    }

    #[test]
    fn test_glyph_arity_follows_line() {
        let text = "info face=x size=8\ncommon lineHeight=9\npage id=0 file=\"a.png\"\n\
                    chars count=3\nchar id=1\nchar id=2 x=-4 y=+5\nchar\ntrailing garbage";
        let descriptor = parse_str(text).unwrap();
        assert_eq!(
            descriptor.chars,
            vec![Glyph(vec![1]), Glyph(vec![2, -4, 5]), Glyph(vec![])]
        );
    }

    #[test]
    fn test_unquoted_name_is_trimmed() {
        let text = "info face=Mono size=8\ncommon lineHeight=9\npage id=0 file=xa.pngx\nchars count=0\n";
        let descriptor = parse_str(text).unwrap();
        assert_eq!(descriptor.name, "Mono");
        assert_eq!(descriptor.file, "a.png");
        assert!(descriptor.chars.is_empty());
    }

    #[rstest]
    #[case("\"tex.png\"", "tex.png")]
    #[case("'tex.png'", "tex.png")]
    #[case("\"é.png\"", "é.png")]
    #[case("ab", "")]
    #[case("a", "")]
    #[case("", "")]
    fn test_strip_ends(#[case] value: &str, #[case] expected: &str) {
        assert_eq!(strip_ends(value), expected);
    }

    #[rstest]
    #[case("\"Arial\"", "Arial")]
    #[case("Arial", "Arial")]
    #[case("\"Arial", "\"Arial")]
    #[case("\"", "\"")]
    fn test_unquote(#[case] value: &str, #[case] expected: &str) {
        assert_eq!(unquote(value), expected);
    }

    #[rstest]
    #[case("", 1, LineKind::Info)]
    #[case("info face=\"Arial\" size=32\n", 2, LineKind::Common)]
    #[case("info face=\"Arial\" size=32\ncommon lineHeight=40\npage id=0 file=\"a.png\"\n", 4, LineKind::Chars)]
    #[case("info face=\"Arial\" size=32\ncommon lineHeight=40\npage id=0 file=\"a.png\"\nchars count=2\nchar id=1\n", 6, LineKind::Char)]
    fn test_truncated_input(
        #[case] text: &str,
        #[case] missing: usize,
        #[case] kind: LineKind,
    ) {
        match parse_str(text) {
            Err(BmfontError::UnexpectedEof { line, expected }) => {
                assert_eq!(line, missing);
                assert_eq!(expected, kind);
            }
            other => panic!("expected end of input error, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_field() {
        let text = "info face=\"Arial\"\ncommon lineHeight=40\n";
        match parse_str(text) {
            Err(BmfontError::MissingField {
                line,
                kind,
                index,
                found,
            }) => {
                assert_eq!((line, kind, index, found), (1, LineKind::Info, 1, 1));
            }
            other => panic!("expected missing field error, got {other:?}"),
        }
    }

    #[test]
    fn test_blank_line_is_consumed() {
        let text = "info face=\"Arial\" size=32\n\ncommon lineHeight=40\n";
        assert!(matches!(
            parse_str(text),
            Err(BmfontError::MissingField {
                line: 2,
                kind: LineKind::Common,
                index: 0,
                found: 0
            })
        ));
    }

    #[rstest]
    #[case("info face=\"Arial\" size=big\n", 1, LineKind::Info, "big")]
    #[case("info face=A size=1\ncommon lineHeight=4.5\n", 2, LineKind::Common, "4.5")]
    #[case("info face=A size=1\ncommon lineHeight=4\npage id=0 file=\"a\"\nchars count=\n", 4, LineKind::Chars, "")]
    #[case("info face=A size=1\ncommon lineHeight=4\npage id=0 file=\"a\"\nchars count=1\nchar id=1 letter=\"a\"\n", 5, LineKind::Char, "\"a\"")]
    fn test_invalid_integer(
        #[case] text: &str,
        #[case] bad_line: usize,
        #[case] bad_kind: LineKind,
        #[case] bad_value: &str,
    ) {
        match parse_str(text) {
            Err(BmfontError::InvalidInteger {
                line, kind, value, ..
            }) => {
                assert_eq!(line, bad_line);
                assert_eq!(kind, bad_kind);
                assert_eq!(value, bad_value);
            }
            other => panic!("expected invalid integer error, got {other:?}"),
        }
    }

    #[test]
    fn test_negative_count_reads_no_glyphs() {
        let text = "info face=A size=1\ncommon lineHeight=4\npage id=0 file=\"a\"\nchars count=-1\nchar id=1\n";
        let descriptor = parse_str(text).unwrap();
        assert!(descriptor.chars.is_empty());
    }

    #[rstest]
    #[case("\n")]
    #[case("\r\n")]
    #[case("\r")]
    fn test_line_endings(#[case] ending: &str) {
        let text = ARIAL.replace('\n', ending);
        let descriptor = parse_str(&text).unwrap();
        assert_eq!(descriptor.height, 40);
        assert_eq!(descriptor.file, "arial.png");
        assert_eq!(descriptor.chars, vec![Glyph(vec![65, 0, 0, 10, 12])]);
    }

    #[test]
    fn test_mixed_line_endings_across_buffer_boundaries() {
        let text = "info face=A size=1\r\ncommon lineHeight=4\rpage id=0 file=\"a.png\"\n\
                    chars count=2\r\rchar id=7";
        let reader = std::io::BufReader::with_capacity(1, text.as_bytes());
        let descriptor = from_reader(reader).unwrap();
        assert_eq!(descriptor.height, 4);
        assert_eq!(descriptor.file, "a.png");
        // The empty line between the two `\r`s is a glyph record with no fields
        assert_eq!(descriptor.chars, vec![Glyph(vec![]), Glyph(vec![7])]);
    }

    #[test]
    fn test_universal_lines() {
        let lines: Vec<String> = UniversalLines {
            reader: "a\r\nb\rc\n\nd".as_bytes(),
        }
        .collect::<io::Result<_>>()
        .unwrap();
        assert_eq!(lines, vec!["a", "b", "c", "", "d"]);
    }

    #[test]
    fn test_invalid_utf8_is_io_error() {
        let bytes: &[u8] = b"info face=\xff size=1\n";
        assert!(matches!(from_reader(bytes), Err(BmfontError::IO(_))));
    }
}
