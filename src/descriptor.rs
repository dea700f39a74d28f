use serde::{Deserialize, Serialize};
use serde_json::ser::{Formatter, PrettyFormatter, Serializer};
use std::{io, path::Path};

use crate::BmfontError;

/// Pretty-prints like [`PrettyFormatter`], writing every character outside
/// printable ASCII as a `\uXXXX` escape (surrogate pairs above the BMP).
struct AsciiFormatter<'a>(PrettyFormatter<'a>);

impl Formatter for AsciiFormatter<'_> {
    fn begin_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.begin_array(writer)
    }

    fn end_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_array(writer)
    }

    fn begin_array_value<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.0.begin_array_value(writer, first)
    }

    fn end_array_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_array_value(writer)
    }

    fn begin_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.begin_object(writer)
    }

    fn end_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_object(writer)
    }

    fn begin_object_key<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.0.begin_object_key(writer, first)
    }

    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.begin_object_value(writer)
    }

    fn end_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_object_value(writer)
    }

    fn write_string_fragment<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        fragment: &str,
    ) -> io::Result<()> {
        let mut start = 0;
        for (index, c) in fragment.char_indices() {
            if (' '..='~').contains(&c) {
                continue;
            }
            writer.write_all(fragment[start..index].as_bytes())?;
            let mut units = [0u16; 2];
            for unit in c.encode_utf16(&mut units) {
                write!(writer, "\\u{unit:04x}")?;
            }
            start = index + c.len_utf8();
        }
        writer.write_all(fragment[start..].as_bytes())
    }
}

/// One glyph record: every integer field of its `char` line, in order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Glyph(pub Vec<i64>);

/// A converted font descriptor
///
/// Field order here is the key order of the JSON document.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Descriptor {
    /// Font face name
    pub name: String,
    /// Font size
    pub size: i64,
    /// Line height
    pub height: i64,
    /// The atlas image file, without its quotes
    pub file: String,
    /// Glyph records, in the order they appeared
    pub chars: Vec<Glyph>,
}

impl Descriptor {
    /// Serialize as JSON, indented with one tab per level.
    ///
    /// The output is pure ASCII: non-ASCII characters in `name` and `file`
    /// are written as `\uXXXX` escapes.
    pub fn to_json(&self) -> Result<String, BmfontError> {
        let mut buffer = Vec::new();
        let formatter = AsciiFormatter(PrettyFormatter::with_indent(b"\t"));
        let mut serializer = Serializer::with_formatter(&mut buffer, formatter);
        self.serialize(&mut serializer)?;
        // Only ASCII is ever written
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }

    /// Write the JSON document to `path`, replacing any existing file.
    ///
    /// The document is serialized completely before the file is opened, so a
    /// failure never leaves a partial file behind.
    pub fn save<T: AsRef<Path>>(&self, path: T) -> Result<(), BmfontError> {
        let json = self.to_json()?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
