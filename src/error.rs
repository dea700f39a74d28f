use std::{fmt, io, num::ParseIntError};
use thiserror::Error;

/// Which line of a descriptor the parser was reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// `info face=... size=...`
    Info,
    /// `common lineHeight=...`
    Common,
    /// `page id=... file=...`
    Page,
    /// `chars count=...`
    Chars,
    /// One `char id=...` glyph record
    Char,
}

impl fmt::Display for LineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LineKind::Info => "info",
            LineKind::Common => "common",
            LineKind::Page => "page",
            LineKind::Chars => "chars",
            LineKind::Char => "char",
        };
        write!(f, "{name}")
    }
}

/// Errors produced while converting a descriptor
#[derive(Debug, Error)]
pub enum BmfontError {
    #[error("IO Error: {0}")]
    /// IO error
    IO(#[from] io::Error),

    /// The input ended before a required line
    #[error("Unexpected end of input at line {line}: expected the {expected} line")]
    UnexpectedEof {
        /// The line number that was missing
        line: usize,
        /// The line the parser was waiting for
        expected: LineKind,
    },

    /// A line had fewer `key=value` fields than the parser needed
    #[error("Line {line}: {kind} line has {found} field(s), needed field {index}")]
    MissingField {
        /// The line number
        line: usize,
        /// What kind of line it was
        kind: LineKind,
        /// The zero-based field index that was requested
        index: usize,
        /// How many fields the line actually had
        found: usize,
    },

    /// A field that must be an integer was not
    #[error("Line {line}: invalid integer {value:?} in {kind} line: {source}")]
    InvalidInteger {
        /// The line number
        line: usize,
        /// What kind of line it was
        kind: LineKind,
        /// The offending value
        value: String,
        /// Why it did not parse
        #[source]
        source: ParseIntError,
    },

    #[error("Error serializing descriptor: {0}")]
    /// JSON serialization error
    Serialize(#[from] serde_json::Error),
}
