//! # bmfont2json
//!
//! Converts the text descriptors written by bitmap-font atlas generators
//! (the BMFont `.fnt` text format) into a JSON document a game engine can
//! load directly.
//!
//! A descriptor is read strictly by position:
//!
//! ```text
//! info face="Arial" size=32
//! common lineHeight=40
//! page id=0 file="arial.png"
//! chars count=1
//! char id=65 x=0 y=0 width=10 height=12
//! ```
//!
//! and becomes
//!
//! ```json
//! {"name": "Arial", "size": 32, "height": 40, "file": "arial.png", "chars": [[65, 0, 0, 10, 12]]}
//! ```
//!
//! indented with tabs. Only the values of `key=value` tokens are kept; the
//! keys themselves are thrown away, so every `char` line turns into a plain
//! list of integers.
//!
//! ```no_run
//! # use bmfont2json::BmfontError;
//! # fn main() -> Result<(), BmfontError> {
//! let descriptor = bmfont2json::load("arial.fnt")?;
//! println!("{} glyphs in {}", descriptor.chars.len(), descriptor.file);
//! descriptor.save("arial.json")?;
//! # Ok(())
//! # }
//! ```
//!
//! Any malformed line aborts the conversion with a [`BmfontError`] and
//! nothing is written.

#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]

mod descriptor;
mod error;
/// Tokenizing descriptor lines
pub mod fields;
/// Reading descriptors
pub mod parser;

pub use crate::{
    descriptor::{Descriptor, Glyph},
    error::{BmfontError, LineKind},
};
use std::path::{Path, PathBuf};

/// Load a descriptor from a file
pub fn load(filename: impl Into<PathBuf>) -> Result<Descriptor, BmfontError> {
    let pb = filename.into();
    let buffered = std::io::BufReader::new(std::fs::File::open(&pb)?);
    parser::from_reader(buffered)
}

/// Convert the descriptor at `input` into a JSON document at `output`
///
/// The output is only touched once the whole input has parsed.
pub fn convert(input: impl Into<PathBuf>, output: impl AsRef<Path>) -> Result<(), BmfontError> {
    let input = input.into();
    log::info!("Loading {}", input.display());
    let descriptor = load(&input)?;
    log::info!(
        "Saving {} ({} glyphs)",
        output.as_ref().display(),
        descriptor.chars.len()
    );
    descriptor.save(output)
}
