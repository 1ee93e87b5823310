#![deny(unsafe_code)]

mod color;
mod cue;
mod reader;
mod spatial;
mod styled;
mod timing;

pub use crate::color::{Color, read_color, read_quoted_color};
pub use crate::cue::{Cue, CueMetadata, Document, read_cue, read_cue_metadata, read_document};
pub use crate::reader::{
    Reader, ReaderError, prefix_through_nth, prefix_up_to, prefix_up_to_nth, trim_edges, trim_end, trim_start,
};
pub use crate::spatial::{AnchorPosition, Coordinates, read_anchor, read_coordinates};
pub use crate::styled::{Component, StyledText, TagKind, parse_styled_text};
pub use crate::timing::{Time, Timing, read_time, read_timing};

use crate::reader::is_line_break;

const BOM: char = '\u{FEFF}';

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParserError {
    #[error(transparent)]
    ReaderError(#[from] ReaderError),
    #[error("{kind} tag opened at offset {pos} is never closed")]
    UnterminatedMarkup { kind: TagKind, pos: usize },
    #[error("malformed color at offset {pos}: {reason}")]
    MalformedColor { pos: usize, reason: &'static str },
    #[error("empty cue body at offset {pos}")]
    EmptyBody { pos: usize },
}

/// A document value that has no textual form which parses back to it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PrintError {
    #[error("color name {name:?} is empty or contains a quote")]
    InvalidColorName { name: String },
}

impl ParserError {
    /// Byte offset in the input passed to [`parse`] where parsing stopped.
    #[must_use]
    pub fn offset(&self) -> usize {
        match self {
            Self::ReaderError(e) => e.offset(),
            Self::UnterminatedMarkup { pos, .. }
            | Self::MalformedColor { pos, .. }
            | Self::EmptyBody { pos } => *pos,
        }
    }
}

/// Parses a whole SubRip document.
///
/// A leading byte-order mark is dropped, then line breaks around the content
/// are trimmed. Parsing is all-or-nothing.
pub fn parse(text: &str) -> Result<Document, ParserError> {
    let (text, bom_len) = match text.strip_prefix(BOM) {
        Some(rest) => (rest, BOM.len_utf8()),
        None => (text, 0),
    };
    let origin = bom_len + (text.len() - trim_start(text, is_line_break).len());
    let content = trim_edges(text, is_line_break);

    let mut reader = Reader::with_origin(content, origin);
    read_document(&mut reader)
}

/// Prints the canonical form of `document`: zero-padded timestamps, uppercase
/// hex colors, angle-bracket tags and one blank line between cues.
///
/// Fails when the document holds a value whose printed form would not parse
/// back, such as a named color containing `"`.
pub fn print(document: &Document) -> Result<String, PrintError> {
    for cue in &document.cues {
        cue.text.check_printable()?;
    }
    Ok(document.to_string())
}
