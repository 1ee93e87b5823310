use std::fmt;

use crate::ParserError;
use crate::reader::Reader;
use crate::spatial::{AnchorPosition, Coordinates, read_anchor, read_coordinates, starts_anchor, starts_coordinates};
use crate::styled::{StyledText, parse_styled_text};
use crate::timing::{Timing, read_timing};

/// Every way two consecutive line breaks (`\r\n`, `\n`, `\r`) can begin.
const BLANK_LINE: [&str; 5] = ["\n\n", "\n\r", "\r\r", "\r\n\r", "\r\n\n"];

#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub struct CueMetadata {
    pub timing: Timing,
    pub coordinates: Option<Coordinates>,
    pub anchor: Option<AnchorPosition>,
}

impl fmt::Display for CueMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.timing)?;
        if let Some(coordinates) = &self.coordinates {
            write!(f, " {coordinates}")?;
        }
        writeln!(f)?;
        if let Some(anchor) = &self.anchor {
            write!(f, "{anchor}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cue {
    pub counter: u32,
    pub metadata: CueMetadata,
    pub text: StyledText,
}

impl fmt::Display for Cue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n{}{}", self.counter, self.metadata, self.text)
    }
}

/// A whole subtitle file; cue order is presentation order.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub struct Document {
    pub cues: Vec<Cue>,
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, cue) in self.cues.iter().enumerate() {
            if idx > 0 {
                f.write_str("\n\n")?;
            }
            write!(f, "{cue}")?;
        }
        Ok(())
    }
}

/// Reads the timing line (with an optional box) and an optional anchor that
/// prefixes the first body line.
pub fn read_cue_metadata(reader: &mut Reader) -> Result<CueMetadata, ParserError> {
    let timing = read_timing(reader)?;

    let mark = reader.mark();
    let coordinates = if reader.skip_horizontal_whitespace() > 0 && starts_coordinates(reader) {
        Some(read_coordinates(reader)?)
    } else {
        reader.reset(mark);
        None
    };

    reader.skip_horizontal_whitespace();
    reader.expect_line_break()?;

    let anchor = if starts_anchor(reader) {
        Some(read_anchor(reader)?)
    } else {
        None
    };

    Ok(CueMetadata { timing, coordinates, anchor })
}

pub fn read_cue(reader: &mut Reader) -> Result<Cue, ParserError> {
    let counter = reader.read_integer()?;
    reader.skip_horizontal_whitespace();
    reader.expect_line_break()?;
    let metadata = read_cue_metadata(reader)?;

    let origin = reader.offset();
    if reader.line_break_len() > 0 {
        return Err(ParserError::EmptyBody { pos: origin });
    }
    let body = reader.take_until_any(&BLANK_LINE);
    let text = parse_styled_text(body, origin)?;

    Ok(Cue { counter, metadata, text })
}

pub fn read_document(reader: &mut Reader) -> Result<Document, ParserError> {
    let mut cues = Vec::new();
    while !reader.is_end() {
        cues.push(read_cue(reader)?);
        // The body stopped at a blank-line run or at the end of input.
        reader.skip_line_breaks();
    }
    tracing::debug!("read {} cues", cues.len());
    Ok(Document { cues })
}
