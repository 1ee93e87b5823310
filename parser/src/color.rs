use std::fmt;
use std::str::FromStr;

use crate::{ParserError, PrintError};
use crate::reader::Reader;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Color {
    /// Any identifier the renderer understands, e.g. `red`.
    Named(String),
    Rgb { red: u8, green: u8, blue: u8 },
}

impl Color {
    #[must_use]
    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self::Rgb { red, green, blue }
    }

    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rgb { red, green, blue } => write!(f, "#{red:02X}{green:02X}{blue:02X}"),
            Self::Named(name) => {
                if self.check_printable().is_err() {
                    tracing::warn!("color name '{}' will not parse back", name);
                }
                f.write_str(name)
            }
        }
    }
}

impl FromStr for Color {
    type Err = ParserError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        read_whole(s, 0, read_color)
    }
}

impl Color {
    /// Named colors must be non-empty and free of `"` to survive a print/parse cycle.
    pub(crate) fn check_printable(&self) -> Result<(), PrintError> {
        match self {
            Self::Named(name) if name.is_empty() || name.contains('"') => {
                Err(PrintError::InvalidColorName { name: name.clone() })
            }
            _ => Ok(()),
        }
    }
}

const TRAILING: &str = "unexpected characters after color value";

/// Reads an unquoted color at the cursor: `#RRGGBB` or a run of non-quote characters.
pub fn read_color(reader: &mut Reader) -> Result<Color, ParserError> {
    let pos = reader.offset();
    if reader.try_consume("#") {
        let mut channels = [0u8; 3];
        for channel in &mut channels {
            *channel = reader.read_hex_byte().map_err(|e| ParserError::MalformedColor {
                pos: e.offset(),
                reason: "expected six hex digits",
            })?;
        }
        let [red, green, blue] = channels;
        return Ok(Color::Rgb { red, green, blue });
    }

    let name = reader.take_while(|b| b != b'"');
    if name.is_empty() {
        return Err(ParserError::MalformedColor { pos, reason: "empty color value" });
    }
    Ok(Color::Named(name.to_owned()))
}

/// Reads a color wrapped in double quotes, as found in a `color="..."` attribute.
pub fn read_quoted_color(reader: &mut Reader) -> Result<Color, ParserError> {
    reader.expect_str("\"")?;
    let color = read_color(reader)?;
    if !reader.is_end() && !reader.starts_with("\"") {
        return Err(ParserError::MalformedColor { pos: reader.offset(), reason: TRAILING });
    }
    reader.expect_str("\"")?;
    Ok(color)
}

/// Parses a complete quoted color value located at `origin` in the caller's input.
pub(crate) fn parse_quoted_color(value: &str, origin: usize) -> Result<Color, ParserError> {
    read_whole(value, origin, read_quoted_color)
}

fn read_whole(
    value: &str,
    origin: usize,
    read: fn(&mut Reader) -> Result<Color, ParserError>,
) -> Result<Color, ParserError> {
    let mut reader = Reader::with_origin(value, origin);
    let color = read(&mut reader)?;
    if !reader.is_end() {
        return Err(ParserError::MalformedColor { pos: reader.offset(), reason: TRAILING });
    }
    Ok(color)
}
