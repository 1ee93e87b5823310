use std::fmt;
use std::str::FromStr;

use tinyvec::ArrayVec;

use crate::reader::{Reader, ReaderError};

const COORDINATE_LABELS: [&str; 4] = ["X1:", "X2:", "Y1:", "Y2:"];
pub(crate) const ANCHOR_OPEN: &str = "{\\an";
const ANCHOR_CLOSE: &str = "}";

/// Pixel bounding box, written `X1:.. X2:.. Y1:.. Y2:..` after the timing.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Coordinates {
    pub x1: i32,
    pub x2: i32,
    pub y1: i32,
    pub y2: i32,
}

impl Coordinates {
    #[must_use]
    pub const fn new(x1: i32, x2: i32, y1: i32, y2: i32) -> Self {
        Self { x1, x2, y1, y2 }
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [x1, x2, y1, y2] = COORDINATE_LABELS;
        write!(f, "{x1}{} {x2}{} {y1}{} {y2}{}", self.x1, self.x2, self.y1, self.y2)
    }
}

pub(crate) fn starts_coordinates(reader: &Reader) -> bool {
    reader.starts_with(COORDINATE_LABELS[0])
}

pub fn read_coordinates(reader: &mut Reader) -> Result<Coordinates, ReaderError> {
    let mut values: ArrayVec<[i32; 4]> = ArrayVec::new();
    for (idx, label) in COORDINATE_LABELS.into_iter().enumerate() {
        if idx > 0 {
            reader.expect_horizontal_whitespace()?;
        }
        reader.expect_str(label)?;
        values.push(reader.read_signed_integer()?);
    }
    let [x1, x2, y1, y2] = values.into_inner();
    Ok(Coordinates { x1, x2, y1, y2 })
}

/// On-screen placement in numeric keypad layout:
///
/// ```text
/// 7 8 9
/// 4 5 6
/// 1 2 3
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnchorPosition {
    BottomLeft,
    BottomCenter,
    BottomRight,
    MiddleLeft,
    MiddleCenter,
    MiddleRight,
    TopLeft,
    TopCenter,
    TopRight,
    /// Numeral outside 1-9, kept so it prints back unchanged.
    Unknown(u32),
}

impl AnchorPosition {
    #[must_use]
    pub const fn from_pad_number(n: u32) -> Self {
        match n {
            1 => Self::BottomLeft,
            2 => Self::BottomCenter,
            3 => Self::BottomRight,
            4 => Self::MiddleLeft,
            5 => Self::MiddleCenter,
            6 => Self::MiddleRight,
            7 => Self::TopLeft,
            8 => Self::TopCenter,
            9 => Self::TopRight,
            other => Self::Unknown(other),
        }
    }

    #[must_use]
    pub const fn pad_number(self) -> u32 {
        match self {
            Self::BottomLeft => 1,
            Self::BottomCenter => 2,
            Self::BottomRight => 3,
            Self::MiddleLeft => 4,
            Self::MiddleCenter => 5,
            Self::MiddleRight => 6,
            Self::TopLeft => 7,
            Self::TopCenter => 8,
            Self::TopRight => 9,
            Self::Unknown(n) => n,
        }
    }
}

impl fmt::Display for AnchorPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{ANCHOR_OPEN}{}{ANCHOR_CLOSE}", self.pad_number())
    }
}

impl FromStr for AnchorPosition {
    type Err = ReaderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut reader = Reader::new(s);
        let anchor = read_anchor(&mut reader)?;
        reader.expect_end()?;
        Ok(anchor)
    }
}

pub(crate) fn starts_anchor(reader: &Reader) -> bool {
    reader.starts_with(ANCHOR_OPEN)
}

pub fn read_anchor(reader: &mut Reader) -> Result<AnchorPosition, ReaderError> {
    reader.expect_str(ANCHOR_OPEN)?;
    let n = reader.read_integer()?;
    reader.expect_str(ANCHOR_CLOSE)?;

    let anchor = AnchorPosition::from_pad_number(n);
    if let AnchorPosition::Unknown(n) = anchor {
        tracing::warn!("anchor {} is outside the keypad range; keeping it as is", n);
    }
    Ok(anchor)
}
