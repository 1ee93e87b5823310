use memchr::memmem;

/// Cursor over one text buffer.
///
/// Every failing `read_*`/`expect_*` call leaves the cursor exactly where the
/// failure was detected, so callers can inspect [`Reader::remaining`].
#[derive(Debug, Clone)]
pub struct Reader<'d> {
    src: &'d str,
    pos: usize,
    origin: usize,
}

impl<'buf> Reader<'buf> {
    pub fn new(input: &'buf str) -> Reader<'buf> {
        Self::with_origin(input, 0)
    }

    /// Reader over a sub-span of a larger input; error offsets are shifted by `origin`.
    pub(crate) fn with_origin(input: &'buf str, origin: usize) -> Reader<'buf> {
        Self {
            src: input,
            pos: 0,
            origin,
        }
    }

    /// Absolute byte offset of the cursor.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.origin + self.pos
    }

    #[must_use]
    pub fn remaining(&self) -> &'buf str {
        self.src.get(self.pos..).unwrap_or_default()
    }

    #[must_use]
    pub fn is_end(&self) -> bool {
        self.pos == self.src.len()
    }

    #[must_use]
    pub(crate) fn peek(&self) -> Option<u8> {
        self.src.as_bytes().get(self.pos).copied()
    }

    #[must_use]
    pub(crate) fn starts_with(&self, prefix: &str) -> bool {
        self.remaining().starts_with(prefix)
    }

    pub(crate) fn mark(&self) -> usize {
        self.pos
    }

    pub(crate) fn reset(&mut self, mark: usize) {
        self.pos = mark;
    }

    #[must_use]
    pub(crate) fn try_consume(&mut self, prefix: &str) -> bool {
        if self.starts_with(prefix) {
            self.pos += prefix.len();
            true
        } else {
            false
        }
    }

    /// Consumes bytes while `predicate` holds. Predicates must only accept ASCII
    /// or must never stop inside a multi-byte character.
    #[must_use]
    pub(crate) fn take_while(&mut self, predicate: impl Fn(u8) -> bool) -> &'buf str {
        let start = self.pos;
        while let Some(byte) = self.peek() {
            if !predicate(byte) {
                break;
            }
            self.pos += 1;
        }
        self.src.get(start..self.pos).unwrap_or_default()
    }

    /// Consumes everything up to (not including) the earliest delimiter, or to the end.
    #[must_use]
    pub(crate) fn take_until_any(&mut self, delimiters: &[&str]) -> &'buf str {
        let taken = prefix_up_to(self.remaining(), delimiters);
        self.pos += taken.len();
        taken
    }

    pub(crate) fn expect_str(&mut self, token: &'static str) -> Result<(), ReaderError> {
        if self.try_consume(token) {
            return Ok(());
        }
        let pos = self.offset();
        if token.starts_with(self.remaining()) {
            Err(ReaderError::UnexpectedEnd { pos, expected: token })
        } else {
            Err(ReaderError::ExpectedToken { pos, expected: token })
        }
    }

    pub(crate) fn expect_end(&self) -> Result<(), ReaderError> {
        if self.is_end() {
            Ok(())
        } else {
            Err(ReaderError::TrailingInput { pos: self.offset() })
        }
    }

    /// Skips zero or more spaces and tabs.
    pub(crate) fn skip_horizontal_whitespace(&mut self) -> usize {
        self.take_while(is_horizontal_whitespace).len()
    }

    /// Skips one or more spaces and tabs.
    pub(crate) fn expect_horizontal_whitespace(&mut self) -> Result<(), ReaderError> {
        if self.skip_horizontal_whitespace() > 0 {
            Ok(())
        } else {
            Err(ReaderError::ExpectedWhitespace { pos: self.offset() })
        }
    }

    /// Length of the line break at the cursor: 2 for `\r\n`, 1 for `\n` or `\r`, 0 otherwise.
    #[must_use]
    pub(crate) fn line_break_len(&self) -> usize {
        match self.remaining().as_bytes() {
            [b'\r', b'\n', ..] => 2,
            [b'\n' | b'\r', ..] => 1,
            _ => 0,
        }
    }

    pub(crate) fn expect_line_break(&mut self) -> Result<(), ReaderError> {
        match self.line_break_len() {
            0 => Err(ReaderError::ExpectedLineBreak { pos: self.offset() }),
            len => {
                self.pos += len;
                Ok(())
            }
        }
    }

    /// Skips a run of line breaks, returning how many were consumed.
    pub(crate) fn skip_line_breaks(&mut self) -> usize {
        let mut count = 0;
        loop {
            match self.line_break_len() {
                0 => return count,
                len => {
                    self.pos += len;
                    count += 1;
                }
            }
        }
    }

    /// Reads an unsigned decimal integer of any width.
    pub fn read_integer(&mut self) -> Result<u32, ReaderError> {
        let start = self.pos;
        let pos = self.offset();
        let digits = self.take_while(|b| b.is_ascii_digit());
        if digits.is_empty() {
            return Err(ReaderError::InvalidInt { pos });
        }

        let mut n: u32 = 0;
        for b in digits.bytes() {
            match n.checked_mul(10).and_then(|n| n.checked_add(u32::from(b - b'0'))) {
                Some(next) => n = next,
                None => {
                    self.pos = start;
                    return Err(ReaderError::InvalidInt { pos });
                }
            }
        }
        Ok(n)
    }

    /// Reads a decimal integer with an optional leading sign.
    pub fn read_signed_integer(&mut self) -> Result<i32, ReaderError> {
        let start = self.pos;
        let negative = match self.peek() {
            Some(b'-') => true,
            Some(b'+') => false,
            _ => return self.read_unsigned_as_signed(false, start),
        };
        self.pos += 1;
        self.read_unsigned_as_signed(negative, start)
    }

    fn read_unsigned_as_signed(&mut self, negative: bool, start: usize) -> Result<i32, ReaderError> {
        let pos = self.origin + start;
        let magnitude = i64::from(self.read_integer()?);
        let value = if negative { -magnitude } else { magnitude };
        i32::try_from(value).map_err(|_| {
            self.pos = start;
            ReaderError::InvalidInt { pos }
        })
    }

    /// Consumes exactly two hex digits as one byte. Nothing is consumed on failure.
    pub fn read_hex_byte(&mut self) -> Result<u8, ReaderError> {
        let pos = self.offset();
        let &[hi, lo, ..] = self.remaining().as_bytes() else {
            return Err(ReaderError::InvalidHexByte { pos });
        };
        let byte = hex_digit(hi)
            .zip(hex_digit(lo))
            .map(|(hi, lo)| (hi << 4) | lo)
            .ok_or(ReaderError::InvalidHexByte { pos })?;
        self.pos += 2;
        Ok(byte)
    }
}

const fn hex_digit(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'A'..=b'F' => Some(c - b'A' + 10),
        b'a'..=b'f' => Some(c - b'a' + 10),
        _ => None,
    }
}

pub(crate) const fn is_horizontal_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t')
}

pub(crate) const fn is_line_break(c: char) -> bool {
    matches!(c, '\n' | '\r')
}

/// Strips the maximal run of characters matching `predicate` from the start.
pub fn trim_start(text: &str, predicate: impl Fn(char) -> bool) -> &str {
    text.trim_start_matches(|c: char| predicate(c))
}

/// Strips the maximal run of characters matching `predicate` from the end.
pub fn trim_end(text: &str, predicate: impl Fn(char) -> bool) -> &str {
    text.trim_end_matches(|c: char| predicate(c))
}

pub fn trim_edges(text: &str, predicate: impl Fn(char) -> bool) -> &str {
    trim_end(trim_start(text, &predicate), &predicate)
}

fn find_any(haystack: &[u8], delimiters: &[&str]) -> Option<(usize, usize)> {
    delimiters
        .iter()
        .filter(|delimiter| !delimiter.is_empty())
        .filter_map(|delimiter| memmem::find(haystack, delimiter.as_bytes()).map(|at| (at, delimiter.len())))
        .min_by_key(|&(at, _)| at)
}

/// Longest prefix of `text` not containing any of `delimiters`.
pub fn prefix_up_to<'a>(text: &'a str, delimiters: &[&str]) -> &'a str {
    prefix_up_to_nth(text, delimiters, 1)
}

/// Longest prefix of `text` that stops before the `nth` (1-based) delimiter occurrence.
/// Occurrences never overlap; `nth == 0` is treated as 1.
pub fn prefix_up_to_nth<'a>(text: &'a str, delimiters: &[&str], nth: usize) -> &'a str {
    match find_nth(text.as_bytes(), delimiters, nth) {
        Some((at, _)) => text.get(..at).unwrap_or(text),
        None => text,
    }
}

/// Like [`prefix_up_to_nth`], but the returned prefix ends with the matched delimiter.
pub fn prefix_through_nth<'a>(text: &'a str, delimiters: &[&str], nth: usize) -> &'a str {
    match find_nth(text.as_bytes(), delimiters, nth) {
        Some((at, len)) => text.get(..at + len).unwrap_or(text),
        None => text,
    }
}

/// Absolute offset and length of the `nth` non-overlapping delimiter occurrence.
fn find_nth(bytes: &[u8], delimiters: &[&str], nth: usize) -> Option<(usize, usize)> {
    let mut cursor = 0;
    for _ in 1..nth.max(1) {
        let (at, len) = find_any(bytes.get(cursor..)?, delimiters)?;
        cursor += at + len;
    }
    let (at, len) = find_any(bytes.get(cursor..)?, delimiters)?;
    Some((cursor + at, len))
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReaderError {
    #[error("expected '{expected}' at offset {pos}")]
    ExpectedToken { pos: usize, expected: &'static str },
    #[error("expected an integer at offset {pos}")]
    InvalidInt { pos: usize },
    #[error("expected two hex digits at offset {pos}")]
    InvalidHexByte { pos: usize },
    #[error("expected whitespace at offset {pos}")]
    ExpectedWhitespace { pos: usize },
    #[error("expected a line break at offset {pos}")]
    ExpectedLineBreak { pos: usize },
    #[error("unexpected end of input at offset {pos}; expected '{expected}'")]
    UnexpectedEnd { pos: usize, expected: &'static str },
    #[error("unexpected trailing input at offset {pos}")]
    TrailingInput { pos: usize },
}

impl ReaderError {
    #[must_use]
    pub fn offset(&self) -> usize {
        match *self {
            Self::ExpectedToken { pos, .. }
            | Self::InvalidInt { pos }
            | Self::InvalidHexByte { pos }
            | Self::ExpectedWhitespace { pos }
            | Self::ExpectedLineBreak { pos }
            | Self::UnexpectedEnd { pos, .. }
            | Self::TrailingInput { pos } => pos,
        }
    }
}
