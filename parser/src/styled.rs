use std::fmt;

use enum_map::{Enum, EnumMap};

use crate::color::{Color, parse_quoted_color};
use crate::{ParserError, PrintError};

/// One node of a cue body. Nesting is expressed through owned child lists.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Component {
    Plain(String),
    Bold(Vec<Component>),
    Italic(Vec<Component>),
    Underline(Vec<Component>),
    Color { color: Color, children: Vec<Component> },
}

impl Component {
    #[must_use]
    pub fn plain(text: impl Into<String>) -> Self {
        Self::Plain(text.into())
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub struct StyledText {
    pub components: Vec<Component>,
}

impl StyledText {
    #[must_use]
    pub fn new(components: Vec<Component>) -> Self {
        Self { components }
    }
}

#[derive(Hash, Eq, PartialEq, Enum, Debug, Copy, Clone)]
pub enum TagKind {
    Bold,
    Italic,
    Underline,
    Color,
}

impl fmt::Display for TagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Bold => "bold",
            Self::Italic => "italic",
            Self::Underline => "underline",
            Self::Color => "color",
        })
    }
}

struct Delimiters {
    open: &'static str,
    close: &'static str,
}

// The first pair of every kind is the canonical one used when printing.
const BOLD: [Delimiters; 2] = [
    Delimiters { open: "<b>", close: "</b>" },
    Delimiters { open: "{b}", close: "{/b}" },
];
const ITALIC: [Delimiters; 2] = [
    Delimiters { open: "<i>", close: "</i>" },
    Delimiters { open: "{i}", close: "{/i}" },
];
const UNDERLINE: [Delimiters; 2] = [
    Delimiters { open: "<u>", close: "</u>" },
    Delimiters { open: "{u}", close: "{/u}" },
];
const FONT: [Delimiters; 1] = [
    Delimiters { open: "<font color=\"", close: "</font>" },
];
const FONT_VALUE_END: &str = "\">";

impl TagKind {
    fn delimiters(self) -> &'static [Delimiters] {
        match self {
            Self::Bold => &BOLD,
            Self::Italic => &ITALIC,
            Self::Underline => &UNDERLINE,
            Self::Color => &FONT,
        }
    }
}

/// What a tag carries besides its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TagBody {
    Bold,
    Italic,
    Underline,
    /// Byte range of the quoted `color` attribute, quotes included.
    Font { value_start: usize, value_end: usize },
}

/// Byte ranges of one tag occurrence, relative to the span it was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TagMatch {
    start: usize,
    end: usize,
    inner_start: usize,
    inner_end: usize,
    body: TagBody,
}

/// ASCII case-insensitive search. Every delimiter starts with `<` or `{`, so the
/// first byte can be located exactly with memchr.
fn find_delimiter(haystack: &[u8], needle: &str, from: usize) -> Option<usize> {
    let needle = needle.as_bytes();
    let &first = needle.first()?;
    let tail = haystack.get(from..)?;
    memchr::memchr_iter(first, tail)
        .map(|at| at + from)
        .find(|&at| {
            haystack
                .get(at..at + needle.len())
                .is_some_and(|window| window.eq_ignore_ascii_case(needle))
        })
}

/// First shortest occurrence of one delimiter family at or after `from`. An
/// opening delimiter without a closing one of the same family is an error.
fn find_family(
    span: &str,
    kind: TagKind,
    delimiters: &Delimiters,
    from: usize,
    origin: usize,
) -> Result<Option<TagMatch>, ParserError> {
    let bytes = span.as_bytes();
    let Some(start) = find_delimiter(bytes, delimiters.open, from) else {
        return Ok(None);
    };
    let unterminated = ParserError::UnterminatedMarkup { kind, pos: origin + start };
    let mut inner_start = start + delimiters.open.len();

    let body = match kind {
        TagKind::Bold => TagBody::Bold,
        TagKind::Italic => TagBody::Italic,
        TagKind::Underline => TagBody::Underline,
        TagKind::Color => {
            let value_end = memchr::memmem::find(&bytes[inner_start..], FONT_VALUE_END.as_bytes())
                .map(|at| at + inner_start)
                .ok_or(unterminated.clone())?;
            // The opener ends and the terminator starts with the attribute quote.
            let body = TagBody::Font { value_start: inner_start - 1, value_end: value_end + 1 };
            inner_start = value_end + FONT_VALUE_END.len();
            body
        }
    };

    let inner_end = find_delimiter(bytes, delimiters.close, inner_start).ok_or(unterminated)?;
    Ok(Some(TagMatch {
        start,
        end: inner_end + delimiters.close.len(),
        inner_start,
        inner_end,
        body,
    }))
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
enum Candidate {
    #[default]
    Unsearched,
    Absent,
    Found(TagMatch),
}

/// Search results for every delimiter family of one span. A result is reused
/// until the cursor moves past its start, so each part of the span is scanned
/// for a family at most once.
struct Scanner<'s> {
    span: &'s str,
    origin: usize,
    families: EnumMap<TagKind, [Candidate; 2]>,
}

impl<'s> Scanner<'s> {
    fn new(span: &'s str, origin: usize) -> Self {
        Self { span, origin, families: EnumMap::default() }
    }

    /// Earliest tag of every kind at or after `cursor`.
    fn candidates(&mut self, cursor: usize) -> Result<EnumMap<TagKind, Option<TagMatch>>, ParserError> {
        let mut candidates: EnumMap<TagKind, Option<TagMatch>> = EnumMap::default();
        for (kind, families) in &mut self.families {
            let mut best: Option<TagMatch> = None;
            for (delimiters, candidate) in kind.delimiters().iter().zip(families.iter_mut()) {
                let stale = match candidate {
                    Candidate::Unsearched => true,
                    Candidate::Found(found) => found.start < cursor,
                    Candidate::Absent => false,
                };
                if stale {
                    *candidate = match find_family(self.span, kind, delimiters, cursor, self.origin)? {
                        Some(found) => Candidate::Found(found),
                        None => Candidate::Absent,
                    };
                }
                if let Candidate::Found(found) = *candidate {
                    if best.is_none_or(|best| found.start < best.start) {
                        best = Some(found);
                    }
                }
            }
            candidates[kind] = best;
        }
        Ok(candidates)
    }
}

/// Lowest start offset wins; on equal offsets the declaration order of
/// [`TagKind`] decides (bold, italic, underline, color).
fn select_earliest(candidates: &EnumMap<TagKind, Option<TagMatch>>) -> Option<(TagKind, TagMatch)> {
    let mut winner: Option<(TagKind, TagMatch)> = None;
    for (kind, found) in candidates {
        let Some(found) = found else {
            continue;
        };
        if winner.is_none_or(|(_, best)| found.start < best.start) {
            winner = Some((kind, *found));
        }
    }
    winner
}

fn parse_components(span: &str, origin: usize) -> Result<Vec<Component>, ParserError> {
    let mut components = Vec::new();
    let mut scanner = Scanner::new(span, origin);
    let mut cursor = 0;

    while cursor < span.len() {
        let candidates = scanner.candidates(cursor)?;
        let Some((kind, found)) = select_earliest(&candidates) else {
            components.push(Component::plain(&span[cursor..]));
            break;
        };
        tracing::trace!("{} tag at offset {}", kind, origin + found.start);

        // Nothing before the earliest tag can open another one.
        if found.start > cursor {
            components.push(Component::plain(&span[cursor..found.start]));
        }

        let children = parse_components(&span[found.inner_start..found.inner_end], origin + found.inner_start)?;
        components.push(match found.body {
            TagBody::Bold => Component::Bold(children),
            TagBody::Italic => Component::Italic(children),
            TagBody::Underline => Component::Underline(children),
            TagBody::Font { value_start, value_end } => Component::Color {
                color: parse_quoted_color(&span[value_start..value_end], origin + value_start)?,
                children,
            },
        });

        cursor = found.end;
    }

    Ok(components)
}

fn check_printable(components: &[Component]) -> Result<(), PrintError> {
    for component in components {
        match component {
            Component::Plain(_) => {}
            Component::Bold(children) | Component::Italic(children) | Component::Underline(children) => {
                check_printable(children)?;
            }
            Component::Color { color, children } => {
                color.check_printable()?;
                check_printable(children)?;
            }
        }
    }
    Ok(())
}

impl StyledText {
    pub(crate) fn check_printable(&self) -> Result<(), PrintError> {
        check_printable(&self.components)
    }
}

/// Parses one cue body located at `origin` in the caller's input.
pub fn parse_styled_text(text: &str, origin: usize) -> Result<StyledText, ParserError> {
    if text.is_empty() {
        return Err(ParserError::EmptyBody { pos: origin });
    }
    Ok(StyledText { components: parse_components(text, origin)? })
}

struct Children<'a>(&'a [Component]);

impl fmt::Display for Children<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for component in self.0 {
            write!(f, "{component}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (kind, children) = match self {
            Self::Plain(text) => return f.write_str(text),
            Self::Bold(children) => (TagKind::Bold, children),
            Self::Italic(children) => (TagKind::Italic, children),
            Self::Underline(children) => (TagKind::Underline, children),
            Self::Color { color, children } => {
                let [Delimiters { open, close }] = &FONT;
                return write!(f, "{open}{color}{FONT_VALUE_END}{}{close}", Children(children));
            }
        };
        let Delimiters { open, close } = &kind.delimiters()[0];
        write!(f, "{open}{}{close}", Children(children))
    }
}

impl fmt::Display for StyledText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Children(&self.components))
    }
}
