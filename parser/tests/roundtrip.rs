//! Property tests for the parse/print pair.
//!
//! Generated documents are first brought into canonical shape: adjacent plain
//! runs are merged and a tag kind never appears inside itself (the shortest
//! match rule would close the outer tag at the inner closing delimiter).

use proptest::prelude::*;
use srt::{AnchorPosition, Color, Component, Coordinates, Cue, CueMetadata, Document, StyledText, Time, Timing};

#[derive(Debug, Clone, Copy, PartialEq)]
enum Kind {
    Bold,
    Italic,
    Underline,
    Color,
}

fn push_plain(out: &mut Vec<Component>, text: &str) {
    if let Some(Component::Plain(last)) = out.last_mut() {
        last.push_str(text);
    } else {
        out.push(Component::plain(text));
    }
}

fn canonicalize(components: Vec<Component>, open: &[Kind], out: &mut Vec<Component>) {
    for component in components {
        let (kind, children) = match &component {
            Component::Plain(text) => {
                push_plain(out, text);
                continue;
            }
            Component::Bold(children) => (Kind::Bold, children.clone()),
            Component::Italic(children) => (Kind::Italic, children.clone()),
            Component::Underline(children) => (Kind::Underline, children.clone()),
            Component::Color { children, .. } => (Kind::Color, children.clone()),
        };

        if open.contains(&kind) {
            canonicalize(children, open, out);
            continue;
        }

        let mut nested = open.to_vec();
        nested.push(kind);
        let mut normalized = Vec::new();
        canonicalize(children, &nested, &mut normalized);

        out.push(match component {
            Component::Bold(_) => Component::Bold(normalized),
            Component::Italic(_) => Component::Italic(normalized),
            Component::Underline(_) => Component::Underline(normalized),
            Component::Color { color, .. } => Component::Color { color, children: normalized },
            Component::Plain(_) => unreachable!(),
        });
    }
}

fn text_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z0-9 ,.!?'♪-]{1,12}"
}

fn color_strategy() -> impl Strategy<Value = Color> {
    prop_oneof![
        any::<(u8, u8, u8)>().prop_map(|(red, green, blue)| Color::rgb(red, green, blue)),
        "[a-z]{1,8}".prop_map(Color::Named),
    ]
}

fn component_strategy() -> impl Strategy<Value = Component> {
    let leaf = text_strategy().prop_map(Component::Plain);
    leaf.prop_recursive(4, 24, 3, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..3).prop_map(Component::Bold),
            prop::collection::vec(inner.clone(), 0..3).prop_map(Component::Italic),
            prop::collection::vec(inner.clone(), 0..3).prop_map(Component::Underline),
            (color_strategy(), prop::collection::vec(inner, 0..3))
                .prop_map(|(color, children)| Component::Color { color, children }),
        ]
    })
}

fn time_strategy() -> impl Strategy<Value = Time> {
    (0..100u32, 0..60u32, 0..60u32, 0..1000u32)
        .prop_map(|(hours, minutes, seconds, milliseconds)| Time::new(hours, minutes, seconds, milliseconds))
}

fn coordinates_strategy() -> impl Strategy<Value = Coordinates> {
    (-2000..2000i32, -2000..2000i32, -2000..2000i32, -2000..2000i32)
        .prop_map(|(x1, x2, y1, y2)| Coordinates::new(x1, x2, y1, y2))
}

fn cue_strategy() -> impl Strategy<Value = Cue> {
    (
        1..100_000u32,
        time_strategy(),
        time_strategy(),
        proptest::option::of(coordinates_strategy()),
        proptest::option::of(0..12u32),
        prop::collection::vec(component_strategy(), 1..4),
    )
        .prop_map(|(counter, start, end, coordinates, anchor, components)| {
            let mut text = Vec::new();
            canonicalize(components, &[], &mut text);
            Cue {
                counter,
                metadata: CueMetadata {
                    timing: Timing::new(start, end),
                    coordinates,
                    anchor: anchor.map(AnchorPosition::from_pad_number),
                },
                text: StyledText::new(text),
            }
        })
}

fn document_strategy() -> impl Strategy<Value = Document> {
    prop::collection::vec(cue_strategy(), 0..5).prop_map(|cues| Document { cues })
}

fn to_curly_syntax(printed: &str) -> String {
    let mut curly = printed.to_owned();
    for tag in ["b", "i", "u"] {
        curly = curly
            .replace(&format!("<{tag}>"), &format!("{{{}}}", tag.to_uppercase()))
            .replace(&format!("</{tag}>"), &format!("{{/{tag}}}"));
    }
    curly
}

proptest! {
    #[test]
    fn parse_inverts_print(document in document_strategy()) {
        let printed = srt::print(&document).unwrap();
        let parsed = srt::parse(&printed);
        prop_assert_eq!(parsed, Ok(document), "printed:\n{}", printed);
    }

    #[test]
    fn canonical_form_is_idempotent(document in document_strategy()) {
        let canonical = srt::print(&document).unwrap();
        let reparsed = srt::parse(&canonical).unwrap();
        prop_assert_eq!(srt::print(&reparsed).unwrap(), canonical);
    }

    #[test]
    fn curly_syntax_parses_to_the_same_document(document in document_strategy()) {
        let curly = to_curly_syntax(&srt::print(&document).unwrap());
        let parsed = srt::parse(&curly);
        prop_assert_eq!(parsed, Ok(document), "input:\n{}", curly);
    }

    #[test]
    fn crlf_and_padding_are_normalized(document in document_strategy()) {
        let canonical = srt::print(&document).unwrap();
        let windows = format!("\u{FEFF}\r\n{}\r\n\r\n", canonical.replace('\n', "\r\n"));
        let parsed = srt::parse(&windows).unwrap();
        prop_assert_eq!(srt::print(&parsed).unwrap(), canonical);
    }
}
