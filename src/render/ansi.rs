//! ANSI rendering of transcript lines.
//!
//! Lines are wrapped by display width before styling, so escape sequences never
//! count toward the width and every emitted row is self-contained: each styled
//! run opens and closes its own attributes.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::render::transcript::{LineKind, Link, ProjectCard, Span, TranscriptLine};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Plain,
    Command,
    Link,
    Title,
    Dim,
    Tag,
    Caret,
}

fn ansi_wrap(text: &str, prefix: &str, suffix: &str) -> String {
    format!("{prefix}{text}{suffix}")
}

pub fn bold_green(text: &str) -> String {
    ansi_wrap(text, "\x1b[1m\x1b[32m", "\x1b[39m\x1b[22m")
}

pub fn underline_cyan(text: &str) -> String {
    ansi_wrap(text, "\x1b[4m\x1b[36m", "\x1b[39m\x1b[24m")
}

pub fn bold(text: &str) -> String {
    ansi_wrap(text, "\x1b[1m", "\x1b[22m")
}

pub fn dim(text: &str) -> String {
    ansi_wrap(text, "\x1b[2m", "\x1b[22m")
}

pub fn yellow(text: &str) -> String {
    ansi_wrap(text, "\x1b[33m", "\x1b[39m")
}

pub fn inverse(text: &str) -> String {
    ansi_wrap(text, "\x1b[7m", "\x1b[27m")
}

pub fn paint(tone: Tone, text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    match tone {
        Tone::Plain => text.to_string(),
        Tone::Command => bold_green(text),
        Tone::Link => underline_cyan(text),
        Tone::Title => bold(text),
        Tone::Dim => dim(text),
        Tone::Tag => yellow(text),
        Tone::Caret => inverse(text),
    }
}

/// Tone a text span is painted with on a line of this kind.
pub fn text_tone(kind: LineKind) -> Tone {
    match kind {
        LineKind::Command => Tone::Command,
        LineKind::Output => Tone::Plain,
    }
}

const CARD_INDENT: &str = "  ";

/// Renders one transcript line into terminal rows no wider than `width`.
pub fn render_line(line: &TranscriptLine, width: usize) -> Vec<String> {
    match line {
        TranscriptLine::Text { kind, spans } => {
            let runs: Vec<(Tone, String)> = spans
                .iter()
                .map(|span| match span {
                    Span::Text(text) => (text_tone(*kind), text.clone()),
                    Span::Link(link) => (Tone::Link, link.label.clone()),
                })
                .collect();
            wrap_runs(&runs, width)
        }
        TranscriptLine::ProjectCard(card) => render_card(card, width),
    }
}

/// Renders a link the way it appears inline.
pub fn render_link(link: &Link) -> String {
    paint(Tone::Link, &link.label)
}

fn render_card(card: &ProjectCard, width: usize) -> Vec<String> {
    let inner = width.saturating_sub(CARD_INDENT.len()).max(1);
    let indent = |rows: Vec<String>| -> Vec<String> {
        rows.into_iter()
            .map(|row| format!("{CARD_INDENT}{row}"))
            .collect()
    };

    let mut rows = Vec::new();
    rows.extend(indent(wrap_runs(
        &[(Tone::Title, format!("▸ {}", card.title))],
        inner,
    )));
    if !card.description.is_empty() {
        rows.extend(indent(wrap_runs(
            &[(Tone::Dim, card.description.clone())],
            inner,
        )));
    }

    let mut tags: Vec<(Tone, String)> = Vec::new();
    for (position, tech) in card.technologies.iter().enumerate() {
        if position > 0 {
            tags.push((Tone::Plain, " ".to_string()));
        }
        tags.push((Tone::Tag, format!("[{tech}]")));
    }
    if !tags.is_empty() {
        rows.extend(indent(wrap_runs(&tags, inner)));
    }

    rows.extend(indent(wrap_runs(
        &[
            (Tone::Link, card.view.label.clone()),
            (Tone::Dim, format!(" {}", card.view.href)),
        ],
        inner,
    )));
    rows
}

/// Wraps styled runs at grapheme boundaries so no row exceeds `width` columns.
///
/// Always returns at least one row, empty when there is no text.
pub fn wrap_runs(runs: &[(Tone, String)], width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut rows: Vec<Vec<(Tone, String)>> = Vec::new();
    let mut row: Vec<(Tone, String)> = Vec::new();
    let mut used = 0usize;

    for (tone, text) in runs {
        for grapheme in text.graphemes(true) {
            let grapheme_width = grapheme.width();
            if used + grapheme_width > width && used > 0 {
                rows.push(std::mem::take(&mut row));
                used = 0;
            }
            match row.last_mut() {
                Some((last_tone, segment)) if *last_tone == *tone => segment.push_str(grapheme),
                _ => row.push((*tone, grapheme.to_string())),
            }
            used += grapheme_width;
        }
    }
    rows.push(row);

    rows.into_iter()
        .map(|row| {
            row.iter()
                .map(|(tone, segment)| paint(*tone, segment))
                .collect()
        })
        .collect()
}

/// Removes SGR escape sequences, leaving the visible text.
pub fn strip_ansi(text: &str) -> String {
    let mut visible = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '\x1b' && chars.peek() == Some(&'[') {
            chars.next();
            for next in chars.by_ref() {
                if ('\x40'..='\x7e').contains(&next) {
                    break;
                }
            }
            continue;
        }
        visible.push(ch);
    }
    visible
}
