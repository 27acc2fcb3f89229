//! Transcript model: the ordered log of command echoes and output.
//!
//! Invariant: lines are only ever appended or extended at the end; the single
//! destructive operation is [`Transcript::clear`].

use crate::core::project::ProjectRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Command,
    Output,
}

/// What following a link does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkAction {
    /// Smooth-scroll to an in-page section (identifier without `#`).
    ScrollTo(String),
    /// Open in a new browsing context.
    OpenExternal(String),
    /// Hand the address to the mail client.
    Mail(String),
    /// Download the asset at the given path.
    Download(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub label: String,
    pub href: String,
    pub action: LinkAction,
}

impl Link {
    /// Classifies `href`: fragments scroll, `mailto:` mails, everything else opens.
    pub fn new(href: impl Into<String>, label: impl Into<String>) -> Self {
        let href = href.into();
        let action = if let Some(section) = href.strip_prefix('#') {
            LinkAction::ScrollTo(section.to_string())
        } else if let Some(address) = href.strip_prefix("mailto:") {
            LinkAction::Mail(address.to_string())
        } else {
            LinkAction::OpenExternal(href.clone())
        };
        Self {
            label: label.into(),
            href,
            action,
        }
    }

    pub fn download(href: impl Into<String>, label: impl Into<String>) -> Self {
        let href = href.into();
        Self {
            label: label.into(),
            action: LinkAction::Download(href.clone()),
            href,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Span {
    Text(String),
    Link(Link),
}

/// Structured project block rendered by the `projects` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectCard {
    pub title: String,
    pub description: String,
    pub technologies: Vec<String>,
    pub view: Link,
}

pub const PROJECT_VIEW_LABEL: &str = "View →";
pub const DEFAULT_PROJECT_HREF: &str = "#projects";

impl From<&ProjectRecord> for ProjectCard {
    fn from(record: &ProjectRecord) -> Self {
        let href = if record.link.is_empty() {
            DEFAULT_PROJECT_HREF
        } else {
            record.link.as_str()
        };
        Self {
            title: record.title.clone(),
            description: record.description.clone(),
            technologies: record.technologies.clone(),
            view: Link::new(href, PROJECT_VIEW_LABEL),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptLine {
    Text { kind: LineKind, spans: Vec<Span> },
    ProjectCard(ProjectCard),
}

impl TranscriptLine {
    pub fn command(text: impl Into<String>) -> Self {
        Self::Text {
            kind: LineKind::Command,
            spans: vec![Span::Text(text.into())],
        }
    }

    pub fn output(text: impl Into<String>) -> Self {
        Self::Text {
            kind: LineKind::Output,
            spans: vec![Span::Text(text.into())],
        }
    }

    /// Output text, a single space, then the link.
    pub fn output_with_link(text: impl Into<String>, link: Link) -> Self {
        let mut text = text.into();
        text.push(' ');
        Self::Text {
            kind: LineKind::Output,
            spans: vec![Span::Text(text), Span::Link(link)],
        }
    }

    pub fn link_only(link: Link) -> Self {
        Self::Text {
            kind: LineKind::Output,
            spans: vec![Span::Link(link)],
        }
    }

    pub fn kind(&self) -> LineKind {
        match self {
            Self::Text { kind, .. } => *kind,
            Self::ProjectCard(_) => LineKind::Output,
        }
    }

    /// Text content with links reduced to their labels.
    pub fn plain_text(&self) -> String {
        match self {
            Self::Text { spans, .. } => spans
                .iter()
                .map(|span| match span {
                    Span::Text(text) => text.as_str(),
                    Span::Link(link) => link.label.as_str(),
                })
                .collect(),
            Self::ProjectCard(card) => card.title.clone(),
        }
    }

    pub fn links(&self) -> Vec<&Link> {
        match self {
            Self::Text { spans, .. } => spans
                .iter()
                .filter_map(|span| match span {
                    Span::Link(link) => Some(link),
                    Span::Text(_) => None,
                })
                .collect(),
            Self::ProjectCard(card) => vec![&card.view],
        }
    }
}

/// Incremental change record consumed by views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptChange {
    /// A complete line was appended at this index.
    Pushed(usize),
    /// Text was appended to the last span of the line at this index.
    TextAppended { line: usize, text: String },
    /// A separator and link were attached to the line at this index.
    LinkAttached { line: usize },
    Cleared,
}

#[derive(Debug, Default)]
pub struct Transcript {
    lines: Vec<TranscriptLine>,
    changes: Vec<TranscriptChange>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[TranscriptLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn push(&mut self, line: TranscriptLine) -> usize {
        let index = self.lines.len();
        self.lines.push(line);
        self.changes.push(TranscriptChange::Pushed(index));
        index
    }

    /// Opens an empty text line for incremental reveal.
    pub fn open_line(&mut self, kind: LineKind) -> usize {
        self.push(TranscriptLine::Text {
            kind,
            spans: vec![Span::Text(String::new())],
        })
    }

    /// Extends the trailing text span of `line`. Ignored for stale indices and cards.
    pub fn append_text(&mut self, line: usize, text: &str) {
        let Some(TranscriptLine::Text { spans, .. }) = self.lines.get_mut(line) else {
            return;
        };
        match spans.last_mut() {
            Some(Span::Text(existing)) => existing.push_str(text),
            _ => spans.push(Span::Text(text.to_string())),
        }
        self.changes.push(TranscriptChange::TextAppended {
            line,
            text: text.to_string(),
        });
    }

    /// Appends a space and `link` to an open line.
    pub fn attach_link(&mut self, line: usize, link: Link) {
        let Some(TranscriptLine::Text { spans, .. }) = self.lines.get_mut(line) else {
            return;
        };
        spans.push(Span::Text(" ".to_string()));
        spans.push(Span::Link(link));
        self.changes.push(TranscriptChange::LinkAttached { line });
    }

    pub fn clear(&mut self) {
        self.lines.clear();
        // Earlier changes refer to lines that no longer exist.
        self.changes.clear();
        self.changes.push(TranscriptChange::Cleared);
    }

    /// The most recently rendered link, if any line still holds one.
    pub fn last_link(&self) -> Option<&Link> {
        self.lines
            .iter()
            .rev()
            .find_map(|line| line.links().last().copied())
    }

    pub fn drain_changes(&mut self) -> Vec<TranscriptChange> {
        std::mem::take(&mut self.changes)
    }
}
