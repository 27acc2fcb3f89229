//! Transcript model and its ANSI rendering.

pub mod ansi;
pub mod transcript;

pub use transcript::{Link, LinkAction, ProjectCard, Span, Transcript, TranscriptLine};
