//! Interactive portfolio terminal.
//!
//! Invariant: the transcript is mutated only by [`TerminalController`]; hosts
//! read it through [`TerminalController::drain_changes`] and render the changes.
//!
//! # Public API Overview
//! - Play the scripted intro with [`TypewriterPlayer`], driven by the host from
//!   the [`Step`] delays it returns.
//! - Dispatch command lines through [`Registry`]; handlers return [`RenderOp`]s.
//! - Persist and recall submitted input with [`History`] over a
//!   [`history_store::SessionStorage`] backend.
//! - Describe the surrounding page with the [`Page`] trait.
//! - Render transcript lines to ANSI rows with [`render::ansi::render_line`].
//!
//! # Environment
//! [`EnvConfig::from_env`] reads `FOLIO_REDUCED_MOTION`, `FOLIO_TYPE_SPEED_MS`,
//! `FOLIO_LINE_PAUSE_MS`, `FOLIO_HISTORY_DIR`, `FOLIO_PAGE`, `FOLIO_LOG` and
//! `FOLIO_LOG_FILE`.

pub mod config;
pub mod logging;

pub mod core;
pub mod platform;
pub mod render;
pub mod runtime;

/// Environment configuration and logging bootstrap.
pub use crate::config::EnvConfig;
pub use crate::logging::LoggingError;

/// Command parsing, dispatch and completion.
pub use crate::core::autocomplete::{resolve as resolve_completion, Completion};
pub use crate::core::command::{parse_command, Command, PROMPT};
pub use crate::core::registry::{CommandSpec, Registry, RenderOp};

/// Input history.
pub use crate::core::history::History;

/// Keyboard input parsing.
pub use crate::core::input::{parse_keys, Key, KeyBuffer};

/// Page collaborator and project records.
pub use crate::core::page::{Page, PageDocument, PageError, Section};
pub use crate::core::project::{
    select_project_source, ListingItem, MarkupProjects, ProjectRecord, ProjectSource,
    SampleProjects,
};

/// Terminal interfaces and process-backed implementation.
pub use crate::core::terminal::Terminal;
#[cfg(unix)]
pub use crate::platform::process_terminal::ProcessTerminal;

/// Transcript model.
pub use crate::render::transcript::{
    LineKind, Link, LinkAction, ProjectCard, Span, Transcript, TranscriptChange, TranscriptLine,
};

/// Intro playback and the terminal controller.
pub use crate::runtime::controller::{
    activate_link, Caret, InputField, KeyOutcome, TerminalController, TerminalOptions,
};
pub use crate::runtime::typewriter::{
    intro_script, PlayerState, ScriptLink, ScriptedLine, Step, TypewriterPlayer, TypewriterTiming,
};
