//! The terminal controller: one owned instance per mounted terminal.
//!
//! Invariants:
//! - the transcript and history are mutated only through this type;
//! - the input stays disabled until the intro player reaches `Done`, so intro
//!   playback and command output never interleave.

use history_store::{HistoryLog, SessionStorage};
use unicode_segmentation::UnicodeSegmentation;

use crate::config::EnvConfig;
use crate::core::autocomplete::{resolve, suggestion_line, Completion};
use crate::core::history::History;
use crate::core::input::Key;
use crate::core::page::Page;
use crate::core::project::ProjectSource;
use crate::core::registry::{Registry, RenderOp};
use crate::render::transcript::{Link, LinkAction, Transcript, TranscriptChange, TranscriptLine};
use crate::runtime::typewriter::{
    intro_script, ScriptedLine, Step, TypewriterPlayer, TypewriterTiming,
};

/// State of the single-line input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputField {
    pub value: String,
    pub enabled: bool,
    pub focused: bool,
}

/// Decorative caret shown while the intro types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Caret {
    Steady,
    Blinking,
    Hidden,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// The controller consumed the key; the host must not apply its default.
    PreventDefault,
    /// Ordinary text editing, already applied to the field.
    PassThrough,
    /// The input is disabled or the key means nothing to the terminal.
    Ignored,
}

#[derive(Debug, Clone)]
pub struct TerminalOptions {
    pub script: Vec<ScriptedLine>,
    pub timing: TypewriterTiming,
    pub reduced_motion: bool,
}

impl Default for TerminalOptions {
    fn default() -> Self {
        Self {
            script: intro_script(),
            timing: TypewriterTiming::default(),
            reduced_motion: false,
        }
    }
}

impl TerminalOptions {
    pub fn from_config(config: &EnvConfig) -> Self {
        Self {
            script: intro_script(),
            timing: TypewriterTiming {
                char_interval: config.type_speed,
                line_pause: config.line_pause,
            },
            reduced_motion: config.reduced_motion,
        }
    }
}

pub struct TerminalController<S> {
    transcript: Transcript,
    history: History<S>,
    registry: Registry,
    projects: Box<dyn ProjectSource>,
    player: TypewriterPlayer,
    input: InputField,
    caret: Caret,
}

impl<S: SessionStorage> TerminalController<S> {
    pub fn new(
        options: TerminalOptions,
        history_log: HistoryLog<S>,
        projects: Box<dyn ProjectSource>,
    ) -> Self {
        Self {
            transcript: Transcript::new(),
            history: History::hydrate(history_log),
            registry: Registry::builtin(),
            projects,
            player: TypewriterPlayer::new(options.script, options.timing, options.reduced_motion),
            input: InputField::default(),
            caret: Caret::Steady,
        }
    }

    /// Begins intro playback. The host calls [`Self::tick_intro`] after each
    /// returned delay until it gets [`Step::Done`].
    pub fn start_intro(&mut self) -> Step {
        if !self.player.is_done() {
            self.caret = Caret::Blinking;
        }
        let step = self.player.start(&mut self.transcript);
        self.after_player_step(step)
    }

    pub fn tick_intro(&mut self) -> Step {
        let step = self.player.tick(&mut self.transcript);
        self.after_player_step(step)
    }

    fn after_player_step(&mut self, step: Step) -> Step {
        if step == Step::Done && !self.input.enabled {
            self.input.enabled = true;
            self.input.focused = true;
            self.caret = Caret::Hidden;
            tracing::info!(lines = self.transcript.len(), "intro finished; input enabled");
        }
        step
    }

    /// Routes one key to history, autocomplete, dispatch or the field itself.
    pub fn handle_key(&mut self, key: &Key, page: &mut dyn Page) -> KeyOutcome {
        if !self.input.enabled {
            return KeyOutcome::Ignored;
        }

        match key {
            Key::Enter => {
                self.submit(page);
                KeyOutcome::PreventDefault
            }
            Key::Up => {
                if let Some(entry) = self.history.recall_previous() {
                    self.input.value = entry.to_string();
                }
                KeyOutcome::PreventDefault
            }
            Key::Down => {
                if let Some(entry) = self.history.recall_next() {
                    self.input.value = entry.to_string();
                }
                KeyOutcome::PreventDefault
            }
            Key::Tab => {
                self.autocomplete();
                KeyOutcome::PreventDefault
            }
            Key::Text(text) => {
                self.input.value.push_str(text);
                KeyOutcome::PassThrough
            }
            Key::Backspace => {
                if let Some((index, _)) = self.input.value.grapheme_indices(true).next_back() {
                    self.input.value.truncate(index);
                }
                KeyOutcome::PassThrough
            }
            Key::Interrupt | Key::EndOfInput | Key::FollowLink | Key::Other(_) => {
                KeyOutcome::Ignored
            }
        }
    }

    /// Records the field value in history, dispatches it and clears the field.
    pub fn submit(&mut self, page: &mut dyn Page) {
        let value = std::mem::take(&mut self.input.value);
        self.history.append(&value);
        self.dispatch(&value, page);
    }

    /// Runs a command line and applies its render operations.
    pub fn dispatch(&mut self, raw: &str, page: &mut dyn Page) {
        let ops = self.registry.dispatch(raw, &*page, self.projects.as_ref());
        for op in ops {
            match op {
                RenderOp::Append(line) => {
                    self.transcript.push(line);
                }
                RenderOp::ClearTranscript => self.transcript.clear(),
                RenderOp::ScrollTo(section) => page.scroll_to(&section),
            }
        }
    }

    pub fn autocomplete(&mut self) {
        let vocabulary = self.registry.verbs();
        match resolve(&self.input.value, &vocabulary) {
            Completion::None => {}
            Completion::Fill(value) => {
                tracing::debug!(%value, "autocomplete fill");
                self.input.value = value;
            }
            Completion::Suggest(matches) => {
                self.transcript
                    .push(TranscriptLine::output(suggestion_line(&matches)));
            }
        }
    }

    /// Follows the most recently rendered link. Returns whether one existed.
    pub fn follow_last_link(&self, page: &mut dyn Page) -> bool {
        match self.transcript.last_link() {
            Some(link) => {
                activate_link(link, page);
                true
            }
            None => false,
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn drain_changes(&mut self) -> Vec<TranscriptChange> {
        self.transcript.drain_changes()
    }

    pub fn history(&self) -> &History<S> {
        &self.history
    }

    pub fn input(&self) -> &InputField {
        &self.input
    }

    pub fn caret(&self) -> Caret {
        self.caret
    }
}

/// Performs a link's activation against the page.
///
/// Fragment links to sections that do not exist do nothing.
pub fn activate_link(link: &Link, page: &mut dyn Page) {
    match &link.action {
        LinkAction::ScrollTo(section) => {
            if page.has_section(section) {
                page.scroll_to(section);
            }
        }
        LinkAction::OpenExternal(href) => page.open_external(href),
        LinkAction::Mail(address) => page.compose_mail(address),
        LinkAction::Download(href) => page.download(href),
    }
}
