//! Scripted intro playback.
//!
//! The player is a state machine driven by its host: every call returns a
//! [`Step`] telling the host how long to wait before the next [`tick`]. Nothing
//! blocks and nothing runs on its own.
//!
//! ```text
//! Idle -> PlayingLine -> PausingBetweenLines -> (PlayingLine | Done)
//! Idle -> Done                                    (reduced motion)
//! ```
//!
//! [`tick`]: TypewriterPlayer::tick

use std::time::Duration;

use unicode_segmentation::UnicodeSegmentation;

use crate::config::{DEFAULT_LINE_PAUSE_MS, DEFAULT_TYPE_SPEED_MS};
use crate::core::command::PROMPT;
use crate::render::transcript::{LineKind, Link, Span, Transcript, TranscriptLine};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptLink {
    pub target: String,
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptedLine {
    pub kind: LineKind,
    pub text: String,
    pub link: Option<ScriptLink>,
}

impl ScriptedLine {
    pub fn command(text: impl Into<String>) -> Self {
        Self {
            kind: LineKind::Command,
            text: format!("{PROMPT}{}", text.into()),
            link: None,
        }
    }

    pub fn output(text: impl Into<String>) -> Self {
        Self {
            kind: LineKind::Output,
            text: text.into(),
            link: None,
        }
    }

    pub fn with_link(mut self, target: impl Into<String>, label: impl Into<String>) -> Self {
        self.link = Some(ScriptLink {
            target: target.into(),
            label: Some(label.into()),
        });
        self
    }

    /// The link element appended once the text is fully revealed.
    fn link(&self) -> Option<Link> {
        self.link.as_ref().map(|link| {
            let label = link.label.as_deref().unwrap_or(link.target.as_str());
            Link::new(link.target.as_str(), label)
        })
    }

    fn to_line(&self) -> TranscriptLine {
        let mut spans = vec![Span::Text(self.text.clone())];
        if let Some(link) = self.link() {
            spans.push(Span::Text(" ".to_string()));
            spans.push(Span::Link(link));
        }
        TranscriptLine::Text {
            kind: self.kind,
            spans,
        }
    }
}

/// The six-line intro: identity, skills and projects, each as a command and
/// its response.
pub fn intro_script() -> Vec<ScriptedLine> {
    vec![
        ScriptedLine::command("whoami"),
        ScriptedLine::output("Kim Eddy — Futuristic Full-Stack Developer"),
        ScriptedLine::command("skills --top"),
        ScriptedLine::output("JavaScript • Node.js • React • Python • DevOps"),
        ScriptedLine::command("open projects"),
        ScriptedLine::output("Showing latest projects... ").with_link("#projects", "Open projects"),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypewriterTiming {
    /// Delay between revealed characters.
    pub char_interval: Duration,
    /// Delay after a finished line before the next one starts.
    pub line_pause: Duration,
}

impl Default for TypewriterTiming {
    fn default() -> Self {
        Self {
            char_interval: Duration::from_millis(DEFAULT_TYPE_SPEED_MS),
            line_pause: Duration::from_millis(DEFAULT_LINE_PAUSE_MS),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerState {
    Idle,
    PlayingLine {
        index: usize,
        transcript_line: usize,
        /// Byte offset of the unrevealed remainder of the line's text.
        revealed: usize,
    },
    PausingBetweenLines {
        next: usize,
    },
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Call `tick` again after this delay.
    Wait(Duration),
    /// Playback finished; the player is inert from now on.
    Done,
}

#[derive(Debug)]
pub struct TypewriterPlayer {
    script: Vec<ScriptedLine>,
    timing: TypewriterTiming,
    reduced_motion: bool,
    state: PlayerState,
}

impl TypewriterPlayer {
    pub fn new(script: Vec<ScriptedLine>, timing: TypewriterTiming, reduced_motion: bool) -> Self {
        Self {
            script,
            timing,
            reduced_motion,
            state: PlayerState::Idle,
        }
    }

    pub fn state(&self) -> &PlayerState {
        &self.state
    }

    pub fn is_done(&self) -> bool {
        self.state == PlayerState::Done
    }

    pub fn script(&self) -> &[ScriptedLine] {
        &self.script
    }

    /// Leaves `Idle`. Later calls are ignored, so playback never restarts.
    pub fn start(&mut self, transcript: &mut Transcript) -> Step {
        if self.state != PlayerState::Idle {
            return self.pending_step();
        }

        if self.reduced_motion {
            for line in &self.script {
                transcript.push(line.to_line());
            }
            self.state = PlayerState::Done;
            return Step::Done;
        }

        self.begin_line(0, transcript)
    }

    /// Advances one step. Ticks after `Done` are no-ops.
    pub fn tick(&mut self, transcript: &mut Transcript) -> Step {
        match self.state {
            PlayerState::Idle => self.start(transcript),
            PlayerState::PlayingLine {
                index,
                transcript_line,
                revealed,
            } => {
                let text = self.script[index].text.as_str();
                match text[revealed..].graphemes(true).next() {
                    Some(grapheme) => {
                        transcript.append_text(transcript_line, grapheme);
                        self.state = PlayerState::PlayingLine {
                            index,
                            transcript_line,
                            revealed: revealed + grapheme.len(),
                        };
                        Step::Wait(self.timing.char_interval)
                    }
                    None => {
                        if let Some(link) = self.script[index].link() {
                            transcript.attach_link(transcript_line, link);
                        }
                        self.state = PlayerState::PausingBetweenLines { next: index + 1 };
                        Step::Wait(self.timing.line_pause)
                    }
                }
            }
            PlayerState::PausingBetweenLines { next } => self.begin_line(next, transcript),
            PlayerState::Done => Step::Done,
        }
    }

    /// Opens line `index` and reveals its first character.
    fn begin_line(&mut self, index: usize, transcript: &mut Transcript) -> Step {
        let Some(line) = self.script.get(index) else {
            self.state = PlayerState::Done;
            return Step::Done;
        };

        let transcript_line = transcript.open_line(line.kind);
        self.state = PlayerState::PlayingLine {
            index,
            transcript_line,
            revealed: 0,
        };
        self.tick(transcript)
    }

    fn pending_step(&self) -> Step {
        match self.state {
            PlayerState::Done => Step::Done,
            PlayerState::PausingBetweenLines { .. } => Step::Wait(self.timing.line_pause),
            _ => Step::Wait(self.timing.char_interval),
        }
    }
}
