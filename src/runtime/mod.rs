//! Intro playback and the controller that owns a terminal instance.

pub mod controller;
pub mod typewriter;

pub use controller::{Caret, InputField, KeyOutcome, TerminalController, TerminalOptions};
pub use typewriter::{Step, TypewriterPlayer, TypewriterTiming};
