//! Key parsing for raw terminal input.
//!
//! A single read may carry several keys (fast typing, pastes), so input is split
//! into [`Key`]s rather than matched as a whole. A read may also end in the
//! middle of an escape sequence; [`KeyBuffer`] holds such a tail until the rest
//! arrives or its flush deadline passes.

use std::time::{Duration, Instant};

const CTRL_C: char = '\x03';
const CTRL_D: char = '\x04';
const CTRL_H: char = '\x08';
const CTRL_O: char = '\x0f';
const ESC: char = '\x1b';
const DEL: char = '\x7f';

/// How long an unfinished escape sequence waits for its remainder.
pub const ESCAPE_TIMEOUT: Duration = Duration::from_millis(10);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Enter,
    Tab,
    Up,
    Down,
    Backspace,
    /// Printable text, possibly several characters.
    Text(String),
    Interrupt,
    EndOfInput,
    FollowLink,
    /// Recognized escape sequence or control byte the terminal does not use.
    Other(String),
}

impl Key {
    /// Stable identifier used in logs.
    pub fn id(&self) -> &'static str {
        match self {
            Key::Enter => "enter",
            Key::Tab => "tab",
            Key::Up => "up",
            Key::Down => "down",
            Key::Backspace => "backspace",
            Key::Text(_) => "text",
            Key::Interrupt => "ctrl+c",
            Key::EndOfInput => "ctrl+d",
            Key::FollowLink => "ctrl+o",
            Key::Other(_) => "other",
        }
    }
}

pub fn parse_keys(data: &str) -> Vec<Key> {
    let mut keys = Vec::new();
    let mut text = String::new();
    let mut rest = data;

    while let Some(ch) = rest.chars().next() {
        if !ch.is_control() {
            text.push(ch);
            rest = &rest[ch.len_utf8()..];
            continue;
        }

        if !text.is_empty() {
            keys.push(Key::Text(std::mem::take(&mut text)));
        }

        if ch == ESC {
            let (key, consumed) = parse_escape(rest);
            keys.push(key);
            rest = &rest[consumed..];
            continue;
        }

        let key = match ch {
            '\r' | '\n' => Key::Enter,
            '\t' => Key::Tab,
            DEL | CTRL_H => Key::Backspace,
            CTRL_C => Key::Interrupt,
            CTRL_D => Key::EndOfInput,
            CTRL_O => Key::FollowLink,
            other => Key::Other(other.to_string()),
        };
        // CRLF from some terminals is one Enter.
        let consumed = if rest.starts_with("\r\n") { 2 } else { ch.len_utf8() };
        keys.push(key);
        rest = &rest[consumed..];
    }

    if !text.is_empty() {
        keys.push(Key::Text(text));
    }
    keys
}

/// Parses one escape sequence at the start of `data`, returning the key and the
/// number of bytes consumed.
fn parse_escape(data: &str) -> (Key, usize) {
    let bytes = data.as_bytes();
    match bytes.get(1) {
        Some(b'[') => {
            // CSI: parameters and intermediates, then one final byte in 0x40..=0x7e.
            let final_index = bytes[2..]
                .iter()
                .position(|byte| (0x40..=0x7e).contains(byte))
                .map(|offset| offset + 2);
            match final_index {
                Some(index) => {
                    let sequence = &data[..=index];
                    let key = match (bytes[index], &data[2..index]) {
                        (b'A', "" | "1") => Key::Up,
                        (b'B', "" | "1") => Key::Down,
                        (b'u', "13") => Key::Enter,
                        (b'u', "9") => Key::Tab,
                        (b'u', "127") => Key::Backspace,
                        _ => Key::Other(sequence.to_string()),
                    };
                    (key, index + 1)
                }
                None => (Key::Other(data.to_string()), data.len()),
            }
        }
        Some(b'O') => match bytes.get(2) {
            Some(b'A') => (Key::Up, 3),
            Some(b'B') => (Key::Down, 3),
            Some(_) => {
                let end = 2 + data[2..].chars().next().map_or(0, char::len_utf8);
                (Key::Other(data[..end].to_string()), end)
            }
            None => (Key::Other(data.to_string()), data.len()),
        },
        Some(_) => {
            // Alt+key: swallow the escape and the following character.
            let next_len = data[1..].chars().next().map_or(0, char::len_utf8);
            (Key::Other(data[..1 + next_len].to_string()), 1 + next_len)
        }
        None => (Key::Other(ESC.to_string()), 1),
    }
}

/// Length of an unfinished escape sequence at the end of `data`, or 0.
///
/// Sequences never contain `ESC`, so only the last one can be cut short.
fn incomplete_escape_len(data: &str) -> usize {
    let Some(start) = data.rfind(ESC) else {
        return 0;
    };
    let tail = &data[start..];
    let bytes = tail.as_bytes();
    let incomplete = match bytes.get(1) {
        None => true,
        Some(b'[') => !bytes[2..].iter().any(|byte| (0x40..=0x7e).contains(byte)),
        Some(b'O') => bytes.len() == 2,
        Some(_) => false,
    };
    if incomplete {
        tail.len()
    } else {
        0
    }
}

/// Stateful key decoder for chunked terminal input.
#[derive(Debug)]
pub struct KeyBuffer {
    pending: String,
    flush_deadline: Option<Instant>,
    timeout: Duration,
}

impl Default for KeyBuffer {
    fn default() -> Self {
        Self::new(ESCAPE_TIMEOUT)
    }
}

impl KeyBuffer {
    pub fn new(timeout: Duration) -> Self {
        Self {
            pending: String::new(),
            flush_deadline: None,
            timeout,
        }
    }

    /// Decodes `data` after any held tail, holding back a new unfinished tail.
    pub fn push(&mut self, data: &str, now: Instant) -> Vec<Key> {
        self.pending.push_str(data);
        let held = incomplete_escape_len(&self.pending);
        let tail = self.pending.split_off(self.pending.len() - held);
        let keys = parse_keys(&self.pending);

        if tail.is_empty() {
            self.flush_deadline = None;
        } else if keys.is_empty() && self.flush_deadline.is_some() {
            // Still the same sequence: keep its original deadline.
        } else {
            self.flush_deadline = Some(now + self.timeout);
        }
        self.pending = tail;
        keys
    }

    /// Emits the held tail as-is once its deadline has passed.
    pub fn flush_due(&mut self, now: Instant) -> Vec<Key> {
        match self.flush_deadline {
            Some(deadline) if now >= deadline => {
                self.flush_deadline = None;
                parse_keys(&std::mem::take(&mut self.pending))
            }
            _ => Vec::new(),
        }
    }

    /// Time left before [`Self::flush_due`] would emit, if anything is held.
    pub fn next_timeout(&self, now: Instant) -> Option<Duration> {
        self.flush_deadline
            .map(|deadline| deadline.saturating_duration_since(now))
    }

    pub fn pending(&self) -> &str {
        &self.pending
    }
}
