//! Raw-terminal host loop.
//!
//! The shell owns the terminal, the controller and the page. It turns input
//! bytes into keys, drives the intro from the player's delays and renders
//! transcript changes incrementally, so a typed line grows in place instead of
//! being redrawn.

use std::io;
use std::time::{Duration, Instant};

use folio_term::render::ansi::{bold_green, dim, paint, render_line, render_link, text_tone, Tone};
use folio_term::{
    Caret, Key, KeyBuffer, Step, Terminal, TerminalController, TranscriptChange, PROMPT,
};
use history_store::SessionStorage;
use unicode_width::UnicodeWidthStr;

use crate::page::ShellPage;

const IDLE_POLL: Duration = Duration::from_millis(250);
const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";
const ERASE_DOWN: &str = "\r\x1b[J";
const ERASE_TO_END: &str = "\x1b[K";
const CURSOR_LEFT: &str = "\x1b[D";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

pub struct Shell<T: Terminal, S: SessionStorage> {
    terminal: T,
    controller: TerminalController<S>,
    page: ShellPage,
    keys: KeyBuffer,
    /// The cursor sits at the end of an unterminated row.
    open_row: bool,
    /// Rows the visible prompt wrapped onto above the cursor's row.
    prompt_rows_above: Option<usize>,
}

impl<T: Terminal, S: SessionStorage> Shell<T, S> {
    pub fn new(terminal: T, controller: TerminalController<S>, page: ShellPage) -> Self {
        Self {
            terminal,
            controller,
            page,
            keys: KeyBuffer::default(),
            open_row: false,
            prompt_rows_above: None,
        }
    }

    pub fn controller(&self) -> &TerminalController<S> {
        &self.controller
    }

    pub fn terminal(&self) -> &T {
        &self.terminal
    }

    /// Starts the terminal, plays the intro, then serves input until exit.
    ///
    /// The terminal is stopped on every path out, including errors.
    pub fn run(&mut self) -> io::Result<()> {
        self.terminal.start()?;
        let result = self.serve();
        self.finish_row();
        let stopped = self.terminal.stop();
        result.and(stopped)
    }

    fn serve(&mut self) -> io::Result<()> {
        let mut step = self.controller.start_intro();
        self.flush();

        while let Step::Wait(delay) = step {
            if self.wait_for(delay)? == Flow::Exit {
                return Ok(());
            }
            step = self.controller.tick_intro();
            self.flush();
        }

        loop {
            if self.terminal.termination_requested() {
                tracing::info!("termination requested");
                return Ok(());
            }
            let keys = self.next_keys(IDLE_POLL)?;
            if self.handle_keys(keys) == Flow::Exit {
                return Ok(());
            }
        }
    }

    /// Sleeps on input until `delay` elapses. Keys typed meanwhile still reach
    /// the controller, which ignores them while the input is disabled.
    fn wait_for(&mut self, delay: Duration) -> io::Result<Flow> {
        let deadline = Instant::now() + delay;
        loop {
            if self.terminal.termination_requested() {
                return Ok(Flow::Exit);
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Ok(Flow::Continue);
            }
            let keys = self.next_keys(remaining)?;
            if self.handle_keys(keys) == Flow::Exit {
                return Ok(Flow::Exit);
            }
        }
    }

    /// Reads and decodes input, waiting no longer than a held escape
    /// sequence may. End of input is an exit request, not an error.
    fn next_keys(&mut self, timeout: Duration) -> io::Result<Vec<Key>> {
        let timeout = match self.keys.next_timeout(Instant::now()) {
            Some(flush_in) => timeout.min(flush_in),
            None => timeout,
        };
        let data = match self.terminal.read_input(timeout) {
            Ok(data) => data,
            Err(error) if error.kind() == io::ErrorKind::UnexpectedEof => {
                return Ok(vec![Key::EndOfInput]);
            }
            Err(error) => return Err(error),
        };

        let now = Instant::now();
        let mut keys = match data {
            Some(data) => self.keys.push(&data, now),
            None => Vec::new(),
        };
        keys.extend(self.keys.flush_due(now));
        Ok(keys)
    }

    fn handle_keys(&mut self, keys: Vec<Key>) -> Flow {
        for key in keys {
            tracing::trace!(key = key.id(), "key");
            match key {
                Key::Interrupt | Key::EndOfInput => return Flow::Exit,
                Key::FollowLink => {
                    if !self.controller.follow_last_link(&mut self.page) {
                        tracing::debug!("no link to follow");
                    }
                }
                other => {
                    self.controller.handle_key(&other, &mut self.page);
                }
            }
            self.flush();
        }
        Flow::Continue
    }

    /// Writes pending transcript changes and page events, then the prompt.
    pub fn flush(&mut self) {
        let changes = self.controller.drain_changes();
        let events = self.page.drain_events();

        if let Some(rows_above) = self.prompt_rows_above.take() {
            if rows_above > 0 {
                self.terminal.write(&format!("\x1b[{rows_above}A"));
            }
            self.terminal.write(ERASE_DOWN);
            self.open_row = false;
        }

        for change in changes {
            self.render_change(change);
        }
        for event in events {
            self.start_row();
            self.terminal.write(&dim(&event.status()));
            self.open_row = true;
        }

        if self.controller.input().enabled {
            self.start_row();
            let value = &self.controller.input().value;
            let prompt = format!("{}{value}", bold_green(PROMPT));
            let width = PROMPT.width() + value.width();
            let columns = usize::from(self.terminal.columns()).max(1);
            self.terminal.write(&prompt);
            // A row filled exactly leaves the cursor on it until the next write.
            self.prompt_rows_above = Some((width.max(1) - 1) / columns);
            self.open_row = true;
        } else if self.controller.caret() == Caret::Blinking {
            self.terminal.write(&paint(Tone::Caret, " "));
            self.terminal.write(CURSOR_LEFT);
        }
    }

    fn render_change(&mut self, change: TranscriptChange) {
        let width = usize::from(self.terminal.columns());
        let transcript = self.controller.transcript();
        match change {
            TranscriptChange::Pushed(index) => {
                let Some(rows) = transcript
                    .lines()
                    .get(index)
                    .map(|line| render_line(line, width).join("\r\n"))
                else {
                    return;
                };
                self.start_row();
                self.terminal.write(&rows);
                self.open_row = true;
            }
            TranscriptChange::TextAppended { line, text } => {
                if let Some(line) = transcript.lines().get(line) {
                    let painted = paint(text_tone(line.kind()), &text);
                    self.terminal.write(&painted);
                }
            }
            TranscriptChange::LinkAttached { line } => {
                let painted = transcript
                    .lines()
                    .get(line)
                    .and_then(|line| line.links().last().map(|link| render_link(link)));
                if let Some(painted) = painted {
                    self.terminal.write(&format!(" {painted}"));
                }
            }
            TranscriptChange::Cleared => {
                self.terminal.write(CLEAR_SCREEN);
                self.open_row = false;
            }
        }
    }

    /// Terminates the current row, if any, so the next write starts a new one.
    fn start_row(&mut self) {
        if self.open_row {
            self.terminal.write(ERASE_TO_END);
            self.terminal.write("\r\n");
            self.open_row = false;
        }
    }

    fn finish_row(&mut self) {
        self.start_row();
        self.prompt_rows_above = None;
    }
}
