//! Process-based terminal implementation over stdin/stdout.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::core::terminal::Terminal;

#[cfg(unix)]
use libc::{self, c_int};

const DEFAULT_COLUMNS: u16 = 80;
const READ_BUFFER: usize = 4096;

#[cfg(unix)]
fn read_columns(fd: c_int) -> Option<u16> {
    let mut size = libc::winsize {
        ws_row: 0,
        ws_col: 0,
        ws_xpixel: 0,
        ws_ypixel: 0,
    };
    let result = unsafe { libc::ioctl(fd, libc::TIOCGWINSZ, &mut size) };
    if result == 0 && size.ws_col > 0 {
        Some(size.ws_col)
    } else {
        None
    }
}

#[cfg(unix)]
fn poll_readable(fd: c_int, timeout_ms: i32) -> std::io::Result<bool> {
    let mut fds = libc::pollfd {
        fd,
        events: libc::POLLIN,
        revents: 0,
    };
    let result = unsafe { libc::poll(&mut fds, 1, timeout_ms) };
    if result < 0 {
        let err = std::io::Error::last_os_error();
        if err.kind() == std::io::ErrorKind::Interrupted {
            return Ok(false);
        }
        return Err(err);
    }
    Ok(result > 0 && (fds.revents & (libc::POLLIN | libc::POLLHUP)) != 0)
}

#[cfg(unix)]
fn get_termios(fd: c_int) -> std::io::Result<libc::termios> {
    let mut termios = unsafe { std::mem::zeroed::<libc::termios>() };
    let result = unsafe { libc::tcgetattr(fd, &mut termios) };
    if result != 0 {
        return Err(std::io::Error::last_os_error());
    }
    Ok(termios)
}

#[cfg(unix)]
fn set_termios(fd: c_int, termios: &libc::termios) -> std::io::Result<()> {
    let result = unsafe { libc::tcsetattr(fd, libc::TCSANOW, termios) };
    if result != 0 {
        return Err(std::io::Error::last_os_error());
    }
    Ok(())
}

#[cfg(unix)]
fn write_fd(fd: c_int, data: &str) {
    let mut remaining = data.as_bytes();
    while !remaining.is_empty() {
        let result =
            unsafe { libc::write(fd, remaining.as_ptr() as *const libc::c_void, remaining.len()) };
        if result < 0 {
            let err = std::io::Error::last_os_error();
            if err.kind() == std::io::ErrorKind::Interrupted {
                continue;
            }
            tracing::warn!(%err, "terminal write failed");
            return;
        }
        remaining = &remaining[result as usize..];
    }
}

/// Splits off the longest valid UTF-8 prefix, keeping an incomplete trailing
/// sequence in `pending` for the next read.
fn take_utf8(pending: &mut Vec<u8>) -> String {
    let valid_up_to = match std::str::from_utf8(pending) {
        Ok(text) => text.len(),
        Err(error) => match error.error_len() {
            // Truncated sequence at the end: wait for the rest.
            None => error.valid_up_to(),
            // Invalid bytes: decode lossily rather than stall forever.
            Some(_) => {
                let text = String::from_utf8_lossy(pending).into_owned();
                pending.clear();
                return text;
            }
        },
    };
    let rest = pending.split_off(valid_up_to);
    let bytes = std::mem::replace(pending, rest);
    String::from_utf8(bytes).unwrap_or_default()
}

#[cfg(unix)]
pub struct ProcessTerminal {
    stdin_fd: c_int,
    stdout_fd: c_int,
    original_termios: Option<libc::termios>,
    pending: Vec<u8>,
    terminate: Arc<AtomicBool>,
    signal_ids: Vec<signal_hook::SigId>,
}

#[cfg(unix)]
impl Default for ProcessTerminal {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(unix)]
impl ProcessTerminal {
    pub fn new() -> Self {
        Self {
            stdin_fd: libc::STDIN_FILENO,
            stdout_fd: libc::STDOUT_FILENO,
            original_termios: None,
            pending: Vec::new(),
            terminate: Arc::new(AtomicBool::new(false)),
            signal_ids: Vec::new(),
        }
    }

    fn enable_raw_mode(&mut self) -> std::io::Result<()> {
        let original = match self.original_termios {
            Some(original) => original,
            None => {
                let original = get_termios(self.stdin_fd)?;
                self.original_termios = Some(original);
                original
            }
        };
        let mut raw = original;
        unsafe {
            libc::cfmakeraw(&mut raw);
        }
        // Keep output post-processing so "\n" still returns the carriage.
        raw.c_oflag |= libc::OPOST | libc::ONLCR;
        set_termios(self.stdin_fd, &raw)
    }

    fn restore_raw_mode(&mut self) -> std::io::Result<()> {
        if let Some(original) = self.original_termios.take() {
            set_termios(self.stdin_fd, &original)?;
        }
        Ok(())
    }

    fn register_signals(&mut self) -> std::io::Result<()> {
        for signal in [
            signal_hook::consts::SIGTERM,
            signal_hook::consts::SIGHUP,
            signal_hook::consts::SIGINT,
        ] {
            let id = signal_hook::flag::register(signal, Arc::clone(&self.terminate))?;
            self.signal_ids.push(id);
        }
        Ok(())
    }

    fn unregister_signals(&mut self) {
        for id in self.signal_ids.drain(..) {
            signal_hook::low_level::unregister(id);
        }
    }
}

#[cfg(unix)]
impl Terminal for ProcessTerminal {
    fn start(&mut self) -> std::io::Result<()> {
        self.enable_raw_mode()?;
        if let Err(err) = self.register_signals() {
            let _ = self.restore_raw_mode();
            return Err(err);
        }
        Ok(())
    }

    fn stop(&mut self) -> std::io::Result<()> {
        self.unregister_signals();
        self.restore_raw_mode()
    }

    fn read_input(&mut self, timeout: Duration) -> std::io::Result<Option<String>> {
        let timeout_ms = i32::try_from(timeout.as_millis()).unwrap_or(i32::MAX);
        if !poll_readable(self.stdin_fd, timeout_ms)? {
            return Ok(None);
        }

        let mut buffer = [0u8; READ_BUFFER];
        let read_len =
            unsafe { libc::read(self.stdin_fd, buffer.as_mut_ptr() as *mut _, buffer.len()) };
        if read_len < 0 {
            let err = std::io::Error::last_os_error();
            if err.kind() == std::io::ErrorKind::Interrupted {
                return Ok(None);
            }
            return Err(err);
        }
        if read_len == 0 {
            return Err(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "stdin closed",
            ));
        }

        self.pending.extend_from_slice(&buffer[..read_len as usize]);
        let text = take_utf8(&mut self.pending);
        Ok(if text.is_empty() { None } else { Some(text) })
    }

    fn write(&mut self, data: &str) {
        write_fd(self.stdout_fd, data);
    }

    fn columns(&self) -> u16 {
        read_columns(self.stdout_fd).unwrap_or(DEFAULT_COLUMNS)
    }

    fn termination_requested(&self) -> bool {
        self.terminate.load(Ordering::SeqCst)
    }
}

#[cfg(unix)]
impl Drop for ProcessTerminal {
    fn drop(&mut self) {
        let _ = self.stop();
    }
}
