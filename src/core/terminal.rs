//! Terminal trait the shell host drives.

use std::time::Duration;

/// Minimal terminal interface the shell host drives.
pub trait Terminal {
    /// Enter raw mode and start accepting input.
    fn start(&mut self) -> std::io::Result<()>;

    /// Restore the terminal state captured by `start`.
    fn stop(&mut self) -> std::io::Result<()>;

    /// Waits up to `timeout` for input. `Ok(None)` means nothing arrived.
    fn read_input(&mut self, timeout: Duration) -> std::io::Result<Option<String>>;

    /// Write output to the terminal.
    fn write(&mut self, data: &str);

    /// Terminal width in columns.
    fn columns(&self) -> u16;

    /// Whether a termination signal was received.
    fn termination_requested(&self) -> bool {
        false
    }
}
