//! Busy indicator shown while a request is in flight.

use std::io::{IsTerminal, Write};

/// Something that can show that an action is running.
pub trait BusyIndicator: Send + Sync {
    /// Turns the indicator on or off.
    fn set_busy(&self, busy: bool);
}

/// Turns the indicator on for its lifetime and off when dropped, on every
/// exit path including errors and panics.
pub struct BusyGuard<'a> {
    indicator: &'a dyn BusyIndicator,
}

impl<'a> BusyGuard<'a> {
    /// Turns `indicator` on.
    pub fn new(indicator: &'a dyn BusyIndicator) -> Self {
        indicator.set_busy(true);
        Self { indicator }
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.indicator.set_busy(false);
    }
}

/// Writes a status line to stderr when it is a terminal.
#[derive(Debug, Default)]
pub struct TerminalBusy;

impl BusyIndicator for TerminalBusy {
    fn set_busy(&self, busy: bool) {
        let mut stderr = std::io::stderr();
        if !stderr.is_terminal() {
            return;
        }
        let _ = if busy {
            write!(stderr, "Creating event…")
        } else {
            write!(stderr, "\r\x1b[2K")
        };
        let _ = stderr.flush();
    }
}
