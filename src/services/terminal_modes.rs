//! Terminal mode management
//!
//! Tracks raw mode and the alternate screen so the terminal can be restored
//! on exit, on panic, and while an external editor owns it.

use anyhow::Result;
use crossterm::{
    cursor::Show,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use std::io::{stdout, Write};

/// Tracks which terminal modes have been enabled and provides cleanup.
///
/// Use `TerminalModes::enable()` to set up the terminal, then call `undo()`
/// to restore the original state (e.g., on exit or panic).
#[derive(Debug, Default)]
pub struct TerminalModes {
    raw_mode: bool,
    alternate_screen: bool,
}

impl TerminalModes {
    /// Create a new TerminalModes with nothing enabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable raw mode and the alternate screen.
    ///
    /// On error, automatically undoes any partially enabled modes.
    pub fn enable() -> Result<Self> {
        let mut modes = Self::new();
        modes.reenable()?;
        Ok(modes)
    }

    /// Enable whatever is not enabled yet, e.g. after `undo()` for a child
    /// process.
    pub fn reenable(&mut self) -> Result<()> {
        if !self.raw_mode {
            if let Err(e) = enable_raw_mode() {
                tracing::error!("Failed to enable raw mode: {}", e);
                return Err(e.into());
            }
            self.raw_mode = true;
            tracing::debug!("Enabled raw mode");
        }

        if !self.alternate_screen {
            if let Err(e) = stdout().execute(EnterAlternateScreen) {
                tracing::error!("Failed to enter alternate screen: {}", e);
                self.undo();
                return Err(e.into());
            }
            self.alternate_screen = true;
            tracing::debug!("Entered alternate screen");
        }

        Ok(())
    }

    /// Restore terminal to original state by disabling all enabled modes.
    ///
    /// This is safe to call multiple times - it tracks what was enabled
    /// and only disables those modes.
    pub fn undo(&mut self) {
        // Disable raw mode (before leaving alternate screen for cleaner output)
        if self.raw_mode {
            let _ = disable_raw_mode();
            self.raw_mode = false;
            tracing::debug!("Disabled raw mode");
        }

        if self.alternate_screen {
            let _ = stdout().execute(LeaveAlternateScreen);
            self.alternate_screen = false;
            tracing::debug!("Left alternate screen");
        }

        let _ = stdout().execute(Show);
        let _ = stdout().flush();
    }

    /// Returns true if raw mode is enabled.
    pub fn raw_mode_enabled(&self) -> bool {
        self.raw_mode
    }

    /// Returns true if alternate screen is enabled.
    pub fn alternate_screen_enabled(&self) -> bool {
        self.alternate_screen
    }
}

impl Drop for TerminalModes {
    fn drop(&mut self) {
        self.undo();
    }
}

/// Unconditionally restore terminal state without tracking.
///
/// This is intended for use in panic hooks where we don't have access
/// to the TerminalModes instance.
pub fn emergency_cleanup() {
    let _ = disable_raw_mode();
    let _ = stdout().execute(LeaveAlternateScreen);
    let _ = stdout().execute(Show);
    let _ = stdout().flush();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_tracks_nothing() {
        let mut modes = TerminalModes::new();
        assert!(!modes.raw_mode_enabled());
        assert!(!modes.alternate_screen_enabled());
        modes.undo();
        assert!(!modes.raw_mode_enabled());
    }
}
