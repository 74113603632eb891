//! Terminal backend and input translation.
//!
//! [`CrosstermBackend`] owns raw mode and the alternate screen;
//! [`TerminalGuard`] restores both on drop, including when the host loop
//! unwinds. [`input`] turns crossterm events into editor key events.

use anyhow::Result;
use crossterm::{
    cursor::{Hide, Show},
    execute,
    terminal::{
        self, EnterAlternateScreen, LeaveAlternateScreen, SetTitle, disable_raw_mode,
        enable_raw_mode,
    },
};
use std::io::stdout;
use tracing::{debug, warn};

pub mod input;
pub use input::{TerminalEvent, read_event, translate_event};

pub trait TerminalBackend {
    fn enter(&mut self) -> Result<()>;
    fn leave(&mut self) -> Result<()>;
    fn set_title(&mut self, title: &str) -> Result<()>;
    /// Terminal size as (columns, rows).
    fn size(&self) -> Result<(u16, u16)>;
}

pub struct CrosstermBackend {
    entered: bool,
}

/// Holds a backend in its entered state and leaves it on drop. A failed
/// leave is logged; drop cannot report it.
pub struct TerminalGuard<'a, B: TerminalBackend = CrosstermBackend> {
    backend: &'a mut B,
}

impl Default for CrosstermBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl CrosstermBackend {
    pub fn new() -> Self {
        Self { entered: false }
    }

    /// Enter and return a guard that will leave on drop.
    pub fn enter_guard(&mut self) -> Result<TerminalGuard<'_>> {
        TerminalGuard::enter(self)
    }
}

impl TerminalBackend for CrosstermBackend {
    fn enter(&mut self) -> Result<()> {
        if !self.entered {
            enable_raw_mode()?;
            execute!(stdout(), EnterAlternateScreen, Hide)?;
            self.entered = true;
            debug!(target: "runtime", "terminal_entered");
        }
        Ok(())
    }

    fn leave(&mut self) -> Result<()> {
        if self.entered {
            execute!(stdout(), LeaveAlternateScreen, Show)?;
            disable_raw_mode()?;
            self.entered = false;
            debug!(target: "runtime", "terminal_left");
        }
        Ok(())
    }

    fn set_title(&mut self, title: &str) -> Result<()> {
        execute!(stdout(), SetTitle(title))?;
        Ok(())
    }

    fn size(&self) -> Result<(u16, u16)> {
        Ok(terminal::size()?)
    }
}

impl<'a, B: TerminalBackend> TerminalGuard<'a, B> {
    pub fn enter(backend: &'a mut B) -> Result<Self> {
        backend.enter()?;
        Ok(Self { backend })
    }

    pub fn backend(&mut self) -> &mut B {
        self.backend
    }
}

fn leave_logged<B: TerminalBackend + ?Sized>(backend: &mut B) {
    if let Err(err) = backend.leave() {
        warn!(target: "runtime", error = %err, "terminal_leave_failed");
    }
}

impl Drop for CrosstermBackend {
    fn drop(&mut self) {
        leave_logged(self);
    }
}

impl<B: TerminalBackend> Drop for TerminalGuard<'_, B> {
    fn drop(&mut self) {
        leave_logged(&mut *self.backend);
    }
}
