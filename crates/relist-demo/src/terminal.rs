#![forbid(unsafe_code)]

//! Raw-mode terminal session.

use std::io::{self, Write};

use crossterm::{cursor, event, execute, terminal};
use relist_core::logging;

/// Raw mode, alternate screen, and mouse capture for the lifetime of the
/// value. Dropping it restores the terminal.
#[derive(Debug)]
pub struct TerminalSession {
    _private: (),
}

impl TerminalSession {
    pub fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let session = Self { _private: () };
        execute!(
            io::stdout(),
            terminal::EnterAlternateScreen,
            terminal::Clear(terminal::ClearType::All),
            event::EnableMouseCapture,
            cursor::MoveTo(0, 0)
        )?;
        logging::info!(message = "relist.demo.session", state = "entered");
        Ok(session)
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let mut stdout = io::stdout();
        let _ = execute!(
            stdout,
            event::DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show
        );
        let _ = terminal::disable_raw_mode();
        let _ = stdout.flush();
        logging::info!(message = "relist.demo.session", state = "left");
    }
}
