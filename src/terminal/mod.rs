//! Terminal management module - cursor/echo session and screen control.

mod session;

pub use session::{CrosstermTerminal, TerminalBackend, TerminalSession};

use crossterm::cursor::MoveTo;
use crossterm::terminal::{Clear, ClearType};
use std::io::{self, Write};

/// Clear the display and move the cursor home, then flush so the sequence
/// lands before anything a child process writes to the same terminal.
pub fn clear_screen<W: Write>(out: &mut W) -> io::Result<()> {
    crossterm::queue!(out, Clear(ClearType::All), MoveTo(0, 0))?;
    out.flush()
}
