//! Per-session terminal.
//!
//! Each session draws into its own `Terminal` backed by the channel writer,
//! never the server's stdout. The viewport is fixed to the size the client
//! reported and only changes through [`SessionTerminal::resize`].
//!
//! Entering hides the cursor on the alternate screen; [`SessionTerminal::restore`]
//! shows it again and leaves the alternate screen. Restoring also runs on
//! drop, so every exit path gives the client its cursor back.

use std::io::{self, Write};

use crossterm::cursor::{Hide, MoveTo};
use crossterm::queue;
use crossterm::terminal::{Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use log::warn;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use ratatui::{Frame, Terminal, TerminalOptions, Viewport as TermViewport};

use crate::core::state::Viewport;

pub struct SessionTerminal<W: Write> {
    terminal: Terminal<CrosstermBackend<W>>,
    restored: bool,
}

fn area_of(viewport: Viewport) -> Rect {
    Rect::new(0, 0, viewport.width, viewport.height)
}

impl<W: Write> SessionTerminal<W> {
    pub fn enter(writer: W, viewport: Viewport) -> io::Result<Self> {
        let mut terminal = Terminal::with_options(
            CrosstermBackend::new(writer),
            TerminalOptions {
                viewport: TermViewport::Fixed(area_of(viewport)),
            },
        )?;
        let out = terminal.backend_mut();
        queue!(out, EnterAlternateScreen, Clear(ClearType::All), MoveTo(0, 0), Hide)?;
        out.flush()?;
        Ok(Self {
            terminal,
            restored: false,
        })
    }

    pub fn draw<F>(&mut self, render: F) -> io::Result<()>
    where
        F: FnOnce(&mut Frame),
    {
        self.terminal.draw(render)?;
        Ok(())
    }

    /// Adopts a new client size. The next draw repaints everything.
    pub fn resize(&mut self, viewport: Viewport) -> io::Result<()> {
        self.terminal.resize(area_of(viewport))
    }

    pub fn area(&mut self) -> Rect {
        self.terminal.get_frame().area()
    }

    /// Shows the cursor and leaves the alternate screen. Idempotent.
    pub fn restore(&mut self) -> io::Result<()> {
        if self.restored {
            return Ok(());
        }
        self.restored = true;
        self.terminal.show_cursor()?;
        let out = self.terminal.backend_mut();
        queue!(out, LeaveAlternateScreen)?;
        out.flush()
    }

    /// Restores the terminal, then writes `message` to the client.
    pub fn report_error(&mut self, message: &str) -> io::Result<()> {
        self.restore()?;
        let out = self.terminal.backend_mut();
        write!(out, "Error running TUI: {message}\r\n")?;
        out.flush()
    }
}

impl<W: Write> Drop for SessionTerminal<W> {
    fn drop(&mut self) {
        if let Err(e) = self.restore() {
            warn!("Failed to restore session terminal: {}", e);
        }
    }
}
