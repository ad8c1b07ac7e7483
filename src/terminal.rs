use anyhow::Context;
use crossterm::{
    ExecutableCommand, cursor,
    terminal::{self, ClearType},
};
use std::io::{BufWriter, Stdout, Write, stdout};

/// Owns the preview's terminal session: raw mode, alternate screen, hidden
/// cursor and the buffered writer every frame goes through. Dropping it puts
/// the terminal back the way the shell expects.
pub struct TerminalGuard {
    out: BufWriter<Stdout>,
    sync_updates: bool,
}

impl TerminalGuard {
    /// `sync_updates` must match what the renderers were told, so the guard
    /// knows whether a synchronized update can be left open on exit.
    pub fn enter(sync_updates: bool) -> anyhow::Result<Self> {
        terminal::enable_raw_mode().context("enable raw mode")?;
        // Constructed first so a failure below still restores raw mode on drop.
        let mut guard = Self {
            out: BufWriter::new(stdout()),
            sync_updates,
        };
        guard
            .out
            .execute(terminal::EnterAlternateScreen)
            .context("enter alternate screen")?;
        guard
            .out
            .execute(terminal::Clear(ClearType::All))
            .context("clear screen")?;
        guard.out.execute(cursor::Hide).context("hide cursor")?;
        log::debug!("terminal session open (sync updates {sync_updates})");
        Ok(guard)
    }

    /// Frame writer. Renderers flush it at the end of every frame.
    pub fn out(&mut self) -> &mut BufWriter<Stdout> {
        &mut self.out
    }
}

/// Bytes that undo renderer state a frame may leave behind if the loop stops
/// mid-frame: an open synchronized update (only when enabled), autowrap off,
/// and SGR colours.
pub fn restore_sequence(sync_updates: bool) -> &'static [u8] {
    if sync_updates {
        b"\x1b[?2026l\x1b[?7h\x1b[0m"
    } else {
        b"\x1b[?7h\x1b[0m"
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = self.out.write_all(restore_sequence(self.sync_updates));
        let _ = self.out.execute(cursor::Show);
        let _ = self.out.execute(terminal::LeaveAlternateScreen);
        let _ = self.out.flush();
        let _ = terminal::disable_raw_mode();
        log::debug!("terminal session closed");
    }
}
