use ratatui::crossterm::{
    event::{DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, SetTitle, disable_raw_mode, enable_raw_mode},
};
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};

/// Global terminal state so cleanup is idempotent across exit, panic and signal paths
pub struct TerminalState {
    pub(crate) raw: AtomicBool,
    pub(crate) alt_screen: AtomicBool,
    pub(crate) bracketed_paste: AtomicBool,
    pub(crate) mouse_capture: AtomicBool,
}

impl Default for TerminalState {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalState {
    pub const fn new() -> Self {
        Self {
            raw: AtomicBool::new(false),
            alt_screen: AtomicBool::new(false),
            bracketed_paste: AtomicBool::new(false),
            mouse_capture: AtomicBool::new(false),
        }
    }
}

pub static TERMINAL_STATE: TerminalState = TerminalState::new();

/// Enter raw mode and the alternate screen with paste and mouse support.
/// Flags are updated only after each successful step.
pub fn setup<W: Write>(w: &mut W) -> io::Result<()> {
    enable_raw_mode()?;
    TERMINAL_STATE.raw.store(true, Ordering::Relaxed);

    execute!(w, EnterAlternateScreen)?;
    TERMINAL_STATE.alt_screen.store(true, Ordering::Relaxed);

    execute!(w, EnableBracketedPaste)?;
    TERMINAL_STATE
        .bracketed_paste
        .store(true, Ordering::Relaxed);

    execute!(w, EnableMouseCapture)?;
    TERMINAL_STATE.mouse_capture.store(true, Ordering::Relaxed);

    // Cosmetic; some terminals ignore it.
    let _ = execute!(w, SetTitle("typist"));

    Ok(())
}

/// Undo whatever `setup` managed to enable, writing escape sequences to `writer`.
pub fn cleanup_with_writer<W: Write>(writer: &mut W) {
    if TERMINAL_STATE.mouse_capture.swap(false, Ordering::Relaxed) {
        let _ = execute!(writer, DisableMouseCapture);
    }
    if TERMINAL_STATE
        .bracketed_paste
        .swap(false, Ordering::Relaxed)
    {
        let _ = execute!(writer, DisableBracketedPaste);
    }
    if TERMINAL_STATE.alt_screen.swap(false, Ordering::Relaxed) {
        let _ = execute!(writer, LeaveAlternateScreen);
    }
    if TERMINAL_STATE.raw.swap(false, Ordering::Relaxed) {
        let _ = disable_raw_mode();
    }
    let _ = writer.flush();
}

/// Best-effort cleanup on stdout.
pub fn cleanup() {
    let mut out = io::stdout();
    cleanup_with_writer(&mut out);
}

/// RAII guard used during terminal setup to ensure cleanup on early-return paths.
pub struct SetupGuard {
    armed: bool,
}

impl Default for SetupGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl SetupGuard {
    pub fn new() -> Self {
        Self { armed: true }
    }

    pub fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for SetupGuard {
    fn drop(&mut self) {
        if self.armed {
            cleanup();
        }
    }
}
