//! Key bindings for the terminal.
//!
//! Editing keys go to the view's input line, which ignores them until the
//! controller marks the view ready. Scrolling and quitting always work.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use tracing::debug;
use typist_core::Controller;

use crate::tui::widgets::OutputScroll;

const MOUSE_SCROLL_LINES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Nothing changed.
    Ignored,
    /// State changed and the screen should be redrawn.
    Handled,
    Quit,
}

/// Apply a key press. `page` is the height of the output pane, used for paging.
pub fn handle_key(
    controller: &mut Controller,
    scroll: &mut OutputScroll,
    key: KeyEvent,
    page: usize,
) -> KeyOutcome {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let input = &mut controller.view_mut().input;

    match key.code {
        KeyCode::Esc => KeyOutcome::Quit,
        KeyCode::Char('c') if ctrl => KeyOutcome::Quit,
        KeyCode::Char('d') if ctrl => {
            if input.value().is_empty() {
                KeyOutcome::Quit
            } else {
                input.delete();
                KeyOutcome::Handled
            }
        }
        KeyCode::Char('u') if ctrl => {
            if input.is_enabled() {
                input.clear();
            }
            KeyOutcome::Handled
        }
        KeyCode::Char('a') if ctrl => {
            input.move_home();
            KeyOutcome::Handled
        }
        KeyCode::Char('e') if ctrl => {
            input.move_end();
            KeyOutcome::Handled
        }
        KeyCode::Char(_) if ctrl || key.modifiers.contains(KeyModifiers::ALT) => KeyOutcome::Ignored,
        KeyCode::Char(c) => {
            input.insert_char(c);
            KeyOutcome::Handled
        }
        KeyCode::Backspace => {
            input.backspace();
            KeyOutcome::Handled
        }
        KeyCode::Delete => {
            input.delete();
            KeyOutcome::Handled
        }
        KeyCode::Left => {
            input.move_left();
            KeyOutcome::Handled
        }
        KeyCode::Right => {
            input.move_right();
            KeyOutcome::Handled
        }
        KeyCode::Home => {
            input.move_home();
            KeyOutcome::Handled
        }
        KeyCode::End => {
            input.move_end();
            KeyOutcome::Handled
        }
        KeyCode::Enter => {
            if let Some(exchange) = controller.submit() {
                debug!(target: "tui.keys", exchange = exchange.get(), "Submitted input");
                scroll.to_bottom();
            }
            KeyOutcome::Handled
        }
        KeyCode::Up => {
            scroll.scroll_up(1);
            KeyOutcome::Handled
        }
        KeyCode::Down => {
            scroll.scroll_down(1);
            KeyOutcome::Handled
        }
        KeyCode::PageUp => {
            scroll.scroll_up(page.max(1));
            KeyOutcome::Handled
        }
        KeyCode::PageDown => {
            scroll.scroll_down(page.max(1));
            KeyOutcome::Handled
        }
        _ => KeyOutcome::Ignored,
    }
}

/// Mouse wheel scrolls the output pane. Returns whether anything changed.
pub fn handle_mouse(scroll: &mut OutputScroll, event: MouseEvent) -> bool {
    match event.kind {
        MouseEventKind::ScrollUp => {
            scroll.scroll_up(MOUSE_SCROLL_LINES);
            true
        }
        MouseEventKind::ScrollDown => {
            scroll.scroll_down(MOUSE_SCROLL_LINES);
            true
        }
        _ => false,
    }
}
