//! UI layout management for the TUI
//!
//! Splits the frame into the output pane, the input line and the status bar.

use crate::tui::theme::Theme;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    widgets::{Block, Clear},
};

/// Height of the bordered input line.
pub const INPUT_HEIGHT: u16 = 3;

/// Computed layout areas for the UI
pub struct UiLayout {
    /// The output pane (includes border)
    pub output: Rect,
    /// The input line area
    pub input: Rect,
    /// The status bar area
    pub status: Rect,
    /// The full terminal area
    pub terminal: Rect,
}

impl UiLayout {
    pub fn compute(size: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(1),
                Constraint::Length(INPUT_HEIGHT),
                Constraint::Length(1),
            ])
            .split(size);

        Self {
            output: chunks[0],
            input: chunks[1],
            status: chunks[2],
            terminal: size,
        }
    }

    /// Clear and prepare the background
    pub fn prepare_background(&self, f: &mut Frame, theme: &Theme) {
        f.render_widget(Clear, self.terminal);

        if let Some(bg_color) = theme.get_background_color() {
            let background_block = Block::default().style(Style::default().bg(bg_color));
            f.render_widget(background_block, self.terminal);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{Terminal, backend::TestBackend, style::Color};

    #[test]
    fn input_and_status_have_fixed_heights() {
        let layout = UiLayout::compute(Rect::new(0, 0, 80, 24));
        assert_eq!(layout.input.height, INPUT_HEIGHT);
        assert_eq!(layout.status.height, 1);
        assert_eq!(layout.output.height, 24 - INPUT_HEIGHT - 1);
        assert_eq!(layout.status.y, 23);
    }

    #[test]
    fn background_follows_theme() {
        let backend = TestBackend::new(20, 6);
        let mut terminal = Terminal::new(backend).unwrap();

        let phosphor = Theme::default();
        terminal
            .draw(|f| UiLayout::compute(f.area()).prepare_background(f, &phosphor))
            .unwrap();
        assert_eq!(terminal.backend().buffer()[(3, 2)].bg, Color::Black);

        let plain = Theme::plain();
        terminal
            .draw(|f| UiLayout::compute(f.area()).prepare_background(f, &plain))
            .unwrap();
        assert_eq!(terminal.backend().buffer()[(3, 2)].bg, Color::Reset);
    }
}
