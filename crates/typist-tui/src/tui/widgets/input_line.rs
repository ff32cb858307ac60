//! Bordered single-line prompt bound to the view's [`InputLine`].

use ratatui::{
    buffer::Buffer,
    layout::{Position, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};
use typist_core::view::{InputLine, Phase};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::tui::theme::{Component, Theme};

const PROMPT: &str = "> ";
const LOADING_PLACEHOLDER: &str = "loading…";

/// Slice of the input that fits in `width` columns while keeping the caret visible.
///
/// Returns the visible text and the caret column relative to its start.
pub fn visible_window(input: &InputLine, width: usize) -> (String, usize) {
    let before = input.before_caret();
    let mut skip = 0;
    let mut caret_col = before.width();

    // Leave one column for the caret itself.
    for c in before.chars() {
        if caret_col < width.max(1) {
            break;
        }
        caret_col -= c.width().unwrap_or(0);
        skip += 1;
    }

    let mut used = 0;
    let visible: String = input
        .value()
        .chars()
        .skip(skip)
        .take_while(|c| {
            used += c.width().unwrap_or(0);
            used <= width
        })
        .collect();

    (visible, caret_col)
}

pub struct InputLineWidget<'a> {
    input: &'a InputLine,
    phase: Phase,
    theme: &'a Theme,
}

impl<'a> InputLineWidget<'a> {
    pub fn new(input: &'a InputLine, phase: Phase, theme: &'a Theme) -> Self {
        Self {
            input,
            phase,
            theme,
        }
    }

    /// Where the terminal cursor belongs, or `None` while the input is disabled.
    pub fn cursor_position(&self, area: Rect) -> Option<Position> {
        if !self.input.is_enabled() || area.width <= 2 || area.height <= 2 {
            return None;
        }
        let inner_width = usize::from(area.width - 2).saturating_sub(PROMPT.width());
        let (_, caret_col) = visible_window(self.input, inner_width);
        let offset = u16::try_from(PROMPT.width() + caret_col).unwrap_or(u16::MAX);
        Some(Position::new(
            (area.x + 1).saturating_add(offset).min(area.right().saturating_sub(2)),
            area.y + 1,
        ))
    }
}

impl Widget for InputLineWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let enabled = self.input.is_enabled();
        let border = if enabled {
            Component::InputBorder
        } else {
            Component::InputDisabled
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.style(border));
        let inner = block.inner(area);
        block.render(area, buf);

        let line = if self.phase == Phase::Loading || !enabled {
            Line::from(vec![
                Span::styled(PROMPT, self.theme.style(Component::InputDisabled)),
                Span::styled(LOADING_PLACEHOLDER, self.theme.style(Component::DimText)),
            ])
        } else {
            let available = usize::from(inner.width).saturating_sub(PROMPT.width());
            let (visible, _) = visible_window(self.input, available);
            Line::from(vec![
                Span::styled(PROMPT, self.theme.style(Component::EchoLine)),
                Span::styled(visible, self.theme.style(Component::InputText)),
            ])
        };

        Paragraph::new(line).render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{Terminal, backend::TestBackend};

    fn enabled_input(text: &str) -> InputLine {
        let mut input = InputLine::new();
        input.set_enabled(true);
        input.insert_str(text);
        input
    }

    #[test]
    fn short_input_is_shown_whole() {
        let input = enabled_input("hello");
        assert_eq!(visible_window(&input, 20), ("hello".to_string(), 5));
    }

    #[test]
    fn long_input_scrolls_to_keep_caret_visible() {
        let input = enabled_input("abcdefghij");
        let (visible, caret) = visible_window(&input, 5);
        assert_eq!(visible, "ghij");
        assert_eq!(caret, 4);
    }

    #[test]
    fn caret_at_home_shows_start() {
        let mut input = enabled_input("abcdefghij");
        input.move_home();
        assert_eq!(visible_window(&input, 5), ("abcde".to_string(), 0));
    }

    #[test]
    fn wide_chars_count_by_display_width() {
        let input = enabled_input("日本");
        assert_eq!(visible_window(&input, 10), ("日本".to_string(), 4));
    }

    #[test]
    fn disabled_input_renders_placeholder_without_cursor() {
        let theme = Theme::default();
        let input = InputLine::new();
        let widget = InputLineWidget::new(&input, Phase::Loading, &theme);
        assert_eq!(widget.cursor_position(Rect::new(0, 0, 30, 3)), None);

        let backend = TestBackend::new(30, 3);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| f.render_widget(InputLineWidget::new(&input, Phase::Loading, &theme), f.area()))
            .unwrap();
        let buffer = terminal.backend().buffer().clone();
        let row: String = (0..30).map(|x| buffer[(x, 1)].symbol()).collect();
        assert!(row.contains("loading…"));
    }

    #[test]
    fn cursor_follows_caret() {
        let theme = Theme::default();
        let input = enabled_input("hi");
        let widget = InputLineWidget::new(&input, Phase::Ready, &theme);
        assert_eq!(
            widget.cursor_position(Rect::new(0, 10, 30, 3)),
            Some(Position::new(5, 11))
        );
    }
}
