//! Scrollback pane showing the controller's output buffer.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, StatefulWidget, Widget},
};
use typist_core::view::{LineKind, OutputBuffer, TerminalView};

use crate::tui::theme::{Component, Theme};

const CURSOR_GLYPH: &str = "_";

/// Scroll position measured in wrapped lines from the bottom. Zero follows the tail.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct OutputScroll {
    offset: usize,
}

impl OutputScroll {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn is_following(&self) -> bool {
        self.offset == 0
    }

    pub fn scroll_up(&mut self, lines: usize) {
        self.offset = self.offset.saturating_add(lines);
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.offset = self.offset.saturating_sub(lines);
    }

    pub fn to_bottom(&mut self) {
        self.offset = 0;
    }

    fn clamp(&mut self, max: usize) {
        self.offset = self.offset.min(max);
    }
}

fn line_component(kind: LineKind) -> Component {
    match kind {
        LineKind::Text => Component::OutputText,
        LineKind::Echo => Component::EchoLine,
        LineKind::Reply => Component::ReplyLine,
        LineKind::Error => Component::ErrorLine,
    }
}

/// Wrap the tail of `output` to `width` columns, styling each line by its kind.
///
/// Wrapping walks backwards from the newest line and stops once `limit` lines
/// are collected, so long sessions only pay for what can be shown.
pub fn wrap_output(
    output: &OutputBuffer,
    width: usize,
    cursor: bool,
    theme: &Theme,
    limit: Option<usize>,
) -> Vec<Line<'static>> {
    let width = width.max(1);
    let limit = limit.unwrap_or(usize::MAX);
    let mut lines: Vec<Line<'static>> = Vec::new();

    // The newest logical line is the open one the cursor sits on; after a
    // trailing newline it is empty, which puts the cursor on a fresh line.
    for (index, (kind, logical)) in output.tagged_lines_rev().enumerate() {
        if lines.len() >= limit {
            break;
        }
        let style = theme.style(line_component(kind));
        let logical = logical.strip_suffix('\r').unwrap_or(logical);
        let mut pieces: Vec<Line<'static>> = textwrap::wrap(logical, width)
            .into_iter()
            .map(|piece| Line::from(Span::styled(piece.into_owned(), style)))
            .collect();

        if cursor && index == 0 {
            let cursor_span = Span::styled(CURSOR_GLYPH, theme.style(Component::Cursor));
            match pieces.last_mut() {
                Some(last) => last.spans.push(cursor_span),
                None => pieces.push(Line::from(cursor_span)),
            }
        }

        lines.extend(pieces.into_iter().rev());
    }

    lines.truncate(limit);
    lines.reverse();
    lines
}

pub struct OutputPane<'a> {
    view: &'a TerminalView,
    theme: &'a Theme,
}

impl<'a> OutputPane<'a> {
    pub fn new(view: &'a TerminalView, theme: &'a Theme) -> Self {
        Self { view, theme }
    }
}

impl StatefulWidget for OutputPane<'_> {
    type State = OutputScroll;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.style(Component::OutputBorder))
            .title(" typist ");
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let height = usize::from(inner.height);
        let wanted = height.saturating_add(state.offset());
        let lines = wrap_output(
            &self.view.output,
            usize::from(inner.width),
            self.view.cursor_visible(),
            self.theme,
            Some(wanted),
        );

        // Fewer lines than asked for means the whole buffer was wrapped.
        if lines.len() < wanted {
            state.clamp(lines.len().saturating_sub(height));
        }

        let end = lines.len() - state.offset();
        let start = end.saturating_sub(height);
        let visible: Vec<Line<'static>> = lines[start..end].to_vec();

        Paragraph::new(visible)
            .style(self.theme.style(Component::OutputText))
            .render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{Terminal, backend::TestBackend};

    fn row(buffer: &Buffer, y: u16) -> String {
        (0..buffer.area.width)
            .map(|x| buffer[(x, y)].symbol())
            .collect::<String>()
    }

    fn view_with(text: &str) -> TerminalView {
        let mut view = TerminalView::new();
        view.output.append(text);
        view
    }

    fn buffer_with(text: &str) -> OutputBuffer {
        let mut out = OutputBuffer::new();
        out.append(text);
        out
    }

    fn rendered(lines: &[Line<'_>]) -> Vec<String> {
        lines.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn wraps_long_lines_to_width() {
        let theme = Theme::default();
        let lines = wrap_output(&buffer_with("aaaa bbbb cccc"), 9, false, &theme, None);
        assert_eq!(rendered(&lines), vec!["aaaa bbbb", "cccc"]);
    }

    #[test]
    fn cursor_goes_on_fresh_line_after_newline() {
        let theme = Theme::default();
        let mut out = OutputBuffer::new();
        out.append_line_as("> hi", LineKind::Echo);
        let lines = wrap_output(&out, 20, true, &theme, None);
        assert_eq!(rendered(&lines), vec!["> hi", "_"]);
    }

    #[test]
    fn lines_are_styled_by_kind_not_prefix() {
        let theme = Theme::default();
        let mut out = buffer_with("> page text\n");
        out.append_line_as("> me", LineKind::Echo);
        out.append_line_as("< you\nand more", LineKind::Reply);
        out.append_line_as("[error] nope", LineKind::Error);

        let lines = wrap_output(&out, 40, false, &theme, None);
        assert_eq!(lines[0].spans[0].style, theme.style(Component::OutputText));
        assert_eq!(lines[1].spans[0].style, theme.style(Component::EchoLine));
        assert_eq!(lines[2].spans[0].style, theme.style(Component::ReplyLine));
        assert_eq!(lines[3].spans[0].style, theme.style(Component::ReplyLine));
        assert_eq!(lines[4].spans[0].style, theme.style(Component::ErrorLine));
    }

    #[test]
    fn limit_wraps_only_the_tail() {
        let theme = Theme::default();
        let text: String = (0..1000).map(|i| format!("line {i}\n")).collect();
        let lines = wrap_output(&buffer_with(&text), 40, true, &theme, Some(3));
        assert_eq!(rendered(&lines), vec!["line 998", "line 999", "_"]);
    }

    #[test]
    fn follows_tail_and_clamps_scroll() {
        let theme = Theme::default();
        let view = view_with("one\ntwo\nthree\nfour\nfive");
        let mut scroll = OutputScroll::new();

        let backend = TestBackend::new(12, 4);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| f.render_stateful_widget(OutputPane::new(&view, &theme), f.area(), &mut scroll))
            .unwrap();
        let buffer = terminal.backend().buffer().clone();
        assert!(row(&buffer, 1).contains("four"));
        assert!(row(&buffer, 2).contains("five"));

        scroll.scroll_up(100);
        terminal
            .draw(|f| f.render_stateful_widget(OutputPane::new(&view, &theme), f.area(), &mut scroll))
            .unwrap();
        assert_eq!(scroll.offset(), 3);
        let buffer = terminal.backend().buffer().clone();
        assert!(row(&buffer, 1).contains("one"));
        assert!(row(&buffer, 2).contains("two"));
    }
}
