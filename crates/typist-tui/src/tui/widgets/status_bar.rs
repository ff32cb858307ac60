//! Status bar widget showing the terminal phase, pending requests and the server

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};
use typist_core::view::Phase;

use crate::tui::theme::{Component, Theme};

const SPINNER_FRAMES: &[char] = &['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

pub fn get_spinner_char(state: usize) -> char {
    SPINNER_FRAMES[state % SPINNER_FRAMES.len()]
}

pub struct StatusBar<'a> {
    phase: Phase,
    server: &'a str,
    theme: &'a Theme,
    in_flight: usize,
    spinner_state: usize,
}

impl<'a> StatusBar<'a> {
    pub fn new(phase: Phase, server: &'a str, theme: &'a Theme) -> Self {
        Self {
            phase,
            server,
            theme,
            in_flight: 0,
            spinner_state: 0,
        }
    }

    pub fn with_in_flight(mut self, in_flight: usize, spinner_state: usize) -> Self {
        self.in_flight = in_flight;
        self.spinner_state = spinner_state;
        self
    }
}

fn format_pending(in_flight: usize, spinner: char) -> String {
    match in_flight {
        0 => String::new(),
        1 => format!(" {spinner} waiting for reply "),
        n => format!(" {spinner} waiting for {n} replies "),
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let style = self.theme.style(Component::StatusBar);

        // Left: phase label + pending requests
        let (label, label_style) = match self.phase {
            Phase::Loading => (
                format!(" {} LOADING ", get_spinner_char(self.spinner_state)),
                self.theme.style(Component::StatusLoading),
            ),
            Phase::Ready => (" READY ".to_string(), self.theme.style(Component::StatusReady)),
        };
        let mut left_spans = vec![Span::styled(label, label_style)];
        let pending = format_pending(self.in_flight, get_spinner_char(self.spinner_state));
        if !pending.is_empty() {
            left_spans.push(Span::raw(pending));
        }
        Paragraph::new(Line::from(left_spans))
            .style(style)
            .alignment(Alignment::Left)
            .render(area, buf);

        // Right: server + key hint
        let right_line = Line::from(vec![
            Span::raw(format!(" {} ", self.server)),
            Span::styled("│ esc quit ", self.theme.style(Component::DimText)),
        ]);
        Paragraph::new(right_line)
            .style(style)
            .alignment(Alignment::Right)
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{Terminal, backend::TestBackend};

    fn render(bar: StatusBar<'_>) -> String {
        let backend = TestBackend::new(80, 1);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| f.render_widget(bar, f.area())).unwrap();
        let buffer = terminal.backend().buffer().clone();
        (0..buffer.area.width)
            .map(|x| buffer[(x, 0)].symbol())
            .collect()
    }

    #[test]
    fn spinner_wraps_around() {
        assert_eq!(get_spinner_char(0), '⠋');
        assert_eq!(get_spinner_char(SPINNER_FRAMES.len()), '⠋');
        assert_eq!(get_spinner_char(1), '⠙');
    }

    #[test]
    fn pending_counts_are_pluralized() {
        assert_eq!(format_pending(0, '⠋'), "");
        assert_eq!(format_pending(1, '⠋'), " ⠋ waiting for reply ");
        assert_eq!(format_pending(3, '⠋'), " ⠋ waiting for 3 replies ");
    }

    #[test]
    fn shows_phase_and_server() {
        let theme = Theme::default();
        let loading = render(StatusBar::new(Phase::Loading, "localhost:8000", &theme));
        assert!(loading.contains("LOADING"));
        assert!(loading.contains("localhost:8000"));

        let ready = render(
            StatusBar::new(Phase::Ready, "localhost:8000", &theme).with_in_flight(2, 0),
        );
        assert!(ready.contains("READY"));
        assert!(ready.contains("waiting for 2 replies"));
    }
}
