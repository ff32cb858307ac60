//! Styling for the terminal widgets.

use ratatui::style::{Color, Modifier, Style};

/// Visual roles a widget can ask the theme about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Component {
    OutputText,
    OutputBorder,
    EchoLine,
    ReplyLine,
    ErrorLine,
    Cursor,
    InputText,
    InputBorder,
    InputDisabled,
    StatusBar,
    StatusReady,
    StatusLoading,
    DimText,
}

#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,
    foreground: Color,
    accent: Color,
    error: Color,
    muted: Color,
    background: Option<Color>,
}

impl Default for Theme {
    /// Green-on-black, like the page the terminal imitates.
    fn default() -> Self {
        Self {
            name: "phosphor".to_string(),
            foreground: Color::Green,
            accent: Color::LightGreen,
            error: Color::LightRed,
            muted: Color::DarkGray,
            background: Some(Color::Black),
        }
    }
}

impl Theme {
    /// Plain terminal colors for users who do not want the green palette
    pub fn plain() -> Self {
        Self {
            name: "plain".to_string(),
            foreground: Color::Reset,
            accent: Color::Cyan,
            error: Color::Red,
            muted: Color::DarkGray,
            background: None,
        }
    }

    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "phosphor" | "default" => Some(Self::default()),
            "plain" => Some(Self::plain()),
            _ => None,
        }
    }

    pub fn get_background_color(&self) -> Option<Color> {
        self.background
    }

    pub fn style(&self, component: Component) -> Style {
        let base = Style::default().fg(self.foreground);
        match component {
            Component::OutputText | Component::InputText => base,
            Component::OutputBorder | Component::InputBorder => Style::default().fg(self.muted),
            Component::EchoLine => Style::default()
                .fg(self.accent)
                .add_modifier(Modifier::BOLD),
            Component::ReplyLine => base.add_modifier(Modifier::ITALIC),
            Component::ErrorLine => Style::default().fg(self.error),
            Component::Cursor => base.add_modifier(Modifier::BOLD),
            Component::InputDisabled | Component::DimText => Style::default().fg(self.muted),
            Component::StatusBar => Style::default().fg(self.foreground).bg(Color::Black),
            Component::StatusReady => Style::default().fg(self.accent).bg(Color::Black),
            Component::StatusLoading => Style::default()
                .fg(Color::Yellow)
                .bg(Color::Black)
                .add_modifier(Modifier::BOLD),
        }
    }
}
