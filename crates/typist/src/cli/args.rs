use clap::{Parser, Subcommand, ValueEnum};
use typist_core::ChatMethod;

/// A chat terminal that types out its welcome page and talks to a text server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None, author)]
pub struct Cli {
    /// Base URL of the server (defaults to http://localhost:8000/)
    #[arg(long, env = "TYPIST_URL")]
    pub url: Option<String>,

    /// Path of the page revealed at startup, relative to the base URL
    #[arg(long)]
    pub resource: Option<String>,

    /// Path of the chat endpoint
    #[arg(long)]
    pub chat_path: Option<String>,

    /// How chat messages are sent
    #[arg(long, value_enum)]
    pub method: Option<MethodArg>,

    /// Milliseconds between revealed characters
    #[arg(long)]
    pub reveal_delay_ms: Option<u64>,

    /// Show the startup page all at once
    #[arg(long, conflicts_with = "reveal_delay_ms")]
    pub instant: bool,

    /// Do not draw the blinking cursor
    #[arg(long)]
    pub no_cursor: bool,

    /// Request timeout in milliseconds
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Theme to use for the TUI ("phosphor" or "plain")
    #[arg(long)]
    pub theme: Option<String>,

    /// Subcommands
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Launch the interactive terminal UI (default)
    Tui {
        /// Theme to use for the TUI (overrides global)
        #[arg(long)]
        theme: Option<String>,
    },
    /// Send one chat message and print the reply
    Send {
        /// Message words; read from stdin when omitted
        message: Vec<String>,
    },
    /// Query the server's health route
    Health,
    /// Manage user preferences
    Preferences {
        #[command(subcommand)]
        action: PreferencesCommands,
    },
}

#[derive(Subcommand, Debug, Clone, Copy)]
pub enum PreferencesCommands {
    /// Show current preferences
    Show,
    /// Edit preferences file in $VISUAL or $EDITOR
    Edit,
    /// Reset preferences to defaults
    Reset,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodArg {
    Get,
    Post,
}

impl From<MethodArg> for ChatMethod {
    fn from(method: MethodArg) -> Self {
        match method {
            MethodArg::Get => ChatMethod::Get,
            MethodArg::Post => ChatMethod::Post,
        }
    }
}
