pub mod error;
pub mod tui;

// Expose the main TUI entry point
pub use tui::Tui;

pub use tui::{run_tui, setup_panic_hook};
