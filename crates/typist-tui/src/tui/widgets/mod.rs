pub mod input_line;
pub mod output_pane;
pub mod status_bar;

pub use input_line::InputLineWidget;
pub use output_pane::{OutputPane, OutputScroll};
pub use status_bar::StatusBar;
