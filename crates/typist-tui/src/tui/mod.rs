//! TUI module for the typist terminal
//!
//! Renders the controller's view with ratatui and feeds it key presses,
//! timer ticks and network results from one `tokio::select!` loop.

use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Duration;

use ratatui::backend::CrosstermBackend;
use ratatui::crossterm::event::{self, Event, KeyEventKind};
use ratatui::Terminal;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use typist_core::{
    Controller, ControllerEvent, ControllerSettings, Endpoints, HttpTransport, Phase,
    TerminalView, TokioScheduler,
};

use crate::error::{Error, Result};
use crate::tui::keys::KeyOutcome;
use crate::tui::theme::Theme;
use crate::tui::ui_layout::UiLayout;
use crate::tui::widgets::{InputLineWidget, OutputPane, OutputScroll, StatusBar};

pub mod keys;
pub mod terminal;
pub mod theme;
pub mod ui_layout;
pub mod widgets;

const SPINNER_UPDATE_INTERVAL: Duration = Duration::from_millis(100);

pub struct Tui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    controller: Controller,
    theme: Theme,
    scroll: OutputScroll,
    spinner_state: usize,
    /// Output pane height from the last draw, used for paging
    page_height: usize,
    server_label: String,
    last_revision: u64,
}

impl Tui {
    pub fn new(controller: Controller, theme: Theme) -> Result<Self> {
        let mut guard = terminal::SetupGuard::new();
        let mut stdout = io::stdout();
        terminal::setup(&mut stdout)?;

        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        guard.disarm();

        let server_label = server_label(controller.endpoints());
        Ok(Self {
            terminal,
            controller,
            theme,
            scroll: OutputScroll::new(),
            spinner_state: 0,
            page_height: 0,
            server_label,
            last_revision: 0,
        })
    }

    pub async fn run(
        &mut self,
        mut controller_rx: mpsc::UnboundedReceiver<ControllerEvent>,
    ) -> Result<()> {
        info!(target: "tui.run", server = %self.server_label, "Starting TUI");

        let (term_event_tx, mut term_event_rx) = mpsc::channel::<Result<Event>>(1);
        let input_handle: JoinHandle<()> = tokio::spawn(async move {
            loop {
                // Non-blocking poll
                if event::poll(Duration::ZERO).unwrap_or(false) {
                    match event::read() {
                        Ok(evt) => {
                            if term_event_tx.send(Ok(evt)).await.is_err() {
                                break;
                            }
                        }
                        Err(e) if e.kind() == io::ErrorKind::Interrupted => {
                            debug!(target: "tui.input", "Ignoring interrupted syscall");
                        }
                        Err(e) => {
                            warn!(target: "tui.input", "Input error: {}", e);
                            let _ = term_event_tx.send(Err(Error::from(e))).await;
                            break;
                        }
                    }
                } else {
                    // Async sleep so abort can interrupt the task
                    tokio::time::sleep(Duration::from_millis(10)).await;
                }
            }
        });

        self.controller.bootstrap();

        let mut should_exit = false;
        let mut needs_redraw = true;

        let mut tick = tokio::time::interval(SPINNER_UPDATE_INTERVAL);
        tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        while !should_exit {
            let revision = self.controller.view().revision();
            if needs_redraw || revision != self.last_revision {
                self.draw()?;
                self.last_revision = revision;
                needs_redraw = false;
            }

            tokio::select! {
                Some(event_res) = term_event_rx.recv() => {
                    match event_res {
                        Ok(Event::Key(key_event)) if key_event.kind == KeyEventKind::Press => {
                            match keys::handle_key(
                                &mut self.controller,
                                &mut self.scroll,
                                key_event,
                                self.page_height,
                            ) {
                                KeyOutcome::Quit => should_exit = true,
                                KeyOutcome::Handled => needs_redraw = true,
                                KeyOutcome::Ignored => {}
                            }
                        }
                        Ok(Event::Mouse(mouse_event)) => {
                            if keys::handle_mouse(&mut self.scroll, mouse_event) {
                                needs_redraw = true;
                            }
                        }
                        Ok(Event::Resize(..)) => needs_redraw = true,
                        Ok(Event::Paste(data)) => {
                            self.controller.view_mut().input.insert_str(&data);
                            debug!(target: "tui.run", "Pasted {} chars", data.len());
                            needs_redraw = true;
                        }
                        Ok(_) => {}
                        Err(e) => {
                            error!(target: "tui.run", "Fatal input error: {}. Exiting.", e);
                            should_exit = true;
                        }
                    }
                }
                Some(controller_event) = controller_rx.recv() => {
                    self.controller.handle_event(controller_event);
                }
                _ = tick.tick() => {
                    if self.controller.phase() == Phase::Loading || self.controller.in_flight() > 0 {
                        self.spinner_state = self.spinner_state.wrapping_add(1);
                        needs_redraw = true;
                    }
                }
            }
        }

        self.controller.shutdown();
        input_handle.abort();
        terminal::cleanup_with_writer(self.terminal.backend_mut());
        info!(target: "tui.run", "TUI exited");
        Ok(())
    }

    fn draw(&mut self) -> Result<()> {
        let controller = &self.controller;
        let theme = &self.theme;
        let scroll = &mut self.scroll;
        let server = self.server_label.as_str();
        let spinner_state = self.spinner_state;
        let mut page_height = self.page_height;

        self.terminal.draw(|f| {
            let layout = UiLayout::compute(f.area());
            layout.prepare_background(f, theme);
            page_height = usize::from(layout.output.height.saturating_sub(2));

            let view = controller.view();
            f.render_stateful_widget(OutputPane::new(view, theme), layout.output, scroll);

            let input = InputLineWidget::new(&view.input, view.phase(), theme);
            let cursor = input.cursor_position(layout.input);
            f.render_widget(input, layout.input);
            if let Some(position) = cursor {
                f.set_cursor_position(position);
            }

            f.render_widget(
                StatusBar::new(view.phase(), server, theme)
                    .with_in_flight(controller.in_flight(), spinner_state),
                layout.status,
            );
        })?;

        self.page_height = page_height;
        Ok(())
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        terminal::cleanup_with_writer(self.terminal.backend_mut());
    }
}

/// `host:port` of the server for the status bar.
fn server_label(endpoints: &Endpoints) -> String {
    let base = endpoints.base();
    match (base.host_str(), base.port_or_known_default()) {
        (Some(host), Some(port)) => format!("{host}:{port}"),
        (Some(host), None) => host.to_string(),
        _ => base.to_string(),
    }
}

/// Free function for best-effort terminal cleanup (raw mode, alt screen, mouse, etc.)
pub fn cleanup_terminal() {
    terminal::cleanup();
}

/// Helper to wrap terminal cleanup in panic handler
#[expect(clippy::print_stderr)]
pub fn setup_panic_hook() {
    std::panic::set_hook(Box::new(|panic_info| {
        cleanup_terminal();
        // Print panic info to stderr after restoring terminal state
        eprintln!("Application panicked:");
        eprintln!("{panic_info}");
    }));
}

/// High-level entry point for running the TUI
pub async fn run_tui(
    endpoints: Endpoints,
    settings: ControllerSettings,
    request_timeout: Option<Duration>,
    theme_name: Option<String>,
) -> Result<()> {
    let theme = match theme_name {
        Some(name) => Theme::by_name(&name).unwrap_or_else(|| {
            warn!("Unknown theme '{}'. Using default theme.", name);
            Theme::default()
        }),
        None => Theme::default(),
    };
    info!("Using theme: {}", theme.name);

    let transport = HttpTransport::new(request_timeout).map_err(typist_core::Error::from)?;
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let scheduler = TokioScheduler::new(event_tx.clone());

    let controller = Controller::new(
        TerminalView::new(),
        Arc::new(transport),
        Arc::new(scheduler),
        endpoints,
        settings,
        event_tx,
    );

    let mut tui = Tui::new(controller, theme)?;
    tui.run(event_rx).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_label_uses_host_and_port() {
        let endpoints =
            Endpoints::new("http://localhost:8000/", "index_full.html", "/chat", "msg").unwrap();
        assert_eq!(server_label(&endpoints), "localhost:8000");

        let endpoints =
            Endpoints::new("https://chat.example/", "index_full.html", "/chat", "msg").unwrap();
        assert_eq!(server_label(&endpoints), "chat.example:443");
    }
}
