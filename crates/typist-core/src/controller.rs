//! Terminal view controller.
//!
//! Owns the [`TerminalView`] and drives it from a single event queue:
//! bootstrap fetch results, scheduled timers, and chat replies all arrive as
//! [`ControllerEvent`]s and are applied in order by [`Controller::handle_event`].

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use url::Url;

use crate::endpoints::Endpoints;
use crate::preferences::ChatMethod;
use crate::scheduler::{CancelToken, Scheduler, Timer};
use crate::transport::{Transport, TransportError};
use crate::view::{LineKind, Phase, TerminalView};

/// Prefix of the line echoing a submitted message.
pub const ECHO_PREFIX: &str = "> ";
/// Prefix of the line carrying a chat reply.
pub const REPLY_PREFIX: &str = "< ";
/// Written when the bootstrap resource cannot be loaded.
pub const RESOURCE_FAILURE_MESSAGE: &str = "[error] unable to load terminal";
/// Written when a chat request fails for any reason.
pub const CHAT_FAILURE_MESSAGE: &str = "[error] chat request failed";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealSpeed {
    /// Render the whole resource in one step.
    Instant,
    /// Render `chars_per_step` characters every `delay`.
    Typed {
        delay: Duration,
        chars_per_step: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerSettings {
    pub reveal: RevealSpeed,
    /// `None` disables the cursor entirely.
    pub cursor_blink: Option<Duration>,
    pub chat_method: ChatMethod,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            reveal: RevealSpeed::Typed {
                delay: Duration::from_millis(20),
                chars_per_step: 1,
            },
            cursor_blink: Some(Duration::from_millis(500)),
            chat_method: ChatMethod::Get,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExchangeId(u64);

impl ExchangeId {
    pub fn get(self) -> u64 {
        self.0
    }
}

#[derive(Debug)]
pub enum ControllerEvent {
    ResourceLoaded(Result<String, TransportError>),
    Timer(Timer),
    ChatReplied {
        exchange: ExchangeId,
        result: Result<String, TransportError>,
    },
}

enum ChatRequest {
    Get(Url),
    Post(Url, String),
}

/// Progress through the fetched resource during a typed reveal.
#[derive(Debug)]
struct Reveal {
    chars: Vec<char>,
    pos: usize,
}

impl Reveal {
    fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
            pos: 0,
        }
    }

    fn next_chunk(&mut self, max: usize) -> Option<String> {
        if self.pos >= self.chars.len() {
            return None;
        }
        let end = self.pos.saturating_add(max.max(1)).min(self.chars.len());
        let chunk = self.chars[self.pos..end].iter().collect();
        self.pos = end;
        Some(chunk)
    }
}

pub struct Controller {
    view: TerminalView,
    transport: Arc<dyn Transport>,
    scheduler: Arc<dyn Scheduler>,
    endpoints: Endpoints,
    settings: ControllerSettings,
    events: mpsc::UnboundedSender<ControllerEvent>,
    bootstrapped: bool,
    reveal: Option<Reveal>,
    reveal_timer: Option<CancelToken>,
    blink_timer: Option<CancelToken>,
    in_flight: usize,
    next_exchange: u64,
}

impl Controller {
    pub fn new(
        view: TerminalView,
        transport: Arc<dyn Transport>,
        scheduler: Arc<dyn Scheduler>,
        endpoints: Endpoints,
        settings: ControllerSettings,
        events: mpsc::UnboundedSender<ControllerEvent>,
    ) -> Self {
        Self {
            view,
            transport,
            scheduler,
            endpoints,
            settings,
            events,
            bootstrapped: false,
            reveal: None,
            reveal_timer: None,
            blink_timer: None,
            in_flight: 0,
            next_exchange: 0,
        }
    }

    pub fn view(&self) -> &TerminalView {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut TerminalView {
        &mut self.view
    }

    pub fn phase(&self) -> Phase {
        self.view.phase()
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    pub fn settings(&self) -> &ControllerSettings {
        &self.settings
    }

    /// Chat requests issued but not yet answered.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Start loading the bootstrap resource. Only the first call has any effect.
    pub fn bootstrap(&mut self) {
        if self.bootstrapped {
            debug!(target: "typist.controller", "Bootstrap already started; ignoring");
            return;
        }
        self.bootstrapped = true;

        let url = match self.endpoints.resource_url() {
            Ok(url) => url,
            Err(e) => {
                warn!(target: "typist.controller", "Invalid resource URL: {}", e);
                self.fail_bootstrap();
                return;
            }
        };

        info!(target: "typist.controller", %url, "Loading terminal resource");
        let transport = Arc::clone(&self.transport);
        let events = self.events.clone();
        tokio::spawn(async move {
            let result = transport.fetch_text(&url).await;
            let _ = events.send(ControllerEvent::ResourceLoaded(result));
        });
    }

    /// Submit the current input. Returns `None` when nothing was sent.
    pub fn submit(&mut self) -> Option<ExchangeId> {
        if self.view.phase() != Phase::Ready || !self.view.input.is_enabled() {
            return None;
        }
        let message = self.view.input.value().trim().to_string();
        if message.is_empty() {
            return None;
        }

        self.view
            .output
            .append_line_as(&format!("{ECHO_PREFIX}{message}"), LineKind::Echo);

        let exchange = ExchangeId(self.next_exchange);
        self.next_exchange += 1;

        match self.chat_request(&message) {
            Ok(request) => {
                debug!(target: "typist.controller", exchange = exchange.get(), "Sending chat message");
                self.in_flight += 1;
                let transport = Arc::clone(&self.transport);
                let events = self.events.clone();
                tokio::spawn(async move {
                    let result = match request {
                        ChatRequest::Get(url) => transport.fetch_text(&url).await,
                        ChatRequest::Post(url, body) => transport.post_text(&url, body).await,
                    };
                    let _ = events.send(ControllerEvent::ChatReplied { exchange, result });
                });
            }
            Err(e) => {
                warn!(target: "typist.controller", "Invalid chat URL: {}", e);
                self.view
                    .output
                    .append_line_as(CHAT_FAILURE_MESSAGE, LineKind::Error);
            }
        }

        // Cleared as soon as the request is issued, not when it resolves.
        self.view.input.clear();
        Some(exchange)
    }

    fn chat_request(&self, message: &str) -> crate::error::Result<ChatRequest> {
        Ok(match self.settings.chat_method {
            ChatMethod::Get => ChatRequest::Get(self.endpoints.chat_url(message)?),
            ChatMethod::Post => {
                ChatRequest::Post(self.endpoints.chat_post_url()?, message.to_string())
            }
        })
    }

    pub fn handle_event(&mut self, event: ControllerEvent) {
        match event {
            ControllerEvent::ResourceLoaded(Ok(text)) => self.start_reveal(&text),
            ControllerEvent::ResourceLoaded(Err(e)) => {
                warn!(target: "typist.controller", "Failed to load terminal resource: {}", e);
                self.fail_bootstrap();
            }
            ControllerEvent::Timer(Timer::RevealStep) => self.reveal_step(),
            ControllerEvent::Timer(Timer::CursorBlink) => self.blink(),
            ControllerEvent::ChatReplied { exchange, result } => {
                self.in_flight = self.in_flight.saturating_sub(1);
                match result {
                    Ok(reply) => {
                        debug!(target: "typist.controller", exchange = exchange.get(), bytes = reply.len(), "Chat reply");
                        self.view
                            .output
                            .append_line_as(&format!("{REPLY_PREFIX}{reply}"), LineKind::Reply);
                    }
                    Err(e) => {
                        warn!(target: "typist.controller", exchange = exchange.get(), "Chat request failed: {}", e);
                        self.view
                    .output
                    .append_line_as(CHAT_FAILURE_MESSAGE, LineKind::Error);
                    }
                }
            }
        }
    }

    fn start_reveal(&mut self, text: &str) {
        match self.settings.reveal {
            RevealSpeed::Instant => {
                self.view.output.append(text);
                self.finish_bootstrap();
            }
            RevealSpeed::Typed { .. } => {
                self.reveal = Some(Reveal::new(text));
                self.reveal_step();
            }
        }
    }

    fn reveal_step(&mut self) {
        self.reveal_timer = None;
        let (delay, chars_per_step) = match self.settings.reveal {
            RevealSpeed::Typed {
                delay,
                chars_per_step,
            } => (delay, chars_per_step),
            RevealSpeed::Instant => (Duration::ZERO, usize::MAX),
        };
        let Some(reveal) = self.reveal.as_mut() else {
            return;
        };

        match reveal.next_chunk(chars_per_step) {
            Some(chunk) => {
                self.view.output.append(&chunk);
                self.reveal_timer = Some(self.scheduler.schedule(delay, Timer::RevealStep));
            }
            None => {
                self.reveal = None;
                self.finish_bootstrap();
            }
        }
    }

    fn fail_bootstrap(&mut self) {
        self.view
            .output
            .append_line_as(RESOURCE_FAILURE_MESSAGE, LineKind::Error);
        self.finish_bootstrap();
    }

    fn finish_bootstrap(&mut self) {
        if !self.view.mark_ready() {
            return;
        }
        info!(target: "typist.controller", "Terminal ready");
        if let Some(interval) = self.settings.cursor_blink {
            self.view.set_cursor_visible(true);
            self.blink_timer = Some(self.scheduler.schedule(interval, Timer::CursorBlink));
        }
    }

    fn blink(&mut self) {
        let Some(interval) = self.settings.cursor_blink else {
            return;
        };
        self.view.toggle_cursor();
        self.blink_timer = Some(self.scheduler.schedule(interval, Timer::CursorBlink));
    }

    /// Cancel outstanding timers. In-flight chat requests are left to finish.
    pub fn shutdown(&mut self) {
        if let Some(token) = self.reveal_timer.take() {
            token.cancel();
        }
        if let Some(token) = self.blink_timer.take() {
            token.cancel();
        }
        self.reveal = None;
    }
}

impl Drop for Controller {
    fn drop(&mut self) {
        self.shutdown();
    }
}
