pub mod controller;
pub mod endpoints;
pub mod error;
pub mod health;
pub mod preferences;
pub mod scheduler;
pub mod transport;
pub mod utils;
pub mod view;

pub use controller::{Controller, ControllerEvent, ControllerSettings, ExchangeId, RevealSpeed};
pub use endpoints::Endpoints;
pub use error::{Error, Result};
pub use preferences::{ChatMethod, Preferences};
pub use scheduler::{CancelToken, ManualScheduler, Scheduler, Timer, TokioScheduler};
pub use transport::{HttpTransport, Transport, TransportError};
pub use view::{InputLine, LineKind, OutputBuffer, Phase, TerminalView};
