use super::Command;
use crate::error::Error;
use async_trait::async_trait;
use eyre::Result;
use std::io::Write;
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tracing::debug;
use typist_core::{ChatMethod, Endpoints, HttpTransport, Transport};

/// One chat exchange without the terminal UI.
pub struct SendCommand {
    pub endpoints: Endpoints,
    pub method: ChatMethod,
    pub timeout: Option<Duration>,
    /// Message words; `None` reads the message from stdin.
    pub message: Option<String>,
}

#[async_trait]
impl Command for SendCommand {
    async fn execute(&self) -> Result<()> {
        let message = match &self.message {
            Some(message) => message.clone(),
            None => {
                let mut buffer = String::new();
                tokio::io::stdin().read_to_string(&mut buffer).await?;
                buffer
            }
        };

        let transport = HttpTransport::new(self.timeout).map_err(Error::from)?;
        let reply = self.exchange(&transport, &message).await?;

        let mut stdout = std::io::stdout();
        writeln!(stdout, "{reply}")?;
        Ok(())
    }
}

impl SendCommand {
    /// Trim and send `message`, returning the server's reply text.
    pub async fn exchange(
        &self,
        transport: &dyn Transport,
        message: &str,
    ) -> std::result::Result<String, Error> {
        let message = message.trim();
        if message.is_empty() {
            return Err(Error::Config("Nothing to send: message is empty".to_string()));
        }

        debug!(target: "typist.send", method = %self.method, "Sending chat message");
        let reply = match self.method {
            ChatMethod::Get => {
                let url = self.endpoints.chat_url(message)?;
                transport.fetch_text(&url).await?
            }
            ChatMethod::Post => {
                let url = self.endpoints.chat_post_url()?;
                transport.post_text(&url, message.to_string()).await?
            }
        };
        Ok(reply)
    }
}
