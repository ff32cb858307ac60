use super::Command;
use crate::error::Error;
use async_trait::async_trait;
use eyre::Result;
use std::io::Write;
use std::time::Duration;
use typist_core::health::{HealthStatus, fetch_health};
use typist_core::{Endpoints, HttpTransport};

pub struct HealthCommand {
    pub endpoints: Endpoints,
    pub timeout: Option<Duration>,
}

#[async_trait]
impl Command for HealthCommand {
    async fn execute(&self) -> Result<()> {
        let transport = HttpTransport::new(self.timeout).map_err(Error::from)?;
        let status = fetch_health(&transport, &self.endpoints)
            .await
            .map_err(Error::from)?;

        let mut stdout = std::io::stdout();
        writeln!(stdout, "{}", format_status(self.endpoints.base().as_str(), &status))?;

        if !status.is_alive() {
            eyre::bail!("Server reported status '{}'", status.status);
        }
        Ok(())
    }
}

fn format_status(server: &str, status: &HealthStatus) -> String {
    format!(
        "{server}: {} (entropy {:.4})",
        status.status, status.entropy
    )
}
