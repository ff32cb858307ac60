use serde::Deserialize;

use crate::endpoints::Endpoints;
use crate::error::Result;
use crate::transport::Transport;

/// Body of the server's `/health` route.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub entropy: f64,
}

impl HealthStatus {
    pub fn is_alive(&self) -> bool {
        self.status.eq_ignore_ascii_case("alive")
    }
}

pub async fn fetch_health(transport: &dyn Transport, endpoints: &Endpoints) -> Result<HealthStatus> {
    let url = endpoints.health_url()?;
    let body = transport.fetch_text(&url).await?;
    Ok(serde_json::from_str(&body)?)
}
