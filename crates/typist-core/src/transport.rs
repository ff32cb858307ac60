//! Text transport used by the controller for both the bootstrap resource and
//! chat exchanges.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use tracing::debug;
use url::Url;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The server answered with a non-success status. The body is dropped.
    #[error("{url} returned HTTP {status}")]
    Status { status: u16, url: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Failed to read response body: {0}")]
    Body(String),
}

/// Minimal request/response surface: a URL in, a text body out.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn fetch_text(&self, url: &Url) -> Result<String, TransportError>;

    async fn post_text(&self, url: &Url, body: String) -> Result<String, TransportError>;
}

/// `reqwest`-backed transport with default headers and no authentication.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(timeout: Option<Duration>) -> Result<Self, TransportError> {
        let mut builder = Client::builder().user_agent(concat!("typist/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| TransportError::Network(e.to_string()))?;
        Ok(Self { client })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    async fn read_body(
        url: &Url,
        response: reqwest::Response,
    ) -> Result<String, TransportError> {
        let status = response.status();
        if !status.is_success() {
            debug!(target: "typist.transport", %url, status = status.as_u16(), "Non-success status");
            return Err(TransportError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        response
            .text()
            .await
            .map_err(|e| TransportError::Body(e.to_string()))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch_text(&self, url: &Url) -> Result<String, TransportError> {
        debug!(target: "typist.transport", %url, "GET");
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;
        Self::read_body(url, response).await
    }

    async fn post_text(&self, url: &Url, body: String) -> Result<String, TransportError> {
        debug!(target: "typist.transport", %url, bytes = body.len(), "POST");
        let response = self
            .client
            .post(url.clone())
            .header(reqwest::header::CONTENT_TYPE, "text/plain; charset=utf-8")
            .body(body)
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;
        Self::read_body(url, response).await
    }
}
