//! Resolves the resource, chat and health URLs against the configured base.

use url::Url;

use crate::error::Result;
use crate::preferences::ServerPreferences;

const HEALTH_PATH: &str = "/health";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base: Url,
    resource_path: String,
    chat_path: String,
    chat_param: String,
}

impl Endpoints {
    pub fn new(
        base: &str,
        resource_path: impl Into<String>,
        chat_path: impl Into<String>,
        chat_param: impl Into<String>,
    ) -> Result<Self> {
        Ok(Self {
            base: Url::parse(base)?,
            resource_path: resource_path.into(),
            chat_path: chat_path.into(),
            chat_param: chat_param.into(),
        })
    }

    pub fn from_preferences(server: &ServerPreferences) -> Result<Self> {
        Self::new(
            &server.base_url,
            server.resource_path.clone(),
            server.chat_path.clone(),
            server.chat_param.clone(),
        )
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    pub fn resource_url(&self) -> Result<Url> {
        Ok(self.base.join(&self.resource_path)?)
    }

    /// Chat URL without a query, used for POST exchanges.
    pub fn chat_post_url(&self) -> Result<Url> {
        Ok(self.base.join(&self.chat_path)?)
    }

    /// Chat URL carrying the message as a percent-encoded query parameter.
    pub fn chat_url(&self, message: &str) -> Result<Url> {
        let mut url = self.chat_post_url()?;
        // Percent-encode by hand: `Url::query_pairs_mut` would emit `+` for spaces.
        let query = format!(
            "{}={}",
            urlencoding::encode(&self.chat_param),
            urlencoding::encode(message)
        );
        url.set_query(Some(&query));
        Ok(url)
    }

    pub fn health_url(&self) -> Result<Url> {
        Ok(self.base.join(HEALTH_PATH)?)
    }
}
