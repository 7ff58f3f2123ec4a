use async_trait::async_trait;
use reqwest::{Client, redirect};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::config::ProbeConfig;
use crate::errors::AppResult;

/// Transport-level failure of a probe request
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The request did not complete within the configured timeout
    #[error("Timeout")]
    Timeout,
    /// No connection could be established
    #[error("Connection Error")]
    Connection,
    /// Anything else the client reported
    #[error("{0}")]
    Other(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else if error.is_connect() {
            Self::Connection
        } else {
            Self::Other(error.to_string())
        }
    }
}

/// Minimal HTTP surface the stream prober needs
///
/// Both calls follow redirects and return the final status code. Response
/// bodies are never read.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProbeHttpClient: Send + Sync {
    /// Lightweight existence check
    async fn head(&self, url: &str) -> Result<u16, TransportError>;

    /// Full retrieval request; the body stream is dropped unread
    async fn get(&self, url: &str) -> Result<u16, TransportError>;
}

/// `reqwest`-backed probe client
#[derive(Debug, Clone)]
pub struct StandardProbeClient {
    client: Client,
}

impl StandardProbeClient {
    /// Build a client with the probe timeout, redirect limit and user agent
    pub fn new(config: &ProbeConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.timeout)
            .redirect(redirect::Policy::limited(config.max_redirects))
            .user_agent(config.user_agent.clone())
            .pool_idle_timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl ProbeHttpClient for StandardProbeClient {
    async fn head(&self, url: &str) -> Result<u16, TransportError> {
        let response = self.client.head(url).send().await?;
        debug!("HEAD {} -> {}", url, response.status());
        Ok(response.status().as_u16())
    }

    async fn get(&self, url: &str) -> Result<u16, TransportError> {
        // `send` resolves once headers arrive; dropping the response closes the body
        let response = self.client.get(url).send().await?;
        debug!("GET {} -> {}", url, response.status());
        Ok(response.status().as_u16())
    }
}
