//! HTTP client for the storage endpoint.

use crate::config::ClientConfig;
use crate::core::Session;
use crate::error::Result;
use crate::server::SaveAck;
use crate::storage::decode_sessions;
use serde_json::Value;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Talks to a running storage endpoint.
#[derive(Debug, Clone)]
pub struct StorageClient {
    http: reqwest::Client,
    base_url: String,
}

impl StorageClient {
    /// Build a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .no_proxy()
            .build()?;
        Ok(Self {
            http,
            base_url: config.endpoint.trim_end_matches('/').to_string(),
        })
    }

    /// Base URL of the endpoint.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `POST /save` one session.
    ///
    /// # Errors
    ///
    /// Returns an error on connection failure, a non-success status, or an
    /// unexpected response body.
    pub async fn save(&self, session: &Session) -> Result<SaveAck> {
        let ack = self
            .http
            .post(format!("{}/save", self.base_url))
            .json(session)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(ack)
    }

    /// `GET /sessions`, keeping only records that decode as sessions.
    ///
    /// # Errors
    ///
    /// Returns an error on connection failure, a non-success status, or a body
    /// that is not a JSON array.
    pub async fn fetch_sessions(&self) -> Result<Vec<Session>> {
        let records: Vec<Value> = self
            .http
            .get(format!("{}/sessions", self.base_url))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(decode_sessions(records))
    }

    /// Save `session` on a detached task.
    ///
    /// The outcome is only logged: failures are not retried and the caller keeps
    /// its in-memory copy. The handle may be dropped.
    pub fn save_detached(&self, session: Session) -> JoinHandle<()> {
        let client = self.clone();
        tokio::spawn(async move {
            match client.save(&session).await {
                Ok(ack) => info!(ack = %ack.message, start = %session.start_time, "session saved"),
                Err(e) => warn!(error = %e, start = %session.start_time, "failed to save session"),
            }
        })
    }
}
