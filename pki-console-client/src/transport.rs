//! Transport seam for the single POST endpoint.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{ClientError, Result};

/// One round trip to the daemon.
///
/// Implementations deliver a flat JSON body and return the raw reply body;
/// they do not interpret it. The in-memory test transport and the reqwest
/// transport both live behind this trait.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Deliver `body` and return the parsed reply JSON.
    async fn roundtrip(&self, body: &Value) -> Result<Value>;
}

/// HTTP transport posting every command to one endpoint URL.
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpTransport {
    /// Create a transport for the given endpoint URL.
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    /// Create a transport with a caller-configured client (timeouts, proxy).
    #[must_use]
    pub fn with_client(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn roundtrip(&self, body: &Value) -> Result<Value> {
        log::debug!("POST {}", self.endpoint);
        log::debug!("Request Body: {body}");

        let response = self
            .client
            .post(&self.endpoint)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ClientError::Timeout {
                        detail: e.to_string(),
                    }
                } else {
                    ClientError::Network {
                        detail: e.to_string(),
                    }
                }
            })?;

        let status = response.status();
        log::debug!("Response Status: {status}");

        let text = response.text().await.map_err(|e| ClientError::Network {
            detail: format!("failed to read response body: {e}"),
        })?;
        log::debug!("Response Body: {text}");

        serde_json::from_str(&text).map_err(|e| {
            log::error!("reply is not JSON: {e}");
            ClientError::Parse {
                detail: e.to_string(),
            }
        })
    }
}
