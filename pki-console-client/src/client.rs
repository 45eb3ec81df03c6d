//! Protocol client: command in, typed payload out.

use std::sync::Arc;

use crate::command::Command;
use crate::error::{ClientError, Result};
use crate::protocol::{Payload, Reply, parse_reply};
use crate::transport::{HttpTransport, Transport};

/// Stateless protocol client over a [`Transport`].
///
/// Serializes a [`Command`], delivers it, and folds the daemon's tagged
/// reply into `Result<Payload, ClientError>`: business failures become
/// [`ClientError::Api`].
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
}

impl ApiClient {
    /// Create a client over any transport.
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Convenience constructor for the HTTP transport.
    #[must_use]
    pub fn http(endpoint: impl Into<String>) -> Self {
        Self::new(Arc::new(HttpTransport::new(endpoint)))
    }

    /// Execute one command round trip.
    pub async fn call(&self, command: &Command) -> Result<Payload> {
        let action = command.action();
        let body = command.body();
        log::debug!("[{action}] dispatching");

        let raw = self.transport.roundtrip(&body).await?;
        match parse_reply(command.expects(), &raw)? {
            Reply::Success(payload) => Ok(payload),
            Reply::Failure { code, detail } => {
                let err = ClientError::Api { code, detail };
                if err.is_expected() {
                    log::warn!("[{action}] {err}");
                } else {
                    log::error!("[{action}] {err}");
                }
                Err(err)
            }
        }
    }
}
