//! Command dispatch with UI-state bookkeeping.
//!
//! Every page operation funnels through [`CommandDispatcher::execute`]: it
//! clears the shared error banner, counts the request as in flight for the
//! busy indicator, and on failure raises the banner with the right message
//! source (catalog label for business errors, raw text for transport
//! failures).

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde::Serialize;
use tokio::sync::RwLock;

use pki_console_client::{ApiClient, ClientError, Command, ErrorCode, Payload, Transport};

use crate::error::CoreResult;

/// Operator-facing failure banner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBanner {
    /// Category message (catalog label, or raw transport text).
    pub message: String,
    /// Optional human-readable detail from the daemon.
    pub detail: Option<String>,
}

/// Scoped in-flight marker. The counter is incremented on construction and
/// released however the request settles, so it can never go negative and
/// always returns to zero.
struct InFlightGuard<'a>(&'a AtomicUsize);

impl<'a> InFlightGuard<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Shared command dispatcher.
///
/// Holds the protocol client plus the two pieces of state every page
/// observes: the in-flight counter behind the busy indicator and the shared
/// error banner.
pub struct CommandDispatcher {
    client: ApiClient,
    in_flight: AtomicUsize,
    banner: RwLock<Option<ErrorBanner>>,
}

impl CommandDispatcher {
    /// Create a dispatcher over a protocol client.
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            in_flight: AtomicUsize::new(0),
            banner: RwLock::new(None),
        }
    }

    /// Create a dispatcher over any transport.
    #[must_use]
    pub fn from_transport(transport: Arc<dyn Transport>) -> Self {
        Self::new(ApiClient::new(transport))
    }

    /// Execute one command.
    ///
    /// Clears the error banner before dispatching; raises it again if the
    /// command fails. Multi-step workflows chain on the returned `Result`,
    /// so a follow-up step only runs after a confirmed success.
    pub async fn execute(&self, command: Command) -> CoreResult<Payload> {
        self.clear_error().await;

        let _guard = InFlightGuard::enter(&self.in_flight);
        match self.client.call(&command).await {
            Ok(payload) => Ok(payload),
            Err(err) => {
                self.raise(&err).await;
                Err(err.into())
            }
        }
    }

    /// Number of requests currently awaiting a response.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Whether any request is in flight (drives the busy indicator).
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.in_flight() > 0
    }

    /// Snapshot of the current error banner.
    pub async fn error(&self) -> Option<ErrorBanner> {
        self.banner.read().await.clone()
    }

    /// Clear the error banner.
    pub async fn clear_error(&self) {
        *self.banner.write().await = None;
    }

    async fn raise(&self, err: &ClientError) {
        let banner = match err {
            ClientError::Api { code, detail } => ErrorBanner {
                message: code.message().to_string(),
                detail: detail.clone(),
            },
            // A reply that matched no schema fails like an internal error.
            ClientError::Parse { detail } => ErrorBanner {
                message: ErrorCode::InternalError.message().to_string(),
                detail: Some(detail.clone()),
            },
            // Transport failures surface the raw error text, not a catalog
            // entry.
            transport => ErrorBanner {
                message: transport.to_string(),
                detail: None,
            },
        };
        *self.banner.write().await = Some(banner);
    }
}
