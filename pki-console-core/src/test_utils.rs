//! Test helpers.
//!
//! Provides a scripted transport and factory methods for wiring units under
//! test to it.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::{Mutex, Semaphore};

use pki_console_client::{ApiClient, ClientError, Transport};

use crate::dispatcher::CommandDispatcher;
use crate::navigator::Navigator;

// ===== MockTransport =====

/// Scripted transport: replies are queued per action verb, every request
/// body is recorded in issue order, and individual actions can be made to
/// fail at the transport level or block until released.
pub struct MockTransport {
    replies: Mutex<HashMap<String, VecDeque<Value>>>,
    requests: Mutex<Vec<Value>>,
    transport_failures: Mutex<HashMap<String, String>>,
    gates: Mutex<HashMap<String, Arc<Semaphore>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(HashMap::new()),
            requests: Mutex::new(Vec::new()),
            transport_failures: Mutex::new(HashMap::new()),
            gates: Mutex::new(HashMap::new()),
        }
    }

    /// Queue the next reply body for an action.
    pub async fn enqueue(&self, action: &str, reply: Value) {
        self.replies
            .lock()
            .await
            .entry(action.to_string())
            .or_default()
            .push_back(reply);
    }

    /// Make every request for an action fail at the transport level.
    pub async fn fail_transport(&self, action: &str, detail: &str) {
        self.transport_failures
            .lock()
            .await
            .insert(action.to_string(), detail.to_string());
    }

    /// Block requests for an action until a permit is added to the returned
    /// gate.
    pub async fn hold(&self, action: &str) -> Arc<Semaphore> {
        let gate = Arc::new(Semaphore::new(0));
        self.gates
            .lock()
            .await
            .insert(action.to_string(), gate.clone());
        gate
    }

    /// Every request body delivered so far, in issue order.
    pub async fn requests(&self) -> Vec<Value> {
        self.requests.lock().await.clone()
    }

    /// The `action` field of every delivered request, in issue order.
    pub async fn actions(&self) -> Vec<String> {
        self.requests
            .lock()
            .await
            .iter()
            .filter_map(|body| body.get("action").and_then(Value::as_str))
            .map(str::to_string)
            .collect()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn roundtrip(&self, body: &Value) -> Result<Value, ClientError> {
        self.requests.lock().await.push(body.clone());
        let action = body
            .get("action")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let gate = self.gates.lock().await.get(&action).cloned();
        if let Some(gate) = gate {
            let permit = gate.acquire().await.map_err(|e| ClientError::Network {
                detail: format!("gate closed for {action}: {e}"),
            })?;
            permit.forget();
        }

        if let Some(detail) = self.transport_failures.lock().await.get(&action) {
            return Err(ClientError::Network {
                detail: detail.clone(),
            });
        }

        self.replies
            .lock()
            .await
            .get_mut(&action)
            .and_then(VecDeque::pop_front)
            .ok_or_else(|| ClientError::Network {
                detail: format!("no scripted reply for {action}"),
            })
    }
}

// ===== Factory methods =====

/// Create a dispatcher wired to a fresh scripted transport.
pub fn test_dispatcher() -> (Arc<CommandDispatcher>, Arc<MockTransport>) {
    let transport = Arc::new(MockTransport::new());
    let dispatcher = Arc::new(CommandDispatcher::new(ApiClient::new(transport.clone())));
    (dispatcher, transport)
}

/// Create a navigator (with all of its pages) over a scripted transport.
pub fn test_navigator() -> (Navigator, Arc<MockTransport>) {
    let (dispatcher, transport) = test_dispatcher();
    (Navigator::new(dispatcher), transport)
}
