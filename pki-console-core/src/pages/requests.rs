//! Certificate signing request page.

use std::sync::Arc;

use tokio::sync::RwLock;

use pki_console_client::{Command, Payload};

use crate::dispatcher::CommandDispatcher;
use crate::error::{CoreError, CoreResult};
use crate::pages::page::{PageMode, PageResource, ResourcePage};
use crate::types::CsrRequest;

impl PageResource for CsrRequest {
    const KIND: &'static str = "signing request";

    fn name(&self) -> &str {
        &self.name
    }

    fn draft() -> Self {
        Self::draft()
    }

    fn list_command() -> Command {
        Command::ListRequests
    }

    fn create_command(&self) -> Command {
        Command::CreateRequest {
            name: self.name.clone(),
            key_name: self.key_name.clone(),
            key_password: self.key_password.clone(),
            subject: self.subject.clone(),
            digest: self.digest,
        }
    }

    fn remove_command(name: &str) -> Command {
        Command::RemoveRequest {
            name: name.to_string(),
        }
    }

    fn wipe_command() -> Command {
        Command::WipeRequests
    }

    fn from_payload(payload: Payload) -> Option<Vec<Self>> {
        match payload {
            Payload::Requests(entries) => Some(entries.into_iter().map(Into::into).collect()),
            _ => None,
        }
    }

    fn on_created(&mut self) {
        self.key_password = None;
    }
}

/// CSR page. The create form offers a key picker, so the page caches the
/// available key names fetched before its list.
pub struct RequestPage {
    page: ResourcePage<CsrRequest>,
    key_names: RwLock<Vec<String>>,
}

impl RequestPage {
    /// Create an empty page.
    #[must_use]
    pub fn new(dispatcher: Arc<CommandDispatcher>) -> Self {
        Self {
            page: ResourcePage::new(dispatcher),
            key_names: RwLock::new(Vec::new()),
        }
    }

    /// Current UI mode.
    pub async fn mode(&self) -> PageMode {
        self.page.mode().await
    }

    /// Snapshot of the local list.
    pub async fn items(&self) -> Vec<CsrRequest> {
        self.page.items().await
    }

    /// Snapshot of the pending draft.
    pub async fn draft(&self) -> Option<CsrRequest> {
        self.page.draft().await
    }

    /// Edit the pending draft in place.
    pub async fn update_draft(&self, edit: impl FnOnce(&mut CsrRequest)) {
        self.page.update_draft(edit).await;
    }

    /// Flip the create form.
    pub async fn toggle_create(&self) {
        self.page.toggle_create().await;
    }

    /// Flip the wipe confirmation.
    pub async fn toggle_wipe(&self) {
        self.page.toggle_wipe().await;
    }

    /// Force `Table` mode.
    pub async fn reset(&self) {
        self.page.reset().await;
    }

    /// Submit the pending draft.
    pub async fn create(&self) -> CoreResult<()> {
        self.page.create().await
    }

    /// Remove one request by name.
    pub async fn remove(&self, name: &str) -> CoreResult<()> {
        self.page.remove(name).await
    }

    /// Remove every request.
    pub async fn wipe(&self) -> CoreResult<()> {
        self.page.wipe().await
    }

    /// Replace the local list with the daemon's answer.
    pub async fn list(&self) -> CoreResult<()> {
        self.page.list().await
    }

    /// Names of the available signing keys.
    pub async fn key_names(&self) -> Vec<String> {
        self.key_names.read().await.clone()
    }

    /// Refresh the key-name cache from the daemon.
    pub async fn refresh_key_names(&self) -> CoreResult<()> {
        let payload = self.page.dispatcher().execute(Command::ListKeys).await?;
        let Payload::Keys(keys) = payload else {
            return Err(CoreError::UnexpectedPayload { action: "ListKeys" });
        };
        let mut names: Vec<String> = keys.into_iter().map(|key| key.name).collect();
        names.sort();
        *self.key_names.write().await = names;
        Ok(())
    }

    pub(crate) fn dispatcher(&self) -> &Arc<CommandDispatcher> {
        self.page.dispatcher()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_dispatcher;
    use serde_json::json;

    fn csr_page() -> (RequestPage, Arc<crate::test_utils::MockTransport>) {
        let (dispatcher, transport) = test_dispatcher();
        (RequestPage::new(dispatcher), transport)
    }

    #[tokio::test]
    async fn create_against_missing_key_surfaces_not_found() {
        let (page, transport) = csr_page();
        transport
            .enqueue("CreateCSR", json!({"err": 6, "msg": "key1"}))
            .await;

        page.toggle_create().await;
        page.update_draft(|draft| {
            draft.name = "csr1".to_string();
            draft.key_name = "key1".to_string();
            draft.subject = "/CN=plcrtd".to_string();
        })
        .await;
        let result = page.create().await;
        assert!(result.is_err());

        let banner = page.dispatcher().error().await.unwrap();
        assert_eq!(banner.message, "Entry not found");
        assert_eq!(banner.detail.as_deref(), Some("key1"));
        assert!(page.items().await.is_empty());
        assert_eq!(page.mode().await, PageMode::Creating);
    }

    #[tokio::test]
    async fn create_request_sends_draft_fields() {
        let (page, transport) = csr_page();
        transport.enqueue("CreateCSR", json!({"name": "csr1"})).await;

        page.toggle_create().await;
        page.update_draft(|draft| {
            draft.name = "csr1".to_string();
            draft.key_name = "key1".to_string();
            draft.subject = "/CN=plcrtd".to_string();
        })
        .await;
        page.create().await.unwrap();

        let request = &transport.requests().await[0];
        assert_eq!(request["action"], "CreateCSR");
        assert_eq!(request["keyname"], "key1");
        assert_eq!(request["subject"], "/CN=plcrtd");
        assert_eq!(request["digest"], "SHA256");

        assert_eq!(page.items().await[0].name, "csr1");
    }

    #[tokio::test]
    async fn key_name_cache_is_sorted() {
        let (page, transport) = csr_page();
        transport
            .enqueue("ListKeys", json!({"keys": [
                {"name": "zeta", "type": "RSA", "bits": 2048, "cipher": "AES256"},
                {"name": "alpha", "type": "RSA", "bits": 2048, "cipher": "AES256"},
            ]}))
            .await;

        page.refresh_key_names().await.unwrap();
        assert_eq!(page.key_names().await, ["alpha", "zeta"]);
    }
}
