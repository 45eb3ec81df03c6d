//! Certificate revocation list page.

use std::sync::Arc;

use tokio::sync::RwLock;

use pki_console_client::{Command, Payload};

use crate::dispatcher::CommandDispatcher;
use crate::error::{CoreError, CoreResult};
use crate::pages::page::{PageMode, PageResource, ResourcePage};
use crate::types::RevocationList;

impl PageResource for RevocationList {
    const KIND: &'static str = "revocation list";

    fn name(&self) -> &str {
        &self.name
    }

    fn draft() -> Self {
        Self::draft()
    }

    fn list_command() -> Command {
        Command::ListRevocations
    }

    fn create_command(&self) -> Command {
        Command::CreateRevocation {
            name: self.name.clone(),
            description: self.description.clone(),
            days: self.days,
            ca_cert_name: self.ca_cert_name.clone(),
            ca_key_name: self.ca_key_name.clone(),
            ca_key_password: self.ca_key_password.clone(),
        }
    }

    fn remove_command(name: &str) -> Command {
        Command::RemoveRevocation {
            name: name.to_string(),
        }
    }

    fn wipe_command() -> Command {
        Command::WipeRevocations
    }

    fn from_payload(payload: Payload) -> Option<Vec<Self>> {
        match payload {
            Payload::Revocations(entries) => Some(entries.into_iter().map(Into::into).collect()),
            _ => None,
        }
    }

    fn on_created(&mut self) {
        self.ca_key_password = None;
    }
}

/// CRL page. Its create form picks a CA pair, so the page caches the
/// available certificate and key names fetched before its list.
pub struct RevocationPage {
    page: ResourcePage<RevocationList>,
    cert_names: RwLock<Vec<String>>,
    key_names: RwLock<Vec<String>>,
}

impl RevocationPage {
    /// Create an empty page.
    #[must_use]
    pub fn new(dispatcher: Arc<CommandDispatcher>) -> Self {
        Self {
            page: ResourcePage::new(dispatcher),
            cert_names: RwLock::new(Vec::new()),
            key_names: RwLock::new(Vec::new()),
        }
    }

    /// Current UI mode.
    pub async fn mode(&self) -> PageMode {
        self.page.mode().await
    }

    /// Snapshot of the local list.
    pub async fn items(&self) -> Vec<RevocationList> {
        self.page.items().await
    }

    /// Snapshot of the pending draft.
    pub async fn draft(&self) -> Option<RevocationList> {
        self.page.draft().await
    }

    /// Edit the pending draft in place.
    pub async fn update_draft(&self, edit: impl FnOnce(&mut RevocationList)) {
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

    /// Remove one revocation list by name.
    pub async fn remove(&self, name: &str) -> CoreResult<()> {
        self.page.remove(name).await
    }

    /// Remove every revocation list.
    pub async fn wipe(&self) -> CoreResult<()> {
        self.page.wipe().await
    }

    /// Replace the local list with the daemon's answer.
    pub async fn list(&self) -> CoreResult<()> {
        self.page.list().await
    }

    /// Names of the available CA certificates.
    pub async fn cert_names(&self) -> Vec<String> {
        self.cert_names.read().await.clone()
    }

    /// Names of the available CA keys.
    pub async fn key_names(&self) -> Vec<String> {
        self.key_names.read().await.clone()
    }

    /// Refresh the certificate-name cache from the daemon.
    pub async fn refresh_cert_names(&self) -> CoreResult<()> {
        let payload = self
            .page
            .dispatcher()
            .execute(Command::ListCertificates)
            .await?;
        let Payload::Certificates(certs) = payload else {
            return Err(CoreError::UnexpectedPayload { action: "ListCRTs" });
        };
        let mut names: Vec<String> = certs.into_iter().map(|crt| crt.name).collect();
        names.sort();
        *self.cert_names.write().await = names;
        Ok(())
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
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_dispatcher;
    use serde_json::json;

    #[tokio::test]
    async fn create_revocation_sends_ca_pair() {
        let (dispatcher, transport) = test_dispatcher();
        let page = RevocationPage::new(dispatcher);
        transport.enqueue("CreateCRL", json!({"name": "crl1"})).await;

        page.toggle_create().await;
        page.update_draft(|draft| {
            draft.name = "crl1".to_string();
            draft.ca_cert_name = "ca".to_string();
            draft.ca_key_name = "cakey".to_string();
        })
        .await;
        page.create().await.unwrap();

        let request = &transport.requests().await[0];
        assert_eq!(request["action"], "CreateCRL");
        assert_eq!(request["cacrt"], "ca");
        assert_eq!(request["cakey"], "cakey");
        assert_eq!(page.items().await[0].name, "crl1");
    }

    #[tokio::test]
    async fn dependency_caches_populate_from_listings() {
        let (dispatcher, transport) = test_dispatcher();
        let page = RevocationPage::new(dispatcher);
        transport
            .enqueue("ListCRTs", json!({"crts": [
                {"name": "crt2", "days": 365, "serial": 2},
                {"name": "crt1", "days": 365, "serial": 1},
            ]}))
            .await;
        transport
            .enqueue("ListKeys", json!({"keys": [
                {"name": "cakey", "type": "RSA", "bits": 4096, "cipher": "AES256"},
            ]}))
            .await;

        page.refresh_cert_names().await.unwrap();
        page.refresh_key_names().await.unwrap();

        assert_eq!(page.cert_names().await, ["crt1", "crt2"]);
        assert_eq!(page.key_names().await, ["cakey"]);
    }
}
