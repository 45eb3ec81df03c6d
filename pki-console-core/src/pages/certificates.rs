//! Certificate page.
//!
//! Layers three relationships on top of the generic page: the advisory
//! next-serial counter, membership in revocation lists, and the
//! revoke/restore detail forms. Also caches the key/CSR/CRL name lists the
//! create form depends on.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use tokio::sync::RwLock;

use pki_console_client::{Command, Payload};

use crate::dispatcher::CommandDispatcher;
use crate::error::{CoreError, CoreResult};
use crate::pages::page::{PageMode, PageResource, ResourcePage};
use crate::types::Certificate;

impl PageResource for Certificate {
    const KIND: &'static str = "certificate";

    fn name(&self) -> &str {
        &self.name
    }

    fn draft() -> Self {
        Self::draft()
    }

    fn list_command() -> Command {
        Command::ListCertificates
    }

    fn create_command(&self) -> Command {
        Command::CreateCertificate {
            name: self.name.clone(),
            description: self.description.clone(),
            days: self.days,
            signing: self
                .signing
                .clone()
                .unwrap_or_else(Certificate::default_signing),
        }
    }

    fn remove_command(name: &str) -> Command {
        Command::RemoveCertificate {
            name: name.to_string(),
        }
    }

    fn wipe_command() -> Command {
        Command::WipeCertificates
    }

    fn from_payload(payload: Payload) -> Option<Vec<Self>> {
        match payload {
            Payload::Certificates(entries) => Some(entries.into_iter().map(Into::into).collect()),
            _ => None,
        }
    }
}

/// Single-certificate detail form state. `Revoking` and `Restoring` are
/// mutually exclusive with each other and with the page's create/wipe
/// forms; opening one cancels the other first.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub enum DetailMode {
    /// No detail form is open.
    #[default]
    Hidden,
    /// The revoke form is open for the named certificate.
    Revoking(String),
    /// The undo-revoke form is open for the named certificate.
    Restoring(String),
}

/// Certificate page with serial tracking and CRL membership.
pub struct CertificatePage {
    page: ResourcePage<Certificate>,
    detail: RwLock<DetailMode>,
    next_serial: AtomicU64,
    key_names: RwLock<Vec<String>>,
    csr_names: RwLock<Vec<String>>,
    crl_names: RwLock<Vec<String>>,
}

impl CertificatePage {
    /// Create an empty page.
    #[must_use]
    pub fn new(dispatcher: Arc<CommandDispatcher>) -> Self {
        Self {
            page: ResourcePage::new(dispatcher),
            detail: RwLock::new(DetailMode::Hidden),
            next_serial: AtomicU64::new(0),
            key_names: RwLock::new(Vec::new()),
            csr_names: RwLock::new(Vec::new()),
            crl_names: RwLock::new(Vec::new()),
        }
    }

    /// Current UI mode.
    pub async fn mode(&self) -> PageMode {
        self.page.mode().await
    }

    /// Snapshot of the local list.
    pub async fn items(&self) -> Vec<Certificate> {
        self.page.items().await
    }

    /// Snapshot of the pending draft.
    pub async fn draft(&self) -> Option<Certificate> {
        self.page.draft().await
    }

    /// Edit the pending draft in place.
    pub async fn update_draft(&self, edit: impl FnOnce(&mut Certificate)) {
        self.page.update_draft(edit).await;
    }

    /// Flip the create form, closing any open detail form first.
    pub async fn toggle_create(&self) {
        *self.detail.write().await = DetailMode::Hidden;
        self.page.toggle_create().await;
    }

    /// Flip the wipe confirmation, closing any open detail form first.
    pub async fn toggle_wipe(&self) {
        *self.detail.write().await = DetailMode::Hidden;
        self.page.toggle_wipe().await;
    }

    /// Force `Table` mode and close the detail form.
    pub async fn reset(&self) {
        self.page.reset().await;
        *self.detail.write().await = DetailMode::Hidden;
    }

    /// Current detail form state.
    pub async fn detail(&self) -> DetailMode {
        self.detail.read().await.clone()
    }

    /// Flip the revoke form for one certificate, cancelling an open
    /// create/wipe form or restore form first.
    pub async fn toggle_revoke(&self, name: &str) {
        let already_open = matches!(&*self.detail.read().await,
            DetailMode::Revoking(open) if open == name);
        if already_open {
            *self.detail.write().await = DetailMode::Hidden;
        } else {
            self.page.reset().await;
            *self.detail.write().await = DetailMode::Revoking(name.to_string());
        }
    }

    /// Flip the undo-revoke form for one certificate; same cancellation
    /// rule as [`Self::toggle_revoke`].
    pub async fn toggle_restore(&self, name: &str) {
        let already_open = matches!(&*self.detail.read().await,
            DetailMode::Restoring(open) if open == name);
        if already_open {
            *self.detail.write().await = DetailMode::Hidden;
        } else {
            self.page.reset().await;
            *self.detail.write().await = DetailMode::Restoring(name.to_string());
        }
    }

    /// Submit the pending draft.
    ///
    /// The draft snapshots the serial observed right before creation; after
    /// the daemon confirms, the advisory counter is fetched again.
    pub async fn create(&self) -> CoreResult<()> {
        let serial = self.next_serial.load(Ordering::SeqCst);
        self.page
            .update_draft(|draft| draft.serial = Some(serial))
            .await;
        self.page.create().await?;
        self.refresh_serial_after_mutation().await;
        Ok(())
    }

    /// Remove one certificate by name, then refresh the advisory serial.
    pub async fn remove(&self, name: &str) -> CoreResult<()> {
        self.page.remove(name).await?;
        self.refresh_serial_after_mutation().await;
        Ok(())
    }

    /// Remove every certificate, then refresh the advisory serial.
    pub async fn wipe(&self) -> CoreResult<()> {
        self.page.wipe().await?;
        self.refresh_serial_after_mutation().await;
        Ok(())
    }

    /// Replace the local list with the daemon's answer.
    pub async fn list(&self) -> CoreResult<()> {
        self.page.list().await
    }

    /// Advisory next serial number.
    #[must_use]
    pub fn next_serial(&self) -> u64 {
        self.next_serial.load(Ordering::SeqCst)
    }

    /// Fetch the advisory serial counter from the daemon.
    pub async fn refresh_serial(&self) -> CoreResult<()> {
        let payload = self.page.dispatcher().execute(Command::GetSerial).await?;
        let Payload::Serial(serial) = payload else {
            return Err(CoreError::UnexpectedPayload { action: "GetSerial" });
        };
        self.next_serial.store(serial, Ordering::SeqCst);
        Ok(())
    }

    /// A failed follow-up fetch never undoes the confirmed mutation; it is
    /// logged and left in the shared error banner.
    async fn refresh_serial_after_mutation(&self) {
        if let Err(err) = self.refresh_serial().await {
            log::warn!("serial refresh after mutation failed: {err}");
        }
    }

    /// Add a certificate to a revocation list. The membership set is only
    /// touched after the daemon confirms.
    pub async fn add_to_crl(&self, cert_name: &str, crl_name: &str) -> CoreResult<()> {
        self.page
            .dispatcher()
            .execute(Command::AddToRevocation {
                cert_name: cert_name.to_string(),
                crl_name: crl_name.to_string(),
            })
            .await?;
        log::info!("certificate `{cert_name}` added to CRL `{crl_name}`");

        self.page
            .mutate_items(|items| {
                if let Some(crt) = items.iter_mut().find(|crt| crt.name == cert_name) {
                    crt.in_crl.insert(crl_name.to_string());
                }
            })
            .await;
        Ok(())
    }

    /// Remove a certificate from a revocation list.
    pub async fn remove_from_crl(&self, cert_name: &str, crl_name: &str) -> CoreResult<()> {
        self.page
            .dispatcher()
            .execute(Command::RemoveFromRevocation {
                cert_name: cert_name.to_string(),
                crl_name: crl_name.to_string(),
            })
            .await?;
        log::info!("certificate `{cert_name}` removed from CRL `{crl_name}`");

        self.page
            .mutate_items(|items| {
                if let Some(crt) = items.iter_mut().find(|crt| crt.name == cert_name) {
                    crt.in_crl.remove(crl_name);
                }
            })
            .await;
        Ok(())
    }

    /// Names of the available signing keys.
    pub async fn key_names(&self) -> Vec<String> {
        self.key_names.read().await.clone()
    }

    /// Names of the pending signing requests.
    pub async fn csr_names(&self) -> Vec<String> {
        self.csr_names.read().await.clone()
    }

    /// Names of the available revocation lists.
    pub async fn crl_names(&self) -> Vec<String> {
        self.crl_names.read().await.clone()
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

    /// Refresh the CSR-name cache from the daemon.
    pub async fn refresh_csr_names(&self) -> CoreResult<()> {
        let payload = self.page.dispatcher().execute(Command::ListRequests).await?;
        let Payload::Requests(csrs) = payload else {
            return Err(CoreError::UnexpectedPayload { action: "ListCSRs" });
        };
        let mut names: Vec<String> = csrs.into_iter().map(|csr| csr.name).collect();
        names.sort();
        *self.csr_names.write().await = names;
        Ok(())
    }

    /// Refresh the CRL-name cache from the daemon.
    pub async fn refresh_crl_names(&self) -> CoreResult<()> {
        let payload = self
            .page
            .dispatcher()
            .execute(Command::ListRevocations)
            .await?;
        let Payload::Revocations(crls) = payload else {
            return Err(CoreError::UnexpectedPayload { action: "ListCRLs" });
        };
        let mut names: Vec<String> = crls.into_iter().map(|crl| crl.name).collect();
        names.sort();
        *self.crl_names.write().await = names;
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
    use crate::types::CertSigning;
    use serde_json::json;

    fn crt_page() -> (CertificatePage, Arc<crate::test_utils::MockTransport>) {
        let (dispatcher, transport) = test_dispatcher();
        (CertificatePage::new(dispatcher), transport)
    }

    #[tokio::test]
    async fn created_certificate_snapshots_the_serial() {
        let (page, transport) = crt_page();
        transport.enqueue("GetSerial", json!({"serial": 7})).await;
        page.refresh_serial().await.unwrap();

        transport.enqueue("CreateCRT", json!({"name": "crt1"})).await;
        transport.enqueue("GetSerial", json!({"serial": 8})).await;

        page.toggle_create().await;
        page.update_draft(|draft| draft.name = "crt1".to_string()).await;
        page.create().await.unwrap();

        let items = page.items().await;
        assert_eq!(items[0].serial, Some(7));
        // The advisory counter moved on to the daemon's fresh value
        assert_eq!(page.next_serial(), 8);
    }

    #[tokio::test]
    async fn serial_is_refetched_after_remove_and_wipe() {
        let (page, transport) = crt_page();
        transport
            .enqueue("ListCRTs", json!({"crts": [
                {"name": "crt1", "days": 365, "serial": 1},
                {"name": "crt2", "days": 365, "serial": 2},
            ]}))
            .await;
        page.list().await.unwrap();

        transport.enqueue("RemoveCRT", json!({"deleted": "crt1"})).await;
        transport.enqueue("GetSerial", json!({"serial": 3})).await;
        page.remove("crt1").await.unwrap();
        assert_eq!(page.next_serial(), 3);

        transport.enqueue("WipeCRTs", json!({"deleted": 1})).await;
        transport.enqueue("GetSerial", json!({"serial": 1})).await;
        page.toggle_wipe().await;
        page.wipe().await.unwrap();
        assert_eq!(page.next_serial(), 1);
        assert!(page.items().await.is_empty());
    }

    #[tokio::test]
    async fn failed_serial_follow_up_keeps_the_mutation() {
        let (page, transport) = crt_page();
        transport.enqueue("CreateCRT", json!({"name": "crt1"})).await;
        transport.fail_transport("GetSerial", "connection refused").await;

        page.toggle_create().await;
        page.update_draft(|draft| draft.name = "crt1".to_string()).await;
        page.create().await.unwrap();

        assert_eq!(page.items().await.len(), 1);
        assert_eq!(page.mode().await, PageMode::Table);
        let banner = page.dispatcher().error().await.unwrap();
        assert_eq!(banner.message, "connection refused");
    }

    #[tokio::test]
    async fn crl_membership_round_trip() {
        let (page, transport) = crt_page();
        transport
            .enqueue("ListCRTs", json!({"crts": [
                {"name": "crt1", "days": 365, "serial": 1},
            ]}))
            .await;
        page.list().await.unwrap();

        transport.enqueue("AddToCRL", json!({"name": "crt1"})).await;
        page.add_to_crl("crt1", "crl1").await.unwrap();
        assert!(page.items().await[0].in_crl.contains("crl1"));

        transport.enqueue("DelFromCRL", json!({"name": "crt1"})).await;
        page.remove_from_crl("crt1", "crl1").await.unwrap();
        assert!(!page.items().await[0].in_crl.contains("crl1"));
    }

    #[tokio::test]
    async fn failed_membership_change_leaves_the_set() {
        let (page, transport) = crt_page();
        transport
            .enqueue("ListCRTs", json!({"crts": [
                {"name": "crt1", "days": 365, "serial": 1, "crls": ["crl1"]},
            ]}))
            .await;
        page.list().await.unwrap();

        transport
            .enqueue("DelFromCRL", json!({"err": 6, "msg": "crl1"}))
            .await;
        assert!(page.remove_from_crl("crt1", "crl1").await.is_err());
        assert!(page.items().await[0].in_crl.contains("crl1"));
    }

    #[tokio::test]
    async fn detail_forms_cancel_each_other_and_the_create_form() {
        let (page, _transport) = crt_page();

        page.toggle_create().await;
        assert_eq!(page.mode().await, PageMode::Creating);

        // Opening the revoke form cancels the create form
        page.toggle_revoke("crt1").await;
        assert_eq!(page.mode().await, PageMode::Table);
        assert_eq!(page.detail().await, DetailMode::Revoking("crt1".to_string()));

        // Opening the restore form cancels the revoke form
        page.toggle_restore("crt1").await;
        assert_eq!(page.detail().await, DetailMode::Restoring("crt1".to_string()));

        // Opening the create form closes the detail form
        page.toggle_create().await;
        assert_eq!(page.detail().await, DetailMode::Hidden);
        assert_eq!(page.mode().await, PageMode::Creating);

        // Toggling the same form twice closes it
        page.toggle_revoke("crt1").await;
        page.toggle_revoke("crt1").await;
        assert_eq!(page.detail().await, DetailMode::Hidden);
    }

    #[tokio::test]
    async fn ca_signed_draft_issues_from_a_csr() {
        let (page, transport) = crt_page();
        transport.enqueue("CreateCRT", json!({"name": "crt1"})).await;
        transport.enqueue("GetSerial", json!({"serial": 2})).await;

        page.toggle_create().await;
        page.update_draft(|draft| {
            draft.name = "crt1".to_string();
            draft.signing = Some(CertSigning::CaSigned {
                csr_name: "csr1".to_string(),
                ca_cert_name: "ca".to_string(),
                ca_key_name: "cakey".to_string(),
                ca_key_password: None,
            });
        })
        .await;
        page.create().await.unwrap();

        let request = &transport.requests().await[0];
        assert_eq!(request["template"], "ca");
        assert_eq!(request["csrname"], "csr1");
        assert!(request.get("keyname").is_none());
    }
}
