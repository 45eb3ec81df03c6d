//! Navigation orchestration.
//!
//! Maps a requested view token to the active view and the refresh sequence
//! that populates it. Entering any view performs one reset pass — clear the
//! error banner, force every page back to `Table` — before the
//! page-specific fetches run.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;

use pki_console_client::Transport;

use crate::dispatcher::CommandDispatcher;
use crate::error::CoreResult;
use crate::pages::{CertificatePage, DatabasePage, KeyPage, RequestPage, RevocationPage};

/// Top-level views, one per hash-route token. Exactly one is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    /// Landing page; no fetches.
    #[default]
    About,
    /// Key-store database management.
    Configure,
    /// Private-key management.
    PrivateKeys,
    /// Certificate signing request management.
    Requests,
    /// Certificate management.
    Certificates,
    /// Revocation list management.
    Revoked,
}

impl View {
    /// Parse a hash-route token. Unknown tokens yield `None`; callers
    /// redirect to the default view.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "about" => Some(Self::About),
            "configure" => Some(Self::Configure),
            "privatekeys" => Some(Self::PrivateKeys),
            "requests" => Some(Self::Requests),
            "certificates" => Some(Self::Certificates),
            "revoked" => Some(Self::Revoked),
            _ => None,
        }
    }

    /// Hash-route token for this view.
    #[must_use]
    pub fn token(self) -> &'static str {
        match self {
            Self::About => "about",
            Self::Configure => "configure",
            Self::PrivateKeys => "privatekeys",
            Self::Requests => "requests",
            Self::Certificates => "certificates",
            Self::Revoked => "revoked",
        }
    }
}

/// Owns every resource page and routes view changes to their refreshes.
pub struct Navigator {
    dispatcher: Arc<CommandDispatcher>,
    /// Key-store database page.
    pub databases: DatabasePage,
    /// Private-key page.
    pub keys: KeyPage,
    /// Signing-request page.
    pub requests: RequestPage,
    /// Certificate page.
    pub certificates: CertificatePage,
    /// Revocation-list page.
    pub revocations: RevocationPage,
    active: RwLock<View>,
}

impl Navigator {
    /// Create a navigator with empty pages over a shared dispatcher.
    #[must_use]
    pub fn new(dispatcher: Arc<CommandDispatcher>) -> Self {
        Self {
            databases: DatabasePage::new(dispatcher.clone()),
            keys: KeyPage::new(dispatcher.clone()),
            requests: RequestPage::new(dispatcher.clone()),
            certificates: CertificatePage::new(dispatcher.clone()),
            revocations: RevocationPage::new(dispatcher.clone()),
            dispatcher,
            active: RwLock::new(View::About),
        }
    }

    /// Convenience constructor over any transport.
    #[must_use]
    pub fn from_transport(transport: Arc<dyn Transport>) -> Self {
        Self::new(Arc::new(CommandDispatcher::from_transport(transport)))
    }

    /// The shared dispatcher (busy indicator, error banner).
    #[must_use]
    pub fn dispatcher(&self) -> &Arc<CommandDispatcher> {
        &self.dispatcher
    }

    /// Currently active view.
    pub async fn active_view(&self) -> View {
        *self.active.read().await
    }

    /// Resolve a hash-route token and open the view it names; unknown or
    /// empty tokens redirect to the default view.
    pub async fn navigate(&self, token: &str) -> CoreResult<View> {
        let view = View::from_token(token).unwrap_or_default();
        self.open(view).await?;
        Ok(view)
    }

    /// Open a view: reset all page state, then run the view's refresh
    /// sequence. Dependent name lists complete before the view's own list
    /// fetch is issued.
    pub async fn open(&self, view: View) -> CoreResult<()> {
        self.reset_all().await;
        *self.active.write().await = view;

        match view {
            View::About => {}
            View::Configure => self.databases.refresh().await?,
            View::PrivateKeys => self.keys.list().await?,
            View::Requests => {
                self.requests.refresh_key_names().await?;
                self.requests.list().await?;
            }
            View::Certificates => {
                futures::try_join!(
                    self.certificates.refresh_key_names(),
                    self.certificates.refresh_csr_names(),
                    self.certificates.refresh_crl_names(),
                    self.certificates.refresh_serial(),
                )?;
                self.certificates.list().await?;
            }
            View::Revoked => {
                futures::try_join!(
                    self.revocations.refresh_cert_names(),
                    self.revocations.refresh_key_names(),
                )?;
                self.revocations.list().await?;
            }
        }
        Ok(())
    }

    /// One reset pass over everything navigation owns: the error banner,
    /// every page's mode and draft, and the certificate detail form.
    async fn reset_all(&self) {
        self.dispatcher.clear_error().await;
        self.databases.reset().await;
        self.keys.reset().await;
        self.requests.reset().await;
        self.certificates.reset().await;
        self.revocations.reset().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pages::PageMode;
    use crate::test_utils::test_navigator;
    use serde_json::json;

    #[tokio::test]
    async fn unknown_token_redirects_to_about() {
        let (navigator, transport) = test_navigator();
        let view = navigator.navigate("nonsense").await.unwrap();
        assert_eq!(view, View::About);
        assert_eq!(navigator.active_view().await, View::About);
        // The About view triggers no fetches
        assert!(transport.requests().await.is_empty());
    }

    #[tokio::test]
    async fn empty_token_redirects_to_about() {
        let (navigator, _transport) = test_navigator();
        assert_eq!(navigator.navigate("").await.unwrap(), View::About);
    }

    #[tokio::test]
    async fn token_round_trip() {
        for view in [
            View::About,
            View::Configure,
            View::PrivateKeys,
            View::Requests,
            View::Certificates,
            View::Revoked,
        ] {
            assert_eq!(View::from_token(view.token()), Some(view));
        }
    }

    #[tokio::test]
    async fn certificates_view_prefetches_before_listing() {
        let (navigator, transport) = test_navigator();
        transport
            .enqueue("ListKeys", json!({"keys": [
                {"name": "key1", "type": "RSA", "bits": 2048, "cipher": "AES256"},
            ]}))
            .await;
        transport
            .enqueue("ListCSRs", json!({"csrs": [{"name": "csr1", "keyname": "key1"}]}))
            .await;
        transport
            .enqueue("ListCRLs", json!({"crls": [
                {"name": "crl1", "days": 30, "cacrt": "ca", "cakey": "cakey"},
            ]}))
            .await;
        transport.enqueue("GetSerial", json!({"serial": 5})).await;
        transport
            .enqueue("ListCRTs", json!({"crts": [
                {"name": "crt1", "days": 365, "serial": 1},
            ]}))
            .await;

        navigator.open(View::Certificates).await.unwrap();

        let actions = transport.actions().await;
        assert_eq!(actions.len(), 5);
        assert_eq!(actions[4], "ListCRTs");
        let mut prefetches = actions[..4].to_vec();
        prefetches.sort();
        assert_eq!(prefetches, ["GetSerial", "ListCRLs", "ListCSRs", "ListKeys"]);

        // All four dependencies are populated before the list render
        assert_eq!(navigator.certificates.key_names().await, ["key1"]);
        assert_eq!(navigator.certificates.csr_names().await, ["csr1"]);
        assert_eq!(navigator.certificates.crl_names().await, ["crl1"]);
        assert_eq!(navigator.certificates.next_serial(), 5);
        assert_eq!(navigator.certificates.items().await.len(), 1);
    }

    #[tokio::test]
    async fn requests_view_fetches_key_names_before_its_list() {
        let (navigator, transport) = test_navigator();
        transport
            .enqueue("ListKeys", json!({"keys": [
                {"name": "key1", "type": "RSA", "bits": 2048, "cipher": "AES256"},
            ]}))
            .await;
        transport
            .enqueue("ListCSRs", json!({"csrs": [{"name": "csr1", "keyname": "key1"}]}))
            .await;

        navigator.open(View::Requests).await.unwrap();

        assert_eq!(transport.actions().await, ["ListKeys", "ListCSRs"]);
        assert_eq!(navigator.requests.key_names().await, ["key1"]);
    }

    #[tokio::test]
    async fn revoked_view_fetches_cert_and_key_names_before_its_list() {
        let (navigator, transport) = test_navigator();
        transport
            .enqueue("ListCRTs", json!({"crts": [
                {"name": "crt1", "days": 365, "serial": 1},
            ]}))
            .await;
        transport
            .enqueue("ListKeys", json!({"keys": [
                {"name": "cakey", "type": "RSA", "bits": 4096, "cipher": "AES256"},
            ]}))
            .await;
        transport
            .enqueue("ListCRLs", json!({"crls": [
                {"name": "crl1", "days": 30, "cacrt": "ca", "cakey": "cakey"},
            ]}))
            .await;

        navigator.open(View::Revoked).await.unwrap();

        let actions = transport.actions().await;
        assert_eq!(actions[2], "ListCRLs");
        let mut prefetches = actions[..2].to_vec();
        prefetches.sort();
        assert_eq!(prefetches, ["ListCRTs", "ListKeys"]);
        assert_eq!(navigator.revocations.items().await.len(), 1);
    }

    #[tokio::test]
    async fn configure_view_runs_the_paired_database_refresh() {
        let (navigator, transport) = test_navigator();
        transport
            .enqueue("ListDBs", json!({"dbs": [{"name": "db1"}]}))
            .await;
        transport.enqueue("GetDB", json!({"name": "db1"})).await;

        navigator.open(View::Configure).await.unwrap();

        assert_eq!(transport.actions().await, ["ListDBs", "GetDB"]);
        assert!(navigator.databases.items().await[0].is_active);
    }

    #[tokio::test]
    async fn navigation_clears_error_and_forces_table_everywhere() {
        let (navigator, transport) = test_navigator();

        // Leave a failed create and open forms behind
        transport.enqueue("CreateKey", json!({"err": 5})).await;
        navigator.keys.toggle_create().await;
        assert!(navigator.keys.create().await.is_err());
        navigator.certificates.toggle_revoke("crt1").await;
        navigator.databases.toggle_wipe().await;
        assert!(navigator.dispatcher().error().await.is_some());

        navigator.open(View::About).await.unwrap();

        assert!(navigator.dispatcher().error().await.is_none());
        assert_eq!(navigator.keys.mode().await, PageMode::Table);
        assert!(navigator.keys.draft().await.is_none());
        assert_eq!(navigator.databases.mode().await, PageMode::Table);
        assert_eq!(
            navigator.certificates.detail().await,
            crate::pages::DetailMode::Hidden
        );
    }

    #[tokio::test]
    async fn failed_prefetch_aborts_the_view_list_fetch() {
        let (navigator, transport) = test_navigator();
        transport.fail_transport("ListKeys", "connection refused").await;
        transport
            .enqueue("ListCSRs", json!({"csrs": []}))
            .await;

        let result = navigator.open(View::Requests).await;
        assert!(result.is_err());
        // The CSR list fetch never ran
        assert_eq!(transport.actions().await, ["ListKeys"]);
    }
}
