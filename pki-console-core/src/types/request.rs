//! Certificate signing request record.

use serde::{Deserialize, Serialize};

use pki_console_client::{CsrEntry, Digest};

/// A certificate signing request generated from an existing key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsrRequest {
    /// Request name.
    pub name: String,
    /// Name of the key the request is signed with.
    pub key_name: String,
    /// Password for the key, when encrypted. Draft-only; never returned by
    /// the daemon.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_password: Option<String>,
    /// Distinguished-name subject string.
    pub subject: String,
    /// Digest used for the request signature.
    pub digest: Digest,
}

impl CsrRequest {
    /// Fresh draft with default field values.
    #[must_use]
    pub fn draft() -> Self {
        Self {
            name: "csr".to_string(),
            key_name: String::new(),
            key_password: None,
            subject: String::new(),
            digest: Digest::Sha256,
        }
    }
}

impl From<CsrEntry> for CsrRequest {
    fn from(entry: CsrEntry) -> Self {
        Self {
            name: entry.name,
            key_name: entry.key_name,
            key_password: None,
            subject: entry.subject,
            digest: entry.digest,
        }
    }
}
