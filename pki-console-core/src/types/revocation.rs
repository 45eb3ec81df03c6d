//! Certificate revocation list record.

use serde::{Deserialize, Serialize};

use pki_console_client::CrlEntry;

/// A certificate revocation list signed by a CA pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevocationList {
    /// Revocation list name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Validity period in days.
    pub days: u32,
    /// Name of the CA certificate the list is signed with.
    pub ca_cert_name: String,
    /// Name of the CA private key the list is signed with.
    pub ca_key_name: String,
    /// Password for the CA key, when encrypted. Draft-only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ca_key_password: Option<String>,
}

impl RevocationList {
    /// Fresh draft with default field values.
    #[must_use]
    pub fn draft() -> Self {
        Self {
            name: "crl".to_string(),
            description: String::new(),
            days: 365,
            ca_cert_name: String::new(),
            ca_key_name: String::new(),
            ca_key_password: None,
        }
    }
}

impl From<CrlEntry> for RevocationList {
    fn from(entry: CrlEntry) -> Self {
        Self {
            name: entry.name,
            description: entry.desc,
            days: entry.days,
            ca_cert_name: entry.ca_cert_name,
            ca_key_name: entry.ca_key_name,
            ca_key_password: None,
        }
    }
}
