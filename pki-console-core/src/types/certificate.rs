//! Certificate record.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use pki_console_client::{CertSigning, CrtEntry, Digest};

/// A certificate issued by the daemon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Certificate {
    /// Certificate name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Validity period in days.
    pub days: u32,
    /// Serial number. Advisory on the client: a draft snapshots the serial
    /// observed right before creation, listings carry the daemon's value.
    pub serial: Option<u64>,
    /// Signing profile. Populated on drafts; the daemon does not return it
    /// for listed certificates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signing: Option<CertSigning>,
    /// Names of the revocation lists this certificate has been added to.
    #[serde(default)]
    pub in_crl: BTreeSet<String>,
}

impl Certificate {
    /// Fresh draft with default field values.
    #[must_use]
    pub fn draft() -> Self {
        Self {
            name: "crt".to_string(),
            description: String::new(),
            days: 365,
            serial: None,
            signing: Some(Self::default_signing()),
            in_crl: BTreeSet::new(),
        }
    }

    /// Default signing profile for a fresh draft.
    #[must_use]
    pub fn default_signing() -> CertSigning {
        CertSigning::SelfSigned {
            key_name: String::new(),
            key_password: None,
            subject: String::new(),
            digest: Digest::Sha256,
        }
    }
}

impl From<CrtEntry> for Certificate {
    fn from(entry: CrtEntry) -> Self {
        Self {
            name: entry.name,
            description: entry.desc,
            days: entry.days,
            serial: Some(entry.serial),
            signing: None,
            in_crl: entry.crls.into_iter().collect(),
        }
    }
}
