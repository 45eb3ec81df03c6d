//! Private-key record.

use serde::{Deserialize, Serialize};

use pki_console_client::{Cipher, KeyAlgorithm, KeyEntry, KeySize};

/// A private key held by the daemon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivateKey {
    /// Key name.
    pub name: String,
    /// Key algorithm.
    pub algorithm: KeyAlgorithm,
    /// Key length.
    pub size: KeySize,
    /// Cipher protecting the key material.
    pub cipher: Cipher,
    /// Password entered on the draft form; blanked once the daemon confirms
    /// the key, after which `encrypted` is the surviving signal.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Whether the key material is password-protected.
    #[serde(default)]
    pub encrypted: bool,
}

impl PrivateKey {
    /// Fresh draft with default field values.
    #[must_use]
    pub fn draft() -> Self {
        Self {
            name: "key".to_string(),
            algorithm: KeyAlgorithm::Rsa,
            size: KeySize::Bits2048,
            cipher: Cipher::Aes256,
            password: None,
            encrypted: false,
        }
    }

    /// Whether the draft carries a non-empty password.
    #[must_use]
    pub fn has_password(&self) -> bool {
        self.password.as_deref().is_some_and(|p| !p.is_empty())
    }
}

impl From<KeyEntry> for PrivateKey {
    fn from(entry: KeyEntry) -> Self {
        Self {
            name: entry.name,
            algorithm: entry.algorithm,
            size: entry.size,
            cipher: entry.cipher,
            password: None,
            encrypted: entry.encrypted,
        }
    }
}
