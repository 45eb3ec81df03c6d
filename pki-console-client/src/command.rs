//! Command vocabulary.
//!
//! One variant per action verb the daemon recognizes. A command knows its
//! wire verb, the flat request body it serializes to, and the reply schema
//! it expects back.

use serde_json::{Value, json};

use crate::protocol::Expect;
use crate::types::{CertSigning, Cipher, Digest, KeyAlgorithm, KeySize};

/// A single action-tagged request to the daemon.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// List key-store databases.
    ListDatabases,
    /// Create a key-store database.
    CreateDatabase {
        /// Database name.
        name: String,
        /// Free-form description.
        description: String,
        /// Storage directory on the daemon host.
        home: String,
    },
    /// Remove one key-store database by name.
    RemoveDatabase {
        /// Database name.
        name: String,
    },
    /// Remove every key-store database.
    WipeDatabases,
    /// Switch the active key-store database.
    SwitchDatabase {
        /// Database name.
        name: String,
    },
    /// Update the settings of a key-store database.
    UpdateDatabase {
        /// Database name.
        name: String,
        /// New description.
        description: String,
        /// New storage directory.
        home: String,
    },
    /// Fetch the name of the active key-store database. An empty name in
    /// the reply means no database is active.
    CurrentDatabase,

    /// List private keys.
    ListKeys,
    /// Generate a private key.
    CreateKey {
        /// Key name.
        name: String,
        /// Key algorithm.
        algorithm: KeyAlgorithm,
        /// Key length.
        size: KeySize,
        /// Cipher protecting the key material.
        cipher: Cipher,
        /// Optional password; absent means the key is stored unencrypted.
        password: Option<String>,
    },
    /// Remove one private key by name.
    RemoveKey {
        /// Key name.
        name: String,
    },
    /// Remove every private key.
    WipeKeys,

    /// List certificate signing requests.
    ListRequests,
    /// Generate a signing request from an existing key.
    CreateRequest {
        /// Request name.
        name: String,
        /// Name of the key to sign with.
        key_name: String,
        /// Password for the key, when encrypted.
        key_password: Option<String>,
        /// Distinguished-name subject string.
        subject: String,
        /// Digest used for the request signature.
        digest: Digest,
    },
    /// Remove one signing request by name.
    RemoveRequest {
        /// Request name.
        name: String,
    },
    /// Remove every signing request.
    WipeRequests,

    /// List certificates.
    ListCertificates,
    /// Issue a certificate.
    CreateCertificate {
        /// Certificate name.
        name: String,
        /// Free-form description.
        description: String,
        /// Validity period in days.
        days: u32,
        /// Signing profile (self-signed or CA-issued).
        signing: CertSigning,
    },
    /// Remove one certificate by name.
    RemoveCertificate {
        /// Certificate name.
        name: String,
    },
    /// Remove every certificate.
    WipeCertificates,
    /// Fetch the next certificate serial number.
    GetSerial,

    /// List certificate revocation lists.
    ListRevocations,
    /// Generate a certificate revocation list.
    CreateRevocation {
        /// Revocation list name.
        name: String,
        /// Free-form description.
        description: String,
        /// Validity period in days.
        days: u32,
        /// Name of the CA certificate to sign with.
        ca_cert_name: String,
        /// Name of the CA private key to sign with.
        ca_key_name: String,
        /// Password for the CA key, when encrypted.
        ca_key_password: Option<String>,
    },
    /// Remove one revocation list by name.
    RemoveRevocation {
        /// Revocation list name.
        name: String,
    },
    /// Remove every revocation list.
    WipeRevocations,
    /// Add a certificate to a revocation list.
    AddToRevocation {
        /// Certificate name.
        cert_name: String,
        /// Revocation list name.
        crl_name: String,
    },
    /// Remove a certificate from a revocation list.
    RemoveFromRevocation {
        /// Certificate name.
        cert_name: String,
        /// Revocation list name.
        crl_name: String,
    },
}

impl Command {
    /// Wire verb for the `action` field.
    #[must_use]
    pub fn action(&self) -> &'static str {
        match self {
            Self::ListDatabases => "ListDBs",
            Self::CreateDatabase { .. } => "CreateDB",
            Self::RemoveDatabase { .. } => "RemoveDB",
            Self::WipeDatabases => "WipeDBs",
            Self::SwitchDatabase { .. } => "SwitchDB",
            Self::UpdateDatabase { .. } => "UpdateDB",
            Self::CurrentDatabase => "GetDB",
            Self::ListKeys => "ListKeys",
            Self::CreateKey { .. } => "CreateKey",
            Self::RemoveKey { .. } => "RemoveKey",
            Self::WipeKeys => "WipeKeys",
            Self::ListRequests => "ListCSRs",
            Self::CreateRequest { .. } => "CreateCSR",
            Self::RemoveRequest { .. } => "RemoveCSR",
            Self::WipeRequests => "WipeCSRs",
            Self::ListCertificates => "ListCRTs",
            Self::CreateCertificate { .. } => "CreateCRT",
            Self::RemoveCertificate { .. } => "RemoveCRT",
            Self::WipeCertificates => "WipeCRTs",
            Self::GetSerial => "GetSerial",
            Self::ListRevocations => "ListCRLs",
            Self::CreateRevocation { .. } => "CreateCRL",
            Self::RemoveRevocation { .. } => "RemoveCRL",
            Self::WipeRevocations => "WipeCRLs",
            Self::AddToRevocation { .. } => "AddToCRL",
            Self::RemoveFromRevocation { .. } => "DelFromCRL",
        }
    }

    /// Reply schema this command expects on success.
    #[must_use]
    pub fn expects(&self) -> Expect {
        match self {
            Self::ListDatabases => Expect::Databases,
            Self::ListKeys => Expect::Keys,
            Self::ListRequests => Expect::Requests,
            Self::ListCertificates => Expect::Certificates,
            Self::ListRevocations => Expect::Revocations,
            Self::GetSerial => Expect::Serial,
            Self::CreateKey { .. } => Expect::Data,
            Self::CreateDatabase { .. }
            | Self::SwitchDatabase { .. }
            | Self::UpdateDatabase { .. }
            | Self::CurrentDatabase
            | Self::CreateRequest { .. }
            | Self::CreateCertificate { .. }
            | Self::CreateRevocation { .. }
            | Self::AddToRevocation { .. }
            | Self::RemoveFromRevocation { .. } => Expect::Name,
            Self::RemoveDatabase { .. }
            | Self::RemoveKey { .. }
            | Self::RemoveRequest { .. }
            | Self::RemoveCertificate { .. }
            | Self::RemoveRevocation { .. } => Expect::Removed,
            Self::WipeDatabases
            | Self::WipeKeys
            | Self::WipeRequests
            | Self::WipeCertificates
            | Self::WipeRevocations => Expect::Wiped,
        }
    }

    /// Flat JSON request body, including the `action` field.
    #[must_use]
    pub fn body(&self) -> Value {
        let mut body = match self {
            Self::ListDatabases
            | Self::WipeDatabases
            | Self::CurrentDatabase
            | Self::ListKeys
            | Self::WipeKeys
            | Self::ListRequests
            | Self::WipeRequests
            | Self::ListCertificates
            | Self::WipeCertificates
            | Self::GetSerial
            | Self::ListRevocations
            | Self::WipeRevocations => json!({}),
            Self::RemoveDatabase { name }
            | Self::SwitchDatabase { name }
            | Self::RemoveKey { name }
            | Self::RemoveRequest { name }
            | Self::RemoveCertificate { name }
            | Self::RemoveRevocation { name } => json!({ "name": name }),
            Self::CreateDatabase {
                name,
                description,
                home,
            }
            | Self::UpdateDatabase {
                name,
                description,
                home,
            } => json!({ "name": name, "desc": description, "home": home }),
            Self::CreateKey {
                name,
                algorithm,
                size,
                cipher,
                password,
            } => json!({
                "name": name,
                "type": algorithm,
                "bits": size,
                "cipher": cipher,
                "passwd": password,
            }),
            Self::CreateRequest {
                name,
                key_name,
                key_password,
                subject,
                digest,
            } => json!({
                "name": name,
                "keyname": key_name,
                "passwd": key_password,
                "subject": subject,
                "digest": digest,
            }),
            Self::CreateCertificate {
                name,
                description,
                days,
                signing,
            } => {
                let mut base = json!({ "name": name, "desc": description, "days": days });
                merge_fields(&mut base, signing);
                base
            }
            Self::CreateRevocation {
                name,
                description,
                days,
                ca_cert_name,
                ca_key_name,
                ca_key_password,
            } => json!({
                "name": name,
                "desc": description,
                "days": days,
                "cacrt": ca_cert_name,
                "cakey": ca_key_name,
                "capasswd": ca_key_password,
            }),
            Self::AddToRevocation {
                cert_name,
                crl_name,
            }
            | Self::RemoveFromRevocation {
                cert_name,
                crl_name,
            } => json!({ "crt": cert_name, "crl": crl_name }),
        };

        if let Some(map) = body.as_object_mut() {
            map.insert("action".to_string(), Value::String(self.action().to_string()));
        }
        body
    }
}

/// Flatten a serializable struct's fields into an existing JSON object.
fn merge_fields<T: serde::Serialize>(target: &mut Value, extra: &T) {
    let (Some(map), Ok(Value::Object(fields))) =
        (target.as_object_mut(), serde_json::to_value(extra))
    else {
        return;
    };
    for (key, value) in fields {
        map.insert(key, value);
    }
}
