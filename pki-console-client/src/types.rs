//! Wire-level enumerations and listing records.
//!
//! Every enumerated field the daemon recognizes is a closed serde enum, so an
//! unsupported size/cipher/digest is unrepresentable instead of failing
//! server-side.

use serde::{Deserialize, Serialize};

/// Private-key algorithms the daemon can generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum KeyAlgorithm {
    /// RSA key pair (the only algorithm current deployments support).
    #[default]
    #[serde(rename = "RSA")]
    Rsa,
}

/// Supported key lengths, carried as plain bit counts on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum KeySize {
    /// 1024-bit key.
    Bits1024,
    /// 2048-bit key.
    #[default]
    Bits2048,
    /// 4096-bit key.
    Bits4096,
}

impl KeySize {
    /// Key length in bits.
    #[must_use]
    pub fn bits(self) -> u32 {
        match self {
            Self::Bits1024 => 1024,
            Self::Bits2048 => 2048,
            Self::Bits4096 => 4096,
        }
    }
}

impl TryFrom<u32> for KeySize {
    type Error = String;

    fn try_from(bits: u32) -> std::result::Result<Self, Self::Error> {
        match bits {
            1024 => Ok(Self::Bits1024),
            2048 => Ok(Self::Bits2048),
            4096 => Ok(Self::Bits4096),
            other => Err(format!("unsupported key size: {other}")),
        }
    }
}

impl From<KeySize> for u32 {
    fn from(size: KeySize) -> Self {
        size.bits()
    }
}

/// Symmetric ciphers accepted for key encryption.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Cipher {
    /// Triple DES.
    Des3,
    /// AES with a 128-bit key.
    Aes128,
    /// AES with a 192-bit key.
    Aes192,
    /// AES with a 256-bit key.
    #[default]
    Aes256,
}

/// Digest algorithms accepted for signing requests and certificates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Digest {
    /// MD5 (legacy deployments only).
    Md5,
    /// SHA-1.
    Sha1,
    /// SHA-224.
    Sha224,
    /// SHA-256.
    #[default]
    Sha256,
    /// SHA-384.
    Sha384,
    /// SHA-512.
    Sha512,
}

/// Signing profile for a certificate create request.
///
/// The `template` tag selects exactly one of the two field groups, so a
/// request can never mix self-signing fields with CA issuance fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "template")]
pub enum CertSigning {
    /// Self-sign directly from a private key.
    #[serde(rename = "selfsigned")]
    SelfSigned {
        /// Name of the signing key.
        #[serde(rename = "keyname")]
        key_name: String,
        /// Password for the signing key, when encrypted.
        #[serde(rename = "passwd")]
        key_password: Option<String>,
        /// Distinguished-name subject string.
        subject: String,
        /// Digest used for the signature.
        digest: Digest,
    },
    /// Issue from a pending CSR against a CA certificate/key pair.
    #[serde(rename = "ca")]
    CaSigned {
        /// Name of the CSR to issue from.
        #[serde(rename = "csrname")]
        csr_name: String,
        /// Name of the CA certificate.
        #[serde(rename = "cacrt")]
        ca_cert_name: String,
        /// Name of the CA private key.
        #[serde(rename = "cakey")]
        ca_key_name: String,
        /// Password for the CA key, when encrypted.
        #[serde(rename = "capasswd")]
        ca_key_password: Option<String>,
    },
}

fn default_home() -> String {
    "/".to_string()
}

/// Key-store database record as returned by `ListDBs`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DbEntry {
    /// Database name.
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub desc: String,
    /// Storage directory on the daemon host.
    #[serde(default = "default_home")]
    pub home: String,
}

/// Private-key record as returned by `ListKeys`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEntry {
    /// Key name.
    pub name: String,
    /// Key algorithm.
    #[serde(rename = "type")]
    pub algorithm: KeyAlgorithm,
    /// Key length.
    #[serde(rename = "bits")]
    pub size: KeySize,
    /// Cipher protecting the key material.
    pub cipher: Cipher,
    /// Whether the key material is password-protected.
    #[serde(default)]
    pub encrypted: bool,
}

/// Certificate signing request record as returned by `ListCSRs`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsrEntry {
    /// Request name.
    pub name: String,
    /// Name of the key the request was generated from.
    #[serde(rename = "keyname")]
    pub key_name: String,
    /// Distinguished-name subject string.
    #[serde(default)]
    pub subject: String,
    /// Digest used for the request signature.
    #[serde(default)]
    pub digest: Digest,
}

/// Certificate record as returned by `ListCRTs`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrtEntry {
    /// Certificate name.
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub desc: String,
    /// Validity period in days.
    pub days: u32,
    /// Serial number assigned by the daemon.
    pub serial: u64,
    /// Names of the revocation lists this certificate has been added to.
    #[serde(default)]
    pub crls: Vec<String>,
}

/// Revocation list record as returned by `ListCRLs`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrlEntry {
    /// Revocation list name.
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub desc: String,
    /// Validity period in days.
    pub days: u32,
    /// Name of the CA certificate the list is signed with.
    #[serde(rename = "cacrt")]
    pub ca_cert_name: String,
    /// Name of the CA private key the list is signed with.
    #[serde(rename = "cakey")]
    pub ca_key_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_size_wire_round_trip() {
        let json = serde_json::to_string(&KeySize::Bits4096).unwrap();
        assert_eq!(json, "4096");
        let back: KeySize = serde_json::from_str("1024").unwrap();
        assert_eq!(back, KeySize::Bits1024);
    }

    #[test]
    fn key_size_rejects_unsupported_length() {
        let result: std::result::Result<KeySize, _> = serde_json::from_str("3072");
        assert!(result.is_err());
    }

    #[test]
    fn cipher_and_digest_wire_names() {
        assert_eq!(serde_json::to_string(&Cipher::Des3).unwrap(), "\"DES3\"");
        assert_eq!(serde_json::to_string(&Cipher::Aes256).unwrap(), "\"AES256\"");
        assert_eq!(serde_json::to_string(&Digest::Sha256).unwrap(), "\"SHA256\"");
        let digest: Digest = serde_json::from_str("\"SHA512\"").unwrap();
        assert_eq!(digest, Digest::Sha512);
    }

    #[test]
    fn signing_profile_tags_template() {
        let signing = CertSigning::SelfSigned {
            key_name: "key1".to_string(),
            key_password: None,
            subject: "/CN=test".to_string(),
            digest: Digest::Sha256,
        };
        let value = serde_json::to_value(&signing).unwrap();
        assert_eq!(value["template"], "selfsigned");
        assert_eq!(value["keyname"], "key1");
        assert!(value.get("csrname").is_none());

        let issued = CertSigning::CaSigned {
            csr_name: "csr1".to_string(),
            ca_cert_name: "ca".to_string(),
            ca_key_name: "cakey".to_string(),
            ca_key_password: Some("s3cret".to_string()),
        };
        let value = serde_json::to_value(&issued).unwrap();
        assert_eq!(value["template"], "ca");
        assert_eq!(value["cacrt"], "ca");
        assert!(value.get("keyname").is_none());
    }

    #[test]
    fn db_entry_defaults_missing_fields() {
        let entry: DbEntry = serde_json::from_str(r#"{"name":"db1"}"#).unwrap();
        assert_eq!(entry.desc, "");
        assert_eq!(entry.home, "/");
    }

    #[test]
    fn key_entry_parses_wire_names() {
        let entry: KeyEntry = serde_json::from_str(
            r#"{"name":"key1","type":"RSA","bits":2048,"cipher":"AES256","encrypted":true}"#,
        )
        .unwrap();
        assert_eq!(entry.algorithm, KeyAlgorithm::Rsa);
        assert_eq!(entry.size, KeySize::Bits2048);
        assert!(entry.encrypted);
    }
}
