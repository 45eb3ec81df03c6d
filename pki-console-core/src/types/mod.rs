//! Resource record types.

mod certificate;
mod database;
mod private_key;
mod request;
mod revocation;

pub use certificate::Certificate;
pub use database::Database;
pub use private_key::PrivateKey;
pub use request::CsrRequest;
pub use revocation::RevocationList;

// Re-export the client library's wire types
pub use pki_console_client::{
    CertSigning, Cipher, CrlEntry, CrtEntry, CsrEntry, DbEntry, Digest, KeyAlgorithm, KeyEntry,
    KeySize,
};
