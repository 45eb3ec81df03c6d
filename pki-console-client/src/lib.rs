//! # pki-console-client
//!
//! Wire-protocol client for a plcrtd-style PKI daemon: one POST-only JSON
//! endpoint, action-tagged request bodies, and replies that carry either a
//! per-action success field or an `err` index into an ordered error catalog.
//!
//! ## Protocol shape
//!
//! Every request is a flat JSON object with an `action` verb plus the
//! action's parameters. Every delivered reply is decided by a fixed
//! per-action schema — there is no ad hoc key sniffing:
//!
//! | verb family | success field | payload |
//! |---|---|---|
//! | `List*` | `dbs` / `keys` / `csrs` / `crts` / `crls` | entry records |
//! | `Create*`, `SwitchDB`, `UpdateDB`, `GetDB`, `AddToCRL`, `DelFromCRL` | `name` | confirmed name |
//! | `CreateKey` | `data` | generated key material |
//! | `Remove*` | `deleted` | removed name |
//! | `Wipe*` | `deleted` | wiped count |
//! | `GetSerial` | `serial` | next serial |
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pki_console_client::{ApiClient, Command, Payload};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ApiClient::http("http://localhost:2222/plcrtd");
//!
//!     let payload = client.call(&Command::ListDatabases).await?;
//!     if let Payload::Databases(dbs) = payload {
//!         for db in &dbs {
//!             println!("{} ({})", db.name, db.home);
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! All calls return [`Result<T, ClientError>`](ClientError):
//!
//! - [`ClientError::Network`] / [`ClientError::Timeout`] — the request never
//!   produced a usable response; the raw transport text is preserved.
//! - [`ClientError::Api`] — the daemon reported a business error; the
//!   [`ErrorCode`] catalog maps its index to a category label.
//! - [`ClientError::Parse`] — a delivered reply violated the action schema.
//!
//! No call is retried automatically.

mod client;
mod command;
mod error;
mod protocol;
mod transport;
mod types;

pub use client::ApiClient;
pub use command::Command;
pub use error::{ClientError, ErrorCode, Result};
pub use protocol::{Expect, Payload, Reply, parse_reply};
pub use transport::{HttpTransport, Transport};
pub use types::{
    CertSigning, Cipher, CrlEntry, CrtEntry, CsrEntry, DbEntry, Digest, KeyAlgorithm, KeyEntry,
    KeySize,
};
