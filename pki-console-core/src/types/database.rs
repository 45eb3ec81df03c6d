//! Key-store database record.

use serde::{Deserialize, Serialize};

use pki_console_client::DbEntry;

/// A key-store database managed by the daemon.
///
/// `is_active` is a local projection of the daemon's single active-database
/// pointer; it is only flipped after the daemon confirms a switch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Database {
    /// Database name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Storage directory on the daemon host.
    pub home: String,
    /// Whether this is the active database.
    #[serde(default)]
    pub is_active: bool,
}

impl Database {
    /// Fresh draft with default field values.
    #[must_use]
    pub fn draft() -> Self {
        Self {
            name: "db".to_string(),
            description: String::new(),
            home: "/".to_string(),
            is_active: false,
        }
    }
}

impl From<DbEntry> for Database {
    fn from(entry: DbEntry) -> Self {
        Self {
            name: entry.name,
            description: entry.desc,
            home: entry.home,
            is_active: false,
        }
    }
}
