//! Error catalog and client error type.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Server-side error catalog.
///
/// The daemon reports business failures as a small integer index into this
/// ordered catalog. The catalog is append-only: new deployments may grow it,
/// so an index past the end degrades to [`ErrorCode::InternalError`] instead
/// of failing the parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Index 0 — the daemon could not reach its own backend.
    ConnectionError,
    /// Index 1 — malformed or incomplete request body.
    BadRequest,
    /// Index 2 — the action verb is not supported by this deployment.
    NotImplemented,
    /// Index 3 — unexpected server-side failure.
    InternalError,
    /// Index 4 — the supplied resource name is empty or malformed.
    InvalidName,
    /// Index 5 — a resource with this name already exists.
    AlreadyExists,
    /// Index 6 — no resource with this name exists.
    NotFound,
    /// Index 7 — a required dependent resource is missing (e.g. no active
    /// key-store database).
    MissingDependency,
}

impl ErrorCode {
    /// Resolve a wire error index to a catalog entry.
    ///
    /// Out-of-range indices fail the same way as an internal server error.
    #[must_use]
    pub fn from_index(index: u64) -> Self {
        match index {
            0 => Self::ConnectionError,
            1 => Self::BadRequest,
            2 => Self::NotImplemented,
            3 => Self::InternalError,
            4 => Self::InvalidName,
            5 => Self::AlreadyExists,
            6 => Self::NotFound,
            7 => Self::MissingDependency,
            _ => Self::InternalError,
        }
    }

    /// Position of this entry in the wire catalog.
    #[must_use]
    pub fn index(self) -> u64 {
        match self {
            Self::ConnectionError => 0,
            Self::BadRequest => 1,
            Self::NotImplemented => 2,
            Self::InternalError => 3,
            Self::InvalidName => 4,
            Self::AlreadyExists => 5,
            Self::NotFound => 6,
            Self::MissingDependency => 7,
        }
    }

    /// Operator-facing category label.
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::ConnectionError => "Connection error",
            Self::BadRequest => "Bad request",
            Self::NotImplemented => "Not implemented",
            Self::InternalError => "Internal error",
            Self::InvalidName => "Invalid name",
            Self::AlreadyExists => "Duplicate entry",
            Self::NotFound => "Entry not found",
            Self::MissingDependency => "Missing dependency",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// Client layer error type.
#[derive(Error, Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClientError {
    /// The request never produced a response (connection refused, DNS
    /// failure, broken pipe). Carries the raw transport error text.
    #[error("{detail}")]
    Network {
        /// Transport error details.
        detail: String,
    },

    /// The request timed out waiting for the daemon.
    #[error("request timed out: {detail}")]
    Timeout {
        /// Transport error details.
        detail: String,
    },

    /// A response arrived but did not match the action's reply schema.
    #[error("malformed reply: {detail}")]
    Parse {
        /// What failed to parse.
        detail: String,
    },

    /// The daemon answered with a business error from the catalog.
    #[error("{code}{}", .detail.as_deref().map(|d| format!(": {d}")).unwrap_or_default())]
    Api {
        /// Catalog entry reported by the daemon.
        code: ErrorCode,
        /// Optional human-readable detail (`msg` field).
        detail: Option<String>,
    },
}

impl ClientError {
    /// Whether this failure is expected operator-facing behavior (bad input,
    /// missing resource) rather than a fault. `true` should log at `warn`,
    /// `false` at `error`. Update when adding variants.
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::Api { code, .. } => matches!(
                code,
                ErrorCode::BadRequest
                    | ErrorCode::InvalidName
                    | ErrorCode::AlreadyExists
                    | ErrorCode::NotFound
                    | ErrorCode::MissingDependency
            ),
            Self::Network { .. } | Self::Timeout { .. } | Self::Parse { .. } => false,
        }
    }

    /// Whether the failure happened below the protocol (no usable response).
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::Timeout { .. })
    }
}

/// Client layer Result type alias.
pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_round_trip() {
        for index in 0..8 {
            assert_eq!(ErrorCode::from_index(index).index(), index);
        }
    }

    #[test]
    fn out_of_range_index_is_internal_error() {
        assert_eq!(ErrorCode::from_index(8), ErrorCode::InternalError);
        assert_eq!(ErrorCode::from_index(u64::MAX), ErrorCode::InternalError);
    }

    #[test]
    fn api_error_display_includes_detail() {
        let err = ClientError::Api {
            code: ErrorCode::NotFound,
            detail: Some("key1".to_string()),
        };
        assert_eq!(err.to_string(), "Entry not found: key1");

        let bare = ClientError::Api {
            code: ErrorCode::AlreadyExists,
            detail: None,
        };
        assert_eq!(bare.to_string(), "Duplicate entry");
    }

    #[test]
    fn network_error_display_is_raw_text() {
        let err = ClientError::Network {
            detail: "connection refused".to_string(),
        };
        assert_eq!(err.to_string(), "connection refused");
    }

    #[test]
    fn expected_classification() {
        let not_found = ClientError::Api {
            code: ErrorCode::NotFound,
            detail: None,
        };
        assert!(not_found.is_expected());

        let internal = ClientError::Api {
            code: ErrorCode::InternalError,
            detail: None,
        };
        assert!(!internal.is_expected());

        let network = ClientError::Network {
            detail: "down".to_string(),
        };
        assert!(!network.is_expected());
        assert!(network.is_transport());
    }
}
