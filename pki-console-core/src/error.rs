//! Unified error type definition.

use serde::Serialize;
use thiserror::Error;

// Re-export the client error types
pub use pki_console_client::{ClientError, ErrorCode};

/// Core layer error type.
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// Protocol or transport failure reported by the client layer.
    #[error("{0}")]
    Client(#[from] ClientError),

    /// The operation requires the page to be in a different UI mode.
    #[error("page is not in {expected} mode")]
    WrongMode {
        /// Mode the operation needs.
        expected: &'static str,
    },

    /// A database refresh is already running; the new one was rejected.
    #[error("database refresh already in progress")]
    RefreshInProgress,

    /// The operation needs an active key-store database and none is set.
    #[error("no active database")]
    NoActiveDatabase,

    /// A reply parsed fine but carried a payload the caller cannot use.
    #[error("unexpected reply payload for {action}")]
    UnexpectedPayload {
        /// Action verb whose reply was unusable.
        action: &'static str,
    },
}

impl CoreError {
    /// Whether this is expected behavior (operator input, missing resource)
    /// used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error`
    /// when returning `false`. Update this method when adding variants.
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::Client(e) => e.is_expected(),
            Self::WrongMode { .. } | Self::RefreshInProgress | Self::NoActiveDatabase => true,
            Self::UnexpectedPayload { .. } => false,
        }
    }
}

/// Core layer Result type alias.
pub type CoreResult<T> = std::result::Result<T, CoreError>;
