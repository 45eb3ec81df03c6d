//! Reply parsing.
//!
//! Every action has a fixed success discriminant: exactly one reply field
//! carries the result. A delivered body either contains that field, or an
//! `err` index into the error catalog (with an optional `msg` detail).
//! Anything else is a malformed reply.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{ClientError, ErrorCode, Result};
use crate::types::{CrlEntry, CrtEntry, CsrEntry, DbEntry, KeyEntry};

/// Success discriminant expected from an action, fixed per verb.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expect {
    /// `name` — confirmed resource name.
    Name,
    /// `data` — opaque PEM/text blob.
    Data,
    /// `deleted` — name of the removed resource.
    Removed,
    /// `deleted` — number of wiped resources.
    Wiped,
    /// `dbs` — key-store database listing.
    Databases,
    /// `keys` — private-key listing.
    Keys,
    /// `csrs` — signing-request listing.
    Requests,
    /// `crts` — certificate listing.
    Certificates,
    /// `crls` — revocation-list listing.
    Revocations,
    /// `serial` — next certificate serial number.
    Serial,
}

impl Expect {
    /// Wire field carrying the success payload.
    #[must_use]
    pub fn field(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Data => "data",
            Self::Removed | Self::Wiped => "deleted",
            Self::Databases => "dbs",
            Self::Keys => "keys",
            Self::Requests => "csrs",
            Self::Certificates => "crts",
            Self::Revocations => "crls",
            Self::Serial => "serial",
        }
    }
}

/// Parsed success payload of a dispatched command.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Confirmed resource name.
    Name(String),
    /// Opaque text blob (e.g. generated key material).
    Data(String),
    /// Name of the removed resource.
    Removed(String),
    /// Number of wiped resources.
    Wiped(u64),
    /// Key-store database listing.
    Databases(Vec<DbEntry>),
    /// Private-key listing.
    Keys(Vec<KeyEntry>),
    /// Signing-request listing.
    Requests(Vec<CsrEntry>),
    /// Certificate listing.
    Certificates(Vec<CrtEntry>),
    /// Revocation-list listing.
    Revocations(Vec<CrlEntry>),
    /// Next certificate serial number.
    Serial(u64),
}

/// Outcome of a delivered (non-transport-failed) reply.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// The action succeeded; the payload matches the action's schema.
    Success(Payload),
    /// The daemon reported a business error.
    Failure {
        /// Catalog entry resolved from the `err` index.
        code: ErrorCode,
        /// Optional human-readable detail (`msg` field).
        detail: Option<String>,
    },
}

fn parse_string(body: &Value, field: &'static str) -> Result<String> {
    body.get(field)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| ClientError::Parse {
            detail: format!("reply field `{field}` is missing or not a string"),
        })
}

fn parse_u64(body: &Value, field: &'static str) -> Result<u64> {
    body.get(field)
        .and_then(Value::as_u64)
        .ok_or_else(|| ClientError::Parse {
            detail: format!("reply field `{field}` is missing or not an integer"),
        })
}

fn parse_list<T: DeserializeOwned>(body: &Value, field: &'static str) -> Result<Vec<T>> {
    let value = body.get(field).ok_or_else(|| ClientError::Parse {
        detail: format!("reply field `{field}` is missing"),
    })?;
    serde_json::from_value(value.clone()).map_err(|e| ClientError::Parse {
        detail: format!("reply field `{field}`: {e}"),
    })
}

/// Decide success or failure of a delivered reply body.
///
/// The `err` field wins: a body carrying both `err` and a payload field is a
/// business error. Error indices outside the catalog resolve to the
/// internal-error entry.
pub fn parse_reply(expect: Expect, body: &Value) -> Result<Reply> {
    if let Some(err) = body.get("err") {
        let index = err.as_u64().ok_or_else(|| ClientError::Parse {
            detail: "reply field `err` is not an integer".to_string(),
        })?;
        let detail = body.get("msg").and_then(Value::as_str).map(str::to_string);
        return Ok(Reply::Failure {
            code: ErrorCode::from_index(index),
            detail,
        });
    }

    let payload = match expect {
        Expect::Name => Payload::Name(parse_string(body, expect.field())?),
        Expect::Data => Payload::Data(parse_string(body, expect.field())?),
        Expect::Removed => Payload::Removed(parse_string(body, expect.field())?),
        Expect::Wiped => Payload::Wiped(parse_u64(body, expect.field())?),
        Expect::Databases => Payload::Databases(parse_list(body, expect.field())?),
        Expect::Keys => Payload::Keys(parse_list(body, expect.field())?),
        Expect::Requests => Payload::Requests(parse_list(body, expect.field())?),
        Expect::Certificates => Payload::Certificates(parse_list(body, expect.field())?),
        Expect::Revocations => Payload::Revocations(parse_list(body, expect.field())?),
        Expect::Serial => Payload::Serial(parse_u64(body, expect.field())?),
    };
    Ok(Reply::Success(payload))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_name_reply() {
        let reply = parse_reply(Expect::Name, &json!({"name": "db1"})).unwrap();
        assert_eq!(reply, Reply::Success(Payload::Name("db1".to_string())));
    }

    #[test]
    fn failure_reply_with_detail() {
        let reply = parse_reply(Expect::Name, &json!({"err": 6, "msg": "key1"})).unwrap();
        assert_eq!(
            reply,
            Reply::Failure {
                code: ErrorCode::NotFound,
                detail: Some("key1".to_string()),
            }
        );
    }

    #[test]
    fn failure_wins_over_payload_field() {
        let reply = parse_reply(Expect::Name, &json!({"err": 5, "name": "db1"})).unwrap();
        assert!(matches!(
            reply,
            Reply::Failure {
                code: ErrorCode::AlreadyExists,
                ..
            }
        ));
    }

    #[test]
    fn out_of_catalog_error_degrades_to_internal() {
        let reply = parse_reply(Expect::Serial, &json!({"err": 42})).unwrap();
        assert!(matches!(
            reply,
            Reply::Failure {
                code: ErrorCode::InternalError,
                ..
            }
        ));
    }

    #[test]
    fn listing_reply_parses_entries() {
        let body = json!({"dbs": [
            {"name": "db2", "desc": "second"},
            {"name": "db1", "desc": "", "home": "/var/pki"},
        ]});
        let Reply::Success(Payload::Databases(dbs)) =
            parse_reply(Expect::Databases, &body).unwrap()
        else {
            panic!("expected a database listing");
        };
        assert_eq!(dbs.len(), 2);
        assert_eq!(dbs[1].home, "/var/pki");
    }

    #[test]
    fn wiped_and_removed_share_the_deleted_field() {
        let removed = parse_reply(Expect::Removed, &json!({"deleted": "key1"})).unwrap();
        assert_eq!(removed, Reply::Success(Payload::Removed("key1".to_string())));

        let wiped = parse_reply(Expect::Wiped, &json!({"deleted": 3})).unwrap();
        assert_eq!(wiped, Reply::Success(Payload::Wiped(3)));
    }

    #[test]
    fn schema_mismatch_is_a_parse_error() {
        let result = parse_reply(Expect::Serial, &json!({"name": "db1"}));
        assert!(matches!(result, Err(ClientError::Parse { .. })));

        let result = parse_reply(Expect::Name, &json!({"err": "nope"}));
        assert!(matches!(result, Err(ClientError::Parse { .. })));
    }
}
