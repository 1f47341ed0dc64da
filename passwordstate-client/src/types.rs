//! PasswordState `/api/passwords` response types.
//!
//! Key points about the upstream format:
//! - Field names are PascalCase, with `PasswordID` and `URL` as exceptions
//! - Text fields may be `null` instead of `""`
//! - A lookup by ID returns a JSON array, even for a single match
//! - Errors come back as `[{"errors":[{"message":..},{"phrase":..}]}]`

use passwordstate_secret::SecretValue;
use serde::{Deserialize, Deserializer};

/// A single password record returned by PasswordState.
///
/// `password` is a [`SecretValue`]: it never shows up in `Debug` output.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PasswordRecord {
    /// Password ID (PID) of the record.
    #[serde(rename = "PasswordID")]
    pub password_id: i64,
    /// Display title.
    #[serde(default, deserialize_with = "string_or_null")]
    pub title: String,
    /// Account domain, if any.
    #[serde(default, deserialize_with = "string_or_null")]
    pub domain: String,
    /// Host name, if any.
    #[serde(default, deserialize_with = "string_or_null")]
    pub host_name: String,
    /// Account user name.
    #[serde(default, deserialize_with = "string_or_null")]
    pub user_name: String,
    /// Free-form description.
    #[serde(default, deserialize_with = "string_or_null")]
    pub description: String,
    /// Associated URL.
    #[serde(rename = "URL", default, deserialize_with = "string_or_null")]
    pub url: String,
    /// Notes attached to the record.
    #[serde(default, deserialize_with = "string_or_null")]
    pub notes: String,
    /// The password itself.
    #[serde(default)]
    pub password: SecretValue,
}

fn string_or_null<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Success body: normally an array, tolerated as a bare object.
#[derive(Deserialize)]
#[serde(untagged)]
pub(crate) enum PasswordBody {
    Many(Vec<PasswordRecord>),
    One(Box<PasswordRecord>),
}

impl PasswordBody {
    pub(crate) fn into_records(self) -> Vec<PasswordRecord> {
        match self {
            PasswordBody::Many(records) => records,
            PasswordBody::One(record) => vec![*record],
        }
    }
}

/// One element of the PasswordState error envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorEnvelope {
    #[serde(default)]
    pub errors: Vec<ApiErrorEntry>,
}

/// Either a `message` or a `phrase`; PasswordState sends them as separate entries.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorEntry {
    pub message: Option<String>,
    pub phrase: Option<String>,
}

/// Join every message and phrase of an error body into one line.
///
/// Returns `None` when the body is not a PasswordState error envelope.
pub(crate) fn api_error_message(body: &str) -> Option<String> {
    let envelopes: Vec<ApiErrorEnvelope> = serde_json::from_str(body).ok()?;
    let parts: Vec<&str> = envelopes
        .iter()
        .flat_map(|e| e.errors.iter())
        .flat_map(|entry| [entry.message.as_deref(), entry.phrase.as_deref()])
        .flatten()
        .filter(|s| !s.is_empty())
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(": "))
    }
}
