//! Authorization attributes attached to an identity.
//!
//! Two shapes live here:
//! - [`ProfileRecord`]: the document as held by the profile store (loosely typed,
//!   role may be missing or blank).
//! - [`AuthorizationRecord`]: the normalized value a [`Session`](crate::Session)
//!   carries, where a role is always present.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::Role;

/// Profile document as stored by the profile store.
///
/// Unknown keys are kept in `attributes` so they can be passed through to the
/// session untouched. Decoding is lenient: a known key whose value has an
/// unexpected shape is moved to `attributes` instead of failing the document,
/// so a stored role is never lost to a bad secondary field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "Map<String, Value>")]
pub struct ProfileRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    /// Numeric codes are kept as their decimal text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch_code: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch_name: Option<String>,

    /// Accepts RFC 3339 text, epoch milliseconds, or a
    /// `{seconds, nanoseconds}` timestamp object.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl ProfileRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    pub fn with_branch(mut self, code: impl Into<String>, name: impl Into<String>) -> Self {
        self.branch_code = Some(code.into());
        self.branch_name = Some(name.into());
        self
    }

    pub fn with_created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = Some(at);
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }
}

impl From<Map<String, Value>> for ProfileRecord {
    fn from(mut document: Map<String, Value>) -> Self {
        let role = take_field(&mut document, "role", |value| match value {
            Value::String(text) => Some(text.clone()),
            _ => None,
        });
        let branch_code = take_field(&mut document, "branchCode", text_or_number);
        let branch_name = take_field(&mut document, "branchName", text_or_number);
        let created_at = take_field(&mut document, "createdAt", timestamp);

        Self {
            role,
            branch_code,
            branch_name,
            created_at,
            attributes: document,
        }
    }
}

/// Remove `key` and convert it; a value `convert` rejects goes back into the
/// document untouched. `null` counts as absent.
fn take_field<T>(
    document: &mut Map<String, Value>,
    key: &str,
    convert: impl Fn(&Value) -> Option<T>,
) -> Option<T> {
    let value = document.remove(key)?;
    if value.is_null() {
        return None;
    }
    match convert(&value) {
        Some(converted) => Some(converted),
        None => {
            document.insert(key.to_string(), value);
            None
        }
    }
}

fn text_or_number(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

fn timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(text) => DateTime::parse_from_rfc3339(text)
            .ok()
            .map(|at| at.with_timezone(&Utc)),
        Value::Number(millis) => DateTime::from_timestamp_millis(millis.as_i64()?),
        Value::Object(fields) => {
            let seconds = fields.get("seconds").or_else(|| fields.get("_seconds"))?.as_i64()?;
            let nanos = fields
                .get("nanoseconds")
                .or_else(|| fields.get("_nanoseconds"))
                .and_then(Value::as_u64)
                .unwrap_or(0);
            DateTime::from_timestamp(seconds, u32::try_from(nanos).ok()?)
        }
        _ => None,
    }
}

/// Normalized authorization attributes of a signed-in identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizationRecord {
    role: Role,
    branch_code: Option<String>,
    branch_name: Option<String>,
    created_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    attributes: Map<String, Value>,
}

impl AuthorizationRecord {
    /// Record synthesized when the store has no document for the identity, or
    /// could not be read: plain user, no branch.
    pub fn fallback() -> Self {
        Self {
            role: Role::USER,
            branch_code: None,
            branch_name: None,
            created_at: None,
            attributes: Map::new(),
        }
    }

    /// Normalize a stored profile document.
    ///
    /// Blank role falls back to `user`; blank branch fields become `None`;
    /// every other stored attribute is carried over verbatim.
    pub fn from_profile(record: ProfileRecord) -> Self {
        Self {
            role: Role::from_stored(record.role.as_deref()),
            branch_code: non_blank(record.branch_code),
            branch_name: non_blank(record.branch_name),
            created_at: record.created_at,
            attributes: record.attributes,
        }
    }

    pub fn role(&self) -> &Role {
        &self.role
    }

    pub fn branch_code(&self) -> Option<&str> {
        self.branch_code.as_deref()
    }

    pub fn branch_name(&self) -> Option<&str> {
        self.branch_name.as_deref()
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
