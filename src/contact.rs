//! Contact record model.
//!
//! Defines the persisted [`Contact`] shape, its store identifier
//! ([`ContactId`]), and the structural normalization applied before a
//! record reaches the store ([`NewContact`]). Request-level checks such as
//! the email pattern live in the HTTP layer, not here.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Store-assigned identifier of a contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContactId(Uuid);

impl ContactId {
    /// Generate a fresh identifier for an insert.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Returned when text is not a well-formed contact identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed contact id: {0}")]
pub struct InvalidContactId(pub String);

impl FromStr for ContactId {
    type Err = InvalidContactId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| InvalidContactId(s.to_string()))
    }
}

impl fmt::Display for ContactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl Serialize for ContactId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A persisted contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: ContactId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
    #[serde(serialize_with = "serialize_timestamp")]
    pub created_at: DateTime<Utc>,
}

/// Serialize as RFC 3339 with millisecond precision (`2024-05-01T12:00:00.123Z`).
fn serialize_timestamp<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&ts.format("%Y-%m-%dT%H:%M:%S%.3fZ"))
}

/// Convert stored unix milliseconds back to a timestamp.
pub(crate) fn timestamp_from_millis(millis: i64) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(millis)
        .single()
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

/// Structural rejections raised while normalizing a record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("contact validation failed: {0} is required")]
    Required(&'static str),
}

/// A contact ready to be inserted: trimmed, email lower-cased, message defaulted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewContact {
    name: String,
    email: String,
    phone: String,
    message: String,
}

impl NewContact {
    /// Apply the structural rules to raw field values.
    ///
    /// Every field is trimmed and the email lower-cased. `name`, `email` and
    /// `phone` must be non-empty after trimming; a missing message becomes `""`.
    pub fn new(
        name: &str,
        email: &str,
        phone: &str,
        message: Option<&str>,
    ) -> Result<Self, ModelError> {
        let name = required("name", name)?;
        let email = required("email", email)?.to_lowercase();
        let phone = required("phone", phone)?;
        let message = message.map(str::trim).unwrap_or_default().to_string();

        Ok(Self {
            name,
            email,
            phone,
            message,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

fn required(field: &'static str, value: &str) -> Result<String, ModelError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ModelError::Required(field))
    } else {
        Ok(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_contact_trims_and_lowercases() {
        let c = NewContact::new("  Ada Lovelace ", " Ada@Example.COM ", " 555-0100 ", Some("  hi  "))
            .unwrap();
        assert_eq!(c.name(), "Ada Lovelace");
        assert_eq!(c.email(), "ada@example.com");
        assert_eq!(c.phone(), "555-0100");
        assert_eq!(c.message(), "hi");
    }

    #[test]
    fn test_new_contact_defaults_message() {
        let c = NewContact::new("Ada", "ada@example.com", "555", None).unwrap();
        assert_eq!(c.message(), "");
    }

    #[test]
    fn test_new_contact_rejects_blank_required_fields() {
        assert_eq!(
            NewContact::new("   ", "a@b.co", "1", None),
            Err(ModelError::Required("name"))
        );
        assert_eq!(
            NewContact::new("Ada", "a@b.co", "\t", None),
            Err(ModelError::Required("phone"))
        );
    }

    #[test]
    fn test_model_stage_does_not_check_email_shape() {
        let c = NewContact::new("Ada", "not-an-email", "1", None).unwrap();
        assert_eq!(c.email(), "not-an-email");
    }

    #[test]
    fn test_contact_id_parse() {
        let id = ContactId::generate();
        let parsed: ContactId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);

        assert!("".parse::<ContactId>().is_err());
        assert!("123".parse::<ContactId>().is_err());
        assert!("507f1f77bcf86cd799439011".parse::<ContactId>().is_err());
        assert!("zzzzzzzz-zzzz-zzzz-zzzz-zzzzzzzzzzzz".parse::<ContactId>().is_err());
    }

    #[test]
    fn test_contact_serializes_camel_case_with_millis() {
        let contact = Contact {
            id: "6f1c1b2a-3d4e-4f50-8a9b-0c1d2e3f4a5b".parse().unwrap(),
            name: "Ada".into(),
            email: "ada@example.com".into(),
            phone: "555".into(),
            message: String::new(),
            created_at: timestamp_from_millis(1_714_564_800_123),
        };
        let json = serde_json::to_value(&contact).unwrap();
        assert_eq!(json["id"], "6f1c1b2a-3d4e-4f50-8a9b-0c1d2e3f4a5b");
        assert_eq!(json["createdAt"], "2024-05-01T12:00:00.123Z");
        assert_eq!(json["message"], "");
    }
}
