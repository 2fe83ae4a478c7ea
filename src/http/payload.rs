//! Create-contact request body and its request-level checks.
//!
//! The body is accepted as JSON or as URL-encoded form data. Any other
//! content type is read as an empty body, so it fails the presence check
//! rather than the parser.

use crate::error::ApiError;
use axum::Json;
use axum::body::Bytes;
use axum::extract::{Form, FromRequest, Request};
use axum::http::header::CONTENT_TYPE;
use regex::Regex;
use serde::de::{self, Deserializer, Visitor};
use serde::Deserialize;
use std::fmt;
use std::sync::OnceLock;

/// Fields accepted by `POST /api/contacts`.
///
/// Each field is `None` when it was absent or falsy (`null`, `false`, `0`).
/// Numbers and `true` are kept in their text form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CreateContactRequest {
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub message: Option<String>,
}

/// Required fields of a request that passed the presence check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequiredFields<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub phone: &'a str,
}

impl CreateContactRequest {
    /// Presence check: `name`, `email` and `phone` must all be non-empty.
    pub fn required_fields(&self) -> Result<RequiredFields<'_>, ApiError> {
        match (present(&self.name), present(&self.email), present(&self.phone)) {
            (Some(name), Some(email), Some(phone)) => Ok(RequiredFields { name, email, phone }),
            _ => Err(ApiError::MissingFields),
        }
    }

    /// Message as submitted, with an empty string treated as absent.
    pub fn message(&self) -> Option<&str> {
        present(&self.message)
    }
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|v| !v.is_empty())
}

/// Email shape check: a run without spaces or `@`, an `@`, then a domain
/// with at least one `.` and no spaces. Applied to the value as submitted.
pub fn is_valid_email(email: &str) -> bool {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL
        .get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"))
        .is_match(email)
}

/// Extractor that decodes a [`CreateContactRequest`] from JSON or form data.
#[derive(Debug)]
pub struct ContactPayload(pub CreateContactRequest);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyKind {
    Json,
    Form,
    Other,
}

fn body_kind(req: &Request) -> BodyKind {
    let Some(content_type) = req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
    else {
        return BodyKind::Other;
    };
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    if mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json")) {
        BodyKind::Json
    } else if mime == "application/x-www-form-urlencoded" {
        BodyKind::Form
    } else {
        BodyKind::Other
    }
}

#[axum::async_trait]
impl<S> FromRequest<S> for ContactPayload
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match body_kind(&req) {
            BodyKind::Json => {
                let bytes = Bytes::from_request(req, state)
                    .await
                    .map_err(|e| ApiError::InvalidBody(e.body_text()))?;
                if bytes.iter().all(u8::is_ascii_whitespace) {
                    return Ok(Self(CreateContactRequest::default()));
                }
                let Json(body) = Json::<CreateContactRequest>::from_bytes(&bytes)
                    .map_err(|e| ApiError::InvalidBody(e.body_text()))?;
                Ok(Self(body))
            }
            BodyKind::Form => {
                let Form(body) = Form::<CreateContactRequest>::from_request(req, state)
                    .await
                    .map_err(|e| ApiError::InvalidBody(e.body_text()))?;
                Ok(Self(body))
            }
            BodyKind::Other => Ok(Self(CreateContactRequest::default())),
        }
    }
}

/// Deserialize a scalar as optional text, mapping falsy values to `None`.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(LenientText)
}

struct LenientText;

impl<'de> Visitor<'de> for LenientText {
    type Value = Option<String>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string, number, boolean or null")
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_any(self)
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
        Ok(v.then(|| "true".to_string()))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok((v != 0).then(|| v.to_string()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok((v != 0).then(|| v.to_string()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok((v != 0.0 && !v.is_nan()).then(|| v.to_string()))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(Some(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(Some(v))
    }
}
