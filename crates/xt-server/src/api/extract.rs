//! Request body extraction.
//!
//! Clients post either HTML forms or JSON, and JSON clients send numbers
//! where form clients send strings.

use std::fmt;

use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use axum::http::HeaderMap;
use axum::http::header::CONTENT_TYPE;
use serde::de::{self, DeserializeOwned, Deserializer, Visitor};
use xt_core::ValidationError;

use super::{ApiError, AppState, Operation};

/// Extracts `T` from a JSON body when the content type says so, otherwise
/// from a url-encoded form.
///
/// A body with no recognized content type decodes as an empty form, so the
/// handler sees blank fields. Undecodable bodies are rejected as validation
/// errors in the configured error style.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormOrJson<T>(pub T);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyFormat {
    Json,
    Form,
    Unknown,
}

impl BodyFormat {
    fn of(headers: &HeaderMap) -> Self {
        let Some(content_type) = headers
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
        else {
            return Self::Unknown;
        };
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        if essence == "application/json" || essence.ends_with("+json") {
            Self::Json
        } else if essence == "application/x-www-form-urlencoded" {
            Self::Form
        } else {
            Self::Unknown
        }
    }
}

impl<T> FromRequest<AppState> for FormOrJson<T>
where
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let reject = |message: String| {
            state.reject(
                Operation::ReadBody,
                ValidationError::Malformed {
                    part: "body",
                    message,
                },
            )
        };

        let format = BodyFormat::of(req.headers());
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| reject(rejection.body_text()))?;

        let value = match format {
            BodyFormat::Json => {
                serde_json::from_slice(&bytes).map_err(|e| reject(e.to_string()))?
            }
            BodyFormat::Form => {
                serde_urlencoded::from_bytes(&bytes).map_err(|e| reject(e.to_string()))?
            }
            BodyFormat::Unknown => {
                serde_urlencoded::from_bytes(b"").map_err(|e| reject(e.to_string()))?
            }
        };
        Ok(Self(value))
    }
}

struct LenientString;

impl<'de> Visitor<'de> for LenientString {
    type Value = Option<String>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string or a number")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(Some(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(Some(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(Some(v.to_string()))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(Some(v.to_string()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(Some(v.to_string()))
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_any(self)
    }
}

/// Deserializes a string or number into a `String`; `null` becomes empty.
pub fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(deserializer.deserialize_any(LenientString)?.unwrap_or_default())
}

/// Deserializes a string, number or `null` into an `Option<String>`.
pub fn lenient_opt_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    deserializer.deserialize_any(LenientString)
}
