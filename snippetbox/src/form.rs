//! URL-encoded form binding
//!
//! [`DecodedForm<T>`] reads a POST body and deserializes it into `T` by field
//! name. Two failure classes are kept apart:
//!
//! - a malformed body or a value that cannot be coerced (`expires=abc` into a
//!   `u32`) is the client's fault and becomes a 400;
//! - a target type that is not a field mapping at all is a bug in the handler,
//!   so decoding panics and the panic-recovery stage answers with a 500.
//!
//! Unknown keys such as `csrf_token` are ignored. Form structs use
//! `#[serde(default)]` so that absent fields fall back to their defaults.
//! When a key repeats, the first value wins.

use std::collections::HashSet;

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::header::CONTENT_TYPE,
};
use serde::de::DeserializeOwned;

use crate::error::{Error, Result};

pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Decode an URL-encoded body into `T`
///
/// # Panics
///
/// Panics when `T` is not a struct or map, since no request can ever
/// decode into it.
pub fn decode_post_form<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    let body = first_values(body)?;
    match serde_urlencoded::from_str::<T>(&body) {
        Ok(value) => Ok(value),
        Err(e) if is_invalid_target(&e) => panic!(
            "invalid form decode target {}: {}",
            std::any::type_name::<T>(),
            e
        ),
        Err(e) => Err(Error::BadRequest(format!("form decode failed: {}", e))),
    }
}

// serde_urlencoded rejects a repeated field outright; keep only the first
// occurrence of each key and re-encode.
fn first_values(body: &[u8]) -> Result<String> {
    let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(body)
        .map_err(|e| Error::BadRequest(format!("form decode failed: {}", e)))?;

    let mut seen = HashSet::new();
    let pairs: Vec<(String, String)> = pairs
        .into_iter()
        .filter(|(key, _)| seen.insert(key.clone()))
        .collect();

    serde_urlencoded::to_string(&pairs)
        .map_err(|e| Error::BadRequest(format!("form decode failed: {}", e)))
}

// Form bodies always deserialize as a map of pairs, so a target that refuses
// a map cannot be filled from any body.
fn is_invalid_target(err: &serde_urlencoded::de::Error) -> bool {
    err.to_string().starts_with("invalid type: map")
}

/// True when the request declares an URL-encoded body
pub fn is_form_request(req: &Request) -> bool {
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case(FORM_CONTENT_TYPE))
}

/// Extractor for a decoded POST form
///
/// A request with any other content type decodes as an empty form, so every
/// field takes its default and validation reports what is missing.
#[derive(Debug, Clone)]
pub struct DecodedForm<T>(pub T);

impl<T, S> FromRequest<S> for DecodedForm<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self> {
        let is_form = is_form_request(&req);
        let body = Bytes::from_request(req, state)
            .await
            .map_err(|e| Error::BadRequest(format!("failed to read form body: {}", e)))?;

        let body: &[u8] = if is_form { &body } else { b"" };
        decode_post_form(body).map(DecodedForm)
    }
}
