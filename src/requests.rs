// src/requests.rs
use std::collections::HashMap;
use std::io::Read;

use astra::Request;
use serde::de::DeserializeOwned;
use url::form_urlencoded;

use crate::errors::ServerError;

/// Upper bound for non-multipart bodies (login forms, JSON).
pub const MAX_FORM_BYTES: u64 = 64 * 1024;

pub fn query_params(req: &Request) -> HashMap<String, String> {
    req.uri()
        .query()
        .map(|q| parse_pairs(q.as_bytes()))
        .unwrap_or_default()
}

/// Decoded `k=v&…` pairs. Later duplicates win.
pub fn parse_pairs(raw: &[u8]) -> HashMap<String, String> {
    form_urlencoded::parse(raw).into_owned().collect()
}

/// Non-empty, trimmed value of a query/form parameter.
pub fn param<'a>(params: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    params
        .get(key)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
}

pub fn content_type(req: &Request) -> Option<mime::Mime> {
    req.headers()
        .get("Content-Type")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
}

fn read_body(req: Request) -> Result<Vec<u8>, ServerError> {
    let mut body = req.into_body();
    let mut buf = Vec::new();
    body.reader()
        .take(MAX_FORM_BYTES + 1)
        .read_to_end(&mut buf)
        .map_err(|e| ServerError::BadRequest(format!("failed to read request body: {e}")))?;

    if buf.len() as u64 > MAX_FORM_BYTES {
        return Err(ServerError::BadRequest("request body too large".into()));
    }
    Ok(buf)
}

/// `application/x-www-form-urlencoded` body.
pub fn read_form(req: Request) -> Result<HashMap<String, String>, ServerError> {
    let body = read_body(req)?;
    Ok(parse_pairs(&body))
}

pub fn read_json<T: DeserializeOwned>(req: Request) -> Result<T, ServerError> {
    let body = read_body(req)?;
    serde_json::from_slice(&body)
        .map_err(|e| ServerError::BadRequest(format!("invalid JSON body: {e}")))
}

/// Numeric path segment, e.g. the `7` in `/api/properties/7`.
/// Listing id from a path segment. An id that cannot exist is simply not found.
pub fn parse_listing_id(raw: &str) -> Result<i64, ServerError> {
    raw.parse::<i64>()
        .map_err(|_| ServerError::NotFound("Property not found".into()))
}
