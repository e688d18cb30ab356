//! ETags for list responses.
//!
//! The tag is a SHA-256 over the serialised JSON body, so any change to the
//! merged view (a new override, a removal, an edit) changes the tag.

use axum::{
  http::{HeaderMap, StatusCode, header},
  response::{IntoResponse, Response},
};
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::error::ApiError;

/// Quoted hex digest of `body`.
pub fn compute_etag(body: &[u8]) -> String {
  format!("\"{}\"", hex::encode(Sha256::digest(body)))
}

/// Whether `If-None-Match` names `etag` (or is `*`).
pub fn if_none_match(headers: &HeaderMap, etag: &str) -> bool {
  headers
    .get_all(header::IF_NONE_MATCH)
    .iter()
    .filter_map(|v| v.to_str().ok())
    .flat_map(|v| v.split(','))
    .map(|tag| tag.trim().trim_start_matches("W/"))
    .any(|tag| tag == "*" || tag == etag)
}

/// Serialise `value` as JSON with an `ETag`, or answer `304 Not Modified`
/// when the client already holds it.
pub fn json_with_etag<T: Serialize>(
  headers: &HeaderMap,
  value: &T,
) -> Result<Response, ApiError> {
  let body = serde_json::to_vec(value).map_err(|e| ApiError::Store(Box::new(e)))?;
  let etag = compute_etag(&body);

  if if_none_match(headers, &etag) {
    return Ok((StatusCode::NOT_MODIFIED, [(header::ETAG, etag)]).into_response());
  }

  Ok(
    (
      StatusCode::OK,
      [
        (header::ETAG, etag),
        (header::CONTENT_TYPE, "application/json".to_owned()),
      ],
      body,
    )
      .into_response(),
  )
}
