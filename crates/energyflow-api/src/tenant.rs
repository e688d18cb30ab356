//! Tenant extraction from request headers.
//!
//! Callers identify themselves with `x-tenant-id`, `x-user-id`, and
//! `x-user-role`. None of these are verified; they only select the tenant
//! partition. A request without them lands in the `global` tenant.

use std::convert::Infallible;

use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, request::Parts},
};
use energyflow_core::tenant::{Session, TenantId, resolve_tenant};

pub const TENANT_HEADER: &str = "x-tenant-id";
pub const USER_HEADER: &str = "x-user-id";
pub const ROLE_HEADER: &str = "x-user-role";

/// The tenant scoping the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTenant(pub TenantId);

fn header(headers: &HeaderMap, name: &str) -> Option<String> {
  headers
    .get(name)
    .and_then(|v| v.to_str().ok())
    .map(str::to_owned)
}

/// Build a session from the identity headers; `None` when none are present.
/// Headers that are not valid UTF-8, and unknown roles, count as absent.
pub fn session_from_headers(headers: &HeaderMap) -> Option<Session> {
  let session = Session {
    user_id:   header(headers, USER_HEADER),
    tenant_id: header(headers, TENANT_HEADER),
    role:      header(headers, ROLE_HEADER).and_then(|r| r.trim().parse().ok()),
  };
  (session != Session::default()).then_some(session)
}

impl<S: Send + Sync> FromRequestParts<S> for ResolvedTenant {
  type Rejection = Infallible;

  async fn from_request_parts(
    parts: &mut Parts,
    _state: &S,
  ) -> Result<Self, Self::Rejection> {
    let session = session_from_headers(&parts.headers);
    Ok(Self(resolve_tenant(session.as_ref())))
  }
}

#[cfg(test)]
mod tests {
  use axum::http::HeaderValue;
  use energyflow_core::tenant::Role;

  use super::*;

  #[test]
  fn no_headers_no_session() {
    assert_eq!(session_from_headers(&HeaderMap::new()), None);
  }

  #[test]
  fn headers_become_a_session() {
    let mut headers = HeaderMap::new();
    headers.insert(TENANT_HEADER, HeaderValue::from_static("tenant-2"));
    headers.insert(ROLE_HEADER, HeaderValue::from_static("gas_manager"));
    let session = session_from_headers(&headers).unwrap();
    assert_eq!(session.tenant_id.as_deref(), Some("tenant-2"));
    assert_eq!(session.role, Some(Role::GasManager));
    assert_eq!(resolve_tenant(Some(&session)).as_str(), "tenant-2");
  }

  #[test]
  fn non_utf8_tenant_is_ignored() {
    let mut headers = HeaderMap::new();
    headers.insert(TENANT_HEADER, HeaderValue::from_bytes(&[0xff, 0xfe]).unwrap());
    headers.insert(USER_HEADER, HeaderValue::from_static("user-1"));
    let session = session_from_headers(&headers);
    assert!(resolve_tenant(session.as_ref()).is_global());
  }
}
