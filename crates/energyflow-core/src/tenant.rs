//! Tenants and tenant resolution.
//!
//! Every record in the store is partitioned by [`TenantId`]. The resolver
//! turns an optional caller session into the tenant that scopes all
//! subsequent store operations; guest and demo callers land in the
//! `"global"` tenant.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use uuid::Uuid;
use validator::Validate;

use crate::branch::BranchType;

// ─── TenantId ────────────────────────────────────────────────────────────────

/// Opaque tenant identifier.
#[derive(
  Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TenantId(String);

impl TenantId {
  /// The sentinel tenant used when no session is present.
  pub const GLOBAL: &'static str = "global";

  pub fn new(id: impl Into<String>) -> Self { Self(id.into()) }

  pub fn global() -> Self { Self(Self::GLOBAL.to_owned()) }

  pub fn is_global(&self) -> bool { self.0 == Self::GLOBAL }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl Default for TenantId {
  fn default() -> Self { Self::global() }
}

impl fmt::Display for TenantId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

impl From<&str> for TenantId {
  fn from(s: &str) -> Self { Self::new(s) }
}

impl From<String> for TenantId {
  fn from(s: String) -> Self { Self(s) }
}

// ─── Session & resolver ──────────────────────────────────────────────────────

/// Roles a dashboard user can select. Role selection is not verified.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
  AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Role {
  SuperAdmin,
  OrgOwner,
  GasManager,
  FuelManager,
  SalesStaff,
}

/// What the caller told us about itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
  pub user_id:   Option<String>,
  pub tenant_id: Option<String>,
  pub role:      Option<Role>,
}

/// Resolve the tenant that scopes a request. Never fails: a missing session,
/// or one whose tenant field is absent or blank, resolves to `"global"`.
pub fn resolve_tenant(session: Option<&Session>) -> TenantId {
  session
    .and_then(|s| s.tenant_id.as_deref())
    .map(str::trim)
    .filter(|t| !t.is_empty())
    .map(TenantId::new)
    .unwrap_or_else(TenantId::global)
}

// ─── Tenant records ──────────────────────────────────────────────────────────

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
  AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Plan {
  Personal,
  Organisation,
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
  AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TenantStatus {
  Active,
  Suspended,
}

/// A billing / organisation boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tenant {
  pub id:                TenantId,
  pub name:              String,
  pub owner_name:        String,
  pub owner_email:       String,
  pub subscription_plan: Plan,
  pub status:            TenantStatus,
  pub branch_types:      Vec<BranchType>,
  pub created_at:        DateTime<Utc>,
}

/// Input to [`crate::store::RecordStore::create_tenant`].
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewTenant {
  #[validate(length(min = 1, message = "is required"))]
  pub name:              String,
  #[serde(default)]
  pub owner_name:        String,
  #[validate(email(message = "must be a valid email address"))]
  pub owner_email:       String,
  pub subscription_plan: Plan,
  #[serde(default)]
  pub branch_types:      Vec<BranchType>,
}

impl Tenant {
  /// A freshly registered tenant. New tenants always start `active`.
  pub fn register(input: NewTenant) -> Self {
    Self {
      id:                TenantId::new(format!("tenant-{}", Uuid::new_v4().simple())),
      name:              input.name.trim().to_owned(),
      owner_name:        input.owner_name.trim().to_owned(),
      owner_email:       input.owner_email.trim().to_owned(),
      subscription_plan: input.subscription_plan,
      status:            TenantStatus::Active,
      branch_types:      input.branch_types,
      created_at:        Utc::now(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn no_session_resolves_to_global() {
    assert_eq!(resolve_tenant(None), TenantId::global());
  }

  #[test]
  fn session_without_tenant_resolves_to_global() {
    let session = Session { user_id: Some("user-1".into()), ..Default::default() };
    assert!(resolve_tenant(Some(&session)).is_global());
  }

  #[test]
  fn blank_tenant_resolves_to_global() {
    let session = Session { tenant_id: Some("   ".into()), ..Default::default() };
    assert!(resolve_tenant(Some(&session)).is_global());
  }

  #[test]
  fn session_tenant_is_used() {
    let session = Session {
      tenant_id: Some("tenant-2".into()),
      role: Some(Role::OrgOwner),
      ..Default::default()
    };
    assert_eq!(resolve_tenant(Some(&session)).as_str(), "tenant-2");
  }

  #[test]
  fn role_parses_from_snake_case() {
    assert_eq!("gas_manager".parse::<Role>().unwrap(), Role::GasManager);
    assert!("janitor".parse::<Role>().is_err());
  }
}
