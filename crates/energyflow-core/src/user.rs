//! Dashboard users: the people who sign in under a tenant.
//!
//! Users live in the same override/removal store as branches. A user may be
//! assigned to branches and branch types, which are weak references only.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
  Result,
  branch::BranchType,
  entity::{Entity, EntityKind},
  seed::Seed,
  tenant::{Role, TenantId},
  validate,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct User {
  #[serde(default)]
  pub id:                    String,
  #[serde(default)]
  pub tenant_id:             TenantId,
  #[validate(length(min = 1, message = "is required"))]
  pub name:                  String,
  #[validate(email(message = "must be a valid email address"))]
  pub email:                 String,
  pub role:                  Role,
  #[serde(default)]
  pub assigned_branches:     Vec<String>,
  #[serde(default)]
  pub assigned_branch_types: Vec<BranchType>,
  #[serde(default = "Utc::now")]
  pub created_at:            DateTime<Utc>,
}

impl User {
  pub fn is_assigned_to(&self, branch_id: &str) -> bool {
    self.assigned_branches.iter().any(|b| b == branch_id)
  }
}

impl Entity for User {
  const KIND: EntityKind = EntityKind::User;

  fn id(&self) -> &str { &self.id }

  fn set_id(&mut self, id: String) { self.id = id; }

  fn tenant_id(&self) -> &TenantId { &self.tenant_id }

  fn set_tenant_id(&mut self, tenant: TenantId) { self.tenant_id = tenant; }

  fn baseline(seed: &Seed) -> &[Self] { &seed.users }

  fn check(&self) -> Result<()> { validate::check(self) }
}
