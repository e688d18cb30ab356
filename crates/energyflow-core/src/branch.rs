//! Branches: a single gas depot or fuel station under a tenant.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use validator::Validate;

use crate::{
  Result,
  entity::{Entity, EntityKind},
  seed::Seed,
  tenant::TenantId,
  validate,
};

/// What a branch sells. Also tags inventory, expenses, and day records.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display,
  EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum BranchType {
  Gas,
  Fuel,
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display,
  EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum BranchStatus {
  #[default]
  Active,
  Inactive,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Branch {
  #[serde(default)]
  pub id:          String,
  #[serde(default)]
  pub tenant_id:   TenantId,
  #[validate(length(min = 1, message = "is required"))]
  pub name:        String,
  #[serde(rename = "type")]
  pub branch_type: BranchType,
  #[validate(length(min = 1, message = "is required"))]
  pub location:    String,
  #[serde(default)]
  pub status:      BranchStatus,
  /// Weak reference to the managing user; `None` means unassigned.
  #[serde(default)]
  pub manager_id:  Option<String>,
  #[serde(default = "Utc::now")]
  pub created_at:  DateTime<Utc>,
}

impl Branch {
  pub fn is_active(&self) -> bool { self.status == BranchStatus::Active }
}

impl Entity for Branch {
  const KIND: EntityKind = EntityKind::Branch;

  fn id(&self) -> &str { &self.id }

  fn set_id(&mut self, id: String) { self.id = id; }

  fn tenant_id(&self) -> &TenantId { &self.tenant_id }

  fn set_tenant_id(&mut self, tenant: TenantId) { self.tenant_id = tenant; }

  fn baseline(seed: &Seed) -> &[Self] { &seed.branches }

  fn check(&self) -> Result<()> { validate::check(self) }
}
