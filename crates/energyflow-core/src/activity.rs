//! Activity log: an append-only audit trail of tenant lifecycle changes.
//!
//! Entries are written by the store in the same transaction as the change
//! they describe, and outlive the tenant they refer to.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use uuid::Uuid;

use crate::tenant::{Tenant, TenantId, TenantStatus};

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
  AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ActivityAction {
  TenantCreated,
  AccountSuspended,
  AccountActivated,
  PlanChanged,
  TenantDeleted,
}

impl ActivityAction {
  /// The action recorded when a tenant moves to `status`.
  pub fn for_status(status: TenantStatus) -> Self {
    match status {
      TenantStatus::Active => Self::AccountActivated,
      TenantStatus::Suspended => Self::AccountSuspended,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityEntry {
  pub id:          String,
  pub tenant_id:   TenantId,
  /// Copied at write time so the entry still reads after the tenant is gone.
  pub tenant_name: String,
  pub action:      ActivityAction,
  pub description: String,
  pub created_at:  DateTime<Utc>,
}

impl ActivityEntry {
  pub fn new(tenant: &Tenant, action: ActivityAction) -> Self {
    Self {
      id:          format!("log-{}", Uuid::new_v4().simple()),
      tenant_id:   tenant.id.clone(),
      tenant_name: tenant.name.clone(),
      action,
      description: describe(tenant, action),
      created_at:  Utc::now(),
    }
  }
}

fn describe(tenant: &Tenant, action: ActivityAction) -> String {
  let name = &tenant.name;
  match action {
    ActivityAction::TenantCreated => format!("{name} registered on the {} plan", tenant.subscription_plan),
    ActivityAction::AccountSuspended => format!("{name} account suspended"),
    ActivityAction::AccountActivated => format!("{name} account activated"),
    ActivityAction::PlanChanged => format!("{name} moved to the {} plan", tenant.subscription_plan),
    ActivityAction::TenantDeleted => format!("{name} deleted"),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::tenant::{NewTenant, Plan};

  fn tenant(plan: Plan) -> Tenant {
    Tenant::register(NewTenant {
      name:              "Gas & Fuel Co".into(),
      owner_name:        String::new(),
      owner_email:       "owner@gasandfuel.com".into(),
      subscription_plan: plan,
      branch_types:      vec![],
    })
  }

  #[test]
  fn status_maps_to_its_action() {
    assert_eq!(ActivityAction::for_status(TenantStatus::Suspended), ActivityAction::AccountSuspended);
    assert_eq!(ActivityAction::for_status(TenantStatus::Active), ActivityAction::AccountActivated);
  }

  #[test]
  fn entry_names_the_tenant_and_the_new_plan() {
    let t = tenant(Plan::Organisation);
    let entry = ActivityEntry::new(&t, ActivityAction::PlanChanged);
    assert!(entry.id.starts_with("log-"));
    assert_eq!(entry.tenant_id, t.id);
    assert_eq!(entry.description, "Gas & Fuel Co moved to the organisation plan");
    assert_eq!(entry.action.as_ref(), "plan_changed");
  }
}
