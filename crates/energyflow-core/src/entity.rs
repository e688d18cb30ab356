//! The [`Entity`] trait: what a record kind must provide to live in the
//! tenant-scoped override/removal store.
//!
//! Each kind reconciles three sources: immutable baseline records from the
//! injected [`Seed`], tenant override records written by callers, and the
//! tenant's removal set. The merge itself lives in the store backend; this
//! module only describes the records.

use chrono::{DateTime, Utc};
use serde::{Serialize, de::DeserializeOwned};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};
use uuid::Uuid;

use crate::{Result, seed::Seed, tenant::TenantId};

/// Discriminant stored alongside every override and removal row.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr, EnumIter,
  IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum EntityKind {
  Branch,
  GasSale,
  FuelShift,
  Expense,
  InventoryItem,
  User,
}

impl EntityKind {
  pub fn name(self) -> &'static str { self.into() }

  /// Prefix for generated ids, matching the seed ids (`branch-1`, `trans-1`).
  pub fn id_prefix(self) -> &'static str {
    match self {
      Self::Branch => "branch",
      Self::GasSale => "trans",
      Self::FuelShift => "shift",
      Self::Expense => "exp",
      Self::InventoryItem => "item",
      Self::User => "user",
    }
  }

  /// Generate a fresh, unique id for a record of this kind.
  pub fn new_id(self) -> String {
    format!("{}-{}", self.id_prefix(), Uuid::new_v4().simple())
  }
}

/// A tenant-scoped record kind managed by [`crate::store::RecordStore`].
pub trait Entity:
  Clone + Serialize + DeserializeOwned + Send + Sync + 'static
{
  const KIND: EntityKind;

  fn id(&self) -> &str;

  fn set_id(&mut self, id: String);

  fn tenant_id(&self) -> &TenantId;

  fn set_tenant_id(&mut self, tenant: TenantId);

  /// Timestamp for kinds with a natural newest-first ordering. Kinds that
  /// return `None` are listed overrides-first with no further ordering.
  fn ordered_at(&self) -> Option<DateTime<Utc>> { None }

  /// Baseline records shipped with the system, across all tenants.
  fn baseline(seed: &Seed) -> &[Self];

  /// Required fields present and numeric fields strictly positive.
  fn check(&self) -> Result<()>;
}

/// Assign a generated id when the record arrived without one.
pub fn ensure_id<E: Entity>(record: &mut E) {
  if record.id().trim().is_empty() {
    record.set_id(E::KIND.new_id());
  }
}

#[cfg(test)]
mod tests {
  use strum::IntoEnumIterator as _;

  use super::*;

  #[test]
  fn kind_round_trips_through_its_discriminant() {
    for kind in EntityKind::iter() {
      assert_eq!(kind.as_ref().parse::<EntityKind>().unwrap(), kind);
    }
    assert_eq!(EntityKind::GasSale.as_ref(), "gas_sale");
  }

  #[test]
  fn generated_ids_are_prefixed_and_unique() {
    let a = EntityKind::Branch.new_id();
    let b = EntityKind::Branch.new_id();
    assert!(a.starts_with("branch-"));
    assert_ne!(a, b);
  }
}
