//! The merged view: tenant overrides, then surviving baseline records.

use std::collections::HashSet;

use energyflow_core::{entity::Entity, tenant::TenantId};

/// Combine one tenant's overrides (most recently prepended first) with the
/// baseline.
///
/// Baseline records belonging to other tenants are skipped, as is any record
/// whose id is overridden or removed. The result never repeats an id. Kinds
/// with a natural ordering are then sorted newest first; the sort is stable
/// so equal timestamps keep their merged order.
pub fn merge<E: Entity>(
  tenant: &TenantId,
  overrides: Vec<E>,
  baseline: &[E],
  removed: &HashSet<String>,
) -> Vec<E> {
  let mut seen: HashSet<String> = HashSet::new();
  let mut merged: Vec<E> = Vec::with_capacity(overrides.len() + baseline.len());

  for record in overrides {
    if removed.contains(record.id()) || !seen.insert(record.id().to_owned()) {
      continue;
    }
    merged.push(record);
  }

  for record in baseline.iter().filter(|r| r.tenant_id() == tenant) {
    if removed.contains(record.id()) || !seen.insert(record.id().to_owned()) {
      continue;
    }
    merged.push(record.clone());
  }

  merged.sort_by(|a, b| b.ordered_at().cmp(&a.ordered_at()));
  merged
}
