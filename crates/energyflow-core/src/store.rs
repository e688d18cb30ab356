//! The `RecordStore` trait.
//!
//! The trait is implemented by storage backends (e.g.
//! `energyflow-store-sqlite`). The HTTP layer depends on this abstraction,
//! not on any concrete backend.

use std::future::Future;

use crate::{
  activity::ActivityEntry,
  branch::Branch,
  daily::{DailyRecord, DayRecordInput},
  entity::Entity,
  notification::Notification,
  tenant::{NewTenant, Plan, Tenant, TenantId, TenantStatus},
};

/// Backend errors that may carry a domain [`crate::Error`].
///
/// Lets callers tell a rejected request (validation, not found, stock
/// exceeded) apart from a storage fault without knowing the backend.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  fn as_core(&self) -> Option<&crate::Error>;
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a tenant-partitioned record store.
///
/// Every operation is scoped to one tenant. Record kinds implementing
/// [`Entity`] are served as a merged view: the tenant's override records,
/// then baseline records that are neither overridden nor removed.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait RecordStore: Send + Sync {
  type Error: StoreError;

  // ── Entities ──────────────────────────────────────────────────────────

  /// The merged view for one tenant and kind, recomputed on every call.
  ///
  /// Unreadable override or removal state is logged and treated as empty,
  /// each independently of the other; it is never surfaced as an error.
  fn list_all<E: Entity>(
    &self,
    tenant: TenantId,
  ) -> impl Future<Output = Result<Vec<E>, Self::Error>> + Send + '_;

  /// Look up one record in the merged view.
  fn get<E: Entity>(
    &self,
    tenant: TenantId,
    id: String,
  ) -> impl Future<Output = Result<Option<E>, Self::Error>> + Send + '_;

  /// Validate and prepend a new record to the tenant's override list.
  ///
  /// The record's tenant is forced to `tenant` and a blank id is replaced
  /// with a generated one.
  fn create<E: Entity>(
    &self,
    tenant: TenantId,
    record: E,
  ) -> impl Future<Output = Result<E, Self::Error>> + Send + '_;

  /// Replace an existing record. Overridden records keep their position;
  /// the first edit of a baseline record becomes a new override.
  fn update<E: Entity>(
    &self,
    tenant: TenantId,
    record: E,
  ) -> impl Future<Output = Result<E, Self::Error>> + Send + '_;

  /// Remove a record from the merged view. Idempotent.
  fn hard_delete<E: Entity>(
    &self,
    tenant: TenantId,
    id: String,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Mark a branch inactive. The branch stays in listings.
  fn soft_delete_branch(
    &self,
    tenant: TenantId,
    id: String,
  ) -> impl Future<Output = Result<Branch, Self::Error>> + Send + '_;

  // ── Daily records ─────────────────────────────────────────────────────

  /// Reconcile and append a day record. A rejected submission leaves no
  /// trace.
  fn record_day(
    &self,
    tenant: TenantId,
    input: DayRecordInput,
  ) -> impl Future<Output = Result<DailyRecord, Self::Error>> + Send + '_;

  /// Day records for one branch and branch type, newest first.
  fn list_days(
    &self,
    tenant: TenantId,
    branch_id: String,
    kind: crate::branch::BranchType,
  ) -> impl Future<Output = Result<Vec<DailyRecord>, Self::Error>> + Send + '_;

  // ── Tenants ───────────────────────────────────────────────────────────

  fn list_tenants(
    &self,
  ) -> impl Future<Output = Result<Vec<Tenant>, Self::Error>> + Send + '_;

  fn get_tenant(
    &self,
    id: TenantId,
  ) -> impl Future<Output = Result<Option<Tenant>, Self::Error>> + Send + '_;

  fn create_tenant(
    &self,
    input: NewTenant,
  ) -> impl Future<Output = Result<Tenant, Self::Error>> + Send + '_;

  fn set_tenant_status(
    &self,
    id: TenantId,
    status: TenantStatus,
  ) -> impl Future<Output = Result<Tenant, Self::Error>> + Send + '_;

  fn set_tenant_plan(
    &self,
    id: TenantId,
    plan: Plan,
  ) -> impl Future<Output = Result<Tenant, Self::Error>> + Send + '_;

  /// Delete a tenant together with all of its records. The tenant's
  /// activity entries are kept.
  fn delete_tenant(
    &self,
    id: TenantId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Tenant lifecycle changes, newest first. `None` lists every tenant.
  fn list_activity(
    &self,
    tenant: Option<TenantId>,
  ) -> impl Future<Output = Result<Vec<ActivityEntry>, Self::Error>> + Send + '_;

  // ── Notifications ─────────────────────────────────────────────────────

  /// Prepend a notification, keeping only the most recent
  /// [`crate::notification::NOTIFICATION_CAP`] for the tenant.
  fn push_notification(
    &self,
    tenant: TenantId,
    title: String,
    message: String,
  ) -> impl Future<Output = Result<Notification, Self::Error>> + Send + '_;

  /// Newest first.
  fn list_notifications(
    &self,
    tenant: TenantId,
  ) -> impl Future<Output = Result<Vec<Notification>, Self::Error>> + Send + '_;

  /// Returns the number of notifications that changed state.
  fn mark_all_read(
    &self,
    tenant: TenantId,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;
}
