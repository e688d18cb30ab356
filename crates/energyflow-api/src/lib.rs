//! JSON REST API for EnergyFlow.
//!
//! Exposes an axum [`Router`] backed by any
//! [`energyflow_core::store::RecordStore`]. Every tenant-scoped handler reads
//! its tenant from the identity headers (see [`tenant`]). Auth, TLS, and
//! transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", energyflow_api::api_router(store.clone()))
//! ```

pub mod branches;
pub mod daily;
pub mod error;
pub mod etag;
pub mod expenses;
pub mod inventory;
pub mod notifications;
pub mod reports;
pub mod sales;
pub mod tenant;
pub mod tenants;
pub mod users;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use axum::{
  Router,
  routing::{delete, get, post, put},
};
use energyflow_core::store::RecordStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: RecordStore + 'static,
{
  Router::new()
    // Branches
    .route("/branches", get(branches::list::<S>).post(branches::create::<S>))
    .route(
      "/branches/{id}",
      get(branches::get_one::<S>)
        .put(branches::update::<S>)
        .delete(branches::delete::<S>),
    )
    .route("/branches/{id}/archive", post(branches::archive::<S>))
    // Sales ledgers
    .route("/gas/sales", get(sales::list_gas::<S>).post(sales::record_gas::<S>))
    .route("/gas/sales/summary", get(sales::gas_summary::<S>))
    .route("/fuel/shifts", get(sales::list_fuel::<S>).post(sales::record_fuel::<S>))
    .route("/fuel/shifts/summary", get(sales::fuel_summary::<S>))
    // Expenses and stock
    .route("/expenses", get(expenses::list::<S>).post(expenses::create::<S>))
    .route("/inventory", get(inventory::list::<S>).post(inventory::create::<S>))
    .route("/inventory/{id}", delete(inventory::delete::<S>))
    .route("/daily-records", get(daily::list::<S>).post(daily::record::<S>))
    // Reports
    .route("/reports/daily", get(reports::daily::<S>))
    .route("/reports/daily.csv", get(reports::daily_csv::<S>))
    // Platform administration
    .route("/tenants", get(tenants::list::<S>).post(tenants::create::<S>))
    .route("/tenants/{id}", get(tenants::get_one::<S>).delete(tenants::delete::<S>))
    .route("/tenants/{id}/suspend", post(tenants::suspend::<S>))
    .route("/tenants/{id}/activate", post(tenants::activate::<S>))
    .route("/tenants/{id}/plan", put(tenants::set_plan::<S>))
    .route("/activity-logs", get(tenants::activity::<S>))
    // Users
    .route("/users", get(users::list::<S>).post(users::create::<S>))
    .route(
      "/users/{id}",
      get(users::get_one::<S>)
        .put(users::update::<S>)
        .delete(users::delete::<S>),
    )
    // Notifications
    .route(
      "/notifications",
      get(notifications::list::<S>).post(notifications::push::<S>),
    )
    .route("/notifications/read-all", post(notifications::read_all::<S>))
    .with_state(store)
}
