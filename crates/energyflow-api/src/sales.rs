//! Handlers for the sales ledgers: `/gas/sales` and `/fuel/shifts`.
//!
//! Both ledgers are append-only over HTTP: records can be listed and added,
//! never edited or removed.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State},
  http::{HeaderMap, StatusCode},
  response::{IntoResponse, Response},
};
use chrono::{NaiveDate, Utc};
use energyflow_core::{
  aggregate::{DayTotal, Dated, SalesSummary, daily_series},
  ledger::{FuelShift, GasSale},
  store::RecordStore,
};
use serde::{Deserialize, Serialize};

use crate::{error::ApiError, etag::json_with_etag, tenant::ResolvedTenant};

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub branch_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SummaryParams {
  pub branch_id: Option<String>,
  /// Last day of the trend window; defaults to today (UTC).
  pub end:       Option<NaiveDate>,
  #[serde(default = "default_days")]
  pub days:      u32,
}

fn default_days() -> u32 { 7 }

/// Headline figures plus a per-day trend.
#[derive(Debug, Serialize)]
pub struct SummaryResponse {
  #[serde(flatten)]
  pub summary: SalesSummary,
  pub daily:   Vec<DayTotal>,
}

fn summarise<T: Dated>(
  records: &[T],
  metric: impl Fn(&T) -> f64,
  params: &SummaryParams,
) -> SummaryResponse {
  let end = params.end.unwrap_or_else(|| Utc::now().date_naive());
  SummaryResponse {
    summary: SalesSummary::compute(records, &metric),
    daily:   daily_series(records, &metric, end, params.days.clamp(1, 366)),
  }
}

// ─── Gas sales ───────────────────────────────────────────────────────────────

async fn gas_sales<S: RecordStore + 'static>(
  store: &S,
  tenant: energyflow_core::tenant::TenantId,
  branch_id: &Option<String>,
) -> Result<Vec<GasSale>, ApiError> {
  Ok(
    store
      .list_all::<GasSale>(tenant)
      .await
      .map_err(ApiError::from_store)?
      .into_iter()
      .filter(|s| branch_id.as_deref().is_none_or(|b| s.branch_id == b))
      .collect(),
  )
}

/// `GET /gas/sales[?branch_id=<id>]`
pub async fn list_gas<S: RecordStore + 'static>(
  State(store): State<Arc<S>>,
  ResolvedTenant(tenant): ResolvedTenant,
  Query(params): Query<ListParams>,
  headers: HeaderMap,
) -> Result<Response, ApiError> {
  let sales = gas_sales(store.as_ref(), tenant, &params.branch_id).await?;
  json_with_etag(&headers, &sales)
}

/// `POST /gas/sales`
pub async fn record_gas<S: RecordStore + 'static>(
  State(store): State<Arc<S>>,
  ResolvedTenant(tenant): ResolvedTenant,
  Json(body): Json<GasSale>,
) -> Result<impl IntoResponse, ApiError> {
  let sale = store.create(tenant, body).await.map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(sale)))
}

/// `GET /gas/sales/summary[?branch_id=<id>&end=<date>&days=<n>]`
pub async fn gas_summary<S: RecordStore + 'static>(
  State(store): State<Arc<S>>,
  ResolvedTenant(tenant): ResolvedTenant,
  Query(params): Query<SummaryParams>,
) -> Result<Json<SummaryResponse>, ApiError> {
  let sales = gas_sales(store.as_ref(), tenant, &params.branch_id).await?;
  Ok(Json(summarise(&sales, |s| s.amount, &params)))
}

// ─── Fuel shifts ─────────────────────────────────────────────────────────────

async fn fuel_shifts<S: RecordStore + 'static>(
  store: &S,
  tenant: energyflow_core::tenant::TenantId,
  branch_id: &Option<String>,
) -> Result<Vec<FuelShift>, ApiError> {
  Ok(
    store
      .list_all::<FuelShift>(tenant)
      .await
      .map_err(ApiError::from_store)?
      .into_iter()
      .filter(|s| branch_id.as_deref().is_none_or(|b| s.branch_id == b))
      .collect(),
  )
}

/// `GET /fuel/shifts[?branch_id=<id>]`
pub async fn list_fuel<S: RecordStore + 'static>(
  State(store): State<Arc<S>>,
  ResolvedTenant(tenant): ResolvedTenant,
  Query(params): Query<ListParams>,
  headers: HeaderMap,
) -> Result<Response, ApiError> {
  let shifts = fuel_shifts(store.as_ref(), tenant, &params.branch_id).await?;
  json_with_etag(&headers, &shifts)
}

/// `POST /fuel/shifts`
pub async fn record_fuel<S: RecordStore + 'static>(
  State(store): State<Arc<S>>,
  ResolvedTenant(tenant): ResolvedTenant,
  Json(body): Json<FuelShift>,
) -> Result<impl IntoResponse, ApiError> {
  let shift = store.create(tenant, body).await.map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(shift)))
}

/// `GET /fuel/shifts/summary[?branch_id=<id>&end=<date>&days=<n>]`
pub async fn fuel_summary<S: RecordStore + 'static>(
  State(store): State<Arc<S>>,
  ResolvedTenant(tenant): ResolvedTenant,
  Query(params): Query<SummaryParams>,
) -> Result<Json<SummaryResponse>, ApiError> {
  let shifts = fuel_shifts(store.as_ref(), tenant, &params.branch_id).await?;
  Ok(Json(summarise(&shifts, |s| s.sales_amount, &params)))
}
