//! Handlers for `/reports/daily` (JSON) and `/reports/daily.csv`.
//!
//! Without `?date`, the report covers the most recent day with any gas or
//! fuel activity, falling back to today.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State},
  http::header,
  response::IntoResponse,
};
use chrono::{NaiveDate, Utc};
use energyflow_core::{
  branch::Branch,
  ledger::{FuelShift, GasSale},
  report::{DailyReport, latest_activity_date},
  store::RecordStore,
  tenant::TenantId,
};
use serde::Deserialize;

use crate::{error::ApiError, tenant::ResolvedTenant};

#[derive(Debug, Deserialize)]
pub struct ReportParams {
  pub date: Option<NaiveDate>,
}

async fn build<S: RecordStore + 'static>(
  store: &S,
  tenant: TenantId,
  date: Option<NaiveDate>,
) -> Result<DailyReport, ApiError> {
  let branches = store
    .list_all::<Branch>(tenant.clone())
    .await
    .map_err(ApiError::from_store)?;
  let gas = store
    .list_all::<GasSale>(tenant.clone())
    .await
    .map_err(ApiError::from_store)?;
  let fuel = store
    .list_all::<FuelShift>(tenant)
    .await
    .map_err(ApiError::from_store)?;

  let date = date
    .or_else(|| latest_activity_date(&gas, &fuel))
    .unwrap_or_else(|| Utc::now().date_naive());
  Ok(DailyReport::build(date, &branches, &gas, &fuel))
}

/// `GET /reports/daily[?date=YYYY-MM-DD]`
pub async fn daily<S: RecordStore + 'static>(
  State(store): State<Arc<S>>,
  ResolvedTenant(tenant): ResolvedTenant,
  Query(params): Query<ReportParams>,
) -> Result<Json<DailyReport>, ApiError> {
  Ok(Json(build(store.as_ref(), tenant, params.date).await?))
}

/// `GET /reports/daily.csv[?date=YYYY-MM-DD]`
pub async fn daily_csv<S: RecordStore + 'static>(
  State(store): State<Arc<S>>,
  ResolvedTenant(tenant): ResolvedTenant,
  Query(params): Query<ReportParams>,
) -> Result<impl IntoResponse, ApiError> {
  let report = build(store.as_ref(), tenant, params.date).await?;
  let csv = report.to_csv()?;
  let disposition = format!("attachment; filename=\"daily-report-{}.csv\"", report.date);
  Ok((
    [
      (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_owned()),
      (header::CONTENT_DISPOSITION, disposition),
    ],
    csv,
  ))
}
