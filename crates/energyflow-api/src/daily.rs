//! Handlers for `/daily-records`: the per-branch stock reconciliation log.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State},
  http::{HeaderMap, StatusCode},
  response::{IntoResponse, Response},
};
use energyflow_core::{branch::BranchType, daily::DayRecordInput, store::RecordStore};
use serde::Deserialize;

use crate::{error::ApiError, etag::json_with_etag, tenant::ResolvedTenant};

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub branch_id: String,
  pub kind:      BranchType,
}

/// `GET /daily-records?branch_id=<id>&kind=<gas|fuel>`, newest first.
pub async fn list<S: RecordStore + 'static>(
  State(store): State<Arc<S>>,
  ResolvedTenant(tenant): ResolvedTenant,
  Query(params): Query<ListParams>,
  headers: HeaderMap,
) -> Result<Response, ApiError> {
  let records = store
    .list_days(tenant, params.branch_id, params.kind)
    .await
    .map_err(ApiError::from_store)?;
  json_with_etag(&headers, &records)
}

/// `POST /daily-records`. Rejects a day that sells more than the opening
/// stock plus deliveries with `422`.
pub async fn record<S: RecordStore + 'static>(
  State(store): State<Arc<S>>,
  ResolvedTenant(tenant): ResolvedTenant,
  Json(body): Json<DayRecordInput>,
) -> Result<impl IntoResponse, ApiError> {
  let record = store
    .record_day(tenant, body)
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(record)))
}
