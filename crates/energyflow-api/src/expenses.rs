//! Handlers for `/expenses`. Append-only over HTTP, like the sales ledgers.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State},
  http::{HeaderMap, StatusCode},
  response::{IntoResponse, Response},
};
use energyflow_core::{branch::BranchType, ledger::Expense, store::RecordStore};
use serde::Deserialize;

use crate::{error::ApiError, etag::json_with_etag, tenant::ResolvedTenant};

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub branch_id: Option<String>,
  pub source:    Option<BranchType>,
}

/// `GET /expenses[?branch_id=<id>&source=<gas|fuel>]`
pub async fn list<S: RecordStore + 'static>(
  State(store): State<Arc<S>>,
  ResolvedTenant(tenant): ResolvedTenant,
  Query(params): Query<ListParams>,
  headers: HeaderMap,
) -> Result<Response, ApiError> {
  let expenses: Vec<Expense> = store
    .list_all::<Expense>(tenant)
    .await
    .map_err(ApiError::from_store)?
    .into_iter()
    .filter(|e| params.branch_id.as_deref().is_none_or(|b| e.branch_id == b))
    .filter(|e| params.source.is_none_or(|s| e.source == s))
    .collect();
  json_with_etag(&headers, &expenses)
}

/// `POST /expenses`. The category must belong to the expense's source.
pub async fn create<S: RecordStore + 'static>(
  State(store): State<Arc<S>>,
  ResolvedTenant(tenant): ResolvedTenant,
  Json(body): Json<Expense>,
) -> Result<impl IntoResponse, ApiError> {
  let expense = store.create(tenant, body).await.map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(expense)))
}
