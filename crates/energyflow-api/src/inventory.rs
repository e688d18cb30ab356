//! Handlers for `/inventory` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/inventory` | Optional `?branch_id`, `?kind`; items with derived status |
//! | `POST`   | `/inventory` | Adds stock |
//! | `DELETE` | `/inventory/{id}` | Idempotent |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::{HeaderMap, StatusCode},
  response::{IntoResponse, Response},
};
use energyflow_core::{
  branch::BranchType,
  inventory::{InventoryItem, InventorySummary, InventoryView},
  store::RecordStore,
};
use serde::{Deserialize, Serialize};

use crate::{error::ApiError, etag::json_with_etag, tenant::ResolvedTenant};

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub branch_id: Option<String>,
  pub kind:      Option<BranchType>,
}

#[derive(Debug, Serialize)]
pub struct InventoryResponse {
  pub items:   Vec<InventoryView>,
  pub summary: InventorySummary,
}

/// `GET /inventory[?branch_id=<id>&kind=<gas|fuel>]`
pub async fn list<S: RecordStore + 'static>(
  State(store): State<Arc<S>>,
  ResolvedTenant(tenant): ResolvedTenant,
  Query(params): Query<ListParams>,
  headers: HeaderMap,
) -> Result<Response, ApiError> {
  let items: Vec<InventoryItem> = store
    .list_all::<InventoryItem>(tenant)
    .await
    .map_err(ApiError::from_store)?
    .into_iter()
    .filter(|i| params.branch_id.as_deref().is_none_or(|b| i.branch_id == b))
    .filter(|i| params.kind.is_none_or(|k| i.kind == k))
    .collect();

  let summary = InventorySummary::compute(&items);
  let response = InventoryResponse {
    items: items.into_iter().map(InventoryView::from).collect(),
    summary,
  };
  json_with_etag(&headers, &response)
}

/// `POST /inventory`
pub async fn create<S: RecordStore + 'static>(
  State(store): State<Arc<S>>,
  ResolvedTenant(tenant): ResolvedTenant,
  Json(body): Json<InventoryItem>,
) -> Result<impl IntoResponse, ApiError> {
  let item = store.create(tenant, body).await.map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(InventoryView::from(item))))
}

/// `DELETE /inventory/{id}`
pub async fn delete<S: RecordStore + 'static>(
  State(store): State<Arc<S>>,
  ResolvedTenant(tenant): ResolvedTenant,
  Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
  store
    .hard_delete::<InventoryItem>(tenant, id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(StatusCode::NO_CONTENT)
}
