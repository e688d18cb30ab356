//! Handlers for `/branches` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/branches` | Optional `?type=gas\|fuel`; ETag |
//! | `POST`   | `/branches` | Body: a branch without `id` |
//! | `GET`    | `/branches/{id}` | 404 if not in the merged view |
//! | `PUT`    | `/branches/{id}` | Full replacement |
//! | `DELETE` | `/branches/{id}` | Removes the branch; idempotent |
//! | `POST`   | `/branches/{id}/archive` | Marks the branch inactive |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::{HeaderMap, StatusCode},
  response::{IntoResponse, Response},
};
use energyflow_core::{
  branch::{Branch, BranchType},
  store::RecordStore,
};
use serde::Deserialize;

use crate::{error::ApiError, etag::json_with_etag, tenant::ResolvedTenant};

#[derive(Debug, Deserialize)]
pub struct ListParams {
  #[serde(rename = "type")]
  pub branch_type: Option<BranchType>,
}

/// `GET /branches[?type=<gas|fuel>]`
pub async fn list<S: RecordStore + 'static>(
  State(store): State<Arc<S>>,
  ResolvedTenant(tenant): ResolvedTenant,
  Query(params): Query<ListParams>,
  headers: HeaderMap,
) -> Result<Response, ApiError> {
  let branches: Vec<Branch> = store
    .list_all::<Branch>(tenant)
    .await
    .map_err(ApiError::from_store)?
    .into_iter()
    .filter(|b| params.branch_type.is_none_or(|t| b.branch_type == t))
    .collect();
  json_with_etag(&headers, &branches)
}

/// `POST /branches`
pub async fn create<S: RecordStore + 'static>(
  State(store): State<Arc<S>>,
  ResolvedTenant(tenant): ResolvedTenant,
  Json(body): Json<Branch>,
) -> Result<impl IntoResponse, ApiError> {
  let branch = store.create(tenant, body).await.map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(branch)))
}

/// `GET /branches/{id}`
pub async fn get_one<S: RecordStore + 'static>(
  State(store): State<Arc<S>>,
  ResolvedTenant(tenant): ResolvedTenant,
  Path(id): Path<String>,
) -> Result<Json<Branch>, ApiError> {
  let branch = store
    .get::<Branch>(tenant, id.clone())
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound(format!("branch {id:?} not found")))?;
  Ok(Json(branch))
}

/// `PUT /branches/{id}`. The path id wins over any id in the body.
pub async fn update<S: RecordStore + 'static>(
  State(store): State<Arc<S>>,
  ResolvedTenant(tenant): ResolvedTenant,
  Path(id): Path<String>,
  Json(mut body): Json<Branch>,
) -> Result<Json<Branch>, ApiError> {
  body.id = id;
  let branch = store.update(tenant, body).await.map_err(ApiError::from_store)?;
  Ok(Json(branch))
}

/// `DELETE /branches/{id}`
pub async fn delete<S: RecordStore + 'static>(
  State(store): State<Arc<S>>,
  ResolvedTenant(tenant): ResolvedTenant,
  Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
  store
    .hard_delete::<Branch>(tenant, id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(StatusCode::NO_CONTENT)
}

/// `POST /branches/{id}/archive`
pub async fn archive<S: RecordStore + 'static>(
  State(store): State<Arc<S>>,
  ResolvedTenant(tenant): ResolvedTenant,
  Path(id): Path<String>,
) -> Result<Json<Branch>, ApiError> {
  let branch = store
    .soft_delete_branch(tenant, id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(branch))
}
