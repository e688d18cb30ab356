//! Handlers for `/tenants`: platform administration.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/tenants` | ETag |
//! | `POST`   | `/tenants` | New tenants start `active` |
//! | `GET`    | `/tenants/{id}` | 404 if unknown |
//! | `DELETE` | `/tenants/{id}` | Removes the tenant and all of its records |
//! | `POST`   | `/tenants/{id}/suspend` | |
//! | `POST`   | `/tenants/{id}/activate` | |
//! | `PUT`    | `/tenants/{id}/plan` | Body: `{"plan":"personal"}` |
//! | `GET`    | `/activity-logs` | Optional `?tenant_id=`; newest first |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::{HeaderMap, StatusCode},
  response::{IntoResponse, Response},
};
use energyflow_core::{
  store::RecordStore,
  tenant::{NewTenant, Plan, Tenant, TenantId, TenantStatus},
};
use serde::Deserialize;

use crate::{error::ApiError, etag::json_with_etag};

/// `GET /tenants`
pub async fn list<S: RecordStore + 'static>(
  State(store): State<Arc<S>>,
  headers: HeaderMap,
) -> Result<Response, ApiError> {
  let tenants = store.list_tenants().await.map_err(ApiError::from_store)?;
  json_with_etag(&headers, &tenants)
}

/// `POST /tenants`
pub async fn create<S: RecordStore + 'static>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewTenant>,
) -> Result<impl IntoResponse, ApiError> {
  let tenant = store.create_tenant(body).await.map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(tenant)))
}

/// `GET /tenants/{id}`
pub async fn get_one<S: RecordStore + 'static>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
) -> Result<Json<Tenant>, ApiError> {
  let tenant = store
    .get_tenant(TenantId::new(id.clone()))
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound(format!("tenant {id:?} not found")))?;
  Ok(Json(tenant))
}

/// `DELETE /tenants/{id}`
pub async fn delete<S: RecordStore + 'static>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
  store
    .delete_tenant(TenantId::new(id))
    .await
    .map_err(ApiError::from_store)?;
  Ok(StatusCode::NO_CONTENT)
}

/// `POST /tenants/{id}/suspend`
pub async fn suspend<S: RecordStore + 'static>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
) -> Result<Json<Tenant>, ApiError> {
  let tenant = store
    .set_tenant_status(TenantId::new(id), TenantStatus::Suspended)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(tenant))
}

/// `POST /tenants/{id}/activate`
pub async fn activate<S: RecordStore + 'static>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
) -> Result<Json<Tenant>, ApiError> {
  let tenant = store
    .set_tenant_status(TenantId::new(id), TenantStatus::Active)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(tenant))
}

#[derive(Debug, Deserialize)]
pub struct PlanBody {
  pub plan: Plan,
}

/// `PUT /tenants/{id}/plan`
pub async fn set_plan<S: RecordStore + 'static>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
  Json(body): Json<PlanBody>,
) -> Result<Json<Tenant>, ApiError> {
  let tenant = store
    .set_tenant_plan(TenantId::new(id), body.plan)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(tenant))
}

#[derive(Debug, Deserialize)]
pub struct ActivityParams {
  pub tenant_id: Option<String>,
}

/// `GET /activity-logs[?tenant_id=<id>]`
pub async fn activity<S: RecordStore + 'static>(
  State(store): State<Arc<S>>,
  Query(params): Query<ActivityParams>,
  headers: HeaderMap,
) -> Result<Response, ApiError> {
  let tenant = params.tenant_id.filter(|t| !t.trim().is_empty()).map(TenantId::new);
  let entries = store.list_activity(tenant).await.map_err(ApiError::from_store)?;
  json_with_etag(&headers, &entries)
}
