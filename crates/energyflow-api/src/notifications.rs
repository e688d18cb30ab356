//! Handlers for `/notifications`.

use std::sync::Arc;

use axum::{
  Json,
  extract::State,
  http::{HeaderMap, StatusCode},
  response::{IntoResponse, Response},
};
use energyflow_core::{notification::NewNotification, store::RecordStore};
use serde_json::json;

use crate::{error::ApiError, etag::json_with_etag, tenant::ResolvedTenant};

/// `GET /notifications`, newest first.
pub async fn list<S: RecordStore + 'static>(
  State(store): State<Arc<S>>,
  ResolvedTenant(tenant): ResolvedTenant,
  headers: HeaderMap,
) -> Result<Response, ApiError> {
  let feed = store
    .list_notifications(tenant)
    .await
    .map_err(ApiError::from_store)?;
  json_with_etag(&headers, &feed)
}

/// `POST /notifications`
pub async fn push<S: RecordStore + 'static>(
  State(store): State<Arc<S>>,
  ResolvedTenant(tenant): ResolvedTenant,
  Json(body): Json<NewNotification>,
) -> Result<impl IntoResponse, ApiError> {
  let notification = store
    .push_notification(tenant, body.title, body.message)
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(notification)))
}

/// `POST /notifications/read-all`
pub async fn read_all<S: RecordStore + 'static>(
  State(store): State<Arc<S>>,
  ResolvedTenant(tenant): ResolvedTenant,
) -> Result<impl IntoResponse, ApiError> {
  let updated = store
    .mark_all_read(tenant)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(json!({ "updated": updated })))
}
