//! Handlers for `/users`.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/users` | Optional `?role=` and `?branch_id=`; ETag |
//! | `POST`   | `/users` | Body: a user without `id` |
//! | `GET`    | `/users/{id}` | 404 if not in the merged view |
//! | `PUT`    | `/users/{id}` | Full replacement |
//! | `DELETE` | `/users/{id}` | Idempotent |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::{HeaderMap, StatusCode},
  response::{IntoResponse, Response},
};
use energyflow_core::{store::RecordStore, tenant::Role, user::User};
use serde::Deserialize;

use crate::{error::ApiError, etag::json_with_etag, tenant::ResolvedTenant};

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub role:      Option<Role>,
  pub branch_id: Option<String>,
}

/// `GET /users[?role=<role>][&branch_id=<id>]`
pub async fn list<S: RecordStore + 'static>(
  State(store): State<Arc<S>>,
  ResolvedTenant(tenant): ResolvedTenant,
  Query(params): Query<ListParams>,
  headers: HeaderMap,
) -> Result<Response, ApiError> {
  let users: Vec<User> = store
    .list_all::<User>(tenant)
    .await
    .map_err(ApiError::from_store)?
    .into_iter()
    .filter(|u| params.role.is_none_or(|r| u.role == r))
    .filter(|u| params.branch_id.as_deref().is_none_or(|b| u.is_assigned_to(b)))
    .collect();
  json_with_etag(&headers, &users)
}

/// `POST /users`
pub async fn create<S: RecordStore + 'static>(
  State(store): State<Arc<S>>,
  ResolvedTenant(tenant): ResolvedTenant,
  Json(body): Json<User>,
) -> Result<impl IntoResponse, ApiError> {
  let user = store.create(tenant, body).await.map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(user)))
}

/// `GET /users/{id}`
pub async fn get_one<S: RecordStore + 'static>(
  State(store): State<Arc<S>>,
  ResolvedTenant(tenant): ResolvedTenant,
  Path(id): Path<String>,
) -> Result<Json<User>, ApiError> {
  let user = store
    .get::<User>(tenant, id.clone())
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound(format!("user {id:?} not found")))?;
  Ok(Json(user))
}

/// `PUT /users/{id}`. The path id wins over any id in the body.
pub async fn update<S: RecordStore + 'static>(
  State(store): State<Arc<S>>,
  ResolvedTenant(tenant): ResolvedTenant,
  Path(id): Path<String>,
  Json(mut body): Json<User>,
) -> Result<Json<User>, ApiError> {
  body.id = id;
  let user = store.update(tenant, body).await.map_err(ApiError::from_store)?;
  Ok(Json(user))
}

/// `DELETE /users/{id}`
pub async fn delete<S: RecordStore + 'static>(
  State(store): State<Arc<S>>,
  ResolvedTenant(tenant): ResolvedTenant,
  Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
  store
    .hard_delete::<User>(tenant, id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(StatusCode::NO_CONTENT)
}
