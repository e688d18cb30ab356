//! HTTP host for EnergyFlow.
//!
//! Mounts [`energyflow_api::api_router`] under `/api` and adds request
//! tracing. The binary in `main.rs` handles configuration and the listener.

use std::{path::PathBuf, sync::Arc};

use axum::Router;
use energyflow_core::{seed::Seed, store::RecordStore};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `ENERGYFLOW_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:           String,
  #[serde(default = "default_port")]
  pub port:           u16,
  #[serde(default = "default_store_path")]
  pub store_path:     PathBuf,
  /// Ship the demo operator's branches and ledgers as the baseline.
  #[serde(default = "default_seed_demo_data")]
  pub seed_demo_data: bool,
}

fn default_host() -> String { "127.0.0.1".to_owned() }

fn default_port() -> u16 { 8080 }

fn default_store_path() -> PathBuf { PathBuf::from("~/.local/share/energyflow/energyflow.db") }

fn default_seed_demo_data() -> bool { true }

impl ServerConfig {
  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  /// The baseline data the store is opened with.
  pub fn seed(&self) -> Seed {
    if self.seed_demo_data { Seed::demo() } else { Seed::empty() }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application router for `store`.
pub fn app<S>(store: Arc<S>) -> Router
where
  S: RecordStore + 'static,
{
  Router::new()
    .nest("/api", energyflow_api::api_router(store))
    .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
  use axum::{
    body::Body,
    http::{Request, StatusCode},
  };
  use energyflow_store_sqlite::SqliteStore;
  use tower::ServiceExt;

  use super::*;

  fn settings(pairs: &[(&str, &str)]) -> ServerConfig {
    let mut builder = config::Config::builder();
    for (key, value) in pairs {
      builder = builder.set_override(*key, *value).unwrap();
    }
    builder.build().unwrap().try_deserialize().unwrap()
  }

  #[test]
  fn defaults_fill_missing_keys() {
    let cfg = settings(&[]);
    assert_eq!(cfg.address(), "127.0.0.1:8080");
    assert!(cfg.seed_demo_data);
  }

  #[test]
  fn overrides_are_honoured() {
    let cfg = settings(&[("port", "9000"), ("seed_demo_data", "false")]);
    assert_eq!(cfg.port, 9000);
    assert!(cfg.seed().branches.is_empty());
  }

  #[tokio::test]
  async fn api_is_mounted_under_prefix() {
    let store = SqliteStore::open_in_memory(Arc::new(Seed::demo())).await.unwrap();
    let app = app(Arc::new(store));

    let response = app
      .clone()
      .oneshot(Request::get("/api/tenants").body(Body::empty()).unwrap())
      .await
      .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
      .oneshot(Request::get("/tenants").body(Body::empty()).unwrap())
      .await
      .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
  }
}
