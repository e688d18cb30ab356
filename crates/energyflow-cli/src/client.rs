//! Async HTTP client wrapping the EnergyFlow JSON API.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use energyflow_core::{
  aggregate::DayTotal,
  branch::{Branch, BranchType},
  daily::{DailyRecord, DayRecordInput},
  ledger::{FuelShift, GasSale},
  notification::Notification,
  report::DailyReport,
};
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, de::DeserializeOwned};

/// Connection settings for the EnergyFlow API.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
  pub base_url: String,
  /// Sent as `x-tenant-id`; without it the server uses the global tenant.
  pub tenant:   Option<String>,
}

/// Headline figures returned by the `/summary` endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct Summary {
  pub total:   f64,
  pub average: f64,
  pub count:   usize,
  pub daily:   Vec<DayTotal>,
}

/// Async HTTP client for the EnergyFlow JSON REST API.
///
/// Cheap to clone: the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String { api_url(&self.config.base_url, path) }

  fn scoped(&self, req: RequestBuilder) -> RequestBuilder {
    match &self.config.tenant {
      Some(tenant) => req.header("x-tenant-id", tenant),
      None => req,
    }
  }

  async fn send(&self, label: &str, req: RequestBuilder) -> Result<Response> {
    tracing::debug!(request = label, "sending");
    let resp = self
      .scoped(req)
      .send()
      .await
      .with_context(|| format!("{label} failed"))?;
    let status = resp.status();
    if !status.is_success() {
      let body = resp.text().await.unwrap_or_default();
      return Err(anyhow!("{label} → {status}: {body}"));
    }
    Ok(resp)
  }

  async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
    let label = format!("GET {path}");
    let resp = self
      .send(&label, self.client.get(self.url(path)).query(query))
      .await?;
    resp.json().await.with_context(|| format!("deserialising {path}"))
  }

  async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
  where
    B: serde::Serialize + ?Sized,
    T: DeserializeOwned,
  {
    let label = format!("POST {path}");
    let resp = self
      .send(&label, self.client.post(self.url(path)).json(body))
      .await?;
    resp.json().await.with_context(|| format!("deserialising {path}"))
  }

  // ── Branches ──────────────────────────────────────────────────────────────

  /// `GET /api/branches[?type=<gas|fuel>]`
  pub async fn list_branches(&self, kind: Option<BranchType>) -> Result<Vec<Branch>> {
    let query: Vec<(&str, String)> = kind.map(|k| ("type", k.to_string())).into_iter().collect();
    self.get("/branches", &query).await
  }

  // ── Ledgers ───────────────────────────────────────────────────────────────

  /// `GET /api/gas/sales[?branch_id=<id>]`
  pub async fn list_gas_sales(&self, branch: Option<&str>) -> Result<Vec<GasSale>> {
    self.get("/gas/sales", &branch_query(branch)).await
  }

  /// `POST /api/gas/sales`
  pub async fn record_gas_sale(&self, sale: &GasSale) -> Result<GasSale> {
    self.post("/gas/sales", sale).await
  }

  /// `GET /api/fuel/shifts[?branch_id=<id>]`
  pub async fn list_fuel_shifts(&self, branch: Option<&str>) -> Result<Vec<FuelShift>> {
    self.get("/fuel/shifts", &branch_query(branch)).await
  }

  /// `GET /api/{gas/sales|fuel/shifts}/summary`
  pub async fn summary(
    &self,
    source: BranchType,
    branch: Option<&str>,
    days: u32,
  ) -> Result<Summary> {
    let path = match source {
      BranchType::Gas => "/gas/sales/summary",
      BranchType::Fuel => "/fuel/shifts/summary",
    };
    let mut query = branch_query(branch);
    query.push(("days", days.to_string()));
    self.get(path, &query).await
  }

  // ── Daily records ─────────────────────────────────────────────────────────

  /// `GET /api/daily-records?branch_id=<id>&kind=<gas|fuel>`
  pub async fn list_days(&self, branch: &str, kind: BranchType) -> Result<Vec<DailyRecord>> {
    let query = [("branch_id", branch.to_owned()), ("kind", kind.to_string())];
    self.get("/daily-records", &query).await
  }

  /// `POST /api/daily-records`
  pub async fn record_day(&self, input: &DayRecordInput) -> Result<DailyRecord> {
    self.post("/daily-records", input).await
  }

  // ── Reports ───────────────────────────────────────────────────────────────

  /// `GET /api/reports/daily[?date=<YYYY-MM-DD>]`
  pub async fn daily_report(&self, date: Option<NaiveDate>) -> Result<DailyReport> {
    self.get("/reports/daily", &date_query(date)).await
  }

  /// `GET /api/reports/daily.csv[?date=<YYYY-MM-DD>]`
  pub async fn daily_report_csv(&self, date: Option<NaiveDate>) -> Result<String> {
    let req = self.client.get(self.url("/reports/daily.csv")).query(&date_query(date));
    let resp = self.send("GET /reports/daily.csv", req).await?;
    resp.text().await.context("reading CSV report")
  }

  // ── Notifications ─────────────────────────────────────────────────────────

  /// `GET /api/notifications`
  pub async fn notifications(&self) -> Result<Vec<Notification>> {
    self.get("/notifications", &[]).await
  }
}

/// Join `base_url` and an API path, tolerating a trailing slash on the base.
pub fn api_url(base_url: &str, path: &str) -> String {
  format!("{}/api{}", base_url.trim_end_matches('/'), path)
}

fn branch_query(branch: Option<&str>) -> Vec<(&'static str, String)> {
  branch.map(|b| ("branch_id", b.to_owned())).into_iter().collect()
}

fn date_query(date: Option<NaiveDate>) -> Vec<(&'static str, String)> {
  date.map(|d| ("date", d.to_string())).into_iter().collect()
}
