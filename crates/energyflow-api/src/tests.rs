//! Router tests against an in-memory SQLite store seeded with the demo data.

use std::sync::Arc;

use axum::{
  Router,
  body::{Body, Bytes, to_bytes},
  http::{HeaderMap, Method, Request, StatusCode, header},
};
use energyflow_core::seed::{DEMO_TENANT, Seed};
use energyflow_store_sqlite::SqliteStore;
use serde_json::{Value, json};
use tower::ServiceExt;

use crate::{api_router, tenant::TENANT_HEADER};

async fn app() -> Router {
  let store = SqliteStore::open_in_memory(Arc::new(Seed::demo()))
    .await
    .expect("in-memory store");
  api_router(Arc::new(store))
}

fn request(method: Method, uri: &str, tenant: Option<&str>, body: Option<Value>) -> Request<Body> {
  let mut builder = Request::builder().method(method).uri(uri);
  if let Some(tenant) = tenant {
    builder = builder.header(TENANT_HEADER, tenant);
  }
  match body {
    Some(body) => builder
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from(body.to_string()))
      .unwrap(),
    None => builder.body(Body::empty()).unwrap(),
  }
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, HeaderMap, Bytes) {
  let response = app.clone().oneshot(req).await.unwrap();
  let status = response.status();
  let headers = response.headers().clone();
  let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
  (status, headers, body)
}

async fn get_json(app: &Router, uri: &str, tenant: &str) -> (StatusCode, Value) {
  let (status, _, body) = send(app, request(Method::GET, uri, Some(tenant), None)).await;
  (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
}

async fn post_json(app: &Router, uri: &str, tenant: &str, body: Value) -> (StatusCode, Value) {
  let (status, _, body) = send(app, request(Method::POST, uri, Some(tenant), Some(body))).await;
  (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
}

fn new_branch(name: &str) -> Value {
  json!({ "name": name, "type": "gas", "location": "Kano, Nigeria" })
}

// ─── Branches ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn demo_tenant_sees_baseline_branches() {
  let app = app().await;
  let (status, body) = get_json(&app, "/branches", DEMO_TENANT).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body.as_array().unwrap().len(), 4);

  let (_, gas) = get_json(&app, "/branches?type=gas", DEMO_TENANT).await;
  let names: Vec<&str> = gas
    .as_array()
    .unwrap()
    .iter()
    .map(|b| b["name"].as_str().unwrap())
    .collect();
  assert!(names.contains(&"Lagos Gas Plant"));
  assert!(names.iter().all(|n| n.contains("Gas")));
}

#[tokio::test]
async fn tenants_do_not_see_each_others_branches() {
  let app = app().await;
  let (status, created) = post_json(&app, "/branches", DEMO_TENANT, new_branch("Kano Depot")).await;
  assert_eq!(status, StatusCode::CREATED);
  assert!(!created["id"].as_str().unwrap().is_empty());
  assert_eq!(created["tenant_id"], DEMO_TENANT);

  let (_, other) = get_json(&app, "/branches", "tenant-3").await;
  assert_eq!(other, json!([]));

  let id = created["id"].as_str().unwrap();
  let (status, _) = get_json(&app, &format!("/branches/{id}"), "tenant-3").await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn missing_tenant_header_uses_global_partition() {
  let app = app().await;
  let (status, _, body) = send(&app, request(Method::GET, "/branches", None, None)).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(serde_json::from_slice::<Value>(&body).unwrap(), json!([]));
}

#[tokio::test]
async fn blank_branch_name_is_a_field_error() {
  let app = app().await;
  let (status, body) = post_json(&app, "/branches", DEMO_TENANT, new_branch("")).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  let fields: Vec<&str> = body["fields"]
    .as_array()
    .unwrap()
    .iter()
    .map(|f| f["field"].as_str().unwrap())
    .collect();
  assert_eq!(fields, vec!["name"]);
}

#[tokio::test]
async fn unknown_branch_is_404() {
  let app = app().await;
  let (status, body) = get_json(&app, "/branches/branch-404", DEMO_TENANT).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert!(body["error"].as_str().unwrap().contains("branch-404"));
}

#[tokio::test]
async fn delete_then_archive_baseline_branch() {
  let app = app().await;
  let (status, archived) =
    post_json(&app, "/branches/branch-2/archive", DEMO_TENANT, json!({})).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(archived["status"], "inactive");

  for _ in 0..2 {
    let (status, _, _) = send(
      &app,
      request(Method::DELETE, "/branches/branch-1", Some(DEMO_TENANT), None),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
  }

  let (_, listed) = get_json(&app, "/branches", DEMO_TENANT).await;
  let ids: Vec<&str> = listed
    .as_array()
    .unwrap()
    .iter()
    .map(|b| b["id"].as_str().unwrap())
    .collect();
  assert!(!ids.contains(&"branch-1"));
  assert!(ids.contains(&"branch-2"));
}

// ─── ETag ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn unchanged_list_is_not_modified() {
  let app = app().await;
  let (status, headers, _) =
    send(&app, request(Method::GET, "/branches", Some(DEMO_TENANT), None)).await;
  assert_eq!(status, StatusCode::OK);
  let etag = headers[header::ETAG].to_str().unwrap().to_owned();

  let req = Request::builder()
    .uri("/branches")
    .header(TENANT_HEADER, DEMO_TENANT)
    .header(header::IF_NONE_MATCH, &etag)
    .body(Body::empty())
    .unwrap();
  let (status, _, body) = send(&app, req).await;
  assert_eq!(status, StatusCode::NOT_MODIFIED);
  assert!(body.is_empty());

  post_json(&app, "/branches", DEMO_TENANT, new_branch("Jos Depot")).await;
  let req = Request::builder()
    .uri("/branches")
    .header(TENANT_HEADER, DEMO_TENANT)
    .header(header::IF_NONE_MATCH, &etag)
    .body(Body::empty())
    .unwrap();
  let (status, headers, _) = send(&app, req).await;
  assert_eq!(status, StatusCode::OK);
  assert_ne!(headers[header::ETAG].to_str().unwrap(), etag);
}

// ─── Ledgers ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn gas_summary_covers_the_window() {
  let app = app().await;
  let (status, body) =
    get_json(&app, "/gas/sales/summary?end=2024-03-14&days=3", DEMO_TENANT).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["total"], 110_000.0);
  assert_eq!(body["count"], 1);
  let daily = body["daily"].as_array().unwrap();
  assert_eq!(daily.len(), 3);
  assert_eq!(daily[1], json!({ "date": "2024-03-13", "total": 110_000.0 }));
}

#[tokio::test]
async fn expense_outside_its_taxonomy_is_rejected() {
  let app = app().await;
  let (status, body) = post_json(
    &app,
    "/expenses",
    DEMO_TENANT,
    json!({
      "branch_id": "branch-1",
      "source": "fuel",
      "category": "cylinder_repair",
      "amount": 1000.0,
      "description": "wrong side",
    }),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
  assert!(body["fields"].to_string().contains("category"));
}

// ─── Daily records ───────────────────────────────────────────────────────────

#[tokio::test]
async fn overselling_is_unprocessable_and_leaves_no_record() {
  let app = app().await;
  let day = |delivered: f64, sold: f64| {
    json!({
      "branch_id": "branch-1",
      "kind": "gas",
      "date": "2024-03-15",
      "delivered": delivered,
      "sold": sold,
    })
  };

  let (status, first) = post_json(&app, "/daily-records", DEMO_TENANT, day(100.0, 40.0)).await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(first["closing_stock"], 60.0);

  let (status, _) = post_json(&app, "/daily-records", DEMO_TENANT, day(10.0, 71.0)).await;
  assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

  let (_, log) = get_json(&app, "/daily-records?branch_id=branch-1&kind=gas", DEMO_TENANT).await;
  assert_eq!(log.as_array().unwrap().len(), 1);
}

// ─── Reports ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn report_defaults_to_latest_activity() {
  let app = app().await;
  let (status, body) = get_json(&app, "/reports/daily", DEMO_TENANT).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["date"], "2024-03-14");
  assert_eq!(body["fuel"]["count"], 1);
  assert_eq!(body["gas"]["count"], 0);
}

#[tokio::test]
async fn csv_report_has_header_and_rows() {
  let app = app().await;
  let (status, headers, body) = send(
    &app,
    request(Method::GET, "/reports/daily.csv?date=2024-03-13", Some(DEMO_TENANT), None),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert!(headers[header::CONTENT_TYPE].to_str().unwrap().starts_with("text/csv"));
  assert!(
    headers[header::CONTENT_DISPOSITION]
      .to_str()
      .unwrap()
      .contains("daily-report-2024-03-13.csv")
  );
  let text = String::from_utf8(body.to_vec()).unwrap();
  let mut lines = text.lines();
  assert_eq!(lines.next(), Some("type,branch,volume,amount,recorded_at"));
  assert!(lines.next().unwrap().starts_with("gas,Lagos Gas Plant,20,110000,"));
}

// ─── Tenants and notifications ───────────────────────────────────────────────

#[tokio::test]
async fn tenant_lifecycle() {
  let app = app().await;
  let (status, created) = post_json(
    &app,
    "/tenants",
    DEMO_TENANT,
    json!({
      "name": "Delta Gas",
      "owner_email": "ops@deltagas.ng",
      "subscription_plan": "personal",
    }),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(created["status"], "active");
  let id = created["id"].as_str().unwrap().to_owned();

  let (status, suspended) =
    post_json(&app, &format!("/tenants/{id}/suspend"), DEMO_TENANT, json!({})).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(suspended["status"], "suspended");

  let (status, _, _) = send(
    &app,
    request(Method::DELETE, &format!("/tenants/{id}"), None, None),
  )
  .await;
  assert_eq!(status, StatusCode::NO_CONTENT);

  let (status, _) = get_json(&app, &format!("/tenants/{id}"), DEMO_TENANT).await;
  assert_eq!(status, StatusCode::NOT_FOUND);

  let (status, log) =
    get_json(&app, &format!("/activity-logs?tenant_id={id}"), DEMO_TENANT).await;
  assert_eq!(status, StatusCode::OK);
  let actions: Vec<&str> = log
    .as_array()
    .unwrap()
    .iter()
    .map(|e| e["action"].as_str().unwrap())
    .collect();
  assert_eq!(actions, vec!["tenant_deleted", "account_suspended", "tenant_created"]);
  assert_eq!(log[0]["tenant_name"], "Delta Gas");
}

#[tokio::test]
async fn activity_log_covers_every_tenant_without_a_filter() {
  let app = app().await;
  post_json(&app, "/tenants/tenant-2/suspend", DEMO_TENANT, json!({})).await;
  post_json(&app, "/tenants/tenant-2/activate", DEMO_TENANT, json!({})).await;
  let (status, _, _) = send(
    &app,
    request(
      Method::PUT,
      "/tenants/tenant-1/plan",
      None,
      Some(json!({ "plan": "personal" })),
    ),
  )
  .await;
  assert_eq!(status, StatusCode::OK);

  let (_, log) = get_json(&app, "/activity-logs", DEMO_TENANT).await;
  let entries: Vec<(&str, &str)> = log
    .as_array()
    .unwrap()
    .iter()
    .map(|e| (e["tenant_id"].as_str().unwrap(), e["action"].as_str().unwrap()))
    .collect();
  assert_eq!(entries, vec![
    ("tenant-1", "plan_changed"),
    ("tenant-2", "account_activated"),
    ("tenant-2", "account_suspended"),
  ]);
}

// ─── Users ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn users_are_listed_filtered_and_edited_per_tenant() {
  let app = app().await;
  let (status, all) = get_json(&app, "/users", DEMO_TENANT).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(all.as_array().unwrap().len(), 4);

  let (_, managers) = get_json(&app, "/users?role=gas_manager", DEMO_TENANT).await;
  assert_eq!(managers[0]["id"], "user-3");
  assert_eq!(managers.as_array().unwrap().len(), 1);

  let (_, on_branch_3) = get_json(&app, "/users?branch_id=branch-3", DEMO_TENANT).await;
  let ids: Vec<&str> = on_branch_3
    .as_array()
    .unwrap()
    .iter()
    .map(|u| u["id"].as_str().unwrap())
    .collect();
  assert_eq!(ids, vec!["user-2", "user-4"]);

  let (status, created) = post_json(
    &app,
    "/users",
    DEMO_TENANT,
    json!({
      "name": "Night Cashier",
      "email": "cashier@gasplant.com",
      "role": "sales_staff",
      "assigned_branches": ["branch-2"],
    }),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  let id = created["id"].as_str().unwrap().to_owned();
  assert!(id.starts_with("user-"));

  let (status, _, body) = send(
    &app,
    request(
      Method::PUT,
      &format!("/users/{id}"),
      Some(DEMO_TENANT),
      Some(json!({
        "id": "user-999",
        "name": "Night Cashier",
        "email": "cashier@gasplant.com",
        "role": "gas_manager",
      })),
    ),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  let updated: Value = serde_json::from_slice(&body).unwrap();
  assert_eq!(updated["id"], id.as_str());
  assert_eq!(updated["role"], "gas_manager");

  let (status, _) = get_json(&app, &format!("/users/{id}"), "tenant-3").await;
  assert_eq!(status, StatusCode::NOT_FOUND);

  let (status, _, _) =
    send(&app, request(Method::DELETE, "/users/user-5", Some(DEMO_TENANT), None)).await;
  assert_eq!(status, StatusCode::NO_CONTENT);
  let (status, _) = get_json(&app, "/users/user-5", DEMO_TENANT).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn user_with_bad_email_is_a_field_error() {
  let app = app().await;
  let (status, body) = post_json(
    &app,
    "/users",
    DEMO_TENANT,
    json!({ "name": "Cashier", "email": "cashier", "role": "sales_staff" }),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["fields"][0]["field"], "email");
}

#[tokio::test]
async fn notifications_push_and_read() {
  let app = app().await;
  let (status, _) = post_json(
    &app,
    "/notifications",
    DEMO_TENANT,
    json!({ "title": "Low stock", "message": "branch-1 is running low" }),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);

  let (_, feed) = get_json(&app, "/notifications", DEMO_TENANT).await;
  assert_eq!(feed[0]["read"], false);

  let (status, body) = post_json(&app, "/notifications/read-all", DEMO_TENANT, json!({})).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["updated"], 1);

  let (_, other) = get_json(&app, "/notifications", "tenant-3").await;
  assert_eq!(other, json!([]));
}
