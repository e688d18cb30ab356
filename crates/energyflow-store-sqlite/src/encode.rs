//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings and calendar days as
//! `YYYY-MM-DD`. Enum discriminants use their lowercase serde names. Entity
//! records are stored whole as compact JSON.

use chrono::{DateTime, NaiveDate, Utc};
use energyflow_core::{
  activity::{ActivityAction, ActivityEntry},
  branch::BranchType,
  daily::DailyRecord,
  entity::Entity,
  notification::Notification,
  tenant::{Plan, Tenant, TenantId, TenantStatus},
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_day(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_day(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Discriminants ───────────────────────────────────────────────────────────

fn decode_enum<T: std::str::FromStr>(what: &str, s: &str) -> Result<T> {
  s.parse()
    .map_err(|_| Error::Decode(format!("unknown {what}: {s:?}")))
}

// ─── Entities ────────────────────────────────────────────────────────────────

pub fn encode_entity<E: Entity>(record: &E) -> Result<String> {
  Ok(serde_json::to_string(record)?)
}

pub fn decode_entity<E: Entity>(body: &str) -> Result<E> { Ok(serde_json::from_str(body)?) }

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `tenants` row.
pub struct RawTenant {
  pub tenant_id:    String,
  pub name:         String,
  pub owner_name:   String,
  pub owner_email:  String,
  pub plan:         String,
  pub status:       String,
  pub branch_types: String,
  pub created_at:   String,
}

impl RawTenant {
  pub const COLUMNS: &'static str = "tenant_id, name, owner_name, owner_email, plan, status, \
                                     branch_types, created_at";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      tenant_id:    row.get(0)?,
      name:         row.get(1)?,
      owner_name:   row.get(2)?,
      owner_email:  row.get(3)?,
      plan:         row.get(4)?,
      status:       row.get(5)?,
      branch_types: row.get(6)?,
      created_at:   row.get(7)?,
    })
  }

  pub fn into_tenant(self) -> Result<Tenant> {
    Ok(Tenant {
      id:                TenantId::new(self.tenant_id),
      name:              self.name,
      owner_name:        self.owner_name,
      owner_email:       self.owner_email,
      subscription_plan: decode_enum::<Plan>("plan", &self.plan)?,
      status:            decode_enum::<TenantStatus>("tenant status", &self.status)?,
      branch_types:      serde_json::from_str(&self.branch_types)?,
      created_at:        decode_dt(&self.created_at)?,
    })
  }
}

/// Raw values read directly from a `daily_records` row.
pub struct RawDailyRecord {
  pub record_id:     String,
  pub tenant_id:     String,
  pub branch_id:     String,
  pub kind:          String,
  pub day:           String,
  pub opening_stock: f64,
  pub delivered:     f64,
  pub sold:          f64,
  pub closing_stock: f64,
  pub notes:         String,
  pub recorded_at:   String,
}

impl RawDailyRecord {
  pub const COLUMNS: &'static str = "record_id, tenant_id, branch_id, kind, day, opening_stock, \
                                     delivered, sold, closing_stock, notes, recorded_at";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      record_id:     row.get(0)?,
      tenant_id:     row.get(1)?,
      branch_id:     row.get(2)?,
      kind:          row.get(3)?,
      day:           row.get(4)?,
      opening_stock: row.get(5)?,
      delivered:     row.get(6)?,
      sold:          row.get(7)?,
      closing_stock: row.get(8)?,
      notes:         row.get(9)?,
      recorded_at:   row.get(10)?,
    })
  }

  pub fn into_record(self) -> Result<DailyRecord> {
    Ok(DailyRecord {
      id:            self.record_id,
      tenant_id:     TenantId::new(self.tenant_id),
      branch_id:     self.branch_id,
      kind:          decode_enum::<BranchType>("branch type", &self.kind)?,
      date:          decode_day(&self.day)?,
      opening_stock: self.opening_stock,
      delivered:     self.delivered,
      sold:          self.sold,
      closing_stock: self.closing_stock,
      notes:         self.notes,
      recorded_at:   decode_dt(&self.recorded_at)?,
    })
  }
}

/// Raw values read directly from a `notifications` row.
pub struct RawNotification {
  pub notification_id: String,
  pub tenant_id:       String,
  pub title:           String,
  pub message:         String,
  pub created_at:      String,
  pub read:            bool,
}

impl RawNotification {
  pub const COLUMNS: &'static str =
    "notification_id, tenant_id, title, message, created_at, read";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      notification_id: row.get(0)?,
      tenant_id:       row.get(1)?,
      title:           row.get(2)?,
      message:         row.get(3)?,
      created_at:      row.get(4)?,
      read:            row.get(5)?,
    })
  }

  pub fn into_notification(self) -> Result<Notification> {
    Ok(Notification {
      id:         self.notification_id,
      tenant_id:  TenantId::new(self.tenant_id),
      title:      self.title,
      message:    self.message,
      created_at: decode_dt(&self.created_at)?,
      read:       self.read,
    })
  }
}

/// Raw values read directly from an `activity_log` row.
pub struct RawActivity {
  pub entry_id:    String,
  pub tenant_id:   String,
  pub tenant_name: String,
  pub action:      String,
  pub description: String,
  pub created_at:  String,
}

impl RawActivity {
  pub const COLUMNS: &'static str =
    "entry_id, tenant_id, tenant_name, action, description, created_at";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      entry_id:    row.get(0)?,
      tenant_id:   row.get(1)?,
      tenant_name: row.get(2)?,
      action:      row.get(3)?,
      description: row.get(4)?,
      created_at:  row.get(5)?,
    })
  }

  pub fn into_entry(self) -> Result<ActivityEntry> {
    Ok(ActivityEntry {
      id:          self.entry_id,
      tenant_id:   TenantId::new(self.tenant_id),
      tenant_name: self.tenant_name,
      action:      decode_enum::<ActivityAction>("activity action", &self.action)?,
      description: self.description,
      created_at:  decode_dt(&self.created_at)?,
    })
  }
}
