//! Daily stock reconciliation.
//!
//! Each branch keeps an append-only log of day records per branch type. A new
//! record opens with the previous record's closing stock and closes at
//! `opening + delivered - sold`. Records are never edited once written.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  Error, Result,
  aggregate::Dated,
  branch::BranchType,
  tenant::TenantId,
  validate::ValidationError,
};

/// A submission for one operating day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayRecordInput {
  pub branch_id: String,
  pub kind:      BranchType,
  pub date:      NaiveDate,
  pub delivered: f64,
  pub sold:      f64,
  #[serde(default)]
  pub notes:     String,
}

/// The computed stock movement for a submission.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DayTotals {
  pub opening_stock: f64,
  pub delivered:     f64,
  pub sold:          f64,
  pub closing_stock: f64,
}

/// A persisted day record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
  pub id:            String,
  pub tenant_id:     TenantId,
  pub branch_id:     String,
  pub kind:          BranchType,
  pub date:          NaiveDate,
  pub opening_stock: f64,
  pub delivered:     f64,
  pub sold:          f64,
  pub closing_stock: f64,
  pub notes:         String,
  pub recorded_at:   DateTime<Utc>,
}

impl DailyRecord {
  /// Assemble a record from a validated input and its computed totals.
  pub fn new(tenant_id: TenantId, input: DayRecordInput, totals: DayTotals) -> Self {
    Self {
      id: format!("daily-{}", Uuid::new_v4().simple()),
      tenant_id,
      branch_id: input.branch_id,
      kind: input.kind,
      date: input.date,
      opening_stock: totals.opening_stock,
      delivered: totals.delivered,
      sold: totals.sold,
      closing_stock: totals.closing_stock,
      notes: input.notes.trim().to_owned(),
      recorded_at: Utc::now(),
    }
  }
}

impl Dated for DailyRecord {
  fn dated_at(&self) -> DateTime<Utc> {
    self.date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc()).unwrap_or(self.recorded_at)
  }
}

/// Apply the reconciliation rule to a submission.
///
/// `previous_closing` is the closing stock of the latest record for the same
/// branch and kind, or `None` for the first record.
pub fn reconcile(previous_closing: Option<f64>, input: &DayRecordInput) -> Result<DayTotals> {
  let mut errors = ValidationError::default();
  if input.branch_id.trim().is_empty() {
    errors.push("branch_id", "is required");
  }
  if input.delivered < 0.0 {
    errors.push("delivered", "cannot be negative");
  }
  if input.sold < 0.0 {
    errors.push("sold", "cannot be negative");
  }
  crate::validate::finish(errors)?;

  let opening_stock = previous_closing.unwrap_or(0.0);
  let available = opening_stock + input.delivered;
  if input.sold > available {
    return Err(Error::StockExceeded { available, sold: input.sold });
  }

  Ok(DayTotals {
    opening_stock,
    delivered: input.delivered,
    sold: input.sold,
    closing_stock: available - input.sold,
  })
}
