//! The daily activity report: one row per gas sale or fuel shift recorded on
//! a calendar day, with per-source totals and CSV export.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  aggregate::aggregate,
  branch::{Branch, BranchType},
  ledger::{FuelShift, GasSale},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
  #[serde(rename = "type")]
  pub kind:        BranchType,
  /// Branch name, or the raw branch id when the branch is unknown.
  pub branch:      String,
  /// Kilograms for gas, litres dispensed for fuel.
  pub volume:      f64,
  pub amount:      f64,
  pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceTotals {
  pub volume: f64,
  pub amount: f64,
  pub count:  usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyReport {
  pub date: NaiveDate,
  pub rows: Vec<ReportRow>,
  pub gas:  SourceTotals,
  pub fuel: SourceTotals,
}

impl DailyReport {
  pub fn build(
    date: NaiveDate,
    branches: &[Branch],
    gas_sales: &[GasSale],
    fuel_shifts: &[FuelShift],
  ) -> Self {
    let names: HashMap<&str, &str> = branches
      .iter()
      .map(|b| (b.id.as_str(), b.name.as_str()))
      .collect();
    let branch_label = |id: &str| names.get(id).copied().unwrap_or(id).to_owned();

    let gas_rows = gas_sales
      .iter()
      .filter(|s| s.created_at.date_naive() == date)
      .map(|s| ReportRow {
        kind:        BranchType::Gas,
        branch:      branch_label(&s.branch_id),
        volume:      s.quantity,
        amount:      s.amount,
        recorded_at: s.created_at,
      });
    let fuel_rows = fuel_shifts
      .iter()
      .filter(|s| s.created_at.date_naive() == date)
      .map(|s| ReportRow {
        kind:        BranchType::Fuel,
        branch:      branch_label(&s.branch_id),
        volume:      s.volume(),
        amount:      s.sales_amount,
        recorded_at: s.created_at,
      });

    let mut rows: Vec<ReportRow> = gas_rows.chain(fuel_rows).collect();
    rows.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at));

    let gas = totals(&rows, BranchType::Gas);
    let fuel = totals(&rows, BranchType::Fuel);
    Self { date, rows, gas, fuel }
  }

  pub fn total_amount(&self) -> f64 { self.gas.amount + self.fuel.amount }

  /// Render the rows as CSV with the header
  /// `type,branch,volume,amount,recorded_at`.
  pub fn to_csv(&self) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
      .has_headers(false)
      .from_writer(Vec::new());
    writer
      .write_record(["type", "branch", "volume", "amount", "recorded_at"])
      .map_err(|e| Error::Export(e.to_string()))?;
    for row in &self.rows {
      let record: [String; 5] = [
        row.kind.to_string(),
        row.branch.clone(),
        row.volume.to_string(),
        row.amount.to_string(),
        row.recorded_at.to_rfc3339(),
      ];
      writer
        .write_record(&record)
        .map_err(|e| Error::Export(e.to_string()))?;
    }
    let bytes = writer
      .into_inner()
      .map_err(|e| Error::Export(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| Error::Export(e.to_string()))
  }
}

fn totals(rows: &[ReportRow], kind: BranchType) -> SourceTotals {
  let matching: Vec<&ReportRow> = rows.iter().filter(|r| r.kind == kind).collect();
  SourceTotals {
    volume: aggregate(&matching, |r| r.volume),
    amount: aggregate(&matching, |r| r.amount),
    count:  matching.len(),
  }
}

/// The most recent day with any gas or fuel activity, used as the default
/// report date.
pub fn latest_activity_date(
  gas_sales: &[GasSale],
  fuel_shifts: &[FuelShift],
) -> Option<NaiveDate> {
  gas_sales
    .iter()
    .map(|s| s.created_at)
    .chain(fuel_shifts.iter().map(|s| s.created_at))
    .max()
    .map(|ts| ts.date_naive())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::seed::Seed;

  fn day(y: i32, m: u32, d: u32) -> NaiveDate { NaiveDate::from_ymd_opt(y, m, d).unwrap() }

  #[test]
  fn seed_report_for_shift_day() {
    let seed = Seed::demo();
    let report =
      DailyReport::build(day(2024, 3, 14), &seed.branches, &seed.gas_sales, &seed.fuel_shifts);
    assert_eq!(report.rows.len(), 1);
    assert_eq!(report.rows[0].branch, "Victoria Island Fuel Station");
    assert_eq!(report.fuel.volume, 500.0);
    assert_eq!(report.fuel.amount, 325_000.0);
    assert_eq!(report.gas, SourceTotals::default());
  }

  #[test]
  fn unknown_branch_falls_back_to_id() {
    let seed = Seed::demo();
    let report = DailyReport::build(day(2024, 3, 13), &[], &seed.gas_sales, &[]);
    assert_eq!(report.rows[0].branch, "branch-1");
    assert_eq!(report.gas.count, 1);
    assert_eq!(report.total_amount(), 110_000.0);
  }

  #[test]
  fn latest_activity_picks_newest_record() {
    let seed = Seed::demo();
    assert_eq!(
      latest_activity_date(&seed.gas_sales, &seed.fuel_shifts),
      Some(day(2024, 3, 14))
    );
    assert_eq!(latest_activity_date(&[], &[]), None);
  }

  #[test]
  fn csv_has_header_and_one_line_per_row() {
    let seed = Seed::demo();
    let report =
      DailyReport::build(day(2024, 3, 13), &seed.branches, &seed.gas_sales, &seed.fuel_shifts);
    let csv = report.to_csv().unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "type,branch,volume,amount,recorded_at");
    assert_eq!(lines.len(), 2);
    assert!(lines[1].starts_with("gas,Lagos Gas Plant,20,110000,2024-03-13T10:00:00"));
  }

  #[test]
  fn empty_report_is_header_only() {
    let report = DailyReport::build(day(2020, 1, 1), &[], &[], &[]);
    assert_eq!(report.to_csv().unwrap(), "type,branch,volume,amount,recorded_at\n");
  }
}
