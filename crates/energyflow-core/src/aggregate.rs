//! Derived metrics over record lists: sums, averages, counts, month buckets.
//!
//! Everything here is pure. Inputs are borrowed and never mutated, and an
//! empty input always yields zero (never `NaN`) or an empty grouping.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Records that carry a timestamp for calendar grouping.
pub trait Dated {
  fn dated_at(&self) -> DateTime<Utc>;
}

/// Sum `metric` across all records.
pub fn aggregate<T>(records: &[T], metric: impl Fn(&T) -> f64) -> f64 {
  records.iter().map(metric).sum()
}

/// Mean of `metric` across all records; `0.0` for an empty list.
pub fn average<T>(records: &[T], metric: impl Fn(&T) -> f64) -> f64 {
  if records.is_empty() {
    return 0.0;
  }
  aggregate(records, metric) / records.len() as f64
}

pub fn count_where<T>(records: &[T], predicate: impl Fn(&T) -> bool) -> usize {
  records.iter().filter(|r| predicate(*r)).count()
}

/// The `YYYY-MM` bucket key for a timestamp (UTC calendar).
pub fn month_key(ts: DateTime<Utc>) -> String {
  format!("{:04}-{:02}", ts.year(), ts.month())
}

/// One calendar month of records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthBucket<'a, T> {
  pub month:   String,
  pub records: Vec<&'a T>,
}

/// Partition records by calendar month, most recent month first. Records keep
/// their input order inside a bucket.
pub fn group_by_month<T: Dated>(records: &[T]) -> Vec<MonthBucket<'_, T>> {
  let mut groups: BTreeMap<String, Vec<&T>> = BTreeMap::new();
  for record in records {
    groups.entry(month_key(record.dated_at())).or_default().push(record);
  }
  groups
    .into_iter()
    .rev()
    .map(|(month, records)| MonthBucket { month, records })
    .collect()
}

// ─── Summaries ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthTotal {
  pub month: String,
  pub total: f64,
  pub count: usize,
}

/// Headline figures for a sales ledger.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesSummary {
  pub total:   f64,
  pub average: f64,
  pub count:   usize,
  /// Most recent month first.
  pub months:  Vec<MonthTotal>,
}

impl SalesSummary {
  pub fn compute<T: Dated>(records: &[T], metric: impl Fn(&T) -> f64) -> Self {
    let months = group_by_month(records)
      .into_iter()
      .map(|bucket| MonthTotal {
        total: bucket.records.iter().map(|r| metric(*r)).sum(),
        count: bucket.records.len(),
        month: bucket.month,
      })
      .collect();

    Self {
      total: aggregate(records, &metric),
      average: average(records, &metric),
      count: records.len(),
      months,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayTotal {
  pub date:  NaiveDate,
  pub total: f64,
}

/// Per-day totals for the `days`-long window ending on `end` (inclusive),
/// oldest day first. Days with no records total zero.
pub fn daily_series<T: Dated>(
  records: &[T],
  metric: impl Fn(&T) -> f64,
  end: NaiveDate,
  days: u32,
) -> Vec<DayTotal> {
  (0..days)
    .rev()
    .map(|offset| {
      let date = end - Duration::days(i64::from(offset));
      let total = records
        .iter()
        .filter(|r| r.dated_at().date_naive() == date)
        .map(&metric)
        .sum();
      DayTotal { date, total }
    })
    .collect()
}
