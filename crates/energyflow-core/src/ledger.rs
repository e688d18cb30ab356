//! Sales and expense ledgers: gas sales, fuel shift reconciliations, and
//! expenses. All three are recorded against a branch and ordered newest
//! first.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use validator::Validate;

use crate::{
  Result,
  aggregate::Dated,
  branch::BranchType,
  entity::{Entity, EntityKind},
  seed::Seed,
  tenant::TenantId,
  validate,
};

// ─── Gas sales ───────────────────────────────────────────────────────────────

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
  AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PaymentMethod {
  Cash,
  Transfer,
  Pos,
}

/// A gas cylinder sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct GasSale {
  #[serde(default)]
  pub id:             String,
  #[serde(default)]
  pub tenant_id:      TenantId,
  #[validate(length(min = 1, message = "is required"))]
  pub branch_id:      String,
  #[serde(default)]
  pub cylinder_size:  String,
  /// Kilograms sold.
  #[validate(range(exclusive_min = 0.0, message = "must be greater than zero"))]
  pub quantity:       f64,
  #[validate(range(exclusive_min = 0.0, message = "must be greater than zero"))]
  pub amount:         f64,
  pub payment_method: PaymentMethod,
  #[validate(length(min = 1, message = "is required"))]
  pub salesperson:    String,
  #[serde(default)]
  pub notes:          String,
  #[serde(default = "Utc::now")]
  pub created_at:     DateTime<Utc>,
}

impl Entity for GasSale {
  const KIND: EntityKind = EntityKind::GasSale;

  fn id(&self) -> &str { &self.id }

  fn set_id(&mut self, id: String) { self.id = id; }

  fn tenant_id(&self) -> &TenantId { &self.tenant_id }

  fn set_tenant_id(&mut self, tenant: TenantId) { self.tenant_id = tenant; }

  fn ordered_at(&self) -> Option<DateTime<Utc>> { Some(self.created_at) }

  fn baseline(seed: &Seed) -> &[Self] { &seed.gas_sales }

  fn check(&self) -> Result<()> { validate::check(self) }
}

impl Dated for GasSale {
  fn dated_at(&self) -> DateTime<Utc> { self.created_at }
}

// ─── Fuel shifts ─────────────────────────────────────────────────────────────

/// A pump shift reconciliation at a fuel station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct FuelShift {
  #[serde(default)]
  pub id:            String,
  #[serde(default)]
  pub tenant_id:     TenantId,
  #[validate(length(min = 1, message = "is required"))]
  pub branch_id:     String,
  #[validate(range(min = 1, message = "must be greater than zero"))]
  pub shift_number:  u32,
  #[validate(length(min = 1, message = "is required"))]
  pub pump_id:       String,
  #[serde(default)]
  pub salesperson:   String,
  #[validate(range(min = 0.0, message = "cannot be negative"))]
  pub start_reading: f64,
  #[validate(range(min = 0.0, message = "cannot be negative"))]
  pub end_reading:   f64,
  #[validate(range(exclusive_min = 0.0, message = "must be greater than zero"))]
  pub sales_amount:  f64,
  #[serde(default)]
  pub variance:      f64,
  #[serde(default = "Utc::now")]
  pub created_at:    DateTime<Utc>,
}

impl FuelShift {
  /// Litres dispensed over the shift; a meter that went backwards counts as
  /// zero.
  pub fn volume(&self) -> f64 { (self.end_reading - self.start_reading).max(0.0) }
}

impl Entity for FuelShift {
  const KIND: EntityKind = EntityKind::FuelShift;

  fn id(&self) -> &str { &self.id }

  fn set_id(&mut self, id: String) { self.id = id; }

  fn tenant_id(&self) -> &TenantId { &self.tenant_id }

  fn set_tenant_id(&mut self, tenant: TenantId) { self.tenant_id = tenant; }

  fn ordered_at(&self) -> Option<DateTime<Utc>> { Some(self.created_at) }

  fn baseline(seed: &Seed) -> &[Self] { &seed.fuel_shifts }

  fn check(&self) -> Result<()> { validate::check(self) }
}

impl Dated for FuelShift {
  fn dated_at(&self) -> DateTime<Utc> { self.created_at }
}

// ─── Expenses ────────────────────────────────────────────────────────────────

/// Expense taxonomy. Each category belongs to the gas or the fuel side;
/// `Other` is valid for both.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
  AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ExpenseCategory {
  CylinderRepair,
  SafetyInspection,
  Maintenance,
  PumpMaintenance,
  TankCleaning,
  FilterReplacement,
  Other,
}

impl ExpenseCategory {
  pub fn belongs_to(self, source: BranchType) -> bool {
    match self {
      Self::CylinderRepair | Self::SafetyInspection | Self::Maintenance => {
        source == BranchType::Gas
      }
      Self::PumpMaintenance | Self::TankCleaning | Self::FilterReplacement => {
        source == BranchType::Fuel
      }
      Self::Other => true,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Expense {
  #[serde(default)]
  pub id:          String,
  #[serde(default)]
  pub tenant_id:   TenantId,
  #[validate(length(min = 1, message = "is required"))]
  pub branch_id:   String,
  pub source:      BranchType,
  pub category:    ExpenseCategory,
  #[validate(range(exclusive_min = 0.0, message = "must be greater than zero"))]
  pub amount:      f64,
  #[validate(length(min = 1, message = "is required"))]
  pub description: String,
  #[serde(default = "Utc::now")]
  pub created_at:  DateTime<Utc>,
}

impl Entity for Expense {
  const KIND: EntityKind = EntityKind::Expense;

  fn id(&self) -> &str { &self.id }

  fn set_id(&mut self, id: String) { self.id = id; }

  fn tenant_id(&self) -> &TenantId { &self.tenant_id }

  fn set_tenant_id(&mut self, tenant: TenantId) { self.tenant_id = tenant; }

  fn ordered_at(&self) -> Option<DateTime<Utc>> { Some(self.created_at) }

  fn baseline(seed: &Seed) -> &[Self] { &seed.expenses }

  fn check(&self) -> Result<()> {
    let mut errors = validate::collect(self);
    if !self.category.belongs_to(self.source) {
      errors.push("category", &format!("is not a {} expense category", self.source));
    }
    validate::finish(errors)
  }
}

impl Dated for Expense {
  fn dated_at(&self) -> DateTime<Utc> { self.created_at }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;
  use crate::Error;

  fn sale(quantity: f64, amount: f64) -> GasSale {
    GasSale {
      id:             String::new(),
      tenant_id:      TenantId::new("t"),
      branch_id:      "branch-1".into(),
      cylinder_size:  "12.5kg".into(),
      quantity,
      amount,
      payment_method: PaymentMethod::Cash,
      salesperson:    "Ada".into(),
      notes:          String::new(),
      created_at:     Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap(),
    }
  }

  #[test]
  fn zero_and_negative_amounts_are_rejected() {
    let err = sale(0.0, -1.0).check().unwrap_err();
    match err {
      Error::Validation(v) => assert_eq!(v.field_names(), vec!["amount", "quantity"]),
      other => panic!("unexpected error: {other:?}"),
    }
  }

  #[test]
  fn missing_salesperson_is_rejected() {
    let mut s = sale(1.0, 1.0);
    s.salesperson.clear();
    let err = s.check().unwrap_err();
    assert!(matches!(err, Error::Validation(v) if v.field_names() == vec!["salesperson"]));
  }

  #[test]
  fn shift_volume_never_negative() {
    let shift = FuelShift {
      id:            String::new(),
      tenant_id:     TenantId::new("t"),
      branch_id:     "branch-3".into(),
      shift_number:  1,
      pump_id:       "pump-1".into(),
      salesperson:   String::new(),
      start_reading: 12500.0,
      end_reading:   12000.0,
      sales_amount:  1.0,
      variance:      0.0,
      created_at:    Utc::now(),
    };
    assert_eq!(shift.volume(), 0.0);
  }

  #[test]
  fn expense_category_must_match_source() {
    let mut expense = Expense {
      id:          String::new(),
      tenant_id:   TenantId::new("t"),
      branch_id:   "branch-1".into(),
      source:      BranchType::Gas,
      category:    ExpenseCategory::TankCleaning,
      amount:      100.0,
      description: "cleaning".into(),
      created_at:  Utc::now(),
    };
    let err = expense.check().unwrap_err();
    assert!(matches!(err, Error::Validation(v) if v.field_names() == vec!["category"]));

    expense.category = ExpenseCategory::Other;
    assert!(expense.check().is_ok());
  }
}
