//! Inventory items: gas cylinder stock and fuel tanks.
//!
//! Stock status is never stored. It is derived from the quantity against
//! per-branch-type thresholds every time an item is viewed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};
use validator::Validate;

use crate::{
  Result,
  branch::BranchType,
  entity::{Entity, EntityKind},
  seed::Seed,
  tenant::TenantId,
  validate,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StockStatus {
  InStock,
  LowStock,
  OutOfStock,
}

/// `(high, low)` thresholds: above `high` is in stock, above `low` is low
/// stock, anything else is out of stock.
pub fn stock_thresholds(kind: BranchType) -> (f64, f64) {
  match kind {
    BranchType::Gas => (100.0, 20.0),
    BranchType::Fuel => (2000.0, 500.0),
  }
}

pub fn stock_status(kind: BranchType, quantity: f64) -> StockStatus {
  let (high, low) = stock_thresholds(kind);
  if quantity > high {
    StockStatus::InStock
  } else if quantity > low {
    StockStatus::LowStock
  } else {
    StockStatus::OutOfStock
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct InventoryItem {
  #[serde(default)]
  pub id:           String,
  #[serde(default)]
  pub tenant_id:    TenantId,
  #[validate(length(min = 1, message = "is required"))]
  pub branch_id:    String,
  pub kind:         BranchType,
  /// Cylinder size (`12.5kg`) or fuel product (`PMS`, `AGO`, `DPK`).
  #[validate(length(min = 1, message = "is required"))]
  pub label:        String,
  #[validate(range(exclusive_min = 0.0, message = "must be greater than zero"))]
  pub quantity:     f64,
  #[validate(range(exclusive_min = 0.0, message = "must be greater than zero"))]
  pub unit_price:   f64,
  #[serde(default = "Utc::now")]
  pub last_updated: DateTime<Utc>,
}

impl InventoryItem {
  pub fn total_value(&self) -> f64 { self.quantity * self.unit_price }

  pub fn status(&self) -> StockStatus { stock_status(self.kind, self.quantity) }

  /// At or below the low threshold.
  pub fn is_low(&self) -> bool { self.quantity <= stock_thresholds(self.kind).1 }
}

impl Entity for InventoryItem {
  const KIND: EntityKind = EntityKind::InventoryItem;

  fn id(&self) -> &str { &self.id }

  fn set_id(&mut self, id: String) { self.id = id; }

  fn tenant_id(&self) -> &TenantId { &self.tenant_id }

  fn set_tenant_id(&mut self, tenant: TenantId) { self.tenant_id = tenant; }

  fn baseline(seed: &Seed) -> &[Self] { &seed.inventory }

  fn check(&self) -> Result<()> { validate::check(self) }
}

/// An item together with its derived value and status.
#[derive(Debug, Clone, Serialize)]
pub struct InventoryView {
  #[serde(flatten)]
  pub item:        InventoryItem,
  pub total_value: f64,
  pub status:      StockStatus,
}

impl From<InventoryItem> for InventoryView {
  fn from(item: InventoryItem) -> Self {
    let total_value = item.total_value();
    let status = item.status();
    Self { item, total_value, status }
  }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InventorySummary {
  pub total_quantity:  f64,
  pub total_value:     f64,
  pub low_stock_items: usize,
}

impl InventorySummary {
  pub fn compute(items: &[InventoryItem]) -> Self {
    Self {
      total_quantity:  crate::aggregate::aggregate(items, |i| i.quantity),
      total_value:     crate::aggregate::aggregate(items, InventoryItem::total_value),
      low_stock_items: crate::aggregate::count_where(items, InventoryItem::is_low),
    }
  }
}
