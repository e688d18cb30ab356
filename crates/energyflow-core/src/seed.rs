//! Baseline reference data shipped with the system.
//!
//! A [`Seed`] is handed to the store when it is opened. Baseline records are
//! never written to; tenants shadow them with override records and suppress
//! them through the removal set.

use chrono::{DateTime, NaiveDate, Utc};

use crate::{
  branch::{Branch, BranchStatus, BranchType},
  inventory::InventoryItem,
  ledger::{Expense, ExpenseCategory, FuelShift, GasSale, PaymentMethod},
  tenant::{Plan, Role, Tenant, TenantId, TenantStatus},
  user::User,
};

#[derive(Debug, Clone, Default)]
pub struct Seed {
  pub tenants:     Vec<Tenant>,
  pub branches:    Vec<Branch>,
  pub gas_sales:   Vec<GasSale>,
  pub fuel_shifts: Vec<FuelShift>,
  pub expenses:    Vec<Expense>,
  pub inventory:   Vec<InventoryItem>,
  pub users:       Vec<User>,
}

/// Fixed UTC timestamp for seed rows.
fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
  NaiveDate::from_ymd_opt(y, m, d)
    .and_then(|date| date.and_hms_opt(h, 0, 0))
    .map(|dt| dt.and_utc())
    .unwrap_or_default()
}

fn tenant(
  id: &str,
  name: &str,
  owner: (&str, &str),
  plan: Plan,
  status: TenantStatus,
  branch_types: &[BranchType],
  created_at: DateTime<Utc>,
) -> Tenant {
  Tenant {
    id: TenantId::new(id),
    name: name.to_owned(),
    owner_name: owner.0.to_owned(),
    owner_email: owner.1.to_owned(),
    subscription_plan: plan,
    status,
    branch_types: branch_types.to_vec(),
    created_at,
  }
}

fn branch(
  id: &str,
  name: &str,
  branch_type: BranchType,
  location: &str,
  manager: &str,
) -> Branch {
  Branch {
    id: id.to_owned(),
    tenant_id: TenantId::new(DEMO_TENANT),
    name: name.to_owned(),
    branch_type,
    location: location.to_owned(),
    status: BranchStatus::Active,
    manager_id: Some(manager.to_owned()),
    created_at: at(2024, 1, 15, 8),
  }
}

fn stock(
  id: &str,
  branch_id: &str,
  kind: BranchType,
  label: &str,
  quantity: f64,
  unit_price: f64,
) -> InventoryItem {
  InventoryItem {
    id: id.to_owned(),
    tenant_id: TenantId::new(DEMO_TENANT),
    branch_id: branch_id.to_owned(),
    kind,
    label: label.to_owned(),
    quantity,
    unit_price,
    last_updated: at(2024, 3, 1, 9),
  }
}

fn expense(
  id: &str,
  branch_id: &str,
  source: BranchType,
  category: ExpenseCategory,
  amount: f64,
  description: &str,
  created_at: DateTime<Utc>,
) -> Expense {
  Expense {
    id: id.to_owned(),
    tenant_id: TenantId::new(DEMO_TENANT),
    branch_id: branch_id.to_owned(),
    source,
    category,
    amount,
    description: description.to_owned(),
    created_at,
  }
}

fn user(
  id: &str,
  tenant: &str,
  (name, email): (&str, &str),
  role: Role,
  branches: &[&str],
  types: &[BranchType],
) -> User {
  User {
    id: id.to_owned(),
    tenant_id: TenantId::new(tenant),
    name: name.to_owned(),
    email: email.to_owned(),
    role,
    assigned_branches: branches.iter().map(|b| (*b).to_owned()).collect(),
    assigned_branch_types: types.to_vec(),
    created_at: at(2024, 1, 15, 9),
  }
}

/// The tenant that owns the demo branches and ledgers.
pub const DEMO_TENANT: &str = "tenant-2";

impl Seed {
  /// An empty baseline: every record comes from tenant writes.
  pub fn empty() -> Self { Self::default() }

  /// The demo operator with two gas plants and two fuel stations.
  pub fn demo() -> Self {
    use BranchType::{Fuel, Gas};

    let tenants = vec![
      tenant(
        "tenant-1",
        "EnergyFlow Admin",
        ("System Admin", "admin@energyflow.com"),
        Plan::Organisation,
        TenantStatus::Active,
        &[],
        at(2024, 1, 1, 0),
      ),
      tenant(
        DEMO_TENANT,
        "Gas & Fuel Solutions Ltd",
        ("Organization Owner", "owner@gasandfuel.com"),
        Plan::Organisation,
        TenantStatus::Active,
        &[Gas, Fuel],
        at(2024, 1, 15, 0),
      ),
      tenant(
        "tenant-3",
        "Metro Gas Distribution",
        ("John Adebayo", "john@metrogas.com"),
        Plan::Organisation,
        TenantStatus::Active,
        &[Gas],
        at(2024, 2, 1, 0),
      ),
      tenant(
        "tenant-4",
        "QuickFuel Stations",
        ("Sarah Mohammed", "sarah@quickfuel.com"),
        Plan::Personal,
        TenantStatus::Active,
        &[Fuel],
        at(2024, 2, 10, 0),
      ),
      tenant(
        "tenant-5",
        "Energy Hub Nigeria",
        ("David Okonkwo", "david@energyhub.ng"),
        Plan::Organisation,
        TenantStatus::Suspended,
        &[Gas, Fuel],
        at(2024, 1, 20, 0),
      ),
      tenant(
        "tenant-6",
        "Prime Gas & Oil",
        ("Amina Bello", "amina@primegas.com"),
        Plan::Personal,
        TenantStatus::Active,
        &[Gas],
        at(2024, 2, 20, 0),
      ),
    ];

    let branches = vec![
      branch("branch-1", "Lagos Gas Plant", Gas, "Lagos, Nigeria", "user-3"),
      branch("branch-2", "Ibadan Gas Plant", Gas, "Ibadan, Nigeria", "user-3"),
      branch("branch-3", "Victoria Island Fuel Station", Fuel, "Lagos, Nigeria", "user-4"),
      branch("branch-4", "Abuja Fuel Station", Fuel, "Abuja, Nigeria", "user-4"),
    ];

    let gas_sales = vec![GasSale {
      id:             "trans-1".to_owned(),
      tenant_id:      TenantId::new(DEMO_TENANT),
      branch_id:      "branch-1".to_owned(),
      cylinder_size:  "12.5kg".to_owned(),
      quantity:       20.0,
      amount:         110_000.0,
      payment_method: PaymentMethod::Cash,
      salesperson:    "Sales Staff".to_owned(),
      notes:          "Regular customer sales".to_owned(),
      created_at:     at(2024, 3, 13, 10),
    }];

    let fuel_shifts = vec![FuelShift {
      id:            "shift-1".to_owned(),
      tenant_id:     TenantId::new(DEMO_TENANT),
      branch_id:     "branch-3".to_owned(),
      shift_number:  1,
      pump_id:       "pump-1".to_owned(),
      salesperson:   String::new(),
      start_reading: 12_000.0,
      end_reading:   12_500.0,
      sales_amount:  325_000.0,
      variance:      0.0,
      created_at:    at(2024, 3, 14, 18),
    }];

    let expenses = vec![
      expense(
        "exp-1",
        "branch-1",
        Gas,
        ExpenseCategory::CylinderRepair,
        25_000.0,
        "Repair of 3 damaged cylinders",
        at(2024, 3, 14, 11),
      ),
      expense(
        "exp-2",
        "branch-1",
        Gas,
        ExpenseCategory::SafetyInspection,
        15_000.0,
        "Monthly safety inspection",
        at(2024, 3, 13, 11),
      ),
      expense(
        "fexp-1",
        "branch-3",
        Fuel,
        ExpenseCategory::PumpMaintenance,
        45_000.0,
        "Pump 1 and 2 maintenance service",
        at(2024, 3, 14, 12),
      ),
      expense(
        "fexp-2",
        "branch-3",
        Fuel,
        ExpenseCategory::TankCleaning,
        30_000.0,
        "Main storage tank cleaning and inspection",
        at(2024, 3, 13, 12),
      ),
      expense(
        "fexp-3",
        "branch-3",
        Fuel,
        ExpenseCategory::FilterReplacement,
        15_000.0,
        "Fuel filter replacement",
        at(2024, 3, 12, 12),
      ),
    ];

    let inventory = vec![
      stock("cyl-1", "branch-1", Gas, "12.5kg", 150.0, 3_500.0),
      stock("cyl-2", "branch-1", Gas, "25kg", 85.0, 6_500.0),
      stock("cyl-3", "branch-1", Gas, "50kg", 45.0, 12_000.0),
      stock("cyl-4", "branch-2", Gas, "12.5kg", 120.0, 3_500.0),
      stock("fuel-1", "branch-3", Fuel, "PMS", 5_000.0, 650.0),
      stock("fuel-2", "branch-3", Fuel, "AGO", 3_000.0, 850.0),
      stock("fuel-3", "branch-3", Fuel, "DPK", 1_500.0, 750.0),
    ];

    let users = vec![
      user(
        "user-1",
        "tenant-1",
        ("Admin User", "admin@energyflow.com"),
        Role::SuperAdmin,
        &[],
        &[],
      ),
      user(
        "user-2",
        DEMO_TENANT,
        ("Organization Owner", "owner@gasandfuel.com"),
        Role::OrgOwner,
        &["branch-1", "branch-2", "branch-3", "branch-4"],
        &[Gas, Fuel],
      ),
      user(
        "user-3",
        DEMO_TENANT,
        ("Gas Branch Manager", "manager@gasplant.com"),
        Role::GasManager,
        &["branch-1", "branch-2"],
        &[Gas],
      ),
      user(
        "user-4",
        DEMO_TENANT,
        ("Fuel Station Manager", "manager@fuelstation.com"),
        Role::FuelManager,
        &["branch-3"],
        &[Fuel],
      ),
      user(
        "user-5",
        DEMO_TENANT,
        ("Sales Staff", "staff@gasplant.com"),
        Role::SalesStaff,
        &["branch-1"],
        &[Gas],
      ),
    ];

    Self { tenants, branches, gas_sales, fuel_shifts, expenses, inventory, users }
  }
}
