//! `energyflow`: command-line client for the EnergyFlow dashboard API.
//!
//! # Usage
//!
//! ```
//! energyflow --url http://localhost:8080 --tenant tenant-2 branches
//! energyflow --config ~/.config/energyflow/config.toml report --csv
//! ```

mod client;

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use client::{ApiClient, ApiConfig};
use energyflow_core::{
  branch::BranchType,
  daily::DayRecordInput,
  ledger::{GasSale, PaymentMethod},
  tenant::TenantId,
};
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

const DEFAULT_URL: &str = "http://localhost:8080";

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "energyflow", about = "Command-line client for the EnergyFlow API")]
struct Args {
  /// Path to a TOML config file (url, tenant).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Base URL of the EnergyFlow server (default: http://localhost:8080).
  #[arg(long, env = "ENERGYFLOW_URL")]
  url: Option<String>,

  /// Tenant to act as.
  #[arg(long, env = "ENERGYFLOW_TENANT")]
  tenant: Option<String>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// List branches.
  Branches {
    #[arg(long = "type")]
    kind: Option<BranchType>,
  },
  /// List gas sales, newest first.
  GasSales {
    #[arg(long)]
    branch: Option<String>,
  },
  /// Record a gas cylinder sale.
  RecordGas {
    #[arg(long)]
    branch:      String,
    #[arg(long, default_value = "12.5kg")]
    cylinder:    String,
    #[arg(long)]
    quantity:    f64,
    #[arg(long)]
    amount:      f64,
    #[arg(long, default_value = "cash")]
    payment:     PaymentMethod,
    #[arg(long)]
    salesperson: String,
    #[arg(long, default_value = "")]
    notes:       String,
  },
  /// List fuel pump shifts, newest first.
  FuelShifts {
    #[arg(long)]
    branch: Option<String>,
  },
  /// Sales totals with a per-day trend.
  Summary {
    source: BranchType,
    #[arg(long)]
    branch: Option<String>,
    #[arg(long, default_value_t = 7)]
    days:   u32,
  },
  /// Record a day of stock movement for a branch.
  Day {
    #[arg(long)]
    branch:    String,
    #[arg(long)]
    kind:      BranchType,
    /// Defaults to today (UTC).
    #[arg(long)]
    date:      Option<NaiveDate>,
    #[arg(long, default_value_t = 0.0)]
    delivered: f64,
    #[arg(long)]
    sold:      f64,
    #[arg(long, default_value = "")]
    notes:     String,
  },
  /// Show a branch's day records, newest first.
  Days {
    #[arg(long)]
    branch: String,
    #[arg(long)]
    kind:   BranchType,
  },
  /// Daily activity report.
  Report {
    #[arg(long)]
    date: Option<NaiveDate>,
    /// Print the CSV export instead of a table.
    #[arg(long)]
    csv:  bool,
  },
  /// Show the notification feed.
  Notifications,
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default, Debug)]
struct ConfigFile {
  #[serde(default)]
  url:    String,
  #[serde(default)]
  tenant: String,
}

/// CLI flags and env override the config file, which overrides defaults.
fn resolve_config(url: Option<String>, tenant: Option<String>, file: ConfigFile) -> ApiConfig {
  ApiConfig {
    base_url: url
      .or_else(|| (!file.url.is_empty()).then(|| file.url.clone()))
      .unwrap_or_else(|| DEFAULT_URL.to_owned()),
    tenant:   tenant.or_else(|| (!file.tenant.is_empty()).then(|| file.tenant.clone())),
  }
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .init();

  let args = Args::parse();

  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  let client = ApiClient::new(resolve_config(args.url, args.tenant, file_cfg))?;
  run(&client, args.command).await
}

async fn run(client: &ApiClient, command: Command) -> Result<()> {
  match command {
    Command::Branches { kind } => {
      for b in client.list_branches(kind).await? {
        println!("{:<12} {:<5} {:<9} {:<32} {}", b.id, b.branch_type, b.status, b.name, b.location);
      }
    }
    Command::GasSales { branch } => {
      for s in client.list_gas_sales(branch.as_deref()).await? {
        println!(
          "{}  {:<10} {:<8} {:>6} {:>12.2} {}",
          s.created_at.format("%Y-%m-%d %H:%M"),
          s.branch_id,
          s.cylinder_size,
          s.quantity,
          s.amount,
          s.payment_method,
        );
      }
    }
    Command::RecordGas { branch, cylinder, quantity, amount, payment, salesperson, notes } => {
      let sale = GasSale {
        id: String::new(),
        tenant_id: TenantId::default(),
        branch_id: branch,
        cylinder_size: cylinder,
        quantity,
        amount,
        payment_method: payment,
        salesperson,
        notes,
        created_at: Utc::now(),
      };
      let saved = client.record_gas_sale(&sale).await?;
      println!("recorded {}", saved.id);
    }
    Command::FuelShifts { branch } => {
      for s in client.list_fuel_shifts(branch.as_deref()).await? {
        println!(
          "{}  {:<10} shift {:<3} {:<8} {:>10.1} L {:>12.2}",
          s.created_at.format("%Y-%m-%d %H:%M"),
          s.branch_id,
          s.shift_number,
          s.pump_id,
          s.volume(),
          s.sales_amount,
        );
      }
    }
    Command::Summary { source, branch, days } => {
      let summary = client.summary(source, branch.as_deref(), days).await?;
      println!(
        "{source}: total {:.2}  average {:.2}  records {}",
        summary.total, summary.average, summary.count
      );
      for day in summary.daily {
        println!("  {}  {:>12.2}", day.date, day.total);
      }
    }
    Command::Day { branch, kind, date, delivered, sold, notes } => {
      let input = DayRecordInput {
        branch_id: branch,
        kind,
        date: date.unwrap_or_else(|| Utc::now().date_naive()),
        delivered,
        sold,
        notes,
      };
      let record = client.record_day(&input).await?;
      println!(
        "{} {}: opening {} + delivered {} - sold {} = closing {}",
        record.date,
        record.branch_id,
        record.opening_stock,
        record.delivered,
        record.sold,
        record.closing_stock,
      );
    }
    Command::Days { branch, kind } => {
      for r in client.list_days(&branch, kind).await? {
        println!(
          "{}  open {:>10} in {:>10} out {:>10} close {:>10}",
          r.date, r.opening_stock, r.delivered, r.sold, r.closing_stock
        );
      }
    }
    Command::Report { date, csv: true } => {
      print!("{}", client.daily_report_csv(date).await?);
    }
    Command::Report { date, csv: false } => {
      let report = client.daily_report(date).await?;
      println!("Report for {}", report.date);
      for row in &report.rows {
        println!(
          "  {:<4} {:<32} {:>10} {:>12.2}  {}",
          row.kind,
          row.branch,
          row.volume,
          row.amount,
          row.recorded_at.format("%H:%M"),
        );
      }
      println!("  gas:  {} records, {:.2}", report.gas.count, report.gas.amount);
      println!("  fuel: {} records, {:.2}", report.fuel.count, report.fuel.amount);
    }
    Command::Notifications => {
      for n in client.notifications().await? {
        let marker = if n.read { ' ' } else { '*' };
        println!("{marker} {}  {}: {}", n.created_at.format("%Y-%m-%d %H:%M"), n.title, n.message);
      }
    }
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use clap::CommandFactory;

  use super::*;

  #[test]
  fn args_are_well_formed() { Args::command().debug_assert(); }

  #[test]
  fn flags_win_over_file() {
    let file = ConfigFile { url: "http://file:1".into(), tenant: "tenant-3".into() };
    let cfg = resolve_config(Some("http://flag:2".into()), None, file);
    assert_eq!(cfg.base_url, "http://flag:2");
    assert_eq!(cfg.tenant.as_deref(), Some("tenant-3"));
  }

  #[test]
  fn defaults_when_nothing_is_set() {
    let cfg = resolve_config(None, None, ConfigFile::default());
    assert_eq!(cfg.base_url, DEFAULT_URL);
    assert_eq!(cfg.tenant, None);
  }

  #[test]
  fn config_file_parses() {
    let file: ConfigFile = toml::from_str("url = \"http://x\"\ntenant = \"tenant-2\"").unwrap();
    assert_eq!(file.tenant, "tenant-2");
  }

  #[test]
  fn report_flag_parses() {
    let args =
      Args::try_parse_from(["energyflow", "--tenant", "tenant-2", "report", "--date", "2024-03-13", "--csv"])
        .unwrap();
    assert!(matches!(args.command, Command::Report { csv: true, .. }));
  }
}
