//! [`SqliteStore`]: the SQLite implementation of [`RecordStore`].

use std::{collections::HashSet, path::Path, sync::Arc};

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use tracing::{debug, info, warn};

use energyflow_core::{
  activity::{ActivityAction, ActivityEntry},
  branch::{Branch, BranchStatus, BranchType},
  daily::{DailyRecord, DayRecordInput, reconcile},
  entity::{Entity, EntityKind, ensure_id},
  notification::{NOTIFICATION_CAP, Notification},
  seed::Seed,
  store::RecordStore,
  tenant::{NewTenant, Plan, Tenant, TenantId, TenantStatus},
  validate::{self, ValidationError},
};

use crate::{
  Error, Result,
  encode::{
    RawActivity, RawDailyRecord, RawNotification, RawTenant, decode_entity, encode_day,
    encode_dt, encode_entity,
  },
  merge::merge,
  schema::SCHEMA,
};

/// Prepend a record to a tenant's override list. Rewriting an existing id
/// moves it to the front.
const UPSERT_FRONT: &str = "
  INSERT INTO overrides (tenant_id, kind, record_id, position, body)
  VALUES (
    ?1, ?2, ?3,
    (SELECT COALESCE(MAX(position), 0) + 1 FROM overrides
      WHERE tenant_id = ?1 AND kind = ?2),
    ?4
  )
  ON CONFLICT (tenant_id, kind, record_id)
  DO UPDATE SET position = excluded.position, body = excluded.body";

const REPLACE_BODY: &str = "
  UPDATE overrides SET body = ?4
  WHERE tenant_id = ?1 AND kind = ?2 AND record_id = ?3";

// ─── Store ───────────────────────────────────────────────────────────────────

/// A record store backed by a single SQLite file, merged at read time with
/// the baseline [`Seed`].
///
/// Cloning is cheap: the connection handle and the seed are both
/// reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
  seed: Arc<Seed>,
}

impl SqliteStore {
  /// Open (or create) a store at `path`, run schema initialisation, and
  /// register the seed's tenants.
  pub async fn open(path: impl AsRef<Path>, seed: Arc<Seed>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn, seed };
    store.init().await?;
    Ok(store)
  }

  /// Open an in-memory store; useful for testing.
  pub async fn open_in_memory(seed: Arc<Seed>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn, seed };
    store.init().await?;
    Ok(store)
  }

  pub fn seed(&self) -> &Seed { &self.seed }

  async fn init(&self) -> Result<()> {
    let tenants = self.seed.tenants.clone();
    let count = tenants.len();
    self
      .conn
      .call(move |conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(
          tenants
            .iter()
            .try_for_each(|t| insert_tenant(conn, t, "INSERT OR IGNORE")),
        )
      })
      .await??;
    info!(seed_tenants = count, "store initialised");
    Ok(())
  }

  /// Raw override bodies for one scope, front first.
  async fn override_bodies(&self, tenant: &TenantId, kind: EntityKind) -> Result<Vec<String>> {
    let tenant_str = tenant.as_str().to_owned();
    let kind_str = kind.as_ref().to_owned();

    let bodies = self
      .conn
      .call(move |conn| {
        let bodies = conn
          .prepare(
            "SELECT body FROM overrides
             WHERE tenant_id = ?1 AND kind = ?2
             ORDER BY position DESC",
          )?
          .query_map(rusqlite::params![tenant_str, kind_str], |r| r.get(0))?
          .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(bodies)
      })
      .await?;
    Ok(bodies)
  }

  /// Decoded overrides for one tenant and kind.
  async fn overrides<E: Entity>(&self, tenant: &TenantId) -> Result<Vec<E>> {
    self
      .override_bodies(tenant, E::KIND)
      .await?
      .iter()
      .map(|body| {
        let mut record = decode_entity::<E>(body)?;
        record.set_tenant_id(tenant.clone());
        Ok(record)
      })
      .collect()
  }

  /// Ids removed from one scope.
  async fn removed_ids(&self, tenant: &TenantId, kind: EntityKind) -> Result<HashSet<String>> {
    let tenant_str = tenant.as_str().to_owned();
    let kind_str = kind.as_ref().to_owned();

    let removed = self
      .conn
      .call(move |conn| {
        let removed = conn
          .prepare("SELECT record_id FROM removals WHERE tenant_id = ?1 AND kind = ?2")?
          .query_map(rusqlite::params![tenant_str, kind_str], |r| r.get(0))?
          .collect::<rusqlite::Result<HashSet<String>>>()?;
        Ok(removed)
      })
      .await?;
    Ok(removed)
  }

  /// The merged view. Overrides and removals degrade independently: if
  /// either cannot be read or decoded it is logged and treated as empty.
  async fn merged<E: Entity>(&self, tenant: &TenantId) -> Vec<E> {
    let overrides = self.overrides::<E>(tenant).await.unwrap_or_else(|e| {
      let err = energyflow_core::Error::StorageUnavailable(e.to_string());
      warn!(%tenant, kind = %E::KIND, error = %err, "ignoring unreadable overrides");
      Vec::new()
    });
    let removed = self.removed_ids(tenant, E::KIND).await.unwrap_or_else(|e| {
      let err = energyflow_core::Error::StorageUnavailable(e.to_string());
      warn!(%tenant, kind = %E::KIND, error = %err, "ignoring unreadable removals");
      HashSet::new()
    });
    merge(tenant, overrides, E::baseline(&self.seed), &removed)
  }

  /// Run arbitrary SQL against the connection.
  #[cfg(test)]
  pub(crate) async fn execute_raw(&self, sql: &'static str) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute_batch(sql)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── Connection-side helpers ─────────────────────────────────────────────────
//
// These run on the connection thread inside a single `call`, so a read
// followed by a write cannot interleave with another store operation.

fn insert_tenant(conn: &rusqlite::Connection, t: &Tenant, verb: &str) -> Result<()> {
  let branch_types = serde_json::to_string(&t.branch_types)?;
  conn.execute(
    &format!(
      "{verb} INTO tenants ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
      RawTenant::COLUMNS
    ),
    rusqlite::params![
      t.id.as_str(),
      t.name,
      t.owner_name,
      t.owner_email,
      t.subscription_plan.as_ref(),
      t.status.as_ref(),
      branch_types,
      encode_dt(t.created_at),
    ],
  )?;
  Ok(())
}

fn select_tenant(conn: &rusqlite::Connection, id: &str) -> Result<Option<Tenant>> {
  let raw = conn
    .query_row(
      &format!("SELECT {} FROM tenants WHERE tenant_id = ?1", RawTenant::COLUMNS),
      rusqlite::params![id],
      RawTenant::from_row,
    )
    .optional()?;
  raw.map(RawTenant::into_tenant).transpose()
}

/// Set one column on a tenant row and return the updated tenant.
fn update_tenant(
  conn: &rusqlite::Connection,
  id: &str,
  column: &'static str,
  value: &str,
) -> Result<Tenant> {
  let changed = conn.execute(
    &format!("UPDATE tenants SET {column} = ?2 WHERE tenant_id = ?1"),
    rusqlite::params![id, value],
  )?;
  if changed == 0 {
    return Err(energyflow_core::Error::not_found("tenant", id).into());
  }
  select_tenant(conn, id)?.ok_or_else(|| energyflow_core::Error::not_found("tenant", id).into())
}

/// Apply a tenant column change and log it, as one unit.
fn change_tenant(
  conn: &rusqlite::Connection,
  id: &str,
  column: &'static str,
  value: &str,
  action: ActivityAction,
) -> Result<Tenant> {
  let tenant = update_tenant(conn, id, column, value)?;
  append_activity(conn, &ActivityEntry::new(&tenant, action))?;
  Ok(tenant)
}

fn remove_tenant(conn: &rusqlite::Connection, id: &str) -> Result<()> {
  let tenant = select_tenant(conn, id)?
    .ok_or_else(|| energyflow_core::Error::not_found("tenant", id))?;
  conn.execute("DELETE FROM tenants WHERE tenant_id = ?1", rusqlite::params![id])?;
  for table in ["overrides", "removals", "daily_records", "notifications"] {
    conn.execute(
      &format!("DELETE FROM {table} WHERE tenant_id = ?1"),
      rusqlite::params![id],
    )?;
  }
  append_activity(conn, &ActivityEntry::new(&tenant, ActivityAction::TenantDeleted))
}

fn append_activity(conn: &rusqlite::Connection, entry: &ActivityEntry) -> Result<()> {
  conn.execute(
    &format!(
      "INSERT INTO activity_log ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
      RawActivity::COLUMNS
    ),
    rusqlite::params![
      entry.id,
      entry.tenant_id.as_str(),
      entry.tenant_name,
      entry.action.as_ref(),
      entry.description,
      encode_dt(entry.created_at),
    ],
  )?;
  Ok(())
}

fn is_removed(conn: &rusqlite::Connection, scope: &[&str; 3]) -> Result<bool> {
  let hit = conn
    .query_row(
      "SELECT 1 FROM removals WHERE tenant_id = ?1 AND kind = ?2 AND record_id = ?3",
      rusqlite::params![scope[0], scope[1], scope[2]],
      |_| Ok(true),
    )
    .optional()?;
  Ok(hit.unwrap_or(false))
}

fn archive_branch(
  conn: &rusqlite::Connection,
  seed: &Seed,
  tenant: &TenantId,
  id: &str,
) -> Result<Branch> {
  let kind = EntityKind::Branch.name();
  let scope = [tenant.as_str(), kind, id];
  if is_removed(conn, &scope)? {
    return Err(energyflow_core::Error::not_found("branch", id).into());
  }

  let body: Option<String> = conn
    .query_row(
      "SELECT body FROM overrides WHERE tenant_id = ?1 AND kind = ?2 AND record_id = ?3",
      rusqlite::params![scope[0], scope[1], scope[2]],
      |r| r.get(0),
    )
    .optional()?;

  let (mut branch, sql) = match &body {
    Some(body) => (decode_entity::<Branch>(body)?, REPLACE_BODY),
    None => {
      let baseline = seed
        .branches
        .iter()
        .find(|b| &b.tenant_id == tenant && b.id == id)
        .cloned()
        .ok_or_else(|| energyflow_core::Error::not_found("branch", id))?;
      (baseline, UPSERT_FRONT)
    }
  };

  branch.tenant_id = tenant.clone();
  branch.status = BranchStatus::Inactive;
  conn.execute(
    sql,
    rusqlite::params![scope[0], scope[1], scope[2], encode_entity(&branch)?],
  )?;
  Ok(branch)
}

fn append_day(
  conn: &rusqlite::Connection,
  tenant: TenantId,
  input: DayRecordInput,
) -> Result<DailyRecord> {
  let previous: Option<f64> = conn
    .query_row(
      "SELECT closing_stock FROM daily_records
       WHERE tenant_id = ?1 AND branch_id = ?2 AND kind = ?3
       ORDER BY seq DESC LIMIT 1",
      rusqlite::params![tenant.as_str(), input.branch_id, input.kind.as_ref()],
      |r| r.get(0),
    )
    .optional()?;

  let totals = reconcile(previous, &input)?;
  let record = DailyRecord::new(tenant, input, totals);

  conn.execute(
    &format!(
      "INSERT INTO daily_records ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
      RawDailyRecord::COLUMNS
    ),
    rusqlite::params![
      record.id,
      record.tenant_id.as_str(),
      record.branch_id,
      record.kind.as_ref(),
      encode_day(record.date),
      record.opening_stock,
      record.delivered,
      record.sold,
      record.closing_stock,
      record.notes,
      encode_dt(record.recorded_at),
    ],
  )?;
  Ok(record)
}

// ─── RecordStore impl ────────────────────────────────────────────────────────

impl RecordStore for SqliteStore {
  type Error = Error;

  // ── Entities ──────────────────────────────────────────────────────────────

  async fn list_all<E: Entity>(&self, tenant: TenantId) -> Result<Vec<E>> {
    Ok(self.merged::<E>(&tenant).await)
  }

  async fn get<E: Entity>(&self, tenant: TenantId, id: String) -> Result<Option<E>> {
    Ok(
      self
        .merged::<E>(&tenant)
        .await
        .into_iter()
        .find(|r| r.id() == id),
    )
  }

  async fn create<E: Entity>(&self, tenant: TenantId, mut record: E) -> Result<E> {
    record.set_tenant_id(tenant.clone());
    record.check()?;
    ensure_id(&mut record);

    let tenant_str = tenant.as_str().to_owned();
    let kind_str = E::KIND.as_ref().to_owned();
    let id = record.id().to_owned();
    let body = encode_entity(&record)?;

    self
      .conn
      .call(move |conn| {
        conn.execute(UPSERT_FRONT, rusqlite::params![tenant_str, kind_str, id, body])?;
        Ok(())
      })
      .await?;

    debug!(%tenant, kind = %E::KIND, id = record.id(), "record created");
    Ok(record)
  }

  async fn update<E: Entity>(&self, tenant: TenantId, mut record: E) -> Result<E> {
    if record.id().trim().is_empty() {
      return Err(energyflow_core::Error::not_found(E::KIND.name(), "").into());
    }
    record.set_tenant_id(tenant.clone());
    record.check()?;

    let tenant_str = tenant.as_str().to_owned();
    let kind_str = E::KIND.as_ref().to_owned();
    let id = record.id().to_owned();
    let body = encode_entity(&record)?;

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let replaced =
          tx.execute(REPLACE_BODY, rusqlite::params![tenant_str, kind_str, id, body])?;
        if replaced == 0 {
          tx.execute(UPSERT_FRONT, rusqlite::params![tenant_str, kind_str, id, body])?;
        }
        tx.commit()?;
        Ok(())
      })
      .await?;

    debug!(%tenant, kind = %E::KIND, id = record.id(), "record updated");
    Ok(record)
  }

  async fn hard_delete<E: Entity>(&self, tenant: TenantId, id: String) -> Result<()> {
    if id.trim().is_empty() {
      return Ok(());
    }
    let tenant_str = tenant.as_str().to_owned();
    let kind_str = E::KIND.as_ref().to_owned();
    let removed_at = encode_dt(Utc::now());
    let record_id = id.clone();

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "DELETE FROM overrides WHERE tenant_id = ?1 AND kind = ?2 AND record_id = ?3",
          rusqlite::params![tenant_str, kind_str, record_id],
        )?;
        tx.execute(
          "INSERT OR IGNORE INTO removals (tenant_id, kind, record_id, removed_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![tenant_str, kind_str, record_id, removed_at],
        )?;
        tx.commit()?;
        Ok(())
      })
      .await?;

    debug!(%tenant, kind = %E::KIND, %id, "record removed");
    Ok(())
  }

  async fn soft_delete_branch(&self, tenant: TenantId, id: String) -> Result<Branch> {
    let seed = Arc::clone(&self.seed);
    let branch = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let result = archive_branch(&tx, &seed, &tenant, &id);
        if result.is_ok() {
          tx.commit()?;
        }
        Ok(result)
      })
      .await??;

    debug!(tenant = %branch.tenant_id, id = %branch.id, "branch archived");
    Ok(branch)
  }

  // ── Daily records ─────────────────────────────────────────────────────────

  async fn record_day(&self, tenant: TenantId, input: DayRecordInput) -> Result<DailyRecord> {
    let record = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let result = append_day(&tx, tenant, input);
        if result.is_ok() {
          tx.commit()?;
        }
        Ok(result)
      })
      .await??;

    debug!(
      tenant = %record.tenant_id,
      branch = %record.branch_id,
      closing = record.closing_stock,
      "day recorded"
    );
    Ok(record)
  }

  async fn list_days(
    &self,
    tenant: TenantId,
    branch_id: String,
    kind: BranchType,
  ) -> Result<Vec<DailyRecord>> {
    let tenant_str = tenant.as_str().to_owned();
    let kind_str = kind.as_ref().to_owned();

    let raws: Vec<RawDailyRecord> = self
      .conn
      .call(move |conn| {
        let rows = conn
          .prepare(&format!(
            "SELECT {} FROM daily_records
             WHERE tenant_id = ?1 AND branch_id = ?2 AND kind = ?3
             ORDER BY seq DESC",
            RawDailyRecord::COLUMNS
          ))?
          .query_map(
            rusqlite::params![tenant_str, branch_id, kind_str],
            RawDailyRecord::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawDailyRecord::into_record).collect()
  }

  // ── Tenants ───────────────────────────────────────────────────────────────

  async fn list_tenants(&self) -> Result<Vec<Tenant>> {
    let raws: Vec<RawTenant> = self
      .conn
      .call(|conn| {
        let rows = conn
          .prepare(&format!(
            "SELECT {} FROM tenants ORDER BY created_at, tenant_id",
            RawTenant::COLUMNS
          ))?
          .query_map([], RawTenant::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawTenant::into_tenant).collect()
  }

  async fn get_tenant(&self, id: TenantId) -> Result<Option<Tenant>> {
    self
      .conn
      .call(move |conn| Ok(select_tenant(conn, id.as_str())))
      .await?
  }

  async fn create_tenant(&self, input: NewTenant) -> Result<Tenant> {
    validate::check(&input)?;
    let tenant = Tenant::register(input);
    let row = tenant.clone();

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let result = insert_tenant(&tx, &row, "INSERT").and_then(|()| {
          append_activity(&tx, &ActivityEntry::new(&row, ActivityAction::TenantCreated))
        });
        if result.is_ok() {
          tx.commit()?;
        }
        Ok(result)
      })
      .await??;

    info!(tenant = %tenant.id, name = %tenant.name, "tenant created");
    Ok(tenant)
  }

  async fn set_tenant_status(&self, id: TenantId, status: TenantStatus) -> Result<Tenant> {
    let tenant = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let action = ActivityAction::for_status(status);
        let result = change_tenant(&tx, id.as_str(), "status", status.as_ref(), action);
        if result.is_ok() {
          tx.commit()?;
        }
        Ok(result)
      })
      .await??;
    info!(tenant = %tenant.id, %status, "tenant status changed");
    Ok(tenant)
  }

  async fn set_tenant_plan(&self, id: TenantId, plan: Plan) -> Result<Tenant> {
    let tenant = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let action = ActivityAction::PlanChanged;
        let result = change_tenant(&tx, id.as_str(), "plan", plan.as_ref(), action);
        if result.is_ok() {
          tx.commit()?;
        }
        Ok(result)
      })
      .await??;
    info!(tenant = %tenant.id, %plan, "tenant plan changed");
    Ok(tenant)
  }

  async fn delete_tenant(&self, id: TenantId) -> Result<()> {
    let tenant_str = id.as_str().to_owned();

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let result = remove_tenant(&tx, &tenant_str);
        if result.is_ok() {
          tx.commit()?;
        }
        Ok(result)
      })
      .await??;

    info!(tenant = %id, "tenant deleted");
    Ok(())
  }

  async fn list_activity(&self, tenant: Option<TenantId>) -> Result<Vec<ActivityEntry>> {
    let filter = tenant.map(|t| t.as_str().to_owned());
    let raws: Vec<RawActivity> = self
      .conn
      .call(move |conn| {
        let rows = conn
          .prepare(&format!(
            "SELECT {} FROM activity_log WHERE ?1 IS NULL OR tenant_id = ?1 ORDER BY seq DESC",
            RawActivity::COLUMNS
          ))?
          .query_map(rusqlite::params![filter], RawActivity::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawActivity::into_entry).collect()
  }

  // ── Notifications ─────────────────────────────────────────────────────────

  async fn push_notification(
    &self,
    tenant: TenantId,
    title: String,
    message: String,
  ) -> Result<Notification> {
    if title.trim().is_empty() {
      let missing = ValidationError::single("title", "is required");
      return Err(energyflow_core::Error::from(missing).into());
    }
    let notification = Notification::new(tenant, &title, &message);
    let row = notification.clone();

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          &format!(
            "INSERT INTO notifications ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            RawNotification::COLUMNS
          ),
          rusqlite::params![
            row.id,
            row.tenant_id.as_str(),
            row.title,
            row.message,
            encode_dt(row.created_at),
            row.read,
          ],
        )?;
        tx.execute(
          "DELETE FROM notifications
           WHERE tenant_id = ?1 AND seq NOT IN (
             SELECT seq FROM notifications WHERE tenant_id = ?1
             ORDER BY seq DESC LIMIT ?2
           )",
          rusqlite::params![row.tenant_id.as_str(), NOTIFICATION_CAP as i64],
        )?;
        tx.commit()?;
        Ok(())
      })
      .await?;

    Ok(notification)
  }

  async fn list_notifications(&self, tenant: TenantId) -> Result<Vec<Notification>> {
    let tenant_str = tenant.as_str().to_owned();
    let raws: Vec<RawNotification> = self
      .conn
      .call(move |conn| {
        let rows = conn
          .prepare(&format!(
            "SELECT {} FROM notifications WHERE tenant_id = ?1 ORDER BY seq DESC",
            RawNotification::COLUMNS
          ))?
          .query_map(rusqlite::params![tenant_str], RawNotification::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawNotification::into_notification).collect()
  }

  async fn mark_all_read(&self, tenant: TenantId) -> Result<usize> {
    let tenant_str = tenant.as_str().to_owned();
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE notifications SET read = 1 WHERE tenant_id = ?1 AND read = 0",
          rusqlite::params![tenant_str],
        )?)
      })
      .await?;
    Ok(changed)
  }
}
