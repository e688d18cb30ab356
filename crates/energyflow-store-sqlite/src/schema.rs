//! SQL schema for the EnergyFlow SQLite store.
//!
//! Executed once at connection startup. Baseline records are never stored
//! here; they come from the injected seed and are merged at read time.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS tenants (
    tenant_id     TEXT PRIMARY KEY,
    name          TEXT NOT NULL,
    owner_name    TEXT NOT NULL,
    owner_email   TEXT NOT NULL,
    plan          TEXT NOT NULL,   -- 'personal' | 'organisation'
    status        TEXT NOT NULL,   -- 'active' | 'suspended'
    branch_types  TEXT NOT NULL DEFAULT '[]',
    created_at    TEXT NOT NULL
);

-- Tenant-written records, one row per (tenant, kind, id). Higher position
-- means more recently prepended.
CREATE TABLE IF NOT EXISTS overrides (
    tenant_id  TEXT NOT NULL,
    kind       TEXT NOT NULL,      -- EntityKind discriminant
    record_id  TEXT NOT NULL,
    position   INTEGER NOT NULL,
    body       TEXT NOT NULL,      -- JSON-encoded record
    PRIMARY KEY (tenant_id, kind, record_id)
);

-- Ids hidden from a tenant's merged view, baseline or override alike.
CREATE TABLE IF NOT EXISTS removals (
    tenant_id   TEXT NOT NULL,
    kind        TEXT NOT NULL,
    record_id   TEXT NOT NULL,
    removed_at  TEXT NOT NULL,
    PRIMARY KEY (tenant_id, kind, record_id)
);

-- Day records are append-only.
-- No UPDATE is ever issued against this table.
CREATE TABLE IF NOT EXISTS daily_records (
    seq            INTEGER PRIMARY KEY AUTOINCREMENT,
    record_id      TEXT NOT NULL UNIQUE,
    tenant_id      TEXT NOT NULL,
    branch_id      TEXT NOT NULL,
    kind           TEXT NOT NULL,  -- 'gas' | 'fuel'
    day            TEXT NOT NULL,  -- YYYY-MM-DD
    opening_stock  REAL NOT NULL,
    delivered      REAL NOT NULL,
    sold           REAL NOT NULL,
    closing_stock  REAL NOT NULL,
    notes          TEXT NOT NULL DEFAULT '',
    recorded_at    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS notifications (
    seq              INTEGER PRIMARY KEY AUTOINCREMENT,
    notification_id  TEXT NOT NULL UNIQUE,
    tenant_id        TEXT NOT NULL,
    title            TEXT NOT NULL,
    message          TEXT NOT NULL,
    created_at       TEXT NOT NULL,
    read             INTEGER NOT NULL DEFAULT 0
);

-- Tenant lifecycle audit trail. Rows survive deletion of their tenant.
CREATE TABLE IF NOT EXISTS activity_log (
    seq          INTEGER PRIMARY KEY AUTOINCREMENT,
    entry_id     TEXT NOT NULL UNIQUE,
    tenant_id    TEXT NOT NULL,
    tenant_name  TEXT NOT NULL,
    action       TEXT NOT NULL,    -- ActivityAction discriminant
    description  TEXT NOT NULL,
    created_at   TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS overrides_scope_idx ON overrides(tenant_id, kind, position);
CREATE INDEX IF NOT EXISTS daily_scope_idx     ON daily_records(tenant_id, branch_id, kind);
CREATE INDEX IF NOT EXISTS notif_tenant_idx    ON notifications(tenant_id);
CREATE INDEX IF NOT EXISTS activity_tenant_idx ON activity_log(tenant_id);

PRAGMA user_version = 1;
";
