//! Per-tenant notification feed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{aggregate::Dated, tenant::TenantId};

/// Only the most recent notifications are kept for each tenant.
pub const NOTIFICATION_CAP: usize = 20;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
  pub id:         String,
  pub tenant_id:  TenantId,
  pub title:      String,
  pub message:    String,
  pub created_at: DateTime<Utc>,
  pub read:       bool,
}

impl Notification {
  pub fn new(tenant_id: TenantId, title: &str, message: &str) -> Self {
    Self {
      id: format!("notif-{}", Uuid::new_v4().simple()),
      tenant_id,
      title: title.trim().to_owned(),
      message: message.trim().to_owned(),
      created_at: Utc::now(),
      read: false,
    }
  }
}

impl Dated for Notification {
  fn dated_at(&self) -> DateTime<Utc> { self.created_at }
}

/// Input to [`crate::store::RecordStore::push_notification`].
#[derive(Debug, Clone, Deserialize)]
pub struct NewNotification {
  pub title:   String,
  #[serde(default)]
  pub message: String,
}
