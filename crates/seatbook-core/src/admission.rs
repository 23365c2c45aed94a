//! Admission — the append-only record that an attendee holds a seat.
//!
//! Admissions are never updated or deleted. At most one exists per
//! `(event_id, attendee_id)` pair, and an event never holds more admissions
//! than its capacity. Both rules are enforced by
//! [`crate::AdmissionService`], not by the ledger.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Admission {
  pub admission_id: Uuid,
  pub event_id:     Uuid,
  pub attendee_id:  Uuid,
  /// Service-assigned; never changes after creation.
  pub created_at:   DateTime<Utc>,
}

impl Admission {
  /// A fresh admission stamped with the current time.
  pub fn new(event_id: Uuid, attendee_id: Uuid) -> Self {
    Self {
      admission_id: Uuid::new_v4(),
      event_id,
      attendee_id,
      created_at: Utc::now(),
    }
  }
}
