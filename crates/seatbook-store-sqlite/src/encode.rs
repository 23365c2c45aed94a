//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings and UUIDs as hyphenated
//! lowercase strings.

use chrono::{DateTime, Utc};
use seatbook_core::{admission::Admission, attendee::Attendee, event::Event};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Counts ───────────────────────────────────────────────────────────────────

pub fn decode_count(n: i64) -> Result<u64> {
  u64::try_from(n).map_err(|_| Error::Count(n))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from an `events` row.
pub struct RawEvent {
  pub event_id:  String,
  pub owner_id:  String,
  pub title:     String,
  pub capacity:  u32,
  pub starts_at: String,
  pub ends_at:   String,
}

impl RawEvent {
  pub const COLUMNS: &'static str =
    "event_id, owner_id, title, capacity, starts_at, ends_at";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      event_id:  row.get(0)?,
      owner_id:  row.get(1)?,
      title:     row.get(2)?,
      capacity:  row.get(3)?,
      starts_at: row.get(4)?,
      ends_at:   row.get(5)?,
    })
  }

  pub fn into_event(self) -> Result<Event> {
    Ok(Event::new(
      decode_uuid(&self.event_id)?,
      decode_uuid(&self.owner_id)?,
      self.title,
      self.capacity,
      decode_dt(&self.starts_at)?,
      decode_dt(&self.ends_at)?,
    )?)
  }
}

/// Raw strings read directly from an `attendees` row.
pub struct RawAttendee {
  pub attendee_id: String,
  pub email:       String,
  pub credential:  String,
}

impl RawAttendee {
  pub fn into_attendee(self) -> Result<Attendee> {
    Ok(Attendee::new(
      decode_uuid(&self.attendee_id)?,
      self.email,
      self.credential,
    ))
  }
}

/// Raw strings read directly from an `admissions` row.
pub struct RawAdmission {
  pub admission_id: String,
  pub event_id:     String,
  pub attendee_id:  String,
  pub created_at:   String,
}

impl RawAdmission {
  pub const COLUMNS: &'static str =
    "admission_id, event_id, attendee_id, created_at";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      admission_id: row.get(0)?,
      event_id:     row.get(1)?,
      attendee_id:  row.get(2)?,
      created_at:   row.get(3)?,
    })
  }

  pub fn into_admission(self) -> Result<Admission> {
    Ok(Admission {
      admission_id: decode_uuid(&self.admission_id)?,
      event_id:     decode_uuid(&self.event_id)?,
      attendee_id:  decode_uuid(&self.attendee_id)?,
      created_at:   decode_dt(&self.created_at)?,
    })
  }
}
