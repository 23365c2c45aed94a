//! Event — a time-boxed webinar with a fixed number of seats.
//!
//! Events are created and edited elsewhere; this crate only reads them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

/// A scheduled event with a seat capacity.
///
/// Deserialising goes through [`Event::new`], so a decoded event holds the
/// same guarantees as a constructed one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "EventFields")]
pub struct Event {
  pub event_id:  Uuid,
  /// The account notified when someone takes a seat.
  pub owner_id:  Uuid,
  pub title:     String,
  /// Always positive.
  pub capacity:  u32,
  pub starts_at: DateTime<Utc>,
  /// Strictly after `starts_at`.
  pub ends_at:   DateTime<Utc>,
}

impl Event {
  /// Build an event, checking that it has at least one seat and ends after
  /// it starts.
  pub fn new(
    event_id: Uuid,
    owner_id: Uuid,
    title: impl Into<String>,
    capacity: u32,
    starts_at: DateTime<Utc>,
    ends_at: DateTime<Utc>,
  ) -> Result<Self> {
    if capacity == 0 {
      return Err(Error::InvalidCapacity);
    }
    if ends_at <= starts_at {
      return Err(Error::InvalidSchedule);
    }
    Ok(Self {
      event_id,
      owner_id,
      title: title.into(),
      capacity,
      starts_at,
      ends_at,
    })
  }
}

/// Wire shape of [`Event`] before validation.
#[derive(Deserialize)]
struct EventFields {
  event_id:  Uuid,
  owner_id:  Uuid,
  title:     String,
  capacity:  u32,
  starts_at: DateTime<Utc>,
  ends_at:   DateTime<Utc>,
}

impl TryFrom<EventFields> for Event {
  type Error = Error;

  fn try_from(f: EventFields) -> Result<Self> {
    Event::new(
      f.event_id,
      f.owner_id,
      f.title,
      f.capacity,
      f.starts_at,
      f.ends_at,
    )
  }
}

// ─── Availability ────────────────────────────────────────────────────────────

/// Seats taken and left for an event, computed from the ledger on read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Availability {
  pub event_id:  Uuid,
  pub capacity:  u32,
  pub taken:     u64,
  pub remaining: u64,
}

impl Availability {
  pub fn new(event: &Event, taken: u64) -> Self {
    Self {
      event_id: event.event_id,
      capacity: event.capacity,
      taken,
      remaining: u64::from(event.capacity).saturating_sub(taken),
    }
  }

  pub fn is_full(&self) -> bool { self.remaining == 0 }
}
