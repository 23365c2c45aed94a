//! Collaborator traits the admission protocol is written against.
//!
//! The traits are implemented by storage backends (e.g.
//! `seatbook-store-sqlite`) and by the in-memory types in [`crate::memory`].
//! [`crate::AdmissionService`] depends on these abstractions, never on a
//! concrete backend.
//!
//! All methods return `Send` futures so implementations can be driven from a
//! multi-threaded runtime and from spawned tasks.

use std::future::Future;

use uuid::Uuid;

use crate::{
  admission::Admission, attendee::Attendee, event::Event,
  notification::Notification,
};

// ─── Read-only stores ────────────────────────────────────────────────────────

/// Source of event records. Read-only from the core's perspective.
pub trait EventStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Retrieve an event by UUID. Returns `None` if not found.
  fn find_by_id(
    &self,
    event_id: Uuid,
  ) -> impl Future<Output = Result<Option<Event>, Self::Error>> + Send + '_;
}

/// Source of attendee records. The admission protocol receives attendees
/// already resolved; this trait is used by the layers in front of it.
pub trait AttendeeStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Retrieve an attendee by UUID. Returns `None` if not found.
  fn find_by_id(
    &self,
    attendee_id: Uuid,
  ) -> impl Future<Output = Result<Option<Attendee>, Self::Error>> + Send + '_;
}

// ─── Ledger ──────────────────────────────────────────────────────────────────

/// The authoritative, append-only store of [`Admission`] records.
///
/// The ledger does not check capacity or uniqueness itself; callers serialise
/// per event and validate before calling [`AdmissionLedger::append`].
pub trait AdmissionLedger: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Number of admissions recorded for `event_id`.
  fn count_for_event(
    &self,
    event_id: Uuid,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  /// Whether `attendee_id` already holds a seat at `event_id`.
  fn exists_for_event_and_attendee(
    &self,
    event_id: Uuid,
    attendee_id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Durably record `admission`. Either the record exists afterwards and
  /// this returns `Ok`, or it does not and this returns `Err`.
  fn append(
    &self,
    admission: Admission,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// The admission for `(event_id, attendee_id)`, if any.
  fn find(
    &self,
    event_id: Uuid,
    attendee_id: Uuid,
  ) -> impl Future<Output = Result<Option<Admission>, Self::Error>> + Send + '_;

  /// All admissions for `event_id`, oldest first.
  fn list_for_event(
    &self,
    event_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Admission>, Self::Error>> + Send + '_;
}

// ─── Notifier ────────────────────────────────────────────────────────────────

/// One-way delivery of a message to an event owner. No reply is expected.
pub trait Notifier: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn send(
    &self,
    notification: Notification,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
