//! Error types for `seatbook-core`.

use thiserror::Error;
use uuid::Uuid;

/// Validation failures when constructing domain values.
#[derive(Debug, Error)]
pub enum Error {
  #[error("event capacity must be positive")]
  InvalidCapacity,

  #[error("event must end after it starts")]
  InvalidSchedule,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The outcome of a rejected [`crate::AdmissionService::admit`] call.
///
/// The first three variants are expected business outcomes the caller is
/// meant to match on. The rest are infrastructure faults from a collaborator.
#[derive(Debug, Error)]
pub enum AdmissionError {
  #[error("event not found: {0}")]
  EventNotFound(Uuid),

  #[error("attendee {attendee_id} is already admitted to event {event_id}")]
  AlreadyAdmitted { event_id: Uuid, attendee_id: Uuid },

  #[error("event {event_id} is full ({capacity} seats)")]
  CapacityExceeded { event_id: Uuid, capacity: u32 },

  #[error("event store error: {0}")]
  EventStore(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("ledger error: {0}")]
  Ledger(#[source] Box<dyn std::error::Error + Send + Sync>),

  /// The task running the critical section panicked or was torn down with
  /// the runtime before reporting back.
  #[error("admission interrupted: {0}")]
  Interrupted(String),
}

impl AdmissionError {
  /// `true` for the three expected outcomes, `false` for infrastructure
  /// faults.
  pub fn is_rejection(&self) -> bool {
    matches!(
      self,
      Self::EventNotFound(_)
        | Self::AlreadyAdmitted { .. }
        | Self::CapacityExceeded { .. }
    )
  }

  pub(crate) fn event_store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::EventStore(Box::new(e))
  }

  pub(crate) fn ledger<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Ledger(Box::new(e))
  }
}
