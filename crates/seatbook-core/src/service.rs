//! [`AdmissionService`] — decides whether an attendee may take a seat.
//!
//! # Protocol
//!
//! 1. Resolve the event; unknown ids fail with
//!    [`AdmissionError::EventNotFound`].
//! 2. Reject an attendee who already holds a seat with
//!    [`AdmissionError::AlreadyAdmitted`].
//! 3. Reject when no seats remain with [`AdmissionError::CapacityExceeded`].
//! 4. Append a fresh [`Admission`] to the ledger.
//! 5. Notify the event owner. Delivery is best effort: a failed or slow
//!    notifier is logged and never undoes or fails the admission. The caller
//!    already has its result by then.
//!
//! # Concurrency
//!
//! Steps 1–4 run under an exclusive lock keyed by event id, so two admissions
//! for the same event never observe the ledger at the same time while
//! admissions for different events proceed in parallel. The locked section
//! runs on a spawned task that owns the guard: a caller that drops its
//! `admit` future cannot release the lock while an append is still in
//! flight, and an append that completes is never rolled back. The lock entry
//! is released on every exit from the locked section, panics included.

use std::{sync::Arc, time::Duration};

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard, oneshot};
use uuid::Uuid;

use crate::{
  AdmissionError,
  admission::Admission,
  attendee::Attendee,
  event::{Availability, Event},
  notification::Notification,
  store::{AdmissionLedger, EventStore, Notifier},
};

// ─── Configuration ───────────────────────────────────────────────────────────

/// Tunables for [`AdmissionService`].
#[derive(Debug, Clone)]
pub struct ServiceConfig {
  /// How long a notifier send may take before it is abandoned and logged as
  /// failed.
  pub notify_timeout: Duration,
}

impl Default for ServiceConfig {
  fn default() -> Self {
    Self {
      notify_timeout: Duration::from_secs(10),
    }
  }
}

// ─── Service ─────────────────────────────────────────────────────────────────

/// Admission control over an [`EventStore`], an [`AdmissionLedger`] and a
/// [`Notifier`].
///
/// Cloning is cheap — all clones share the same collaborators and the same
/// per-event locks.
pub struct AdmissionService<E, L, N> {
  inner: Arc<Inner<E, L, N>>,
}

impl<E, L, N> Clone for AdmissionService<E, L, N> {
  fn clone(&self) -> Self {
    Self {
      inner: Arc::clone(&self.inner),
    }
  }
}

struct Inner<E, L, N> {
  events:   E,
  ledger:   L,
  notifier: N,
  config:   ServiceConfig,
  /// One mutex per event with an admission in progress.
  locks:    LockMap,
}

impl<E, L, N> AdmissionService<E, L, N>
where
  E: EventStore + 'static,
  L: AdmissionLedger + 'static,
  N: Notifier + 'static,
{
  pub fn new(events: E, ledger: L, notifier: N) -> Self {
    Self::with_config(events, ledger, notifier, ServiceConfig::default())
  }

  pub fn with_config(
    events: E,
    ledger: L,
    notifier: N,
    config: ServiceConfig,
  ) -> Self {
    Self {
      inner: Arc::new(Inner {
        events,
        ledger,
        notifier,
        config,
        locks: DashMap::new(),
      }),
    }
  }

  pub fn events(&self) -> &E { &self.inner.events }

  pub fn ledger(&self) -> &L { &self.inner.ledger }

  pub fn notifier(&self) -> &N { &self.inner.notifier }

  pub fn config(&self) -> &ServiceConfig { &self.inner.config }

  #[cfg(test)]
  pub(crate) fn lock_count(&self) -> usize { self.inner.locks.len() }

  /// Admit `attendee` to `event_id` and notify the event owner.
  ///
  /// Returns the recorded [`Admission`]. The three expected rejections are
  /// [`AdmissionError::EventNotFound`], [`AdmissionError::AlreadyAdmitted`]
  /// and [`AdmissionError::CapacityExceeded`]; any other variant is an
  /// infrastructure fault and nothing was recorded.
  ///
  /// Returns as soon as the admission is recorded. The owner notification is
  /// sent afterwards on the same background task, bounded by
  /// [`ServiceConfig::notify_timeout`], so a slow notifier never delays the
  /// caller.
  pub async fn admit(
    &self,
    event_id: Uuid,
    attendee: Attendee,
  ) -> Result<Admission, AdmissionError> {
    let inner = Arc::clone(&self.inner);
    let (reply, outcome) = oneshot::channel();
    let task =
      tokio::spawn(async move { inner.admit(event_id, attendee, reply).await });

    match outcome.await {
      Ok(result) => result,
      Err(_) => {
        let reason = match task.await {
          Err(e) => e.to_string(),
          Ok(()) => "admission task ended without a result".to_owned(),
        };
        tracing::error!(%event_id, error = %reason, "admission task did not complete");
        Err(AdmissionError::Interrupted(reason))
      }
    }
  }

  /// Seats taken and remaining for `event_id`.
  pub async fn availability(
    &self,
    event_id: Uuid,
  ) -> Result<Availability, AdmissionError> {
    let event = self.inner.resolve_event(event_id).await?;
    let taken = self
      .inner
      .ledger
      .count_for_event(event_id)
      .await
      .map_err(AdmissionError::ledger)?;
    Ok(Availability::new(&event, taken))
  }

  /// All admissions for `event_id`, oldest first.
  pub async fn admissions(
    &self,
    event_id: Uuid,
  ) -> Result<Vec<Admission>, AdmissionError> {
    self.inner.resolve_event(event_id).await?;
    self
      .inner
      .ledger
      .list_for_event(event_id)
      .await
      .map_err(AdmissionError::ledger)
  }

  /// The admission held by `attendee_id` at `event_id`, if any.
  pub async fn admission(
    &self,
    event_id: Uuid,
    attendee_id: Uuid,
  ) -> Result<Option<Admission>, AdmissionError> {
    self.inner.resolve_event(event_id).await?;
    self
      .inner
      .ledger
      .find(event_id, attendee_id)
      .await
      .map_err(AdmissionError::ledger)
  }
}

impl<E, L, N> Inner<E, L, N>
where
  E: EventStore,
  L: AdmissionLedger,
  N: Notifier,
{
  /// Runs on the task spawned by [`AdmissionService::admit`]. The outcome
  /// goes to `reply` before the owner is notified.
  async fn admit(
    &self,
    event_id: Uuid,
    attendee: Attendee,
    reply: oneshot::Sender<Result<Admission, AdmissionError>>,
  ) {
    let result = {
      let _lock = EventLock::acquire(&self.locks, event_id).await;
      self.admit_locked(event_id, &attendee).await
    };

    let (event, admission) = match result {
      Ok(admitted) => admitted,
      Err(e) => {
        let _ = reply.send(Err(e));
        return;
      }
    };
    tracing::info!(
      %event_id,
      attendee_id = %attendee.attendee_id,
      admission_id = %admission.admission_id,
      "attendee admitted"
    );

    // A caller that stopped waiting does not undo the admission; the owner is
    // still told.
    let _ = reply.send(Ok(admission));
    self.notify_owner(&event, &attendee).await;
  }

  /// Steps 1–4. Must only be called while holding the lock for `event_id`.
  async fn admit_locked(
    &self,
    event_id: Uuid,
    attendee: &Attendee,
  ) -> Result<(Event, Admission), AdmissionError> {
    let event = self.resolve_event(event_id).await?;
    let attendee_id = attendee.attendee_id;

    let already = self
      .ledger
      .exists_for_event_and_attendee(event_id, attendee_id)
      .await
      .map_err(AdmissionError::ledger)?;
    if already {
      tracing::debug!(%event_id, %attendee_id, "attendee already admitted");
      return Err(AdmissionError::AlreadyAdmitted {
        event_id,
        attendee_id,
      });
    }

    let taken = self
      .ledger
      .count_for_event(event_id)
      .await
      .map_err(AdmissionError::ledger)?;
    let remaining = u64::from(event.capacity).saturating_sub(taken);
    if remaining == 0 {
      tracing::debug!(%event_id, taken, capacity = event.capacity, "event is full");
      return Err(AdmissionError::CapacityExceeded {
        event_id,
        capacity: event.capacity,
      });
    }

    let admission = Admission::new(event_id, attendee_id);
    self
      .ledger
      .append(admission.clone())
      .await
      .map_err(AdmissionError::ledger)?;

    Ok((event, admission))
  }

  async fn resolve_event(&self, event_id: Uuid) -> Result<Event, AdmissionError> {
    self
      .events
      .find_by_id(event_id)
      .await
      .map_err(AdmissionError::event_store)?
      .ok_or(AdmissionError::EventNotFound(event_id))
  }

  async fn notify_owner(&self, event: &Event, attendee: &Attendee) {
    let notification = Notification::new_participant(event, attendee);
    let owner_id = notification.to;
    let timeout = self.config.notify_timeout;

    match tokio::time::timeout(timeout, self.notifier.send(notification)).await {
      Ok(Ok(())) => {
        tracing::debug!(event_id = %event.event_id, %owner_id, "owner notified");
      }
      Ok(Err(e)) => {
        tracing::warn!(
          event_id = %event.event_id,
          %owner_id,
          error = %e,
          "owner notification failed; admission stands"
        );
      }
      Err(_) => {
        tracing::warn!(
          event_id = %event.event_id,
          %owner_id,
          ?timeout,
          "owner notification timed out; admission stands"
        );
      }
    }
  }
}

// ─── Per-event lock ──────────────────────────────────────────────────────────

type LockMap = DashMap<Uuid, Arc<Mutex<()>>>;

/// Exclusive hold on one event's entry in the lock registry.
///
/// Dropping it, including while unwinding from a panic, unlocks the mutex and
/// then removes the entry if nobody else holds or awaits it.
struct EventLock<'a> {
  locks:    &'a LockMap,
  event_id: Uuid,
  guard:    Option<OwnedMutexGuard<()>>,
}

impl<'a> EventLock<'a> {
  async fn acquire(locks: &'a LockMap, event_id: Uuid) -> Self {
    let lock = locks.entry(event_id).or_default().value().clone();
    Self {
      locks,
      event_id,
      guard: Some(lock.lock_owned().await),
    }
  }
}

impl Drop for EventLock<'_> {
  fn drop(&mut self) {
    drop(self.guard.take());
    // Cloning an entry's `Arc` requires the shard lock held here, so a count
    // of one means the map holds the only reference.
    self
      .locks
      .remove_if(&self.event_id, |_, lock| Arc::strong_count(lock) == 1);
  }
}
