//! In-memory implementations of the collaborator traits.
//!
//! Used by tests across the workspace. The ledger and notifier can simulate
//! I/O latency and inject failures so the admission protocol can be
//! exercised against races and partial outages.

use std::{
  collections::HashMap,
  convert::Infallible,
  sync::atomic::{AtomicBool, Ordering},
  time::Duration,
};

use thiserror::Error;
use tokio::sync::{Notify, RwLock};
use uuid::Uuid;

use crate::{
  admission::Admission,
  attendee::Attendee,
  event::Event,
  notification::Notification,
  store::{AdmissionLedger, AttendeeStore, EventStore, Notifier},
};

/// Failures injected by the in-memory collaborators.
#[derive(Debug, Error)]
pub enum Error {
  #[error("ledger unavailable")]
  LedgerUnavailable,

  #[error("notifier unavailable")]
  NotifierUnavailable,
}

async fn simulate_io(latency: Option<Duration>) {
  match latency {
    Some(d) => tokio::time::sleep(d).await,
    None => tokio::task::yield_now().await,
  }
}

// ─── Events ──────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct InMemoryEventStore {
  events: RwLock<HashMap<Uuid, Event>>,
}

impl InMemoryEventStore {
  pub fn new() -> Self { Self::default() }

  pub async fn insert(&self, event: Event) {
    self.events.write().await.insert(event.event_id, event);
  }
}

impl EventStore for InMemoryEventStore {
  type Error = Infallible;

  async fn find_by_id(&self, event_id: Uuid) -> Result<Option<Event>, Infallible> {
    Ok(self.events.read().await.get(&event_id).cloned())
  }
}

// ─── Attendees ───────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct InMemoryAttendeeStore {
  attendees: RwLock<HashMap<Uuid, Attendee>>,
}

impl InMemoryAttendeeStore {
  pub fn new() -> Self { Self::default() }

  pub async fn insert(&self, attendee: Attendee) {
    self
      .attendees
      .write()
      .await
      .insert(attendee.attendee_id, attendee);
  }
}

impl AttendeeStore for InMemoryAttendeeStore {
  type Error = Infallible;

  async fn find_by_id(
    &self,
    attendee_id: Uuid,
  ) -> Result<Option<Attendee>, Infallible> {
    Ok(self.attendees.read().await.get(&attendee_id).cloned())
  }
}

// ─── Ledger ──────────────────────────────────────────────────────────────────

/// A `Vec`-backed ledger. Every operation suspends at least once, so
/// concurrent callers interleave the way they would against a real store.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
  admissions:   RwLock<Vec<Admission>>,
  latency:      Option<Duration>,
  fail_appends: AtomicBool,
}

impl InMemoryLedger {
  pub fn new() -> Self { Self::default() }

  /// Sleep for `latency` before every operation.
  pub fn with_latency(latency: Duration) -> Self {
    Self {
      latency: Some(latency),
      ..Self::default()
    }
  }

  /// Make subsequent appends fail without recording anything.
  pub fn fail_appends(&self, fail: bool) {
    self.fail_appends.store(fail, Ordering::SeqCst);
  }

  /// Total admissions across all events.
  pub async fn len(&self) -> usize { self.admissions.read().await.len() }

  pub async fn is_empty(&self) -> bool { self.len().await == 0 }
}

impl AdmissionLedger for InMemoryLedger {
  type Error = Error;

  async fn count_for_event(&self, event_id: Uuid) -> Result<u64, Error> {
    simulate_io(self.latency).await;
    let admissions = self.admissions.read().await;
    Ok(admissions.iter().filter(|a| a.event_id == event_id).count() as u64)
  }

  async fn exists_for_event_and_attendee(
    &self,
    event_id: Uuid,
    attendee_id: Uuid,
  ) -> Result<bool, Error> {
    simulate_io(self.latency).await;
    let admissions = self.admissions.read().await;
    Ok(
      admissions
        .iter()
        .any(|a| a.event_id == event_id && a.attendee_id == attendee_id),
    )
  }

  async fn append(&self, admission: Admission) -> Result<(), Error> {
    simulate_io(self.latency).await;
    if self.fail_appends.load(Ordering::SeqCst) {
      return Err(Error::LedgerUnavailable);
    }
    self.admissions.write().await.push(admission);
    Ok(())
  }

  async fn find(
    &self,
    event_id: Uuid,
    attendee_id: Uuid,
  ) -> Result<Option<Admission>, Error> {
    simulate_io(self.latency).await;
    let admissions = self.admissions.read().await;
    Ok(
      admissions
        .iter()
        .find(|a| a.event_id == event_id && a.attendee_id == attendee_id)
        .cloned(),
    )
  }

  async fn list_for_event(&self, event_id: Uuid) -> Result<Vec<Admission>, Error> {
    simulate_io(self.latency).await;
    let admissions = self.admissions.read().await;
    Ok(
      admissions
        .iter()
        .filter(|a| a.event_id == event_id)
        .cloned()
        .collect(),
    )
  }
}

// ─── Notifier ────────────────────────────────────────────────────────────────

/// Keeps every delivered notification for later inspection.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
  sent:      RwLock<Vec<Notification>>,
  delivered: Notify,
  failing:   AtomicBool,
  latency:   Option<Duration>,
}

impl RecordingNotifier {
  pub fn new() -> Self { Self::default() }

  /// A notifier whose every send fails.
  pub fn failing() -> Self {
    let notifier = Self::default();
    notifier.set_failing(true);
    notifier
  }

  /// A notifier that takes `latency` to deliver each message.
  pub fn with_latency(latency: Duration) -> Self {
    Self {
      latency: Some(latency),
      ..Self::default()
    }
  }

  pub fn set_failing(&self, failing: bool) {
    self.failing.store(failing, Ordering::SeqCst);
  }

  /// Notifications delivered so far, in send order.
  pub async fn sent(&self) -> Vec<Notification> { self.sent.read().await.clone() }

  /// Wait until at least `n` notifications have been delivered.
  ///
  /// Delivery happens after `admit` has returned, so tests that inspect the
  /// notifier wait here first.
  pub async fn wait_for(&self, n: usize) -> Vec<Notification> {
    loop {
      // Registered before the check so a delivery in between still wakes us.
      let delivered = self.delivered.notified();
      let sent = self.sent().await;
      if sent.len() >= n {
        return sent;
      }
      delivered.await;
    }
  }
}

impl Notifier for RecordingNotifier {
  type Error = Error;

  async fn send(&self, notification: Notification) -> Result<(), Error> {
    simulate_io(self.latency).await;
    if self.failing.load(Ordering::SeqCst) {
      return Err(Error::NotifierUnavailable);
    }
    self.sent.write().await.push(notification);
    self.delivered.notify_waiters();
    Ok(())
  }
}
