//! JSON REST API for Seatbook.
//!
//! Exposes an axum [`Router`] over an [`AdmissionService`] and an
//! [`AttendeeStore`]. Auth, TLS and transport concerns are the caller's
//! responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", seatbook_api::api_router(state))
//! ```

pub mod admissions;
pub mod availability;
pub mod error;

use std::sync::Arc;

use axum::{
  Router,
  routing::get,
};
use seatbook_core::{
  AdmissionService,
  store::{AdmissionLedger, AttendeeStore, EventStore, Notifier},
};

pub use error::ApiError;

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all handlers.
pub struct ApiState<A, E, L, N> {
  /// Resolves the `attendee_id` in an admission request.
  pub attendees: Arc<A>,
  pub service:   AdmissionService<E, L, N>,
}

impl<A, E, L, N> Clone for ApiState<A, E, L, N> {
  fn clone(&self) -> Self {
    Self {
      attendees: Arc::clone(&self.attendees),
      service:   self.service.clone(),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<A, E, L, N>(state: ApiState<A, E, L, N>) -> Router<()>
where
  A: AttendeeStore + 'static,
  E: EventStore + 'static,
  L: AdmissionLedger + 'static,
  N: Notifier + 'static,
{
  Router::new()
    .route(
      "/events/{event_id}/admissions",
      get(admissions::list::<A, E, L, N>).post(admissions::create::<A, E, L, N>),
    )
    .route(
      "/events/{event_id}/admissions/{attendee_id}",
      get(admissions::get_one::<A, E, L, N>),
    )
    .route(
      "/events/{event_id}/availability",
      get(availability::handler::<A, E, L, N>),
    )
    .with_state(state)
}

#[cfg(test)]
mod tests;
