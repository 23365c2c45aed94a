//! Handler for `GET /events/:event_id/availability`.

use axum::{
  Json,
  extract::{Path, State},
};
use seatbook_core::{
  event::Availability,
  store::{AdmissionLedger, AttendeeStore, EventStore, Notifier},
};
use uuid::Uuid;

use crate::{ApiState, error::ApiError};

/// `GET /events/:event_id/availability` — seats taken and remaining.
pub async fn handler<A, E, L, N>(
  State(state): State<ApiState<A, E, L, N>>,
  Path(event_id): Path<Uuid>,
) -> Result<Json<Availability>, ApiError>
where
  A: AttendeeStore + 'static,
  E: EventStore + 'static,
  L: AdmissionLedger + 'static,
  N: Notifier + 'static,
{
  Ok(Json(state.service.availability(event_id).await?))
}
