//! Handlers for `/events/:event_id/admissions` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/events/:event_id/admissions` | Body: `{"attendee_id":"<uuid>"}`; 201 + admission |
//! | `GET`  | `/events/:event_id/admissions` | Oldest first |
//! | `GET`  | `/events/:event_id/admissions/:attendee_id` | 404 if not admitted |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use seatbook_core::{
  admission::Admission,
  store::{AdmissionLedger, AttendeeStore, EventStore, Notifier},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{ApiState, error::ApiError};

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AdmitBody {
  pub attendee_id: Uuid,
}

/// `POST /events/:event_id/admissions` — body: `{"attendee_id":"<uuid>"}`
pub async fn create<A, E, L, N>(
  State(state): State<ApiState<A, E, L, N>>,
  Path(event_id): Path<Uuid>,
  Json(body): Json<AdmitBody>,
) -> Result<impl IntoResponse, ApiError>
where
  A: AttendeeStore + 'static,
  E: EventStore + 'static,
  L: AdmissionLedger + 'static,
  N: Notifier + 'static,
{
  let attendee = state
    .attendees
    .find_by_id(body.attendee_id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| {
      ApiError::NotFound(format!("attendee {} not found", body.attendee_id))
    })?;

  let admission = state.service.admit(event_id, attendee).await?;
  Ok((StatusCode::CREATED, Json(admission)))
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /events/:event_id/admissions`
pub async fn list<A, E, L, N>(
  State(state): State<ApiState<A, E, L, N>>,
  Path(event_id): Path<Uuid>,
) -> Result<Json<Vec<Admission>>, ApiError>
where
  A: AttendeeStore + 'static,
  E: EventStore + 'static,
  L: AdmissionLedger + 'static,
  N: Notifier + 'static,
{
  Ok(Json(state.service.admissions(event_id).await?))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /events/:event_id/admissions/:attendee_id`
pub async fn get_one<A, E, L, N>(
  State(state): State<ApiState<A, E, L, N>>,
  Path((event_id, attendee_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Admission>, ApiError>
where
  A: AttendeeStore + 'static,
  E: EventStore + 'static,
  L: AdmissionLedger + 'static,
  N: Notifier + 'static,
{
  let admission = state
    .service
    .admission(event_id, attendee_id)
    .await?
    .ok_or_else(|| {
      ApiError::NotFound(format!(
        "attendee {attendee_id} is not admitted to event {event_id}"
      ))
    })?;
  Ok(Json(admission))
}
