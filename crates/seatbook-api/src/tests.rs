//! Router tests against the in-memory collaborators.

use std::{sync::Arc, time::Duration as StdDuration};

use axum::{
  Router,
  body::Body,
  http::{Request, StatusCode, header},
};
use chrono::{Duration, Utc};
use seatbook_core::{
  AdmissionService,
  attendee::Attendee,
  event::Event,
  memory::{
    InMemoryAttendeeStore, InMemoryEventStore, InMemoryLedger,
    RecordingNotifier,
  },
};
use serde_json::{Value, json};
use tower::ServiceExt as _;
use uuid::Uuid;

use crate::{ApiState, api_router};

struct Fixture {
  app:      Router,
  event:    Event,
  ada:      Attendee,
  bob:      Attendee,
  state:    ApiState<
    InMemoryAttendeeStore,
    InMemoryEventStore,
    InMemoryLedger,
    RecordingNotifier,
  >,
}

async fn fixture(capacity: u32) -> Fixture {
  let starts_at = Utc::now() + Duration::days(1);
  let event = Event::new(
    Uuid::new_v4(),
    Uuid::new_v4(),
    "Async in Practice",
    capacity,
    starts_at,
    starts_at + Duration::minutes(90),
  )
  .unwrap();
  let ada = Attendee::new(Uuid::new_v4(), "ada@example.com", "secret");
  let bob = Attendee::new(Uuid::new_v4(), "bob@example.com", "secret");

  let events = InMemoryEventStore::new();
  events.insert(event.clone()).await;
  let attendees = InMemoryAttendeeStore::new();
  attendees.insert(ada.clone()).await;
  attendees.insert(bob.clone()).await;

  let state = ApiState {
    attendees: Arc::new(attendees),
    service:   AdmissionService::new(
      events,
      InMemoryLedger::new(),
      RecordingNotifier::new(),
    ),
  };

  Fixture {
    app: api_router(state.clone()),
    event,
    ada,
    bob,
    state,
  }
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
  let res = app.clone().oneshot(req).await.unwrap();
  let status = res.status();
  let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
    .await
    .unwrap();
  let body = if bytes.is_empty() {
    Value::Null
  } else {
    serde_json::from_slice(&bytes).unwrap()
  };
  (status, body)
}

fn admit_req(event_id: Uuid, attendee_id: Uuid) -> Request<Body> {
  Request::post(format!("/events/{event_id}/admissions"))
    .header(header::CONTENT_TYPE, "application/json")
    .body(Body::from(
      json!({ "attendee_id": attendee_id }).to_string(),
    ))
    .unwrap()
}

fn get_req(uri: String) -> Request<Body> {
  Request::get(uri).body(Body::empty()).unwrap()
}

// ─── POST ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn admit_returns_created_admission() {
  let f = fixture(2).await;

  let (status, body) =
    send(&f.app, admit_req(f.event.event_id, f.ada.attendee_id)).await;

  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(body["event_id"], json!(f.event.event_id));
  assert_eq!(body["attendee_id"], json!(f.ada.attendee_id));

  let sent = tokio::time::timeout(
    StdDuration::from_secs(2),
    f.state.service.notifier().wait_for(1),
  )
  .await
  .expect("owner notified");
  assert_eq!(sent.len(), 1);
  assert_eq!(sent[0].subject, "New participant for webinar: Async in Practice");
}

#[tokio::test]
async fn repeat_admit_is_conflict() {
  let f = fixture(2).await;
  send(&f.app, admit_req(f.event.event_id, f.ada.attendee_id)).await;

  let (status, body) =
    send(&f.app, admit_req(f.event.event_id, f.ada.attendee_id)).await;

  assert_eq!(status, StatusCode::CONFLICT);
  assert_eq!(body["code"], "already_admitted");
}

#[tokio::test]
async fn full_event_is_conflict() {
  let f = fixture(1).await;
  send(&f.app, admit_req(f.event.event_id, f.ada.attendee_id)).await;

  let (status, body) =
    send(&f.app, admit_req(f.event.event_id, f.bob.attendee_id)).await;

  assert_eq!(status, StatusCode::CONFLICT);
  assert_eq!(body["code"], "capacity_exceeded");
}

#[tokio::test]
async fn unknown_event_is_not_found() {
  let f = fixture(1).await;

  let (status, body) =
    send(&f.app, admit_req(Uuid::new_v4(), f.ada.attendee_id)).await;

  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(body["code"], "event_not_found");
  assert!(f.state.service.ledger().is_empty().await);
}

#[tokio::test]
async fn unknown_attendee_is_not_found() {
  let f = fixture(1).await;

  let (status, body) =
    send(&f.app, admit_req(f.event.event_id, Uuid::new_v4())).await;

  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(body["code"], "not_found");
  assert!(f.state.service.ledger().is_empty().await);
}

#[tokio::test]
async fn ledger_failure_is_internal_error() {
  let f = fixture(1).await;
  f.state.service.ledger().fail_appends(true);

  let (status, body) =
    send(&f.app, admit_req(f.event.event_id, f.ada.attendee_id)).await;

  assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
  assert_eq!(body["code"], "internal");
}

// ─── GET ──────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn list_and_get_admissions() {
  let f = fixture(3).await;
  let event_id = f.event.event_id;
  send(&f.app, admit_req(event_id, f.ada.attendee_id)).await;
  send(&f.app, admit_req(event_id, f.bob.attendee_id)).await;

  let (status, body) =
    send(&f.app, get_req(format!("/events/{event_id}/admissions"))).await;
  assert_eq!(status, StatusCode::OK);
  let listed = body.as_array().unwrap();
  assert_eq!(listed.len(), 2);
  assert_eq!(listed[0]["attendee_id"], json!(f.ada.attendee_id));

  let (status, body) = send(
    &f.app,
    get_req(format!("/events/{event_id}/admissions/{}", f.bob.attendee_id)),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["attendee_id"], json!(f.bob.attendee_id));

  let (status, _) = send(
    &f.app,
    get_req(format!("/events/{event_id}/admissions/{}", Uuid::new_v4())),
  )
  .await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn availability_tracks_admissions() {
  let f = fixture(2).await;
  let event_id = f.event.event_id;
  send(&f.app, admit_req(event_id, f.ada.attendee_id)).await;

  let (status, body) =
    send(&f.app, get_req(format!("/events/{event_id}/availability"))).await;

  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["capacity"], 2);
  assert_eq!(body["taken"], 1);
  assert_eq!(body["remaining"], 1);

  let (status, _) = send(
    &f.app,
    get_req(format!("/events/{}/availability", Uuid::new_v4())),
  )
  .await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}
