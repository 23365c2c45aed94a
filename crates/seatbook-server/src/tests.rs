//! Configuration loading and end-to-end requests against SQLite.

use std::{path::PathBuf, time::Duration};

use axum::{
  Router,
  body::Body,
  http::{Request, StatusCode, header},
};
use chrono::Utc;
use seatbook_core::{attendee::Attendee, event::Event};
use seatbook_store_sqlite::SqliteStore;
use serde_json::{Value, json};
use tower::ServiceExt as _;
use uuid::Uuid;

use crate::{ServerConfig, app};

// ─── Configuration ───────────────────────────────────────────────────────────

#[test]
fn missing_config_file_yields_defaults() {
  let path = std::env::temp_dir().join(format!("seatbook-{}.toml", Uuid::new_v4()));
  let cfg = ServerConfig::load(&path).unwrap();

  assert_eq!(cfg.host, "127.0.0.1");
  assert_eq!(cfg.port, 8080);
  assert_eq!(cfg.store_path, PathBuf::from("seatbook.db"));
  assert_eq!(cfg.service_config().notify_timeout, Duration::from_secs(10));
}

#[test]
fn config_file_overrides_defaults() {
  let path = std::env::temp_dir().join(format!("seatbook-{}.toml", Uuid::new_v4()));
  std::fs::write(
    &path,
    "host = \"0.0.0.0\"\nport = 9000\nnotify_timeout_secs = 3\n",
  )
  .unwrap();

  let cfg = ServerConfig::load(&path).unwrap();
  std::fs::remove_file(&path).ok();

  assert_eq!(cfg.address(), "0.0.0.0:9000");
  assert_eq!(cfg.store_path, PathBuf::from("seatbook.db"));
  assert_eq!(cfg.service_config().notify_timeout, Duration::from_secs(3));
}

// ─── End to end ──────────────────────────────────────────────────────────────

async fn seeded() -> (Router, Event, Vec<Attendee>) {
  let store = SqliteStore::open_in_memory().await.unwrap();
  let starts_at = Utc::now();
  let event = Event::new(
    Uuid::new_v4(),
    Uuid::new_v4(),
    "Ownership Deep Dive",
    1,
    starts_at,
    starts_at + chrono::Duration::hours(2),
  )
  .unwrap();
  store.insert_event(&event).await.unwrap();

  let people: Vec<_> = ["ada@example.com", "bob@example.com"]
    .into_iter()
    .map(|email| Attendee::new(Uuid::new_v4(), email, "pw"))
    .collect();
  for person in &people {
    store.insert_attendee(person).await.unwrap();
  }

  (app(store, &ServerConfig::default()), event, people)
}

async fn admit(app: &Router, event_id: Uuid, attendee_id: Uuid) -> (StatusCode, Value) {
  let req = Request::post(format!("/events/{event_id}/admissions"))
    .header(header::CONTENT_TYPE, "application/json")
    .body(Body::from(json!({ "attendee_id": attendee_id }).to_string()))
    .unwrap();
  let res = app.clone().oneshot(req).await.unwrap();
  let status = res.status();
  let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
    .await
    .unwrap();
  (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn admits_until_full_over_sqlite() {
  let (app, event, people) = seeded().await;

  let (status, body) = admit(&app, event.event_id, people[0].attendee_id).await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(body["attendee_id"], json!(people[0].attendee_id));

  let (status, body) = admit(&app, event.event_id, people[0].attendee_id).await;
  assert_eq!(status, StatusCode::CONFLICT);
  assert_eq!(body["code"], "already_admitted");

  let (status, body) = admit(&app, event.event_id, people[1].attendee_id).await;
  assert_eq!(status, StatusCode::CONFLICT);
  assert_eq!(body["code"], "capacity_exceeded");
}
