//! [`SqliteStore`] — the SQLite implementation of the Seatbook stores.

use std::path::Path;

use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use seatbook_core::{
  admission::Admission,
  attendee::Attendee,
  event::Event,
  store::{AdmissionLedger, AttendeeStore, EventStore},
};

use crate::{
  encode::{
    decode_count, encode_dt, encode_uuid, RawAdmission, RawAttendee, RawEvent,
  },
  schema::SCHEMA,
  Error, Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// Events, attendees and the admission ledger in a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Upstream writes ─────────────────────────────────────────────────────

  /// Insert an event record. Events are owned by the event-management side;
  /// this exists for that side and for tests.
  pub async fn insert_event(&self, event: &Event) -> Result<()> {
    let id_str    = encode_uuid(event.event_id);
    let owner_str = encode_uuid(event.owner_id);
    let title     = event.title.clone();
    let capacity  = event.capacity;
    let start_str = encode_dt(event.starts_at);
    let end_str   = encode_dt(event.ends_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO events (event_id, owner_id, title, capacity, starts_at, ends_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![id_str, owner_str, title, capacity, start_str, end_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Insert an attendee record. Attendees are owned by the account side;
  /// this exists for that side and for tests.
  pub async fn insert_attendee(&self, attendee: &Attendee) -> Result<()> {
    let id_str     = encode_uuid(attendee.attendee_id);
    let email      = attendee.email.clone();
    let credential = attendee.credential.clone();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO attendees (attendee_id, email, credential) VALUES (?1, ?2, ?3)",
          rusqlite::params![id_str, email, credential],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── EventStore impl ─────────────────────────────────────────────────────────

impl EventStore for SqliteStore {
  type Error = Error;

  async fn find_by_id(&self, event_id: Uuid) -> Result<Option<Event>> {
    let id_str = encode_uuid(event_id);

    let raw: Option<RawEvent> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {} FROM events WHERE event_id = ?1", RawEvent::COLUMNS),
              rusqlite::params![id_str],
              RawEvent::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawEvent::into_event).transpose()
  }
}

// ─── AttendeeStore impl ──────────────────────────────────────────────────────

impl AttendeeStore for SqliteStore {
  type Error = Error;

  async fn find_by_id(&self, attendee_id: Uuid) -> Result<Option<Attendee>> {
    let id_str = encode_uuid(attendee_id);

    let raw: Option<RawAttendee> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT attendee_id, email, credential FROM attendees WHERE attendee_id = ?1",
              rusqlite::params![id_str],
              |row| {
                Ok(RawAttendee {
                  attendee_id: row.get(0)?,
                  email:       row.get(1)?,
                  credential:  row.get(2)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawAttendee::into_attendee).transpose()
  }
}

// ─── AdmissionLedger impl ────────────────────────────────────────────────────

impl AdmissionLedger for SqliteStore {
  type Error = Error;

  async fn count_for_event(&self, event_id: Uuid) -> Result<u64> {
    let id_str = encode_uuid(event_id);

    let n: i64 = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "SELECT COUNT(*) FROM admissions WHERE event_id = ?1",
          rusqlite::params![id_str],
          |row| row.get(0),
        )?)
      })
      .await?;

    decode_count(n)
  }

  async fn exists_for_event_and_attendee(
    &self,
    event_id: Uuid,
    attendee_id: Uuid,
  ) -> Result<bool> {
    let event_str    = encode_uuid(event_id);
    let attendee_str = encode_uuid(attendee_id);

    let exists = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT 1 FROM admissions WHERE event_id = ?1 AND attendee_id = ?2",
              rusqlite::params![event_str, attendee_str],
              |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false),
        )
      })
      .await?;

    Ok(exists)
  }

  async fn append(&self, admission: Admission) -> Result<()> {
    let id_str       = encode_uuid(admission.admission_id);
    let event_str    = encode_uuid(admission.event_id);
    let attendee_str = encode_uuid(admission.attendee_id);
    let at_str       = encode_dt(admission.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO admissions (admission_id, event_id, attendee_id, created_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![id_str, event_str, attendee_str, at_str],
        )?;
        Ok(())
      })
      .await?;

    tracing::debug!(
      admission_id = %admission.admission_id,
      event_id = %admission.event_id,
      "admission appended"
    );
    Ok(())
  }

  async fn find(
    &self,
    event_id: Uuid,
    attendee_id: Uuid,
  ) -> Result<Option<Admission>> {
    let event_str    = encode_uuid(event_id);
    let attendee_str = encode_uuid(attendee_id);

    let raw: Option<RawAdmission> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {} FROM admissions WHERE event_id = ?1 AND attendee_id = ?2",
                RawAdmission::COLUMNS
              ),
              rusqlite::params![event_str, attendee_str],
              RawAdmission::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawAdmission::into_admission).transpose()
  }

  async fn list_for_event(&self, event_id: Uuid) -> Result<Vec<Admission>> {
    let id_str = encode_uuid(event_id);

    let raws: Vec<RawAdmission> = self
      .conn
      .call(move |conn| {
        // rowid follows insertion order, which is admission order.
        let mut stmt = conn.prepare(&format!(
          "SELECT {} FROM admissions WHERE event_id = ?1 ORDER BY rowid",
          RawAdmission::COLUMNS
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![id_str], RawAdmission::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawAdmission::into_admission).collect()
  }
}
