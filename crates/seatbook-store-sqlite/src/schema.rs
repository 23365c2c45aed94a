//! SQL schema for the Seatbook SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- Written by the event-management side; read-only here.
CREATE TABLE IF NOT EXISTS events (
    event_id   TEXT PRIMARY KEY,
    owner_id   TEXT NOT NULL,
    title      TEXT NOT NULL,
    capacity   INTEGER NOT NULL CHECK (capacity > 0),
    starts_at  TEXT NOT NULL,   -- RFC 3339 UTC
    ends_at    TEXT NOT NULL    -- RFC 3339 UTC
);

-- Written by the account side; read-only here.
CREATE TABLE IF NOT EXISTS attendees (
    attendee_id TEXT PRIMARY KEY,
    email       TEXT NOT NULL,
    credential  TEXT NOT NULL
);

-- Admissions are strictly append-only.
-- No UPDATE or DELETE is ever issued against this table.
CREATE TABLE IF NOT EXISTS admissions (
    admission_id TEXT PRIMARY KEY,
    event_id     TEXT NOT NULL REFERENCES events(event_id),
    attendee_id  TEXT NOT NULL,
    created_at   TEXT NOT NULL,   -- RFC 3339 UTC; service-assigned
    UNIQUE (event_id, attendee_id)
);

CREATE INDEX IF NOT EXISTS admissions_event_idx ON admissions(event_id);

PRAGMA user_version = 1;
";
