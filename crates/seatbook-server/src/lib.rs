//! Wiring for the Seatbook server binary.
//!
//! Loads [`ServerConfig`], and assembles the HTTP application from a
//! [`SqliteStore`] and a [`LogNotifier`].

pub mod notifier;

#[cfg(test)]
mod tests;

pub use notifier::LogNotifier;

use std::{
  path::{Path, PathBuf},
  sync::Arc,
  time::Duration,
};

use anyhow::Context as _;
use axum::Router;
use seatbook_api::{ApiState, api_router};
use seatbook_core::{AdmissionService, ServiceConfig};
use seatbook_store_sqlite::SqliteStore;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `SEATBOOK_*` environment variables. Every field has a default.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
  pub host:                String,
  pub port:                u16,
  pub store_path:          PathBuf,
  /// Upper bound on a single owner notification.
  pub notify_timeout_secs: u64,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:                "127.0.0.1".to_owned(),
      port:                8080,
      store_path:          PathBuf::from("seatbook.db"),
      notify_timeout_secs: 10,
    }
  }
}

impl ServerConfig {
  /// Read `path` (optional) layered under `SEATBOOK_*` environment variables.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("SEATBOOK"))
      .build()
      .context("failed to read config file")?;

    settings
      .try_deserialize()
      .context("failed to deserialise ServerConfig")
  }

  pub fn service_config(&self) -> ServiceConfig {
    ServiceConfig {
      notify_timeout: Duration::from_secs(self.notify_timeout_secs),
    }
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

// ─── Application ──────────────────────────────────────────────────────────────

pub type Service = AdmissionService<SqliteStore, SqliteStore, LogNotifier>;

/// Build the HTTP application over `store`, with request tracing.
pub fn app(store: SqliteStore, config: &ServerConfig) -> Router {
  let service: Service = AdmissionService::with_config(
    store.clone(),
    store.clone(),
    LogNotifier,
    config.service_config(),
  );
  let state = ApiState {
    attendees: Arc::new(store),
    service,
  };
  api_router(state).layer(TraceLayer::new_for_http())
}
