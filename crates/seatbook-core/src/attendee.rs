//! Attendee — the identity that takes a seat.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A resolved attendee. Created and stored upstream; the admission protocol
/// compares attendees by `attendee_id` only.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attendee {
  pub attendee_id: Uuid,
  /// Contact address, quoted in the owner notification.
  pub email:       String,
  /// Opaque to this crate. Never serialised outward.
  #[serde(skip_serializing, default)]
  pub credential:  String,
}

impl Attendee {
  pub fn new(
    attendee_id: Uuid,
    email: impl Into<String>,
    credential: impl Into<String>,
  ) -> Self {
    Self {
      attendee_id,
      email: email.into(),
      credential: credential.into(),
    }
  }
}

impl std::fmt::Debug for Attendee {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Attendee")
      .field("attendee_id", &self.attendee_id)
      .field("email", &self.email)
      .field("credential", &"<redacted>")
      .finish()
  }
}
