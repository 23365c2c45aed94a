//! The one-way message sent to an event owner.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{attendee::Attendee, event::Event};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
  /// The owner account; the notifier resolves it to a delivery address.
  pub to:      Uuid,
  pub subject: String,
  pub body:    String,
}

impl Notification {
  /// The "someone registered" message for `event`'s owner.
  pub fn new_participant(event: &Event, attendee: &Attendee) -> Self {
    Self {
      to:      event.owner_id,
      subject: format!("New participant for webinar: {}", event.title),
      body:    format!(
        "A new participant, {}, has registered for your webinar.",
        attendee.email
      ),
    }
  }
}
