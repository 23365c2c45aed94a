//! [`LogNotifier`] — delivers owner notifications to the log.

use std::convert::Infallible;

use seatbook_core::{notification::Notification, store::Notifier};

/// Writes each notification as a structured `tracing` event instead of
/// sending mail. Suitable until a mail relay sits behind the [`Notifier`]
/// trait.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
  type Error = Infallible;

  async fn send(&self, notification: Notification) -> Result<(), Infallible> {
    tracing::info!(
      to = %notification.to,
      subject = %notification.subject,
      body = %notification.body,
      "owner notification"
    );
    Ok(())
  }
}
