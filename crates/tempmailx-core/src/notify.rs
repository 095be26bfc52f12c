//! New-mail notifications.
//!
//! Notifications are fire-and-forget: the controller logs a failed attempt
//! and carries on. Missing permission is not an error condition.

use tempmailx_api::MessageSummary;

use crate::error::Result;

/// Title shown on a new-mail notification.
pub const ARRIVAL_TITLE: &str = "New Email Received!";

/// Text of a new-mail notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Title line.
    pub title: String,
    /// Body naming the sender and subject.
    pub body: String,
}

impl Notification {
    /// Builds the notification announcing `message`.
    #[must_use]
    pub fn for_arrival(message: &MessageSummary) -> Self {
        Self {
            title: ARRIVAL_TITLE.to_string(),
            body: format!(
                "From: {}\nSubject: {}",
                message.from.address, message.subject
            ),
        }
    }
}

/// Sink for user-visible alerts.
pub trait Notifier: Send + Sync {
    /// Attempts to show `notification`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BestEffort`](crate::Error::BestEffort) if the alert
    /// could not be shown.
    fn notify(&self, notification: &Notification) -> Result<()>;
}

/// Notifier that drops every alert.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn notify(&self, _notification: &Notification) -> Result<()> {
        Ok(())
    }
}
