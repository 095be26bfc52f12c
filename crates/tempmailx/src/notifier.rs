//! Desktop notifications for new mail.

use tempmailx_core::{Error, Notification, Notifier};

/// Shows alerts through the platform notification service.
#[derive(Debug, Clone)]
pub struct DesktopNotifier {
    app_name: String,
}

impl DesktopNotifier {
    #[must_use]
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
        }
    }
}

impl Notifier for DesktopNotifier {
    fn notify(&self, notification: &Notification) -> tempmailx_core::Result<()> {
        notify_rust::Notification::new()
            .appname(&self.app_name)
            .summary(&notification.title)
            .body(&notification.body)
            .show()
            .map(|_| ())
            .map_err(|e| Error::BestEffort(format!("notification not shown: {e}")))
    }
}
