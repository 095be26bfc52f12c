//! Session configuration.

use std::time::Duration;

use crate::error::{Error, Result};

/// Tunables for provisioning and polling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Length of the generated address local-part.
    pub local_part_len: usize,
    /// Length of the generated account password.
    pub password_len: usize,
    /// Interval between inbox polls.
    pub poll_interval: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            local_part_len: 10,
            password_len: 12,
            poll_interval: Duration::from_secs(10),
        }
    }
}

impl SessionConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the local-part length.
    #[must_use]
    pub const fn with_local_part_len(mut self, len: usize) -> Self {
        self.local_part_len = len;
        self
    }

    /// Sets the password length.
    #[must_use]
    pub const fn with_password_len(mut self, len: usize) -> Self {
        self.password_len = len;
        self
    }

    /// Sets the poll interval.
    #[must_use]
    pub const fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a length or the poll interval is zero.
    pub fn validate(&self) -> Result<()> {
        if self.local_part_len == 0 {
            return Err(Error::Config("local_part_len must be at least 1".into()));
        }
        if self.password_len == 0 {
            return Err(Error::Config("password_len must be at least 1".into()));
        }
        if self.poll_interval.is_zero() {
            return Err(Error::Config("poll_interval must be positive".into()));
        }
        Ok(())
    }
}
