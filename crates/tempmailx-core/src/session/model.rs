//! Session model types.

use serde::{Deserialize, Serialize};
use tempmailx_api::{Account, MessageSummary, Token};

/// A provider account together with the password it was created with.
///
/// The provider never returns the password, so it is kept client-side next
/// to the account record and persisted with it.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredAccount {
    /// Account as returned by the provider.
    #[serde(flatten)]
    pub account: Account,
    /// Password used to create the account.
    pub password: String,
}

impl StoredAccount {
    /// Creates a stored account.
    #[must_use]
    pub fn new(account: Account, password: impl Into<String>) -> Self {
        Self {
            account,
            password: password.into(),
        }
    }

    /// Returns the email address.
    #[must_use]
    pub fn address(&self) -> &str {
        &self.account.address
    }
}

impl std::fmt::Debug for StoredAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoredAccount")
            .field("account", &self.account)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// The active (account, token) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Account and its password.
    pub account: StoredAccount,
    /// Bearer token for the account.
    pub token: Token,
}

impl Session {
    /// Creates a session.
    #[must_use]
    pub const fn new(account: StoredAccount, token: Token) -> Self {
        Self { account, token }
    }
}

/// Lifecycle state of the session controller.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    /// No session exists yet.
    #[default]
    Uninitialized,
    /// A new address is being created.
    Provisioning,
    /// A session exists and its inbox is being polled.
    Active,
    /// The token was rejected; a replacement address is being created.
    Recovering,
    /// Provisioning failed; carries the message shown to the user.
    Error(String),
}

impl SessionState {
    /// Returns true while a provisioning sequence is in flight.
    #[must_use]
    pub const fn is_busy(&self) -> bool {
        matches!(self, Self::Provisioning | Self::Recovering)
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Uninitialized => f.write_str("uninitialized"),
            Self::Provisioning => f.write_str("provisioning"),
            Self::Active => f.write_str("active"),
            Self::Recovering => f.write_str("recovering"),
            Self::Error(message) => write!(f, "error: {message}"),
        }
    }
}

/// What subscribers see after every change. Carries no secrets.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionSnapshot {
    /// Current state.
    pub state: SessionState,
    /// Current account, if any.
    pub account: Option<Account>,
    /// Inbox as last fetched, in provider order.
    pub messages: Vec<MessageSummary>,
    /// Incremented whenever the session is replaced or cleared.
    pub generation: u64,
}

impl SessionSnapshot {
    /// Returns the current address, if any.
    #[must_use]
    pub fn address(&self) -> Option<&str> {
        self.account.as_ref().map(|a| a.address.as_str())
    }
}

/// Result of one inbox poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// The held inbox was replaced with a different set.
    Updated {
        /// Newest message, when the inbox grew.
        arrival: Option<MessageSummary>,
    },
    /// The provider returned exactly the held inbox.
    Unchanged,
    /// The token was rejected and a new session replaced it.
    Recovered,
    /// The response belonged to a replaced session and was dropped.
    Discarded,
    /// There is no token to poll with.
    NoSession,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const STORED: &str = r#"{
        "id": "a1",
        "address": "abcdefghij@example.com",
        "quota": 40000000,
        "used": 0,
        "isDisabled": false,
        "isDeleted": false,
        "createdAt": "2024-05-01T09:59:00Z",
        "password": "pw1234567890"
    }"#;

    #[test]
    fn test_stored_account_flattens_provider_fields() {
        let stored: StoredAccount = serde_json::from_str(STORED).unwrap();
        assert_eq!(stored.address(), "abcdefghij@example.com");
        assert_eq!(stored.password, "pw1234567890");

        let value = serde_json::to_value(&stored).unwrap();
        assert_eq!(value["id"], "a1");
        assert_eq!(value["password"], "pw1234567890");
    }

    #[test]
    fn test_stored_account_debug_redacts_password() {
        let stored: StoredAccount = serde_json::from_str(STORED).unwrap();
        assert!(!format!("{stored:?}").contains("pw1234567890"));
    }

    #[test]
    fn test_busy_states() {
        assert!(SessionState::Provisioning.is_busy());
        assert!(SessionState::Recovering.is_busy());
        assert!(!SessionState::Active.is_busy());
        assert!(!SessionState::Uninitialized.is_busy());
        assert!(!SessionState::Error("x".into()).is_busy());
        assert_eq!(
            SessionState::Error("No available domains found".into()).to_string(),
            "error: No available domains found"
        );
    }
}
