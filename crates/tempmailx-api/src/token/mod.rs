//! Bearer token issued by the provider.

use serde::{Deserialize, Serialize};

/// Bearer credential bound to one provider account.
///
/// The provider does not report an expiry; a token is known to be dead only
/// once an authenticated call comes back with 401.
#[derive(Clone, Serialize, Deserialize, Eq)]
pub struct Token {
    /// Token record id (the owning account id on mail.tm).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Bearer value sent in the `Authorization` header.
    pub token: String,
}

impl Token {
    /// Creates a new token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            id: None,
            token: token.into(),
        }
    }

    /// Sets the record id.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Returns the bearer value.
    #[must_use]
    pub fn bearer(&self) -> &str {
        &self.token
    }
}

// Two tokens are the same credential iff they carry the same bearer value.
impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.token == other.token
    }
}

impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Token")
            .field("id", &self.id)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

/// Credentials posted to `/accounts` and `/token`.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct Credentials<'a> {
    pub address: &'a str,
    pub password: &'a str,
}
