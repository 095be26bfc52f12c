//! Error types for the core library.

use thiserror::Error;

/// Errors that can occur in session operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Creating a new address failed (no domains, account or token
    /// creation rejected, network failure). Surfaced to the user.
    #[error("Provisioning failed: {0}")]
    Provision(String),

    /// The provider rejected the current token.
    #[error("Authentication expired")]
    AuthExpired,

    /// Listing or fetching messages failed for a reason other than auth.
    #[error("Fetch failed: {0}")]
    TransientFetch(String),

    /// A fire-and-forget side effect failed.
    #[error("Best-effort operation failed: {0}")]
    BestEffort(String),

    /// A provisioning or recovery sequence is already in flight.
    #[error("A new address is already being provisioned")]
    Busy,

    /// There is no active session to act on.
    #[error("No active session")]
    NoSession,

    /// The response belonged to a session that has since been replaced.
    #[error("Response discarded: session was replaced")]
    Superseded,

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Broad classification of an [`Error`], mirroring how it is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Fatal to the provisioning attempt; retryable manually.
    Provision,
    /// Recovered automatically by re-provisioning.
    AuthExpired,
    /// Logged; retried on the next natural trigger.
    TransientFetch,
    /// Logged and otherwise ignored.
    BestEffort,
    /// Rejected by the state machine without side effects.
    Guard,
    /// Invalid configuration.
    Config,
}

impl Error {
    /// Classifies the error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Provision(_) => ErrorKind::Provision,
            Self::AuthExpired => ErrorKind::AuthExpired,
            Self::TransientFetch(_) => ErrorKind::TransientFetch,
            Self::BestEffort(_) => ErrorKind::BestEffort,
            Self::Busy | Self::NoSession | Self::Superseded => ErrorKind::Guard,
            Self::Config(_) => ErrorKind::Config,
        }
    }

    /// Returns true if the presentation layer should show this as a
    /// blocking error state.
    #[must_use]
    pub const fn is_blocking(&self) -> bool {
        matches!(self.kind(), ErrorKind::Provision)
    }
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
