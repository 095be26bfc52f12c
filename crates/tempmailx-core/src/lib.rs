//! # tempmailx-core
//!
//! Session logic for `TempMailX`.
//!
//! This crate provides:
//! - **Session Controller** - provisions disposable addresses, recovers from
//!   expired tokens and keeps the inbox in sync
//! - **Session Stores** - file, keyring and in-memory persistence
//! - **Notifications** - seam for new-mail alerts

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod error;
pub mod notify;
pub mod session;
#[cfg(test)]
mod testutil;

pub use error::{Error, ErrorKind, Result};
pub use notify::{ARRIVAL_TITLE, NoopNotifier, Notification, Notifier};
pub use session::{
    Credentials, FileSessionStore, KeyringSessionStore, MemorySessionStore, PollOutcome, Session,
    SessionConfig, SessionController, SessionSnapshot, SessionState, SessionStore, StoreError,
    StoredAccount,
};
