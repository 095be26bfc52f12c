//! Session lifecycle.
//!
//! A session is one disposable address plus the bearer token that reads its
//! inbox. [`SessionController`] creates, replaces, persists and polls it.

mod config;
mod controller;
pub mod generate;
mod model;
mod poll;
mod store;

pub use config::SessionConfig;
pub use controller::SessionController;
pub use generate::Credentials;
pub use model::{PollOutcome, Session, SessionSnapshot, SessionState, StoredAccount};
pub use store::{
    FileSessionStore, KeyringSessionStore, MemorySessionStore, SERVICE_NAME, SessionStore,
    StoreError, StoreResult,
};
