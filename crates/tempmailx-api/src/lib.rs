//! # tempmailx-api
//!
//! Async client for disposable-mailbox REST providers such as mail.tm.
//!
//! ## Features
//!
//! - **Provisioning**: list domains, create accounts, issue bearer tokens
//! - **Inbox**: list message summaries, fetch full messages
//! - **Cleanup**: delete accounts
//! - **Typed failures**: every non-2xx response maps to [`Error::Status`]
//!
//! ## Quick Start
//!
//! ```ignore
//! use tempmailx_api::{ApiClient, MailProvider, Provider};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ApiClient::new(Provider::mail_tm()?);
//!
//!     let domain = &client.list_domains().await?[0].domain;
//!     let address = format!("k3j2h1g0f9@{domain}");
//!     let account = client.create_account(&address, "hunter2hunter2").await?;
//!     let token = client.create_token(&address, "hunter2hunter2").await?;
//!
//!     for message in client.list_messages(&token).await? {
//!         println!("{} - {}", message.from, message.subject);
//!     }
//!
//!     client.delete_account(&token, &account.id).await?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod client;
mod error;
pub mod model;
pub mod provider;
pub mod token;

pub use client::{ApiClient, MailProvider};
pub use error::{Error, Result};
pub use model::{Account, Address, Attachment, Body, Domain, FullMessage, MessageSummary};
pub use provider::{MAIL_TM_BASE_URL, Provider};
pub use token::Token;
