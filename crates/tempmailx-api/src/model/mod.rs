//! Wire models returned by the provider.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A mail domain addresses can be created under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Domain {
    /// Domain record id.
    pub id: String,
    /// Domain name, e.g. `example.com`.
    pub domain: String,
    /// Whether new accounts may be created under it.
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// Whether the domain is reserved for private use.
    #[serde(default)]
    pub is_private: bool,
}

const fn default_true() -> bool {
    true
}

/// A provisioned mailbox as described by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Account id, used for deletion.
    pub id: String,
    /// Full email address.
    pub address: String,
    /// Storage quota in bytes.
    #[serde(default)]
    pub quota: u64,
    /// Storage used in bytes.
    #[serde(default)]
    pub used: u64,
    /// Whether the provider disabled the account.
    #[serde(default)]
    pub is_disabled: bool,
    /// Whether the account was deleted.
    #[serde(default)]
    pub is_deleted: bool,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Account {
    /// Returns the part of the address before `@`.
    #[must_use]
    pub fn local_part(&self) -> &str {
        self.address
            .split_once('@')
            .map_or(self.address.as_str(), |(local, _)| local)
    }
}

/// A mailbox participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Display name (may be empty).
    #[serde(default)]
    pub name: String,
    /// Email address.
    pub address: String,
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.name.is_empty() {
            write!(f, "{}", self.address)
        } else {
            write!(f, "{} <{}>", self.name, self.address)
        }
    }
}

/// Inbox listing entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageSummary {
    /// Message id, used to fetch the full message.
    pub id: String,
    /// Sender.
    pub from: Address,
    /// Recipients.
    #[serde(default)]
    pub to: Vec<Address>,
    /// Subject line.
    #[serde(default)]
    pub subject: String,
    /// Short preview of the body.
    #[serde(default)]
    pub intro: String,
    /// Whether the message was opened.
    #[serde(default)]
    pub seen: bool,
    /// Whether the message carries attachments.
    #[serde(default)]
    pub has_attachments: bool,
    /// Size in bytes.
    #[serde(default)]
    pub size: u64,
    /// Delivery time.
    pub created_at: DateTime<Utc>,
}

/// Attachment metadata on a full message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    /// Attachment id.
    pub id: String,
    /// File name.
    #[serde(default)]
    pub filename: String,
    /// MIME type.
    #[serde(default)]
    pub content_type: String,
    /// Size in bytes.
    #[serde(default)]
    pub size: u64,
    /// Relative download path.
    #[serde(default)]
    pub download_url: String,
}

/// A message with its body, fetched on demand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FullMessage {
    /// Message id.
    pub id: String,
    /// Sender.
    pub from: Address,
    /// Recipients.
    #[serde(default)]
    pub to: Vec<Address>,
    /// Carbon-copy recipients.
    #[serde(default)]
    pub cc: Vec<Address>,
    /// Blind carbon-copy recipients.
    #[serde(default)]
    pub bcc: Vec<Address>,
    /// Subject line.
    #[serde(default)]
    pub subject: String,
    /// Short preview of the body.
    #[serde(default)]
    pub intro: String,
    /// Plain-text body.
    #[serde(default)]
    pub text: String,
    /// HTML body, split into fragments by the provider.
    #[serde(default)]
    pub html: Vec<String>,
    /// Whether the message was opened.
    #[serde(default)]
    pub seen: bool,
    /// Attachments.
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    /// Delivery time.
    pub created_at: DateTime<Utc>,
}

/// Body of a full message, HTML preferred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    /// Joined HTML fragments.
    Html(String),
    /// Plain text.
    Text(String),
}

impl FullMessage {
    /// Returns the HTML body when present, the plain text otherwise.
    #[must_use]
    pub fn body(&self) -> Body {
        if self.html.iter().any(|part| !part.is_empty()) {
            Body::Html(self.html.concat())
        } else {
            Body::Text(self.text.clone())
        }
    }

    /// Comma-separated recipient addresses.
    #[must_use]
    pub fn recipients(&self) -> String {
        self.to
            .iter()
            .map(|a| a.address.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// A collection response.
///
/// The provider wraps lists in a Hydra envelope for `application/ld+json`
/// and returns a bare array for `application/json`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum Collection<T> {
    Hydra {
        #[serde(rename = "hydra:member")]
        member: Vec<T>,
    },
    Plain(Vec<T>),
}

impl<T> Collection<T> {
    pub(crate) fn into_vec(self) -> Vec<T> {
        match self {
            Self::Hydra { member } => member,
            Self::Plain(items) => items,
        }
    }
}
