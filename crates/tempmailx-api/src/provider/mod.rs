//! Provider endpoint configuration.

use crate::error::{Error, Result};
use url::Url;

/// Default base URL of the public mail.tm API.
pub const MAIL_TM_BASE_URL: &str = "https://api.mail.tm";

/// Disposable-mailbox provider configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provider {
    /// Provider name (e.g., "mail.tm").
    pub name: String,
    /// Base URL every endpoint is resolved against.
    pub base_url: Url,
}

impl Provider {
    /// Creates a new provider configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or cannot act as a base.
    pub fn new(name: impl Into<String>, base_url: impl AsRef<str>) -> Result<Self> {
        let mut base_url = Url::parse(base_url.as_ref())?;
        if base_url.cannot_be_a_base() {
            return Err(Error::InvalidConfig(format!(
                "base URL {base_url} cannot be used as a base"
            )));
        }
        // Url::join drops the last path segment unless it ends with '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self {
            name: name.into(),
            base_url,
        })
    }

    /// mail.tm provider configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if URL parsing fails.
    pub fn mail_tm() -> Result<Self> {
        Self::new("mail.tm", MAIL_TM_BASE_URL)
    }

    /// `GET /domains`
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be built.
    pub fn domains_url(&self) -> Result<Url> {
        self.endpoint("domains")
    }

    /// `POST /accounts`
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be built.
    pub fn accounts_url(&self) -> Result<Url> {
        self.endpoint("accounts")
    }

    /// `DELETE /accounts/{id}`
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be built.
    pub fn account_url(&self, id: &str) -> Result<Url> {
        self.resource("accounts", id)
    }

    /// `POST /token`
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be built.
    pub fn token_url(&self) -> Result<Url> {
        self.endpoint("token")
    }

    /// `GET /messages`
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be built.
    pub fn messages_url(&self) -> Result<Url> {
        self.endpoint("messages")
    }

    /// `GET /messages/{id}`
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be built.
    pub fn message_url(&self, id: &str) -> Result<Url> {
        self.resource("messages", id)
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url.join(path).map_err(Into::into)
    }

    fn resource(&self, collection: &str, id: &str) -> Result<Url> {
        if id.is_empty() {
            return Err(Error::InvalidConfig(format!("empty {collection} id")));
        }
        let mut url = self.endpoint(collection)?;
        url.path_segments_mut()
            .map_err(|()| Error::InvalidConfig("base URL cannot have segments".into()))?
            .push(id);
        Ok(url)
    }
}
