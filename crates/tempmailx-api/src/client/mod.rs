//! HTTP client for the provider API.

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{Error, ErrorResponse, Result};
use crate::model::{Account, Collection, Domain, FullMessage, MessageSummary};
use crate::provider::Provider;
use crate::token::{Credentials, Token};

const LD_JSON: &str = "application/ld+json";

/// Operations offered by a disposable-mailbox provider.
///
/// Implementations are stateless request wrappers: no retries, no backoff,
/// no timeout beyond the transport default. Recovery policy belongs to the
/// caller.
#[async_trait]
pub trait MailProvider: Send + Sync {
    /// Lists domains new addresses can be created under.
    async fn list_domains(&self) -> Result<Vec<Domain>>;

    /// Creates an account for `address` protected by `password`.
    async fn create_account(&self, address: &str, password: &str) -> Result<Account>;

    /// Issues a bearer token for the given credentials.
    async fn create_token(&self, address: &str, password: &str) -> Result<Token>;

    /// Lists the inbox of the account the token belongs to.
    async fn list_messages(&self, token: &Token) -> Result<Vec<MessageSummary>>;

    /// Fetches one message including its body.
    async fn get_message(&self, token: &Token, id: &str) -> Result<FullMessage>;

    /// Deletes the account with the given id.
    async fn delete_account(&self, token: &Token, id: &str) -> Result<()>;
}

/// Provider client over HTTP.
#[derive(Debug, Clone)]
pub struct ApiClient {
    provider: Provider,
    http_client: Client,
}

impl ApiClient {
    /// Creates a new client for the given provider.
    #[must_use]
    pub fn new(provider: Provider) -> Self {
        Self::with_http_client(provider, Client::new())
    }

    /// Creates a client reusing an existing `reqwest` client.
    #[must_use]
    pub const fn with_http_client(provider: Provider, http_client: Client) -> Self {
        Self {
            provider,
            http_client,
        }
    }

    /// Returns the provider configuration.
    #[must_use]
    pub const fn provider(&self) -> &Provider {
        &self.provider
    }

    fn authorized(request: RequestBuilder, token: &Token) -> RequestBuilder {
        request.bearer_auth(token.bearer())
    }

    async fn send(request: RequestBuilder) -> Result<Response> {
        let response = request.header(ACCEPT, LD_JSON).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(ErrorResponse::into_error(status, &body))
    }

    async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T> {
        let body = Self::send(request).await?.text().await?;
        serde_json::from_str(&body).map_err(Error::from)
    }
}

#[async_trait]
impl MailProvider for ApiClient {
    async fn list_domains(&self) -> Result<Vec<Domain>> {
        let url = self.provider.domains_url()?;
        debug!("GET {url}");
        let domains: Collection<Domain> = Self::send_json(self.http_client.get(url)).await?;
        Ok(domains.into_vec())
    }

    async fn create_account(&self, address: &str, password: &str) -> Result<Account> {
        let url = self.provider.accounts_url()?;
        debug!("POST {url} for {address}");
        let request = self
            .http_client
            .post(url)
            .json(&Credentials { address, password });
        Self::send_json(request).await
    }

    async fn create_token(&self, address: &str, password: &str) -> Result<Token> {
        let url = self.provider.token_url()?;
        debug!("POST {url} for {address}");
        let request = self
            .http_client
            .post(url)
            .json(&Credentials { address, password });
        Self::send_json(request).await
    }

    async fn list_messages(&self, token: &Token) -> Result<Vec<MessageSummary>> {
        let url = self.provider.messages_url()?;
        debug!("GET {url}");
        let request = Self::authorized(self.http_client.get(url), token);
        let messages: Collection<MessageSummary> = Self::send_json(request).await?;
        Ok(messages.into_vec())
    }

    async fn get_message(&self, token: &Token, id: &str) -> Result<FullMessage> {
        let url = self.provider.message_url(id)?;
        debug!("GET {url}");
        let request = Self::authorized(self.http_client.get(url), token);
        Self::send_json(request).await
    }

    async fn delete_account(&self, token: &Token, id: &str) -> Result<()> {
        let url = self.provider.account_url(id)?;
        debug!("DELETE {url}");
        let request = Self::authorized(self.http_client.delete(url), token);
        Self::send(request).await?;
        Ok(())
    }
}
