//! Session lifecycle state machine.
//!
//! ```text
//!                    start / provision
//!  Uninitialized ───────────────────────▶ Provisioning ──ok──▶ Active
//!                                              │                │ │
//!                                            fail               │ │ new_address
//!                                              ▼                │ └──▶ Provisioning
//!              Error ◀──────────── fail ── Recovering ◀── 401 ──┘
//!                │                             │
//!                └── retry ─▶ Provisioning     └──ok──▶ Active (new session)
//! ```
//!
//! The controller is the only writer of the session. Every request carries
//! a [`RequestTag`] taken when it was issued; a response is applied only if
//! its tag still names the current session, so a slow reply from a replaced
//! session can never overwrite the newer one.

use std::sync::{Mutex, MutexGuard, PoisonError};

use tempmailx_api::{Account, FullMessage, MailProvider, MessageSummary, Token};
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use super::config::SessionConfig;
use super::generate::Credentials;
use super::model::{PollOutcome, Session, SessionSnapshot, SessionState, StoredAccount};
use super::store::SessionStore;
use crate::error::{Error, Result};
use crate::notify::{Notification, Notifier};

/// Identity of the session a request was issued against.
#[derive(Debug, Clone, PartialEq, Eq)]
struct RequestTag {
    generation: u64,
    token: Token,
}

#[derive(Debug, Default)]
struct Inner {
    state: SessionState,
    session: Option<Session>,
    messages: Vec<MessageSummary>,
    generation: u64,
}

impl Inner {
    fn tag(&self) -> Option<RequestTag> {
        self.session.as_ref().map(|session| RequestTag {
            generation: self.generation,
            token: session.token.clone(),
        })
    }

    fn is_current(&self, tag: &RequestTag) -> bool {
        self.generation == tag.generation
            && self
                .session
                .as_ref()
                .is_some_and(|session| session.token == tag.token)
    }

    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            state: self.state.clone(),
            account: self.session.as_ref().map(|s| s.account.account.clone()),
            messages: self.messages.clone(),
            generation: self.generation,
        }
    }
}

/// Owns the (account, token) pair and the inbox derived from it.
///
/// Share it as `Arc<SessionController<_, _>>`; consumers observe changes
/// through [`subscribe`](Self::subscribe).
pub struct SessionController<P, S> {
    provider: P,
    store: S,
    notifier: Box<dyn Notifier>,
    config: SessionConfig,
    inner: Mutex<Inner>,
    snapshots: watch::Sender<SessionSnapshot>,
    pub(super) shutdown: watch::Sender<bool>,
}

impl<P: MailProvider, S: SessionStore> SessionController<P, S> {
    /// Creates a controller seeded from `store`.
    ///
    /// The initial state is `Active` if the store holds a session and
    /// `Uninitialized` otherwise. An unreadable store counts as empty.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` is invalid.
    pub fn new(
        provider: P,
        store: S,
        notifier: Box<dyn Notifier>,
        config: SessionConfig,
    ) -> Result<Self> {
        config.validate()?;

        let stored = store.load().unwrap_or_else(|e| {
            warn!("Ignoring unreadable stored session: {e}");
            None
        });
        let inner = match stored {
            Some(session) => {
                info!("Restored session for {}", session.account.address());
                Inner {
                    state: SessionState::Active,
                    session: Some(session),
                    messages: Vec::new(),
                    generation: 1,
                }
            }
            None => Inner::default(),
        };

        let (snapshots, _) = watch::channel(inner.snapshot());
        let (shutdown, _) = watch::channel(false);
        Ok(Self {
            provider,
            store,
            notifier,
            config,
            inner: Mutex::new(inner),
            snapshots,
            shutdown,
        })
    }

    /// Returns the configuration.
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Returns the provider.
    pub const fn provider(&self) -> &P {
        &self.provider
    }

    /// Returns the session store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Returns the current state.
    pub fn state(&self) -> SessionState {
        self.lock().state.clone()
    }

    /// Returns the current account, if any.
    pub fn account(&self) -> Option<Account> {
        self.lock()
            .session
            .as_ref()
            .map(|s| s.account.account.clone())
    }

    /// Returns the held inbox in provider order.
    pub fn messages(&self) -> Vec<MessageSummary> {
        self.lock().messages.clone()
    }

    /// Returns the current snapshot.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.lock().snapshot()
    }

    /// Subscribes to snapshots published after every change.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshots.subscribe()
    }

    /// Provisions a session if none exists yet.
    ///
    /// # Errors
    ///
    /// Returns a provisioning error if the new session could not be created.
    pub async fn start(&self) -> Result<()> {
        if self.state() == SessionState::Uninitialized {
            self.provision().await?;
        }
        Ok(())
    }

    /// Creates a new session, replacing any current one without deleting it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Busy`] if provisioning is already in flight, or a
    /// provisioning error if any step fails. On failure the controller is
    /// left in `Error` with no session.
    pub async fn provision(&self) -> Result<Account> {
        self.begin(SessionState::Provisioning, None)?;
        let result = self.run_provisioning(None).await;
        self.complete(result)
    }

    /// Manual exit from the `Error` state.
    ///
    /// # Errors
    ///
    /// See [`provision`](Self::provision).
    pub async fn retry(&self) -> Result<Account> {
        self.provision().await
    }

    /// Discards the current address and provisions a different one.
    ///
    /// Deleting the old account is attempted first; its failure is logged
    /// and otherwise ignored.
    ///
    /// # Errors
    ///
    /// See [`provision`](Self::provision).
    pub async fn new_address(&self) -> Result<Account> {
        let previous = self.begin(SessionState::Provisioning, None)?;

        if let Some(old) = &previous {
            self.delete_best_effort(old).await;
        }
        if let Err(e) = self.store.clear() {
            warn!("Failed to clear stored session: {e}");
        }

        let avoid = previous.as_ref().map(|s| s.account.address().to_string());
        let result = self.run_provisioning(avoid.as_deref()).await;
        self.complete(result)
    }

    /// Polls the inbox once.
    ///
    /// A 401 for the current token replaces the session. Any other failure
    /// is returned as [`Error::TransientFetch`] and leaves state untouched.
    ///
    /// # Errors
    ///
    /// Returns a transient error on non-auth failures, or a provisioning
    /// error if recovery itself failed.
    pub async fn refresh(&self) -> Result<PollOutcome> {
        let Some(tag) = self.lock().tag() else {
            return Ok(PollOutcome::NoSession);
        };

        match self.provider.list_messages(&tag.token).await {
            Ok(messages) => Ok(self.apply_messages(&tag, messages)),
            Err(e) if e.is_unauthorized() => self.recover(&tag).await,
            Err(e) => {
                if !self.lock().is_current(&tag) {
                    debug!("Dropping failure from replaced session: {e}");
                    return Ok(PollOutcome::Discarded);
                }
                warn!("Inbox poll failed: {e}");
                Err(Error::TransientFetch(e.to_string()))
            }
        }
    }

    /// Fetches a full message from the current inbox.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoSession`] without a session,
    /// [`Error::AuthExpired`] after a 401 (the session has been replaced by
    /// then), [`Error::Superseded`] if the session changed while fetching,
    /// and [`Error::TransientFetch`] on any other failure.
    pub async fn fetch_message(&self, id: &str) -> Result<FullMessage> {
        let tag = self.lock().tag().ok_or(Error::NoSession)?;

        match self.provider.get_message(&tag.token, id).await {
            Ok(message) => {
                if self.lock().is_current(&tag) {
                    Ok(message)
                } else {
                    Err(Error::Superseded)
                }
            }
            Err(e) if e.is_unauthorized() => {
                self.recover(&tag).await?;
                Err(Error::AuthExpired)
            }
            Err(e) => {
                warn!("Fetching message {id} failed: {e}");
                Err(Error::TransientFetch(e.to_string()))
            }
        }
    }

    /// Signals the polling task to stop.
    pub fn shutdown(&self) {
        self.shutdown.send_replace(true);
    }

    pub(super) fn has_session(&self) -> bool {
        self.lock().session.is_some()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, inner: &Inner) {
        self.snapshots.send_replace(inner.snapshot());
    }

    /// Enters a busy state, taking the current session out.
    ///
    /// With `expected`, the transition only happens if that tag still names
    /// the current session.
    fn begin(&self, next: SessionState, expected: Option<&RequestTag>) -> Result<Option<Session>> {
        let mut inner = self.lock();
        if inner.state.is_busy() {
            debug!("Rejecting {next} while {}", inner.state);
            return Err(Error::Busy);
        }
        if let Some(tag) = expected
            && !inner.is_current(tag)
        {
            return Err(Error::Superseded);
        }

        info!("Session {} -> {next}", inner.state);
        inner.state = next;
        inner.generation += 1;
        inner.messages.clear();
        let previous = inner.session.take();
        self.publish(&inner);
        Ok(previous)
    }

    /// Runs the provisioning protocol. Touches no controller state.
    async fn run_provisioning(&self, avoid: Option<&str>) -> Result<Session> {
        let domains = self
            .provider
            .list_domains()
            .await
            .map_err(|e| Error::Provision(format!("Failed to fetch domains: {e}")))?;
        let domain = domains
            .into_iter()
            .next()
            .ok_or_else(|| Error::Provision("No available domains found".into()))?
            .domain;

        let credentials = Credentials::generate(
            &domain,
            self.config.local_part_len,
            self.config.password_len,
            avoid,
        );

        let account = self
            .provider
            .create_account(&credentials.address, &credentials.password)
            .await
            .map_err(|e| Error::Provision(format!("Failed to create account: {e}")))?;

        let token = self
            .provider
            .create_token(&credentials.address, &credentials.password)
            .await
            .map_err(|e| Error::Provision(format!("Failed to get token: {e}")))?;

        Ok(Session::new(
            StoredAccount::new(account, credentials.password),
            token,
        ))
    }

    /// Leaves the busy state with the provisioning result.
    fn complete(&self, result: Result<Session>) -> Result<Account> {
        match result {
            Ok(session) => {
                let account = session.account.account.clone();
                {
                    let mut inner = self.lock();
                    info!("Session {} -> active as {}", inner.state, account.address);
                    inner.state = SessionState::Active;
                    inner.generation += 1;
                    inner.messages.clear();
                    inner.session = Some(session.clone());
                    self.publish(&inner);
                }
                if let Err(e) = self.store.save(&session.account, &session.token) {
                    warn!("Failed to persist session: {e}");
                }
                Ok(account)
            }
            Err(e) => {
                {
                    let mut inner = self.lock();
                    error!("Session {} -> error: {e}", inner.state);
                    inner.state = SessionState::Error(e.to_string());
                    inner.session = None;
                    inner.messages.clear();
                    self.publish(&inner);
                }
                if let Err(store_err) = self.store.clear() {
                    warn!("Failed to clear stored session: {store_err}");
                }
                Err(e)
            }
        }
    }

    /// Replaces the session whose token was rejected.
    async fn recover(&self, tag: &RequestTag) -> Result<PollOutcome> {
        match self.begin(SessionState::Recovering, Some(tag)) {
            Ok(previous) => {
                if let Some(old) = previous {
                    info!("Token for {} expired, provisioning a new address", old.account.address());
                }
            }
            Err(Error::Busy | Error::Superseded) => {
                debug!("Ignoring 401 for a session that is already being replaced");
                return Ok(PollOutcome::Discarded);
            }
            Err(e) => return Err(e),
        }
        if let Err(e) = self.store.clear() {
            warn!("Failed to clear stored session: {e}");
        }

        let result = self.run_provisioning(None).await;
        self.complete(result).map(|_| PollOutcome::Recovered)
    }

    fn apply_messages(&self, tag: &RequestTag, messages: Vec<MessageSummary>) -> PollOutcome {
        let (arrival, changed) = {
            let mut inner = self.lock();
            if !inner.is_current(tag) {
                debug!("Dropping inbox from replaced session");
                return PollOutcome::Discarded;
            }
            let arrival = if messages.len() > inner.messages.len() {
                newest(&messages).cloned()
            } else {
                None
            };
            let changed = inner.messages != messages;
            inner.messages = messages;
            if changed {
                self.publish(&inner);
            }
            (arrival, changed)
        };

        if let Some(message) = &arrival {
            info!("New message from {}: {}", message.from.address, message.subject);
            if let Err(e) = self.notifier.notify(&Notification::for_arrival(message)) {
                warn!("Notification not shown: {e}");
            }
        }

        if changed {
            PollOutcome::Updated { arrival }
        } else {
            PollOutcome::Unchanged
        }
    }

    async fn delete_best_effort(&self, old: &Session) {
        let id = &old.account.account.id;
        match self.provider.delete_account(&old.token, id).await {
            Ok(()) => info!("Deleted account {}", old.account.address()),
            Err(e) => warn!(
                "Failed to delete old account {}, proceeding anyway: {e}",
                old.account.address()
            ),
        }
    }
}

impl<P, S> std::fmt::Debug for SessionController<P, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionController")
            .field("config", &self.config)
            .field("snapshot", &*self.snapshots.borrow())
            .finish_non_exhaustive()
    }
}

/// Latest message by delivery time; the first one in provider order on ties.
fn newest(messages: &[MessageSummary]) -> Option<&MessageSummary> {
    messages
        .iter()
        .reduce(|best, m| if m.created_at > best.created_at { m } else { best })
}
