//! Provides items that may be useful for testing

#![allow(clippy::unwrap_used)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use tempmailx_api::{
    Account, Address, Domain, Error as ApiError, FullMessage, MailProvider, MessageSummary,
    Result as ApiResult, Token,
};
use tokio::sync::Notify;

use crate::error::{Error, Result};
use crate::notify::{Notification, Notifier};
use crate::session::{Session, StoredAccount};

fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap()
}

pub fn account(id: &str, address: &str) -> Account {
    Account {
        id: id.to_string(),
        address: address.to_string(),
        quota: 40_000_000,
        used: 0,
        is_disabled: false,
        is_deleted: false,
        created_at: base_time(),
        updated_at: None,
    }
}

pub fn stored_account(id: &str, address: &str) -> StoredAccount {
    StoredAccount::new(account(id, address), "pw1234567890")
}

pub fn session(id: &str, address: &str, token: &str) -> Session {
    Session::new(stored_account(id, address), Token::new(token).with_id(id))
}

/// Message summary delivered `minute` minutes after a fixed base time.
pub fn summary(id: &str, from: &str, subject: &str, minute: i64) -> MessageSummary {
    MessageSummary {
        id: id.to_string(),
        from: Address {
            name: String::new(),
            address: from.to_string(),
        },
        to: Vec::new(),
        subject: subject.to_string(),
        intro: format!("{subject}..."),
        seen: false,
        has_attachments: false,
        size: 1024,
        created_at: base_time() + Duration::minutes(minute),
    }
}

pub fn full_message(id: &str) -> FullMessage {
    FullMessage {
        id: id.to_string(),
        from: Address {
            name: "Sender".into(),
            address: "sender@x.example".into(),
        },
        to: Vec::new(),
        cc: Vec::new(),
        bcc: Vec::new(),
        subject: "Subject".into(),
        intro: "Intro".into(),
        text: "Body".into(),
        html: Vec::new(),
        seen: false,
        attachments: Vec::new(),
        created_at: base_time(),
    }
}

pub fn status(code: u16) -> ApiError {
    ApiError::Status {
        status: code,
        reason: format!("status {code}"),
    }
}

/// Pauses a provider call until the test releases it.
#[derive(Debug, Default)]
pub struct Gate {
    entered: Notify,
    release: Notify,
}

impl Gate {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Waits until a call reached the gate.
    pub async fn entered(&self) {
        self.entered.notified().await;
    }

    /// Lets the held call continue.
    pub fn release(&self) {
        self.release.notify_one();
    }

    async fn pass(&self) {
        self.entered.notify_one();
        self.release.notified().await;
    }
}

/// Scripted in-memory provider.
///
/// Accounts echo the requested address. Every issued token is unique.
/// Message responses are replayed from a queue; an empty queue yields an
/// empty inbox.
#[derive(Debug, Default)]
pub struct FakeProvider {
    pub domains: Mutex<Vec<String>>,
    pub fail_domains: AtomicBool,
    pub fail_account: AtomicBool,
    pub fail_token: AtomicBool,
    pub fail_delete: AtomicBool,
    pub messages: Mutex<VecDeque<ApiResult<Vec<MessageSummary>>>>,
    pub message: Mutex<VecDeque<ApiResult<FullMessage>>>,
    pub domains_gate: Mutex<Option<Arc<Gate>>>,
    pub messages_gate: Mutex<Option<Arc<Gate>>>,
    pub message_gate: Mutex<Option<Arc<Gate>>>,
    pub calls: Mutex<Vec<String>>,
    issued: AtomicUsize,
}

impl FakeProvider {
    pub fn with_domain(domain: &str) -> Self {
        let provider = Self::default();
        provider.domains.lock().unwrap().push(domain.to_string());
        provider
    }

    pub fn push_messages(&self, response: ApiResult<Vec<MessageSummary>>) {
        self.messages.lock().unwrap().push_back(response);
    }

    pub fn push_message(&self, response: ApiResult<FullMessage>) {
        self.message.lock().unwrap().push_back(response);
    }

    pub fn gate_domains(&self) -> Arc<Gate> {
        let gate = Gate::new();
        *self.domains_gate.lock().unwrap() = Some(Arc::clone(&gate));
        gate
    }

    pub fn gate_messages(&self) -> Arc<Gate> {
        let gate = Gate::new();
        *self.messages_gate.lock().unwrap() = Some(Arc::clone(&gate));
        gate
    }

    pub fn gate_message(&self) -> Arc<Gate> {
        let gate = Gate::new();
        *self.message_gate.lock().unwrap() = Some(Arc::clone(&gate));
        gate
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.calls().iter().filter(|c| c.starts_with(prefix)).count()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl MailProvider for FakeProvider {
    async fn list_domains(&self) -> ApiResult<Vec<Domain>> {
        self.record("list_domains".into());
        let gate = self.domains_gate.lock().unwrap().take();
        if let Some(gate) = gate {
            gate.pass().await;
        }
        if self.fail_domains.load(Ordering::SeqCst) {
            return Err(status(503));
        }
        Ok(self
            .domains
            .lock()
            .unwrap()
            .iter()
            .enumerate()
            .map(|(i, domain)| Domain {
                id: format!("d{i}"),
                domain: domain.clone(),
                is_active: true,
                is_private: false,
            })
            .collect())
    }

    async fn create_account(&self, address: &str, _password: &str) -> ApiResult<Account> {
        self.record(format!("create_account:{address}"));
        if self.fail_account.load(Ordering::SeqCst) {
            return Err(status(422));
        }
        let n = self.issued.load(Ordering::SeqCst) + 1;
        Ok(account(&format!("acc-{n}"), address))
    }

    async fn create_token(&self, address: &str, _password: &str) -> ApiResult<Token> {
        self.record(format!("create_token:{address}"));
        if self.fail_token.load(Ordering::SeqCst) {
            return Err(status(401));
        }
        let n = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(Token::new(format!("token-{n}")).with_id(format!("acc-{n}")))
    }

    async fn list_messages(&self, token: &Token) -> ApiResult<Vec<MessageSummary>> {
        self.record(format!("list_messages:{}", token.bearer()));
        let gate = self.messages_gate.lock().unwrap().take();
        if let Some(gate) = gate {
            gate.pass().await;
        }
        self.messages
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn get_message(&self, token: &Token, id: &str) -> ApiResult<FullMessage> {
        self.record(format!("get_message:{}:{id}", token.bearer()));
        let gate = self.message_gate.lock().unwrap().take();
        if let Some(gate) = gate {
            gate.pass().await;
        }
        self.message
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(full_message(id)))
    }

    async fn delete_account(&self, token: &Token, id: &str) -> ApiResult<()> {
        self.record(format!("delete_account:{}:{id}", token.bearer()));
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(status(500));
        }
        Ok(())
    }
}

/// Notifier remembering every alert.
#[derive(Debug, Default, Clone)]
pub struct RecordingNotifier {
    pub shown: Arc<Mutex<Vec<Notification>>>,
    pub fail: Arc<AtomicBool>,
}

impl RecordingNotifier {
    pub fn shown(&self) -> Vec<Notification> {
        self.shown.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: &Notification) -> Result<()> {
        self.shown.lock().unwrap().push(notification.clone());
        if self.fail.load(Ordering::SeqCst) {
            return Err(Error::BestEffort("notification permission denied".into()));
        }
        Ok(())
    }
}
