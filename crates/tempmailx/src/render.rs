//! Terminal output.

use std::fmt::Write as _;

use chrono::{DateTime, Local, Utc};
use tempmailx_api::{Body, FullMessage, MessageSummary};
use tempmailx_core::{SessionSnapshot, SessionState};

use crate::i18n::Labels;

fn local_time(time: DateTime<Utc>) -> String {
    time.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

/// Renders the line announcing a freshly created address.
pub fn new_address(labels: &Labels, address: &str) -> String {
    format!("{}: {address}\n", labels.new_email)
}

/// Renders the inbox, one message per line, in provider order.
pub fn inbox(labels: &Labels, messages: &[MessageSummary]) -> String {
    let mut out = format!("{} ({})\n", labels.inbox, messages.len());
    if messages.is_empty() {
        out.push_str(labels.inbox_empty);
        out.push('\n');
        return out;
    }
    for message in messages {
        let _ = writeln!(
            out,
            "  {}  {}  {} | {}",
            message.id,
            local_time(message.created_at),
            message.from,
            message.subject
        );
    }
    out
}

/// Renders a full message. HTML bodies are converted to Markdown.
pub fn message(labels: &Labels, message: &FullMessage) -> String {
    let body = match message.body() {
        Body::Html(html) => htmd::convert(&html).unwrap_or_else(|e| {
            tracing::debug!("HTML conversion failed, showing text body: {e}");
            message.text.clone()
        }),
        Body::Text(text) => text,
    };

    let mut out = String::new();
    let _ = writeln!(out, "{}: {}", labels.from, message.from);
    let _ = writeln!(out, "{}: {}", labels.to, message.recipients());
    let _ = writeln!(out, "{}: {}", labels.subject, message.subject);
    let _ = writeln!(out, "{}: {}", labels.date, local_time(message.created_at));
    if !message.attachments.is_empty() {
        let names: Vec<&str> = message
            .attachments
            .iter()
            .map(|a| a.filename.as_str())
            .collect();
        let _ = writeln!(out, "{}: {}", labels.attachments, names.join(", "));
    }
    out.push('\n');
    out.push_str(body.trim_end());
    out.push('\n');
    out
}

/// Renders what changed between two snapshots, if anything worth showing.
pub fn changes(labels: &Labels, before: &SessionSnapshot, after: &SessionSnapshot) -> Option<String> {
    let mut out = String::new();

    match &after.state {
        SessionState::Provisioning | SessionState::Recovering if before.state != after.state => {
            let _ = writeln!(out, "{}", labels.loading_email);
        }
        SessionState::Error(message) if before.state != after.state => {
            let _ = writeln!(out, "{}: {message}", labels.error);
            let _ = writeln!(out, "{}", labels.retry_hint);
        }
        _ => {}
    }

    if let Some(address) = after.address()
        && before.address() != Some(address)
    {
        let _ = writeln!(out, "{}: {address}", labels.your_temp_email);
    }

    if after.state == SessionState::Active
        && (before.messages != after.messages || before.generation != after.generation)
    {
        out.push_str(&inbox(labels, &after.messages));
    }

    (!out.is_empty()).then_some(out)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;
    use tempmailx_api::{Account, Address};

    use super::*;
    use crate::i18n::Language;

    fn when() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap()
    }

    fn summary(id: &str, subject: &str) -> MessageSummary {
        MessageSummary {
            id: id.into(),
            from: Address {
                name: "Alice".into(),
                address: "alice@x.example".into(),
            },
            to: Vec::new(),
            subject: subject.into(),
            intro: String::new(),
            seen: false,
            has_attachments: false,
            size: 10,
            created_at: when(),
        }
    }

    fn full(html: Vec<String>, text: &str) -> FullMessage {
        FullMessage {
            id: "m1".into(),
            from: Address {
                name: String::new(),
                address: "alice@x.example".into(),
            },
            to: vec![Address {
                name: String::new(),
                address: "me@example.com".into(),
            }],
            cc: Vec::new(),
            bcc: Vec::new(),
            subject: "Hello".into(),
            intro: String::new(),
            text: text.into(),
            html,
            seen: false,
            attachments: Vec::new(),
            created_at: when(),
        }
    }

    fn active(address: &str, messages: Vec<MessageSummary>, generation: u64) -> SessionSnapshot {
        SessionSnapshot {
            state: SessionState::Active,
            account: Some(Account {
                id: "a1".into(),
                address: address.into(),
                quota: 0,
                used: 0,
                is_disabled: false,
                is_deleted: false,
                created_at: when(),
                updated_at: None,
            }),
            messages,
            generation,
        }
    }

    #[test]
    fn test_new_address_line() {
        assert_eq!(
            new_address(Language::En.labels(), "k3j2h1g0f9@example.com"),
            "New Email: k3j2h1g0f9@example.com\n"
        );
        assert!(new_address(Language::Ar.labels(), "a@b.c").starts_with("بريد جديد: "));
    }

    #[test]
    fn test_empty_inbox() {
        let out = inbox(Language::En.labels(), &[]);
        assert!(out.starts_with("Inbox (0)"));
        assert!(out.contains("Waiting for new emails"));
    }

    #[test]
    fn test_inbox_lines() {
        let out = inbox(Language::En.labels(), &[summary("m1", "Hi"), summary("m2", "Yo")]);
        assert_eq!(out.lines().count(), 3);
        assert!(out.contains("m1"));
        assert!(out.contains("| Yo"));
    }

    #[test]
    fn test_html_body_is_converted() {
        let out = message(
            Language::En.labels(),
            &full(vec!["<p>Hello <strong>world</strong></p>".into()], "plain"),
        );
        assert!(out.contains("**world**"));
        assert!(!out.contains("<p>"));
        assert!(out.contains("To: me@example.com"));
    }

    #[test]
    fn test_text_body_when_no_html() {
        let out = message(Language::Ar.labels(), &full(Vec::new(), "plain body"));
        assert!(out.ends_with("plain body\n"));
        assert!(out.contains("الموضوع: Hello"));
    }

    #[test]
    fn test_changes_on_new_address() {
        let labels = Language::En.labels();
        let before = active("old@example.com", Vec::new(), 1);
        let after = active("new@example.com", Vec::new(), 3);

        let out = changes(labels, &before, &after).unwrap();

        assert!(out.contains("new@example.com"));
        assert!(out.contains("Inbox (0)"));
    }

    #[test]
    fn test_no_changes() {
        let snapshot = active("a@example.com", vec![summary("m1", "Hi")], 1);
        assert!(changes(Language::En.labels(), &snapshot, &snapshot).is_none());
    }

    #[test]
    fn test_error_shows_retry_hint() {
        let before = SessionSnapshot {
            state: SessionState::Provisioning,
            ..SessionSnapshot::default()
        };
        let after = SessionSnapshot {
            state: SessionState::Error("No available domains found".into()),
            ..SessionSnapshot::default()
        };

        let out = changes(Language::En.labels(), &before, &after).unwrap();

        assert!(out.contains("Error: No available domains found"));
        assert!(out.contains("tempmailx new"));
    }
}
