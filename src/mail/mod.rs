//! Emailing generated letters.
//!
//! Credentials are supplied per request and never stored. A message is only
//! handed to a transport once recipient, sender and credential are all present.

mod smtp;

pub use smtp::{SmtpNotifier, DEFAULT_SMTP_HOST};

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::letters::GeneratedDocument;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("please fill all email fields (missing: {})", .0.join(", "))]
    FieldsIncomplete(Vec<&'static str>),

    #[error("invalid email address: {0}")]
    InvalidAddress(String),

    #[error("failed to build message: {0}")]
    Build(String),

    #[error("{0}")]
    SendFailure(String),
}

/// File attached to an outgoing message.
#[derive(Debug, Clone)]
pub struct MailAttachment {
    pub filename: String,
    pub content: Vec<u8>,
    pub mime_type: String,
}

/// Email details entered alongside a generated letter.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct EmailDetails {
    #[serde(default)]
    pub to: String,
    #[serde(default)]
    pub from: String,
    /// App password for the sender account.
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    /// SMTP relay host, defaults to Gmail.
    #[serde(default)]
    pub smtp_host: Option<String>,
}

#[derive(Debug, Clone)]
pub struct EmailMessage {
    pub to: String,
    pub from: String,
    pub password: String,
    pub subject: String,
    pub body: String,
    pub smtp_host: Option<String>,
    pub attachment: MailAttachment,
}

impl EmailMessage {
    /// Build the message for `document`, filling subject and body defaults from
    /// the letter and the firm name.
    pub fn for_document(details: EmailDetails, document: &GeneratedDocument, firm_name: &str) -> Self {
        let letter = &document.letter;
        let subject = details
            .subject
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| format!("Engagement Letter for {}", letter.assignment_type()));
        let body = details
            .body
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| {
                format!(
                    "Dear {},\n\nPlease find attached your engagement letter.\n\nRegards,\n{}",
                    letter.client_name(),
                    firm_name
                )
            });

        Self {
            to: details.to,
            from: details.from,
            password: details.password,
            subject,
            body,
            smtp_host: details.smtp_host.filter(|h| !h.trim().is_empty()),
            attachment: MailAttachment {
                filename: document.filename.clone(),
                content: document.content.clone(),
                mime_type: crate::export::detect_mime_type(&document.filename),
            },
        }
    }

    /// Fails with `FieldsIncomplete` naming every blank required field.
    pub fn check_complete(&self) -> Result<(), MailError> {
        require_fields(&self.to, &self.from, &self.password)
    }
}

impl EmailDetails {
    /// Same check as [`EmailMessage::check_complete`], before any letter is built.
    pub fn check_complete(&self) -> Result<(), MailError> {
        require_fields(&self.to, &self.from, &self.password)
    }
}

fn require_fields(to: &str, from: &str, password: &str) -> Result<(), MailError> {
    let mut missing = Vec::new();
    if to.trim().is_empty() {
        missing.push("recipient");
    }
    if from.trim().is_empty() {
        missing.push("sender");
    }
    if password.is_empty() {
        missing.push("password");
    }

    if missing.is_empty() {
        Ok(())
    } else {
        Err(MailError::FieldsIncomplete(missing))
    }
}

/// Sends a message with its attachment.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> Result<(), MailError>;
}
