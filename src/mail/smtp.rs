//! SMTP submission via `lettre`.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use super::{EmailMessage, MailError, Notifier};

pub const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";

/// Authenticated SMTP relay over implicit TLS.
#[derive(Debug, Clone)]
pub struct SmtpNotifier {
    default_host: String,
}

impl Default for SmtpNotifier {
    fn default() -> Self {
        Self::new(DEFAULT_SMTP_HOST)
    }
}

impl SmtpNotifier {
    pub fn new(default_host: impl Into<String>) -> Self {
        Self {
            default_host: default_host.into(),
        }
    }

    fn build_message(message: &EmailMessage) -> Result<Message, MailError> {
        let from: Mailbox = message
            .from
            .trim()
            .parse()
            .map_err(|_| MailError::InvalidAddress(message.from.clone()))?;
        let to: Mailbox = message
            .to
            .trim()
            .parse()
            .map_err(|_| MailError::InvalidAddress(message.to.clone()))?;
        let content_type = ContentType::parse(&message.attachment.mime_type)
            .map_err(|e| MailError::Build(e.to_string()))?;

        let attachment = Attachment::new(message.attachment.filename.clone())
            .body(message.attachment.content.clone(), content_type);

        Message::builder()
            .from(from)
            .to(to)
            .subject(message.subject.clone())
            .multipart(
                MultiPart::mixed()
                    .singlepart(SinglePart::plain(message.body.clone()))
                    .singlepart(attachment),
            )
            .map_err(|e| MailError::Build(e.to_string()))
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send(&self, message: &EmailMessage) -> Result<(), MailError> {
        message.check_complete()?;
        let email = Self::build_message(message)?;

        let host = message.smtp_host.as_deref().unwrap_or(&self.default_host);
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(host)
            .map_err(|e| MailError::SendFailure(e.to_string()))?
            .credentials(Credentials::new(
                message.from.trim().to_string(),
                message.password.clone(),
            ))
            .build();

        transport
            .send(email)
            .await
            .map_err(|e| MailError::SendFailure(e.to_string()))?;

        log::info!(
            "Sent '{}' to {} via {}",
            message.attachment.filename,
            message.to,
            host
        );
        Ok(())
    }
}
