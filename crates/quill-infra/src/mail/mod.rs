//! Outbound e-mail.

#[cfg(feature = "mail")]
mod smtp;

#[cfg(feature = "mail")]
pub use smtp::{SmtpConfig, SmtpMailer};

use async_trait::async_trait;

use quill_core::ports::{EmailMessage, MailError, Mailer};

use crate::redact::mask_email;

/// Mailer used when no SMTP relay is configured: logs and drops the message.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingMailer;

#[async_trait]
impl Mailer for LoggingMailer {
    async fn send(&self, message: EmailMessage) -> Result<(), MailError> {
        tracing::info!(
            to = %mask_email(&message.to),
            subject = %message.subject,
            "Mail transport not configured; message dropped"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_logging_mailer_accepts_everything() {
        let message = EmailMessage {
            to: "a@x.com".to_string(),
            subject: "Hello".to_string(),
            body: "Body".to_string(),
        };

        assert!(LoggingMailer.send(message).await.is_ok());
    }
}
