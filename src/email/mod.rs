pub mod templates;

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use serde::Serialize;

use crate::config::SmtpConfig;

/// A rendered notification ready to hand to the outbound transport.
#[derive(Debug, Clone)]
pub struct Notification {
    pub subject: String,
    pub html: String,
    /// Submitter address, set as Reply-To so the recipient can answer directly.
    pub reply_to: String,
}

/// Receipt returned by the transport for a delivered message, echoed to the
/// client on success.
#[derive(Debug, Clone, Serialize)]
pub struct DeliveryReceipt {
    pub code: String,
    pub message: String,
}

/// Seam over the outbound mail transport so the pipeline can be tested
/// without an SMTP server.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn dispatch(&self, mail: &Notification) -> Result<DeliveryReceipt, String>;
}

/// Production transport: authenticated SMTP relay with a fixed sender and
/// recipient. One attempt per message, no retries.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: String,
    to: String,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig) -> Result<Self, String> {
        let creds = Credentials::new(config.user.clone(), config.pass.clone());

        let transport = if config.secure {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
                .map_err(|e| format!("SMTP relay error: {e}"))?
                .port(config.port)
                .credentials(creds)
                .build()
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
                .map_err(|e| format!("SMTP starttls error: {e}"))?
                .port(config.port)
                .credentials(creds)
                .build()
        };

        Ok(Self {
            transport,
            from: config.from.clone(),
            to: config.to.clone(),
        })
    }
}

#[async_trait]
impl MailTransport for SmtpMailer {
    async fn dispatch(&self, mail: &Notification) -> Result<DeliveryReceipt, String> {
        let message = Message::builder()
            .from(
                self.from
                    .parse()
                    .map_err(|e| format!("Invalid from address: {e}"))?,
            )
            .to(self
                .to
                .parse()
                .map_err(|e| format!("Invalid to address: {e}"))?)
            .reply_to(
                mail.reply_to
                    .parse()
                    .map_err(|e| format!("Invalid reply-to address: {e}"))?,
            )
            .subject(mail.subject.clone())
            .header(ContentType::TEXT_HTML)
            .body(mail.html.clone())
            .map_err(|e| format!("Failed to build email: {e}"))?;

        let response = self
            .transport
            .send(message)
            .await
            .map_err(|e| format!("Failed to send email: {e}"))?;

        Ok(DeliveryReceipt {
            code: response.code().to_string(),
            message: response.message().collect::<Vec<_>>().join(" "),
        })
    }
}
