//! Report delivery by email
//!
//! Delivery is best-effort: any failure (credentials, address parsing, SMTP)
//! is logged and reported as [`DeliveryOutcome::Failed`], never as an error.

use std::sync::Arc;

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use log::{debug, error, info};

use crate::config::{MailSettings, SecretNames};
use crate::error::{Error, Result};
use crate::vault::SecretAccessor;

/// Result of a delivery attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Sent,
    Failed(String),
}

/// SMTP login resolved from the vault
#[derive(Clone)]
pub struct MailCredentials {
    pub user: String,
    pub password: String,
}

/// Sends a composed message
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn deliver(&self, message: Message, credentials: &MailCredentials) -> Result<()>;
}

/// STARTTLS submission through an SMTP relay
pub struct SmtpTransport {
    host: String,
    port: u16,
}

impl SmtpTransport {
    pub fn new(settings: &MailSettings) -> Self {
        Self {
            host: settings.smtp_host.clone(),
            port: settings.smtp_port,
        }
    }
}

#[async_trait]
impl MailTransport for SmtpTransport {
    async fn deliver(&self, message: Message, credentials: &MailCredentials) -> Result<()> {
        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.host)
            .map_err(|e| Error::Mail(e.to_string()))?
            .port(self.port)
            .credentials(Credentials::new(
                credentials.user.clone(),
                credentials.password.clone(),
            ))
            .build();

        debug!("Submitting report via {}:{}", self.host, self.port);
        mailer
            .send(message)
            .await
            .map_err(|e| Error::Mail(e.to_string()))?;
        Ok(())
    }
}

/// Compose the report message: one `text/html` part inside a mixed multipart body
pub fn build_message(from: &str, to: &str, subject: &str, html: &str) -> Result<Message> {
    let from: Mailbox = from
        .parse()
        .map_err(|e| Error::Mail(format!("invalid sender address {:?}: {}", from, e)))?;
    let to: Mailbox = to
        .parse()
        .map_err(|e| Error::Mail(format!("invalid recipient address {:?}: {}", to, e)))?;

    Message::builder()
        .from(from)
        .to(to)
        .subject(subject)
        .multipart(
            MultiPart::mixed().singlepart(
                SinglePart::builder()
                    .header(ContentType::TEXT_HTML)
                    .body(html.to_string()),
            ),
        )
        .map_err(|e| Error::Mail(e.to_string()))
}

/// Delivers rendered reports using credentials held in the vault
pub struct ReportMailer<T> {
    secrets: Arc<dyn SecretAccessor>,
    transport: T,
    subject: String,
    names: SecretNames,
}

impl<T: MailTransport> ReportMailer<T> {
    pub fn new(
        secrets: Arc<dyn SecretAccessor>,
        transport: T,
        settings: &MailSettings,
        names: &SecretNames,
    ) -> Self {
        Self {
            secrets,
            transport,
            subject: settings.subject.clone(),
            names: names.clone(),
        }
    }

    /// Send `html` to `recipient`. Failures are logged, not returned.
    pub async fn send(&self, html: &str, recipient: &str) -> DeliveryOutcome {
        match self.try_send(html, recipient).await {
            Ok(()) => {
                info!("Report sent to {}", recipient);
                DeliveryOutcome::Sent
            }
            Err(err) => {
                error!("Failed to send report to {}: {}", recipient, err);
                DeliveryOutcome::Failed(err.to_string())
            }
        }
    }

    async fn try_send(&self, html: &str, recipient: &str) -> Result<()> {
        let credentials = MailCredentials {
            user: self.secrets.get_secret(&self.names.mail_user).await?,
            password: self.secrets.get_secret(&self.names.mail_password).await?,
        };

        let message = build_message(&credentials.user, recipient, &self.subject, html)?;
        self.transport.deliver(message, &credentials).await
    }
}
