//! Confirmation email delivery over SMTP.

use crate::config::{SmtpConfig, SmtpSecurity};
use async_trait::async_trait;
use lettre::message::{header::ContentType, Mailbox};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use secrecy::ExposeSecret;
use thiserror::Error;
use tracing::{debug, error, info, instrument};

/// Sender of every confirmation email.
pub const CONFIRMATION_SENDER: &str = "delta@samorzad.p.lodz.pl";

/// Subject of every confirmation email.
pub const CONFIRMATION_SUBJECT: &str = "Thank you for signing up";

/// Plain-text body of every confirmation email.
pub const CONFIRMATION_BODY: &str = "We sell the best roadrunner traps in the world!";

#[derive(Debug, Error)]
pub enum MailError {
    #[error("SMTP transport is not available")]
    Unavailable,

    #[error("invalid email address {address}: {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("failed to build message: {0}")]
    Build(String),

    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

/// A plain-text email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl Email {
    /// The sign-up confirmation sent to a new registrant.
    pub fn confirmation(to: impl Into<String>) -> Self {
        Self {
            from: CONFIRMATION_SENDER.to_string(),
            to: to.into(),
            subject: CONFIRMATION_SUBJECT.to_string(),
            body: CONFIRMATION_BODY.to_string(),
        }
    }

    fn to_message(&self) -> Result<Message, MailError> {
        Message::builder()
            .from(parse_mailbox(&self.from)?)
            .to(parse_mailbox(&self.to)?)
            .subject(self.subject.as_str())
            .header(ContentType::TEXT_PLAIN)
            .body(self.body.clone())
            .map_err(|e| MailError::Build(e.to_string()))
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, MailError> {
    address
        .parse()
        .map_err(|e: lettre::address::AddressError| MailError::InvalidAddress {
            address: address.to_string(),
            reason: e.to_string(),
        })
}

/// Outbound mail seam used by the registration handler.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Hand one email to the relay.
    async fn send(&self, email: &Email) -> Result<(), MailError>;
}

/// Mailer backed by a pooled SMTP transport created at startup.
pub struct SmtpMailer {
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
}

impl SmtpMailer {
    /// Set up the SMTP transport and check that the relay answers.
    ///
    /// Never fails: a relay that cannot be reached is logged, and every
    /// later `send` reports the problem instead.
    pub async fn connect(config: &SmtpConfig) -> Self {
        let transport = match build_transport(config) {
            Ok(t) => t,
            Err(e) => {
                error!(hostname = %config.hostname, error = %e, "Failed to set up SMTP transport");
                return Self { transport: None };
            }
        };

        match transport.test_connection().await {
            Ok(true) => info!(
                hostname = %config.hostname,
                port = config.effective_port(),
                security = ?config.security,
                "Connected to SMTP relay"
            ),
            Ok(false) => error!(hostname = %config.hostname, "SMTP relay refused the connection"),
            Err(e) => error!(hostname = %config.hostname, error = %e, "Failed to connect to SMTP relay"),
        }

        Self {
            transport: Some(transport),
        }
    }

    /// Whether a transport could be built at startup.
    pub fn is_configured(&self) -> bool {
        self.transport.is_some()
    }
}

fn build_transport(config: &SmtpConfig) -> Result<AsyncSmtpTransport<Tokio1Executor>, MailError> {
    let builder = match config.security {
        SmtpSecurity::Plain => {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(config.hostname.as_str())
        }
        SmtpSecurity::Starttls => {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.hostname)?
        }
        SmtpSecurity::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(&config.hostname)?,
    };

    let mut builder = builder.port(config.effective_port());
    if !config.username.is_empty() {
        builder = builder.credentials(Credentials::new(
            config.username.clone(),
            config.password.expose_secret().clone(),
        ));
    }

    Ok(builder.build())
}

#[async_trait]
impl Mailer for SmtpMailer {
    #[instrument(skip(self, email), fields(to = %email.to))]
    async fn send(&self, email: &Email) -> Result<(), MailError> {
        let transport = self.transport.as_ref().ok_or(MailError::Unavailable)?;
        let message = email.to_message()?;

        let response = transport.send(message).await?;
        debug!(code = %response.code(), "Email accepted by relay");
        Ok(())
    }
}
