//! SMTP delivery for stakeholder emails.
//!
//! The transport and sender mailbox are built once at startup, so a bad
//! `SMTP_FROM` or relay host fails the boot instead of the first send.

use std::future::Future;

use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("Email build error: {0}")]
    Build(#[from] lettre::error::Error),
}

const DEFAULT_SMTP_PORT: u16 = 587;
const DEFAULT_FROM_ADDRESS: &str = "Pressroom <noreply@pressroom.local>";

#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    /// Sender mailbox, optionally with a display name.
    pub from_address: String,
    /// Username and password, when the relay requires authentication.
    pub credentials: Option<(String, String)>,
}

impl EmailConfig {
    /// `None` when `SMTP_HOST` is unset, which disables email entirely.
    ///
    /// Also reads `SMTP_PORT` (default 587), `SMTP_FROM`, and the
    /// `SMTP_USER`/`SMTP_PASSWORD` pair. Panics on a malformed port or on
    /// only half of the credential pair being set.
    pub fn from_env() -> Option<Self> {
        let smtp_host = std::env::var("SMTP_HOST")
            .ok()
            .filter(|h| !h.trim().is_empty())?;

        let smtp_port = parse_port(std::env::var("SMTP_PORT").ok().as_deref());
        let credentials = pair_credentials(
            std::env::var("SMTP_USER").ok(),
            std::env::var("SMTP_PASSWORD").ok(),
        );

        Some(Self {
            smtp_host,
            smtp_port,
            from_address: std::env::var("SMTP_FROM")
                .unwrap_or_else(|_| DEFAULT_FROM_ADDRESS.to_string()),
            credentials,
        })
    }
}

fn parse_port(raw: Option<&str>) -> u16 {
    match raw.map(str::trim).filter(|p| !p.is_empty()) {
        Some(port) => port
            .parse()
            .unwrap_or_else(|e| panic!("SMTP_PORT is malformed ({port:?}): {e}")),
        None => DEFAULT_SMTP_PORT,
    }
}

fn pair_credentials(user: Option<String>, password: Option<String>) -> Option<(String, String)> {
    match (user, password) {
        (Some(user), Some(password)) => Some((user, password)),
        (None, None) => None,
        (Some(_), None) => panic!("SMTP_USER is set but SMTP_PASSWORD is not"),
        (None, Some(_)) => panic!("SMTP_PASSWORD is set but SMTP_USER is not"),
    }
}

/// A plain-text message ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Anything that can deliver an [`OutgoingEmail`].
pub trait Mailer: Send + Sync + 'static {
    fn send(&self, email: &OutgoingEmail) -> impl Future<Output = Result<(), EmailError>> + Send;
}

/// STARTTLS SMTP relay.
pub struct EmailDelivery {
    from: Mailbox,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl EmailDelivery {
    pub fn new(config: EmailConfig) -> Result<Self, EmailError> {
        let from: Mailbox = config.from_address.parse()?;

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port);
        if let Some((user, password)) = config.credentials {
            builder = builder.credentials(Credentials::new(user, password));
        }

        Ok(Self {
            from,
            transport: builder.build(),
        })
    }
}

fn build_message(from: &Mailbox, email: &OutgoingEmail) -> Result<Message, EmailError> {
    let message = Message::builder()
        .from(from.clone())
        .to(email.to.parse()?)
        .subject(email.subject.as_str())
        .header(ContentType::TEXT_PLAIN)
        .body(email.body.clone())?;
    Ok(message)
}

impl Mailer for EmailDelivery {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), EmailError> {
        let message = build_message(&self.from, email)?;
        self.transport.send(message).await?;
        tracing::info!(to = %email.to, subject = %email.subject, "Email sent");
        Ok(())
    }
}
