//! SMTP delivery through one of the supported providers.
//!
//! Every delivery opens its own session (EHLO, STARTTLS, EHLO, AUTH, send,
//! QUIT). The transport is built without connection pooling, so the
//! connection is closed on every exit path.

use async_trait::async_trait;
use lettre::address::AddressError;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use log::debug;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceType {
    Gmail,
    GoDaddy,
}

impl ServiceType {
    /// Case-insensitive lookup of a provider name.
    pub fn resolve(name: &str) -> Result<Self, DeliveryError> {
        match name.to_ascii_lowercase().as_str() {
            "gmail" => Ok(Self::Gmail),
            "godaddy" => Ok(Self::GoDaddy),
            _ => Err(DeliveryError::UnknownServiceType(name.to_string())),
        }
    }

    pub fn host(self) -> &'static str {
        match self {
            Self::Gmail => "smtp.gmail.com",
            Self::GoDaddy => "smtpout.secureserver.net",
        }
    }

    pub fn port(self) -> u16 {
        587
    }
}

/// Failure of a single delivery. The `Display` text is what callers see in
/// the recipient's status and never contains credentials.
#[derive(Debug, Error, PartialEq)]
pub enum DeliveryError {
    #[error("Unknown email service type: {0}")]
    UnknownServiceType(String),
    #[error("No recipient email provided")]
    MissingRecipient,
    #[error("Failed to send email: invalid {role} address: {reason}")]
    InvalidAddress { role: &'static str, reason: String },
    #[error("Failed to send email: {0}")]
    Smtp(String),
}

/// A fully rendered plain-text message for one recipient.
#[derive(Clone)]
pub struct OutgoingEmail {
    pub service_type: String,
    pub sender_email: String,
    pub password: String,
    pub recipient_email: String,
    pub subject: String,
    pub body: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn deliver(&self, email: &OutgoingEmail) -> Result<(), DeliveryError>;
}

#[derive(Debug)]
pub struct SmtpMailer;

impl SmtpMailer {
    fn build_message(email: &OutgoingEmail) -> Result<Message, DeliveryError> {
        let from = parse_mailbox(&email.sender_email, "sender")?;
        let to = parse_mailbox(email.recipient_email.trim(), "recipient")?;

        Message::builder()
            .from(from)
            .to(to)
            .subject(email.subject.as_str())
            .header(ContentType::TEXT_PLAIN)
            .body(email.body.clone())
            .map_err(|e| DeliveryError::Smtp(e.to_string()))
    }

    fn transport(
        service: ServiceType,
        email: &OutgoingEmail,
    ) -> Result<AsyncSmtpTransport<Tokio1Executor>, DeliveryError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(service.host())
            .map_err(|e| DeliveryError::Smtp(e.to_string()))?
            .port(service.port())
            .credentials(Credentials::new(
                email.sender_email.clone(),
                email.password.clone(),
            ))
            .build();
        Ok(transport)
    }
}

fn parse_mailbox(address: &str, role: &'static str) -> Result<Mailbox, DeliveryError> {
    address
        .parse()
        .map_err(|e: AddressError| DeliveryError::InvalidAddress {
            role,
            reason: e.to_string(),
        })
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn deliver(&self, email: &OutgoingEmail) -> Result<(), DeliveryError> {
        let service = ServiceType::resolve(&email.service_type)?;
        if email.recipient_email.trim().is_empty() {
            return Err(DeliveryError::MissingRecipient);
        }

        let message = Self::build_message(email)?;
        let transport = Self::transport(service, email)?;

        debug!("Opening SMTP session with {}:{}", service.host(), service.port());
        transport
            .send(message)
            .await
            .map(|_| ())
            .map_err(|e| DeliveryError::Smtp(e.to_string()))
    }
}
