//! Sequential per-recipient send pipeline.

use crate::mask::{mask_email, mask_name, UNKNOWN_EMAIL, UNKNOWN_NAME};
use crate::send_log::SendLog;
use crate::smtp::{Mailer, OutgoingEmail};
use crate::template;
use crate::types::{BatchResult, DeliveryOutcome, Recipient, ResponseStatus, SendRequest};

const SENT: &str = "Sent";
const NO_EMAIL_PROVIDED: &str = "Failed: No email provided";

pub struct BatchSender<'a> {
    mailer: &'a dyn Mailer,
    send_log: &'a dyn SendLog,
}

impl<'a> BatchSender<'a> {
    pub fn new(mailer: &'a dyn Mailer, send_log: &'a dyn SendLog) -> Self {
        Self { mailer, send_log }
    }

    /// Sends one message per recipient, in order. A failing recipient never
    /// stops the rest of the batch.
    pub async fn send(&self, request: &SendRequest) -> BatchResult {
        let mut results = Vec::with_capacity(request.recipients.len());
        for recipient in &request.recipients {
            results.push(self.send_one(request, recipient).await);
        }

        BatchResult {
            status: ResponseStatus::Success,
            message: format!("Processed {} emails", results.len()),
            results,
        }
    }

    async fn send_one(&self, request: &SendRequest, recipient: &Recipient) -> DeliveryOutcome {
        let Some(email) = recipient.email() else {
            return DeliveryOutcome {
                email: UNKNOWN_EMAIL.to_string(),
                masked_email: UNKNOWN_EMAIL.to_string(),
                masked_name: UNKNOWN_NAME.to_string(),
                status: NO_EMAIL_PROVIDED.to_string(),
            };
        };

        let masked_name = mask_name(recipient.name());
        let masked_email = mask_email(Some(email));

        let result = match template::render(&request.email_template, recipient, &masked_name) {
            Ok(body) => {
                let outgoing = OutgoingEmail {
                    service_type: request.service_type.clone(),
                    sender_email: request.sender_email.clone(),
                    password: request.password.clone(),
                    recipient_email: email.to_string(),
                    subject: request.subject.clone(),
                    body,
                };
                self.mailer
                    .deliver(&outgoing)
                    .await
                    .map_err(|e| e.to_string())
            }
            Err(e) => Err(format!("Template error: {}", e)),
        };

        let status = match result {
            Ok(()) => {
                self.send_log
                    .info(&format!("Email to {}: {}", masked_email, SENT));
                SENT.to_string()
            }
            Err(reason) => {
                let status = format!("Failed: {}", reason);
                // SMTP replies may echo the recipient address back. Anything
                // without an '@' is too short to rewrite safely.
                let logged = if email.contains('@') {
                    status.replace(email, &masked_email)
                } else {
                    status.clone()
                };
                self.send_log
                    .error(&format!("Email to {}: {}", masked_email, logged));
                status
            }
        };

        DeliveryOutcome {
            email: email.to_string(),
            masked_email,
            masked_name,
            status,
        }
    }
}
