use std::borrow::Cow;
use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

pub const DEFAULT_SUBJECT: &str = "Your AI Position Application Results";

pub const DEFAULT_EMAIL_TEMPLATE: &str = "
Dear Candidate,

Thank you for applying for the internship position. We have received your application and resume.

Please fill out the Google Form to proceed to the first round:  
[https://docs.google.com/forms/d/1mubE2MraLkiYETS0vWjVuRjwocVnkuIMHb989Fir5jc/edit]

We will contact you for the next steps after reviewing your responses.

Best regards,  
Elint AI
";

#[derive(Debug, Error, PartialEq)]
pub enum RequestError {
    #[error("No data provided")]
    NoData,
    #[error("Invalid JSON body: {0}")]
    InvalidJson(String),
    #[error("Request body must be a JSON object")]
    NotAnObject,
    #[error("Missing required fields: service_type, sender_email, or password")]
    MissingSenderFields,
    #[error("No valid recipients provided")]
    NoRecipients,
}

/// A validated batch request.
pub struct SendRequest {
    pub service_type: String,
    pub sender_email: String,
    pub password: String,
    pub subject: String,
    pub email_template: String,
    pub recipients: Vec<Recipient>,
}

impl SendRequest {
    pub fn from_body(body: &[u8]) -> Result<Self, RequestError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Err(RequestError::NoData);
        }
        let value: Value =
            serde_json::from_slice(body).map_err(|e| RequestError::InvalidJson(e.to_string()))?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, RequestError> {
        let mut data = match value {
            Value::Null => return Err(RequestError::NoData),
            Value::Object(data) if data.is_empty() => return Err(RequestError::NoData),
            Value::Object(data) => data,
            _ => return Err(RequestError::NotAnObject),
        };
        let recipients = data.remove("recipients");

        let (service_type, sender_email, password) = match (
            required_text(&data, "service_type"),
            required_text(&data, "sender_email"),
            required_text(&data, "password"),
        ) {
            (Some(service_type), Some(sender_email), Some(password)) => {
                (service_type, sender_email, password)
            }
            _ => return Err(RequestError::MissingSenderFields),
        };

        let subject = optional_text(&data, "subject").unwrap_or(DEFAULT_SUBJECT);
        let email_template =
            optional_text(&data, "email_template").unwrap_or(DEFAULT_EMAIL_TEMPLATE);

        let recipients = match recipients {
            Some(Value::Array(items)) if !items.is_empty() => {
                items.into_iter().map(Recipient::from_value).collect()
            }
            _ => return Err(RequestError::NoRecipients),
        };

        Ok(Self {
            service_type: service_type.to_string(),
            sender_email: sender_email.to_string(),
            password: password.to_string(),
            subject: subject.to_string(),
            email_template: email_template.to_string(),
            recipients,
        })
    }
}

impl fmt::Debug for SendRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SendRequest")
            .field("service_type", &self.service_type)
            .field("subject", &self.subject)
            .field("recipients", &self.recipients.len())
            .finish_non_exhaustive()
    }
}

fn required_text<'a>(data: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    optional_text(data, key).filter(|text| !text.is_empty())
}

fn optional_text<'a>(data: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    data.get(key).and_then(Value::as_str)
}

/// One addressee. Fields other than `email` and `name` are only used for
/// template substitution.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Recipient {
    fields: Map<String, Value>,
}

impl Recipient {
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(fields) => Self { fields },
            _ => Self::default(),
        }
    }

    pub fn email(&self) -> Option<&str> {
        self.text("email").filter(|email| !email.is_empty())
    }

    pub fn name(&self) -> Option<&str> {
        self.text("name")
    }

    fn text(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    /// Template value of a field. `null` counts as absent.
    pub fn field(&self, key: &str) -> Option<Cow<'_, str>> {
        match self.fields.get(key)? {
            Value::Null => None,
            Value::String(text) => Some(Cow::Borrowed(text)),
            other => Some(Cow::Owned(other.to_string())),
        }
    }
}

#[cfg(test)]
impl<const N: usize> From<[(&str, &str); N]> for Recipient {
    fn from(fields: [(&str, &str); N]) -> Self {
        Self {
            fields: fields
                .into_iter()
                .map(|(key, value)| (key.to_string(), Value::String(value.to_string())))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeliveryOutcome {
    pub email: String,
    pub masked_email: String,
    pub masked_name: String,
    pub status: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Error,
}

#[derive(Debug, Serialize)]
pub struct BatchResult {
    pub status: ResponseStatus,
    pub message: String,
    pub results: Vec<DeliveryOutcome>,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: ResponseStatus,
    pub message: String,
}
