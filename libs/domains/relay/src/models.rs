use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

/// One message to relay. Built per request and never mutated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutboundMessage {
    /// Empty means "use the configured default sender"
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
    pub is_html: bool,
}

/// Payload of `POST /send`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(default)]
pub struct SendRequest {
    /// Sender address; the configured default is used when empty
    #[validate(custom(function = "single_line", message = "Sender (from) is invalid"))]
    #[schema(example = "noreply@example.com")]
    pub from: String,

    #[validate(
        length(min = 1, message = "Recipient (to) is required"),
        custom(function = "single_line", message = "Recipient (to) is invalid")
    )]
    #[schema(example = "someone@example.com")]
    pub to: String,

    #[validate(
        length(min = 1, message = "Subject is required"),
        custom(function = "single_line", message = "Subject is invalid")
    )]
    pub subject: String,

    #[validate(length(min = 1, message = "Email body is required"))]
    pub body: String,

    /// Send the body as `text/html`
    pub html: bool,
}

/// Values that end up in a header must not break the header block.
fn single_line(value: &str) -> Result<(), ValidationError> {
    if value.contains(['\r', '\n']) {
        return Err(ValidationError::new("single_line"));
    }
    Ok(())
}

impl From<SendRequest> for OutboundMessage {
    fn from(req: SendRequest) -> Self {
        Self {
            from: req.from,
            to: req.to,
            subject: req.subject,
            body: req.body,
            is_html: req.html,
        }
    }
}

/// Payload of the contact form endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(default)]
pub struct ContactForm {
    #[validate(length(min = 1, message = "Name is required"))]
    #[schema(example = "John Doe")]
    pub name: String,

    #[validate(
        length(min = 1, message = "Email is required"),
        email(message = "Email is invalid")
    )]
    #[schema(example = "john@example.com")]
    pub email: String,

    #[validate(
        length(min = 1, message = "Subject is required"),
        custom(function = "single_line", message = "Subject is invalid")
    )]
    #[schema(example = "Inquiry")]
    pub subject: String,

    #[validate(length(min = 1, message = "Message is required"))]
    #[schema(example = "Hi")]
    pub message: String,
}

impl ContactForm {
    /// Build the notification sent to the site owner: the visitor is the
    /// sender and `html_body` is the rendered summary.
    pub fn into_message(self, to: impl Into<String>, html_body: String) -> OutboundMessage {
        OutboundMessage {
            subject: format!("Contact Form: {}", self.subject),
            body: html_body,
            from: self.email,
            to: to.into(),
            is_html: true,
        }
    }
}
