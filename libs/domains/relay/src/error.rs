use axum_helpers::AppError;
use std::time::Duration;
use thiserror::Error;

/// Failure reported by a transport step.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    #[error("invalid mail address '{0}'")]
    InvalidAddress(String),

    /// Injected or synthetic rejection without an underlying protocol error.
    #[error("{0}")]
    Rejected(String),
}

/// Terminal outcome of a failed relay attempt, one variant per step.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("failed to connect to SMTP server {address}: {source}")]
    Connection {
        address: String,
        #[source]
        source: TransportError,
    },

    #[error("sender rejected: {0}")]
    SenderRejected(#[source] TransportError),

    #[error("recipient rejected: {0}")]
    RecipientRejected(#[source] TransportError),

    #[error("failed to open data stream: {0}")]
    DataStream(#[source] TransportError),

    #[error("failed to write message: {0}")]
    Write(#[source] TransportError),

    #[error("failed to quit SMTP session: {0}")]
    Quit(#[source] TransportError),

    #[error("SMTP conversation timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    /// Rendering the message body failed; nothing was sent.
    #[error("failed to render email template: {0}")]
    Template(String),
}

impl RelayError {
    /// The body was fully transmitted and only QUIT failed.
    ///
    /// Still reported as a failure, but the server may have accepted the message.
    pub fn is_delivered_unconfirmed(&self) -> bool {
        matches!(self, RelayError::Quit(_))
    }

    /// Short step name for structured logs.
    pub fn step(&self) -> &'static str {
        match self {
            RelayError::Connection { .. } => "connect",
            RelayError::SenderRejected(_) => "mail_from",
            RelayError::RecipientRejected(_) => "rcpt_to",
            RelayError::DataStream(_) => "data",
            RelayError::Write(_) => "write",
            RelayError::Quit(_) => "quit",
            RelayError::Timeout(_) => "timeout",
            RelayError::Template(_) => "template",
        }
    }
}

pub type RelayResult<T> = Result<T, RelayError>;

/// Generic send failures echo the underlying error to the caller.
impl From<RelayError> for AppError {
    fn from(err: RelayError) -> Self {
        AppError::InternalServerError(format!("Failed to send email: {}", err))
    }
}
