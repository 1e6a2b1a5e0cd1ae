//! Capability interface over one SMTP conversation.
//!
//! [`SmtpDialer`] opens a [`SmtpSession`]; the session issues the envelope
//! commands and hands out a [`DataStream`] for the message content. Commands
//! are expected in order: sender, recipient, data open, writes, data close,
//! quit. [`SmtpSession::close`] ends the session whatever state it is in.
//!
//! Two implementations exist: [`LettreDialer`] speaks SMTP over TCP, and
//! [`ScriptedDialer`] is an in-memory double whose every step can be told to
//! succeed, fail or stall.

mod scripted;
mod smtp;

pub use self::scripted::{Call, Script, ScriptedDialer, ScriptedSession, Stage, Step};
pub use self::smtp::{LettreDialer, LettreSession};

use crate::error::TransportError;
use async_trait::async_trait;

/// Opens SMTP sessions. Shared by all requests, so it must be `Send + Sync`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SmtpDialer: Send + Sync {
    /// Connect to `address` (`host:port`) and greet the server.
    async fn open_session(&self, address: &str) -> Result<Box<dyn SmtpSession>, TransportError>;
}

/// A single-use, stateful SMTP conversation.
#[async_trait]
pub trait SmtpSession: Send {
    /// MAIL FROM
    async fn set_sender(&mut self, address: &str) -> Result<(), TransportError>;

    /// RCPT TO
    async fn set_recipient(&mut self, address: &str) -> Result<(), TransportError>;

    /// DATA. The returned stream borrows the session until it is closed.
    async fn open_data_stream<'a>(
        &'a mut self,
    ) -> Result<Box<dyn DataStream + 'a>, TransportError>;

    /// QUIT
    async fn quit(&mut self) -> Result<(), TransportError>;

    /// Release the connection. Idempotent; errors are swallowed.
    async fn close(&mut self);
}

/// Writable message content after DATA.
#[async_trait]
pub trait DataStream: Send {
    async fn write(&mut self, bytes: &[u8]) -> Result<(), TransportError>;

    /// Finish the content. A failure here means the message was not accepted.
    async fn close(self: Box<Self>) -> Result<(), TransportError>;
}
