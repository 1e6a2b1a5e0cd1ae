//! Relay Domain
//!
//! Composes outbound emails and relays them through an upstream SMTP server,
//! one synchronous conversation per request.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← /send, /contact, /api/v1/contact/{site}
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← MAIL FROM → RCPT TO → DATA → QUIT, deadline, cleanup
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │  Transport  │  ← SmtpDialer trait: lettre over TCP, or the scripted double
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use domain_relay::{handlers, LettreDialer, RelayConfig, RelayService};
//!
//! let config = Arc::new(RelayConfig::default());
//! let dialer = Arc::new(LettreDialer::from_config(&config));
//! let service = RelayService::new(dialer, config)?;
//!
//! let router = handlers::mail_router(service);
//! # Ok::<(), domain_relay::RelayError>(())
//! ```

pub mod composer;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod service;
pub mod templates;
pub mod transport;

// Re-export commonly used types
pub use composer::{compose, compose_at};
pub use config::RelayConfig;
pub use error::{RelayError, RelayResult, TransportError};
pub use handlers::{ContactApiDoc, MailApiDoc};
pub use models::{ContactForm, OutboundMessage, SendRequest};
pub use service::RelayService;
pub use templates::TemplateEngine;
pub use transport::{
    Call, LettreDialer, Script, ScriptedDialer, SmtpDialer, SmtpSession, Stage, Step,
};
