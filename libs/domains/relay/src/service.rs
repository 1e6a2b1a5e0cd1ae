use std::sync::Arc;
use std::time::Duration;
use tokio::time::{Instant, timeout, timeout_at};
use tracing::{debug, error, info, warn};

use crate::composer::{compose, effective_from};
use crate::config::RelayConfig;
use crate::error::{RelayError, RelayResult};
use crate::models::{ContactForm, OutboundMessage};
use crate::templates::TemplateEngine;
use crate::transport::{SmtpDialer, SmtpSession};

/// Upper bound for releasing a session once the conversation has ended.
const CLOSE_TIMEOUT: Duration = Duration::from_secs(5);

/// Drives one message through MAIL FROM, RCPT TO, DATA and QUIT.
///
/// Each call is an independent attempt on its own session; nothing is
/// retried, pooled or deduplicated.
#[derive(Clone)]
pub struct RelayService {
    dialer: Arc<dyn SmtpDialer>,
    config: Arc<RelayConfig>,
    templates: TemplateEngine,
}

impl RelayService {
    /// Fails only if the built-in templates do not compile.
    pub fn new(dialer: Arc<dyn SmtpDialer>, config: Arc<RelayConfig>) -> RelayResult<Self> {
        Ok(Self {
            dialer,
            config,
            templates: TemplateEngine::new()?,
        })
    }

    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    /// Notification for a contact form submission, addressed to `to`.
    pub fn contact_message(
        &self,
        form: ContactForm,
        to: impl Into<String>,
    ) -> RelayResult<OutboundMessage> {
        let body = self.templates.render_contact(&form)?;
        Ok(form.into_message(to, body))
    }

    /// Relay `message` to the configured SMTP server.
    ///
    /// The session is closed exactly once after it has been opened, whatever
    /// the outcome. Dial and conversation together are bounded by
    /// `RelayConfig::timeout`.
    pub async fn relay(&self, message: &OutboundMessage) -> RelayResult<()> {
        let from = effective_from(message, &self.config.default_from);
        let wire = compose(message, &self.config.default_from);
        let address = self.config.address();
        let deadline = Instant::now() + self.config.timeout;

        debug!(%address, from, to = %message.to, bytes = wire.len(), "Relaying message");

        let dialed = timeout_at(deadline, self.dialer.open_session(&address)).await;
        let mut session = match dialed {
            Ok(Ok(session)) => session,
            Ok(Err(source)) => {
                let err = RelayError::Connection { address, source };
                error!(step = err.step(), error = %err, "SMTP relay failed");
                return Err(err);
            }
            Err(_) => {
                let err = RelayError::Timeout(self.config.timeout);
                error!(step = "connect", error = %err, "SMTP relay failed");
                return Err(err);
            }
        };

        let outcome = timeout_at(
            deadline,
            converse(session.as_mut(), from, &message.to, wire.as_bytes()),
        )
        .await
        .unwrap_or(Err(RelayError::Timeout(self.config.timeout)));

        if timeout(CLOSE_TIMEOUT, session.close()).await.is_err() {
            warn!(%address, "Timed out closing SMTP session");
        }

        match &outcome {
            Ok(()) => info!(to = %message.to, subject = %message.subject, "Email relayed"),
            Err(err) if err.is_delivered_unconfirmed() => {
                warn!(step = err.step(), error = %err, "Message transmitted but QUIT failed")
            }
            Err(err) => error!(step = err.step(), error = %err, "SMTP relay failed"),
        }

        outcome
    }
}

/// The envelope and content steps, in protocol order.
async fn converse(
    session: &mut dyn SmtpSession,
    from: &str,
    to: &str,
    wire: &[u8],
) -> RelayResult<()> {
    session
        .set_sender(from)
        .await
        .map_err(RelayError::SenderRejected)?;
    session
        .set_recipient(to)
        .await
        .map_err(RelayError::RecipientRejected)?;

    let mut data = session
        .open_data_stream()
        .await
        .map_err(RelayError::DataStream)?;
    data.write(wire).await.map_err(RelayError::Write)?;
    data.close().await.map_err(RelayError::Write)?;

    session.quit().await.map_err(RelayError::Quit)
}
