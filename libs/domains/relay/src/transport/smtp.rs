use super::{DataStream, SmtpDialer, SmtpSession};
use crate::config::RelayConfig;
use crate::error::TransportError;
use async_trait::async_trait;
use lettre::Address;
use lettre::transport::smtp::client::AsyncSmtpConnection;
use lettre::transport::smtp::commands::{Data, Mail, Rcpt};
use lettre::transport::smtp::extension::ClientId;
use std::time::Duration;
use tracing::debug;

/// Plain-TCP SMTP dialer built on lettre's async connection.
#[derive(Clone, Debug)]
pub struct LettreDialer {
    hello_name: ClientId,
    connect_timeout: Duration,
}

impl LettreDialer {
    pub fn new(hello_name: impl Into<String>, connect_timeout: Duration) -> Self {
        Self {
            hello_name: ClientId::Domain(hello_name.into()),
            connect_timeout,
        }
    }

    pub fn from_config(config: &RelayConfig) -> Self {
        Self::new(config.hello_name.clone(), config.timeout)
    }
}

#[async_trait]
impl SmtpDialer for LettreDialer {
    async fn open_session(&self, address: &str) -> Result<Box<dyn SmtpSession>, TransportError> {
        let connection = AsyncSmtpConnection::connect_tokio1(
            address,
            Some(self.connect_timeout),
            &self.hello_name,
            None,
            None,
        )
        .await?;

        debug!(address, "SMTP session opened");
        Ok(Box::new(LettreSession {
            connection: Some(connection),
        }))
    }
}

/// A live SMTP connection. `None` once closed.
pub struct LettreSession {
    connection: Option<AsyncSmtpConnection>,
}

impl LettreSession {
    fn connection(&mut self) -> Result<&mut AsyncSmtpConnection, TransportError> {
        self.connection
            .as_mut()
            .ok_or_else(|| TransportError::Rejected("SMTP session already closed".to_string()))
    }
}

fn parse_address(raw: &str) -> Result<Address, TransportError> {
    raw.parse()
        .map_err(|_| TransportError::InvalidAddress(raw.to_string()))
}

#[async_trait]
impl SmtpSession for LettreSession {
    async fn set_sender(&mut self, address: &str) -> Result<(), TransportError> {
        let sender = parse_address(address)?;
        self.connection()?
            .command(Mail::new(Some(sender), vec![]))
            .await?;
        Ok(())
    }

    async fn set_recipient(&mut self, address: &str) -> Result<(), TransportError> {
        let recipient = parse_address(address)?;
        self.connection()?
            .command(Rcpt::new(recipient, vec![]))
            .await?;
        Ok(())
    }

    async fn open_data_stream<'a>(
        &'a mut self,
    ) -> Result<Box<dyn DataStream + 'a>, TransportError> {
        let connection = self.connection()?;
        connection.command(Data).await?;
        Ok(Box::new(LettreDataStream {
            connection,
            buffer: Vec::new(),
        }))
    }

    async fn quit(&mut self) -> Result<(), TransportError> {
        self.connection()?.quit().await?;
        Ok(())
    }

    async fn close(&mut self) {
        if let Some(mut connection) = self.connection.take() {
            // Sends QUIT unless already sent, then drops the socket.
            connection.abort().await;
        }
    }
}

/// Buffers the content; lettre dot-stuffs it and appends the terminator on close.
struct LettreDataStream<'a> {
    connection: &'a mut AsyncSmtpConnection,
    buffer: Vec<u8>,
}

#[async_trait]
impl DataStream for LettreDataStream<'_> {
    async fn write(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        self.buffer.extend_from_slice(bytes);
        Ok(())
    }

    async fn close(self: Box<Self>) -> Result<(), TransportError> {
        let LettreDataStream { connection, buffer } = *self;
        connection.message(&buffer).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
    use tokio::net::TcpListener;

    /// Minimal SMTP server that accepts one message and returns the lines it read.
    async fn fake_server(listener: TcpListener, rcpt_reply: &'static str) -> Vec<String> {
        let (socket, _) = listener.accept().await.unwrap();
        let (read, mut write) = socket.into_split();
        let mut lines = BufReader::new(read).lines();
        let mut seen = Vec::new();

        write.write_all(b"220 test ESMTP\r\n").await.unwrap();
        let mut in_data = false;
        while let Ok(Some(line)) = lines.next_line().await {
            seen.push(line.clone());
            let reply: &[u8] = if in_data {
                if line == "." {
                    in_data = false;
                    b"250 queued\r\n"
                } else {
                    continue;
                }
            } else if line.starts_with("EHLO") {
                b"250 test\r\n"
            } else if line.starts_with("MAIL FROM") {
                b"250 ok\r\n"
            } else if line.starts_with("RCPT TO") {
                rcpt_reply.as_bytes()
            } else if line == "DATA" {
                in_data = true;
                b"354 go ahead\r\n"
            } else if line == "QUIT" {
                write.write_all(b"221 bye\r\n").await.unwrap();
                break;
            } else {
                b"500 unknown\r\n"
            };
            write.write_all(reply).await.unwrap();
        }
        seen
    }

    #[tokio::test]
    async fn test_full_conversation_against_local_server() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap().to_string();
        let server = tokio::spawn(fake_server(listener, "250 ok\r\n"));

        let dialer = LettreDialer::new("client.test", Duration::from_secs(5));
        let mut session = dialer.open_session(&address).await.unwrap();
        session.set_sender("from@example.com").await.unwrap();
        session.set_recipient("to@example.com").await.unwrap();
        {
            let mut data = session.open_data_stream().await.unwrap();
            data.write(b"Subject: hi\r\n\r\n.leading dot").await.unwrap();
            data.close().await.unwrap();
        }
        session.quit().await.unwrap();
        session.close().await;
        session.close().await;

        let seen = server.await.unwrap();
        assert_eq!(seen[0], "EHLO client.test");
        assert!(seen.contains(&"MAIL FROM:<from@example.com>".to_string()));
        assert!(seen.contains(&"RCPT TO:<to@example.com>".to_string()));
        assert!(seen.contains(&"..leading dot".to_string()));
        assert_eq!(seen.last().map(String::as_str), Some("QUIT"));
    }

    #[tokio::test]
    async fn test_rejected_recipient_is_an_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap().to_string();
        let server = tokio::spawn(fake_server(listener, "550 no such user\r\n"));

        let dialer = LettreDialer::new("client.test", Duration::from_secs(5));
        let mut session = dialer.open_session(&address).await.unwrap();
        session.set_sender("from@example.com").await.unwrap();
        let err = session.set_recipient("nobody@example.com").await.unwrap_err();
        assert!(matches!(err, TransportError::Smtp(_)));

        session.close().await;
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_invalid_address_never_reaches_server() {
        let mut session = LettreSession { connection: None };
        let err = session.set_sender("not an address").await.unwrap_err();
        assert!(matches!(err, TransportError::InvalidAddress(_)));
    }

    #[tokio::test]
    async fn test_connection_refused() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap().to_string();
        drop(listener);

        let dialer = LettreDialer::new("client.test", Duration::from_secs(1));
        assert!(dialer.open_session(&address).await.is_err());
    }
}
