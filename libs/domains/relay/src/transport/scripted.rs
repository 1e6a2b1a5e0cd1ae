//! In-memory SMTP double for tests.

use super::{DataStream, SmtpDialer, SmtpSession};
use crate::error::TransportError;
use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// What a scripted step does when invoked.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Step {
    #[default]
    Succeed,
    /// Return `TransportError::Rejected` with this text
    Fail(String),
    /// Never complete; used to exercise deadlines
    Stall,
}

/// The programmable points of a conversation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Open,
    Sender,
    Recipient,
    DataOpen,
    Write,
    DataClose,
    Quit,
}

/// One outcome per stage; every stage succeeds unless told otherwise.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Script {
    pub open: Step,
    pub sender: Step,
    pub recipient: Step,
    pub data_open: Step,
    pub write: Step,
    pub data_close: Step,
    pub quit: Step,
}

impl Script {
    pub fn succeeding() -> Self {
        Self::default()
    }

    pub fn with(mut self, stage: Stage, step: Step) -> Self {
        *self.step_mut(stage) = step;
        self
    }

    pub fn failing_at(stage: Stage, message: impl Into<String>) -> Self {
        Self::default().with(stage, Step::Fail(message.into()))
    }

    fn step(&self, stage: Stage) -> &Step {
        match stage {
            Stage::Open => &self.open,
            Stage::Sender => &self.sender,
            Stage::Recipient => &self.recipient,
            Stage::DataOpen => &self.data_open,
            Stage::Write => &self.write,
            Stage::DataClose => &self.data_close,
            Stage::Quit => &self.quit,
        }
    }

    fn step_mut(&mut self, stage: Stage) -> &mut Step {
        match stage {
            Stage::Open => &mut self.open,
            Stage::Sender => &mut self.sender,
            Stage::Recipient => &mut self.recipient,
            Stage::DataOpen => &mut self.data_open,
            Stage::Write => &mut self.write,
            Stage::DataClose => &mut self.data_close,
            Stage::Quit => &mut self.quit,
        }
    }

    async fn run(&self, stage: Stage) -> Result<(), TransportError> {
        match self.step(stage) {
            Step::Succeed => Ok(()),
            Step::Fail(message) => Err(TransportError::Rejected(message.clone())),
            Step::Stall => std::future::pending().await,
        }
    }
}

/// A transport call as recorded by the double.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    Open(String),
    SetSender(String),
    SetRecipient(String),
    OpenData,
    Write(usize),
    CloseData,
    Quit,
    Close,
}

#[derive(Debug, Default)]
struct Recorder {
    calls: Vec<Call>,
    /// Bytes written, one entry per opened data stream
    messages: Vec<Vec<u8>>,
}

/// Dialer whose sessions follow a [`Script`] and record everything.
///
/// Clones share the same recording, so a test can hand one clone to the
/// service and inspect the other.
#[derive(Clone, Debug, Default)]
pub struct ScriptedDialer {
    script: Arc<Script>,
    recorder: Arc<Mutex<Recorder>>,
}

impl ScriptedDialer {
    pub fn new(script: Script) -> Self {
        Self {
            script: Arc::new(script),
            recorder: Arc::default(),
        }
    }

    pub fn succeeding() -> Self {
        Self::new(Script::succeeding())
    }

    pub fn failing_at(stage: Stage, message: impl Into<String>) -> Self {
        Self::new(Script::failing_at(stage, message))
    }

    /// Every call made so far, across all sessions, in order.
    pub fn calls(&self) -> Vec<Call> {
        lock(&self.recorder).calls.clone()
    }

    /// Content written through each data stream, in the order streams opened.
    pub fn messages(&self) -> Vec<Vec<u8>> {
        lock(&self.recorder).messages.clone()
    }

    /// Number of sessions dialed (successfully or not).
    pub fn conversations(&self) -> usize {
        self.count(|call| matches!(call, Call::Open(_)))
    }

    pub fn count(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        lock(&self.recorder).calls.iter().filter(|c| predicate(c)).count()
    }
}

fn lock(recorder: &Mutex<Recorder>) -> MutexGuard<'_, Recorder> {
    recorder.lock().unwrap_or_else(PoisonError::into_inner)
}

#[async_trait]
impl SmtpDialer for ScriptedDialer {
    async fn open_session(&self, address: &str) -> Result<Box<dyn SmtpSession>, TransportError> {
        lock(&self.recorder).calls.push(Call::Open(address.to_string()));
        self.script.run(Stage::Open).await?;

        Ok(Box::new(ScriptedSession {
            script: Arc::clone(&self.script),
            recorder: Arc::clone(&self.recorder),
        }))
    }
}

/// Session handed out by [`ScriptedDialer`].
#[derive(Debug)]
pub struct ScriptedSession {
    script: Arc<Script>,
    recorder: Arc<Mutex<Recorder>>,
}

impl ScriptedSession {
    fn record(&self, call: Call) {
        lock(&self.recorder).calls.push(call);
    }
}

#[async_trait]
impl SmtpSession for ScriptedSession {
    async fn set_sender(&mut self, address: &str) -> Result<(), TransportError> {
        self.record(Call::SetSender(address.to_string()));
        self.script.run(Stage::Sender).await
    }

    async fn set_recipient(&mut self, address: &str) -> Result<(), TransportError> {
        self.record(Call::SetRecipient(address.to_string()));
        self.script.run(Stage::Recipient).await
    }

    async fn open_data_stream<'a>(
        &'a mut self,
    ) -> Result<Box<dyn DataStream + 'a>, TransportError> {
        self.record(Call::OpenData);
        self.script.run(Stage::DataOpen).await?;

        let index = {
            let mut recorder = lock(&self.recorder);
            recorder.messages.push(Vec::new());
            recorder.messages.len() - 1
        };
        Ok(Box::new(ScriptedDataStream {
            script: Arc::clone(&self.script),
            recorder: Arc::clone(&self.recorder),
            index,
        }))
    }

    async fn quit(&mut self) -> Result<(), TransportError> {
        self.record(Call::Quit);
        self.script.run(Stage::Quit).await
    }

    async fn close(&mut self) {
        self.record(Call::Close);
    }
}

struct ScriptedDataStream {
    script: Arc<Script>,
    recorder: Arc<Mutex<Recorder>>,
    index: usize,
}

#[async_trait]
impl DataStream for ScriptedDataStream {
    async fn write(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        lock(&self.recorder).calls.push(Call::Write(bytes.len()));
        self.script.run(Stage::Write).await?;
        lock(&self.recorder).messages[self.index].extend_from_slice(bytes);
        Ok(())
    }

    async fn close(self: Box<Self>) -> Result<(), TransportError> {
        lock(&self.recorder).calls.push(Call::CloseData);
        self.script.run(Stage::DataClose).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_succeeding_script_records_conversation() {
        let dialer = ScriptedDialer::succeeding();
        let mut session = dialer.open_session("mail-server:25").await.unwrap();
        session.set_sender("a@example.com").await.unwrap();
        session.set_recipient("b@example.com").await.unwrap();
        let mut data = session.open_data_stream().await.unwrap();
        data.write(b"hello").await.unwrap();
        data.close().await.unwrap();
        session.quit().await.unwrap();
        session.close().await;

        assert_eq!(
            dialer.calls(),
            vec![
                Call::Open("mail-server:25".into()),
                Call::SetSender("a@example.com".into()),
                Call::SetRecipient("b@example.com".into()),
                Call::OpenData,
                Call::Write(5),
                Call::CloseData,
                Call::Quit,
                Call::Close,
            ]
        );
        assert_eq!(dialer.messages(), vec![b"hello".to_vec()]);
        assert_eq!(dialer.conversations(), 1);
    }

    #[tokio::test]
    async fn test_failing_step_returns_injected_error() {
        let dialer = ScriptedDialer::failing_at(Stage::Recipient, "550 no such user");
        let mut session = dialer.open_session("mail-server:25").await.unwrap();
        session.set_sender("a@example.com").await.unwrap();

        let err = session.set_recipient("b@example.com").await.unwrap_err();
        assert_eq!(err.to_string(), "550 no such user");
    }

    #[tokio::test]
    async fn test_failed_write_keeps_no_bytes() {
        let dialer = ScriptedDialer::failing_at(Stage::Write, "broken pipe");
        let mut session = dialer.open_session("mail-server:25").await.unwrap();
        let mut data = session.open_data_stream().await.unwrap();

        assert!(data.write(b"hello").await.is_err());
        assert_eq!(dialer.messages(), vec![Vec::<u8>::new()]);
    }

    #[test]
    fn test_script_builder() {
        let script = Script::succeeding()
            .with(Stage::Quit, Step::Fail("421".into()))
            .with(Stage::Open, Step::Stall);
        assert_eq!(script.quit, Step::Fail("421".into()));
        assert_eq!(script.open, Step::Stall);
        assert_eq!(script.sender, Step::Succeed);
    }
}
