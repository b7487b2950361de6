//! # In-Memory Queue Doubles
//!
//! Scriptable implementations of the queue traits for exercising the
//! consumer lifecycle without a queue endpoint.
//!
//! A [`MockQueue`] hands out receive sessions from a script. Once the script
//! runs out, every further session behaves like an idle queue: it waits for
//! its max wait and ends empty. Handler activity and acknowledgments are
//! recorded in one shared event log, in the order they happened.

use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use crate::messaging::{
    InboundMessage, MessageHandler, MessagingError, MessagingResult, QueueConnection,
    QueueConnector, ReceiveSession,
};

/// What a scripted receive session does
#[derive(Debug, Clone)]
pub enum SessionScript {
    /// Deliver these messages, then end
    Messages(Vec<InboundMessage>),
    /// Fail while opening the session
    FailOpen(String),
    /// Never deliver anything and never end
    Block,
}

/// Entries of the shared event log
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueueEvent {
    Handled(i64),
    HandlerFailed(i64),
    Completed(i64),
}

#[derive(Debug, Default)]
struct MockQueueState {
    sessions: Mutex<VecDeque<SessionScript>>,
    events: Mutex<Vec<QueueEvent>>,
    session_opened_at: Mutex<Vec<Instant>>,
    connect_attempts: AtomicUsize,
    open_attempts: AtomicUsize,
    close_calls: AtomicUsize,
    fail_connect: AtomicBool,
    fail_close: AtomicBool,
}

/// Scriptable queue endpoint; clones share state
#[derive(Debug, Clone, Default)]
pub struct MockQueue {
    state: Arc<MockQueueState>,
}

impl MockQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sessions(sessions: impl IntoIterator<Item = SessionScript>) -> Self {
        let queue = Self::new();
        for session in sessions {
            queue.push_session(session);
        }
        queue
    }

    pub fn push_session(&self, session: SessionScript) {
        self.state.sessions.lock().unwrap().push_back(session);
    }

    pub fn fail_connect(&self, fail: bool) {
        self.state.fail_connect.store(fail, Ordering::SeqCst);
    }

    pub fn fail_close(&self, fail: bool) {
        self.state.fail_close.store(fail, Ordering::SeqCst);
    }

    pub fn connector(&self) -> Arc<dyn QueueConnector> {
        Arc::new(self.clone())
    }

    pub fn record(&self, event: QueueEvent) {
        self.state.events.lock().unwrap().push(event);
    }

    pub fn events(&self) -> Vec<QueueEvent> {
        self.state.events.lock().unwrap().clone()
    }

    pub fn completed_ids(&self) -> Vec<i64> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                QueueEvent::Completed(id) => Some(id),
                _ => None,
            })
            .collect()
    }

    pub fn session_opened_at(&self) -> Vec<Instant> {
        self.state.session_opened_at.lock().unwrap().clone()
    }

    pub fn connect_attempts(&self) -> usize {
        self.state.connect_attempts.load(Ordering::SeqCst)
    }

    pub fn open_attempts(&self) -> usize {
        self.state.open_attempts.load(Ordering::SeqCst)
    }

    pub fn close_calls(&self) -> usize {
        self.state.close_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QueueConnector for MockQueue {
    async fn connect(&self, _connection_string: &str) -> MessagingResult<Arc<dyn QueueConnection>> {
        self.state.connect_attempts.fetch_add(1, Ordering::SeqCst);
        if self.state.fail_connect.load(Ordering::SeqCst) {
            return Err(MessagingError::connection("mock endpoint unreachable"));
        }
        Ok(Arc::new(self.clone()))
    }
}

#[async_trait]
impl QueueConnection for MockQueue {
    async fn open_session(
        &self,
        queue_name: &str,
        max_wait: Duration,
    ) -> MessagingResult<Box<dyn ReceiveSession>> {
        self.state.open_attempts.fetch_add(1, Ordering::SeqCst);
        self.state
            .session_opened_at
            .lock()
            .unwrap()
            .push(Instant::now());

        let script = self.state.sessions.lock().unwrap().pop_front();
        let mode = match script {
            Some(SessionScript::Messages(messages)) => SessionMode::Deliver(messages.into()),
            Some(SessionScript::FailOpen(reason)) => {
                return Err(MessagingError::queue_operation(queue_name, "receive", reason));
            }
            Some(SessionScript::Block) => SessionMode::Block,
            None => SessionMode::Idle(max_wait),
        };

        Ok(Box::new(MockSession {
            queue: self.clone(),
            mode,
        }))
    }

    async fn close(&self) -> MessagingResult<()> {
        self.state.close_calls.fetch_add(1, Ordering::SeqCst);
        if self.state.fail_close.load(Ordering::SeqCst) {
            return Err(MessagingError::connection("mock close failure"));
        }
        Ok(())
    }
}

enum SessionMode {
    Deliver(VecDeque<InboundMessage>),
    Idle(Duration),
    Block,
}

struct MockSession {
    queue: MockQueue,
    mode: SessionMode,
}

#[async_trait]
impl ReceiveSession for MockSession {
    async fn next_message(&mut self) -> MessagingResult<Option<InboundMessage>> {
        match &mut self.mode {
            SessionMode::Deliver(messages) => Ok(messages.pop_front()),
            SessionMode::Idle(max_wait) => {
                tokio::time::sleep(*max_wait).await;
                Ok(None)
            }
            SessionMode::Block => std::future::pending().await,
        }
    }

    async fn complete(&mut self, message: &InboundMessage) -> MessagingResult<()> {
        self.queue.record(QueueEvent::Completed(message.message_id));
        Ok(())
    }
}

/// Handler that records into the queue's event log and misbehaves on request
#[derive(Debug)]
pub struct RecordingHandler {
    queue: MockQueue,
    fail_once: Mutex<HashSet<i64>>,
    panic_on: Option<i64>,
    stop_after: Option<(i64, Arc<AtomicBool>)>,
}

impl RecordingHandler {
    pub fn new(queue: &MockQueue) -> Self {
        Self {
            queue: queue.clone(),
            fail_once: Mutex::new(HashSet::new()),
            panic_on: None,
            stop_after: None,
        }
    }

    /// Fail the first delivery of `message_id`
    pub fn failing_once_on(self, message_id: i64) -> Self {
        self.fail_once.lock().unwrap().insert(message_id);
        self
    }

    pub fn panicking_on(mut self, message_id: i64) -> Self {
        self.panic_on = Some(message_id);
        self
    }

    /// Clear `running` right after handling `message_id`
    pub fn clearing_flag_after(mut self, message_id: i64, running: Arc<AtomicBool>) -> Self {
        self.stop_after = Some((message_id, running));
        self
    }
}

#[async_trait]
impl MessageHandler for RecordingHandler {
    async fn handle(&self, message: &InboundMessage) -> MessagingResult<()> {
        let id = message.message_id;

        if self.panic_on == Some(id) {
            panic!("handler blew up on message {id}");
        }

        if self.fail_once.lock().unwrap().remove(&id) {
            self.queue.record(QueueEvent::HandlerFailed(id));
            return Err(MessagingError::handler(id, "scripted failure"));
        }

        self.queue.record(QueueEvent::Handled(id));
        if let Some((stop_id, running)) = &self.stop_after {
            if *stop_id == id {
                running.store(false, Ordering::SeqCst);
            }
        }
        Ok(())
    }
}

/// Build a batch of messages with the given ids
pub fn messages(ids: impl IntoIterator<Item = i64>) -> Vec<InboundMessage> {
    ids.into_iter()
        .map(|id| InboundMessage::new(id, format!("booking event {id}")))
        .collect()
}

/// Poll `condition` on a short interval until it holds (panics after 30s of clock time).
///
/// The budget covers several back-to-back 5s backoffs.
pub async fn wait_until(mut condition: impl FnMut() -> bool) {
    for _ in 0..3000 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("condition not met within 30s");
}
