//! Shared test doubles for unit tests.

pub mod mock_queue;

pub use mock_queue::{
    messages, wait_until, MockQueue, QueueEvent, RecordingHandler, SessionScript,
};
