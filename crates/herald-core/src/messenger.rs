//! Outbound messaging.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::SendResult;

/// Delivers text messages to actors.
///
/// Delivery is fire-and-forget from the dispatcher's point of view: a failed
/// send is logged by the caller and never changes the outcome of a command.
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Sends `text` to the actor identified by `actor_id`.
    async fn send(&self, actor_id: &str, text: &str) -> SendResult;
}

/// A shared, type-erased messenger.
pub type BoxedMessenger = Arc<dyn Messenger>;

/// A messenger that keeps every message in memory instead of delivering it.
///
/// Useful for tests and dry runs.
#[derive(Debug, Default)]
pub struct RecordingMessenger {
    sent: Mutex<Vec<(String, String)>>,
}

impl RecordingMessenger {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every `(actor_id, text)` pair sent so far, oldest first.
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().clone()
    }

    /// Returns the texts sent to one actor, oldest first.
    pub fn sent_to(&self, actor_id: &str) -> Vec<String> {
        self.sent
            .lock()
            .iter()
            .filter(|(to, _)| to == actor_id)
            .map(|(_, text)| text.clone())
            .collect()
    }

    /// Returns the number of messages sent so far.
    pub fn count(&self) -> usize {
        self.sent.lock().len()
    }

    /// Forgets all recorded messages.
    pub fn clear(&self) {
        self.sent.lock().clear();
    }
}

#[async_trait]
impl Messenger for RecordingMessenger {
    async fn send(&self, actor_id: &str, text: &str) -> SendResult {
        self.sent.lock().push((actor_id.to_string(), text.to_string()));
        Ok(())
    }
}
