//! Append-only chat transcript.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Who authored a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// The human player.
    Human,
    /// The computer commentator.
    Computer,
}

/// A single chat message.
///
/// Messages are never edited or removed; ids increase with insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Insertion sequence number, unique within a transcript.
    pub id: u64,
    /// Message author.
    pub sender: Sender,
    /// Message text.
    pub text: String,
    /// When the message was appended.
    pub sent_at: DateTime<Utc>,
}

/// Ordered, append-only log of chat messages.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    next_id: u64,
    messages: Vec<ChatMessage>,
}

impl Transcript {
    /// Creates an empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message and returns its id. O(1).
    pub fn append(&mut self, sender: Sender, text: impl Into<String>) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        let text = text.into();
        debug!(id, %sender, len = text.len(), "appending chat message");
        self.messages.push(ChatMessage {
            id,
            sender,
            text,
            sent_at: Utc::now(),
        });
        id
    }

    /// Returns all messages in insertion order.
    pub fn all(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Number of messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Checks whether the transcript is empty.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
