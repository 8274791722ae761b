//! Append-only conversation log.

use docuchat_types::chat::{Message, Sender};

/// Ordered record of the conversation.
///
/// Entries are only ever appended; the whole log is cleared on session reset.
#[derive(Debug, Clone, Default)]
pub struct MessageLog {
    messages: Vec<Message>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp `text` with the current time and append it.
    pub fn append(&mut self, text: impl Into<String>, sender: Sender) {
        self.messages.push(Message::new(text, sender));
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.messages.clear();
    }
}
