use crate::chat::{Message, MessageId, Role};

/// In-memory view of one session's conversation.
///
/// Only [`ConversationController`](super::ConversationController) mutates it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConversationState {
    /// Chronological; insertion order is display order.
    pub messages: Vec<Message>,
    /// True exactly while a load, send or clear is outstanding.
    pub is_loading: bool,
    /// Last failure, cleared when the next operation starts.
    pub error: Option<String>,
}

impl ConversationState {
    /// Whether a new message may be sent now.
    pub fn can_send(&self) -> bool {
        !self.is_loading
    }

    /// True while the reply placeholder is still waiting for its first fragment.
    pub fn show_typing(&self) -> bool {
        self.is_loading
            && self
                .messages
                .last()
                .is_some_and(|m| m.role == Role::Assistant && m.is_empty())
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn message(&self, id: &MessageId) -> Option<&Message> {
        self.messages.iter().find(|m| &m.id == id)
    }

    pub(super) fn message_mut(&mut self, id: &MessageId) -> Option<&mut Message> {
        self.messages.iter_mut().find(|m| &m.id == id)
    }

    pub(super) fn remove(&mut self, id: &MessageId) -> Option<Message> {
        let index = self.messages.iter().position(|m| &m.id == id)?;
        Some(self.messages.remove(index))
    }
}
