use crate::chat::{Message, MessageId};

/// State transitions published by the controller, in the order applied.
#[derive(Debug, Clone, PartialEq)]
pub enum ConversationEvent {
    LoadingChanged(bool),
    /// History replaced by the initial load.
    HistoryLoaded(Vec<Message>),
    MessageAdded(Message),
    ChunkAppended {
        id: MessageId,
        fragment: String,
    },
    /// Reply placeholder dropped after a failed send.
    MessageRemoved(MessageId),
    Cleared,
    Failed(String),
}
