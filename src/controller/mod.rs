//! Conversation state machine for a single chat session.
//!
//! A send is a two-phase transition: the user message and an empty reply
//! placeholder are appended before any network I/O, the placeholder is filled
//! from the transport's fragment stream, and on failure the placeholder is
//! removed again while the user message stays. The rollback branch is an
//! explicit [`Rollback`] value rather than a propagated error.

mod events;
mod state;

use futures::StreamExt;
use tokio::sync::mpsc;

use crate::chat::{Message, MessageId};
use crate::client::ChatTransport;
use crate::error::ChatError;

pub use events::ConversationEvent;
pub use state::ConversationState;

const LOAD_FALLBACK: &str = "Failed to load messages";
const SEND_FALLBACK: &str = "An error occurred";
const CLEAR_FALLBACK: &str = "Failed to clear chat";

/// Successful result of [`ConversationController::send_message`].
#[derive(Debug, Clone, PartialEq)]
pub enum SendOutcome {
    /// Input was empty or whitespace; nothing changed.
    Ignored,
    /// The reply streamed to completion.
    Completed { assistant_id: MessageId },
}

/// A failed send after the optimistic append was undone.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{error}")]
pub struct Rollback {
    /// Text stored in [`ConversationState::error`].
    pub error: String,
    /// The removed placeholder, with whatever content had arrived.
    pub placeholder: Option<Message>,
}

pub type SendResult = Result<SendOutcome, Rollback>;

/// Owns the conversation state of one session and sequences its operations.
pub struct ConversationController<T> {
    transport: T,
    state: ConversationState,
    events: Option<mpsc::UnboundedSender<ConversationEvent>>,
}

impl<T: ChatTransport> ConversationController<T> {
    /// Creates a controller with empty state. Call [`start`](Self::start) to
    /// load the session's history.
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            state: ConversationState::default(),
            events: None,
        }
    }

    /// Publishes every state transition to `sender`.
    ///
    /// The channel is unbounded, so a caller may drain it after an operation
    /// returns without stalling the operation.
    pub fn with_events(mut self, sender: mpsc::UnboundedSender<ConversationEvent>) -> Self {
        self.events = Some(sender);
        self
    }

    /// Performs the initial history load and returns the ready controller.
    pub async fn start(mut self) -> Self {
        self.load_history().await;
        self
    }

    pub fn state(&self) -> &ConversationState {
        &self.state
    }

    async fn load_history(&mut self) {
        self.begin();
        match self.transport.get_messages().await {
            Ok(messages) => {
                log::debug!("loaded {} messages", messages.len());
                self.state.messages = messages.clone();
                self.emit(ConversationEvent::HistoryLoaded(messages));
                self.set_loading(false);
            }
            Err(err) => {
                log::warn!("loading history failed: {err}");
                self.fail(&err, LOAD_FALLBACK);
            }
        }
    }

    /// Sends `text` and streams the reply into a new assistant message.
    ///
    /// Whitespace-only input is ignored. Callers should check
    /// [`ConversationState::can_send`] first; the controller does not refuse a
    /// send while another operation's state is still loading.
    pub async fn send_message(&mut self, text: &str) -> SendResult {
        if text.trim().is_empty() {
            return Ok(SendOutcome::Ignored);
        }

        let user = Message::user(text);
        let placeholder = Message::assistant_placeholder();
        let assistant_id = placeholder.id.clone();
        self.state.messages.push(user.clone());
        self.state.messages.push(placeholder.clone());
        self.state.error = None;
        self.emit(ConversationEvent::MessageAdded(user));
        self.emit(ConversationEvent::MessageAdded(placeholder));
        self.set_loading(true);

        match self.stream_reply(text, &assistant_id).await {
            Ok(()) => {
                self.set_loading(false);
                Ok(SendOutcome::Completed { assistant_id })
            }
            Err(err) => Err(self.roll_back(&assistant_id, err)),
        }
    }

    async fn stream_reply(&mut self, question: &str, id: &MessageId) -> Result<(), ChatError> {
        let mut stream = self.transport.send_message_stream(question).await?;
        while let Some(fragment) = stream.next().await {
            let fragment = fragment?;
            if let Some(message) = self.state.message_mut(id) {
                message.append(&fragment);
            }
            self.emit(ConversationEvent::ChunkAppended {
                id: id.clone(),
                fragment,
            });
        }
        Ok(())
    }

    fn roll_back(&mut self, id: &MessageId, err: ChatError) -> Rollback {
        log::warn!("send failed, removing reply {id}: {err}");
        let placeholder = self.state.remove(id);
        if placeholder.is_some() {
            self.emit(ConversationEvent::MessageRemoved(id.clone()));
        }
        let error = self.fail(&err, SEND_FALLBACK);
        Rollback { error, placeholder }
    }

    /// Clears the conversation on the backend, then locally.
    ///
    /// On failure the local messages are kept and the error text is returned.
    pub async fn clear_messages(&mut self) -> Result<(), String> {
        self.begin();
        match self.transport.clear_chat().await {
            Ok(()) => {
                self.state.messages.clear();
                self.emit(ConversationEvent::Cleared);
                self.set_loading(false);
                Ok(())
            }
            Err(err) => {
                log::warn!("clearing chat failed: {err}");
                Err(self.fail(&err, CLEAR_FALLBACK))
            }
        }
    }

    fn begin(&mut self) {
        self.state.error = None;
        self.set_loading(true);
    }

    fn fail(&mut self, err: &ChatError, fallback: &str) -> String {
        let message = err.describe_or(fallback);
        self.state.error = Some(message.clone());
        self.set_loading(false);
        self.emit(ConversationEvent::Failed(message.clone()));
        message
    }

    fn set_loading(&mut self, loading: bool) {
        self.state.is_loading = loading;
        self.emit(ConversationEvent::LoadingChanged(loading));
    }

    fn emit(&self, event: ConversationEvent) {
        if let Some(sender) = &self.events {
            let _ = sender.send(event);
        }
    }
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;
