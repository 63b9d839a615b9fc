//! Transport to the chat backend.
//!
//! [`ChatTransport`] is the only seam through which the rest of the crate
//! performs network I/O. [`HttpChatClient`] implements it over HTTP.

mod config;
mod http;

use async_trait::async_trait;

use crate::chat::{Message, TextStream};
use crate::error::ChatError;

pub use config::{ClientConfig, StreamMode, DEFAULT_BASE_URL};
pub use http::HttpChatClient;

/// Remote operations offered by the chat backend.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Fetches the session's conversation history.
    async fn get_messages(&self) -> Result<Vec<Message>, ChatError>;

    /// Sends a question and returns the reply as a stream of text fragments.
    async fn send_message_stream(&self, question: &str) -> Result<TextStream, ChatError>;

    /// Sends a question and waits for the full updated history.
    async fn send_message(&self, _question: &str) -> Result<Vec<Message>, ChatError> {
        Err(ChatError::Generic(
            "Non-streaming chat not supported by this transport".to_string(),
        ))
    }

    /// Clears the session's conversation on the backend.
    async fn clear_chat(&self) -> Result<(), ChatError>;
}
