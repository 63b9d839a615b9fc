//! Client for a document-grounded medical question-answering backend.
//!
//! - [`client`] talks to the backend over HTTP and turns streamed reply bodies
//!   into text fragments.
//! - [`controller`] keeps one session's conversation state consistent across
//!   history loads, streamed sends and clears.
//!
//! ```no_run
//! use medchat::client::{ClientConfig, HttpChatClient};
//! use medchat::controller::ConversationController;
//!
//! # async fn demo() -> Result<(), medchat::error::ChatError> {
//! let client = HttpChatClient::new(ClientConfig::new("http://localhost:5001"))?;
//! let mut controller = ConversationController::new(client).start().await;
//! if let Err(rollback) = controller.send_message("What is metformin?").await {
//!     eprintln!("send failed: {rollback}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod chat;
pub mod client;
pub mod controller;
pub mod error;
pub mod prompts;

pub use chat::{Message, MessageId, Role};
pub use client::{ChatTransport, ClientConfig, HttpChatClient};
pub use controller::{ConversationController, ConversationState};
pub use error::ChatError;
