mod decoder;
mod id;
mod message;
mod normalize;

pub use decoder::{buffered_text_stream, decode_text_stream, TextStream, Utf8StreamDecoder};
pub use id::MessageId;
pub use message::{Message, Role};
pub use normalize::{normalize_messages, parse_timestamp, MessagesEnvelope, ServerMessage};
