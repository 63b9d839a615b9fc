use thiserror::Error;

/// Error types that can occur when talking to the chat backend.
#[derive(Debug, Error)]
pub enum ChatError {
    /// Request could not be sent or the body could not be read
    #[error("HTTP error: {0}")]
    HttpError(String),
    /// Backend answered with a non-success status
    #[error("Server error ({status}): {message}")]
    ServerError { status: u16, message: String },
    /// Response body did not have the expected shape
    #[error("Response format error: {message}. Raw response: {raw_response}")]
    ResponseFormatError {
        message: String,
        raw_response: String,
    },
    /// JSON serialization/deserialization errors
    #[error("JSON parse error: {0}")]
    JsonError(String),
    /// Backend base URL could not be parsed
    #[error("Invalid base URL: {0}")]
    InvalidUrl(String),
    /// Generic error
    #[error("{0}")]
    Generic(String),
}

impl ChatError {
    /// Human-readable description without the variant prefix.
    ///
    /// This is the text surfaced in conversation state; it may be empty when
    /// the failure carried no description.
    pub fn message(&self) -> &str {
        match self {
            ChatError::HttpError(msg)
            | ChatError::JsonError(msg)
            | ChatError::InvalidUrl(msg)
            | ChatError::Generic(msg) => msg,
            ChatError::ServerError { message, .. } => message,
            ChatError::ResponseFormatError { message, .. } => message,
        }
    }

    /// Returns the description, or `fallback` when there is none.
    pub fn describe_or(&self, fallback: &str) -> String {
        let msg = self.message().trim();
        if msg.is_empty() {
            fallback.to_string()
        } else {
            msg.to_string()
        }
    }
}

/// Converts reqwest HTTP errors into ChatErrors
impl From<reqwest::Error> for ChatError {
    fn from(err: reqwest::Error) -> Self {
        ChatError::HttpError(err.to_string())
    }
}

impl From<serde_json::Error> for ChatError {
    fn from(err: serde_json::Error) -> Self {
        ChatError::JsonError(format!(
            "{} at line {} column {}",
            err,
            err.line(),
            err.column()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_strips_variant_prefix() {
        let err = ChatError::ServerError {
            status: 502,
            message: "upstream timeout".into(),
        };
        assert_eq!(err.message(), "upstream timeout");
        assert_eq!(err.to_string(), "Server error (502): upstream timeout");
    }

    #[test]
    fn describe_or_falls_back_on_blank_message() {
        let err = ChatError::Generic("   ".into());
        assert_eq!(err.describe_or("An error occurred"), "An error occurred");
        let err = ChatError::HttpError("connection refused".into());
        assert_eq!(err.describe_or("An error occurred"), "connection refused");
    }
}
