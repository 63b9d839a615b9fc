use crate::error::ChatError;

/// Backend used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5001";

/// How the body of a streamed reply is consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StreamMode {
    /// Decode and yield fragments as bytes arrive.
    #[default]
    Incremental,
    /// Read the whole body, then yield it as one fragment.
    Buffered,
}

/// Configuration for [`HttpChatClient`](super::HttpChatClient).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL. Trailing slashes are ignored.
    pub base_url: String,
    /// Whole-request timeout in seconds, including the streamed body.
    pub timeout_seconds: Option<u64>,
    /// Opaque `name=value; name2=value2` cookie string to seed the session.
    pub session_cookie: Option<String>,
    pub stream_mode: StreamMode,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_seconds: None,
            session_cookie: None,
            stream_mode: StreamMode::Incremental,
        }
    }

    pub fn timeout_seconds(mut self, seconds: u64) -> Self {
        self.timeout_seconds = Some(seconds);
        self
    }

    pub fn session_cookie(mut self, cookie: impl Into<String>) -> Self {
        self.session_cookie = Some(cookie.into());
        self
    }

    pub fn stream_mode(mut self, mode: StreamMode) -> Self {
        self.stream_mode = mode;
        self
    }

    /// Base URL without trailing slashes, validated as an absolute URL.
    pub fn normalized_base_url(&self) -> Result<String, ChatError> {
        let trimmed = self.base_url.trim().trim_end_matches('/');
        reqwest::Url::parse(trimmed)
            .map_err(|err| ChatError::InvalidUrl(format!("{trimmed}: {err}")))?;
        Ok(trimmed.to_string())
    }
}
