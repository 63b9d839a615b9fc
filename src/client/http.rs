use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::cookie::Jar;
use reqwest::{Client, Response, Url};
use serde::Serialize;

use crate::chat::{
    buffered_text_stream, decode_text_stream, normalize_messages, Message, MessagesEnvelope,
    TextStream,
};
use crate::error::ChatError;

use super::config::{ClientConfig, StreamMode};
use super::ChatTransport;

const MESSAGES_PATH: &str = "/api/messages";
const CHAT_PATH: &str = "/api/chat";
const CHAT_STREAM_PATH: &str = "/api/chat/stream";
const CLEAR_PATH: &str = "/api/clear";

const FETCH_FAILED: &str = "Failed to fetch messages";
const SEND_FAILED: &str = "Failed to send message";
const CLEAR_FAILED: &str = "Failed to clear chat";

#[derive(Serialize)]
struct QuestionRequest<'a> {
    question: &'a str,
}

/// HTTP client for the chat backend.
///
/// Cookies set by the backend are stored and replayed on every request, so
/// the conversation stays tied to the backend session. Cloning is cheap.
#[derive(Debug, Clone)]
pub struct HttpChatClient {
    base_url: Arc<str>,
    stream_mode: StreamMode,
    client: Client,
}

impl HttpChatClient {
    pub fn new(config: ClientConfig) -> Result<Self, ChatError> {
        let base_url = config.normalized_base_url()?;
        let jar = Arc::new(Jar::default());
        if let Some(cookie) = config.session_cookie.as_deref() {
            seed_cookies(&jar, cookie, &base_url)?;
        }
        let mut builder = Client::builder().cookie_provider(jar);
        if let Some(sec) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(sec));
        }
        let client = builder.build()?;
        Ok(Self {
            base_url: base_url.into(),
            stream_mode: config.stream_mode,
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn stream_mode(&self) -> StreamMode {
        self.stream_mode
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post_question(&self, path: &str, question: &str) -> Result<Response, ChatError> {
        let url = self.url(path);
        log::debug!("POST {url}");
        let response = self
            .client
            .post(&url)
            .json(&QuestionRequest { question })
            .send()
            .await?;
        log::debug!("POST {url} -> {}", response.status());
        Ok(response)
    }
}

#[async_trait]
impl ChatTransport for HttpChatClient {
    async fn get_messages(&self) -> Result<Vec<Message>, ChatError> {
        let url = self.url(MESSAGES_PATH);
        log::debug!("GET {url}");
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            log::warn!("GET {url} failed with {status}");
            return Err(ChatError::ServerError {
                status: status.as_u16(),
                message: FETCH_FAILED.to_string(),
            });
        }
        let body = response.text().await?;
        parse_envelope(body)
    }

    async fn send_message_stream(&self, question: &str) -> Result<TextStream, ChatError> {
        let response = self.post_question(CHAT_STREAM_PATH, question).await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ChatError::ServerError {
                status: status.as_u16(),
                message: error_message(&body, SEND_FAILED, true),
            });
        }
        match self.stream_mode {
            StreamMode::Incremental => Ok(decode_text_stream(response.bytes_stream())),
            StreamMode::Buffered => Ok(buffered_text_stream(response.text().await?)),
        }
    }

    async fn send_message(&self, question: &str) -> Result<Vec<Message>, ChatError> {
        let response = self.post_question(CHAT_PATH, question).await?;
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(ChatError::ServerError {
                status: status.as_u16(),
                message: error_message(&body, SEND_FAILED, false),
            });
        }
        parse_envelope(body)
    }

    async fn clear_chat(&self) -> Result<(), ChatError> {
        let url = self.url(CLEAR_PATH);
        log::debug!("POST {url}");
        let response = self.client.post(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            log::warn!("POST {url} failed with {status}");
            return Err(ChatError::ServerError {
                status: status.as_u16(),
                message: CLEAR_FAILED.to_string(),
            });
        }
        Ok(())
    }
}

fn parse_envelope(body: String) -> Result<Vec<Message>, ChatError> {
    match serde_json::from_str::<MessagesEnvelope>(&body) {
        Ok(envelope) => Ok(normalize_messages(envelope.messages)),
        Err(err) => Err(ChatError::ResponseFormatError {
            message: err.to_string(),
            raw_response: body,
        }),
    }
}

/// Picks the most descriptive failure text from an error body.
///
/// A JSON body yields its `error` field or `fallback`. Any other non-empty
/// body is used verbatim when `use_text` is set.
fn error_message(body: &str, fallback: &str, use_text: bool) -> String {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(value) => value
            .get("error")
            .and_then(|e| e.as_str())
            .filter(|e| !e.is_empty())
            .unwrap_or(fallback)
            .to_string(),
        Err(_) if use_text && !body.trim().is_empty() => body.to_string(),
        Err(_) => fallback.to_string(),
    }
}

fn seed_cookies(jar: &Jar, cookie: &str, base_url: &str) -> Result<(), ChatError> {
    let url =
        Url::parse(base_url).map_err(|err| ChatError::InvalidUrl(format!("{base_url}: {err}")))?;
    for pair in cookie.split(';').map(str::trim).filter(|p| !p.is_empty()) {
        jar.add_cookie_str(pair, &url);
    }
    Ok(())
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod tests;
