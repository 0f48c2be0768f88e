//! HTTP chat backend.
//!
//! `POST {base_url}/chat` with a JSON body, no auth, no client timeout.

use async_trait::async_trait;
use log::{debug, info, warn};

use super::client::{BackendError, ChatBackend};
use super::types::{ChatReply, ChatRequest};

pub struct HttpChatBackend {
    base_url: String,
    client: reqwest::Client,
}

impl HttpChatBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn endpoint(&self) -> String {
        format!("{}/chat", self.base_url)
    }
}

#[async_trait]
impl ChatBackend for HttpChatBackend {
    fn name(&self) -> &str {
        "http"
    }

    async fn send(&self, request: &ChatRequest) -> Result<ChatReply, BackendError> {
        let url = self.endpoint();
        info!(
            "Chat request: url={}, session={}, language={}, message_len={}",
            url,
            request.session_id,
            request.language,
            request.user_message.len()
        );

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;

        let status = response.status();
        debug!("Chat response status: {}", status);

        if !status.is_success() {
            let err_body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            warn!("Chat backend error: {} - {}", status.as_u16(), err_body);
            return Err(BackendError::Api {
                status: status.as_u16(),
                message: err_body,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;
        let reply: ChatReply =
            serde_json::from_str(&body).map_err(|e| BackendError::Parse(e.to_string()))?;

        debug!(
            "Chat reply: {} bytes, audio={}",
            reply.reply.len(),
            reply.audio_base64.is_some()
        );
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_strips_trailing_slash() {
        let backend = HttpChatBackend::new("http://localhost:8000/");
        assert_eq!(backend.endpoint(), "http://localhost:8000/chat");
    }

    #[test]
    fn test_unreachable_backend_is_network_error() {
        // Port 9 (discard) on localhost is reliably closed in test environments
        let backend = HttpChatBackend::new("http://127.0.0.1:9");
        let request = ChatRequest {
            user_id: "u".to_string(),
            session_id: "s".to_string(),
            user_message: "Hi".to_string(),
            language: crate::core::language::Language::En,
        };
        let result = tokio_test::block_on(backend.send(&request));
        assert!(matches!(result, Err(BackendError::Network(_))));
    }
}
