//! HTTP client for the chat backend: chat, emotional state, health.

use std::time::Duration;

use reqwest::StatusCode;

use crate::messages::{ChatRequest, ChatResponse, StateResponse};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const CHAT_PATH: &str = "/api/chat";
pub const EMOTIONAL_STATE_PATH: &str = "/api/emotional-state";
pub const HEALTH_PATH: &str = "/api/health";
pub const DEFAULT_HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

/// Backend request error.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server responded with {0}")]
    Status(StatusCode),
}

/// Backend HTTP client. Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    health_timeout: Duration,
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: normalize_base_url(base_url.into()),
            health_timeout: DEFAULT_HEALTH_TIMEOUT,
        }
    }

    pub fn with_health_timeout(mut self, timeout: Duration) -> Self {
        self.health_timeout = timeout;
        self
    }

    /// Same pool and timeout, different backend.
    pub fn with_base_url(&self, base_url: impl Into<String>) -> Self {
        Self {
            http: self.http.clone(),
            base_url: normalize_base_url(base_url.into()),
            health_timeout: self.health_timeout,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `POST /api/chat`.
    pub async fn chat(&self, message: &str) -> Result<ChatResponse, ClientError> {
        let response = self
            .http
            .post(self.endpoint(CHAT_PATH))
            .json(&ChatRequest::new(message))
            .send()
            .await?;
        Ok(ensure_success(response)?.json().await?)
    }

    /// `GET /api/emotional-state`.
    pub async fn emotional_state(&self) -> Result<StateResponse, ClientError> {
        let response = self.http.get(self.endpoint(EMOTIONAL_STATE_PATH)).send().await?;
        Ok(ensure_success(response)?.json().await?)
    }

    /// `GET /api/health` with the health timeout. Only the status is checked.
    pub async fn health(&self) -> Result<(), ClientError> {
        let response = self
            .http
            .get(self.endpoint(HEALTH_PATH))
            .timeout(self.health_timeout)
            .send()
            .await?;
        ensure_success(response).map(|_| ())
    }
}

fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(ClientError::Status(status))
    }
}

fn normalize_base_url(url: String) -> String {
    let trimmed = url.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        DEFAULT_BASE_URL.into()
    } else {
        trimmed.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed() {
        let client = ApiClient::new("http://example.test:9000/");
        assert_eq!(client.endpoint(CHAT_PATH), "http://example.test:9000/api/chat");
    }

    #[test]
    fn blank_base_url_uses_default() {
        assert_eq!(ApiClient::new("  ").base_url(), DEFAULT_BASE_URL);
    }
}
