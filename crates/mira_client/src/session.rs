//! Chat session: one conversation's in-flight gate, current emotional state,
//! and the degrade-to-fallback policy.
//!
//! Every network failure is absorbed here. Callers only ever see a reply
//! (real or canned) or the absence of data.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::client::ApiClient;
use crate::emotion::EmotionalState;
use crate::fallback::{self, FallbackSelector, RandomSelector};
use crate::messages::ChatResponse;

/// Where a reply came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplySource {
    Backend,
    Fallback,
}

/// Result of a send: reply text plus the state it leaves the companion in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatReply {
    pub reply: String,
    pub state: EmotionalState,
    pub source: ReplySource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processing_time: Option<f64>,
}

impl ChatReply {
    fn from_response(resp: ChatResponse) -> Self {
        let state = resp.state();
        Self {
            reply: resp.response,
            state,
            source: ReplySource::Backend,
            processing_time: resp.processing_time,
        }
    }

    fn from_fallback(entry: &fallback::FallbackEntry) -> Self {
        Self {
            reply: entry.reply.to_string(),
            state: entry.state(),
            source: ReplySource::Fallback,
            processing_time: None,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.source == ReplySource::Fallback
    }
}

/// Outcome of [`ChatSession::initialize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionMode {
    Online,
    Offline,
}

impl ConnectionMode {
    /// Short notice for a non-blocking toast.
    pub fn notice(self) -> &'static str {
        match self {
            ConnectionMode::Online => "💖 小梦已准备好和您聊天啦～",
            ConnectionMode::Offline => "⚠️ 离线模式：小梦可能反应会慢一些哦",
        }
    }
}

/// Clears the loading flag on every exit path of a send.
struct LoadingGuard<'a>(&'a AtomicBool);

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct ChatSession {
    client: Mutex<ApiClient>,
    loading: AtomicBool,
    current_state: Mutex<EmotionalState>,
    selector: Mutex<Box<dyn FallbackSelector>>,
}

fn lock<T: ?Sized>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

impl ChatSession {
    pub fn new(client: ApiClient) -> Self {
        Self::with_selector(client, RandomSelector::new())
    }

    pub fn with_selector(client: ApiClient, selector: impl FallbackSelector + 'static) -> Self {
        Self {
            client: Mutex::new(client),
            loading: AtomicBool::new(false),
            current_state: Mutex::new(EmotionalState::greeting()),
            selector: Mutex::new(Box::new(selector)),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }

    pub fn current_state(&self) -> EmotionalState {
        lock(&self.current_state).clone()
    }

    pub fn base_url(&self) -> String {
        lock(&self.client).base_url().to_string()
    }

    /// Point later requests at another backend. In-flight requests are unaffected.
    pub fn set_base_url(&self, base_url: &str) {
        let mut client = lock(&self.client);
        let next = client.with_base_url(base_url);
        info!(from = client.base_url(), to = next.base_url(), "backend changed");
        *client = next;
    }

    fn client(&self) -> ApiClient {
        lock(&self.client).clone()
    }

    fn apply_state(&self, state: EmotionalState) {
        *lock(&self.current_state) = state;
    }

    fn begin_send(&self) -> Option<LoadingGuard<'_>> {
        self.loading
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| LoadingGuard(&self.loading))
    }

    fn fallback_reply(&self) -> ChatReply {
        let mut selector = lock(&self.selector);
        ChatReply::from_fallback(fallback::pick(&mut **selector))
    }

    /// Send one message. Returns `None` without touching the network when the
    /// trimmed text is empty or another send is still in flight.
    pub async fn send_message(&self, text: &str) -> Option<ChatReply> {
        let message = text.trim();
        if message.is_empty() {
            debug!("ignoring empty message");
            return None;
        }
        let Some(_guard) = self.begin_send() else {
            debug!("send rejected: a message is already in flight");
            return None;
        };

        let client = self.client();
        let reply = match client.chat(message).await {
            Ok(resp) => ChatReply::from_response(resp),
            Err(e) => {
                warn!(error = %e, "chat request failed, replying from fallback table");
                self.fallback_reply()
            }
        };
        self.apply_state(reply.state.clone());
        Some(reply)
    }

    /// True only when the health endpoint answers with a success status in time.
    pub async fn check_health(&self) -> bool {
        let client = self.client();
        match client.health().await {
            Ok(()) => {
                info!(base_url = client.base_url(), "backend is healthy");
                true
            }
            Err(e) => {
                warn!(base_url = client.base_url(), error = %e, "backend health check failed");
                false
            }
        }
    }

    /// Fetch the backend's current emotional state. Does not apply it.
    pub async fn fetch_initial_state(&self) -> Option<EmotionalState> {
        match self.client().emotional_state().await {
            Ok(resp) => Some(resp.into()),
            Err(e) => {
                warn!(error = %e, "could not load initial emotional state");
                None
            }
        }
    }

    /// Startup sequence: health check, then load and apply the initial state
    /// when the backend is reachable.
    pub async fn initialize(&self) -> ConnectionMode {
        if !self.check_health().await {
            return ConnectionMode::Offline;
        }
        if let Some(state) = self.fetch_initial_state().await {
            debug!(emotion = %state.emotion, "applying initial emotional state");
            self.apply_state(state);
        }
        ConnectionMode::Online
    }
}
