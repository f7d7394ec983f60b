//! JSON bodies exchanged with the chat backend.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::emotion::EmotionalState;

/// Client → server: `POST /api/chat` body.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest<'a> {
    pub message: &'a str,
    pub enable_timing: bool,
}

impl<'a> ChatRequest<'a> {
    pub fn new(message: &'a str) -> Self {
        Self {
            message,
            enable_timing: false,
        }
    }
}

/// Server → client: chat reply. `response` is required; everything else is
/// optional and read leniently: a field of the wrong type counts as missing
/// instead of failing the whole reply.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    #[serde(default, deserialize_with = "lenient_payload")]
    pub emotional_state: Option<ChatEmotionPayload>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub processing_time: Option<f64>,
}

/// Emotional state nested in a chat reply.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatEmotionPayload {
    #[serde(default, deserialize_with = "lenient_string")]
    pub current_emotion: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub emotion_intensity: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub relationship_level: Option<f64>,
}

/// Numbers, or strings holding a number (`"5"`). Anything else is `None`.
fn lenient_f64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok().filter(|f: &f64| f.is_finite()),
        _ => None,
    })
}

fn lenient_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

/// The nested state object; a non-object value is treated as absent.
fn lenient_payload<'de, D: Deserializer<'de>>(
    d: D,
) -> Result<Option<ChatEmotionPayload>, D::Error> {
    let value = Value::deserialize(d)?;
    Ok(value
        .is_object()
        .then(|| serde_json::from_value(value).ok())
        .flatten())
}

impl From<ChatEmotionPayload> for EmotionalState {
    fn from(p: ChatEmotionPayload) -> Self {
        EmotionalState::from_parts(p.current_emotion, p.emotion_intensity, p.relationship_level)
    }
}

impl ChatResponse {
    /// Mapped state; an absent `emotional_state` object maps to all defaults.
    pub fn state(&self) -> EmotionalState {
        self.emotional_state.clone().unwrap_or_default().into()
    }
}

/// Server → client: `GET /api/emotional-state`. Note the intensity key differs
/// from the chat reply (`emotional_intensity`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StateResponse {
    #[serde(default, deserialize_with = "lenient_string")]
    pub current_emotion: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub emotional_intensity: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub relationship_level: Option<f64>,
}

impl From<StateResponse> for EmotionalState {
    fn from(s: StateResponse) -> Self {
        EmotionalState::from_parts(s.current_emotion, s.emotional_intensity, s.relationship_level)
    }
}
