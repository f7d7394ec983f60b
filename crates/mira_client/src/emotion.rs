//! Companion emotional state and its display labels.

use serde::{Deserialize, Serialize};

pub const DEFAULT_EMOTION: &str = "neutral";
pub const DEFAULT_INTENSITY: f64 = 0.5;
pub const DEFAULT_RELATIONSHIP_LEVEL: u8 = 1;
pub const MAX_RELATIONSHIP_LEVEL: u8 = 10;

/// Label shown for emotion tags without a dedicated entry.
pub const UNKNOWN_EMOTION_LABEL: &str = "心情不错";

/// Emotion tag, intensity in [0, 1] and relationship level in [0, 10].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmotionalState {
    pub emotion: String,
    pub intensity: f64,
    pub relationship_level: u8,
}

impl Default for EmotionalState {
    fn default() -> Self {
        Self {
            emotion: DEFAULT_EMOTION.into(),
            intensity: DEFAULT_INTENSITY,
            relationship_level: DEFAULT_RELATIONSHIP_LEVEL,
        }
    }
}

impl EmotionalState {
    pub fn new(emotion: impl Into<String>, intensity: f64, relationship_level: u8) -> Self {
        Self {
            emotion: emotion.into(),
            intensity: intensity.clamp(0.0, 1.0),
            relationship_level: relationship_level.min(MAX_RELATIONSHIP_LEVEL),
        }
    }

    /// State a fresh session shows before the backend has said anything.
    pub fn greeting() -> Self {
        Self::new("happy", 0.8, 8)
    }

    /// Build a state from optional payload fields, substituting defaults for
    /// anything missing and clamping numbers into range. An empty tag counts
    /// as missing.
    pub fn from_parts(
        emotion: Option<String>,
        intensity: Option<f64>,
        relationship_level: Option<f64>,
    ) -> Self {
        let emotion = emotion
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty())
            .unwrap_or_else(|| DEFAULT_EMOTION.into());
        let intensity = intensity
            .filter(|i| i.is_finite())
            .map(|i| i.clamp(0.0, 1.0))
            .unwrap_or(DEFAULT_INTENSITY);
        let relationship_level = relationship_level
            .filter(|l| l.is_finite())
            .map(|l| l.round().clamp(0.0, f64::from(MAX_RELATIONSHIP_LEVEL)) as u8)
            .unwrap_or(DEFAULT_RELATIONSHIP_LEVEL);
        Self {
            emotion,
            intensity,
            relationship_level,
        }
    }

    pub fn display_label(&self) -> &'static str {
        display_label(&self.emotion)
    }

    /// One-line summary for the header bar, e.g. `心情愉悦 | 亲密度 8/10`.
    pub fn status_line(&self) -> String {
        format!(
            "{} | 亲密度 {}/{}",
            self.display_label(),
            self.relationship_level,
            MAX_RELATIONSHIP_LEVEL
        )
    }
}

/// Display label for an emotion tag; unknown tags get [`UNKNOWN_EMOTION_LABEL`].
pub fn display_label(emotion: &str) -> &'static str {
    match emotion {
        "happy" => "心情愉悦",
        "joyful" => "欣喜若狂",
        "caring" => "温柔关怀",
        "curious" => "好奇专注",
        "understanding" => "理解共情",
        "nostalgic" => "怀念温馨",
        "excited" => "兴奋期待",
        "neutral" => "平静淡然",
        "apologetic" => "有点抱歉",
        "thinking" => "认真思考",
        _ => UNKNOWN_EMOTION_LABEL,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let state = EmotionalState::from_parts(None, None, None);
        assert_eq!(state, EmotionalState::new("neutral", 0.5, 1));
        assert_eq!(state, EmotionalState::default());
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let state = EmotionalState::from_parts(Some("excited".into()), Some(1.7), Some(42.0));
        assert_eq!(state.intensity, 1.0);
        assert_eq!(state.relationship_level, 10);

        let state = EmotionalState::from_parts(Some("  ".into()), Some(-0.2), Some(-3.0));
        assert_eq!(state.emotion, "neutral");
        assert_eq!(state.intensity, 0.0);
        assert_eq!(state.relationship_level, 0);
    }

    #[test]
    fn unknown_tag_uses_generic_label() {
        let state = EmotionalState::new("melancholic", 0.3, 4);
        assert_eq!(state.display_label(), UNKNOWN_EMOTION_LABEL);
        assert_eq!(state.status_line(), "心情不错 | 亲密度 4/10");
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let json = serde_json::to_value(EmotionalState::greeting()).unwrap();
        assert_eq!(json["relationshipLevel"], 8);
        assert_eq!(json["emotion"], "happy");
    }
}
