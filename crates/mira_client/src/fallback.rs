//! Canned in-character replies used when the backend cannot answer.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::emotion::EmotionalState;

/// One canned reply and the state it puts the companion in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FallbackEntry {
    pub reply: &'static str,
    pub emotion: &'static str,
    pub intensity: f64,
    pub relationship_level: u8,
}

impl FallbackEntry {
    pub fn state(&self) -> EmotionalState {
        EmotionalState::new(self.emotion, self.intensity, self.relationship_level)
    }
}

pub const FALLBACK_REPLIES: [FallbackEntry; 3] = [
    FallbackEntry {
        reply: "啊呀，我刚才走神了一下...能再说一遍吗？ 😅",
        emotion: "apologetic",
        intensity: 0.6,
        relationship_level: 7,
    },
    FallbackEntry {
        reply: "抱歉，我现在有点反应迟钝，不过我还是很想听你说话呢～ 💕",
        emotion: "caring",
        intensity: 0.7,
        relationship_level: 8,
    },
    FallbackEntry {
        reply: "嗯...让我想想怎么回答你...（小梦正在努力思考中）🤔",
        emotion: "thinking",
        intensity: 0.5,
        relationship_level: 7,
    },
];

/// Chooses which fallback entry to use.
pub trait FallbackSelector: Send {
    /// Index in `0..len`. Larger values are wrapped by the caller.
    fn select(&mut self, len: usize) -> usize;
}

/// Uniform random choice.
pub struct RandomSelector {
    rng: StdRng,
}

impl RandomSelector {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomSelector {
    fn default() -> Self {
        Self::new()
    }
}

impl FallbackSelector for RandomSelector {
    fn select(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len.max(1))
    }
}

/// Always the same index.
#[derive(Debug, Clone, Copy)]
pub struct FixedSelector(pub usize);

impl FallbackSelector for FixedSelector {
    fn select(&mut self, _len: usize) -> usize {
        self.0
    }
}

pub fn pick(selector: &mut dyn FallbackSelector) -> &'static FallbackEntry {
    let idx = selector.select(FALLBACK_REPLIES.len()) % FALLBACK_REPLIES.len();
    &FALLBACK_REPLIES[idx]
}

pub fn is_fallback_reply(reply: &str) -> bool {
    FALLBACK_REPLIES.iter().any(|e| e.reply == reply)
}
