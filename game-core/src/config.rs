use std::time::Duration;

use crate::RankScale;

#[derive(Debug, Clone)]
pub struct GameConfig {
    pub ai_think_delay: Duration,  // Simulated AI "thinking" before each reply
    pub auto_ai_reply: bool,       // Schedule the AI reply after every human guess
    pub rank_scale: RankScale,
    pub ai_max_attempts: u32,      // Re-requests when the AI repeats itself
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            ai_think_delay: Duration::from_secs(3),
            auto_ai_reply: true,
            rank_scale: RankScale::default(),
            ai_max_attempts: 5,
        }
    }
}

impl GameConfig {
    pub fn with_think_delay(mut self, delay: Duration) -> Self {
        self.ai_think_delay = delay;
        self
    }

    pub fn with_auto_ai_reply(mut self, enabled: bool) -> Self {
        self.auto_ai_reply = enabled;
        self
    }
}
