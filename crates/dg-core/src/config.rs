use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_TYPING_INTERVAL_MS: u64 = 50;
pub const DEFAULT_FADE_IN_MS: u64 = 500;
pub const DEFAULT_FADE_OUT_MS: u64 = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DialogueConfig {
    pub typing_interval_ms: u64,
    pub fade_in_ms: u64,
    pub fade_out_ms: u64,
    pub auto_advance: bool,
    pub popups_after_dialogue: bool,
}

impl Default for DialogueConfig {
    fn default() -> Self {
        Self {
            typing_interval_ms: DEFAULT_TYPING_INTERVAL_MS,
            fade_in_ms: DEFAULT_FADE_IN_MS,
            fade_out_ms: DEFAULT_FADE_OUT_MS,
            auto_advance: true,
            popups_after_dialogue: true,
        }
    }
}

impl DialogueConfig {
    pub fn typing_interval(&self) -> Duration {
        Duration::from_millis(self.typing_interval_ms)
    }

    pub fn fade_in(&self) -> Duration {
        Duration::from_millis(self.fade_in_ms)
    }

    pub fn fade_out(&self) -> Duration {
        Duration::from_millis(self.fade_out_ms)
    }
}
