//! Sound and music preferences
//!
//! Passed explicitly to whatever needs it; there is no global instance.
//! Stored as JSON by the host.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Player preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Master switch for all audio
    pub sound_enabled: bool,
    /// Background music (only audible while sound is on)
    pub music_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sound_enabled: true,
            music_enabled: true,
        }
    }
}

impl Settings {
    /// Effective sound effects flag
    pub fn sound_effects_on(&self) -> bool {
        self.sound_enabled
    }

    /// Effective music flag (respects the sound master switch)
    pub fn music_on(&self) -> bool {
        self.sound_enabled && self.music_enabled
    }

    pub fn toggle_sound(&mut self) {
        self.sound_enabled = !self.sound_enabled;
        log::info!("Sound {}", if self.sound_enabled { "on" } else { "off" });
    }

    pub fn toggle_music(&mut self) {
        self.music_enabled = !self.music_enabled;
        log::info!("Music {}", if self.music_enabled { "on" } else { "off" });
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string(self)?)
    }
}
