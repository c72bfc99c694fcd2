use crate::config::{
    default_enable_fade, default_max_duration_ms, default_use_system_sound, default_volume,
};

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tray_timer_core::{AudioSettings, clamp_volume};

/// Alert sound configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Send a notification chime instead of playing a file.
    #[serde(default = "default_use_system_sound")]
    pub use_system_sound: bool,
    /// Sound file played when `use_system_sound` is off.
    #[serde(default)]
    pub custom_sound_path: Option<PathBuf>,
    /// Fade the sound in and out.
    #[serde(default = "default_enable_fade")]
    pub enable_fade: bool,
    /// Playback is cut off after this many milliseconds.
    #[serde(default = "default_max_duration_ms")]
    pub max_duration_ms: u64,
    /// Linear volume in `[0.0, 1.0]`.
    #[serde(default = "default_volume")]
    pub volume: f32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            use_system_sound: default_use_system_sound(),
            custom_sound_path: None,
            enable_fade: default_enable_fade(),
            max_duration_ms: default_max_duration_ms(),
            volume: default_volume(),
        }
    }
}

impl AudioConfig {
    /// Settings handed to the playback engine.
    pub fn to_settings(&self) -> AudioSettings {
        AudioSettings {
            use_system_sound: self.use_system_sound,
            custom_sound_path: self.custom_sound_path.clone(),
            fade_enabled: self.enable_fade,
            max_duration_ms: self.max_duration_ms,
            volume: clamp_volume(self.volume),
        }
    }
}
