use std::path::PathBuf;

/// Default cap on alert playback length.
pub const DEFAULT_MAX_DURATION_MS: u64 = 8000;

/// How the alert sound is produced.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioSettings {
    /// Emit a notification chime instead of playing a file.
    pub use_system_sound: bool,
    /// Sound file played when `use_system_sound` is off.
    pub custom_sound_path: Option<PathBuf>,
    /// Apply the fade-in/fade-out envelope.
    pub fade_enabled: bool,
    /// Playback is cut off after this many milliseconds.
    pub max_duration_ms: u64,
    /// Nominal linear volume in `[0.0, 1.0]`.
    pub volume: f32,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            use_system_sound: true,
            custom_sound_path: None,
            fade_enabled: true,
            max_duration_ms: DEFAULT_MAX_DURATION_MS,
            volume: 1.0,
        }
    }
}
