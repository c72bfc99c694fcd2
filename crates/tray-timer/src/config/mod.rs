mod alert_config;
mod audio_config;
#[allow(clippy::module_inception)]
mod config;
mod countdown_config;
mod preset_config;
mod window_config;

pub(crate) use {
    alert_config::AlertConfig, audio_config::AudioConfig, config::Config,
    countdown_config::CountdownConfig, preset_config::PresetConfig, window_config::WindowConfig,
};

pub(crate) const DEFAULT_USE_SYSTEM_SOUND: bool = true;
pub(crate) const DEFAULT_ENABLE_FADE: bool = true;
pub(crate) const DEFAULT_VOLUME: f32 = 1.0;
pub(crate) const DEFAULT_ENABLE_NOTIFICATIONS: bool = true;
pub(crate) const DEFAULT_POSITION_ALERT_AT_CURSOR: bool = true;
pub(crate) const DEFAULT_WINDOW_X: i32 = 100;
pub(crate) const DEFAULT_WINDOW_Y: i32 = 100;

pub(crate) const CONFIG_FILE: &str = "config.toml";
pub(crate) const ALLOW_LIST_FILE: &str = "whitelist.config";
pub(crate) const TEXT_HISTORY_FILE: &str = "alert_texts.txt";

pub(crate) fn default_true() -> bool {
    true
}

pub(crate) fn default_use_system_sound() -> bool {
    DEFAULT_USE_SYSTEM_SOUND
}

pub(crate) fn default_enable_fade() -> bool {
    DEFAULT_ENABLE_FADE
}

pub(crate) fn default_max_duration_ms() -> u64 {
    tray_timer_core::DEFAULT_MAX_DURATION_MS
}

pub(crate) fn default_volume() -> f32 {
    DEFAULT_VOLUME
}

pub(crate) fn default_enable_notifications() -> bool {
    DEFAULT_ENABLE_NOTIFICATIONS
}

pub(crate) fn default_position_alert_at_cursor() -> bool {
    DEFAULT_POSITION_ALERT_AT_CURSOR
}

pub(crate) fn default_window_x() -> i32 {
    DEFAULT_WINDOW_X
}

pub(crate) fn default_window_y() -> i32 {
    DEFAULT_WINDOW_Y
}

/// Presets written to a fresh config file.
pub(crate) fn default_presets() -> Vec<PresetConfig> {
    vec![
        PresetConfig::new("25-minute focus", 25 * 60, Some("Ctrl+Digit2")),
        PresetConfig::new("5-minute break", 5 * 60, Some("Ctrl+Digit5")),
        PresetConfig::new("10-minute break", 10 * 60, Some("Ctrl+Digit1")),
    ]
}
