use crate::config::{default_enable_notifications, default_position_alert_at_cursor};

use serde::{Deserialize, Serialize};
use tray_timer_core::AlertConfiguration;

/// Which alert steps run when a countdown expires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertConfig {
    /// Minimize the allow-listed window under the pointer.
    #[serde(default)]
    pub minimize_active_window: bool,
    /// Play the alert sound.
    #[serde(default = "default_enable_notifications")]
    pub enable_notifications: bool,
    /// Blank every display for a few seconds.
    #[serde(default)]
    pub blank_screen: bool,
    /// Show the alert text at the pointer.
    #[serde(default = "default_position_alert_at_cursor")]
    pub position_alert_at_cursor: bool,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            minimize_active_window: false,
            enable_notifications: default_enable_notifications(),
            blank_screen: false,
            position_alert_at_cursor: default_position_alert_at_cursor(),
        }
    }
}

impl From<AlertConfig> for AlertConfiguration {
    fn from(config: AlertConfig) -> Self {
        AlertConfiguration {
            minimize_active_window: config.minimize_active_window,
            enable_notifications: config.enable_notifications,
            blank_screen: config.blank_screen,
            position_alert_at_cursor: config.position_alert_at_cursor,
        }
    }
}
