use crate::config::{default_true, default_window_x, default_window_y};

use serde::{Deserialize, Serialize};

/// Floating countdown window placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowConfig {
    /// Left edge in physical pixels.
    #[serde(default = "default_window_x")]
    pub x: i32,
    /// Top edge in physical pixels.
    #[serde(default = "default_window_y")]
    pub y: i32,
    /// Show the window while a countdown runs.
    #[serde(default = "default_true")]
    pub visible: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            x: default_window_x(),
            y: default_window_y(),
            visible: default_true(),
        }
    }
}
