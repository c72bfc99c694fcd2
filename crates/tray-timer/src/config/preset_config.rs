use serde::{Deserialize, Serialize};
use tracing::warn;
use tray_timer_core::{HotkeyCombo, PresetItem};

/// A `[[presets]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresetConfig {
    /// Menu label.
    pub name: String,
    /// Countdown length in seconds.
    pub seconds: u32,
    /// Hotkey in `Ctrl+Shift+Digit2` form.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hotkey: Option<String>,
}

impl PresetConfig {
    /// Create an entry.
    pub fn new(name: &str, seconds: u32, hotkey: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            seconds,
            hotkey: hotkey.map(str::to_string),
        }
    }

    /// Build the registry item.
    ///
    /// An unparseable hotkey is logged and dropped so the preset stays
    /// reachable from the menu. Returns `None` for invalid durations.
    pub fn to_item(&self) -> Option<PresetItem> {
        let hotkey = self
            .hotkey
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .and_then(|s| match s.parse::<HotkeyCombo>() {
                Ok(combo) => Some(combo),
                Err(e) => {
                    warn!(preset = %self.name, hotkey = %s, error = ?e, "Ignoring invalid hotkey");
                    None
                }
            });

        match PresetItem::new(self.name.clone(), self.seconds, hotkey) {
            Ok(item) => Some(item),
            Err(e) => {
                warn!(preset = %self.name, error = ?e, "Skipping invalid preset");
                None
            }
        }
    }
}
