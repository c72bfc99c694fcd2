use crate::config::AlertConfig;

use tray_timer_core::PresetId;

/// Lengths offered under "Custom countdown", in minutes.
pub const CUSTOM_MINUTES: [u32; 12] = [1, 2, 3, 5, 10, 15, 20, 30, 45, 60, 90, 120];

/// Menu label for a custom countdown length.
pub fn custom_minutes_label(minutes: u32) -> String {
    match minutes {
        1 => "1 minute".to_string(),
        m if m % 60 == 0 => format!("{} h", m / 60),
        m => format!("{} minutes", m),
    }
}

/// An alert step that can be toggled from the tray.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertStep {
    /// Minimize the window under the pointer.
    MinimizeWindow,
    /// Play the alert sound.
    PlaySound,
    /// Blank every display.
    BlankScreen,
    /// Show the popup at the pointer.
    PopupAtCursor,
}

impl AlertStep {
    /// Every step, in menu order.
    pub const ALL: [AlertStep; 4] = [
        AlertStep::MinimizeWindow,
        AlertStep::PlaySound,
        AlertStep::BlankScreen,
        AlertStep::PopupAtCursor,
    ];

    /// Menu label.
    pub fn label(self) -> &'static str {
        match self {
            AlertStep::MinimizeWindow => "Minimize window under pointer",
            AlertStep::PlaySound => "Play sound",
            AlertStep::BlankScreen => "Blank screens",
            AlertStep::PopupAtCursor => "Show message at pointer",
        }
    }

    /// Current value in `config`.
    pub fn is_enabled(self, config: &AlertConfig) -> bool {
        match self {
            AlertStep::MinimizeWindow => config.minimize_active_window,
            AlertStep::PlaySound => config.enable_notifications,
            AlertStep::BlankScreen => config.blank_screen,
            AlertStep::PopupAtCursor => config.position_alert_at_cursor,
        }
    }

    /// Set the step in `config`.
    pub fn apply(self, config: &mut AlertConfig, enabled: bool) {
        match self {
            AlertStep::MinimizeWindow => config.minimize_active_window = enabled,
            AlertStep::PlaySound => config.enable_notifications = enabled,
            AlertStep::BlankScreen => config.blank_screen = enabled,
            AlertStep::PopupAtCursor => config.position_alert_at_cursor = enabled,
        }
    }
}

/// Actions selected from the tray menu.
///
/// Toggle variants carry the new checked state of their menu item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayCommand {
    /// Start the countdown of a preset.
    StartPreset(PresetId),
    /// Start a countdown of this many minutes.
    StartMinutes(u32),
    /// Cancel the running countdown.
    StopCountdown,
    /// Loop mode on or off.
    SetLooping(bool),
    /// An alert step on or off.
    SetAlertStep(AlertStep, bool),
    /// System notification sound instead of a custom file.
    SetSystemSound(bool),
    /// Fade envelope on or off.
    SetFade(bool),
    /// Floating countdown window on or off.
    SetFloatingWindow(bool),
    /// Run the full alert now.
    PreviewAlert,
    /// Save the clipboard text as the alert message and show it.
    UseClipboardText,
    /// Forget every saved alert message.
    ClearHistory,
    /// Open the folder holding the config and allow-list files.
    OpenSettingsFolder,
    /// Quit the application.
    Exit,
}
