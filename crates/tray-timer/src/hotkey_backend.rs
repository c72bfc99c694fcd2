//! Global hotkey backend on `global-hotkey`.
//!
//! The manager must be created and kept on the thread that runs the `tao`
//! event loop, which pumps the OS messages hotkey delivery depends on.

use crate::{AppError, AppResult};

use std::panic::Location;

use error_location::ErrorLocation;
use global_hotkey::{GlobalHotKeyManager, HotKeyState};
use tracing::{debug, instrument};
use tray_timer_core::{CoreResult, HotkeyBackend, HotkeyCombo, NativeHotkeyId, ReminderError};

/// [`HotkeyBackend`] over a [`GlobalHotKeyManager`].
pub struct GlobalHotkeyBackend {
    manager: GlobalHotKeyManager,
}

impl GlobalHotkeyBackend {
    /// Create the OS hotkey manager.
    #[track_caller]
    #[instrument]
    pub(crate) fn new() -> AppResult<Self> {
        let manager =
            GlobalHotKeyManager::new().map_err(|e| AppError::HotkeyRegistrationFailed {
                reason: format!("Failed to create manager: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        Ok(Self { manager })
    }
}

impl HotkeyBackend for GlobalHotkeyBackend {
    #[track_caller]
    fn register(&mut self, combo: HotkeyCombo) -> CoreResult<NativeHotkeyId> {
        let hotkey = combo.to_hotkey();

        self.manager.register(hotkey).map_err(|e| match e {
            global_hotkey::Error::AlreadyRegistered(_) | global_hotkey::Error::FailedToRegister(_) => {
                ReminderError::HotkeyConflict {
                    combo: combo.to_string(),
                    reason: e.to_string(),
                    location: ErrorLocation::from(Location::caller()),
                }
            }
            other => ReminderError::HotkeyBackend {
                reason: format!("Failed to register {}: {}", combo, other),
                location: ErrorLocation::from(Location::caller()),
            },
        })?;

        debug!(combo = %combo, native_id = hotkey.id(), "Hotkey bound");

        Ok(hotkey.id())
    }

    #[track_caller]
    fn unregister(&mut self, combo: HotkeyCombo) -> CoreResult<()> {
        self.manager
            .unregister(combo.to_hotkey())
            .map_err(|e| ReminderError::HotkeyBackend {
                reason: format!("Failed to unregister {}: {}", combo, e),
                location: ErrorLocation::from(Location::caller()),
            })
    }
}

/// Only key presses trigger presets; releases are ignored.
pub(crate) fn is_press(state: HotKeyState) -> bool {
    state == HotKeyState::Pressed
}
