//! Named countdown presets bound to optional global hotkeys.

use crate::{
    CoreResult, ReminderError,
    event::{EventSender, ReminderEvent},
    hotkey::{HotkeyBackend, HotkeyCombo, HotkeyDispatcher, HotkeyId, NativeHotkeyId},
};

use std::{collections::BTreeMap, panic::Location};

use error_location::ErrorLocation;
use tracing::{debug, info, instrument, warn};

/// Index of a preset in registration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PresetId(usize);

impl PresetId {
    /// Position in [`PresetRegistry::list_presets`].
    pub fn index(self) -> usize {
        self.0
    }
}

/// A named countdown duration with an optional hotkey.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresetItem {
    name: String,
    duration_secs: u32,
    hotkey: Option<HotkeyCombo>,
}

impl PresetItem {
    /// Create a preset. Zero-length durations are rejected.
    #[track_caller]
    pub fn new(
        name: impl Into<String>,
        duration_secs: u32,
        hotkey: Option<HotkeyCombo>,
    ) -> CoreResult<Self> {
        let name = name.into();
        if duration_secs == 0 {
            return Err(ReminderError::InvalidPreset {
                name,
                reason: "duration must be at least one second".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(Self {
            name,
            duration_secs,
            hotkey,
        })
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Countdown duration in seconds.
    pub fn duration_secs(&self) -> u32 {
        self.duration_secs
    }

    /// Hotkey requested for the preset.
    pub fn hotkey(&self) -> Option<HotkeyCombo> {
        self.hotkey
    }

    /// Menu label, e.g. `25-minute focus (Ctrl+Digit2)`.
    pub fn label(&self) -> String {
        match self.hotkey {
            Some(combo) => format!("{} ({})", self.name, combo),
            None => self.name.clone(),
        }
    }
}

/// Holds presets in insertion order and maps hotkey ids back to them.
pub struct PresetRegistry<B: HotkeyBackend> {
    dispatcher: HotkeyDispatcher<B>,
    presets: Vec<PresetItem>,
    bindings: BTreeMap<HotkeyId, PresetId>,
    events: EventSender,
}

impl<B: HotkeyBackend> PresetRegistry<B> {
    /// Create an empty registry that registers hotkeys through `backend`.
    pub fn new(backend: B, events: EventSender) -> Self {
        Self {
            dispatcher: HotkeyDispatcher::new(backend),
            presets: Vec::new(),
            bindings: BTreeMap::new(),
            events,
        }
    }

    /// Add a preset and bind its hotkey.
    ///
    /// A combination owned elsewhere is reported as
    /// [`ReminderEvent::HotkeyConflict`], any other registration failure as
    /// [`ReminderEvent::HotkeyUnavailable`]. Either way the preset stays
    /// listed and can still be triggered from the menu.
    #[instrument(skip(self, item), fields(preset = %item.name()))]
    pub fn add_preset(&mut self, item: PresetItem) -> PresetId {
        let id = PresetId(self.presets.len());

        if let Some(combo) = item.hotkey() {
            match self.dispatcher.register(combo) {
                Ok(hotkey_id) => {
                    self.bindings.insert(hotkey_id, id);
                }
                Err(e @ ReminderError::HotkeyConflict { .. }) => {
                    warn!(combo = %combo, error = ?e, "Preset hotkey already in use");
                    let _ = self.events.send(ReminderEvent::HotkeyConflict {
                        preset: item.name().to_string(),
                        combo: combo.to_string(),
                        message: format!("Failed to register {}: {}", combo, e.reason()),
                    });
                }
                Err(e) => {
                    warn!(combo = %combo, error = ?e, "Hotkey facility failed for preset");
                    let _ = self.events.send(ReminderEvent::HotkeyUnavailable {
                        preset: item.name().to_string(),
                        combo: combo.to_string(),
                        message: format!("Could not bind {}: {}", combo, e.reason()),
                    });
                }
            }
        }

        info!(
            preset_id = id.0,
            duration_secs = item.duration_secs(),
            "Preset added"
        );
        self.presets.push(item);

        id
    }

    /// Route a fired OS hotkey signal. Returns the triggered preset.
    #[instrument(skip(self))]
    pub fn handle_hotkey(&mut self, native: NativeHotkeyId) -> Option<PresetId> {
        let Some(hotkey_id) = self.dispatcher.dispatch(native) else {
            debug!("Ignoring hotkey signal with unknown id");
            return None;
        };
        let preset_id = *self.bindings.get(&hotkey_id)?;
        self.trigger(preset_id)
    }

    /// Trigger a preset directly (menu selection).
    pub fn trigger(&self, id: PresetId) -> Option<PresetId> {
        let preset = self.presets.get(id.0)?;

        info!(
            preset = %preset.name(),
            duration_secs = preset.duration_secs(),
            "Preset triggered"
        );
        let _ = self.events.send(ReminderEvent::PresetTriggered {
            name: preset.name().to_string(),
            duration_secs: preset.duration_secs(),
        });

        Some(id)
    }

    /// Presets in insertion order.
    pub fn list_presets(&self) -> &[PresetItem] {
        &self.presets
    }

    /// Presets with their ids, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (PresetId, &PresetItem)> {
        self.presets
            .iter()
            .enumerate()
            .map(|(index, item)| (PresetId(index), item))
    }

    /// Look up a preset.
    pub fn get(&self, id: PresetId) -> Option<&PresetItem> {
        self.presets.get(id.0)
    }

    /// Hotkey id bound to a preset, if its registration succeeded.
    pub fn hotkey_of(&self, id: PresetId) -> Option<HotkeyId> {
        self.bindings
            .iter()
            .find(|(_, preset)| **preset == id)
            .map(|(hotkey, _)| *hotkey)
    }

    /// Access the underlying dispatcher.
    pub fn dispatcher(&self) -> &HotkeyDispatcher<B> {
        &self.dispatcher
    }

    /// Release every hotkey binding. Presets stay listed.
    #[instrument(skip(self))]
    pub fn shutdown(&mut self) {
        self.dispatcher.unregister_all();
        self.bindings.clear();
        info!("Preset hotkeys released");
    }
}
