use crate::{
    CoreResult, ReminderError,
    hotkey::{HotkeyBackend, HotkeyCombo, NativeHotkeyId},
};

use std::{collections::BTreeMap, panic::Location};

use error_location::ErrorLocation;
use tracing::{debug, info, instrument, warn};

/// Process-local hotkey registration id.
///
/// Assigned monotonically starting at 1 and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HotkeyId(u32);

impl HotkeyId {
    /// Raw numeric value, for logging.
    pub fn get(self) -> u32 {
        self.0
    }
}

#[derive(Debug)]
struct Registration {
    combo: HotkeyCombo,
    native: NativeHotkeyId,
}

/// Routes OS hotkey signals to process-local registration ids.
///
/// Dropping the dispatcher unregisters every outstanding binding.
pub struct HotkeyDispatcher<B: HotkeyBackend> {
    backend: B,
    next_id: u32,
    registrations: BTreeMap<HotkeyId, Registration>,
}

impl<B: HotkeyBackend> HotkeyDispatcher<B> {
    /// Wrap a backend. No bindings are made until [`Self::register`].
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            next_id: 0,
            registrations: BTreeMap::new(),
        }
    }

    /// Bind a key combination.
    ///
    /// A combination this dispatcher already holds is rejected as a
    /// conflict without asking the OS.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn register(&mut self, combo: HotkeyCombo) -> CoreResult<HotkeyId> {
        if self.registrations.values().any(|r| r.combo == combo) {
            return Err(ReminderError::HotkeyConflict {
                combo: combo.to_string(),
                reason: "already registered by this application".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let native = self.backend.register(combo)?;

        self.next_id += 1;
        let id = HotkeyId(self.next_id);
        self.registrations.insert(id, Registration { combo, native });

        info!(hotkey_id = id.0, native_id = native, "Global hotkey registered");

        Ok(id)
    }

    /// Release a binding. Unknown ids are ignored.
    #[instrument(skip(self))]
    pub fn unregister(&mut self, id: HotkeyId) {
        let Some(registration) = self.registrations.remove(&id) else {
            return;
        };

        if let Err(e) = self.backend.unregister(registration.combo) {
            warn!(hotkey_id = id.0, error = ?e, "Failed to unregister hotkey");
        } else {
            debug!(hotkey_id = id.0, combo = %registration.combo, "Hotkey unregistered");
        }
    }

    /// Release every outstanding binding.
    #[instrument(skip(self))]
    pub fn unregister_all(&mut self) {
        let ids: Vec<HotkeyId> = self.registrations.keys().copied().collect();
        for id in ids {
            self.unregister(id);
        }
    }

    /// Resolve a fired OS signal to the registration that owns it.
    pub fn dispatch(&self, native: NativeHotkeyId) -> Option<HotkeyId> {
        self.registrations
            .iter()
            .find(|(_, r)| r.native == native)
            .map(|(id, _)| *id)
    }

    /// Combination bound to `id`, if still registered.
    pub fn combo(&self, id: HotkeyId) -> Option<HotkeyCombo> {
        self.registrations.get(&id).map(|r| r.combo)
    }

    /// Number of live bindings.
    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    /// Whether no bindings are live.
    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    /// Access the backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }
}

impl<B: HotkeyBackend> Drop for HotkeyDispatcher<B> {
    fn drop(&mut self) {
        self.unregister_all();
    }
}
