use crate::{CoreResult, ReminderError};

use std::{fmt, panic::Location, str::FromStr};

use error_location::ErrorLocation;
use global_hotkey::hotkey::{Code, HotKey, Modifiers};

/// A global key combination: modifier mask plus key code.
///
/// Textual form is `Ctrl+Shift+Digit2`: modifiers in Ctrl, Shift, Alt, Super
/// order followed by the key code name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HotkeyCombo {
    /// Modifier mask.
    pub modifiers: Modifiers,
    /// Key code.
    pub code: Code,
}

impl HotkeyCombo {
    /// Create a combination.
    pub fn new(modifiers: Modifiers, code: Code) -> Self {
        Self { modifiers, code }
    }

    /// Convert into the `global-hotkey` representation.
    pub fn to_hotkey(self) -> HotKey {
        let mods = if self.modifiers.is_empty() {
            None
        } else {
            Some(self.modifiers)
        };
        HotKey::new(mods, self.code)
    }
}

impl fmt::Display for HotkeyCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = [
            (Modifiers::CONTROL, "Ctrl"),
            (Modifiers::SHIFT, "Shift"),
            (Modifiers::ALT, "Alt"),
            (Modifiers::SUPER, "Super"),
        ];
        for (flag, name) in names {
            if self.modifiers.contains(flag) {
                write!(f, "{}+", name)?;
            }
        }
        write!(f, "{:?}", self.code)
    }
}

impl FromStr for HotkeyCombo {
    type Err = ReminderError;

    #[track_caller]
    fn from_str(s: &str) -> CoreResult<Self> {
        let hotkey = HotKey::from_str(s.trim()).map_err(|e| ReminderError::HotkeyBackend {
            reason: format!("Unrecognised hotkey {:?}: {}", s, e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        Ok(Self {
            modifiers: hotkey.mods,
            code: hotkey.key,
        })
    }
}
