use crate::{CoreResult, hotkey::HotkeyCombo};

/// Identifier the OS facility attaches to a fired signal.
pub type NativeHotkeyId = u32;

/// OS-level global hotkey registration capability.
///
/// Implementations must live on the thread that pumps the OS messages the
/// facility depends on (the UI thread).
pub trait HotkeyBackend {
    /// Bind `combo` to this process.
    ///
    /// Returns the identifier carried by subsequent fired signals. Must fail
    /// with [`crate::ReminderError::HotkeyConflict`] when the combination is
    /// owned elsewhere.
    fn register(&mut self, combo: HotkeyCombo) -> CoreResult<NativeHotkeyId>;

    /// Release a binding previously returned by [`HotkeyBackend::register`].
    fn unregister(&mut self, combo: HotkeyCombo) -> CoreResult<()>;
}
