mod backend;
mod combo;
mod dispatcher;

pub use {
    backend::{HotkeyBackend, NativeHotkeyId},
    combo::HotkeyCombo,
    dispatcher::{HotkeyDispatcher, HotkeyId},
};
