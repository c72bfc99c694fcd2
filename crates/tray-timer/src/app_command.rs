use global_hotkey::GlobalHotKeyEvent;
use tray_icon::menu::MenuEvent;

/// Events forwarded into the `tao` event loop.
///
/// Hotkey and menu callbacks and the audio thread run off the UI thread;
/// they only send one of these through the loop proxy, and all handling
/// happens on the UI thread.
#[derive(Debug, Clone)]
pub enum AppCommand {
    /// A global hotkey was pressed or released.
    Hotkey(GlobalHotKeyEvent),
    /// A tray menu item was clicked.
    Menu(MenuEvent),
    /// The audio thread finished opening a sound; the next loop turn starts it.
    AudioReady,
}
