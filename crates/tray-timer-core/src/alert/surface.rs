use crate::CoreResult;

/// A point in physical screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ScreenPoint {
    /// Horizontal position.
    pub x: i32,
    /// Vertical position.
    pub y: i32,
}

impl ScreenPoint {
    /// Create a point.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Handle of a popup created by an [`AlertSurface`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PopupHandle(u64);

impl PopupHandle {
    /// Wrap a surface-assigned identifier.
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Surface-assigned identifier.
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// UI-thread collaborator that creates and destroys alert windows.
///
/// Implementations own native windows, which tie them to the UI thread.
pub trait AlertSurface {
    /// Current pointer position, if the platform can report it.
    fn cursor_position(&self) -> Option<ScreenPoint>;

    /// Show `text` in a small popup at `at`.
    fn show_popup(&mut self, text: &str, at: ScreenPoint) -> CoreResult<PopupHandle>;

    /// Move a popup so its top-left corner sits at `at`. Unknown handles are ignored.
    fn move_popup(&mut self, handle: PopupHandle, at: ScreenPoint);

    /// Close a popup. Unknown handles are ignored.
    fn close_popup(&mut self, handle: PopupHandle);

    /// Cover every display with an opaque overlay. Returns how many were shown.
    fn show_blank_overlays(&mut self) -> CoreResult<usize>;

    /// Remove all blank overlays. No-op when none are shown.
    fn restore_blank_overlays(&mut self);
}
