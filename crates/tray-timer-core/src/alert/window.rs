use crate::{CoreResult, alert::ScreenPoint};

/// Top-level window resolved from a screen point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetWindow {
    /// Owning process name without directory or extension.
    pub process_name: String,
    /// Whether the window is currently visible.
    pub visible: bool,
    /// Platform window handle.
    pub raw_handle: isize,
}

/// OS facility that finds and minimizes other applications' windows.
pub trait WindowControl {
    /// Resolve the top-level window under `point`.
    ///
    /// Fails with [`crate::ReminderError::WindowResolutionFailure`] when
    /// nothing suitable is there or the platform is unsupported.
    fn window_at(&self, point: ScreenPoint) -> CoreResult<TargetWindow>;

    /// Minimize `window`.
    fn minimize(&self, window: &TargetWindow) -> CoreResult<()>;
}
