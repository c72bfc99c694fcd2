use tray_timer_core::format_hms;

/// Tray icon states corresponding to the countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayIconState {
    /// No countdown running.
    Idle,
    /// Counting down.
    CountingDown {
        /// Seconds left.
        remaining_secs: u32,
    },
}

impl TrayIconState {
    /// Tooltip text.
    pub fn tooltip(self) -> String {
        match self {
            TrayIconState::Idle => "Tray Timer - Ready".to_string(),
            TrayIconState::CountingDown { remaining_secs } => {
                format!("Tray Timer - {} left", format_hms(remaining_secs))
            }
        }
    }

    /// Whether two states use the same icon.
    pub fn same_icon(self, other: TrayIconState) -> bool {
        matches!(
            (self, other),
            (TrayIconState::Idle, TrayIconState::Idle)
                | (TrayIconState::CountingDown { .. }, TrayIconState::CountingDown { .. })
        )
    }
}
