/// Which steps an alert runs. Read at trigger time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AlertConfiguration {
    /// Minimize the allow-listed window under the pointer.
    pub minimize_active_window: bool,
    /// Play the alert sound.
    pub enable_notifications: bool,
    /// Cover every display with a blank overlay for a few seconds.
    pub blank_screen: bool,
    /// Show the alert text in a popup at the pointer.
    pub position_alert_at_cursor: bool,
}

/// Steps that run before any indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PreActions {
    /// See [`AlertConfiguration::minimize_active_window`].
    pub minimize_active_window: bool,
    /// See [`AlertConfiguration::blank_screen`].
    pub blank_screen: bool,
}

/// Steps that tell the user time is up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Indicators {
    /// See [`AlertConfiguration::enable_notifications`].
    pub enable_notifications: bool,
    /// See [`AlertConfiguration::position_alert_at_cursor`].
    pub position_alert_at_cursor: bool,
}

impl AlertConfiguration {
    /// Combine pre-actions and indicators.
    pub fn new(pre_actions: PreActions, indicators: Indicators) -> Self {
        Self {
            minimize_active_window: pre_actions.minimize_active_window,
            enable_notifications: indicators.enable_notifications,
            blank_screen: pre_actions.blank_screen,
            position_alert_at_cursor: indicators.position_alert_at_cursor,
        }
    }
}
