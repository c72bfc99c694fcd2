mod allow_list;
mod config;
mod coordinator;
mod surface;
mod text_history;
mod window;

pub use {
    allow_list::AllowList,
    config::{AlertConfiguration, Indicators, PreActions},
    coordinator::{
        AlertCoordinator, BLANK_DURATION, DEFAULT_ALERT_TEXT, POPUP_FOLLOW_DURATION,
        POPUP_FOLLOW_INTERVAL, POPUP_LIFETIME,
    },
    surface::{AlertSurface, PopupHandle, ScreenPoint},
    text_history::{MAX_HISTORY, MAX_TEXT_CHARS, TextHistory},
    window::{TargetWindow, WindowControl},
};
