//! Desktop notifications: the system alert cue and user-facing errors.

use notify_rust::Notification;
use tracing::{debug, warn};

const APP_NAME: &str = "Tray Timer";

#[cfg(target_os = "macos")]
const CHIME_SOUND: &str = "Glass";
#[cfg(target_os = "windows")]
const CHIME_SOUND: &str = "Default";
#[cfg(not(any(target_os = "macos", target_os = "windows")))]
const CHIME_SOUND: &str = "alarm-clock-elapsed";

/// Show the "time's up" cue with the platform notification sound.
pub(crate) fn chime(message: &str) {
    let result = Notification::new()
        .summary(APP_NAME)
        .body(message)
        .appname(APP_NAME)
        .sound_name(CHIME_SOUND)
        .show();

    match result {
        Ok(_) => debug!("Chime notification shown"),
        Err(e) => warn!(error = %e, "Failed to show chime notification"),
    }
}

/// Show a silent notification, typically an error message.
pub(crate) fn notify(summary: &str, body: &str) {
    let result = Notification::new()
        .summary(summary)
        .body(body)
        .appname(APP_NAME)
        .show();

    if let Err(e) = result {
        warn!(summary, error = %e, "Failed to show notification");
    }
}
