use crate::audio::SessionId;

use std::sync::mpsc;

/// Notifications raised by core components for the application shell.
///
/// Components hold an [`EventSender`] and never block on delivery; a closed
/// receiver only means the shell is shutting down.
#[derive(Debug, Clone, PartialEq)]
pub enum ReminderEvent {
    /// A preset was selected by hotkey or menu.
    PresetTriggered {
        /// Name of the preset.
        name: String,
        /// Countdown duration to start.
        duration_secs: u32,
    },
    /// A preset's combination is owned by another registration. The preset
    /// stays listed.
    HotkeyConflict {
        /// Name of the preset.
        preset: String,
        /// Textual form of the combination.
        combo: String,
        /// User-facing message.
        message: String,
    },
    /// The hotkey facility failed while binding a preset's combination, for
    /// a reason other than a conflict. The preset stays listed.
    HotkeyUnavailable {
        /// Name of the preset.
        preset: String,
        /// Textual form of the combination.
        combo: String,
        /// User-facing message.
        message: String,
    },
    /// Countdown progressed.
    CountdownTick {
        /// Seconds left.
        remaining_secs: u32,
    },
    /// Countdown reached zero.
    CountdownExpired,
    /// Countdown was cancelled before expiry.
    CountdownStopped,
    /// Lightweight "time's up" cue for the notification collaborator.
    Chime {
        /// Text to show with the cue.
        message: String,
    },
    /// A playback session began.
    PlaybackStarted {
        /// Session identity.
        session: SessionId,
        /// `min(file length, cap)` in milliseconds.
        effective_ms: u64,
    },
    /// A playback session ended (naturally, by cap or by `stop()`).
    PlaybackStopped {
        /// Session identity.
        session: SessionId,
    },
    /// A sound could not be played. Shown through the same channel as a chime.
    PlaybackFailed {
        /// User-facing message.
        message: String,
    },
    /// An alert step failed. `trigger()` reports here instead of returning.
    AlertError {
        /// User-facing message.
        message: String,
    },
}

/// Sending half of the core event channel.
pub type EventSender = mpsc::Sender<ReminderEvent>;

/// Receiving half of the core event channel.
pub type EventReceiver = mpsc::Receiver<ReminderEvent>;

/// Create the channel shared by all core components.
pub fn event_channel() -> (EventSender, EventReceiver) {
    mpsc::channel()
}
