use std::path::PathBuf;

use error_location::ErrorLocation;
use thiserror::Error;

/// Reminder core errors with source location tracking.
#[derive(Error, Debug)]
pub enum ReminderError {
    /// Another process or registration already owns the key combination.
    #[error("Hotkey {combo} is already in use: {reason} {location}")]
    HotkeyConflict {
        /// Textual form of the combination, e.g. `Ctrl+Digit2`.
        combo: String,
        /// Why the OS refused the binding.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The hotkey facility itself failed (creation, unregister, unknown key).
    #[error("Hotkey backend error: {reason} {location}")]
    HotkeyBackend {
        /// Description of the backend failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// A preset failed validation.
    #[error("Invalid preset {name:?}: {reason} {location}")]
    InvalidPreset {
        /// Name of the rejected preset.
        name: String,
        /// Why the preset was rejected.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// A custom countdown length is out of range.
    #[error("Invalid countdown of {minutes} minutes: {reason} {location}")]
    InvalidDuration {
        /// Requested length in minutes.
        minutes: u32,
        /// Why the length was rejected.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Sound file missing, unreadable or in an unsupported format.
    #[error("Could not open sound {path:?}: {reason} {location}")]
    AudioOpenFailure {
        /// Path of the sound file.
        path: PathBuf,
        /// Description of the open/decode failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Audio output device could not be opened.
    #[error("Audio device error: {reason} {location}")]
    AudioDevice {
        /// Description of the device error.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// No window under the pointer, or the window was not eligible.
    #[error("Window resolution failed: {reason} {location}")]
    WindowResolutionFailure {
        /// Why no window could be acted upon.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Settings or history could not be written.
    #[error("Failed to persist {path:?}: {source} {location}")]
    PersistenceFailure {
        /// File that could not be written.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// A popup or overlay window could not be created.
    #[error("Alert surface error: {reason} {location}")]
    Surface {
        /// Description of the windowing failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

impl ReminderError {
    /// Human-readable description without the source location, for
    /// notifications shown to the user.
    pub fn reason(&self) -> String {
        match self {
            ReminderError::HotkeyConflict { combo, reason, .. } => {
                format!("{} is already in use ({})", combo, reason)
            }
            ReminderError::InvalidPreset { name, reason, .. } => {
                format!("Preset \"{}\": {}", name, reason)
            }
            ReminderError::InvalidDuration {
                minutes, reason, ..
            } => {
                format!("A {} minute countdown is not allowed: {}", minutes, reason)
            }
            ReminderError::AudioOpenFailure { path, reason, .. } => {
                format!("Could not play {}: {}", path.display(), reason)
            }
            ReminderError::PersistenceFailure { path, source, .. } => {
                format!("Could not save {}: {}", path.display(), source)
            }
            ReminderError::HotkeyBackend { reason, .. }
            | ReminderError::AudioDevice { reason, .. }
            | ReminderError::WindowResolutionFailure { reason, .. }
            | ReminderError::Surface { reason, .. } => reason.clone(),
        }
    }
}

/// Result type alias using [`ReminderError`].
pub type Result<T> = std::result::Result<T, ReminderError>;
