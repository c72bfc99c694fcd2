use tray_timer_core::ReminderError;

use std::{panic::Location, path::PathBuf, result::Result as StdResult};

use error_location::ErrorLocation;
use thiserror::Error;

/// Application-level errors for the tray-timer binary.
///
/// All variants include `ErrorLocation` for call-site tracking.
#[derive(Error, Debug)]
pub enum AppError {
    /// Reminder engine error from tray-timer-core.
    #[error("Reminder error: {source} {location}")]
    Core {
        /// The underlying core error.
        #[source]
        source: ReminderError,
        /// Location where this error was created.
        location: ErrorLocation,
    },

    /// Failed to create the global hotkey manager.
    #[error("Hotkey registration failed: {reason} {location}")]
    HotkeyRegistrationFailed {
        /// Human-readable reason for failure.
        reason: String,
        /// Location where this error was created.
        location: ErrorLocation,
    },

    /// Failed to build or update the tray icon or its menu.
    #[error("Tray error: {reason} {location}")]
    TrayError {
        /// Human-readable reason for failure.
        reason: String,
        /// Location where this error was created.
        location: ErrorLocation,
    },

    /// Failed to read text from the clipboard.
    #[error("Failed to read clipboard: {reason} {location}")]
    ClipboardError {
        /// Human-readable reason for failure.
        reason: String,
        /// Location where this error was created.
        location: ErrorLocation,
    },

    /// Configuration loading or saving error.
    #[error("Configuration error: {reason} {location}")]
    ConfigError {
        /// Human-readable reason for failure.
        reason: String,
        /// Location where this error was created.
        location: ErrorLocation,
    },

    /// Another instance holds the instance lock.
    #[error("Tray Timer is already running (lock held on {lock_path:?}) {location}")]
    AlreadyRunning {
        /// Lock file held by the other instance.
        lock_path: PathBuf,
        /// Location where this error was created.
        location: ErrorLocation,
    },

    /// IO error from filesystem operations.
    #[error("IO error: {source} {location}")]
    IoError {
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
        /// Location where this error was created.
        location: ErrorLocation,
    },
}

impl AppError {
    /// Message suitable for a desktop notification.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Core { source, .. } => source.reason(),
            AppError::HotkeyRegistrationFailed { reason, .. }
            | AppError::TrayError { reason, .. }
            | AppError::ClipboardError { reason, .. }
            | AppError::ConfigError { reason, .. } => reason.clone(),
            AppError::AlreadyRunning { .. } => "Tray Timer is already running".to_string(),
            AppError::IoError { source, .. } => source.to_string(),
        }
    }
}

// Manual From<ReminderError> with location tracking.
// Cannot use #[from] because it does not support extra fields.
impl From<ReminderError> for AppError {
    #[track_caller]
    fn from(source: ReminderError) -> Self {
        AppError::Core {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<std::io::Error> for AppError {
    #[track_caller]
    fn from(source: std::io::Error) -> Self {
        AppError::IoError {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

/// Convenience type alias for Results using `AppError`.
pub type Result<T> = StdResult<T, AppError>;
