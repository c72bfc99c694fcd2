//! Clipboard text as a custom alert message.

use crate::{AppError, AppResult};

use std::panic::Location;

use arboard::Clipboard;
use error_location::ErrorLocation;
use tracing::{debug, instrument};

/// Read the clipboard's current text.
///
/// The clipboard is opened per call; holding it open keeps an X11
/// connection alive on Linux.
#[track_caller]
#[instrument]
pub(crate) fn read_text() -> AppResult<String> {
    let mut clipboard = Clipboard::new().map_err(|e| AppError::ClipboardError {
        reason: format!("Failed to initialize clipboard: {}", e),
        location: ErrorLocation::from(Location::caller()),
    })?;

    let text = clipboard.get_text().map_err(|e| AppError::ClipboardError {
        reason: format!("Clipboard has no text: {}", e),
        location: ErrorLocation::from(Location::caller()),
    })?;

    debug!(text_len = text.len(), "Read clipboard text");

    Ok(text)
}
