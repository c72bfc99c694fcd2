//! Most recently saved custom alert texts.
//!
//! Stored as newline-delimited UTF-8. The newest entry is the one shown when
//! an alert fires.

use crate::{CoreResult, ReminderError};

use std::{
    collections::VecDeque,
    fs,
    io::{ErrorKind, Write},
    panic::Location,
    path::{Path, PathBuf},
};

use error_location::ErrorLocation;
use tracing::{debug, info, instrument, warn};

/// Maximum number of stored texts.
pub const MAX_HISTORY: usize = 5;

/// Texts are cut to this many characters before storage.
pub const MAX_TEXT_CHARS: usize = 20;

/// FIFO store of up to [`MAX_HISTORY`] distinct alert texts.
///
/// Every mutation is applied in memory first and then written to disk. A
/// failed write is returned as [`ReminderError::PersistenceFailure`] but the
/// in-memory change stays.
#[derive(Debug, Clone, Default)]
pub struct TextHistory {
    path: Option<PathBuf>,
    texts: VecDeque<String>,
}

impl TextHistory {
    /// History that is never written to disk.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Load the history file at `path`, keeping its newest entries.
    ///
    /// A missing file is an empty history; an unreadable one is logged and
    /// treated the same way.
    #[instrument]
    pub fn load(path: &Path) -> Self {
        let mut history = Self {
            path: Some(path.to_path_buf()),
            texts: VecDeque::with_capacity(MAX_HISTORY),
        };

        match fs::read_to_string(path) {
            Ok(contents) => {
                for line in contents.lines() {
                    history.insert(line);
                }
                debug!(entries = history.len(), "Alert text history loaded");
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!(error = %e, "Failed to read alert text history"),
        }

        history
    }

    /// Store a new text.
    ///
    /// Line breaks become spaces, surrounding whitespace is trimmed and the
    /// result is cut to [`MAX_TEXT_CHARS`]. Returns `Ok(false)` for blank
    /// input or a text already present. Adding beyond [`MAX_HISTORY`]
    /// evicts the oldest entry.
    #[track_caller]
    pub fn add(&mut self, text: &str) -> CoreResult<bool> {
        if !self.insert(text) {
            return Ok(false);
        }
        info!(entries = self.len(), "Alert text saved");
        self.persist()?;
        Ok(true)
    }

    /// Remove a text. Returns whether it was present.
    #[track_caller]
    pub fn remove(&mut self, text: &str) -> CoreResult<bool> {
        let Some(index) = self.texts.iter().position(|t| t == text) else {
            return Ok(false);
        };
        self.texts.remove(index);
        self.persist()?;
        Ok(true)
    }

    /// Remove every text.
    #[track_caller]
    pub fn clear(&mut self) -> CoreResult<()> {
        self.texts.clear();
        info!("Alert text history cleared");
        self.persist()
    }

    /// The most recently saved text.
    pub fn latest(&self) -> Option<&str> {
        self.texts.back().map(String::as_str)
    }

    /// Texts from oldest to newest.
    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.texts.iter().map(String::as_str)
    }

    /// Number of stored texts.
    pub fn len(&self) -> usize {
        self.texts.len()
    }

    /// Whether no texts are stored.
    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }

    fn insert(&mut self, text: &str) -> bool {
        let text = sanitize(text);
        if text.is_empty() || self.texts.contains(&text) {
            return false;
        }

        if self.texts.len() >= MAX_HISTORY {
            self.texts.pop_front();
        }
        self.texts.push_back(text);
        true
    }

    #[track_caller]
    fn persist(&self) -> CoreResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let failure = |source: std::io::Error| ReminderError::PersistenceFailure {
            path: path.clone(),
            source,
            location: ErrorLocation::from(Location::caller()),
        };

        let mut contents = String::new();
        for text in &self.texts {
            contents.push_str(text);
            contents.push('\n');
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(failure)?;
        }

        // Atomic write: write to temp file then rename
        let temp_path = path.with_extension("txt.tmp");
        let mut temp_file = fs::File::create(&temp_path).map_err(failure)?;
        temp_file.write_all(contents.as_bytes()).map_err(failure)?;
        temp_file.sync_all().map_err(failure)?;
        fs::rename(&temp_path, path).map_err(failure)?;

        debug!(path = ?path, entries = self.len(), "Alert text history written");

        Ok(())
    }
}

fn sanitize(text: &str) -> String {
    text.replace(['\r', '\n'], " ")
        .trim()
        .chars()
        .take(MAX_TEXT_CHARS)
        .collect()
}
