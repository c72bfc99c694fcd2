use std::{collections::HashSet, fs, io::ErrorKind, path::Path};

use tracing::{debug, warn};

/// Process names that may be minimized during an alert.
///
/// Matching ignores case, surrounding whitespace and a trailing `.exe`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowList {
    names: HashSet<String>,
}

impl AllowList {
    /// Read the newline-delimited list at `path`.
    ///
    /// Missing or unreadable files yield an empty list, which permits nothing.
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => {
                let list = Self::parse(&contents);
                debug!(path = ?path, entries = list.len(), "Allow-list loaded");
                list
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = ?path, "No allow-list file");
                Self::default()
            }
            Err(e) => {
                warn!(path = ?path, error = %e, "Failed to read allow-list");
                Self::default()
            }
        }
    }

    /// Parse newline-delimited process names. Blank lines are skipped.
    pub fn parse(contents: &str) -> Self {
        let names = contents
            .lines()
            .map(normalize)
            .filter(|name| !name.is_empty())
            .collect();
        Self { names }
    }

    /// Whether `process_name` is on the list.
    pub fn permits(&self, process_name: &str) -> bool {
        self.names.contains(&normalize(process_name))
    }

    /// Number of distinct entries.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

fn normalize(name: &str) -> String {
    let lower = name.trim().to_lowercase();
    match lower.strip_suffix(".exe") {
        Some(stem) => stem.to_string(),
        None => lower,
    }
}
