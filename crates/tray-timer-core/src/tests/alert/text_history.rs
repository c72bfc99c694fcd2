use crate::{MAX_HISTORY, MAX_TEXT_CHARS, ReminderError, TextHistory, tests::fakes::temp_path};

use std::fs;

/// WHAT: The sixth entry evicts the oldest
/// WHY: History is bounded FIFO
#[test]
#[allow(clippy::unwrap_used)]
fn given_full_history_when_adding_sixth_then_oldest_evicted() {
    // Given: Five entries
    let mut history = TextHistory::in_memory();
    for text in ["one", "two", "three", "four", "five"] {
        assert!(history.add(text).unwrap());
    }

    // When: Adding a sixth
    history.add("six").unwrap();

    // Then: "one" is gone and "six" is newest
    let entries: Vec<&str> = history.entries().collect();
    assert_eq!(entries, vec!["two", "three", "four", "five", "six"]);
    assert_eq!(history.len(), MAX_HISTORY);
    assert_eq!(history.latest(), Some("six"));
}

/// WHAT: Duplicates are rejected without changing the history
/// WHY: Re-saving the same message must not reorder entries
#[test]
#[allow(clippy::unwrap_used)]
fn given_existing_text_when_adding_again_then_rejected_unchanged() {
    // Given: Two entries
    let mut history = TextHistory::in_memory();
    history.add("stretch").unwrap();
    history.add("drink water").unwrap();

    // When
    let added = history.add("stretch").unwrap();

    // Then
    assert!(!added);
    let entries: Vec<&str> = history.entries().collect();
    assert_eq!(entries, vec!["stretch", "drink water"]);
}

/// WHAT: Long texts are cut to 20 characters, line breaks folded
/// WHY: The popup is sized for a short message
#[test]
#[allow(clippy::unwrap_used)]
fn given_long_multiline_text_when_adding_then_truncated_single_line() {
    // Given: A long text with a line break
    let mut history = TextHistory::in_memory();

    // When
    history
        .add("Stand up\nand walk around the room for a bit")
        .unwrap();

    // Then
    let latest = history.latest().unwrap();
    assert_eq!(latest.chars().count(), MAX_TEXT_CHARS);
    assert_eq!(latest, "Stand up and walk ar");
}

/// WHAT: Blank texts are ignored
/// WHY: An empty popup is useless
#[test]
#[allow(clippy::unwrap_used)]
fn given_blank_text_when_adding_then_rejected() {
    // Given
    let mut history = TextHistory::in_memory();

    // When
    let added = history.add("   \r\n ").unwrap();

    // Then
    assert!(!added);
    assert!(history.is_empty());
}

/// WHAT: History persists and reloads, keeping the newest five
/// WHY: Saved texts survive restarts
#[test]
#[allow(clippy::unwrap_used)]
fn given_persisted_history_when_reloading_then_same_entries() {
    // Given: A history file with seven lines written by hand
    let path = temp_path("alert_texts.txt");
    fs::write(&path, "a\nb\nc\nd\ne\nf\ng\n").unwrap();

    // When: Loading, adding one and reloading
    let mut history = TextHistory::load(&path);
    history.add("h").unwrap();
    let reloaded = TextHistory::load(&path);

    // Then: Newest five kept across the round trip
    let entries: Vec<&str> = reloaded.entries().collect();
    assert_eq!(entries, vec!["d", "e", "f", "g", "h"]);

    let _ = fs::remove_file(&path);
}

/// WHAT: Clearing empties memory and disk
/// WHY: "Clear alert history" must not come back after restart
#[test]
#[allow(clippy::unwrap_used)]
fn given_saved_history_when_cleared_then_file_empty() {
    // Given
    let path = temp_path("alert_texts.txt");
    let mut history = TextHistory::load(&path);
    history.add("break").unwrap();
    history.remove("nothing").unwrap();

    // When
    history.clear().unwrap();

    // Then
    assert!(history.is_empty());
    assert!(TextHistory::load(&path).is_empty());
    assert_eq!(fs::read_to_string(&path).unwrap(), "");

    let _ = fs::remove_file(&path);
}

/// WHAT: A failed write keeps the in-memory change
/// WHY: Persistence failures are reported without undoing the edit
#[test]
#[allow(clippy::unwrap_used)]
fn given_unwritable_location_when_adding_then_persistence_failure_and_entry_kept() {
    // Given: A history whose parent "directory" is a regular file
    let blocker = temp_path("blocker");
    fs::write(&blocker, "not a directory").unwrap();
    let mut history = TextHistory::load(&blocker.join("alert_texts.txt"));

    // When
    let result = history.add("walk");

    // Then
    assert!(matches!(result, Err(ReminderError::PersistenceFailure { .. })));
    assert_eq!(history.latest(), Some("walk"));

    let _ = fs::remove_file(&blocker);
}
