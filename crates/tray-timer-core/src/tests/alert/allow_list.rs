use crate::{AllowList, tests::fakes::temp_path};

use std::fs;

/// WHAT: Matching ignores case, whitespace and a trailing .exe
/// WHY: Users type process names by hand
#[test]
fn given_mixed_case_entries_when_checking_then_normalised_match() {
    // Given: Entries with padding, caps and extensions
    let list = AllowList::parse("  Chrome.EXE \n\nnotepad\n   \nCode\n");

    // When / Then
    assert_eq!(list.len(), 3);
    assert!(list.permits("chrome"));
    assert!(list.permits("CHROME.exe"));
    assert!(list.permits("Notepad.exe"));
    assert!(list.permits("code"));
    assert!(!list.permits("explorer"));
}

/// WHAT: A missing file permits nothing
/// WHY: Minimize must be opt-in per process
#[test]
fn given_missing_file_when_loading_then_empty_list() {
    // Given: A path that does not exist
    let path = temp_path("whitelist.config");

    // When
    let list = AllowList::load(&path);

    // Then
    assert!(list.is_empty());
    assert!(!list.permits("chrome"));
}

/// WHAT: The file on disk is read as written
/// WHY: The list is reloaded on every minimize attempt
#[test]
#[allow(clippy::unwrap_used)]
fn given_file_on_disk_when_loading_then_entries_read() {
    // Given: A whitelist file
    let path = temp_path("whitelist.config");
    fs::write(&path, "firefox\r\nslack.exe\r\n").unwrap();

    // When
    let list = AllowList::load(&path);

    // Then
    assert!(list.permits("Firefox"));
    assert!(list.permits("slack"));
    assert_eq!(list.len(), 2);

    let _ = fs::remove_file(&path);
}
