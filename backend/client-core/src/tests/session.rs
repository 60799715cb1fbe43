use crate::error::SessionError;
use crate::session::UserStore;

use models::{Role, User};

use tempfile::TempDir;

fn sample_user() -> User {
    User {
        id: String::from("u-42"),
        email: String::from("pat@example.com"),
        full_name: String::from("Pat Participant"),
        phone: Some(String::from("+10000000000")),
        role: Role::Participant,
        profile_pic: None,
    }
}

/// **VALUE**: Verifies that a saved user is restored unchanged.
///
/// **WHY THIS MATTERS**: The stored user drives what the UI renders before the first
/// `user/me` round trip completes. A lossy round trip shows the wrong role.
#[test]
fn given_saved_user_when_loading_then_returns_same_user() {
    // GIVEN: A store in a nested directory that does not exist yet
    let dir = TempDir::new().unwrap();
    let store = UserStore::new(dir.path().join("profile"));

    // WHEN: Saving then loading
    store.save(&sample_user()).unwrap();
    let loaded = store.load().unwrap();

    // THEN: Same user, no temp file left behind
    assert_eq!(loaded, Some(sample_user()));
    assert!(!dir.path().join("profile").join("user.json.tmp").exists());
}

#[test]
fn given_empty_store_when_loading_or_clearing_then_ok() {
    let dir = TempDir::new().unwrap();
    let store = UserStore::new(dir.path());

    assert_eq!(store.load().unwrap(), None);
    assert!(store.clear().is_ok(), "Clearing an empty store is idempotent");
}

#[test]
fn given_stored_user_when_cleared_then_load_returns_none() {
    let dir = TempDir::new().unwrap();
    let store = UserStore::new(dir.path());
    store.save(&sample_user()).unwrap();

    store.clear().unwrap();

    assert_eq!(store.load().unwrap(), None);
}

/// **VALUE**: Verifies that a corrupt file surfaces as a parse error.
#[test]
fn given_corrupt_file_when_loading_then_parse_error() {
    let dir = TempDir::new().unwrap();
    let store = UserStore::new(dir.path());
    std::fs::write(store.path(), "{ not json").unwrap();

    let result = store.load();

    assert!(matches!(result, Err(SessionError::ParseError { .. })));
}
