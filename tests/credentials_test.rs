//! Tests for the credential store and password digests

use fitness_tracker::credentials::{hash_password, CredentialStore, DEFAULT_ACCOUNTS};
use fitness_tracker::FitnessError;
use proptest::prelude::*;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_hash_password_is_sha256_hex() {
    // sha256("abc")
    assert_eq!(
        hash_password("abc"),
        "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );
    assert_eq!(hash_password("junnu_30").len(), 64);
}

#[test]
fn test_first_load_creates_default_accounts() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let path = temp_dir.path().join("nested").join("user_credentials.json");

    let store = CredentialStore::load_or_init(&path).expect("Failed to init store");
    assert!(path.exists());

    for (user, password) in DEFAULT_ACCOUNTS {
        assert!(store.verify(user, password));
    }

    let raw = fs::read_to_string(&path).unwrap();
    let persisted: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(persisted["Tejaswini"], hash_password("junnu_30"));
    assert_eq!(persisted["Thanvith"], hash_password("thannu_13"));
}

#[test]
fn test_verify_rejects_unknown_user_and_wrong_password() {
    let temp_dir = tempdir().unwrap();
    let store = CredentialStore::load_or_init(temp_dir.path().join("creds.json")).unwrap();

    assert!(!store.verify("Nobody", "junnu_30"));
    assert!(!store.verify("Tejaswini", "Thannu"));
    assert!(!store.verify("tejaswini", "junnu_30"));
}

#[test]
fn test_existing_file_is_loaded_as_is() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("creds.json");
    fs::write(&path, format!(r#"{{"alice":"{}"}}"#, hash_password("wonderland"))).unwrap();

    let store = CredentialStore::load_or_init(&path).unwrap();
    assert!(store.verify("alice", "wonderland"));
    assert!(!store.verify("Tejaswini", "junnu_30"));
    assert_eq!(store.usernames().collect::<Vec<_>>(), vec!["alice"]);
}

#[test]
fn test_corrupt_file_is_fatal() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("creds.json");
    fs::write(&path, "{not json").unwrap();

    let result = CredentialStore::load_or_init(&path);
    assert!(matches!(result, Err(FitnessError::MalformedStore { .. })));
    // The broken file is left untouched
    assert_eq!(fs::read_to_string(&path).unwrap(), "{not json");
}

#[test]
fn test_add_user_persists_and_rejects_duplicates() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("creds.json");

    let mut store = CredentialStore::load_or_init(&path).unwrap();
    store.add_user("sam", "s3cret").unwrap();

    let reloaded = CredentialStore::load_or_init(&path).unwrap();
    assert!(reloaded.verify("sam", "s3cret"));
    assert!(reloaded.contains("Tejaswini"));

    let err = store.add_user("sam", "other").unwrap_err();
    assert!(matches!(err, FitnessError::UserExists(name) if name == "sam"));
    assert!(store.verify("sam", "s3cret"));
}

fn mutate(password: &str, position: usize, replacement: char) -> String {
    password
        .chars()
        .enumerate()
        .map(|(i, c)| if i == position { replacement } else { c })
        .collect()
}

proptest! {
    #[test]
    fn prop_single_character_mutation_fails(
        password in "[a-zA-Z0-9_]{1,24}",
        position in any::<prop::sample::Index>(),
        replacement in prop::char::range('!', '~'),
    ) {
        let temp_dir = tempdir().unwrap();
        let mut store = CredentialStore::load_or_init(temp_dir.path().join("creds.json")).unwrap();
        store.add_user("prop_user", &password).unwrap();

        prop_assert!(store.verify("prop_user", &password));

        let idx = position.index(password.chars().count());
        let mutated = mutate(&password, idx, replacement);
        prop_assume!(mutated != password);
        prop_assert!(!store.verify("prop_user", &mutated));
    }
}
