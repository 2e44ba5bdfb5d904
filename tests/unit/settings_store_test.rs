//! Unit tests for the settings store over the durable cookie jar.

use pwgen_client::database::Database;
use pwgen_client::managers::cookie_jar::{CookieJarTrait, MemoryCookieJar, SqliteCookieJar};
use pwgen_client::services::settings_store::{
    deserialize, serialize, settings_cookie, SettingsStore, SettingsStoreTrait, SETTINGS_COOKIE,
};
use pwgen_client::types::errors::SettingsError;
use pwgen_client::types::settings::{Language, Mode, Separator, Settings};
use rstest::rstest;
use tempfile::TempDir;

fn passphrase_settings() -> Settings {
    let mut settings = Settings::default();
    settings.mode = Mode::Passphrase;
    settings.word_count = 6;
    settings.separator = Separator::Period;
    settings.capitalize_words = true;
    settings.language = Language::Fr;
    settings
}

#[test]
fn test_roundtrip_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("pwgen.db");
    let settings = passphrase_settings();

    {
        let store = SettingsStore::new(Box::new(SqliteCookieJar::new(Database::open(&path).unwrap())));
        store.save(&settings, true).unwrap();
    }

    let store = SettingsStore::new(Box::new(SqliteCookieJar::new(Database::open(&path).unwrap())));
    assert_eq!(store.load().unwrap(), Some(settings));
}

#[test]
fn test_disabled_save_erases_on_disk() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("pwgen.db");

    let store = SettingsStore::new(Box::new(SqliteCookieJar::new(Database::open(&path).unwrap())));
    store.save(&Settings::default(), true).unwrap();
    store.save(&Settings::default(), false).unwrap();
    drop(store);

    let jar = SqliteCookieJar::new(Database::open(&path).unwrap());
    assert_eq!(jar.get(SETTINGS_COOKIE, "/").unwrap(), None);
}

#[rstest]
#[case::not_json("{oops")]
#[case::wrong_type(r#"{"includeDigits":"yes"}"#)]
#[case::unknown_separator(r#"{"separator":"tab"}"#)]
#[case::unknown_language(r#"{"language":"de"}"#)]
#[case::array("[1,2,3]")]
#[case::empty("")]
fn test_corrupt_payload_erased(#[case] payload: &str) {
    let mut jar = SqliteCookieJar::new(Database::open_in_memory().unwrap());
    jar.set(&settings_cookie(payload)).unwrap();
    let store = SettingsStore::new(Box::new(jar));

    assert!(matches!(store.load(), Err(SettingsError::Corrupt(_))));
    assert_eq!(store.load().unwrap(), None);
}

#[test]
fn test_string_counts_from_older_snapshots_load() {
    let payload = r#"{"length":"20","passphraseToggle":false,"wordCount":"5","maxWordLength":"7","separator":"hyphen","language":"en"}"#;
    let mut jar = MemoryCookieJar::new();
    jar.set(&settings_cookie(payload)).unwrap();
    let store = SettingsStore::new(Box::new(jar));

    let settings = store.load().unwrap().unwrap();
    assert_eq!(settings.length, 20);
    assert_eq!(settings.word_count, 5);
    assert_eq!(settings.max_word_length, 7);
}

#[test]
fn test_payload_uses_cookie_field_names() {
    let payload = serialize(&passphrase_settings()).unwrap();
    assert!(payload.contains(r#""passphraseToggle":true"#));
    assert!(payload.contains(r#""wordCount":6"#));
    assert!(payload.contains(r#""separator":"period""#));
    assert!(payload.contains(r#""language":"fr""#));
    assert_eq!(deserialize(&payload).unwrap(), passphrase_settings());
}

#[test]
fn test_clear_without_snapshot_is_ok() {
    let store = SettingsStore::new(Box::new(MemoryCookieJar::new()));
    assert!(store.clear().is_ok());
    assert_eq!(store.load_or_recover(), None);
}
