use pwgen_client::types::errors::*;

// === CookieError Tests ===

#[test]
fn cookie_error_display_variants() {
    assert_eq!(
        CookieError::DatabaseError("disk full".to_string()).to_string(),
        "Cookie database error: disk full"
    );
    assert_eq!(
        CookieError::InvalidCookie("name cannot be empty".to_string()).to_string(),
        "Invalid cookie: name cannot be empty"
    );
}

// === SettingsError Tests ===

#[test]
fn settings_error_display_variants() {
    assert_eq!(
        SettingsError::Corrupt("expected value".to_string()).to_string(),
        "Corrupt settings snapshot: expected value"
    );
    assert_eq!(
        SettingsError::Storage("locked".to_string()).to_string(),
        "Settings storage error: locked"
    );
    assert_eq!(
        SettingsError::Serialization("bad float".to_string()).to_string(),
        "Settings serialization error: bad float"
    );
}

#[test]
fn settings_error_from_cookie_error_is_storage() {
    let err: SettingsError = CookieError::DatabaseError("gone".to_string()).into();
    match err {
        SettingsError::Storage(msg) => assert_eq!(msg, "Cookie database error: gone"),
        other => panic!("expected Storage, got {:?}", other),
    }
}

// === GenerationError Tests ===

#[test]
fn generation_error_display_variants() {
    assert_eq!(
        GenerationError::Network("connection refused".to_string()).to_string(),
        "Generation unavailable: network error: connection refused"
    );
    assert_eq!(
        GenerationError::Status(503).to_string(),
        "Generation unavailable: HTTP status 503"
    );
    assert_eq!(
        GenerationError::InvalidPayload("not JSON".to_string()).to_string(),
        "Generation unavailable: invalid payload: not JSON"
    );
}

// === ClipboardError Tests ===

#[test]
fn clipboard_error_display() {
    assert_eq!(
        ClipboardError::Unavailable("no display".to_string()).to_string(),
        "Clipboard unavailable: no display"
    );
}

#[test]
fn errors_implement_error_trait() {
    let errors: Vec<Box<dyn std::error::Error>> = vec![
        Box::new(CookieError::InvalidCookie("x".to_string())),
        Box::new(SettingsError::Corrupt("x".to_string())),
        Box::new(GenerationError::Status(500)),
        Box::new(ClipboardError::Unavailable("x".to_string())),
    ];
    for err in errors {
        assert!(err.source().is_none());
    }
}
