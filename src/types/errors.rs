use std::fmt;

// === CookieError ===

/// Errors raised by cookie jar backends.
#[derive(Debug)]
pub enum CookieError {
    /// Database operation failed.
    DatabaseError(String),
    /// The cookie name or attributes are not acceptable to the jar.
    InvalidCookie(String),
}

impl fmt::Display for CookieError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CookieError::DatabaseError(msg) => write!(f, "Cookie database error: {}", msg),
            CookieError::InvalidCookie(msg) => write!(f, "Invalid cookie: {}", msg),
        }
    }
}

impl std::error::Error for CookieError {}

// === SettingsError ===

/// Errors related to persisting the settings snapshot.
#[derive(Debug)]
pub enum SettingsError {
    /// The persisted snapshot could not be parsed. The slot has already been
    /// erased by the time this is returned.
    Corrupt(String),
    /// The underlying cookie jar failed.
    Storage(String),
    /// Failed to serialize the snapshot.
    Serialization(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::Corrupt(msg) => write!(f, "Corrupt settings snapshot: {}", msg),
            SettingsError::Storage(msg) => write!(f, "Settings storage error: {}", msg),
            SettingsError::Serialization(msg) => {
                write!(f, "Settings serialization error: {}", msg)
            }
        }
    }
}

impl std::error::Error for SettingsError {}

impl From<CookieError> for SettingsError {
    fn from(e: CookieError) -> Self {
        SettingsError::Storage(e.to_string())
    }
}

// === GenerationError ===

/// Errors related to requesting a credential from the generator service.
///
/// Every variant means the generator is unavailable for this call only; the
/// client stays usable for the next one.
#[derive(Debug)]
pub enum GenerationError {
    /// The request never produced a response (connect, timeout, body read).
    Network(String),
    /// The service answered with a non-success status code.
    Status(u16),
    /// The response body was not a recognised payload.
    InvalidPayload(String),
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationError::Network(msg) => {
                write!(f, "Generation unavailable: network error: {}", msg)
            }
            GenerationError::Status(code) => {
                write!(f, "Generation unavailable: HTTP status {}", code)
            }
            GenerationError::InvalidPayload(msg) => {
                write!(f, "Generation unavailable: invalid payload: {}", msg)
            }
        }
    }
}

impl std::error::Error for GenerationError {}

// === ClipboardError ===

/// Errors related to clipboard transfer.
#[derive(Debug)]
pub enum ClipboardError {
    /// Both the primary capability and the fallback copy failed.
    Unavailable(String),
}

impl fmt::Display for ClipboardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClipboardError::Unavailable(msg) => write!(f, "Clipboard unavailable: {}", msg),
        }
    }
}

impl std::error::Error for ClipboardError {}
