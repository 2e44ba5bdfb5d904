// pwgen Settings Store
// Persists the user's settings snapshot in a single cookie slot.
// The slot is JSON, root-scoped, same-site strict, and expires after one year.

use std::sync::Mutex;

use tracing::{debug, error, warn};

use crate::managers::cookie_jar::CookieJarTrait;
use crate::types::cookie::{Cookie, SameSite};
use crate::types::errors::SettingsError;
use crate::types::settings::Settings;

/// Name of the cookie slot holding the snapshot.
pub const SETTINGS_COOKIE: &str = "pwgen-settings";

/// Path the slot is scoped to.
pub const SETTINGS_COOKIE_PATH: &str = "/";

/// One year, in seconds.
pub const SETTINGS_MAX_AGE_SECS: i64 = 31_536_000;

/// Trait defining the settings store interface.
pub trait SettingsStoreTrait {
    /// Writes `settings` when `enabled`, otherwise erases any stored snapshot.
    fn save(&self, settings: &Settings, enabled: bool) -> Result<(), SettingsError>;
    /// Reads the stored snapshot. A corrupt slot is erased before
    /// `SettingsError::Corrupt` is returned.
    fn load(&self) -> Result<Option<Settings>, SettingsError>;
    /// Erases the stored snapshot. Not an error if nothing is stored.
    fn clear(&self) -> Result<(), SettingsError>;
}

/// Encodes a snapshot as the cookie payload.
pub fn serialize(settings: &Settings) -> Result<String, SettingsError> {
    serde_json::to_string(settings).map_err(|e| {
        SettingsError::Serialization(format!("Failed to serialize settings: {}", e))
    })
}

/// Decodes a cookie payload. Any parse failure is `SettingsError::Corrupt`.
pub fn deserialize(payload: &str) -> Result<Settings, SettingsError> {
    serde_json::from_str(payload)
        .map_err(|e| SettingsError::Corrupt(format!("Failed to parse settings cookie: {}", e)))
}

/// Settings store over an injectable cookie jar.
pub struct SettingsStore {
    jar: Mutex<Box<dyn CookieJarTrait>>,
}

impl SettingsStore {
    pub fn new(jar: Box<dyn CookieJarTrait>) -> Self {
        Self {
            jar: Mutex::new(jar),
        }
    }

    /// Loads the snapshot, treating corruption and storage failures as
    /// "nothing stored". Corrupt slots are still erased by `load`.
    pub fn load_or_recover(&self) -> Option<Settings> {
        match self.load() {
            Ok(settings) => settings,
            Err(SettingsError::Corrupt(msg)) => {
                warn!("discarded corrupt settings snapshot: {}", msg);
                None
            }
            Err(e) => {
                error!("failed to load settings: {}", e);
                None
            }
        }
    }

    fn write(&self, cookie: &Cookie) -> Result<(), SettingsError> {
        let mut jar = self
            .jar
            .lock()
            .map_err(|e| SettingsError::Storage(format!("cookie jar lock poisoned: {}", e)))?;
        jar.set(cookie)?;
        Ok(())
    }

    fn read(&self) -> Result<Option<String>, SettingsError> {
        let jar = self
            .jar
            .lock()
            .map_err(|e| SettingsError::Storage(format!("cookie jar lock poisoned: {}", e)))?;
        Ok(jar.get(SETTINGS_COOKIE, SETTINGS_COOKIE_PATH)?)
    }
}

/// The write that stores `payload` in the settings slot.
pub fn settings_cookie(payload: &str) -> Cookie {
    Cookie::new(SETTINGS_COOKIE, payload)
        .with_path(SETTINGS_COOKIE_PATH)
        .with_max_age(SETTINGS_MAX_AGE_SECS)
        .with_same_site(SameSite::Strict)
}

/// The write that erases the settings slot.
pub fn clearing_cookie() -> Cookie {
    Cookie::new(SETTINGS_COOKIE, "")
        .with_path(SETTINGS_COOKIE_PATH)
        .with_max_age(-1)
}

impl SettingsStoreTrait for SettingsStore {
    fn save(&self, settings: &Settings, enabled: bool) -> Result<(), SettingsError> {
        if !enabled {
            return self.clear();
        }
        let payload = serialize(settings)?;
        self.write(&settings_cookie(&payload))?;
        debug!(bytes = payload.len(), "settings snapshot saved");
        Ok(())
    }

    fn load(&self) -> Result<Option<Settings>, SettingsError> {
        let payload = match self.read()? {
            Some(p) => p,
            None => return Ok(None),
        };

        match deserialize(&payload) {
            Ok(settings) => Ok(Some(settings)),
            Err(err) => {
                // Never leave an unparseable snapshot behind.
                if let Err(clear_err) = self.clear() {
                    error!("failed to erase corrupt settings snapshot: {}", clear_err);
                }
                Err(err)
            }
        }
    }

    fn clear(&self) -> Result<(), SettingsError> {
        self.write(&clearing_cookie())?;
        debug!("settings snapshot cleared");
        Ok(())
    }
}
