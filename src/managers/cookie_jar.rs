//! Cookie Jar for pwgen.
//!
//! Durable, path-scoped key/value slots with max-age expiry. Two backends:
//! an in-memory jar for tests and short-lived sessions, and a SQLite jar for
//! persistence across runs.

use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

use rusqlite::{params, OptionalExtension};
use tracing::debug;

use crate::database::connection::Database;
use crate::types::cookie::{Cookie, SameSite};
use crate::types::errors::CookieError;

/// Source of the current time in unix seconds.
pub type Clock = Box<dyn Fn() -> i64 + Send>;

fn system_clock() -> Clock {
    Box::new(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64
    })
}

/// Trait defining cookie jar operations.
pub trait CookieJarTrait: Send {
    /// Returns the value of the unexpired cookie `name` visible from
    /// `request_path`. When several paths match, the most specific wins.
    fn get(&self, name: &str, request_path: &str) -> Result<Option<String>, CookieError>;

    /// Stores `cookie`, replacing any slot with the same name and path.
    /// A non-positive `max_age` removes the slot instead.
    fn set(&mut self, cookie: &Cookie) -> Result<(), CookieError>;
}

fn validate(cookie: &Cookie) -> Result<(), CookieError> {
    if cookie.name.is_empty() {
        return Err(CookieError::InvalidCookie("name cannot be empty".to_string()));
    }
    if cookie
        .name
        .chars()
        .any(|c| c == '=' || c == ';' || c == ',' || c.is_whitespace() || c.is_control())
    {
        return Err(CookieError::InvalidCookie(format!(
            "illegal character in name {:?}",
            cookie.name
        )));
    }
    if !cookie.path.starts_with('/') {
        return Err(CookieError::InvalidCookie(format!(
            "path must start with '/': {:?}",
            cookie.path
        )));
    }
    Ok(())
}

/// Cookie path-match: `cookie_path` is `/`, equals `request_path`, or is a
/// directory prefix of it.
fn path_matches(cookie_path: &str, request_path: &str) -> bool {
    if cookie_path == request_path || cookie_path == "/" {
        return true;
    }
    if let Some(rest) = request_path.strip_prefix(cookie_path) {
        return cookie_path.ends_with('/') || rest.starts_with('/');
    }
    false
}

// === MemoryCookieJar ===

#[derive(Debug, Clone)]
struct MemoryEntry {
    value: String,
    same_site: Option<SameSite>,
    expires_at: i64,
}

/// Cookie jar held entirely in memory.
pub struct MemoryCookieJar {
    entries: HashMap<(String, String), MemoryEntry>,
    clock: Clock,
}

impl MemoryCookieJar {
    pub fn new() -> Self {
        Self::with_clock(system_clock())
    }

    /// Creates a jar that reads time from `clock` (unix seconds).
    pub fn with_clock(clock: Clock) -> Self {
        Self {
            entries: HashMap::new(),
            clock,
        }
    }

    /// Number of stored slots, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Stored SameSite attribute for a slot.
    pub fn same_site(&self, name: &str, path: &str) -> Option<SameSite> {
        self.entries
            .get(&(name.to_string(), path.to_string()))
            .and_then(|entry| entry.same_site)
    }
}

impl Default for MemoryCookieJar {
    fn default() -> Self {
        Self::new()
    }
}

impl CookieJarTrait for MemoryCookieJar {
    fn get(&self, name: &str, request_path: &str) -> Result<Option<String>, CookieError> {
        let now = (self.clock)();
        let found = self
            .entries
            .iter()
            .filter(|((n, p), entry)| {
                n == name && entry.expires_at > now && path_matches(p, request_path)
            })
            .max_by_key(|((_, p), _)| p.len())
            .map(|(_, entry)| entry.value.clone());
        Ok(found)
    }

    fn set(&mut self, cookie: &Cookie) -> Result<(), CookieError> {
        validate(cookie)?;
        let key = (cookie.name.clone(), cookie.path.clone());
        if cookie.is_removal() {
            self.entries.remove(&key);
            return Ok(());
        }
        let expires_at = (self.clock)().saturating_add(cookie.max_age);
        self.entries.insert(
            key,
            MemoryEntry {
                value: cookie.value.clone(),
                same_site: cookie.same_site,
                expires_at,
            },
        );
        Ok(())
    }
}

// === SqliteCookieJar ===

/// Cookie jar persisted in the `cookies` table.
pub struct SqliteCookieJar {
    db: Database,
    clock: Clock,
}

impl SqliteCookieJar {
    pub fn new(db: Database) -> Self {
        Self::with_clock(db, system_clock())
    }

    pub fn with_clock(db: Database, clock: Clock) -> Self {
        Self { db, clock }
    }

    /// Deletes every expired slot. Returns how many were removed.
    pub fn purge_expired(&mut self) -> Result<usize, CookieError> {
        let now = (self.clock)();
        let removed = self
            .db
            .connection()
            .execute("DELETE FROM cookies WHERE expires_at <= ?1", params![now])
            .map_err(|e| CookieError::DatabaseError(e.to_string()))?;
        if removed > 0 {
            debug!(removed, "purged expired cookies");
        }
        Ok(removed)
    }

    /// Reads back the stored SameSite attribute for a slot.
    pub fn same_site(&self, name: &str, path: &str) -> Result<Option<SameSite>, CookieError> {
        let stored: Option<Option<String>> = self
            .db
            .connection()
            .query_row(
                "SELECT same_site FROM cookies WHERE name = ?1 AND path = ?2",
                params![name, path],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| CookieError::DatabaseError(e.to_string()))?;
        Ok(stored.flatten().and_then(|s| SameSite::parse(&s)))
    }
}

impl CookieJarTrait for SqliteCookieJar {
    fn get(&self, name: &str, request_path: &str) -> Result<Option<String>, CookieError> {
        let now = (self.clock)();
        let conn = self.db.connection();
        let mut stmt = conn
            .prepare(
                "SELECT path, value FROM cookies WHERE name = ?1 AND expires_at > ?2 ORDER BY LENGTH(path) DESC",
            )
            .map_err(|e| CookieError::DatabaseError(e.to_string()))?;
        let rows = stmt
            .query_map(params![name, now], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })
            .map_err(|e| CookieError::DatabaseError(e.to_string()))?;

        for row in rows {
            let (path, value) = row.map_err(|e| CookieError::DatabaseError(e.to_string()))?;
            if path_matches(&path, request_path) {
                return Ok(Some(value));
            }
        }
        Ok(None)
    }

    fn set(&mut self, cookie: &Cookie) -> Result<(), CookieError> {
        validate(cookie)?;
        let conn = self.db.connection();

        if cookie.is_removal() {
            conn.execute(
                "DELETE FROM cookies WHERE name = ?1 AND path = ?2",
                params![cookie.name, cookie.path],
            )
            .map_err(|e| CookieError::DatabaseError(e.to_string()))?;
            return Ok(());
        }

        let now = (self.clock)();
        let expires_at = now.saturating_add(cookie.max_age);
        conn.execute(
            "INSERT OR REPLACE INTO cookies (name, path, value, same_site, expires_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                cookie.name,
                cookie.path,
                cookie.value,
                cookie.same_site.map(|s| s.as_str()),
                expires_at,
                now
            ],
        )
        .map_err(|e| CookieError::DatabaseError(e.to_string()))?;
        Ok(())
    }
}
