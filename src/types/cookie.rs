use serde::{Deserialize, Serialize};
use std::fmt;

/// SameSite attribute of a cookie slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SameSite {
    Strict,
    Lax,
    None,
}

impl SameSite {
    pub fn as_str(&self) -> &'static str {
        match self {
            SameSite::Strict => "strict",
            SameSite::Lax => "lax",
            SameSite::None => "none",
        }
    }

    pub fn parse(value: &str) -> Option<SameSite> {
        match value.to_ascii_lowercase().as_str() {
            "strict" => Some(SameSite::Strict),
            "lax" => Some(SameSite::Lax),
            "none" => Some(SameSite::None),
            _ => None,
        }
    }
}

/// A cookie write: value plus the attributes that scope and expire it.
///
/// A `max_age` of zero or below deletes the slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    pub path: String,
    pub max_age: i64,
    pub same_site: Option<SameSite>,
}

impl Cookie {
    pub fn new(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
            path: "/".to_string(),
            max_age: 0,
            same_site: None,
        }
    }

    pub fn with_max_age(mut self, seconds: i64) -> Self {
        self.max_age = seconds;
        self
    }

    pub fn with_same_site(mut self, same_site: SameSite) -> Self {
        self.same_site = Some(same_site);
        self
    }

    pub fn with_path(mut self, path: &str) -> Self {
        self.path = path.to_string();
        self
    }

    /// True when writing this cookie removes the slot instead of storing it.
    pub fn is_removal(&self) -> bool {
        self.max_age <= 0
    }
}

/// Renders the `document.cookie` assignment form,
/// e.g. `pwgen-settings={..};path=/;max-age=31536000;samesite=strict`.
impl fmt::Display for Cookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={};path={};max-age={}", self.name, self.value, self.path, self.max_age)?;
        if let Some(same_site) = self.same_site {
            write!(f, ";samesite={}", same_site.as_str())?;
        }
        Ok(())
    }
}
