use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which kind of credential the generator should produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Password,
    Passphrase,
}

impl Mode {
    /// Value transmitted as the `type` discriminant.
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Password => "password",
            Mode::Passphrase => "passphrase",
        }
    }
}

/// Word separator for passphrase mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Separator {
    Space,
    #[default]
    Hyphen,
    Underscore,
    Period,
    Comma,
    Number,
    SpecialCharacter,
    Random,
    Custom,
}

impl Separator {
    /// Wire name sent as `separator_type` for named separators.
    pub fn as_str(&self) -> &'static str {
        match self {
            Separator::Space => "space",
            Separator::Hyphen => "hyphen",
            Separator::Underscore => "underscore",
            Separator::Period => "period",
            Separator::Comma => "comma",
            Separator::Number => "number",
            Separator::SpecialCharacter => "special_character",
            Separator::Random => "random",
            Separator::Custom => "custom",
        }
    }
}

impl FromStr for Separator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        const ALL: [Separator; 9] = [
            Separator::Space,
            Separator::Hyphen,
            Separator::Underscore,
            Separator::Period,
            Separator::Comma,
            Separator::Number,
            Separator::SpecialCharacter,
            Separator::Random,
            Separator::Custom,
        ];
        ALL.into_iter()
            .find(|sep| sep.as_str() == s)
            .ok_or_else(|| format!("unknown separator: {}", s))
    }
}

/// Wordlist language for passphrase mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Fi,
    Fr,
    It,
    Custom,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Fi => "fi",
            Language::Fr => "fr",
            Language::It => "it",
            Language::Custom => "custom",
        }
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "en" => Ok(Language::En),
            "fi" => Ok(Language::Fi),
            "fr" => Ok(Language::Fr),
            "it" => Ok(Language::It),
            "custom" => Ok(Language::Custom),
            other => Err(format!("unknown language: {}", other)),
        }
    }
}

/// Complete snapshot of the user's generation preferences.
///
/// Field names on the wire match the persisted cookie payload. Missing fields
/// take their default so older, partial snapshots still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    #[serde(rename = "passphraseToggle", with = "passphrase_toggle")]
    pub mode: Mode,
    #[serde(deserialize_with = "deserialize_count")]
    pub length: u32,
    pub include_uppercase: bool,
    pub include_digits: bool,
    pub include_special: bool,
    pub exclude_homoglyphs: bool,
    pub include_numbers: bool,
    pub include_special_chars: bool,
    pub capitalize_words: bool,
    #[serde(deserialize_with = "deserialize_count")]
    pub word_count: u32,
    pub separator: Separator,
    pub custom_separator: String,
    #[serde(deserialize_with = "deserialize_count")]
    pub max_word_length: u32,
    pub language: Language,
    pub custom_language: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mode: Mode::Password,
            length: 16,
            include_uppercase: true,
            include_digits: true,
            include_special: true,
            exclude_homoglyphs: false,
            include_numbers: false,
            include_special_chars: false,
            capitalize_words: false,
            word_count: 4,
            separator: Separator::Hyphen,
            custom_separator: String::new(),
            max_word_length: 8,
            language: Language::En,
            custom_language: String::new(),
        }
    }
}

impl Settings {
    /// The user-defined separator, only when `separator` selects it.
    pub fn custom_separator(&self) -> Option<&str> {
        match self.separator {
            Separator::Custom => Some(&self.custom_separator),
            _ => None,
        }
    }

    /// The user-defined wordlist identifier, only when `language` selects it.
    pub fn custom_language(&self) -> Option<&str> {
        match self.language {
            Language::Custom => Some(&self.custom_language),
            _ => None,
        }
    }
}

mod passphrase_toggle {
    use super::Mode;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(mode: &Mode, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_bool(*mode == Mode::Passphrase)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Mode, D::Error> {
        Ok(if bool::deserialize(d)? {
            Mode::Passphrase
        } else {
            Mode::Password
        })
    }
}

/// Accepts a non-negative integer either as a JSON number or as a numeric
/// string (slider values were historically stored as strings).
fn deserialize_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    struct CountVisitor;

    impl<'de> Visitor<'de> for CountVisitor {
        type Value = u32;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a non-negative integer or a numeric string")
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<u32, E> {
            u32::try_from(v).map_err(|_| E::custom(format!("count out of range: {}", v)))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<u32, E> {
            u32::try_from(v).map_err(|_| E::custom(format!("count out of range: {}", v)))
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<u32, E> {
            v.trim()
                .parse::<u32>()
                .map_err(|_| E::custom(format!("invalid count: {:?}", v)))
        }
    }

    deserializer.deserialize_any(CountVisitor)
}
