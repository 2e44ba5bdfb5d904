use super::settings::{Language, Separator, Settings};

/// Maximum number of batch entries a caller ever sees.
pub const MAX_BATCH_SIZE: usize = 5;

/// `separator_type` value sent in place of `custom`.
pub const SINGLE_CHARACTER_SEPARATOR: &str = "single_character";

/// Path of the generation endpoint relative to the base path.
pub const GENERATE_ENDPOINT: &str = "generate-password";

/// `{base_path}generate-password`; the base path is used verbatim.
pub fn endpoint_url(base_path: &str) -> String {
    format!("{}{}", base_path, GENERATE_ENDPOINT)
}

/// Transport-ready encoding of a settings snapshot.
///
/// Optional fields are present only when the matching enum selects `custom`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub length: u32,
    pub include_uppercase: bool,
    pub include_digits: bool,
    pub include_special: bool,
    pub exclude_homoglyphs: bool,
    pub include_numbers: bool,
    pub include_special_chars: bool,
    pub capitalize: bool,
    pub word_count: u32,
    pub separator_type: String,
    pub user_defined_separator: Option<String>,
    pub max_word_length: u32,
    pub kind: String,
    pub language: String,
    pub language_custom: Option<String>,
}

impl GenerationRequest {
    pub fn from_settings(settings: &Settings) -> Self {
        let (separator_type, user_defined_separator) = match settings.separator {
            Separator::Custom => (
                SINGLE_CHARACTER_SEPARATOR.to_string(),
                Some(settings.custom_separator.clone()),
            ),
            other => (other.as_str().to_string(), None),
        };

        let language_custom = match settings.language {
            Language::Custom => Some(settings.custom_language.clone()),
            _ => None,
        };

        Self {
            length: settings.length,
            include_uppercase: settings.include_uppercase,
            include_digits: settings.include_digits,
            include_special: settings.include_special,
            exclude_homoglyphs: settings.exclude_homoglyphs,
            include_numbers: settings.include_numbers,
            include_special_chars: settings.include_special_chars,
            capitalize: settings.capitalize_words,
            word_count: settings.word_count,
            separator_type,
            user_defined_separator,
            max_word_length: settings.max_word_length,
            kind: settings.mode.as_str().to_string(),
            language: settings.language.as_str().to_string(),
            language_custom,
        }
    }

    /// Form fields in transmission order.
    pub fn to_form(&self) -> Vec<(&'static str, String)> {
        let mut form = vec![
            ("length", self.length.to_string()),
            ("include_uppercase", self.include_uppercase.to_string()),
            ("include_digits", self.include_digits.to_string()),
            ("include_special", self.include_special.to_string()),
            ("exclude_homoglyphs", self.exclude_homoglyphs.to_string()),
            ("include_numbers", self.include_numbers.to_string()),
            ("include_special_chars", self.include_special_chars.to_string()),
            ("capitalize", self.capitalize.to_string()),
            ("word_count", self.word_count.to_string()),
            ("separator_type", self.separator_type.clone()),
        ];
        if let Some(sep) = &self.user_defined_separator {
            form.push(("user_defined_separator", sep.clone()));
        }
        form.push(("max_word_length", self.max_word_length.to_string()));
        form.push(("type", self.kind.clone()));
        form.push(("language", self.language.clone()));
        if let Some(custom) = &self.language_custom {
            form.push(("languageCustom", custom.clone()));
        }
        form
    }

    /// Looks up a single form field by name.
    pub fn field(&self, name: &str) -> Option<String> {
        self.to_form()
            .into_iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value)
    }
}

/// Normalized generator response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationResult {
    Single { credential: String },
    /// At most [`MAX_BATCH_SIZE`] entries, in response order.
    Batch { credentials: Vec<String> },
}

impl GenerationResult {
    /// Builds a batch, dropping everything past index 4.
    pub fn batch(mut credentials: Vec<String>) -> Self {
        credentials.truncate(MAX_BATCH_SIZE);
        GenerationResult::Batch { credentials }
    }
}
