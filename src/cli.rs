//! Command-line interface definitions for pwgen.
//!
//! Every generation option is optional: anything left out keeps the value
//! from the persisted snapshot, or the default when nothing is persisted.

use clap::{ArgAction, Parser};

use pwgen_client::types::settings::{Language, Mode, Separator, Settings};

#[derive(Parser, Debug)]
#[command(
    name = "pwgen",
    version,
    about = "Generate passwords and passphrases with a remote generator",
    long_about = r#"
pwgen asks a generator service for a password or passphrase and reveals it
on the terminal. Settings can be remembered between runs with --save and
forgotten again with --forget.

Typical usage:
  pwgen --length 24
  pwgen --passphrase --words 5 --separator period --save
  pwgen --copy
"#
)]
pub struct Cli {
    /// Generator base path (overrides PWGEN_BASE_PATH)
    #[arg(long, value_name = "URL")]
    pub base_path: Option<String>,

    /// Request timeout in seconds (overrides PWGEN_TIMEOUT_SECS)
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Generate a passphrase
    #[arg(short, long, conflicts_with = "password")]
    pub passphrase: bool,

    /// Generate a password
    #[arg(long)]
    pub password: bool,

    /// Password length
    #[arg(short, long)]
    pub length: Option<u32>,

    /// Number of passphrase words
    #[arg(short, long)]
    pub words: Option<u32>,

    /// Word separator: space, hyphen, underscore, period, comma, number,
    /// special_character, random or custom
    #[arg(long)]
    pub separator: Option<Separator>,

    /// Literal separator used with `--separator custom`
    #[arg(long, value_name = "CHAR")]
    pub custom_separator: Option<String>,

    /// Longest word allowed in a passphrase
    #[arg(long)]
    pub max_word_length: Option<u32>,

    /// Wordlist language: en, fi, fr, it or custom
    #[arg(long)]
    pub language: Option<Language>,

    /// Wordlist identifier used with `--language custom`
    #[arg(long, value_name = "ID")]
    pub custom_language: Option<String>,

    #[arg(long, value_name = "BOOL")]
    pub uppercase: Option<bool>,

    #[arg(long, value_name = "BOOL")]
    pub digits: Option<bool>,

    #[arg(long, value_name = "BOOL")]
    pub special: Option<bool>,

    #[arg(long, value_name = "BOOL")]
    pub exclude_homoglyphs: Option<bool>,

    /// Add numbers to passphrase words
    #[arg(long, value_name = "BOOL")]
    pub numbers: Option<bool>,

    /// Add special characters to passphrase words
    #[arg(long, value_name = "BOOL")]
    pub special_chars: Option<bool>,

    #[arg(long, value_name = "BOOL")]
    pub capitalize: Option<bool>,

    /// Remember the resulting settings
    #[arg(long, conflicts_with = "forget")]
    pub save: bool,

    /// Erase remembered settings
    #[arg(long)]
    pub forget: bool,

    /// Copy the generated password to the clipboard
    #[arg(short, long, conflicts_with = "copy_slot")]
    pub copy: bool,

    /// Copy one entry of a batch result (0-4)
    #[arg(long, value_name = "SLOT")]
    pub copy_slot: Option<usize>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Applies the overrides given on the command line to `settings`.
    pub fn apply(&self, settings: &mut Settings) {
        if self.passphrase {
            settings.mode = Mode::Passphrase;
        } else if self.password {
            settings.mode = Mode::Password;
        }
        if let Some(length) = self.length {
            settings.length = length;
        }
        if let Some(words) = self.words {
            settings.word_count = words;
        }
        if let Some(separator) = self.separator {
            settings.separator = separator;
        }
        if let Some(custom) = &self.custom_separator {
            settings.custom_separator = custom.clone();
        }
        if let Some(max) = self.max_word_length {
            settings.max_word_length = max;
        }
        if let Some(language) = self.language {
            settings.language = language;
        }
        if let Some(custom) = &self.custom_language {
            settings.custom_language = custom.clone();
        }

        let flags = [
            (self.uppercase, &mut settings.include_uppercase),
            (self.digits, &mut settings.include_digits),
            (self.special, &mut settings.include_special),
            (self.exclude_homoglyphs, &mut settings.exclude_homoglyphs),
            (self.numbers, &mut settings.include_numbers),
            (self.special_chars, &mut settings.include_special_chars),
            (self.capitalize, &mut settings.capitalize_words),
        ];
        for (value, field) in flags {
            if let Some(value) = value {
                *field = value;
            }
        }
    }
}
