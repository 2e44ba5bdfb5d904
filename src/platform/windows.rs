// pwgen platform details for Windows
// Data: %APPDATA%/pwgen
// Copy: clip.exe

use std::env;
use std::path::PathBuf;

use super::CopyCommand;

pub const COPY_COMMANDS: &[CopyCommand] = &[CopyCommand { program: "clip", args: &[] }];

/// Returns the data directory for pwgen on Windows.
/// `%APPDATA%/pwgen`
pub fn get_data_dir() -> PathBuf {
    let appdata =
        env::var("APPDATA").unwrap_or_else(|_| String::from("C:\\Users\\Default\\AppData\\Roaming"));
    PathBuf::from(appdata).join("pwgen")
}
