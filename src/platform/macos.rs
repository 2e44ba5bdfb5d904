// pwgen platform details for macOS
// Data: ~/Library/Application Support/pwgen
// Copy: pbcopy

use std::env;
use std::path::PathBuf;

use super::CopyCommand;

pub const COPY_COMMANDS: &[CopyCommand] = &[CopyCommand { program: "pbcopy", args: &[] }];

/// Returns the data directory for pwgen on macOS.
/// `~/Library/Application Support/pwgen`
pub fn get_data_dir() -> PathBuf {
    let home = env::var("HOME").unwrap_or_else(|_| String::from("/tmp"));
    PathBuf::from(home)
        .join("Library")
        .join("Application Support")
        .join("pwgen")
}
