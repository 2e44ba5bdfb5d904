// pwgen-client platform abstraction
// Provides the data directory and the legacy clipboard commands per OS.
//
// Uses `cfg(target_os)` for conditional compilation to select the correct
// platform-specific implementation at compile time.

use std::path::PathBuf;

#[cfg(target_os = "linux")]
mod linux;

#[cfg(target_os = "macos")]
mod macos;

#[cfg(target_os = "windows")]
mod windows;

/// A clipboard command line: program plus arguments; the text goes to stdin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CopyCommand {
    pub program: &'static str,
    pub args: &'static [&'static str],
}

/// Returns the platform-specific data directory for pwgen.
///
/// - **Linux**: `~/.local/share/pwgen` (or `$XDG_DATA_HOME/pwgen`)
/// - **macOS**: `~/Library/Application Support/pwgen`
/// - **Windows**: `%APPDATA%/pwgen`
pub fn get_data_dir() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        linux::get_data_dir()
    }
    #[cfg(target_os = "macos")]
    {
        macos::get_data_dir()
    }
    #[cfg(target_os = "windows")]
    {
        windows::get_data_dir()
    }
    #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
    {
        std::env::temp_dir().join("pwgen")
    }
}

/// Returns the clipboard commands to try, in order, for the legacy copy path.
pub fn legacy_copy_commands() -> &'static [CopyCommand] {
    #[cfg(target_os = "linux")]
    {
        linux::COPY_COMMANDS
    }
    #[cfg(target_os = "macos")]
    {
        macos::COPY_COMMANDS
    }
    #[cfg(target_os = "windows")]
    {
        windows::COPY_COMMANDS
    }
    #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
    {
        &[]
    }
}
