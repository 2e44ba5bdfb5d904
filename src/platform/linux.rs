// pwgen platform details for Linux
// Data: ~/.local/share/pwgen
// Copy: wl-copy, xclip, xsel

use std::env;
use std::path::PathBuf;

use super::CopyCommand;

/// Wayland first, then the two common X11 tools.
pub const COPY_COMMANDS: &[CopyCommand] = &[
    CopyCommand { program: "wl-copy", args: &[] },
    CopyCommand { program: "xclip", args: &["-selection", "clipboard"] },
    CopyCommand { program: "xsel", args: &["--clipboard", "--input"] },
];

/// Returns the data directory for pwgen on Linux.
/// Uses `$XDG_DATA_HOME/pwgen` if set, otherwise `~/.local/share/pwgen`.
pub fn get_data_dir() -> PathBuf {
    if let Ok(xdg) = env::var("XDG_DATA_HOME") {
        PathBuf::from(xdg).join("pwgen")
    } else {
        let home = env::var("HOME").unwrap_or_else(|_| String::from("/tmp"));
        PathBuf::from(home).join(".local").join("share").join("pwgen")
    }
}
