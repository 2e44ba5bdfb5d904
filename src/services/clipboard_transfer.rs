//! Clipboard Transfer for pwgen.
//!
//! Copies a credential with the modern clipboard capability when one is
//! available, and otherwise (or when it fails) through the legacy path: stage
//! the text in an off-screen field, select it, run the legacy copy command,
//! and always remove the field afterwards.

use std::collections::HashMap;
use std::io::{ErrorKind, Write};
use std::process::{Command, Stdio};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use tracing::{debug, error, info, warn};
use zeroize::Zeroizing;

use crate::platform::{self, CopyCommand};
use crate::types::errors::ClipboardError;

/// Modern clipboard write capability.
pub trait ClipboardCapability: Send + Sync {
    fn write_text(&self, text: &str) -> Result<(), String>;
}

/// Identifier of a staged off-screen field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldId(pub u64);

/// Host for the legacy copy path.
pub trait LegacyCopyHost: Send + Sync {
    /// Creates an off-screen field holding `text`.
    fn create_field(&self, text: &str) -> Result<FieldId, String>;
    /// Focuses the field and selects all of its contents.
    fn select_all(&self, field: FieldId) -> Result<(), String>;
    /// Runs the legacy copy command on the current selection. `Ok(false)`
    /// means the command ran but reported that nothing was copied.
    fn exec_copy(&self) -> Result<bool, String>;
    /// Removes the field. Must tolerate fields that are already gone.
    fn remove_field(&self, field: FieldId);
}

/// Removes its field when dropped, panics included.
struct StagedField<'a> {
    host: &'a dyn LegacyCopyHost,
    id: FieldId,
}

impl Drop for StagedField<'_> {
    fn drop(&mut self) {
        self.host.remove_field(self.id);
    }
}

/// Copies text with a guaranteed fallback path.
pub struct ClipboardTransfer {
    primary: Option<Box<dyn ClipboardCapability>>,
    fallback: Box<dyn LegacyCopyHost>,
}

impl ClipboardTransfer {
    pub fn new(
        primary: Option<Box<dyn ClipboardCapability>>,
        fallback: Box<dyn LegacyCopyHost>,
    ) -> Self {
        Self { primary, fallback }
    }

    /// Transfer wired to the host system: the native clipboard when the
    /// `system-clipboard` feature is enabled, platform copy commands otherwise.
    pub fn system() -> Self {
        #[cfg(feature = "system-clipboard")]
        let primary: Option<Box<dyn ClipboardCapability>> = Some(Box::new(SystemClipboard));
        #[cfg(not(feature = "system-clipboard"))]
        let primary: Option<Box<dyn ClipboardCapability>> = None;

        Self::new(primary, Box::new(CommandCopyHost::new()))
    }

    pub fn has_primary(&self) -> bool {
        self.primary.is_some()
    }

    /// Copies `text`. Both paths report success and failure the same way.
    pub fn copy(&self, text: &str) -> Result<(), ClipboardError> {
        if let Some(primary) = &self.primary {
            match primary.write_text(text) {
                Ok(()) => {
                    info!("credential copied to clipboard");
                    return Ok(());
                }
                Err(e) => warn!("clipboard write failed, using fallback: {}", e),
            }
        }
        self.fallback_copy(text)
    }

    fn fallback_copy(&self, text: &str) -> Result<(), ClipboardError> {
        let host = self.fallback.as_ref();
        let id = host
            .create_field(text)
            .map_err(|e| ClipboardError::Unavailable(format!("Failed to stage text: {}", e)))?;
        let _field = StagedField { host, id };

        host.select_all(id)
            .map_err(|e| ClipboardError::Unavailable(format!("Failed to select text: {}", e)))?;

        match host.exec_copy() {
            Ok(true) => {
                info!("fallback copy succeeded");
                Ok(())
            }
            Ok(false) => {
                error!("fallback copy command was unsuccessful");
                Err(ClipboardError::Unavailable(
                    "legacy copy command reported failure".to_string(),
                ))
            }
            Err(e) => {
                error!("fallback copy failed: {}", e);
                Err(ClipboardError::Unavailable(e))
            }
        }
    }
}

// === CommandCopyHost ===

/// Legacy host that stages text in memory and pipes the selection into the
/// platform clipboard command. Staged text is zeroized when removed.
pub struct CommandCopyHost {
    commands: Vec<CopyCommand>,
    fields: Mutex<HashMap<FieldId, Zeroizing<String>>>,
    selection: Mutex<Option<FieldId>>,
    next_id: AtomicU64,
}

impl CommandCopyHost {
    pub fn new() -> Self {
        Self::with_commands(platform::legacy_copy_commands().to_vec())
    }

    /// Host that tries `commands` in order.
    pub fn with_commands(commands: Vec<CopyCommand>) -> Self {
        Self {
            commands,
            fields: Mutex::new(HashMap::new()),
            selection: Mutex::new(None),
            next_id: AtomicU64::new(1),
        }
    }

    /// Number of fields currently staged.
    pub fn staged_fields(&self) -> usize {
        self.fields.lock().map(|f| f.len()).unwrap_or(0)
    }

    fn run(command: &CopyCommand, text: &str) -> std::io::Result<bool> {
        let mut child = Command::new(command.program)
            .args(command.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;
        if let Some(mut stdin) = child.stdin.take() {
            // The exit status decides for tools that stop reading early.
            if let Err(e) = stdin.write_all(text.as_bytes()) {
                if e.kind() != ErrorKind::BrokenPipe {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(e);
                }
            }
        }
        Ok(child.wait()?.success())
    }
}

impl Default for CommandCopyHost {
    fn default() -> Self {
        Self::new()
    }
}

impl LegacyCopyHost for CommandCopyHost {
    fn create_field(&self, text: &str) -> Result<FieldId, String> {
        let id = FieldId(self.next_id.fetch_add(1, Ordering::SeqCst));
        self.fields
            .lock()
            .map_err(|e| e.to_string())?
            .insert(id, Zeroizing::new(text.to_string()));
        Ok(id)
    }

    fn select_all(&self, field: FieldId) -> Result<(), String> {
        let fields = self.fields.lock().map_err(|e| e.to_string())?;
        if !fields.contains_key(&field) {
            return Err(format!("no staged field {:?}", field));
        }
        *self.selection.lock().map_err(|e| e.to_string())? = Some(field);
        Ok(())
    }

    fn exec_copy(&self) -> Result<bool, String> {
        let selected = (*self.selection.lock().map_err(|e| e.to_string())?)
            .ok_or_else(|| "nothing selected".to_string())?;
        let text = self
            .fields
            .lock()
            .map_err(|e| e.to_string())?
            .get(&selected)
            .cloned()
            .ok_or_else(|| format!("selected field {:?} is gone", selected))?;

        for command in &self.commands {
            match Self::run(command, &text) {
                Ok(true) => {
                    debug!(program = command.program, "copy command succeeded");
                    return Ok(true);
                }
                Ok(false) => debug!(program = command.program, "copy command exited unsuccessfully"),
                Err(e) => debug!(program = command.program, "copy command unavailable: {}", e),
            }
        }
        Ok(false)
    }

    fn remove_field(&self, field: FieldId) {
        if let Ok(mut fields) = self.fields.lock() {
            fields.remove(&field);
        }
        if let Ok(mut selection) = self.selection.lock() {
            if *selection == Some(field) {
                *selection = None;
            }
        }
    }
}

// === SystemClipboard ===

/// Native clipboard via the `clipboard` crate.
#[cfg(feature = "system-clipboard")]
pub struct SystemClipboard;

#[cfg(feature = "system-clipboard")]
impl ClipboardCapability for SystemClipboard {
    fn write_text(&self, text: &str) -> Result<(), String> {
        use clipboard::{ClipboardContext, ClipboardProvider};

        let mut ctx: ClipboardContext = ClipboardProvider::new()
            .map_err(|e| format!("Clipboard init error: {}", e))?;
        ctx.set_contents(text.to_string())
            .map_err(|e| format!("Clipboard set error: {}", e))
    }
}
