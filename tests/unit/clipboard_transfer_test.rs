//! Unit tests for the clipboard transfer and its legacy fallback.

use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use pwgen_client::services::clipboard_transfer::{
    ClipboardCapability, ClipboardTransfer, CommandCopyHost, FieldId, LegacyCopyHost,
};
use pwgen_client::types::errors::ClipboardError;
use rstest::rstest;

#[derive(Clone, Copy, Debug)]
enum ExecOutcome {
    Copied,
    Refused,
    Fails,
    Panics,
}

/// Legacy host that tracks live fields and records what was copied.
#[derive(Clone)]
struct FakeHost {
    outcome: ExecOutcome,
    fields: Arc<Mutex<HashMap<u64, String>>>,
    selected: Arc<Mutex<Option<u64>>>,
    copied: Arc<Mutex<Vec<String>>>,
    next: Arc<AtomicU64>,
}

impl FakeHost {
    fn new(outcome: ExecOutcome) -> Self {
        Self {
            outcome,
            fields: Arc::new(Mutex::new(HashMap::new())),
            selected: Arc::new(Mutex::new(None)),
            copied: Arc::new(Mutex::new(Vec::new())),
            next: Arc::new(AtomicU64::new(0)),
        }
    }

    fn live_fields(&self) -> usize {
        self.fields.lock().unwrap_or_else(|p| p.into_inner()).len()
    }

    fn copied(&self) -> Vec<String> {
        self.copied.lock().unwrap().clone()
    }
}

impl LegacyCopyHost for FakeHost {
    fn create_field(&self, text: &str) -> Result<FieldId, String> {
        let id = self.next.fetch_add(1, Ordering::SeqCst);
        self.fields.lock().unwrap().insert(id, text.to_string());
        Ok(FieldId(id))
    }

    fn select_all(&self, field: FieldId) -> Result<(), String> {
        *self.selected.lock().unwrap() = Some(field.0);
        Ok(())
    }

    fn exec_copy(&self) -> Result<bool, String> {
        match self.outcome {
            ExecOutcome::Copied => {
                let id = self.selected.lock().unwrap().unwrap();
                let text = self.fields.lock().unwrap()[&id].clone();
                self.copied.lock().unwrap().push(text);
                Ok(true)
            }
            ExecOutcome::Refused => Ok(false),
            ExecOutcome::Fails => Err("copy command threw".to_string()),
            ExecOutcome::Panics => panic!("host crashed during copy"),
        }
    }

    fn remove_field(&self, field: FieldId) {
        self.fields
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .remove(&field.0);
    }
}

/// Primary capability that either stores the text or rejects it.
#[derive(Clone)]
struct FakePrimary {
    works: bool,
    written: Arc<Mutex<Vec<String>>>,
}

impl FakePrimary {
    fn new(works: bool) -> Self {
        Self {
            works,
            written: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl ClipboardCapability for FakePrimary {
    fn write_text(&self, text: &str) -> Result<(), String> {
        if self.works {
            self.written.lock().unwrap().push(text.to_string());
            Ok(())
        } else {
            Err("permission denied".to_string())
        }
    }
}

#[test]
fn test_primary_path_skips_fallback() {
    let primary = FakePrimary::new(true);
    let host = FakeHost::new(ExecOutcome::Copied);
    let transfer = ClipboardTransfer::new(Some(Box::new(primary.clone())), Box::new(host.clone()));

    assert!(transfer.has_primary());
    transfer.copy("s3cret!").unwrap();
    assert_eq!(*primary.written.lock().unwrap(), vec!["s3cret!".to_string()]);
    assert!(host.copied().is_empty());
}

#[test]
fn test_failed_primary_uses_fallback() {
    let host = FakeHost::new(ExecOutcome::Copied);
    let transfer = ClipboardTransfer::new(
        Some(Box::new(FakePrimary::new(false))),
        Box::new(host.clone()),
    );

    transfer.copy("fallback-me").unwrap();
    assert_eq!(host.copied(), vec!["fallback-me".to_string()]);
    assert_eq!(host.live_fields(), 0);
}

#[test]
fn test_absent_primary_uses_fallback() {
    let host = FakeHost::new(ExecOutcome::Copied);
    let transfer = ClipboardTransfer::new(None, Box::new(host.clone()));

    assert!(!transfer.has_primary());
    transfer.copy("only-legacy").unwrap();
    assert_eq!(host.copied(), vec!["only-legacy".to_string()]);
}

#[rstest]
#[case(ExecOutcome::Copied, true)]
#[case(ExecOutcome::Refused, false)]
#[case(ExecOutcome::Fails, false)]
fn test_fallback_always_removes_field(#[case] outcome: ExecOutcome, #[case] succeeds: bool) {
    let host = FakeHost::new(outcome);
    let transfer = ClipboardTransfer::new(None, Box::new(host.clone()));

    let result = transfer.copy("abc");
    assert_eq!(result.is_ok(), succeeds, "{:?}", outcome);
    if let Err(err) = result {
        assert!(matches!(err, ClipboardError::Unavailable(_)));
    }
    assert_eq!(host.live_fields(), 0);
}

#[test]
fn test_fallback_removes_field_when_host_panics() {
    let host = FakeHost::new(ExecOutcome::Panics);
    let transfer = ClipboardTransfer::new(None, Box::new(host.clone()));

    let result = panic::catch_unwind(AssertUnwindSafe(|| transfer.copy("abc")));
    assert!(result.is_err());
    assert_eq!(host.live_fields(), 0);
}

#[test]
fn test_command_host_without_tools_is_unavailable() {
    let transfer = ClipboardTransfer::new(None, Box::new(CommandCopyHost::with_commands(Vec::new())));
    assert!(matches!(
        transfer.copy("nowhere"),
        Err(ClipboardError::Unavailable(_))
    ));
}

#[cfg(unix)]
#[test]
fn test_fallback_delivers_text_to_copy_command() {
    use pwgen_client::platform::CopyCommand;

    let dir = tempfile::tempdir().unwrap();
    let capture = dir.path().join("fallback_capture.txt");
    std::env::set_var("PWGEN_FALLBACK_CAPTURE", &capture);

    let host = CommandCopyHost::with_commands(vec![
        CopyCommand {
            program: "pwgen-no-such-copy-tool",
            args: &[],
        },
        CopyCommand {
            program: "sh",
            args: &["-c", "cat > \"$PWGEN_FALLBACK_CAPTURE\""],
        },
    ]);
    let transfer = ClipboardTransfer::new(Some(Box::new(FakePrimary::new(false))), Box::new(host));

    transfer.copy("Zq8#pL2!vN5@ é").unwrap();
    assert_eq!(std::fs::read_to_string(&capture).unwrap(), "Zq8#pL2!vN5@ é");
}
