//! App Core for pwgen.
//!
//! Central controller wiring the settings store, the generation client, the
//! reveal animator and the clipboard transfer into one edit → save + generate →
//! render pipeline.
//!
//! Generations and copy confirmations run as tokio tasks, so `refresh`,
//! `edit` and `copy` must be called from inside a tokio runtime.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::services::clipboard_transfer::ClipboardTransfer;
use crate::services::generation_client::{GenerationClient, GeneratorTransport};
use crate::services::reveal_animator::{OverlapPolicy, RevealAnimator};
use crate::services::settings_store::{SettingsStore, SettingsStoreTrait};
use crate::types::errors::{ClipboardError, GenerationError, SettingsError};
use crate::types::generation::GenerationResult;
use crate::types::settings::Settings;

/// How long a copy confirmation stays visible.
pub const COPY_CONFIRMATION: Duration = Duration::from_millis(1500);

/// What a copy request refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyTarget {
    /// The primary credential display.
    Primary,
    /// A batch slot, 0 to 4.
    Batch(usize),
}

/// Presentation hooks the controller drives besides the primary display.
pub trait PwgenView: Send + Sync {
    fn set_loading(&self, loading: bool);
    fn show_batch(&self, credentials: &[String]);
    /// `shown == false` reverts the confirmation.
    fn show_copy_confirmation(&self, target: CopyTarget, shown: bool);
}

#[derive(Debug, Default)]
struct ViewState {
    settings: Settings,
    persist: bool,
    primary: Option<String>,
    batch: Vec<String>,
}

/// View-model for the generator page.
pub struct PwgenApp<T: GeneratorTransport + 'static> {
    store: Arc<SettingsStore>,
    client: Arc<GenerationClient<T>>,
    animator: Arc<RevealAnimator>,
    clipboard: Arc<ClipboardTransfer>,
    view: Arc<dyn PwgenView>,
    state: Arc<Mutex<ViewState>>,
    policy: OverlapPolicy,
    latest: Arc<AtomicU64>,
}

impl<T: GeneratorTransport + 'static> PwgenApp<T> {
    pub fn new(
        store: SettingsStore,
        client: GenerationClient<T>,
        animator: RevealAnimator,
        clipboard: ClipboardTransfer,
        view: Arc<dyn PwgenView>,
    ) -> Self {
        Self {
            store: Arc::new(store),
            client: Arc::new(client),
            animator: Arc::new(animator),
            clipboard: Arc::new(clipboard),
            view,
            state: Arc::new(Mutex::new(ViewState::default())),
            policy: OverlapPolicy::default(),
            latest: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Policy for overlapping generations. Defaults to last-resolved-wins.
    pub fn with_policy(mut self, policy: OverlapPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn store(&self) -> &SettingsStore {
        &self.store
    }

    fn state(&self) -> MutexGuard<'_, ViewState> {
        self.state.lock().unwrap_or_else(|p| p.into_inner())
    }

    pub fn settings(&self) -> Settings {
        self.state().settings.clone()
    }

    pub fn persistence_enabled(&self) -> bool {
        self.state().persist
    }

    /// The final value of the last single credential, never the scrambled
    /// text on screen.
    pub fn primary(&self) -> Option<String> {
        self.state().primary.clone()
    }

    pub fn batch(&self) -> Vec<String> {
        self.state().batch.clone()
    }

    /// Applies the persisted snapshot, if any. A found snapshot also turns
    /// persistence on. Returns whether one was applied.
    pub fn startup(&self) -> bool {
        match self.store.load_or_recover() {
            Some(settings) => {
                let mut state = self.state();
                state.settings = settings;
                state.persist = true;
                info!("restored persisted settings");
                true
            }
            None => {
                debug!("no persisted settings, using defaults");
                false
            }
        }
    }

    /// A settings edit: persist (or erase) the snapshot, then regenerate.
    pub fn edit(&self, settings: Settings) -> JoinHandle<Result<GenerationResult, GenerationError>> {
        let persist = {
            let mut state = self.state();
            state.settings = settings.clone();
            state.persist
        };
        if let Err(e) = self.store.save(&settings, persist) {
            error!("failed to save settings: {}", e);
        }
        self.refresh()
    }

    /// Toggles persistence. Enabling writes the current snapshot, disabling
    /// erases it.
    pub fn set_persistence(&self, enabled: bool) -> Result<(), SettingsError> {
        let settings = {
            let mut state = self.state();
            state.persist = enabled;
            state.settings.clone()
        };
        self.store.save(&settings, enabled)
    }

    /// Requests a new credential for the current settings.
    ///
    /// The loading indicator is raised before the request and cleared on both
    /// outcomes by the newest request only. On failure the previous credential
    /// stays on screen.
    pub fn refresh(&self) -> JoinHandle<Result<GenerationResult, GenerationError>> {
        let token = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        let settings = self.settings();

        let client = self.client.clone();
        let animator = self.animator.clone();
        let view = self.view.clone();
        let state = self.state.clone();
        let latest = self.latest.clone();
        let policy = self.policy;

        view.set_loading(true);
        tokio::spawn(async move {
            let outcome = client.generate(&settings).await;
            let newest = latest.load(Ordering::SeqCst) == token;
            if newest {
                view.set_loading(false);
            }

            if policy == OverlapPolicy::LatestOnly && !newest {
                debug!(token, "discarding superseded generation result");
                return outcome;
            }

            match &outcome {
                Ok(GenerationResult::Single { credential }) => {
                    state.lock().unwrap_or_else(|p| p.into_inner()).primary = Some(credential.clone());
                    animator.play(credential);
                }
                Ok(GenerationResult::Batch { credentials }) => {
                    state.lock().unwrap_or_else(|p| p.into_inner()).batch = credentials.clone();
                    view.show_batch(credentials);
                }
                Err(e) => error!("{}", e),
            }
            outcome
        })
    }

    /// Copies the credential behind `target` and flashes the confirmation.
    pub async fn copy(&self, target: CopyTarget) -> Result<(), ClipboardError> {
        let text = {
            let state = self.state();
            match target {
                CopyTarget::Primary => state.primary.clone(),
                CopyTarget::Batch(slot) => state.batch.get(slot).cloned(),
            }
        }
        .ok_or_else(|| ClipboardError::Unavailable(format!("nothing to copy for {:?}", target)))?;

        let clipboard = self.clipboard.clone();
        let result = tokio::task::spawn_blocking(move || clipboard.copy(&text))
            .await
            .map_err(|e| ClipboardError::Unavailable(format!("copy task failed: {}", e)))?;

        if let Err(e) = result {
            warn!("copy of {:?} failed", target);
            return Err(e);
        }

        self.view.show_copy_confirmation(target, true);
        let view = self.view.clone();
        tokio::spawn(async move {
            tokio::time::sleep(COPY_CONFIRMATION).await;
            view.show_copy_confirmation(target, false);
        });
        Ok(())
    }
}
