//! pwgen: terminal front end for the remote password generator.
//!
//! Loads remembered settings, applies command-line overrides, asks the
//! generator for a credential and reveals it in place on the terminal.

mod cli;

use std::error::Error;
use std::io::{self, Write};
use std::sync::Arc;

use clap::Parser;
use tracing::{debug, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use pwgen_client::app::{CopyTarget, PwgenApp, PwgenView};
use pwgen_client::database::connection::Database;
use pwgen_client::managers::cookie_jar::SqliteCookieJar;
use pwgen_client::services::clipboard_transfer::ClipboardTransfer;
use pwgen_client::services::display::DisplaySurface;
use pwgen_client::services::generation_client::GenerationClient;
use pwgen_client::services::reveal_animator::{RevealAnimator, MAX_REVEAL_DELAY};
use pwgen_client::services::settings_store::SettingsStore;
use pwgen_client::types::config::ClientConfig;
use pwgen_client::types::generation::GenerationResult;

use cli::Cli;

/// Rewrites the current terminal line on every render.
struct TerminalDisplay;

impl DisplaySurface for TerminalDisplay {
    fn render(&self, text: &str) {
        let mut out = io::stdout().lock();
        let _ = write!(out, "\r{}", text);
        let _ = out.flush();
    }
}

struct TerminalView;

impl PwgenView for TerminalView {
    fn set_loading(&self, loading: bool) {
        debug!(loading, "loading indicator");
    }

    fn show_batch(&self, credentials: &[String]) {
        let mut out = io::stdout().lock();
        for (slot, credential) in credentials.iter().enumerate() {
            let _ = writeln!(out, "{}: {}", slot, credential);
        }
    }

    fn show_copy_confirmation(&self, target: CopyTarget, shown: bool) {
        if shown {
            match target {
                CopyTarget::Primary => eprintln!("copied!"),
                CopyTarget::Batch(slot) => eprintln!("copied slot {}!", slot),
            }
        }
    }
}

fn log_level(verbose: u8) -> Level {
    match verbose {
        0 => match std::env::var("PWGEN_LOG")
            .unwrap_or_else(|_| "warn".to_string())
            .to_lowercase()
            .as_str()
        {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "error" => Level::ERROR,
            _ => Level::WARN,
        },
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level(cli.verbose))
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = ClientConfig::from_env();
    if let Some(base_path) = &cli.base_path {
        config.base_path = base_path.clone();
    }
    if let Some(secs) = cli.timeout {
        config.request_timeout = std::time::Duration::from_secs(secs);
    }
    info!(endpoint = %config.generate_url(), db = %config.database_path.display(), "starting");

    let db = Database::open(&config.database_path)?;
    let store = SettingsStore::new(Box::new(SqliteCookieJar::new(db)));
    let client = GenerationClient::from_config(&config)?;
    let animator = RevealAnimator::new(Arc::new(TerminalDisplay));
    let app = PwgenApp::new(
        store,
        client,
        animator,
        ClipboardTransfer::system(),
        Arc::new(TerminalView),
    );

    app.startup();
    if cli.save {
        app.set_persistence(true)?;
    } else if cli.forget {
        app.set_persistence(false)?;
    }

    let mut settings = app.settings();
    cli.apply(&mut settings);

    match app.edit(settings).await?? {
        GenerationResult::Single { .. } => {
            // Every reveal tick is due before this sleep ends.
            tokio::time::sleep(MAX_REVEAL_DELAY).await;
            println!();
            if let Some(slot) = cli.copy_slot {
                warn!(slot, "--copy-slot ignored: the generator returned a single credential");
            }
            if cli.copy {
                app.copy(CopyTarget::Primary).await?;
            }
        }
        GenerationResult::Batch { .. } => {
            if let Some(slot) = cli.copy_slot {
                app.copy(CopyTarget::Batch(slot)).await?;
            } else if cli.copy {
                app.copy(CopyTarget::Batch(0)).await?;
            }
        }
    }

    Ok(())
}
