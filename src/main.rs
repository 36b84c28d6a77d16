//! langsync - one sync pass over the tracked mods.
//!
//! # Execution Flow
//!
//! 1. Initialize logging → logs/langsync.<date> plus console
//! 2. Load `langsync.yaml` (created with defaults when missing)
//! 3. Snapshot the mirror into the backup directory
//! 4. Load `mods.json`
//! 5. Fetch, reconcile and report every mod; failures are isolated per mod
//! 6. Rewrite the summary document when something changed
//!
//! Configuration is read from the working directory.

use anyhow::{Context, Result};
use camino::Utf8Path;
use chrono::Local;
use langsync::services::create_backup;
use langsync::{APP_NAME, ConfigManager, ModStore, ModrinthClient, SyncService, VERSION};

fn main() -> Result<()> {
    let _guard =
        langsync::logging::setup_logging_with_console(Utf8Path::new("logs"), APP_NAME, true)?;

    tracing::info!("Starting {} v{}", APP_NAME, VERSION);

    if let Err(e) = run() {
        tracing::error!("Sync aborted: {:#}", e);
        return Err(e);
    }

    tracing::info!("{} finished", APP_NAME);
    Ok(())
}

fn run() -> Result<()> {
    let config_manager = ConfigManager::new(".");
    let settings = config_manager
        .load_settings()
        .context("Failed to load settings")?;

    create_backup(
        &settings.output_dir,
        &settings.backup_dir,
        settings.backup_retention,
        Local::now(),
    )
    .context("Failed to back up the mirror")?;

    let mods = config_manager
        .load_mod_list()
        .context("Failed to load the mod list")?;

    let store = ModStore::new(&settings.output_dir)?;
    let client = ModrinthClient::new(&settings.api_base, &settings.user_agent)
        .context("Failed to create the HTTP client")?;

    let service = SyncService::new(&client, &store, &settings);
    let state = service.run(&mods);
    service.write_summary(&state)?;

    state.stats.log_summary();
    Ok(())
}
