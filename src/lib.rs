// langsync - keeps translated Minecraft mod language files in sync with
// upstream releases published on Modrinth.
//
// This is the library crate containing the sync pipeline and its data
// structures. The binary crate (main.rs) runs one sync pass.

pub mod config;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod services;
pub mod state;

// Re-export commonly used types for convenience
pub use config::{ConfigError, ConfigManager};
pub use metrics::GlobalStats;
pub use models::{ModList, SyncSettings, TranslationRecord};
pub use services::{ModStore, ModrinthClient, SyncService};
pub use state::RunState;

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
