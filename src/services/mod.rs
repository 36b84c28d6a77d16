//! Services module - the sync pipeline, from release download to reports.
//!
//! Most services are pure functions over bytes and text; file and network
//! access is confined to [`fetch`], [`store`], [`backup`] and the driver in
//! [`sync`].
//!
//! # Components
//!
//! - [`resource`]: Order-preserving language file parsing and in-place value
//!   substitution
//! - [`quality`]: Translation scoring (untranslated strings, lost `%s`
//!   placeholders)
//! - [`diff`]: Line diff rendered as numbered `diff` code blocks
//! - [`merge`]: Rebuilds the target language file from a new source file
//! - [`fetch`]: [`ModSource`] trait and the Modrinth client
//! - [`archive`]: Finds the language files inside a mod jar
//! - [`store`]: Local mirror of synced language files and per-mod histories
//! - [`backup`]: Timestamped snapshots of the mirror
//! - [`report`]: Markdown for per-mod histories and the run summary
//! - [`sync`]: [`SyncService`], which ties all of the above together
//!
//! # Usage Example
//!
//! ```ignore
//! use langsync::services::{ModStore, ModrinthClient, SyncService};
//!
//! let client = ModrinthClient::new(&settings.api_base, &settings.user_agent)?;
//! let store = ModStore::new(&settings.output_dir)?;
//! let service = SyncService::new(&client, &store, &settings);
//!
//! let state = service.run(&mods);
//! service.write_summary(&state)?;
//! ```

pub mod archive;
pub mod backup;
pub mod diff;
pub mod fetch;
pub mod merge;
pub mod quality;
pub mod report;
pub mod resource;
pub mod store;
pub mod sync;

pub use archive::{ArchiveError, LocaleFiles, extract_locale_files};
pub use backup::{create_backup, prune_backups};
pub use diff::{DiffBlock, DiffError, apply_blocks, diff_blocks, render_blocks, render_diff};
pub use fetch::{FetchError, FetchedArchive, ModSource, ModrinthClient};
pub use merge::{effective_target, merge, select_translations};
pub use quality::{QualityIssue, QualityReport, analyze};
pub use report::{ModReport, render_summary, update_history};
pub use resource::{FormatError, ResourceMap, substitute_values};
pub use store::ModStore;
pub use sync::{
    ModOutcome, ResourceInput, ResourcePlan, ResourceState, SyncService, reconcile_resource,
};
