//! Data models for langsync.
//!
//! - [`ModList`] and [`SyncSettings`]: configuration loaded by
//!   [`ConfigManager`](crate::config::ConfigManager)
//! - [`TranslationRecord`], [`ChangeLogEntry`], [`StatusRow`]: per-run
//!   records built by the sync driver and rendered into the reports
//!
//! None of the records is persisted as structured data; the only thing that
//! survives a run is the Markdown rendered from them.

pub mod config;
pub mod records;

pub use config::{ModList, SyncSettings};
pub use records::{
    ChangeAction, ChangeLogEntry, DATE_FORMAT, ModStatus, StatusRow, TIMESTAMP_FORMAT,
    TranslationRecord,
};
