// Run state
//
// The accumulator the sync driver threads through every per-mod call: the
// status table shown in the summary report plus the run-wide counters.

use crate::metrics::GlobalStats;
use crate::models::{ModStatus, StatusRow, TranslationRecord};
use chrono::{DateTime, Local};
use std::collections::BTreeMap;

/// Everything a run has learned so far
///
/// Owned by the driver. Each per-mod call takes the state by value and
/// returns it updated, so processing a mod never touches shared globals.
#[derive(Debug, Clone, Default)]
pub struct RunState {
    /// One row per mod, ordered by mod name
    pub status_table: BTreeMap<String, StatusRow>,

    pub stats: GlobalStats,
}

impl RunState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a mod that was processed.
    pub fn record_processed(
        mut self,
        mod_name: &str,
        updated: bool,
        record: &TranslationRecord,
        at: DateTime<Local>,
    ) -> Self {
        let status = if updated {
            ModStatus::Updated
        } else {
            ModStatus::Unchanged
        };

        self.status_table.insert(
            mod_name.to_string(),
            StatusRow {
                status,
                checked_at: at,
                progress: record.progress(),
                quality: record.quality_score,
            },
        );
        self.stats
            .record_mod_processed(updated, record.translated_strings, at);
        self
    }

    /// Record a mod whose processing failed.
    pub fn record_failure(mut self, mod_name: &str, at: DateTime<Local>) -> Self {
        self.status_table.insert(
            mod_name.to_string(),
            StatusRow {
                status: ModStatus::Failed,
                checked_at: at,
                progress: 0.0,
                quality: 0.0,
            },
        );
        self.stats.record_mod_failed(at);
        self
    }

    /// True when at least one mod had a language file written.
    pub fn any_changed(&self) -> bool {
        self.stats.mods_updated > 0
    }

    /// Rows sorted by mod name
    pub fn rows(&self) -> impl Iterator<Item = (&str, &StatusRow)> {
        self.status_table
            .iter()
            .map(|(name, row)| (name.as_str(), row))
    }
}
