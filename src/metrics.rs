// Run-wide counters
//
// Accumulated while mods are processed and logged when the run ends. Nothing
// here outlives the process; the summary report is the only record.

use chrono::{DateTime, Local};
use std::time::{Duration, Instant};

/// Counters for one invocation
#[derive(Debug, Clone)]
pub struct GlobalStats {
    /// Mods whose archive was fetched and inspected
    pub mods_processed: usize,

    /// Mods with at least one language file written
    pub mods_updated: usize,

    /// Mods skipped because of an error
    pub mods_failed: usize,

    /// Sum of translated strings over all processed mods
    pub strings_translated: usize,

    /// Time of the last processed mod
    pub last_run: Option<DateTime<Local>>,

    start_time: Instant,
}

impl GlobalStats {
    pub fn new() -> Self {
        Self {
            mods_processed: 0,
            mods_updated: 0,
            mods_failed: 0,
            strings_translated: 0,
            last_run: None,
            start_time: Instant::now(),
        }
    }

    /// Record a mod that went through the sync pipeline
    pub fn record_mod_processed(&mut self, updated: bool, translated: usize, at: DateTime<Local>) {
        self.mods_processed += 1;
        if updated {
            self.mods_updated += 1;
        }
        self.strings_translated += translated;
        self.last_run = Some(at);
    }

    /// Record a mod that could not be processed
    pub fn record_mod_failed(&mut self, at: DateTime<Local>) {
        self.mods_failed += 1;
        self.last_run = Some(at);
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Log metrics summary
    pub fn log_summary(&self) {
        tracing::info!("=== Run Summary ===");
        tracing::info!("Elapsed: {:.2}s", self.elapsed().as_secs_f64());
        tracing::info!(
            "Mods: {} processed, {} updated, {} failed",
            self.mods_processed,
            self.mods_updated,
            self.mods_failed
        );
        tracing::info!("Translated strings: {}", self.strings_translated);
    }
}

impl Default for GlobalStats {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_creation() {
        let stats = GlobalStats::new();
        assert_eq!(stats.mods_processed, 0);
        assert_eq!(stats.mods_updated, 0);
        assert!(stats.last_run.is_none());
    }

    #[test]
    fn test_record_mod_operations() {
        let mut stats = GlobalStats::new();
        let now = Local::now();

        stats.record_mod_processed(true, 10, now);
        stats.record_mod_processed(false, 5, now);
        stats.record_mod_failed(now);

        assert_eq!(stats.mods_processed, 2);
        assert_eq!(stats.mods_updated, 1);
        assert_eq!(stats.mods_failed, 1);
        assert_eq!(stats.strings_translated, 15);
        assert_eq!(stats.last_run, Some(now));
    }
}
