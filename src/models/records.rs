use chrono::{DateTime, Local};
use std::fmt;

/// Timestamp format used in change logs and reports
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Date format used in the status table
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Translation progress of one mod, recomputed on every run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TranslationRecord {
    /// Keys in the source language file
    pub total_strings: usize,

    /// Source keys whose target value differs from the source value
    pub translated_strings: usize,

    /// 0-100, see [`crate::services::quality::analyze`]
    pub quality_score: f64,

    pub last_updated: Option<DateTime<Local>>,
}

impl TranslationRecord {
    /// Percentage of translated strings
    pub fn progress(&self) -> f64 {
        if self.total_strings == 0 {
            return 0.0;
        }
        self.translated_strings as f64 / self.total_strings as f64 * 100.0
    }
}

/// What happened to a language file in the mirror
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeAction {
    Added,
    Updated,
}

impl fmt::Display for ChangeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeAction::Added => write!(f, "added"),
            ChangeAction::Updated => write!(f, "updated"),
        }
    }
}

/// One language file update in a mod's history
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeLogEntry {
    pub file_name: String,
    pub action: ChangeAction,
    pub timestamp: DateTime<Local>,
    /// Rendered diff blocks (or the diff error sentinel)
    pub diff: String,
}

impl ChangeLogEntry {
    pub fn render(&self) -> String {
        format!(
            "## {} {} on {}\n\n{}",
            self.file_name,
            self.action,
            self.timestamp.format(TIMESTAMP_FORMAT),
            self.diff
        )
    }
}

/// State of a mod after a run, as shown in the status table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModStatus {
    Updated,
    Unchanged,
    Failed,
}

impl ModStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ModStatus::Updated => "🟢 Updated",
            ModStatus::Unchanged => "⚪ Unchanged",
            ModStatus::Failed => "🔴 Failed",
        }
    }
}

/// Row of the global status table
#[derive(Debug, Clone, PartialEq)]
pub struct StatusRow {
    pub status: ModStatus,
    pub checked_at: DateTime<Local>,
    pub progress: f64,
    pub quality: f64,
}

impl StatusRow {
    pub fn render(&self, mod_name: &str) -> String {
        format!(
            "| **{}** | {} | {} | {:.1}% | {:.1}% |",
            mod_name,
            self.status.label(),
            self.checked_at.format(DATE_FORMAT),
            self.progress,
            self.quality
        )
    }
}
