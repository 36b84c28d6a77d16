//! Markdown reports: the per-mod history and the global status summary.
//!
//! A mod's history file is an append-only log of run sections, newest
//! first. Each section starts with [`RUN_MARKER`] so older sections can be
//! found again (and capped by `history_limit`) without parsing Markdown.

use crate::models::{ChangeLogEntry, TIMESTAMP_FORMAT, TranslationRecord};
use crate::services::quality::QualityIssue;
use crate::state::RunState;
use chrono::{DateTime, Local};
use std::fmt::Write;

/// Line that opens every run section of a mod history
pub const RUN_MARKER: &str = "<!-- langsync:run -->";

/// What one run changed for one mod
#[derive(Debug, Clone, PartialEq)]
pub struct ModReport<'a> {
    pub record: &'a TranslationRecord,
    pub issues: &'a [QualityIssue],
    /// Latest first
    pub entries: &'a [ChangeLogEntry],
}

impl ModReport<'_> {
    /// Render the run section, marker included.
    pub fn render_section(&self) -> String {
        let last_updated = self
            .record
            .last_updated
            .map(|t| t.format(TIMESTAMP_FORMAT).to_string())
            .unwrap_or_else(|| "never".to_string());

        let mut out = String::new();
        let _ = writeln!(out, "{RUN_MARKER}");
        let _ = writeln!(out, "### Statistics\n");
        let _ = writeln!(out, "- Total strings: {}", self.record.total_strings);
        let _ = writeln!(
            out,
            "- Translated strings: {}",
            self.record.translated_strings
        );
        let _ = writeln!(out, "- Progress: {:.1}%", self.record.progress());
        let _ = writeln!(
            out,
            "- Translation quality: {:.1}%",
            self.record.quality_score
        );
        let _ = writeln!(out, "- Last updated: {last_updated}");

        let _ = write!(out, "\n### Change Log\n\n");
        let entries: Vec<String> = self.entries.iter().map(ChangeLogEntry::render).collect();
        out.push_str(&entries.join("\n\n"));
        out.push('\n');

        if !self.issues.is_empty() {
            let _ = write!(out, "\n### Issues Found\n\n");
            for issue in self.issues {
                let _ = writeln!(out, "- {issue}");
            }
        }

        out
    }
}

fn mod_header(mod_name: &str) -> String {
    format!("# Translation Files: {mod_name}\n")
}

/// Prepend a new run section to a mod history.
///
/// `existing` is the current history file, if any. Text written before run
/// markers existed is kept as a single legacy section. With a `history_limit`
/// only that many sections (the new one included) are kept.
pub fn update_history(
    existing: Option<&str>,
    mod_name: &str,
    section: &str,
    history_limit: Option<usize>,
) -> String {
    let mut sections = vec![section.trim_end().to_string()];
    if let Some(existing) = existing {
        sections.extend(previous_sections(existing, &mod_header(mod_name)));
    }
    if let Some(limit) = history_limit {
        sections.truncate(limit.max(1));
    }

    format!("{}\n{}\n", mod_header(mod_name), sections.join("\n\n"))
}

fn previous_sections(existing: &str, header: &str) -> Vec<String> {
    let body = existing.strip_prefix(header).unwrap_or(existing);

    if !body.contains(RUN_MARKER) {
        let legacy = body.trim();
        return if legacy.is_empty() {
            Vec::new()
        } else {
            vec![legacy.to_string()]
        };
    }

    body.split(RUN_MARKER)
        .skip(1)
        .map(|section| format!("{RUN_MARKER}\n{}", section.trim()))
        .collect()
}

/// Render the global status document.
pub fn render_summary(state: &RunState, now: DateTime<Local>) -> String {
    let stats = &state.stats;
    let last_check = stats.last_run.unwrap_or(now).format(TIMESTAMP_FORMAT);

    let mut out = String::new();
    let _ = writeln!(out, "# 🌐 Mod Translation Status\n");
    let _ = writeln!(
        out,
        "This repository mirrors the language files of the mods listed below. \
         Their status is checked automatically.\n"
    );
    let _ = writeln!(out, "### 📊 Global Statistics\n");
    let _ = writeln!(out, "- Mods processed: {}", stats.mods_processed);
    let _ = writeln!(out, "- Mods updated: {}", stats.mods_updated);
    let _ = writeln!(out, "- Mods failed: {}", stats.mods_failed);
    let _ = writeln!(out, "- Strings translated: {}", stats.strings_translated);
    let _ = writeln!(out, "- Last check: {last_check}\n");
    let _ = writeln!(out, "## 📜 Mods\n");
    let _ = writeln!(out, "| Mod | Status | Last Checked | Progress | Quality |");
    let _ = write!(out, "|-----|--------|--------------|----------|---------|");

    for (name, row) in state.rows() {
        let _ = write!(out, "\n{}", row.render(name));
    }
    out.push('\n');
    out
}
