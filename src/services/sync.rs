//! Sync driver: fetch each mod, reconcile its language files with the mirror
//! and record what happened.
//!
//! Every language file goes through the same state machine:
//!
//! ```text
//! no stored copy                       -> Added   (diffed against `{}`)
//! stored copy, same MD5                -> Unchanged
//! stored copy, empty diff              -> Unchanged
//! target file with a source file:
//!     merged text, empty diff          -> MergedUnchanged
//!     merged text, non-empty diff      -> MergedUpdated (Added on first sync)
//! anything else                        -> Updated
//! ```
//!
//! Only `Added`, `Updated` and `MergedUpdated` write to the mirror and
//! produce a change log entry. A failure while processing one mod is logged
//! and recorded; the run moves on to the next mod.

use crate::models::{ChangeAction, ChangeLogEntry, ModList, SyncSettings, TranslationRecord};
use crate::services::archive::{LocaleFiles, extract_locale_files};
use crate::services::diff::render_diff;
use crate::services::fetch::ModSource;
use crate::services::merge::{effective_target, merge, select_translations};
use crate::services::quality::{QualityIssue, analyze};
use crate::services::report::{ModReport, render_summary, update_history};
use crate::services::resource::{FormatError, ResourceMap, decode};
use crate::services::store::ModStore;
use crate::state::RunState;
use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use std::fs;

/// Baseline a language file is diffed against on its first sync
pub const EMPTY_RESOURCE: &str = "{}";

/// Terminal state of one language file in one run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceState {
    Unchanged,
    Added,
    Updated,
    MergedUnchanged,
    MergedUpdated,
}

impl ResourceState {
    /// Whether the mirror copy was replaced
    pub fn is_written(self) -> bool {
        matches!(
            self,
            ResourceState::Added | ResourceState::Updated | ResourceState::MergedUpdated
        )
    }
}

/// One language file to reconcile
#[derive(Debug, Clone, Copy)]
pub struct ResourceInput<'a> {
    pub file_name: &'a str,
    /// Bytes found in the archive
    pub fetched: &'a [u8],
    /// Bytes currently in the mirror
    pub stored: Option<&'a [u8]>,
    /// Merged target text, for a target file paired with its source file
    pub merged: Option<&'a str>,
}

/// What to do with one language file
#[derive(Debug, Clone, PartialEq)]
pub struct ResourcePlan {
    pub state: ResourceState,
    /// New mirror content, `None` when nothing is written
    pub content: Option<Vec<u8>>,
    pub entry: Option<ChangeLogEntry>,
}

impl ResourcePlan {
    fn untouched(state: ResourceState) -> Self {
        Self {
            state,
            content: None,
            entry: None,
        }
    }
}

/// Hex MD5 of a file's bytes
pub fn content_hash(bytes: &[u8]) -> String {
    format!("{:x}", md5::compute(bytes))
}

/// Decide what happens to one language file.
///
/// Pure: the caller performs the write. Fails only when the fetched bytes
/// are not UTF-8.
pub fn reconcile_resource(
    input: &ResourceInput<'_>,
    now: DateTime<Local>,
) -> Result<ResourcePlan, FormatError> {
    let new_text = decode(input.fetched)?;

    let (action, baseline) = match input.stored {
        Some(old) => {
            if content_hash(old) == content_hash(input.fetched) {
                return Ok(ResourcePlan::untouched(ResourceState::Unchanged));
            }
            (ChangeAction::Updated, String::from_utf8_lossy(old).into_owned())
        }
        None => (ChangeAction::Added, EMPTY_RESOURCE.to_string()),
    };

    let raw_diff = render_diff(&baseline, new_text);
    if raw_diff.trim().is_empty() {
        return Ok(ResourcePlan::untouched(ResourceState::Unchanged));
    }

    let (state, content, diff) = match input.merged {
        Some(merged) => {
            let diff = render_diff(&baseline, merged);
            if diff.trim().is_empty() {
                return Ok(ResourcePlan::untouched(ResourceState::MergedUnchanged));
            }
            let state = match action {
                ChangeAction::Added => ResourceState::Added,
                ChangeAction::Updated => ResourceState::MergedUpdated,
            };
            (state, merged.as_bytes().to_vec(), diff)
        }
        None => {
            let state = match action {
                ChangeAction::Added => ResourceState::Added,
                ChangeAction::Updated => ResourceState::Updated,
            };
            (state, input.fetched.to_vec(), raw_diff)
        }
    };

    Ok(ResourcePlan {
        state,
        content: Some(content),
        entry: Some(ChangeLogEntry {
            file_name: input.file_name.to_string(),
            action,
            timestamp: now,
            diff,
        }),
    })
}

/// Merged target text plus the translation figures computed on the way
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedMerge {
    pub text: String,
    pub record: TranslationRecord,
    pub issues: Vec<QualityIssue>,
}

/// Parse both language files, merge them and score the result.
///
/// The fetched files must parse; a stored copy that does not is ignored
/// with a warning.
pub fn prepare_merge(
    source_bytes: &[u8],
    fetched_target: Option<&[u8]>,
    stored_target: Option<&[u8]>,
    stored_source: Option<&[u8]>,
    now: DateTime<Local>,
) -> Result<PreparedMerge, FormatError> {
    let source_text = decode(source_bytes)?;
    let source_map = ResourceMap::parse(source_text)?;
    let fetched_target = fetched_target.map(ResourceMap::from_bytes).transpose()?;
    let stored_target = stored_target.and_then(parse_stored);
    let previous_source = stored_source.and_then(parse_stored);

    let translations = select_translations(
        &source_map,
        fetched_target.as_ref(),
        stored_target.as_ref(),
        previous_source.as_ref(),
    );
    let text = merge(source_text, translations.as_ref());

    let target_map = effective_target(&source_map, translations.as_ref());
    let quality = analyze(&source_map, &target_map);

    Ok(PreparedMerge {
        text,
        record: TranslationRecord {
            total_strings: source_map.len(),
            translated_strings: target_map.translations_against(&source_map).len(),
            quality_score: quality.score,
            last_updated: Some(now),
        },
        issues: quality.issues,
    })
}

fn parse_stored(bytes: &[u8]) -> Option<ResourceMap> {
    ResourceMap::from_bytes(bytes)
        .map_err(|e| tracing::warn!("Ignoring unreadable stored language file: {}", e))
        .ok()
}

/// Result of syncing one mod
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModOutcome {
    pub record: TranslationRecord,
    pub issues: Vec<QualityIssue>,
    /// Language files in processing order with their final state
    pub resources: Vec<(String, ResourceState)>,
    /// Latest first
    pub entries: Vec<ChangeLogEntry>,
}

impl ModOutcome {
    /// True when at least one language file was written
    pub fn updated(&self) -> bool {
        !self.entries.is_empty()
    }
}

/// Runs the sync for every configured mod
pub struct SyncService<'a, S: ModSource> {
    source: &'a S,
    store: &'a ModStore,
    settings: &'a SyncSettings,
}

impl<'a, S: ModSource> SyncService<'a, S> {
    pub fn new(source: &'a S, store: &'a ModStore, settings: &'a SyncSettings) -> Self {
        Self {
            source,
            store,
            settings,
        }
    }

    /// Process every mod in order.
    pub fn run(&self, mods: &ModList) -> RunState {
        tracing::info!("Checking {} mod(s)", mods.len());
        mods.iter().fold(RunState::new(), |state, (name, project_id)| {
            self.process_mod(state, name, project_id)
        })
    }

    /// Process one mod and fold the outcome into `state`.
    ///
    /// Never fails: errors are logged and the mod is recorded as failed.
    pub fn process_mod(&self, state: RunState, mod_name: &str, project_id: &str) -> RunState {
        tracing::info!("Processing: {} ({})", mod_name, project_id);

        match self.sync_mod(mod_name, project_id) {
            Ok(outcome) => {
                tracing::info!(
                    "Checked {}: {} change(s), progress {:.1}%, quality {:.1}%",
                    mod_name,
                    outcome.entries.len(),
                    outcome.record.progress(),
                    outcome.record.quality_score
                );
                state.record_processed(mod_name, outcome.updated(), &outcome.record, Local::now())
            }
            Err(e) => {
                tracing::error!("Failed to process {}: {:#}", mod_name, e);
                state.record_failure(mod_name, Local::now())
            }
        }
    }

    /// Fetch the newest release of a mod and sync its language files.
    pub fn sync_mod(&self, mod_name: &str, project_id: &str) -> Result<ModOutcome> {
        let archive = self
            .source
            .fetch_latest(project_id)
            .with_context(|| format!("Failed to fetch {}", project_id))?;
        tracing::debug!(
            "Fetched {} ({} bytes)",
            archive.file_name,
            archive.bytes.len()
        );

        let files = extract_locale_files(
            &archive.bytes,
            &self.settings.source_file(),
            &self.settings.target_file(),
        )
        .with_context(|| format!("Failed to read {}", archive.file_name))?;

        self.sync_files(mod_name, &files)
    }

    /// Reconcile the language files of one archive with the mirror and
    /// update the mod's history.
    pub fn sync_files(&self, mod_name: &str, files: &LocaleFiles) -> Result<ModOutcome> {
        let now = Local::now();
        let source_file = self.settings.source_file();
        let target_file = self.settings.target_file();

        let mut outcome = ModOutcome::default();
        if files.is_empty() {
            tracing::warn!(
                "No {} or {} found in the archive of {}",
                source_file,
                target_file,
                mod_name
            );
            return Ok(outcome);
        }

        let stored_source = self.store.read_resource(mod_name, &source_file)?;
        let stored_target = self.store.read_resource(mod_name, &target_file)?;

        if let Some(fetched) = &files.source {
            let input = ResourceInput {
                file_name: &source_file,
                fetched,
                stored: stored_source.as_deref(),
                merged: None,
            };
            self.apply(mod_name, &input, now, &mut outcome)?;
        }

        // Without a shipped translation the source file stands in for it.
        if let Some(candidate) = files.target.as_ref().or(files.source.as_ref()) {
            let prepared = match &files.source {
                Some(source_bytes) => match prepare_merge(
                    source_bytes,
                    files.target.as_deref(),
                    stored_target.as_deref(),
                    stored_source.as_deref(),
                    now,
                ) {
                    Ok(prepared) => Some(prepared),
                    Err(e) => {
                        tracing::error!("Failed to merge {} of {}: {}", target_file, mod_name, e);
                        None
                    }
                },
                None => None,
            };

            let merge_failed = files.source.is_some() && prepared.is_none();
            if !merge_failed {
                if let Some(prepared) = &prepared {
                    outcome.record = prepared.record.clone();
                    outcome.issues = prepared.issues.clone();
                }
                let input = ResourceInput {
                    file_name: &target_file,
                    fetched: candidate,
                    stored: stored_target.as_deref(),
                    merged: prepared.as_ref().map(|p| p.text.as_str()),
                };
                self.apply(mod_name, &input, now, &mut outcome)?;
            }
        }

        if outcome.updated() {
            self.write_history(mod_name, &outcome)?;
        }

        Ok(outcome)
    }

    fn apply(
        &self,
        mod_name: &str,
        input: &ResourceInput<'_>,
        now: DateTime<Local>,
        outcome: &mut ModOutcome,
    ) -> Result<()> {
        let plan = match reconcile_resource(input, now) {
            Ok(plan) => plan,
            Err(e) => {
                tracing::error!("Skipping {} of {}: {}", input.file_name, mod_name, e);
                return Ok(());
            }
        };

        tracing::debug!("{} {}: {:?}", mod_name, input.file_name, plan.state);
        if let Some(content) = &plan.content {
            self.store
                .write_resource(mod_name, input.file_name, content)?;
        }
        if let Some(entry) = plan.entry {
            outcome.entries.insert(0, entry);
        }
        outcome
            .resources
            .push((input.file_name.to_string(), plan.state));
        Ok(())
    }

    fn write_history(&self, mod_name: &str, outcome: &ModOutcome) -> Result<()> {
        let section = ModReport {
            record: &outcome.record,
            issues: &outcome.issues,
            entries: &outcome.entries,
        }
        .render_section();

        let existing = self.store.read_report(mod_name)?;
        let history = update_history(
            existing.as_deref(),
            mod_name,
            &section,
            self.settings.history_limit,
        );
        self.store.write_report(mod_name, &history)?;
        tracing::info!("Updated history of {}", mod_name);
        Ok(())
    }

    /// Rewrite the summary document if any mod changed.
    ///
    /// Returns whether the file was written.
    pub fn write_summary(&self, state: &RunState) -> Result<bool> {
        let path = &self.settings.summary_path;
        if !state.any_changed() {
            tracing::info!("No changes detected, {} left untouched", path);
            return Ok(false);
        }

        fs::write(path, render_summary(state, Local::now()))
            .with_context(|| format!("Failed to write summary: {}", path))?;
        tracing::info!("Summary written to {}", path);
        Ok(true)
    }
}
