use crate::services::resource::ResourceMap;
use std::fmt;

/// Placeholder that must survive translation.
pub const PLACEHOLDER_MARKER: &str = "%s";

/// Score deducted for every string left in the source language
pub const UNTRANSLATED_PENALTY: f64 = 2.0;

/// Score deducted for every translation that dropped a placeholder
pub const FORMATTING_PENALTY: f64 = 5.0;

const MAX_SCORE: f64 = 100.0;

/// A problem found in a translated language file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QualityIssue {
    /// Target value is identical to the source value
    Untranslated(String),

    /// Source value has a `%s` placeholder the target value lacks
    FormattingError(String),
}

impl QualityIssue {
    pub fn key(&self) -> &str {
        match self {
            QualityIssue::Untranslated(key) | QualityIssue::FormattingError(key) => key,
        }
    }

    pub fn penalty(&self) -> f64 {
        match self {
            QualityIssue::Untranslated(_) => UNTRANSLATED_PENALTY,
            QualityIssue::FormattingError(_) => FORMATTING_PENALTY,
        }
    }
}

impl fmt::Display for QualityIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QualityIssue::Untranslated(key) => write!(f, "untranslated string: `{key}`"),
            QualityIssue::FormattingError(key) => write!(f, "formatting error: `{key}`"),
        }
    }
}

/// Outcome of [`analyze`]
#[derive(Debug, Clone, PartialEq)]
pub struct QualityReport {
    /// 0-100, 100 meaning no issue was found
    pub score: f64,
    pub issues: Vec<QualityIssue>,
}

/// Score a translation against its source language file.
///
/// Both checks walk the target map in its own order; every untranslated
/// issue is listed before the first formatting issue.
pub fn analyze(source: &ResourceMap, target: &ResourceMap) -> QualityReport {
    let untranslated = target
        .iter()
        .filter(|(key, value)| source.get(key) == Some(*value))
        .map(|(key, _)| QualityIssue::Untranslated(key.to_string()));

    let formatting = target
        .iter()
        .filter(|(key, value)| {
            source
                .get(key)
                .is_some_and(|original| original.contains(PLACEHOLDER_MARKER))
                && !value.contains(PLACEHOLDER_MARKER)
        })
        .map(|(key, _)| QualityIssue::FormattingError(key.to_string()));

    let issues: Vec<QualityIssue> = untranslated.chain(formatting).collect();
    let penalty: f64 = issues.iter().map(QualityIssue::penalty).sum();

    QualityReport {
        score: (MAX_SCORE - penalty).max(0.0),
        issues,
    }
}
