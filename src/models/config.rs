use camino::Utf8PathBuf;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Mods to track, from mods.json
///
/// Maps the display name of a mod (also its folder name in the mirror) to its
/// Modrinth project id or slug. Order follows the file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModList {
    pub mods: IndexMap<String, String>,
}

impl ModList {
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.mods.iter().map(|(name, id)| (name.as_str(), id.as_str()))
    }

    pub fn len(&self) -> usize {
        self.mods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mods.is_empty()
    }
}

/// Settings from langsync.yaml
///
/// Every field is optional in the file; missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncSettings {
    /// Root of the local mirror (one folder per mod)
    pub output_dir: Utf8PathBuf,

    /// Where snapshots of `output_dir` are kept
    pub backup_dir: Utf8PathBuf,

    /// Global status document
    pub summary_path: Utf8PathBuf,

    pub api_base: String,
    pub user_agent: String,

    /// Upstream language, e.g. `en_us`
    pub source_locale: String,

    /// Maintained translation, e.g. `pt_br`
    pub target_locale: String,

    /// Number of snapshots kept in `backup_dir`
    pub backup_retention: usize,

    /// Number of run sections kept in each mod's history, `None` keeps all
    pub history_limit: Option<usize>,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            output_dir: Utf8PathBuf::from("mods_langs"),
            backup_dir: Utf8PathBuf::from("backups"),
            summary_path: Utf8PathBuf::from("README.md"),
            api_base: "https://api.modrinth.com/v2".to_string(),
            user_agent: format!("langsync/{}", env!("CARGO_PKG_VERSION")),
            source_locale: "en_us".to_string(),
            target_locale: "pt_br".to_string(),
            backup_retention: 5,
            history_limit: None,
        }
    }
}

impl SyncSettings {
    /// File name of the source language file, e.g. `en_us.json`
    pub fn source_file(&self) -> String {
        format!("{}.json", self.source_locale)
    }

    /// File name of the target language file, e.g. `pt_br.json`
    pub fn target_file(&self) -> String {
        format!("{}.json", self.target_locale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sync_settings_defaults() {
        let settings = SyncSettings::default();
        assert_eq!(settings.output_dir, Utf8PathBuf::from("mods_langs"));
        assert_eq!(settings.backup_retention, 5);
        assert_eq!(settings.source_file(), "en_us.json");
        assert_eq!(settings.target_file(), "pt_br.json");
        assert!(settings.history_limit.is_none());
    }

    #[test]
    fn test_partial_settings_use_defaults() {
        let settings: SyncSettings =
            serde_yaml_ng::from_str("target_locale: es_es\nbackup_retention: 2\n").unwrap();
        assert_eq!(settings.target_file(), "es_es.json");
        assert_eq!(settings.backup_retention, 2);
        assert_eq!(settings.source_locale, "en_us");
    }

    #[test]
    fn test_mod_list_keeps_file_order() {
        let list: ModList =
            serde_json::from_str(r#"{"Zeta": "zeta-id", "Alpha": "alpha-id"}"#).unwrap();
        let names: Vec<&str> = list.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["Zeta", "Alpha"]);
    }
}
