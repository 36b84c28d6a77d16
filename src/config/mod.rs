use crate::models::{ModList, SyncSettings};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use std::io;
use thiserror::Error;

/// File listing the tracked mods (`"Display Name": "project-id"`)
pub const MOD_LIST_FILE: &str = "mods.json";

/// Optional settings file
pub const SETTINGS_FILE: &str = "langsync.yaml";

/// Errors that can occur while loading or saving configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Mod list not found: {0}")]
    MissingModList(Utf8PathBuf),

    #[error("Failed to read {path}: {source}")]
    Read {
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid mod list {path}: {source}")]
    ModList {
        path: Utf8PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid settings {path}: {source}")]
    Settings {
        path: Utf8PathBuf,
        #[source]
        source: serde_yaml_ng::Error,
    },
}

/// Configuration manager for the mod list and the sync settings.
///
/// Both files live in one directory:
/// - `mods.json`: tracked mods, required
/// - `langsync.yaml`: paths, locales and endpoints, created with defaults
///
/// Relative paths in the settings are resolved against that directory.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_dir: Utf8PathBuf,
    mod_list_path: Utf8PathBuf,
    settings_path: Utf8PathBuf,
}

impl ConfigManager {
    /// Create a new ConfigManager for the specified directory.
    pub fn new<P: AsRef<Utf8Path>>(config_dir: P) -> Self {
        let config_dir = config_dir.as_ref().to_path_buf();
        Self {
            mod_list_path: config_dir.join(MOD_LIST_FILE),
            settings_path: config_dir.join(SETTINGS_FILE),
            config_dir,
        }
    }

    /// Load the list of tracked mods, in file order.
    pub fn load_mod_list(&self) -> Result<ModList, ConfigError> {
        if !self.mod_list_path.exists() {
            return Err(ConfigError::MissingModList(self.mod_list_path.clone()));
        }

        let file_contents = read(&self.mod_list_path)?;
        let mods: ModList =
            serde_json::from_str(&file_contents).map_err(|source| ConfigError::ModList {
                path: self.mod_list_path.clone(),
                source,
            })?;

        tracing::info!(
            "Loaded {} mod(s) from {}",
            mods.len(),
            self.mod_list_path
        );
        Ok(mods)
    }

    /// Load the sync settings.
    ///
    /// A missing settings file is created with the defaults so they can be
    /// edited for the next run.
    pub fn load_settings(&self) -> Result<SyncSettings, ConfigError> {
        let settings = if self.settings_path.exists() {
            let file_contents = read(&self.settings_path)?;
            let settings: SyncSettings =
                serde_yaml_ng::from_str(&file_contents).map_err(|source| {
                    ConfigError::Settings {
                        path: self.settings_path.clone(),
                        source,
                    }
                })?;
            tracing::info!("Loaded settings from {}", self.settings_path);
            settings
        } else {
            tracing::warn!(
                "Settings file not found at {}, using defaults",
                self.settings_path
            );
            let settings = SyncSettings::default();
            self.save_settings(&settings)?;
            settings
        };

        Ok(self.resolve_paths(settings))
    }

    /// Save the sync settings.
    pub fn save_settings(&self, settings: &SyncSettings) -> Result<(), ConfigError> {
        let yaml_string =
            serde_yaml_ng::to_string(settings).map_err(|source| ConfigError::Settings {
                path: self.settings_path.clone(),
                source,
            })?;

        fs::write(&self.settings_path, yaml_string).map_err(|source| ConfigError::Write {
            path: self.settings_path.clone(),
            source,
        })?;

        tracing::info!("Saved settings to {}", self.settings_path);
        Ok(())
    }

    fn resolve_paths(&self, mut settings: SyncSettings) -> SyncSettings {
        for path in [
            &mut settings.output_dir,
            &mut settings.backup_dir,
            &mut settings.summary_path,
        ] {
            if path.is_relative() {
                *path = self.config_dir.join(&*path);
            }
        }
        settings
    }

    pub fn config_dir(&self) -> &Utf8Path {
        &self.config_dir
    }

    pub fn mod_list_path(&self) -> &Utf8Path {
        &self.mod_list_path
    }

    pub fn settings_path(&self) -> &Utf8Path {
        &self.settings_path
    }
}

fn read(path: &Utf8Path) -> Result<String, ConfigError> {
    fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_config_manager() -> (ConfigManager, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let config_path = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
        let manager = ConfigManager::new(&config_path);
        (manager, temp_dir)
    }

    #[test]
    fn test_missing_mod_list() {
        let (manager, _temp_dir) = create_test_config_manager();
        let err = manager.load_mod_list().unwrap_err();
        assert!(matches!(err, ConfigError::MissingModList(_)));
    }

    #[test]
    fn test_invalid_mod_list() {
        let (manager, _temp_dir) = create_test_config_manager();
        fs::write(manager.mod_list_path(), r#"{"Create": 5}"#).unwrap();

        let err = manager.load_mod_list().unwrap_err();
        assert!(matches!(err, ConfigError::ModList { .. }));
    }

    #[test]
    fn test_load_mod_list() {
        let (manager, _temp_dir) = create_test_config_manager();
        fs::write(
            manager.mod_list_path(),
            r#"{"Sodium": "AANobbMI", "Create": "LNytGWDc"}"#,
        )
        .unwrap();

        let mods = manager.load_mod_list().unwrap();
        let names: Vec<&str> = mods.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["Sodium", "Create"]);
    }

    #[test]
    fn test_default_settings_are_written() {
        let (manager, _temp_dir) = create_test_config_manager();
        assert!(!manager.settings_path().exists());

        let settings = manager.load_settings().unwrap();
        assert!(manager.settings_path().exists());
        assert_eq!(settings.output_dir, manager.config_dir().join("mods_langs"));
        assert_eq!(settings.target_locale, "pt_br");
    }

    #[test]
    fn test_load_save_settings() {
        let (manager, _temp_dir) = create_test_config_manager();

        let settings = SyncSettings {
            target_locale: "es_es".to_string(),
            history_limit: Some(3),
            ..SyncSettings::default()
        };
        manager.save_settings(&settings).unwrap();

        let loaded = manager.load_settings().unwrap();
        assert_eq!(loaded.target_locale, "es_es");
        assert_eq!(loaded.history_limit, Some(3));
        assert_eq!(loaded.summary_path, manager.config_dir().join("README.md"));
    }

    #[test]
    fn test_invalid_settings() {
        let (manager, _temp_dir) = create_test_config_manager();
        fs::write(manager.settings_path(), "backup_retention: many\n").unwrap();

        let err = manager.load_settings().unwrap_err();
        assert!(matches!(err, ConfigError::Settings { .. }));
    }
}
