//! Integration tests for ConfigManager and configuration file handling
//!
//! These tests verify:
//! - Mod list loading and its failure modes
//! - Default settings generation
//! - Partial settings files
//! - Path resolution against the configuration directory

use camino::Utf8PathBuf;
use langsync::{ConfigError, ConfigManager, SyncSettings};
use std::fs;
use tempfile::TempDir;

fn create_test_config_dir() -> (TempDir, Utf8PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let config_path = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
    (temp_dir, config_path)
}

#[test]
fn test_create_config_manager() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let manager = ConfigManager::new(&config_path);

    assert_eq!(manager.config_dir(), &config_path);
    assert_eq!(manager.mod_list_path(), config_path.join("mods.json"));
    assert_eq!(manager.settings_path(), config_path.join("langsync.yaml"));
}

#[test]
fn test_mod_list_is_required() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let manager = ConfigManager::new(&config_path);

    let err = manager.load_mod_list().unwrap_err();
    assert!(matches!(err, ConfigError::MissingModList(ref path) if path.ends_with("mods.json")));
    assert!(err.to_string().contains("mods.json"));
}

#[test]
fn test_malformed_mod_list() {
    let (_temp_dir, config_path) = create_test_config_dir();
    fs::write(config_path.join("mods.json"), "{ not json").unwrap();

    let manager = ConfigManager::new(&config_path);
    assert!(matches!(
        manager.load_mod_list(),
        Err(ConfigError::ModList { .. })
    ));
}

#[test]
fn test_mod_list_order_and_ids() {
    let (_temp_dir, config_path) = create_test_config_dir();
    fs::write(
        config_path.join("mods.json"),
        r#"{
            "Farmer's Delight": "R2OftAxM",
            "Create": "LNytGWDc",
            "Applied Energistics 2": "XxWD5pD3"
        }"#,
    )
    .unwrap();

    let mods = ConfigManager::new(&config_path).load_mod_list().unwrap();
    let entries: Vec<(&str, &str)> = mods.iter().collect();
    assert_eq!(
        entries,
        vec![
            ("Farmer's Delight", "R2OftAxM"),
            ("Create", "LNytGWDc"),
            ("Applied Energistics 2", "XxWD5pD3"),
        ]
    );
}

#[test]
fn test_empty_mod_list() {
    let (_temp_dir, config_path) = create_test_config_dir();
    fs::write(config_path.join("mods.json"), "{}").unwrap();

    let mods = ConfigManager::new(&config_path).load_mod_list().unwrap();
    assert!(mods.is_empty());
}

#[test]
fn test_default_settings_file_round_trip() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let manager = ConfigManager::new(&config_path);

    let first = manager.load_settings().unwrap();
    let written = fs::read_to_string(manager.settings_path()).unwrap();
    assert!(written.contains("output_dir: mods_langs"));
    assert!(written.contains("source_locale: en_us"));

    // Second load reads the file written by the first
    let second = manager.load_settings().unwrap();
    assert_eq!(first, second);
    assert_eq!(second.backup_retention, 5);
    assert_eq!(second.history_limit, None);
    assert_eq!(second.source_file(), "en_us.json");
    assert_eq!(second.target_file(), "pt_br.json");
}

#[test]
fn test_partial_settings_file() {
    let (_temp_dir, config_path) = create_test_config_dir();
    fs::write(
        config_path.join("langsync.yaml"),
        "target_locale: de_de\nhistory_limit: 10\n",
    )
    .unwrap();

    let settings = ConfigManager::new(&config_path).load_settings().unwrap();
    let defaults = SyncSettings::default();

    assert_eq!(settings.target_locale, "de_de");
    assert_eq!(settings.history_limit, Some(10));
    assert_eq!(settings.source_locale, defaults.source_locale);
    assert_eq!(settings.api_base, defaults.api_base);
    assert_eq!(settings.backup_dir, config_path.join("backups"));
}

#[test]
fn test_absolute_paths_are_kept() {
    let (temp_dir, config_path) = create_test_config_dir();
    let elsewhere = Utf8PathBuf::try_from(temp_dir.path().join("elsewhere")).unwrap();
    fs::write(
        config_path.join("langsync.yaml"),
        format!("output_dir: {}\n", elsewhere),
    )
    .unwrap();

    let settings = ConfigManager::new(&config_path).load_settings().unwrap();
    assert_eq!(settings.output_dir, elsewhere);
}
