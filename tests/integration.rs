// SPDX-License-Identifier: MPL-2.0
use dossier_lens::config::{self, Config, InitialScale, ThemeMode};
use dossier_lens::i18n::fluent::I18n;
use dossier_lens::upload::ScanColor;
use tempfile::tempdir;

#[test]
fn test_language_change_via_config() {
    let dir = tempdir().expect("Failed to create temporary directory");
    let path = dir.path().join("settings.toml");

    let mut english = Config::default();
    english.general.language = Some("en-US".to_string());
    config::save_to_path(&english, &path).expect("Failed to write initial config file");
    let loaded = config::load_from_path(&path).expect("Failed to load initial config");
    assert_eq!(I18n::new(None, &loaded).current_locale().to_string(), "en-US");

    let mut russian = Config::default();
    russian.general.language = Some("ru".to_string());
    config::save_to_path(&russian, &path).expect("Failed to write russian config file");
    let loaded = config::load_from_path(&path).expect("Failed to load russian config");
    let i18n = I18n::new(None, &loaded);
    assert_eq!(i18n.current_locale().to_string(), "ru");
    assert_eq!(i18n.tr("upload-button"), "Загрузить");
}

#[test]
fn test_cli_language_overrides_config() {
    let mut config = Config::default();
    config.general.language = Some("ru".to_string());
    let i18n = I18n::new(Some("en-US".to_string()), &config);
    assert_eq!(i18n.current_locale().to_string(), "en-US");
}

#[test]
fn test_sectioned_config_round_trip() {
    let dir = tempdir().expect("Failed to create temporary directory");

    let mut config = Config::default();
    config.general.theme_mode = ThemeMode::Dark;
    config.service.base_url = "https://files.example/api".to_string();
    config
        .service
        .headers
        .insert("x-remote-user".to_string(), "clerk".to_string());
    config.service.request_timeout_secs = Some(30);
    config.viewer.initial_scale = InitialScale::FitPage;
    config.scanner.command = Some("scan-bridge".to_string());
    config.scanner.color = ScanColor::BlackWhite;
    config.scanner.dpi = 300;

    config::save_with_override(&config, Some(dir.path().to_path_buf()))
        .expect("Failed to save config");
    let (loaded, warning) = config::load_with_override(Some(dir.path().to_path_buf()));

    assert!(warning.is_none());
    assert_eq!(loaded, config);
}

#[test]
fn test_broken_config_falls_back_with_warning() {
    let dir = tempdir().expect("Failed to create temporary directory");
    std::fs::write(dir.path().join("settings.toml"), "[general\nlanguage = ")
        .expect("Failed to write broken config");

    let (loaded, warning) = config::load_with_override(Some(dir.path().to_path_buf()));

    assert_eq!(loaded, Config::default());
    assert_eq!(warning.as_deref(), Some("notification-config-load-error"));
}

#[test]
fn test_missing_config_uses_defaults_silently() {
    let dir = tempdir().expect("Failed to create temporary directory");
    let (loaded, warning) = config::load_with_override(Some(dir.path().to_path_buf()));
    assert_eq!(loaded, Config::default());
    assert!(warning.is_none());
}
