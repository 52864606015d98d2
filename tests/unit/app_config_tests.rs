/*!
 * Tests for configuration loading, validation and provider selection
 */

use std::str::FromStr;

use md_translate::app_config::{Config, LogLevel, TranslationProvider};

use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_shouldUseExpectedValues() {
    let config = Config::default();
    assert_eq!(config.from_lang, "en");
    assert_eq!(config.to_lang, "fr");
    assert_eq!(config.provider, TranslationProvider::Deepl);
    assert_eq!(config.processes, 1);
    assert!(!config.new_file);
    assert!(!config.drop_original);
    assert_eq!(config.log_level, LogLevel::Info);
}

/// Test validation demands an API key for DeepL
#[test]
fn test_validate_withDeeplAndNoKey_shouldFail() {
    let config = Config::default();
    assert!(config.validate().is_err());

    let with_key = Config {
        api_key: "key".to_string(),
        ..Config::default()
    };
    assert!(with_key.validate().is_ok());
}

/// Test the mock backend validates without an API key
#[test]
fn test_validate_withMockProvider_shouldNotNeedKey() {
    let config = Config {
        provider: TranslationProvider::Mock,
        ..Config::default()
    };
    assert!(config.validate().is_ok());
}

/// Test validation rejects identical source and target languages
#[test]
fn test_validate_withSameLanguages_shouldFail() {
    let config = Config {
        provider: TranslationProvider::Mock,
        from_lang: "en".to_string(),
        to_lang: "eng".to_string(),
        ..Config::default()
    };
    assert!(config.validate().is_err());
}

/// Test validation rejects unknown language codes
#[test]
fn test_validate_withUnknownLanguage_shouldFail() {
    let config = Config {
        provider: TranslationProvider::Mock,
        from_lang: "zz".to_string(),
        ..Config::default()
    };
    assert!(config.validate().is_err());
}

/// Test validation rejects a zero worker count
#[test]
fn test_validate_withZeroProcesses_shouldFail() {
    let config = Config {
        provider: TranslationProvider::Mock,
        processes: 0,
        ..Config::default()
    };
    assert!(config.validate().is_err());
}

/// Test JSON round-trip through save and load
#[test]
fn test_save_load_withCustomConfig_shouldRoundTrip() {
    let dir = common::create_temp_dir().unwrap();
    let path = dir.path().join("conf.json");

    let config = Config {
        provider: TranslationProvider::Libretranslate,
        from_lang: "de".to_string(),
        to_lang: "es".to_string(),
        processes: 4,
        drop_original: true,
        ..Config::default()
    };
    config.save(&path).unwrap();

    let loaded = Config::from_file(&path).unwrap();
    assert_eq!(loaded, config);
}

/// Test partial JSON relies on defaults for missing fields
#[test]
fn test_from_file_withMinimalJson_shouldApplyDefaults() {
    let dir = common::create_temp_dir().unwrap();
    let path = common::create_test_file(
        dir.path(),
        "conf.json",
        r#"{"from_lang": "en", "to_lang": "de"}"#,
    )
    .unwrap();

    let config = Config::from_file(&path).unwrap();
    assert_eq!(config.to_lang, "de");
    assert_eq!(config.provider, TranslationProvider::Deepl);
    assert_eq!(config.processes, 1);
    assert!(!config.overwrite);
}

/// Test provider parsing and display
#[test]
fn test_provider_fromStr_withKnownNames_shouldParse() {
    assert_eq!(
        TranslationProvider::from_str("deepl").unwrap(),
        TranslationProvider::Deepl
    );
    assert_eq!(
        TranslationProvider::from_str("LibreTranslate").unwrap(),
        TranslationProvider::Libretranslate
    );
    assert!(TranslationProvider::from_str("selenium").is_err());
    assert_eq!(TranslationProvider::Deepl.to_string(), "deepl");
    assert_eq!(TranslationProvider::Deepl.display_name(), "DeepL");
}

/// Test document settings mirror the configuration switches
#[test]
fn test_document_settings_withFlags_shouldMirrorConfig() {
    let config = Config {
        provider: TranslationProvider::Mock,
        new_file: true,
        overwrite: true,
        drop_original: true,
        save_temp_on_complete: true,
        ignore_cache: true,
        ..Config::default()
    };
    let settings = config.document_settings();
    assert!(settings.new_file);
    assert!(settings.overwrite);
    assert!(settings.drop_original);
    assert!(settings.save_temp_on_complete);
    assert!(settings.ignore_cache);
}
