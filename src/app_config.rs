use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use crate::document::DocumentSettings;
use crate::language_utils;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings. The configuration is an
/// explicit value passed into the controller and services; there is no
/// process-wide settings state.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Source language code (ISO 639-1)
    pub from_lang: String,

    /// Target language code (ISO 639-1)
    pub to_lang: String,

    /// Translation backend
    #[serde(default)]
    pub provider: TranslationProvider,

    /// Override of the backend's default service host
    #[serde(default)]
    pub service_host: Option<String>,

    /// API key for the backend
    #[serde(default)]
    pub api_key: String,

    /// Number of documents processed concurrently
    #[serde(default = "default_processes")]
    pub processes: usize,

    /// Write translations to a `_translated` file instead of the source
    #[serde(default)]
    pub new_file: bool,

    /// Ignore existing checkpoints and re-parse sources
    #[serde(default)]
    pub ignore_cache: bool,

    /// Keep checkpoint files after successful writes
    #[serde(default)]
    pub save_temp_on_complete: bool,

    /// Translate files already carrying the translated marker
    #[serde(default)]
    pub overwrite: bool,

    /// Replace original text instead of interleaving translations
    #[serde(default)]
    pub drop_original: bool,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Translation backend type
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslationProvider {
    /// DeepL REST API
    #[default]
    Deepl,
    /// LibreTranslate REST API
    Libretranslate,
    /// In-process mock backend
    Mock,
}

impl TranslationProvider {
    /// Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Deepl => "DeepL",
            Self::Libretranslate => "LibreTranslate",
            Self::Mock => "Mock",
        }
    }

    /// Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Deepl => "deepl".to_string(),
            Self::Libretranslate => "libretranslate".to_string(),
            Self::Mock => "mock".to_string(),
        }
    }

    /// Whether this backend cannot work without an API key
    pub fn requires_api_key(&self) -> bool {
        matches!(self, Self::Deepl)
    }
}

impl std::fmt::Display for TranslationProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

impl std::str::FromStr for TranslationProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "deepl" => Ok(Self::Deepl),
            "libretranslate" => Ok(Self::Libretranslate),
            "mock" => Ok(Self::Mock),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Errors only
    Error,
    /// Errors and warnings
    Warn,
    /// Normal output
    #[default]
    Info,
    /// Verbose output
    Debug,
    /// Everything
    Trace,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            from_lang: "en".to_string(),
            to_lang: "fr".to_string(),
            provider: TranslationProvider::default(),
            service_host: None,
            api_key: String::new(),
            processes: default_processes(),
            new_file: false,
            ignore_cache: false,
            save_temp_on_complete: false,
            overwrite: false,
            drop_original: false,
            log_level: LogLevel::default(),
        }
    }
}

impl Config {
    /// Load a configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;
        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Write the configuration to a JSON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let payload =
            serde_json::to_string_pretty(self).context("Failed to serialize config to JSON")?;
        std::fs::write(path, payload)
            .with_context(|| format!("Failed to write config to file: {}", path.display()))
    }

    /// Validate the configuration; fails before any document is touched
    pub fn validate(&self) -> Result<()> {
        language_utils::validate_language_code(&self.from_lang)
            .with_context(|| format!("Invalid source language: {}", self.from_lang))?;
        language_utils::validate_language_code(&self.to_lang)
            .with_context(|| format!("Invalid target language: {}", self.to_lang))?;
        if language_utils::language_codes_match(&self.from_lang, &self.to_lang) {
            return Err(anyhow!(
                "Source and target languages are the same: {}",
                self.from_lang
            ));
        }
        if self.processes == 0 {
            return Err(anyhow!("processes must be at least 1"));
        }
        if self.provider.requires_api_key() && self.api_key.trim().is_empty() {
            return Err(anyhow!(
                "{} requires an API key (set api_key or MD_TRANSLATE_API_KEY)",
                self.provider.display_name()
            ));
        }
        Ok(())
    }

    /// Per-document behavior switches derived from this configuration
    pub fn document_settings(&self) -> DocumentSettings {
        DocumentSettings {
            new_file: self.new_file,
            overwrite: self.overwrite,
            drop_original: self.drop_original,
            save_temp_on_complete: self.save_temp_on_complete,
            ignore_cache: self.ignore_cache,
        }
    }
}

fn default_processes() -> usize {
    1
}
