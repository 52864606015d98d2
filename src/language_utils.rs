use anyhow::{anyhow, Result};
use isolang::Language;

/// Language utilities for ISO language code handling
///
/// This module provides functions for validating and normalizing the
/// ISO 639-1 (2-letter) and ISO 639-3 (3-letter) codes accepted by the
/// `--from-lang`/`--to-lang` options.
/// Normalize a language code to its ISO 639-1 (2-letter) form
pub fn normalize_language_code(code: &str) -> Result<String> {
    let normalized = code.trim().to_lowercase();
    let language = match normalized.len() {
        2 => Language::from_639_1(&normalized),
        3 => Language::from_639_3(&normalized),
        _ => None,
    };
    let language = language.ok_or_else(|| anyhow!("Invalid language code: {}", code))?;
    language
        .to_639_1()
        .map(|c| c.to_string())
        .ok_or_else(|| anyhow!("Language '{}' has no ISO 639-1 code", code))
}

/// Validate that a language code resolves to an ISO 639-1 language
pub fn validate_language_code(code: &str) -> Result<()> {
    normalize_language_code(code).map(|_| ())
}

/// English name of a language for log output, if the code is known
pub fn language_name(code: &str) -> Option<&'static str> {
    let normalized = code.trim().to_lowercase();
    let language = match normalized.len() {
        2 => Language::from_639_1(&normalized),
        3 => Language::from_639_3(&normalized),
        _ => None,
    }?;
    Some(language.to_name())
}

/// Whether two language codes denote the same language
pub fn language_codes_match(a: &str, b: &str) -> bool {
    match (normalize_language_code(a), normalize_language_code(b)) {
        (Ok(left), Ok(right)) => left == right,
        _ => a.trim().eq_ignore_ascii_case(b.trim()),
    }
}
