/*!
 * Tests for language code utilities
 */

use md_translate::language_utils;

/// Test normalization of 2- and 3-letter codes to ISO 639-1
#[test]
fn test_normalize_language_code_withValidCodes_shouldReturnPart1() {
    assert_eq!(language_utils::normalize_language_code("en").unwrap(), "en");
    assert_eq!(language_utils::normalize_language_code("EN").unwrap(), "en");
    assert_eq!(
        language_utils::normalize_language_code("eng").unwrap(),
        "en"
    );
    assert_eq!(
        language_utils::normalize_language_code("fra").unwrap(),
        "fr"
    );
}

/// Test invalid codes are rejected
#[test]
fn test_normalize_language_code_withInvalidCodes_shouldFail() {
    assert!(language_utils::normalize_language_code("zz").is_err());
    assert!(language_utils::normalize_language_code("french").is_err());
    assert!(language_utils::normalize_language_code("").is_err());
}

/// Test validation mirrors normalization
#[test]
fn test_validate_language_code_withMixedInputs_shouldMatchNormalization() {
    assert!(language_utils::validate_language_code("de").is_ok());
    assert!(language_utils::validate_language_code("deu").is_ok());
    assert!(language_utils::validate_language_code("q").is_err());
}

/// Test English names for log output
#[test]
fn test_language_name_withKnownCode_shouldReturnEnglishName() {
    assert_eq!(language_utils::language_name("en"), Some("English"));
    assert_eq!(language_utils::language_name("fr"), Some("French"));
    assert_eq!(language_utils::language_name("zz"), None);
}

/// Test code matching across 639-1 and 639-3 forms
#[test]
fn test_language_codes_match_withEquivalentForms_shouldMatch() {
    assert!(language_utils::language_codes_match("en", "eng"));
    assert!(language_utils::language_codes_match("FR", "fr"));
    assert!(!language_utils::language_codes_match("en", "fr"));
}
