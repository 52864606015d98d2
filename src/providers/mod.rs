/*!
 * Provider implementations for translation services.
 *
 * This module contains client implementations for the supported translation
 * backends:
 * - DeepL: DeepL REST API
 * - LibreTranslate: self-hostable open translation API
 * - Mock: deterministic in-process translator for tests
 */

use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use url::Url;

use crate::app_config::{Config, TranslationProvider};
use crate::errors::ProviderError;

/// Common trait for all translation backends.
///
/// This is the single capability the core consumes: translate a rendered
/// text fragment, fallibly. Retry policy lives in the implementations;
/// the caller decides what a failure means for the document.
#[async_trait]
pub trait Translator: Send + Sync + Debug {
    /// Short backend name for logging
    fn name(&self) -> &'static str;

    /// Translate a text fragment
    async fn translate(&self, text: &str) -> Result<String, ProviderError>;

    /// Test the connection to the backend
    async fn test_connection(&self) -> Result<(), ProviderError>;
}

/// Build the translator selected by the configuration
pub fn create_translator(config: &Config) -> Result<Box<dyn Translator>, ProviderError> {
    match config.provider {
        TranslationProvider::Deepl => Ok(Box::new(deepl::DeepL::new(
            config.service_host.as_deref(),
            &config.api_key,
            &config.from_lang,
            &config.to_lang,
        )?)),
        TranslationProvider::Libretranslate => Ok(Box::new(
            libretranslate::LibreTranslate::new(
                config.service_host.as_deref(),
                &config.api_key,
                &config.from_lang,
                &config.to_lang,
            )?,
        )),
        TranslationProvider::Mock => Ok(Box::new(mock::MockTranslator::working())),
    }
}

/// Parse and normalize a service host, ensuring a trailing slash so that
/// relative endpoint joins behave
pub(crate) fn parse_host(host: &str) -> Result<Url, ProviderError> {
    let host = if host.ends_with('/') {
        host.to_string()
    } else {
        format!("{}/", host)
    };
    Url::parse(&host)
        .map_err(|e| ProviderError::ConnectionError(format!("Invalid service host '{}': {}", host, e)))
}

/// Whether an error is worth retrying with backoff
pub(crate) fn is_retryable(error: &ProviderError) -> bool {
    match error {
        ProviderError::RequestFailed(_)
        | ProviderError::ConnectionError(_)
        | ProviderError::RateLimitExceeded(_) => true,
        ProviderError::ApiError { status_code, .. } => *status_code >= 500,
        ProviderError::ParseError(_) | ProviderError::AuthenticationError(_) => false,
    }
}

/// Exponential backoff delay with jitter for the given retry attempt
pub(crate) fn backoff_delay(base_ms: u64, attempt: u32) -> Duration {
    let backoff = base_ms.saturating_mul(1u64 << attempt.min(6));
    let jitter = rand::rng().random_range(0..=backoff / 2);
    Duration::from_millis(backoff + jitter)
}

pub mod deepl;
pub mod libretranslate;
pub mod mock;
