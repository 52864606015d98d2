use std::time::Duration;

use async_trait::async_trait;
use log::warn;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::errors::ProviderError;
use crate::providers::{backoff_delay, is_retryable, parse_host, Translator};

/// Default host of the free API tier
const DEFAULT_HOST: &str = "https://api-free.deepl.com/";

/// Request timeout for a single translation call
const TIMEOUT_SECS: u64 = 30;

/// Maximum number of retry attempts for transient failures
const MAX_RETRIES: u32 = 3;

/// Base backoff time in milliseconds for exponential backoff
const BACKOFF_BASE_MS: u64 = 500;

/// DeepL API client
#[derive(Debug)]
pub struct DeepL {
    /// HTTP client for making requests
    client: Client,
    /// Base URL of the DeepL API
    host: Url,
    /// API authentication key
    api_key: String,
    /// Source language code
    source_lang: String,
    /// Target language code
    target_lang: String,
}

/// Translation request for the DeepL API
#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    /// Text fragments to translate
    text: Vec<&'a str>,
    /// Source language, DeepL expects upper case
    source_lang: String,
    /// Target language, DeepL expects upper case
    target_lang: String,
}

/// Translation response from the DeepL API
#[derive(Debug, Deserialize)]
struct TranslateResponse {
    translations: Vec<Translation>,
}

/// One translated fragment in a DeepL response
#[derive(Debug, Deserialize)]
struct Translation {
    text: String,
}

impl DeepL {
    /// Create a new DeepL client. The API key is mandatory.
    pub fn new(
        host: Option<&str>,
        api_key: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<Self, ProviderError> {
        if api_key.trim().is_empty() {
            return Err(ProviderError::AuthenticationError(
                "DeepL API key is not set".to_string(),
            ));
        }
        let host = parse_host(host.unwrap_or(DEFAULT_HOST))?;
        let client = Client::builder()
            .timeout(Duration::from_secs(TIMEOUT_SECS))
            .build()
            .map_err(|e| ProviderError::ConnectionError(e.to_string()))?;
        Ok(DeepL {
            client,
            host,
            api_key: api_key.to_string(),
            source_lang: source_lang.to_uppercase(),
            target_lang: target_lang.to_uppercase(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ProviderError> {
        self.host
            .join(path)
            .map_err(|e| ProviderError::ConnectionError(e.to_string()))
    }

    async fn request_translation(&self, text: &str) -> Result<String, ProviderError> {
        let request = TranslateRequest {
            text: vec![text],
            source_lang: self.source_lang.clone(),
            target_lang: self.target_lang.clone(),
        };
        let response = self
            .client
            .post(self.endpoint("v2/translate")?)
            .header("Authorization", format!("DeepL-Auth-Key {}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(ProviderError::RateLimitExceeded(
                "DeepL rate limit hit".to_string(),
            ));
        }
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ProviderError::AuthenticationError(
                "DeepL rejected the API key".to_string(),
            ));
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message,
            });
        }

        let parsed: TranslateResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;
        parsed
            .translations
            .into_iter()
            .next()
            .map(|t| t.text)
            .ok_or_else(|| ProviderError::ParseError("empty translations array".to_string()))
    }
}

#[async_trait]
impl Translator for DeepL {
    fn name(&self) -> &'static str {
        "deepl"
    }

    async fn translate(&self, text: &str) -> Result<String, ProviderError> {
        let mut attempt = 0;
        loop {
            match self.request_translation(text).await {
                Ok(translated) => return Ok(translated),
                Err(e) if attempt < MAX_RETRIES && is_retryable(&e) => {
                    attempt += 1;
                    let delay = backoff_delay(BACKOFF_BASE_MS, attempt);
                    warn!(
                        "DeepL request failed ({}), retrying in {}ms (attempt {}/{})",
                        e,
                        delay.as_millis(),
                        attempt,
                        MAX_RETRIES
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        let response = self
            .client
            .get(self.endpoint("v2/usage")?)
            .header("Authorization", format!("DeepL-Auth-Key {}", self.api_key))
            .send()
            .await
            .map_err(|e| ProviderError::ConnectionError(e.to_string()))?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            })
        }
    }
}
