use std::time::Duration;

use async_trait::async_trait;
use log::warn;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::errors::ProviderError;
use crate::providers::{backoff_delay, is_retryable, parse_host, Translator};

const DEFAULT_HOST: &str = "https://libretranslate.com/";

const TIMEOUT_SECS: u64 = 30;

const MAX_RETRIES: u32 = 3;

const BACKOFF_BASE_MS: u64 = 500;

/// LibreTranslate API client.
///
/// Works against the public instance or any self-hosted one; the API key is
/// optional and only sent when configured.
#[derive(Debug)]
pub struct LibreTranslate {
    client: Client,
    host: Url,
    api_key: Option<String>,
    source_lang: String,
    target_lang: String,
}

/// Translation request for the LibreTranslate API
#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    /// Text to translate
    q: &'a str,
    /// Source language code
    source: String,
    /// Target language code
    target: String,
    /// Response format
    format: &'static str,
    /// Optional API key
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<String>,
}

/// Translation response from the LibreTranslate API
#[derive(Debug, Deserialize)]
struct TranslateResponse {
    #[serde(rename = "translatedText")]
    translated_text: String,
}

impl LibreTranslate {
    /// Create a new LibreTranslate client
    pub fn new(
        host: Option<&str>,
        api_key: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<Self, ProviderError> {
        let host = parse_host(host.unwrap_or(DEFAULT_HOST))?;
        let client = Client::builder()
            .timeout(Duration::from_secs(TIMEOUT_SECS))
            .build()
            .map_err(|e| ProviderError::ConnectionError(e.to_string()))?;
        Ok(LibreTranslate {
            client,
            host,
            api_key: if api_key.trim().is_empty() {
                None
            } else {
                Some(api_key.to_string())
            },
            source_lang: source_lang.to_lowercase(),
            target_lang: target_lang.to_lowercase(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ProviderError> {
        self.host
            .join(path)
            .map_err(|e| ProviderError::ConnectionError(e.to_string()))
    }

    async fn request_translation(&self, text: &str) -> Result<String, ProviderError> {
        let request = TranslateRequest {
            q: text,
            source: self.source_lang.clone(),
            target: self.target_lang.clone(),
            format: "text",
            api_key: self.api_key.clone(),
        };
        let response = self
            .client
            .post(self.endpoint("translate")?)
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(ProviderError::RateLimitExceeded(
                "LibreTranslate rate limit hit".to_string(),
            ));
        }
        if status == StatusCode::FORBIDDEN {
            return Err(ProviderError::AuthenticationError(
                "LibreTranslate rejected the request, an API key may be required".to_string(),
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
        Ok(parsed.translated_text)
    }
}

#[async_trait]
impl Translator for LibreTranslate {
    fn name(&self) -> &'static str {
        "libretranslate"
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
                        "LibreTranslate request failed ({}), retrying in {}ms (attempt {}/{})",
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
            .get(self.endpoint("languages")?)
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
