/*!
 * Mock translator for testing.
 *
 * Simulates backend behaviors without network access:
 * - `MockTranslator::working()` - always succeeds, appending a suffix
 * - `MockTranslator::failing()` - always fails with an error
 * - `MockTranslator::intermittent(n)` - every nth request fails
 * - `MockTranslator::fail_after(n)` - succeeds n times, then always fails
 */

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::ProviderError;
use crate::providers::Translator;

/// Behavior mode for the mock translator
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds with a suffixed translation
    Working,
    /// Always fails with an error
    Failing,
    /// Fails every nth request
    Intermittent {
        /// Period of the failures
        fail_every: usize,
    },
    /// Succeeds for the first n requests, then always fails.
    /// Useful for simulating a crash mid-pass.
    FailAfter {
        /// Number of successful requests before failing
        after: usize,
    },
}

/// Mock translation backend
#[derive(Debug, Clone)]
pub struct MockTranslator {
    /// Behavior mode
    behavior: MockBehavior,
    /// Suffix appended to successful translations
    suffix: String,
    /// Number of translate calls seen so far, shared across clones
    request_count: Arc<AtomicUsize>,
}

impl MockTranslator {
    /// Create a mock with the given behavior
    pub fn new(behavior: MockBehavior) -> Self {
        MockTranslator {
            behavior,
            suffix: ". translated".to_string(),
            request_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// A mock that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// A mock that always fails
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// A mock that fails every nth request
    pub fn intermittent(fail_every: usize) -> Self {
        Self::new(MockBehavior::Intermittent { fail_every })
    }

    /// A mock that succeeds n times, then always fails
    pub fn fail_after(after: usize) -> Self {
        Self::new(MockBehavior::FailAfter { after })
    }

    /// Change the suffix appended to translations
    pub fn with_suffix<S: Into<String>>(mut self, suffix: S) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// Number of translate calls seen so far
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Translator for MockTranslator {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn translate(&self, text: &str) -> Result<String, ProviderError> {
        let seen = self.request_count.fetch_add(1, Ordering::SeqCst);
        match self.behavior {
            MockBehavior::Working => Ok(format!("{}{}", text, self.suffix)),
            MockBehavior::Failing => Err(ProviderError::RequestFailed(
                "mock translator is configured to fail".to_string(),
            )),
            MockBehavior::Intermittent { fail_every } => {
                if fail_every > 0 && (seen + 1) % fail_every == 0 {
                    Err(ProviderError::RequestFailed(format!(
                        "mock failure on request {}",
                        seen + 1
                    )))
                } else {
                    Ok(format!("{}{}", text, self.suffix))
                }
            }
            MockBehavior::FailAfter { after } => {
                if seen < after {
                    Ok(format!("{}{}", text, self.suffix))
                } else {
                    Err(ProviderError::RequestFailed(format!(
                        "mock failure after {} successful requests",
                        after
                    )))
                }
            }
        }
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        match self.behavior {
            MockBehavior::Failing => Err(ProviderError::ConnectionError(
                "mock translator is configured to fail".to_string(),
            )),
            _ => Ok(()),
        }
    }
}
