/*!
 * The translation pass.
 *
 * Walks a document's translation queue strictly sequentially: one provider
 * call per node, checkpoint write after every success. The checkpoint on
 * disk is therefore always a prefix of completed translations in document
 * order, and a crashed run resumes without redoing finished work.
 */

use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};

use crate::app_config::Config;
use crate::document::MarkdownDocument;
use crate::errors::{ProviderError, TranslationError};
use crate::providers::{create_translator, Translator};

use super::queue::{resolve, resolve_mut, translation_queue};

/// Translation service owning the backend client for one document run.
///
/// The client is acquired on construction and released on drop, on every
/// exit path.
pub struct TranslationService {
    translator: Box<dyn Translator>,
    show_progress: bool,
}

impl TranslationService {
    /// Wrap an existing translator
    pub fn new(translator: Box<dyn Translator>) -> Self {
        TranslationService {
            translator,
            show_progress: false,
        }
    }

    /// Build the service for the configured backend. Progress bars are only
    /// drawn for single-process runs, where they do not interleave.
    pub fn with_config(config: &Config) -> Result<Self, ProviderError> {
        Ok(TranslationService {
            translator: create_translator(config)?,
            show_progress: config.processes <= 1,
        })
    }

    /// Toggle progress bar rendering
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Name of the configured backend
    pub fn translator_name(&self) -> &'static str {
        self.translator.name()
    }

    /// Test the connection to the backend
    pub async fn test_connection(&self) -> Result<(), ProviderError> {
        self.translator.test_connection().await
    }

    /// Run the translation pass over a document, in place.
    ///
    /// Returns the number of fragments translated in this run. On failure
    /// the error is propagated untouched; everything translated before the
    /// failure is already checkpointed and will not be redone on resume.
    pub async fn translate_document(
        &self,
        document: &mut MarkdownDocument,
    ) -> Result<usize, TranslationError> {
        let queue = translation_queue(&document.blocks);
        if queue.is_empty() {
            debug!("Nothing left to translate");
            return Ok(0);
        }
        info!(
            "Translating {} fragment(s) with {}",
            queue.len(),
            self.translator.name()
        );

        let progress = if self.show_progress {
            let bar = ProgressBar::new(queue.len() as u64);
            bar.set_style(
                ProgressStyle::default_bar()
                    .template(
                        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} fragments ({percent}%)",
                    )
                    .unwrap_or_else(|_| ProgressStyle::default_bar()),
            );
            Some(bar)
        } else {
            None
        };

        let mut completed = 0;
        for path in &queue {
            let Some(text) = resolve(&document.blocks, path).map(|b| b.render()) else {
                continue;
            };
            let translated = self.translator.translate(&text).await?;
            if let Some(block) = resolve_mut(&mut document.blocks, path) {
                block.set_translated_data(translated);
            }
            document.cache()?;
            completed += 1;
            if let Some(bar) = &progress {
                bar.inc(1);
            }
        }

        if let Some(bar) = progress {
            bar.finish_and_clear();
        }
        Ok(completed)
    }
}
