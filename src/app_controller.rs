use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use log::{debug, error, info};
use parking_lot::Mutex;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::app_config::Config;
use crate::document::MarkdownDocument;
use crate::errors::AppError;
use crate::file_utils::FileManager;
use crate::language_utils;
use crate::translation::TranslationService;

// Application controller for markdown translation

/// Outcome of processing a single file
#[derive(Debug, Clone, PartialEq)]
pub enum FileOutcome {
    /// Translated and written to the given target path
    Translated(PathBuf),
    /// Skipped because the target already carries the sentinel marker
    AlreadyTranslated,
}

/// Counters for a whole run
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct RunSummary {
    /// Files translated and written
    pub translated: usize,
    /// Files skipped as already translated
    pub skipped: usize,
    /// Files that failed
    pub failed: usize,
}

/// Main application controller for markdown translation
#[derive(Debug, Clone)]
pub struct Controller {
    config: Config,
}

impl Controller {
    /// Create a new controller with a validated configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config
            .validate()
            .context("Configuration validation failed")?;
        Ok(Controller { config })
    }

    /// Run the translation workflow over the given files and directories.
    ///
    /// Per-file failures are logged and the run continues; the returned
    /// error after the batch reflects overall success.
    pub async fn run(&self, paths: &[PathBuf]) -> Result<RunSummary> {
        let files = self.collect_files(paths)?;
        info!(
            "Found {} file(s) to process, translating {} ({}) -> {} ({})",
            files.len(),
            self.config.from_lang,
            language_utils::language_name(&self.config.from_lang).unwrap_or("unknown"),
            self.config.to_lang,
            language_utils::language_name(&self.config.to_lang).unwrap_or("unknown"),
        );

        let summary = if self.config.processes <= 1 {
            self.run_sequential(&files).await
        } else {
            self.run_parallel(&files).await
        };

        info!(
            "Run finished: {} translated, {} skipped, {} failed",
            summary.translated, summary.skipped, summary.failed
        );
        if summary.failed > 0 {
            return Err(anyhow!(
                "{} of {} file(s) failed",
                summary.failed,
                files.len()
            ));
        }
        Ok(summary)
    }

    /// Resolve CLI paths into the list of source files to translate.
    ///
    /// Fails before any document is constructed when a path is missing or
    /// no markdown files are found at all.
    fn collect_files(&self, paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for path in paths {
            if !path.exists() {
                return Err(anyhow!("Path not found: {}", path.display()));
            }
            if path.is_file() {
                files.push(path.clone());
            } else {
                files.extend(FileManager::find_markdown_files(path)?);
            }
        }
        // Outputs of previous runs are not sources.
        files.retain(|file| {
            file.file_name()
                .map(|name| !name.to_string_lossy().contains("_translated"))
                .unwrap_or(true)
        });
        files.sort();
        files.dedup();
        if files.is_empty() {
            return Err(anyhow!("No markdown files found"));
        }
        for file in &files {
            debug!("Found file: {}", file.display());
        }
        Ok(files)
    }

    async fn run_sequential(&self, files: &[PathBuf]) -> RunSummary {
        let mut summary = RunSummary::default();
        for file in files {
            record_outcome(&mut summary, file, process_file(&self.config, file).await);
        }
        summary
    }

    /// Fan out over worker tasks, each exclusively owning one document.
    /// Trees are never shared between workers; only the counters are.
    async fn run_parallel(&self, files: &[PathBuf]) -> RunSummary {
        let summary = Arc::new(Mutex::new(RunSummary::default()));
        let semaphore = Arc::new(Semaphore::new(self.config.processes));
        let mut tasks = JoinSet::new();

        for file in files {
            let config = self.config.clone();
            let file = file.clone();
            let summary = Arc::clone(&summary);
            let semaphore = Arc::clone(&semaphore);
            tasks.spawn(async move {
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return;
                };
                let outcome = process_file(&config, &file).await;
                record_outcome(&mut summary.lock(), &file, outcome);
            });
        }
        while tasks.join_next().await.is_some() {}

        let result = *summary.lock();
        result
    }
}

fn record_outcome(summary: &mut RunSummary, file: &Path, outcome: Result<FileOutcome, AppError>) {
    match outcome {
        Ok(FileOutcome::Translated(target)) => {
            summary.translated += 1;
            info!("Processed file: {}", target.display());
        }
        Ok(FileOutcome::AlreadyTranslated) => {
            summary.skipped += 1;
            info!("Skipping file: {}. Already translated", file.display());
        }
        Err(e) => {
            summary.failed += 1;
            error!("Error while processing {}: {}", file.display(), e);
        }
    }
}

/// Process one markdown document end to end.
///
/// Each invocation exclusively owns its document and translator client, so a
/// failure here never corrupts or aborts sibling files.
async fn process_file(config: &Config, file: &Path) -> Result<FileOutcome, AppError> {
    info!("Processing file: {}", file.display());
    let mut document = MarkdownDocument::from_file(file, config.document_settings())?;
    if !document.should_be_translated()? {
        return Ok(FileOutcome::AlreadyTranslated);
    }
    let service = TranslationService::with_config(config)?;
    let translated = service.translate_document(&mut document).await?;
    debug!(
        "Translated {} fragment(s) in {}",
        translated,
        file.display()
    );
    let target = document.write()?;
    Ok(FileOutcome::Translated(target))
}
