/*!
 * Document orchestration: lifecycle, rendering and output decisions.
 *
 * A `MarkdownDocument` owns the ordered top-level block list of one source
 * file. It is created by parsing text or by restoring a checkpoint, mutated
 * in place by the translation pass, rendered (original or interleaved with
 * translations) and finally written to its target path, at which point the
 * checkpoint is deleted unless configured otherwise.
 */

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::DocumentError;

use super::blocks::Block;
use super::checkpoint;
use super::parser::parse_blocks;

/// Sentinel marker written as the first line of translated output, used to
/// detect already-translated files idempotently.
pub const TRANSLATED_MARK: &str = "<!-- TRANSLATED by md-translate -->";

static EXCESSIVE_NEWLINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());
static TRAILING_NEWLINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{2,}$").unwrap());
static SPACES_AFTER_PUNCTUATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\b[.!?]) {2,}").unwrap());

/// Per-document behavior switches, passed in explicitly by the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DocumentSettings {
    /// Write to `<stem>_translated<suffix>` instead of overwriting the source
    pub new_file: bool,
    /// Translate even when the target already carries the sentinel marker
    pub overwrite: bool,
    /// Emit only translated text instead of original + translation pairs
    pub drop_original: bool,
    /// Keep the checkpoint file after a successful write
    pub save_temp_on_complete: bool,
    /// Parse the source even when a checkpoint exists
    pub ignore_cache: bool,
}

/// A parsed markdown document and its translation state
#[derive(Debug, Clone, PartialEq)]
pub struct MarkdownDocument {
    /// Source file this document was loaded from, if any
    pub source: Option<PathBuf>,
    /// Ordered top-level blocks; order is rendering order
    pub blocks: Vec<Block>,
    /// Behavior switches for this document
    pub settings: DocumentSettings,
}

impl MarkdownDocument {
    /// Parse a document from a string. String documents have no source path,
    /// so they cannot be checkpointed or written.
    pub fn from_string(text: &str) -> Result<Self, DocumentError> {
        Ok(MarkdownDocument {
            source: None,
            blocks: parse_blocks(text)?,
            settings: DocumentSettings::default(),
        })
    }

    /// Replace the document settings
    pub fn with_settings(mut self, settings: DocumentSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Load a document from a file, resuming from its checkpoint when one
    /// exists (unless `ignore_cache` is set). A checkpoint that exists but
    /// cannot be decoded is corruption and fails the load.
    pub fn from_file<P: AsRef<Path>>(
        path: P,
        settings: DocumentSettings,
    ) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        if !settings.ignore_cache {
            if let Some(blocks) = checkpoint::restore(path)? {
                return Ok(MarkdownDocument {
                    source: Some(path.to_path_buf()),
                    blocks,
                    settings,
                });
            }
            debug!("No checkpoint for {}, loading from source", path.display());
        }
        let text = fs::read_to_string(path)?;
        Ok(MarkdownDocument {
            source: Some(path.to_path_buf()),
            blocks: parse_blocks(&text)?,
            settings,
        })
    }

    /// Restore a document strictly from its checkpoint
    pub fn restore<P: AsRef<Path>>(
        path: P,
        settings: DocumentSettings,
    ) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        match checkpoint::restore(path)? {
            Some(blocks) => Ok(MarkdownDocument {
                source: Some(path.to_path_buf()),
                blocks,
                settings,
            }),
            None => Err(DocumentError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!(
                    "Checkpoint not found: {}",
                    checkpoint::checkpoint_path(path).display()
                ),
            ))),
        }
    }

    /// Persist the current block tree to the checkpoint file. A document
    /// without a source path has nowhere to checkpoint and this is a no-op.
    pub fn cache(&self) -> Result<(), DocumentError> {
        match &self.source {
            Some(source) => checkpoint::store(source, &self.blocks),
            None => Ok(()),
        }
    }

    /// Render the original markdown text of the whole document
    pub fn render(&self) -> String {
        let body = self
            .blocks
            .iter()
            .map(|b| b.render())
            .collect::<Vec<_>>()
            .join("\n\n");
        normalize(&format!("{}\n", body))
    }

    /// Render the document with translations interleaved.
    ///
    /// Blocks without any translation are emitted as-is. Translated blocks
    /// are emitted as original + translation pairs, or translation only in
    /// `drop_original` mode.
    pub fn render_translated(&self) -> String {
        let mut rendered = Vec::with_capacity(self.blocks.len() * 2);
        for block in &self.blocks {
            if !block.has_translated() {
                rendered.push(block.render());
                continue;
            }
            if !self.settings.drop_original {
                rendered.push(block.render());
            }
            rendered.push(block.render_translated());
        }
        rendered.retain(|b| !b.is_empty());
        normalize(&rendered.join("\n\n"))
    }

    /// Idempotence guard: whether this document still needs translating.
    ///
    /// Returns false when the target output (the source itself, or the
    /// `_translated` file in `new_file` mode) already carries the sentinel
    /// marker. `overwrite` forces translation regardless.
    pub fn should_be_translated(&self) -> Result<bool, DocumentError> {
        let Some(source) = &self.source else {
            return Ok(false);
        };
        if self.settings.overwrite {
            return Ok(true);
        }
        let target = self.target_path(source);
        if !target.is_file() {
            return Ok(true);
        }
        let content = fs::read_to_string(&target)?;
        Ok(!content.contains(TRANSLATED_MARK))
    }

    /// Write the sentinel marker plus the translated rendering to the target
    /// path, and drop the checkpoint unless configured to keep it.
    pub fn write(&self) -> Result<PathBuf, DocumentError> {
        let source = self.source.as_ref().ok_or_else(|| {
            DocumentError::MissingSource("cannot write a document parsed from a string".to_string())
        })?;
        let target = self.target_path(source);
        let content = format!("{}\n{}", TRANSLATED_MARK, self.render_translated());
        fs::write(&target, content)?;
        if !self.settings.save_temp_on_complete {
            checkpoint::remove(source)?;
        }
        info!("Written translated document: {}", target.display());
        Ok(target)
    }

    /// Target output path for this document
    pub fn target_path(&self, source: &Path) -> PathBuf {
        if !self.settings.new_file {
            return source.to_path_buf();
        }
        let stem = source
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let suffix = source
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();
        source.with_file_name(format!("{}_translated{}", stem, suffix))
    }
}

/// Output normalization, applied uniformly to rendered documents.
///
/// Collapses runs of 3+ newlines to a blank line, trims trailing newline
/// runs to a single newline, and collapses repeated spaces after sentence
/// punctuation. Idempotent: normalizing twice equals normalizing once.
fn normalize(text: &str) -> String {
    let text = EXCESSIVE_NEWLINES.replace_all(text, "\n\n");
    let text = TRAILING_NEWLINES.replace_all(&text, "\n");
    let text = SPACES_AFTER_PUNCTUATION.replace_all(&text, "${1} ");
    text.to_string()
}
