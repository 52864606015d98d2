/*!
 * Side-car checkpoint persistence for in-progress translations.
 *
 * The checkpoint is a JSON snapshot of a document's block tree, written to
 * `<source_name>.tmp` next to the source file. It is rewritten after every
 * successful leaf translation, so the on-disk state is always a prefix of
 * the pass in traversal order and an interrupted run resumes exactly where
 * it stopped.
 *
 * Writes go through a temp file in the same directory followed by a rename,
 * so a reader never observes a torn checkpoint.
 */

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::errors::DocumentError;

use super::blocks::Block;

/// On-disk checkpoint payload
#[derive(Debug, Serialize, Deserialize)]
struct CheckpointData {
    source: String,
    blocks: Vec<Block>,
}

/// Path of the checkpoint file for a given source file
pub fn checkpoint_path(source: &Path) -> PathBuf {
    let file_name = source
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default();
    source.with_file_name(format!("{}.tmp", file_name))
}

/// Whether a checkpoint exists for the source file
pub fn exists(source: &Path) -> bool {
    checkpoint_path(source).is_file()
}

/// Persist a snapshot of the block tree atomically
pub fn store(source: &Path, blocks: &[Block]) -> Result<(), DocumentError> {
    let path = checkpoint_path(source);
    let data = CheckpointData {
        source: source.to_string_lossy().to_string(),
        blocks: blocks.to_vec(),
    };
    let payload = serde_json::to_string(&data)
        .map_err(|e| DocumentError::CorruptCheckpoint(e.to_string()))?;

    let dir = source.parent().unwrap_or_else(|| Path::new("."));
    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(payload.as_bytes())?;
    temp.persist(&path).map_err(|e| DocumentError::Io(e.error))?;

    debug!("Checkpoint written: {}", path.display());
    Ok(())
}

/// Restore the block tree from a checkpoint.
///
/// Returns `Ok(None)` when no checkpoint exists. A checkpoint that exists
/// but cannot be decoded (malformed JSON, unknown block type, missing
/// fields) is corruption and fails hard.
pub fn restore(source: &Path) -> Result<Option<Vec<Block>>, DocumentError> {
    let path = checkpoint_path(source);
    if !path.is_file() {
        return Ok(None);
    }
    let payload = fs::read_to_string(&path)?;
    let data: CheckpointData = serde_json::from_str(&payload)
        .map_err(|e| DocumentError::CorruptCheckpoint(e.to_string()))?;
    debug!("Checkpoint restored: {}", path.display());
    Ok(Some(data.blocks))
}

/// Delete the checkpoint for a source file, if present
pub fn remove(source: &Path) -> Result<(), DocumentError> {
    let path = checkpoint_path(source);
    if path.is_file() {
        fs::remove_file(&path)?;
        debug!("Checkpoint removed: {}", path.display());
    }
    Ok(())
}
