/*!
 * Markdown document handling.
 *
 * This module contains the block model, the pulldown-cmark adapter, the
 * checkpoint store and the document orchestration layer:
 * - `blocks`: the typed block tree and its rendering rules
 * - `parser`: markdown text to block tree
 * - `checkpoint`: side-car persistence for resumable translation
 * - `model`: the `MarkdownDocument` lifecycle
 */

pub mod blocks;
pub mod checkpoint;
pub mod model;
pub mod parser;

pub use blocks::Block;
pub use model::{DocumentSettings, MarkdownDocument, TRANSLATED_MARK};
