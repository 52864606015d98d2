/*!
 * Translation of parsed documents.
 *
 * - `queue`: ordered addressing of translatable nodes in a block tree
 * - `service`: the sequential, checkpointing translation pass
 */

pub mod queue;
pub mod service;

pub use service::TranslationService;
