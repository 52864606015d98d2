/*!
 * # md-translate
 *
 * A Rust library and CLI tool for translating markdown files while
 * preserving markdown syntax.
 *
 * ## Features
 *
 * - Parse markdown into a typed block tree and render it back unchanged
 * - Translate only human-readable text: headings, paragraphs, emphasis,
 *   link labels, image alt text
 * - Keep code spans, code blocks, HTML and list/quote structure intact
 * - Checkpoint progress after every translated fragment and resume
 *   interrupted runs from the side-car file
 * - Batch processing of files and directories
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `document`: Markdown block model, parser adapter, checkpoint store and
 *   document lifecycle
 * - `translation`: The sequential, checkpointing translation pass
 * - `providers`: Client implementations for translation backends:
 *   - `providers::deepl`: DeepL API client
 *   - `providers::libretranslate`: LibreTranslate API client
 *   - `providers::mock`: deterministic mock backend for tests
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod document;
pub mod errors;
pub mod file_utils;
pub mod language_utils;
pub mod providers;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::Controller;
pub use document::{Block, DocumentSettings, MarkdownDocument, TRANSLATED_MARK};
pub use errors::{AppError, DocumentError, ProviderError, TranslationError};
pub use translation::TranslationService;
