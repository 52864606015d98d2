/*!
 * Tests for the application controller: discovery, per-file isolation and
 * the end-to-end workflow against the mock backend
 */

use std::fs;

use md_translate::app_config::{Config, TranslationProvider};
use md_translate::app_controller::Controller;

use crate::common;

fn mock_config() -> Config {
    Config {
        provider: TranslationProvider::Mock,
        ..Config::default()
    }
}

/// Test an invalid configuration is rejected at construction
#[test]
fn test_with_config_withMissingApiKey_shouldFail() {
    // Default config selects DeepL, which needs a key.
    assert!(Controller::with_config(Config::default()).is_err());
    assert!(Controller::with_config(mock_config()).is_ok());
}

/// Test the full workflow over a single file
#[tokio::test]
async fn test_run_withSingleFile_shouldWriteTranslation() {
    let dir = common::create_temp_dir().unwrap();
    let file = common::create_test_document(dir.path(), "test.md").unwrap();

    let controller = Controller::with_config(mock_config()).unwrap();
    let summary = controller.run(&[file.clone()]).await.unwrap();

    assert_eq!(summary.translated, 1);
    assert_eq!(summary.failed, 0);
    assert_eq!(
        fs::read_to_string(&file).unwrap(),
        common::TEST_DOCUMENT_TRANSLATED
    );
}

/// Test a second run is idempotent thanks to the sentinel marker
#[tokio::test]
async fn test_run_withAlreadyTranslatedFile_shouldSkip() {
    let dir = common::create_temp_dir().unwrap();
    let file = common::create_test_document(dir.path(), "test.md").unwrap();

    let controller = Controller::with_config(mock_config()).unwrap();
    controller.run(&[file.clone()]).await.unwrap();
    let second = controller.run(&[file]).await.unwrap();

    assert_eq!(second.translated, 0);
    assert_eq!(second.skipped, 1);
}

/// Test directory discovery ignores previous translation outputs
#[tokio::test]
async fn test_run_withDirectory_shouldFilterTranslatedOutputs() {
    let dir = common::create_temp_dir().unwrap();
    common::create_test_document(dir.path(), "a.md").unwrap();
    common::create_test_file(dir.path(), "a_translated.md", "# Done\n").unwrap();

    let config = Config {
        new_file: true,
        ..mock_config()
    };
    let controller = Controller::with_config(config).unwrap();
    let summary = controller.run(&[dir.path().to_path_buf()]).await.unwrap();

    assert_eq!(summary.translated, 1);
    // The pre-existing output was treated as output, not as a source.
    assert_eq!(fs::read_to_string(dir.path().join("a.md")).unwrap(), common::TEST_DOCUMENT);
}

/// Test a missing path fails before any document is constructed
#[tokio::test]
async fn test_run_withMissingPath_shouldFail() {
    let dir = common::create_temp_dir().unwrap();
    let controller = Controller::with_config(mock_config()).unwrap();
    assert!(controller
        .run(&[dir.path().join("missing.md")])
        .await
        .is_err());
}

/// Test an empty directory fails with a configuration error
#[tokio::test]
async fn test_run_withNoMarkdownFiles_shouldFail() {
    let dir = common::create_temp_dir().unwrap();
    common::create_test_file(dir.path(), "notes.txt", "plain\n").unwrap();

    let controller = Controller::with_config(mock_config()).unwrap();
    assert!(controller.run(&[dir.path().to_path_buf()]).await.is_err());
}

/// Test parallel workers process every file exactly once
#[tokio::test]
async fn test_run_withParallelWorkers_shouldProcessAllFiles() {
    let dir = common::create_temp_dir().unwrap();
    for name in ["a.md", "b.md", "c.md"] {
        common::create_test_document(dir.path(), name).unwrap();
    }

    let config = Config {
        processes: 2,
        ..mock_config()
    };
    let controller = Controller::with_config(config).unwrap();
    let summary = controller.run(&[dir.path().to_path_buf()]).await.unwrap();

    assert_eq!(summary.translated, 3);
    for name in ["a.md", "b.md", "c.md"] {
        assert_eq!(
            fs::read_to_string(dir.path().join(name)).unwrap(),
            common::TEST_DOCUMENT_TRANSLATED
        );
    }
}
