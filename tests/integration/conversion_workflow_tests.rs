/*!
 * End-to-end conversion workflow tests
 */

use async_trait::async_trait;
use std::path::PathBuf;
use teidict::app_config::Config;
use teidict::app_controller::{Controller, ConversionSummary};
use teidict::archive_utils::ArchiveReader;
use teidict::catalog::{CatalogDictionary, CatalogSource, Release};
use teidict::errors::CatalogError;
use teidict::file_utils::FileManager;
use teidict::tei_converter;
use crate::common;

/// Catalog source serving a fixed in-memory catalog
struct StubCatalog {
    entries: Vec<CatalogDictionary>,
}

#[async_trait]
impl CatalogSource for StubCatalog {
    async fn fetch(&self) -> Result<Vec<CatalogDictionary>, CatalogError> {
        Ok(self.entries.clone())
    }
}

fn stub_dictionary(name: &str, url: &str) -> CatalogDictionary {
    CatalogDictionary {
        name: Some(name.to_string()),
        releases: vec![Release {
            platform: "src".to_string(),
            url: url.to_string(),
            version: None,
            size: None,
        }],
    }
}

fn test_config(output_dir: PathBuf, cache_dir: PathBuf, dictionary: &str) -> Config {
    Config {
        dictionary: dictionary.to_string(),
        output_dir,
        cache_dir: Some(cache_dir),
        ..Config::default()
    }
}

/// Test the full archive-to-output pipeline without the network
#[test]
fn test_conversion_pipeline_withTeiArchive_shouldWriteDictionaryXml() {
    common::init_logging();

    let temp_dir = common::create_temp_dir().unwrap();
    let dir = temp_dir.path().to_path_buf();

    let archive_path = common::create_tar_gz_archive(
        &dir,
        "eng-deu.src.tar.gz",
        &[
            ("eng-deu/INSTALL", "irrelevant"),
            ("eng-deu/eng-deu.tei", &common::sample_tei_document()),
        ],
    )
    .unwrap();

    let tei_content = ArchiveReader::extract_required_member(&archive_path, ".tei").unwrap();
    let xml = tei_converter::convert(&tei_content).unwrap();

    let output_path = FileManager::generate_output_path(&dir, "eng-deu", "xml");
    FileManager::write_to_file(&output_path, &xml).unwrap();

    let written = FileManager::read_to_string(&output_path).unwrap();
    assert!(written.contains(r#"<dictionary name="FreeDict">"#));
    assert!(written.contains(r#"<entry term="cat">"#));
    assert!(written.contains(r#"<entry term="run">"#));
    // "Adjective" is normalized on the way through
    assert!(written.contains(r#"<usage pos="adj" description="color">"#));
}

/// Test that an empty catalog yields an empty summary
#[tokio::test]
async fn test_controller_run_withEmptyCatalog_shouldConvertNothing() {
    let temp_dir = common::create_temp_dir().unwrap();
    let config = test_config(
        temp_dir.path().join("out"),
        temp_dir.path().join("cache"),
        "all",
    );

    let controller = Controller::with_config(config).unwrap();
    let catalog = StubCatalog { entries: Vec::new() };

    let summary = controller.run_with_catalog(&catalog, false).await.unwrap();

    assert_eq!(summary, ConversionSummary::default());
}

/// Test that selecting an absent pair is a run-level error
#[tokio::test]
async fn test_controller_run_withUnknownPair_shouldFail() {
    let temp_dir = common::create_temp_dir().unwrap();
    let config = test_config(
        temp_dir.path().join("out"),
        temp_dir.path().join("cache"),
        "xxx-yyy",
    );

    let controller = Controller::with_config(config).unwrap();
    let catalog = StubCatalog {
        entries: vec![stub_dictionary("eng-deu", "http://127.0.0.1:1/eng-deu.src.tar.gz")],
    };

    let result = controller.run_with_catalog(&catalog, false).await;

    assert!(result.is_err());
}

/// Test that existing output is skipped without touching the network
#[tokio::test]
async fn test_controller_run_withExistingOutput_shouldSkipPair() {
    let temp_dir = common::create_temp_dir().unwrap();
    let output_dir = temp_dir.path().join("out");
    let config = test_config(output_dir.clone(), temp_dir.path().join("cache"), "eng-deu");

    // Pre-existing output; the bogus URL would fail if it were fetched
    FileManager::write_to_file(output_dir.join("eng-deu.xml"), "<dictionary/>").unwrap();

    let controller = Controller::with_config(config).unwrap();
    let catalog = StubCatalog {
        entries: vec![stub_dictionary("eng-deu", "http://127.0.0.1:1/eng-deu.src.tar.gz")],
    };

    let summary = controller.run_with_catalog(&catalog, false).await.unwrap();

    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.converted, 0);
    assert_eq!(summary.failed, 0);
}

/// Test that one failing pair does not abort its siblings
#[tokio::test]
async fn test_controller_run_withFailingDownloads_shouldIsolateFailures() {
    common::init_logging();

    let temp_dir = common::create_temp_dir().unwrap();
    let output_dir = temp_dir.path().join("out");
    let config = test_config(output_dir.clone(), temp_dir.path().join("cache"), "all");

    // One pair already converted, two pairs that will fail to download
    FileManager::write_to_file(output_dir.join("spa-ast.xml"), "<dictionary/>").unwrap();

    let controller = Controller::with_config(config).unwrap();
    let catalog = StubCatalog {
        entries: vec![
            stub_dictionary("eng-deu", "http://127.0.0.1:1/eng-deu.src.tar.gz"),
            stub_dictionary("spa-ast", "http://127.0.0.1:1/spa-ast.src.tar.gz"),
            stub_dictionary("fra-bre", "http://127.0.0.1:1/fra-bre.src.tar.gz"),
        ],
    };

    let summary = controller.run_with_catalog(&catalog, false).await.unwrap();

    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.failed, 2);
    assert_eq!(summary.converted, 0);
}

/// Test the expected output path helper
#[test]
fn test_output_path_for_withPair_shouldUseConfiguredOutputDir() {
    let config = Config {
        output_dir: PathBuf::from("converted"),
        ..Config::default()
    };
    let controller = Controller::with_config(config).unwrap();

    assert_eq!(
        controller.output_path_for("eng-deu"),
        PathBuf::from("converted").join("eng-deu.xml")
    );
}
