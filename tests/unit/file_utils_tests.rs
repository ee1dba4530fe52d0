/*!
 * Tests for file and directory utilities
 */

use std::path::PathBuf;
use teidict::file_utils::FileManager;
use crate::common;

/// Test file existence checks
#[test]
fn test_file_exists_withExistingFile_shouldReturnTrue() {
    let temp_dir = common::create_temp_dir().unwrap();
    let file_path = common::create_test_file(
        &temp_dir.path().to_path_buf(),
        "present.txt",
        "content",
    )
    .unwrap();

    assert!(FileManager::file_exists(&file_path));
    assert!(!FileManager::file_exists(temp_dir.path().join("absent.txt")));
    assert!(!FileManager::file_exists(temp_dir.path()));
}

/// Test directory creation including parents
#[test]
fn test_ensure_dir_withNestedPath_shouldCreateAllLevels() {
    let temp_dir = common::create_temp_dir().unwrap();
    let nested = temp_dir.path().join("a").join("b").join("c");

    FileManager::ensure_dir(&nested).unwrap();

    assert!(FileManager::dir_exists(&nested));
}

/// Test output path generation
#[test]
fn test_generate_output_path_withLanguagePair_shouldAppendExtension() {
    let path = FileManager::generate_output_path(PathBuf::from("out"), "eng-deu", "xml");

    assert_eq!(path, PathBuf::from("out").join("eng-deu.xml"));
}

/// Test write-then-read round trip with parent creation
#[test]
fn test_write_to_file_withMissingParent_shouldCreateAndWrite() {
    let temp_dir = common::create_temp_dir().unwrap();
    let file_path = temp_dir.path().join("sub").join("output.xml");

    FileManager::write_to_file(&file_path, "<dictionary/>").unwrap();

    let content = FileManager::read_to_string(&file_path).unwrap();
    assert_eq!(content, "<dictionary/>");
}

/// Test binary write-then-read round trip
#[test]
fn test_write_bytes_withBinaryContent_shouldRoundTrip() {
    let temp_dir = common::create_temp_dir().unwrap();
    let file_path = temp_dir.path().join("blob.bin");
    let payload = vec![0u8, 159, 146, 150];

    FileManager::write_bytes(&file_path, &payload).unwrap();

    let content = FileManager::read_to_bytes(&file_path).unwrap();
    assert_eq!(content, payload);
}

/// Test reading a missing file fails with context
#[test]
fn test_read_to_string_withMissingFile_shouldReturnError() {
    let result = FileManager::read_to_string("definitely-not-here.txt");
    assert!(result.is_err());
}
