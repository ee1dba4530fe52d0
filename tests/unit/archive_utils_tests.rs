/*!
 * Tests for archive member extraction
 */

use teidict::archive_utils::ArchiveReader;
use teidict::errors::ArchiveError;
use crate::common;

/// Test extracting the first member matching a substring pattern
#[test]
fn test_extract_member_withMatchingMember_shouldReturnItsContent() {
    let temp_dir = common::create_temp_dir().unwrap();
    let archive_path = common::create_tar_gz_archive(
        &temp_dir.path().to_path_buf(),
        "eng-deu.src.tar.gz",
        &[
            ("eng-deu/README", "read me first"),
            ("eng-deu/eng-deu.tei", "<TEI>content</TEI>"),
        ],
    )
    .unwrap();

    let content = ArchiveReader::extract_member(&archive_path, ".tei").unwrap();

    assert_eq!(content, Some(b"<TEI>content</TEI>".to_vec()));
}

/// Test that the first match wins when several members qualify
#[test]
fn test_extract_member_withMultipleMatches_shouldReturnFirst() {
    let temp_dir = common::create_temp_dir().unwrap();
    let archive_path = common::create_tar_gz_archive(
        &temp_dir.path().to_path_buf(),
        "pair.tar.gz",
        &[
            ("pair/a.tei", "first"),
            ("pair/b.tei", "second"),
        ],
    )
    .unwrap();

    let content = ArchiveReader::extract_member(&archive_path, ".tei").unwrap();

    assert_eq!(content, Some(b"first".to_vec()));
}

/// Test the no-match case
#[test]
fn test_extract_member_withNoMatch_shouldReturnNone() {
    let temp_dir = common::create_temp_dir().unwrap();
    let archive_path = common::create_tar_gz_archive(
        &temp_dir.path().to_path_buf(),
        "pair.tar.gz",
        &[("pair/README", "nothing useful")],
    )
    .unwrap();

    let content = ArchiveReader::extract_member(&archive_path, ".tei").unwrap();

    assert!(content.is_none());
}

/// Test that the required variant turns a missing member into an error
#[test]
fn test_extract_required_member_withNoMatch_shouldReturnError() {
    let temp_dir = common::create_temp_dir().unwrap();
    let archive_path = common::create_tar_gz_archive(
        &temp_dir.path().to_path_buf(),
        "pair.tar.gz",
        &[("pair/README", "nothing useful")],
    )
    .unwrap();

    let result = ArchiveReader::extract_required_member(&archive_path, ".tei");

    assert!(matches!(result, Err(ArchiveError::MemberNotFound { .. })));
}

/// Test rejection of unknown archive formats
#[test]
fn test_extract_member_withUnknownExtension_shouldReturnUnsupportedFormat() {
    let temp_dir = common::create_temp_dir().unwrap();
    let file_path = common::create_test_file(
        &temp_dir.path().to_path_buf(),
        "pair.zip",
        "not a tarball",
    )
    .unwrap();

    let result = ArchiveReader::extract_member(&file_path, ".tei");

    assert!(matches!(result, Err(ArchiveError::UnsupportedFormat(_))));
}

/// Test that a missing archive surfaces as an I/O error
#[test]
fn test_extract_member_withMissingFile_shouldReturnIoError() {
    let result = ArchiveReader::extract_member("does-not-exist.tar.gz", ".tei");

    assert!(matches!(result, Err(ArchiveError::Io(_))));
}
