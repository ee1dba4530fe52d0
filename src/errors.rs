/*!
 * Error types for the teidict application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use thiserror::Error;

/// Errors that can occur while converting one TEI document
#[derive(Error, Debug)]
pub enum ConversionError {
    /// The raw input is not well-formed XML; fatal for the whole conversion
    #[error("Failed to parse TEI document: {0}")]
    Parse(String),

    /// An entry node has no headword; entry-scoped, the entry is skipped
    #[error("Entry {index} has no headword")]
    MissingTerm {
        /// Zero-based position of the entry in document order
        index: usize,
    },

    /// Rendering the output document failed
    #[error("Failed to serialize dictionary: {0}")]
    Serialize(String),
}

impl From<roxmltree::Error> for ConversionError {
    fn from(error: roxmltree::Error) -> Self {
        Self::Parse(error.to_string())
    }
}

/// Errors that can occur when working with dictionary source archives
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// No archive member matched the requested name pattern
    #[error("No member matching '{pattern}' found in archive")]
    MemberNotFound {
        /// Substring pattern the member name was matched against
        pattern: String,
    },

    /// The archive compression format is not supported
    #[error("Unsupported archive format: {0}")]
    UnsupportedFormat(String),

    /// Error downloading the archive
    #[error("Failed to download archive: {0}")]
    Download(String),

    /// Error reading the archive from disk
    #[error("Archive I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur when talking to the FreeDict catalog
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Error when making the catalog request fails
    #[error("Catalog request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing the catalog response fails
    #[error("Failed to parse catalog response: {0}")]
    ParseError(String),

    /// No dictionary in the catalog matched the requested language pair
    #[error("No dictionary found for language pair '{0}'")]
    DictionaryNotFound(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from a TEI conversion
    #[error("Conversion error: {0}")]
    Conversion(#[from] ConversionError),

    /// Error from archive handling
    #[error("Archive error: {0}")]
    Archive(#[from] ArchiveError),

    /// Error from the catalog
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
