//! Error types for the sample-jobs crate.
//!
//! Loading the catalogue either fails while decoding the JSON document or
//! while checking the decoded postings against the catalogue rules.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised when loading or validating a sample catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogueError {
    /// The catalogue file could not be read.
    #[error("failed to read catalogue file at '{path}': {message}")]
    Io {
        /// Path to the catalogue file.
        path: PathBuf,
        /// Description of the I/O error.
        message: String,
    },

    /// The catalogue JSON is malformed or missing required fields.
    #[error("invalid catalogue JSON: {message}")]
    Parse {
        /// Description of the parse error.
        message: String,
    },

    /// The catalogue version is not supported.
    #[error("unsupported catalogue version: expected {expected}, found {actual}")]
    UnsupportedVersion {
        /// Expected version number.
        expected: u32,
        /// Version found in the document.
        actual: u32,
    },

    /// The catalogue contains no postings.
    #[error("catalogue contains no postings")]
    Empty,

    /// Two postings share an identifier.
    #[error("duplicate posting id '{id}'")]
    DuplicateId {
        /// The repeated identifier.
        id: String,
    },

    /// A required text field is blank.
    #[error("posting at index {index} has a blank {field}")]
    BlankField {
        /// Index of the posting in the document.
        index: usize,
        /// Name of the blank field.
        field: &'static str,
    },

    /// A posting was updated before it was created.
    #[error("posting '{id}' has updatedAt earlier than createdAt")]
    UpdatedBeforeCreated {
        /// Identifier of the offending posting.
        id: String,
    },
}
