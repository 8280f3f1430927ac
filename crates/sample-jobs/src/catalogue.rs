//! Sample catalogue loading.
//!
//! The built-in catalogue is compiled into the crate from
//! `fixtures/sample_jobs.json`, so loading it never touches the filesystem.
//! Alternative catalogues can be read from disk for demos and tests.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::CatalogueError;
use crate::posting::SamplePosting;
use crate::validation::validate_postings;

/// Current supported catalogue version.
const SUPPORTED_VERSION: u32 = 1;

const BUILTIN_CATALOGUE: &str = include_str!("../fixtures/sample_jobs.json");

/// A validated set of sample postings in document order.
///
/// # Example
///
/// ```
/// use sample_jobs::SampleCatalogue;
///
/// let catalogue = SampleCatalogue::builtin().expect("valid catalogue");
/// let posting = catalogue.find("3").expect("posting 3 exists");
/// assert_eq!(posting.location, "Austin, TX");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleCatalogue {
    version: u32,
    postings: Vec<SamplePosting>,
}

impl SampleCatalogue {
    /// Loads the catalogue embedded in the crate.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogueError`] if the embedded document fails validation,
    /// which only happens when the fixture is edited incorrectly.
    pub fn builtin() -> Result<Self, CatalogueError> {
        Self::from_json(BUILTIN_CATALOGUE)
    }

    /// Parses a catalogue from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogueError`] if:
    /// - The JSON is malformed or misses required fields
    /// - The version is unsupported
    /// - Any posting breaks the catalogue rules
    pub fn from_json(json: &str) -> Result<Self, CatalogueError> {
        let raw: RawCatalogue = serde_json::from_str(json).map_err(|e| CatalogueError::Parse {
            message: e.to_string(),
        })?;

        if raw.version != SUPPORTED_VERSION {
            return Err(CatalogueError::UnsupportedVersion {
                expected: SUPPORTED_VERSION,
                actual: raw.version,
            });
        }

        validate_postings(&raw.postings)?;

        Ok(Self {
            version: raw.version,
            postings: raw.postings,
        })
    }

    /// Loads a catalogue from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogueError`] if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, CatalogueError> {
        let contents = fs::read_to_string(path).map_err(|e| CatalogueError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        Self::from_json(&contents)
    }

    /// Returns the catalogue version.
    #[must_use]
    pub const fn version(&self) -> u32 {
        self.version
    }

    /// Returns every posting in document order.
    #[must_use]
    pub fn postings(&self) -> &[SamplePosting] {
        &self.postings
    }

    /// Iterates over featured postings in document order.
    pub fn featured(&self) -> impl Iterator<Item = &SamplePosting> {
        self.postings.iter().filter(|posting| posting.is_featured)
    }

    /// Finds a posting by identifier.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&SamplePosting> {
        self.postings.iter().find(|posting| posting.id == id)
    }

    /// Consumes the catalogue and returns its postings.
    #[must_use]
    pub fn into_postings(self) -> Vec<SamplePosting> {
        self.postings
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawCatalogue {
    version: u32,
    postings: Vec<SamplePosting>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn builtin_catalogue_loads() {
        let catalogue = SampleCatalogue::builtin().expect("builtin catalogue");
        assert_eq!(catalogue.version(), SUPPORTED_VERSION);
        assert_eq!(catalogue.postings().len(), 6);
    }

    #[test]
    fn builtin_featured_set_is_stable() {
        let catalogue = SampleCatalogue::builtin().expect("builtin catalogue");
        let ids: Vec<&str> = catalogue.featured().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
    }

    #[rstest]
    #[case("not json")]
    #[case(r#"{"version": 1}"#)]
    #[case(r#"{"version": 1, "postings": [], "extra": true}"#)]
    fn malformed_documents_fail_parsing(#[case] json: &str) {
        let err = SampleCatalogue::from_json(json).expect_err("parse failure");
        assert!(matches!(err, CatalogueError::Parse { .. }), "got {err:?}");
    }

    #[test]
    fn unsupported_version_is_rejected() {
        let err = SampleCatalogue::from_json(r#"{"version": 2, "postings": []}"#)
            .expect_err("version mismatch");
        assert_eq!(
            err,
            CatalogueError::UnsupportedVersion {
                expected: 1,
                actual: 2
            }
        );
    }

    #[test]
    fn empty_postings_are_rejected() {
        let err = SampleCatalogue::from_json(r#"{"version": 1, "postings": []}"#)
            .expect_err("empty catalogue");
        assert_eq!(err, CatalogueError::Empty);
    }
}
