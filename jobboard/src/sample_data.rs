//! Built-in sample postings mapped onto domain types.
//!
//! The `sample-jobs` crate owns the embedded catalogue; this module turns its
//! records into [`JobPosting`] values for the catalogue fallback and the
//! fixture job source.

use std::path::Path;

use sample_jobs::{CatalogueError, JobTypeSeed, SampleCatalogue, SamplePosting};

use crate::domain::{JobId, JobPosting, JobType, JobValidationError};

/// Errors raised while loading sample postings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SampleDataError {
    #[error(transparent)]
    Catalogue(#[from] CatalogueError),
    #[error("sample posting '{id}' is invalid: {source}")]
    InvalidPosting {
        id: String,
        #[source]
        source: JobValidationError,
    },
}

/// The embedded sample postings, in catalogue order.
///
/// # Examples
/// ```
/// use jobboard::sample_data::builtin_postings;
///
/// let postings = builtin_postings().expect("embedded catalogue is valid");
/// assert_eq!(postings.len(), 6);
/// assert_eq!(postings.iter().filter(|p| p.is_featured).count(), 3);
/// ```
pub fn builtin_postings() -> Result<Vec<JobPosting>, SampleDataError> {
    into_postings(SampleCatalogue::builtin()?)
}

/// Sample postings read from a catalogue file on disk.
pub fn postings_from_file(path: impl AsRef<Path>) -> Result<Vec<JobPosting>, SampleDataError> {
    into_postings(SampleCatalogue::from_file(path.as_ref())?)
}

fn into_postings(catalogue: SampleCatalogue) -> Result<Vec<JobPosting>, SampleDataError> {
    catalogue
        .into_postings()
        .into_iter()
        .map(to_posting)
        .collect()
}

fn to_posting(seed: SamplePosting) -> Result<JobPosting, SampleDataError> {
    let id = JobId::new(&seed.id).map_err(|source| SampleDataError::InvalidPosting {
        id: seed.id.clone(),
        source,
    })?;
    Ok(JobPosting {
        id,
        title: seed.title,
        company: seed.company,
        location: seed.location,
        job_type: job_type(seed.job_type),
        salary_range: seed.salary_range,
        description: seed.description,
        requirements: seed.requirements,
        benefits: seed.benefits,
        is_featured: seed.is_featured,
        employer_id: seed.employer_id,
        created_at: seed.created_at,
        updated_at: seed.updated_at,
    })
}

const fn job_type(seed: JobTypeSeed) -> JobType {
    match seed {
        JobTypeSeed::FullTime => JobType::FullTime,
        JobTypeSeed::PartTime => JobType::PartTime,
        JobTypeSeed::Contract => JobType::Contract,
        JobTypeSeed::Internship => JobType::Internship,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::JobFilter;
    use rstest::rstest;

    #[rstest]
    fn sample_postings_are_all_full_time() {
        let postings = builtin_postings().expect("sample data");
        assert_eq!(postings.len(), 6);
        assert!(postings.iter().all(|p| p.job_type == JobType::FullTime));
    }

    #[rstest]
    fn featured_filter_over_samples_is_newest_first() {
        let featured = JobFilter::featured().apply(builtin_postings().expect("sample data"));
        let titles: Vec<_> = featured.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(
            titles,
            vec!["Senior Frontend Developer", "UX/UI Designer", "Product Manager"]
        );
    }

    #[rstest]
    fn missing_file_reports_catalogue_error() {
        let err = postings_from_file("/nonexistent/sample_jobs.json").expect_err("missing file");
        assert!(matches!(
            err,
            SampleDataError::Catalogue(CatalogueError::Io { .. })
        ));
    }
}
