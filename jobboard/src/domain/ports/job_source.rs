//! Port abstraction for reading job postings from the hosted data service.

use async_trait::async_trait;

use crate::domain::{JobFilter, JobId, JobPosting};

use super::define_port_error;

define_port_error! {
    /// Errors raised by job source adapters.
    pub enum JobSourceError {
        /// The service could not be reached.
        Transport { message: String } => Transport: "job service unavailable: {message}",
        /// The service did not answer in time.
        Timeout { message: String } => Timeout: "job service timed out: {message}",
        /// The service answered with a failure status.
        Service { status: u16, message: String } => Transport: "job service returned {status}: {message}",
        /// The response body did not have the expected shape.
        Decode { message: String } => Internal: "job service response could not be decoded: {message}",
    }
}

/// Name of the table postings are read from.
pub const JOBS_TABLE: &str = "jobs";

/// A read of the jobs table, always ordered by `created_at` descending.
///
/// # Examples
/// ```
/// use jobboard::domain::JobFilter;
/// use jobboard::domain::ports::JobQuery;
///
/// let query = JobQuery::from(JobFilter::featured());
/// assert!(query.featured_only);
/// assert_eq!(query.limit, Some(6));
/// assert!(query.id.is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobQuery {
    pub featured_only: bool,
    pub limit: Option<usize>,
    pub id: Option<JobId>,
}

impl JobQuery {
    /// Query for a single posting.
    pub fn by_id(id: JobId) -> Self {
        Self {
            featured_only: false,
            limit: Some(1),
            id: Some(id),
        }
    }

    /// The listing shape of this query, ignoring any id.
    pub fn filter(&self) -> JobFilter {
        JobFilter {
            featured_only: self.featured_only,
            limit: self.limit,
        }
    }

    /// Apply the query to an in-memory set of postings.
    pub fn apply(&self, postings: impl IntoIterator<Item = JobPosting>) -> Vec<JobPosting> {
        let id = self.id.as_ref();
        self.filter().apply(
            postings
                .into_iter()
                .filter(|posting| id.is_none_or(|wanted| &posting.id == wanted)),
        )
    }
}

impl From<JobFilter> for JobQuery {
    fn from(filter: JobFilter) -> Self {
        Self {
            featured_only: filter.featured_only,
            limit: filter.limit,
            id: None,
        }
    }
}

/// Port for reading the jobs table.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JobSource: Send + Sync {
    /// Run a query against the jobs table.
    ///
    /// Implementations return postings newest first and honour `limit`.
    async fn query_jobs(&self, query: &JobQuery) -> Result<Vec<JobPosting>, JobSourceError>;
}

/// In-memory job source for tests and offline use.
#[derive(Debug, Clone, Default)]
pub struct FixtureJobSource {
    postings: Vec<JobPosting>,
    failure: Option<JobSourceError>,
}

impl FixtureJobSource {
    pub fn new(postings: Vec<JobPosting>) -> Self {
        Self {
            postings,
            failure: None,
        }
    }

    /// A source whose every query fails with `error`.
    pub fn failing(error: JobSourceError) -> Self {
        Self {
            postings: Vec::new(),
            failure: Some(error),
        }
    }
}

#[async_trait]
impl JobSource for FixtureJobSource {
    async fn query_jobs(&self, query: &JobQuery) -> Result<Vec<JobPosting>, JobSourceError> {
        match &self.failure {
            Some(error) => Err(error.clone()),
            None => Ok(query.apply(self.postings.iter().cloned())),
        }
    }
}
