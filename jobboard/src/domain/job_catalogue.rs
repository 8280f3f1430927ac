//! Job listing facade with a built-in fallback.
//!
//! Reads go through the [`JobSource`] port. When the source fails or times
//! out the catalogue answers from its fallback postings instead, logs one
//! warning, and never hands the error to the caller.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::warn;

use super::ports::{JobQuery, JobSource, JobSourceError};
use super::session::DEFAULT_REQUEST_TIMEOUT;
use super::{JobFilter, JobId, JobPosting, filter_jobs};

/// Where a listing came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedSource {
    Live,
    Fallback,
}

/// A listing together with its origin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobFeed {
    pub postings: Vec<JobPosting>,
    pub source: FeedSource,
}

/// Reads job postings for the listing, home, and detail pages.
pub struct JobCatalogue<S> {
    source: Arc<S>,
    fallback: Arc<[JobPosting]>,
    request_timeout: Duration,
}

impl<S> Clone for JobCatalogue<S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            fallback: Arc::clone(&self.fallback),
            request_timeout: self.request_timeout,
        }
    }
}

impl<S> JobCatalogue<S>
where
    S: JobSource,
{
    pub fn new(source: Arc<S>, fallback: Vec<JobPosting>) -> Self {
        Self {
            source,
            fallback: fallback.into(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    /// Postings matching `filter`, newest first.
    pub async fn list_jobs(&self, filter: JobFilter) -> Vec<JobPosting> {
        self.list_jobs_with_source(filter).await.postings
    }

    /// Like [`Self::list_jobs`], also reporting whether the fallback was used.
    ///
    /// An empty successful response is returned as-is; only failures fall
    /// back.
    pub async fn list_jobs_with_source(&self, filter: JobFilter) -> JobFeed {
        match self.fetch(&JobQuery::from(filter)).await {
            Ok(postings) => JobFeed {
                postings: filter.apply(postings),
                source: FeedSource::Live,
            },
            Err(err) => {
                warn!(error = %err, code = ?err.code(), "job source failed; serving sample postings");
                JobFeed {
                    postings: filter.apply(self.fallback.iter().cloned()),
                    source: FeedSource::Fallback,
                }
            }
        }
    }

    /// One posting by id, for the detail page.
    pub async fn find_job(&self, id: &JobId) -> Option<JobPosting> {
        match self.fetch(&JobQuery::by_id(id.clone())).await {
            Ok(postings) => postings.into_iter().find(|posting| &posting.id == id),
            Err(err) => {
                warn!(job_id = %id, error = %err, "job source failed; looking up sample postings");
                self.fallback
                    .iter()
                    .find(|posting| &posting.id == id)
                    .cloned()
            }
        }
    }

    /// Free-text search over an already loaded listing. See [`filter_jobs`].
    pub fn filter(&self, jobs: &[JobPosting], query: &str, location: &str) -> Vec<JobPosting> {
        filter_jobs(jobs, query, location)
    }

    async fn fetch(&self, query: &JobQuery) -> Result<Vec<JobPosting>, JobSourceError> {
        tokio::time::timeout(self.request_timeout, self.source.query_jobs(query))
            .await
            .unwrap_or_else(|_| {
                Err(JobSourceError::timeout(format!(
                    "no response within {:?}",
                    self.request_timeout
                )))
            })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ports::{FixtureJobSource, MockJobSource};
    use crate::sample_data::builtin_postings;
    use async_trait::async_trait;
    use rstest::rstest;

    fn catalogue<S: JobSource>(source: S) -> JobCatalogue<S> {
        JobCatalogue::new(Arc::new(source), builtin_postings().expect("sample data"))
    }

    fn ids(jobs: &[JobPosting]) -> Vec<&str> {
        jobs.iter().map(|job| job.id.as_ref()).collect()
    }

    fn failing(err: JobSourceError) -> MockJobSource {
        let mut source = MockJobSource::new();
        source
            .expect_query_jobs()
            .times(1)
            .return_once(move |_| Err(err));
        source
    }

    #[rstest]
    #[case(JobSourceError::transport("connection refused"))]
    #[case(JobSourceError::service(500_u16, "boom"))]
    #[case(JobSourceError::decode("expected array"))]
    #[tokio::test]
    async fn failing_source_serves_featured_sample_postings(#[case] err: JobSourceError) {
        let feed = catalogue(failing(err))
            .list_jobs_with_source(JobFilter::featured())
            .await;

        assert_eq!(feed.source, FeedSource::Fallback);
        assert_eq!(ids(&feed.postings), vec!["1", "2", "3"]);
        assert!(
            feed.postings
                .windows(2)
                .all(|pair| pair[0].created_at >= pair[1].created_at)
        );
    }

    #[tokio::test]
    async fn fallback_honours_limit() {
        let jobs = catalogue(failing(JobSourceError::transport("down")))
            .list_jobs(JobFilter::all().with_limit(4))
            .await;
        assert_eq!(ids(&jobs), vec!["1", "2", "3", "4"]);
    }

    #[tokio::test]
    async fn live_results_are_passed_through_in_order() {
        let mut live = builtin_postings().expect("sample data");
        live.reverse();
        let mut source = MockJobSource::new();
        source
            .expect_query_jobs()
            .withf(|query| query.featured_only && query.limit == Some(6))
            .times(1)
            .return_once(move |_| Ok(live));

        let feed = catalogue(source)
            .list_jobs_with_source(JobFilter::featured())
            .await;

        assert_eq!(feed.source, FeedSource::Live);
        assert_eq!(ids(&feed.postings), vec!["1", "2", "3"]);
    }

    #[tokio::test]
    async fn empty_live_result_is_not_replaced() {
        let feed = catalogue(FixtureJobSource::default())
            .list_jobs_with_source(JobFilter::all())
            .await;
        assert_eq!(feed.source, FeedSource::Live);
        assert!(feed.postings.is_empty());
    }

    struct HangingSource;

    #[async_trait]
    impl JobSource for HangingSource {
        async fn query_jobs(&self, _query: &JobQuery) -> Result<Vec<JobPosting>, JobSourceError> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn slow_source_times_out_into_fallback() {
        let feed = catalogue(HangingSource)
            .with_timeout(Duration::from_millis(20))
            .list_jobs_with_source(JobFilter::featured())
            .await;
        assert_eq!(feed.source, FeedSource::Fallback);
        assert_eq!(feed.postings.len(), 3);
    }

    #[tokio::test]
    async fn find_job_falls_back_on_failure() {
        let id = JobId::new("5").expect("id");
        let job = catalogue(failing(JobSourceError::timeout("10s")))
            .find_job(&id)
            .await
            .expect("sample posting");
        assert_eq!(job.title, "Data Scientist");
    }

    #[tokio::test]
    async fn find_job_reports_missing_live_posting() {
        let id = JobId::new("99").expect("id");
        assert_eq!(catalogue(FixtureJobSource::default()).find_job(&id).await, None);
    }

    #[test]
    fn filter_delegates_to_search() {
        let jobs = builtin_postings().expect("sample data");
        let catalogue = catalogue(FixtureJobSource::default());
        assert_eq!(ids(&catalogue.filter(&jobs, "", "austin")), vec!["3"]);
        assert_eq!(ids(&catalogue.filter(&jobs, "ENGINEER", "")), vec!["4", "6"]);
    }
}
