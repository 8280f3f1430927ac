//! Reqwest-backed job source adapter.
//!
//! Translates [`JobQuery`] into a PostgREST read of the jobs table and
//! decodes the rows straight into domain postings.

use async_trait::async_trait;
use reqwest::{Method, StatusCode};

use super::{RestClient, status_message};
use crate::domain::JobPosting;
use crate::domain::ports::{JOBS_TABLE, JobQuery, JobSource, JobSourceError};

/// Job source reading `/rest/v1/jobs`.
pub struct RestJobSource {
    client: RestClient,
}

impl RestJobSource {
    pub fn new(client: RestClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl JobSource for RestJobSource {
    async fn query_jobs(&self, query: &JobQuery) -> Result<Vec<JobPosting>, JobSourceError> {
        let mut url = self.client.endpoint(&format!("/rest/v1/{JOBS_TABLE}"));
        url.query_pairs_mut().extend_pairs(query_pairs(query));

        let response = self
            .client
            .request(Method::GET, url, None)
            .send()
            .await
            .map_err(map_transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        parse_postings(body.as_ref())
    }
}

/// PostgREST query parameters for a jobs read, newest first.
fn query_pairs(query: &JobQuery) -> Vec<(&'static str, String)> {
    let mut pairs = vec![
        ("select", "*".to_owned()),
        ("order", "created_at.desc".to_owned()),
    ];
    if query.featured_only {
        pairs.push(("is_featured", "eq.true".to_owned()));
    }
    if let Some(id) = &query.id {
        pairs.push(("id", format!("eq.{id}")));
    }
    if let Some(limit) = query.limit {
        pairs.push(("limit", limit.to_string()));
    }
    pairs
}

fn parse_postings(body: &[u8]) -> Result<Vec<JobPosting>, JobSourceError> {
    serde_json::from_slice(body)
        .map_err(|error| JobSourceError::decode(format!("invalid jobs payload: {error}")))
}

fn map_transport_error(error: reqwest::Error) -> JobSourceError {
    if error.is_timeout() {
        JobSourceError::timeout(error.to_string())
    } else {
        JobSourceError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> JobSourceError {
    let message = status_message(status, body);
    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            JobSourceError::timeout(message)
        }
        _ => JobSourceError::service(status.as_u16(), message),
    }
}
