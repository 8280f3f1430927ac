//! Sample posting record types.
//!
//! These mirror the client's job posting shape without depending on it. The
//! client converts them into domain postings at the point of use.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Employment type of a sample posting.
///
/// Mirrors the client's `JobType` enum without creating a dependency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JobTypeSeed {
    /// Permanent full-time role.
    FullTime,
    /// Part-time role.
    PartTime,
    /// Fixed-term contract.
    Contract,
    /// Internship or placement.
    Internship,
}

/// A single built-in job posting.
///
/// # Example
///
/// ```
/// use sample_jobs::{JobTypeSeed, SamplePosting};
///
/// let json = r#"{
///     "id": "7",
///     "title": "QA Analyst",
///     "company": "TestHouse",
///     "location": "Remote",
///     "type": "internship",
///     "salaryRange": "",
///     "description": "Own the regression suite.",
///     "requirements": [],
///     "benefits": [],
///     "isFeatured": false,
///     "employerId": "7",
///     "createdAt": "2024-02-01T00:00:00Z",
///     "updatedAt": "2024-02-01T00:00:00Z"
/// }"#;
///
/// let posting: SamplePosting = serde_json::from_str(json).expect("valid posting");
/// assert_eq!(posting.job_type, JobTypeSeed::Internship);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SamplePosting {
    /// Posting identifier, unique within the catalogue.
    pub id: String,
    /// Job title.
    pub title: String,
    /// Hiring company name.
    pub company: String,
    /// Free-form location, usually "City, ST".
    pub location: String,
    /// Employment type.
    #[serde(rename = "type")]
    pub job_type: JobTypeSeed,
    /// Display salary range; may be empty when undisclosed.
    pub salary_range: String,
    /// Long description.
    pub description: String,
    /// Ordered list of required skills.
    pub requirements: Vec<String>,
    /// Ordered list of benefits.
    pub benefits: Vec<String>,
    /// Whether the posting appears in the featured list.
    pub is_featured: bool,
    /// Identifier of the employer account that owns the posting.
    pub employer_id: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(JobTypeSeed::FullTime, "\"full-time\"")]
    #[case(JobTypeSeed::PartTime, "\"part-time\"")]
    #[case(JobTypeSeed::Contract, "\"contract\"")]
    #[case(JobTypeSeed::Internship, "\"internship\"")]
    fn job_type_seed_uses_kebab_case(#[case] seed: JobTypeSeed, #[case] expected: &str) {
        let encoded = serde_json::to_string(&seed).expect("serialize");
        assert_eq!(encoded, expected);
    }

    #[test]
    fn unknown_job_type_is_rejected() {
        let result: Result<JobTypeSeed, _> = serde_json::from_str("\"freelance\"");
        assert!(result.is_err());
    }
}
