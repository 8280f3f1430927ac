//! Job posting model, listing filters, and free-text search.

use std::cmp::Reverse;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::BadgeTone;

/// Number of postings shown in the home page's featured list.
pub const FEATURED_LIMIT: usize = 6;

/// Validation errors for job posting values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JobValidationError {
    #[error("job id must not be empty")]
    EmptyJobId,
    #[error("unknown job type: {value}")]
    UnknownJobType { value: String },
}

/// Identifier of a job posting.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct JobId(String);

impl JobId {
    /// Validate a job id; it must be non-blank and is stored trimmed.
    pub fn new(id: impl AsRef<str>) -> Result<Self, JobValidationError> {
        let trimmed = id.as_ref().trim();
        if trimmed.is_empty() {
            return Err(JobValidationError::EmptyJobId);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for JobId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<JobId> for String {
    fn from(value: JobId) -> Self {
        value.0
    }
}

impl TryFrom<String> for JobId {
    type Error = JobValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Employment type of a posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JobType {
    FullTime,
    PartTime,
    Contract,
    Internship,
}

impl JobType {
    /// Every job type, in the order the filter menu lists them.
    pub const ALL: [Self; 4] = [
        Self::FullTime,
        Self::PartTime,
        Self::Contract,
        Self::Internship,
    ];

    /// Wire name, as stored by the hosted service.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FullTime => "full-time",
            Self::PartTime => "part-time",
            Self::Contract => "contract",
            Self::Internship => "internship",
        }
    }

    /// Display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::FullTime => "Full-time",
            Self::PartTime => "Part-time",
            Self::Contract => "Contract",
            Self::Internship => "Internship",
        }
    }

    /// Badge tone.
    #[must_use]
    pub const fn tone(self) -> BadgeTone {
        match self {
            Self::FullTime => BadgeTone::Green,
            Self::PartTime => BadgeTone::Blue,
            Self::Contract => BadgeTone::Purple,
            Self::Internship => BadgeTone::Orange,
        }
    }
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobType {
    type Err = JobValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|job_type| job_type.as_str() == value)
            .ok_or_else(|| JobValidationError::UnknownJobType {
                value: value.to_owned(),
            })
    }
}

/// A single job listing. Read-only from the client's perspective.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobPosting {
    pub id: JobId,
    pub title: String,
    pub company: String,
    pub location: String,
    #[serde(rename = "type")]
    pub job_type: JobType,
    pub salary_range: String,
    pub description: String,
    pub requirements: Vec<String>,
    pub benefits: Vec<String>,
    pub is_featured: bool,
    pub employer_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl JobPosting {
    /// Salary text for display; empty ranges read as undisclosed.
    #[must_use]
    pub fn salary_display(&self) -> &str {
        if self.salary_range.trim().is_empty() {
            "Salary not disclosed"
        } else {
            self.salary_range.as_str()
        }
    }
}

/// Shape of a job listing request.
///
/// # Examples
/// ```
/// use jobboard::domain::JobFilter;
///
/// let home = JobFilter::featured();
/// assert!(home.featured_only);
/// assert_eq!(home.limit, Some(6));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JobFilter {
    pub featured_only: bool,
    pub limit: Option<usize>,
}

impl JobFilter {
    /// Every posting, newest first.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            featured_only: false,
            limit: None,
        }
    }

    /// The home page's featured list.
    #[must_use]
    pub const fn featured() -> Self {
        Self {
            featured_only: true,
            limit: Some(FEATURED_LIMIT),
        }
    }

    #[must_use]
    pub const fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Apply the filter to postings from any source.
    ///
    /// Keeps featured postings when requested, orders by `created_at`
    /// descending (ties keep their input order), then truncates to `limit`.
    #[must_use]
    pub fn apply(&self, postings: impl IntoIterator<Item = JobPosting>) -> Vec<JobPosting> {
        let mut selected: Vec<JobPosting> = postings
            .into_iter()
            .filter(|posting| !self.featured_only || posting.is_featured)
            .collect();
        selected.sort_by_key(|posting| Reverse(posting.created_at));
        if let Some(limit) = self.limit {
            selected.truncate(limit);
        }
        selected
    }
}

/// Free-text search over a listing.
///
/// `query` matches title, company, or description; `location` matches
/// location. Matching is a case-insensitive substring test on the term as
/// typed, surrounding whitespace included. Empty terms are ignored and both
/// terms must match when both are given. The input is left untouched.
///
/// # Examples
/// ```
/// # use jobboard::domain::filter_jobs;
/// let none: Vec<jobboard::domain::JobPosting> = Vec::new();
/// assert!(filter_jobs(&none, "rust", "Austin").is_empty());
/// ```
#[must_use]
pub fn filter_jobs(jobs: &[JobPosting], query: &str, location: &str) -> Vec<JobPosting> {
    let query = normalise_term(query);
    let location = normalise_term(location);

    jobs.iter()
        .filter(|job| {
            query.as_deref().is_none_or(|term| {
                contains_term(&job.title, term)
                    || contains_term(&job.company, term)
                    || contains_term(&job.description, term)
            })
        })
        .filter(|job| {
            location
                .as_deref()
                .is_none_or(|term| contains_term(&job.location, term))
        })
        .cloned()
        .collect()
}

fn normalise_term(term: &str) -> Option<String> {
    (!term.is_empty()).then(|| term.to_lowercase())
}

fn contains_term(haystack: &str, lowercase_term: &str) -> bool {
    haystack.to_lowercase().contains(lowercase_term)
}
