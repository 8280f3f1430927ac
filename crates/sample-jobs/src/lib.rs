//! Built-in sample job postings for the job board client.
//!
//! The catalogue is the deterministic fallback shown when the hosted job
//! service cannot be reached. It ships as a versioned JSON document embedded
//! in the crate and is validated on load. The types here are independent of
//! the `jobboard` domain so the client can map them without a circular
//! dependency.
//!
//! # Example
//!
//! ```
//! use sample_jobs::SampleCatalogue;
//!
//! let catalogue = SampleCatalogue::builtin().expect("embedded catalogue is valid");
//! assert!(!catalogue.postings().is_empty());
//! assert!(catalogue.featured().all(|posting| posting.is_featured));
//! ```

mod catalogue;
mod error;
mod posting;
mod validation;

pub use catalogue::SampleCatalogue;
pub use error::CatalogueError;
pub use posting::{JobTypeSeed, SamplePosting};
