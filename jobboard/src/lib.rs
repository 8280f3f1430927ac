//! Job board client core.
//!
//! Owns who is signed in ([`domain::SessionStore`]), which view a path
//! resolves to ([`domain::routing::resolve`]), and how job postings are read
//! with a sample-data fallback ([`domain::JobCatalogue`]). Presentation code
//! consumes these through plain Rust APIs; the hosted data service sits behind
//! the ports in [`domain::ports`].

pub mod config;
pub mod domain;
pub mod outbound;
pub mod sample_data;
