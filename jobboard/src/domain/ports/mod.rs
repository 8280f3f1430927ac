//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod auth_gateway;
mod job_source;

#[cfg(test)]
pub use auth_gateway::MockAuthGateway;
pub use auth_gateway::{AuthGateway, AuthGatewayError, FixtureAuthGateway};
#[cfg(test)]
pub use job_source::MockJobSource;
pub use job_source::{FixtureJobSource, JOBS_TABLE, JobQuery, JobSource, JobSourceError};
