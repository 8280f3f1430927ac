//! Domain primitives, services, and ports.
//!
//! Purpose: hold the session, route, and job listing rules independently of
//! any transport. Adapters live in [`crate::outbound`]; views consume the
//! services defined here through explicit context objects.
//!
//! Public surface:
//! - Error (alias to `error::DomainError`) with its stable `ErrorCode`.
//! - SessionStore: current identity, sign-up, sign-in, sign-out, observers.
//! - resolve: the route guard deciding which view a path renders.
//! - JobCatalogue: job listings with a built-in fallback, plus search.

pub mod applications;
pub mod auth;
pub mod badge;
pub mod error;
pub mod identity;
pub mod job_catalogue;
pub mod jobs;
pub mod ports;
pub mod routing;
pub mod session;
pub mod view_scope;

pub use self::applications::{Application, ApplicationStatus};
pub use self::auth::{
    AuthValidationError, PASSWORD_MIN_LENGTH, SignInCredentials, SignUpForm, SignUpRequest,
};
pub use self::badge::BadgeTone;
pub use self::error::{DomainError, DomainError as Error, DomainErrorValidationError, ErrorCode};
pub use self::identity::{
    AccountId, EmailAddress, FullName, Identity, IdentityValidationError, NewProfile, Profile,
    Role,
};
pub use self::job_catalogue::{FeedSource, JobCatalogue, JobFeed};
pub use self::jobs::{
    FEATURED_LIMIT, JobFilter, JobId, JobPosting, JobType, JobValidationError, filter_jobs,
};
pub use self::routing::{AuthQuery, Route, ViewDirective, resolve, resolve_location};
pub use self::session::{
    DEFAULT_REQUEST_TIMEOUT, SessionEvent, SessionState, SessionStore, Subscription,
};
pub use self::view_scope::ViewScope;

/// Result alias for fallible domain operations.
pub type DomainResult<T> = Result<T, Error>;
