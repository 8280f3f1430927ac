//! Route guard: decides which view a requested path renders.
//!
//! [`resolve`] is a pure function of the requested path, the session state,
//! and the query string. It never reads the session store directly; callers
//! pass a [`SessionState`] snapshot.

use std::fmt;

use url::form_urlencoded;

use super::{JobId, Role, SessionState};

pub const HOME_PATH: &str = "/";
pub const JOBS_PATH: &str = "/jobs";
pub const AUTH_PATH: &str = "/auth";

/// Query parameter carrying the path to return to after signing in.
pub const REDIRECT_PARAM: &str = "redirect";

/// Known application routes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Jobs,
    JobDetail(JobId),
    Auth,
    Dashboard(Role),
    Other(String),
}

impl Route {
    /// Parse a path without query or fragment.
    ///
    /// Trailing slashes are ignored and route segments match ignoring ASCII
    /// case. Job ids keep their case.
    ///
    /// # Examples
    /// ```
    /// use jobboard::domain::{Role, Route};
    ///
    /// assert_eq!(Route::parse("/employer/dashboard/"), Route::Dashboard(Role::Employer));
    /// assert_eq!(Route::parse("/Candidate/Dashboard"), Route::Dashboard(Role::Candidate));
    /// assert_eq!(Route::parse("/Jobs/42").path(), "/jobs/42");
    /// ```
    pub fn parse(path: &str) -> Self {
        const JOB_PREFIX: &str = "/jobs/";

        let path = normalise_path(path);
        match path.to_ascii_lowercase().as_str() {
            HOME_PATH => Self::Home,
            JOBS_PATH => Self::Jobs,
            AUTH_PATH => Self::Auth,
            "/candidate/dashboard" => Self::Dashboard(Role::Candidate),
            "/employer/dashboard" => Self::Dashboard(Role::Employer),
            _ => path
                .get(..JOB_PREFIX.len())
                .filter(|prefix| prefix.eq_ignore_ascii_case(JOB_PREFIX))
                .and_then(|_| path.get(JOB_PREFIX.len()..))
                .filter(|id| !id.contains('/'))
                .and_then(|id| JobId::new(id).ok())
                .map_or_else(|| Self::Other(path.clone()), Self::JobDetail),
        }
    }

    /// Canonical path for the route.
    pub fn path(&self) -> String {
        match self {
            Self::Home => HOME_PATH.to_owned(),
            Self::Jobs => JOBS_PATH.to_owned(),
            Self::JobDetail(id) => format!("{JOBS_PATH}/{id}"),
            Self::Auth => AUTH_PATH.to_owned(),
            Self::Dashboard(role) => role.dashboard_path().to_owned(),
            Self::Other(path) => path.clone(),
        }
    }

    /// Whether the route needs a signed-in account.
    pub fn requires_session(&self) -> bool {
        matches!(self, Self::Dashboard(_))
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Parameters understood by the auth page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthQuery {
    /// `signup=true` opens the sign-up form instead of sign-in.
    pub sign_up: bool,
    /// Role preselected on the sign-up form.
    pub role: Role,
    /// Local path to continue to after authenticating.
    pub redirect: Option<String>,
}

impl AuthQuery {
    /// Parse a query string, with or without its leading `?`.
    ///
    /// Unknown roles fall back to the default; a `redirect` that is not a
    /// local path is dropped.
    ///
    /// # Examples
    /// ```
    /// use jobboard::domain::{AuthQuery, Role};
    ///
    /// let query = AuthQuery::parse("?signup=true&role=employer&redirect=%2Fjobs%2F3");
    /// assert!(query.sign_up);
    /// assert_eq!(query.role, Role::Employer);
    /// assert_eq!(query.redirect.as_deref(), Some("/jobs/3"));
    ///
    /// assert_eq!(AuthQuery::parse("redirect=https://evil.test").redirect, None);
    /// ```
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut parsed = Self::default();
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "signup" => parsed.sign_up = value == "true",
                "role" => parsed.role = value.parse().unwrap_or_default(),
                REDIRECT_PARAM => {
                    parsed.redirect = Some(value.into_owned()).filter(|path| is_local_path(path));
                }
                _ => {}
            }
        }
        parsed
    }
}

/// What a view host should do with a navigation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewDirective {
    Render(String),
    Redirect {
        to: String,
        return_to: Option<String>,
    },
}

impl ViewDirective {
    fn redirect(to: impl Into<String>) -> Self {
        Self::Redirect {
            to: to.into(),
            return_to: None,
        }
    }

    /// Location to navigate to, with any return path as a query parameter.
    ///
    /// # Examples
    /// ```
    /// use jobboard::domain::ViewDirective;
    ///
    /// let directive = ViewDirective::Redirect {
    ///     to: "/auth".into(),
    ///     return_to: Some("/candidate/dashboard".into()),
    /// };
    /// assert_eq!(directive.to_location(), "/auth?redirect=%2Fcandidate%2Fdashboard");
    /// ```
    pub fn to_location(&self) -> String {
        match self {
            Self::Render(path) => path.clone(),
            Self::Redirect {
                to,
                return_to: None,
            } => to.clone(),
            Self::Redirect {
                to,
                return_to: Some(return_to),
            } => {
                let query = form_urlencoded::Serializer::new(String::new())
                    .append_pair(REDIRECT_PARAM, return_to)
                    .finish();
                format!("{to}?{query}")
            }
        }
    }
}

/// Decide the view for `requested_path`.
///
/// - A dashboard while signed out redirects to the auth page and remembers
///   the requested path.
/// - The other role's dashboard redirects to the account's own dashboard.
/// - The auth page while signed in redirects to the `redirect` query
///   parameter, or home.
/// - Anything else renders.
pub fn resolve(requested_path: &str, session: &SessionState, query: Option<&str>) -> ViewDirective {
    let route = Route::parse(requested_path);
    match (&route, session.role()) {
        (_, None) if route.requires_session() => ViewDirective::Redirect {
            to: AUTH_PATH.to_owned(),
            return_to: Some(route.path()),
        },
        (Route::Dashboard(wanted), Some(own)) if *wanted != own => {
            ViewDirective::redirect(own.dashboard_path())
        }
        (Route::Auth, Some(own)) => {
            let target = query
                .map(AuthQuery::parse)
                .and_then(|parsed| parsed.redirect)
                .map_or(Route::Home, |path| Route::parse(&path));
            ViewDirective::redirect(return_target(target, own))
        }
        _ => ViewDirective::Render(route.path()),
    }
}

/// [`resolve`] for a full location such as `/auth?redirect=%2Fjobs`.
pub fn resolve_location(location: &str, session: &SessionState) -> ViewDirective {
    let without_fragment = location.split('#').next().unwrap_or_default();
    match without_fragment.split_once('?') {
        Some((path, query)) => resolve(path, session, Some(query)),
        None => resolve(without_fragment, session, None),
    }
}

/// Where a signed-in account lands when leaving the auth page.
fn return_target(target: Route, own: Role) -> String {
    match target {
        Route::Auth => HOME_PATH.to_owned(),
        Route::Dashboard(role) if role != own => own.dashboard_path().to_owned(),
        other => other.path(),
    }
}

fn normalise_path(path: &str) -> String {
    let trimmed = path.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        HOME_PATH.to_owned()
    } else if trimmed.starts_with('/') {
        trimmed.to_owned()
    } else {
        format!("/{trimmed}")
    }
}

/// Same-origin path check for return targets.
fn is_local_path(path: &str) -> bool {
    path.starts_with('/') && !path.starts_with("//") && !path.starts_with("/\\")
}
