//! Account identity and profile model.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::BadgeTone;

/// Validation errors returned by the identity newtypes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentityValidationError {
    #[error("account id must not be empty")]
    EmptyAccountId,
    #[error("account id must be a valid UUID")]
    InvalidAccountId,
    #[error("invalid email address")]
    InvalidEmail,
    #[error("full name is required")]
    EmptyFullName,
    #[error("role must be either candidate or employer")]
    UnknownRole,
}

/// Stable account identifier issued by the hosted auth service.
///
/// ## Invariants
/// - Holds a UUID in the spelling the service issued it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountId(String);

impl AccountId {
    /// Validate and construct an [`AccountId`] from borrowed input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, IdentityValidationError> {
        Self::from_owned(id.as_ref().to_owned())
    }

    /// Generate a new random [`AccountId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    fn from_owned(id: String) -> Result<Self, IdentityValidationError> {
        if id.is_empty() {
            return Err(IdentityValidationError::EmptyAccountId);
        }
        if id.trim() != id {
            return Err(IdentityValidationError::InvalidAccountId);
        }

        Uuid::parse_str(&id).map_err(|_| IdentityValidationError::InvalidAccountId)?;
        Ok(Self(id))
    }
}

impl AsRef<str> for AccountId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<AccountId> for String {
    fn from(value: AccountId) -> Self {
        value.0
    }
}

impl TryFrom<String> for AccountId {
    type Error = IdentityValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        let pattern = r"(?i)^[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}$";
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Email address used as the sign-in name.
///
/// ## Invariants
/// - Surrounding whitespace is trimmed and the address is lowercased.
/// - Matches `local@domain.tld` with a top-level domain of two or more
///   letters.
///
/// # Examples
/// ```
/// use jobboard::domain::EmailAddress;
///
/// let email = EmailAddress::new("  Ada@Example.COM ").expect("valid email");
/// assert_eq!(email.as_ref(), "ada@example.com");
/// assert!(EmailAddress::new("ada@example").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and normalise an email address.
    pub fn new(email: impl AsRef<str>) -> Result<Self, IdentityValidationError> {
        let trimmed = email.as_ref().trim();
        if !email_regex().is_match(trimmed) {
            return Err(IdentityValidationError::InvalidEmail);
        }
        Ok(Self(trimmed.to_lowercase()))
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = IdentityValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Human readable full name shown in the header and dashboards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FullName(String);

impl FullName {
    /// Validate a full name; surrounding whitespace is trimmed.
    pub fn new(full_name: impl AsRef<str>) -> Result<Self, IdentityValidationError> {
        let trimmed = full_name.as_ref().trim();
        if trimmed.is_empty() {
            return Err(IdentityValidationError::EmptyFullName);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for FullName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for FullName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<FullName> for String {
    fn from(value: FullName) -> Self {
        value.0
    }
}

impl TryFrom<String> for FullName {
    type Error = IdentityValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Account role chosen at sign-up.
///
/// The role is fixed for the lifetime of the account and selects which
/// dashboard the route guard allows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Candidate,
    Employer,
}

impl Role {
    /// Wire name of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Candidate => "candidate",
            Self::Employer => "employer",
        }
    }

    /// Display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Candidate => "Candidate",
            Self::Employer => "Employer",
        }
    }

    /// Badge tone for the role.
    #[must_use]
    pub const fn tone(self) -> BadgeTone {
        match self {
            Self::Candidate => BadgeTone::Blue,
            Self::Employer => BadgeTone::Purple,
        }
    }

    /// Path of the dashboard owned by this role.
    #[must_use]
    pub const fn dashboard_path(self) -> &'static str {
        match self {
            Self::Candidate => "/candidate/dashboard",
            Self::Employer => "/employer/dashboard",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = IdentityValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "candidate" => Ok(Self::Candidate),
            "employer" => Ok(Self::Employer),
            _ => Err(IdentityValidationError::UnknownRole),
        }
    }
}

/// The signed-in account.
///
/// ## Invariants
/// - `role` never changes after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    id: AccountId,
    email: EmailAddress,
    role: Role,
}

impl Identity {
    pub fn new(id: AccountId, email: EmailAddress, role: Role) -> Self {
        Self { id, email, role }
    }

    pub fn id(&self) -> &AccountId {
        &self.id
    }

    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    pub fn role(&self) -> Role {
        self.role
    }
}

/// Profile fields supplied when an account is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProfile {
    pub full_name: FullName,
    pub role: Role,
}

/// Descriptive data attached to an [`Identity`].
///
/// Edits happen outside this crate; the session store only holds the copy
/// loaded at sign-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub full_name: FullName,
    pub email: EmailAddress,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub education: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_url: Option<String>,
}

impl Profile {
    /// Minimal profile with only the sign-up fields populated.
    pub fn new(full_name: FullName, email: EmailAddress, role: Role) -> Self {
        Self {
            full_name,
            email,
            role,
            bio: None,
            skills: Vec::new(),
            experience: None,
            education: None,
            resume_url: None,
            linkedin_url: None,
            github_url: None,
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("ada@example.com")]
    #[case("first.last+tag@sub.example.co")]
    #[case("  UPPER@EXAMPLE.ORG  ")]
    fn accepts_well_formed_emails(#[case] raw: &str) {
        let email = EmailAddress::new(raw).expect("valid email");
        assert_eq!(email.as_ref(), raw.trim().to_lowercase());
    }

    #[rstest]
    #[case("")]
    #[case("ada")]
    #[case("ada@example")]
    #[case("ada@@example.com")]
    #[case("ada example@example.com")]
    #[case("ada@example.c")]
    fn rejects_malformed_emails(#[case] raw: &str) {
        assert_eq!(
            EmailAddress::new(raw),
            Err(IdentityValidationError::InvalidEmail)
        );
    }

    #[rstest]
    #[case("", IdentityValidationError::EmptyAccountId)]
    #[case("not-a-uuid", IdentityValidationError::InvalidAccountId)]
    #[case(" 3fa85f64-5717-4562-b3fc-2c963f66afa6", IdentityValidationError::InvalidAccountId)]
    fn rejects_invalid_account_ids(#[case] raw: &str, #[case] expected: IdentityValidationError) {
        assert_eq!(AccountId::new(raw), Err(expected));
    }

    #[test]
    fn account_id_round_trips_through_json() {
        let id = AccountId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("valid id");
        let json = serde_json::to_string(&id).expect("serialise");
        assert_eq!(json, "\"3fa85f64-5717-4562-b3fc-2c963f66afa6\"");
    }

    #[rstest]
    #[case(Role::Candidate, "/candidate/dashboard", BadgeTone::Blue)]
    #[case(Role::Employer, "/employer/dashboard", BadgeTone::Purple)]
    fn role_mappings_are_total(
        #[case] role: Role,
        #[case] dashboard: &str,
        #[case] tone: BadgeTone,
    ) {
        assert_eq!(role.dashboard_path(), dashboard);
        assert_eq!(role.tone(), tone);
        assert_eq!(role.as_str().parse::<Role>(), Ok(role));
    }

    #[test]
    fn unknown_role_is_rejected() {
        assert_eq!(
            "admin".parse::<Role>(),
            Err(IdentityValidationError::UnknownRole)
        );
    }

    #[test]
    fn blank_full_name_is_rejected() {
        assert_eq!(
            FullName::new("   "),
            Err(IdentityValidationError::EmptyFullName)
        );
    }
}
