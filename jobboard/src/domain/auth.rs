//! Sign-in and sign-up form validation.
//!
//! Keep form parsing out of the session store by exposing constructors that
//! validate raw string inputs before the store talks to the auth gateway.
//! Nothing here performs I/O, so a rejected form never reaches the network.

use serde_json::json;
use zeroize::Zeroizing;

use super::{DomainError, EmailAddress, FullName, IdentityValidationError, NewProfile, Role};

/// Minimum accepted password length, in characters.
pub const PASSWORD_MIN_LENGTH: usize = 6;

/// Reasons a sign-in or sign-up form is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthValidationError {
    #[error("full name is required")]
    EmptyFullName,
    #[error("invalid email address")]
    InvalidEmail,
    #[error("password is required")]
    EmptyPassword,
    #[error("password must be at least {min} characters")]
    PasswordTooShort { min: usize },
    #[error("passwords do not match")]
    PasswordMismatch,
}

impl AuthValidationError {
    /// Stable form field the error belongs to.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::EmptyFullName => "fullName",
            Self::InvalidEmail => "email",
            Self::EmptyPassword | Self::PasswordTooShort { .. } => "password",
            Self::PasswordMismatch => "confirmPassword",
        }
    }
}

impl From<IdentityValidationError> for AuthValidationError {
    fn from(value: IdentityValidationError) -> Self {
        match value {
            IdentityValidationError::EmptyFullName => Self::EmptyFullName,
            _ => Self::InvalidEmail,
        }
    }
}

impl From<AuthValidationError> for DomainError {
    fn from(value: AuthValidationError) -> Self {
        let field = value.field();
        DomainError::validation(value.to_string()).with_details(json!({ "field": field }))
    }
}

/// Validated sign-in credentials.
///
/// ## Invariants
/// - `email` is a normalised [`EmailAddress`].
/// - `password` is non-empty and retains caller-provided whitespace.
///
/// # Examples
/// ```
/// use jobboard::domain::SignInCredentials;
///
/// let creds = SignInCredentials::try_from_parts("Ada@Example.com", "secret").unwrap();
/// assert_eq!(creds.email().as_ref(), "ada@example.com");
/// assert_eq!(creds.password(), "secret");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignInCredentials {
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl SignInCredentials {
    /// Construct credentials from raw form inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, AuthValidationError> {
        let email = EmailAddress::new(email)?;
        if password.is_empty() {
            return Err(AuthValidationError::EmptyPassword);
        }
        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Raw sign-up form input as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignUpForm {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub role: Role,
}

/// Validated sign-up request.
///
/// ## Invariants
/// - `password` has at least [`PASSWORD_MIN_LENGTH`] characters and matched
///   its confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignUpRequest {
    email: EmailAddress,
    password: Zeroizing<String>,
    profile: NewProfile,
}

impl SignUpRequest {
    /// Validate a sign-up form.
    ///
    /// Field checks run in form order (full name, email, password), then the
    /// confirmation is compared.
    ///
    /// # Examples
    /// ```
    /// use jobboard::domain::{AuthValidationError, Role, SignUpForm, SignUpRequest};
    ///
    /// let form = SignUpForm {
    ///     full_name: "Ada Lovelace".into(),
    ///     email: "ada@example.com".into(),
    ///     password: "engine1".into(),
    ///     confirm_password: "engine2".into(),
    ///     role: Role::Candidate,
    /// };
    /// assert_eq!(
    ///     SignUpRequest::try_from_form(&form),
    ///     Err(AuthValidationError::PasswordMismatch)
    /// );
    /// ```
    pub fn try_from_form(form: &SignUpForm) -> Result<Self, AuthValidationError> {
        let full_name = FullName::new(&form.full_name)?;
        let email = EmailAddress::new(&form.email)?;
        if form.password.is_empty() {
            return Err(AuthValidationError::EmptyPassword);
        }
        if form.password.chars().count() < PASSWORD_MIN_LENGTH {
            return Err(AuthValidationError::PasswordTooShort {
                min: PASSWORD_MIN_LENGTH,
            });
        }
        if form.password != form.confirm_password {
            return Err(AuthValidationError::PasswordMismatch);
        }

        Ok(Self {
            email,
            password: Zeroizing::new(form.password.clone()),
            profile: NewProfile {
                full_name,
                role: form.role,
            },
        })
    }

    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }

    pub fn profile(&self) -> &NewProfile {
        &self.profile
    }
}
