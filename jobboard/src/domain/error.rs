//! Domain-level error types.
//!
//! These errors are presentation agnostic. Views map them to form messages,
//! banners, or toasts; nothing here decides how a failure is displayed.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Stable machine-readable error code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Form input is malformed; the user can correct it and retry.
    Validation,
    /// Credentials were rejected.
    Authentication,
    /// The account already exists.
    Conflict,
    /// The hosted service could not be reached or answered with a failure.
    Transport,
    /// The hosted service did not answer within the request timeout.
    Timeout,
    /// Another sign-in or sign-up is still pending on the same session.
    Busy,
    /// An unexpected error occurred inside the client.
    Internal,
}

impl ErrorCode {
    /// Whether the failure came from the network boundary.
    ///
    /// Timeouts are a kind of transport failure.
    ///
    /// # Examples
    /// ```
    /// use jobboard::domain::ErrorCode;
    ///
    /// assert!(ErrorCode::Timeout.is_transport());
    /// assert!(!ErrorCode::Conflict.is_transport());
    /// ```
    #[must_use]
    pub const fn is_transport(self) -> bool {
        matches!(self, Self::Transport | Self::Timeout)
    }

    const fn fallback_message(self) -> &'static str {
        match self {
            Self::Validation => "invalid input",
            Self::Authentication => "invalid email or password",
            Self::Conflict => "an account with this email already exists",
            Self::Transport => "the job board service is unavailable",
            Self::Timeout => "the job board service did not respond in time",
            Self::Busy => "another sign-in is already in progress",
            Self::Internal => "something went wrong",
        }
    }
}

/// Domain error payload.
///
/// ## Invariants
/// - `message` is non-empty once trimmed of whitespace.
///
/// # Examples
/// ```
/// use jobboard::domain::{DomainError, ErrorCode};
///
/// let err = DomainError::new(ErrorCode::Conflict, "email taken");
/// assert_eq!(err.code(), ErrorCode::Conflict);
/// assert_eq!(err.message(), "email taken");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
#[serde(try_from = "DomainErrorDto", into = "DomainErrorDto")]
pub struct DomainError {
    code: ErrorCode,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

/// Validation errors emitted by the constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainErrorValidationError {
    /// The message was blank.
    #[error("error message must not be empty")]
    EmptyMessage,
}

impl DomainError {
    /// Create a new error.
    ///
    /// A blank message is replaced by the code's generic message so the
    /// non-empty invariant always holds.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::try_new(code, message).unwrap_or_else(|_| Self {
            code,
            message: code.fallback_message().to_owned(),
            details: None,
        })
    }

    /// Fallible constructor that validates the message content.
    pub fn try_new(
        code: ErrorCode,
        message: impl Into<String>,
    ) -> Result<Self, DomainErrorValidationError> {
        let message = message.into();
        if message.trim().is_empty() {
            return Err(DomainErrorValidationError::EmptyMessage);
        }
        Ok(Self {
            code,
            message,
            details: None,
        })
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message suitable for display.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Supplementary details, such as the offending form field.
    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Attach structured details to the error.
    ///
    /// # Examples
    /// ```
    /// use jobboard::domain::DomainError;
    /// use serde_json::json;
    ///
    /// let err = DomainError::validation("invalid email address")
    ///     .with_details(json!({ "field": "email" }));
    /// assert_eq!(err.details(), Some(&json!({ "field": "email" })));
    /// ```
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Convenience constructor for [`ErrorCode::Validation`].
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Validation, message)
    }

    /// The generic wrong-credentials error.
    ///
    /// The message never says which of email or password was wrong.
    pub fn invalid_credentials() -> Self {
        Self::new(
            ErrorCode::Authentication,
            ErrorCode::Authentication.fallback_message(),
        )
    }

    /// Convenience constructor for [`ErrorCode::Busy`].
    pub fn busy() -> Self {
        Self::new(ErrorCode::Busy, ErrorCode::Busy.fallback_message())
    }

    /// Convenience constructor for [`ErrorCode::Internal`].
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Internal, message)
    }
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for DomainError {}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DomainErrorDto {
    code: ErrorCode,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl From<DomainError> for DomainErrorDto {
    fn from(value: DomainError) -> Self {
        Self {
            code: value.code,
            message: value.message,
            details: value.details,
        }
    }
}

impl TryFrom<DomainErrorDto> for DomainError {
    type Error = DomainErrorValidationError;

    fn try_from(value: DomainErrorDto) -> Result<Self, Self::Error> {
        let DomainErrorDto {
            code,
            message,
            details,
        } = value;

        let mut error = DomainError::try_new(code, message)?;
        error.details = details;
        Ok(error)
    }
}
