//! DTOs for the hosted service's auth and table payloads.
//!
//! Requests are built from domain types; responses decode into these
//! transport DTOs first and are mapped into domain records in one pass.

use serde::{Deserialize, Serialize};

use crate::domain::{
    AccountId, EmailAddress, FullName, Profile, Role, SignInCredentials, SignUpRequest,
};

#[derive(Debug, Serialize)]
pub(super) struct SignUpBody<'a> {
    pub(super) email: &'a str,
    pub(super) password: &'a str,
    pub(super) data: SignUpMetadata<'a>,
}

#[derive(Debug, Serialize)]
pub(super) struct SignUpMetadata<'a> {
    pub(super) full_name: &'a str,
    pub(super) role: Role,
}

impl<'a> From<&'a SignUpRequest> for SignUpBody<'a> {
    fn from(request: &'a SignUpRequest) -> Self {
        Self {
            email: request.email().as_ref(),
            password: request.password(),
            data: SignUpMetadata {
                full_name: request.profile().full_name.as_ref(),
                role: request.profile().role,
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct PasswordGrantBody<'a> {
    pub(super) email: &'a str,
    pub(super) password: &'a str,
}

impl<'a> From<&'a SignInCredentials> for PasswordGrantBody<'a> {
    fn from(credentials: &'a SignInCredentials) -> Self {
        Self {
            email: credentials.email().as_ref(),
            password: credentials.password(),
        }
    }
}

/// Session or bare user returned by the signup and token endpoints.
///
/// Signup answers with a bare user when email confirmation is pending and
/// with a full session otherwise.
#[derive(Debug, Deserialize)]
pub(super) struct AuthResponseDto {
    pub(super) access_token: Option<String>,
    pub(super) user: Option<AuthUserDto>,
    pub(super) id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct AuthUserDto {
    pub(super) id: String,
    #[serde(default)]
    pub(super) email: Option<String>,
    #[serde(default)]
    pub(super) user_metadata: Option<UserMetadataDto>,
}

/// The `data` object sent at sign-up, echoed back on the auth user.
#[derive(Debug, Default, Deserialize)]
pub(super) struct UserMetadataDto {
    #[serde(default)]
    pub(super) full_name: Option<String>,
    #[serde(default)]
    pub(super) role: Option<String>,
}

impl AuthResponseDto {
    pub(super) fn account_id(&self) -> Result<AccountId, String> {
        let raw = self
            .user
            .as_ref()
            .map(|user| user.id.as_str())
            .or(self.id.as_deref())
            .ok_or_else(|| "response carries no user id".to_owned())?;
        AccountId::new(raw).map_err(|err| format!("invalid user id '{raw}': {err}"))
    }

    /// Profile rebuilt from the sign-up metadata on the auth user, if
    /// complete.
    pub(super) fn metadata_profile(&self) -> Option<Profile> {
        let user = self.user.as_ref()?;
        let metadata = user.user_metadata.as_ref()?;
        let full_name = FullName::new(metadata.full_name.as_deref()?).ok()?;
        let email = EmailAddress::new(user.email.as_deref()?).ok()?;
        let role = metadata.role.as_deref()?.parse::<Role>().ok()?;
        Some(Profile::new(full_name, email, role))
    }
}

/// Row of the `users` table.
#[derive(Debug, Serialize, Deserialize)]
pub(super) struct UserRowDto {
    pub(super) id: String,
    pub(super) email: String,
    pub(super) full_name: String,
    pub(super) role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(super) bio: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub(super) skills: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(super) experience: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(super) education: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(super) resume_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(super) linkedin_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(super) github_url: Option<String>,
}

impl UserRowDto {
    pub(super) fn new_account(id: &AccountId, request: &SignUpRequest) -> Self {
        Self {
            id: id.as_ref().to_owned(),
            email: request.email().as_ref().to_owned(),
            full_name: request.profile().full_name.as_ref().to_owned(),
            role: request.profile().role,
            bio: None,
            skills: Vec::new(),
            experience: None,
            education: None,
            resume_url: None,
            linkedin_url: None,
            github_url: None,
        }
    }

    pub(super) fn into_profile(self) -> Result<Profile, String> {
        let full_name = FullName::new(&self.full_name)
            .map_err(|err| format!("user {}: {err}", self.id))?;
        let email =
            EmailAddress::new(&self.email).map_err(|err| format!("user {}: {err}", self.id))?;
        let mut profile = Profile::new(full_name, email, self.role);
        profile.bio = self.bio;
        profile.skills = self.skills;
        profile.experience = self.experience;
        profile.education = self.education;
        profile.resume_url = self.resume_url;
        profile.linkedin_url = self.linkedin_url;
        profile.github_url = self.github_url;
        Ok(profile)
    }
}
