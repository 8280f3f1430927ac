//! Port abstraction for the hosted authentication service.
//!
//! The session store drives this port; adapters own the transport. Account
//! creation persists the profile row alongside the credentials so a later
//! sign-in can load it through [`AuthGateway::fetch_profile`].

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use zeroize::Zeroizing;

use crate::domain::{AccountId, Profile, SignInCredentials, SignUpRequest};

use super::define_port_error;

define_port_error! {
    /// Errors raised by auth gateway adapters.
    pub enum AuthGatewayError {
        /// Email and password did not match an account.
        InvalidCredentials => Authentication: "invalid email or password",
        /// The email is already registered.
        EmailTaken { email: String } => Conflict: "an account already exists for {email}",
        /// The service could not be reached or answered with a server error.
        Transport { message: String } => Transport: "auth service unavailable: {message}",
        /// The service did not answer in time.
        Timeout { message: String } => Timeout: "auth service timed out: {message}",
        /// The service refused the request for a reason the client cannot fix.
        Rejected { status: u16, message: String } => Internal: "auth service rejected the request ({status}): {message}",
        /// The account exists but has no profile row.
        ProfileMissing { id: String } => Internal: "no profile found for account {id}",
        /// The response body did not have the expected shape.
        Decode { message: String } => Internal: "auth service response could not be decoded: {message}",
    }
}

/// Port for account creation, authentication, and profile reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// Create an account and persist its profile fields.
    async fn create_account(&self, request: &SignUpRequest) -> Result<AccountId, AuthGatewayError>;

    /// Exchange credentials for the account they belong to.
    async fn authenticate(
        &self,
        credentials: &SignInCredentials,
    ) -> Result<AccountId, AuthGatewayError>;

    /// Load the profile stored for an account.
    async fn fetch_profile(&self, id: &AccountId) -> Result<Profile, AuthGatewayError>;

    /// End the account's server-side session.
    async fn revoke_session(&self, id: &AccountId) -> Result<(), AuthGatewayError>;
}

#[derive(Debug)]
struct FixtureAccount {
    id: AccountId,
    password: Zeroizing<String>,
    profile: Profile,
}

/// In-memory auth gateway for tests and offline use.
///
/// Accounts live for the lifetime of the value. Passwords are compared
/// verbatim; emails are already normalised by the request types.
///
/// # Examples
///
/// ```
/// # use jobboard::domain::ports::{AuthGateway, FixtureAuthGateway};
/// # use jobboard::domain::{FullName, EmailAddress, Profile, Role, SignInCredentials};
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// let email = EmailAddress::new("ada@example.com").unwrap();
/// let profile = Profile::new(FullName::new("Ada").unwrap(), email, Role::Employer);
/// let gateway = FixtureAuthGateway::default().with_account(profile, "engine");
///
/// let creds = SignInCredentials::try_from_parts("ada@example.com", "engine").unwrap();
/// let id = gateway.authenticate(&creds).await.unwrap();
/// assert_eq!(gateway.fetch_profile(&id).await.unwrap().role, Role::Employer);
/// # });
/// ```
#[derive(Debug, Default)]
pub struct FixtureAuthGateway {
    accounts: Mutex<HashMap<String, FixtureAccount>>,
    revocations: AtomicUsize,
}

impl FixtureAuthGateway {
    /// Seed an account with a random id.
    #[must_use]
    pub fn with_account(self, profile: Profile, password: &str) -> Self {
        self.insert(AccountId::random(), profile, password);
        self
    }

    /// Number of accounts currently registered.
    pub fn account_count(&self) -> usize {
        self.lock().len()
    }

    /// Number of successful `revoke_session` calls.
    pub fn revocations(&self) -> usize {
        self.revocations.load(Ordering::SeqCst)
    }

    fn insert(&self, id: AccountId, profile: Profile, password: &str) {
        let account = FixtureAccount {
            id,
            password: Zeroizing::new(password.to_owned()),
            profile,
        };
        self.lock()
            .insert(account.profile.email.as_ref().to_owned(), account);
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, FixtureAccount>> {
        self.accounts.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl AuthGateway for FixtureAuthGateway {
    async fn create_account(&self, request: &SignUpRequest) -> Result<AccountId, AuthGatewayError> {
        let email = request.email().as_ref();
        if self.lock().contains_key(email) {
            return Err(AuthGatewayError::email_taken(email));
        }
        let id = AccountId::random();
        let new_profile = request.profile();
        let profile = Profile::new(
            new_profile.full_name.clone(),
            request.email().clone(),
            new_profile.role,
        );
        self.insert(id.clone(), profile, request.password());
        Ok(id)
    }

    async fn authenticate(
        &self,
        credentials: &SignInCredentials,
    ) -> Result<AccountId, AuthGatewayError> {
        let accounts = self.lock();
        accounts
            .get(credentials.email().as_ref())
            .filter(|account| account.password.as_str() == credentials.password())
            .map(|account| account.id.clone())
            .ok_or(AuthGatewayError::InvalidCredentials)
    }

    async fn fetch_profile(&self, id: &AccountId) -> Result<Profile, AuthGatewayError> {
        self.lock()
            .values()
            .find(|account| &account.id == id)
            .map(|account| account.profile.clone())
            .ok_or_else(|| AuthGatewayError::profile_missing(id.as_ref()))
    }

    async fn revoke_session(&self, _id: &AccountId) -> Result<(), AuthGatewayError> {
        self.revocations.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::{DomainError, EmailAddress, ErrorCode, FullName, Role, SignUpForm};
    use rstest::{fixture, rstest};

    fn profile(email: &str) -> Profile {
        Profile::new(
            FullName::new("Ada Lovelace").expect("name"),
            EmailAddress::new(email).expect("email"),
            Role::Candidate,
        )
    }

    #[fixture]
    fn gateway() -> FixtureAuthGateway {
        FixtureAuthGateway::default().with_account(profile("ada@example.com"), "engine")
    }

    #[rstest]
    #[case("ada@example.com", "engine", true)]
    #[case("ADA@example.com", "engine", true)]
    #[case("ada@example.com", "Engine", false)]
    #[case("bob@example.com", "engine", false)]
    #[tokio::test]
    async fn fixture_authenticates_seeded_accounts(
        gateway: FixtureAuthGateway,
        #[case] email: &str,
        #[case] password: &str,
        #[case] should_succeed: bool,
    ) {
        let creds = SignInCredentials::try_from_parts(email, password).expect("credentials shape");
        match (should_succeed, gateway.authenticate(&creds).await) {
            (true, Ok(id)) => {
                let loaded = gateway.fetch_profile(&id).await.expect("profile");
                assert_eq!(loaded.email.as_ref(), "ada@example.com");
            }
            (false, Err(err)) => assert_eq!(err, AuthGatewayError::InvalidCredentials),
            (true, Err(err)) => panic!("expected success, got error: {err:?}"),
            (false, Ok(id)) => panic!("expected failure, got success: {id}"),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn duplicate_email_is_a_conflict(gateway: FixtureAuthGateway) {
        let form = SignUpForm {
            full_name: "Another Ada".to_owned(),
            email: "ada@example.com".to_owned(),
            password: "secret1".to_owned(),
            confirm_password: "secret1".to_owned(),
            role: Role::Employer,
        };
        let request = SignUpRequest::try_from_form(&form).expect("valid form");

        let err = gateway
            .create_account(&request)
            .await
            .expect_err("duplicate email");
        assert_eq!(err.code(), ErrorCode::Conflict);
        assert_eq!(gateway.account_count(), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn created_accounts_carry_their_profile(gateway: FixtureAuthGateway) {
        let form = SignUpForm {
            full_name: "Grace Hopper".to_owned(),
            email: "grace@example.com".to_owned(),
            password: "cobol!".to_owned(),
            confirm_password: "cobol!".to_owned(),
            role: Role::Employer,
        };
        let request = SignUpRequest::try_from_form(&form).expect("valid form");

        let id = gateway.create_account(&request).await.expect("created");
        let loaded = gateway.fetch_profile(&id).await.expect("profile");
        assert_eq!(loaded.full_name.as_ref(), "Grace Hopper");
        assert_eq!(loaded.role, Role::Employer);
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_account_has_no_profile(gateway: FixtureAuthGateway) {
        let err = gateway
            .fetch_profile(&AccountId::random())
            .await
            .expect_err("unknown id");
        assert!(matches!(err, AuthGatewayError::ProfileMissing { .. }));
    }

    #[rstest]
    #[case(AuthGatewayError::invalid_credentials(), ErrorCode::Authentication)]
    #[case(AuthGatewayError::email_taken("a@b.co"), ErrorCode::Conflict)]
    #[case(AuthGatewayError::transport("refused"), ErrorCode::Transport)]
    #[case(AuthGatewayError::timeout("10s"), ErrorCode::Timeout)]
    #[case(AuthGatewayError::rejected(403_u16, "nope"), ErrorCode::Internal)]
    #[case(AuthGatewayError::decode("eof"), ErrorCode::Internal)]
    fn gateway_errors_map_to_domain_codes(#[case] err: AuthGatewayError, #[case] code: ErrorCode) {
        let mapped: DomainError = err.into();
        assert_eq!(mapped.code(), code);
    }

    #[test]
    fn invalid_credentials_keeps_generic_message() {
        let mapped: DomainError = AuthGatewayError::InvalidCredentials.into();
        assert_eq!(mapped, DomainError::invalid_credentials());
    }
}
