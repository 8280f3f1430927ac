//! Reqwest-backed auth gateway adapter.
//!
//! This adapter owns transport details only: request bodies, bearer tokens,
//! HTTP error mapping, and JSON decoding into domain accounts and profiles.
//!
//! Sign-up is two writes: the auth account, then the `users` row. When the
//! row write fails the account still exists, so the profile sent at sign-up
//! is kept and served by `fetch_profile` while the row is missing. Sign-in
//! keeps the profile echoed in the auth user's metadata the same way.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use zeroize::Zeroizing;

use super::RestClient;
use super::dto::{AuthResponseDto, PasswordGrantBody, SignUpBody, UserRowDto};
use super::status_message;
use crate::domain::ports::{AuthGateway, AuthGatewayError};
use crate::domain::{AccountId, Profile, SignInCredentials, SignUpRequest};

const SIGNUP_PATH: &str = "/auth/v1/signup";
const TOKEN_PATH: &str = "/auth/v1/token";
const LOGOUT_PATH: &str = "/auth/v1/logout";
const USERS_PATH: &str = "/rest/v1/users";

/// Which auth call a status belongs to; the same status means different
/// things on different endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AuthCall {
    SignUp,
    Token,
    Other,
}

/// Auth gateway talking to the hosted service's `/auth/v1` API.
///
/// Access tokens issued at sign-up or sign-in are kept per account so the
/// profile row can be written and the session revoked on the user's behalf.
/// A newer token for the same account replaces the older one.
pub struct RestAuthGateway {
    client: RestClient,
    tokens: Mutex<HashMap<AccountId, Zeroizing<String>>>,
    known_profiles: Mutex<HashMap<AccountId, Profile>>,
}

impl RestAuthGateway {
    pub fn new(client: RestClient) -> Self {
        Self {
            client,
            tokens: Mutex::new(HashMap::new()),
            known_profiles: Mutex::new(HashMap::new()),
        }
    }

    fn tokens(&self) -> MutexGuard<'_, HashMap<AccountId, Zeroizing<String>>> {
        self.tokens.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn known_profiles(&self) -> MutexGuard<'_, HashMap<AccountId, Profile>> {
        self.known_profiles
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn token_for(&self, id: &AccountId) -> Option<Zeroizing<String>> {
        self.tokens().get(id).cloned()
    }

    fn remember(&self, id: &AccountId, response: &AuthResponseDto) {
        if let Some(token) = &response.access_token {
            self.tokens()
                .insert(id.clone(), Zeroizing::new(token.clone()));
        }
    }

    async fn send_json<B, T>(
        &self,
        call: AuthCall,
        method: Method,
        url: reqwest::Url,
        bearer: Option<&str>,
        body: Option<&B>,
    ) -> Result<T, AuthGatewayError>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let bytes = self.send(call, method, url, bearer, body).await?;
        serde_json::from_slice(&bytes).map_err(|err| AuthGatewayError::decode(err.to_string()))
    }

    async fn send<B>(
        &self,
        call: AuthCall,
        method: Method,
        url: reqwest::Url,
        bearer: Option<&str>,
        body: Option<&B>,
    ) -> Result<Vec<u8>, AuthGatewayError>
    where
        B: Serialize + Sync + ?Sized,
    {
        let mut request = self.client.request(method, url, bearer);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await.map_err(map_transport_error)?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(call, status, bytes.as_ref()));
        }
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl AuthGateway for RestAuthGateway {
    async fn create_account(&self, request: &SignUpRequest) -> Result<AccountId, AuthGatewayError> {
        let response: AuthResponseDto = self
            .send_json(
                AuthCall::SignUp,
                Method::POST,
                self.client.endpoint(SIGNUP_PATH),
                None,
                Some(&SignUpBody::from(request)),
            )
            .await
            .map_err(|err| match err {
                AuthGatewayError::EmailTaken { .. } => {
                    AuthGatewayError::email_taken(request.email().as_ref())
                }
                other => other,
            })?;
        let id = response.account_id().map_err(AuthGatewayError::decode)?;
        self.remember(&id, &response);
        let new_profile = request.profile();
        self.known_profiles().insert(
            id.clone(),
            Profile::new(
                new_profile.full_name.clone(),
                request.email().clone(),
                new_profile.role,
            ),
        );

        let token = self.token_for(&id);
        let row = UserRowDto::new_account(&id, request);
        if let Err(err) = self
            .send(
                AuthCall::Other,
                Method::POST,
                self.client.endpoint(USERS_PATH),
                token.as_deref().map(String::as_str),
                Some(&row),
            )
            .await
        {
            warn!(account_id = %id, error = %err, "profile row not written; serving sign-up profile");
        }
        debug!(account_id = %id, "account created");
        Ok(id)
    }

    async fn authenticate(
        &self,
        credentials: &SignInCredentials,
    ) -> Result<AccountId, AuthGatewayError> {
        let mut url = self.client.endpoint(TOKEN_PATH);
        url.query_pairs_mut().append_pair("grant_type", "password");
        let response: AuthResponseDto = self
            .send_json(
                AuthCall::Token,
                Method::POST,
                url,
                None,
                Some(&PasswordGrantBody::from(credentials)),
            )
            .await?;
        let id = response.account_id().map_err(AuthGatewayError::decode)?;
        self.remember(&id, &response);
        if let Some(profile) = response.metadata_profile() {
            self.known_profiles().insert(id.clone(), profile);
        }
        Ok(id)
    }

    async fn fetch_profile(&self, id: &AccountId) -> Result<Profile, AuthGatewayError> {
        let mut url = self.client.endpoint(USERS_PATH);
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("id", &format!("eq.{id}"))
            .append_pair("limit", "1");
        let token = self.token_for(id);
        let rows: Vec<UserRowDto> = self
            .send_json::<(), _>(
                AuthCall::Other,
                Method::GET,
                url,
                token.as_deref().map(String::as_str),
                None,
            )
            .await?;
        match rows.into_iter().next() {
            Some(row) => row.into_profile().map_err(AuthGatewayError::decode),
            None => self.known_profiles().get(id).cloned().ok_or_else(|| {
                AuthGatewayError::profile_missing(id.as_ref())
            }),
        }
    }

    async fn revoke_session(&self, id: &AccountId) -> Result<(), AuthGatewayError> {
        self.known_profiles().remove(id);
        let Some(token) = self.tokens().remove(id) else {
            debug!(account_id = %id, "no access token to revoke");
            return Ok(());
        };
        self.send::<()>(
            AuthCall::Other,
            Method::POST,
            self.client.endpoint(LOGOUT_PATH),
            Some(token.as_str()),
            None,
        )
        .await
        .map(|_| ())
    }
}

fn map_transport_error(error: reqwest::Error) -> AuthGatewayError {
    if error.is_timeout() {
        AuthGatewayError::timeout(error.to_string())
    } else {
        AuthGatewayError::transport(error.to_string())
    }
}

fn map_status_error(call: AuthCall, status: StatusCode, body: &[u8]) -> AuthGatewayError {
    let message = status_message(status, body);
    match (call, status) {
        (_, StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT) => {
            AuthGatewayError::timeout(message)
        }
        (AuthCall::SignUp, StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY)
            if mentions_existing_account(body) =>
        {
            AuthGatewayError::email_taken("")
        }
        (AuthCall::Token, StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED) => {
            AuthGatewayError::InvalidCredentials
        }
        _ if status.is_server_error() => AuthGatewayError::transport(message),
        _ => AuthGatewayError::rejected(status.as_u16(), message),
    }
}

fn mentions_existing_account(body: &[u8]) -> bool {
    let text = String::from_utf8_lossy(body).to_lowercase();
    ["already registered", "already been registered", "already exists"]
        .iter()
        .any(|phrase| text.contains(phrase))
}

#[cfg(test)]
mod tests {
    //! Regression coverage for non-network auth mapping helpers.

    use super::*;
    use crate::domain::{Role, SignUpForm};
    use crate::outbound::rest::scripted_server::{Reply, ScriptedServer};
    use rstest::rstest;
    use std::time::Duration;

    #[rstest]
    #[case::taken_400(AuthCall::SignUp, StatusCode::BAD_REQUEST, r#"{"msg":"User already registered"}"#, "EmailTaken")]
    #[case::taken_422(AuthCall::SignUp, StatusCode::UNPROCESSABLE_ENTITY, r#"{"msg":"A user with this email address has already been registered"}"#, "EmailTaken")]
    #[case::weak_password(AuthCall::SignUp, StatusCode::UNPROCESSABLE_ENTITY, r#"{"msg":"Password should be at least 6 characters"}"#, "Rejected")]
    #[case::bad_grant(AuthCall::Token, StatusCode::BAD_REQUEST, r#"{"error":"invalid_grant"}"#, "InvalidCredentials")]
    #[case::unauthorised(AuthCall::Token, StatusCode::UNAUTHORIZED, "", "InvalidCredentials")]
    #[case::gateway_timeout(AuthCall::Token, StatusCode::GATEWAY_TIMEOUT, "", "Timeout")]
    #[case::request_timeout(AuthCall::Other, StatusCode::REQUEST_TIMEOUT, "", "Timeout")]
    #[case::server_error(AuthCall::SignUp, StatusCode::SERVICE_UNAVAILABLE, "down", "Transport")]
    #[case::forbidden(AuthCall::Other, StatusCode::FORBIDDEN, "rls", "Rejected")]
    fn maps_http_statuses_to_expected_gateway_errors(
        #[case] call: AuthCall,
        #[case] status: StatusCode,
        #[case] body: &str,
        #[case] expected: &str,
    ) {
        let error = map_status_error(call, status, body.as_bytes());
        let matched = match expected {
            "EmailTaken" => matches!(error, AuthGatewayError::EmailTaken { .. }),
            "InvalidCredentials" => matches!(error, AuthGatewayError::InvalidCredentials),
            "Timeout" => matches!(error, AuthGatewayError::Timeout { .. }),
            "Transport" => matches!(error, AuthGatewayError::Transport { .. }),
            "Rejected" => matches!(error, AuthGatewayError::Rejected { .. }),
            _ => panic!("unsupported test expectation: {expected}"),
        };
        assert!(matched, "{status} on {call:?} mapped to {error:?}");
    }

    #[tokio::test]
    async fn unreachable_service_is_a_transport_error() {
        let base = reqwest::Url::parse("http://127.0.0.1:9").expect("url");
        let client = RestClient::new(base, "anon", Duration::from_secs(2)).expect("client");
        let gateway = RestAuthGateway::new(client);
        let credentials =
            SignInCredentials::try_from_parts("ada@example.com", "engine").expect("credentials");

        let error = gateway
            .authenticate(&credentials)
            .await
            .expect_err("nothing listens on the discard port");
        assert!(
            error.code().is_transport(),
            "connection failures should map to transport codes, got {error:?}"
        );
    }

    const ACCOUNT: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

    fn scripted_gateway(server: &ScriptedServer) -> RestAuthGateway {
        let client =
            RestClient::new(server.base_url(), "anon", Duration::from_secs(2)).expect("client");
        RestAuthGateway::new(client)
    }

    fn sign_up_request() -> SignUpRequest {
        SignUpRequest::try_from_form(&SignUpForm {
            full_name: "Grace Hopper".to_owned(),
            email: "grace@example.com".to_owned(),
            password: "compiler".to_owned(),
            confirm_password: "compiler".to_owned(),
            role: Role::Employer,
        })
        .expect("valid form")
    }

    #[tokio::test]
    async fn failed_profile_row_keeps_the_sign_up_profile() {
        let session = r#"{"access_token":"jwt","user":{"id":"3fa85f64-5717-4562-b3fc-2c963f66afa6"}}"#;
        let server = ScriptedServer::start(vec![
            Reply { route: "POST /auth/v1/signup", status: 200, body: session },
            Reply { route: "POST /rest/v1/users", status: 403, body: r#"{"message":"rls"}"# },
            Reply { route: "GET /rest/v1/users", status: 200, body: "[]" },
        ])
        .await;
        let gateway = scripted_gateway(&server);

        let id = gateway
            .create_account(&sign_up_request())
            .await
            .expect("the auth account exists even without its row");
        assert_eq!(id.as_ref(), ACCOUNT);

        let profile = gateway.fetch_profile(&id).await.expect("sign-up profile");
        assert_eq!(profile.full_name.as_ref(), "Grace Hopper");
        assert_eq!(profile.role, Role::Employer);
        let requests = server.requests();
        assert_eq!(requests[..2], ["POST /auth/v1/signup", "POST /rest/v1/users"]);
        assert!(requests[2].starts_with("GET /rest/v1/users?"), "{requests:?}");
    }

    #[tokio::test]
    async fn missing_row_falls_back_to_sign_in_metadata() {
        let session = r#"{
            "access_token": "jwt",
            "user": {
                "id": "3fa85f64-5717-4562-b3fc-2c963f66afa6",
                "email": "grace@example.com",
                "user_metadata": { "full_name": "Grace Hopper", "role": "employer" }
            }
        }"#;
        let server = ScriptedServer::start(vec![
            Reply { route: "POST /auth/v1/token", status: 200, body: session },
            Reply { route: "GET /rest/v1/users", status: 200, body: "[]" },
            Reply { route: "POST /auth/v1/logout", status: 204, body: "" },
        ])
        .await;
        let gateway = scripted_gateway(&server);
        let credentials =
            SignInCredentials::try_from_parts("grace@example.com", "compiler").expect("creds");

        let id = gateway.authenticate(&credentials).await.expect("sign in");
        let profile = gateway.fetch_profile(&id).await.expect("metadata profile");
        assert_eq!(profile.role, Role::Employer);

        gateway.revoke_session(&id).await.expect("logout");
        let error = gateway
            .fetch_profile(&id)
            .await
            .expect_err("nothing cached after sign out");
        assert!(matches!(error, AuthGatewayError::ProfileMissing { .. }));
    }

    #[tokio::test]
    async fn revoking_without_a_token_is_a_no_op() {
        let base = reqwest::Url::parse("http://127.0.0.1:9").expect("url");
        let client = RestClient::new(base, "anon", Duration::from_secs(2)).expect("client");
        let gateway = RestAuthGateway::new(client);
        gateway
            .revoke_session(&AccountId::random())
            .await
            .expect("nothing to revoke");
    }
}
