//! Session store: the current identity, its profile, and change observers.
//!
//! One store exists per process and is shared with views as an
//! `Arc<SessionStore<_>>`. Transitions run through the [`AuthGateway`] port,
//! are single-flight, and notify every subscriber synchronously before the
//! triggering call returns.
//!
//! Every sign-out starts a new epoch. A sign-in or sign-up captures the epoch
//! when it starts and only commits if no sign-out happened meanwhile.

use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, Weak};
use std::time::Duration;

use tokio::runtime::Handle;
use tracing::{debug, info, warn};

use super::ports::{AuthGateway, AuthGatewayError};
use super::{
    AccountId, DomainError, Identity, Profile, Role, SignInCredentials, SignUpForm,
    SignUpRequest,
};

/// Default bound on every gateway call.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const SUPERSEDED_MESSAGE: &str = "signed out before the sign-in completed";

/// Authentication state held by the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Unauthenticated,
    Authenticated { identity: Identity, profile: Profile },
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }

    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Self::Authenticated { identity, .. } => Some(identity),
            Self::Unauthenticated => None,
        }
    }

    pub fn profile(&self) -> Option<&Profile> {
        match self {
            Self::Authenticated { profile, .. } => Some(profile),
            Self::Unauthenticated => None,
        }
    }

    /// Role of the signed-in account, if any.
    pub fn role(&self) -> Option<Role> {
        self.identity().map(Identity::role)
    }
}

/// Transition delivered to subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    SignedIn(Identity),
    SignedOut,
}

type Observer = Arc<dyn Fn(&SessionEvent) + Send + Sync>;

#[derive(Default)]
struct Observers {
    next_id: AtomicU64,
    entries: Mutex<Vec<(u64, Observer)>>,
}

impl Observers {
    fn lock(&self) -> MutexGuard<'_, Vec<(u64, Observer)>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn add(&self, observer: Observer) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.lock().push((id, observer));
        id
    }

    fn remove(&self, id: u64) {
        self.lock().retain(|(entry, _)| *entry != id);
    }

    fn snapshot(&self) -> Vec<Observer> {
        self.lock()
            .iter()
            .map(|(_, observer)| Arc::clone(observer))
            .collect()
    }
}

/// Handle returned by [`SessionStore::subscribe`].
///
/// Dropping the handle unsubscribes. A handle may outlive its store.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    id: u64,
    observers: Weak<Observers>,
}

impl Subscription {
    /// Unsubscribe explicitly.
    pub fn cancel(self) {
        drop(self);
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(observers) = self.observers.upgrade() {
            observers.remove(self.id);
        }
    }
}

/// Clears the in-flight flag when a mutation finishes, however it finishes.
struct FlightGuard<'a>(&'a AtomicBool);

/// A running sign-in or sign-up and the epoch it started in.
struct Flight<'a> {
    _guard: FlightGuard<'a>,
    epoch: u64,
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Holds the current session and talks to the auth gateway.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use jobboard::domain::ports::FixtureAuthGateway;
/// use jobboard::domain::{Role, SessionStore, SignUpForm};
///
/// # tokio::runtime::Builder::new_current_thread().enable_time().build().unwrap().block_on(async {
/// let store = SessionStore::new(Arc::new(FixtureAuthGateway::default()));
/// let form = SignUpForm {
///     full_name: "Ada Lovelace".into(),
///     email: "ada@example.com".into(),
///     password: "engine".into(),
///     confirm_password: "engine".into(),
///     role: Role::Candidate,
/// };
/// let identity = store.sign_up(&form).await.unwrap();
/// assert_eq!(identity.role().dashboard_path(), "/candidate/dashboard");
/// assert!(store.state().is_authenticated());
/// # });
/// ```
pub struct SessionStore<G> {
    gateway: Arc<G>,
    request_timeout: Duration,
    state: RwLock<SessionState>,
    transitions: Mutex<()>,
    observers: Arc<Observers>,
    in_flight: AtomicBool,
    epoch: AtomicU64,
}

impl<G> SessionStore<G>
where
    G: AuthGateway + 'static,
{
    pub fn new(gateway: Arc<G>) -> Self {
        Self::with_timeout(gateway, DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with_timeout(gateway: Arc<G>, request_timeout: Duration) -> Self {
        Self {
            gateway,
            request_timeout,
            state: RwLock::new(SessionState::Unauthenticated),
            transitions: Mutex::new(()),
            observers: Arc::new(Observers::default()),
            in_flight: AtomicBool::new(false),
            epoch: AtomicU64::new(0),
        }
    }

    /// Create an account and sign in as it.
    ///
    /// The form is validated locally first; an invalid form never reaches
    /// the gateway. The profile is built from the form rather than read
    /// back. Failures leave the state untouched and notify nobody.
    pub async fn sign_up(&self, form: &SignUpForm) -> Result<Identity, DomainError> {
        let request = SignUpRequest::try_from_form(form)?;
        let flight = self.begin_mutation()?;

        let id = self
            .call("create_account", self.gateway.create_account(&request))
            .await?;
        let new_profile = request.profile();
        let profile = Profile::new(
            new_profile.full_name.clone(),
            request.email().clone(),
            new_profile.role,
        );
        let identity = Identity::new(id, request.email().clone(), new_profile.role);
        self.commit(&flight, identity.clone(), profile)?;
        Ok(identity)
    }

    /// Sign in with an email and password.
    ///
    /// Wrong credentials surface as [`DomainError::invalid_credentials`],
    /// which never says which field was wrong.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, DomainError> {
        let credentials = SignInCredentials::try_from_parts(email, password)?;
        let flight = self.begin_mutation()?;

        let id = self
            .call("authenticate", self.gateway.authenticate(&credentials))
            .await?;
        let profile = self
            .call("fetch_profile", self.gateway.fetch_profile(&id))
            .await?;
        let identity = Identity::new(id, credentials.email().clone(), profile.role);
        self.commit(&flight, identity.clone(), profile)?;
        Ok(identity)
    }

    /// Sign out.
    ///
    /// Local state is cleared and subscribers notified before this returns.
    /// Revocation on the gateway runs detached on the current Tokio runtime,
    /// bounded by the request timeout; its failure is only logged. A sign-in
    /// or sign-up still pending is discarded when it completes. Signing out
    /// while unauthenticated changes nothing.
    pub fn sign_out(&self) {
        let previous = {
            let _transition = self.lock_transitions();
            self.epoch.fetch_add(1, Ordering::AcqRel);
            let previous = std::mem::take(&mut *self.write_state());
            if previous.is_authenticated() {
                self.notify(&SessionEvent::SignedOut);
            }
            previous
        };

        let SessionState::Authenticated { identity, .. } = previous else {
            debug!("sign out ignored: no active session");
            return;
        };
        info!(account_id = %identity.id(), "signed out");
        self.revoke_detached(identity.id().clone());
    }

    pub fn current_identity(&self) -> Option<Identity> {
        self.read_state().identity().cloned()
    }

    pub fn current_profile(&self) -> Option<Profile> {
        self.read_state().profile().cloned()
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> SessionState {
        self.read_state().clone()
    }

    /// Register an observer for session transitions.
    ///
    /// Observers run synchronously in subscription order after the state
    /// lock is released, so they may read the store.
    pub fn subscribe<F>(&self, observer: F) -> Subscription
    where
        F: Fn(&SessionEvent) + Send + Sync + 'static,
    {
        let id = self.observers.add(Arc::new(observer));
        Subscription {
            id,
            observers: Arc::downgrade(&self.observers),
        }
    }

    fn begin_mutation(&self) -> Result<Flight<'_>, DomainError> {
        self.in_flight
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .map(|_| Flight {
                _guard: FlightGuard(&self.in_flight),
                epoch: self.epoch.load(Ordering::Acquire),
            })
            .map_err(|_| {
                debug!("rejected overlapping session mutation");
                DomainError::busy()
            })
    }

    async fn call<T>(
        &self,
        operation: &'static str,
        request: impl Future<Output = Result<T, AuthGatewayError>>,
    ) -> Result<T, DomainError> {
        bounded(self.request_timeout, operation, request)
            .await
            .map_err(|err| {
                debug!(operation, error = %err, "auth gateway call failed");
                DomainError::from(err)
            })
    }

    /// Install a new session unless a sign-out happened since `flight`
    /// started. A replaced session for another account is revoked.
    fn commit(
        &self,
        flight: &Flight<'_>,
        identity: Identity,
        profile: Profile,
    ) -> Result<(), DomainError> {
        let replaced = {
            let transition = self.lock_transitions();
            if self.epoch.load(Ordering::Acquire) != flight.epoch {
                drop(transition);
                info!(account_id = %identity.id(), "sign-in discarded after sign out");
                self.revoke_detached(identity.id().clone());
                return Err(DomainError::internal(SUPERSEDED_MESSAGE));
            }
            info!(account_id = %identity.id(), role = %identity.role(), "signed in");
            let previous = std::mem::replace(
                &mut *self.write_state(),
                SessionState::Authenticated {
                    identity: identity.clone(),
                    profile,
                },
            );
            self.notify(&SessionEvent::SignedIn(identity.clone()));
            previous
                .identity()
                .map(|previous| previous.id().clone())
                .filter(|previous| previous != identity.id())
        };
        if let Some(previous) = replaced {
            self.revoke_detached(previous);
        }
        Ok(())
    }

    fn revoke_detached(&self, id: AccountId) {
        let Ok(runtime) = Handle::try_current() else {
            warn!(account_id = %id, "no Tokio runtime; session not revoked");
            return;
        };
        let gateway = Arc::clone(&self.gateway);
        let request_timeout = self.request_timeout;
        runtime.spawn(async move {
            if let Err(err) =
                bounded(request_timeout, "revoke_session", gateway.revoke_session(&id)).await
            {
                warn!(account_id = %id, error = %err, "session revocation failed");
            }
        });
    }

    fn notify(&self, event: &SessionEvent) {
        for observer in self.observers.snapshot() {
            observer(event);
        }
    }
}

/// Run a gateway call, failing with a timeout once `limit` elapses.
async fn bounded<T>(
    limit: Duration,
    operation: &'static str,
    request: impl Future<Output = Result<T, AuthGatewayError>>,
) -> Result<T, AuthGatewayError> {
    tokio::time::timeout(limit, request).await.unwrap_or_else(|_| {
        warn!(operation, timeout = ?limit, "auth gateway call timed out");
        Err(AuthGatewayError::timeout(format!(
            "{operation} exceeded {limit:?}"
        )))
    })
}

impl<G> SessionStore<G> {
    fn read_state(&self) -> std::sync::RwLockReadGuard<'_, SessionState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> std::sync::RwLockWriteGuard<'_, SessionState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_transitions(&self) -> MutexGuard<'_, ()> {
        self.transitions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
