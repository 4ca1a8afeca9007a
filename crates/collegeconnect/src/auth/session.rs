//! The session store: single source of truth for "who is logged in".
//!
//! A [`SessionStore`] owns the current [`Identity`] and the durable
//! credential slot. Front ends read it through [`SessionStore::snapshot`]
//! or a [`watch`] subscription and change it only through
//! [`initialize`](SessionStore::initialize), [`login`](SessionStore::login),
//! [`logout`](SessionStore::logout) and, from the transport's 401
//! interceptor, [`expire`](SessionStore::expire).
//!
//! Identity fetches are asynchronous and cannot be cancelled. Each one
//! carries the generation that was current when it started; `login`,
//! `logout` and `expire` advance the generation, and a fetch whose
//! generation is no longer current is discarded when it resolves.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

use crate::error::{AuthError, Error};

use super::identity::Identity;
use super::store::CredentialStore;
use super::token::BearerToken;

/// Resolves a credential to the identity it belongs to.
///
/// Implemented by [`ApiClient`](crate::transport::ApiClient) with
/// `GET /user/me`.
#[async_trait]
pub trait IdentitySource: Send + Sync {
    /// Fetch the identity for `credential`.
    async fn fetch_identity(&self, credential: &BearerToken) -> Result<Identity, Error>;
}

/// Derived tri-state view of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionStatus {
    /// An identity fetch is in flight.
    Loading,
    /// An identity is present.
    Authenticated,
    /// No identity and nothing in flight.
    Anonymous,
}

/// A consistent read of the session state.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    identity: Option<Arc<Identity>>,
    loading: bool,
}

impl SessionSnapshot {
    /// The current identity, if any.
    pub fn identity(&self) -> Option<&Arc<Identity>> {
        self.identity.as_ref()
    }

    /// True when an identity is present.
    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    /// True while the initial revalidation or a login fetch is in flight.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn status(&self) -> SessionStatus {
        if self.loading {
            SessionStatus::Loading
        } else if self.identity.is_some() {
            SessionStatus::Authenticated
        } else {
            SessionStatus::Anonymous
        }
    }
}

/// Process-wide session state.
///
/// Cheap to clone; clones share the same state.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    credentials: Arc<dyn CredentialStore>,
    control: Mutex<Control>,
    state: watch::Sender<SessionSnapshot>,
}

struct Control {
    generation: u64,
    initialized: bool,
}

impl SessionStore {
    /// Create a store over a credential slot.
    ///
    /// The store starts in [`SessionStatus::Loading`] until
    /// [`initialize`](Self::initialize) resolves.
    pub fn new(credentials: Arc<dyn CredentialStore>) -> Self {
        let (state, _) = watch::channel(SessionSnapshot {
            identity: None,
            loading: true,
        });

        Self {
            inner: Arc::new(SessionInner {
                credentials,
                control: Mutex::new(Control {
                    generation: 0,
                    initialized: false,
                }),
                state,
            }),
        }
    }

    /// Returns a consistent copy of the current state.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.inner.state.borrow().clone()
    }

    /// The current identity, if any.
    pub fn identity(&self) -> Option<Arc<Identity>> {
        self.inner.state.borrow().identity.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.state.borrow().is_authenticated()
    }

    /// True while the initial revalidation or a login fetch is in flight.
    pub fn is_loading_initial(&self) -> bool {
        self.inner.state.borrow().is_loading()
    }

    pub fn status(&self) -> SessionStatus {
        self.inner.state.borrow().status()
    }

    /// Subscribe to state changes.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.inner.state.subscribe()
    }

    /// Read the persisted credential.
    pub fn credential(&self) -> Option<BearerToken> {
        self.inner.credentials.load()
    }

    /// Revalidate the persisted credential, once per store.
    ///
    /// Without a stored credential the session becomes anonymous and no
    /// request is made. Otherwise the identity is fetched; on failure the
    /// credential is deleted. Later calls, or calls after a `login` or
    /// `logout` already decided the session, return the current status.
    #[instrument(skip_all)]
    pub async fn initialize<S>(&self, source: &S) -> SessionStatus
    where
        S: IdentitySource + ?Sized,
    {
        let (ticket, credential) = {
            let mut control = self.lock();
            if control.initialized {
                debug!("Session already initialized");
                return self.status();
            }
            control.initialized = true;

            match self.inner.credentials.load() {
                Some(credential) => (control.generation, credential),
                None => {
                    info!("No stored credential");
                    self.publish(None, false);
                    return SessionStatus::Anonymous;
                }
            }
        };

        debug!("Revalidating stored credential");
        let outcome = source.fetch_identity(&credential).await;
        if let Err(e) = self.settle(ticket, outcome) {
            debug!(error = %e, "Initial revalidation did not authenticate");
        }

        self.status()
    }

    /// Persist a newly obtained credential and fetch its identity.
    ///
    /// A login whose identity fetch fails is a failed login: the credential
    /// is deleted and the session becomes anonymous.
    ///
    /// # Errors
    ///
    /// Returns the storage error, the fetch error, or
    /// [`AuthError::Superseded`] if a later `login`/`logout` happened while
    /// the fetch was in flight.
    #[instrument(skip_all)]
    pub async fn login<S>(&self, credential: BearerToken, source: &S) -> Result<Arc<Identity>, Error>
    where
        S: IdentitySource + ?Sized,
    {
        let ticket = {
            let mut control = self.lock();
            self.inner.credentials.save(&credential)?;
            control.generation += 1;
            control.initialized = true;
            let identity = self.inner.state.borrow().identity.clone();
            self.publish(identity, true);
            control.generation
        };

        info!("Logging in");
        let outcome = source.fetch_identity(&credential).await;
        self.settle(ticket, outcome)
    }

    /// Delete the credential and clear the identity.
    ///
    /// Synchronous, infallible and idempotent. Makes no request. Any
    /// identity fetch still in flight is discarded when it resolves.
    pub fn logout(&self) {
        let mut control = self.lock();
        self.clear_locked(&mut control);
        info!("Logged out");
    }

    /// Invalidate the session after the server rejected a credential.
    ///
    /// Clears exactly like [`logout`](Self::logout), whichever credential
    /// the rejected request carried. Identity fetches still in flight are
    /// discarded when they resolve.
    pub fn expire(&self) {
        let mut control = self.lock();
        self.clear_locked(&mut control);
        info!("Session expired");
    }

    fn settle(
        &self,
        ticket: u64,
        outcome: Result<Identity, Error>,
    ) -> Result<Arc<Identity>, Error> {
        let control = self.lock();
        if control.generation != ticket {
            debug!(
                ticket,
                current = control.generation,
                "Discarding stale identity fetch"
            );
            return match outcome {
                Ok(_) => Err(AuthError::Superseded.into()),
                Err(e) => Err(e),
            };
        }

        match outcome {
            Ok(identity) => {
                let identity = Arc::new(identity);
                info!(user_id = %identity.id, "Session authenticated");
                self.publish(Some(Arc::clone(&identity)), false);
                Ok(identity)
            }
            Err(e) => {
                warn!(error = %e, "Identity fetch failed, clearing credential");
                self.inner.credentials.clear();
                self.publish(None, false);
                Err(e)
            }
        }
    }

    fn clear_locked(&self, control: &mut Control) {
        control.generation += 1;
        control.initialized = true;
        self.inner.credentials.clear();
        self.publish(None, false);
    }

    fn publish(&self, identity: Option<Arc<Identity>>, loading: bool) {
        let next = SessionSnapshot { identity, loading };
        self.inner.state.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });
    }

    fn lock(&self) -> MutexGuard<'_, Control> {
        self.inner
            .control
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("status", &self.status())
            .field("credentials", &self.inner.credentials)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use serde_json::json;
    use tokio::sync::oneshot;

    use super::*;
    use crate::auth::MemoryCredentialStore;

    type Reply = Result<Identity, Error>;

    /// Identity source whose replies are released by the test, per token.
    #[derive(Default)]
    struct ScriptedSource {
        pending: Mutex<HashMap<String, oneshot::Receiver<Reply>>>,
        started: Mutex<Vec<String>>,
    }

    impl ScriptedSource {
        fn script(&self, token: &str) -> oneshot::Sender<Reply> {
            let (tx, rx) = oneshot::channel();
            self.pending.lock().unwrap().insert(token.to_string(), rx);
            tx
        }

        fn calls(&self) -> usize {
            self.started.lock().unwrap().len()
        }

        async fn wait_started(&self, token: &str) {
            while !self.started.lock().unwrap().iter().any(|t| t == token) {
                tokio::task::yield_now().await;
            }
        }
    }

    #[async_trait]
    impl IdentitySource for ScriptedSource {
        async fn fetch_identity(&self, credential: &BearerToken) -> Reply {
            self.started
                .lock()
                .unwrap()
                .push(credential.as_str().to_string());
            let rx = self
                .pending
                .lock()
                .unwrap()
                .remove(credential.as_str())
                .expect("unscripted credential");
            rx.await.expect("reply sender dropped")
        }
    }

    fn token(s: &str) -> BearerToken {
        BearerToken::new(s).unwrap()
    }

    fn person(id: i64, name: &str) -> Identity {
        serde_json::from_value(json!({"id": id, "name": name})).unwrap()
    }

    fn store_with(initial: Option<&str>) -> (SessionStore, Arc<MemoryCredentialStore>) {
        let credentials = Arc::new(match initial {
            Some(t) => MemoryCredentialStore::with_token(token(t)),
            None => MemoryCredentialStore::new(),
        });
        (SessionStore::new(credentials.clone()), credentials)
    }

    #[tokio::test]
    async fn starts_loading() {
        let (store, _) = store_with(None);
        assert!(store.is_loading_initial());
        assert_eq!(store.status(), SessionStatus::Loading);
        assert!(!store.is_authenticated());
    }

    #[tokio::test]
    async fn initialize_without_credential_makes_no_request() {
        let (store, _) = store_with(None);
        let source = ScriptedSource::default();

        let status = store.initialize(&source).await;

        assert_eq!(status, SessionStatus::Anonymous);
        assert!(!store.is_loading_initial());
        assert!(store.identity().is_none());
        assert_eq!(source.calls(), 0);
    }

    #[tokio::test]
    async fn initialize_with_valid_credential_authenticates() {
        let (store, credentials) = store_with(Some("abc"));
        let source = ScriptedSource::default();
        source.script("abc").send(Ok(person(1, "Ann"))).unwrap();

        let status = store.initialize(&source).await;

        assert_eq!(status, SessionStatus::Authenticated);
        assert!(store.is_authenticated());
        assert_eq!(store.identity().unwrap().name, "Ann");
        assert_eq!(credentials.load(), Some(token("abc")));
    }

    #[tokio::test]
    async fn initialize_failure_deletes_credential() {
        let (store, credentials) = store_with(Some("abc"));
        let source = ScriptedSource::default();
        source
            .script("abc")
            .send(Err(AuthError::SessionExpired.into()))
            .unwrap();

        let status = store.initialize(&source).await;

        assert_eq!(status, SessionStatus::Anonymous);
        assert!(!store.is_loading_initial());
        assert!(credentials.load().is_none());
    }

    #[tokio::test]
    async fn initialize_runs_once() {
        let (store, _) = store_with(Some("abc"));
        let source = ScriptedSource::default();
        source.script("abc").send(Ok(person(1, "Ann"))).unwrap();

        store.initialize(&source).await;
        let second = store.initialize(&source).await;

        assert_eq!(second, SessionStatus::Authenticated);
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn login_then_logout_leaves_storage_empty() {
        let (store, credentials) = store_with(None);
        let source = ScriptedSource::default();
        store.initialize(&source).await;
        source.script("xyz").send(Ok(person(2, "Bo"))).unwrap();

        let identity = store.login(token("xyz"), &source).await.unwrap();
        assert_eq!(identity.name, "Bo");
        assert_eq!(credentials.load(), Some(token("xyz")));
        assert_eq!(store.status(), SessionStatus::Authenticated);

        store.logout();
        assert!(credentials.load().is_none());
        assert_eq!(store.status(), SessionStatus::Anonymous);
    }

    #[tokio::test]
    async fn failed_login_clears_credential() {
        let (store, credentials) = store_with(None);
        let source = ScriptedSource::default();
        source
            .script("bad")
            .send(Err(AuthError::SessionExpired.into()))
            .unwrap();

        let err = store.login(token("bad"), &source).await.unwrap_err();

        assert!(err.is_unauthorized());
        assert!(credentials.load().is_none());
        assert_eq!(store.status(), SessionStatus::Anonymous);
    }

    #[tokio::test]
    async fn login_is_loading_until_fetch_resolves() {
        let (store, _) = store_with(None);
        let source = Arc::new(ScriptedSource::default());
        let reply = source.script("xyz");

        let task = {
            let store = store.clone();
            let source = Arc::clone(&source);
            tokio::spawn(async move { store.login(token("xyz"), source.as_ref()).await })
        };
        source.wait_started("xyz").await;

        assert!(store.is_loading_initial());
        assert_eq!(store.status(), SessionStatus::Loading);

        reply.send(Ok(person(2, "Bo"))).unwrap();
        task.await.unwrap().unwrap();
        assert!(!store.is_loading_initial());
    }

    #[tokio::test]
    async fn logout_is_idempotent() {
        let (store, credentials) = store_with(Some("abc"));
        let mut rx = store.subscribe();

        store.logout();
        let once = store.snapshot();
        assert!(rx.has_changed().unwrap());
        rx.borrow_and_update();

        store.logout();
        assert_eq!(store.snapshot(), once);
        assert!(!rx.has_changed().unwrap());
        assert!(credentials.load().is_none());
    }

    #[tokio::test]
    async fn logout_discards_in_flight_login() {
        let (store, credentials) = store_with(None);
        let source = Arc::new(ScriptedSource::default());
        let reply = source.script("xyz");

        let task = {
            let store = store.clone();
            let source = Arc::clone(&source);
            tokio::spawn(async move { store.login(token("xyz"), source.as_ref()).await })
        };
        source.wait_started("xyz").await;

        store.logout();
        reply.send(Ok(person(2, "Bo"))).unwrap();

        let err = task.await.unwrap().unwrap_err();
        assert!(matches!(err, Error::Auth(AuthError::Superseded)));
        assert!(store.identity().is_none());
        assert!(!store.is_loading_initial());
        assert!(credentials.load().is_none());
    }

    #[tokio::test]
    async fn stale_initialization_does_not_override_newer_login() {
        let (store, credentials) = store_with(Some("abc"));
        let source = Arc::new(ScriptedSource::default());
        let init_reply = source.script("abc");
        let login_reply = source.script("xyz");

        let init = {
            let store = store.clone();
            let source = Arc::clone(&source);
            tokio::spawn(async move { store.initialize(source.as_ref()).await })
        };
        source.wait_started("abc").await;

        let login = {
            let store = store.clone();
            let source = Arc::clone(&source);
            tokio::spawn(async move { store.login(token("xyz"), source.as_ref()).await })
        };
        source.wait_started("xyz").await;

        login_reply.send(Ok(person(2, "Bo"))).unwrap();
        login.await.unwrap().unwrap();

        init_reply.send(Ok(person(1, "Ann"))).unwrap();
        let status = init.await.unwrap();

        assert_eq!(status, SessionStatus::Authenticated);
        assert_eq!(store.identity().unwrap().name, "Bo");
        assert_eq!(credentials.load(), Some(token("xyz")));
    }

    #[tokio::test]
    async fn stale_initialization_failure_keeps_newer_credential() {
        let (store, credentials) = store_with(Some("abc"));
        let source = Arc::new(ScriptedSource::default());
        let init_reply = source.script("abc");
        let login_reply = source.script("xyz");

        let init = {
            let store = store.clone();
            let source = Arc::clone(&source);
            tokio::spawn(async move { store.initialize(source.as_ref()).await })
        };
        source.wait_started("abc").await;

        let login = {
            let store = store.clone();
            let source = Arc::clone(&source);
            tokio::spawn(async move { store.login(token("xyz"), source.as_ref()).await })
        };
        source.wait_started("xyz").await;

        init_reply
            .send(Err(AuthError::SessionExpired.into()))
            .unwrap();
        init.await.unwrap();
        assert_eq!(credentials.load(), Some(token("xyz")));

        login_reply.send(Ok(person(2, "Bo"))).unwrap();
        login.await.unwrap().unwrap();
        assert_eq!(store.status(), SessionStatus::Authenticated);
    }

    #[tokio::test]
    async fn expire_clears_whatever_is_stored() {
        let (store, credentials) = store_with(Some("xyz"));
        let source = ScriptedSource::default();
        source.script("xyz").send(Ok(person(2, "Bo"))).unwrap();
        store.initialize(&source).await;

        store.expire();

        assert!(credentials.load().is_none());
        assert!(store.identity().is_none());
        assert_eq!(store.status(), SessionStatus::Anonymous);
    }

    #[tokio::test]
    async fn expire_discards_in_flight_login() {
        let (store, credentials) = store_with(None);
        let source = Arc::new(ScriptedSource::default());
        let reply = source.script("xyz");

        let task = {
            let store = store.clone();
            let source = Arc::clone(&source);
            tokio::spawn(async move { store.login(token("xyz"), source.as_ref()).await })
        };
        source.wait_started("xyz").await;

        store.expire();
        reply.send(Ok(person(2, "Bo"))).unwrap();

        assert!(task.await.unwrap().is_err());
        assert!(credentials.load().is_none());
        assert_eq!(store.status(), SessionStatus::Anonymous);
    }

    #[tokio::test]
    async fn subscribers_observe_login() {
        let (store, _) = store_with(None);
        let source = ScriptedSource::default();
        let mut rx = store.subscribe();
        source.script("xyz").send(Ok(person(2, "Bo"))).unwrap();

        store.login(token("xyz"), &source).await.unwrap();

        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().is_authenticated());
    }
}
