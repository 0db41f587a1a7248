//! Session store: tracks the signed-in identity and pushes auth state changes.
//!
//! Built once at startup with [`SessionStore::start`] and torn down with
//! [`SessionStore::shutdown`]. The store fetches the current session once, then
//! follows provider-pushed [`AuthEvent`]s; it never polls.

use std::sync::Arc;

use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;

use crate::auth::{AuthEvent, AuthProvider, AuthSession, AuthUser};

/// Observed authentication state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// The initial session fetch has not completed.
    Initializing,
    Authenticated(AuthSession),
    Unauthenticated,
}

impl SessionState {
    fn from_session(session: Option<AuthSession>) -> Self {
        session.map_or(Self::Unauthenticated, Self::Authenticated)
    }

    #[must_use]
    pub const fn is_initializing(&self) -> bool {
        matches!(self, Self::Initializing)
    }

    #[must_use]
    pub const fn session(&self) -> Option<&AuthSession> {
        match self {
            Self::Authenticated(session) => Some(session),
            Self::Initializing | Self::Unauthenticated => None,
        }
    }

    #[must_use]
    pub fn user(&self) -> Option<&AuthUser> {
        self.session().map(|session| &session.user)
    }
}

/// Process-wide session state with an explicit init/teardown lifecycle.
pub struct SessionStore {
    state: watch::Receiver<SessionState>,
    task: JoinHandle<()>,
}

impl SessionStore {
    /// Subscribe to the provider and fetch the current session in the background.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(provider: Arc<dyn AuthProvider>) -> Self {
        let (sender, state) = watch::channel(SessionState::Initializing);
        // Subscribe before the initial fetch so no event can slip between them.
        let events = provider.subscribe();
        let task = tokio::spawn(run_observer(provider, events, sender));
        Self { state, task }
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Push subscription; `changed().await` wakes on every transition.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.clone()
    }

    /// Wait for the initial session fetch and return the settled state.
    pub async fn ready(&self) -> SessionState {
        let mut receiver = self.state.clone();
        let settled = match receiver.wait_for(|state| !state.is_initializing()).await {
            Ok(state) => state.clone(),
            // Observer gone before settling: nothing will ever authenticate us.
            Err(_) => SessionState::Unauthenticated,
        };
        settled
    }

    /// Stop following auth events. The last observed state stays readable.
    pub fn shutdown(&self) {
        self.task.abort();
    }
}

impl Drop for SessionStore {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run_observer(
    provider: Arc<dyn AuthProvider>,
    mut events: broadcast::Receiver<AuthEvent>,
    sender: watch::Sender<SessionState>,
) {
    let initial = match provider.get_session().await {
        Ok(session) => session,
        Err(error) => {
            tracing::warn!("Failed to fetch current session: {}", error);
            None
        }
    };
    sender.send_replace(SessionState::from_session(initial));

    loop {
        match events.recv().await {
            Ok(event) => {
                tracing::debug!("Auth state change: {}", event_label(&event));
                sender.send_replace(SessionState::from_session(event.session().cloned()));
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!("Session store skipped {} auth events", skipped);
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

const fn event_label(event: &AuthEvent) -> &'static str {
    match event {
        AuthEvent::SignedIn(_) => "signed_in",
        AuthEvent::TokenRefreshed(_) => "token_refreshed",
        AuthEvent::SignedOut => "signed_out",
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::time::timeout;

    use super::*;
    use crate::auth::{AuthError, AuthResult, SignUpOutcome};

    struct FakeProvider {
        current: Mutex<Option<AuthSession>>,
        events: broadcast::Sender<AuthEvent>,
        fail_initial_fetch: bool,
    }

    impl FakeProvider {
        fn new(current: Option<AuthSession>) -> Arc<Self> {
            let (events, _) = broadcast::channel(8);
            Arc::new(Self {
                current: Mutex::new(current),
                events,
                fail_initial_fetch: false,
            })
        }

        fn push(&self, event: AuthEvent) {
            *self.current.lock().unwrap() = event.session().cloned();
            self.events.send(event).unwrap();
        }
    }

    #[async_trait]
    impl AuthProvider for FakeProvider {
        async fn get_session(&self) -> AuthResult<Option<AuthSession>> {
            if self.fail_initial_fetch {
                return Err(AuthError::Api("offline".to_string()));
            }
            Ok(self.current.lock().unwrap().clone())
        }

        async fn sign_up(&self, _email: &str, _password: &str) -> AuthResult<SignUpOutcome> {
            Ok(SignUpOutcome::ConfirmationRequired)
        }

        async fn sign_in(&self, _email: &str, _password: &str) -> AuthResult<AuthSession> {
            let session = session("user-a");
            self.push(AuthEvent::SignedIn(session.clone()));
            Ok(session)
        }

        async fn sign_out(&self) -> AuthResult<()> {
            self.push(AuthEvent::SignedOut);
            Ok(())
        }

        fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
            self.events.subscribe()
        }
    }

    fn session(user_id: &str) -> AuthSession {
        AuthSession {
            access_token: format!("token-{user_id}"),
            refresh_token: "refresh".to_string(),
            expires_at: i64::MAX,
            user: AuthUser {
                id: user_id.to_string(),
                email: None,
            },
        }
    }

    async fn next_state(receiver: &mut watch::Receiver<SessionState>) -> SessionState {
        timeout(Duration::from_secs(2), receiver.changed())
            .await
            .expect("state change should arrive")
            .expect("observer alive");
        receiver.borrow_and_update().clone()
    }

    #[tokio::test]
    async fn starts_initializing_then_settles_unauthenticated() {
        let provider = FakeProvider::new(None);
        let store = SessionStore::start(provider);

        assert_eq!(store.ready().await, SessionState::Unauthenticated);
    }

    #[tokio::test]
    async fn initial_session_settles_authenticated() {
        let provider = FakeProvider::new(Some(session("user-a")));
        let store = SessionStore::start(provider);

        let state = store.ready().await;
        assert_eq!(state.user().map(|user| user.id.as_str()), Some("user-a"));
    }

    #[tokio::test]
    async fn failed_initial_fetch_is_unauthenticated() {
        let (events, _) = broadcast::channel(8);
        let provider = Arc::new(FakeProvider {
            current: Mutex::new(Some(session("user-a"))),
            events,
            fail_initial_fetch: true,
        });
        let store = SessionStore::start(provider);

        assert_eq!(store.ready().await, SessionState::Unauthenticated);
    }

    #[tokio::test]
    async fn pushed_events_drive_transitions() {
        let provider = FakeProvider::new(None);
        let store = SessionStore::start(provider.clone());
        store.ready().await;
        let mut states = store.subscribe();
        states.borrow_and_update();

        provider.sign_in("a@example.com", "pw").await.unwrap();
        let signed_in = next_state(&mut states).await;
        assert_eq!(signed_in.user().unwrap().id, "user-a");

        provider.sign_out().await.unwrap();
        assert_eq!(next_state(&mut states).await, SessionState::Unauthenticated);
    }

    #[tokio::test]
    async fn shutdown_stops_following_events() {
        let provider = FakeProvider::new(None);
        let store = SessionStore::start(provider.clone());
        store.ready().await;

        store.shutdown();
        tokio::task::yield_now().await;
        let _ = provider.events.send(AuthEvent::SignedIn(session("user-b")));
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert_eq!(store.state(), SessionState::Unauthenticated);
    }
}
