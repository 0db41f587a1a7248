//! Integration tests for the GoTrue client and the session store built on it.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use jotter_core::auth::{
    AuthEvent, AuthProvider, AuthResult, AuthSession, AuthUser, SessionPersistence,
    SignUpOutcome, SupabaseAuthClient,
};
use jotter_core::session::{SessionState, SessionStore};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Clone, Default)]
struct MemoryStore(Arc<Mutex<Option<AuthSession>>>);

impl SessionPersistence for MemoryStore {
    fn load_session(&self) -> AuthResult<Option<AuthSession>> {
        Ok(self.0.lock().unwrap().clone())
    }

    fn save_session(&self, session: &AuthSession) -> AuthResult<()> {
        *self.0.lock().unwrap() = Some(session.clone());
        Ok(())
    }

    fn clear_session(&self) -> AuthResult<()> {
        *self.0.lock().unwrap() = None;
        Ok(())
    }
}

fn token_response(user_id: &str) -> serde_json::Value {
    serde_json::json!({
        "access_token": format!("access-{user_id}"),
        "token_type": "bearer",
        "expires_in": 3600,
        "refresh_token": format!("refresh-{user_id}"),
        "user": { "id": user_id, "email": "a@example.com" }
    })
}

fn stored_session(expires_at: i64) -> AuthSession {
    AuthSession {
        access_token: "stored-access".to_string(),
        refresh_token: "stored-refresh".to_string(),
        expires_at,
        user: AuthUser {
            id: "user-a".to_string(),
            email: Some("a@example.com".to_string()),
        },
    }
}

async fn next_state(receiver: &mut tokio::sync::watch::Receiver<SessionState>) -> SessionState {
    tokio::time::timeout(Duration::from_secs(5), receiver.changed())
        .await
        .expect("state change in time")
        .expect("observer alive");
    receiver.borrow_and_update().clone()
}

#[tokio::test]
async fn sign_in_persists_session_and_pushes_event() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "password"))
        .and(header("apikey", "anon-key"))
        .and(body_json(serde_json::json!({
            "email": "a@example.com",
            "password": "hunter22",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_response("user-a")))
        .expect(1)
        .mount(&server)
        .await;

    let store = MemoryStore::default();
    let client = SupabaseAuthClient::new(server.uri(), "anon-key", store.clone()).unwrap();
    let mut events = client.subscribe();

    let session = client.sign_in("a@example.com", "hunter22").await.unwrap();

    assert_eq!(session.user.id, "user-a");
    assert_eq!(session.access_token, "access-user-a");
    assert!(!session.is_expired());
    assert_eq!(store.load_session().unwrap(), Some(session.clone()));
    assert_eq!(events.recv().await.unwrap(), AuthEvent::SignedIn(session));
}

#[tokio::test]
async fn bad_credentials_surface_backend_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": "invalid_grant",
            "error_description": "Invalid login credentials"
        })))
        .mount(&server)
        .await;

    let store = MemoryStore::default();
    let client = SupabaseAuthClient::new(server.uri(), "anon-key", store.clone()).unwrap();

    let error = client.sign_in("a@example.com", "wrong").await.unwrap_err();

    assert!(error.to_string().contains("Invalid login credentials"), "{error}");
    assert_eq!(store.load_session().unwrap(), None);
}

#[tokio::test]
async fn sign_up_without_session_requires_confirmation() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/signup"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "user-b",
            "user": { "id": "user-b", "email": "b@example.com" }
        })))
        .mount(&server)
        .await;

    let client =
        SupabaseAuthClient::new(server.uri(), "anon-key", MemoryStore::default()).unwrap();

    let outcome = client.sign_up("b@example.com", "hunter22").await.unwrap();

    assert_eq!(outcome, SignUpOutcome::ConfirmationRequired);
}

#[tokio::test]
async fn expired_session_with_dead_refresh_token_is_signed_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "refresh_token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error_description": "Invalid Refresh Token: Already Used"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let store = MemoryStore::default();
    store.save_session(&stored_session(0)).unwrap();
    let client = SupabaseAuthClient::new(server.uri(), "anon-key", store.clone()).unwrap();

    let restored = client.restore_session().await.unwrap();

    assert_eq!(restored, None);
    assert_eq!(store.load_session().unwrap(), None);
}

#[tokio::test]
async fn session_store_follows_sign_in_and_sign_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "password"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_response("user-a")))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/logout"))
        .and(header("authorization", "Bearer access-user-a"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let store = MemoryStore::default();
    let client =
        Arc::new(SupabaseAuthClient::new(server.uri(), "anon-key", store.clone()).unwrap());
    let sessions = SessionStore::start(client.clone());

    assert_eq!(sessions.ready().await, SessionState::Unauthenticated);
    let mut states = sessions.subscribe();
    drop(states.borrow_and_update());

    client.sign_in("a@example.com", "hunter22").await.unwrap();
    let signed_in = next_state(&mut states).await;
    assert_eq!(signed_in.user().map(|user| user.id.as_str()), Some("user-a"));

    client.sign_out().await.unwrap();
    assert_eq!(next_state(&mut states).await, SessionState::Unauthenticated);
    assert_eq!(store.load_session().unwrap(), None);

    sessions.shutdown();
}

#[tokio::test]
async fn session_store_starts_authenticated_from_persisted_session() {
    let server = MockServer::start().await;
    let store = MemoryStore::default();
    let far_future = chrono::Utc::now().timestamp() + 3600;
    store.save_session(&stored_session(far_future)).unwrap();

    let client = Arc::new(SupabaseAuthClient::new(server.uri(), "anon-key", store).unwrap());
    let sessions = SessionStore::start(client);

    let state = sessions.ready().await;
    assert_eq!(state.session().map(|s| s.access_token.as_str()), Some("stored-access"));
}
