//! CLI Supabase auth/session helpers with secure keychain persistence.

use std::sync::Arc;

use keyring::Entry;

use jotter_core::auth::{
    AuthProvider, AuthResult, SessionPersistence, SignUpOutcome, SupabaseAuthClient,
};
pub use jotter_core::auth::{AuthError, AuthSession};
use jotter_core::config::BackendConfig;

const KEYRING_SERVICE_NAME: &str = "jotter-cli";

/// Keychain entry holding one profile's serialized session.
#[derive(Debug, Clone)]
pub struct KeyringSessionStore {
    service_name: String,
    username: String,
}

impl KeyringSessionStore {
    pub fn new(profile_name: &str) -> Self {
        Self::with_service(KEYRING_SERVICE_NAME, profile_name)
    }

    fn with_service(service_name: &str, profile_name: &str) -> Self {
        Self {
            service_name: service_name.to_string(),
            username: format!("supabase_session:{profile_name}"),
        }
    }

    fn entry(&self) -> AuthResult<Entry> {
        Entry::new(&self.service_name, &self.username)
            .map_err(|error| AuthError::SecureStorage(error.to_string()))
    }
}

impl SessionPersistence for KeyringSessionStore {
    fn load_session(&self) -> AuthResult<Option<AuthSession>> {
        let entry = self.entry()?;
        match entry.get_password() {
            Ok(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(error) => Err(AuthError::SecureStorage(error.to_string())),
        }
    }

    fn save_session(&self, session: &AuthSession) -> AuthResult<()> {
        let raw = serde_json::to_string(session)?;
        self.entry()?
            .set_password(&raw)
            .map_err(|error| AuthError::SecureStorage(error.to_string()))
    }

    fn clear_session(&self) -> AuthResult<()> {
        let entry = self.entry()?;
        match entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(error) => Err(AuthError::SecureStorage(error.to_string())),
        }
    }
}

/// Auth client bound to one CLI profile's keychain entry.
#[derive(Clone)]
pub struct SupabaseAuthService {
    inner: Arc<SupabaseAuthClient<KeyringSessionStore>>,
}

impl SupabaseAuthService {
    pub fn new(profile_name: &str, config: &BackendConfig) -> AuthResult<Self> {
        Ok(Self {
            inner: Arc::new(SupabaseAuthClient::from_config(
                config,
                KeyringSessionStore::new(profile_name),
            )?),
        })
    }

    /// Shared handle for the session store.
    pub fn provider(&self) -> Arc<dyn AuthProvider> {
        self.inner.clone()
    }

    pub async fn sign_up(&self, email: &str, password: &str) -> AuthResult<SignUpOutcome> {
        self.inner.sign_up(email, password).await
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> AuthResult<AuthSession> {
        self.inner.sign_in(email, password).await
    }

    pub async fn sign_out(&self) -> AuthResult<()> {
        self.inner.sign_out().await
    }
}

pub fn clear_stored_session(profile_name: &str) -> AuthResult<()> {
    KeyringSessionStore::new(profile_name).clear_session()
}
