use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] jotter_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("No note content provided")]
    EmptyContent,
    #[error("Note ID cannot be empty")]
    EmptyNoteId,
    #[error("Editor command failed: {0}")]
    EditorFailed(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Authentication error: {0}")]
    Auth(String),
    #[error("Profile '{0}' is not signed in. Run `jotter auth login --email <email> --password <password>`.")]
    NotSignedIn(String),
    #[error(
        "Supabase is not configured. Run `jotter config init --supabase-url <url> --supabase-anon-key <key>`, or set SUPABASE_URL and SUPABASE_ANON_KEY."
    )]
    NotConfigured,
}

impl From<jotter_core::auth::AuthError> for CliError {
    fn from(error: jotter_core::auth::AuthError) -> Self {
        Self::Auth(error.to_string())
    }
}
