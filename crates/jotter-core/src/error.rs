//! Error types for jotter-core

use thiserror::Error;

use crate::auth::AuthError;

/// Result type alias using jotter-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in jotter-core operations
///
/// Every variant is terminal for the user action that raised it; callers show
/// the message and let the user retry by hand.
#[derive(Error, Debug)]
pub enum Error {
    /// Media picker access was refused
    #[error("Permission required: {0}")]
    PermissionDenied(String),

    /// Local media could not be read or decoded to bytes
    #[error("Failed to read file: {0}")]
    Read(String),

    /// Blob store rejected the upload
    #[error("Upload failed: {0}")]
    Upload(String),

    /// Blob store did not return a signed URL
    #[error("Signing failed: {0}")]
    Signing(String),

    /// Note text is blank
    #[error("Note cannot be empty")]
    EmptyText,

    /// Row store rejected a select/insert/update
    #[error("Database error: {0}")]
    Database(String),

    /// Auth provider error
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Note not found
    #[error("Note not found: {0}")]
    NotFound(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// HTTP transport error
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
}
