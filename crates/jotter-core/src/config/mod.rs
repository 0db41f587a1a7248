//! Backend configuration for client apps.
//!
//! Provides the `BackendConfig` struct used by every front end to reach the
//! Supabase project that hosts auth, the `notes` table, and the media bucket.

use std::env;

use serde::{Deserialize, Serialize};

use crate::util::{normalize_project_url, normalize_text_option};
use crate::{Error, Result};

pub const ENV_SUPABASE_URL: &str = "SUPABASE_URL";
pub const ENV_SUPABASE_ANON_KEY: &str = "SUPABASE_ANON_KEY";
pub const ENV_MEDIA_BUCKET: &str = "JOTTER_MEDIA_BUCKET";

/// Bucket that holds every uploaded image and video.
pub const DEFAULT_MEDIA_BUCKET: &str = "media";

/// Public Supabase project settings.
///
/// These values are safe-to-ship endpoints/keys. Row-level security on the
/// backend does the actual access control; no secret credentials live here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Project URL without a trailing slash, e.g. `https://demo.supabase.co`.
    pub supabase_url: String,
    /// Anon/public API key sent as the `apikey` header.
    pub supabase_anon_key: String,
    /// Storage bucket for media uploads.
    #[serde(default = "default_media_bucket")]
    pub media_bucket: String,
}

impl BackendConfig {
    /// Build a validated config from explicit values.
    pub fn new(
        supabase_url: impl AsRef<str>,
        supabase_anon_key: impl Into<String>,
        media_bucket: Option<String>,
    ) -> Result<Self> {
        let supabase_url = normalize_project_url(supabase_url.as_ref()).ok_or_else(|| {
            Error::InvalidInput(format!(
                "{ENV_SUPABASE_URL} must be a non-empty http:// or https:// URL"
            ))
        })?;
        let supabase_anon_key = normalize_text_option(Some(supabase_anon_key.into()))
            .ok_or_else(|| Error::InvalidInput(format!("{ENV_SUPABASE_ANON_KEY} is required")))?;
        let media_bucket =
            normalize_text_option(media_bucket).unwrap_or_else(default_media_bucket);

        Ok(Self {
            supabase_url,
            supabase_anon_key,
            media_bucket,
        })
    }

    /// Load configuration from environment variables.
    ///
    /// Returns `Ok(None)` when no Supabase variables are set.
    /// Returns an error when only a partial configuration is provided.
    pub fn from_env() -> Result<Option<Self>> {
        parse_config(|key| env::var(key).ok())
    }

    /// GoTrue base URL.
    #[must_use]
    pub fn auth_url(&self) -> String {
        format!("{}/auth/v1", self.supabase_url)
    }

    /// PostgREST base URL.
    #[must_use]
    pub fn rest_url(&self) -> String {
        format!("{}/rest/v1", self.supabase_url)
    }

    /// Storage API base URL.
    #[must_use]
    pub fn storage_url(&self) -> String {
        format!("{}/storage/v1", self.supabase_url)
    }
}

fn default_media_bucket() -> String {
    DEFAULT_MEDIA_BUCKET.to_string()
}

/// Parse configuration from an arbitrary key lookup.
pub fn parse_config(lookup: impl Fn(&str) -> Option<String>) -> Result<Option<BackendConfig>> {
    let url = normalize_text_option(lookup(ENV_SUPABASE_URL));
    let anon_key = normalize_text_option(lookup(ENV_SUPABASE_ANON_KEY));
    let bucket = normalize_text_option(lookup(ENV_MEDIA_BUCKET));

    match (url, anon_key) {
        (None, None) => Ok(None),
        (Some(url), Some(anon_key)) => BackendConfig::new(url, anon_key, bucket).map(Some),
        (url, _) => {
            let missing = if url.is_none() {
                ENV_SUPABASE_URL
            } else {
                ENV_SUPABASE_ANON_KEY
            };
            Err(Error::InvalidInput(format!(
                "Supabase configuration is incomplete. Missing: {missing}"
            )))
        }
    }
}
