//! Media upload pipeline.
//!
//! Turns a locally picked file into a blob under
//! `users/{user_id}/{images|videos}/{uuid}.{ext}` plus a one-year signed URL.
//! The folder layout is what the bucket's access policies match on, so the
//! path shape must not change.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use async_trait::async_trait;
use base64::prelude::{Engine as _, BASE64_STANDARD};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::DEFAULT_MEDIA_BUCKET;
use crate::storage::{BlobStore, SIGNED_URL_TTL_SECONDS};
use crate::{Error, Result};

/// Kind of media attached to a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Storage folder under the user's prefix.
    #[must_use]
    pub const fn folder(self) -> &'static str {
        match self {
            Self::Image => "images",
            Self::Video => "videos",
        }
    }

    /// Extension used when the URI carries none.
    #[must_use]
    pub const fn default_extension(self) -> &'static str {
        match self {
            Self::Image => "jpg",
            Self::Video => "mp4",
        }
    }

    /// Content type sent with every upload of this kind.
    #[must_use]
    pub const fn content_type(self) -> &'static str {
        match self {
            Self::Image => "image/jpeg",
            Self::Video => "video/mp4",
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "image" => Ok(Self::Image),
            "video" => Ok(Self::Video),
            other => Err(Error::InvalidInput(format!(
                "Unknown media kind '{other}' (expected image or video)"
            ))),
        }
    }
}

/// Result of a successful upload. Not persisted on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResult {
    pub storage_path: String,
    pub signed_url: String,
}

/// Local file/media picker.
#[async_trait]
pub trait MediaPicker: Send + Sync {
    /// Ask for library access; `false` means refused.
    async fn request_permission(&self) -> bool;

    /// Launch the picker filtered to `kind`. `None` means the user cancelled.
    async fn pick(&self, kind: MediaKind) -> Option<String>;
}

/// Uploads picked media into a blob store bucket.
pub struct MediaUploader<B: BlobStore> {
    store: B,
    bucket: String,
}

impl<B: BlobStore> MediaUploader<B> {
    /// Uploader targeting the default `media` bucket.
    pub fn new(store: B) -> Self {
        Self::with_bucket(store, DEFAULT_MEDIA_BUCKET)
    }

    pub fn with_bucket(store: B, bucket: impl Into<String>) -> Self {
        Self {
            store,
            bucket: bucket.into(),
        }
    }

    pub const fn store(&self) -> &B {
        &self.store
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Run the pipeline: name, read, upload (no overwrite), sign.
    ///
    /// Each call mints a fresh id, so a retry after a signing failure leaves the
    /// first blob behind.
    pub async fn upload(&self, uri: &str, user_id: &str, kind: MediaKind) -> Result<UploadResult> {
        let storage_path = compose_storage_path(user_id, Uuid::new_v4(), uri, kind)?;
        tracing::info!("Uploading {} to {}", kind, storage_path);

        let bytes = read_media_bytes(uri).await?;

        self.store
            .upload(&self.bucket, &storage_path, bytes, kind.content_type(), false)
            .await
            .map_err(|error| match error {
                Error::Upload(_) => error,
                other => Error::Upload(other.to_string()),
            })?;

        let signed_url = self
            .store
            .create_signed_url(&self.bucket, &storage_path, SIGNED_URL_TTL_SECONDS)
            .await
            .map_err(|error| match error {
                Error::Signing(_) => error,
                other => Error::Signing(other.to_string()),
            })?
            .ok_or_else(|| Error::Signing(format!("No signed URL for {storage_path}")))?;

        tracing::info!("Uploaded {}", storage_path);
        Ok(UploadResult {
            storage_path,
            signed_url,
        })
    }

    /// Permission, pick, then upload. `Ok(None)` when the user cancels.
    pub async fn pick_and_upload(
        &self,
        picker: &dyn MediaPicker,
        user_id: &str,
        kind: MediaKind,
    ) -> Result<Option<UploadResult>> {
        if !picker.request_permission().await {
            return Err(Error::PermissionDenied(
                "Allow access to photos to upload media.".to_string(),
            ));
        }

        let Some(uri) = picker.pick(kind).await else {
            return Ok(None);
        };
        if uri.trim().is_empty() {
            return Err(Error::Read("Could not get file from picker".to_string()));
        }

        self.upload(uri.trim(), user_id, kind).await.map(Some)
    }
}

/// Build `users/{user_id}/{folder}/{file_id}.{ext}`.
pub fn compose_storage_path(
    user_id: &str,
    file_id: Uuid,
    uri: &str,
    kind: MediaKind,
) -> Result<String> {
    if user_id.trim().is_empty() {
        return Err(Error::InvalidInput("User id must not be empty".to_string()));
    }
    if user_id.trim() != user_id {
        return Err(Error::InvalidInput(
            "User id must not have surrounding whitespace".to_string(),
        ));
    }
    if user_id.contains('/') {
        return Err(Error::InvalidInput(
            "User id must not contain '/'".to_string(),
        ));
    }

    let extension = derive_extension(uri, kind);
    Ok(format!(
        "users/{user_id}/{}/{file_id}.{extension}",
        kind.folder()
    ))
}

/// Extension of the URI's last path segment, query and fragment stripped.
///
/// Falls back to the kind's default when the segment has no usable extension.
pub fn derive_extension(uri: &str, kind: MediaKind) -> String {
    if uri.starts_with("data:") {
        return kind.default_extension().to_string();
    }

    let without_query = uri.split(['?', '#']).next().unwrap_or_default();
    let last_segment = without_query.rsplit(['/', '\\']).next().unwrap_or_default();
    last_segment
        .rsplit_once('.')
        .map(|(_, extension)| extension)
        .filter(|extension| {
            !extension.is_empty() && extension.chars().all(|ch| ch.is_ascii_alphanumeric())
        })
        .map_or_else(|| kind.default_extension().to_string(), ToString::to_string)
}

/// Read a local media URI fully into memory.
///
/// Accepts plain paths, `file://` URIs and `data:` URIs (base64 or
/// percent-encoded). Zero bytes is a read failure.
pub async fn read_media_bytes(uri: &str) -> Result<Vec<u8>> {
    let bytes = if let Some(data) = uri.strip_prefix("data:") {
        decode_data_uri(data)?
    } else {
        let path = local_path_from_uri(uri)?;
        tokio::fs::read(&path)
            .await
            .map_err(|error| Error::Read(format!("{}: {error}", path.display())))?
    };

    if bytes.is_empty() {
        return Err(Error::Read(format!("No data in {}", describe_uri(uri))));
    }
    Ok(bytes)
}

fn local_path_from_uri(uri: &str) -> Result<PathBuf> {
    let trimmed = uri.trim();
    if trimmed.is_empty() {
        return Err(Error::Read("File URI is empty".to_string()));
    }

    let Some(rest) = trimmed.strip_prefix("file://") else {
        return Ok(PathBuf::from(trimmed));
    };
    // `file://localhost/path` and `file:///path` both name `/path`.
    let rest = rest.strip_prefix("localhost").unwrap_or(rest);
    let decoded = urlencoding::decode(rest)
        .map_err(|error| Error::Read(format!("Invalid file URI {trimmed}: {error}")))?;
    Ok(PathBuf::from(decoded.into_owned()))
}

fn decode_data_uri(data: &str) -> Result<Vec<u8>> {
    let (metadata, payload) = data
        .split_once(',')
        .ok_or_else(|| Error::Read("Malformed data URI".to_string()))?;

    if metadata.ends_with(";base64") {
        BASE64_STANDARD
            .decode(payload.trim())
            .map_err(|error| Error::Read(format!("Invalid base64 payload: {error}")))
    } else {
        Ok(urlencoding::decode_binary(payload.as_bytes()).into_owned())
    }
}

fn describe_uri(uri: &str) -> String {
    if uri.starts_with("data:") {
        "data URI".to_string()
    } else {
        uri.to_string()
    }
}
