//! Storage abstractions for the media blob store.

mod supabase;

use async_trait::async_trait;

use crate::Result;

pub use supabase::SupabaseStorage;

/// Signed URL lifetime used for note media: 365 days.
pub const SIGNED_URL_TTL_SECONDS: u64 = 60 * 60 * 24 * 365;

/// Object storage addressed by bucket and path.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Upload `bytes` to `bucket/path`.
    ///
    /// With `upsert == false` an existing object at the path is a rejection,
    /// reported as [`crate::Error::Upload`].
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
        upsert: bool,
    ) -> Result<()>;

    /// Mint a time-limited retrieval URL; `Ok(None)` when the store returns none.
    async fn create_signed_url(
        &self,
        bucket: &str,
        path: &str,
        expires_in_seconds: u64,
    ) -> Result<Option<String>>;
}

/// Percent-encode each segment of an object path, keeping `/` separators.
pub fn encode_object_path(path: &str) -> String {
    path.trim_matches('/')
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}
