//! Supabase Storage client for media uploads and signed URLs.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;

use super::{encode_object_path, BlobStore};
use crate::config::BackendConfig;
use crate::util::parse_api_error;
use crate::{Error, Result};

/// Storage API client acting on behalf of one signed-in user.
///
/// Requests carry the user's access token so bucket policies see the caller's
/// identity.
#[derive(Debug, Clone)]
pub struct SupabaseStorage {
    storage_url: String,
    anon_key: String,
    access_token: String,
    client: Client,
}

impl SupabaseStorage {
    pub fn new(config: &BackendConfig, access_token: impl Into<String>) -> Result<Self> {
        let access_token = access_token.into();
        if access_token.trim().is_empty() {
            return Err(Error::InvalidInput(
                "Storage access token must not be empty".to_string(),
            ));
        }

        Ok(Self {
            storage_url: config.storage_url(),
            anon_key: config.supabase_anon_key.clone(),
            access_token,
            client: Client::builder().build()?,
        })
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.access_token)
    }

    fn object_url(&self, bucket: &str, path: &str) -> String {
        format!(
            "{}/object/{}/{}",
            self.storage_url,
            urlencoding::encode(bucket),
            encode_object_path(path)
        )
    }

    fn sign_url(&self, bucket: &str, path: &str) -> String {
        format!(
            "{}/object/sign/{}/{}",
            self.storage_url,
            urlencoding::encode(bucket),
            encode_object_path(path)
        )
    }

    /// Signed paths come back relative to the storage API root.
    fn absolute_signed_url(&self, signed: &str) -> String {
        if signed.starts_with("http://") || signed.starts_with("https://") {
            signed.to_string()
        } else {
            format!("{}/{}", self.storage_url, signed.trim_start_matches('/'))
        }
    }
}

#[async_trait]
impl BlobStore for SupabaseStorage {
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
        upsert: bool,
    ) -> Result<()> {
        let url = self.object_url(bucket, path);
        tracing::debug!("Storage upload {} ({} bytes)", url, bytes.len());

        let response = self
            .authorized(self.client.post(&url))
            .header(CONTENT_TYPE, content_type)
            .header("x-upsert", if upsert { "true" } else { "false" })
            .body(bytes)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Upload(format!(
                "{bucket}/{path}: {}",
                parse_api_error(status, &body)
            )));
        }
        Ok(())
    }

    async fn create_signed_url(
        &self,
        bucket: &str,
        path: &str,
        expires_in_seconds: u64,
    ) -> Result<Option<String>> {
        let response = self
            .authorized(self.client.post(self.sign_url(bucket, path)))
            .json(&serde_json::json!({ "expiresIn": expires_in_seconds }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Signing(format!(
                "{bucket}/{path}: {}",
                parse_api_error(status, &body)
            )));
        }

        let payload = response.json::<SignedUrlResponse>().await?;
        Ok(payload
            .signed_url
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .map(|value| self.absolute_signed_url(&value)))
    }
}

#[derive(Debug, Deserialize)]
struct SignedUrlResponse {
    #[serde(rename = "signedURL", alias = "signedUrl")]
    signed_url: Option<String>,
}
