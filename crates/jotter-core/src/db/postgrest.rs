//! PostgREST implementation of `NoteRepository`

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};

use super::repository::NoteRepository;
use crate::config::BackendConfig;
use crate::models::{NewNote, Note, NoteFields, NoteId};
use crate::util::parse_api_error;
use crate::{Error, Result};

const NOTES_TABLE: &str = "notes";

/// `notes` table client acting as one signed-in user.
#[derive(Debug, Clone)]
pub struct PostgrestNoteRepository {
    table_url: String,
    anon_key: String,
    access_token: String,
    client: Client,
}

impl PostgrestNoteRepository {
    pub fn new(config: &BackendConfig, access_token: impl Into<String>) -> Result<Self> {
        let access_token = access_token.into();
        if access_token.trim().is_empty() {
            return Err(Error::InvalidInput(
                "Row store access token must not be empty".to_string(),
            ));
        }

        Ok(Self {
            table_url: format!("{}/{NOTES_TABLE}", config.rest_url()),
            anon_key: config.supabase_anon_key.clone(),
            access_token,
            client: Client::builder().build()?,
        })
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.access_token)
            .header("Accept", "application/json")
    }

    async fn read_rows(response: Response) -> Result<Vec<Note>> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Database(parse_api_error(status, &body)));
        }
        Ok(response.json::<Vec<Note>>().await?)
    }
}

#[async_trait]
impl NoteRepository for PostgrestNoteRepository {
    async fn list_for_user(&self, user_id: &str) -> Result<Vec<Note>> {
        let response = self
            .authorized(self.client.get(&self.table_url))
            .query(&[
                ("select", "*".to_string()),
                ("user_id", format!("eq.{user_id}")),
                ("order", "created_at.desc".to_string()),
            ])
            .send()
            .await?;

        Self::read_rows(response).await
    }

    async fn insert(&self, note: &NewNote) -> Result<Note> {
        let response = self
            .authorized(self.client.post(&self.table_url))
            .header("Prefer", "return=representation")
            .json(note)
            .send()
            .await?;

        Self::read_rows(response)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| Error::Database("Insert returned no row".to_string()))
    }

    async fn update(&self, id: &NoteId, fields: &NoteFields) -> Result<Note> {
        let response = self
            .authorized(self.client.patch(&self.table_url))
            .query(&[("id", format!("eq.{id}"))])
            .header("Prefer", "return=representation")
            .json(fields)
            .send()
            .await?;

        // Row-level security hides other users' rows, so "not yours" looks
        // the same as "missing".
        Self::read_rows(response)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| Error::NotFound(id.to_string()))
    }
}
