//! Signed-in service handles shared across clients.

mod notes;

pub use notes::NoteService;

use crate::auth::AuthSession;
use crate::config::BackendConfig;
use crate::db::PostgrestNoteRepository;
use crate::media::MediaUploader;
use crate::storage::SupabaseStorage;
use crate::Result;

/// Note and media services bound to one signed-in user.
pub struct UserServices {
    user_id: String,
    pub notes: NoteService<PostgrestNoteRepository>,
    pub media: MediaUploader<SupabaseStorage>,
}

impl UserServices {
    /// Build the row-store and blob-store clients for `session`.
    pub fn for_session(config: &BackendConfig, session: &AuthSession) -> Result<Self> {
        let repo = PostgrestNoteRepository::new(config, session.access_token.clone())?;
        let storage = SupabaseStorage::new(config, session.access_token.clone())?;

        Ok(Self {
            user_id: session.user_id().to_string(),
            notes: NoteService::new(repo),
            media: MediaUploader::with_bucket(storage, config.media_bucket.clone()),
        })
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }
}
