//! Note repository seam

use async_trait::async_trait;

use crate::models::{NewNote, Note, NoteFields, NoteId};
use crate::Result;

/// Trait for note storage operations
#[async_trait]
pub trait NoteRepository: Send + Sync {
    /// All notes owned by `user_id`, newest first
    async fn list_for_user(&self, user_id: &str) -> Result<Vec<Note>>;

    /// Insert a note and return the stored row
    async fn insert(&self, note: &NewNote) -> Result<Note>;

    /// Overwrite a note's fields; last writer wins
    async fn update(&self, id: &NoteId, fields: &NoteFields) -> Result<Note>;
}
