//! Note persistence: drafts in, rows out.

use crate::db::NoteRepository;
use crate::models::{NewNote, Note, NoteDraft, NoteId};
use crate::{Error, Result};

/// Validates drafts and forwards them to a [`NoteRepository`].
#[derive(Clone)]
pub struct NoteService<R: NoteRepository> {
    repo: R,
}

impl<R: NoteRepository> NoteService<R> {
    pub const fn new(repo: R) -> Self {
        Self { repo }
    }

    pub const fn repository(&self) -> &R {
        &self.repo
    }

    /// Insert a new note owned by `user_id`.
    ///
    /// Blank text fails with [`Error::EmptyText`] before any row-store call.
    pub async fn create(&self, user_id: &str, draft: &NoteDraft) -> Result<Note> {
        let fields = draft.to_fields()?;
        let user_id = require_user_id(user_id)?;

        let note = self
            .repo
            .insert(&NewNote {
                user_id: user_id.to_string(),
                fields,
            })
            .await?;
        tracing::info!("Created note {}", note.id);
        Ok(note)
    }

    /// Overwrite an existing note. No concurrency check: last writer wins.
    pub async fn update(&self, id: &NoteId, draft: &NoteDraft) -> Result<Note> {
        let fields = draft.to_fields()?;
        let note = self.repo.update(id, &fields).await?;
        tracing::info!("Updated note {}", note.id);
        Ok(note)
    }

    /// Create when `existing` is `None`, update otherwise.
    pub async fn save(
        &self,
        user_id: &str,
        existing: Option<&NoteId>,
        draft: &NoteDraft,
    ) -> Result<Note> {
        match existing {
            Some(id) => self.update(id, draft).await,
            None => self.create(user_id, draft).await,
        }
    }

    /// Every note of `user_id`, newest first.
    ///
    /// Rows whose owner is not exactly `user_id` are dropped, whatever the
    /// backend returned.
    pub async fn list(&self, user_id: &str) -> Result<Vec<Note>> {
        let user_id = require_user_id(user_id)?;
        let mut notes = self.repo.list_for_user(user_id).await?;
        notes.retain(|note| note.user_id == user_id);
        Ok(notes)
    }

    /// Find one of the user's notes by full id or unique id prefix.
    pub async fn find(&self, user_id: &str, query: &str) -> Result<Note> {
        let query = query.trim().to_ascii_lowercase();
        if query.is_empty() {
            return Err(Error::InvalidInput("Note ID cannot be empty".to_string()));
        }

        let notes = self.list(user_id).await?;
        if let Some(note) = notes
            .iter()
            .find(|note| note.id.as_str().eq_ignore_ascii_case(&query))
        {
            return Ok(note.clone());
        }

        let mut matches: Vec<Note> = notes
            .into_iter()
            .filter(|note| note.id.as_str().to_ascii_lowercase().starts_with(&query))
            .collect();
        match matches.len() {
            0 => Err(Error::NotFound(query)),
            1 => Ok(matches.remove(0)),
            _ => {
                let options = matches
                    .iter()
                    .take(3)
                    .map(|note| note.id.as_str().chars().take(13).collect::<String>())
                    .collect::<Vec<_>>()
                    .join(", ");
                Err(Error::InvalidInput(format!(
                    "ID prefix '{query}' is ambiguous; matches: {options}"
                )))
            }
        }
    }
}

fn require_user_id(user_id: &str) -> Result<&str> {
    if user_id.trim().is_empty() {
        return Err(Error::InvalidInput("User id must not be empty".to_string()));
    }
    Ok(user_id)
}
