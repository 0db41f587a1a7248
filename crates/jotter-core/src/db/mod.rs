//! Row-store layer for Jotter

mod postgrest;
mod repository;

pub use postgrest::PostgrestNoteRepository;
pub use repository::NoteRepository;
