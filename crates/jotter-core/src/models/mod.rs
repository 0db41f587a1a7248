//! Data models for Jotter

mod card;
mod note;

pub use card::{NoteCard, Thumbnail};
pub use note::{join_paths, split_paths, NewNote, Note, NoteDraft, NoteFields, NoteId};
