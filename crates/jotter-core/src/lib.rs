//! jotter-core - Core library for Jotter
//!
//! This crate contains the note models, the Supabase auth/row/blob clients, the
//! media upload pipeline, and the session store used by every Jotter front end.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod media;
pub mod models;
pub mod services;
pub mod session;
pub mod storage;
pub mod util;

pub use error::{Error, Result};
pub use models::{Note, NoteDraft, NoteId};
