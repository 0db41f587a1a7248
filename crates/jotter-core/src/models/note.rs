//! Note model

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::media::{MediaKind, UploadResult};
use crate::{Error, Result};

/// Row identifier of a note (`notes.id`).
///
/// Opaque to the client: tables keyed by `uuid` send a string, tables keyed
/// by an identity column send an integer. Both are kept in string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct NoteId(String);

impl NoteId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid.to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for NoteId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(Error::InvalidInput("Note ID cannot be empty".to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }
}

impl<'de> Deserialize<'de> for NoteId {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Integer(i64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(text) => Self(text),
            RawId::Integer(number) => Self(number.to_string()),
        })
    }
}

/// A row of the `notes` table.
///
/// Media columns hold comma-joined signed URLs. The URLs expire after a year;
/// they are stored as-is and never re-signed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub user_id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub text: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub image_paths: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub video_paths: String,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub created_at: DateTime<Utc>,
}

impl Note {
    #[must_use]
    pub fn image_urls(&self) -> Vec<String> {
        split_paths(&self.image_paths)
    }

    #[must_use]
    pub fn video_urls(&self) -> Vec<String> {
        split_paths(&self.video_paths)
    }

    /// First line of the text, or `Untitled Note` when there is no text.
    #[must_use]
    pub fn title(&self) -> &str {
        if self.text.is_empty() {
            return "Untitled Note";
        }
        self.text.split('\n').next().unwrap_or_default()
    }

    /// Text after the first line; only multi-line notes have a preview.
    #[must_use]
    pub fn preview(&self) -> Option<&str> {
        self.text.split_once('\n').map(|(_, rest)| rest)
    }
}

/// Split a stored path list; empty segments are dropped.
#[must_use]
pub fn split_paths(joined: &str) -> Vec<String> {
    joined
        .split(',')
        .filter(|segment| !segment.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Join URLs into the stored comma-separated form.
#[must_use]
pub fn join_paths(urls: &[String]) -> String {
    urls.join(",")
}

/// Editor state for a new or existing note.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteDraft {
    pub text: String,
    pub image_urls: Vec<String>,
    pub video_urls: Vec<String>,
}

impl NoteDraft {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Seed the editor from a stored note.
    #[must_use]
    pub fn from_note(note: &Note) -> Self {
        Self {
            text: note.text.clone(),
            image_urls: note.image_urls(),
            video_urls: note.video_urls(),
        }
    }

    /// Append a signed URL to the list for `kind`, keeping insertion order.
    pub fn add_media(&mut self, kind: MediaKind, signed_url: impl Into<String>) {
        match kind {
            MediaKind::Image => self.image_urls.push(signed_url.into()),
            MediaKind::Video => self.video_urls.push(signed_url.into()),
        }
    }

    pub fn attach(&mut self, kind: MediaKind, upload: &UploadResult) {
        self.add_media(kind, upload.signed_url.clone());
    }

    /// Row fields for insert/update. Blank text is rejected.
    pub fn to_fields(&self) -> Result<NoteFields> {
        let text = self.text.trim();
        if text.is_empty() {
            return Err(Error::EmptyText);
        }

        Ok(NoteFields {
            text: text.to_string(),
            image_paths: join_paths(&self.image_urls),
            video_paths: join_paths(&self.video_urls),
        })
    }
}

/// Columns written on both insert and update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoteFields {
    pub text: String,
    pub image_paths: String,
    pub video_paths: String,
}

/// Insert payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewNote {
    pub user_id: String,
    #[serde(flatten)]
    pub fields: NoteFields,
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accepts `timestamptz` (RFC 3339) and zone-less `timestamp` values, the
/// latter taken as UTC.
fn deserialize_timestamp<'de, D>(deserializer: D) -> std::result::Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}")))
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    // PostgREST renders a bare `+00` offset for some timestamptz columns.
    if let Ok(parsed) = DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f%#z") {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn note(text: &str, images: &str, videos: &str) -> Note {
        Note {
            id: NoteId::from_uuid(Uuid::new_v4()),
            user_id: "user-a".to_string(),
            text: text.to_string(),
            image_paths: images.to_string(),
            video_paths: videos.to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_note_id_parse() {
        let id = NoteId::from_uuid(Uuid::new_v4());
        let parsed: NoteId = format!(" {id} ").parse().unwrap();
        assert_eq!(id, parsed);
        assert_eq!("42".parse::<NoteId>().unwrap().as_str(), "42");
        assert!(matches!("  ".parse::<NoteId>(), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_split_paths_filters_empty_segments() {
        assert_eq!(split_paths("u1,u2"), vec!["u1", "u2"]);
        assert_eq!(split_paths(",u1,,u2,"), vec!["u1", "u2"]);
        assert!(split_paths("").is_empty());
    }

    #[test]
    fn test_title_and_preview_split_on_first_newline() {
        let grocery = note("Groceries\nMilk, eggs, bread", "", "");
        assert_eq!(grocery.title(), "Groceries");
        assert_eq!(grocery.preview(), Some("Milk, eggs, bread"));

        let single = note("Just one line", "", "");
        assert_eq!(single.title(), "Just one line");
        assert_eq!(single.preview(), None);

        assert_eq!(note("", "", "").title(), "Untitled Note");
    }

    #[test]
    fn test_draft_roundtrip_from_note() {
        let stored = note("Trip", "u1,u2", "");
        let draft = NoteDraft::from_note(&stored);
        assert_eq!(draft.image_urls, vec!["u1".to_string(), "u2".to_string()]);
        assert!(draft.video_urls.is_empty());

        let fields = draft.to_fields().unwrap();
        assert_eq!(fields.image_paths, "u1,u2");
        assert_eq!(fields.video_paths, "");
    }

    #[test]
    fn test_draft_trims_text_and_keeps_media_order() {
        let mut draft = NoteDraft::new("  hello \n");
        draft.add_media(MediaKind::Video, "v1");
        draft.add_media(MediaKind::Image, "i1");
        draft.add_media(MediaKind::Image, "i2");

        let fields = draft.to_fields().unwrap();
        assert_eq!(
            fields,
            NoteFields {
                text: "hello".to_string(),
                image_paths: "i1,i2".to_string(),
                video_paths: "v1".to_string(),
            }
        );
    }

    #[test]
    fn test_blank_draft_is_rejected() {
        assert!(matches!(
            NoteDraft::new(" \n\t ").to_fields(),
            Err(Error::EmptyText)
        ));
    }

    #[test]
    fn test_new_note_serializes_flat() {
        let payload = NewNote {
            user_id: "user-a".to_string(),
            fields: NoteDraft::new("hi").to_fields().unwrap(),
        };
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            serde_json::json!({
                "user_id": "user-a",
                "text": "hi",
                "image_paths": "",
                "video_paths": "",
            })
        );
    }

    #[test]
    fn test_row_deserializes_nulls_and_timestamps() {
        let row = serde_json::json!({
            "id": "0190a9c4-2b1e-7c3a-9f00-000000000001",
            "user_id": "user-a",
            "text": "hello",
            "image_paths": null,
            "video_paths": "v1",
            "created_at": "2025-03-04T05:06:07.123456+00:00"
        });
        let parsed: Note = serde_json::from_value(row).unwrap();
        assert_eq!(parsed.image_paths, "");
        assert_eq!(parsed.video_urls(), vec!["v1".to_string()]);
        assert_eq!(parsed.created_at.to_rfc3339(), "2025-03-04T05:06:07.123456+00:00");
    }

    #[test]
    fn test_row_with_identity_column_id() {
        let row = serde_json::json!({
            "id": 7,
            "user_id": "user-a",
            "text": "bigint keyed",
            "image_paths": "",
            "video_paths": "",
            "created_at": "2025-03-04T05:06:07+00:00"
        });
        let parsed: Note = serde_json::from_value(row).unwrap();
        assert_eq!(parsed.id, NoteId::new("7"));
        assert_eq!(parsed.id.to_string(), "7");

        let rows: Vec<Note> = serde_json::from_value(serde_json::json!([
            {"id": 8, "user_id": "u", "created_at": "2025-03-04T05:06:07Z"},
            {"id": "0190a9c4-2b1e-7c3a-9f00-000000000001", "user_id": "u",
             "created_at": "2025-03-04T05:06:07Z"}
        ]))
        .unwrap();
        assert_eq!(rows[0].id.as_str(), "8");
        assert_eq!(rows[1].id.as_str(), "0190a9c4-2b1e-7c3a-9f00-000000000001");
    }

    #[test]
    fn test_parse_timestamp_variants() {
        let expected = "2025-03-04T05:06:07+00:00";
        for raw in [
            "2025-03-04T05:06:07Z",
            "2025-03-04T05:06:07+00",
            "2025-03-04T05:06:07",
            "2025-03-04 05:06:07",
        ] {
            assert_eq!(parse_timestamp(raw).unwrap().to_rfc3339(), expected, "{raw}");
        }
        assert!(parse_timestamp("yesterday").is_none());
    }
}
