//! List-card view of a note.

use std::fmt::Display;

use chrono::{Local, TimeZone};
use serde::Serialize;

use super::note::Note;
use crate::media::MediaKind;

/// Media shown at the top of a card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Thumbnail {
    pub kind: MediaKind,
    pub url: String,
}

/// Everything a list row needs to render a note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoteCard {
    pub id: String,
    pub title: String,
    pub preview: Option<String>,
    pub thumbnail: Option<Thumbnail>,
    /// Attachments beyond the thumbnail, only set when a list holds several.
    pub more_media: Option<usize>,
    pub date_label: String,
    pub image_count: usize,
    pub video_count: usize,
}

impl NoteCard {
    /// Card for `note` with the date in the viewer's local time zone.
    #[must_use]
    pub fn from_note(note: &Note) -> Self {
        Self::from_note_in(note, &Local)
    }

    #[must_use]
    pub fn from_note_in<Tz>(note: &Note, zone: &Tz) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let image_urls = note.image_urls();
        let video_urls = note.video_urls();

        let thumbnail = image_urls
            .first()
            .map(|url| Thumbnail {
                kind: MediaKind::Image,
                url: url.clone(),
            })
            .or_else(|| {
                video_urls.first().map(|url| Thumbnail {
                    kind: MediaKind::Video,
                    url: url.clone(),
                })
            });

        let more_media = (image_urls.len() > 1 || video_urls.len() > 1)
            .then(|| image_urls.len() + video_urls.len() - 1);

        Self {
            id: note.id.to_string(),
            title: note.title().to_string(),
            preview: note.preview().map(ToString::to_string),
            thumbnail,
            more_media,
            date_label: note
                .created_at
                .with_timezone(zone)
                .format("%b %-d, %Y")
                .to_string(),
            image_count: image_urls.len(),
            video_count: video_urls.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, Utc};
    use pretty_assertions::assert_eq;
    use uuid::Uuid;

    use super::*;
    use crate::models::NoteId;

    fn note(text: &str, images: &str, videos: &str) -> Note {
        Note {
            id: NoteId::from_uuid(Uuid::new_v4()),
            user_id: "user-a".to_string(),
            text: text.to_string(),
            image_paths: images.to_string(),
            video_paths: videos.to_string(),
            created_at: Utc.with_ymd_and_hms(2025, 1, 5, 9, 30, 0).unwrap(),
        }
    }

    #[test]
    fn grocery_card_has_title_and_preview() {
        let card = NoteCard::from_note_in(&note("Groceries\nMilk, eggs, bread", "", ""), &Utc);
        assert_eq!(card.title, "Groceries");
        assert_eq!(card.preview.as_deref(), Some("Milk, eggs, bread"));
        assert_eq!(card.thumbnail, None);
        assert_eq!(card.more_media, None);
        assert_eq!(card.date_label, "Jan 5, 2025");
    }

    #[test]
    fn image_wins_thumbnail_over_video() {
        let card = NoteCard::from_note(&note("x", "i1", "v1"));
        assert_eq!(
            card.thumbnail,
            Some(Thumbnail {
                kind: MediaKind::Image,
                url: "i1".to_string(),
            })
        );
        // One of each is not "more".
        assert_eq!(card.more_media, None);
    }

    #[test]
    fn video_thumbnail_when_no_images() {
        let card = NoteCard::from_note(&note("x", "", "v1,v2"));
        assert_eq!(card.thumbnail.unwrap().kind, MediaKind::Video);
        assert_eq!(card.more_media, Some(1));
    }

    #[test]
    fn more_media_counts_everything_but_thumbnail() {
        let card = NoteCard::from_note(&note("x", "i1,i2", "v1"));
        assert_eq!(card.more_media, Some(2));
        assert_eq!(card.image_count, 2);
        assert_eq!(card.video_count, 1);
    }

    #[test]
    fn date_label_follows_the_viewer_zone() {
        let mut late = note("late night", "", "");
        late.created_at = Utc.with_ymd_and_hms(2025, 3, 7, 23, 30, 0).unwrap();

        let utc = NoteCard::from_note_in(&late, &Utc);
        let taipei = NoteCard::from_note_in(&late, &FixedOffset::east_opt(8 * 3600).unwrap());
        let honolulu = NoteCard::from_note_in(&late, &FixedOffset::west_opt(10 * 3600).unwrap());

        assert_eq!(utc.date_label, "Mar 7, 2025");
        assert_eq!(taipei.date_label, "Mar 8, 2025");
        assert_eq!(honolulu.date_label, "Mar 7, 2025");
        assert_eq!(
            NoteCard::from_note(&late).date_label,
            late.created_at.with_timezone(&Local).format("%b %-d, %Y").to_string()
        );
    }
}
