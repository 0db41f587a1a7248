use std::path::PathBuf;

use jotter_core::media::MediaKind;
use jotter_core::NoteDraft;

use crate::commands::common::{attach_media, resolve_note_content, ProfileContext};
use crate::error::CliError;

pub async fn run_new(
    text_parts: &[String],
    images: &[PathBuf],
    videos: &[PathBuf],
    global_profile: Option<&str>,
) -> Result<(), CliError> {
    let text = resolve_note_content(text_parts)?;
    let services = ProfileContext::load(global_profile)?.user_services().await?;

    let mut draft = NoteDraft::new(text);
    attach_media(&services, &mut draft, MediaKind::Image, images).await?;
    attach_media(&services, &mut draft, MediaKind::Video, videos).await?;

    let note = services.notes.create(services.user_id(), &draft).await?;
    println!("{}", note.id);
    Ok(())
}
