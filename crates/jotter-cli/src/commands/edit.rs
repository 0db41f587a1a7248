use std::path::PathBuf;

use jotter_core::media::MediaKind;
use jotter_core::NoteDraft;

use crate::commands::common::{
    attach_media, capture_editor_input_with_initial, normalize_content,
    normalize_note_identifier, ProfileContext,
};
use crate::error::CliError;

pub async fn run_edit(
    id: &str,
    text: Option<&str>,
    images: &[PathBuf],
    videos: &[PathBuf],
    global_profile: Option<&str>,
) -> Result<(), CliError> {
    let query = normalize_note_identifier(id)?;
    let services = ProfileContext::load(global_profile)?.user_services().await?;
    let note = services.notes.find(services.user_id(), &query).await?;

    let mut draft = NoteDraft::from_note(&note);
    let edited_text = match text {
        Some(text) => normalize_content(text),
        None => capture_editor_input_with_initial(&note.text)?,
    };
    // Blank text fails before any upload.
    let Some(edited_text) = edited_text else {
        return Err(jotter_core::Error::EmptyText.into());
    };
    draft.text = edited_text;

    attach_media(&services, &mut draft, MediaKind::Image, images).await?;
    attach_media(&services, &mut draft, MediaKind::Video, videos).await?;

    if draft == NoteDraft::from_note(&note) {
        println!("{}", note.id);
        return Ok(());
    }

    let updated = services.notes.update(&note.id, &draft).await?;
    println!("{}", updated.id);
    Ok(())
}
