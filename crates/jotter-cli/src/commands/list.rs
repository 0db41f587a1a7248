use jotter_core::models::NoteCard;

use crate::commands::common::{format_note_lines, ProfileContext};
use crate::error::CliError;

pub async fn run_list(as_json: bool, global_profile: Option<&str>) -> Result<(), CliError> {
    let services = ProfileContext::load(global_profile)?.user_services().await?;
    let notes = services.notes.list(services.user_id()).await?;
    let cards = notes.iter().map(NoteCard::from_note).collect::<Vec<_>>();

    if as_json {
        println!("{}", serde_json::to_string_pretty(&cards)?);
    } else if cards.is_empty() {
        println!("No notes yet. Create one with `jotter new`.");
    } else {
        for line in format_note_lines(&cards) {
            println!("{line}");
        }
    }

    Ok(())
}
