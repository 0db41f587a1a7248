use std::path::Path;

use jotter_core::media::MediaKind;

use crate::commands::common::ProfileContext;
use crate::error::CliError;
use crate::picker::PathPicker;

pub async fn run_upload(
    path: &Path,
    kind: MediaKind,
    as_json: bool,
    global_profile: Option<&str>,
) -> Result<(), CliError> {
    let services = ProfileContext::load(global_profile)?.user_services().await?;
    let picker = PathPicker::new(Some(path.to_path_buf()));

    let Some(upload) = services
        .media
        .pick_and_upload(&picker, services.user_id(), kind)
        .await?
    else {
        println!("Upload cancelled");
        return Ok(());
    };

    if as_json {
        println!("{}", serde_json::to_string_pretty(&upload)?);
    } else {
        println!("{}", upload.storage_path);
        println!("{}", upload.signed_url);
    }
    Ok(())
}
