use std::env;
use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

use jotter_core::config::BackendConfig;
use jotter_core::media::MediaKind;
use jotter_core::models::NoteCard;
use jotter_core::services::UserServices;
use jotter_core::session::SessionStore;
use jotter_core::NoteDraft;

use crate::auth::{AuthSession, SupabaseAuthService};
use crate::config_profiles::CliProfilesConfig;
use crate::error::CliError;
use crate::picker::PathPicker;

/// Resolved profile name plus the backend it points at.
pub struct ProfileContext {
    pub name: String,
    pub backend: BackendConfig,
}

impl ProfileContext {
    /// Profile settings win; `SUPABASE_URL`/`SUPABASE_ANON_KEY` are the fallback.
    pub fn load(explicit_profile: Option<&str>) -> Result<Self, CliError> {
        let config = CliProfilesConfig::load().map_err(CliError::Config)?;
        let name = config.resolve_profile_name(explicit_profile);

        let from_profile = match config.profile(&name) {
            Some(profile) => profile.backend_config()?,
            None => None,
        };
        let backend = match from_profile {
            Some(backend) => backend,
            None => BackendConfig::from_env()?.ok_or(CliError::NotConfigured)?,
        };

        Ok(Self { name, backend })
    }

    pub fn auth_service(&self) -> Result<SupabaseAuthService, CliError> {
        Ok(SupabaseAuthService::new(&self.name, &self.backend)?)
    }

    /// Start the session store, wait for it to settle, and return the session.
    pub async fn current_session(&self) -> Result<Option<AuthSession>, CliError> {
        let sessions = SessionStore::start(self.auth_service()?.provider());
        let state = sessions.ready().await;
        sessions.shutdown();
        Ok(state.session().cloned())
    }

    /// Row and blob clients for the signed-in user.
    pub async fn user_services(&self) -> Result<UserServices, CliError> {
        let session = self
            .current_session()
            .await?
            .ok_or_else(|| CliError::NotSignedIn(self.name.clone()))?;
        Ok(UserServices::for_session(&self.backend, &session)?)
    }
}

/// Upload each path in order and append its signed URL to the draft.
///
/// Stops at the first failure; the draft keeps what was attached so far.
pub async fn attach_media(
    services: &UserServices,
    draft: &mut NoteDraft,
    kind: MediaKind,
    paths: &[PathBuf],
) -> Result<(), CliError> {
    for path in paths {
        let picker = PathPicker::new(Some(path.clone()));
        let Some(upload) = services
            .media
            .pick_and_upload(&picker, services.user_id(), kind)
            .await?
        else {
            continue;
        };
        eprintln!("Uploaded {}", upload.storage_path);
        draft.attach(kind, &upload);
    }
    Ok(())
}

pub fn format_note_lines(cards: &[NoteCard]) -> Vec<String> {
    cards
        .iter()
        .map(|card| {
            let short_id = card.id.chars().take(13).collect::<String>();
            let title = truncate_line(&card.title, 40);
            let media = render_media_summary(card);

            if media.is_empty() {
                format!("{short_id:<13}  {title:<40}  {}", card.date_label)
            } else {
                format!(
                    "{short_id:<13}  {title:<40}  {:<12}  {media}",
                    card.date_label
                )
            }
        })
        .collect()
}

pub fn render_media_summary(card: &NoteCard) -> String {
    let mut parts = Vec::new();
    if card.image_count > 0 {
        parts.push(format!(
            "{} photo{}",
            card.image_count,
            if card.image_count == 1 { "" } else { "s" }
        ));
    }
    if card.video_count > 0 {
        parts.push(format!(
            "{} video{}",
            card.video_count,
            if card.video_count == 1 { "" } else { "s" }
        ));
    }
    let mut summary = parts.join(", ");
    if let Some(more) = card.more_media {
        summary.push_str(&format!(" (+ {more} more)"));
    }
    summary
}

pub fn truncate_line(text: &str, max_chars: usize) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");

    if collapsed.chars().count() <= max_chars {
        collapsed
    } else {
        let take_len = max_chars.saturating_sub(3);
        let mut truncated = collapsed.chars().take(take_len).collect::<String>();
        truncated.push_str("...");
        truncated
    }
}

pub fn resolve_note_content(content_parts: &[String]) -> Result<String, CliError> {
    if let Some(content) = normalize_content(&content_parts.join(" ")) {
        return Ok(content);
    }

    if let Some(content) = read_piped_stdin()? {
        return Ok(content);
    }

    if let Some(content) = capture_editor_input()? {
        return Ok(content);
    }

    Err(CliError::EmptyContent)
}

pub fn normalize_content(content: &str) -> Option<String> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub fn normalize_note_identifier(id: &str) -> Result<String, CliError> {
    let trimmed = id.trim();
    if trimmed.is_empty() {
        Err(CliError::EmptyNoteId)
    } else {
        Ok(trimmed.to_string())
    }
}

pub fn read_piped_stdin() -> Result<Option<String>, CliError> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        return Ok(None);
    }

    let mut buffer = String::new();
    stdin.lock().read_to_string(&mut buffer)?;
    Ok(normalize_content(&buffer))
}

pub fn capture_editor_input() -> Result<Option<String>, CliError> {
    capture_editor_input_with_initial("")
}

pub fn capture_editor_input_with_initial(
    initial_content: &str,
) -> Result<Option<String>, CliError> {
    let editor = preferred_editor();
    let temp_file = create_temp_note_file_path();
    std::fs::write(&temp_file, initial_content)?;

    let launch_result = launch_editor(&editor, &temp_file);
    let note_content = std::fs::read_to_string(&temp_file)?;
    let _ = std::fs::remove_file(&temp_file);

    launch_result?;
    Ok(normalize_content(&note_content))
}

pub fn launch_editor(editor: &str, file_path: &Path) -> Result<(), CliError> {
    match Command::new(editor).arg(file_path).status() {
        Ok(status) => {
            if status.success() {
                Ok(())
            } else {
                Err(CliError::EditorFailed(format!(
                    "`{editor}` exited with status {status}"
                )))
            }
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            // EDITOR values with arguments, e.g. "code --wait"
            let mut parts = editor.split_whitespace();
            let Some(program) = parts.next() else {
                return Err(CliError::EditorFailed("empty EDITOR command".into()));
            };

            let mut command = Command::new(program);
            command.args(parts).arg(file_path);

            let status = command.status()?;
            if status.success() {
                Ok(())
            } else {
                Err(CliError::EditorFailed(format!(
                    "`{editor}` exited with status {status}"
                )))
            }
        }
        Err(err) => Err(CliError::Io(err)),
    }
}

pub fn preferred_editor() -> String {
    env::var("VISUAL")
        .or_else(|_| env::var("EDITOR"))
        .unwrap_or_else(|_| default_editor().to_string())
}

pub const fn default_editor() -> &'static str {
    if cfg!(windows) {
        "notepad"
    } else {
        "vi"
    }
}

pub fn create_temp_note_file_path() -> PathBuf {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |duration| duration.as_nanos());
    env::temp_dir().join(format!("jotter-note-{}-{now}.md", std::process::id()))
}
