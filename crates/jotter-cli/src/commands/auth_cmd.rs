use jotter_core::auth::SignUpOutcome;

use crate::auth::clear_stored_session;
use crate::cli::AuthCommands;
use crate::commands::common::ProfileContext;
use crate::config_profiles::CliProfilesConfig;
use crate::error::CliError;

pub async fn run_auth(command: AuthCommands, global_profile: Option<&str>) -> Result<(), CliError> {
    match command {
        AuthCommands::Signup { email, password } => {
            let context = ProfileContext::load(global_profile)?;
            let outcome = context
                .auth_service()?
                .sign_up(&email, &password)
                .await?;
            match outcome {
                SignUpOutcome::SignedIn(session) => {
                    let email_label = session.user.email.as_deref().unwrap_or(&email);
                    println!("Signed up profile '{}' as {email_label}", context.name);
                }
                SignUpOutcome::ConfirmationRequired => {
                    println!("Check {email} to confirm your account, then run `jotter auth login`.");
                }
            }
            Ok(())
        }
        AuthCommands::Login { email, password } => {
            let context = ProfileContext::load(global_profile)?;
            let session = context.auth_service()?.sign_in(&email, &password).await?;
            let email_label = session.user.email.as_deref().unwrap_or("(no email)");
            println!("Signed in profile '{}' as {email_label}", context.name);
            Ok(())
        }
        AuthCommands::Status => {
            let context = ProfileContext::load(global_profile)?;
            if let Some(session) = context.current_session().await? {
                let email_label = session.user.email.as_deref().unwrap_or("(no email)");
                println!(
                    "Profile '{}' is signed in as {} (user_id={}, expires_at={})",
                    context.name, email_label, session.user.id, session.expires_at
                );
            } else {
                println!("Profile '{}' is not signed in.", context.name);
            }
            Ok(())
        }
        AuthCommands::Logout => {
            let profile_name = match ProfileContext::load(global_profile) {
                Ok(context) => {
                    context.auth_service()?.sign_out().await?;
                    context.name
                }
                // Without a backend there is nothing to revoke; just forget the session.
                Err(CliError::NotConfigured) => {
                    let config = CliProfilesConfig::load().map_err(CliError::Config)?;
                    let name = config.resolve_profile_name(global_profile);
                    clear_stored_session(&name)?;
                    name
                }
                Err(error) => return Err(error),
            };
            println!("Signed out profile '{profile_name}'");
            Ok(())
        }
    }
}
