use std::env;

use jotter_core::config::{ENV_MEDIA_BUCKET, ENV_SUPABASE_ANON_KEY, ENV_SUPABASE_URL};
use jotter_core::util::is_http_url;

use crate::cli::ConfigCommands;
use crate::config_profiles::{normalize_text_option, CliProfile, CliProfilesConfig};
use crate::error::CliError;

pub fn run_config(command: ConfigCommands, global_profile: Option<&str>) -> Result<(), CliError> {
    match command {
        ConfigCommands::Init {
            profile,
            supabase_url,
            supabase_anon_key,
            media_bucket,
            no_activate,
        } => {
            let mut config = CliProfilesConfig::load().map_err(CliError::Config)?;
            let profile_name = config.resolve_profile_name(profile.as_deref().or(global_profile));
            let updates = ProfileUpdates {
                supabase_url,
                supabase_anon_key,
                media_bucket,
            };

            let missing = apply_profile_init(
                &mut config,
                &profile_name,
                updates.with_env_fallback(|key| env::var(key).ok()),
                no_activate,
            )?;

            let path = config.save().map_err(CliError::Config)?;
            println!(
                "Profile '{}' initialized at {}",
                profile_name,
                path.display()
            );
            if missing.is_empty() {
                println!(
                    "Profile '{profile_name}' is ready. Run `jotter auth login --email <email> --password <password>`."
                );
            } else {
                println!(
                    "Profile '{}' is missing: {}",
                    profile_name,
                    missing.join(", ")
                );
            }
            Ok(())
        }
    }
}

/// Values supplied to `config init`; `None` keeps what the profile already has.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdates {
    pub supabase_url: Option<String>,
    pub supabase_anon_key: Option<String>,
    pub media_bucket: Option<String>,
}

impl ProfileUpdates {
    /// Fill unset values from `SUPABASE_URL`, `SUPABASE_ANON_KEY` and `JOTTER_MEDIA_BUCKET`.
    #[must_use]
    pub fn with_env_fallback(self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            supabase_url: normalize_text_option(self.supabase_url)
                .or_else(|| normalize_text_option(lookup(ENV_SUPABASE_URL))),
            supabase_anon_key: normalize_text_option(self.supabase_anon_key)
                .or_else(|| normalize_text_option(lookup(ENV_SUPABASE_ANON_KEY))),
            media_bucket: normalize_text_option(self.media_bucket)
                .or_else(|| normalize_text_option(lookup(ENV_MEDIA_BUCKET))),
        }
    }
}

/// Merge `updates` into the named profile. Returns the fields still unset.
pub fn apply_profile_init(
    config: &mut CliProfilesConfig,
    profile_name: &str,
    updates: ProfileUpdates,
    no_activate: bool,
) -> Result<Vec<&'static str>, CliError> {
    let profile = config.profile_mut_or_default(profile_name);
    if let Some(value) = normalize_text_option(updates.supabase_url) {
        profile.supabase_url = Some(value);
    }
    if let Some(value) = normalize_text_option(updates.supabase_anon_key) {
        profile.supabase_anon_key = Some(value);
    }
    if let Some(value) = normalize_text_option(updates.media_bucket) {
        profile.media_bucket = Some(value);
    }

    validate_profile(profile)?;
    let missing = missing_fields(profile);

    if !no_activate {
        config.active_profile = Some(profile_name.to_string());
    }
    Ok(missing)
}

fn validate_profile(profile: &CliProfile) -> Result<(), CliError> {
    if let Some(url) = profile.supabase_url() {
        if !is_http_url(&url) {
            return Err(CliError::Config(
                "supabase_url must include http:// or https://".to_string(),
            ));
        }
    }
    if let Some(bucket) = profile.media_bucket() {
        if bucket.contains('/') {
            return Err(CliError::Config(
                "media_bucket must not contain '/'".to_string(),
            ));
        }
    }
    Ok(())
}

fn missing_fields(profile: &CliProfile) -> Vec<&'static str> {
    let mut missing = Vec::new();
    if profile.supabase_url().is_none() {
        missing.push("supabase_url");
    }
    if profile.supabase_anon_key().is_none() {
        missing.push("supabase_anon_key");
    }
    missing
}
