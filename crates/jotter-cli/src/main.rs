//! Jotter CLI - text notes with photos and videos from the terminal
//!
//! Every command talks to the Supabase project configured for the active profile.

mod auth;
mod cli;
mod commands;
mod config_profiles;
mod error;
mod picker;


use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::commands::auth_cmd::run_auth;
use crate::commands::completions::run_completions;
use crate::commands::config::run_config;
use crate::commands::edit::run_edit;
use crate::commands::list::run_list;
use crate::commands::new::run_new;
use crate::commands::upload::run_upload;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("jotter=info")),
        )
        .init();

    let cli = Cli::parse();
    let profile = cli.profile.as_deref();

    match cli.command {
        Some(Commands::New {
            text,
            images,
            videos,
        }) => run_new(&text, &images, &videos, profile).await?,
        Some(Commands::List { json }) => run_list(json, profile).await?,
        Some(Commands::Edit {
            id,
            text,
            images,
            videos,
        }) => run_edit(&id, text.as_deref(), &images, &videos, profile).await?,
        Some(Commands::Upload { path, kind, json }) => {
            run_upload(&path, kind.into(), json, profile).await?;
        }
        Some(Commands::Completions { shell, output }) => {
            run_completions(shell, output.as_deref())?;
        }
        Some(Commands::Config { command }) => run_config(command, profile)?,
        Some(Commands::Auth { command }) => run_auth(command, profile).await?,
        None => {
            Cli::command().print_help().map_err(CliError::Io)?;
            println!();
        }
    }

    Ok(())
}
