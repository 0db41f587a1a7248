use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use jotter_core::media::MediaKind;

#[derive(Parser)]
#[command(name = "jotter")]
#[command(about = "Text notes with photos and videos, from the command line")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// CLI profile name for Supabase configuration and session
    #[arg(long, global = true, value_name = "NAME")]
    pub profile: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new note, uploading any attached media first
    #[command(alias = "add")]
    New {
        /// Note text (piped stdin or $EDITOR when omitted)
        text: Vec<String>,
        /// Attach a photo
        #[arg(long = "image", value_name = "PATH")]
        images: Vec<PathBuf>,
        /// Attach a video
        #[arg(long = "video", value_name = "PATH")]
        videos: Vec<PathBuf>,
    },
    /// List your notes, newest first
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Edit an existing note
    Edit {
        /// Note ID or unique ID prefix
        id: String,
        /// Replacement text ($EDITOR seeded with the current text when omitted)
        #[arg(long)]
        text: Option<String>,
        /// Append a photo
        #[arg(long = "image", value_name = "PATH")]
        images: Vec<PathBuf>,
        /// Append a video
        #[arg(long = "video", value_name = "PATH")]
        videos: Vec<PathBuf>,
    },
    /// Upload a single file and print its storage path and signed URL
    Upload {
        /// Local file path
        path: PathBuf,
        /// Media kind
        #[arg(long, value_enum)]
        kind: MediaKindArg,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Configure CLI profiles
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Sign up, sign in, or sign out of Supabase
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum MediaKindArg {
    Image,
    Video,
}

impl From<MediaKindArg> for MediaKind {
    fn from(value: MediaKindArg) -> Self {
        match value {
            MediaKindArg::Image => Self::Image,
            MediaKindArg::Video => Self::Video,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Initialize or update profile config
    Init {
        /// Profile name to initialize
        #[arg(long, value_name = "NAME")]
        profile: Option<String>,
        /// Supabase project URL
        #[arg(long, value_name = "URL")]
        supabase_url: Option<String>,
        /// Supabase anon/public key
        #[arg(long, value_name = "KEY")]
        supabase_anon_key: Option<String>,
        /// Storage bucket for media (defaults to `media`)
        #[arg(long, value_name = "BUCKET")]
        media_bucket: Option<String>,
        /// Keep current active profile instead of activating this one
        #[arg(long)]
        no_activate: bool,
    },
}

#[derive(Subcommand)]
pub enum AuthCommands {
    /// Create an account with email/password
    Signup {
        /// Account email
        #[arg(long, value_name = "EMAIL")]
        email: String,
        /// Account password
        #[arg(long, value_name = "PASSWORD")]
        password: String,
    },
    /// Sign in with email/password and store the session in the keychain
    Login {
        /// Account email
        #[arg(long, value_name = "EMAIL")]
        email: String,
        /// Account password
        #[arg(long, value_name = "PASSWORD")]
        password: String,
    },
    /// Show who the profile is signed in as
    Status,
    /// Sign out and clear the stored session
    Logout,
}
