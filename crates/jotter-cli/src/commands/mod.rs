pub mod auth_cmd;
pub mod common;
pub mod completions;
pub mod config;
pub mod edit;
pub mod list;
pub mod new;
pub mod upload;
