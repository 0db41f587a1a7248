//! Media picker backed by paths given on the command line.

use std::path::PathBuf;

use async_trait::async_trait;
use jotter_core::media::{MediaKind, MediaPicker};

/// Hands out one pre-selected path; `None` behaves like a cancelled picker.
pub struct PathPicker {
    path: Option<PathBuf>,
}

impl PathPicker {
    pub const fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }
}

#[async_trait]
impl MediaPicker for PathPicker {
    /// Readable means allowed. Missing files are left for the read step to report.
    async fn request_permission(&self) -> bool {
        let Some(path) = self.path.as_deref() else {
            return true;
        };
        !matches!(
            tokio::fs::File::open(path).await,
            Err(error) if error.kind() == std::io::ErrorKind::PermissionDenied
        )
    }

    async fn pick(&self, kind: MediaKind) -> Option<String> {
        let path = self.path.as_deref()?;
        tracing::debug!("Picked {} {}", kind, path.display());
        Some(path.to_string_lossy().into_owned())
    }
}
