// src/error.rs
//! Run-ending failures the CLI needs to tell apart from ordinary plumbing errors

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Missing session state file {}. Run with --login first.", path.display())]
    MissingSession { path: PathBuf },

    #[error("Auth failed calling {url} (HTTP {status}). Run with --login again.")]
    AuthFailed { url: String, status: u16 },

    #[error("Chromium not found. Install Chrome/Chromium or set JOBRIGHT_CHROME_PATH.")]
    BrowserUnavailable,
}

impl ScrapeError {
    /// Whether the user has to redo `--login` to recover
    pub fn needs_login(&self) -> bool {
        matches!(
            self,
            ScrapeError::MissingSession { .. } | ScrapeError::AuthFailed { .. }
        )
    }
}
