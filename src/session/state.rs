// src/session/state.rs
//! Session state file: cookies plus per-origin localStorage
//!
//! The layout matches a Playwright `storage_state` file so sessions saved by
//! either tool can be reused. Nothing outside `session` and `browser` looks
//! inside it; everyone else loads it, hands it over and saves it back.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

use crate::error::ScrapeError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    #[serde(default)]
    pub cookies: Vec<StoredCookie>,
    #[serde(default)]
    pub origins: Vec<OriginStorage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub captured_at: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredCookie {
    pub name: String,
    pub value: String,
    #[serde(default)]
    pub domain: String,
    #[serde(default = "default_cookie_path")]
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires: Option<f64>,
    #[serde(default)]
    pub http_only: bool,
    #[serde(default)]
    pub secure: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub same_site: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OriginStorage {
    pub origin: String,
    #[serde(default)]
    pub local_storage: Vec<StorageEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageEntry {
    pub name: String,
    pub value: String,
}

fn default_cookie_path() -> String {
    "/".to_string()
}

impl SessionState {
    /// Load the state file; a missing file is `ScrapeError::MissingSession`
    pub async fn load(path: &Path) -> Result<Self> {
        if tokio::fs::metadata(path).await.is_err() {
            return Err(ScrapeError::MissingSession {
                path: path.to_path_buf(),
            }
            .into());
        }

        let content = crate::utils::read_file_content(path).await?;
        let state: SessionState = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse session state: {}", path.display()))?;

        debug!(
            "Loaded session state with {} cookies and {} origins",
            state.cookies.len(),
            state.origins.len()
        );
        Ok(state)
    }

    /// Replace the state file as a whole: write a sibling temp file, then rename
    pub async fn save(&self, path: &Path) -> Result<()> {
        let content =
            serde_json::to_string_pretty(self).context("Failed to serialize session state")?;

        crate::utils::ensure_parent_dir(path).await?;

        let mut tmp = path.as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp = std::path::PathBuf::from(tmp);

        tokio::fs::write(&tmp, content)
            .await
            .with_context(|| format!("Failed to write session state: {}", tmp.display()))?;
        tokio::fs::rename(&tmp, path)
            .await
            .with_context(|| format!("Failed to replace session state: {}", path.display()))?;

        info!(
            "Saved session state ({} cookies) to {}",
            self.cookies.len(),
            path.display()
        );
        Ok(())
    }

    /// localStorage entries recorded for `origin`
    pub fn local_storage_for(&self, origin: &str) -> &[StorageEntry] {
        let origin = origin.trim_end_matches('/');
        self.origins
            .iter()
            .find(|o| o.origin.trim_end_matches('/') == origin)
            .map(|o| o.local_storage.as_slice())
            .unwrap_or_default()
    }

    /// Fold a fresh capture into this state. Captured cookies and origins
    /// replace matching entries; anything the capture could not see is kept.
    pub fn refresh_with(&mut self, fresh: SessionState) {
        for cookie in fresh.cookies {
            match self.cookies.iter_mut().find(|c| {
                c.name == cookie.name && same_domain(&c.domain, &cookie.domain) && c.path == cookie.path
            }) {
                Some(existing) => *existing = cookie,
                None => self.cookies.push(cookie),
            }
        }

        for origin in fresh.origins {
            let key = origin.origin.trim_end_matches('/');
            match self
                .origins
                .iter_mut()
                .find(|o| o.origin.trim_end_matches('/') == key)
            {
                Some(existing) => *existing = origin,
                None => self.origins.push(origin),
            }
        }

        self.captured_at = fresh.captured_at.or(self.captured_at);
    }
}

// CDP reports host-only cookies without the leading dot Playwright may store
fn same_domain(a: &str, b: &str) -> bool {
    a.trim_start_matches('.') == b.trim_start_matches('.')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_state_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jobright_state.json");

        let err = SessionState::load(&path).await.unwrap_err();
        let scrape_err = err.downcast_ref::<ScrapeError>().unwrap();
        assert!(matches!(scrape_err, ScrapeError::MissingSession { .. }));
    }

    #[tokio::test]
    async fn test_reads_playwright_storage_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        tokio::fs::write(
            &path,
            r#"{
                "cookies": [
                    {"name": "SESSION", "value": "abc", "domain": ".jobright.ai", "path": "/",
                     "expires": 1893456000.5, "httpOnly": true, "secure": true, "sameSite": "Lax"}
                ],
                "origins": [
                    {"origin": "https://jobright.ai", "localStorage": [{"name": "token", "value": "t"}]}
                ]
            }"#,
        )
        .await
        .unwrap();

        let state = SessionState::load(&path).await.unwrap();
        assert_eq!(state.cookies.len(), 1);
        assert!(state.cookies[0].http_only);
        assert_eq!(state.cookies[0].same_site.as_deref(), Some("Lax"));
        assert_eq!(state.local_storage_for("https://jobright.ai/").len(), 1);
        assert!(state.local_storage_for("https://other.example").is_empty());
    }

    #[tokio::test]
    async fn test_empty_state_is_valid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        tokio::fs::write(&path, r#"{"cookies": [], "origins": []}"#)
            .await
            .unwrap();

        let state = SessionState::load(&path).await.unwrap();
        assert_eq!(state, SessionState::default());
    }

    fn cookie(name: &str, domain: &str, value: &str) -> StoredCookie {
        StoredCookie {
            name: name.to_string(),
            value: value.to_string(),
            domain: domain.to_string(),
            path: "/".to_string(),
            expires: Some(1_900_000_000.0),
            http_only: false,
            secure: true,
            same_site: Some("Lax".to_string()),
        }
    }

    fn origin(name: &str, key: &str, value: &str) -> OriginStorage {
        OriginStorage {
            origin: name.to_string(),
            local_storage: vec![StorageEntry {
                name: key.to_string(),
                value: value.to_string(),
            }],
        }
    }

    #[test]
    fn test_refresh_keeps_what_the_capture_missed() {
        let mut state = SessionState {
            cookies: vec![
                cookie("sid", ".jobright.ai", "old"),
                cookie("sso", "auth.example.com", "keep"),
            ],
            origins: vec![
                origin("https://jobright.ai", "token", "old"),
                origin("https://auth.example.com", "refresh", "keep"),
            ],
            captured_at: Some(1),
        };

        state.refresh_with(SessionState {
            cookies: vec![cookie("sid", "jobright.ai", "new"), cookie("ab", "jobright.ai", "x")],
            origins: vec![origin("https://jobright.ai/", "token", "new")],
            captured_at: Some(2),
        });

        let values: Vec<_> = state.cookies.iter().map(|c| c.value.as_str()).collect();
        assert_eq!(values, vec!["new", "keep", "x"]);
        assert_eq!(state.origins.len(), 2);
        assert_eq!(state.local_storage_for("https://jobright.ai")[0].value, "new");
        assert_eq!(state.local_storage_for("https://auth.example.com")[0].value, "keep");
        assert_eq!(state.captured_at, Some(2));
    }

    #[tokio::test]
    async fn test_save_then_load_replaces_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        tokio::fs::write(&path, "stale").await.unwrap();

        let state = SessionState {
            cookies: vec![StoredCookie {
                name: "a".to_string(),
                value: "1".to_string(),
                domain: "jobright.ai".to_string(),
                path: "/".to_string(),
                expires: None,
                http_only: false,
                secure: true,
                same_site: None,
            }],
            origins: Vec::new(),
            captured_at: Some(1_700_000_000),
        };
        state.save(&path).await.unwrap();

        assert_eq!(SessionState::load(&path).await.unwrap(), state);
        assert!(!dir.path().join("state.json.tmp").exists());
    }
}
