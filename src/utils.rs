// src/utils.rs
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;

/// Make a site-relative URL absolute against `base`; other strings pass through
pub fn normalize_url(raw: &str, base: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if !trimmed.starts_with('/') {
        return Some(trimmed.to_string());
    }

    let joined = url::Url::parse(base)
        .and_then(|b| b.join(trimmed))
        .map(|u| u.to_string());

    Some(joined.unwrap_or_else(|_| format!("{}{}", base.trim_end_matches('/'), trimmed)))
}

/// Ensure the parent directory of a file exists
pub async fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
    }
    Ok(())
}

/// Serialize `value` as indented JSON and write it to `path`
pub async fn write_json_pretty<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let content = serde_json::to_string_pretty(value)
        .with_context(|| format!("Failed to serialize JSON for {}", path.display()))?;

    ensure_parent_dir(path).await?;

    tokio::fs::write(path, content)
        .await
        .with_context(|| format!("Failed to write file: {}", path.display()))
}

/// Read file content as string with proper error context
pub async fn read_file_content(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_url_relative() {
        assert_eq!(
            normalize_url("/jobs/info/1", "https://jobright.ai"),
            Some("https://jobright.ai/jobs/info/1".to_string())
        );
        assert_eq!(
            normalize_url("  /apply/123 ", "http://127.0.0.1:8080"),
            Some("http://127.0.0.1:8080/apply/123".to_string())
        );
    }

    #[test]
    fn test_normalize_url_passthrough() {
        assert_eq!(
            normalize_url("https://boards.greenhouse.io/acme/1", "https://jobright.ai"),
            Some("https://boards.greenhouse.io/acme/1".to_string())
        );
        assert_eq!(
            normalize_url("apply/relative", "https://jobright.ai"),
            Some("apply/relative".to_string())
        );
    }

    #[test]
    fn test_normalize_url_empty() {
        assert_eq!(normalize_url("", "https://jobright.ai"), None);
        assert_eq!(normalize_url("   ", "https://jobright.ai"), None);
    }

    #[test]
    fn test_normalize_url_unparseable_base() {
        assert_eq!(
            normalize_url("/x", "not a base/"),
            Some("not a base/x".to_string())
        );
    }

    #[tokio::test]
    async fn test_write_json_pretty_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.json");

        write_json_pretty(&path, &serde_json::json!([{"a": 1}]))
            .await
            .unwrap();

        let content = read_file_content(&path).await.unwrap();
        assert!(content.contains("\n"));
        let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed[0]["a"], 1);
    }
}
