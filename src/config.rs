// src/config.rs
//! Scraper configuration: defaults, optional TOML file, environment overrides

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::extraction::keywords::DEFAULT_MAX_KEYWORDS;

pub const DEFAULT_BASE_URL: &str = "https://jobright.ai";
pub const DEFAULT_RECOMMEND_PAGE_PATH: &str = "/jobs/recommend";
pub const DEFAULT_RECOMMEND_API_PATH: &str = "/swan/recommend/list/jobs";
pub const DEFAULT_JOB_DETAIL_PATH: &str = "/jobs/info/";
pub const DEFAULT_STATE_FILE: &str = "jobright_state.json";
pub const DEFAULT_DEBUG_PAYLOAD_FILE: &str = "jobright_debug_payload.json";
pub const DEFAULT_CONFIG_FILE: &str = "jobright.toml";

#[derive(Debug, Clone)]
pub struct ScraperConfig {
    pub base_url: String,
    pub recommend_page_path: String,
    pub recommend_api_path: String,
    pub job_detail_path: String,
    pub state_file: PathBuf,
    pub debug_payload_file: PathBuf,
    pub page_size: usize,
    pub sort_condition: i64,
    pub max_keywords: usize,
    pub navigation_timeout_secs: u64,
    pub login_timeout_secs: u64,
    pub settle_delay_ms: u64,
    pub reauth_settle_ms: u64,
    pub headless: bool,
    pub chrome_executable: Option<PathBuf>,
}

/// Every field optional so a config file only needs to name what it changes
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    base_url: Option<String>,
    recommend_page_path: Option<String>,
    recommend_api_path: Option<String>,
    job_detail_path: Option<String>,
    state_file: Option<PathBuf>,
    debug_payload_file: Option<PathBuf>,
    page_size: Option<usize>,
    sort_condition: Option<i64>,
    max_keywords: Option<usize>,
    navigation_timeout_secs: Option<u64>,
    login_timeout_secs: Option<u64>,
    settle_delay_ms: Option<u64>,
    reauth_settle_ms: Option<u64>,
    headless: Option<bool>,
    chrome_executable: Option<PathBuf>,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            recommend_page_path: DEFAULT_RECOMMEND_PAGE_PATH.to_string(),
            recommend_api_path: DEFAULT_RECOMMEND_API_PATH.to_string(),
            job_detail_path: DEFAULT_JOB_DETAIL_PATH.to_string(),
            state_file: PathBuf::from(DEFAULT_STATE_FILE),
            debug_payload_file: PathBuf::from(DEFAULT_DEBUG_PAYLOAD_FILE),
            page_size: 10,
            sort_condition: 0,
            max_keywords: DEFAULT_MAX_KEYWORDS,
            navigation_timeout_secs: 60,
            login_timeout_secs: 120,
            settle_delay_ms: 1500,
            reauth_settle_ms: 1200,
            headless: true,
            chrome_executable: None,
        }
    }
}

impl ScraperConfig {
    /// Load defaults, then the config file (explicit path, `JOBRIGHT_CONFIG`,
    /// or `./jobright.toml`), then environment overrides
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut config = Self::default();

        let explicit = config_path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var("JOBRIGHT_CONFIG").ok().map(PathBuf::from));

        match explicit {
            Some(path) => {
                if !path.exists() {
                    anyhow::bail!("Config file not found: {}", path.display());
                }
                config.apply_file(&path)?;
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    config.apply_file(&default_path)?;
                }
            }
        }

        config.apply_env();
        Ok(config)
    }

    fn apply_file(&mut self, path: &Path) -> Result<()> {
        info!("Loading configuration from {}", path.display());
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let file = Self::parse_file(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        self.merge(file);
        Ok(())
    }

    fn parse_file(content: &str) -> Result<ConfigFile> {
        Ok(toml::from_str(content)?)
    }

    fn merge(&mut self, file: ConfigFile) {
        if let Some(v) = file.base_url {
            self.base_url = v;
        }
        if let Some(v) = file.recommend_page_path {
            self.recommend_page_path = v;
        }
        if let Some(v) = file.recommend_api_path {
            self.recommend_api_path = v;
        }
        if let Some(v) = file.job_detail_path {
            self.job_detail_path = v;
        }
        if let Some(v) = file.state_file {
            self.state_file = v;
        }
        if let Some(v) = file.debug_payload_file {
            self.debug_payload_file = v;
        }
        if let Some(v) = file.page_size {
            self.page_size = v;
        }
        if let Some(v) = file.sort_condition {
            self.sort_condition = v;
        }
        if let Some(v) = file.max_keywords {
            self.max_keywords = v;
        }
        if let Some(v) = file.navigation_timeout_secs {
            self.navigation_timeout_secs = v;
        }
        if let Some(v) = file.login_timeout_secs {
            self.login_timeout_secs = v;
        }
        if let Some(v) = file.settle_delay_ms {
            self.settle_delay_ms = v;
        }
        if let Some(v) = file.reauth_settle_ms {
            self.reauth_settle_ms = v;
        }
        if let Some(v) = file.headless {
            self.headless = v;
        }
        if file.chrome_executable.is_some() {
            self.chrome_executable = file.chrome_executable;
        }
    }

    fn apply_env(&mut self) {
        if let Ok(v) = std::env::var("JOBRIGHT_BASE_URL") {
            debug!("JOBRIGHT_BASE_URL override: {}", v);
            self.base_url = v;
        }
        if let Ok(v) = std::env::var("JOBRIGHT_STATE_FILE") {
            self.state_file = PathBuf::from(v);
        }
        if let Ok(v) = std::env::var("JOBRIGHT_DEBUG_PAYLOAD") {
            self.debug_payload_file = PathBuf::from(v);
        }
        if let Ok(v) = std::env::var("JOBRIGHT_CHROME_PATH") {
            self.chrome_executable = Some(PathBuf::from(v));
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_state_file(mut self, path: PathBuf) -> Self {
        self.state_file = path;
        self
    }

    pub fn with_debug_payload_file(mut self, path: PathBuf) -> Self {
        self.debug_payload_file = path;
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn with_sort_condition(mut self, sort_condition: i64) -> Self {
        self.sort_condition = sort_condition;
        self
    }

    pub fn with_max_keywords(mut self, max_keywords: usize) -> Self {
        self.max_keywords = max_keywords;
        self
    }

    pub fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Base origin without a trailing slash
    pub fn origin(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    pub fn recommend_page_url(&self) -> String {
        format!("{}{}", self.origin(), self.recommend_page_path)
    }

    pub fn recommend_api_url(&self) -> String {
        format!("{}{}", self.origin(), self.recommend_api_path)
    }

    pub fn job_detail_url(&self, job_id: &str) -> String {
        format!("{}{}{}", self.origin(), self.job_detail_path, job_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_urls() {
        let config = ScraperConfig::default();
        assert_eq!(config.recommend_page_url(), "https://jobright.ai/jobs/recommend");
        assert_eq!(
            config.recommend_api_url(),
            "https://jobright.ai/swan/recommend/list/jobs"
        );
        assert_eq!(
            config.job_detail_url("abc123"),
            "https://jobright.ai/jobs/info/abc123"
        );
    }

    #[test]
    fn test_trailing_slash_base_url() {
        let config = ScraperConfig::default().with_base_url("http://127.0.0.1:8080/");
        assert_eq!(
            config.recommend_api_url(),
            "http://127.0.0.1:8080/swan/recommend/list/jobs"
        );
    }

    #[test]
    fn test_partial_config_file_merges_over_defaults() {
        let file = ScraperConfig::parse_file(
            r#"
            base_url = "http://localhost:9000"
            page_size = 3
            headless = false
            "#,
        )
        .unwrap();

        let mut config = ScraperConfig::default();
        config.merge(file);

        assert_eq!(config.base_url, "http://localhost:9000");
        assert_eq!(config.page_size, 3);
        assert!(!config.headless);
        assert_eq!(config.max_keywords, 25);
        assert_eq!(config.state_file, PathBuf::from(DEFAULT_STATE_FILE));
    }

    #[test]
    fn test_page_size_never_zero() {
        let config = ScraperConfig::default().with_page_size(0);
        assert_eq!(config.page_size, 1);
    }

    #[test]
    fn test_missing_explicit_config_file_is_an_error() {
        let result = ScraperConfig::load(Some(Path::new("/definitely/not/here.toml")));
        assert!(result.is_err());
    }
}
