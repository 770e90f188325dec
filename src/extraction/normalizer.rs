// src/extraction/normalizer.rs
//! Turns one discovered job object into a canonical `JobRecord`
//!
//! Never fails: each field degrades to `None` (or empty) on its own.

use serde_json::{Map, Value};

use super::company::extract_company;
use super::keywords::extract_keywords;
use super::probe::{
    pick, pick_text, scalar_text, APPLY_KEYS, DETAIL_URL_KEYS, ID_KEYS, LOCATION_KEYS, NAME_KEYS,
    TITLE_KEYS,
};
use super::recruiters::extract_linkedin_recruiters;
use crate::config::ScraperConfig;
use crate::types::JobRecord;
use crate::utils::normalize_url;

#[derive(Debug, Clone)]
pub struct JobNormalizer {
    base_url: String,
    /// Detail page URL up to, not including, the job id
    detail_url_prefix: String,
    max_keywords: usize,
}

impl Default for JobNormalizer {
    fn default() -> Self {
        Self::from_config(&ScraperConfig::default())
    }
}

impl JobNormalizer {
    pub fn from_config(config: &ScraperConfig) -> Self {
        Self {
            base_url: config.origin().to_string(),
            detail_url_prefix: config.job_detail_url(""),
            max_keywords: config.max_keywords,
        }
    }

    pub fn normalize(&self, job: &Map<String, Value>) -> JobRecord {
        let job_id = pick(job, ID_KEYS).and_then(id_text);
        let title = pick(job, TITLE_KEYS).and_then(scalar_text);
        let location = pick_text(job, LOCATION_KEYS, NAME_KEYS);

        let apply_url = self.url_field(job, APPLY_KEYS);
        let jobright_url = self
            .url_field(job, DETAIL_URL_KEYS)
            .or_else(|| job_id.as_deref().map(|id| self.detail_url(id)));

        JobRecord {
            job_id,
            title,
            company: extract_company(job),
            location,
            jobright_url,
            apply_url,
            linkedin_recruiters: extract_linkedin_recruiters(job),
            keywords: extract_keywords(job, self.max_keywords),
            raw: Value::Object(job.clone()),
        }
    }

    fn url_field(&self, job: &Map<String, Value>, keys: &[&str]) -> Option<String> {
        pick(job, keys)
            .and_then(Value::as_str)
            .and_then(|raw| normalize_url(raw, &self.base_url))
    }

    fn detail_url(&self, job_id: &str) -> String {
        format!("{}{}", self.detail_url_prefix, job_id)
    }
}

/// Ids are compared and printed as text; empty strings count as missing
fn id_text(value: &Value) -> Option<String> {
    match value {
        Value::Object(_) | Value::Array(_) => Some(value.to_string()),
        other => scalar_text(other),
    }
    .filter(|s| !s.is_empty())
}
