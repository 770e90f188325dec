// src/pagination.rs
//! Offset/count paging over the recommendations API

use anyhow::{Context, Result};
use serde_json::Value;
use std::collections::HashSet;
use tracing::{debug, info, warn};

use crate::config::ScraperConfig;
use crate::error::ScrapeError;
use crate::extraction::{discover_jobs, JobNormalizer};
use crate::types::{ApiResponse, JobRecord};
use crate::utils::write_json_pretty;

/// An authenticated channel to the recommendations API
#[allow(async_fn_in_trait)]
pub trait RecommendationApi {
    /// GET `url` with the session's credentials
    async fn get(&mut self, url: &str) -> Result<ApiResponse>;

    /// Refresh the authenticated context before a retry
    async fn reauthenticate(&mut self) -> Result<()>;
}

pub struct PaginationDriver<'a> {
    config: &'a ScraperConfig,
    normalizer: JobNormalizer,
}

impl<'a> PaginationDriver<'a> {
    pub fn new(config: &'a ScraperConfig) -> Self {
        Self {
            config,
            normalizer: JobNormalizer::from_config(config),
        }
    }

    /// Request URL for one window of results
    pub fn page_url(&self, refresh: bool, position: usize, count: usize) -> Result<String> {
        let api_url = self.config.recommend_api_url();
        let mut url = url::Url::parse(&api_url)
            .with_context(|| format!("Invalid recommendations API URL: {}", api_url))?;
        url.query_pairs_mut()
            .append_pair("refresh", if refresh { "true" } else { "false" })
            .append_pair("sortCondition", &self.config.sort_condition.to_string())
            .append_pair("position", &position.to_string())
            .append_pair("count", &count.to_string());
        Ok(url.to_string())
    }

    /// Fetch up to `max_items` records, de-duplicated by job id
    pub async fn run<A: RecommendationApi>(
        &self,
        api: &mut A,
        max_items: usize,
    ) -> Result<Vec<JobRecord>> {
        let mut out: Vec<JobRecord> = Vec::new();
        let mut seen_ids: HashSet<String> = HashSet::new();
        let mut position = 0usize;
        let mut refresh = true;
        let page_size = self.config.page_size.max(1);

        while out.len() < max_items {
            let count = page_size.min(max_items - out.len());
            let url = self.page_url(refresh, position, count)?;

            let response = self.fetch_with_reauth(api, &url).await?;

            if !response.is_success() {
                warn!(
                    "API returned HTTP {} at position={}. Stopping.",
                    response.status, position
                );
                break;
            }

            let payload: Value = match serde_json::from_str(&response.body) {
                Ok(payload) => payload,
                Err(e) => {
                    warn!("Response at position={} is not JSON: {}", position, e);
                    self.dump_raw_body(&response.body).await;
                    break;
                }
            };

            let added = match self.absorb_page(&payload, &mut out, &mut seen_ids, max_items) {
                Some(added) => added,
                None => {
                    self.dump_payload(&payload).await;
                    break;
                }
            };

            debug!(position, count, added, total = out.len(), "Page processed");

            if added == 0 {
                info!("No new jobs at position={}, stopping", position);
                break;
            }

            position += count;
            refresh = false;
        }

        info!("Pagination finished with {} jobs", out.len());
        Ok(out)
    }

    /// One retry after re-authentication; a second 401/403 ends the run
    async fn fetch_with_reauth<A: RecommendationApi>(
        &self,
        api: &mut A,
        url: &str,
    ) -> Result<ApiResponse> {
        let response = api.get(url).await?;
        if !response.is_auth_failure() {
            return Ok(response);
        }

        warn!(
            "HTTP {} from API, re-authenticating and retrying once",
            response.status
        );
        api.reauthenticate()
            .await
            .context("Failed to re-establish session")?;

        let retry = api.get(url).await?;
        if retry.is_auth_failure() {
            return Err(ScrapeError::AuthFailed {
                url: url.to_string(),
                status: retry.status,
            }
            .into());
        }
        Ok(retry)
    }

    /// Normalize and append this page's jobs; `None` when the payload held none
    fn absorb_page(
        &self,
        payload: &Value,
        out: &mut Vec<JobRecord>,
        seen_ids: &mut HashSet<String>,
        max_items: usize,
    ) -> Option<usize> {
        let candidates = discover_jobs(payload);
        if candidates.is_empty() {
            return None;
        }

        let mut added = 0;
        for candidate in candidates {
            let record = self.normalizer.normalize(candidate);

            if let Some(id) = &record.job_id {
                if !seen_ids.insert(id.clone()) {
                    continue;
                }
            }

            out.push(record);
            added += 1;
            if out.len() >= max_items {
                break;
            }
        }
        Some(added)
    }

    async fn dump_payload(&self, payload: &Value) {
        let path = &self.config.debug_payload_file;
        match write_json_pretty(path, payload).await {
            Ok(()) => info!("No job objects found. Dumped {}", path.display()),
            Err(e) => warn!("No job objects found and the payload dump failed: {e:#}"),
        }
    }

    async fn dump_raw_body(&self, body: &str) {
        let path = &self.config.debug_payload_file;
        match tokio::fs::write(path, body).await {
            Ok(()) => info!("Dumped raw response to {}", path.display()),
            Err(e) => warn!("Failed to dump raw response to {}: {}", path.display(), e),
        }
    }
}
