use anyhow::Result;
use std::time::Duration;
use tracing::{info, warn};

pub mod browser;
pub mod cli;
pub mod config;
pub mod error;
pub mod extraction;
pub mod output;
pub mod pagination;
pub mod session;
pub mod types;
pub mod utils;

pub use config::ScraperConfig;
pub use error::ScrapeError;
pub use types::JobRecord;

use browser::BrowserSession;
use pagination::PaginationDriver;
use session::SessionState;

/// Jobright recommendations scraper
pub struct JobrightScraper {
    pub config: ScraperConfig,
}

impl JobrightScraper {
    pub fn new(config: ScraperConfig) -> Self {
        Self { config }
    }

    /// Interactive login; overwrites the session state file
    pub async fn login(&self) -> Result<()> {
        let state = session::capture_login_session(&self.config).await?;
        state.save(&self.config.state_file).await?;
        println!("[OK] Saved session to {}", self.config.state_file.display());
        Ok(())
    }

    /// Fetch up to `max_items` recommended jobs with the saved session
    pub async fn fetch(&self, max_items: usize) -> Result<Vec<JobRecord>> {
        let state = SessionState::load(&self.config.state_file).await?;

        let mut browser = BrowserSession::launch(&self.config, self.config.headless).await?;
        let result = self.fetch_with(&mut browser, &state, max_items).await;

        if let Err(e) = browser.close().await {
            warn!("Failed to close browser cleanly: {e:#}");
        }
        result
    }

    async fn fetch_with(
        &self,
        browser: &mut BrowserSession,
        state: &SessionState,
        max_items: usize,
    ) -> Result<Vec<JobRecord>> {
        browser.restore(state).await?;
        browser.open_recommendations().await?;
        tokio::time::sleep(Duration::from_millis(self.config.settle_delay_ms)).await;

        let driver = PaginationDriver::new(&self.config);
        let jobs = driver.run(browser, max_items).await?;

        // a successful run may have refreshed tokens; keep them
        let mut refreshed = state.clone();
        refreshed.refresh_with(browser.capture_state().await?);
        refreshed.save(&self.config.state_file).await?;

        info!("Fetched {} jobs", jobs.len());
        Ok(jobs)
    }
}
