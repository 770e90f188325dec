// src/cli.rs
use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use crate::config::ScraperConfig;
use crate::output::{render_summary, write_output};
use crate::JobrightScraper;

#[derive(Parser, Debug)]
#[command(name = "jobright-recs")]
#[command(about = "Fetch recommended jobs from jobright.ai with a saved browser session")]
pub struct Cli {
    /// Log in interactively and save the session before fetching
    #[arg(long)]
    pub login: bool,

    /// Maximum number of jobs to fetch
    #[arg(long, default_value_t = 50)]
    pub max: usize,

    /// Output JSON file
    #[arg(long, default_value = "jobright_recs.json")]
    pub out: PathBuf,

    /// Jobs requested per API page
    #[arg(long)]
    pub page_size: Option<usize>,

    #[arg(long)]
    pub sort_condition: Option<i64>,

    /// Keywords kept per job
    #[arg(long)]
    pub max_keywords: Option<usize>,

    /// TOML config file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Session state file
    #[arg(long)]
    pub state_file: Option<PathBuf>,

    /// Run the fetch in a visible browser window
    #[arg(long)]
    pub show_browser: bool,

    /// Debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Layer the flags over file and environment configuration
    pub fn scraper_config(&self) -> Result<ScraperConfig> {
        let mut config = ScraperConfig::load(self.config.as_deref())?;

        if let Some(page_size) = self.page_size {
            config = config.with_page_size(page_size);
        }
        if let Some(sort_condition) = self.sort_condition {
            config = config.with_sort_condition(sort_condition);
        }
        if let Some(max_keywords) = self.max_keywords {
            config = config.with_max_keywords(max_keywords);
        }
        if let Some(state_file) = &self.state_file {
            config = config.with_state_file(state_file.clone());
        }
        if self.show_browser {
            config = config.with_headless(false);
        }
        Ok(config)
    }
}

pub async fn run(cli: Cli) -> Result<()> {
    let scraper = JobrightScraper::new(cli.scraper_config()?);

    if cli.login {
        scraper.login().await?;
    }

    let jobs = scraper.fetch(cli.max).await?;
    write_output(&cli.out, &jobs).await?;

    print!("{}", render_summary(&jobs));
    println!("[OK] Wrote {}", cli.out.display());
    Ok(())
}
