// src/session/capture.rs
//! Interactive login: a visible browser, a human, and two ENTER presses

use anyhow::{Context, Result};
use std::io::Write;
use std::time::Duration;
use tracing::info;

use super::state::SessionState;
use crate::browser::BrowserSession;
use crate::config::ScraperConfig;

const RECOMMENDATIONS_SETTLE_MS: u64 = 2000;

/// Open a headed browser, let the user log in, and return the captured session
pub async fn capture_login_session(config: &ScraperConfig) -> Result<SessionState> {
    let session = BrowserSession::launch(config, false).await?;

    let captured = drive_login(&session, config).await;

    // close before surfacing any login error so no browser process lingers
    session.close().await?;
    captured
}

async fn drive_login(session: &BrowserSession, config: &ScraperConfig) -> Result<SessionState> {
    let login_timeout = Duration::from_secs(config.login_timeout_secs);

    session.goto_lenient(config.origin(), login_timeout).await?;
    wait_for_enter("Log in in the opened browser, then press ENTER here...").await?;

    session
        .goto_lenient(&config.recommend_page_url(), login_timeout)
        .await?;
    tokio::time::sleep(Duration::from_millis(RECOMMENDATIONS_SETTLE_MS)).await;
    wait_for_enter("Wait until you SEE recommendations, then press ENTER here...").await?;

    let state = session.capture_state().await?;
    info!("Captured {} cookies from login", state.cookies.len());
    Ok(state)
}

async fn wait_for_enter(prompt: &str) -> Result<()> {
    let prompt = prompt.to_string();
    tokio::task::spawn_blocking(move || -> Result<()> {
        print!("{prompt}");
        std::io::stdout().flush().context("Failed to flush stdout")?;
        let mut input = String::new();
        std::io::stdin()
            .read_line(&mut input)
            .context("Failed to read from stdin")?;
        Ok(())
    })
    .await
    .context("Prompt task panicked")?
}
