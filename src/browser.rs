// src/browser.rs
//! Chromium session driven through chromiumoxide
//!
//! API calls go through `fetch` inside the page so the browser's own cookies,
//! origin and anti-bot state apply exactly as they do for the web app.

use anyhow::{Context, Result};
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::network::{CookieParam, CookieSameSite, TimeSinceEpoch};
use chromiumoxide::page::Page;
use futures::StreamExt;
use std::path::PathBuf;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::ScraperConfig;
use crate::error::ScrapeError;
use crate::pagination::RecommendationApi;
use crate::session::{OriginStorage, SessionState, StorageEntry, StoredCookie};
use crate::types::ApiResponse;

/// Find a Chrome/Chromium executable: explicit path first, then `PATH`
pub fn find_chromium(explicit: Option<&PathBuf>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        if path.exists() {
            return Some(path.clone());
        }
        warn!("Configured Chromium path does not exist: {}", path.display());
    }

    for name in [
        "google-chrome",
        "google-chrome-stable",
        "chromium",
        "chromium-browser",
    ] {
        if let Ok(path) = which::which(name) {
            return Some(path);
        }
    }

    if cfg!(target_os = "macos") {
        let common = PathBuf::from("/Applications/Google Chrome.app/Contents/MacOS/Google Chrome");
        if common.exists() {
            return Some(common);
        }
    }

    None
}

/// One browser process with a single tab; closed on drop at the latest
pub struct BrowserSession {
    browser: Browser,
    handler_task: JoinHandle<()>,
    page: Page,
    origin: String,
    recommend_page_url: String,
    navigation_timeout: Duration,
    reauth_settle: Duration,
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        self.handler_task.abort();
    }
}

impl BrowserSession {
    pub async fn launch(config: &ScraperConfig, headless: bool) -> Result<Self> {
        let chrome_path = find_chromium(config.chrome_executable.as_ref())
            .ok_or(ScrapeError::BrowserUnavailable)?;
        debug!("Using Chromium at {}", chrome_path.display());

        let mut builder = BrowserConfig::builder()
            .chrome_executable(chrome_path)
            .arg("--disable-blink-features=AutomationControlled")
            .arg("--no-first-run")
            .arg("--no-default-browser-check");
        if !headless {
            builder = builder.with_head().viewport(None);
        }
        let browser_config = builder
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to configure browser: {e}"))?;

        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .context("Failed to launch browser")?;
        let handler_task = tokio::spawn(async move { while (handler.next().await).is_some() {} });

        let page = browser
            .new_page("about:blank")
            .await
            .context("Failed to open browser tab")?;

        info!(headless, "Browser session started");

        Ok(Self {
            browser,
            handler_task,
            page,
            origin: config.origin().to_string(),
            recommend_page_url: config.recommend_page_url(),
            navigation_timeout: Duration::from_secs(config.navigation_timeout_secs),
            reauth_settle: Duration::from_millis(config.reauth_settle_ms),
        })
    }

    /// Navigate and wait for the load; `Ok(false)` when the timeout hit first
    pub async fn goto(&self, url: &str, timeout: Duration) -> Result<bool> {
        match tokio::time::timeout(timeout, self.page.goto(url)).await {
            Ok(Ok(_)) => Ok(true),
            Ok(Err(e)) => Err(anyhow::anyhow!("Navigation to {url} failed: {e}")),
            Err(_) => Ok(false),
        }
    }

    /// Like `goto`, but a timeout only logs; the page is usually usable anyway
    pub async fn goto_lenient(&self, url: &str, timeout: Duration) -> Result<()> {
        if !self.goto(url, timeout).await? {
            warn!(
                "Navigation to {} timed out after {}s, continuing",
                url,
                timeout.as_secs()
            );
        }
        Ok(())
    }

    pub async fn open_recommendations(&self) -> Result<()> {
        self.goto_lenient(&self.recommend_page_url, self.navigation_timeout)
            .await
    }

    /// Apply cookies, then land on the origin and replay its localStorage
    pub async fn restore(&self, state: &SessionState) -> Result<()> {
        let cookies: Vec<CookieParam> = state
            .cookies
            .iter()
            .map(|c| cookie_param(c, &self.origin))
            .collect();
        if !cookies.is_empty() {
            self.page
                .set_cookies(cookies)
                .await
                .context("Failed to restore session cookies")?;
        }

        let entries = state.local_storage_for(&self.origin);
        if !entries.is_empty() {
            self.goto_lenient(&self.origin, self.navigation_timeout)
                .await?;
            let items: Vec<(&str, &str)> = entries
                .iter()
                .map(|e| (e.name.as_str(), e.value.as_str()))
                .collect();
            let js = format!(
                "(function(items) {{ for (const [k, v] of items) {{ window.localStorage.setItem(k, v); }} return items.length; }})({})",
                serde_json::to_string(&items)?
            );
            self.page
                .evaluate(js)
                .await
                .context("Failed to restore localStorage")?;
        }

        debug!(
            "Restored {} cookies and {} localStorage entries",
            state.cookies.len(),
            entries.len()
        );
        Ok(())
    }

    /// Current cookies plus this origin's localStorage
    pub async fn capture_state(&self) -> Result<SessionState> {
        let cookies = self
            .page
            .get_cookies()
            .await
            .context("Failed to read browser cookies")?
            .into_iter()
            .map(|c| StoredCookie {
                name: c.name,
                value: c.value,
                domain: c.domain,
                path: c.path,
                expires: Some(c.expires).filter(|e| *e > 0.0),
                http_only: c.http_only,
                secure: c.secure,
                same_site: c.same_site.as_ref().map(|s| same_site_name(s).to_string()),
            })
            .collect();

        let origins = match self.capture_local_storage().await {
            Ok(origin) => vec![origin],
            Err(e) => {
                warn!("Could not read localStorage: {e:#}");
                Vec::new()
            }
        };

        Ok(SessionState {
            cookies,
            origins,
            captured_at: Some(chrono::Utc::now().timestamp()),
        })
    }

    async fn capture_local_storage(&self) -> Result<OriginStorage> {
        let origin: String = self
            .page
            .evaluate("window.location.origin")
            .await?
            .into_value()?;
        let raw: String = self
            .page
            .evaluate("JSON.stringify(Object.entries(window.localStorage))")
            .await?
            .into_value()?;
        let pairs: Vec<(String, String)> =
            serde_json::from_str(&raw).context("Unexpected localStorage shape")?;

        Ok(OriginStorage {
            origin,
            local_storage: pairs
                .into_iter()
                .map(|(name, value)| StorageEntry { name, value })
                .collect(),
        })
    }

    /// GET `url` from inside the page with the session's credentials
    pub async fn fetch(&self, url: &str) -> Result<ApiResponse> {
        let req = serde_json::json!({
            "url": url,
            "referrer": self.recommend_page_url,
        });
        let js = format!(
            r#"(async function(req) {{
  try {{
    const res = await fetch(req.url, {{
      method: 'GET',
      credentials: 'include',
      referrer: req.referrer,
      headers: {{ 'accept': 'application/json' }}
    }});
    const text = await res.text();
    return {{ status: res.status, text }};
  }} catch (e) {{
    return {{ status: 0, text: String((e && e.message) || e || 'fetch failed') }};
  }}
}})({})"#,
            req
        );

        let response: ApiResponse = self
            .page
            .evaluate(js)
            .await
            .with_context(|| format!("Browser request to {url} failed"))?
            .into_value()
            .context("Unexpected browser fetch result")?;

        debug!(status = response.status, bytes = response.body.len(), "GET {}", url);
        Ok(response)
    }

    pub async fn close(mut self) -> Result<()> {
        self.browser
            .close()
            .await
            .context("Failed to close browser")?;
        let _ = self.browser.wait().await;
        debug!("Browser session closed");
        Ok(())
    }
}

/// CDP cookie for `cookie`; host-only cookies without a domain bind to `origin`
fn cookie_param(cookie: &StoredCookie, origin: &str) -> CookieParam {
    let mut param = CookieParam::new(cookie.name.clone(), cookie.value.clone());
    if cookie.domain.is_empty() {
        param.url = Some(origin.to_string());
    } else {
        param.domain = Some(cookie.domain.clone());
    }
    param.path = Some(cookie.path.clone());
    param.secure = Some(cookie.secure);
    param.http_only = Some(cookie.http_only);
    // session cookies are stored as -1 or without expiry
    param.expires = cookie
        .expires
        .filter(|e| *e > 0.0)
        .map(TimeSinceEpoch::new);
    param.same_site = cookie.same_site.as_deref().and_then(parse_same_site);
    param
}

fn same_site_name(same_site: &CookieSameSite) -> &'static str {
    match same_site {
        CookieSameSite::Strict => "Strict",
        CookieSameSite::Lax => "Lax",
        CookieSameSite::None => "None",
    }
}

fn parse_same_site(raw: &str) -> Option<CookieSameSite> {
    match raw.to_ascii_lowercase().as_str() {
        "strict" => Some(CookieSameSite::Strict),
        "lax" => Some(CookieSameSite::Lax),
        "none" => Some(CookieSameSite::None),
        _ => None,
    }
}

impl RecommendationApi for BrowserSession {
    async fn get(&mut self, url: &str) -> Result<ApiResponse> {
        self.fetch(url).await
    }

    async fn reauthenticate(&mut self) -> Result<()> {
        self.open_recommendations().await?;
        tokio::time::sleep(self.reauth_settle).await;
        Ok(())
    }
}
