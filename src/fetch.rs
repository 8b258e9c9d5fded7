use std::time::Instant;

use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, REFERER};
use tracing::{debug, info};

use crate::settings::FetchSettings;

/// Single-attempt HTML fetcher with browser-like headers.
pub struct Fetcher {
    client: reqwest::Client,
}

impl Fetcher {
    pub fn new(settings: &FetchSettings) -> Result<Self> {
        let client = client_builder(settings)?
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self { client })
    }

    /// GET `url` and decode the body as UTF-8. Non-2xx statuses are errors; nothing is retried.
    pub async fn fetch(&self, url: &str) -> Result<String> {
        info!("Fetching {}", url);
        let start = Instant::now();

        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Request to {} failed", url))?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("HTTP {} for {}", status, url);
        }

        let bytes = response
            .bytes()
            .await
            .context("Failed to read response body")?;
        let body = String::from_utf8_lossy(&bytes).into_owned();

        debug!(
            url,
            bytes = body.len(),
            latency_ms = start.elapsed().as_millis() as u64,
            "fetched page"
        );
        Ok(body)
    }
}

fn client_builder(settings: &FetchSettings) -> Result<reqwest::ClientBuilder> {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("zh-CN,zh;q=0.9,en;q=0.8"));
    headers.insert(
        REFERER,
        HeaderValue::from_str(&settings.referer).context("Invalid referer header")?,
    );

    Ok(reqwest::Client::builder()
        .timeout(settings.timeout)
        .user_agent(settings.user_agent.as_str())
        .default_headers(headers))
}
