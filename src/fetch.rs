use std::time::Duration;

use anyhow::{Context, Result, ensure};
use reqwest::header::{HeaderMap, HeaderValue};
use tokio::time::sleep;
use tracing::error;

/// Timeout for a single HTTP attempt.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Fixed wait between failed attempts.
pub const RETRY_DELAY: Duration = Duration::from_secs(5);

#[must_use]
pub fn init_http_client() -> reqwest::Client {
    let mut headers = HeaderMap::new();
    headers.insert(
        "User-Agent",
        HeaderValue::from_str(&format!(
            "{}/{} (+{})",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION"),
            env!("CARGO_PKG_REPOSITORY")
        ))
        .unwrap(),
    );

    reqwest::Client::builder()
        .default_headers(headers)
        .timeout(FETCH_TIMEOUT)
        .build()
        .expect("Unable to build HTTP client")
}

/// Fetches `url` as text, retrying failed attempts after a fixed delay.
///
/// A non-success status counts as a failure. Once `max_attempts` is
/// exhausted the last error is returned to the caller.
///
/// # Errors
/// Errors when every attempt fails with a network error, timeout or
/// non-success status.
///
/// # Panics
/// Panics if `max_attempts` is zero.
pub async fn fetch_with_retry(
    client: &reqwest::Client,
    url: &str,
    max_attempts: u32,
) -> Result<String> {
    fetch_with_retry_delayed(client, url, max_attempts, RETRY_DELAY).await
}

async fn fetch_with_retry_delayed(
    client: &reqwest::Client,
    url: &str,
    max_attempts: u32,
    delay: Duration,
) -> Result<String> {
    assert!(max_attempts >= 1, "max_attempts must be at least 1");

    let mut attempt = 0;
    loop {
        attempt += 1;
        match try_fetch(client, url).await {
            Ok(text) => return Ok(text),
            Err(e) => {
                error!("Attempt {attempt} failed: {e:#}");
                if attempt == max_attempts {
                    return Err(e);
                }
                sleep(delay).await;
            }
        }
    }
}

async fn try_fetch(client: &reqwest::Client, url: &str) -> Result<String> {
    let req = client.get(url).send().await.context("Fetching playlist")?;
    ensure!(
        req.status().is_success(),
        "HTTP error! status: {}",
        req.status()
    );

    req.text().await.context("Decoding playlist body")
}
