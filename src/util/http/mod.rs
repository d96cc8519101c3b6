use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};
use once_cell::sync::{Lazy, OnceCell};
use reqwest::{header, Client, Method, Response};
use tokio::sync::Semaphore;

use crate::{config::SETTINGS, logging};

/// A semaphore for limiting concurrent requests.
///
/// The timer and manual refreshes may overlap; cap them so a slow upstream
/// is not flooded with stacked polls.
static SEMAPHORE: Lazy<Semaphore> = Lazy::new(|| Semaphore::new(4));

/// A singleton instance of the reqwest client.
static CLIENT: OnceCell<Client> = OnceCell::new();

const USER_AGENT: &str = concat!("quote_feed/", env!("CARGO_PKG_VERSION"));

/// Maximum attempts for a request that fails before any response arrives.
const MAX_RETRIES: usize = 2;

/// Returns the reqwest client singleton instance or creates one if it doesn't exist.
fn get_client() -> Result<&'static Client> {
    CLIENT.get_or_try_init(|| {
        super::ensure_rustls_crypto_provider();
        let timeout = Duration::from_secs(SETTINGS.feed.request_timeout_secs.max(1));
        Client::builder()
            .brotli(true)
            .gzip(true)
            .zstd(true)
            .connect_timeout(Duration::from_secs(8).min(timeout))
            .timeout(timeout)
            .tcp_nodelay(true)
            .pool_max_idle_per_host(4)
            .pool_idle_timeout(Duration::from_secs(90))
            .redirect(reqwest::redirect::Policy::limited(5))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| anyhow!("Failed to create reqwest client: {:?}", e))
    })
}

/// Performs an HTTP GET request and hands back the raw response, whatever its status.
pub async fn get_response(url: &str, headers: Option<header::HeaderMap>) -> Result<Response> {
    send(Method::GET, url, headers).await
}

/// Sends an HTTP request, retrying transport failures with exponential backoff.
///
/// A response with any status counts as success here; status handling is
/// the caller's business. If every attempt fails the error carries the
/// retry count and the last underlying error.
async fn send(
    method: Method,
    url: &str,
    headers: Option<header::HeaderMap>,
) -> Result<Response> {
    let visit_log = format!("{method}:{url}");
    let client = get_client()?;
    let mut rb = client.request(method, url);
    let mut last_error = String::new();

    if let Some(h) = headers {
        rb = rb.headers(h);
    }

    for attempt in 1..=MAX_RETRIES {
        let msg = format!("Attempt {} to send {}", attempt, visit_log);
        let rb_clone = rb
            .try_clone()
            .ok_or_else(|| anyhow!("Failed to clone RequestBuilder"))?;
        let permit = SEMAPHORE.acquire().await;
        let start = Instant::now();
        let res = rb_clone.send().await;
        let elapsed = start.elapsed().as_millis();
        drop(permit);

        match res {
            Ok(response) => {
                logging::debug_file_async(format!(
                    "{} {} ms status {}",
                    msg,
                    elapsed,
                    response.status()
                ));
                return Ok(response);
            }
            Err(why) => {
                last_error = format!("{:?}", why);
                logging::warn_file_async(format!(
                    "{} failed because {:?}. {} ms",
                    msg, why, elapsed
                ));
                if attempt < MAX_RETRIES {
                    tokio::time::sleep(Duration::from_secs(2u64.pow(attempt as u32))).await;
                    continue;
                }
            }
        }
    }

    Err(anyhow!(
        "Failed to send request to {} after {} attempts; last error: {}",
        url,
        MAX_RETRIES,
        last_error
    ))
}
