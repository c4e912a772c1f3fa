//! HTML retrieval.
//!
//! [`Fetcher`] is the seam between the news sources and the network; the
//! sources only ever see page bodies or errors. [`HttpFetcher`] is the real
//! implementation: one `reqwest` client carrying the configured timeout and
//! `User-Agent` header.

use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use std::error::Error;
use std::time::{Duration, Instant};
use tracing::{debug, instrument};

/// Something that can turn a URL into a page body.
pub trait Fetcher {
    /// GET `url` and return the body as text.
    async fn fetch(&self, url: &str) -> Result<String, Box<dyn Error>>;
}

/// HTTP fetcher with a bounded wait per request.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Build a client sending `user_agent` and giving up after `timeout`.
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, Box<dyn Error>> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_str(user_agent)?);
        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

impl Fetcher for HttpFetcher {
    #[instrument(level = "debug", skip(self))]
    async fn fetch(&self, url: &str) -> Result<String, Box<dyn Error>> {
        let t0 = Instant::now();
        let response = self.client.get(url).send().await?.error_for_status()?;
        let body = response.text().await?;
        debug!(
            bytes = body.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Fetched page"
        );
        Ok(body)
    }
}
