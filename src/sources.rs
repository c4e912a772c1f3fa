//! News sources.
//!
//! A [`NewsSource`] turns a query into a [`SourceOutcome`]. The only
//! implementation, [`ScrapedSource`], fetches one listing page and runs the
//! extractor over it. It never returns an error: any failure along the way
//! is logged and reported as [`SourceOutcome::Empty`], which the resolver
//! treats the same as a page with no headlines.

use crate::config::SourceSpec;
use crate::extract::extract;
use crate::fetch::Fetcher;
use crate::models::SourceOutcome;
use scraper::Html;
use std::time::Instant;
use tracing::{info, instrument, warn};

/// A place news context can come from.
pub trait NewsSource {
    /// Fetch context for `query`. Fails soft.
    async fn fetch_context(&self, query: &str) -> SourceOutcome;
}

/// A listing page read through a [`Fetcher`] according to a [`SourceSpec`].
#[derive(Debug, Clone)]
pub struct ScrapedSource<F> {
    spec: SourceSpec,
    fetcher: F,
    max_items: usize,
}

impl<F: Fetcher> ScrapedSource<F> {
    pub fn new(spec: SourceSpec, fetcher: F, max_items: usize) -> Self {
        Self {
            spec,
            fetcher,
            max_items,
        }
    }
}

impl<F: Fetcher> NewsSource for ScrapedSource<F> {
    /// Fetch the listing page for `query` and format its headlines.
    ///
    /// # Arguments
    ///
    /// * `query` - The user's query, percent-encoded into the source URL
    ///
    /// # Returns
    ///
    /// [`SourceOutcome::Found`] with one `title - detail` line per headline,
    /// or [`SourceOutcome::Empty`] when the fetch failed or nothing matched.
    /// Failures are logged at `warn` and never propagated.
    #[instrument(level = "info", skip_all, fields(source = %self.spec.name))]
    async fn fetch_context(&self, query: &str) -> SourceOutcome {
        let url = self.spec.request_url(query);
        let t0 = Instant::now();

        let body = match self.fetcher.fetch(&url).await {
            Ok(body) => body,
            Err(e) => {
                warn!(%url, error = %e, elapsed_ms = t0.elapsed().as_millis() as u64, "Fetch failed; treating source as empty");
                return SourceOutcome::Empty;
            }
        };

        let document = Html::parse_document(&body);
        let headlines = extract(&document, &self.spec, self.max_items);
        info!(%url, count = headlines.len(), "Extracted headlines");
        SourceOutcome::from_headlines(&headlines)
    }
}
