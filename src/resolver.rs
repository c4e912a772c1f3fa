//! Ordered fallback across news sources.

use crate::sources::NewsSource;
use tracing::{info, instrument};

/// Picks the context for a query: primary source, then fallback source,
/// then a fixed default.
///
/// Sources are asked one at a time and the chain stops at the first
/// non-empty answer, so a run makes at most two fetches.
#[derive(Debug, Clone)]
pub struct ContextResolver<A, B> {
    primary: A,
    fallback: B,
    default_context: String,
}

impl<A: NewsSource, B: NewsSource> ContextResolver<A, B> {
    pub fn new(primary: A, fallback: B, default_context: impl Into<String>) -> Self {
        Self {
            primary,
            fallback,
            default_context: default_context.into(),
        }
    }

    /// Resolve the news context for `query`.
    ///
    /// # Arguments
    ///
    /// * `query` - The user's query, passed unchanged to each source
    ///
    /// # Returns
    ///
    /// The primary source's text if non-empty, else the fallback source's
    /// text if non-empty, else the configured default. The fallback is only
    /// fetched when the primary came back empty.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let resolver = ContextResolver::new(primary, fallback, "No relevant news found.");
    /// let context = resolver.resolve("election results").await;
    /// assert!(!context.is_empty());
    /// ```
    #[instrument(level = "info", skip(self))]
    pub async fn resolve(&self, query: &str) -> String {
        if let Some(context) = self.primary.fetch_context(query).await.into_context() {
            info!(origin = "primary", "Resolved context");
            return context;
        }
        if let Some(context) = self.fallback.fetch_context(query).await.into_context() {
            info!(origin = "fallback", "Resolved context");
            return context;
        }
        info!(origin = "default", "No source produced headlines");
        self.default_context.clone()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::config::{DEFAULT_FALLBACK_CONTEXT, SourceSpec};
    use crate::models::SourceOutcome;
    use crate::sources::ScrapedSource;
    use crate::sources::tests::{BBC_PAGE, StubFetcher};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Returns a fixed outcome and counts how often it was asked.
    #[derive(Debug, Clone)]
    pub(crate) struct CountingSource {
        outcome: SourceOutcome,
        calls: Arc<AtomicUsize>,
    }

    impl CountingSource {
        pub(crate) fn new(outcome: SourceOutcome) -> Self {
            Self {
                outcome,
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }

        pub(crate) fn found(text: &str) -> Self {
            Self::new(SourceOutcome::Found(text.to_string()))
        }

        pub(crate) fn empty() -> Self {
            Self::new(SourceOutcome::Empty)
        }

        pub(crate) fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl NewsSource for CountingSource {
        async fn fetch_context(&self, _query: &str) -> SourceOutcome {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.outcome.clone()
        }
    }

    #[tokio::test]
    async fn test_primary_short_circuits() {
        let primary = CountingSource::found("A - a");
        let fallback = CountingSource::found("B - b");
        let resolver = ContextResolver::new(primary.clone(), fallback.clone(), DEFAULT_FALLBACK_CONTEXT);

        assert_eq!(resolver.resolve("q").await, "A - a");
        assert_eq!(primary.calls(), 1);
        assert_eq!(fallback.calls(), 0);
    }

    #[tokio::test]
    async fn test_falls_back_when_primary_empty() {
        let primary = CountingSource::empty();
        let fallback = CountingSource::found("B - b");
        let resolver = ContextResolver::new(primary.clone(), fallback.clone(), DEFAULT_FALLBACK_CONTEXT);

        assert_eq!(resolver.resolve("q").await, "B - b");
        assert_eq!(primary.calls(), 1);
        assert_eq!(fallback.calls(), 1);
    }

    #[tokio::test]
    async fn test_default_when_both_empty() {
        let primary = CountingSource::empty();
        let fallback = CountingSource::empty();
        let resolver = ContextResolver::new(primary.clone(), fallback.clone(), DEFAULT_FALLBACK_CONTEXT);

        assert_eq!(resolver.resolve("q").await, "No relevant news found.");
        assert_eq!(primary.calls() + fallback.calls(), 2);
    }

    #[tokio::test]
    async fn test_primary_timeout_uses_bbc_links() {
        let fetcher = StubFetcher::default().with_page("https://www.bbc.com/news/world", BBC_PAGE);
        let resolver = ContextResolver::new(
            ScrapedSource::new(SourceSpec::bing_news(), fetcher.clone(), 5),
            ScrapedSource::new(SourceSpec::bbc_world(), fetcher, 5),
            DEFAULT_FALLBACK_CONTEXT,
        );

        assert_eq!(
            resolver.resolve("election results").await,
            "World leaders react - https://www.bbc.com/news/123"
        );
    }

    #[tokio::test]
    async fn test_both_sources_failing_yields_default() {
        let fetcher = StubFetcher::default();
        let resolver = ContextResolver::new(
            ScrapedSource::new(SourceSpec::bing_news(), fetcher.clone(), 5),
            ScrapedSource::new(SourceSpec::bbc_world(), fetcher, 5),
            DEFAULT_FALLBACK_CONTEXT,
        );

        assert_eq!(resolver.resolve("election results").await, "No relevant news found.");
    }
}
