use crate::constants::aggregation::{DEFAULT_TOP_N, TRENDING_PAGE_COUNT};
use crate::models::MovieSummary;
use crate::services::catalog::{CatalogClient, CatalogError};
use futures::future::join_all;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// Builds the "top N this week" list out of the trending pages.
///
/// Always requests pages `1..=5` concurrently, whatever `n` is. With the
/// remote page size of 20 that covers at most 100 distinct movies, so a
/// larger `n` is silently capped by what those pages contain.
#[derive(Clone)]
pub struct TopMoviesAggregator {
    client: Arc<dyn CatalogClient>,
}

impl TopMoviesAggregator {
    #[must_use]
    pub fn new(client: Arc<dyn CatalogClient>) -> Self {
        Self { client }
    }

    /// Top [`DEFAULT_TOP_N`] movies.
    ///
    /// # Errors
    ///
    /// See [`Self::fetch_top_n`].
    pub async fn fetch_top(&self) -> Result<Vec<MovieSummary>, CatalogError> {
        self.fetch_top_n(DEFAULT_TOP_N).await
    }

    /// Fetches every trending page, then merges them in page order, drops
    /// repeated ids (first occurrence wins) and keeps the first `n`.
    ///
    /// # Errors
    ///
    /// Returns the first page error in page order. All page requests are
    /// awaited before failing; no partial list is ever returned.
    pub async fn fetch_top_n(&self, n: usize) -> Result<Vec<MovieSummary>, CatalogError> {
        let requests = (1..=TRENDING_PAGE_COUNT).map(|page| self.client.fetch_trending_page(page));
        let pages = join_all(requests)
            .await
            .into_iter()
            .collect::<Result<Vec<_>, _>>()?;

        let fetched: usize = pages.iter().map(Vec::len).sum();
        let top = merge_pages(pages, n);

        debug!(
            pages = TRENDING_PAGE_COUNT,
            fetched,
            kept = top.len(),
            "Aggregated trending pages"
        );

        Ok(top)
    }
}

/// Concatenates pages in order, keeps the first occurrence of each id and
/// truncates to `limit`.
#[must_use]
pub fn merge_pages(pages: Vec<Vec<MovieSummary>>, limit: usize) -> Vec<MovieSummary> {
    let mut seen = HashSet::new();
    pages
        .into_iter()
        .flatten()
        .filter(|movie| seen.insert(movie.id))
        .take(limit)
        .collect()
}
