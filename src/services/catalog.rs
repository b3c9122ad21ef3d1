//! Catalog capability consumed by the aggregation pipeline and view states.
//!
//! The trait is the only seam between the in-memory state layer and the
//! remote catalog, so view states can be driven by a fake in tests.

use crate::domain::MovieId;
use crate::models::{Genre, MovieDetail, MovieSummary};
use thiserror::Error;

/// Errors surfaced by catalog operations.
///
/// Client and aggregator return these unchanged; view states turn them into
/// a user-visible message.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Catalog API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Unexpected catalog response: {0}")]
    Decode(String),

    #[error("Movie not found: {0}")]
    NotFound(MovieId),

    #[error("Catalog client misconfigured: {0}")]
    Configuration(String),
}

impl CatalogError {
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    pub fn api(status: u16, msg: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: msg.into(),
        }
    }

    /// Whether another attempt at the same request may succeed.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Api { status, .. } => *status >= 500 || *status == 429,
            Self::Decode(_) | Self::NotFound(_) | Self::Configuration(_) => false,
        }
    }
}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

/// Read access to a remote movie catalog.
///
/// # Examples
///
/// ```rust,ignore
/// use marquee::services::{CatalogClient, CatalogError};
/// use std::sync::Arc;
///
/// async fn example(client: Arc<dyn CatalogClient>) -> Result<(), CatalogError> {
///     let first_page = client.fetch_trending_page(1).await?;
///     println!("{} movies", first_page.len());
///     Ok(())
/// }
/// ```
#[async_trait::async_trait]
pub trait CatalogClient: Send + Sync {
    /// Fetches the full genre list.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Network`], [`CatalogError::Api`] or
    /// [`CatalogError::Decode`] when the request fails.
    async fn fetch_genres(&self) -> Result<Vec<Genre>, CatalogError>;

    /// Fetches one page (1-based) of this week's trending movies.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Configuration`] for page 0 without sending
    /// anything, otherwise [`CatalogError::Network`], [`CatalogError::Api`]
    /// or [`CatalogError::Decode`] when the request fails.
    async fn fetch_trending_page(&self, page: u32) -> Result<Vec<MovieSummary>, CatalogError>;

    /// Fetches the detail of a single movie.
    ///
    /// # Errors
    ///
    /// - Returns [`CatalogError::NotFound`] if the catalog has no such movie
    /// - Returns [`CatalogError::Network`], [`CatalogError::Api`] or
    ///   [`CatalogError::Decode`] when the request fails
    async fn fetch_detail(&self, id: MovieId) -> Result<MovieDetail, CatalogError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_error_display() {
        let err = CatalogError::NotFound(MovieId::new(42));
        assert_eq!(err.to_string(), "Movie not found: 42");

        let err = CatalogError::api(401, "Invalid API key");
        assert_eq!(err.to_string(), "Catalog API error (401): Invalid API key");
    }

    #[test]
    fn transient_errors() {
        assert!(CatalogError::network("connection reset").is_transient());
        assert!(CatalogError::api(503, "unavailable").is_transient());
        assert!(CatalogError::api(429, "slow down").is_transient());
        assert!(!CatalogError::api(401, "bad key").is_transient());
        assert!(!CatalogError::NotFound(MovieId::new(1)).is_transient());
        assert!(!CatalogError::Decode("eof".to_string()).is_transient());
    }
}
