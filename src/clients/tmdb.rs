use crate::config::TmdbConfig;
use crate::constants::tmdb::USER_AGENT;
use crate::domain::MovieId;
use crate::models::{Genre, MovieDetail, MovieSummary};
use crate::services::catalog::{CatalogClient, CatalogError};
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

#[derive(Debug, Deserialize)]
struct GenresResponse {
    #[serde(default)]
    genres: Vec<GenreDto>,
}

#[derive(Debug, Deserialize)]
struct GenreDto {
    id: i32,
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct MovieListResponse {
    #[serde(default)]
    results: Vec<MovieDto>,
}

#[derive(Debug, Deserialize)]
struct MovieDto {
    id: i32,
    #[serde(default)]
    title: String,
    poster_path: Option<String>,
    #[serde(default)]
    genre_ids: Vec<i32>,
    #[serde(default)]
    popularity: f64,
    release_date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MovieDetailDto {
    id: i32,
    #[serde(default)]
    title: String,
    tagline: Option<String>,
    poster_path: Option<String>,
    #[serde(default)]
    genres: Vec<GenreDto>,
    overview: Option<String>,
    #[serde(default)]
    vote_average: f64,
    #[serde(default)]
    vote_count: u32,
    #[serde(default)]
    budget: u64,
    #[serde(default)]
    revenue: u64,
    status: Option<String>,
    imdb_id: Option<String>,
    runtime: Option<u32>,
    release_date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TmdbErrorBody {
    status_message: Option<String>,
}

impl From<GenreDto> for Genre {
    fn from(dto: GenreDto) -> Self {
        Self {
            id: dto.id,
            name: dto.name,
        }
    }
}

impl From<MovieDto> for MovieSummary {
    fn from(dto: MovieDto) -> Self {
        Self {
            id: dto.id,
            title: dto.title,
            poster_path: dto.poster_path,
            genre_ids: dto.genre_ids,
            popularity: dto.popularity,
            release_date: dto.release_date,
        }
    }
}

impl From<MovieDetailDto> for MovieDetail {
    fn from(dto: MovieDetailDto) -> Self {
        Self {
            id: dto.id,
            title: dto.title,
            tagline: dto.tagline,
            poster_path: dto.poster_path,
            genres: dto.genres.into_iter().map(Genre::from).collect(),
            overview: dto.overview,
            vote_average: dto.vote_average,
            vote_count: dto.vote_count,
            budget: dto.budget,
            revenue: dto.revenue,
            status: dto.status,
            imdb_id: dto.imdb_id,
            runtime_minutes: dto.runtime,
            release_date: dto.release_date,
        }
    }
}

/// TMDB v3 implementation of [`CatalogClient`].
///
/// Every request carries the `api_key` and `language` query parameters.
#[derive(Clone)]
pub struct TmdbClient {
    client: Client,
    base_url: Url,
    api_key: String,
    language: String,
    max_retries: u32,
    retry_backoff: Duration,
}

impl std::fmt::Debug for TmdbClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TmdbClient")
            .field("base_url", &self.base_url.as_str())
            .field("language", &self.language)
            .finish_non_exhaustive()
    }
}

impl TmdbClient {
    /// Creates a client with its own connection pool, honoring the
    /// configured timeout.
    ///
    /// # Errors
    /// Returns [`CatalogError::Configuration`] if the API key is blank, the
    /// base URL is invalid, or the HTTP client cannot be built.
    pub fn new(config: &TmdbConfig) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| {
                CatalogError::Configuration(format!("Failed to build HTTP client: {e}"))
            })?;

        Self::with_shared_client(client, config)
    }

    /// Creates a client on top of an existing HTTP client.
    ///
    /// # Errors
    /// Returns [`CatalogError::Configuration`] if the API key is blank or the
    /// base URL is invalid.
    pub fn with_shared_client(client: Client, config: &TmdbConfig) -> Result<Self, CatalogError> {
        let api_key = config.api_key.trim();
        if api_key.is_empty() {
            return Err(CatalogError::Configuration(
                "TMDB API key is not configured. Set tmdb.api_key or TMDB_API_KEY.".to_string(),
            ));
        }

        // Url::join drops the last segment unless the base ends with a slash.
        let mut base = config.base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base).map_err(|e| {
            CatalogError::Configuration(format!("Invalid TMDB base URL '{base}': {e}"))
        })?;

        Ok(Self {
            client,
            base_url,
            api_key: api_key.to_string(),
            language: config.language.clone(),
            max_retries: config.max_retries,
            retry_backoff: Duration::from_millis(config.retry_backoff_ms),
        })
    }

    fn endpoint_url(&self, path: &str, query: &[(&str, String)]) -> Result<Url, CatalogError> {
        let mut url = self
            .base_url
            .join(path)
            .map_err(|e| CatalogError::Configuration(format!("Invalid endpoint '{path}': {e}")))?;

        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
            pairs
                .append_pair("api_key", &self.api_key)
                .append_pair("language", &self.language);
        }

        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, CatalogError> {
        let url = self.endpoint_url(path, query)?;
        let mut attempt = 0;

        loop {
            match self.send_once(endpoint, path, url.clone()).await {
                Err(e) if e.is_transient() && attempt < self.max_retries => {
                    let delay = self.retry_backoff.saturating_mul(2u32.saturating_pow(attempt));
                    attempt += 1;
                    warn!(
                        endpoint,
                        attempt,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        error = %e,
                        "Retrying TMDB request"
                    );
                    tokio::time::sleep(delay).await;
                }
                result => return result,
            }
        }
    }

    async fn send_once<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        path: &str,
        url: Url,
    ) -> Result<T, CatalogError> {
        let start = Instant::now();
        let result = self.exchange(url).await;

        let outcome = match &result {
            Ok(_) => "success",
            Err(CatalogError::Api { status, .. }) if *status < 500 => "client_error",
            Err(_) => "error",
        };
        metrics::counter!("catalog_requests_total", "endpoint" => endpoint, "outcome" => outcome)
            .increment(1);
        metrics::histogram!("catalog_request_duration_seconds", "endpoint" => endpoint)
            .record(start.elapsed().as_secs_f64());

        debug!(
            endpoint,
            path,
            outcome,
            elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
            "TMDB request finished"
        );

        result
    }

    async fn exchange<T: DeserializeOwned>(&self, url: Url) -> Result<T, CatalogError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| CatalogError::from(e.without_url()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::api(status.as_u16(), error_message(status, &body)));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| CatalogError::from(e.without_url()))
    }
}

fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<TmdbErrorBody>(body)
        .ok()
        .and_then(|b| b.status_message)
        .filter(|m| !m.trim().is_empty())
        .or_else(|| {
            let body = body.trim();
            (!body.is_empty()).then(|| body.chars().take(200).collect())
        })
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown status").to_string())
}

#[async_trait::async_trait]
impl CatalogClient for TmdbClient {
    async fn fetch_genres(&self) -> Result<Vec<Genre>, CatalogError> {
        let response: GenresResponse = self.get_json("genres", "genre/movie/list", &[]).await?;
        Ok(response.genres.into_iter().map(Genre::from).collect())
    }

    async fn fetch_trending_page(&self, page: u32) -> Result<Vec<MovieSummary>, CatalogError> {
        if page == 0 {
            return Err(CatalogError::Configuration(
                "Trending pages are 1-based, got page 0".to_string(),
            ));
        }
        let response: MovieListResponse = self
            .get_json(
                "trending",
                "trending/movie/week",
                &[("page", page.to_string())],
            )
            .await?;
        Ok(response.results.into_iter().map(MovieSummary::from).collect())
    }

    async fn fetch_detail(&self, id: MovieId) -> Result<MovieDetail, CatalogError> {
        let path = format!("movie/{id}");
        match self.get_json::<MovieDetailDto>("detail", &path, &[]).await {
            Ok(dto) => Ok(dto.into()),
            Err(CatalogError::Api { status: 404, .. }) => Err(CatalogError::NotFound(id)),
            Err(e) => Err(e),
        }
    }
}
