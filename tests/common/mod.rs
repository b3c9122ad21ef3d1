//! Mock TMDB server and in-memory catalog fakes shared by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::{Request, Response, StatusCode};
use axum::routing::any;
use marquee::config::TmdbConfig;
use marquee::domain::MovieId;
use marquee::models::{Genre, MovieDetail, MovieSummary};
use marquee::services::{CatalogClient, CatalogError};
use serde_json::json;
use std::collections::{HashMap, HashSet};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::{Mutex, Notify};

pub const MOVIES_PER_PAGE: i32 = 30;
pub const PAGE_STRIDE: i32 = 25;

/// A captured request for assertions.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub path: String,
    pub query: HashMap<String, String>,
}

#[derive(Clone, Default)]
struct MockState {
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
    failures_left: Arc<Mutex<u32>>,
    failing_page: Arc<Mutex<Option<u32>>>,
    malformed_bodies: Arc<Mutex<bool>>,
}

/// Serves the three TMDB endpoints the client uses.
///
/// Trending page `p` holds ids `(p-1)*25+1 ..= (p-1)*25+30`, so neighbouring
/// pages overlap by five movies.
pub struct MockTmdb {
    pub addr: SocketAddr,
    state: MockState,
    shutdown: tokio::sync::watch::Sender<bool>,
}

impl MockTmdb {
    pub async fn start() -> Self {
        let state = MockState::default();
        let (shutdown_tx, mut shutdown_rx) = tokio::sync::watch::channel(false);

        let app = Router::new()
            .route("/{*path}", any(handle_request))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock server");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.changed().await;
                })
                .await
                .ok();
        });

        Self {
            addr,
            state,
            shutdown: shutdown_tx,
        }
    }

    /// Base URL with the API version segment, without a trailing slash.
    pub fn base_url(&self) -> String {
        format!("http://{}/3", self.addr)
    }

    pub fn config(&self) -> TmdbConfig {
        TmdbConfig {
            base_url: self.base_url(),
            api_key: "test-key".to_string(),
            request_timeout_seconds: 5,
            max_retries: 0,
            retry_backoff_ms: 1,
            ..TmdbConfig::default()
        }
    }

    /// Answer the next `count` requests with a 500.
    pub async fn fail_next(&self, count: u32) {
        *self.state.failures_left.lock().await = count;
    }

    /// Answer every request for this trending page with a 500.
    pub async fn fail_page(&self, page: u32) {
        *self.state.failing_page.lock().await = Some(page);
    }

    /// Answer every request with 200 and a body that is not JSON.
    pub async fn serve_malformed_bodies(&self) {
        *self.state.malformed_bodies.lock().await = true;
    }

    pub async fn captured_requests(&self) -> Vec<CapturedRequest> {
        self.state.requests.lock().await.clone()
    }
}

impl Drop for MockTmdb {
    fn drop(&mut self) {
        let _ = self.shutdown.send(true);
    }
}

fn json_response(status: StatusCode, body: serde_json::Value) -> Response<Body> {
    Response::builder()
        .status(status)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn server_error() -> Response<Body> {
    json_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({ "status_message": "Internal error: Something went wrong, contact TMDb." }),
    )
}

async fn handle_request(
    State(state): State<MockState>,
    Query(query): Query<HashMap<String, String>>,
    req: Request<Body>,
) -> Response<Body> {
    let path = req.uri().path().to_string();

    state.requests.lock().await.push(CapturedRequest {
        path: path.clone(),
        query: query.clone(),
    });

    {
        let mut left = state.failures_left.lock().await;
        if *left > 0 {
            *left -= 1;
            return server_error();
        }
    }

    if *state.malformed_bodies.lock().await {
        return Response::builder()
            .status(StatusCode::OK)
            .header("content-type", "application/json")
            .body(Body::from("not json"))
            .unwrap();
    }

    match path.as_str() {
        "/3/genre/movie/list" => json_response(
            StatusCode::OK,
            json!({ "genres": [{ "id": 1, "name": "Comedy" }, { "id": 2, "name": "Action" }] }),
        ),
        "/3/trending/movie/week" => {
            let page: u32 = query.get("page").and_then(|p| p.parse().ok()).unwrap_or(1);
            if *state.failing_page.lock().await == Some(page) {
                return server_error();
            }
            json_response(StatusCode::OK, trending_page(page))
        }
        "/3/movie/7" => json_response(
            StatusCode::OK,
            json!({
                "id": 7,
                "title": "Se7en",
                "tagline": "Seven deadly sins. Seven ways to die.",
                "poster_path": "/se7en.jpg",
                "genres": [{ "id": 80, "name": "Crime" }, { "id": 53, "name": "Thriller" }],
                "overview": "Two detectives hunt a serial killer.",
                "vote_average": 8.37,
                "vote_count": 21000,
                "budget": 33000000,
                "revenue": 327311859,
                "status": "Released",
                "imdb_id": "tt0114369",
                "runtime": 127,
                "release_date": "1995-09-22"
            }),
        ),
        _ => json_response(
            StatusCode::NOT_FOUND,
            json!({ "status_message": "The resource you requested could not be found." }),
        ),
    }
}

fn trending_page(page: u32) -> serde_json::Value {
    let start = (page as i32 - 1) * PAGE_STRIDE + 1;
    let results: Vec<serde_json::Value> = (start..start + MOVIES_PER_PAGE)
        .map(|id| {
            json!({
                "id": id,
                "title": format!("Movie {id}"),
                "poster_path": format!("/{id}.jpg"),
                "genre_ids": [if id % 2 == 0 { 2 } else { 1 }],
                "popularity": f64::from(1000 - id),
                "release_date": format!("2024-01-{:02}", id % 28 + 1)
            })
        })
        .collect();
    json!({ "page": page, "results": results, "total_pages": 500 })
}

/// In-memory catalog with switchable failures and an optional gate that
/// holds `fetch_genres` until released.
#[derive(Default)]
pub struct FakeCatalog {
    pub genres: std::sync::Mutex<Vec<Genre>>,
    pub movies: std::sync::Mutex<Vec<MovieSummary>>,
    pub details: std::sync::Mutex<HashMap<i32, MovieDetail>>,
    pub genre_error: std::sync::Mutex<Option<CatalogError>>,
    pub movie_error: std::sync::Mutex<Option<CatalogError>>,
    pub requested_pages: std::sync::Mutex<HashSet<u32>>,
    gate: std::sync::Mutex<Option<Arc<Notify>>>,
}

impl FakeCatalog {
    pub fn new(genres: Vec<Genre>, movies: Vec<MovieSummary>) -> Arc<Self> {
        let fake = Self::default();
        *fake.genres.lock().unwrap() = genres;
        *fake.movies.lock().unwrap() = movies;
        Arc::new(fake)
    }

    pub fn set_genre_error(&self, err: Option<CatalogError>) {
        *self.genre_error.lock().unwrap() = err;
    }

    pub fn set_movie_error(&self, err: Option<CatalogError>) {
        *self.movie_error.lock().unwrap() = err;
    }

    pub fn set_movies(&self, movies: Vec<MovieSummary>) {
        *self.movies.lock().unwrap() = movies;
    }

    pub fn insert_detail(&self, detail: MovieDetail) {
        self.details.lock().unwrap().insert(detail.id, detail);
    }

    /// The next `fetch_genres` call blocks until the returned handle is
    /// notified.
    pub fn hold_next_genres(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.gate.lock().unwrap() = Some(gate.clone());
        gate
    }
}

#[async_trait]
impl CatalogClient for FakeCatalog {
    async fn fetch_genres(&self) -> Result<Vec<Genre>, CatalogError> {
        let gate = self.gate.lock().unwrap().take();
        let snapshot = (
            self.genre_error.lock().unwrap().clone(),
            self.genres.lock().unwrap().clone(),
        );
        if let Some(gate) = gate {
            gate.notified().await;
        }
        match snapshot {
            (Some(err), _) => Err(err),
            (None, genres) => Ok(genres),
        }
    }

    async fn fetch_trending_page(&self, page: u32) -> Result<Vec<MovieSummary>, CatalogError> {
        self.requested_pages.lock().unwrap().insert(page);
        if let Some(err) = self.movie_error.lock().unwrap().clone() {
            return Err(err);
        }
        // Everything is served on page one.
        if page == 1 {
            Ok(self.movies.lock().unwrap().clone())
        } else {
            Ok(Vec::new())
        }
    }

    async fn fetch_detail(&self, id: MovieId) -> Result<MovieDetail, CatalogError> {
        self.details
            .lock()
            .unwrap()
            .get(&id.value())
            .cloned()
            .ok_or(CatalogError::NotFound(id))
    }
}
